use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use log::{error, info, warn};
use winit::{
    dpi::{LogicalSize, PhysicalSize},
    event::*,
    event_loop::EventLoop,
    keyboard::{KeyCode, ModifiersState, PhysicalKey},
    window::WindowAttributes,
};

use layerpaint::{
    Editor, ToolKind,
    cli::{Cli, run_batch},
    gpu::Gpu,
    input::{PointerState, window_to_canvas},
    io::select_export_path,
    tools::step_preset,
};

const PALETTE: [[u8; 3]; 8] = [
    [0, 0, 0],       // Black
    [255, 0, 0],     // Red
    [0, 128, 255],   // Blue-ish
    [0, 180, 0],     // Green
    [255, 200, 0],   // Orange
    [255, 255, 0],   // Yellow
    [255, 0, 255],   // Magenta
    [255, 255, 255], // White
];
const CANVAS_STEP: i64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Undo,
    Save,
    Cut,
    Copy,
    Paste,
    FillSelection,
    Cancel,
    Tool(ToolKind),
    Color(usize),
    SizeUp,
    SizeDown,
    AddLayer,
    DeleteLayer,
    NextLayer,
    PrevLayer,
    GrowCanvas,
    ShrinkCanvas,
}

fn map_key(code: KeyCode, ctrl: bool) -> Option<Action> {
    if ctrl {
        return match code {
            KeyCode::KeyZ => Some(Action::Undo),
            KeyCode::KeyS => Some(Action::Save),
            KeyCode::KeyX => Some(Action::Cut),
            KeyCode::KeyC => Some(Action::Copy),
            KeyCode::KeyV => Some(Action::Paste),
            KeyCode::KeyF => Some(Action::FillSelection),
            KeyCode::Equal | KeyCode::NumpadAdd => Some(Action::GrowCanvas),
            KeyCode::Minus | KeyCode::NumpadSubtract => Some(Action::ShrinkCanvas),
            _ => None,
        };
    }
    let action = match code {
        KeyCode::Escape => Action::Cancel,
        KeyCode::KeyB => Action::Tool(ToolKind::Brush),
        KeyCode::KeyE => Action::Tool(ToolKind::Eraser),
        KeyCode::KeyF => Action::Tool(ToolKind::Fill),
        KeyCode::KeyC => Action::Tool(ToolKind::Circle),
        KeyCode::KeyR => Action::Tool(ToolKind::Rectangle),
        KeyCode::KeyL => Action::Tool(ToolKind::Line),
        KeyCode::KeyO => Action::Tool(ToolKind::Ellipse),
        KeyCode::KeyT => Action::Tool(ToolKind::Text),
        KeyCode::KeyS => Action::Tool(ToolKind::Selection),
        KeyCode::KeyG => Action::Tool(ToolKind::Grayscale),
        KeyCode::KeyH => Action::Tool(ToolKind::Sharpen),
        KeyCode::KeyU => Action::Tool(ToolKind::GaussianBlur),
        KeyCode::Digit1 => Action::Color(0),
        KeyCode::Digit2 => Action::Color(1),
        KeyCode::Digit3 => Action::Color(2),
        KeyCode::Digit4 => Action::Color(3),
        KeyCode::Digit5 => Action::Color(4),
        KeyCode::Digit6 => Action::Color(5),
        KeyCode::Digit7 => Action::Color(6),
        KeyCode::Digit8 => Action::Color(7),
        KeyCode::BracketLeft => Action::SizeDown,
        KeyCode::BracketRight => Action::SizeUp,
        KeyCode::Insert => Action::AddLayer,
        KeyCode::Delete => Action::DeleteLayer,
        KeyCode::PageUp => Action::NextLayer,
        KeyCode::PageDown => Action::PrevLayer,
        _ => return None,
    };
    Some(action)
}

fn resize_by(editor: &mut Editor, delta: i64) {
    let canvas = editor.canvas();
    let grow = |v: u32| (v as i64 + delta).clamp(1, u32::MAX as i64) as u32;
    let (w, h) = (grow(canvas.width()), grow(canvas.height()));
    if let Err(e) = editor.resize_canvas(w, h) {
        warn!("{e}");
    }
}

fn apply(editor: &mut Editor, action: Action, pointer: &PointerState) {
    match action {
        Action::Undo => {
            editor.undo();
        }
        Action::Save => match select_export_path() {
            Some(path) => match editor.export(&path) {
                Ok(()) => info!("saved {}", path.display()),
                Err(e) => error!("{e}"),
            },
            None => info!("save cancelled"),
        },
        Action::Cut => {
            editor.cut_selection();
        }
        Action::Copy => {
            editor.copy_selection();
        }
        Action::Paste => {
            let (x, y) = pointer.last_pos.unwrap_or((0, 0));
            editor.paste_clipboard(x, y);
        }
        Action::FillSelection => {
            if !editor.fill_selection() {
                info!("no selection to fill");
            }
        }
        Action::Cancel => {
            editor.cancel_text();
            editor.cancel_selection();
        }
        Action::Tool(tool) => editor.set_tool(tool),
        Action::Color(idx) => {
            if let Some(color) = PALETTE.get(idx) {
                editor.set_color(*color);
            }
        }
        Action::SizeUp => {
            editor.set_size(step_preset(editor.tool_state().size, true));
        }
        Action::SizeDown => {
            editor.set_size(step_preset(editor.tool_state().size, false));
        }
        Action::AddLayer => {
            editor.add_layer();
        }
        Action::DeleteLayer => {
            let active = editor.canvas().active_index();
            if let Err(e) = editor.delete_layer(active) {
                warn!("{e}");
            }
        }
        Action::NextLayer => {
            let next = editor.canvas().active_index() + 1;
            if next < editor.canvas().layer_count() {
                if let Err(e) = editor.switch_layer(next) {
                    warn!("{e}");
                }
            }
        }
        Action::PrevLayer => {
            if let Some(prev) = editor.canvas().active_index().checked_sub(1) {
                if let Err(e) = editor.switch_layer(prev) {
                    warn!("{e}");
                }
            }
        }
        Action::GrowCanvas => resize_by(editor, CANVAS_STEP),
        Action::ShrinkCanvas => resize_by(editor, -CANVAS_STEP),
    }
}

/// Keys consumed by an open text entry. Returns false if the key should go
/// through the normal shortcut table instead.
fn handle_text_key(editor: &mut Editor, event: &KeyEvent, ctrl: bool) -> bool {
    if editor.text_entry().is_none() || ctrl {
        return false;
    }
    match event.physical_key {
        PhysicalKey::Code(KeyCode::Escape) => editor.cancel_text(),
        PhysicalKey::Code(KeyCode::Enter | KeyCode::NumpadEnter) => {
            editor.commit_text();
        }
        PhysicalKey::Code(KeyCode::Backspace) => editor.backspace(),
        _ => match event.text.as_ref() {
            Some(text) if !text.chars().any(char::is_control) => editor.type_text(text),
            _ => return false,
        },
    }
    true
}

fn run_window(mut editor: Editor) {
    let event_loop = EventLoop::new().expect("failed to create event loop");
    let mut gpu: Option<Gpu> = None;
    let mut window_size: PhysicalSize<u32> = PhysicalSize::new(0, 0);
    let mut window: Option<Arc<winit::window::Window>> = None;
    let mut pointer = PointerState::new();
    let mut modifiers = ModifiersState::empty();

    let result = event_loop.run(move |event, elwt| match event {
        Event::Resumed => {
            if gpu.is_none() {
                let canvas_size = (editor.canvas().width(), editor.canvas().height());
                let attrs = WindowAttributes::default()
                    .with_title("LayerPaint")
                    .with_inner_size(LogicalSize::new(canvas_size.0 as f64, canvas_size.1 as f64));
                let w = Arc::new(elwt.create_window(attrs).expect("failed to create window"));
                let (g, s) = pollster::block_on(Gpu::new(&w, canvas_size));
                window_size = s;
                window = Some(w);
                gpu = Some(g);
            }
        }

        Event::WindowEvent { event, window_id } => {
            let (Some(g), Some(w)) = (gpu.as_mut(), window.as_ref()) else {
                return;
            };
            if window_id != w.id() {
                return;
            }
            match event {
                WindowEvent::CloseRequested => elwt.exit(),
                WindowEvent::Resized(new_size) => {
                    window_size = new_size;
                    g.resize(new_size);
                    w.request_redraw();
                }
                WindowEvent::ModifiersChanged(m) => modifiers = m.state(),
                WindowEvent::KeyboardInput { event, .. } => {
                    if event.state != ElementState::Pressed {
                        return;
                    }
                    let ctrl = modifiers.control_key();
                    if !handle_text_key(&mut editor, &event, ctrl) {
                        if let PhysicalKey::Code(code) = event.physical_key {
                            if let Some(action) = map_key(code, ctrl) {
                                apply(&mut editor, action, &pointer);
                            }
                        }
                    }
                    w.request_redraw();
                }
                WindowEvent::MouseInput { state, button: MouseButton::Left, .. } => {
                    let event = if state == ElementState::Pressed {
                        pointer.press()
                    } else {
                        pointer.release()
                    };
                    if let Some(event) = event {
                        editor.handle_pointer(event);
                        w.request_redraw();
                    }
                }
                WindowEvent::CursorMoved { position, .. } => {
                    let canvas_size = (editor.canvas().width(), editor.canvas().height());
                    let size = (window_size.width, window_size.height);
                    if let Some(p) = window_to_canvas((position.x, position.y), size, canvas_size) {
                        if let Some(event) = pointer.moved(p) {
                            editor.handle_pointer(event);
                            w.request_redraw();
                        }
                    }
                }
                WindowEvent::RedrawRequested => {
                    if let Err(e) = g.render(&editor.display_frame()) {
                        match e {
                            wgpu::SurfaceError::Lost => g.resize(window_size),
                            wgpu::SurfaceError::OutOfMemory => elwt.exit(),
                            other => warn!("{other:?}"),
                        }
                    }
                }
                _ => {}
            }
        }

        _ => {}
    });

    if let Err(e) = result {
        error!("event loop failed: {e}");
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    if cli.batch {
        return match run_batch(&cli) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                error!("{e}");
                ExitCode::FAILURE
            }
        };
    }

    match cli.editor_config().and_then(Editor::new) {
        Ok(editor) => {
            run_window(editor);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
