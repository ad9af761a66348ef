use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbImage};
use log::info;
use rfd::FileDialog;

use crate::error::{EditorError, Result};

/// Save dialog offering the formats [`export_composite`] can write.
pub fn select_export_path() -> Option<PathBuf> {
    FileDialog::new()
        .add_filter("PNG", &["png"])
        .add_filter("JPEG", &["jpg", "jpeg"])
        .add_filter("BMP", &["bmp"])
        .set_file_name("export.png")
        .save_file()
}

/// Output format chosen from the file extension, case-insensitively.
pub fn export_format(path: &Path) -> Option<ImageFormat> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some(ImageFormat::Png),
        "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
        "bmp" => Some(ImageFormat::Bmp),
        _ => None,
    }
}

/// Writes a flattened canvas to `path`. The format follows the extension.
pub fn export_composite(image: &RgbImage, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let failure = |reason: String| EditorError::ExportFailure {
        path: path.to_path_buf(),
        reason,
    };

    let format = export_format(path)
        .ok_or_else(|| failure("unsupported extension, expected png, jpg, jpeg or bmp".to_string()))?;
    image
        .save_with_format(path, format)
        .map_err(|e| failure(e.to_string()))?;

    info!("exported {}x{} image to {}", image.width(), image.height(), path.display());
    Ok(())
}
