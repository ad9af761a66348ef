#[cfg(test)]
mod tests {
    use crate::error::EditorError;
    use crate::io::*;
    use image::{ImageFormat, RgbImage};
    use std::fs;
    use std::path::{Path, PathBuf};

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("layerpaint_{}_{}", std::process::id(), name))
    }

    fn checker() -> RgbImage {
        RgbImage::from_fn(16, 8, |x, y| {
            if (x + y) % 2 == 0 {
                image::Rgb([255, 0, 0])
            } else {
                image::Rgb([0, 0, 255])
            }
        })
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(export_format(Path::new("a.png")), Some(ImageFormat::Png));
        assert_eq!(export_format(Path::new("a.JPG")), Some(ImageFormat::Jpeg));
        assert_eq!(export_format(Path::new("a.jpeg")), Some(ImageFormat::Jpeg));
        assert_eq!(export_format(Path::new("dir.d/a.Bmp")), Some(ImageFormat::Bmp));
        assert_eq!(export_format(Path::new("a.gif")), None);
        assert_eq!(export_format(Path::new("noext")), None);
    }

    #[test]
    fn test_png_export_is_lossless() {
        let path = temp_path("export.png");
        let img = checker();
        let result = export_composite(&img, &path);
        assert!(result.is_ok(), "Export failed: {:?}", result);

        let loaded = image::open(&path).unwrap().to_rgb8();
        assert_eq!(loaded, img);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_bmp_and_jpeg_export() {
        for name in ["export.bmp", "export.JPEG"] {
            let path = temp_path(name);
            assert!(export_composite(&checker(), &path).is_ok(), "{name}");

            let loaded = image::open(&path).unwrap();
            assert_eq!((loaded.width(), loaded.height()), (16, 8));

            let _ = fs::remove_file(&path);
        }
    }

    #[test]
    fn test_unknown_extension_fails() {
        let path = temp_path("export.tga");
        let err = export_composite(&checker(), &path).unwrap_err();
        assert!(matches!(err, EditorError::ExportFailure { .. }));
        assert!(!path.exists());
    }

    #[test]
    fn test_unwritable_path_fails() {
        let path = temp_path("missing_dir").join("nested").join("export.png");
        match export_composite(&checker(), &path) {
            Err(EditorError::ExportFailure { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected export failure, got {other:?}"),
        }
    }
}
