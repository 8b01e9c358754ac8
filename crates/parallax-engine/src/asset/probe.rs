use std::io;
use std::path::Path;

use image::ImageReader;

use super::AssetError;

/// What a successful probe learned about an asset.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct AssetInfo {
    pub width: u32,
    pub height: u32,
}

/// Checks whether an asset can be used, without keeping its contents.
pub trait AssetProbe {
    fn probe(&self, path: &Path) -> Result<AssetInfo, AssetError>;
}

/// Probes image files by reading just enough of the header to get dimensions.
#[derive(Debug, Default, Copy, Clone)]
pub struct ImageFileProbe;

impl AssetProbe for ImageFileProbe {
    fn probe(&self, path: &Path) -> Result<AssetInfo, AssetError> {
        let io_err = |e: io::Error| match e.kind() {
            io::ErrorKind::NotFound => AssetError::NotFound(path.to_path_buf()),
            _ => AssetError::Decode {
                path: path.to_path_buf(),
                message: e.to_string(),
            },
        };

        let reader = ImageReader::open(path)
            .map_err(io_err)?
            .with_guessed_format()
            .map_err(io_err)?;

        let (width, height) = reader.into_dimensions().map_err(|e| AssetError::Decode {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        if width == 0 || height == 0 {
            return Err(AssetError::Decode {
                path: path.to_path_buf(),
                message: "image has no pixels".into(),
            });
        }

        Ok(AssetInfo { width, height })
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn scratch(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("parallax-probe-{}-{name}", std::process::id()))
    }

    #[test]
    fn missing_file_is_not_found() {
        let path = scratch("missing.png");
        let err = ImageFileProbe.probe(&path).unwrap_err();
        assert!(matches!(err, AssetError::NotFound(p) if p == path));
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let path = scratch("garbage.png");
        std::fs::write(&path, b"definitely not an image").unwrap();
        let err = ImageFileProbe.probe(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(matches!(err, AssetError::Decode { .. }));
    }

    #[test]
    fn png_dimensions_are_reported() {
        let path = scratch("tiny.png");
        image::RgbaImage::new(3, 2).save(&path).unwrap();
        let info = ImageFileProbe.probe(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(info, AssetInfo { width: 3, height: 2 });
    }
}
