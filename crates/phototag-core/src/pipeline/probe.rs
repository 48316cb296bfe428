//! Header-level image probing: format and pixel dimensions without a full decode.

use image::{ImageFormat, ImageReader};
use std::path::Path;

use crate::error::InspectError;

/// Format and dimensions read from an image header.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageInfo {
    /// Detected image format
    pub format: ImageFormat,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
}

/// Reads image headers.
pub struct ImageProbe;

impl ImageProbe {
    /// Probe an image file.
    ///
    /// The format is sniffed from content first and falls back to the file
    /// extension, so a PNG saved as `.jpg` is still reported as PNG.
    pub fn probe(path: &Path) -> Result<ImageInfo, InspectError> {
        let reader = ImageReader::open(path)
            .map_err(|e| InspectError::FileNotReadable {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?
            .with_guessed_format()
            .map_err(|e| InspectError::FileNotReadable {
                path: path.to_path_buf(),
                message: format!("Cannot detect image format: {e}"),
            })?;

        let format = reader
            .format()
            .ok_or_else(|| InspectError::UnsupportedFormat {
                path: path.to_path_buf(),
                format: path
                    .extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or("unknown")
                    .to_string(),
            })?;

        let (width, height) =
            reader
                .into_dimensions()
                .map_err(|e| InspectError::FileNotReadable {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;

        Ok(ImageInfo {
            format,
            width,
            height,
        })
    }

    /// Detect the format of an in-memory image from its magic bytes.
    pub fn sniff_format(bytes: &[u8]) -> Option<ImageFormat> {
        image::guess_format(bytes).ok()
    }
}

/// Convert an ImageFormat to a string representation.
pub fn format_to_string(format: ImageFormat) -> String {
    match format {
        ImageFormat::Jpeg => "jpeg".to_string(),
        ImageFormat::Png => "png".to_string(),
        ImageFormat::WebP => "webp".to_string(),
        ImageFormat::Gif => "gif".to_string(),
        ImageFormat::Tiff => "tiff".to_string(),
        ImageFormat::Bmp => "bmp".to_string(),
        ImageFormat::Ico => "ico".to_string(),
        ImageFormat::Pnm => "pnm".to_string(),
        ImageFormat::Avif => "avif".to_string(),
        _ => "unknown".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_to_string() {
        assert_eq!(format_to_string(ImageFormat::Jpeg), "jpeg");
        assert_eq!(format_to_string(ImageFormat::Png), "png");
        assert_eq!(format_to_string(ImageFormat::WebP), "webp");
    }

    #[test]
    fn test_probe_reads_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wide.png");
        image::RgbImage::new(64, 48).save(&path).unwrap();

        let info = ImageProbe::probe(&path).unwrap();
        assert_eq!(info.format, ImageFormat::Png);
        assert_eq!((info.width, info.height), (64, 48));
    }

    #[test]
    fn test_format_detected_by_content() {
        let dir = tempfile::tempdir().unwrap();
        let png = dir.path().join("real.png");
        image::RgbImage::new(8, 8).save(&png).unwrap();
        let misnamed = dir.path().join("misnamed.jpg");
        std::fs::copy(&png, &misnamed).unwrap();

        let info = ImageProbe::probe(&misnamed).unwrap();
        assert_eq!(info.format, ImageFormat::Png);
    }

    #[test]
    fn test_probe_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corrupt.jpg");
        std::fs::write(&path, b"definitely not a jpeg").unwrap();

        assert!(ImageProbe::probe(&path).is_err());
    }

    #[test]
    fn test_probe_unknown_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.heic");
        std::fs::write(&path, b"\0\0\0\x18ftypheic").unwrap();

        let err = ImageProbe::probe(&path).unwrap_err();
        assert!(matches!(err, InspectError::UnsupportedFormat { .. }));
    }

    #[test]
    fn test_probe_missing_file() {
        let err = ImageProbe::probe(Path::new("/nonexistent/photo.jpg")).unwrap_err();
        assert!(matches!(err, InspectError::FileNotReadable { .. }));
    }

    #[test]
    fn test_sniff_format() {
        assert_eq!(
            ImageProbe::sniff_format(&[0xFF, 0xD8, 0xFF, 0xE0]),
            Some(ImageFormat::Jpeg)
        );
        assert_eq!(ImageProbe::sniff_format(b"hello"), None);
    }
}
