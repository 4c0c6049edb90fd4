//! OOXML (`.docx`) document writer
//!
//! A `.docx` file is a zip package of WordprocessingML parts. This crate
//! turns an ordered sequence of [`ContentBlock`]s plus a [`DocumentStyle`]
//! into the packaged byte stream: `[Content_Types].xml`, the package
//! relationships, `word/document.xml`, `word/styles.xml` and one media part
//! per embedded image.

pub mod blocks;
mod package;
mod xml;

pub use blocks::{ContentBlock, HeadingLevel, TextRun};
pub use package::write_document;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocxError {
    #[error("zip packaging failed: {0}")]
    Zip(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type DocxResult<T> = Result<T, DocxError>;

/// Document-level defaults applied to every run without explicit overrides.
#[derive(Debug, Clone)]
pub struct DocumentStyle {
    pub font: String,
    /// Default run size in half-points (24 = 12pt).
    pub size_half_points: u32,
}

impl Default for DocumentStyle {
    fn default() -> Self {
        Self {
            font: "Times New Roman".to_string(),
            size_half_points: 24,
        }
    }
}

/// Raster formats accepted for embedded images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Webp,
}

impl ImageFormat {
    /// Detect the format from leading magic bytes.
    pub fn detect(data: &[u8]) -> Option<Self> {
        if data.starts_with(&[0x89, b'P', b'N', b'G']) {
            Some(ImageFormat::Png)
        } else if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(ImageFormat::Jpeg)
        } else if data.starts_with(b"GIF8") {
            Some(ImageFormat::Gif)
        } else if data.len() >= 12 && data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
            Some(ImageFormat::Webp)
        } else {
            None
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpeg",
            ImageFormat::Gif => "gif",
            ImageFormat::Webp => "webp",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Gif => "image/gif",
            ImageFormat::Webp => "image/webp",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_png() {
        let data = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
        assert_eq!(ImageFormat::detect(&data), Some(ImageFormat::Png));
    }

    #[test]
    fn test_detect_jpeg() {
        assert_eq!(
            ImageFormat::detect(&[0xFF, 0xD8, 0xFF, 0xE0]),
            Some(ImageFormat::Jpeg)
        );
    }

    #[test]
    fn test_detect_webp() {
        let mut data = b"RIFF".to_vec();
        data.extend_from_slice(&[0, 0, 0, 0]);
        data.extend_from_slice(b"WEBP");
        assert_eq!(ImageFormat::detect(&data), Some(ImageFormat::Webp));
    }

    #[test]
    fn test_detect_unknown() {
        assert_eq!(ImageFormat::detect(b"not an image"), None);
        assert_eq!(ImageFormat::detect(&[]), None);
    }
}
