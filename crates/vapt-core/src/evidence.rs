//! Proof-of-concept evidence images
//!
//! Images arrive through two capture channels, file attachment and
//! clipboard paste, and are normalized into [`EvidenceImage`] before
//! reaching the builder. Association with a vulnerability is an exact,
//! case-sensitive match on the classified name column's value — a known
//! fragility kept for compatibility with existing workbooks: a renamed
//! vulnerability silently orphans its images.

use chrono::Utc;
use std::path::PathBuf;
use vapt_docx::ImageFormat;

/// Where the image bytes live until the builder needs them.
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// Already captured, e.g. a clipboard paste.
    Bytes(Vec<u8>),
    /// Read lazily at build time.
    File(PathBuf),
}

/// One attached proof-of-concept image.
#[derive(Debug, Clone)]
pub struct EvidenceImage {
    /// Derived from capture timestamp and source name.
    pub id: String,
    pub vulnerability_name: String,
    pub source: ImageSource,
}

impl EvidenceImage {
    /// File-attachment channel.
    pub fn from_path(vulnerability_name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let stem = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "attachment".to_string());
        Self {
            id: capture_id(&stem),
            vulnerability_name: vulnerability_name.into(),
            source: ImageSource::File(path),
        }
    }

    /// Clipboard-paste channel: bytes are already in hand.
    pub fn from_bytes(
        vulnerability_name: impl Into<String>,
        label: &str,
        data: Vec<u8>,
    ) -> Self {
        Self {
            id: capture_id(label),
            vulnerability_name: vulnerability_name.into(),
            source: ImageSource::Bytes(data),
        }
    }

    /// Fetch and sniff the image bytes. Failures here are item-level: the
    /// builder substitutes an inline error block and continues.
    pub async fn load(&self) -> Result<(Vec<u8>, ImageFormat), String> {
        let data = match &self.source {
            ImageSource::Bytes(data) => data.clone(),
            ImageSource::File(path) => tokio::fs::read(path)
                .await
                .map_err(|e| format!("failed to read {}: {e}", path.display()))?,
        };

        let format = ImageFormat::detect(&data)
            .ok_or_else(|| format!("unrecognized image format for {}", self.id))?;
        Ok((data, format))
    }
}

fn capture_id(label: &str) -> String {
    format!("{}-{}", Utc::now().timestamp_millis(), label)
}

/// The images attached to one vulnerability, by exact name match, in
/// attachment order. Stable across repeated calls.
pub fn images_for<'a>(
    vulnerability_name: &str,
    images: &'a [EvidenceImage],
) -> Vec<&'a EvidenceImage> {
    images
        .iter()
        .filter(|img| img.vulnerability_name == vulnerability_name)
        .collect()
}
