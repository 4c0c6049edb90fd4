//! Template catalog and lookup
//!
//! Templates live under a root directory in a fixed
//! `{report folder}/{assessment slug}/template.docx` layout. The template is
//! resolved and read before any document content is built, so a missing or
//! empty file fails the generation up front.

use crate::{AssessmentType, CoreError, CoreResult, ReportConfig, ReportType};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const TEMPLATE_FILE: &str = "template.docx";

/// Relative path of the template matching a configuration.
pub fn resolve(config: &ReportConfig) -> PathBuf {
    PathBuf::from(config.report_type.folder())
        .join(config.assessment_type.slug())
        .join(TEMPLATE_FILE)
}

/// Slug for a free-form assessment label. Unrecognized labels fall back to
/// the web blackbox template rather than failing.
pub fn slug_for_label(label: &str) -> &'static str {
    AssessmentType::parse(label)
        .map(|a| a.slug())
        .unwrap_or_else(|| AssessmentType::WebBlackbox.slug())
}

/// Every catalog entry, as `(report folder, assessment slug, relative path)`.
pub fn entries() -> Vec<(ReportType, AssessmentType, PathBuf)> {
    let mut out = Vec::new();
    for report_type in [ReportType::Gt, ReportType::CertIn] {
        for assessment in AssessmentType::all() {
            let path = PathBuf::from(report_type.folder())
                .join(assessment.slug())
                .join(TEMPLATE_FILE);
            out.push((report_type, assessment, path));
        }
    }
    out
}

/// Read the template bytes for a configuration from `root`.
pub fn load(root: &Path, config: &ReportConfig) -> CoreResult<Vec<u8>> {
    let path = root.join(resolve(config));
    debug!("loading template from {}", path.display());

    if !path.is_file() {
        return Err(CoreError::Resource {
            path: path.display().to_string(),
            reason: "not found".to_string(),
        });
    }

    let bytes = fs::read(&path)?;
    if bytes.is_empty() {
        return Err(CoreError::Resource {
            path: path.display().to_string(),
            reason: "template file is empty".to_string(),
        });
    }

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(report_type: ReportType, assessment: AssessmentType) -> ReportConfig {
        ReportConfig {
            assessment_type: assessment,
            company_name: "Acme".to_string(),
            report_type,
        }
    }

    #[test]
    fn test_resolve_layout() {
        let path = resolve(&config(ReportType::CertIn, AssessmentType::NetworkArchitecture));
        assert_eq!(
            path,
            PathBuf::from("certin/network_architecture/template.docx")
        );
    }

    #[test]
    fn test_slug_fallback() {
        assert_eq!(slug_for_label("network-architecture"), "network_architecture");
        assert_eq!(slug_for_label("Something Unknown"), "web_blackbox");
    }

    #[test]
    fn test_catalog_covers_both_report_types() {
        let all = entries();
        assert_eq!(all.len(), 16);
        assert!(all
            .iter()
            .any(|(r, a, _)| *r == ReportType::Gt && *a == AssessmentType::Api));
        assert!(all
            .iter()
            .any(|(r, a, _)| *r == ReportType::CertIn && *a == AssessmentType::Cspm));
    }

    #[test]
    fn test_load_missing_template() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = load(dir.path(), &config(ReportType::Gt, AssessmentType::WebBlackbox))
            .expect_err("must fail");
        assert!(matches!(err, CoreError::Resource { .. }));
    }

    #[test]
    fn test_load_empty_template() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("gt/web_blackbox");
        std::fs::create_dir_all(&path).expect("mkdir");
        std::fs::write(path.join(TEMPLATE_FILE), b"").expect("write");

        let err = load(dir.path(), &config(ReportType::Gt, AssessmentType::WebBlackbox))
            .expect_err("must fail");
        match err {
            CoreError::Resource { reason, .. } => assert_eq!(reason, "template file is empty"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_reads_bytes() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("certin/api");
        std::fs::create_dir_all(&path).expect("mkdir");
        std::fs::write(path.join(TEMPLATE_FILE), b"PK\x03\x04stub").expect("write");

        let bytes = load(dir.path(), &config(ReportType::CertIn, AssessmentType::Api))
            .expect("loads");
        assert_eq!(&bytes[..2], b"PK");
    }
}
