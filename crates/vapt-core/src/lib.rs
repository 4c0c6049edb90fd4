//! VAPT Report Generator Core Engine
//!
//! This crate turns parsed workbook data (vulnerabilities plus optional
//! observation and scope sheets), a user-ordered field selection, attached
//! proof-of-concept images and a report configuration into a formatted
//! `.docx` assessment report, and records each generated report in a
//! history store.

pub mod builder;
pub mod colors;
pub mod evidence;
pub mod fields;
pub mod history;
pub mod normalize;
pub mod templates;
pub mod workbook;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

pub use evidence::EvidenceImage;
pub use fields::{FieldRoles, FieldSelection, FieldSet};
pub use history::{HistoryStore, JsonFileHistory, MemoryHistory, ReportHistoryRecord};
pub use vapt_docx::{ContentBlock, DocumentStyle};
pub use workbook::{ReportData, Workbook};

#[derive(Error, Debug)]
pub enum CoreError {
    /// User-fixable precondition failure; generation never starts.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Template fetch failure, surfaced with the resolved path.
    #[error("template resource unavailable at {path}: {reason}")]
    Resource { path: String, reason: String },

    #[error("document serialization failed: {0}")]
    Serialize(String),

    #[error("history store error: {0}")]
    History(String),

    #[error("workbook error: {0}")]
    Workbook(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type CoreResult<T> = Result<T, CoreError>;

/// Category of security engagement; governs template selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssessmentType {
    #[serde(rename = "API")]
    Api,
    #[serde(rename = "Web Blackbox")]
    WebBlackbox,
    #[serde(rename = "Web Grey Box")]
    WebGreyBox,
    #[serde(rename = "Network")]
    Network,
    #[serde(rename = "Network Architecture")]
    NetworkArchitecture,
    #[serde(rename = "Config Review")]
    ConfigReview,
    #[serde(rename = "CSPM")]
    Cspm,
    #[serde(rename = "Source Code")]
    SourceCode,
}

impl AssessmentType {
    pub fn all() -> [AssessmentType; 8] {
        [
            AssessmentType::Api,
            AssessmentType::WebBlackbox,
            AssessmentType::WebGreyBox,
            AssessmentType::Network,
            AssessmentType::NetworkArchitecture,
            AssessmentType::ConfigReview,
            AssessmentType::Cspm,
            AssessmentType::SourceCode,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            AssessmentType::Api => "API",
            AssessmentType::WebBlackbox => "Web Blackbox",
            AssessmentType::WebGreyBox => "Web Grey Box",
            AssessmentType::Network => "Network",
            AssessmentType::NetworkArchitecture => "Network Architecture",
            AssessmentType::ConfigReview => "Config Review",
            AssessmentType::Cspm => "CSPM",
            AssessmentType::SourceCode => "Source Code",
        }
    }

    /// Directory slug used by the template catalog.
    pub fn slug(&self) -> &'static str {
        match self {
            AssessmentType::Api => "api",
            AssessmentType::WebBlackbox => "web_blackbox",
            AssessmentType::WebGreyBox => "web_greybox",
            AssessmentType::Network => "network",
            AssessmentType::NetworkArchitecture => "network_architecture",
            AssessmentType::ConfigReview => "config_review",
            AssessmentType::Cspm => "cspm",
            AssessmentType::SourceCode => "source_code",
        }
    }

    /// Parse a user-supplied name; accepts labels, slugs and common aliases.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace(['-', '_'], " ").as_str() {
            "api" => Some(AssessmentType::Api),
            "web blackbox" | "web black box" => Some(AssessmentType::WebBlackbox),
            "web greybox" | "web grey box" => Some(AssessmentType::WebGreyBox),
            "network" => Some(AssessmentType::Network),
            "network architecture" => Some(AssessmentType::NetworkArchitecture),
            "config review" => Some(AssessmentType::ConfigReview),
            "cspm" => Some(AssessmentType::Cspm),
            "source code" => Some(AssessmentType::SourceCode),
            _ => None,
        }
    }
}

impl std::fmt::Display for AssessmentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Which compliance standard's wording and template variant is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportType {
    #[serde(rename = "GT")]
    Gt,
    #[serde(rename = "CERT-In")]
    CertIn,
}

impl ReportType {
    pub fn label(&self) -> &'static str {
        match self {
            ReportType::Gt => "GT",
            ReportType::CertIn => "CERT-In",
        }
    }

    /// Directory name used by the template catalog.
    pub fn folder(&self) -> &'static str {
        match self {
            ReportType::Gt => "gt",
            ReportType::CertIn => "certin",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "gt" => Some(ReportType::Gt),
            "cert-in" | "certin" => Some(ReportType::CertIn),
            _ => None,
        }
    }
}

impl std::fmt::Display for ReportType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Immutable input to one report-generation invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    pub assessment_type: AssessmentType,
    pub company_name: String,
    pub report_type: ReportType,
}

impl ReportConfig {
    /// Output file name: `{company}_{assessment}_{reportType}_Report_{date}.docx`
    /// with non-alphanumeric characters in each component replaced by `_`.
    pub fn file_name(&self, date: chrono::NaiveDate) -> String {
        format!(
            "{}_{}_{}_Report_{}.docx",
            sanitize_component(&self.company_name),
            sanitize_component(self.assessment_type.label()),
            sanitize_component(self.report_type.label()),
            date.format("%Y-%m-%d"),
        )
    }
}

fn sanitize_component(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// A successfully generated report artifact.
#[derive(Debug, Clone)]
pub struct GeneratedReport {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub record: ReportHistoryRecord,
}

/// Main generation interface: validates, builds the block tree, serializes
/// it and appends a history record.
pub struct ReportGenerator {
    template_root: PathBuf,
    style: DocumentStyle,
    history: Box<dyn HistoryStore>,
}

impl ReportGenerator {
    pub fn new(template_root: impl Into<PathBuf>, history: Box<dyn HistoryStore>) -> Self {
        Self {
            template_root: template_root.into(),
            style: DocumentStyle::default(),
            history,
        }
    }

    pub fn with_style(mut self, style: DocumentStyle) -> Self {
        self.style = style;
        self
    }

    /// Run one generation. Validation and template failures abort the whole
    /// call; per-image failures are rendered inline by the builder; a history
    /// append failure is logged and does not fail the generation.
    pub async fn generate(
        &self,
        data: &ReportData,
        fields: &FieldSet,
        images: &[EvidenceImage],
        config: &ReportConfig,
    ) -> CoreResult<GeneratedReport> {
        builder::validate(data, fields, config)?;

        // A missing or empty template means a broken install; fail before
        // any block is built.
        let template = templates::load(&self.template_root, config)?;
        info!(
            "template loaded: {} ({} bytes)",
            templates::resolve(config).display(),
            template.len()
        );

        let blocks = builder::build(data, fields, images, config).await;
        let bytes = vapt_docx::write_document(&blocks, &self.style)
            .map_err(|e| CoreError::Serialize(e.to_string()))?;

        let today = Utc::now().date_naive();
        let file_name = config.file_name(today);
        let record = ReportHistoryRecord {
            id: Uuid::new_v4().to_string(),
            name: file_name.clone(),
            date: today.format("%Y-%m-%d").to_string(),
            report_type: config.report_type,
            company_name: config.company_name.clone(),
            assessment_type: config.assessment_type,
            file_path: format!("report_history/{file_name}"),
            size_bytes: bytes.len() as u64,
        };

        if let Err(e) = self.history.append(record.clone()) {
            warn!("failed to record report in history: {e}");
        }

        info!("report generated: {} ({} bytes)", file_name, bytes.len());

        Ok(GeneratedReport {
            file_name,
            bytes,
            record,
        })
    }

    pub fn history(&self) -> &dyn HistoryStore {
        self.history.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assessment_type_parse_aliases() {
        assert_eq!(
            AssessmentType::parse("web_blackbox"),
            Some(AssessmentType::WebBlackbox)
        );
        assert_eq!(
            AssessmentType::parse("Web Blackbox"),
            Some(AssessmentType::WebBlackbox)
        );
        assert_eq!(AssessmentType::parse("CSPM"), Some(AssessmentType::Cspm));
        assert_eq!(AssessmentType::parse("unknown"), None);
    }

    #[test]
    fn test_report_type_parse() {
        assert_eq!(ReportType::parse("gt"), Some(ReportType::Gt));
        assert_eq!(ReportType::parse("CERT-In"), Some(ReportType::CertIn));
        assert_eq!(ReportType::parse("certin"), Some(ReportType::CertIn));
        assert_eq!(ReportType::parse("pdf"), None);
    }

    #[test]
    fn test_file_name_sanitizes_components() {
        let config = ReportConfig {
            assessment_type: AssessmentType::WebBlackbox,
            company_name: "Acme Corp. (EU)".to_string(),
            report_type: ReportType::CertIn,
        };
        let date = chrono::NaiveDate::from_ymd_opt(2026, 8, 29).expect("valid date");
        let name = config.file_name(date);
        assert_eq!(
            name,
            "Acme_Corp___EU__Web_Blackbox_CERT_In_Report_2026-08-29.docx"
        );
        assert!(name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.' || c == '-'));
    }

    fn sample_inputs() -> (ReportData, FieldSet) {
        let workbook = Workbook::from_json(
            r#"[{"name": "Vulnerabilities", "rows": [
                {"Vulnerability Name": "XSS", "Severity": "High", "Status": "Open"}
            ]}]"#,
        )
        .expect("parses");
        let data = workbook.into_report_data();
        let fields = FieldSet::from_headers(&data.headers());
        (data, fields)
    }

    fn sample_config() -> ReportConfig {
        ReportConfig {
            assessment_type: AssessmentType::WebBlackbox,
            company_name: "Acme".to_string(),
            report_type: ReportType::Gt,
        }
    }

    fn template_root() -> tempfile::TempDir {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("gt/web_blackbox");
        std::fs::create_dir_all(&path).expect("mkdir");
        std::fs::write(path.join("template.docx"), b"PK\x03\x04stub").expect("write");
        dir
    }

    #[tokio::test]
    async fn test_generate_appends_matching_history_record() {
        let root = template_root();
        let generator = ReportGenerator::new(root.path(), Box::new(MemoryHistory::new()));
        let (data, fields) = sample_inputs();
        let config = sample_config();

        let report = generator
            .generate(&data, &fields, &[], &config)
            .await
            .expect("generates");
        assert!(report.bytes.starts_with(b"PK"));
        assert!(report.file_name.ends_with(".docx"));

        let records = generator.history().list();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0], report.record);
        assert_eq!(records[0].company_name, "Acme");
        assert_eq!(records[0].assessment_type, AssessmentType::WebBlackbox);
        assert_eq!(records[0].report_type, ReportType::Gt);
        assert_eq!(records[0].size_bytes, report.bytes.len() as u64);
    }

    struct RefusingHistory;

    impl HistoryStore for RefusingHistory {
        fn append(&self, _record: ReportHistoryRecord) -> CoreResult<()> {
            Err(CoreError::History("store offline".to_string()))
        }

        fn list(&self) -> Vec<ReportHistoryRecord> {
            Vec::new()
        }

        fn delete_by_id(&self, _id: &str) -> CoreResult<Vec<ReportHistoryRecord>> {
            Err(CoreError::History("store offline".to_string()))
        }
    }

    #[tokio::test]
    async fn test_generate_survives_history_failure() {
        let root = template_root();
        let generator = ReportGenerator::new(root.path(), Box::new(RefusingHistory));
        let (data, fields) = sample_inputs();

        let report = generator
            .generate(&data, &fields, &[], &sample_config())
            .await
            .expect("generates despite history failure");
        assert!(!report.bytes.is_empty());
        assert!(generator.history().list().is_empty());
    }

    #[test]
    fn test_all_assessment_types_have_distinct_slugs() {
        let slugs: Vec<_> = AssessmentType::all().iter().map(|a| a.slug()).collect();
        let mut deduped = slugs.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(slugs.len(), deduped.len());
    }
}
