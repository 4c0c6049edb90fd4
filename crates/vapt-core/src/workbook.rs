//! Parsed-workbook import boundary
//!
//! Spreadsheet parsing itself happens outside this crate; what arrives here
//! is the parser's output, a workbook of named sheets whose rows are
//! key→value maps. The first sheet's rows become the vulnerabilities; a
//! sheet literally named "Observations" becomes the observations and one
//! named "Scope" the scope. A missing optional sheet yields an empty
//! collection, not an error. Row key order is preserved, so the first row's
//! keys define the header order.

use crate::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One parsed row: column name → cell value (string, number or blank).
pub type Row = serde_json::Map<String, serde_json::Value>;

pub const OBSERVATIONS_SHEET: &str = "Observations";
pub const SCOPE_SHEET: &str = "Scope";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Row>,
}

/// An ordered collection of parsed sheets.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn from_json(json: &str) -> CoreResult<Self> {
        serde_json::from_str(json).map_err(|e| CoreError::Workbook(e.to_string()))
    }

    pub fn load(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    /// Split the workbook into the three collections the builder consumes.
    pub fn into_report_data(self) -> ReportData {
        let observations = self
            .sheet(OBSERVATIONS_SHEET)
            .map(|s| s.rows.clone())
            .unwrap_or_default();
        let scope = self
            .sheet(SCOPE_SHEET)
            .map(|s| s.rows.clone())
            .unwrap_or_default();
        let vulnerabilities = self
            .sheets
            .into_iter()
            .next()
            .map(|s| s.rows)
            .unwrap_or_default();

        ReportData {
            vulnerabilities,
            observations,
            scope,
        }
    }
}

/// The three input collections for one generation, read-only after import.
#[derive(Debug, Clone, Default)]
pub struct ReportData {
    pub vulnerabilities: Vec<Row>,
    pub observations: Vec<Row>,
    pub scope: Vec<Row>,
}

impl ReportData {
    /// Header names in first-row key order; the source for field selections.
    pub fn headers(&self) -> Vec<String> {
        self.vulnerabilities
            .first()
            .map(|row| row.keys().cloned().collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn workbook_json() -> &'static str {
        r#"[
            {"name": "Vulnerabilities", "rows": [
                {"Vulnerability Name": "XSS", "Severity": "High", "CVSS Score": 8.2}
            ]},
            {"name": "Observations", "rows": [
                {"Observation": "Weak Password Policy", "Impact": "Medium"}
            ]},
            {"name": "Scope", "rows": [
                {"Asset Type": "Web Application", "IP/URL": "https://example.com"}
            ]}
        ]"#
    }

    #[test]
    fn test_first_sheet_becomes_vulnerabilities() {
        let data = Workbook::from_json(workbook_json())
            .expect("parses")
            .into_report_data();
        assert_eq!(data.vulnerabilities.len(), 1);
        assert_eq!(data.observations.len(), 1);
        assert_eq!(data.scope.len(), 1);
    }

    #[test]
    fn test_missing_optional_sheets_are_empty() {
        let json = r#"[{"name": "Findings", "rows": [{"Vulnerability Name": "XSS"}]}]"#;
        let data = Workbook::from_json(json).expect("parses").into_report_data();
        assert_eq!(data.vulnerabilities.len(), 1);
        assert!(data.observations.is_empty());
        assert!(data.scope.is_empty());
    }

    #[test]
    fn test_headers_preserve_key_order() {
        let data = Workbook::from_json(workbook_json())
            .expect("parses")
            .into_report_data();
        assert_eq!(
            data.headers(),
            vec!["Vulnerability Name", "Severity", "CVSS Score"]
        );
    }

    #[test]
    fn test_empty_workbook_has_no_data() {
        let data = Workbook::from_json("[]").expect("parses").into_report_data();
        assert!(data.vulnerabilities.is_empty());
        assert!(data.headers().is_empty());
    }

    #[test]
    fn test_malformed_json_is_a_workbook_error() {
        let err = Workbook::from_json("{not json").expect_err("must fail");
        assert!(matches!(err, CoreError::Workbook(_)));
    }
}
