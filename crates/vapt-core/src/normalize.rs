//! Row normalization
//!
//! Turns one raw row into the ordered (label, value) pairs the builder
//! renders, in current field order, with a sentinel for blank cells.

use crate::fields::{FieldRoles, FieldSet};
use crate::workbook::Row;
use serde_json::Value;

/// Sentinel rendered for missing or blank cells.
pub const MISSING_VALUE: &str = "N/A";

/// Character limit for values shown in a preview. The report path never
/// truncates.
pub const PREVIEW_LIMIT: usize = 200;

/// Special purpose a normalized field may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRole {
    Name,
    Severity,
    Status,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedField {
    pub label: String,
    pub value: String,
    pub role: Option<FieldRole>,
}

/// Raw stringification of a cell; no locale reformatting.
pub fn display_value(cell: Option<&Value>) -> String {
    match cell {
        None | Some(Value::Null) => MISSING_VALUE.to_string(),
        Some(Value::String(s)) if s.is_empty() => MISSING_VALUE.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(other) => other.to_string(),
    }
}

/// Whether a cell holds a usable (non-blank) value.
pub fn has_value(cell: Option<&Value>) -> bool {
    match cell {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(_) => true,
    }
}

/// Normalize one row against the included fields in their current order.
/// Output length always equals the included-field count.
pub fn normalize_row(row: &Row, fields: &FieldSet, roles: &FieldRoles) -> Vec<NormalizedField> {
    fields
        .included()
        .iter()
        .map(|field| {
            let role = if roles.name_field.as_deref() == Some(field.name.as_str()) {
                Some(FieldRole::Name)
            } else if roles.severity_field.as_deref() == Some(field.name.as_str()) {
                Some(FieldRole::Severity)
            } else if roles.status_field.as_deref() == Some(field.name.as_str()) {
                Some(FieldRole::Status)
            } else {
                None
            };

            NormalizedField {
                label: field.name.clone(),
                value: display_value(row.get(&field.name)),
                role,
            }
        })
        .collect()
}

/// Preview rendering of a value: truncated with a marker past
/// [`PREVIEW_LIMIT`] characters.
pub fn preview_value(value: &str) -> String {
    if value.chars().count() <= PREVIEW_LIMIT {
        return value.to_string();
    }
    let truncated: String = value.chars().take(PREVIEW_LIMIT).collect();
    format!("{truncated}... [truncated]")
}
