//! Field selection lifecycle and role classification
//!
//! One [`FieldSelection`] is created per header column at import time. The
//! user reorders, removes and toggles selections; `id` and `name` stay
//! immutable. Position in the [`FieldSet`] is the field order everywhere
//! downstream.

use serde::{Deserialize, Serialize};

/// A spreadsheet column flagged to appear in the generated report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSelection {
    pub id: String,
    pub name: String,
    pub include: bool,
}

/// The ordered working set of field selections for one import session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldSet {
    fields: Vec<FieldSelection>,
}

impl FieldSet {
    /// Create one selection per header, all included, ids `field-0`, `field-1`, …
    pub fn from_headers(headers: &[String]) -> Self {
        let fields = headers
            .iter()
            .enumerate()
            .map(|(i, name)| FieldSelection {
                id: format!("field-{i}"),
                name: name.clone(),
                include: true,
            })
            .collect();
        Self { fields }
    }

    pub fn from_fields(fields: Vec<FieldSelection>) -> Self {
        Self { fields }
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldSelection> {
        self.fields.iter()
    }

    /// Included fields in current order.
    pub fn included(&self) -> Vec<&FieldSelection> {
        self.fields.iter().filter(|f| f.include).collect()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.id == id)
    }

    /// Swap the field one position toward the front. Returns false if the
    /// id is unknown or already first.
    pub fn move_up(&mut self, id: &str) -> bool {
        match self.position(id) {
            Some(i) if i > 0 => {
                self.fields.swap(i - 1, i);
                true
            }
            _ => false,
        }
    }

    pub fn move_down(&mut self, id: &str) -> bool {
        match self.position(id) {
            Some(i) if i + 1 < self.fields.len() => {
                self.fields.swap(i, i + 1);
                true
            }
            _ => false,
        }
    }

    /// Drag-and-drop style move from one position to another.
    pub fn reorder(&mut self, from: usize, to: usize) -> bool {
        if from >= self.fields.len() || to >= self.fields.len() {
            return false;
        }
        let field = self.fields.remove(from);
        self.fields.insert(to, field);
        true
    }

    pub fn remove(&mut self, id: &str) -> bool {
        match self.position(id) {
            Some(i) => {
                self.fields.remove(i);
                true
            }
            None => false,
        }
    }

    pub fn toggle(&mut self, id: &str) -> bool {
        match self.position(id) {
            Some(i) => {
                self.fields[i].include = !self.fields[i].include;
                true
            }
            None => false,
        }
    }
}

/// The special-purpose columns detected among the included fields.
///
/// Detection is a case-insensitive substring heuristic over column names;
/// the first match in current order wins per role, and any role may be
/// absent. Centralized here so preview and final generation can never
/// disagree on which column is which.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldRoles {
    pub name_field: Option<String>,
    pub severity_field: Option<String>,
    pub status_field: Option<String>,
}

impl FieldRoles {
    pub fn classify(fields: &FieldSet) -> Self {
        let mut roles = FieldRoles::default();
        for field in fields.included() {
            let lower = field.name.to_lowercase();
            if roles.name_field.is_none()
                && lower.contains("vulnerability")
                && lower.contains("name")
            {
                roles.name_field = Some(field.name.clone());
            }
            if roles.severity_field.is_none() && lower.contains("severity") {
                roles.severity_field = Some(field.name.clone());
            }
            if roles.status_field.is_none() && lower.contains("status") {
                roles.status_field = Some(field.name.clone());
            }
        }
        roles
    }

    /// Whether this column is already rendered by a role-specific block.
    pub fn covers(&self, name: &str) -> bool {
        self.name_field.as_deref() == Some(name)
            || self.severity_field.as_deref() == Some(name)
            || self.status_field.as_deref() == Some(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(names: &[&str]) -> FieldSet {
        FieldSet::from_headers(&names.iter().map(|s| s.to_string()).collect::<Vec<_>>())
    }

    #[test]
    fn test_from_headers_all_included() {
        let fields = set(&["Vulnerability Name", "Severity"]);
        assert_eq!(fields.len(), 2);
        assert_eq!(fields.included().len(), 2);
        assert_eq!(fields.iter().next().map(|f| f.id.as_str()), Some("field-0"));
    }

    #[test]
    fn test_classify_all_roles() {
        let roles = FieldRoles::classify(&set(&["Vulnerability Name", "Severity", "Status"]));
        assert_eq!(roles.name_field.as_deref(), Some("Vulnerability Name"));
        assert_eq!(roles.severity_field.as_deref(), Some("Severity"));
        assert_eq!(roles.status_field.as_deref(), Some("Status"));
    }

    #[test]
    fn test_classify_is_case_insensitive() {
        let roles = FieldRoles::classify(&set(&["VULNERABILITY name", "SEVERITY level"]));
        assert_eq!(roles.name_field.as_deref(), Some("VULNERABILITY name"));
        assert_eq!(roles.severity_field.as_deref(), Some("SEVERITY level"));
    }

    #[test]
    fn test_classify_first_match_wins() {
        let roles = FieldRoles::classify(&set(&["Severity", "Severity Rating"]));
        assert_eq!(roles.severity_field.as_deref(), Some("Severity"));
    }

    #[test]
    fn test_classify_order_follows_reorder() {
        let mut fields = set(&["Severity", "Severity Rating"]);
        assert!(fields.reorder(1, 0));
        let roles = FieldRoles::classify(&fields);
        assert_eq!(roles.severity_field.as_deref(), Some("Severity Rating"));
    }

    #[test]
    fn test_classify_ignores_excluded_fields() {
        let mut fields = set(&["Vulnerability Name", "Severity"]);
        assert!(fields.toggle("field-0"));
        let roles = FieldRoles::classify(&fields);
        assert_eq!(roles.name_field, None);
        assert_eq!(roles.severity_field.as_deref(), Some("Severity"));
    }

    #[test]
    fn test_classify_absent_roles_are_none() {
        let roles = FieldRoles::classify(&set(&["Description", "Recommendation"]));
        assert_eq!(roles, FieldRoles::default());
    }

    #[test]
    fn test_name_requires_both_substrings() {
        let roles = FieldRoles::classify(&set(&["Name", "Vulnerability"]));
        assert_eq!(roles.name_field, None);
    }

    #[test]
    fn test_move_up_down_bounds() {
        let mut fields = set(&["A", "B", "C"]);
        assert!(!fields.move_up("field-0"));
        assert!(fields.move_up("field-1"));
        assert_eq!(
            fields.iter().map(|f| f.name.as_str()).collect::<Vec<_>>(),
            vec!["B", "A", "C"]
        );
        assert!(!fields.move_down("field-2"));
        assert!(!fields.move_up("missing"));
    }

    #[test]
    fn test_remove_and_toggle() {
        let mut fields = set(&["A", "B"]);
        assert!(fields.toggle("field-1"));
        assert_eq!(fields.included().len(), 1);
        assert!(fields.remove("field-0"));
        assert_eq!(fields.len(), 1);
        assert!(!fields.remove("field-0"));
    }
}
