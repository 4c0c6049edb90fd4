//! Report tree builder
//!
//! Walks the validated input collections in fixed order and emits the
//! ordered block sequence the serializer consumes. Vulnerabilities render
//! in original row order, fields in current selection order and images in
//! attachment order. The only suspension points are the per-image loads;
//! a failed image is replaced by an inline error paragraph and never aborts
//! the rest of the report.

use crate::colors::{severity_color, status_color};
use crate::evidence::{images_for, EvidenceImage};
use crate::fields::{FieldRoles, FieldSet};
use crate::normalize::{display_value, has_value, normalize_row, preview_value, FieldRole};
use crate::workbook::{ReportData, Row};
use crate::{CoreError, CoreResult, ReportConfig, ReportType};
use chrono::Utc;
use tracing::warn;
use vapt_docx::{ContentBlock, HeadingLevel, TextRun};

/// Fixed embed dimensions for evidence images; aspect distortion is
/// accepted rather than silently corrected.
pub const IMAGE_WIDTH_PX: u32 = 500;
pub const IMAGE_HEIGHT_PX: u32 = 300;

/// Guards entry to [`build`]. Any failure aborts the generation before a
/// single block exists; no partial artifact is ever produced.
pub fn validate(data: &ReportData, fields: &FieldSet, config: &ReportConfig) -> CoreResult<()> {
    if data.vulnerabilities.is_empty() {
        return Err(CoreError::Validation(
            "no vulnerability data found; the first sheet of the workbook is empty".to_string(),
        ));
    }
    if fields.is_empty() {
        return Err(CoreError::Validation(
            "no fields configured; the workbook has no column headers".to_string(),
        ));
    }
    if fields.included().is_empty() {
        return Err(CoreError::Validation(
            "no fields selected; include at least one field".to_string(),
        ));
    }
    if config.company_name.trim().is_empty() {
        return Err(CoreError::Validation("company name is required".to_string()));
    }
    Ok(())
}

/// Build the full report body. Inputs must already have passed [`validate`].
pub async fn build(
    data: &ReportData,
    fields: &FieldSet,
    images: &[EvidenceImage],
    config: &ReportConfig,
) -> Vec<ContentBlock> {
    let roles = FieldRoles::classify(fields);
    let mut blocks = Vec::new();

    push_title(&mut blocks, data, config);

    if !data.scope.is_empty() {
        push_heading1(&mut blocks, "Assessment Scope");
        push_numbered_rows(&mut blocks, &data.scope);
    }

    push_heading1(
        &mut blocks,
        &format!("Identified Vulnerabilities ({})", data.vulnerabilities.len()),
    );

    let last = data.vulnerabilities.len().saturating_sub(1);
    for (index, row) in data.vulnerabilities.iter().enumerate() {
        push_vulnerability(&mut blocks, index, row, fields, &roles, images).await;
        if index < last {
            blocks.push(ContentBlock::Separator);
        }
    }

    if !data.observations.is_empty() {
        push_heading1(&mut blocks, "Additional Observations");
        push_numbered_rows(&mut blocks, &data.observations);
    }

    push_recommendations(&mut blocks, config);
    push_footer(&mut blocks, config);

    blocks
}

fn push_title(blocks: &mut Vec<ContentBlock>, data: &ReportData, config: &ReportConfig) {
    blocks.push(ContentBlock::heading(
        HeadingLevel::Title,
        TextRun::new(config.company_name.clone()).bold().size(32),
    ));
    blocks.push(ContentBlock::heading(
        HeadingLevel::Heading1,
        TextRun::new(format!(
            "{} Security Assessment Report",
            config.assessment_type
        ))
        .bold()
        .size(28),
    ));
    blocks.push(ContentBlock::paragraph(vec![TextRun::new(format!(
        "Report Type: {}",
        config.report_type
    ))
    .size(24)]));
    blocks.push(ContentBlock::paragraph(vec![TextRun::new(format!(
        "Date: {}",
        Utc::now().format("%B %-d, %Y")
    ))
    .size(24)]));

    push_heading1(blocks, "Executive Summary");
    let standard = match config.report_type {
        ReportType::CertIn => "CERT-In guidelines and standards",
        ReportType::Gt => "industry best practices",
    };
    blocks.push(ContentBlock::paragraph(vec![TextRun::new(format!(
        "This {} security assessment report for {} has been prepared following {}. \
         The assessment identified {} vulnerabilities and provides comprehensive \
         recommendations for security improvements.",
        config.assessment_type.label().to_lowercase(),
        config.company_name,
        standard,
        data.vulnerabilities.len()
    ))
    .size(24)]));
}

fn push_heading1(blocks: &mut Vec<ContentBlock>, text: &str) {
    blocks.push(ContentBlock::heading(
        HeadingLevel::Heading1,
        TextRun::new(text).bold().size(28),
    ));
}

/// One paragraph per row, numbered from 1, all non-blank key:value pairs
/// joined by newlines. Used for both scope and observations.
fn push_numbered_rows(blocks: &mut Vec<ContentBlock>, rows: &[Row]) {
    for (index, row) in rows.iter().enumerate() {
        let entries: Vec<String> = row
            .iter()
            .filter(|(_, value)| has_value(Some(*value)))
            .map(|(key, value)| format!("{key}: {}", display_value(Some(value))))
            .collect();
        blocks.push(ContentBlock::paragraph(vec![TextRun::new(format!(
            "{}. {}",
            index + 1,
            entries.join("\n")
        ))
        .size(22)]));
    }
}

async fn push_vulnerability(
    blocks: &mut Vec<ContentBlock>,
    index: usize,
    row: &Row,
    fields: &FieldSet,
    roles: &FieldRoles,
    images: &[EvidenceImage],
) {
    let name_value = roles
        .name_field
        .as_deref()
        .map(|col| row.get(col))
        .filter(|cell| has_value(*cell))
        .map(|cell| display_value(cell));

    if let Some(name) = &name_value {
        blocks.push(ContentBlock::heading(
            HeadingLevel::Heading2,
            TextRun::new(format!("{}. {}", index + 1, name)).bold().size(26),
        ));
    }

    // Severity and Status render in this fixed order regardless of where
    // their columns sit in the selection; the remaining fields follow in
    // selection order.
    push_role_paragraph(blocks, "Severity: ", row, roles.severity_field.as_deref(), severity_color);
    push_role_paragraph(blocks, "Status: ", row, roles.status_field.as_deref(), status_color);

    for field in fields.included() {
        if roles.covers(&field.name) {
            continue;
        }
        blocks.push(ContentBlock::paragraph(vec![TextRun::new(field.name.clone())
            .bold()
            .size(24)]));
        blocks.push(ContentBlock::paragraph(vec![TextRun::new(
            display_value(row.get(&field.name)),
        )
        .size(22)]));
    }

    // Evidence renders only when a name was classified and present; without
    // a name there is nothing to associate against.
    if let Some(name) = &name_value {
        let matched = images_for(name, images);
        if matched.is_empty() {
            return;
        }

        blocks.push(ContentBlock::paragraph(vec![TextRun::new(
            "Proof of Concept",
        )
        .bold()
        .size(24)]));

        for image in matched {
            match image.load().await {
                Ok((data, format)) => {
                    blocks.push(ContentBlock::Image {
                        data,
                        format,
                        width_px: IMAGE_WIDTH_PX,
                        height_px: IMAGE_HEIGHT_PX,
                    });
                    blocks.push(ContentBlock::paragraph(vec![TextRun::new(format!(
                        "Evidence for: {name}"
                    ))
                    .italics()
                    .size(20)]));
                }
                Err(reason) => {
                    warn!("skipping evidence image {}: {reason}", image.id);
                    blocks.push(ContentBlock::paragraph(vec![TextRun::new(
                        "Error: Failed to include image",
                    )
                    .color("FF0000")
                    .size(20)]));
                }
            }
        }
    }
}

/// Labeled, colored paragraph for a role column; nothing is emitted when
/// the role is unclassified or the cell is blank.
fn push_role_paragraph(
    blocks: &mut Vec<ContentBlock>,
    label: &str,
    row: &Row,
    column: Option<&str>,
    color: fn(&str) -> &'static str,
) {
    let Some(col) = column else { return };
    let cell = row.get(col);
    if !has_value(cell) {
        return;
    }
    let value = display_value(cell);
    blocks.push(ContentBlock::paragraph(vec![
        TextRun::new(label).bold().size(24),
        TextRun::new(value.clone())
            .bold()
            .size(24)
            .color(color(&value)),
    ]));
}

fn push_recommendations(blocks: &mut Vec<ContentBlock>, config: &ReportConfig) {
    push_heading1(blocks, "Recommendations");
    blocks.push(ContentBlock::paragraph(vec![TextRun::new(format!(
        "Based on the findings of this {} assessment, we recommend the following actions:",
        config.assessment_type.label().to_lowercase()
    ))
    .size(24)]));

    let sections = [
        (
            "1. IMMEDIATE ACTIONS",
            "\u{2022} Address all critical and high-severity vulnerabilities within 30 days\n\
             \u{2022} Implement temporary mitigations for critical findings\n\
             \u{2022} Review and update security policies",
        ),
        (
            "2. SHORT-TERM IMPROVEMENTS (1-3 months)",
            "\u{2022} Remediate medium-severity vulnerabilities\n\
             \u{2022} Enhance security monitoring and logging\n\
             \u{2022} Conduct security awareness training",
        ),
        (
            "3. LONG-TERM STRATEGY (3-12 months)",
            "\u{2022} Implement comprehensive security framework\n\
             \u{2022} Establish regular security assessment schedule\n\
             \u{2022} Develop incident response procedures",
        ),
    ];

    for (title, body) in sections {
        blocks.push(ContentBlock::paragraph(vec![TextRun::new(title)
            .bold()
            .size(24)]));
        blocks.push(ContentBlock::paragraph(vec![TextRun::new(body).size(22)]));
    }
}

fn push_footer(blocks: &mut Vec<ContentBlock>, config: &ReportConfig) {
    blocks.push(ContentBlock::paragraph(vec![TextRun::new(format!(
        "This report was generated on {} for {}",
        Utc::now().format("%Y-%m-%d"),
        config.company_name
    ))
    .italics()
    .size(20)]));
    blocks.push(ContentBlock::paragraph(vec![TextRun::new(format!(
        "Report Type: {} | Assessment: {}",
        config.report_type, config.assessment_type
    ))
    .italics()
    .size(20)]));
}

/// Plain-text preview of the first `max_rows` vulnerabilities, with long
/// values truncated. The generated document never goes through this path.
pub fn preview_text(
    data: &ReportData,
    fields: &FieldSet,
    images: &[EvidenceImage],
    max_rows: usize,
) -> String {
    let roles = FieldRoles::classify(fields);
    let mut out = String::new();

    out.push_str("Security Assessment Report\n");
    out.push_str(&format!(
        "{} vulnerabilities | {} fields included | {} PoC images\n\n",
        data.vulnerabilities.len(),
        fields.included().len(),
        images.len()
    ));

    for (index, row) in data.vulnerabilities.iter().take(max_rows).enumerate() {
        for field in normalize_row(row, fields, &roles) {
            match field.role {
                Some(FieldRole::Name) => {
                    out.push_str(&format!("{}. {}\n", index + 1, field.value));
                }
                Some(FieldRole::Severity) | Some(FieldRole::Status) => {
                    out.push_str(&format!("  {}: {}\n", field.label, field.value));
                }
                None => {
                    out.push_str(&format!(
                        "  {}: {}\n",
                        field.label,
                        preview_value(&field.value)
                    ));
                }
            }
        }

        if let Some(name_col) = roles.name_field.as_deref() {
            let cell = row.get(name_col);
            if has_value(cell) {
                let count = images_for(&display_value(cell), images).len();
                if count > 0 {
                    out.push_str(&format!("  Proof of Concept: {count} image(s)\n"));
                }
            }
        }
        out.push('\n');
    }

    if data.vulnerabilities.len() > max_rows {
        out.push_str(&format!(
            "... and {} more vulnerabilities\n",
            data.vulnerabilities.len() - max_rows
        ));
    }

    out
}
