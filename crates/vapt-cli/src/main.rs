//! VAPT Report Generator CLI

use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;
use vapt_core::{
    builder, templates, AssessmentType, EvidenceImage, FieldSet, HistoryStore, JsonFileHistory,
    ReportConfig, ReportGenerator, ReportType, Workbook,
};

#[derive(Parser)]
#[command(name = "vapt-report")]
#[command(about = "Vulnerability Assessment Report Generator")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a .docx report from a workbook
    Generate {
        /// Path to the workbook JSON (sheets of rows)
        #[arg(short, long)]
        workbook: PathBuf,

        /// Company name printed on the title page
        #[arg(short, long)]
        company: String,

        /// Assessment type (e.g. "web blackbox", api, cspm)
        #[arg(short, long)]
        assessment: String,

        /// Report type: gt or certin
        #[arg(short, long, default_value = "gt")]
        report_type: String,

        /// Field selection JSON (defaults to all workbook columns)
        #[arg(short, long)]
        fields: Option<PathBuf>,

        /// Proof-of-concept image manifest JSON
        #[arg(short, long)]
        images: Option<PathBuf>,

        /// Root directory of the template catalog
        #[arg(long, default_value = "templates")]
        templates_dir: PathBuf,

        /// Directory the report is written to
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,

        /// History log file
        #[arg(long, default_value = "report_history.json")]
        history_file: PathBuf,
    },

    /// Print a plain-text preview of the report content
    Preview {
        /// Path to the workbook JSON
        #[arg(short, long)]
        workbook: PathBuf,

        /// Number of vulnerabilities to show
        #[arg(short, long, default_value = "3")]
        rows: usize,

        /// Field selection JSON (defaults to all workbook columns)
        #[arg(short, long)]
        fields: Option<PathBuf>,

        /// Proof-of-concept image manifest JSON
        #[arg(short, long)]
        images: Option<PathBuf>,
    },

    /// Inspect or prune the report history
    History {
        /// History log file
        #[arg(long, default_value = "report_history.json")]
        history_file: PathBuf,

        #[command(subcommand)]
        action: HistoryAction,
    },

    /// List the template catalog
    Templates,

    /// Write a sample workbook JSON
    Sample {
        /// Output path
        #[arg(short, long, default_value = "sample_workbook.json")]
        output: PathBuf,
    },
}

#[derive(Subcommand)]
enum HistoryAction {
    /// List recorded reports, newest first
    List,

    /// Delete one record by id
    Delete {
        /// Record id
        id: String,
    },
}

/// One entry of the `--images` manifest.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageManifestEntry {
    vulnerability_name: String,
    path: PathBuf,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set subscriber");

    match cli.command {
        Commands::Generate {
            workbook,
            company,
            assessment,
            report_type,
            fields,
            images,
            templates_dir,
            out_dir,
            history_file,
        } => {
            cmd_generate(
                workbook,
                company,
                assessment,
                report_type,
                fields,
                images,
                templates_dir,
                out_dir,
                history_file,
            )
            .await;
        }
        Commands::Preview {
            workbook,
            rows,
            fields,
            images,
        } => {
            cmd_preview(workbook, rows, fields, images);
        }
        Commands::History {
            history_file,
            action,
        } => {
            cmd_history(history_file, action);
        }
        Commands::Templates => {
            cmd_templates();
        }
        Commands::Sample { output } => {
            cmd_sample(output);
        }
    }
}

#[allow(clippy::too_many_arguments)]
async fn cmd_generate(
    workbook: PathBuf,
    company: String,
    assessment: String,
    report_type: String,
    fields_path: Option<PathBuf>,
    images_path: Option<PathBuf>,
    templates_dir: PathBuf,
    out_dir: PathBuf,
    history_file: PathBuf,
) {
    let config = ReportConfig {
        assessment_type: parse_assessment(&assessment),
        company_name: company,
        report_type: parse_report_type(&report_type),
    };

    let data = load_workbook(&workbook);
    let fields = load_fields(fields_path.as_deref(), &data.headers());
    let images = load_images(images_path.as_deref());

    info!(
        "generating report: {} vulnerabilities, {} fields, {} images",
        data.vulnerabilities.len(),
        fields.len(),
        images.len()
    );

    let history = Box::new(JsonFileHistory::new(history_file));
    let generator = ReportGenerator::new(templates_dir, history);

    match generator.generate(&data, &fields, &images, &config).await {
        Ok(report) => {
            let out_path = out_dir.join(&report.file_name);
            if let Err(e) = std::fs::write(&out_path, &report.bytes) {
                error!("Failed to write report: {}", e);
                std::process::exit(1);
            }
            info!("Report written to: {}", out_path.display());
        }
        Err(e) => {
            error!("Generation failed: {}", e);
            std::process::exit(1);
        }
    }
}

fn cmd_preview(
    workbook: PathBuf,
    rows: usize,
    fields_path: Option<PathBuf>,
    images_path: Option<PathBuf>,
) {
    let data = load_workbook(&workbook);
    let fields = load_fields(fields_path.as_deref(), &data.headers());
    let images = load_images(images_path.as_deref());

    print!("{}", builder::preview_text(&data, &fields, &images, rows));
}

fn cmd_history(history_file: PathBuf, action: HistoryAction) {
    let store = JsonFileHistory::new(history_file);

    match action {
        HistoryAction::List => {
            let records = store.list();
            if records.is_empty() {
                println!("No reports in history");
                return;
            }
            println!("Report History\n{}", "=".repeat(50));
            for record in records {
                println!(
                    "{}  {}  {}  {} bytes\n  id: {}",
                    record.date, record.report_type, record.name, record.size_bytes, record.id
                );
            }
        }
        HistoryAction::Delete { id } => match store.delete_by_id(&id) {
            Ok(remaining) => {
                println!("Deleted; {} record(s) remain", remaining.len());
            }
            Err(e) => {
                error!("Failed to delete record: {}", e);
                std::process::exit(1);
            }
        },
    }
}

fn cmd_templates() {
    println!("Template Catalog\n{}", "=".repeat(50));
    for (report_type, assessment, path) in templates::entries() {
        println!("{:8} {:20} {}", report_type.label(), assessment.label(), path.display());
    }
}

fn cmd_sample(output: PathBuf) {
    let sample = serde_json::json!([
        {
            "name": "Vulnerabilities",
            "rows": [
                {
                    "Vulnerability Name": "SQL Injection in Login Form",
                    "Severity": "Critical",
                    "Status": "Open",
                    "Description": "The login form is vulnerable to SQL injection attacks through the username parameter",
                    "Impact": "Complete database compromise, unauthorized access to user credentials",
                    "Recommendation": "Use parameterized queries and input validation"
                },
                {
                    "Vulnerability Name": "Cross-Site Scripting (XSS)",
                    "Severity": "High",
                    "Status": "Open",
                    "Description": "Reflected XSS vulnerability in the search functionality",
                    "Impact": "Session hijacking, credential theft, malicious script execution",
                    "Recommendation": "Implement proper output encoding and Content Security Policy"
                }
            ]
        },
        {
            "name": "Observations",
            "rows": [
                {
                    "Observation": "Outdated SSL/TLS configuration",
                    "Details": "Server supports deprecated TLS 1.0 protocol"
                }
            ]
        },
        {
            "name": "Scope",
            "rows": [
                {
                    "Asset": "Web Application",
                    "URL": "https://example.com",
                    "Environment": "Production"
                }
            ]
        }
    ]);

    let raw = match serde_json::to_string_pretty(&sample) {
        Ok(raw) => raw,
        Err(e) => {
            error!("Failed to serialize sample: {}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = std::fs::write(&output, raw) {
        error!("Failed to write sample workbook: {}", e);
        std::process::exit(1);
    }
    info!("Sample workbook written to: {}", output.display());
}

fn parse_assessment(s: &str) -> AssessmentType {
    match AssessmentType::parse(s) {
        Some(assessment) => assessment,
        None => {
            error!(
                "Unknown assessment type: {} (expected one of: {})",
                s,
                AssessmentType::all()
                    .iter()
                    .map(|a| a.label())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
            std::process::exit(1);
        }
    }
}

fn parse_report_type(s: &str) -> ReportType {
    match ReportType::parse(s) {
        Some(report_type) => report_type,
        None => {
            error!("Unknown report type: {} (expected gt or certin)", s);
            std::process::exit(1);
        }
    }
}

fn load_workbook(path: &Path) -> vapt_core::ReportData {
    if !path.exists() {
        error!("Workbook not found: {}", path.display());
        std::process::exit(1);
    }
    match Workbook::load(path) {
        Ok(workbook) => workbook.into_report_data(),
        Err(e) => {
            error!("Failed to load workbook: {}", e);
            std::process::exit(1);
        }
    }
}

fn load_fields(path: Option<&Path>, headers: &[String]) -> FieldSet {
    let Some(path) = path else {
        return FieldSet::from_headers(headers);
    };
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) => {
            error!("Failed to read field selection: {}", e);
            std::process::exit(1);
        }
    };
    match serde_json::from_str(&raw) {
        Ok(fields) => fields,
        Err(e) => {
            error!("Invalid field selection JSON: {}", e);
            std::process::exit(1);
        }
    }
}

fn load_images(path: Option<&Path>) -> Vec<EvidenceImage> {
    let Some(path) = path else {
        return Vec::new();
    };
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) => {
            error!("Failed to read image manifest: {}", e);
            std::process::exit(1);
        }
    };
    let entries: Vec<ImageManifestEntry> = match serde_json::from_str(&raw) {
        Ok(entries) => entries,
        Err(e) => {
            error!("Invalid image manifest JSON: {}", e);
            std::process::exit(1);
        }
    };
    entries
        .into_iter()
        .map(|e| EvidenceImage::from_path(e.vulnerability_name, e.path))
        .collect()
}
