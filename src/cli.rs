//! Command-line interface for dataset audits.

use std::{
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::{Parser, Subcommand};

use crate::{
    dataset::records_from_csv_path,
    error::Result,
    schema::RecordSchema,
    DatasetAuditor,
};

/// EHR dataset quality auditor.
#[derive(Parser)]
#[command(name = "ehr-audit")]
#[command(about = "Validate and score EHR datasets against a field schema")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Audit a CSV dataset against a JSON schema
    Audit {
        /// Path to the CSV dataset
        data: PathBuf,

        /// Path to the JSON schema definition
        #[arg(short, long)]
        schema: PathBuf,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: String,

        /// Write the report to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also flag IQR outliers in numeric fields
        #[arg(long)]
        outliers: bool,
    },

    /// Check that a JSON schema definition is well-formed
    Schema {
        /// Path to the JSON schema definition
        path: PathBuf,
    },
}

/// Parse arguments and run. Entry point for the binary.
#[must_use]
pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Audit {
            data,
            schema,
            format,
            output,
            outliers,
        } => cmd_audit(&data, &schema, &format, output.as_deref(), outliers),
        Commands::Schema { path } => cmd_schema(&path),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn cmd_audit(
    data: &Path,
    schema_path: &Path,
    format: &str,
    output: Option<&Path>,
    outliers: bool,
) -> Result<()> {
    let schema = RecordSchema::from_json_path(schema_path)?;
    let records = records_from_csv_path(data)?;

    let auditor = DatasetAuditor::new(schema)?.with_outlier_detection(outliers);
    let report = auditor.run(&records);

    let rendered = match format {
        "json" => serde_json::to_string_pretty(&report)
            .map_err(|e| crate::error::Error::invalid_config(e.to_string()))?,
        _ => report.summary(),
    };

    match output {
        Some(path) => {
            std::fs::write(path, &rendered).map_err(|e| crate::error::Error::io(e, path))?;
            println!("Report written to {}", path.display());
        }
        None => println!("{rendered}"),
    }

    Ok(())
}

fn cmd_schema(path: &Path) -> Result<()> {
    let schema = RecordSchema::from_json_path(path)?;
    println!(
        "OK: {} fields ({} required)",
        schema.len(),
        schema.required_count()
    );
    for rule in schema.rules() {
        let required = if rule.is_required() { " (required)" } else { "" };
        println!("  {}: {}{}", rule.name(), rule.field_type().name(), required);
    }
    Ok(())
}
