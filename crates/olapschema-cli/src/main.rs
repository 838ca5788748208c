use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use olapschema_core::{Config, OutputFormat, Report, Schema, Severity};
use olapschema_engine::SchemaCheck;

/// OlapSchema - table schema validation and evolution checks
#[derive(Parser)]
#[command(name = "olapschema")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file (default: olapschema.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a schema for structural problems
    Validate {
        /// Schema JSON file
        schema: PathBuf,

        /// Also write the report as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check that a schema can replace its prior version
    Compat {
        /// Currently deployed schema JSON file
        #[arg(short, long)]
        prior: PathBuf,

        /// Candidate schema JSON file
        schema: PathBuf,

        /// Also write the report as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print a schema in canonical form
    Format {
        /// Schema JSON file
        schema: PathBuf,

        /// Print on one line regardless of the configured format
        #[arg(long)]
        single_line: bool,
    },

    /// Apply the ingestion mode and keys of another schema
    Hint {
        /// Schema JSON file
        schema: PathBuf,

        /// Schema JSON file carrying the ingestion hint
        #[arg(long)]
        hint: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    let config = Config::discover(cli.config.as_deref())?;
    if cli.verbose {
        eprintln!("{} format: {:?}", "Using".cyan(), config.format);
    }

    match cli.command {
        Commands::Validate { schema, output } => {
            validate_command(&config, &schema, output.as_deref())
        }
        Commands::Compat {
            prior,
            schema,
            output,
        } => compat_command(&config, &prior, &schema, output.as_deref(), cli.verbose),
        Commands::Format {
            schema,
            single_line,
        } => {
            let format = if single_line {
                OutputFormat::SingleLine
            } else {
                config.format
            };
            println!("{}", render(&load_schema(&schema)?, format)?);
            Ok(())
        }
        Commands::Hint { schema, hint } => {
            let hinted = load_schema(&schema)?.with_schema_hint(&load_schema(&hint)?);
            println!("{}", render(&hinted, config.format)?);
            Ok(())
        }
    }
}

fn load_schema(path: &Path) -> Result<Schema> {
    tracing::debug!(path = %path.display(), "Loading schema");
    Schema::from_file(path).with_context(|| format!("Failed to load schema {}", path.display()))
}

fn render(schema: &Schema, format: OutputFormat) -> Result<String> {
    let json = match format {
        OutputFormat::Pretty => schema.to_pretty_json_string()?,
        OutputFormat::SingleLine => schema.to_single_line_json_string()?,
    };
    Ok(json)
}

/// Validate command - structural checks on one schema
fn validate_command(config: &Config, path: &Path, output: Option<&Path>) -> Result<()> {
    let schema = load_schema(path)?;
    let report = SchemaCheck::new(config).validate(&schema);

    finish(&report, "Schema Validation Report", output)?;
    fail_on_errors(&report)
}

/// Compat command - evolution checks against the prior version
fn compat_command(
    config: &Config,
    prior_path: &Path,
    path: &Path,
    output: Option<&Path>,
    verbose: bool,
) -> Result<()> {
    let prior = load_schema(prior_path)?;
    let candidate = load_schema(path)?;

    if verbose {
        eprintln!(
            "{} '{}' against {}",
            "Comparing".cyan(),
            candidate.schema_name(),
            prior_path.display()
        );
    }

    let (report, evolution) = SchemaCheck::new(config).compare(&prior, &candidate);
    tracing::info!(
        schema = %candidate.schema_name(),
        breaking = evolution.breaking_change_count(),
        "Compared against prior schema"
    );
    if evolution.is_backward_compatible() {
        println!("{}", "✓ Backward compatible".green().bold());
    } else {
        println!(
            "{}",
            format!(
                "✗ {} breaking change(s)",
                evolution.breaking_change_count()
            )
            .red()
            .bold()
        );
    }

    finish(&report, "Schema Compatibility Report", output)?;
    fail_on_errors(&report)?;

    // Severity overrides soften the report, not the verdict
    if !evolution.is_backward_compatible() {
        anyhow::bail!(
            "Schema '{}' is not backward compatible ({} breaking change(s))",
            candidate.schema_name(),
            evolution.breaking_change_count()
        );
    }
    Ok(())
}

/// Print the report and save it when asked
fn finish(report: &Report, title: &str, output: Option<&Path>) -> Result<()> {
    print_report_summary(report, title);

    if let Some(output) = output {
        report
            .save_to_file(output)
            .with_context(|| format!("Failed to write report {}", output.display()))?;
        eprintln!("{} {}", "Report written to".cyan(), output.display());
    }
    Ok(())
}

fn fail_on_errors(report: &Report) -> Result<()> {
    if report.has_errors() {
        anyhow::bail!(
            "Schema '{}' has {} error(s)",
            report.schema_name,
            report.summary.errors
        );
    }
    Ok(())
}

/// Print report summary to stdout
fn print_report_summary(report: &Report, title: &str) {
    println!("\n{}", "=".repeat(60).bright_blue());
    println!("{}", title.bold().bright_blue());
    println!("{}", "=".repeat(60).bright_blue());
    println!();

    println!("Schema: {}", report.schema_name);
    println!("Columns checked: {}", report.summary.columns_checked);
    println!("Timestamp: {}", report.timestamp);
    println!();

    println!("{}", "Summary:".bold());
    println!("  Total diagnostics: {}", report.summary.total);

    if report.summary.errors > 0 {
        println!("  Errors:   {}", format!("{}", report.summary.errors).red().bold());
    } else {
        println!("  Errors:   {}", format!("{}", report.summary.errors).green());
    }

    if report.summary.warnings > 0 {
        println!("  Warnings: {}", format!("{}", report.summary.warnings).yellow());
    } else {
        println!("  Warnings: {}", format!("{}", report.summary.warnings).green());
    }

    println!("  Info:     {}", report.summary.info);
    println!();

    if report.diagnostics.is_empty() {
        println!("{}", "✓ No issues found!".green().bold());
    } else {
        println!("{}", "Diagnostics:".bold());
        for diag in &report.diagnostics {
            let severity_str = match diag.severity {
                Severity::Error => "ERROR".red().bold(),
                Severity::Warn => "WARN".yellow().bold(),
                Severity::Info => "INFO".cyan(),
            };

            println!("  [{}] {}: {}", severity_str, diag.code, diag.message);

            if let Some(exp) = &diag.expected {
                println!("    Expected: {}", exp);
            }
            if let Some(act) = &diag.actual {
                println!("    Actual:   {}", act);
            }
        }
    }

    println!();
    println!("{}", "=".repeat(60).bright_blue());
}

#[cfg(test)]
mod tests {
    use super::*;
    use olapschema_core::{DataType, SchemaBuilder};

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn render_formats() {
        let schema = SchemaBuilder::new()
            .set_schema_name("events")
            .add_metric("clicks", DataType::Long)
            .build()
            .unwrap();

        let single = render(&schema, OutputFormat::SingleLine).unwrap();
        assert_eq!(
            single,
            r#"{"schemaName":"events","metricFieldSpecs":[{"name":"clicks","dataType":"LONG"}]}"#
        );
        assert!(render(&schema, OutputFormat::Pretty).unwrap().contains('\n'));
    }

    #[test]
    fn invalid_schema_fails_validation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(
            &path,
            r#"{"schemaName":"broken","metricFieldSpecs":[{"name":"flag","dataType":"BOOLEAN"}]}"#,
        )
        .unwrap();
        let report_path = dir.path().join("report.json");

        let err = validate_command(&Config::default(), &path, Some(&report_path)).unwrap_err();
        assert!(err.to_string().contains("1 error"));
        assert!(report_path.exists());
    }

    #[test]
    fn incompatible_schema_fails_despite_severity_override() {
        let dir = tempfile::tempdir().unwrap();
        let prior = dir.path().join("prior.json");
        let candidate = dir.path().join("candidate.json");
        std::fs::write(
            &prior,
            r#"{"schemaName":"events","metricFieldSpecs":[{"name":"clicks","dataType":"LONG"},{"name":"views","dataType":"LONG"}]}"#,
        )
        .unwrap();
        std::fs::write(
            &candidate,
            r#"{"schemaName":"events","metricFieldSpecs":[{"name":"clicks","dataType":"LONG"}]}"#,
        )
        .unwrap();

        let config = Config::default();
        let err = compat_command(&config, &prior, &candidate, None, false).unwrap_err();
        assert!(err.to_string().contains("1 error"));

        let mut config = Config::default();
        config.severity.set_override(
            olapschema_core::DiagnosticCode::CompatColumnRemoved,
            Severity::Warn,
        );
        let err = compat_command(&config, &prior, &candidate, None, false).unwrap_err();
        assert!(err.to_string().contains("not backward compatible"));

        assert!(compat_command(&config, &prior, &prior, None, false).is_ok());
    }

    #[test]
    fn missing_schema_file_is_reported() {
        let err = load_schema(Path::new("does/not/exist.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to load schema"));
    }
}
