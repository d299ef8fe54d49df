//! `config validate` handler.

use serde::Serialize;

use crate::cli::args::{ConfigValidateArgs, OutputFormat};
use crate::config::ConfigLoader;
use crate::error::{ChgkError, ConfigError, ValidationIssue};

#[derive(Debug, Serialize)]
struct FileReport {
    file: String,
    valid: bool,
    errors: Vec<String>,
    warnings: Vec<String>,
}

/// Validate configuration files.
///
/// Every file is checked even after a failure; the first failure is
/// returned once all reports are printed.
///
/// # Errors
///
/// Returns a config error if any file is missing, malformed or invalid, or
/// (with `--strict`) produced warnings.
pub fn validate(args: &ConfigValidateArgs) -> Result<(), ChgkError> {
    let loader = ConfigLoader::new();
    let mut reports = Vec::with_capacity(args.files.len());
    let mut first_failure: Option<ConfigError> = None;

    for path in &args.files {
        tracing::info!(file = %path.display(), "validating configuration");
        let file = path.display().to_string();

        let report = match loader.load(path) {
            Ok(result) => {
                let warnings: Vec<String> = result.warnings.iter().map(ToString::to_string).collect();
                if args.strict && !warnings.is_empty() && first_failure.is_none() {
                    first_failure = Some(ConfigError::ValidationError {
                        path: file.clone(),
                        errors: Vec::new(),
                    });
                }
                FileReport {
                    valid: !(args.strict && !warnings.is_empty()),
                    file,
                    errors: Vec::new(),
                    warnings,
                }
            }
            Err(e) => {
                let errors = match &e {
                    ConfigError::ValidationError { errors, .. } => {
                        errors.iter().map(ValidationIssue::to_string).collect()
                    }
                    other => vec![other.to_string()],
                };
                first_failure.get_or_insert(e);
                FileReport {
                    file,
                    valid: false,
                    errors,
                    warnings: Vec::new(),
                }
            }
        };
        reports.push(report);
    }

    match args.format {
        OutputFormat::Human => {
            for report in &reports {
                let status = if report.valid { "ok" } else { "invalid" };
                println!("{}: {status}", report.file);
                for line in report.errors.iter().chain(&report.warnings) {
                    println!("  {line}");
                }
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&reports)?),
    }

    first_failure.map_or(Ok(()), |e| Err(e.into()))
}
