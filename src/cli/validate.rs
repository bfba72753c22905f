//! `chartname validate`: check identifiers against the grammar.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use serde::Serialize;

use super::OutputFormat;
use crate::core::ChartnameError;
use crate::naming;

/// Arguments for `chartname validate`.
#[derive(Args, Debug)]
pub struct ValidateCommand {
    /// Identifiers to check
    #[arg(required = true)]
    pub identifiers: Vec<String>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct ValidationResult {
    identifier: String,
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ValidateCommand {
    /// Report validity for each identifier.
    ///
    /// # Errors
    ///
    /// Fails when at least one identifier is invalid.
    pub fn execute(self) -> Result<()> {
        let results = check_all(&self.identifiers);

        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&results)?),
            OutputFormat::Text => {
                for result in &results {
                    match &result.error {
                        None => println!("{} {}", "✓".green(), result.identifier),
                        Some(error) => println!("{} {}: {}", "✗".red(), result.identifier, error),
                    }
                }
            }
        }

        let invalid = results.iter().filter(|r| !r.valid).count();
        if invalid > 0 {
            return Err(ChartnameError::Other {
                message: format!("{invalid} of {} identifiers are invalid", results.len()),
            }
            .into());
        }
        Ok(())
    }
}

fn check_all(identifiers: &[String]) -> Vec<ValidationResult> {
    identifiers
        .iter()
        .map(|identifier| {
            let error = naming::validate(identifier).err().map(|e| e.to_string());
            ValidationResult {
                identifier: identifier.clone(),
                valid: error.is_none(),
                error,
            }
        })
        .collect()
}
