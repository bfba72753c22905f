//! `chartname extract`: run the fact extractor over rendered output.
//!
//! ```bash
//! helm template demo ./chart | chartname extract
//! chartname extract rendered.yaml --format json
//! ```

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use tokio::io::AsyncReadExt;

use super::OutputFormat;
use crate::manifest::{self, FactTable};

/// Arguments for `chartname extract`.
#[derive(Args, Debug)]
pub struct ExtractCommand {
    /// File with rendered manifests; `-` or absent reads stdin
    pub file: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

impl ExtractCommand {
    /// Print the extracted table.
    ///
    /// # Errors
    ///
    /// Returns an error if the input cannot be read.
    pub async fn execute(self) -> Result<()> {
        let raw = match self.file.as_deref() {
            Some(path) if path.as_os_str() != "-" => tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?,
            _ => {
                let mut buffer = String::new();
                tokio::io::stdin()
                    .read_to_string(&mut buffer)
                    .await
                    .context("Failed to read rendered manifests from stdin")?;
                buffer
            }
        };

        let facts = manifest::extract(&raw);
        if facts.is_empty() {
            tracing::warn!("No document with both kind and metadata.name was found");
        }

        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&facts)?),
            OutputFormat::Text => print!("{}", render_text(&facts)),
        }
        Ok(())
    }
}

fn render_text(facts: &FactTable) -> String {
    let width = facts.iter().map(|(kind, _)| kind.len()).max().unwrap_or(0);
    facts.iter().map(|(kind, name)| format!("{kind:<width$}  {name}\n")).collect()
}
