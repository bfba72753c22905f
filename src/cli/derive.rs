//! `chartname derive`: apply the naming rule to one identifier.
//!
//! ```bash
//! chartname derive my-release
//! chartname derive my-release --kind control-plane   # prints just the name
//! chartname derive 'not--valid' --unchecked          # skip the grammar check
//! ```

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use std::collections::BTreeMap;

use super::OutputFormat;
use crate::constants::MAX_NAME_LENGTH;
use crate::naming::{self, Identifier, ResourceKind};

/// Arguments for `chartname derive`.
#[derive(Args, Debug)]
pub struct DeriveCommand {
    /// Release identifier
    pub identifier: String,

    /// Only print the name for this kind
    #[arg(long, value_enum)]
    pub kind: Option<ResourceKind>,

    /// Apply the rule even if the identifier fails the grammar
    #[arg(long)]
    pub unchecked: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Debug, Serialize)]
struct Derivation<'a> {
    identifier: &'a str,
    base_name: &'a str,
    names: BTreeMap<ResourceKind, String>,
    over_length: Vec<ResourceKind>,
}

impl DeriveCommand {
    /// Print the derived names.
    ///
    /// # Errors
    ///
    /// Returns [`crate::core::ChartnameError::InvalidIdentifier`] when the
    /// identifier fails the grammar and `--unchecked` was not given.
    pub fn execute(self) -> Result<()> {
        if !self.unchecked {
            self.identifier.parse::<Identifier>()?;
        }

        let kinds = self.kind.map_or_else(|| ResourceKind::ALL.to_vec(), |kind| vec![kind]);
        let derivation = derive(&self.identifier, &kinds);

        for kind in &derivation.over_length {
            tracing::warn!(
                "{} name '{}' is {} characters, longer than the {}-character limit",
                kind,
                derivation.names[kind],
                derivation.names[kind].chars().count(),
                MAX_NAME_LENGTH
            );
        }

        match (self.format, self.kind) {
            (OutputFormat::Json, _) => println!("{}", serde_json::to_string_pretty(&derivation)?),
            (OutputFormat::Text, Some(kind)) => println!("{}", derivation.names[&kind]),
            (OutputFormat::Text, None) => print!("{}", render_text(&derivation)),
        }
        Ok(())
    }
}

fn derive<'a>(identifier: &'a str, kinds: &[ResourceKind]) -> Derivation<'a> {
    let names: BTreeMap<ResourceKind, String> =
        kinds.iter().map(|&kind| (kind, naming::resource_name(identifier, kind))).collect();
    let over_length =
        names.iter().filter(|(_, name)| naming::exceeds_name_limit(name)).map(|(&kind, _)| kind).collect();

    Derivation {
        identifier,
        base_name: naming::base_name(identifier),
        names,
        over_length,
    }
}

fn render_text(derivation: &Derivation<'_>) -> String {
    let width = derivation.names.keys().map(|k| k.manifest_kind().len()).max().unwrap_or(0);
    let mut out = format!("{} {}\n", "Base name:".bold(), derivation.base_name);
    for (kind, name) in &derivation.names {
        let marker = if derivation.over_length.contains(kind) {
            format!(" {}", "(over length)".yellow())
        } else {
            String::new()
        };
        out.push_str(&format!("  {:<width$}  {name}{marker}\n", kind.manifest_kind()));
    }
    out
}
