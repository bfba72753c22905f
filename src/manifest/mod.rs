//! Manifest fact extraction.
//!
//! Renderer output is a stream of YAML documents separated by `---` lines.
//! The verifier only needs two facts from each document, its top-level
//! `kind` and its `metadata.name`, so extraction is line-based instead of
//! going through a YAML parser. That keeps the values exactly as the chart
//! wrote them (no type coercion of names like `1e10` or `true`).
//!
//! Extraction is lenient by contract: a document without a kind or without
//! a metadata name is skipped, never an error. Only the final table is
//! judged, by the verifier.

use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::LazyLock;

use crate::naming::ResourceKind;

static KIND_LINE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^kind:\s*(\S.*?)\s*$").ok());

static NAME_LINE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^name:\s*(\S.*?)\s*$").ok());

/// Kind → name table recovered from one render.
///
/// Keys are the literal `kind:` values from the output, so kinds the
/// verifier does not know about are kept too.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FactTable {
    entries: BTreeMap<String, String>,
}

impl FactTable {
    /// Name recorded for a literal manifest kind.
    #[must_use]
    pub fn get(&self, kind: &str) -> Option<&str> {
        self.entries.get(kind).map(String::as_str)
    }

    /// Name recorded for a known resource kind.
    #[must_use]
    pub fn name_for(&self, kind: ResourceKind) -> Option<&str> {
        self.get(kind.manifest_kind())
    }

    /// Number of distinct kinds found.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no document yielded a fact.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(kind, name)` pairs in kind order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn record(&mut self, kind: &str, name: &str) {
        if let Some(previous) = self.entries.insert(kind.to_string(), name.to_string()) {
            tracing::warn!(
                "Kind {} appears more than once in rendered output ('{}' replaced by '{}')",
                kind,
                previous,
                name
            );
        }
    }
}

impl FromIterator<(String, String)> for FactTable {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Extract the kind → name table from raw renderer output.
///
/// When a kind appears in several documents the last one wins and a warning
/// is logged; the chart is expected to emit each kind once.
///
/// # Examples
///
/// ```rust
/// use chartname_cli::manifest::extract;
///
/// let rendered = "---\n\
/// # Source: chart/templates/cluster.yaml\n\
/// apiVersion: cluster.x-k8s.io/v1beta1\n\
/// kind: Cluster\n\
/// metadata:\n  name: \"demo\"\n  namespace: default\n";
///
/// let facts = extract(rendered);
/// assert_eq!(facts.get("Cluster"), Some("demo"));
/// ```
#[must_use]
pub fn extract(raw: &str) -> FactTable {
    let mut facts = FactTable::default();
    let mut skipped = 0usize;

    for document in split_documents(raw) {
        if document.trim().is_empty() {
            continue;
        }
        match (find_kind(document), find_metadata_name(document)) {
            (Some(kind), Some(name)) => {
                tracing::trace!("Extracted {} -> {}", kind, name);
                facts.record(kind, name);
            }
            _ => skipped += 1,
        }
    }

    tracing::debug!("Extracted {} facts, skipped {} documents", facts.len(), skipped);
    facts
}

/// Split a multi-document stream on `---` separator lines.
///
/// A separator line may carry trailing whitespace or a comment
/// (`--- # note`); content after the marker is not treated as part of the
/// next document.
fn split_documents(raw: &str) -> Vec<&str> {
    let mut documents = Vec::new();
    let mut start = 0;
    let mut offset = 0;

    for line in raw.split_inclusive('\n') {
        if is_separator(line) {
            documents.push(&raw[start..offset]);
            start = offset + line.len();
        }
        offset += line.len();
    }
    documents.push(&raw[start..]);
    documents
}

fn is_separator(line: &str) -> bool {
    let line = line.trim_end();
    line == "---" || line.strip_prefix("---").is_some_and(|rest| rest.trim_start().starts_with('#'))
}

/// The first top-level `kind:` value in the document.
fn find_kind(document: &str) -> Option<&str> {
    let pattern = KIND_LINE.as_ref()?;
    document
        .lines()
        .filter_map(|line| pattern.captures(line))
        .find_map(|caps| caps.get(1).map(|m| unquote(strip_comment(m.as_str()))))
        .filter(|kind| !kind.is_empty())
}

/// The `name:` that is a direct child of the top-level `metadata:` mapping.
///
/// The child indentation is taken from the first non-blank line inside the
/// block; deeper lines (labels, annotations) are ignored and the block ends
/// at the next line with no indentation.
fn find_metadata_name(document: &str) -> Option<&str> {
    let pattern = NAME_LINE.as_ref()?;
    let mut lines = document.lines();
    lines.by_ref().find(|line| is_metadata_header(line))?;

    let mut child_indent = None;
    for line in lines {
        let content = line.trim_start_matches(' ');
        if content.trim().is_empty() || content.starts_with('#') {
            continue;
        }

        let indent = line.len() - content.len();
        if indent == 0 {
            break;
        }
        let expected = *child_indent.get_or_insert(indent);
        if indent != expected {
            continue;
        }

        if let Some(value) = pattern.captures(content).and_then(|caps| caps.get(1)) {
            let name = unquote(strip_comment(value.as_str()));
            return (!name.is_empty()).then_some(name);
        }
    }
    None
}

fn is_metadata_header(line: &str) -> bool {
    line.strip_prefix("metadata:").is_some_and(|rest| {
        let rest = rest.trim();
        rest.is_empty() || rest.starts_with('#')
    })
}

/// Drop a trailing ` # comment` from an unquoted scalar.
fn strip_comment(value: &str) -> &str {
    if value.starts_with('"') || value.starts_with('\'') {
        return value;
    }
    value.find(" #").map_or(value, |idx| value[..idx].trim_end())
}

/// Remove one layer of matching single or double quotes.
fn unquote(value: &str) -> &str {
    let value = value.trim();
    for quote in ['"', '\''] {
        if let Some(inner) =
            value.strip_prefix(quote).and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}
