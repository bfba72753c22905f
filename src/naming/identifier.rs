//! Release identifiers and their grammar.
//!
//! An identifier is the user-supplied release name every resource name is
//! derived from. The accepted grammar is the restricted DNS-1123 label used
//! for release names:
//!
//! - 1 to 63 characters
//! - lowercase ASCII letters, digits and `-`
//! - starts and ends with a letter or digit
//! - never two hyphens in a row
//!
//! [`Identifier`] can only be built through [`Identifier::parse`], so a value
//! of this type has already passed the grammar. That is the gate that keeps
//! malformed names away from the renderer.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use super::{ResourceKind, base_name, resource_name};
use crate::constants::MAX_NAME_LENGTH;
use crate::core::{ChartnameError, IdentifierError};

/// A release name that satisfies the identifier grammar.
///
/// # Examples
///
/// ```rust
/// use chartname_cli::naming::{Identifier, ResourceKind};
///
/// let id = Identifier::parse("my-release").unwrap();
/// assert_eq!(id.resource_name(ResourceKind::ControlPlane), "my-release-cp");
///
/// assert!(Identifier::parse("a--b").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Identifier(String);

impl Identifier {
    /// Validate `value` against the grammar and wrap it.
    ///
    /// # Errors
    ///
    /// Returns the first grammar rule the input breaks.
    pub fn parse(value: impl Into<String>) -> Result<Self, IdentifierError> {
        let value = value.into();
        validate(&value)?;
        Ok(Self(value))
    }

    /// The identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in characters (identical to bytes, the alphabet is ASCII).
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The base name this identifier derives.
    #[must_use]
    pub fn base_name(&self) -> &str {
        base_name(&self.0)
    }

    /// The name of `kind` for this identifier.
    #[must_use]
    pub fn resource_name(&self, kind: ResourceKind) -> String {
        resource_name(&self.0, kind)
    }

    /// Consume the identifier, returning the inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for Identifier {
    type Err = ChartnameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).map_err(|reason| ChartnameError::InvalidIdentifier {
            identifier: s.to_string(),
            reason,
        })
    }
}

/// Check `value` against the identifier grammar.
///
/// Rules are checked in a fixed order (empty, length, characters, leading
/// hyphen, trailing hyphen, consecutive hyphens) and the first violation is
/// returned.
///
/// # Errors
///
/// Returns the [`IdentifierError`] describing the broken rule.
pub fn validate(value: &str) -> Result<(), IdentifierError> {
    if value.is_empty() {
        return Err(IdentifierError::Empty);
    }

    let length = value.chars().count();
    if length > MAX_NAME_LENGTH {
        return Err(IdentifierError::TooLong {
            length,
            max: MAX_NAME_LENGTH,
        });
    }

    if let Some((position, character)) =
        value.chars().enumerate().find(|(_, c)| !is_identifier_char(*c))
    {
        return Err(IdentifierError::InvalidCharacter {
            character,
            position,
        });
    }

    if value.starts_with('-') {
        return Err(IdentifierError::LeadingHyphen);
    }
    if value.ends_with('-') {
        return Err(IdentifierError::TrailingHyphen);
    }

    if let Some(index) = value.find("--") {
        return Err(IdentifierError::ConsecutiveHyphens {
            position: index + 1,
        });
    }

    Ok(())
}

const fn is_identifier_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'
}
