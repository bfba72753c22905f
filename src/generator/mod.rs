//! Identifier generation for property checks.
//!
//! Strategies here feed both the `proptest!` suites and the verifier's own
//! runner. Candidates come from a regex over the identifier alphabet and are
//! then passed through [`Identifier::parse`], so nothing that fails the
//! grammar can be produced; shrinking stays inside the grammar for the same
//! reason.
//!
//! The mix is weighted towards arbitrary lengths, with explicit arms for the
//! two boundary lengths (1 and the configured maximum).

use proptest::prelude::*;
use proptest::string::string_regex;

use crate::constants::MAX_NAME_LENGTH;
use crate::core::ChartnameError;
use crate::naming::Identifier;

const ALNUM: &str = "[a-z0-9]";
const INNER: &str = "[a-z0-9-]";

/// Strategy producing valid identifiers of at most `max_len` characters.
///
/// `max_len` is clamped to `1..=63`.
///
/// # Errors
///
/// Returns [`ChartnameError::GeneratorError`] if a regex strategy cannot be
/// built.
///
/// # Examples
///
/// ```rust
/// use chartname_cli::generator::identifiers;
/// use proptest::strategy::{Strategy, ValueTree};
/// use proptest::test_runner::TestRunner;
///
/// let strategy = identifiers(63).unwrap();
/// let mut runner = TestRunner::deterministic();
/// let id = strategy.new_tree(&mut runner).unwrap().current();
/// assert!(id.len() <= 63);
/// ```
pub fn identifiers(max_len: usize) -> Result<BoxedStrategy<Identifier>, ChartnameError> {
    let max_len = max_len.clamp(1, MAX_NAME_LENGTH);

    let single = regex_strategy(ALNUM)?;
    if max_len == 1 {
        return Ok(into_identifiers(single));
    }

    let inner_max = max_len - 2;
    let any_length = regex_strategy(&format!("{ALNUM}({INNER}{{0,{inner_max}}}{ALNUM})?"))?;
    let full_length = regex_strategy(&format!("{ALNUM}{INNER}{{{inner_max}}}{ALNUM}"))?;

    Ok(into_identifiers(prop_oneof![
        8 => any_length,
        1 => single,
        1 => full_length,
    ]))
}

/// Strategy producing pairs of identifiers for the distinctness property.
///
/// Mostly independent draws; one case in ten reuses the same identifier on
/// both sides so the "same base name" discard path is exercised too.
///
/// # Errors
///
/// Propagates errors from [`identifiers`].
pub fn identifier_pairs(
    max_len: usize,
) -> Result<BoxedStrategy<(Identifier, Identifier)>, ChartnameError> {
    let ids = identifiers(max_len)?;
    Ok(prop_oneof![
        9 => (ids.clone(), ids.clone()),
        1 => ids.prop_map(|id| (id.clone(), id)),
    ]
    .boxed())
}

fn regex_strategy(pattern: &str) -> Result<BoxedStrategy<String>, ChartnameError> {
    string_regex(pattern).map(Strategy::boxed).map_err(|e| ChartnameError::GeneratorError {
        reason: format!("invalid pattern {pattern:?}: {e}"),
    })
}

fn into_identifiers(candidates: impl Strategy<Value = String> + 'static) -> BoxedStrategy<Identifier> {
    candidates
        .prop_filter_map("identifier grammar", |candidate| Identifier::parse(candidate).ok())
        .boxed()
}
