//! The name-derivation rule.
//!
//! Every resource the chart creates is named after the release identifier:
//!
//! 1. `base = identifier[..63]` (truncation keeps the start)
//! 2. trailing hyphens left over from truncation are stripped
//! 3. `name = base + suffix(kind)`
//!
//! | Kind | Manifest `kind:` | Suffix |
//! |------|------------------|--------|
//! | [`ResourceKind::Cluster`] | `Cluster` | *(none)* |
//! | [`ResourceKind::ControlPlane`] | `K0smotronControlPlane` | `-cp` |
//! | [`ResourceKind::WorkerMachineTemplate`] | `HCloudMachineTemplate` | `-worker-mt` |
//! | [`ResourceKind::WorkerConfigTemplate`] | `K0sWorkerConfigTemplate` | `-machine-config` |
//! | [`ResourceKind::MachineDeployment`] | `MachineDeployment` | `-md` |
//!
//! The suffix is appended after truncation and the result is not truncated
//! again, so a long identifier can produce names past the 63-character
//! label limit. That mirrors the chart helpers exactly; see
//! [`exceeds_name_limit`] for flagging such names.
//!
//! Everything here is pure: no I/O and no hidden state.

mod identifier;

pub use identifier::{Identifier, validate};

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::constants::MAX_NAME_LENGTH;

/// The resource kinds whose names are derived from the release identifier.
///
/// The manifest literals are a contract with the chart templates: renaming a
/// `kind:` in the chart breaks verification.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceKind {
    /// Cluster API `Cluster`
    Cluster,
    /// k0smotron control plane
    ControlPlane,
    /// Hetzner machine template used by workers
    WorkerMachineTemplate,
    /// k0s worker bootstrap config template
    WorkerConfigTemplate,
    /// Worker `MachineDeployment`
    MachineDeployment,
}

impl ResourceKind {
    /// Every kind, in the order reports list them.
    pub const ALL: [Self; 5] = [
        Self::Cluster,
        Self::ControlPlane,
        Self::WorkerMachineTemplate,
        Self::WorkerConfigTemplate,
        Self::MachineDeployment,
    ];

    /// Suffix appended to the base name.
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Cluster => "",
            Self::ControlPlane => "-cp",
            Self::WorkerMachineTemplate => "-worker-mt",
            Self::WorkerConfigTemplate => "-machine-config",
            Self::MachineDeployment => "-md",
        }
    }

    /// The literal `kind:` value the chart emits for this resource.
    #[must_use]
    pub const fn manifest_kind(self) -> &'static str {
        match self {
            Self::Cluster => "Cluster",
            Self::ControlPlane => "K0smotronControlPlane",
            Self::WorkerMachineTemplate => "HCloudMachineTemplate",
            Self::WorkerConfigTemplate => "K0sWorkerConfigTemplate",
            Self::MachineDeployment => "MachineDeployment",
        }
    }

    /// Look a kind up by its exact manifest literal.
    #[must_use]
    pub fn from_manifest_kind(kind: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.manifest_kind() == kind)
    }

    /// Longest name this kind can produce from a valid identifier.
    #[must_use]
    pub const fn max_name_length(self) -> usize {
        MAX_NAME_LENGTH + self.suffix().len()
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.manifest_kind())
    }
}

/// Derive the base name: the first 63 characters with trailing hyphens
/// removed.
///
/// Accepts any string, not only valid identifiers, so the rule can be
/// applied to inputs the grammar would reject. Truncation counts characters
/// and always cuts on a character boundary.
///
/// # Examples
///
/// ```rust
/// use chartname_cli::naming::base_name;
///
/// assert_eq!(base_name("my-release"), "my-release");
/// assert_eq!(base_name(&"a".repeat(65)), "a".repeat(63));
/// assert_eq!(base_name("foo-"), "foo");
/// ```
#[must_use]
pub fn base_name(identifier: &str) -> &str {
    let truncated = match identifier.char_indices().nth(MAX_NAME_LENGTH) {
        Some((end, _)) => &identifier[..end],
        None => identifier,
    };
    truncated.trim_end_matches('-')
}

/// Derive the resource name for `kind`.
///
/// If the base name strips down to nothing, the result is the bare suffix
/// (`"-cp"` for the control plane, `""` for the cluster).
#[must_use]
pub fn resource_name(identifier: &str, kind: ResourceKind) -> String {
    let base = base_name(identifier);
    let mut name = String::with_capacity(base.len() + kind.suffix().len());
    name.push_str(base);
    name.push_str(kind.suffix());
    name
}

/// Derive the names of every kind at once.
#[must_use]
pub fn derive_all(identifier: &str) -> BTreeMap<ResourceKind, String> {
    ResourceKind::ALL.into_iter().map(|kind| (kind, resource_name(identifier, kind))).collect()
}

/// Whether a derived name is longer than the platform's 63-character label
/// limit.
#[must_use]
pub fn exceeds_name_limit(name: &str) -> bool {
    name.chars().count() > MAX_NAME_LENGTH
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_my_release_scenario() {
        let names = derive_all("my-release");
        assert_eq!(names[&ResourceKind::Cluster], "my-release");
        assert_eq!(names[&ResourceKind::ControlPlane], "my-release-cp");
        assert_eq!(names[&ResourceKind::WorkerMachineTemplate], "my-release-worker-mt");
        assert_eq!(names[&ResourceKind::WorkerConfigTemplate], "my-release-machine-config");
        assert_eq!(names[&ResourceKind::MachineDeployment], "my-release-md");
    }

    #[test]
    fn test_truncates_from_the_start() {
        let id = format!("{}xyz", "b".repeat(62));
        assert_eq!(base_name(&id), format!("{}x", "b".repeat(62)));
    }

    #[test]
    fn test_strips_hyphens_left_by_truncation() {
        // 62 chars, then a hyphen at position 62, then more text
        let id = format!("{}-tail", "c".repeat(62));
        assert_eq!(base_name(&id), "c".repeat(62));

        // Repeated stripping, not just one hyphen
        assert_eq!(base_name("abc---"), "abc");
    }

    #[test]
    fn test_empty_base_yields_bare_suffix() {
        assert_eq!(base_name("---"), "");
        assert_eq!(resource_name("---", ResourceKind::ControlPlane), "-cp");
        assert_eq!(resource_name("---", ResourceKind::Cluster), "");
    }

    #[test]
    fn test_suffix_is_not_retruncated() {
        let id = "d".repeat(63);
        let name = resource_name(&id, ResourceKind::WorkerConfigTemplate);
        assert_eq!(name.len(), 78);
        assert_eq!(name.len(), ResourceKind::WorkerConfigTemplate.max_name_length());
        assert!(exceeds_name_limit(&name));
        assert!(!exceeds_name_limit(&resource_name(&id, ResourceKind::Cluster)));
    }

    #[test]
    fn test_manifest_kind_lookup() {
        for kind in ResourceKind::ALL {
            assert_eq!(ResourceKind::from_manifest_kind(kind.manifest_kind()), Some(kind));
        }
        assert_eq!(ResourceKind::from_manifest_kind("cluster"), None);
        assert_eq!(ResourceKind::ControlPlane.to_string(), "K0smotronControlPlane");
    }
}
