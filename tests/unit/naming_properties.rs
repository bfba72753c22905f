//! Properties of the name-derivation rule.

use chartname_cli::generator::{identifier_pairs, identifiers};
use chartname_cli::naming::{self, Identifier, ResourceKind, base_name, resource_name};
use proptest::prelude::*;

fn any_kind() -> impl Strategy<Value = ResourceKind> {
    prop_oneof![
        Just(ResourceKind::Cluster),
        Just(ResourceKind::ControlPlane),
        Just(ResourceKind::WorkerMachineTemplate),
        Just(ResourceKind::WorkerConfigTemplate),
        Just(ResourceKind::MachineDeployment),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    #[test]
    fn derivation_is_deterministic(id in identifiers(63).unwrap(), kind in any_kind()) {
        prop_assert_eq!(resource_name(id.as_str(), kind), resource_name(id.as_str(), kind));
    }

    #[test]
    fn derived_length_is_bounded(id in identifiers(63).unwrap(), kind in any_kind()) {
        let name = resource_name(id.as_str(), kind);
        prop_assert!(name.len() <= 63 + kind.suffix().len());
        prop_assert!(name.len() <= kind.max_name_length());
    }

    #[test]
    fn base_name_is_idempotent(raw in "[a-z0-9-]{0,80}") {
        let once = base_name(&raw);
        prop_assert_eq!(base_name(once), once);
        prop_assert!(!once.ends_with('-'));
        prop_assert!(once.chars().count() <= 63);
    }

    #[test]
    fn valid_identifiers_are_their_own_base(id in identifiers(63).unwrap()) {
        prop_assert_eq!(id.base_name(), id.as_str());
    }

    #[test]
    fn different_bases_give_different_names(
        (a, b) in identifier_pairs(63).unwrap(),
        kind in any_kind(),
    ) {
        prop_assume!(a.base_name() != b.base_name());
        prop_assert_ne!(a.resource_name(kind), b.resource_name(kind));
    }

    #[test]
    fn names_start_with_base(raw in "[a-z0-9-]{0,80}", kind in any_kind()) {
        let name = resource_name(&raw, kind);
        prop_assert!(name.starts_with(base_name(&raw)));
        prop_assert!(name.ends_with(kind.suffix()));
    }
}

#[test]
fn my_release_scenario() {
    let id = Identifier::parse("my-release").unwrap();
    assert_eq!(id.base_name(), "my-release");
    assert_eq!(id.resource_name(ResourceKind::Cluster), "my-release");
    assert_eq!(id.resource_name(ResourceKind::ControlPlane), "my-release-cp");
    assert_eq!(id.resource_name(ResourceKind::WorkerMachineTemplate), "my-release-worker-mt");
    assert_eq!(id.resource_name(ResourceKind::WorkerConfigTemplate), "my-release-machine-config");
    assert_eq!(id.resource_name(ResourceKind::MachineDeployment), "my-release-md");
}

#[test]
fn sixty_five_characters_rejected_but_truncatable() {
    let raw = "a".repeat(65);
    assert!(Identifier::parse(raw.as_str()).is_err());
    assert_eq!(base_name(&raw), "a".repeat(63));
}

#[test]
fn invalid_hyphen_placements_are_rejected() {
    assert!(naming::validate("a--").is_err());
    assert!(naming::validate("a--b").is_err());
    assert!(naming::validate("a-b-").is_err());
    assert!(naming::validate("-a").is_err());
    assert!(naming::validate("a-b").is_ok());
}

#[test]
fn collapsing_pair_shares_base() {
    // "foo-" is not a valid identifier, but the rule still maps it onto "foo"
    assert!(Identifier::parse("foo-").is_err());
    assert_eq!(base_name("foo-"), base_name("foo"));
    assert_eq!(resource_name("foo-", ResourceKind::ControlPlane), "foo-cp");
}

#[test]
fn empty_base_yields_bare_suffix() {
    assert_eq!(resource_name("---", ResourceKind::ControlPlane), "-cp");
    assert_eq!(resource_name("-", ResourceKind::Cluster), "");
}

#[test]
fn long_names_are_not_retruncated() {
    let id = "b".repeat(63);
    let name = resource_name(&id, ResourceKind::WorkerConfigTemplate);
    assert_eq!(name.len(), 63 + "-machine-config".len());
    assert!(naming::exceeds_name_limit(&name));
}
