//! The textual extractor agrees with a validating YAML parser.

use chartname_cli::generator::identifiers;
use chartname_cli::manifest::extract;
use chartname_cli::naming::ResourceKind;
use chartname_cli::test_utils::StubRenderer;
use proptest::prelude::*;
use serde::Deserialize;
use std::collections::BTreeMap;

/// kind → metadata.name as seen by `serde_yaml`.
fn parse_with_yaml(raw: &str) -> BTreeMap<String, String> {
    let mut table = BTreeMap::new();
    for document in serde_yaml::Deserializer::from_str(raw) {
        let value = serde_yaml::Value::deserialize(document).unwrap();
        let kind = value.get("kind").and_then(serde_yaml::Value::as_str);
        let name = value
            .get("metadata")
            .and_then(|m| m.get("name"))
            .and_then(serde_yaml::Value::as_str);
        if let (Some(kind), Some(name)) = (kind, name) {
            table.insert(kind.to_string(), name.to_string());
        }
    }
    table
}

fn to_map(raw: &str) -> BTreeMap<String, String> {
    extract(raw).iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn agrees_on_faithful_output(id in identifiers(63).unwrap()) {
        let raw = StubRenderer::faithful().output_for(id.as_str());
        let textual = to_map(&raw);
        prop_assert_eq!(textual.len(), 5);
        prop_assert_eq!(textual, parse_with_yaml(&raw));
    }

    #[test]
    fn agrees_on_arbitrary_names(
        names in proptest::collection::vec("[a-z0-9][a-z0-9.-]{0,40}", 5),
        dropped in proptest::option::of(0usize..5),
    ) {
        let by_kind: BTreeMap<ResourceKind, String> =
            ResourceKind::ALL.into_iter().zip(names).collect();
        let dropped = dropped.map(|i| ResourceKind::ALL[i]);
        let stub = StubRenderer::with_namer(move |_, kind| {
            (Some(kind) != dropped).then(|| by_kind[&kind].clone())
        });

        let raw = stub.output_for("release");
        let textual = to_map(&raw);
        prop_assert_eq!(textual.len(), if dropped.is_some() { 4 } else { 5 });
        prop_assert_eq!(textual, parse_with_yaml(&raw));
    }
}

#[test]
fn skips_fragments_without_required_fields() {
    let raw = "---\n# Source: chart/templates/notes.yaml\n# only comments\n---\n\
               apiVersion: v1\nkind: ConfigMap\ndata:\n  name: not-metadata\n---\n\
               apiVersion: v1\nmetadata:\n  name: no-kind\n---\n\
               kind: Cluster\nmetadata:\n  name: 'demo'\n";
    let facts = extract(raw);
    assert_eq!(facts.len(), 1);
    assert_eq!(facts.name_for(ResourceKind::Cluster), Some("demo"));
    assert_eq!(to_map(raw), parse_with_yaml(raw));
}

#[test]
fn kind_after_metadata_block() {
    let raw = "metadata:\n  name: \"demo-md\"\napiVersion: cluster.x-k8s.io/v1beta1\nkind: MachineDeployment\n";
    assert_eq!(extract(raw).name_for(ResourceKind::MachineDeployment), Some("demo-md"));
}
