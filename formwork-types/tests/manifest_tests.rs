use formwork_types::{ModuleManifest, Pairing, PairingStrength};

#[test]
fn builder_fills_capability_lists() {
    let m = ModuleManifest::new("mock-db", "0.1.0")
        .provides(["database-adapter", "introspection"])
        .publishes("database.schema", "The current database schema");

    assert_eq!(m.name, "mock-db");
    assert_eq!(m.provides, vec!["database-adapter", "introspection"]);
    assert!(m.requires.is_empty());
    assert_eq!(
        m.publishes.get("database.schema").map(String::as_str),
        Some("The current database schema")
    );
}

#[test]
fn pairs_with_carries_strength() {
    let m = ModuleManifest::new("resource-module", "0.1.0")
        .requires(["database-adapter"])
        .pairs_with(
            "mock-db",
            Pairing::new("supplies the database-adapter capability", PairingStrength::Recommended),
        );

    let pairing = m.pairs_with.get("mock-db").unwrap();
    assert_eq!(pairing.strength, PairingStrength::Recommended);
    assert!(pairing.category.is_none());
}

#[test]
fn manifest_serializes_camel_case() {
    let mut m = ModuleManifest::new("payments", "0.1.0");
    m.optional_dependencies.push("admin-ui".into());

    let json = serde_json::to_value(&m).unwrap();
    assert_eq!(json["name"], "payments");
    assert_eq!(json["optionalDependencies"][0], "admin-ui");
    // Empty capability lists stay off the wire
    assert!(json.get("provides").is_none());
    assert!(json.get("pairsWith").is_none());
}

#[test]
fn manifest_deserializes_sparse_json() {
    let m: ModuleManifest = serde_json::from_str(
        r#"{
            "name": "node-adapter",
            "version": "0.0.1",
            "provides": ["database-adapter"],
            "publishes": {"database.schema": "The remote database schema"}
        }"#,
    )
    .unwrap();

    assert_eq!(m.version, "0.0.1");
    assert_eq!(m.provides, vec!["database-adapter"]);
    assert!(m.pairs_with.is_empty());
}

#[test]
fn pairing_strength_serde_snake_case() {
    assert_eq!(
        serde_json::to_string(&PairingStrength::Recommended).unwrap(),
        "\"recommended\""
    );
    assert_eq!(
        serde_json::to_string(&PairingStrength::Required).unwrap(),
        "\"required\""
    );
}
