mod common;

use common::*;
use phpsema::types::Visibility;
use phpsema::{BuildError, ClasslikeInfoBuilder};

// ─── Parent/child flattening ────────────────────────────────────────────────

#[test]
fn test_child_inherits_parent_method_with_provenance() {
    let mut base = class("A\\Base", "base.php");
    base.methods.push(method("test", &["int"]));

    let mut child = class("A\\Child", "child.php");
    child.parents.push("A\\Base".to_string());
    child.methods.push(method("own", &["string"]));

    let store = store_with(vec![base, child]);
    let names = bare_resolver();
    let builder = ClasslikeInfoBuilder::new(&store, &names);

    let info = builder.build("A\\Child").unwrap();

    assert_eq!(info.parents, vec!["A\\Base"]);

    let inherited = info.methods.get("test").expect("inherited method present");
    assert_eq!(inherited.declaring_structure, "A\\Base");
    assert_eq!(inherited.override_of.as_deref(), Some("A\\Base"));
    assert_eq!(inherited.return_types[0].resolved.as_deref(), Some("int"));

    let own = info.methods.get("own").expect("own method present");
    assert_eq!(own.declaring_structure, "A\\Child");
}

#[test]
fn test_parent_closure_is_nearest_first() {
    let grand = class("Grand", "a.php");
    let mut mid = class("Mid", "a.php");
    mid.parents.push("Grand".to_string());
    let mut leaf = class("Leaf", "a.php");
    leaf.parents.push("Mid".to_string());

    let store = store_with(vec![grand, mid, leaf]);
    let names = bare_resolver();
    let builder = ClasslikeInfoBuilder::new(&store, &names);

    let info = builder.build("Leaf").unwrap();
    assert_eq!(info.parents, vec!["Mid", "Grand"]);
}

#[test]
fn test_redeclared_method_records_nearest_override() {
    let mut grand = class("Grand", "a.php");
    grand.methods.push(method("render", &["string"]));
    let mut mid = class("Mid", "a.php");
    mid.parents.push("Grand".to_string());
    mid.methods.push(method("render", &["string"]));
    let mut leaf = class("Leaf", "a.php");
    leaf.parents.push("Mid".to_string());
    leaf.methods.push(method("render", &["string"]));

    let store = store_with(vec![grand, mid, leaf]);
    let names = bare_resolver();
    let builder = ClasslikeInfoBuilder::new(&store, &names);

    let info = builder.build("Leaf").unwrap();
    let render = info.methods.get("render").unwrap();
    assert_eq!(render.declaring_structure, "Leaf");
    assert_eq!(render.override_of.as_deref(), Some("Mid"));
}

#[test]
fn test_provenance_propagates_through_middle_class() {
    let mut grand = class("Grand", "a.php");
    grand.methods.push(method("render", &["string"]));
    let mut mid = class("Mid", "a.php");
    mid.parents.push("Grand".to_string());
    let mut leaf = class("Leaf", "a.php");
    leaf.parents.push("Mid".to_string());

    let store = store_with(vec![grand, mid, leaf]);
    let names = bare_resolver();
    let builder = ClasslikeInfoBuilder::new(&store, &names);

    // The method travelled Grand -> Mid -> Leaf untouched; it still names
    // Grand on both provenance fields.
    let info = builder.build("Leaf").unwrap();
    let render = info.methods.get("render").unwrap();
    assert_eq!(render.declaring_structure, "Grand");
    assert_eq!(render.override_of.as_deref(), Some("Grand"));
}

#[test]
fn test_private_parent_members_are_not_inherited() {
    let mut base = class("Base", "a.php");
    base.methods
        .push(method_with("secret", &["int"], Visibility::Private));
    base.methods
        .push(method_with("shared", &["int"], Visibility::Protected));
    base.properties.push(property_with(
        "hidden",
        &["string"],
        Visibility::Private,
        false,
    ));

    let mut child = class("Child", "a.php");
    child.parents.push("Base".to_string());

    let store = store_with(vec![base, child]);
    let names = bare_resolver();
    let builder = ClasslikeInfoBuilder::new(&store, &names);

    let info = builder.build("Child").unwrap();
    assert!(info.methods.get("secret").is_none());
    assert!(info.properties.get("hidden").is_none());
    assert!(info.methods.get("shared").is_some());
}

#[test]
fn test_inherited_constants_and_properties() {
    let mut base = class("Base", "a.php");
    base.constants.push(constant("MAX_SIZE", &["int"]));
    base.properties.push(property("name", &["string"]));

    let mut child = class("Child", "a.php");
    child.parents.push("Base".to_string());

    let store = store_with(vec![base, child]);
    let names = bare_resolver();
    let builder = ClasslikeInfoBuilder::new(&store, &names);

    let info = builder.build("Child").unwrap();
    assert_eq!(
        info.constants.get("MAX_SIZE").unwrap().declaring_structure,
        "Base"
    );
    assert_eq!(
        info.properties.get("name").unwrap().declaring_structure,
        "Base"
    );
}

// ─── Failure modes ──────────────────────────────────────────────────────────

#[test]
fn test_unknown_classlike_fails() {
    let store = store_with(vec![]);
    let names = bare_resolver();
    let builder = ClasslikeInfoBuilder::new(&store, &names);

    assert_eq!(
        builder.build("Missing"),
        Err(BuildError::UnknownClasslike {
            fqcn: "Missing".to_string()
        })
    );
}

#[test]
fn test_unknown_parent_is_skipped() {
    let mut child = class("Child", "a.php");
    child.parents.push("Gone".to_string());
    child.methods.push(method("own", &["int"]));

    let store = store_with(vec![child]);
    let names = bare_resolver();
    let builder = ClasslikeInfoBuilder::new(&store, &names);

    let info = builder.build("Child").unwrap();
    assert!(info.parents.is_empty());
    assert!(info.methods.get("own").is_some());
    // The direct relation stays visible even though it could not be built.
    assert_eq!(info.direct_parents, vec!["Gone"]);
}

#[test]
fn test_two_class_cycle_fails_the_build() {
    let mut a = class("A", "a.php");
    a.parents.push("B".to_string());
    let mut b = class("B", "a.php");
    b.parents.push("A".to_string());

    let store = store_with(vec![a, b]);
    let names = bare_resolver();
    let builder = ClasslikeInfoBuilder::new(&store, &names);

    assert_eq!(
        builder.build("A"),
        Err(BuildError::CircularDependency {
            origin: "A".to_string(),
            detected_at: "A".to_string(),
        })
    );
}

#[test]
fn test_self_extending_class_fails_the_build() {
    let mut a = class("A", "a.php");
    a.parents.push("A".to_string());

    let store = store_with(vec![a]);
    let names = bare_resolver();
    let builder = ClasslikeInfoBuilder::new(&store, &names);

    assert!(matches!(
        builder.build("A"),
        Err(BuildError::CircularDependency { .. })
    ));
}

#[test]
fn test_flattened_info_round_trips_through_json() {
    let mut base = class("Base", "a.php");
    base.methods.push(method("render", &["string"]));
    let mut child = class("Child", "a.php");
    child.parents.push("Base".to_string());

    let store = store_with(vec![base, child]);
    let names = bare_resolver();
    let builder = ClasslikeInfoBuilder::new(&store, &names);

    let info = builder.build("Child").unwrap();
    let json = serde_json::to_string(&info).unwrap();
    let back: phpsema::types::ClasslikeInfo = serde_json::from_str(&json).unwrap();
    assert_eq!(back, info);
}

#[test]
fn test_diamond_ancestry_is_not_a_cycle() {
    // Interfaces may reach the same ancestor along two paths; that is a
    // diamond, not a cycle, and must flatten cleanly without duplicates.
    let top = interface("Top", "a.php");
    let mut left = interface("Left", "a.php");
    left.parents.push("Top".to_string());
    let mut right = interface("Right", "a.php");
    right.parents.push("Top".to_string());
    let mut bottom = class("Bottom", "a.php");
    bottom.interfaces.push("Left".to_string());
    bottom.interfaces.push("Right".to_string());

    let store = store_with(vec![top, left, right, bottom]);
    let names = bare_resolver();
    let builder = ClasslikeInfoBuilder::new(&store, &names);

    let info = builder.build("Bottom").unwrap();
    assert_eq!(info.interfaces, vec!["Left", "Top", "Right"]);
}
