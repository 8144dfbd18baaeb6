use optsync_types::{
    Color, Error, OptionDescriptor, OptionType, OptionValue, ValueList,
};

// ── OptionValue ───────────────────────────────────────────────────

#[test]
fn option_type_follows_variant() {
    assert_eq!(OptionValue::Bool(true).option_type(), OptionType::Bool);
    assert_eq!(OptionValue::Bell(true).option_type(), OptionType::Bell);
    assert_eq!(OptionValue::Color(Color::BLACK).option_type(), OptionType::Color);
    assert_eq!(OptionValue::string_list(["a"]).option_type(), OptionType::List);
}

#[test]
fn string_list_builds_homogeneous_list() {
    let value = OptionValue::string_list(["core", "decoration"]);
    let list = value.as_list().unwrap();
    assert_eq!(list.element_type(), OptionType::String);
    assert_eq!(
        list.items(),
        &[
            OptionValue::String("core".into()),
            OptionValue::String("decoration".into())
        ]
    );
}

#[test]
fn serde_roundtrip_keeps_tagged_shape() {
    let value = OptionValue::Int(42);
    let json = serde_json::to_value(&value).unwrap();
    assert_eq!(json, serde_json::json!({"type": "int", "value": 42}));
    let back: OptionValue = serde_json::from_value(json).unwrap();
    assert_eq!(back, value);
}

// ── ValueList ─────────────────────────────────────────────────────

#[test]
fn value_list_rejects_nested_lists() {
    assert_eq!(ValueList::new(OptionType::List), Err(Error::NestedList));
}

#[test]
fn value_list_rejects_foreign_elements() {
    let mut list = ValueList::new(OptionType::Int).unwrap();
    list.push(OptionValue::Int(1)).unwrap();
    assert_eq!(
        list.push(OptionValue::Float(1.0)),
        Err(Error::ListElementType {
            expected: OptionType::Int,
            found: OptionType::Float
        })
    );
    assert_eq!(list.len(), 1);
}

#[test]
fn value_list_from_values_checks_every_element() {
    let result = ValueList::from_values(
        OptionType::Bool,
        vec![OptionValue::Bool(true), OptionValue::String("x".into())],
    );
    assert!(result.is_err());
}

#[test]
fn empty_list_keeps_element_type() {
    let list = ValueList::new(OptionType::Match).unwrap();
    assert!(list.is_empty());
    assert_eq!(list.element_type(), OptionType::Match);
}

// ── OptionDescriptor ──────────────────────────────────────────────

#[test]
fn descriptor_reports_list_type() {
    let desc = OptionDescriptor::new("active_plugins", OptionValue::string_list(["core"]));
    assert_eq!(desc.option_type(), OptionType::List);
    assert_eq!(desc.list_type(), Some(OptionType::String));
}

#[test]
fn scalar_descriptor_has_no_list_type() {
    let desc = OptionDescriptor::new("hsize", OptionValue::Int(4));
    assert_eq!(desc.option_type(), OptionType::Int);
    assert_eq!(desc.list_type(), None);
}
