use crate::*;
use serde_json::json;

#[test]
fn verbs_list_defaults_kind_to_verb() {
    let schema = super::echo_time();
    let echo = schema.module("echo").unwrap();
    assert_eq!(echo.decls.len(), 1);
    assert_eq!(echo.decls[0].kind, DeclKind::Verb);
    assert!(echo.verb("echo").unwrap().has_outbound_calls());
}

#[test]
fn missing_and_null_fields_degrade_to_defaults() {
    let schema = Schema::from_value(json!({
        "modules": [
            { "name": null, "decls": null },
            { "decls": [ { "kind": "verb", "metadata": null } ] },
            { "name": "m", "verbs": [ { "name": "v", "metadata": [ { "tag": "calls", "calls": null } ] } ] },
            {}
        ]
    }))
    .unwrap();

    assert_eq!(schema.modules.len(), 4);
    assert_eq!(schema.modules[0].name, "");
    assert!(schema.modules[0].decls.is_empty());
    assert_eq!(schema.modules[1].decls[0].name, "");
    assert!(schema.modules[1].decls[0].metadata.is_empty());
    let v = schema.modules[2].verb("v").unwrap();
    assert!(!v.has_outbound_calls());
    assert_eq!(v.calls().count(), 0);
}

#[test]
fn empty_object_is_an_empty_schema() {
    let schema = Schema::from_json("{}").unwrap();
    assert!(schema.modules.is_empty());
}

#[test]
fn non_object_documents_are_rejected() {
    assert!(matches!(
        Schema::from_json("[]"),
        Err(Error::InvalidSchema { .. })
    ));
    assert!(matches!(
        Schema::from_json("not json"),
        Err(Error::SchemaJson(_))
    ));
}

#[test]
fn unknown_kinds_and_extra_fields_are_kept() {
    let schema = Schema::from_value(json!({
        "modules": [ { "name": "m", "decls": [
            { "kind": "widget", "name": "w" },
            { "kind": "type-alias", "name": "Alias", "type": "String" }
        ] } ]
    }))
    .unwrap();
    let m = &schema.modules[0];
    assert_eq!(m.decls[0].kind, DeclKind::Unknown);
    assert_eq!(m.decls[1].kind, DeclKind::TypeAlias);
    assert_eq!(m.decls[1].extra.get("type"), Some(&json!("String")));
}

#[test]
fn accessors_filter_by_kind_in_declared_order() {
    let schema = super::shop();
    let checkout = schema.module("checkout").unwrap();
    let verbs: Vec<_> = checkout.verbs().map(|v| v.name.as_str()).collect();
    assert_eq!(verbs, vec!["pay", "quote"]);
    assert!(checkout.verb("currency").is_none());
    assert_eq!(checkout.decls_of(DeclKind::Config).count(), 1);

    let builtin = schema.module("builtin").unwrap();
    let data: Vec<_> = builtin.data().map(|d| d.name.as_str()).collect();
    assert_eq!(data, vec!["Empty"]);
    assert!(schema.module("missing").is_none());
}

#[test]
fn calls_flatten_every_calls_entry_and_skip_other_tags() {
    let schema = super::shop();
    let pay = schema.module("checkout").unwrap().verb("pay").unwrap();
    let calls: Vec<String> = pay.calls().map(ToString::to_string).collect();
    assert_eq!(
        calls,
        vec![
            "inventory.reserve",
            "inventory.reserve",
            "inventory.release",
            "ledger.record"
        ]
    );

    let quote = schema.module("checkout").unwrap().verb("quote").unwrap();
    assert!(!quote.has_outbound_calls());
}

#[test]
fn ref_display_is_empty_for_default_ref() {
    assert_eq!(Ref::default().to_string(), "");
    assert_eq!(Ref::new("time", "now").to_string(), "time.now");
}
