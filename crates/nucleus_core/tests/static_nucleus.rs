use nucleus_core::{
    call_encoded, interface_schema, CallValue, EntryDef, InterfaceSchemaType, Nucleus,
    NucleusError, NucleusRegistry, STATIC_NUCLEUS_TYPE,
};
use serde_json::json;

const SOURCE: &str = r#"{
    "functions": [
        { "name": "greet", "schema": "string", "returns": "hello" },
        { "name": "echo", "schema": "json" },
        { "name": "broken", "schema": "string", "error": "boom" }
    ],
    "entries": {
        "post": { "required": ["title"], "fields": { "title": "^[a-z ]+$" } },
        "tag": { "pattern": "^#[a-z]+$", "max_length": 8 }
    }
}"#;

fn create() -> Box<dyn Nucleus> {
    let mut registry = NucleusRegistry::<()>::new();
    registry
        .register_builtin_nucleii()
        .expect("builtin registration");
    registry
        .create(&(), STATIC_NUCLEUS_TYPE, SOURCE)
        .expect("static nucleus should load")
}

#[test]
fn exposes_functions_in_declaration_order() {
    let nucleus = create();
    let exposed: Vec<(&str, InterfaceSchemaType)> = nucleus
        .interfaces()
        .iter()
        .map(|interface| (interface.name.as_str(), interface.schema))
        .collect();
    assert_eq!(
        exposed,
        vec![
            ("greet", InterfaceSchemaType::String),
            ("echo", InterfaceSchemaType::Json),
            ("broken", InterfaceSchemaType::String),
        ]
    );
    for (name, schema) in exposed {
        assert_eq!(interface_schema(&nucleus, name).expect("schema lookup"), schema);
    }
}

#[test]
fn serves_constant_echo_and_failing_functions() {
    let mut nucleus = create();

    let greeting = nucleus
        .call("greet", CallValue::from("anyone"))
        .expect("greet call");
    assert_eq!(greeting, CallValue::from("hello"));

    let echoed = nucleus
        .call("echo", CallValue::Json(json!({"n": 3})))
        .expect("echo call");
    assert_eq!(echoed, CallValue::Json(json!({"n": 3})));

    let err = nucleus
        .call("broken", CallValue::from(""))
        .expect_err("broken must fail");
    assert_eq!(err, NucleusError::Execution("boom".to_string()));
}

#[test]
fn call_rejects_unknown_function_and_mismatched_params() {
    let mut nucleus = create();

    let err = nucleus
        .call("missing", CallValue::from(""))
        .expect_err("missing function must fail");
    assert_eq!(err.to_string(), "function not found: missing");

    let err = nucleus
        .call("echo", CallValue::from("not json"))
        .expect_err("string params for json function must fail");
    assert!(matches!(
        err,
        NucleusError::SchemaMismatch {
            expected: InterfaceSchemaType::Json,
            actual: InterfaceSchemaType::String,
            ..
        }
    ));
}

#[test]
fn call_encoded_drives_static_functions() {
    let mut nucleus = create();
    assert_eq!(
        call_encoded(&mut nucleus, "echo", "[1, 2]").expect("echo call"),
        "[1,2]"
    );
    assert_eq!(
        call_encoded(&mut nucleus, "greet", "").expect("greet call"),
        "hello"
    );
}

#[test]
fn validates_json_entries_against_declared_rules() {
    let nucleus = create();
    let post = EntryDef::new("post", InterfaceSchemaType::Json);

    nucleus
        .validate_entry(&post, &CallValue::Json(json!({"title": "hello world"})))
        .expect("valid post");

    let err = nucleus
        .validate_entry(&post, &CallValue::Json(json!({"body": "x"})))
        .expect_err("missing title must fail");
    assert_eq!(
        err,
        NucleusError::Validation {
            entry: "post".to_string(),
            rule: "required:title".to_string(),
        }
    );

    let err = nucleus
        .validate_entry(&post, &CallValue::Json(json!({"title": null})))
        .expect_err("null title must fail");
    assert!(matches!(err, NucleusError::Validation { rule, .. } if rule == "required:title"));

    let err = nucleus
        .validate_entry(&post, &CallValue::Json(json!({"title": "Shouting"})))
        .expect_err("pattern violation must fail");
    assert!(matches!(err, NucleusError::Validation { rule, .. } if rule == "pattern:title"));

    let err = nucleus
        .validate_entry(&post, &CallValue::Json(json!(["title"])))
        .expect_err("non-object entry must fail");
    assert!(matches!(err, NucleusError::Validation { rule, .. } if rule == "object"));
}

#[test]
fn validates_string_entries_against_declared_rules() {
    let nucleus = create();
    let tag = EntryDef::new("tag", InterfaceSchemaType::String);

    nucleus
        .validate_entry(&tag, &CallValue::from("#rust"))
        .expect("valid tag");

    let err = nucleus
        .validate_entry(&tag, &CallValue::from("#waytoolong"))
        .expect_err("long tag must fail");
    assert!(matches!(err, NucleusError::Validation { rule, .. } if rule == "max_length"));

    let err = nucleus
        .validate_entry(&tag, &CallValue::from("rust"))
        .expect_err("unprefixed tag must fail");
    assert!(matches!(err, NucleusError::Validation { rule, .. } if rule == "pattern"));
}

#[test]
fn declared_rules_reject_entries_of_the_other_shape() {
    let nucleus = create();

    let err = nucleus
        .validate_entry(
            &EntryDef::new("tag", InterfaceSchemaType::Json),
            &CallValue::Json(json!("NOT A TAG AT ALL")),
        )
        .expect_err("json entry under string rules must fail");
    assert_eq!(
        err,
        NucleusError::Validation {
            entry: "tag".to_string(),
            rule: "string".to_string(),
        }
    );

    let err = nucleus
        .validate_entry(
            &EntryDef::new("post", InterfaceSchemaType::String),
            &CallValue::from("just a title"),
        )
        .expect_err("string entry under object rules must fail");
    assert_eq!(
        err,
        NucleusError::Validation {
            entry: "post".to_string(),
            rule: "object".to_string(),
        }
    );
}

#[test]
fn entry_format_must_match_definition_and_unruled_types_pass() {
    let nucleus = create();

    let err = nucleus
        .validate_entry(
            &EntryDef::new("tag", InterfaceSchemaType::String),
            &CallValue::Json(json!("#rust")),
        )
        .expect_err("json value for string entry must fail");
    assert!(matches!(err, NucleusError::SchemaMismatch { .. }));

    nucleus
        .validate_entry(
            &EntryDef::new("comment", InterfaceSchemaType::Json),
            &CallValue::Json(json!(42)),
        )
        .expect("entry types without rules are valid");
}

#[test]
fn malformed_source_fails_creation_without_panicking() {
    let mut registry = NucleusRegistry::<()>::new();
    registry
        .register_builtin_nucleii()
        .expect("builtin registration");
    let err = registry
        .create(&(), STATIC_NUCLEUS_TYPE, "(not json)")
        .err()
        .expect("malformed source must fail");
    assert!(matches!(err, NucleusError::Load(_)));
}
