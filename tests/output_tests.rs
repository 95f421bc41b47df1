use thyme_lang::output::{from_json, to_json, to_json_pretty, to_yaml, to_yaml_stream};
use thyme_lang::{eval_document, parse, register_builtins, Scope, Value};

fn render_yaml(input: &str) -> String {
    let scope = Scope::new(None);
    register_builtins(&scope);

    let doc = match parse(input, "render.thyme") {
        Ok(doc) => doc,
        Err(e) => panic!("parse error:\n{}", e),
    };
    let result = match eval_document(&doc, &scope) {
        Ok(result) => result,
        Err(e) => panic!("eval error: {}", e),
    };

    let docs = match &result {
        Value::Array(arr) => arr.borrow().clone(),
        other => panic!("expected documents, got {}", other.type_name()),
    };
    to_yaml_stream(&docs)
}

// ============================================================================
// YAML scalars
// ============================================================================

#[test]
fn test_yaml_scalars() {
    assert_eq!(to_yaml(&Value::Null), "null\n");
    assert_eq!(to_yaml(&Value::Bool(true)), "true\n");
    assert_eq!(to_yaml(&Value::Number(42.0)), "42\n");
    assert_eq!(to_yaml(&Value::Number(2.5)), "2.5\n");
    assert_eq!(to_yaml(&Value::string("plain")), "plain\n");
}

#[test]
fn test_yaml_whole_numbers_have_no_decimal_point() {
    assert_eq!(to_yaml(&Value::Number(8.0)), "8\n");
    assert_eq!(to_yaml(&Value::Number(-3.0)), "-3\n");
}

#[test]
fn test_yaml_string_quoting() {
    // Strings a YAML parser would reread as another type must be quoted
    assert_eq!(to_yaml(&Value::string("true")), "\"true\"\n");
    assert_eq!(to_yaml(&Value::string("null")), "\"null\"\n");
    assert_eq!(to_yaml(&Value::string("8080")), "\"8080\"\n");
    assert_eq!(to_yaml(&Value::string("")), "\"\"\n");
    assert_eq!(to_yaml(&Value::string("a: b")), "\"a: b\"\n");
    assert_eq!(to_yaml(&Value::string("- item")), "\"- item\"\n");

    // Ordinary identifiers, paths, and versions stay plain
    assert_eq!(to_yaml(&Value::string("my-app")), "my-app\n");
    assert_eq!(to_yaml(&Value::string("apps/v1")), "apps/v1\n");
    assert_eq!(to_yaml(&Value::string("v1.2.3")), "v1.2.3\n");
}

#[test]
fn test_yaml_string_escaping() {
    assert_eq!(to_yaml(&Value::string("line1\nline2")), "\"line1\\nline2\"\n");
    assert_eq!(to_yaml(&Value::string("say \"hi\"")), "\"say \\\"hi\\\"\"\n");
}

// ============================================================================
// YAML containers
// ============================================================================

#[test]
fn test_yaml_object_sorted_keys() {
    let obj = Value::object_from(vec![
        ("replicas".to_string(), Value::Number(3.0)),
        ("apiVersion".to_string(), Value::string("apps/v1")),
    ]);
    assert_eq!(to_yaml(&obj), "apiVersion: apps/v1\nreplicas: 3\n");
}

#[test]
fn test_yaml_nested_object_indents() {
    let yaml = render_yaml("metadata: {\n  labels: {\n    app: \"web\"\n  }\n}");
    assert_eq!(yaml, "---\nmetadata:\n  labels:\n    app: web\n");
}

#[test]
fn test_yaml_array_of_scalars() {
    let yaml = render_yaml("ports: [80, 443]");
    assert_eq!(yaml, "---\nports:\n  - 80\n  - 443\n");
}

#[test]
fn test_yaml_array_of_objects_merges_dash() {
    let yaml = render_yaml(
        "containers: [\n  {name: \"app\", image: \"app:1\"}\n]",
    );
    assert_eq!(yaml, "---\ncontainers:\n  - image: app:1\n    name: app\n");
}

#[test]
fn test_yaml_empty_containers_inline() {
    let yaml = render_yaml("metadata: {\n  labels: {}\n  finalizers: []\n}");
    assert_eq!(yaml, "---\nmetadata:\n  finalizers: []\n  labels: {}\n");
}

#[test]
fn test_yaml_multi_document_stream() {
    let yaml = render_yaml("{kind: \"ConfigMap\"}\n{kind: \"Deployment\"}");
    assert_eq!(yaml, "---\nkind: ConfigMap\n---\nkind: Deployment\n");
}

// ============================================================================
// JSON
// ============================================================================

#[test]
fn test_json_compact_sorted() {
    let obj = Value::object_from(vec![
        ("b".to_string(), Value::Number(2.0)),
        ("a".to_string(), Value::Number(1.0)),
    ]);
    assert_eq!(to_json(&obj), r#"{"a":1,"b":2}"#);
}

#[test]
fn test_json_whole_numbers_are_integers() {
    assert_eq!(to_json(&Value::Number(8.0)), "8");
    assert_eq!(to_json(&Value::Number(2.5)), "2.5");
}

#[test]
fn test_json_pretty() {
    let obj = Value::object_from(vec![("a".to_string(), Value::Number(1.0))]);
    assert_eq!(to_json_pretty(&obj), "{\n  \"a\": 1\n}");
}

#[test]
fn test_json_escapes_strings() {
    assert_eq!(to_json(&Value::string("a\"b")), r#""a\"b""#);
}

// ============================================================================
// Host data conversion
// ============================================================================

#[test]
fn test_from_json_builds_runtime_values() {
    let parsed: serde_json::Value =
        serde_json::from_str(r#"{"app": "web", "replicas": 3, "debug": false, "tags": ["a"]}"#)
            .unwrap();
    let values = from_json(&parsed);

    assert_eq!(values.get_field("app"), Some(Value::string("web")));
    assert_eq!(values.get_field("replicas"), Some(Value::Number(3.0)));
    assert_eq!(values.get_field("debug"), Some(Value::Bool(false)));
    match values.get_field("tags") {
        Some(Value::Array(arr)) => assert_eq!(arr.borrow().len(), 1),
        other => panic!("expected tags array, got {:?}", other),
    }
}

#[test]
fn test_values_flow_end_to_end() {
    let scope = Scope::new(None);
    register_builtins(&scope);

    let parsed: serde_json::Value = serde_json::from_str(r#"{"replicas": 2}"#).unwrap();
    scope.borrow().set_global("Values", from_json(&parsed));

    let doc = parse("replicas: Values.replicas", "deploy.thyme").unwrap();
    let result = eval_document(&doc, &scope).unwrap();
    let docs = match &result {
        Value::Array(arr) => arr.borrow().clone(),
        _ => unreachable!(),
    };

    assert_eq!(to_yaml(&docs[0]), "replicas: 2\n");
}
