//! End-to-end containment checks with the built-in matchers registered.

use haystack::{Comparator, ErrorKind, JwtTokenStore, MatcherError, PathSegment};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};

fn order() -> Value {
    json!({
        "id": "ord-1042",
        "status": "shipped",
        "total": 129.95,
        "items": [
            {"sku": "A-1", "qty": 2, "tags": ["gift", "fragile"]},
            {"sku": "B-7", "qty": 1, "tags": []}
        ],
        "customer": {"email": "jane@example.com", "vip": true, "phone": null}
    })
}

#[test]
fn test_partial_document_is_contained() {
    let c = Comparator::with_default_matchers();
    let needle = json!({
        "status": "shipped",
        "items": [{"sku": "B-7"}],
        "customer": {"vip": true, "phone": null}
    });
    assert!(c.compare(&needle, &order()).is_ok());
}

#[test]
fn test_matchers_across_document() {
    let c = Comparator::with_default_matchers();
    let needle = json!({
        "id": "@regExp(/^ORD-\\d+$/i)",
        "total": "@gt(100)",
        "items": "@arrayLength(2)",
        "items[0]": {"qty": "@variableType(int)", "tags": "@arrayMinLength(1)"},
        "items[1]": {"tags": "@arrayMaxLength(0)"},
        "customer": {"email": "@regExp(@example\\.com$)", "phone": "@variableType(null)"}
    });
    assert!(c.compare(&needle, &order()).is_ok());
}

#[test]
fn test_array_length_failure_reports_matcher() {
    let c = Comparator::with_default_matchers();
    let err = c
        .compare(&json!({"items": "@arrayLength(3)"}), &order())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MatcherFailed);
    assert_eq!(err.path(), &[PathSegment::Key("items".into())]);
    assert_eq!(err.needle(), &json!("@arrayLength(3)"));
    assert!(matches!(
        err.matcher_error(),
        Some(MatcherError::LengthMismatch {
            expected: 3,
            actual: 2
        })
    ));
}

#[test]
fn test_failure_path_through_indexed_key() {
    let c = Comparator::with_default_matchers();
    let err = c
        .compare(&json!({"items[0]": {"qty": "@lt(2)"}}), &order())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MatcherFailed);
    assert_eq!(err.path_string(), "items[0].qty");
    assert_eq!(
        err.message(),
        "Matcher \"lt\" failed for key \"qty\": \"2\" is not less than \"2\"."
    );
}

#[test]
fn test_variable_type_aliases() {
    let c = Comparator::with_default_matchers();
    let haystack = json!({"n": 5, "f": 0.5, "b": false});
    for (int, bool_, float) in [("int", "bool", "float"), ("integer", "boolean", "double")] {
        let needle = json!({
            "n": format!("@variableType({int})"),
            "b": format!("@variableType({bool_})"),
            "f": format!("@variableType({float})"),
        });
        assert!(c.compare(&needle, &haystack).is_ok());
    }
}

#[test]
fn test_matcher_calls_inside_lists() {
    let c = Comparator::with_default_matchers();
    let haystack = json!({"scores": [3, 18, 42]});
    assert!(c.compare(&json!({"scores": ["@gt(40)", "@lt(5)"]}), &haystack).is_ok());

    let err = c
        .compare(&json!({"scores": ["@gt(100)"]}), &haystack)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ElementNotFound);
    assert_eq!(err.path_string(), "scores");
}

#[test]
fn test_registering_overwrites_builtin() {
    let mut c = Comparator::with_default_matchers();
    c.register("gt", |_: &Value, _: &str| -> Result<(), MatcherError> {
        Err(MatcherError::custom("always fails"))
    });
    let err = c.compare(&json!({"n": "@gt(0)"}), &json!({"n": 10})).unwrap_err();
    assert_eq!(err.matcher_error().unwrap().to_string(), "always fails");
}

#[test]
fn test_custom_matcher_alongside_builtins() {
    let mut c = Comparator::with_default_matchers();
    c.register("uuid", |actual: &Value, _: &str| match actual.as_str() {
        Some(s) if s.len() == 36 && s.chars().filter(|&ch| ch == '-').count() == 4 => Ok(()),
        _ => Err(MatcherError::custom("not a uuid")),
    });
    let haystack = json!({"id": "123e4567-e89b-12d3-a456-426614174000", "n": [1]});
    assert!(c
        .compare(&json!({"id": "@uuid()", "n": "@arrayLength(1)"}), &haystack)
        .is_ok());
    assert_eq!(c.registry().len(), 9);
}

#[test]
fn test_unregistered_matcher_name_compares_literally() {
    let c = Comparator::with_default_matchers();
    assert!(c
        .compare(&json!({"s": "@between(1,2)"}), &json!({"s": "@between(1,2)"}))
        .is_ok());
    let err = c
        .compare(&json!({"s": "@between(1,2)"}), &json!({"s": 1}))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ValueMismatch);
}

#[test]
fn test_list_vs_object_shapes_differ() {
    let c = Comparator::with_default_matchers();
    assert_eq!(
        c.compare(&json!({"a": []}), &json!({"a": {}})).unwrap_err().kind(),
        ErrorKind::TypeMismatch
    );
    assert_eq!(
        c.compare(&json!([]), &json!({})).unwrap_err().kind(),
        ErrorKind::TypeMismatch
    );
}

#[test]
fn test_report_shows_both_fragments() {
    let c = Comparator::with_default_matchers();
    let err = c
        .compare(&json!({"customer": {"email": "bob@example.com"}}), &order())
        .unwrap_err();
    let report = err.to_string();
    assert!(report.contains("Value mismatch for key \"email\"."));
    assert!(report.contains("Path: customer.email"));
    assert!(report.contains("\"bob@example.com\""));
    assert!(report.contains("\"jane@example.com\""));
}

#[test]
fn test_compare_json_documents() {
    let c = Comparator::with_default_matchers();
    let haystack = order().to_string();
    assert!(c
        .compare_json(r#"{"items": "@arrayMinLength(2)"}"#, &haystack)
        .is_ok());
    let err = c.compare_json(r#"{"status": "lost"}"#, &haystack).unwrap_err();
    assert_eq!(err.comparison().unwrap().kind(), ErrorKind::ValueMismatch);
}

#[test]
fn test_jwt_end_to_end() {
    let tokens = JwtTokenStore::new();
    let c = Comparator::with_jwt_tokens(tokens.clone());

    let claims = json!({"sub": "user-9", "roles": ["admin", "ops"], "iat": 1_700_000_000});
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(b"top-secret"),
    )
    .unwrap();
    let haystack = json!({"auth": {"token": token}});

    // Registered after the comparator was built; the store is shared.
    tokens.add("session", json!({"sub": "user-9", "roles": ["ops"]}), "top-secret");
    assert!(c
        .compare(&json!({"auth": {"token": "@jwt(session)"}}), &haystack)
        .is_ok());

    tokens.add("session", json!({"roles": ["root"]}), "top-secret");
    let err = c
        .compare(&json!({"auth": {"token": "@jwt(session)"}}), &haystack)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MatcherFailed);
    assert_eq!(err.path_string(), "auth.token");
    assert!(matches!(
        err.matcher_error(),
        Some(MatcherError::JwtMismatch(inner)) if inner.kind() == ErrorKind::ElementNotFound
    ));
}
