use serde_json::json;
use sessionkit_core::{JsonSerializer, Serializer, SessionError, SessionRecord};

fn record(value: serde_json::Value) -> SessionRecord {
    value.as_object().cloned().expect("object")
}

#[test]
fn json_stringify_is_compact() {
    let data = record(json!({"userId": 7}));
    let out = JsonSerializer.stringify(&data).unwrap();
    assert_eq!(out, r#"{"userId":7}"#);
}

#[tokio::test]
async fn json_parse_reads_back_records() {
    let data = record(json!({"cart": [1, 2], "flash": null, "nested": {"ok": true}}));
    let raw = JsonSerializer::new().stringify(&data).unwrap();
    assert_eq!(JsonSerializer.parse(&raw).await.unwrap(), data);
}

#[tokio::test]
async fn json_parse_empty_object() {
    let parsed = JsonSerializer.parse("{}").await.unwrap();
    assert!(parsed.is_empty());
}

#[tokio::test]
async fn json_parse_rejects_invalid_input() {
    let err = JsonSerializer.parse("{not json").await.unwrap_err();
    assert!(matches!(err, SessionError::Serialization(_)));
}

#[tokio::test]
async fn json_parse_rejects_non_object() {
    for raw in ["42", "\"text\"", "[1,2]", "null"] {
        let err = JsonSerializer.parse(raw).await.unwrap_err();
        assert!(
            matches!(err, SessionError::Serialization(_)),
            "{raw} should not parse as a record"
        );
    }
}

#[tokio::test]
async fn serializer_as_trait_object() {
    let serializer: Box<dyn Serializer> = Box::new(JsonSerializer);
    let data = record(json!({"a": 1}));
    let raw = serializer.stringify(&data).unwrap();
    assert_eq!(serializer.parse(&raw).await.unwrap(), data);
}
