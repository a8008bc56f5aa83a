//! Tests for bulk and multi-search body framing

use es_request_kit::{
    BulkIndexRequest, CreateRequest, DeleteRequest, Error, Fireable, IndexRequest, MultiSearchRequest,
    SearchRequest, UpdateRequest,
};
use serde::ser::{Error as _, Serialize, Serializer};
use serde_json::{json, Value};

/// Query payload that refuses to serialize when `broken` is set.
#[derive(Debug, Clone)]
struct Payload {
    body: Value,
    broken: bool,
}

impl Payload {
    fn ok(body: Value) -> Self {
        Self {
            body,
            broken: false,
        }
    }

    fn broken() -> Self {
        Self {
            body: Value::Null,
            broken: true,
        }
    }
}

impl Serialize for Payload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.broken {
            return Err(S::Error::custom("payload cannot be rendered"));
        }
        self.body.serialize(serializer)
    }
}

fn json_line(value: Value) -> String {
    let mut line = serde_json::to_string(&value).unwrap();
    line.push('\n');
    line
}

#[test]
fn test_bulk_index_then_delete() {
    let bulk = BulkIndexRequest::new()
        .with(
            IndexRequest::new("foo", json!({"name": "John", "age": 24}))
                .with_type("bar")
                .with_id("123")
                .with_param("refresh", "true"),
        )
        .with(DeleteRequest::new("foo").with_type("bar").with_id("321"));

    assert_eq!(bulk.method().as_str(), "POST");
    assert_eq!(bulk.path(), "/_bulk");
    assert_eq!(bulk.values().encode(), "");

    let mut got = Vec::new();
    bulk.serialize(&mut got).unwrap();

    let expected = [
        json_line(json!({"index": {"_index": "foo", "_type": "bar", "_id": "123", "refresh": "true"}})),
        json_line(json!({"name": "John", "age": 24})),
        json_line(json!({"delete": {"_index": "foo", "_type": "bar", "_id": "321"}})),
    ]
    .concat();
    let got = String::from_utf8(got).unwrap();
    assert_eq!(got, expected);
    // Two lines for the index operation, one for the delete.
    assert_eq!(got.lines().count(), 3);
}

#[test]
fn test_bulk_create_frames_header_and_source() {
    let bulk = BulkIndexRequest::new()
        .with(
            CreateRequest::new("foo", json!({"name": "Jane"}))
                .with_type("bar")
                .with_id("7")
                .with_param("routing", "r1"),
        )
        .with(DeleteRequest::new("foo").with_type("bar").with_id("8"));

    let request = bulk.to_http_request().unwrap();
    let expected = [
        json_line(json!({"create": {"_index": "foo", "_type": "bar", "_id": "7", "routing": "r1"}})),
        json_line(json!({"name": "Jane"})),
        json_line(json!({"delete": {"_index": "foo", "_type": "bar", "_id": "8"}})),
    ]
    .concat();
    assert_eq!(request.body_str(), Some(expected.as_str()));
}

#[test]
fn test_bulk_preserves_member_order() {
    let ids = ["3", "1", "2"];
    let mut bulk = BulkIndexRequest::new();
    for id in ids {
        bulk.push(IndexRequest::new("foo", json!({"id": id})).with_id(id));
    }

    let mut buf = Vec::new();
    bulk.serialize(&mut buf).unwrap();
    let body = String::from_utf8(buf).unwrap();
    let header_ids: Vec<String> = body
        .lines()
        .step_by(2)
        .map(|line| {
            let v: Value = serde_json::from_str(line).unwrap();
            v["index"]["_id"].as_str().unwrap().to_string()
        })
        .collect();
    assert_eq!(header_ids, ids);
}

#[test]
fn test_bulk_values_ignore_member_options() {
    let bulk = BulkIndexRequest::new()
        .with(DeleteRequest::new("foo").with_id("1").with_param("refresh", "true"))
        .with(UpdateRequest::new("foo", json!({"doc": {}})).with_id("2").with_param("retry_on_conflict", "3"));
    assert!(bulk.values().is_empty());
}

#[test]
fn test_bulk_aborts_on_first_failure() {
    let bulk = BulkIndexRequest::new()
        .with(IndexRequest::new("foo", Payload::ok(json!({"n": 1}))).with_id("1"))
        .with(IndexRequest::new("foo", Payload::broken()).with_id("2"))
        .with(IndexRequest::new("foo", Payload::ok(json!({"n": 3}))).with_id("3"));

    let mut buf = Vec::new();
    let err = bulk.serialize(&mut buf).unwrap_err();
    assert!(matches!(err, Error::PayloadSerialization { .. }));
    assert_eq!(err.context().unwrap().position, Some(1));

    // Output up to the failing body is left in the sink; nothing after it.
    let body = String::from_utf8(buf).unwrap();
    let lines: Vec<&str> = body.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[2], r#"{"index":{"_id":"2","_index":"foo"}}"#);
    assert!(!body.contains("\"n\":3"));
}

#[test]
fn test_bulk_sink_failure_is_io_error() {
    struct FailingSink;
    impl std::io::Write for FailingSink {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    let bulk = BulkIndexRequest::new().with(DeleteRequest::new("foo").with_id("1"));
    let err = bulk.serialize(&mut FailingSink).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn test_multi_search_skips_broken_member() {
    let msearch = MultiSearchRequest::new(vec![
        SearchRequest::new(Payload::ok(json!({"query": {"match_all": {}}}))).with_index("good"),
        SearchRequest::new(Payload::broken()).with_index("bad"),
    ]);

    let mut buf = Vec::new();
    msearch.serialize(&mut buf).unwrap();
    assert_eq!(
        String::from_utf8(buf).unwrap(),
        "{\"index\":[\"good\"]}\n{\"query\":{\"match_all\":{}}}\n"
    );
}

#[test]
fn test_multi_search_all_broken_still_ends_with_newline() {
    let msearch = MultiSearchRequest::new(vec![
        SearchRequest::new(Payload::broken()),
        SearchRequest::new(Payload::broken()).with_type("t"),
    ]);

    let request = msearch.to_http_request().unwrap();
    assert_eq!(&request.body[..], b"\n");
}

#[test]
fn test_multi_search_keeps_members_after_a_gap() {
    let msearch = MultiSearchRequest::new(vec![
        SearchRequest::new(Payload::broken()).with_index("a"),
        SearchRequest::new(Payload::ok(json!({"size": 0}))).with_index("b"),
        SearchRequest::new(Payload::ok(json!({"size": 1}))).with_index("c"),
    ]);

    let request = msearch.to_http_request().unwrap();
    let body = request.body_str().unwrap();
    assert_eq!(body.lines().count(), 4);
    assert!(body.starts_with("{\"index\":[\"b\"]}\n"));
    assert!(body.ends_with("{\"size\":1}\n"));
}

#[test]
fn test_serialization_is_idempotent() {
    let msearch = MultiSearchRequest::new(vec![
        SearchRequest::new(json!({"query": {"term": {"user": "kimchy"}}}))
            .with_indices(["a", "b"])
            .with_types(["t"]),
    ]);
    let bulk = BulkIndexRequest::new()
        .with(IndexRequest::new("foo", json!({"x": 1})).with_id("1"))
        .with(DeleteRequest::new("foo").with_id("2"));

    assert_eq!(
        msearch.to_http_request().unwrap(),
        msearch.to_http_request().unwrap()
    );
    assert_eq!(bulk.to_http_request().unwrap(), bulk.to_http_request().unwrap());
}
