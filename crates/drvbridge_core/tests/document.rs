//! Document argument resolution tests.

use drvbridge_core::{
    resolve_document_arg, DocumentHandle, DriverError, DriverResult, ErrorInfo, JsonSerializer,
    SodaDocument, SodaFlags, Value, DOCUMENT_ARG_EXPECTED,
};
use drvbridge_testkit::{FakeDocHandle, FakeSodaDatabase};
use serde_json::json;
use std::cell::Cell;

#[test]
fn existing_document_gets_new_reference() {
    let db = FakeSodaDatabase::new();
    let original = SodaDocument::from_handle(FakeDocHandle::new(41));

    let resolved = resolve_document_arg(&db, &original, &JsonSerializer).unwrap();

    assert_eq!(resolved.handle(), original.handle());
    assert_eq!(original.handle().ref_count(), 2);
    assert!(db.created().is_empty());

    drop(resolved);
    assert_eq!(original.handle().ref_count(), 1);
    // the caller's document is still usable
    let again = original.try_clone().unwrap();
    assert_eq!(again.handle().ref_count(), 2);
}

#[test]
fn failed_add_ref_is_reported() {
    let db = FakeSodaDatabase::new();
    let original = SodaDocument::from_handle(FakeDocHandle::new(1));
    original.handle().fail_add_ref(true);

    let err = resolve_document_arg(&db, &original, &JsonSerializer).unwrap_err();

    match err {
        DriverError::ReferenceOperation { operation, info } => {
            assert_eq!(operation, "add_ref");
            assert_eq!(info.fn_name, "dpiSodaDoc_addRef");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(original.handle().ref_count(), 1);
}

#[test]
fn map_creates_document_without_key_or_media_type() {
    let db = FakeSodaDatabase::new();
    let value = Value::from(json!({"k": "v"}));

    let doc = resolve_document_arg(&db, &value, &JsonSerializer).unwrap();

    let created = db.created();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].key, None);
    assert_eq!(created[0].media_type, None);
    assert_eq!(created[0].flags, SodaFlags::DEFAULT);
    assert_eq!(created[0].content, br#"{"k":"v"}"#);
    assert_eq!(doc.handle(), &created[0].handle);
    assert_eq!(doc.handle().ref_count(), 1);
}

#[test]
fn list_creates_document() {
    let db = FakeSodaDatabase::new();
    let value = Value::from(json!([1, 2, 3]));

    resolve_document_arg(&db, &value, &JsonSerializer).unwrap();

    assert_eq!(db.created()[0].content, b"[1,2,3]");
}

#[test]
fn content_is_utf8() {
    let db = FakeSodaDatabase::new();
    let value = Value::map([("name", Value::from("J\u{fc}rgen"))]);

    resolve_document_arg(&db, &value, &JsonSerializer).unwrap();

    let content = db.created()[0].content.clone();
    assert_eq!(String::from_utf8(content).unwrap(), "{\"name\":\"J\u{fc}rgen\"}");
}

#[test]
fn integer_is_rejected() {
    let db = FakeSodaDatabase::new();

    let err = resolve_document_arg(&db, &Value::Integer(42), &JsonSerializer).unwrap_err();

    assert!(matches!(err, DriverError::TypeMismatch { .. }));
    assert_eq!(
        err.to_string(),
        format!("{DOCUMENT_ARG_EXPECTED}, got drvbridge_core::value.Integer")
    );
    assert!(db.created().is_empty());
}

#[test]
fn text_is_rejected_without_serializing() {
    let db = FakeSodaDatabase::new();
    let calls = Cell::new(0);
    let counting = |value: &Value| -> DriverResult<String> {
        calls.set(calls.get() + 1);
        Ok(serde_json::to_string(value)?)
    };

    let err = resolve_document_arg(&db, &Value::from("{}"), &counting).unwrap_err();

    assert!(matches!(err, DriverError::TypeMismatch { .. }));
    assert_eq!(calls.get(), 0);
}

#[test]
fn serializer_failure_creates_nothing() {
    let db = FakeSodaDatabase::new();
    let value = Value::map([("blob", Value::Bytes(vec![0xde, 0xad]))]);

    let err = resolve_document_arg(&db, &value, &JsonSerializer).unwrap_err();

    assert!(matches!(err, DriverError::Serialization { .. }));
    assert!(db.created().is_empty());
}

#[test]
fn create_failure_is_reported() {
    let db = FakeSodaDatabase::new();
    let info = ErrorInfo::new(40626, "ORA-40626: collection is read-only");
    db.fail_next_create(info.clone());

    let err = resolve_document_arg(&db, &Value::from(json!({})), &JsonSerializer).unwrap_err();

    assert_eq!(err.error_info(), Some(&info));
    assert!(matches!(err, DriverError::ClientLibrary(_)));
}

#[test]
fn close_reports_release_failure() {
    let handle = FakeDocHandle::new(3);
    let doc = SodaDocument::from_handle(handle.clone());
    handle.fail_release(true);

    let err = doc.close().unwrap_err();

    assert!(matches!(
        err,
        DriverError::ReferenceOperation {
            operation: "release",
            ..
        }
    ));
    assert_eq!(handle.ref_count(), 1);
}

#[test]
fn drop_releases_reference() {
    let handle = FakeDocHandle::new(9);
    handle.add_ref().unwrap();
    let doc = SodaDocument::from_handle(handle.clone());
    assert_eq!(handle.ref_count(), 2);

    drop(doc);

    assert_eq!(handle.ref_count(), 1);
}
