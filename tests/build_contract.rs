// Contract tests for the builder against the built-in bot protocol descriptors.
use std::thread;

use botschema::api::ErrorKind;
use botschema::core::builder::{build, build_many};
use botschema::core::object::FieldValue;
use botschema::core::scalar::Scalar;
use botschema::types::{self, ApiType, CHAT, Chat, MESSAGE, Message, UPDATE, USER, User};
use serde_json::json;

#[test]
fn well_typed_payload_coerces_every_field() {
    let raw = json!({
        "id": 7,
        "is_bot": false,
        "first_name": "Ann",
        "last_name": "Lee",
        "username": "ann",
        "language_code": "en"
    });
    let user = build(&USER, &raw).expect("user");
    assert_eq!(user.scalar("id"), Some(&Scalar::Id(7)));
    assert_eq!(user.scalar("isBot"), Some(&Scalar::Bool(false)));
    assert_eq!(user.scalar("firstName").and_then(Scalar::as_str), Some("Ann"));
    assert_eq!(user.scalar("lastName").and_then(Scalar::as_str), Some("Lee"));
    assert_eq!(user.scalar("languageCode").and_then(Scalar::as_str), Some("en"));
    assert_eq!(user.to_protocol_json(), raw);
}

#[test]
fn chat_scenario_builds_and_reports_missing_id() {
    let chat = build(&CHAT, &json!({"id": 42, "type": "group", "title": "Team"})).expect("chat");
    assert_eq!(chat.scalar("id"), Some(&Scalar::Id(42)));
    assert_eq!(chat.scalar("type").and_then(Scalar::as_str), Some("group"));
    assert_eq!(chat.scalar("title").and_then(Scalar::as_str), Some("Team"));
    assert!(matches!(chat.get("photo"), Some(FieldValue::Absent)));

    let err = build(&CHAT, &json!({"type": "group"})).expect_err("missing id");
    assert_eq!(err.kind(), ErrorKind::MissingRequiredField);
    assert_eq!(err.type_name(), Some("Chat"));
    assert_eq!(err.field(), Some("id"));
}

#[test]
fn first_missing_required_field_is_reported() {
    let err = build(&MESSAGE, &json!({"chat": {"id": 1, "type": "private"}})).expect_err("missing");
    assert_eq!(err.kind(), ErrorKind::MissingRequiredField);
    assert_eq!(err.field(), Some("message_id"));

    let err = build(&CHAT, &json!({})).expect_err("missing both");
    assert_eq!(err.field(), Some("id"));
}

#[test]
fn explicit_null_counts_as_missing() {
    let err = build(&CHAT, &json!({"id": null, "type": "group"})).expect_err("null id");
    assert_eq!(err.kind(), ErrorKind::MissingRequiredField);

    let chat = build(&CHAT, &json!({"id": 1, "type": "group", "title": null})).expect("chat");
    assert!(!chat.is_present("title"));
}

#[test]
fn building_is_idempotent() {
    let raw = json!({
        "message_id": 3,
        "date": 1700000000,
        "chat": {"id": 1, "type": "private"},
        "entities": [{"type": "bot_command", "offset": 0, "length": 6}],
        "text": "/start"
    });
    let first = build(&MESSAGE, &raw).expect("first");
    let second = build(&MESSAGE, &raw).expect("second");
    assert_eq!(first, second);
    assert_eq!(
        Message::from_response(&raw).expect("typed"),
        Message::from_response(&raw).expect("typed again")
    );
}

#[test]
fn build_many_preserves_order_with_equal_elements() {
    let raw = json!([
        {"id": 1, "first_name": "Same"},
        {"id": 2, "first_name": "Other"},
        {"id": 1, "first_name": "Same"}
    ]);
    let users = build_many(&USER, &raw).expect("users");
    let ids: Vec<_> = users.iter().map(|user| user.scalar("id").and_then(Scalar::as_i64)).collect();
    assert_eq!(ids, vec![Some(1), Some(2), Some(1)]);
    assert_eq!(users[0], users[2]);
    assert!(build_many(&USER, &json!([])).expect("empty").is_empty());
}

#[test]
fn unknown_fields_are_ignored() {
    let user = User::from_response(&json!({
        "id": 5,
        "first_name": "Bo",
        "is_premium": true,
        "added_to_attachment_menu": {"nested": [1, 2]}
    }))
    .expect("user");
    assert_eq!(user.id, 5);
    assert_eq!(user.first_name, "Bo");
}

#[test]
fn numeric_and_string_identifiers_are_equal() {
    let from_number = Chat::from_response(&json!({"id": 123456789012i64, "type": "channel"}))
        .expect("number");
    let from_string = Chat::from_response(&json!({"id": "123456789012", "type": "channel"}))
        .expect("string");
    assert_eq!(from_number.id, from_string.id);
    assert_eq!(from_number, from_string);

    let err = Chat::from_response(&json!({"id": 1.5, "type": "channel"})).expect_err("float");
    assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    let err = Chat::from_response(&json!({"id": "12ab", "type": "channel"})).expect_err("text");
    assert_eq!(err.kind(), ErrorKind::TypeMismatch);
}

#[test]
fn only_identifiers_accept_numeric_strings() {
    let err = build(&MESSAGE, &json!({
        "message_id": 1,
        "date": "1700000000",
        "chat": {"id": 1, "type": "private"}
    }))
    .expect_err("date as string");
    assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    assert_eq!(err.field(), Some("date"));
    assert_eq!(err.expected(), Some("integer"));
    assert_eq!(err.actual(), Some("string"));
}

#[test]
fn nested_objects_are_fully_built() {
    let update = build(&UPDATE, &json!({
        "update_id": 9,
        "message": {
            "message_id": 1,
            "date": 5,
            "chat": {"id": "-100", "type": "supergroup"},
            "from": {"id": 2, "first_name": "Cy"}
        }
    }))
    .expect("update");
    let message = update.get("message").and_then(FieldValue::as_object).expect("message");
    assert_eq!(message.type_name(), "Message");
    let chat = message.get("chat").and_then(FieldValue::as_object).expect("chat");
    assert_eq!(chat.scalar("id"), Some(&Scalar::Id(-100)));
    let from = message.get_protocol("from").and_then(FieldValue::as_object).expect("from");
    assert_eq!(from.scalar("firstName").and_then(Scalar::as_str), Some("Cy"));
}

#[test]
fn nested_failure_wraps_inner_missing_field() {
    let err = build(&UPDATE, &json!({
        "update_id": 9,
        "message": {"message_id": 1, "date": 5, "chat": {"type": "private"}}
    }))
    .expect_err("nested");
    assert_eq!(err.kind(), ErrorKind::NestedBuildFailure);
    assert_eq!(err.type_name(), Some("Update"));
    assert_eq!(err.field(), Some("message"));

    let inner = err.nested_error().expect("inner");
    assert_eq!(inner.kind(), ErrorKind::NestedBuildFailure);
    assert_eq!(inner.field(), Some("chat"));

    let root = err.root_cause();
    assert_eq!(root.kind(), ErrorKind::MissingRequiredField);
    assert_eq!(root.type_name(), Some("Chat"));
    assert_eq!(root.field(), Some("id"));
}

#[test]
fn sequence_field_failure_carries_element_index() {
    let err = build(&MESSAGE, &json!({
        "message_id": 1,
        "date": 5,
        "chat": {"id": 1, "type": "group"},
        "new_chat_members": [{"id": 1, "first_name": "A"}, {"id": 2}]
    }))
    .expect_err("member");
    assert_eq!(err.kind(), ErrorKind::NestedBuildFailure);
    assert_eq!(err.field(), Some("new_chat_members"));
    let inner = err.nested_error().expect("inner");
    assert_eq!(inner.index(), Some(1));
    assert_eq!(inner.kind(), ErrorKind::MissingRequiredField);
}

#[test]
fn wrong_shapes_are_rejected() {
    let err = build(&MESSAGE, &json!({"message_id": 1, "date": 5, "chat": 42})).expect_err("chat");
    assert_eq!(err.kind(), ErrorKind::ShapeMismatch);
    assert_eq!(err.field(), Some("chat"));

    let err = build(&MESSAGE, &json!({
        "message_id": 1,
        "date": 5,
        "chat": {"id": 1, "type": "group"},
        "photo": {"file_id": "x"}
    }))
    .expect_err("photo");
    assert_eq!(err.kind(), ErrorKind::ShapeMismatch);
    assert_eq!(err.field(), Some("photo"));

    let err = build_many(&USER, &json!({"id": 1})).expect_err("not array");
    assert_eq!(err.kind(), ErrorKind::ShapeMismatch);
}

#[test]
fn registry_is_safe_to_share_across_threads() {
    let handles: Vec<_> = (0..4)
        .map(|i| {
            thread::spawn(move || {
                let registry = types::registry().expect("registry");
                let object = registry
                    .build("User", &json!({"id": i, "first_name": "T"}))
                    .expect("user");
                object.scalar("id").and_then(Scalar::as_i64)
            })
        })
        .collect();
    let ids: Vec<_> = handles
        .into_iter()
        .map(|handle| handle.join().expect("join"))
        .collect();
    assert_eq!(ids, vec![Some(0), Some(1), Some(2), Some(3)]);
}
