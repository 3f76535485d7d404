//! Integration tests for SMS threads, contacts, and call logs.

mod common;

use axum::http::{Method, StatusCode};
use common::*;
use realtime::MemoryStore;
use serde_json::json;

async fn seed_sms(store: &MemoryStore) {
    seed_device(
        store,
        OPERATOR_ACCOUNT,
        "pixel-7",
        json!({
            "status": "CONNECTED",
            "sms": {
                "+421900111222": {
                    "m2": "2026-03-14 11:00:00 | are you around?",
                    "m1": "2026-03-14 09:00:00 | hey",
                },
                "INFO_BANK_SK": {
                    "m1": "2026-03-10 10:00:00 | your code is 123456",
                },
            },
            "contacts": {
                "c1": "Alice Smith | +421900123456",
                "c2": "Bob",
            },
            "call_logs": {
                "l1": "+421900123456 | OUTGOING | 00:02:31 | 2026-03-14",
            },
        }),
    )
    .await;
}

fn device_uri(suffix: &str) -> String {
    format!("/api/v1/devices/{}/pixel-7/{}", OPERATOR_ACCOUNT, suffix)
}

#[tokio::test]
async fn test_sms_threads_are_grouped_and_ordered() {
    let store = MemoryStore::new();
    seed_sms(&store).await;
    let app = create_test_app(&store);
    let token = login(&app, OPERATOR_EMAIL, PASSWORD).await;

    let (status, body) = send(&app, bare_request(Method::GET, &device_uri("sms"), &token)).await;
    assert_eq!(status, StatusCode::OK);

    let conversations = body["conversations"].as_array().unwrap();
    assert_eq!(conversations.len(), 2);

    // Named senders come first, display addresses are unescaped.
    assert_eq!(conversations[0]["address"], "INFO_BANK_SK");
    assert_eq!(conversations[0]["displayAddress"], "INFO.BANK.SK");

    // Messages run oldest-first within a thread.
    let messages = conversations[1]["messages"].as_array().unwrap();
    assert_eq!(messages[0]["body"], "hey");
    assert_eq!(messages[1]["body"], "are you around?");
}

#[tokio::test]
async fn test_send_sms_queues_a_command() {
    let store = MemoryStore::new();
    seed_sms(&store).await;
    let app = create_test_app(&store);
    let token = login(&app, OPERATOR_EMAIL, PASSWORD).await;

    let request = json_request(
        Method::POST,
        &device_uri("sms"),
        json!({"recipient": " +421900999888 ", "message": " on my way "}),
        Some(&token),
    );
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::ACCEPTED);

    let command_id = body["commandId"].as_str().unwrap();
    let command = store_value(
        &store,
        &format!(
            "users/{}/devices/pixel-7/commands/{}",
            OPERATOR_ACCOUNT, command_id
        ),
    )
    .await;
    assert_eq!(
        command,
        json!({"type": "sendsms", "recipient": "+421900999888", "message": "on my way"})
    );
}

#[tokio::test]
async fn test_invalid_sms_is_rejected_without_a_write() {
    let store = MemoryStore::new();
    seed_sms(&store).await;
    let app = create_test_app(&store);
    let token = login(&app, OPERATOR_EMAIL, PASSWORD).await;

    let cases = [
        json!({"recipient": "", "message": "hello"}),
        json!({"recipient": "+421900999888", "message": ""}),
        json!({"recipient": "9".repeat(51), "message": "hello"}),
        json!({"recipient": "+421900999888", "message": "m".repeat(1001)}),
    ];
    for payload in cases {
        let request = json_request(Method::POST, &device_uri("sms"), payload, Some(&token));
        let (status, _) = send(&app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    let commands = store_value(
        &store,
        &format!("users/{}/devices/pixel-7/commands", OPERATOR_ACCOUNT),
    )
    .await;
    assert!(commands.is_null());
}

#[tokio::test]
async fn test_delete_sms_message() {
    let store = MemoryStore::new();
    seed_sms(&store).await;
    let app = create_test_app(&store);
    let token = login(&app, OPERATOR_EMAIL, PASSWORD).await;

    let uri = device_uri("sms/+421900111222/m1");
    let (status, _) = send(&app, bare_request(Method::DELETE, &uri, &token)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let thread = store_value(
        &store,
        &format!("users/{}/devices/pixel-7/sms/+421900111222", OPERATOR_ACCOUNT),
    )
    .await;
    assert!(thread.get("m1").is_none());
    assert!(thread.get("m2").is_some());
}

#[tokio::test]
async fn test_contacts_one_shot_read() {
    let store = MemoryStore::new();
    seed_sms(&store).await;
    let app = create_test_app(&store);
    let token = login(&app, OPERATOR_EMAIL, PASSWORD).await;

    let (status, body) = send(
        &app,
        bare_request(Method::GET, &device_uri("contacts"), &token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let contacts = body["contacts"].as_array().unwrap();
    assert_eq!(contacts.len(), 2);
    assert_eq!(contacts[0]["name"], "Alice Smith");
    assert_eq!(contacts[0]["number"], "+421900123456");
    assert_eq!(contacts[1]["number"], "N/A");
}

#[tokio::test]
async fn test_call_logs_one_shot_read() {
    let store = MemoryStore::new();
    seed_sms(&store).await;
    let app = create_test_app(&store);
    let token = login(&app, OPERATOR_EMAIL, PASSWORD).await;

    let (status, body) = send(
        &app,
        bare_request(Method::GET, &device_uri("call-logs"), &token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let logs = body["callLogs"].as_array().unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0]["callType"], "OUTGOING");
    assert_eq!(logs[0]["duration"], "00:02:31");
}

#[tokio::test]
async fn test_missing_data_reads_as_empty() {
    let store = MemoryStore::new();
    seed_device(&store, OPERATOR_ACCOUNT, "pixel-7", json!({"status": "CONNECTED"})).await;
    let app = create_test_app(&store);
    let token = login(&app, OPERATOR_EMAIL, PASSWORD).await;

    for (suffix, field) in [
        ("sms", "conversations"),
        ("contacts", "contacts"),
        ("call-logs", "callLogs"),
    ] {
        let (status, body) = send(&app, bare_request(Method::GET, &device_uri(suffix), &token)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[field].as_array().unwrap().len(), 0);
    }
}

#[tokio::test]
async fn test_messaging_respects_account_scope() {
    let store = MemoryStore::new();
    seed_device(&store, "acct2", "mi-9", json!({"status": "CONNECTED"})).await;
    let app = create_test_app(&store);
    let token = login(&app, OPERATOR_EMAIL, PASSWORD).await;

    let (status, _) = send(
        &app,
        bare_request(Method::GET, "/api/v1/devices/acct2/mi-9/sms", &token),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
