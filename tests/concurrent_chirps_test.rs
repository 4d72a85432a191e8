//! Concurrency tests for the document store.
//!
//! If the store lock were released between load and save, two creators could
//! read the same snapshot and one write would be lost.

use axum::http::StatusCode;
use serde_json::json;
use std::sync::Arc;

mod common;
use common::{create_test_app, empty_request, json_request, register_and_login, send};

const NUM_CONCURRENT_CHIRPS: u64 = 50;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_chirp_creation_has_no_lost_writes() {
    let app = Arc::new(create_test_app().await);
    let login = register_and_login(&app, "walt@breakingbad.com", "123456").await;
    let bearer = format!("Bearer {}", login["token"].as_str().unwrap());

    let mut handles = vec![];

    for i in 0..NUM_CONCURRENT_CHIRPS {
        let app = app.clone();
        let bearer = bearer.clone();
        handles.push(tokio::spawn(async move {
            send(
                &app,
                json_request(
                    "POST",
                    "/api/chirps",
                    Some(&bearer),
                    &json!({ "body": format!("Chirp number {}", i) }),
                ),
            )
            .await
        }));
    }

    let mut ids = Vec::new();
    for handle in handles {
        let (status, body) = handle.await.expect("Task join failed");
        assert_eq!(status, StatusCode::CREATED);
        ids.push(body["id"].as_u64().unwrap());
    }

    ids.sort_unstable();
    assert_eq!(
        ids,
        (1..=NUM_CONCURRENT_CHIRPS).collect::<Vec<_>>(),
        "IDs must be contiguous with no duplicates"
    );

    let (_, body) = send(&app, empty_request("GET", "/api/chirps", None)).await;
    assert_eq!(
        body.as_array().unwrap().len() as u64,
        NUM_CONCURRENT_CHIRPS,
        "Chirp count mismatch due to lost write"
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_registration_of_same_email() {
    let app = Arc::new(create_test_app().await);

    let mut handles = vec![];
    for i in 0..8 {
        let app = app.clone();
        handles.push(tokio::spawn(async move {
            let (status, _) = send(
                &app,
                json_request(
                    "POST",
                    "/api/users",
                    None,
                    &json!({ "email": "same@example.com", "password": format!("pw{}", i) }),
                ),
            )
            .await;
            status
        }));
    }

    let mut created = 0;
    for handle in handles {
        match handle.await.unwrap() {
            StatusCode::CREATED => created += 1,
            status => assert_eq!(status, StatusCode::CONFLICT),
        }
    }
    assert_eq!(created, 1);

    let doc = app.state.store.read().await.unwrap();
    assert_eq!(doc.users.len(), 1);
    assert!(doc.users.contains_key(&1));
}
