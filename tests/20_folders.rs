mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn list_returns_folders_sorted_by_name() -> Result<()> {
    let server = common::spawn_app().await?;
    for name in ["Work", "Archive", "Personal"] {
        server.create("/api/folders", json!({ "name": name })).await?;
    }

    let res = server.client.get(server.url("/api/folders")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<Vec<Value>>().await?;
    let names: Vec<&str> = body.iter().filter_map(|f| f["name"].as_str()).collect();
    assert_eq!(names, vec!["Archive", "Personal", "Work"]);
    Ok(())
}

#[tokio::test]
async fn create_returns_201_with_location_and_entity() -> Result<()> {
    let server = common::spawn_app().await?;

    let res = server
        .client
        .post(server.url("/api/folders"))
        .json(&json!({ "name": "test name" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let location = res
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = res.json::<Value>().await?;
    let object = body.as_object().expect("folder should be an object");
    let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
    keys.sort();
    assert_eq!(keys, vec!["id", "name"]);
    assert_eq!(body["name"], "test name");

    let id = body["id"].as_str().unwrap_or_default();
    assert_eq!(location.as_deref(), Some(format!("/api/folders/{}", id).as_str()));

    let fetched = server
        .client
        .get(server.url(&format!("/api/folders/{}", id)))
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert_eq!(fetched, body);
    Ok(())
}

#[tokio::test]
async fn create_without_name_is_missing_field() -> Result<()> {
    let server = common::spawn_app().await?;

    for body in [json!({}), json!({ "name": "" }), json!({ "name": "   " })] {
        let res = server.client.post(server.url("/api/folders")).json(&body).send().await?;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let err = res.json::<Value>().await?;
        assert_eq!(err["message"], "Missing `name` in request body");
        assert_eq!(err["code"], "MISSING_FIELD");
    }
    Ok(())
}

#[tokio::test]
async fn create_duplicate_name_is_rejected() -> Result<()> {
    let server = common::spawn_app().await?;
    server.create("/api/folders", json!({ "name": "Work" })).await?;

    let res = server
        .client
        .post(server.url("/api/folders"))
        .json(&json!({ "name": "Work" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let err = res.json::<Value>().await?;
    assert_eq!(err["message"], "The folder name already exists");
    assert_eq!(err["code"], "DUPLICATE_NAME");
    Ok(())
}

#[tokio::test]
async fn get_distinguishes_malformed_from_missing() -> Result<()> {
    let server = common::spawn_app().await?;

    let res = server.client.get(server.url("/api/folders/99-99-99")).send().await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?["code"], "INVALID_IDENTIFIER");

    let missing = uuid::Uuid::new_v4();
    let res = server
        .client
        .get(server.url(&format!("/api/folders/{}", missing)))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn update_renames_folder() -> Result<()> {
    let server = common::spawn_app().await?;
    let folder = server.create("/api/folders", json!({ "name": "Warriors" })).await?;
    let id = folder["id"].as_str().unwrap_or_default();

    let res = server
        .client
        .put(server.url(&format!("/api/folders/{}", id)))
        .json(&json!({ "name": "Golden State Warriors" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["id"], id);
    assert_eq!(body["name"], "Golden State Warriors");
    Ok(())
}

#[tokio::test]
async fn update_error_statuses() -> Result<()> {
    let server = common::spawn_app().await?;
    let body = json!({ "name": "Golden State Warriors" });

    let res = server.client.put(server.url("/api/folders/99-99-99")).json(&body).send().await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?["message"], "The `id` is not valid");

    let missing = uuid::Uuid::new_v4();
    let res = server
        .client
        .put(server.url(&format!("/api/folders/{}", missing)))
        .json(&body)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = server
        .client
        .put(server.url("/api/folders/1234567"))
        .json(&json!({ "name": "" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?["message"], "Missing `name` in request body");
    Ok(())
}

#[tokio::test]
async fn work_folder_lifecycle() -> Result<()> {
    let server = common::spawn_app().await?;
    let folder = server.create("/api/folders", json!({ "name": "Work" })).await?;
    let url = server.url(&format!("/api/folders/{}", folder["id"].as_str().unwrap_or_default()));

    let res = server.client.put(&url).json(&json!({ "name": "" })).send().await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?["code"], "MISSING_FIELD");

    let res = server.client.delete(&url).send().await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = server.client.get(&url).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn delete_is_idempotent() -> Result<()> {
    let server = common::spawn_app().await?;
    let missing = uuid::Uuid::new_v4();

    let res = server
        .client
        .delete(server.url(&format!("/api/folders/{}", missing)))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = server.client.delete(server.url("/api/folders/nope")).send().await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn create_over_body_limit_is_payload_too_large() -> Result<()> {
    let mut config = noteful_api::AppConfig::development();
    config.api.max_request_size_bytes = 1024;
    let server = common::spawn_app_with_config(config).await?;

    let body = json!({ "name": "x".repeat(4096) });
    let res = server.client.post(server.url("/api/folders")).json(&body).send().await?;
    assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let err = res.json::<Value>().await?;
    assert_eq!(err["code"], "PAYLOAD_TOO_LARGE");

    let folders = server.client.get(server.url("/api/folders")).send().await?;
    assert_eq!(folders.json::<Vec<Value>>().await?, Vec::<Value>::new());
    Ok(())
}

#[tokio::test]
async fn update_missing_folder_to_taken_name_is_not_found() -> Result<()> {
    let server = common::spawn_app().await?;
    server.create("/api/folders", json!({ "name": "Work" })).await?;

    let res = server
        .client
        .put(server.url(&format!("/api/folders/{}", uuid::Uuid::new_v4())))
        .json(&json!({ "name": "Work" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn create_keeps_name_as_sent() -> Result<()> {
    let server = common::spawn_app().await?;
    let created = server.create("/api/folders", json!({ "name": "  Work " })).await?;
    assert_eq!(created["name"], "  Work ");
    Ok(())
}
