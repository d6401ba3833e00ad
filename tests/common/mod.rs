#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use noteful_api::config::{AppConfig, TagCascadeTarget};
use noteful_api::database::MemoryStorage;
use noteful_api::{app, AppState};
use serde_json::Value;

pub struct TestApp {
    pub base_url: String,
    pub storage: Arc<MemoryStorage>,
    pub client: reqwest::Client,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// POST a JSON body and return the created resource's JSON
    pub async fn create(&self, path: &str, body: Value) -> Result<Value> {
        let res = self.client.post(self.url(path)).json(&body).send().await?;
        anyhow::ensure!(
            res.status() == reqwest::StatusCode::CREATED,
            "POST {} returned {}",
            path,
            res.status()
        );
        Ok(res.json().await?)
    }
}

/// Start the real router on an ephemeral port, backed by a fresh in-memory store.
pub async fn spawn_app() -> Result<TestApp> {
    spawn_app_with(TagCascadeTarget::Tags).await
}

pub async fn spawn_app_with(tag_target: TagCascadeTarget) -> Result<TestApp> {
    let mut config = AppConfig::development();
    config.cascade.tag_target = tag_target;
    spawn_app_with_config(config).await
}

pub async fn spawn_app_with_config(config: AppConfig) -> Result<TestApp> {
    let storage = Arc::new(MemoryStorage::new());
    let router = app(AppState::new(storage.clone(), &config), &config);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .context("failed to bind test listener")?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    Ok(TestApp {
        base_url: format!("http://{}", addr),
        storage,
        client: reqwest::Client::new(),
    })
}
