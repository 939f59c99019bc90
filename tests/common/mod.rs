//! In-process stub of the risk backend for integration tests

#![allow(dead_code)]

use axum::Router;
use riskmap::config::ServiceConfig;
use tokio::net::TcpListener;

/// Serve `app` on an ephemeral local port and return its base URL
pub async fn spawn_backend(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// Base URL of a local port nothing is listening on
pub async fn closed_backend() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

pub fn service_config(base_url: String) -> ServiceConfig {
    ServiceConfig {
        base_url,
        timeout_seconds: 5,
        user_agent: "riskmap-tests".to_string(),
    }
}
