use std::{collections::HashMap, sync::Arc, time::Duration};

use axum::{
    Json, Router,
    extract::{Path, Query},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::json;

use tokio::io::{AsyncReadExt, AsyncWriteExt};

use crate::{
    AppState,
    config::Config,
    db, flash,
    models::NewMovie,
    store::{MovieRepository, MovieStore},
    tmdb::TmdbClient,
};

pub const TEST_TOKEN: &str = "test-token";
pub const TEST_SECRET: &str = "a-test-secret-that-is-long-enough-to-sign-cookies";

pub fn test_config(database_url: &str) -> Config {
    Config {
        addr: "127.0.0.1:0".parse().unwrap(),
        tmdb_access_token: TEST_TOKEN.to_string(),
        tmdb_base_url: "http://127.0.0.1:9".to_string(),
        tmdb_image_base_url: "https://image.test/w500".to_string(),
        tmdb_rps: 100,
        tmdb_timeout_secs: 5,
        database_url: database_url.to_string(),
        secret_key: Some(TEST_SECRET.to_string()),
    }
}

pub async fn memory_store() -> MovieStore {
    let db = db::connect_and_migrate(&test_config("sqlite::memory:")).await.unwrap();
    MovieStore::new(db)
}

pub fn new_movie(title: &str, year: i32) -> NewMovie {
    NewMovie {
        title: title.to_string(),
        year,
        description: format!("About {title}"),
        poster_url: format!("https://image.test/w500/{year}.jpg"),
    }
}

pub fn tmdb_client(base_url: &str, token: &str) -> TmdbClient {
    tmdb_client_with_timeout(base_url, token, Duration::from_secs(5))
}

pub fn tmdb_client_with_timeout(base_url: &str, token: &str, timeout: Duration) -> TmdbClient {
    let http = reqwest::Client::builder().timeout(timeout).build().unwrap();
    TmdbClient::new(
        http,
        token.to_string(),
        base_url.to_string(),
        "https://image.test/w500".to_string(),
        100,
    )
}

pub async fn test_state(catalog_base_url: &str) -> (AppState, Arc<MovieStore>) {
    let store = Arc::new(memory_store().await);
    let state = AppState {
        store: store.clone() as Arc<dyn MovieRepository>,
        tmdb: Arc::new(tmdb_client(catalog_base_url, TEST_TOKEN)),
        cookie_key: flash::signing_key(Some(TEST_SECRET)),
    };
    (state, store)
}

/// URL of a port that refuses connections.
pub async fn closed_port_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

/// URL of a server that accepts connections and never answers.
pub async fn stalled_server_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
    format!("http://{addr}")
}

/// URL of a server that promises a longer body than it sends, then hangs up.
pub async fn truncated_body_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let _ = socket
                .write_all(
                    b"HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: 200\r\n\r\n{\"results\": [",
                )
                .await;
            let _ = socket.shutdown().await;
        }
    });
    format!("http://{addr}")
}

/// Serves a tiny stand-in for the catalog API and returns its base URL.
pub async fn spawn_fake_catalog() -> String {
    let app = Router::new()
        .route("/search/movie", get(fake_search))
        .route("/movie/{id}", get(fake_detail));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {TEST_TOKEN}"))
}

async fn fake_search(headers: HeaderMap, Query(q): Query<HashMap<String, String>>) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let query = q.get("query").map(String::as_str).unwrap_or_default();
    if query == "broken" {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    if !query.eq_ignore_ascii_case("matrix") {
        return Json(json!({ "page": 1, "results": [] })).into_response();
    }
    Json(json!({
        "page": 1,
        "results": [
            {
                "id": 603,
                "title": "The Matrix",
                "overview": "A hacker learns the truth.",
                "poster_path": "/f89U3ADr1oiB1s9GkdPOEpXUk5H.jpg",
                "release_date": "1999-03-31"
            },
            {
                "id": 604,
                "title": "The Matrix Reloaded",
                "overview": "Neo returns.",
                "poster_path": null,
                "release_date": "2003-05-15"
            }
        ]
    }))
    .into_response()
}

async fn fake_detail(headers: HeaderMap, Path(id): Path<i32>) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    match id {
        603 => Json(json!({
            "id": 603,
            "original_title": "The Matrix",
            "title": "The Matrix",
            "overview": "A hacker learns the truth.",
            "release_date": "1999-03-31",
            "poster_path": "/f89U3ADr1oiB1s9GkdPOEpXUk5H.jpg"
        }))
        .into_response(),
        999 => Json(json!({ "id": 999 })).into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}
