mod config;
mod db;
mod entities;
mod error;
mod flash;
mod models;
mod ranking;
mod routes;
mod store;
mod templates;
mod tmdb;

#[cfg(test)]
mod test_support;

use std::{sync::Arc, time::Duration};

use axum::{Router, extract::FromRef, routing::get};
use axum_extra::extract::cookie::Key;
use tower_http::trace::TraceLayer;

use crate::{
    config::Config,
    store::{MovieRepository, MovieStore},
    tmdb::TmdbClient,
};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn MovieRepository>,
    pub tmdb: Arc<TmdbClient>,
    pub cookie_key: Key,
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::index))
        .route("/add", get(routes::add_form).post(routes::add))
        .route("/save/{id}", get(routes::save))
        .route("/edit/{id}", get(routes::edit_form).post(routes::edit))
        .route("/{id}", get(routes::delete))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,cinerank=debug,sqlx=warn".to_string()),
        )
        .init();

    let config = Config::from_env()?;

    let http = reqwest::Client::builder()
        .user_agent("cinerank/0.1")
        .timeout(Duration::from_secs(config.tmdb_timeout_secs))
        .build()?;

    let db = db::connect_and_migrate(&config).await?;
    let store = MovieStore::new(db);

    let tmdb = TmdbClient::new(
        http,
        config.tmdb_access_token.clone(),
        config.tmdb_base_url.clone(),
        config.tmdb_image_base_url.clone(),
        config.tmdb_rps,
    );

    let state = AppState {
        store: Arc::new(store),
        tmdb: Arc::new(tmdb),
        cookie_key: flash::signing_key(config.secret_key.as_deref()),
    };

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, database = %config.database_url, "listening");
    axum::serve(listener, router(state)).await?;

    Ok(())
}
