use std::{num::NonZeroU32, sync::Arc};

use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
};
use reqwest::header::ACCEPT;
use serde::{Deserialize, de::DeserializeOwned};
use tracing::{debug, warn};

use crate::{
    error::{CatalogError, CatalogResult},
    models::NewMovie,
};

pub struct TmdbClient {
    client: reqwest::Client,
    access_token: String,
    base_url: String,
    image_base_url: String,
    limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

impl TmdbClient {
    pub fn new(
        client: reqwest::Client,
        access_token: String,
        base_url: String,
        image_base_url: String,
        rps: u32,
    ) -> Self {
        let rps = NonZeroU32::new(rps).unwrap_or(NonZeroU32::MIN);
        let limiter = Arc::new(RateLimiter::direct(Quota::per_second(rps)));
        Self { client, access_token, base_url, image_base_url, limiter }
    }

    pub fn image_base_url(&self) -> &str {
        &self.image_base_url
    }

    /// Free-text title search. Results come back exactly as the catalog orders them.
    pub async fn search(&self, title: &str) -> CatalogResult<Vec<SearchResult>> {
        debug!(title = %title, "searching catalog");
        let url = format!("{}/search/movie", self.base_url.trim_end_matches('/'));
        let resp: SearchResponse = self.get_json(&url, &[("query", title)]).await?;
        debug!(title = %title, results = resp.results.len(), "catalog search complete");
        Ok(resp.results)
    }

    pub async fn fetch_detail(&self, tmdb_id: i32) -> CatalogResult<MovieDetail> {
        debug!(tmdb_id, "fetching catalog detail");
        let url = format!("{}/movie/{}", self.base_url.trim_end_matches('/'), tmdb_id);
        self.get_json(&url, &[]).await
    }

    /// Fetches the detail for `tmdb_id` and shapes it into a list entry.
    pub async fn fetch_new_movie(&self, tmdb_id: i32) -> CatalogResult<NewMovie> {
        self.fetch_detail(tmdb_id).await?.into_new_movie(&self.image_base_url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> CatalogResult<T> {
        self.limiter.until_ready().await;

        let resp = self
            .client
            .get(url)
            .bearer_auth(&self.access_token)
            .header(ACCEPT, "application/json")
            .query(query)
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .inspect_err(|err| warn!(url = %url, error = %err, "catalog request failed"))?;

        let body = resp
            .bytes()
            .await
            .inspect_err(|err| warn!(url = %url, error = %err, "catalog response cut short"))?;

        serde_json::from_slice(&body).map_err(|err| {
            warn!(url = %url, error = %err, "catalog response did not decode");
            CatalogError::Malformed(err.to_string())
        })
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Vec<SearchResult>,
}

/// One search candidate as returned by the catalog.
#[derive(Clone, Debug, Deserialize)]
pub struct SearchResult {
    pub id: i32,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub overview: String,
    pub poster_path: Option<String>,
    pub release_date: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct MovieDetail {
    pub id: i32,
    pub original_title: String,
    #[serde(default)]
    pub overview: String,
    pub release_date: Option<String>,
    pub poster_path: Option<String>,
}

impl SearchResult {
    pub fn poster_url(&self, image_base_url: &str) -> Option<String> {
        poster_url(image_base_url, self.poster_path.as_deref())
    }
}

impl MovieDetail {
    pub fn into_new_movie(self, image_base_url: &str) -> CatalogResult<NewMovie> {
        let title = self.original_title.trim().to_string();
        if title.is_empty() {
            return Err(CatalogError::Malformed(format!("movie {} has no title", self.id)));
        }

        let year = self.release_date.as_deref().and_then(release_year).ok_or_else(|| {
            CatalogError::Malformed(format!("movie {} has no usable release date", self.id))
        })?;

        let poster_url =
            poster_url(image_base_url, self.poster_path.as_deref()).unwrap_or_default();

        Ok(NewMovie { title, year, description: self.overview, poster_url })
    }
}

fn poster_url(image_base_url: &str, poster_path: Option<&str>) -> Option<String> {
    poster_path
        .filter(|path| !path.is_empty())
        .map(|path| format!("{}{}", image_base_url.trim_end_matches('/'), path))
}

/// Year of a `YYYY-MM-DD` release date; a bare leading year is accepted too.
fn release_year(release_date: &str) -> Option<i32> {
    let release_date = release_date.trim();
    if let Ok(date) = release_date.parse::<jiff::civil::Date>() {
        return Some(i32::from(date.year()));
    }
    release_date.split('-').next()?.parse().ok()
}
