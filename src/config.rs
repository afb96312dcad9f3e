use std::net::SocketAddr;

use anyhow::{Context, bail};

/// Minimum secret length accepted for deriving the cookie signing key.
const MIN_SECRET_KEY_LEN: usize = 32;

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub tmdb_access_token: String,
    pub tmdb_base_url: String,
    pub tmdb_image_base_url: String,
    pub tmdb_rps: u32,
    pub tmdb_timeout_secs: u64,
    pub database_url: String,
    pub secret_key: Option<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let host = get("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port: u16 = get("PORT").unwrap_or_else(|| "3000".to_string()).parse().context("PORT")?;

        let tmdb_access_token = get("TMDB_ACCESS_TOKEN")
            .map(|token| token.trim().trim_start_matches("Bearer ").trim().to_string())
            .filter(|token| !token.is_empty())
            .context("TMDB_ACCESS_TOKEN must be set to a TMDB API read access token")?;
        let tmdb_base_url =
            get("TMDB_BASE_URL").unwrap_or_else(|| "https://api.themoviedb.org/3".to_string());
        let tmdb_image_base_url = get("TMDB_IMAGE_BASE_URL")
            .unwrap_or_else(|| "https://image.tmdb.org/t/p/w500".to_string());

        let tmdb_rps: u32 = get("TMDB_RPS").and_then(|s| s.parse().ok()).unwrap_or(4);
        let tmdb_timeout_secs: u64 =
            get("TMDB_TIMEOUT_SECS").and_then(|s| s.parse().ok()).unwrap_or(10);

        let database_url =
            get("DATABASE_URL").unwrap_or_else(|| "sqlite://movies.db?mode=rwc".to_string());

        let secret_key = get("SECRET_KEY").filter(|s| !s.is_empty());
        if let Some(secret) = &secret_key {
            if secret.len() < MIN_SECRET_KEY_LEN {
                bail!("SECRET_KEY must be at least {MIN_SECRET_KEY_LEN} bytes long");
            }
        }

        Ok(Self {
            addr: format!("{host}:{port}").parse().context("HOST/PORT")?,
            tmdb_access_token,
            tmdb_base_url,
            tmdb_image_base_url,
            tmdb_rps,
            tmdb_timeout_secs,
            database_url,
            secret_key,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_only_token_is_set() {
        let config = load(&[("TMDB_ACCESS_TOKEN", "abc")]).unwrap();
        assert_eq!(config.addr.port(), 3000);
        assert_eq!(config.tmdb_access_token, "abc");
        assert_eq!(config.tmdb_base_url, "https://api.themoviedb.org/3");
        assert_eq!(config.tmdb_image_base_url, "https://image.tmdb.org/t/p/w500");
        assert_eq!(config.database_url, "sqlite://movies.db?mode=rwc");
        assert_eq!(config.tmdb_rps, 4);
        assert_eq!(config.tmdb_timeout_secs, 10);
        assert!(config.secret_key.is_none());
    }

    #[test]
    fn missing_token_is_a_configuration_error() {
        let err = load(&[]).unwrap_err();
        assert!(err.to_string().contains("TMDB_ACCESS_TOKEN"));

        assert!(load(&[("TMDB_ACCESS_TOKEN", "   ")]).is_err());
    }

    #[test]
    fn bearer_prefix_is_stripped_from_token() {
        let config = load(&[("TMDB_ACCESS_TOKEN", "Bearer eyJhbGci")]).unwrap();
        assert_eq!(config.tmdb_access_token, "eyJhbGci");
    }

    #[test]
    fn short_secret_key_is_rejected() {
        let err = load(&[("TMDB_ACCESS_TOKEN", "abc"), ("SECRET_KEY", "too-short")]).unwrap_err();
        assert!(err.to_string().contains("SECRET_KEY"));

        let secret = "x".repeat(32);
        let config = load(&[("TMDB_ACCESS_TOKEN", "abc"), ("SECRET_KEY", &secret)]).unwrap();
        assert_eq!(config.secret_key.as_deref(), Some(secret.as_str()));
    }

    #[test]
    fn invalid_port_fails() {
        assert!(load(&[("TMDB_ACCESS_TOKEN", "abc"), ("PORT", "eighty")]).is_err());
    }
}
