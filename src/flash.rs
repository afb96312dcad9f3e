//! One-shot notices carried across a redirect in a signed cookie.

use axum_extra::extract::cookie::{Cookie, Key, SameSite, SignedCookieJar};

const FLASH_COOKIE: &str = "flash";

/// Derives the cookie signing key from the configured secret, or makes a
/// throwaway one so notices still work (until restart) without a secret.
pub fn signing_key(secret: Option<&str>) -> Key {
    match secret {
        Some(secret) => Key::derive_from(secret.as_bytes()),
        None => {
            tracing::warn!("SECRET_KEY not set, flash cookies use a per-process key");
            Key::generate()
        },
    }
}

pub fn set(jar: SignedCookieJar, message: impl AsRef<str>) -> SignedCookieJar {
    let cookie = Cookie::build((FLASH_COOKIE, urlencoding::encode(message.as_ref()).into_owned()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::minutes(5))
        .build();
    jar.add(cookie)
}

/// Reads and clears the pending notice, if any.
pub fn take(jar: SignedCookieJar) -> (SignedCookieJar, Option<String>) {
    let Some(cookie) = jar.get(FLASH_COOKIE) else {
        return (jar, None);
    };
    let message = urlencoding::decode(cookie.value()).ok().map(|m| m.into_owned());
    (jar.remove(Cookie::build(FLASH_COOKIE).path("/")), message)
}
