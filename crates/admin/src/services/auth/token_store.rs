//! Where a client keeps its bearer token between requests.

use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use secrecy::{ExposeSecret, SecretString};
use time::Duration;

/// Name of the cookie holding the bearer token.
pub const TOKEN_COOKIE: &str = "jogodobicho_administrator_token";

/// Client-side persistence for the bearer token.
pub trait TokenStore {
    /// The stored token, if any.
    fn token(&self) -> Option<SecretString>;

    /// Store `token`, replacing any previous one. It expires after `max_age`.
    fn persist(&mut self, token: &SecretString, max_age: Duration);

    /// Forget the stored token.
    fn remove(&mut self);
}

/// Token kept in the browser as an HTTP-only cookie.
///
/// Changes are collected in the jar, which the handler must return as part of
/// its response for them to reach the browser.
#[derive(Debug, Clone)]
pub struct CookieTokenStore {
    jar: CookieJar,
    secure: bool,
}

impl CookieTokenStore {
    /// Wrap the request's cookie jar. `secure` adds the `Secure` attribute to
    /// cookies this store writes.
    #[must_use]
    pub const fn new(jar: CookieJar, secure: bool) -> Self {
        Self { jar, secure }
    }

    /// The jar with every change made through this store.
    #[must_use]
    pub fn into_jar(self) -> CookieJar {
        self.jar
    }
}

impl TokenStore for CookieTokenStore {
    fn token(&self) -> Option<SecretString> {
        self.jar
            .get(TOKEN_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .filter(|v| !v.is_empty())
            .map(SecretString::from)
    }

    fn persist(&mut self, token: &SecretString, max_age: Duration) {
        let cookie = Cookie::build((TOKEN_COOKIE, token.expose_secret().to_string()))
            .path("/")
            .max_age(max_age)
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(self.secure);
        self.jar = self.jar.clone().add(cookie);
    }

    fn remove(&mut self) {
        self.jar = self.jar.clone().remove(Cookie::build(TOKEN_COOKIE).path("/"));
    }
}

/// Token kept in memory, for tests and tools.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Option<SecretString>,
    max_age: Option<Duration>,
}

impl MemoryTokenStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with `token`.
    #[must_use]
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Some(SecretString::from(token.into())),
            max_age: None,
        }
    }

    /// Max age given on the last `persist`.
    #[must_use]
    pub const fn max_age(&self) -> Option<Duration> {
        self.max_age
    }
}

impl TokenStore for MemoryTokenStore {
    fn token(&self) -> Option<SecretString> {
        self.token
            .as_ref()
            .map(|t| SecretString::from(t.expose_secret().to_string()))
    }

    fn persist(&mut self, token: &SecretString, max_age: Duration) {
        self.token = Some(SecretString::from(token.expose_secret().to_string()));
        self.max_age = Some(max_age);
    }

    fn remove(&mut self) {
        self.token = None;
        self.max_age = None;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_store_persist_sets_attributes() {
        let mut store = CookieTokenStore::new(CookieJar::new(), true);
        store.persist(&SecretString::from("tok-1"), Duration::hours(2));

        assert_eq!(store.token().unwrap().expose_secret(), "tok-1");

        let jar = store.into_jar();
        let cookie = jar.get(TOKEN_COOKIE).unwrap();
        assert_eq!(cookie.max_age(), Some(Duration::hours(2)));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Strict));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.path(), Some("/"));
    }

    #[test]
    fn test_cookie_store_remove() {
        let jar = CookieJar::new().add(Cookie::new(TOKEN_COOKIE, "tok-1"));
        let mut store = CookieTokenStore::new(jar, false);
        assert!(store.token().is_some());

        store.remove();
        assert!(store.token().is_none());
    }

    #[test]
    fn test_cookie_store_ignores_empty_value() {
        let jar = CookieJar::new().add(Cookie::new(TOKEN_COOKIE, ""));
        assert!(CookieTokenStore::new(jar, false).token().is_none());
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryTokenStore::new();
        assert!(store.token().is_none());

        store.persist(&SecretString::from("abc"), Duration::hours(2));
        assert_eq!(store.token().unwrap().expose_secret(), "abc");
        assert_eq!(store.max_age(), Some(Duration::hours(2)));

        store.remove();
        assert!(store.token().is_none());
        assert!(store.max_age().is_none());
    }
}
