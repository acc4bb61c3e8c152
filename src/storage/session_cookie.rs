//! Cookie persistence for platform tokens.
//!
//! Two cookies are written: `session` holds the whole [`TokenBundle`] and
//! `refreshToken` holds only the refresh token, so a member stays signed in
//! after the shorter-lived `session` cookie expires. Values are JSON,
//! percent-encoded to stay within the cookie value grammar. They are neither
//! signed nor encrypted.

use crate::config::SessionConfig;
use crate::domain::tokens::{RefreshToken, TokenBundle};
use crate::error::{AppError, Result};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

pub const SESSION_COOKIE: &str = "session";
pub const REFRESH_COOKIE: &str = "refreshToken";

#[derive(Clone, Debug)]
pub struct SessionCookies {
    secure: bool,
    session_ttl: Duration,
    refresh_ttl: Duration,
}

impl SessionCookies {
    #[must_use]
    pub const fn new(config: &SessionConfig, secure: bool) -> Self {
        Self {
            secure,
            session_ttl: Duration::days(config.session_ttl_days),
            refresh_ttl: Duration::days(config.refresh_ttl_days),
        }
    }

    /// Reconciles the two cookies into a bundle. `session` wins; a lone
    /// `refreshToken` yields a bundle whose access token is already stale.
    #[must_use]
    pub fn read(&self, jar: &CookieJar) -> Option<TokenBundle> {
        if let Some(bundle) = jar.get(SESSION_COOKIE).and_then(|c| decode_bundle(c.value())) {
            return Some(bundle);
        }
        jar.get(REFRESH_COOKIE)
            .and_then(|c| decode_refresh_token(c.value()))
            .map(TokenBundle::from_refresh_token)
    }

    /// # Errors
    /// Returns `AppError::Internal` if the bundle cannot be serialized.
    pub fn write(&self, jar: CookieJar, bundle: &TokenBundle) -> Result<CookieJar> {
        let session = encode_bundle(bundle)?;
        let refresh = encode(&bundle.refresh_token)?;
        Ok(jar
            .add(self.cookie(SESSION_COOKIE, session, self.session_ttl))
            .add(self.cookie(REFRESH_COOKIE, refresh, self.refresh_ttl)))
    }

    /// Writes the bundle when there is one; leaves the jar untouched otherwise.
    ///
    /// # Errors
    /// See [`Self::write`].
    pub fn persist(&self, jar: CookieJar, bundle: Option<&TokenBundle>) -> Result<CookieJar> {
        match bundle {
            Some(bundle) => self.write(jar, bundle),
            None => Ok(jar),
        }
    }

    /// Emits removal cookies for both slots, whether or not the request carried them.
    #[must_use]
    pub fn clear(&self, jar: CookieJar) -> CookieJar {
        [SESSION_COOKIE, REFRESH_COOKIE].into_iter().fold(jar, |jar, name| {
            let mut cookie = self.cookie(name, String::new(), Duration::ZERO);
            cookie.make_removal();
            jar.add(cookie)
        })
    }

    fn cookie(&self, name: &'static str, value: String, max_age: Duration) -> Cookie<'static> {
        Cookie::build((name, value))
            .http_only(true)
            .same_site(SameSite::Lax)
            .path("/")
            .secure(self.secure)
            .max_age(max_age)
            .build()
    }
}

/// # Errors
/// Returns `AppError::Internal` if the bundle cannot be serialized.
pub fn encode_bundle(bundle: &TokenBundle) -> Result<String> {
    encode(bundle)
}

#[must_use]
pub fn decode_bundle(raw: &str) -> Option<TokenBundle> {
    decode(raw)
}

#[must_use]
pub fn decode_refresh_token(raw: &str) -> Option<RefreshToken> {
    decode::<RefreshToken>(raw).filter(|token| !token.value.is_empty())
}

fn encode<T: serde::Serialize>(value: &T) -> Result<String> {
    let json = serde_json::to_string(value).map_err(|e| {
        tracing::error!(error = %e, "Failed to serialize session cookie");
        AppError::Internal
    })?;
    Ok(urlencoding::encode(&json).into_owned())
}

fn decode<T: serde::de::DeserializeOwned>(raw: &str) -> Option<T> {
    let json = urlencoding::decode(raw).ok()?;
    match serde_json::from_str(&json) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::debug!(error = %e, "Ignoring undecodable session cookie");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tokens::{AccessToken, TokenRole};

    fn cookies() -> SessionCookies {
        SessionCookies::new(&SessionConfig { session_ttl_days: 7, refresh_ttl_days: 30 }, true)
    }

    fn bundle() -> TokenBundle {
        TokenBundle {
            access_token: AccessToken { value: "OauthNG.JWS.access".into(), expires_at: 1_760_000_000 },
            refresh_token: RefreshToken {
                value: "JWS.refresh, with; separators".into(),
                role: TokenRole::Member,
                expires_at: Some(1_770_000_000),
            },
        }
    }

    #[test]
    fn test_bundle_survives_encoding() {
        let original = bundle();
        let encoded = encode_bundle(&original).unwrap();
        assert!(!encoded.contains(';'));
        assert!(!encoded.contains('"'));
        assert_eq!(decode_bundle(&encoded), Some(original));
    }

    #[test]
    fn test_plain_json_values_are_accepted() {
        let raw = r#"{"accessToken":{"value":"a","expiresAt":1},"refreshToken":{"value":"r"}}"#;
        let decoded = decode_bundle(raw).unwrap();
        assert_eq!(decoded.refresh_token.role, TokenRole::Visitor);
    }

    #[test]
    fn test_write_then_read_through_jar() {
        let jar = cookies().write(CookieJar::new(), &bundle()).unwrap();
        assert_eq!(cookies().read(&jar), Some(bundle()));

        let session = jar.get(SESSION_COOKIE).unwrap();
        assert_eq!(session.http_only(), Some(true));
        assert_eq!(session.same_site(), Some(SameSite::Lax));
        assert_eq!(session.secure(), Some(true));
        assert_eq!(session.max_age(), Some(Duration::days(7)));
        assert_eq!(jar.get(REFRESH_COOKIE).unwrap().max_age(), Some(Duration::days(30)));
    }

    #[test]
    fn test_refresh_cookie_alone_yields_stale_bundle() {
        let refresh = encode(&bundle().refresh_token).unwrap();
        let jar = CookieJar::new().add(Cookie::new(REFRESH_COOKIE, refresh));

        let restored = cookies().read(&jar).unwrap();
        assert_eq!(restored.refresh_token, bundle().refresh_token);
        assert!(restored.needs_refresh(0));
    }

    #[test]
    fn test_garbage_session_falls_back_to_refresh_cookie() {
        let refresh = encode(&bundle().refresh_token).unwrap();
        let jar = CookieJar::new()
            .add(Cookie::new(SESSION_COOKIE, "not-json"))
            .add(Cookie::new(REFRESH_COOKIE, refresh));
        assert!(cookies().read(&jar).unwrap().is_member());
    }

    #[test]
    fn test_no_cookies_means_no_session() {
        let jar = CookieJar::new().add(Cookie::new(REFRESH_COOKIE, "%7B%7D"));
        assert_eq!(cookies().read(&jar), None);
    }

    #[test]
    fn test_clear_emits_expired_cookies() {
        let jar = cookies().clear(CookieJar::new());
        let session = jar.get(SESSION_COOKIE).unwrap();
        assert_eq!(session.value(), "");
        assert_eq!(session.max_age(), Some(Duration::ZERO));
        assert!(jar.get(REFRESH_COOKIE).is_some());
    }
}
