//! REST client for the Wix headless platform.
//!
//! A [`WixClientFactory`] mints [`WixClient`]s bound to one authentication
//! strategy each:
//!
//! - `visitor()`: anonymous OAuth tokens for browsing and guest carts
//! - `resume(bundle)`: tokens restored from the session cookie, refreshed when stale
//! - `from_session_token(token)`: member tokens issued after a direct login
//! - `direct(token)`: a caller-supplied access token, used as-is
//! - `admin()`: the site API key, for server-side lookups
//!
//! Platform modules are exposed as borrowed handles (`members()`, `products()`,
//! `current_cart()`, ...), so a client is cheap to pass around by reference.

use crate::config::WixConfig;
use crate::domain::tokens::TokenBundle;
use reqwest::header::AUTHORIZATION;
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use thiserror::Error;

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod members;
pub mod oauth;
pub mod orders;
pub(crate) mod records;
pub mod redirects;

use auth::Authentication;
use cart::CurrentCart;
use catalog::{Collections, Products};
use members::Members;
use oauth::OAuth;
use orders::Orders;
use redirects::Redirects;

/// App id of Wix Stores, used in cart catalog references.
pub const STORES_APP_ID: &str = "1380b703-ce81-ff05-f115-39571d94dfcd";

#[derive(Error, Debug)]
pub enum WixError {
    #[error("Wix client ID is not configured")]
    MissingClientId,
    #[error("Wix API key is not configured")]
    MissingApiKey,
    #[error("Wix request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Wix API returned {status}: {message}")]
    Api { status: u16, message: String },
    #[error("Unexpected Wix response: {0}")]
    InvalidResponse(String),
}

impl WixError {
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The platform answered with a 4xx status.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        self.status().is_some_and(|status| (400..500).contains(&status))
    }
}

#[derive(Clone, Debug)]
enum Credentials {
    OAuth(TokenBundle),
    Direct(String),
    ApiKey { key: String, site_id: Option<String> },
}

#[derive(Clone, Debug)]
pub struct WixClient {
    http: reqwest::Client,
    base_url: String,
    credentials: Credentials,
    renewed: bool,
}

impl WixClient {
    /// OAuth tokens this client authenticates with, if any.
    #[must_use]
    pub const fn tokens(&self) -> Option<&TokenBundle> {
        match &self.credentials {
            Credentials::OAuth(bundle) => Some(bundle),
            _ => None,
        }
    }

    /// Tokens that were minted or refreshed while building this client and
    /// therefore need to be persisted again.
    #[must_use]
    pub const fn renewed_tokens(&self) -> Option<&TokenBundle> {
        if self.renewed { self.tokens() } else { None }
    }

    #[must_use]
    pub fn strategy(&self) -> &'static str {
        match &self.credentials {
            Credentials::OAuth(bundle) if bundle.is_member() => "member",
            Credentials::OAuth(_) => "visitor",
            Credentials::Direct(_) => "direct",
            Credentials::ApiKey { .. } => "api_key",
        }
    }

    #[must_use]
    pub const fn auth(&self) -> Authentication<'_> {
        Authentication::new(self)
    }

    #[must_use]
    pub const fn members(&self) -> Members<'_> {
        Members::new(self)
    }

    #[must_use]
    pub const fn products(&self) -> Products<'_> {
        Products::new(self)
    }

    #[must_use]
    pub const fn collections(&self) -> Collections<'_> {
        Collections::new(self)
    }

    #[must_use]
    pub const fn current_cart(&self) -> CurrentCart<'_> {
        CurrentCart::new(self)
    }

    #[must_use]
    pub const fn orders(&self) -> Orders<'_> {
        Orders::new(self)
    }

    #[must_use]
    pub const fn redirects(&self) -> Redirects<'_> {
        Redirects::new(self)
    }

    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, format!("{}{}", self.base_url, path));
        match &self.credentials {
            Credentials::OAuth(bundle) => builder.header(AUTHORIZATION, &bundle.access_token.value),
            Credentials::Direct(token) => builder.header(AUTHORIZATION, token),
            Credentials::ApiKey { key, site_id } => {
                let builder = builder.header(AUTHORIZATION, key);
                match site_id {
                    Some(id) => builder.header("wix-site-id", id),
                    None => builder,
                }
            }
        }
    }
}

#[derive(Clone, Debug)]
pub struct WixClientFactory {
    http: reqwest::Client,
    base_url: String,
    client_id: Option<String>,
    api_key: Option<String>,
    site_id: Option<String>,
    refresh_leeway_secs: i64,
}

impl WixClientFactory {
    #[must_use]
    pub fn new(config: &WixConfig, http: reqwest::Client) -> Self {
        Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client_id: config.client_id().map(str::to_string),
            api_key: config.api_key.clone().filter(|key| !key.trim().is_empty()),
            site_id: config.site_id.clone(),
            refresh_leeway_secs: config.refresh_leeway_secs,
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// # Errors
    /// Returns `WixError::MissingClientId` when no client id is configured.
    pub fn client_id(&self) -> Result<&str, WixError> {
        self.client_id.as_deref().ok_or(WixError::MissingClientId)
    }

    fn oauth(&self) -> Result<OAuth<'_>, WixError> {
        Ok(OAuth::new(&self.http, &self.base_url, self.client_id()?))
    }

    fn oauth_client(&self, tokens: TokenBundle, renewed: bool) -> WixClient {
        WixClient {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            credentials: Credentials::OAuth(tokens),
            renewed,
        }
    }

    /// Mints anonymous visitor tokens.
    ///
    /// # Errors
    /// Fails when the client id is missing or the token grant is rejected.
    #[tracing::instrument(skip(self), err(level = "warn"))]
    pub async fn visitor(&self) -> Result<WixClient, WixError> {
        let tokens = self.oauth()?.anonymous().await?;
        Ok(self.oauth_client(tokens, true))
    }

    /// Restores a client from persisted tokens, refreshing the access token
    /// when it is missing or about to expire.
    ///
    /// # Errors
    /// Fails when a needed refresh is rejected.
    #[tracing::instrument(skip(self, tokens), fields(role = ?tokens.role()), err(level = "warn"))]
    pub async fn resume(&self, tokens: TokenBundle) -> Result<WixClient, WixError> {
        if !tokens.needs_refresh(self.refresh_leeway_secs) {
            return Ok(self.oauth_client(tokens, false));
        }
        tracing::debug!("Access token stale, refreshing");
        self.refreshed(&tokens).await
    }

    /// Unconditionally rotates the access token.
    ///
    /// # Errors
    /// Fails when the refresh grant is rejected.
    #[tracing::instrument(skip(self, tokens), fields(role = ?tokens.role()), err(level = "warn"))]
    pub async fn refreshed(&self, tokens: &TokenBundle) -> Result<WixClient, WixError> {
        let renewed = self.oauth()?.refresh(&tokens.refresh_token).await?;
        Ok(self.oauth_client(renewed, true))
    }

    /// Resumes the persisted session, or starts a visitor one when there is
    /// none. A session whose refresh token the platform rejects is replaced by
    /// a fresh visitor session, so public routes keep working after a member
    /// session is revoked.
    ///
    /// # Errors
    /// See [`Self::resume`] and [`Self::visitor`].
    pub async fn session(&self, tokens: Option<TokenBundle>) -> Result<WixClient, WixError> {
        let Some(tokens) = tokens else {
            return self.visitor().await;
        };
        match self.resume(tokens).await {
            Err(e) if e.is_client_error() => {
                tracing::info!(error = %e, "Stored session rejected, starting a visitor session");
                self.visitor().await
            }
            result => result,
        }
    }

    /// Exchanges the session token returned by a direct login for member tokens.
    ///
    /// # Errors
    /// Fails when the exchange is rejected.
    #[tracing::instrument(skip(self, session_token), err(level = "warn"))]
    pub async fn from_session_token(&self, session_token: &str) -> Result<WixClient, WixError> {
        let tokens = self.oauth()?.exchange_session_token(session_token).await?;
        Ok(self.oauth_client(tokens, true))
    }

    /// A client that sends the given access token verbatim and never refreshes it.
    #[must_use]
    pub fn direct(&self, access_token: &str) -> WixClient {
        WixClient {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            credentials: Credentials::Direct(access_token.to_string()),
            renewed: false,
        }
    }

    /// Server-side client authenticated with the site API key.
    ///
    /// # Errors
    /// Returns `WixError::MissingApiKey` when no key is configured.
    pub fn admin(&self) -> Result<WixClient, WixError> {
        let key = self.api_key.clone().ok_or(WixError::MissingApiKey)?;
        Ok(WixClient {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            credentials: Credentials::ApiKey { key, site_id: self.site_id.clone() },
            renewed: false,
        })
    }
}

/// Sends a request and decodes a JSON body, mapping non-2xx statuses to
/// `WixError::Api` with the platform's error message.
pub(crate) async fn send_json<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T, WixError> {
    let response = builder.send().await?;
    let response = error_for_status(response).await?;
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| WixError::InvalidResponse(e.to_string()))
}

pub(crate) async fn error_for_status(response: Response) -> Result<Response, WixError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(WixError::Api { status: status.as_u16(), message: error_message(&body) })
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("message")
                .or_else(|| value.pointer("/details/applicationError/description"))
                .and_then(serde_json::Value::as_str)
                .map(str::to_string)
        })
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| body.chars().take(200).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tokens::{AccessToken, RefreshToken, TokenRole};

    fn factory(client_id: Option<&str>, api_key: Option<&str>) -> WixClientFactory {
        let config = WixConfig {
            client_id: client_id.map(str::to_string),
            public_client_id: None,
            api_key: api_key.map(str::to_string),
            site_id: Some("site-1".into()),
            base_url: "http://wix.invalid/".into(),
            upstream_timeout_secs: 1,
            refresh_leeway_secs: 60,
        };
        WixClientFactory::new(&config, reqwest::Client::new())
    }

    #[test]
    fn test_error_message_prefers_platform_message() {
        assert_eq!(error_message(r#"{"message":"Wrong password","details":{}}"#), "Wrong password");
        assert_eq!(
            error_message(r#"{"details":{"applicationError":{"description":"Email taken"}}}"#),
            "Email taken"
        );
        assert_eq!(error_message("plain failure"), "plain failure");
    }

    #[test]
    fn test_base_url_is_normalized() {
        assert_eq!(factory(Some("id"), None).base_url(), "http://wix.invalid");
    }

    #[test]
    fn test_admin_requires_api_key() {
        assert!(matches!(factory(Some("id"), None).admin(), Err(WixError::MissingApiKey)));
        assert_eq!(factory(None, Some("key")).admin().unwrap().strategy(), "api_key");
    }

    #[tokio::test]
    async fn test_visitor_requires_client_id() {
        assert!(matches!(factory(None, None).visitor().await, Err(WixError::MissingClientId)));
    }

    #[tokio::test]
    async fn test_fresh_tokens_are_not_renewed() {
        let tokens = TokenBundle {
            access_token: AccessToken {
                value: "access".into(),
                expires_at: time::OffsetDateTime::now_utc().unix_timestamp() + 3600,
            },
            refresh_token: RefreshToken { value: "refresh".into(), role: TokenRole::Member, expires_at: None },
        };
        let client = factory(Some("id"), None).resume(tokens.clone()).await.unwrap();
        assert_eq!(client.tokens(), Some(&tokens));
        assert!(client.renewed_tokens().is_none());
        assert_eq!(client.strategy(), "member");
    }

    #[test]
    fn test_direct_client_has_no_tokens() {
        let client = factory(Some("id"), None).direct("raw-token");
        assert!(client.tokens().is_none());
        assert_eq!(client.strategy(), "direct");
    }
}
