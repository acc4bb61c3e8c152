use crate::adapters::wix::{WixError, send_json};
use crate::domain::tokens::{AccessToken, RefreshToken, TokenBundle, TokenRole};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

const TOKEN_PATH: &str = "/oauth2/token";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TokenRequest<'a> {
    client_id: &'a str,
    grant_type: &'a str,
    #[serde(rename = "refresh_token", skip_serializing_if = "Option::is_none")]
    refresh_token: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    session_token: Option<&'a str>,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
    refresh_token: Option<String>,
}

/// Token grants against the platform's OAuth endpoint.
#[derive(Debug)]
pub struct OAuth<'a> {
    http: &'a reqwest::Client,
    base_url: &'a str,
    client_id: &'a str,
}

impl<'a> OAuth<'a> {
    pub(crate) const fn new(http: &'a reqwest::Client, base_url: &'a str, client_id: &'a str) -> Self {
        Self { http, base_url, client_id }
    }

    /// # Errors
    /// Fails when the grant is rejected or the response is malformed.
    pub async fn anonymous(&self) -> Result<TokenBundle, WixError> {
        let request =
            TokenRequest { client_id: self.client_id, grant_type: "anonymous", refresh_token: None, session_token: None };
        let response = self.grant(&request).await?;
        into_bundle(response, None, TokenRole::Visitor)
    }

    /// Refreshes the access token. The refresh token is kept when the
    /// platform does not rotate it; the role carries over.
    ///
    /// # Errors
    /// Fails when the grant is rejected or the response is malformed.
    pub async fn refresh(&self, refresh_token: &RefreshToken) -> Result<TokenBundle, WixError> {
        let request = TokenRequest {
            client_id: self.client_id,
            grant_type: "refresh_token",
            refresh_token: Some(&refresh_token.value),
            session_token: None,
        };
        let response = self.grant(&request).await?;
        into_bundle(response, Some(refresh_token), refresh_token.role)
    }

    /// # Errors
    /// Fails when the grant is rejected or the response is malformed.
    pub async fn exchange_session_token(&self, session_token: &str) -> Result<TokenBundle, WixError> {
        let request = TokenRequest {
            client_id: self.client_id,
            grant_type: "session_token",
            refresh_token: None,
            session_token: Some(session_token),
        };
        let response = self.grant(&request).await?;
        into_bundle(response, None, TokenRole::Member)
    }

    async fn grant(&self, request: &TokenRequest<'_>) -> Result<TokenResponse, WixError> {
        send_json(self.http.post(format!("{}{}", self.base_url, TOKEN_PATH)).json(request)).await
    }
}

fn into_bundle(
    response: TokenResponse,
    previous: Option<&RefreshToken>,
    role: TokenRole,
) -> Result<TokenBundle, WixError> {
    let refresh_token = match (response.refresh_token, previous) {
        (Some(value), _) if !value.is_empty() => RefreshToken { value, role, expires_at: None },
        (_, Some(previous)) => previous.clone(),
        _ => return Err(WixError::InvalidResponse("token grant returned no refresh token".into())),
    };

    Ok(TokenBundle {
        access_token: AccessToken {
            value: response.access_token,
            expires_at: OffsetDateTime::now_utc().unix_timestamp() + response.expires_in,
        },
        refresh_token,
    })
}
