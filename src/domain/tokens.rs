use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Who a refresh token was issued to. Visitor tokens back anonymous carts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenRole {
    #[default]
    Visitor,
    Member,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessToken {
    pub value: String,
    /// Unix timestamp in seconds.
    pub expires_at: i64,
}

impl AccessToken {
    /// A placeholder that is always stale, so the first use triggers a refresh.
    #[must_use]
    pub const fn expired() -> Self {
        Self { value: String::new(), expires_at: 0 }
    }

    #[must_use]
    pub fn expires_within(&self, leeway_secs: i64, now: OffsetDateTime) -> bool {
        self.value.is_empty() || self.expires_at <= now.unix_timestamp() + leeway_secs
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshToken {
    pub value: String,
    #[serde(default)]
    pub role: TokenRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenBundle {
    pub access_token: AccessToken,
    pub refresh_token: RefreshToken,
}

impl TokenBundle {
    /// Rebuilds a bundle from a refresh token alone; the access token is
    /// obtained on first use.
    #[must_use]
    pub const fn from_refresh_token(refresh_token: RefreshToken) -> Self {
        Self { access_token: AccessToken::expired(), refresh_token }
    }

    #[must_use]
    pub fn role(&self) -> TokenRole {
        self.refresh_token.role
    }

    #[must_use]
    pub fn is_member(&self) -> bool {
        self.role() == TokenRole::Member
    }

    #[must_use]
    pub fn needs_refresh(&self, leeway_secs: i64) -> bool {
        self.access_token.expires_within(leeway_secs, OffsetDateTime::now_utc())
    }
}
