use crate::domain::member::MemberProfile;
use crate::domain::tokens::TokenBundle;
use crate::services::auth_service::TokenGrant;
use serde::{Deserialize, Serialize};

/// Fields are optional so that missing ones produce a 400 with a readable
/// message instead of a deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct Login {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Logout {
    pub post_logout_url: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logout_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessTokenOnly {
    pub access_token: String,
}

/// Either a full bundle (`{accessToken: {value, expiresAt}, refreshToken}`)
/// or a bare `{accessToken: "..."}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum TokenAuth {
    Bundle(TokenBundle),
    AccessToken(AccessTokenOnly),
}

impl From<TokenAuth> for TokenGrant {
    fn from(body: TokenAuth) -> Self {
        match body {
            TokenAuth::Bundle(bundle) => Self::Bundle(bundle),
            TokenAuth::AccessToken(only) => Self::AccessToken(only.access_token),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SignedInResponse {
    pub member: MemberProfile,
    pub tokens: TokenBundle,
}

#[derive(Debug, Serialize)]
pub struct MemberResponse {
    pub member: MemberProfile,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub expires_at: i64,
}
