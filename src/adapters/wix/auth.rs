use crate::adapters::wix::{WixClient, WixError, send_json};
use reqwest::Method;
use serde::{Deserialize, Serialize};

const LOGIN_PATH: &str = "/_api/iam/authentication/v2/login";
const REGISTER_PATH: &str = "/_api/iam/authentication/v2/register";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginState {
    Success,
    /// Any other state, e.g. `REQUIRE_EMAIL_VERIFICATION` or `REQUIRE_OWNER_APPROVAL`.
    Pending(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub state: LoginState,
    pub session_token: Option<String>,
    pub member_id: Option<String>,
}

#[derive(Serialize)]
struct LoginId<'a> {
    email: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Profile<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    first_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_name: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AuthRequest<'a> {
    login_id: LoginId<'a>,
    password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    profile: Option<Profile<'a>>,
}

#[derive(Deserialize)]
struct IdentityRecord {
    id: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthResponse {
    state: String,
    session_token: Option<String>,
    identity: Option<IdentityRecord>,
}

impl From<AuthResponse> for LoginOutcome {
    fn from(response: AuthResponse) -> Self {
        let state = if response.state.eq_ignore_ascii_case("SUCCESS") {
            LoginState::Success
        } else {
            LoginState::Pending(response.state)
        };
        Self { state, session_token: response.session_token, member_id: response.identity.and_then(|i| i.id) }
    }
}

/// Member authentication (the platform's IAM endpoints).
#[derive(Debug)]
pub struct Authentication<'a> {
    client: &'a WixClient,
}

impl<'a> Authentication<'a> {
    pub(crate) const fn new(client: &'a WixClient) -> Self {
        Self { client }
    }

    /// # Errors
    /// Propagates platform errors; wrong credentials surface as `WixError::Api`.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, WixError> {
        let body = AuthRequest { login_id: LoginId { email }, password, profile: None };
        let response: AuthResponse = send_json(self.client.request(Method::POST, LOGIN_PATH).json(&body)).await?;
        Ok(response.into())
    }

    /// # Errors
    /// Propagates platform errors; an existing email surfaces as `WixError::Api` with status 409.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        first_name: Option<&str>,
        last_name: Option<&str>,
    ) -> Result<LoginOutcome, WixError> {
        let profile = (first_name.is_some() || last_name.is_some()).then_some(Profile { first_name, last_name });
        let body = AuthRequest { login_id: LoginId { email }, password, profile };
        let response: AuthResponse = send_json(self.client.request(Method::POST, REGISTER_PATH).json(&body)).await?;
        Ok(response.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_state_yields_session_token() {
        let response: AuthResponse = serde_json::from_value(json!({
            "state": "SUCCESS",
            "sessionToken": "JWS.session",
            "identity": { "id": "member-1" }
        }))
        .unwrap();
        let outcome = LoginOutcome::from(response);
        assert_eq!(outcome.state, LoginState::Success);
        assert_eq!(outcome.member_id.as_deref(), Some("member-1"));
        assert_eq!(outcome.session_token.as_deref(), Some("JWS.session"));
    }

    #[test]
    fn test_pending_state_is_reported() {
        let response: AuthResponse =
            serde_json::from_value(json!({ "state": "REQUIRE_EMAIL_VERIFICATION" })).unwrap();
        let outcome = LoginOutcome::from(response);
        assert_eq!(outcome.state, LoginState::Pending("REQUIRE_EMAIL_VERIFICATION".to_string()));
        assert!(outcome.session_token.is_none());
    }

    #[test]
    fn test_register_body_omits_empty_profile() {
        let body = AuthRequest { login_id: LoginId { email: "a@b.c" }, password: "pw", profile: None };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({ "loginId": { "email": "a@b.c" }, "password": "pw" })
        );
    }
}
