use crate::adapters::wix::auth::{LoginOutcome, LoginState};
use crate::adapters::wix::{WixClient, WixClientFactory, WixError};
use crate::domain::member::MemberProfile;
use crate::domain::tokens::TokenBundle;
use crate::error::{AppError, Result};
use crate::services::{WithSession, resume_member};
use opentelemetry::{KeyValue, global, metrics::Counter};

#[derive(Clone, Debug)]
struct Metrics {
    login_total: Counter<u64>,
    register_total: Counter<u64>,
    refresh_total: Counter<u64>,
}

impl Metrics {
    fn new() -> Self {
        let meter = global::meter("pokecollect-server");
        Self {
            login_total: meter
                .u64_counter("auth_login_total")
                .with_description("Login attempts by outcome")
                .build(),
            register_total: meter
                .u64_counter("auth_register_total")
                .with_description("Registration attempts by outcome")
                .build(),
            refresh_total: meter
                .u64_counter("auth_refresh_total")
                .with_description("Total number of forced token refreshes")
                .build(),
        }
    }
}

/// A member signed in by login, registration or token hand-off.
#[derive(Debug, Clone)]
pub struct SignedIn {
    pub member: MemberProfile,
    pub tokens: TokenBundle,
}

/// Credentials accepted by the token hand-off route.
#[derive(Debug, Clone)]
pub enum TokenGrant {
    Bundle(TokenBundle),
    AccessToken(String),
}

#[derive(Debug, Clone)]
pub struct NewMember {
    pub email: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Clone, Debug)]
pub struct AuthService {
    wix: WixClientFactory,
    metrics: Metrics,
}

impl AuthService {
    #[must_use]
    pub fn new(wix: WixClientFactory) -> Self {
        Self { wix, metrics: Metrics::new() }
    }

    /// Logs a member in with email and password and returns member tokens.
    ///
    /// # Errors
    /// `BadRequest` for blank input, `Unauthorized` for wrong credentials,
    /// `LoginPending` when the platform needs further action.
    #[tracing::instrument(skip(self, email, password), fields(member.id = tracing::field::Empty), err(level = "warn"))]
    pub async fn login(&self, email: &str, password: &str) -> Result<SignedIn> {
        let (email, password) = validate_credentials(email, password)?;

        let result = async {
            let visitor = self.wix.visitor().await?;
            let outcome = visitor.auth().login(email, password).await.map_err(rejected_credentials)?;
            self.complete(outcome).await
        }
        .await;

        self.metrics.login_total.add(1, &[KeyValue::new("outcome", outcome_label(&result))]);
        result
    }

    /// Registers a member and signs them in.
    ///
    /// # Errors
    /// `Conflict` when the email is taken, `LoginPending` when the new member
    /// awaits verification or approval.
    #[tracing::instrument(skip(self, new_member), fields(member.id = tracing::field::Empty), err(level = "warn"))]
    pub async fn register(&self, new_member: NewMember) -> Result<SignedIn> {
        let (email, password) = validate_credentials(&new_member.email, &new_member.password)?;

        let result = async {
            let visitor = self.wix.visitor().await?;
            let outcome = visitor
                .auth()
                .register(email, password, new_member.first_name.as_deref(), new_member.last_name.as_deref())
                .await
                .map_err(|e| match e {
                    WixError::Api { status: 409, .. } => AppError::Conflict("Email is already registered".into()),
                    other => other.into(),
                })?;
            self.complete(outcome).await
        }
        .await;

        self.metrics.register_total.add(1, &[KeyValue::new("outcome", outcome_label(&result))]);
        result
    }

    async fn complete(&self, outcome: LoginOutcome) -> Result<SignedIn> {
        let session_token = match outcome.state {
            LoginState::Success => outcome.session_token.ok_or_else(|| AppError::Upstream {
                status: None,
                message: "Login succeeded without a session token".into(),
            })?,
            LoginState::Pending(state) => {
                tracing::info!(state = %state, "Login requires further action");
                return Err(AppError::LoginPending(state));
            }
        };

        let client = self.wix.from_session_token(&session_token).await?;
        let signed_in = signed_in(&client).await?;
        tracing::Span::current().record("member.id", tracing::field::display(&signed_in.member.id));
        Ok(signed_in)
    }

    /// Builds the platform logout URL for the current session, if any. Never fails:
    /// the cookies are cleared regardless.
    #[tracing::instrument(skip(self, session))]
    pub async fn logout(&self, session: Option<TokenBundle>, post_logout_url: Option<&str>) -> Option<String> {
        let session = session.filter(TokenBundle::is_member)?;

        let result = async {
            let client_id = self.wix.client_id()?;
            let client = self.wix.resume(session).await?;
            client.redirects().logout_url(client_id, post_logout_url).await
        }
        .await;

        match result {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::warn!(error = %e, "Could not create logout redirect");
                None
            }
        }
    }

    /// Resolves the member behind caller-supplied tokens. Bundles are refreshed
    /// when stale and returned for persistence; bare access tokens are used once.
    ///
    /// # Errors
    /// `Unauthorized` when the platform rejects the token.
    #[tracing::instrument(skip(self, grant), err(level = "warn"))]
    pub async fn token_auth(&self, grant: TokenGrant) -> Result<WithSession<MemberProfile>> {
        let client = match grant {
            TokenGrant::Bundle(tokens) => resume_member(&self.wix, tokens).await?,
            TokenGrant::AccessToken(token) => self.wix.direct(&token),
        };

        let member = client.members().get_current().await?;
        Ok(WithSession { value: member, session: client.tokens().cloned() })
    }

    /// # Errors
    /// `Unauthorized` when the session is no longer valid.
    #[tracing::instrument(skip(self, session), err(level = "warn"))]
    pub async fn current_member(&self, session: TokenBundle) -> Result<WithSession<MemberProfile>> {
        let client = resume_member(&self.wix, session).await?;
        let member = client.members().get_current().await?;
        Ok(WithSession::from_client(member, &client))
    }

    /// Runs the refresh grant regardless of the access token's expiry.
    ///
    /// # Errors
    /// `Unauthorized` when the refresh token is rejected.
    #[tracing::instrument(skip(self, session), err(level = "warn"))]
    pub async fn refresh(&self, session: &TokenBundle) -> Result<TokenBundle> {
        let client = self.wix.refreshed(session).await.map_err(rejected_credentials)?;
        let tokens = client.tokens().cloned().ok_or(AppError::Internal)?;
        self.metrics.refresh_total.add(1, &[]);
        Ok(tokens)
    }
}

async fn signed_in(client: &WixClient) -> Result<SignedIn> {
    let member = client.members().get_current().await?;
    let tokens = client.tokens().cloned().ok_or(AppError::Internal)?;
    Ok(SignedIn { member, tokens })
}

fn validate_credentials<'a>(email: &'a str, password: &'a str) -> Result<(&'a str, &'a str)> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err(AppError::BadRequest("Email and password are required".into()));
    }
    Ok((email, password))
}

/// The platform answers bad credentials with assorted 4xx codes.
fn rejected_credentials(err: WixError) -> AppError {
    match err.status() {
        Some(400..=404) => AppError::Unauthorized,
        _ => err.into(),
    }
}

fn outcome_label<T>(result: &Result<T>) -> &'static str {
    match result {
        Ok(_) => "success",
        Err(AppError::Unauthorized) => "rejected",
        Err(AppError::LoginPending(_)) => "pending",
        Err(AppError::Conflict(_)) => "conflict",
        Err(_) => "error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_credentials_are_rejected() {
        assert!(matches!(validate_credentials("  ", "pw"), Err(AppError::BadRequest(_))));
        assert!(matches!(validate_credentials("a@b.c", ""), Err(AppError::BadRequest(_))));
        assert_eq!(validate_credentials(" a@b.c ", "pw").unwrap(), ("a@b.c", "pw"));
    }

    #[test]
    fn test_wrong_password_statuses_become_unauthorized() {
        for status in [400, 401, 403, 404] {
            let err = WixError::Api { status, message: "no".into() };
            assert!(matches!(rejected_credentials(err), AppError::Unauthorized));
        }
        let err = WixError::Api { status: 503, message: "down".into() };
        assert!(matches!(rejected_credentials(err), AppError::Upstream { .. }));
    }
}
