use crate::adapters::wix::{WixClient, WixClientFactory};
use crate::domain::tokens::TokenBundle;
use crate::error::{AppError, Result};

pub mod auction_service;
pub mod auth_service;
pub mod cart_service;
pub mod catalog_service;
pub mod health_service;
pub mod member_service;
pub mod order_service;
pub mod tracking_service;

/// An operation's result plus tokens that were minted or refreshed on the
/// way and must be written back to the session cookies.
#[derive(Debug)]
pub struct WithSession<T> {
    pub value: T,
    pub session: Option<TokenBundle>,
}

impl<T> WithSession<T> {
    pub(crate) fn from_client(value: T, client: &WixClient) -> Self {
        Self { value, session: client.renewed_tokens().cloned() }
    }
}

/// Resumes a member session. A rejected refresh means the session is over.
pub(crate) async fn resume_member(wix: &WixClientFactory, tokens: TokenBundle) -> Result<WixClient> {
    wix.resume(tokens).await.map_err(|e| {
        if e.is_client_error() {
            tracing::debug!(error = %e, "Refresh grant rejected");
            AppError::Unauthorized
        } else {
            AppError::from(e)
        }
    })
}
