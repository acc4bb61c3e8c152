use crate::adapters::wix::WixClientFactory;
use crate::domain::member::{MemberProfile, ProfileUpdate};
use crate::domain::tokens::TokenBundle;
use crate::error::Result;
use crate::services::{WithSession, resume_member};

#[derive(Clone, Debug)]
pub struct MemberService {
    wix: WixClientFactory,
}

impl MemberService {
    #[must_use]
    pub const fn new(wix: WixClientFactory) -> Self {
        Self { wix }
    }

    /// # Errors
    /// `Unauthorized` when the session is no longer valid.
    #[tracing::instrument(skip(self, session), err(level = "warn"))]
    pub async fn profile(&self, session: TokenBundle) -> Result<WithSession<MemberProfile>> {
        let client = resume_member(&self.wix, session).await?;
        let member = client.members().get_current().await?;
        Ok(WithSession::from_client(member, &client))
    }

    /// Applies the present fields of `update`. An empty update returns the
    /// profile unchanged.
    ///
    /// # Errors
    /// `Unauthorized` when the session is no longer valid.
    #[tracing::instrument(skip(self, session, update), err(level = "warn"))]
    pub async fn update_profile(
        &self,
        session: TokenBundle,
        update: ProfileUpdate,
    ) -> Result<WithSession<MemberProfile>> {
        let client = resume_member(&self.wix, session).await?;
        let current = client.members().get_current().await?;
        if update.is_empty() {
            return Ok(WithSession::from_client(current, &client));
        }

        let updated = client.members().update(&current.id, &update).await?;
        tracing::info!(member.id = %updated.id, "Profile updated");
        Ok(WithSession::from_client(updated, &client))
    }
}
