use crate::adapters::wix::WixClientFactory;
use crate::domain::order::Order;
use crate::domain::tokens::TokenBundle;
use crate::error::Result;
use crate::services::{WithSession, resume_member};

const ORDER_PAGE_SIZE: u32 = 50;

/// Order history of the signed-in member.
#[derive(Clone, Debug)]
pub struct OrderService {
    wix: WixClientFactory,
}

impl OrderService {
    #[must_use]
    pub const fn new(wix: WixClientFactory) -> Self {
        Self { wix }
    }

    /// # Errors
    /// `Unauthorized` when the session is no longer valid.
    #[tracing::instrument(skip(self, session), err(level = "warn"))]
    pub async fn orders(&self, session: TokenBundle) -> Result<WithSession<Vec<Order>>> {
        let client = resume_member(&self.wix, session).await?;
        let orders = client.orders().search(ORDER_PAGE_SIZE).await?;
        Ok(WithSession::from_client(orders, &client))
    }

    /// # Errors
    /// `NotFound` for unknown ids or orders of other members.
    #[tracing::instrument(skip(self, session), err(level = "warn"))]
    pub async fn order(&self, session: TokenBundle, order_id: &str) -> Result<WithSession<Order>> {
        let client = resume_member(&self.wix, session).await?;
        let order = client.orders().get(order_id).await?;
        Ok(WithSession::from_client(order, &client))
    }
}
