use crate::adapters::tracking::TrackingProvider;
use crate::adapters::wix::WixClientFactory;
use crate::domain::order::Shipment;
use crate::domain::tracking::{TrackingInfo, TrackingRequest};
use crate::error::{AppError, Result};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackingQuery {
    Number(TrackingRequest),
    /// Tracking number and carrier are read from the order's fulfillments.
    Order(String),
}

impl TrackingQuery {
    /// Builds a query from the route's optional parameters. An order id wins
    /// over an explicit tracking number.
    ///
    /// # Errors
    /// `BadRequest` when neither an order id nor a complete number/carrier pair is given.
    pub fn from_params(
        tracking_number: Option<String>,
        carrier_code: Option<String>,
        order_id: Option<String>,
    ) -> Result<Self> {
        let present = |value: Option<String>| value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(order_id) = present(order_id) {
            return Ok(Self::Order(order_id));
        }
        match (present(tracking_number), present(carrier_code)) {
            (Some(tracking_number), Some(carrier_code)) => {
                Ok(Self::Number(TrackingRequest { tracking_number, carrier_code: carrier_code.to_lowercase() }))
            }
            _ => Err(AppError::BadRequest("trackingNumber and carrierCode, or orderId, are required".into())),
        }
    }
}

#[derive(Clone, Debug)]
pub struct TrackingService {
    wix: WixClientFactory,
    provider: Option<Arc<dyn TrackingProvider>>,
}

impl TrackingService {
    #[must_use]
    pub fn new(wix: WixClientFactory, provider: Option<Arc<dyn TrackingProvider>>) -> Self {
        Self { wix, provider }
    }

    /// # Errors
    /// `Unavailable` without a tracking provider, `NotFound` when the order has
    /// no tracked shipment or the carrier does not know the number.
    #[tracing::instrument(skip(self), err(level = "warn"))]
    pub async fn track(&self, query: TrackingQuery) -> Result<TrackingInfo> {
        let provider = self
            .provider
            .as_ref()
            .ok_or_else(|| AppError::Unavailable("Tracking is not configured".into()))?;

        let request = match query {
            TrackingQuery::Number(request) => request,
            TrackingQuery::Order(order_id) => self.request_for_order(&order_id).await?,
        };

        Ok(provider.track(&request).await?)
    }

    async fn request_for_order(&self, order_id: &str) -> Result<TrackingRequest> {
        let admin = self.wix.admin()?;
        let shipments = admin.orders().shipments(order_id).await?;
        shipments.into_iter().find_map(tracking_request).ok_or_else(|| {
            tracing::debug!(order.id = %order_id, "Order has no tracked shipment");
            AppError::NotFound
        })
    }
}

fn tracking_request(shipment: Shipment) -> Option<TrackingRequest> {
    let carrier = shipment.carrier?.trim().to_lowercase().replace([' ', '-'], "_");
    if carrier.is_empty() {
        return None;
    }
    let carrier_code = if carrier == "dhl" { "dhl_express".to_string() } else { carrier };
    Some(TrackingRequest { tracking_number: shipment.tracking_number, carrier_code })
}
