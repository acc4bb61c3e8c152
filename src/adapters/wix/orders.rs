use crate::adapters::wix::records::{FulfillmentRecord, OrderRecord};
use crate::adapters::wix::{WixClient, WixError, send_json};
use crate::domain::order::{Order, Shipment};
use reqwest::Method;
use serde::Deserialize;
use serde_json::json;

#[derive(Deserialize)]
struct OrdersResponse {
    #[serde(default)]
    orders: Vec<OrderRecord>,
}

#[derive(Deserialize)]
struct OrderEnvelope {
    order: OrderRecord,
}

#[derive(Deserialize)]
struct OrderFulfillments {
    #[serde(default)]
    fulfillments: Vec<FulfillmentRecord>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FulfillmentsResponse {
    order_with_fulfillments: Option<OrderFulfillments>,
}

#[derive(Debug)]
pub struct Orders<'a> {
    client: &'a WixClient,
}

impl<'a> Orders<'a> {
    pub(crate) const fn new(client: &'a WixClient) -> Self {
        Self { client }
    }

    /// Orders visible to the client's identity, newest first.
    ///
    /// # Errors
    /// Propagates platform errors.
    pub async fn search(&self, limit: u32) -> Result<Vec<Order>, WixError> {
        let body = json!({
            "search": {
                "cursorPaging": { "limit": limit },
                "sort": [{ "fieldName": "createdDate", "order": "DESC" }]
            }
        });
        let response: OrdersResponse =
            send_json(self.client.request(Method::POST, "/ecom/v1/orders/search").json(&body)).await?;
        Ok(response.orders.into_iter().map(Order::from).collect())
    }

    /// # Errors
    /// Unknown ids surface as `WixError::Api` with status 404.
    pub async fn get(&self, order_id: &str) -> Result<Order, WixError> {
        let path = format!("/ecom/v1/orders/{}", urlencoding::encode(order_id));
        let envelope: OrderEnvelope = send_json(self.client.request(Method::GET, &path)).await?;
        Ok(envelope.order.into())
    }

    /// Carrier references of the order's fulfillments that carry a tracking number.
    ///
    /// # Errors
    /// Propagates platform errors.
    pub async fn shipments(&self, order_id: &str) -> Result<Vec<Shipment>, WixError> {
        let path = format!("/ecom/v1/fulfillments/orders/{}", urlencoding::encode(order_id));
        let response: FulfillmentsResponse = send_json(self.client.request(Method::GET, &path)).await?;
        Ok(response
            .order_with_fulfillments
            .map(|o| o.fulfillments.into_iter().filter_map(FulfillmentRecord::into_shipment).collect())
            .unwrap_or_default())
    }
}
