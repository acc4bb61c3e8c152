use crate::adapters::wix::records::CartRecord;
use crate::adapters::wix::{STORES_APP_ID, WixClient, WixError, send_json};
use crate::domain::cart::{Cart, NewCartLine};
use reqwest::Method;
use serde::{Deserialize, Serialize};

const CART_PATH: &str = "/ecom/v1/carts/current";

#[derive(Deserialize)]
struct CartEnvelope {
    cart: CartRecord,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CatalogReference<'a> {
    catalog_item_id: &'a str,
    app_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<&'a serde_json::Value>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NewLineItem<'a> {
    catalog_reference: CatalogReference<'a>,
    quantity: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AddToCartRequest<'a> {
    line_items: Vec<NewLineItem<'a>>,
}

#[derive(Serialize)]
struct QuantityUpdate<'a> {
    id: &'a str,
    quantity: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateQuantityRequest<'a> {
    line_items: [QuantityUpdate<'a>; 1],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RemoveRequest<'a> {
    line_item_ids: [&'a str; 1],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateCheckoutRequest {
    channel_type: &'static str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateCheckoutResponse {
    checkout_id: String,
}

/// The cart owned by the client's visitor or member identity.
#[derive(Debug)]
pub struct CurrentCart<'a> {
    client: &'a WixClient,
}

impl<'a> CurrentCart<'a> {
    pub(crate) const fn new(client: &'a WixClient) -> Self {
        Self { client }
    }

    /// Returns an empty cart when the identity has none yet.
    ///
    /// # Errors
    /// Propagates platform errors other than 404.
    pub async fn get(&self) -> Result<Cart, WixError> {
        match send_json::<CartEnvelope>(self.client.request(Method::GET, CART_PATH)).await {
            Ok(envelope) => Ok(envelope.cart.into()),
            Err(WixError::Api { status: 404, .. }) => Ok(Cart::default()),
            Err(e) => Err(e),
        }
    }

    /// Adds store products, creating the cart if needed.
    ///
    /// # Errors
    /// Propagates platform errors.
    pub async fn add(&self, lines: &[NewCartLine]) -> Result<Cart, WixError> {
        let body = AddToCartRequest {
            line_items: lines
                .iter()
                .map(|line| NewLineItem {
                    catalog_reference: CatalogReference {
                        catalog_item_id: &line.product_id,
                        app_id: STORES_APP_ID,
                        options: line.options.as_ref(),
                    },
                    quantity: line.quantity,
                })
                .collect(),
        };
        self.mutate("/add-to-cart", &body).await
    }

    /// # Errors
    /// Propagates platform errors.
    pub async fn update_quantity(&self, line_item_id: &str, quantity: u32) -> Result<Cart, WixError> {
        let body = UpdateQuantityRequest { line_items: [QuantityUpdate { id: line_item_id, quantity }] };
        self.mutate("/update-line-items-quantity", &body).await
    }

    /// # Errors
    /// Propagates platform errors.
    pub async fn remove(&self, line_item_id: &str) -> Result<Cart, WixError> {
        let body = RemoveRequest { line_item_ids: [line_item_id] };
        self.mutate("/remove-line-items", &body).await
    }

    /// Creates a checkout from the cart and returns its id.
    ///
    /// # Errors
    /// Propagates platform errors.
    pub async fn create_checkout(&self) -> Result<String, WixError> {
        let body = CreateCheckoutRequest { channel_type: "WEB" };
        let path = format!("{CART_PATH}/create-checkout");
        let response: CreateCheckoutResponse =
            send_json(self.client.request(Method::POST, &path).json(&body)).await?;
        Ok(response.checkout_id)
    }

    async fn mutate<B: Serialize + Sync>(&self, action: &str, body: &B) -> Result<Cart, WixError> {
        let path = format!("{CART_PATH}{action}");
        let envelope: CartEnvelope = send_json(self.client.request(Method::POST, &path).json(body)).await?;
        Ok(envelope.cart.into())
    }
}
