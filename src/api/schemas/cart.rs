use crate::domain::cart::{Cart, NewCartLine};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItem {
    #[serde(default)]
    pub product_id: String,
    pub quantity: Option<i64>,
    pub options: Option<serde_json::Value>,
}

impl AddItem {
    /// Missing quantity means one; negative values clamp to zero and are
    /// rejected downstream.
    #[must_use]
    pub fn into_line(self) -> NewCartLine {
        NewCartLine { product_id: self.product_id, quantity: clamp_quantity(self.quantity.unwrap_or(1)), options: self.options }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateItem {
    pub quantity: i64,
}

impl UpdateItem {
    #[must_use]
    pub fn quantity(&self) -> u32 {
        clamp_quantity(self.quantity)
    }
}

fn clamp_quantity(quantity: i64) -> u32 {
    u32::try_from(quantity.max(0)).unwrap_or(u32::MAX)
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checkout {
    pub post_flow_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CartResponse {
    pub cart: Cart,
}
