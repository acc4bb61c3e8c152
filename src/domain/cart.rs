use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    pub amount: String,
    pub formatted: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub id: String,
    pub product_id: Option<String>,
    pub name: String,
    pub quantity: u32,
    pub price: Money,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub id: Option<String>,
    pub currency: Option<String>,
    pub line_items: Vec<CartLine>,
    pub subtotal: Option<Money>,
}

impl Cart {
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.line_items.iter().map(|line| line.quantity).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCartLine {
    pub product_id: String,
    pub quantity: u32,
    pub options: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRedirect {
    pub checkout_id: String,
    pub checkout_url: String,
}
