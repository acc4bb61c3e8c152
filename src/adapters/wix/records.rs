//! Wire shapes of the platform's JSON records. Only the fields the storefront
//! renders are modelled; everything else is ignored.

use crate::domain::cart::{Cart, CartLine, Money};
use crate::domain::catalog::{Collection, Product};
use crate::domain::member::MemberProfile;
use crate::domain::order::{Order, OrderLine, Shipment};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub(crate) struct ImageRecord {
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MainMediaRecord {
    pub image: Option<ImageRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MediaRecord {
    pub main_media: Option<MainMediaRecord>,
}

impl MediaRecord {
    fn image_url(self) -> Option<String> {
        self.main_media.and_then(|m| m.image).and_then(|i| i.url)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct FormattedPriceRecord {
    pub price: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PriceDataRecord {
    pub currency: Option<String>,
    pub price: Option<f64>,
    pub formatted: Option<FormattedPriceRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StockRecord {
    pub in_stock: Option<bool>,
    pub quantity: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProductRecord {
    pub id: String,
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub price_data: Option<PriceDataRecord>,
    pub media: Option<MediaRecord>,
    pub stock: Option<StockRecord>,
    #[serde(default)]
    pub collection_ids: Vec<String>,
}

impl From<ProductRecord> for Product {
    fn from(record: ProductRecord) -> Self {
        let (price, formatted_price, currency) = record.price_data.map_or((0.0, None, None), |p| {
            (p.price.unwrap_or_default(), p.formatted.and_then(|f| f.price), p.currency)
        });
        let (in_stock, quantity) = record.stock.map_or((false, None), |s| (s.in_stock.unwrap_or(false), s.quantity));

        Self {
            id: record.id,
            name: record.name.unwrap_or_default(),
            slug: record.slug.unwrap_or_default(),
            description: record.description,
            price,
            formatted_price,
            currency,
            image_url: record.media.and_then(MediaRecord::image_url),
            in_stock,
            quantity,
            collection_ids: record.collection_ids,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CollectionRecord {
    pub id: String,
    pub name: Option<String>,
    pub slug: Option<String>,
    pub number_of_products: Option<i64>,
    pub media: Option<MediaRecord>,
}

impl From<CollectionRecord> for Collection {
    fn from(record: CollectionRecord) -> Self {
        Self {
            id: record.id,
            name: record.name.unwrap_or_default(),
            slug: record.slug.unwrap_or_default(),
            product_count: record.number_of_products,
            image_url: record.media.and_then(MediaRecord::image_url),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MoneyRecord {
    pub amount: Option<String>,
    pub formatted_amount: Option<String>,
}

impl From<MoneyRecord> for Money {
    fn from(record: MoneyRecord) -> Self {
        Self { amount: record.amount.unwrap_or_else(|| "0".to_string()), formatted: record.formatted_amount }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct LocalizedName {
    pub original: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CatalogReferenceRecord {
    pub catalog_item_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LineItemRecord {
    pub id: String,
    pub quantity: Option<u32>,
    pub product_name: Option<LocalizedName>,
    pub price: Option<MoneyRecord>,
    pub image: Option<Value>,
    pub catalog_reference: Option<CatalogReferenceRecord>,
}

impl LineItemRecord {
    fn name(&mut self) -> String {
        self.product_name.take().and_then(|n| n.original).unwrap_or_default()
    }
}

impl From<LineItemRecord> for CartLine {
    fn from(mut record: LineItemRecord) -> Self {
        let name = record.name();
        Self {
            id: record.id,
            product_id: record.catalog_reference.and_then(|c| c.catalog_item_id),
            name,
            quantity: record.quantity.unwrap_or(1),
            price: record.price.map(Money::from).unwrap_or_default(),
            image_url: record.image.as_ref().and_then(image_url),
        }
    }
}

impl From<LineItemRecord> for OrderLine {
    fn from(mut record: LineItemRecord) -> Self {
        let name = record.name();
        Self { id: record.id, name, quantity: record.quantity.unwrap_or(1), price: record.price.map(Money::from) }
    }
}

/// Line item images come either as a bare URL string or as an image object.
fn image_url(value: &Value) -> Option<String> {
    match value {
        Value::String(url) => Some(url.clone()),
        Value::Object(object) => object.get("url").and_then(Value::as_str).map(str::to_string),
        _ => None,
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CartRecord {
    pub id: Option<String>,
    pub currency: Option<String>,
    #[serde(default)]
    pub line_items: Vec<LineItemRecord>,
    pub subtotal: Option<MoneyRecord>,
}

impl From<CartRecord> for Cart {
    fn from(record: CartRecord) -> Self {
        Self {
            id: record.id,
            currency: record.currency,
            line_items: record.line_items.into_iter().map(CartLine::from).collect(),
            subtotal: record.subtotal.map(Money::from),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct PriceSummaryRecord {
    pub total: Option<MoneyRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderRecord {
    pub id: String,
    pub number: Option<Value>,
    pub created_date: Option<String>,
    pub status: Option<String>,
    pub payment_status: Option<String>,
    pub fulfillment_status: Option<String>,
    pub price_summary: Option<PriceSummaryRecord>,
    #[serde(default)]
    pub line_items: Vec<LineItemRecord>,
}

impl From<OrderRecord> for Order {
    fn from(record: OrderRecord) -> Self {
        Self {
            id: record.id,
            number: record.number.map(|n| match n {
                Value::String(s) => s,
                other => other.to_string(),
            }),
            created_date: record.created_date,
            status: record.status,
            payment_status: record.payment_status,
            fulfillment_status: record.fulfillment_status,
            total: record.price_summary.and_then(|p| p.total).map(Money::from),
            line_items: record.line_items.into_iter().map(OrderLine::from).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TrackingInfoRecord {
    pub tracking_number: Option<String>,
    pub shipping_provider: Option<String>,
    pub tracking_link: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FulfillmentRecord {
    pub tracking_info: Option<TrackingInfoRecord>,
}

impl FulfillmentRecord {
    pub(crate) fn into_shipment(self) -> Option<Shipment> {
        let info = self.tracking_info?;
        let tracking_number = info.tracking_number.filter(|n| !n.trim().is_empty())?;
        Some(Shipment { tracking_number, carrier: info.shipping_provider, tracking_link: info.tracking_link })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ContactRecord {
    #[serde(rename = "firstName")]
    pub first_name: Option<String>,
    #[serde(rename = "lastName")]
    pub last_name: Option<String>,
    #[serde(default)]
    pub phones: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProfileRecord {
    pub nickname: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MemberRecord {
    pub id: String,
    pub login_email: Option<String>,
    pub contact: Option<ContactRecord>,
    pub profile: Option<ProfileRecord>,
}

impl From<MemberRecord> for MemberProfile {
    fn from(record: MemberRecord) -> Self {
        let (first_name, last_name, phone) = record
            .contact
            .map_or((None, None, None), |c| (c.first_name, c.last_name, c.phones.into_iter().next()));

        Self {
            id: record.id,
            login_email: record.login_email,
            first_name,
            last_name,
            phone,
            nickname: record.profile.and_then(|p| p.nickname),
        }
    }
}
