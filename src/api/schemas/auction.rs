use crate::domain::auction::Bid;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceBid {
    #[serde(default)]
    pub auction_id: String,
    #[serde(default)]
    pub amount: f64,
    pub bidder_name: Option<String>,
}

impl From<PlaceBid> for Bid {
    fn from(body: PlaceBid) -> Self {
        Self { auction_id: body.auction_id, amount: body.amount, bidder_name: body.bidder_name }
    }
}
