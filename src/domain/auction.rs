use serde::Serialize;

/// Bid state scraped from the auction host. Unparsed fields are zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuctionSnapshot {
    pub auction_id: String,
    pub current_bid: f64,
    pub bid_count: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bid {
    pub auction_id: String,
    pub amount: f64,
    pub bidder_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BidOutcome {
    pub accepted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub snapshot: AuctionSnapshot,
}
