use crate::adapters::auction::{AuctionClient, ProxiedResponse, parser};
use crate::domain::auction::{AuctionSnapshot, Bid, BidOutcome};
use crate::error::{AppError, Result};
use opentelemetry::{KeyValue, global, metrics::Counter};

#[derive(Clone, Debug)]
struct Metrics {
    bids_total: Counter<u64>,
}

impl Metrics {
    fn new() -> Self {
        let meter = global::meter("pokecollect-server");
        Self {
            bids_total: meter
                .u64_counter("auction_bids_total")
                .with_description("Bids forwarded to the auction host by outcome")
                .build(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AuctionService {
    client: AuctionClient,
    metrics: Metrics,
}

impl AuctionService {
    #[must_use]
    pub fn new(client: AuctionClient) -> Self {
        Self { client, metrics: Metrics::new() }
    }

    /// # Errors
    /// `Upstream` when the auction page cannot be fetched.
    #[tracing::instrument(skip(self), err(level = "warn"))]
    pub async fn snapshot(&self, auction_id: &str) -> Result<AuctionSnapshot> {
        let auction_id = require_id(auction_id)?;
        let html = self.client.fetch_page(auction_id).await?;
        Ok(parser::parse_snapshot(auction_id, &html))
    }

    /// Submits a bid and reads the outcome from the returned page.
    ///
    /// # Errors
    /// `BadRequest` for a missing auction id or a non-positive amount.
    #[tracing::instrument(skip(self, bid), fields(auction.id = %bid.auction_id, amount = bid.amount), err(level = "warn"))]
    pub async fn place_bid(&self, mut bid: Bid) -> Result<BidOutcome> {
        bid.auction_id = require_id(&bid.auction_id)?.to_string();
        if !bid.amount.is_finite() || bid.amount <= 0.0 {
            return Err(AppError::BadRequest("amount must be greater than zero".into()));
        }
        bid.bidder_name = bid.bidder_name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty());

        let page = self.client.place_bid(&bid).await?;
        let message = parser::parse_bid_error(&page.html);
        let accepted = page.success && message.is_none();
        let snapshot = parser::parse_snapshot(&bid.auction_id, &page.html);

        self.metrics
            .bids_total
            .add(1, &[KeyValue::new("outcome", if accepted { "accepted" } else { "rejected" })]);
        if accepted {
            tracing::info!(bid_count = snapshot.bid_count, "Bid accepted");
        } else {
            tracing::info!(reason = message.as_deref().unwrap_or("unknown"), "Bid rejected");
        }

        Ok(BidOutcome { accepted, message, snapshot })
    }

    /// # Errors
    /// `Upstream` on transport failures; upstream statuses are relayed as-is.
    #[tracing::instrument(skip(self), err(level = "warn"))]
    pub async fn proxy(&self, raw_query: Option<&str>) -> Result<ProxiedResponse> {
        Ok(self.client.proxy(raw_query).await?)
    }
}

fn require_id(auction_id: &str) -> Result<&str> {
    let auction_id = auction_id.trim();
    if auction_id.is_empty() {
        return Err(AppError::BadRequest("auctionId is required".into()));
    }
    Ok(auction_id)
}
