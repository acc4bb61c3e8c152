//! Client for the third-party auction host. It only speaks HTML.

use crate::config::AuctionConfig;
use crate::domain::auction::Bid;
use reqwest::header::CONTENT_TYPE;
use thiserror::Error;

pub mod parser;

#[derive(Error, Debug)]
pub enum AuctionError {
    #[error("Auction request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Auction host returned {0}")]
    Status(u16),
}

/// Page returned after submitting a bid. Client errors (4xx) still carry a
/// page explaining the rejection.
#[derive(Debug, Clone)]
pub struct BidPage {
    pub success: bool,
    pub html: String,
}

/// Upstream response relayed verbatim by the proxy route.
#[derive(Debug, Clone)]
pub struct ProxiedResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

#[derive(Clone, Debug)]
pub struct AuctionClient {
    http: reqwest::Client,
    base_url: String,
    proxy_path: String,
}

impl AuctionClient {
    #[must_use]
    pub fn new(config: &AuctionConfig, http: reqwest::Client) -> Self {
        let proxy_path = if config.proxy_path.starts_with('/') {
            config.proxy_path.clone()
        } else {
            format!("/{}", config.proxy_path)
        };
        Self { http, base_url: config.base_url.trim_end_matches('/').to_string(), proxy_path }
    }

    fn auction_url(&self, auction_id: &str) -> String {
        format!("{}/auction/{}", self.base_url, urlencoding::encode(auction_id))
    }

    /// # Errors
    /// Fails on transport errors and non-2xx statuses.
    pub async fn fetch_page(&self, auction_id: &str) -> Result<String, AuctionError> {
        let response = self.http.get(self.auction_url(auction_id)).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AuctionError::Status(status.as_u16()));
        }
        Ok(response.text().await?)
    }

    /// # Errors
    /// Fails on transport errors and 5xx statuses.
    pub async fn place_bid(&self, bid: &Bid) -> Result<BidPage, AuctionError> {
        let amount = format!("{:.2}", bid.amount);
        let mut form = vec![("amount", amount.as_str())];
        if let Some(name) = bid.bidder_name.as_deref() {
            form.push(("bidder", name));
        }

        let url = format!("{}/bid", self.auction_url(&bid.auction_id));
        let response = self.http.post(url).form(&form).send().await?;
        let status = response.status();
        if status.is_server_error() {
            return Err(AuctionError::Status(status.as_u16()));
        }
        Ok(BidPage { success: status.is_success(), html: response.text().await? })
    }

    /// Forwards a raw query string to the fixed proxy target.
    ///
    /// # Errors
    /// Fails only on transport errors; any status is relayed.
    pub async fn proxy(&self, raw_query: Option<&str>) -> Result<ProxiedResponse, AuctionError> {
        let mut url = format!("{}{}", self.base_url, self.proxy_path);
        if let Some(query) = raw_query.filter(|q| !q.is_empty()) {
            url.push('?');
            url.push_str(query);
        }

        let response = self.http.get(url).send().await?;
        let status = response.status().as_u16();
        let content_type =
            response.headers().get(CONTENT_TYPE).and_then(|v| v.to_str().ok()).map(str::to_string);
        let body = response.bytes().await?.to_vec();
        Ok(ProxiedResponse { status, content_type, body })
    }
}
