use crate::domain::tracking::{TrackingInfo, TrackingRequest};
use async_trait::async_trait;
use thiserror::Error;

pub mod shipengine;

#[derive(Error, Debug)]
pub enum TrackingError {
    #[error("Tracking number not found")]
    NotFound,
    #[error("Tracking request rejected: {0}")]
    Rejected(String),
    #[error("Tracking service error: {0}")]
    Service(String),
    #[error("Tracking request failed: {0}")]
    Http(#[from] reqwest::Error),
}

#[async_trait]
pub trait TrackingProvider: Send + Sync + std::fmt::Debug {
    /// Looks up the carrier status of a shipment.
    ///
    /// # Errors
    /// Returns `TrackingError::NotFound` for unknown tracking numbers.
    async fn track(&self, request: &TrackingRequest) -> Result<TrackingInfo, TrackingError>;
}
