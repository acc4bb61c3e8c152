use crate::adapters::tracking::{TrackingError, TrackingProvider};
use crate::domain::tracking::{TrackingEvent, TrackingInfo, TrackingRequest};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct EventRecord {
    occurred_at: Option<String>,
    description: Option<String>,
    city_locality: Option<String>,
    state_province: Option<String>,
    country_code: Option<String>,
}

impl From<EventRecord> for TrackingEvent {
    fn from(record: EventRecord) -> Self {
        let parts: Vec<String> = [record.city_locality, record.state_province, record.country_code]
            .into_iter()
            .flatten()
            .filter(|part| !part.trim().is_empty())
            .collect();
        Self {
            occurred_at: record.occurred_at,
            description: record.description,
            location: (!parts.is_empty()).then(|| parts.join(", ")),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TrackingRecord {
    tracking_number: Option<String>,
    status_code: Option<String>,
    status_description: Option<String>,
    carrier_status_description: Option<String>,
    estimated_delivery_date: Option<String>,
    actual_delivery_date: Option<String>,
    #[serde(default)]
    events: Vec<EventRecord>,
}

#[derive(Debug, Deserialize)]
struct ErrorRecord {
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    errors: Vec<ErrorRecord>,
}

/// ShipEngine tracking lookups (`GET /v1/tracking`).
#[derive(Debug, Clone)]
pub struct ShipEngineProvider {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl ShipEngineProvider {
    #[must_use]
    pub fn new(http: reqwest::Client, base_url: &str, api_key: String) -> Self {
        Self { http, base_url: base_url.trim_end_matches('/').to_string(), api_key }
    }
}

#[async_trait]
impl TrackingProvider for ShipEngineProvider {
    async fn track(&self, request: &TrackingRequest) -> Result<TrackingInfo, TrackingError> {
        let response = self
            .http
            .get(format!("{}/v1/tracking", self.base_url))
            .header("API-Key", &self.api_key)
            .query(&[("carrier_code", request.carrier_code.as_str()), ("tracking_number", request.tracking_number.as_str())])
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(TrackingError::NotFound);
        }
        if !status.is_success() {
            let message = response
                .json::<ErrorResponse>()
                .await
                .ok()
                .and_then(|e| e.errors.into_iter().find_map(|r| r.message))
                .unwrap_or_else(|| status.to_string());
            return Err(if status.is_client_error() {
                TrackingError::Rejected(message)
            } else {
                TrackingError::Service(message)
            });
        }

        let record: TrackingRecord = response.json().await?;
        Ok(TrackingInfo {
            tracking_number: record.tracking_number.unwrap_or_else(|| request.tracking_number.clone()),
            carrier_code: request.carrier_code.clone(),
            status_code: record.status_code,
            status_description: record.status_description.or(record.carrier_status_description),
            estimated_delivery: record.estimated_delivery_date,
            actual_delivery: record.actual_delivery_date,
            events: record.events.into_iter().map(TrackingEvent::from).collect(),
        })
    }
}
