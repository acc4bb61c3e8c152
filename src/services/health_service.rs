use crate::adapters::wix::WixClientFactory;
use crate::config::HealthConfig;
use opentelemetry::{KeyValue, global, metrics::Gauge};
use std::time::Duration;
use tokio::time::timeout;

#[derive(Clone, Debug)]
pub struct Metrics {
    pub status: Gauge<i64>,
}

impl Metrics {
    #[must_use]
    pub(crate) fn new() -> Self {
        let meter = global::meter("pokecollect-server");
        Self {
            status: meter
                .i64_gauge("pokecollect_health_status")
                .with_description("Status of health checks (1 for ok, 0 for error)")
                .build(),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug)]
pub struct HealthService {
    wix: WixClientFactory,
    config: HealthConfig,
    metrics: Metrics,
}

impl HealthService {
    #[must_use]
    pub fn new(wix: WixClientFactory, config: HealthConfig) -> Self {
        Self { wix, config, metrics: Metrics::new() }
    }

    /// Checks that the platform answers HTTP at all; any status counts as reachable.
    ///
    /// # Errors
    /// Returns a string describing the failure if the platform is unreachable.
    pub async fn check_wix(&self) -> Result<(), String> {
        let wix_timeout = Duration::from_millis(self.config.upstream_timeout_ms);
        let request = self.wix.http().head(self.wix.base_url()).send();

        let result = match timeout(wix_timeout, request).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(format!("Wix connection failed: {e}")),
            Err(_) => Err("Wix connection timed out".to_string()),
        };
        self.record("wix", result.is_ok());
        result
    }

    /// Checks that the credentials needed for visitor and member flows are present.
    ///
    /// # Errors
    /// Returns the name of the missing setting.
    pub fn check_config(&self) -> Result<(), String> {
        let result = self.wix.client_id().map(|_| ()).map_err(|e| e.to_string());
        self.record("config", result.is_ok());
        result
    }

    fn record(&self, component: &'static str, ok: bool) {
        self.metrics.status.record(i64::from(ok), &[KeyValue::new("component", component)]);
    }
}
