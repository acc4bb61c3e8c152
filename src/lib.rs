#![forbid(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::todo)]
#![warn(clippy::panic)]
#![warn(clippy::dbg_macro)]
#![warn(clippy::print_stdout)]
#![warn(clippy::print_stderr)]
#![warn(clippy::clone_on_ref_ptr)]
#![warn(unreachable_pub)]
#![warn(missing_debug_implementations)]
#![warn(unused_qualifications)]
#![deny(unused_must_use)]

use crate::adapters::auction::AuctionClient;
use crate::adapters::tracking::TrackingProvider;
use crate::adapters::tracking::shipengine::ShipEngineProvider;
use crate::adapters::wix::WixClientFactory;
use crate::api::ServiceContainer;
use crate::config::Config;
use crate::services::auction_service::AuctionService;
use crate::services::auth_service::AuthService;
use crate::services::cart_service::CartService;
use crate::services::catalog_service::CatalogService;
use crate::services::health_service::HealthService;
use crate::services::member_service::MemberService;
use crate::services::order_service::OrderService;
use crate::services::tracking_service::TrackingService;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

pub mod adapters;
pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod services;
pub mod storage;
pub mod telemetry;

/// Fully wired services, ready to be mounted on the routers.
#[derive(Debug)]
pub struct App {
    pub services: ServiceContainer,
    pub health_service: HealthService,
}

#[derive(Debug)]
pub struct AppBuilder {
    config: Config,
    http: Option<reqwest::Client>,
    tracking_provider: Option<Arc<dyn TrackingProvider>>,
}

impl AppBuilder {
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config, http: None, tracking_provider: None }
    }

    #[must_use]
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = Some(http);
        self
    }

    /// Overrides the tracking provider otherwise derived from `SHIPENGINE_API_KEY`.
    #[must_use]
    pub fn with_tracking_provider(mut self, provider: Arc<dyn TrackingProvider>) -> Self {
        self.tracking_provider = Some(provider);
        self
    }

    /// # Errors
    /// Fails if the outbound HTTP client cannot be built.
    pub fn build(self) -> anyhow::Result<App> {
        let config = self.config;
        let http = match self.http {
            Some(http) => http,
            None => reqwest::Client::builder()
                .timeout(Duration::from_secs(config.wix.upstream_timeout_secs))
                .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
                .build()?,
        };

        let wix = WixClientFactory::new(&config.wix, http.clone());
        if wix.client_id().is_err() {
            tracing::warn!("No Wix client id configured; storefront routes will answer with an error");
        }

        let tracking_provider = self.tracking_provider.or_else(|| {
            let key = config.tracking.api_key.clone().filter(|key| !key.trim().is_empty())?;
            let provider: Arc<dyn TrackingProvider> =
                Arc::new(ShipEngineProvider::new(http.clone(), &config.tracking.base_url, key));
            Some(provider)
        });
        if tracking_provider.is_none() {
            tracing::warn!("No tracking provider configured; /api/tracking will answer 503");
        }

        let services = ServiceContainer {
            auth_service: AuthService::new(wix.clone()),
            member_service: MemberService::new(wix.clone()),
            catalog_service: CatalogService::new(wix.clone()),
            cart_service: CartService::new(wix.clone()),
            order_service: OrderService::new(wix.clone()),
            tracking_service: TrackingService::new(wix.clone(), tracking_provider),
            auction_service: AuctionService::new(AuctionClient::new(&config.auction, http)),
        };
        let health_service = HealthService::new(wix, config.health.clone());

        Ok(App { services, health_service })
    }
}

/// Routes panics through tracing so they reach the configured log sink.
pub fn setup_panic_hook() {
    std::panic::set_hook(Box::new(|panic_info| {
        let location = panic_info.location().map(|l| format!("{}:{}", l.file(), l.line())).unwrap_or_default();
        let payload = panic_info
            .payload()
            .downcast_ref::<&str>()
            .map(|s| (*s).to_string())
            .or_else(|| panic_info.payload().downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        tracing::error!(panic.location = %location, panic.payload = %payload, "Thread panicked");
    }));
}

/// Flips the shutdown channel on SIGINT or SIGTERM.
pub fn spawn_signal_handler(shutdown_tx: watch::Sender<bool>) {
    tokio::spawn(async move {
        let ctrl_c = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(mut signal) => {
                    signal.recv().await;
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to listen for SIGTERM");
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            () = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
            () = terminate => tracing::info!("Received SIGTERM, shutting down"),
        }
        let _ = shutdown_tx.send(true);
    });
}
