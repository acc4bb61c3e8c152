use clap::{Args, Parser, ValueEnum};
use std::convert::Infallible;

#[derive(Clone, Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Runtime environment; `production` enables secure cookies and hides debug routes.
    /// Unknown values run as `development`.
    #[arg(long, env = "NODE_ENV", default_value = "development", value_parser = NodeEnv::parse)]
    pub node_env: NodeEnv,

    #[command(flatten)]
    pub server: ServerConfig,

    #[command(flatten)]
    pub wix: WixConfig,

    #[command(flatten)]
    pub session: SessionConfig,

    #[command(flatten)]
    pub auction: AuctionConfig,

    #[command(flatten)]
    pub tracking: TrackingConfig,

    #[command(flatten)]
    pub health: HealthConfig,

    #[command(flatten)]
    pub telemetry: TelemetryConfig,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeEnv {
    Development,
    Test,
    Production,
}

impl NodeEnv {
    /// Case-insensitive; anything other than `production` or `test` is development.
    ///
    /// # Errors
    /// Never fails.
    pub fn parse(value: &str) -> Result<Self, Infallible> {
        Ok(match value.trim().to_ascii_lowercase().as_str() {
            "production" => Self::Production,
            "test" => Self::Test,
            _ => Self::Development,
        })
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Test => "test",
            Self::Production => "production",
        }
    }
}

#[derive(Clone, Debug, Args)]
pub struct ServerConfig {
    /// Host to listen on
    #[arg(long = "host", env = "POKECOLLECT_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port for the storefront API
    #[arg(long = "port", env = "POKECOLLECT_PORT", default_value_t = 3000)]
    pub port: u16,

    /// Port for the management (health) server
    #[arg(long = "mgmt-port", env = "POKECOLLECT_MGMT_PORT", default_value_t = 9090)]
    pub mgmt_port: u16,

    /// Upper bound for handling a single inbound request
    #[arg(long, env = "SERVER_REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    pub request_timeout_secs: u64,

    /// How long to wait for in-flight requests on shutdown
    #[arg(long, env = "SHUTDOWN_TIMEOUT_SECS", default_value_t = 10)]
    pub shutdown_timeout_secs: u64,
}

#[derive(Clone, Debug, Args)]
pub struct WixConfig {
    /// OAuth client id of the headless Wix site
    #[arg(id = "wix_client_id", long = "wix-client-id", env = "WIX_CLIENT_ID")]
    pub client_id: Option<String>,

    /// Client id exposed to the browser bundle, used when `WIX_CLIENT_ID` is unset
    #[arg(long = "wix-public-client-id", env = "NEXT_PUBLIC_WIX_CLIENT_ID")]
    pub public_client_id: Option<String>,

    /// API key for server-side (admin) calls
    #[arg(id = "wix_api_key", long = "wix-api-key", env = "WIX_API_KEY")]
    pub api_key: Option<String>,

    /// Site id sent alongside the API key
    #[arg(id = "wix_site_id", long = "wix-site-id", env = "WIX_SITE_ID")]
    pub site_id: Option<String>,

    /// Base URL of the Wix REST API
    #[arg(id = "wix_base_url", long = "wix-api-base-url", env = "WIX_API_BASE_URL", default_value = "https://www.wixapis.com")]
    pub base_url: String,

    /// Timeout for outbound calls to Wix and third parties
    #[arg(long = "upstream-timeout-secs", env = "UPSTREAM_TIMEOUT_SECS", default_value_t = 15)]
    pub upstream_timeout_secs: u64,

    /// Access tokens expiring within this window are refreshed before use
    #[arg(long = "token-refresh-leeway-secs", env = "WIX_TOKEN_REFRESH_LEEWAY_SECS", default_value_t = 60)]
    pub refresh_leeway_secs: i64,
}

impl WixConfig {
    /// The effective OAuth client id: the server value wins over the public one.
    #[must_use]
    pub fn client_id(&self) -> Option<&str> {
        [self.client_id.as_deref(), self.public_client_id.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|id| !id.is_empty())
    }
}

#[derive(Clone, Debug, Args)]
pub struct SessionConfig {
    /// Lifetime of the `session` cookie in days
    #[arg(long, env = "SESSION_COOKIE_TTL_DAYS", default_value_t = 7)]
    pub session_ttl_days: i64,

    /// Lifetime of the `refreshToken` cookie in days
    #[arg(long, env = "REFRESH_COOKIE_TTL_DAYS", default_value_t = 30)]
    pub refresh_ttl_days: i64,
}

#[derive(Clone, Debug, Args)]
pub struct AuctionConfig {
    /// Base URL of the third-party auction host
    #[arg(id = "auction_base_url", long = "auction-base-url", env = "AUCTION_BASE_URL", default_value = "https://auctions.pokecollect.example")]
    pub base_url: String,

    /// Fixed path that `/api/proxy` forwards to
    #[arg(long = "auction-proxy-path", env = "AUCTION_PROXY_PATH", default_value = "/api/auction")]
    pub proxy_path: String,
}

#[derive(Clone, Debug, Args)]
pub struct TrackingConfig {
    /// ShipEngine API key
    #[arg(id = "shipengine_api_key", long = "shipengine-api-key", env = "SHIPENGINE_API_KEY")]
    pub api_key: Option<String>,

    /// ShipEngine base URL
    #[arg(id = "shipengine_base_url", long = "shipengine-base-url", env = "SHIPENGINE_BASE_URL", default_value = "https://api.shipengine.com")]
    pub base_url: String,
}

#[derive(Clone, Debug, Args)]
pub struct HealthConfig {
    /// Timeout for the upstream reachability probe
    #[arg(long, env = "HEALTH_UPSTREAM_TIMEOUT_MS", default_value_t = 2000)]
    pub upstream_timeout_ms: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Clone, Debug, Args)]
pub struct TelemetryConfig {
    /// Log output format
    #[arg(long = "log-format", env = "POKECOLLECT_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// OTLP collector endpoint; traces and metrics are exported when set
    #[arg(long = "otlp-endpoint", env = "OTEL_EXPORTER_OTLP_ENDPOINT")]
    pub otlp_endpoint: Option<String>,
}

impl Config {
    #[must_use]
    pub fn load() -> Self {
        Self::parse()
    }

    #[must_use]
    pub fn is_production(&self) -> bool {
        self.node_env == NodeEnv::Production
    }
}
