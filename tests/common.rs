#![allow(dead_code, unreachable_pub, clippy::unwrap_used, clippy::missing_panics_doc, clippy::must_use_candidate)]

use pokecollect_server::api::{MgmtState, app_router, mgmt_router};
use pokecollect_server::config::{
    AuctionConfig, Config, HealthConfig, LogFormat, NodeEnv, ServerConfig, SessionConfig, TelemetryConfig,
    TrackingConfig, WixConfig,
};
use pokecollect_server::domain::tokens::{AccessToken, RefreshToken, TokenBundle, TokenRole};
use pokecollect_server::storage::session_cookie::{REFRESH_COOKIE, SESSION_COOKIE, encode_bundle};
use pokecollect_server::AppBuilder;
use serde_json::json;
use std::sync::Once;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

static INIT: Once = Once::new();

pub const VISITOR_ACCESS: &str = "visitor-access";
pub const MEMBER_ACCESS: &str = "member-access";
pub const MEMBER_REFRESH: &str = "member-refresh";
pub const API_KEY: &str = "test-api-key";

pub fn setup_tracing() {
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "warn".into())
            .add_directive("pokecollect_server=debug".parse().unwrap())
            .add_directive("hyper=warn".parse().unwrap())
            .add_directive("reqwest=warn".parse().unwrap());

        tracing_subscriber::fmt().with_env_filter(filter).with_test_writer().init();
    });
}

pub fn get_test_config(wix_url: &str, auction_url: &str, shipengine_url: &str) -> Config {
    Config {
        node_env: NodeEnv::Test,
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            mgmt_port: 0,
            request_timeout_secs: 10,
            shutdown_timeout_secs: 1,
        },
        wix: WixConfig {
            client_id: Some("test-client-id".to_string()),
            public_client_id: None,
            api_key: Some(API_KEY.to_string()),
            site_id: Some("test-site".to_string()),
            base_url: wix_url.to_string(),
            upstream_timeout_secs: 5,
            refresh_leeway_secs: 60,
        },
        session: SessionConfig { session_ttl_days: 7, refresh_ttl_days: 30 },
        auction: AuctionConfig { base_url: auction_url.to_string(), proxy_path: "/api/auction".to_string() },
        tracking: TrackingConfig { api_key: Some("shipengine-key".to_string()), base_url: shipengine_url.to_string() },
        health: HealthConfig { upstream_timeout_ms: 1000 },
        telemetry: TelemetryConfig { log_format: LogFormat::Text, otlp_endpoint: None },
    }
}

pub struct TestApp {
    pub server_url: String,
    pub mgmt_url: String,
    pub client: reqwest::Client,
    pub config: Config,
    pub wix: MockServer,
    pub auction: MockServer,
    pub shipengine: MockServer,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(|_| {}).await
    }

    /// Spawns the API and management routers against fresh mock upstreams;
    /// `customize` may adjust the config before wiring.
    pub async fn spawn_with(customize: impl FnOnce(&mut Config)) -> Self {
        setup_tracing();

        let wix = MockServer::start().await;
        let auction = MockServer::start().await;
        let shipengine = MockServer::start().await;

        let mut config = get_test_config(&wix.uri(), &auction.uri(), &shipengine.uri());
        customize(&mut config);

        let app = AppBuilder::new(config.clone()).build().unwrap();
        let router = app_router(config.clone(), app.services);
        let mgmt = mgmt_router(MgmtState { health_service: app.health_service });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let server_url = format!("http://{}", listener.local_addr().unwrap());
        let mgmt_listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let mgmt_url = format!("http://{}", mgmt_listener.local_addr().unwrap());

        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        tokio::spawn(async move {
            axum::serve(mgmt_listener, mgmt).await.unwrap();
        });

        Self { server_url, mgmt_url, client: reqwest::Client::new(), config, wix, auction, shipengine }
    }

    pub fn url(&self, route: &str) -> String {
        format!("{}{}", self.server_url, route)
    }

    pub async fn mock_anonymous_grant(&self) {
        Mock::given(method("POST"))
            .and(path("/oauth2/token"))
            .and(body_partial_json(json!({ "grantType": "anonymous" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": VISITOR_ACCESS,
                "expires_in": 14_400,
                "refresh_token": "visitor-refresh"
            })))
            .mount(&self.wix)
            .await;
    }

    pub async fn mock_session_token_grant(&self) {
        Mock::given(method("POST"))
            .and(path("/oauth2/token"))
            .and(body_partial_json(json!({ "grantType": "session_token", "sessionToken": "session-jws" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": MEMBER_ACCESS,
                "expires_in": 14_400,
                "refresh_token": MEMBER_REFRESH
            })))
            .mount(&self.wix)
            .await;
    }

    pub async fn mock_login(&self, email: &str, password: &str) {
        Mock::given(method("POST"))
            .and(path("/_api/iam/authentication/v2/login"))
            .and(body_partial_json(json!({ "loginId": { "email": email }, "password": password })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "state": "SUCCESS",
                "sessionToken": "session-jws",
                "identity": { "id": "member-1" }
            })))
            .mount(&self.wix)
            .await;

        Mock::given(method("POST"))
            .and(path("/_api/iam/authentication/v2/login"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({ "message": "Wrong email or password" })))
            .with_priority(10)
            .mount(&self.wix)
            .await;
    }

    /// `GET /members/v1/members/my` for the given access token.
    pub async fn mock_current_member(&self, access_token: &str) {
        Mock::given(method("GET"))
            .and(path("/members/v1/members/my"))
            .and(header("authorization", access_token))
            .respond_with(ResponseTemplate::new(200).set_body_json(member_record()))
            .mount(&self.wix)
            .await;
    }

    pub async fn mock_signed_in_member(&self, email: &str, password: &str) {
        self.mock_anonymous_grant().await;
        self.mock_login(email, password).await;
        self.mock_session_token_grant().await;
        self.mock_current_member(MEMBER_ACCESS).await;
    }
}

pub fn member_record() -> serde_json::Value {
    json!({
        "member": {
            "id": "member-1",
            "loginEmail": "ash@pallet.town",
            "contact": { "firstName": "Ash", "lastName": "Ketchum", "phones": ["555-0151"] },
            "profile": { "nickname": "ash" }
        }
    })
}

pub fn member_bundle(access_token: &str, expires_at: i64) -> TokenBundle {
    TokenBundle {
        access_token: AccessToken { value: access_token.to_string(), expires_at },
        refresh_token: RefreshToken { value: MEMBER_REFRESH.to_string(), role: TokenRole::Member, expires_at: None },
    }
}

pub fn fresh_member_bundle() -> TokenBundle {
    member_bundle(MEMBER_ACCESS, time::OffsetDateTime::now_utc().unix_timestamp() + 3600)
}

/// `Cookie` request header carrying the bundle in both slots.
pub fn session_cookie_header(bundle: &TokenBundle) -> String {
    let refresh = urlencoding::encode(&serde_json::to_string(&bundle.refresh_token).unwrap()).into_owned();
    format!("{SESSION_COOKIE}={}; {REFRESH_COOKIE}={refresh}", encode_bundle(bundle).unwrap())
}

pub fn set_cookies(response: &reqwest::Response) -> Vec<String> {
    response
        .headers()
        .get_all(reqwest::header::SET_COOKIE)
        .iter()
        .map(|value| value.to_str().unwrap().to_string())
        .collect()
}

pub fn set_cookie<'a>(cookies: &'a [String], name: &str) -> Option<&'a String> {
    let prefix = format!("{name}=");
    cookies.iter().find(|cookie| cookie.starts_with(&prefix))
}
