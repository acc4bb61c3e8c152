use crate::config::Config;
use crate::services::auction_service::AuctionService;
use crate::services::auth_service::AuthService;
use crate::services::cart_service::CartService;
use crate::services::catalog_service::CatalogService;
use crate::services::health_service::HealthService;
use crate::services::member_service::MemberService;
use crate::services::order_service::OrderService;
use crate::services::tracking_service::TrackingService;
use crate::storage::session_cookie::SessionCookies;
use axum::body::Body;
use axum::http::{HeaderName, Request, StatusCode};
use axum::{
    Router,
    routing::{get, patch, post},
};
use std::time::Duration;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub mod auction;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod env;
pub mod health;
pub mod members;
pub mod middleware;
pub mod orders;
pub mod schemas;
pub mod tracking;

const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Clone, Debug)]
pub struct AppState {
    pub config: Config,
    pub session_cookies: SessionCookies,
    pub auth_service: AuthService,
    pub member_service: MemberService,
    pub catalog_service: CatalogService,
    pub cart_service: CartService,
    pub order_service: OrderService,
    pub tracking_service: TrackingService,
    pub auction_service: AuctionService,
}

#[derive(Clone, Debug)]
pub struct MgmtState {
    pub health_service: HealthService,
}

#[derive(Debug)]
pub struct ServiceContainer {
    pub auth_service: AuthService,
    pub member_service: MemberService,
    pub catalog_service: CatalogService,
    pub cart_service: CartService,
    pub order_service: OrderService,
    pub tracking_service: TrackingService,
    pub auction_service: AuctionService,
}

/// Configures and returns the storefront API router.
pub fn app_router(config: Config, services: ServiceContainer) -> Router {
    let session_cookies = SessionCookies::new(&config.session, config.is_production());
    let request_timeout = Duration::from_secs(config.server.request_timeout_secs);

    let state = AppState {
        config,
        session_cookies,
        auth_service: services.auth_service,
        member_service: services.member_service,
        catalog_service: services.catalog_service,
        cart_service: services.cart_service,
        order_service: services.order_service,
        tracking_service: services.tracking_service,
        auction_service: services.auction_service,
    };

    let auth_routes = Router::new()
        .route("/login", post(auth::login))
        .route("/register", post(auth::register))
        .route("/logout", post(auth::logout))
        .route("/token-auth", post(auth::token_auth))
        .route("/session", get(auth::session))
        .route("/session/refresh", post(auth::refresh))
        .route("/member", get(members::get_member).patch(members::update_member));

    let store_routes = Router::new()
        .route("/products", get(catalog::list_products))
        .route("/products/{slug}", get(catalog::get_product))
        .route("/collections", get(catalog::list_collections))
        .route("/collections/{slug}", get(catalog::get_collection))
        .route("/cart", get(cart::get_cart))
        .route("/cart/items", post(cart::add_item))
        .route("/cart/items/{lineItemId}", patch(cart::update_item).delete(cart::remove_item))
        .route("/cart/checkout", post(cart::checkout))
        .route("/orders", get(orders::list_orders))
        .route("/orders/{id}", get(orders::get_order))
        .route("/tracking", get(tracking::track));

    let auction_routes = Router::new()
        .route("/auction/{id}", get(auction::get_auction))
        .route("/bid", post(auction::place_bid))
        .route("/proxy", get(auction::proxy));

    let diagnostic_routes =
        Router::new().route("/env-check", get(env::env_check)).route("/env-debug", get(env::env_debug));

    Router::new()
        .nest("/api", auth_routes.merge(store_routes).merge(auction_routes).merge(diagnostic_routes))
        .layer(TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, request_timeout))
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(REQUEST_ID_HEADER)))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = request
                        .extensions()
                        .get::<tower_http::request_id::RequestId>()
                        .and_then(|id| id.header_value().to_str().ok())
                        .unwrap_or_default()
                        .to_string();

                    tracing::info_span!(
                        "request",
                        "request_id" = %request_id,
                        "http.request.method" = %request.method(),
                        "url.path" = %request.uri().path(),
                        "http.response.status_code" = tracing::field::Empty,
                        "otel.kind" = "server",
                    )
                })
                .on_response(|response: &axum::http::Response<_>, latency: Duration, span: &tracing::Span| {
                    let status = response.status();
                    span.record("http.response.status_code", status.as_u16());

                    tracing::info!(
                        latency_ms = %latency.as_millis(),
                        status = %status.as_u16(),
                        "request completed"
                    );
                })
                .on_failure(|error, _latency, _span: &tracing::Span| {
                    tracing::error!(error = %error, "request failed");
                }),
        )
        .layer(SetRequestIdLayer::new(HeaderName::from_static(REQUEST_ID_HEADER), MakeRequestUuid))
        .with_state(state)
}

pub fn mgmt_router(state: MgmtState) -> Router {
    Router::new().route("/livez", get(health::livez)).route("/readyz", get(health::readyz)).with_state(state)
}
