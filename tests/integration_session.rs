#![allow(clippy::unwrap_used, clippy::panic, clippy::todo, clippy::missing_panics_doc, clippy::must_use_candidate, missing_debug_implementations, clippy::items_after_statements, unreachable_pub)]
use reqwest::StatusCode;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, ResponseTemplate};

mod common;

async fn mock_refresh_grant(app: &common::TestApp) {
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .and(body_partial_json(json!({ "grantType": "refresh_token", "refresh_token": common::MEMBER_REFRESH })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "rotated-access",
            "expires_in": 14_400,
            "refresh_token": "rotated-refresh"
        })))
        .expect(1)
        .mount(&app.wix)
        .await;
}

#[tokio::test]
async fn test_session_requires_member_cookie() {
    let app = common::TestApp::spawn().await;

    let resp = app.client.get(app.url("/api/session")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = app.client.get(app.url("/api/session")).header("cookie", "session=garbage").send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_fresh_session_is_used_without_refresh() {
    let app = common::TestApp::spawn().await;
    app.mock_current_member(common::MEMBER_ACCESS).await;

    let resp = app
        .client
        .get(app.url("/api/session"))
        .header("cookie", common::session_cookie_header(&common::fresh_member_bundle()))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(common::set_cookies(&resp).is_empty());
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["member"]["id"], "member-1");
}

#[tokio::test]
async fn test_expired_session_is_refreshed_and_cookies_rotated() {
    let app = common::TestApp::spawn().await;
    mock_refresh_grant(&app).await;
    app.mock_current_member("rotated-access").await;

    let stale = common::member_bundle("stale-access", 1_000);
    let resp = app
        .client
        .get(app.url("/api/member"))
        .header("cookie", common::session_cookie_header(&stale))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let cookies = common::set_cookies(&resp);
    assert!(common::set_cookie(&cookies, "session").unwrap().contains("rotated-access"));
    assert!(common::set_cookie(&cookies, "refreshToken").unwrap().contains("rotated-refresh"));
}

#[tokio::test]
async fn test_refresh_cookie_alone_restores_member() {
    let app = common::TestApp::spawn().await;
    mock_refresh_grant(&app).await;
    app.mock_current_member("rotated-access").await;

    let refresh = serde_json::to_string(&json!({ "value": common::MEMBER_REFRESH, "role": "member" })).unwrap();
    let resp = app
        .client
        .get(app.url("/api/session"))
        .header("cookie", format!("refreshToken={}", urlencoding::encode(&refresh)))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(common::set_cookie(&common::set_cookies(&resp), "session").is_some());
}

#[tokio::test]
async fn test_rejected_refresh_is_unauthorized() {
    let app = common::TestApp::spawn().await;

    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({ "message": "invalid_grant" })))
        .mount(&app.wix)
        .await;

    let stale = common::member_bundle("stale-access", 1_000);
    let resp = app
        .client
        .get(app.url("/api/orders"))
        .header("cookie", common::session_cookie_header(&stale))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_forced_refresh_returns_new_expiry() {
    let app = common::TestApp::spawn().await;
    mock_refresh_grant(&app).await;

    let resp = app
        .client
        .post(app.url("/api/session/refresh"))
        .header("cookie", common::session_cookie_header(&common::fresh_member_bundle()))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(common::set_cookie(&common::set_cookies(&resp), "session").unwrap().contains("rotated-access"));
    let body: serde_json::Value = resp.json().await.unwrap();
    assert!(body["expiresAt"].as_i64().unwrap() > time::OffsetDateTime::now_utc().unix_timestamp());
}

#[tokio::test]
async fn test_profile_update_sends_only_present_fields() {
    let app = common::TestApp::spawn().await;
    app.mock_current_member(common::MEMBER_ACCESS).await;

    Mock::given(method("PATCH"))
        .and(path("/members/v1/members/member-1"))
        .and(header("authorization", common::MEMBER_ACCESS))
        .and(body_partial_json(json!({ "member": { "contact": { "firstName": "Satoshi" } } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "member": { "id": "member-1", "loginEmail": "ash@pallet.town", "contact": { "firstName": "Satoshi" } }
        })))
        .expect(1)
        .mount(&app.wix)
        .await;

    let resp = app
        .client
        .patch(app.url("/api/member"))
        .header("cookie", common::session_cookie_header(&common::fresh_member_bundle()))
        .json(&json!({ "firstName": "Satoshi" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["member"]["firstName"], "Satoshi");
    assert_eq!(body["member"]["lastName"], serde_json::Value::Null);
}

#[tokio::test]
async fn test_orders_for_member() {
    let app = common::TestApp::spawn().await;

    Mock::given(method("POST"))
        .and(path("/ecom/v1/orders/search"))
        .and(header("authorization", common::MEMBER_ACCESS))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "orders": [{
                "id": "o-1",
                "number": 10_001,
                "status": "APPROVED",
                "priceSummary": { "total": { "amount": "49.99", "formattedAmount": "$49.99" } },
                "lineItems": [{ "id": "l-1", "quantity": 1, "productName": { "original": "Booster Box" } }]
            }]
        })))
        .mount(&app.wix)
        .await;

    let resp = app
        .client
        .get(app.url("/api/orders"))
        .header("cookie", common::session_cookie_header(&common::fresh_member_bundle()))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["orders"][0]["number"], "10001");
    assert_eq!(body["orders"][0]["lineItems"][0]["name"], "Booster Box");
}

#[tokio::test]
async fn test_rejected_forced_refresh_clears_cookies() {
    let app = common::TestApp::spawn().await;

    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({ "message": "invalid_grant" })))
        .mount(&app.wix)
        .await;

    let resp = app
        .client
        .post(app.url("/api/session/refresh"))
        .header("cookie", common::session_cookie_header(&common::fresh_member_bundle()))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let cookies = common::set_cookies(&resp);
    for name in ["session", "refreshToken"] {
        let cookie = common::set_cookie(&cookies, name).unwrap();
        assert!(cookie.contains("Max-Age=0"), "{cookie}");
    }
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Unauthorized");
}

#[tokio::test]
async fn test_forced_refresh_requires_member_session() {
    let app = common::TestApp::spawn().await;

    let mut visitor = common::fresh_member_bundle();
    visitor.refresh_token.role = pokecollect_server::domain::tokens::TokenRole::Visitor;
    let resp = app
        .client
        .post(app.url("/api/session/refresh"))
        .header("cookie", common::session_cookie_header(&visitor))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
