#![allow(clippy::unwrap_used, clippy::panic, clippy::todo, clippy::missing_panics_doc, clippy::must_use_candidate, missing_debug_implementations, clippy::items_after_statements, unreachable_pub)]
use reqwest::StatusCode;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, ResponseTemplate};

mod common;

#[tokio::test]
async fn test_login_sets_session_cookies() {
    let app = common::TestApp::spawn().await;
    app.mock_signed_in_member("ash@pallet.town", "pikachu").await;

    let resp = app
        .client
        .post(app.url("/api/login"))
        .json(&json!({ "email": "ash@pallet.town", "password": "pikachu" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let cookies = common::set_cookies(&resp);
    let session = common::set_cookie(&cookies, "session").expect("session cookie");
    assert!(session.contains("HttpOnly"));
    assert!(session.contains("SameSite=Lax"));
    assert!(session.contains("Path=/"));
    assert!(session.contains("Max-Age=604800"));
    assert!(!session.contains("Secure"));
    assert!(session.contains(common::MEMBER_ACCESS));

    let refresh = common::set_cookie(&cookies, "refreshToken").expect("refresh cookie");
    assert!(refresh.contains("Max-Age=2592000"));
    assert!(refresh.contains(common::MEMBER_REFRESH));

    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["member"]["id"], "member-1");
    assert_eq!(body["member"]["firstName"], "Ash");
    assert_eq!(body["tokens"]["refreshToken"]["role"], "member");
}

#[tokio::test]
async fn test_login_with_wrong_password_is_unauthorized() {
    let app = common::TestApp::spawn().await;
    app.mock_signed_in_member("ash@pallet.town", "pikachu").await;

    let resp = app
        .client
        .post(app.url("/api/login"))
        .json(&json!({ "email": "ash@pallet.town", "password": "raichu" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(common::set_cookies(&resp).is_empty());
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Unauthorized");
}

#[tokio::test]
async fn test_login_requires_email_and_password() {
    let app = common::TestApp::spawn().await;

    let resp = app.client.post(app.url("/api/login")).json(&json!({ "email": "ash@pallet.town" })).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Email and password are required");

    let resp = app.client.post(app.url("/api/login")).body("not json").send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_creates_member() {
    let app = common::TestApp::spawn().await;
    app.mock_anonymous_grant().await;
    app.mock_session_token_grant().await;
    app.mock_current_member(common::MEMBER_ACCESS).await;

    Mock::given(method("POST"))
        .and(path("/_api/iam/authentication/v2/register"))
        .and(body_partial_json(json!({ "profile": { "firstName": "Misty" } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "state": "SUCCESS",
            "sessionToken": "session-jws",
            "identity": { "id": "member-1" }
        })))
        .mount(&app.wix)
        .await;

    let resp = app
        .client
        .post(app.url("/api/register"))
        .json(&json!({ "email": "misty@cerulean.gym", "password": "starmie", "firstName": "Misty" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    assert!(common::set_cookie(&common::set_cookies(&resp), "session").is_some());
}

#[tokio::test]
async fn test_register_with_taken_email_conflicts() {
    let app = common::TestApp::spawn().await;
    app.mock_anonymous_grant().await;

    Mock::given(method("POST"))
        .and(path("/_api/iam/authentication/v2/register"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({ "message": "Email already exists" })))
        .mount(&app.wix)
        .await;

    let resp = app
        .client
        .post(app.url("/api/register"))
        .json(&json!({ "email": "brock@pewter.gym", "password": "onix" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_register_pending_approval_is_unauthorized() {
    let app = common::TestApp::spawn().await;
    app.mock_anonymous_grant().await;

    Mock::given(method("POST"))
        .and(path("/_api/iam/authentication/v2/register"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "state": "REQUIRE_OWNER_APPROVAL" })))
        .mount(&app.wix)
        .await;

    let resp = app
        .client
        .post(app.url("/api/register"))
        .json(&json!({ "email": "gary@pallet.town", "password": "eevee" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(common::set_cookies(&resp).is_empty());
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["details"], "REQUIRE_OWNER_APPROVAL");
}

#[tokio::test]
async fn test_logout_clears_cookies_and_returns_logout_url() {
    let app = common::TestApp::spawn().await;

    Mock::given(method("POST"))
        .and(path("/redirect-session/v1/redirect-session"))
        .and(body_partial_json(json!({
            "logout": { "clientId": "test-client-id" },
            "callbacks": { "postFlowUrl": "https://shop.test/" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "redirectSession": { "id": "r1", "fullUrl": "https://wix.test/logout?r1" }
        })))
        .mount(&app.wix)
        .await;

    let resp = app
        .client
        .post(app.url("/api/logout"))
        .header("cookie", common::session_cookie_header(&common::fresh_member_bundle()))
        .json(&json!({ "postLogoutUrl": "https://shop.test/" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let cookies = common::set_cookies(&resp);
    for name in ["session", "refreshToken"] {
        let cookie = common::set_cookie(&cookies, name).expect("removal cookie");
        assert!(cookie.contains("Max-Age=0"), "{cookie}");
    }
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["logoutUrl"], "https://wix.test/logout?r1");
}

#[tokio::test]
async fn test_logout_without_session_still_succeeds() {
    let app = common::TestApp::spawn().await;

    let resp = app.client.post(app.url("/api/logout")).send().await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(common::set_cookies(&resp).len(), 2);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body, json!({}));
}

#[tokio::test]
async fn test_token_auth_with_bare_access_token() {
    let app = common::TestApp::spawn().await;
    app.mock_current_member("external-access").await;

    let resp = app
        .client
        .post(app.url("/api/token-auth"))
        .json(&json!({ "accessToken": "external-access" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(common::set_cookies(&resp).is_empty());
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["member"]["loginEmail"], "ash@pallet.town");
}

#[tokio::test]
async fn test_token_auth_persists_bundle() {
    let app = common::TestApp::spawn().await;
    app.mock_current_member(common::MEMBER_ACCESS).await;

    let resp = app
        .client
        .post(app.url("/api/token-auth"))
        .json(&common::fresh_member_bundle())
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(common::set_cookie(&common::set_cookies(&resp), "session").is_some());
}

#[tokio::test]
async fn test_token_auth_rejected_token_is_unauthorized() {
    let app = common::TestApp::spawn().await;

    Mock::given(method("GET"))
        .and(path("/members/v1/members/my"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "Invalid token" })))
        .mount(&app.wix)
        .await;

    let resp = app
        .client
        .post(app.url("/api/token-auth"))
        .json(&json!({ "accessToken": "forged" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = app.client.post(app.url("/api/token-auth")).json(&json!({ "token": "x" })).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
