use crate::adapters::wix::{WixClient, WixError, send_json};
use reqwest::Method;
use serde::Deserialize;
use serde_json::{Value, json};

const REDIRECT_SESSION_PATH: &str = "/redirect-session/v1/redirect-session";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RedirectSession {
    full_url: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RedirectSessionResponse {
    redirect_session: RedirectSession,
}

/// Platform-hosted flows (checkout, logout) the browser is sent to.
#[derive(Debug)]
pub struct Redirects<'a> {
    client: &'a WixClient,
}

impl<'a> Redirects<'a> {
    pub(crate) const fn new(client: &'a WixClient) -> Self {
        Self { client }
    }

    /// # Errors
    /// Propagates platform errors.
    pub async fn logout_url(&self, client_id: &str, post_flow_url: Option<&str>) -> Result<String, WixError> {
        self.create(json!({ "logout": { "clientId": client_id } }), post_flow_url).await
    }

    /// # Errors
    /// Propagates platform errors.
    pub async fn checkout_url(&self, checkout_id: &str, post_flow_url: Option<&str>) -> Result<String, WixError> {
        self.create(json!({ "ecomCheckout": { "checkoutId": checkout_id } }), post_flow_url).await
    }

    async fn create(&self, mut body: Value, post_flow_url: Option<&str>) -> Result<String, WixError> {
        if let (Some(url), Some(object)) = (post_flow_url, body.as_object_mut()) {
            object.insert("callbacks".into(), json!({ "postFlowUrl": url }));
        }
        let response: RedirectSessionResponse =
            send_json(self.client.request(Method::POST, REDIRECT_SESSION_PATH).json(&body)).await?;
        Ok(response.redirect_session.full_url)
    }
}
