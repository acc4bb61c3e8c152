use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvCheck {
    pub wix_client_id: bool,
    pub wix_api_key: bool,
    pub wix_site_id: bool,
    pub shipengine_api_key: bool,
    pub otlp_endpoint: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvDebug {
    pub node_env: &'static str,
    pub wix_client_id: Option<String>,
    pub wix_api_key: Option<String>,
    pub wix_site_id: Option<String>,
    pub shipengine_api_key: Option<String>,
    pub wix_api_base_url: String,
    pub auction_base_url: String,
}
