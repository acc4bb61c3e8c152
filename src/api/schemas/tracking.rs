use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingParams {
    pub tracking_number: Option<String>,
    pub carrier_code: Option<String>,
    pub order_id: Option<String>,
}
