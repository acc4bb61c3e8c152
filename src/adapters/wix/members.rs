use crate::adapters::wix::records::MemberRecord;
use crate::adapters::wix::{WixClient, WixError, send_json};
use crate::domain::member::{MemberProfile, ProfileUpdate};
use reqwest::Method;
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
struct MemberEnvelope {
    member: MemberRecord,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ContactPatch<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    first_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    phones: Option<Vec<&'a str>>,
}

#[derive(Serialize)]
struct MemberPatch<'a> {
    contact: ContactPatch<'a>,
}

#[derive(Serialize)]
struct UpdateRequest<'a> {
    member: MemberPatch<'a>,
}

impl<'a> From<&'a ProfileUpdate> for UpdateRequest<'a> {
    fn from(update: &'a ProfileUpdate) -> Self {
        Self {
            member: MemberPatch {
                contact: ContactPatch {
                    first_name: update.first_name.as_deref(),
                    last_name: update.last_name.as_deref(),
                    phones: update.phone.as_deref().map(|phone| vec![phone]),
                },
            },
        }
    }
}

#[derive(Debug)]
pub struct Members<'a> {
    client: &'a WixClient,
}

impl<'a> Members<'a> {
    pub(crate) const fn new(client: &'a WixClient) -> Self {
        Self { client }
    }

    /// The member the client's tokens belong to.
    ///
    /// # Errors
    /// Visitor or invalid tokens surface as `WixError::Api` with status 401/403.
    pub async fn get_current(&self) -> Result<MemberProfile, WixError> {
        let request = self.client.request(Method::GET, "/members/v1/members/my").query(&[("fieldsets", "FULL")]);
        let envelope: MemberEnvelope = send_json(request).await?;
        Ok(envelope.member.into())
    }

    /// # Errors
    /// Propagates platform errors.
    pub async fn update(&self, member_id: &str, update: &ProfileUpdate) -> Result<MemberProfile, WixError> {
        let path = format!("/members/v1/members/{}", urlencoding::encode(member_id));
        let body = UpdateRequest::from(update);
        let envelope: MemberEnvelope = send_json(self.client.request(Method::PATCH, &path).json(&body)).await?;
        Ok(envelope.member.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_patch_only_sends_present_fields() {
        let update = ProfileUpdate { first_name: Some("Misty".into()), last_name: None, phone: Some("555".into()) };
        assert_eq!(
            serde_json::to_value(UpdateRequest::from(&update)).unwrap(),
            json!({ "member": { "contact": { "firstName": "Misty", "phones": ["555"] } } })
        );
    }
}
