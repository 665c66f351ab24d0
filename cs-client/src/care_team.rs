//! Profile and care team operations.

use crate::profile::ProfileEnvelope;
use crate::{ApiClient, ClientError, Profile, RequestContext, Result};
use chrono::Utc;
use cs_config::Config;
use http::StatusCode;
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{debug, info};

pub const USER_PROFILES_PATH: &str = "/api/v1/admin/user-profiles";
pub const CARE_TEAMS_PATH: &str = "/api/v1/admin/care-teams";

/// Role a member is added to a care team with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OwnerType {
    /// A professional managing the care team
    CareManager,
    Caregiver,
}

impl ApiClient {
    /// Create `profile` upstream and record the id the API assigns.
    ///
    /// Organization and user type ids are taken from the profile's program
    /// in `config`. Field errors reported by the API come back as
    /// [`ClientError::Validation`].
    pub async fn create_profile(
        &self,
        ctx: &RequestContext,
        profile: &mut Profile,
        config: &Config,
    ) -> Result<()> {
        let program = profile.selected_program(config)?;
        profile.organization_id = Some(program.organization_id);
        profile.user_type_id = Some(program.user_type_id);

        let response = self
            .post(USER_PROFILES_PATH)
            .context(ctx)
            .bearer_auth(&profile.access_token)
            .json(&ProfileEnvelope { user_profile: &*profile })?
            .send()
            .await?;

        if !response.is_ok() {
            info!(
                request_id = ctx.request_id(),
                status = response.status().as_u16(),
                response = %response.text_lossy(),
                "Create profile error"
            );
            let error = response.api_error(&self.url(USER_PROFILES_PATH));
            return Err(match error.field_errors() {
                Some(fields) => ClientError::Validation(fields),
                None => ClientError::Api(error),
            });
        }

        let body: Value = response.json()?;
        let id = body["user_profile"]["id"]
            .as_str()
            .filter(|id| !id.is_empty())
            .ok_or(ClientError::MissingId("consumer"))?;

        debug!(request_id = ctx.request_id(), consumer_id = id, "Created profile");
        profile.id = id.to_string();
        Ok(())
    }

    /// Id of the care team owned by the profile's consumer.
    pub async fn get_care_room_id(&self, ctx: &RequestContext, profile: &Profile) -> Result<String> {
        if profile.id.is_empty() {
            return Err(ClientError::MissingId("consumer"));
        }
        let path = format!("{}/consumer/{}", CARE_TEAMS_PATH, profile.id);

        let response = self
            .get(path.as_str())
            .context(ctx)
            .bearer_auth(&profile.access_token)
            .send()
            .await?
            .error_for_status(&self.url(&path))?;

        let body: Value = response.json()?;
        care_team_id(&body["care_team"]["id"]).ok_or(ClientError::MissingId("care team"))
    }

    /// Mark a care team as authorized by the profile's consumer.
    pub async fn authorize_care_room(
        &self,
        ctx: &RequestContext,
        profile: &Profile,
        care_team_id: &str,
    ) -> Result<()> {
        let path = format!("{}/{}/authorize", CARE_TEAMS_PATH, care_team_id);
        let body = json!({
            "authorize": {
                "authorized": true,
                "authorized_at": Utc::now(),
                "authorized_by": profile.id,
            }
        });

        self.post(path.as_str())
            .context(ctx)
            .bearer_auth(&profile.access_token)
            .json(&body)?
            .send()
            .await?
            .error_for_status(&self.url(&path))?;
        Ok(())
    }

    /// Add professionals to a care team, stopping at the first failure.
    pub async fn add_professionals<S: AsRef<str>>(
        &self,
        ctx: &RequestContext,
        profile: &Profile,
        care_team_id: &str,
        pro_ids: &[S],
    ) -> Result<()> {
        self.add_members(ctx, profile, care_team_id, pro_ids, OwnerType::CareManager)
            .await
    }

    /// Add caregivers to a care team, stopping at the first failure.
    pub async fn add_caregivers<S: AsRef<str>>(
        &self,
        ctx: &RequestContext,
        profile: &Profile,
        care_team_id: &str,
        caregiver_ids: &[S],
    ) -> Result<()> {
        self.add_members(ctx, profile, care_team_id, caregiver_ids, OwnerType::Caregiver)
            .await
    }

    async fn add_members<S: AsRef<str>>(
        &self,
        ctx: &RequestContext,
        profile: &Profile,
        care_team_id: &str,
        user_ids: &[S],
        owner_type: OwnerType,
    ) -> Result<()> {
        let path = format!("{}/{}/member", CARE_TEAMS_PATH, care_team_id);

        for user_id in user_ids {
            let body = json!({
                "member": {
                    "user_id": user_id.as_ref(),
                    "owner_type": owner_type,
                }
            });
            self.post(path.as_str())
                .context(ctx)
                .bearer_auth(&profile.access_token)
                .json(&body)?
                .send()
                .await?
                .error_for_status(&self.url(&path))?;
            debug!(care_team_id, user_id = user_id.as_ref(), ?owner_type, "Added care team member");
        }
        Ok(())
    }

    /// Look up a profile by email.
    ///
    /// Returns `Ok(None)` when the API reports no such user.
    pub async fn user_exists_for_email(
        &self,
        ctx: &RequestContext,
        token: &str,
        email: &str,
    ) -> Result<Option<Profile>> {
        let path = by_email_path(email)?;

        let response = self
            .get(path.as_str())
            .context(ctx)
            .bearer_auth(token)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = response.error_for_status(&self.url(&path))?;
        let envelope: ProfileEnvelope<Profile> = response.json()?;
        Ok(Some(envelope.user_profile))
    }
}

/// Render a care team id, which the API sends as a JSON number.
fn care_team_id(value: &Value) -> Option<String> {
    if let Some(id) = value.as_i64() {
        return Some(id.to_string());
    }
    if let Some(id) = value.as_u64() {
        return Some(id.to_string());
    }
    value.as_f64().map(|id| format!("{:.0}", id))
}

/// Path for the by-email lookup with the email escaped as one segment.
fn by_email_path(email: &str) -> Result<String> {
    let mut url = url::Url::parse("http://localhost")
        .map_err(|e| ClientError::InvalidUrl(e.to_string()))?;
    url.set_path(USER_PROFILES_PATH);
    url.path_segments_mut()
        .map_err(|_| ClientError::InvalidUrl(email.to_string()))?
        .extend(["by-reference", "email", email]);
    Ok(url.path().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_care_team_id_formats() {
        assert_eq!(care_team_id(&json!(42)), Some("42".to_string()));
        assert_eq!(care_team_id(&json!(42.0)), Some("42".to_string()));
        assert_eq!(care_team_id(&json!("42")), None);
        assert_eq!(care_team_id(&Value::Null), None);
    }

    #[test]
    fn test_by_email_path_escapes() {
        assert_eq!(
            by_email_path("dude@example.com").unwrap(),
            "/api/v1/admin/user-profiles/by-reference/email/dude@example.com"
        );
        assert_eq!(
            by_email_path("a/b c@example.com").unwrap(),
            "/api/v1/admin/user-profiles/by-reference/email/a%2Fb%20c@example.com"
        );
    }

    #[test]
    fn test_owner_type_serializes_as_name() {
        assert_eq!(json!(OwnerType::CareManager), json!("CareManager"));
        assert_eq!(json!(OwnerType::Caregiver), json!("Caregiver"));
    }
}
