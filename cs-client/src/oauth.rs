//! Password-grant OAuth token exchange.

use crate::{ApiClient, ClientError, RequestContext, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Path of the token endpoint, relative to the API base URI.
pub const TOKEN_PATH: &str = "/authentication/token";

/// Credentials for a password grant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthRequest {
    pub username: String,
    pub password: String,
    pub client_id: String,
}

/// Token endpoint response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthResponse {
    pub access_token: String,
}

impl OAuthRequest {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        client_id: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            client_id: client_id.into(),
        }
    }

    /// Credentials of a configured landing page.
    pub fn for_landing(landing: &cs_config::LandingConfig) -> Self {
        Self::new(&landing.username, &landing.password, &landing.client_id)
    }

    /// Form fields sent to the token endpoint.
    pub fn to_params(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("grant_type", "password"),
            ("client_id", self.client_id.as_str()),
            ("username", self.username.as_str()),
            ("password", self.password.as_str()),
        ]
    }

    /// Exchange the credentials for an access token.
    pub async fn get_token(&self, client: &ApiClient, ctx: &RequestContext) -> Result<OAuthResponse> {
        client.get_token(ctx, self).await
    }
}

impl ApiClient {
    /// Exchange credentials for an access token.
    ///
    /// Any status other than 200 is logged with its body and reported as
    /// [`ClientError::Authentication`].
    pub async fn get_token(&self, ctx: &RequestContext, request: &OAuthRequest) -> Result<OAuthResponse> {
        let response = self
            .post(TOKEN_PATH)
            .context(ctx)
            .form(&request.to_params())?
            .send()
            .await?;

        if !response.is_ok() {
            let body = response.text_lossy();
            info!(
                request_id = ctx.request_id(),
                status = response.status().as_u16(),
                response = %body,
                "OAuth error"
            );
            return Err(ClientError::Authentication(format!(
                "token endpoint returned {}",
                response.status()
            )));
        }

        response.json()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oauth_request_to_params() {
        let request = OAuthRequest::new("jlebowski", "abides!", "the-rug");
        let params = request.to_params();

        let get = |key: &str| params.iter().find(|(k, _)| *k == key).map(|(_, v)| *v);
        assert_eq!(get("grant_type"), Some("password"));
        assert_eq!(get("username"), Some("jlebowski"));
        assert_eq!(get("password"), Some("abides!"));
        assert_eq!(get("client_id"), Some("the-rug"));
    }

    #[test]
    fn test_params_are_form_encoded() {
        let request = OAuthRequest::new("a b", "p&w", "id");
        let encoded = serde_urlencoded::to_string(request.to_params()).unwrap();
        assert_eq!(encoded, "grant_type=password&client_id=id&username=a+b&password=p%26w");
    }

    #[test]
    fn test_for_landing() {
        let landing = cs_config::LandingConfig {
            client_id: "oauth.client.id".into(),
            username: "apidude".into(),
            password: "therug".into(),
            ..Default::default()
        };
        assert_eq!(
            OAuthRequest::for_landing(&landing),
            OAuthRequest::new("apidude", "therug", "oauth.client.id")
        );
    }
}
