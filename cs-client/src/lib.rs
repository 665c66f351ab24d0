//! # cs-client
//!
//! Typed client for the user profile and care team API.
//!
//! Every request carries `Content-Type`, a bearer token where the endpoint
//! needs one, and the caller's request id in `X-Vela-Request-Id`. Any status
//! other than 200 is an error; field-level problems come back as a
//! [`cs_validation::ErrorMap`] inside [`ClientError::Validation`].
//!
//! ## Enrolling a user
//!
//! ```rust,no_run
//! use cs_client::{ApiClient, ClientConfig, OAuthRequest, Profile, RequestContext};
//!
//! # async fn enroll(config: &cs_config::Config, mut profile: Profile) -> cs_client::Result<()> {
//! let client = ApiClient::from_config(ClientConfig::default(), config)?;
//! let ctx = RequestContext::new("req-123");
//!
//! profile.validate(config)?;
//!
//! let landing = config.landing(&profile.landing).expect("validated above");
//! let token = OAuthRequest::for_landing(landing).get_token(&client, &ctx).await?;
//! profile.access_token = token.access_token;
//!
//! client.create_profile(&ctx, &mut profile, config).await?;
//! let care_team = client.get_care_room_id(&ctx, &profile).await?;
//! client.authorize_care_room(&ctx, &profile, &care_team).await?;
//!
//! let program = profile.selected_program(config)?;
//! client.add_professionals(&ctx, &profile, &care_team, &program.pro_ids).await?;
//! # Ok(())
//! # }
//! ```

mod care_team;
mod client;
mod config;
mod context;
mod error;
mod oauth;
mod profile;
mod request;
mod response;

pub use care_team::{CARE_TEAMS_PATH, OwnerType, USER_PROFILES_PATH};
pub use client::ApiClient;
pub use config::{ClientConfig, ClientConfigBuilder, PoolSettings};
pub use context::{REQUEST_ID_HEADER, RequestContext};
pub use error::{ApiError, ApiErrorField, ClientError, Result};
pub use oauth::{OAuthRequest, OAuthResponse, TOKEN_PATH};
pub use profile::{Gender, INVALID_LANDING_MESSAGE, INVALID_PROGRAM_MESSAGE, Profile};
pub use request::RequestBuilder;
pub use response::Response;
