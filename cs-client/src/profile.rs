//! User profiles.

use chrono::{DateTime, Utc};
use cs_config::{Config, Program};
use cs_validation::{AsFieldValue, ErrorMap, ErrorSink, FieldValue, Schema, Validate, validate_struct};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

pub const INVALID_LANDING_MESSAGE: &str = "Invalid landing passed";
pub const INVALID_PROGRAM_MESSAGE: &str = "Invalid program passed";

/// Gender values accepted by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Female,
    Male,
    Transgender,
    Unspecified,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Female => "Female",
            Gender::Male => "Male",
            Gender::Transgender => "Transgender",
            Gender::Unspecified => "Unspecified",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsFieldValue for Gender {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::text(self.as_str())
    }
}

/// A user profile as exchanged with the API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub second_email: Option<String>,
    #[serde(default, rename = "address1", skip_serializing_if = "Option::is_none")]
    pub address_line1: Option<String>,
    #[serde(default, rename = "address2", skip_serializing_if = "Option::is_none")]
    pub address_line2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_phone_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_phone_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birthday: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub needs_onboarding: bool,
    #[serde(default)]
    pub user_type_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<i64>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub extended_properties: HashMap<String, String>,
    /// Bearer token used for calls made on behalf of this profile
    #[serde(skip)]
    pub access_token: String,
    #[serde(default)]
    pub landing: String,
    #[serde(default)]
    pub program: String,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// `{"user_profile": …}` envelope used by the profile endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct ProfileEnvelope<P> {
    pub user_profile: P,
}

const PHONE_TYPES: &str = "values-insensitive:mobile|home|work|tablet|other";

impl Validate for Profile {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: Lazy<Schema<Profile>> = Lazy::new(|| {
            Schema::builder()
                .field("first_name", "required,max-length:255", |p: &Profile| p.first_name.as_field_value())
                .field("middle_name", "max-length:255", |p: &Profile| p.middle_name.as_field_value())
                .field("last_name", "required,max-length:255", |p: &Profile| p.last_name.as_field_value())
                .field("username", "required,max-length:255", |p: &Profile| p.username.as_field_value())
                .field("email", "email,max-length:255,required", |p: &Profile| p.email.as_field_value())
                .field("second_email", "email,max-length:255", |p: &Profile| p.second_email.as_field_value())
                .field("address1", "max-length:255", |p: &Profile| p.address_line1.as_field_value())
                .field("address2", "max-length:255", |p: &Profile| p.address_line2.as_field_value())
                .field("city", "max-length:255", |p: &Profile| p.city.as_field_value())
                .field("state", "max-length:255", |p: &Profile| p.state.as_field_value())
                .field("zip_code", "max-length:255", |p: &Profile| p.zip_code.as_field_value())
                .field("country", "max-length:255", |p: &Profile| p.country.as_field_value())
                .field("primary_phone_number", "", |p: &Profile| p.primary_phone_number.as_field_value())
                .field("primary_phone_type", PHONE_TYPES, |p: &Profile| p.primary_phone_type.as_field_value())
                .field("secondary_phone_type", PHONE_TYPES, |p: &Profile| {
                    p.secondary_phone_type.as_field_value()
                })
                .field("locale", "max-length:255", |p: &Profile| p.locale.as_field_value())
                .field("gender", "values:Female|Male|Transgender|Unspecified", |p: &Profile| {
                    p.gender.as_field_value()
                })
                .field("landing", "required", |p: &Profile| p.landing.as_field_value())
                .field("program", "required", |p: &Profile| p.program.as_field_value())
                .build()
        });
        &SCHEMA
    }
}

impl Profile {
    /// Check the profile's fields and its landing/program selection.
    ///
    /// All problems are collected; the returned map is keyed by the
    /// serialized field name.
    pub fn validate(&self, config: &Config) -> Result<(), ErrorMap> {
        let mut errors = ErrorMap::new();
        // Rule failures are already in `errors`.
        let _ = validate_struct(self, &mut errors);
        self.check_selection(config, &mut errors);
        errors.into_result()
    }

    /// Program selected by `landing` and `program`.
    pub fn selected_program<'c>(&self, config: &'c Config) -> Result<&'c Program, ErrorMap> {
        let mut errors = ErrorMap::new();
        self.check_selection(config, &mut errors);
        match config.program(&self.landing, &self.program) {
            Some(program) if errors.is_empty() => Ok(program),
            _ => Err(errors),
        }
    }

    fn check_selection<S: ErrorSink + ?Sized>(&self, config: &Config, sink: &mut S) {
        match config.landing(&self.landing) {
            None => sink.append_error_field("landing", INVALID_LANDING_MESSAGE),
            Some(landing) if !landing.program_map.contains_key(&self.program) => {
                sink.append_error_field("program", INVALID_PROGRAM_MESSAGE)
            }
            Some(_) => {}
        }
    }
}
