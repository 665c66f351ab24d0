// Configuration model

use crate::{ConfigError, Result};
use cs_validation::{AsFieldValue, Schema, Validate};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Root configuration document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub common: CommonConfig,
    /// Landing pages keyed by landing name
    #[serde(default)]
    pub landing: HashMap<String, LandingConfig>,
}

impl Config {
    /// Build a configuration from an already-parsed document.
    ///
    /// Landings that carry their programs as a JSON string (the parameter
    /// store form) have them decoded into `program_map`.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let mut config: Config = serde_json::from_value(value)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.resolve_programs()?;
        Ok(config)
    }

    /// Decode every raw programs string into its landing's program map.
    pub fn resolve_programs(&mut self) -> Result<()> {
        for (name, landing) in self.landing.iter_mut() {
            let Some(raw) = landing.programs_raw.as_deref() else {
                continue;
            };
            if raw.trim().is_empty() {
                continue;
            }
            let programs: Vec<Program> =
                serde_json::from_str(raw).map_err(|source| ConfigError::InvalidPrograms {
                    landing: name.clone(),
                    source,
                })?;
            debug!(landing = %name, programs = programs.len(), "Decoded landing programs");
            landing.program_map = Program::index(programs);
        }
        Ok(())
    }

    pub fn landing(&self, name: &str) -> Option<&LandingConfig> {
        self.landing.get(name)
    }

    /// Program `program` of landing `landing`, if both exist.
    pub fn program(&self, landing: &str, program: &str) -> Option<&Program> {
        self.landing(landing)?.program_map.get(program)
    }

    /// Redirect target registered for `key`.
    pub fn redirect(&self, key: &str) -> Option<&str> {
        self.common.redirects.get(key).map(String::as_str)
    }
}

/// Settings shared by every landing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommonConfig {
    #[serde(default)]
    pub public_base_uri: String,
    #[serde(default)]
    pub redirects: HashMap<String, String>,
}

/// Credentials and programs of one landing page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "LandingRecord")]
pub struct LandingConfig {
    pub client_id: String,
    pub username: String,
    pub password: String,
    /// Programs as received, when they arrived as a JSON string
    #[serde(skip)]
    pub programs_raw: Option<String>,
    /// Programs keyed by name
    #[serde(rename = "programs")]
    pub program_map: HashMap<String, Program>,
}

/// A program a landing can enroll users into.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    #[serde(default)]
    pub organization_name: String,
    #[serde(default)]
    pub organization_id: i64,
    #[serde(default)]
    pub user_type_id: i64,
    #[serde(default)]
    pub caregiver_user_type_id: i64,
    #[serde(default)]
    pub pro_ids: Vec<String>,
}

impl Program {
    /// Key a list of programs by organization name.
    pub fn index(programs: Vec<Program>) -> HashMap<String, Program> {
        programs
            .into_iter()
            .map(|p| (p.organization_name.clone(), p))
            .collect()
    }
}

/// Wire form of a landing. `programs` may be a table keyed by program name,
/// a list keyed by organization name, or a JSON string holding that list.
#[derive(Deserialize)]
struct LandingRecord {
    #[serde(default)]
    client_id: String,
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
    #[serde(default)]
    programs: Option<ProgramsField>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ProgramsField {
    Table(HashMap<String, Program>),
    List(Vec<Program>),
    Raw(String),
}

impl From<LandingRecord> for LandingConfig {
    fn from(record: LandingRecord) -> Self {
        let (program_map, programs_raw) = match record.programs {
            Some(ProgramsField::Table(map)) => (map, None),
            Some(ProgramsField::List(list)) => (Program::index(list), None),
            Some(ProgramsField::Raw(raw)) => (HashMap::new(), Some(raw)),
            None => (HashMap::new(), None),
        };
        Self {
            client_id: record.client_id,
            username: record.username,
            password: record.password,
            programs_raw,
            program_map,
        }
    }
}

// ========== Validation schemas ==========

impl Validate for CommonConfig {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: Lazy<Schema<CommonConfig>> = Lazy::new(|| {
            Schema::builder()
                .field("public_base_uri", "required", |c: &CommonConfig| {
                    c.public_base_uri.as_field_value()
                })
                .build()
        });
        &SCHEMA
    }
}

impl Validate for LandingConfig {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: Lazy<Schema<LandingConfig>> = Lazy::new(|| {
            Schema::builder()
                .field("client_id", "required", |l: &LandingConfig| l.client_id.as_field_value())
                .field("username", "required", |l: &LandingConfig| l.username.as_field_value())
                .field("password", "required", |l: &LandingConfig| l.password.as_field_value())
                .build()
        });
        &SCHEMA
    }
}

impl Validate for Program {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: Lazy<Schema<Program>> = Lazy::new(|| {
            Schema::builder()
                .field("organization_name", "required", |p: &Program| {
                    p.organization_name.as_field_value()
                })
                .field("organization_id", "not-zero", |p: &Program| {
                    p.organization_id.as_field_value()
                })
                .field("user_type_id", "not-zero", |p: &Program| p.user_type_id.as_field_value())
                .build()
        });
        &SCHEMA
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_programs_as_table() {
        let config = Config::from_value(json!({
            "landing": {
                "sample": {
                    "client_id": "id",
                    "programs": {
                        "main": {"organization_name": "org", "organization_id": 1, "user_type_id": 2}
                    }
                }
            }
        }))
        .unwrap();

        let program = config.program("sample", "main").unwrap();
        assert_eq!(program.organization_name, "org");
        assert_eq!(program.user_type_id, 2);
        assert!(config.landing("sample").unwrap().programs_raw.is_none());
    }

    #[test]
    fn test_programs_as_list_keyed_by_organization() {
        let config = Config::from_value(json!({
            "landing": {
                "sample": {
                    "programs": [{"organization_name": "org-a"}, {"organization_name": "org-b"}]
                }
            }
        }))
        .unwrap();

        assert!(config.program("sample", "org-a").is_some());
        assert!(config.program("sample", "org-b").is_some());
    }

    #[test]
    fn test_programs_as_raw_string() {
        let raw = r#"[{"organization_name":"org","organization_id":5,"pro_ids":["p1"]}]"#;
        let config = Config::from_value(json!({
            "landing": {"sample": {"programs": raw}}
        }))
        .unwrap();

        let landing = config.landing("sample").unwrap();
        assert_eq!(landing.programs_raw.as_deref(), Some(raw));
        assert_eq!(landing.program_map["org"].pro_ids, vec!["p1"]);
    }

    #[test]
    fn test_malformed_raw_programs() {
        let err = Config::from_value(json!({
            "landing": {"broken": {"programs": "[{not json"}}
        }))
        .unwrap_err();

        match err {
            ConfigError::InvalidPrograms { landing, .. } => assert_eq!(landing, "broken"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_redirect_lookup() {
        let config = Config::from_value(json!({
            "common": {"redirects": {"home": "https://example.com"}}
        }))
        .unwrap();

        assert_eq!(config.redirect("home"), Some("https://example.com"));
        assert_eq!(config.redirect("missing"), None);
    }

    #[test]
    fn test_program_map_serializes_as_programs() {
        let mut landing = LandingConfig::default();
        landing
            .program_map
            .insert("main".into(), Program { organization_name: "org".into(), ..Default::default() });

        let value = serde_json::to_value(&landing).unwrap();
        assert!(value["programs"]["main"].is_object());
        assert!(value.get("programs_raw").is_none());
    }
}
