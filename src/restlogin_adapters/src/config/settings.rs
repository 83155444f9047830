use std::path::Path;

use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;

use crate::handlers::FailureStatusPolicy;

/// Settings file looked up by [`RestLoginSettings::load`].
pub const DEFAULT_SETTINGS_FILE: &str = "restlogin.json";

/// Environment overrides use this prefix and `__` for nesting, e.g.
/// `RESTLOGIN__LOGIN_PATH=/auth` or `RESTLOGIN__SERVER__ADDRESS=0.0.0.0:8080`.
pub const ENV_PREFIX: &str = "RESTLOGIN";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to load settings: {0}")]
    Load(#[from] config::ConfigError),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub address: String,
    pub allowed_origins: Vec<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            address: "0.0.0.0:3000".to_owned(),
            allowed_origins: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RestLoginSettings {
    pub login_path: String,
    pub permit_all: bool,
    pub require_json_accept: bool,
    pub username_parameter: String,
    pub password_parameter: String,
    pub max_body_bytes: usize,
    pub session_cookie_name: String,
    /// Record the first `x-forwarded-for` hop instead of the peer address.
    pub trust_forwarded_for: bool,
    pub failure_status: FailureStatusPolicy,
    pub entry_point_status: u16,
    pub server: ServerSettings,
}

impl Default for RestLoginSettings {
    fn default() -> Self {
        Self {
            login_path: "/api/login".to_owned(),
            permit_all: true,
            require_json_accept: true,
            username_parameter: "username".to_owned(),
            password_parameter: "password".to_owned(),
            max_body_bytes: 64 * 1024,
            session_cookie_name: "SESSION".to_owned(),
            trust_forwarded_for: false,
            failure_status: FailureStatusPolicy::default(),
            entry_point_status: 401,
            server: ServerSettings::default(),
        }
    }
}

impl RestLoginSettings {
    /// Load `.env`, then `restlogin.json` (optional), then `RESTLOGIN__*` variables.
    pub fn load() -> Result<Self, SettingsError> {
        dotenvy::dotenv().ok();
        Self::load_from(DEFAULT_SETTINGS_FILE)
    }

    /// Like [`load`](Self::load) with an explicit settings file and without `.env`.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        Self::build(path.as_ref(), Environment::with_prefix(ENV_PREFIX))
    }

    fn build(path: &Path, environment: Environment) -> Result<Self, SettingsError> {
        let settings = Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(
                environment
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("server.allowed_origins"),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
