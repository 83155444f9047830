mod settings;

pub use settings::{
    DEFAULT_SETTINGS_FILE, ENV_PREFIX, RestLoginSettings, ServerSettings, SettingsError,
};
