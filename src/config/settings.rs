use crate::services::DEFAULT_FULL_CHECK_LOCALES;
use anyhow::{Context, Result};
use camino::Utf8Path;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

/// Prefix of environment variables overriding run settings.
pub const ENV_PREFIX: &str = "UPDATE_VERIFY";

/// Default update channel the harness queries.
pub const DEFAULT_CHANNEL: &str = "betatest";

/// Run settings: built-in defaults, then an optional settings file, then
/// `UPDATE_VERIFY_*` environment variables.
///
/// These are resolved once in the binary and passed on as plain values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub channel: String,
    pub full_check_locales: Vec<String>,
    pub log_dir: String,
    #[serde(default)]
    pub debug: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            channel: DEFAULT_CHANNEL.to_string(),
            full_check_locales: DEFAULT_FULL_CHECK_LOCALES
                .iter()
                .map(|l| l.to_string())
                .collect(),
            log_dir: "logs".to_string(),
            debug: false,
        }
    }
}

impl Settings {
    /// Load settings from defaults, an optional file and the environment.
    pub fn load(settings_file: Option<&Utf8Path>) -> Result<Self> {
        Self::load_with_env(settings_file, Environment::with_prefix(ENV_PREFIX))
    }

    fn load_with_env(settings_file: Option<&Utf8Path>, env: Environment) -> Result<Self> {
        let defaults = Settings::default();

        let mut builder = Config::builder()
            .set_default("channel", defaults.channel.clone())?
            .set_default("full_check_locales", defaults.full_check_locales.clone())?
            .set_default("log_dir", defaults.log_dir.clone())?
            .set_default("debug", defaults.debug)?;

        if let Some(path) = settings_file {
            if !path.exists() {
                anyhow::bail!("Settings file not found: {}", path);
            }
            builder = builder.add_source(File::from(path.as_std_path()).required(true));
        }

        builder
            .add_source(
                env.try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("full_check_locales"),
            )
            .build()
            .context("Failed to assemble run settings")?
            .try_deserialize()
            .context("Failed to parse run settings")
    }

    /// Check if the full-check locales are still the built-in defaults
    pub fn uses_default_full_check_locales(&self) -> bool {
        self.full_check_locales
            .iter()
            .map(String::as_str)
            .eq(DEFAULT_FULL_CHECK_LOCALES)
    }
}
