//! Translator configuration.
//!
//! [`TranslatorConfig`] is read from the `translator` section of
//! `config/config.toml` and from `LIFEGUARD__TRANSLATOR__*` environment
//! variables, then turned into the [`TranslateOptions`] and
//! [`ProviderSyntax`] a context is built from.

use crate::command::{BatchCheckModifiedKinds, BatchOperateOptions};
use crate::context::{ProviderSyntax, TranslateOptions};
use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;

const CONFIG_FILE: &str = "config/config.toml";

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct TranslatorConfig {
    /// Statement retrieving the last auto-increment identity
    #[serde(default)]
    pub identity_select: Option<String>,
    #[serde(default = "default_max_relation_depth")]
    pub max_relation_depth: usize,
    #[serde(default)]
    pub batch_check_modified: BatchCheckModifiedKinds,
    #[serde(default)]
    pub no_tracking: bool,
}

fn default_max_relation_depth() -> usize {
    TranslateOptions::default().max_relation_depth
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            identity_select: None,
            max_relation_depth: default_max_relation_depth(),
            batch_check_modified: BatchCheckModifiedKinds::default(),
            no_tracking: false,
        }
    }
}

impl TranslatorConfig {
    /// Load the translator configuration from `config/config.toml`, falling back to env vars.
    ///
    /// A missing `translator` section yields the defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(Environment::with_prefix("LIFEGUARD").separator("__"));

        let settings = match builder.build() {
            Ok(cfg) => cfg,
            Err(err) => {
                if std::path::Path::new(CONFIG_FILE).exists() {
                    log::warn!("failed to load {CONFIG_FILE}, falling back to env: {err}");
                }
                Config::builder()
                    .add_source(Environment::with_prefix("LIFEGUARD").separator("__"))
                    .build()
                    .map_err(|env_err| {
                        ConfigError::Message(format!(
                            "Failed to load configuration from file and env: {err}, then env-only error: {env_err}"
                        ))
                    })?
            }
        };

        Self::from_settings(&settings)
    }

    /// Parse a TOML document holding a `[translator]` table
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from_str(text, FileFormat::Toml))
            .build()?;
        Self::from_settings(&settings)
    }

    fn from_settings(settings: &Config) -> Result<Self, ConfigError> {
        match settings.get::<TranslatorConfig>("translator") {
            Ok(config) => Ok(config),
            Err(ConfigError::NotFound(_)) => Ok(Self::default()),
            Err(e) => Err(ConfigError::Message(format!(
                "Translator configuration could not be loaded from file or environment: {e}"
            ))),
        }
    }

    #[must_use]
    pub fn translate_options(&self) -> TranslateOptions {
        TranslateOptions {
            max_relation_depth: self.max_relation_depth,
            no_tracking: self.no_tracking,
            batch: Some(BatchOperateOptions {
                check_modified_kinds: self.batch_check_modified,
            }),
        }
    }

    #[must_use]
    pub fn provider_syntax(&self) -> ProviderSyntax {
        match &self.identity_select {
            Some(sql) => ProviderSyntax::new().with_identity_select(sql.clone()),
            None => ProviderSyntax::new(),
        }
    }
}
