//! Process-wide settings, read once from the environment.

use std::env;
use std::fmt::{self, Display, Formatter};

use devmind_core::CapabilitySet;
use devmind_openai_model::{OpenAIConfig, OpenAIConfigBuilder};

use crate::catalog::{self, MODEL_ALLOW_LIST};

/// Environment variable holding the bearer credential.
pub const API_KEY_VAR: &str = "GROQ_API_KEY";
/// Environment variable selecting the model.
pub const MODEL_VAR: &str = "DEVMIND_MODEL";
/// Environment variable overriding the endpoint.
pub const BASE_URL_VAR: &str = "DEVMIND_BASE_URL";
/// Environment variable listing capabilities, separated by commas.
pub const CAPABILITIES_VAR: &str = "DEVMIND_CAPABILITIES";

/// Error returned when the environment holds an invalid choice.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SettingsError {
    /// The model is not in [`MODEL_ALLOW_LIST`].
    UnsupportedModel(String),
    /// A capability is not in [`catalog::CAPABILITY_CATALOG`].
    UnknownCapability(String),
}

impl Display for SettingsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::UnsupportedModel(model) => write!(
                f,
                "{MODEL_VAR}={model:?} is not supported, choose one of: {}",
                MODEL_ALLOW_LIST.join(", ")
            ),
            SettingsError::UnknownCapability(name) => write!(
                f,
                "{CAPABILITIES_VAR} names an unknown capability: {name:?}"
            ),
        }
    }
}

impl std::error::Error for SettingsError {}

/// Settings of one process.
#[derive(Clone, PartialEq)]
pub struct Settings {
    /// The bearer credential. Absence is reported by the first request.
    pub api_key: Option<String>,
    /// The model identifier, always one of [`MODEL_ALLOW_LIST`].
    pub model: String,
    /// A custom endpoint, if any.
    pub base_url: Option<String>,
    /// Capabilities declared in the system directive.
    pub capabilities: CapabilitySet,
}

impl Settings {
    /// Reads the settings from the process environment.
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Reads the settings through `lookup`, which maps a variable name to
    /// its value.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, SettingsError> {
        let non_blank = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_owned())
                .filter(|v| !v.is_empty())
        };

        let model = match non_blank(MODEL_VAR) {
            Some(model) if MODEL_ALLOW_LIST.contains(&model.as_str()) => model,
            Some(model) => return Err(SettingsError::UnsupportedModel(model)),
            None => MODEL_ALLOW_LIST[0].to_owned(),
        };

        let capabilities = match non_blank(CAPABILITIES_VAR) {
            Some(list) => parse_capabilities(&list)?,
            None => catalog::default_capabilities(),
        };

        Ok(Self {
            api_key: non_blank(API_KEY_VAR),
            model,
            base_url: non_blank(BASE_URL_VAR),
            capabilities,
        })
    }

    /// Builds the provider configuration for these settings.
    pub fn provider_config(&self) -> OpenAIConfig {
        let mut builder = OpenAIConfigBuilder::new().with_model(&self.model);
        if let Some(api_key) = &self.api_key {
            builder = builder.with_api_key(api_key);
        }
        if let Some(base_url) = &self.base_url {
            builder = builder.with_base_url(base_url);
        }
        builder.build()
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("capabilities", &self.capabilities)
            .finish()
    }
}

fn parse_capabilities(list: &str) -> Result<CapabilitySet, SettingsError> {
    list.split(',')
        .filter(|name| !name.trim().is_empty())
        .map(|name| {
            catalog::find_capability(name).ok_or_else(|| {
                SettingsError::UnknownCapability(name.trim().to_owned())
            })
        })
        .collect()
}
