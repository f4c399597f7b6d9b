use crate::config::{IdentifyConfig, ParamPlacement, SecondaryLimit};
use crate::domain::model::{IdentifyOptions, Organ};
use crate::utils::error::{IdentifyError, Result};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub api: ApiSection,
    #[serde(default)]
    pub request: RequestSection,
    #[serde(default)]
    pub display: DisplaySection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiSection {
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestSection {
    pub placement: Option<ParamPlacement>,
    pub organs: Option<Vec<Organ>>,
    pub search_all_taxa: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisplaySection {
    pub max_secondary: Option<usize>,
    pub show_all_secondary: Option<bool>,
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| IdentifyError::ConfigParse {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value, leaving unknown names untouched.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| IdentifyError::ConfigParse {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// Key from the file, unless it is missing or still an unresolved `${VAR}`.
    pub fn api_key(&self) -> Option<&str> {
        self.api
            .api_key
            .as_deref()
            .filter(|key| !(key.starts_with("${") && key.ends_with('}')))
    }

    /// Layers the file over the built-in defaults.
    pub fn to_identify_config(&self) -> IdentifyConfig {
        let defaults = IdentifyConfig::default();

        let secondary_limit = match (self.display.show_all_secondary, self.display.max_secondary) {
            (Some(true), _) => SecondaryLimit::All,
            (_, Some(n)) => SecondaryLimit::Top(n),
            _ => defaults.secondary_limit,
        };

        IdentifyConfig {
            endpoint: self.api.endpoint.clone().unwrap_or(defaults.endpoint),
            placement: self.request.placement.unwrap_or(defaults.placement),
            options: IdentifyOptions {
                organs: self
                    .request
                    .organs
                    .as_ref()
                    .map(|organs| organs.iter().copied().collect())
                    .unwrap_or(defaults.options.organs),
                search_all_taxa: self
                    .request
                    .search_all_taxa
                    .unwrap_or(defaults.options.search_all_taxa),
            },
            secondary_limit,
            timeout_seconds: self.api.timeout_seconds.or(defaults.timeout_seconds),
        }
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.to_identify_config().validate()
    }
}
