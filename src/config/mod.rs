#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::domain::model::IdentifyOptions;
use crate::utils::error::Result;
use crate::utils::validation::{validate_range, validate_url, Validate};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://my-api.plantnet.org/v2/identify/all";
pub const DEFAULT_SECONDARY_RESULTS: usize = 3;

/// Where `organs` and `project` travel. The upstream API has accepted both
/// at different times, so this is configuration rather than a constant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum ParamPlacement {
    #[default]
    QueryParams,
    FormFields,
}

/// How many runner-up matches are shown after the best one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecondaryLimit {
    Top(usize),
    All,
}

impl Default for SecondaryLimit {
    fn default() -> Self {
        SecondaryLimit::Top(DEFAULT_SECONDARY_RESULTS)
    }
}

impl SecondaryLimit {
    pub fn cap(&self, available: usize) -> usize {
        match self {
            SecondaryLimit::Top(n) => available.min(*n),
            SecondaryLimit::All => available,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentifyConfig {
    pub endpoint: String,
    pub placement: ParamPlacement,
    pub options: IdentifyOptions,
    pub secondary_limit: SecondaryLimit,
    /// `None` keeps the HTTP client's own default.
    pub timeout_seconds: Option<u64>,
}

impl Default for IdentifyConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            placement: ParamPlacement::default(),
            options: IdentifyOptions::default(),
            secondary_limit: SecondaryLimit::default(),
            timeout_seconds: None,
        }
    }
}

impl IdentifyConfig {
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }
}

impl Validate for IdentifyConfig {
    fn validate(&self) -> Result<()> {
        validate_url("endpoint", &self.endpoint)?;

        if let Some(timeout) = self.timeout_seconds {
            validate_range("timeout_seconds", timeout, 1, 600)?;
        }

        Ok(())
    }
}
