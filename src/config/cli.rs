use crate::config::toml_config::TomlConfig;
use crate::config::{IdentifyConfig, ParamPlacement, SecondaryLimit};
use crate::domain::model::{Credentials, ImageUpload, Organ};
use crate::domain::ports::ImageSource;
use crate::utils::error::Result;
use clap::{Parser, ValueEnum};
use std::io::BufRead;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "plant-id")]
#[command(about = "Identify a plant species from a photo with the Pl@ntNet API")]
pub struct CliArgs {
    /// JPEG or PNG image to identify
    pub image: PathBuf,

    /// Pl@ntNet API key
    #[arg(long, env = "PLANTNET_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Read the API key from stdin instead of the command line
    #[arg(long)]
    pub prompt_key: bool,

    /// Optional TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub endpoint: Option<String>,

    /// Where organs/project hints are sent
    #[arg(long, value_enum)]
    pub placement: Option<ParamPlacement>,

    /// Organ hints, comma separated
    #[arg(long, value_enum, value_delimiter = ',')]
    pub organs: Vec<Organ>,

    /// Send project=all
    #[arg(long)]
    pub all_taxa: bool,

    /// Number of runner-up matches to show
    #[arg(long)]
    pub max_secondary: Option<usize>,

    /// Show every runner-up match
    #[arg(long, conflicts_with = "max_secondary")]
    pub all_secondary: bool,

    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

impl CliArgs {
    /// Defaults, then the config file, then command line flags.
    pub fn resolve(&self) -> Result<(IdentifyConfig, Option<TomlConfig>)> {
        let file = match &self.config {
            Some(path) => Some(TomlConfig::from_file(path)?),
            None => None,
        };

        let mut config = file
            .as_ref()
            .map(TomlConfig::to_identify_config)
            .unwrap_or_default();

        if let Some(endpoint) = &self.endpoint {
            config.endpoint = endpoint.clone();
        }
        if let Some(placement) = self.placement {
            config.placement = placement;
        }
        if !self.organs.is_empty() {
            config.options.organs = self.organs.iter().copied().collect();
        }
        if self.all_taxa {
            config.options.search_all_taxa = true;
        }
        if self.all_secondary {
            config.secondary_limit = SecondaryLimit::All;
        } else if let Some(n) = self.max_secondary {
            config.secondary_limit = SecondaryLimit::Top(n);
        }
        if self.timeout_seconds.is_some() {
            config.timeout_seconds = self.timeout_seconds;
        }

        Ok((config, file))
    }

    /// Picks the key from the flag/env, stdin prompt, or config file, in that order.
    /// An absent key yields empty credentials so the request builder can reject it.
    pub fn credentials<R: BufRead>(&self, file: Option<&TomlConfig>, input: R) -> Result<Credentials> {
        if let Some(key) = &self.api_key {
            return Ok(Credentials::new(key.trim()));
        }
        if self.prompt_key {
            eprint!("Pl@ntNet API key: ");
            let key = read_secret_line(input)?;
            return Ok(Credentials::new(key));
        }
        Ok(file
            .and_then(TomlConfig::api_key)
            .map(Credentials::new)
            .unwrap_or_default())
    }
}

fn read_secret_line<R: BufRead>(mut input: R) -> Result<String> {
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Reads uploads from the local file system.
#[derive(Debug, Clone, Default)]
pub struct LocalImageSource {
    base_path: Option<PathBuf>,
}

impl LocalImageSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: Some(base_path.into()),
        }
    }
}

/// Declared MIME type for an upload; empty when the extension is unknown.
pub fn mime_for_filename(filename: &str) -> &'static str {
    mime_guess::from_path(filename).first_raw().unwrap_or("")
}

impl ImageSource for LocalImageSource {
    async fn load(&self, location: &str) -> Result<ImageUpload> {
        let full_path = match &self.base_path {
            Some(base) => base.join(location),
            None => PathBuf::from(location),
        };

        let bytes = tokio::fs::read(&full_path).await?;
        let filename = full_path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(location)
            .to_string();
        let mime_type = mime_for_filename(&filename);

        tracing::debug!("Loaded {} ({} bytes, {})", filename, bytes.len(), mime_type);
        Ok(ImageUpload::new(filename, bytes, mime_type))
    }
}
