use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Value substituted when a species has no common name.
pub const UNKNOWN_COMMON_NAME: &str = "unknown";

/// Only project scope the client ever sends.
pub const PROJECT_ALL: &str = "all";

pub const ALLOWED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Plant part hint. Declaration order is the order sent to the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum Organ {
    Flower,
    Leaf,
    Bark,
    Fruit,
}

impl Organ {
    pub const ALL: [Organ; 4] = [Organ::Flower, Organ::Leaf, Organ::Bark, Organ::Fruit];

    pub fn as_str(&self) -> &'static str {
        match self {
            Organ::Flower => "flower",
            Organ::Leaf => "leaf",
            Organ::Bark => "bark",
            Organ::Fruit => "fruit",
        }
    }
}

impl fmt::Display for Organ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Organ {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "flower" => Ok(Organ::Flower),
            "leaf" => Ok(Organ::Leaf),
            "bark" => Ok(Organ::Bark),
            "fruit" => Ok(Organ::Fruit),
            other => Err(format!(
                "unknown organ '{}', expected one of flower, leaf, bark, fruit",
                other
            )),
        }
    }
}

/// One image handed over by the upload collaborator.
#[derive(Clone)]
pub struct ImageUpload {
    pub filename: String,
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl ImageUpload {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
            mime_type: mime_type.into(),
        }
    }
}

impl fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageUpload")
            .field("filename", &self.filename)
            .field("bytes", &self.bytes.len())
            .field("mime_type", &self.mime_type)
            .finish()
    }
}

#[derive(Clone, Default)]
pub struct Credentials {
    pub api_key: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifyOptions {
    #[serde(default)]
    pub organs: BTreeSet<Organ>,
    #[serde(default)]
    pub search_all_taxa: bool,
}

impl IdentifyOptions {
    /// Comma-joined organ list, `None` when no hint was requested.
    pub fn organs_param(&self) -> Option<String> {
        if self.organs.is_empty() {
            return None;
        }
        Some(
            self.organs
                .iter()
                .map(Organ::as_str)
                .collect::<Vec<_>>()
                .join(","),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Species {
    pub scientific_name: String,
    #[serde(default)]
    pub scientific_name_without_author: Option<String>,
    #[serde(default)]
    pub common_names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub species: Species,
    pub score: f64,
}

impl Match {
    pub fn common_name(&self) -> &str {
        self.species
            .common_names
            .first()
            .map(String::as_str)
            .unwrap_or(UNKNOWN_COMMON_NAME)
    }
}

/// Successful body of the identify endpoint. Fields the client does not use are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentificationResponse {
    #[serde(default)]
    pub results: Vec<Match>,
    #[serde(default)]
    pub best_match: Option<String>,
    #[serde(default)]
    pub remaining_identification_requests: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub http_status: Option<u16>,
    pub message: String,
    pub server_body: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchView {
    pub rank: usize,
    pub scientific_name: String,
    pub common_name: String,
    pub confidence: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PresentationModel {
    Success {
        best: MatchView,
        others: Vec<MatchView>,
    },
    NoMatch,
    Failed {
        error: ErrorDetail,
    },
}

/// Renders a score in [0, 1] as a percentage with two decimals.
pub fn format_confidence(score: f64) -> String {
    format!("{:.2}%", score * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_confidence() {
        assert_eq!(format_confidence(0.8734), "87.34%");
        assert_eq!(format_confidence(1.0), "100.00%");
        assert_eq!(format_confidence(0.0), "0.00%");
        assert_eq!(format_confidence(0.4), "40.00%");
    }

    #[test]
    fn test_organs_param_uses_canonical_order() {
        let options = IdentifyOptions {
            organs: [Organ::Fruit, Organ::Leaf, Organ::Flower].into_iter().collect(),
            search_all_taxa: false,
        };
        assert_eq!(options.organs_param().as_deref(), Some("flower,leaf,fruit"));
        assert_eq!(IdentifyOptions::default().organs_param(), None);
    }

    #[test]
    fn test_organ_from_str() {
        assert_eq!("Leaf".parse::<Organ>(), Ok(Organ::Leaf));
        assert_eq!(" bark ".parse::<Organ>(), Ok(Organ::Bark));
        assert!("root".parse::<Organ>().is_err());
    }

    #[test]
    fn test_common_name_falls_back_to_unknown() {
        let m = Match {
            species: Species {
                scientific_name: "Quercus robur L.".to_string(),
                scientific_name_without_author: None,
                common_names: vec![],
            },
            score: 0.5,
        };
        assert_eq!(m.common_name(), UNKNOWN_COMMON_NAME);
    }

    #[test]
    fn test_response_parses_plantnet_body() {
        let body = serde_json::json!({
            "query": {"project": "all", "organs": ["auto"]},
            "language": "en",
            "bestMatch": "Hibiscus rosa-sinensis L.",
            "results": [
                {
                    "score": 0.8734,
                    "species": {
                        "scientificNameWithoutAuthor": "Hibiscus rosa-sinensis",
                        "scientificName": "Hibiscus rosa-sinensis L.",
                        "commonNames": ["Chinese hibiscus", "Shoeblackplant"]
                    }
                }
            ],
            "remainingIdentificationRequests": 497
        });

        let response: IdentificationResponse = serde_json::from_value(body).unwrap();
        assert_eq!(response.results.len(), 1);
        assert_eq!(response.results[0].common_name(), "Chinese hibiscus");
        assert_eq!(response.remaining_identification_requests, Some(497));
    }

    #[test]
    fn test_response_without_results_is_empty() {
        let response: IdentificationResponse = serde_json::from_str("{}").unwrap();
        assert!(response.results.is_empty());
    }

    #[test]
    fn test_credentials_debug_redacts_key() {
        let debug = format!("{:?}", Credentials::new("secret-key"));
        assert!(!debug.contains("secret-key"));
    }
}
