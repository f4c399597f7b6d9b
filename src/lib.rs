pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::cli::{CliArgs, LocalImageSource, OutputFormat};

pub use crate::config::{IdentifyConfig, ParamPlacement, SecondaryLimit};
pub use crate::core::{
    client::PlantNetClient, engine::IdentifyEngine, presenter::ResultPresenter,
    request::RequestBuilder,
};
pub use crate::domain::model::{
    Credentials, ErrorDetail, IdentificationResponse, IdentifyOptions, ImageUpload, Match,
    MatchView, Organ, PresentationModel,
};
pub use crate::utils::error::{IdentifyError, Result};
