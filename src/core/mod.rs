pub mod client;
pub mod engine;
pub mod presenter;
pub mod render;
pub mod request;

pub use crate::domain::model::{IdentificationResponse, PresentationModel};
pub use crate::domain::ports::{IdentificationApi, ImageSource, Renderer};
pub use crate::utils::error::Result;
