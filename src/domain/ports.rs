use crate::core::request::PreparedRequest;
use crate::domain::model::{IdentificationResponse, ImageUpload, PresentationModel};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Supplies one image at a time.
pub trait ImageSource: Send + Sync {
    fn load(&self, location: &str) -> impl std::future::Future<Output = Result<ImageUpload>> + Send;
}

#[async_trait]
pub trait IdentificationApi: Send + Sync {
    async fn identify(&self, request: PreparedRequest) -> Result<IdentificationResponse>;
}

pub trait Renderer {
    fn render(&mut self, model: &PresentationModel) -> Result<()>;
}
