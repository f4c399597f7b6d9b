use crate::config::IdentifyConfig;
use crate::core::client::PlantNetClient;
use crate::core::presenter::ResultPresenter;
use crate::core::request::RequestBuilder;
use crate::domain::model::{
    Credentials, IdentificationResponse, IdentifyOptions, ImageUpload, PresentationModel,
};
use crate::domain::ports::IdentificationApi;
use crate::utils::error::Result;

/// Runs one upload through build, send and interpret.
pub struct IdentifyEngine<A: IdentificationApi> {
    builder: RequestBuilder,
    api: A,
    presenter: ResultPresenter,
    options: IdentifyOptions,
}

impl IdentifyEngine<PlantNetClient> {
    pub fn from_config(config: &IdentifyConfig) -> Result<Self> {
        let api = PlantNetClient::new(config)?;
        Self::new(config, api)
    }
}

impl<A: IdentificationApi> IdentifyEngine<A> {
    pub fn new(config: &IdentifyConfig, api: A) -> Result<Self> {
        Ok(Self {
            builder: RequestBuilder::new(config)?,
            api,
            presenter: ResultPresenter::new(config.secondary_limit),
            options: config.options.clone(),
        })
    }

    pub async fn identify(
        &self,
        upload: ImageUpload,
        credentials: &Credentials,
    ) -> PresentationModel {
        tracing::info!("🔎 Identifying plant in {}", upload.filename);
        let outcome = self.run(upload, credentials).await;

        match &outcome {
            Ok(response) => tracing::info!("✅ Received {} candidate(s)", response.results.len()),
            Err(e) => {
                tracing::error!("❌ Identification failed: {} (Category: {:?})", e, e.category());
                tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            }
        }

        self.presenter.interpret(outcome)
    }

    async fn run(
        &self,
        upload: ImageUpload,
        credentials: &Credentials,
    ) -> Result<IdentificationResponse> {
        let request = self.builder.build(upload, credentials, &self.options)?;
        self.api.identify(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::request::PreparedRequest;
    use crate::domain::model::{Match, Species};
    use crate::utils::error::IdentifyError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct StubApi {
        calls: Arc<AtomicUsize>,
        response: fn() -> Result<IdentificationResponse>,
    }

    #[async_trait::async_trait]
    impl IdentificationApi for StubApi {
        async fn identify(&self, _request: PreparedRequest) -> Result<IdentificationResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (self.response)()
        }
    }

    fn png_upload() -> ImageUpload {
        let img = image::RgbImage::from_pixel(2, 2, image::Rgb([0, 128, 0]));
        let mut buf = std::io::Cursor::new(Vec::new());
        img.write_to(&mut buf, image::ImageFormat::Png).unwrap();
        ImageUpload::new("leaf.png", buf.into_inner(), "image/png")
    }

    fn two_results() -> Result<IdentificationResponse> {
        let entry = |name: &str, score| Match {
            species: Species {
                scientific_name: name.to_string(),
                scientific_name_without_author: None,
                common_names: vec![],
            },
            score,
        };
        Ok(IdentificationResponse {
            results: vec![entry("Ficus carica L.", 0.9), entry("Ficus benjamina L.", 0.4)],
            ..IdentificationResponse::default()
        })
    }

    fn stub_engine(
        response: fn() -> Result<IdentificationResponse>,
    ) -> (IdentifyEngine<StubApi>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let api = StubApi {
            calls: calls.clone(),
            response,
        };
        (IdentifyEngine::new(&IdentifyConfig::default(), api).unwrap(), calls)
    }

    #[tokio::test]
    async fn test_empty_key_never_reaches_api() {
        let (engine, calls) = stub_engine(two_results);

        let model = engine.identify(png_upload(), &Credentials::new("")).await;

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        match model {
            PresentationModel::Failed { error } => {
                assert_eq!(error.http_status, None);
                assert_eq!(error.message, "missing API key");
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_success_flows_to_presentation() {
        let (engine, calls) = stub_engine(two_results);

        let model = engine.identify(png_upload(), &Credentials::new("testkey")).await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        match model {
            PresentationModel::Success { best, others } => {
                assert_eq!(best.scientific_name, "Ficus carica L.");
                assert_eq!(best.confidence, "90.00%");
                assert_eq!(others.len(), 1);
            }
            other => panic!("expected success, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_api_error_is_presented_not_raised() {
        let (engine, calls) = stub_engine(|| {
            Err(IdentifyError::Transport {
                status: Some(429),
                message: "HTTP status 429 Too Many Requests".to_string(),
                body: Some("quota exceeded".to_string()),
            })
        });

        let model = engine.identify(png_upload(), &Credentials::new("testkey")).await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(
            model,
            PresentationModel::Failed { ref error } if error.http_status == Some(429)
        ));
    }
}
