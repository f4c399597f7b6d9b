use crate::config::{IdentifyConfig, ParamPlacement};
use crate::domain::model::{
    Credentials, IdentifyOptions, ImageUpload, ALLOWED_EXTENSIONS, PROJECT_ALL,
};
use crate::utils::error::{IdentifyError, Result};
use crate::utils::validation::validate_file_extension;
use image::{ImageFormat, ImageReader};
use mime_guess::mime::Mime;
use reqwest::multipart::{Form, Part};
use std::fmt;
use std::io::Cursor;
use url::Url;

pub const IMAGE_FIELD: &str = "images";
pub const API_KEY_PARAM: &str = "api-key";
pub const ORGANS_PARAM: &str = "organs";
pub const PROJECT_PARAM: &str = "project";

pub struct ImagePart {
    pub filename: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// A fully assembled identify call. Kept independent of reqwest so the
/// parameter placement can be inspected before anything is sent.
pub struct PreparedRequest {
    pub url: Url,
    pub form_fields: Vec<(String, String)>,
    pub image: ImagePart,
}

impl PreparedRequest {
    pub fn query_value(&self, name: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }

    pub fn form_value(&self, name: &str) -> Option<&str> {
        self.form_fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// URL safe for logs: the api key value is masked.
    pub fn redacted_url(&self) -> String {
        let mut url = self.url.clone();
        let pairs: Vec<(String, String)> = self
            .url
            .query_pairs()
            .map(|(key, value)| {
                if key == API_KEY_PARAM {
                    (key.into_owned(), "***".to_string())
                } else {
                    (key.into_owned(), value.into_owned())
                }
            })
            .collect();
        url.query_pairs_mut().clear().extend_pairs(pairs);
        url.to_string()
    }

    /// Consumes the request; the image bytes move into the multipart body.
    pub fn into_multipart(self) -> Result<(Url, Form)> {
        let part = Part::bytes(self.image.bytes)
            .file_name(self.image.filename)
            .mime_str(&self.image.mime_type)
            .map_err(|e| {
                IdentifyError::validation(format!("invalid MIME type for image part: {}", e))
            })?;

        let form = self
            .form_fields
            .into_iter()
            .fold(Form::new().part(IMAGE_FIELD, part), |form, (name, value)| {
                form.text(name, value)
            });

        Ok((self.url, form))
    }
}

impl fmt::Debug for PreparedRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreparedRequest")
            .field("url", &self.redacted_url())
            .field("form_fields", &self.form_fields)
            .field("filename", &self.image.filename)
            .field("mime_type", &self.image.mime_type)
            .field("bytes", &self.image.bytes.len())
            .finish()
    }
}

pub struct RequestBuilder {
    endpoint: Url,
    placement: ParamPlacement,
}

impl RequestBuilder {
    pub fn new(config: &IdentifyConfig) -> Result<Self> {
        let endpoint = Url::parse(&config.endpoint).map_err(|e| IdentifyError::InvalidConfigValue {
            field: "endpoint".to_string(),
            value: config.endpoint.clone(),
            reason: format!("Invalid URL format: {}", e),
        })?;

        Ok(Self {
            endpoint,
            placement: config.placement,
        })
    }

    pub fn build(
        &self,
        upload: ImageUpload,
        credentials: &Credentials,
        options: &IdentifyOptions,
    ) -> Result<PreparedRequest> {
        if credentials.api_key.trim().is_empty() {
            return Err(IdentifyError::validation("missing API key"));
        }
        if upload.bytes.is_empty() {
            return Err(IdentifyError::validation("image is empty"));
        }
        validate_file_extension("image", &upload.filename, &ALLOWED_EXTENSIONS)?;

        let format = detect_image_format(&upload.bytes)?;
        let mime_type = if upload.mime_type.trim().is_empty() {
            format.to_mime_type().to_string()
        } else {
            upload.mime_type
        };
        mime_type.parse::<Mime>().map_err(|e| {
            IdentifyError::validation(format!("invalid MIME type '{}': {}", mime_type, e))
        })?;

        let mut hints = Vec::new();
        if let Some(organs) = options.organs_param() {
            hints.push((ORGANS_PARAM.to_string(), organs));
        }
        if options.search_all_taxa {
            hints.push((PROJECT_PARAM.to_string(), PROJECT_ALL.to_string()));
        }

        let mut url = self.endpoint.clone();
        let mut form_fields = Vec::new();
        {
            let mut query = url.query_pairs_mut();
            query.append_pair(API_KEY_PARAM, &credentials.api_key);
            match self.placement {
                ParamPlacement::QueryParams => {
                    for (name, value) in &hints {
                        query.append_pair(name, value);
                    }
                }
                ParamPlacement::FormFields => form_fields = hints,
            }
        }

        tracing::debug!(
            "Prepared {} ({:?}, {} bytes) with hints in {:?}",
            upload.filename,
            format,
            upload.bytes.len(),
            self.placement
        );

        Ok(PreparedRequest {
            url,
            form_fields,
            image: ImagePart {
                filename: upload.filename,
                mime_type,
                bytes: upload.bytes,
            },
        })
    }
}

/// Sniffs the container and reads its header. Only JPEG and PNG are accepted.
pub fn detect_image_format(bytes: &[u8]) -> Result<ImageFormat> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| IdentifyError::Decode {
            message: e.to_string(),
        })?;

    let format = reader.format().ok_or_else(|| IdentifyError::Decode {
        message: "unrecognised image container".to_string(),
    })?;

    if !matches!(format, ImageFormat::Jpeg | ImageFormat::Png) {
        return Err(IdentifyError::Decode {
            message: format!("unsupported image format {:?}", format),
        });
    }

    reader.into_dimensions().map_err(|e| IdentifyError::Decode {
        message: e.to_string(),
    })?;

    Ok(format)
}
