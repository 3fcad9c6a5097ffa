//! Data models and structures
//!
//! Defines the request/response shapes of the proxy endpoint, the payload
//! returned by the external image service, and runtime configuration.

use crate::{Error, Result};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

/// Body of `POST /api/generate-image`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateImageRequest {
    pub text: String,
}

/// Envelope returned by the proxy endpoint, tagged by `success`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerateImageResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl GenerateImageResponse {
    pub fn success(payload: ImagePayload) -> Self {
        Self {
            success: true,
            image: Some(payload.image),
            caption: Some(payload.caption),
            error: None,
            details: None,
        }
    }

    pub fn failure(error: &Error) -> Self {
        Self {
            success: false,
            image: None,
            caption: None,
            error: Some(error.to_string()),
            details: error.details(),
        }
    }

    /// Interprets the envelope from the caller's side.
    ///
    /// Only `success: true` with an image counts; anything else becomes the
    /// envelope's error message, or a generic one when none was sent.
    pub fn into_payload(self) -> Result<ImagePayload> {
        match (self.success, self.image) {
            (true, Some(image)) => Ok(ImagePayload {
                image,
                caption: self.caption.unwrap_or_default(),
            }),
            _ => Err(Error::Proxy(
                self.error
                    .unwrap_or_else(|| "Failed to generate image".to_string()),
            )),
        }
    }
}

/// Success content shared by the endpoint and its clients.
#[derive(Debug, Clone, PartialEq)]
pub struct ImagePayload {
    /// `data:image/jpeg;base64,...`
    pub image: String,
    pub caption: String,
}

/// Success body of the external image service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamImage {
    /// Hex-encoded JPEG bytes.
    pub image_bytes: String,
    pub caption: String,
}

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub image_service_url: Url,
    pub bind_addr: SocketAddr,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds and validates configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_url = lookup("IMAGE_SERVICE_URL")
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| Error::Config("IMAGE_SERVICE_URL not set".to_string()))?;

        let image_service_url = Url::parse(raw_url.trim()).map_err(|e| {
            Error::Config(format!("IMAGE_SERVICE_URL '{}' is not a valid URL: {}", raw_url, e))
        })?;

        if !matches!(image_service_url.scheme(), "http" | "https") {
            return Err(Error::Config(format!(
                "IMAGE_SERVICE_URL must use http or https, got '{}'",
                image_service_url.scheme()
            )));
        }

        let raw_bind = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = raw_bind.parse::<SocketAddr>().map_err(|e| {
            Error::Config(format!("BIND_ADDR '{}' is not a socket address: {}", raw_bind, e))
        })?;

        Ok(Self {
            image_service_url,
            bind_addr,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_success_envelope_omits_error_fields() {
        let response = GenerateImageResponse::success(ImagePayload {
            image: "data:image/jpeg;base64,/9j/".to_string(),
            caption: "a cat".to_string(),
        });

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "success": true,
                "image": "data:image/jpeg;base64,/9j/",
                "caption": "a cat"
            })
        );
    }

    #[test]
    fn test_failure_envelope_without_cause_has_no_details() {
        let response = GenerateImageResponse::failure(&Error::UpstreamHttp {
            status: 503,
            body: "overloaded".to_string(),
        });

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "success": false,
                "error": "Failed to generate image: 503 overloaded"
            })
        );
    }

    #[test]
    fn test_into_payload_requires_image() {
        let envelope: GenerateImageResponse =
            serde_json::from_str(r#"{"success": true, "caption": "no image"}"#).unwrap();
        let err = envelope.into_payload().unwrap_err();
        assert_eq!(err.to_string(), "Failed to generate image");
    }

    #[test]
    fn test_into_payload_uses_error_message() {
        let envelope: GenerateImageResponse =
            serde_json::from_str(r#"{"success": false, "error": "boom"}"#).unwrap();
        assert_eq!(envelope.into_payload().unwrap_err().to_string(), "boom");
    }

    #[test]
    fn test_config_defaults_bind_addr() {
        let config =
            Config::from_lookup(lookup_from(&[("IMAGE_SERVICE_URL", "https://gen.example/run")]))
                .unwrap();
        assert_eq!(config.image_service_url.as_str(), "https://gen.example/run");
        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR.parse::<SocketAddr>().unwrap());
    }

    #[test]
    fn test_config_missing_url_fails_fast() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
        assert!(err.to_string().contains("IMAGE_SERVICE_URL"));

        let err = Config::from_lookup(lookup_from(&[("IMAGE_SERVICE_URL", "  ")])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_config_rejects_non_http_url() {
        let err = Config::from_lookup(lookup_from(&[("IMAGE_SERVICE_URL", "ftp://gen.example")]))
            .unwrap_err();
        assert!(err.to_string().contains("http or https"));

        let err = Config::from_lookup(lookup_from(&[("IMAGE_SERVICE_URL", "not a url")]))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_config_rejects_bad_bind_addr() {
        let err = Config::from_lookup(lookup_from(&[
            ("IMAGE_SERVICE_URL", "http://localhost:9000"),
            ("BIND_ADDR", "localhost"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("BIND_ADDR"));
    }
}
