//! Image generation endpoint handler

use axum::{body::Bytes, extract::State, http::StatusCode, Json};
use tracing::{debug, error, info};
use uuid::Uuid;

use super::AppState;
use crate::encoding;
use crate::models::{GenerateImageRequest, GenerateImageResponse, ImagePayload};
use crate::upstream::ImageGenerationService;
use crate::{Error, Result};

/// POST /api/generate-image - Generate an image from a text prompt
///
/// Every failure, whatever its kind, is answered with the failure envelope
/// and a 500 so callers only ever see one response shape.
pub async fn generate_image_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> (StatusCode, Json<GenerateImageResponse>) {
    let request_id = Uuid::new_v4();
    debug!(%request_id, "Image generation request received: {} bytes", body.len());

    match proxy_prompt(state.generator.as_ref(), &body).await {
        Ok(payload) => {
            info!(
                %request_id,
                "Image generated: {} chars of data URI, caption {:?}",
                payload.image.len(),
                payload.caption
            );
            (
                StatusCode::OK,
                Json(GenerateImageResponse::success(payload)),
            )
        }
        Err(e) => {
            error!(%request_id, kind = ?e.kind(), "Image generation failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(GenerateImageResponse::failure(&e)),
            )
        }
    }
}

/// Runs one prompt through the image service and re-encodes the result.
///
/// The prompt is forwarded exactly as received, empty strings included.
pub async fn proxy_prompt(
    generator: &dyn ImageGenerationService,
    body: &[u8],
) -> Result<ImagePayload> {
    let request: GenerateImageRequest = serde_json::from_slice(body)
        .map_err(|e| Error::Input(format!("request body must be {{\"text\": string}}: {}", e)))?;

    info!("Received prompt: {:?}", request.text);

    let upstream = generator.generate_image(&request.text).await?;
    let image = encoding::jpeg_data_uri(&upstream.image_bytes)?;

    Ok(ImagePayload {
        image,
        caption: upstream.caption,
    })
}
