//! Re-encoding of image payloads between the image service and the gallery.
//!
//! The image service ships JPEG bytes as a hex string; browsers and the
//! gallery want a base64 data URI.

use crate::{Error, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

pub const JPEG_DATA_URI_PREFIX: &str = "data:image/jpeg;base64,";

/// Decodes a hex payload and wraps it as a JPEG data URI.
pub fn jpeg_data_uri(hex_bytes: &str) -> Result<String> {
    let bytes = hex::decode(hex_bytes)
        .map_err(|e| Error::UpstreamPayload(format!("image_bytes is not valid hex: {}", e)))?;

    match detect_image_mime(&bytes) {
        Some("image/jpeg") => {}
        detected => tracing::warn!(
            "Payload does not look like a JPEG (detected {:?}, first 4 bytes: {:02X?}), labelling it image/jpeg anyway",
            detected,
            &bytes[..bytes.len().min(4)]
        ),
    }

    Ok(format!("{}{}", JPEG_DATA_URI_PREFIX, STANDARD.encode(&bytes)))
}

/// Extracts the raw bytes from a `data:image/jpeg;base64,...` URI.
pub fn decode_jpeg_data_uri(uri: &str) -> Result<Vec<u8>> {
    let encoded = uri
        .strip_prefix(JPEG_DATA_URI_PREFIX)
        .ok_or_else(|| Error::Input("image is not a JPEG data URI".to_string()))?;

    STANDARD
        .decode(encoded)
        .map_err(|e| Error::Input(format!("image data URI is not valid base64: {}", e)))
}

pub fn is_jpeg_data_uri(uri: &str) -> bool {
    decode_jpeg_data_uri(uri).is_ok()
}

pub fn detect_image_mime(bytes: &[u8]) -> Option<&'static str> {
    match bytes {
        [0xFF, 0xD8, 0xFF, ..] => Some("image/jpeg"),
        [0x89, 0x50, 0x4E, 0x47, ..] => Some("image/png"),
        [0x52, 0x49, 0x46, 0x46, _, _, _, _, 0x57, 0x45, 0x42, 0x50, ..] => Some("image/webp"),
        _ => None,
    }
}
