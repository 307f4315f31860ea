//! Photo upload encoding and decoding.
//!
//! Uploads are stored on the document as `data:<mime>;base64,<payload>` URLs. The
//! layout engine decodes them back into RGB pixels for embedding.

use std::path::Path;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use tracing::{info, warn};

use crate::errors::AppError;

/// Decoded photo pixels, 8 bits per component, RGB, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    pub rgb: Vec<u8>,
}

/// Reads an image file and encodes it as a data URL.
///
/// The bytes must decode as an image; anything else is rejected so the document
/// never holds a photo the exporter cannot place.
pub fn encode_photo_file(path: &Path) -> Result<String, AppError> {
    let bytes = std::fs::read(path)?;
    let format = image::guess_format(&bytes).map_err(|e| AppError::Image(e.to_string()))?;
    image::load_from_memory_with_format(&bytes, format)
        .map_err(|e| AppError::Image(e.to_string()))?;

    let mime = match format {
        image::ImageFormat::Png => "image/png",
        image::ImageFormat::Jpeg => "image/jpeg",
        _ => "application/octet-stream",
    };
    info!(path = %path.display(), bytes = bytes.len(), mime, "Photo encoded");
    Ok(format!("data:{mime};base64,{}", BASE64.encode(&bytes)))
}

/// Like [`encode_photo_file`], but failures are logged and yield `None`, leaving
/// the photo field as it was.
pub fn try_encode_photo_file(path: &Path) -> Option<String> {
    match encode_photo_file(path) {
        Ok(url) => Some(url),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Photo could not be read; field left unchanged");
            None
        }
    }
}

/// Decodes a data URL (or a bare base64 payload) into RGB pixels.
pub fn decode_photo(data_url: &str) -> Result<RasterImage, AppError> {
    let payload = match data_url.split_once(',') {
        Some((header, payload)) if header.starts_with("data:") => {
            if !header.ends_with(";base64") {
                return Err(AppError::Image(format!(
                    "unsupported data URL encoding: {header}"
                )));
            }
            payload
        }
        _ => data_url,
    };
    let bytes = BASE64
        .decode(payload.trim())
        .map_err(|e| AppError::Image(format!("invalid base64 payload: {e}")))?;
    let decoded = image::load_from_memory(&bytes).map_err(|e| AppError::Image(e.to_string()))?;
    let rgb = decoded.to_rgb8();
    Ok(RasterImage {
        width: rgb.width(),
        height: rgb.height(),
        rgb: rgb.into_raw(),
    })
}
