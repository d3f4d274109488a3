use std::io::Cursor;

use base64::Engine as _;
use image::ImageEncoder as _;

use crate::foundation::error::{QrFrameError, QrFrameResult};

/// Encode a straight-alpha RGBA image as PNG.
pub fn encode_png(img: &image::RgbaImage) -> QrFrameResult<Vec<u8>> {
    let mut out = Vec::new();
    image::codecs::png::PngEncoder::new(Cursor::new(&mut out))
        .write_image(
            img.as_raw(),
            img.width(),
            img.height(),
            image::ExtendedColorType::Rgba8,
        )
        .map_err(|e| QrFrameError::serialization(format!("encode png: {e}")))?;
    Ok(out)
}

/// Build a `data:` URL for the given bytes.
pub fn data_url(mime: &str, bytes: &[u8]) -> String {
    let b64 = base64::engine::general_purpose::STANDARD.encode(bytes);
    format!("data:{mime};base64,{b64}")
}

/// Decode the payload of a base64 `data:` URL, returning `(mime, bytes)`.
pub fn decode_data_url(url: &str) -> QrFrameResult<(String, Vec<u8>)> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| QrFrameError::serialization("not a data url"))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| QrFrameError::serialization("data url has no payload separator"))?;
    let mime = meta
        .strip_suffix(";base64")
        .ok_or_else(|| QrFrameError::serialization("data url is not base64 encoded"))?;
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| QrFrameError::serialization(format!("decode data url: {e}")))?;
    Ok((mime.to_string(), bytes))
}
