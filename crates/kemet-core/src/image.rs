//! Image payload decoding and MIME detection.
//!
//! The pipeline never decodes pixels. The only gate between a base64 payload
//! and the provider is a magic-byte sniff, which doubles as the source of the
//! MIME type sent alongside the inline image data.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::debug;

use crate::{Error, Result};

/// A decoded image payload with its sniffed MIME type.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub bytes: Vec<u8>,
    pub mime_type: &'static str,
}

/// Decode a base64 image payload and sniff its MIME type.
///
/// Rejects payloads that are not valid base64 and payloads whose decoded
/// bytes match no known image signature.
pub fn decode_base64_image(data: &str) -> Result<DecodedImage> {
    let bytes = STANDARD
        .decode(data)
        .map_err(|e| Error::InvalidInput(format!("Invalid base64 image data: {}", e)))?;

    let mime_type = detect_image_mime(&bytes).ok_or_else(|| {
        Error::InvalidInput("Decoded data is not a recognizable image format".to_string())
    })?;

    debug!(mime_type, byte_len = bytes.len(), "Decoded image payload");
    Ok(DecodedImage { bytes, mime_type })
}

/// Sniff an image MIME type from magic bytes.
///
/// Returns `None` for unrecognized bytes and for recognized non-image
/// formats (PDFs, archives).
pub fn detect_image_mime(data: &[u8]) -> Option<&'static str> {
    let kind = infer::get(data)?;
    if kind.matcher_type() == infer::MatcherType::Image {
        Some(kind.mime_type())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: &[u8] = b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR";
    const JPEG_HEADER: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46, 0x49, 0x46];

    #[test]
    fn test_detect_png() {
        assert_eq!(detect_image_mime(PNG_HEADER), Some("image/png"));
    }

    #[test]
    fn test_detect_jpeg() {
        assert_eq!(detect_image_mime(JPEG_HEADER), Some("image/jpeg"));
    }

    #[test]
    fn test_detect_rejects_text() {
        assert_eq!(detect_image_mime(b"hello, this is not an image"), None);
    }

    #[test]
    fn test_detect_rejects_non_image_format() {
        // Recognized format, wrong matcher category
        assert_eq!(detect_image_mime(b"%PDF-1.4 fake document body"), None);
    }

    #[test]
    fn test_detect_rejects_empty() {
        assert_eq!(detect_image_mime(&[]), None);
    }

    #[test]
    fn test_decode_valid_png_payload() {
        let encoded = STANDARD.encode(PNG_HEADER);
        let decoded = decode_base64_image(&encoded).unwrap();
        assert_eq!(decoded.mime_type, "image/png");
        assert_eq!(decoded.bytes, PNG_HEADER);
    }

    #[test]
    fn test_decode_invalid_base64() {
        let err = decode_base64_image("!!!not-base64!!!").unwrap_err();
        assert!(err.to_string().contains("Invalid base64 image data"));
    }

    #[test]
    fn test_decode_non_image_bytes() {
        let encoded = STANDARD.encode(b"just some plain text");
        let err = decode_base64_image(&encoded).unwrap_err();
        assert!(err.to_string().contains("not a recognizable image"));
    }
}
