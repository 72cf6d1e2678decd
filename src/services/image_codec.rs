// src/services/image_codec.rs
use base64::{Engine as _, engine::general_purpose};
use image::ImageFormat;

/// Base64 payload suitable for embedding in a JSON request body.
pub fn encode(data: &[u8]) -> String {
    general_purpose::STANDARD.encode(data)
}

/// Displayable `data:` URI for the upload preview.
pub fn preview_uri(mime: &str, data: &[u8]) -> String {
    format!("data:{};base64,{}", mime, encode(data))
}

/// Resolve the MIME type to declare to the model. Browsers occasionally
/// send no content type (or a bare octet-stream); sniff the bytes then.
pub fn resolve_mime(declared: Option<&str>, data: &[u8]) -> String {
    match declared {
        Some(ct) if ct.starts_with("image/") => ct.to_string(),
        _ => image::guess_format(data)
            .ok()
            .and_then(|format| match format {
                ImageFormat::Png => Some("image/png"),
                ImageFormat::Jpeg => Some("image/jpeg"),
                ImageFormat::WebP => Some("image/webp"),
                ImageFormat::Gif => Some("image/gif"),
                _ => None,
            })
            .unwrap_or("image/jpeg")
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Minimal valid PNG signature followed by junk; enough for format sniffing.
    const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0];

    fn decode(payload: &str) -> Vec<u8> {
        general_purpose::STANDARD.decode(payload).unwrap()
    }

    #[test]
    fn encode_decode_round_trip() {
        let original: Vec<u8> = (0..=255).collect();
        let encoded = encode(&original);
        assert_eq!(decode(&encoded), original);
    }

    #[test]
    fn preview_uri_embeds_mime_and_payload() {
        let uri = preview_uri("image/png", &[1, 2, 3]);
        assert!(uri.starts_with("data:image/png;base64,"));
        let payload = uri.rsplit(',').next().unwrap();
        assert_eq!(decode(payload), vec![1, 2, 3]);
    }

    #[test]
    fn declared_image_mime_wins() {
        assert_eq!(resolve_mime(Some("image/webp"), PNG_MAGIC), "image/webp");
    }

    #[test]
    fn missing_or_generic_mime_is_sniffed() {
        assert_eq!(resolve_mime(None, PNG_MAGIC), "image/png");
        assert_eq!(
            resolve_mime(Some("application/octet-stream"), PNG_MAGIC),
            "image/png"
        );
    }

    #[test]
    fn unknown_bytes_default_to_jpeg() {
        assert_eq!(resolve_mime(None, &[0, 1, 2, 3]), "image/jpeg");
    }
}
