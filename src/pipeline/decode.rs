//! Image decoding: data-URI / base64 string → `DynamicImage`.
//!
//! Browsers hand over screenshots as data URIs
//! (`data:image/jpeg;base64,/9j/4AAQ…`). The media type in the prefix is not
//! trusted for anything: the prefix is stripped and the `image` crate sniffs
//! the real container format from the decoded bytes.

use crate::error::AnswerError;
use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine as _;
use image::DynamicImage;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

static RE_DATA_URI_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^data:image/[^;]+;base64,").unwrap());

/// Standard alphabet, padding optional.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Remove a leading `data:image/<subtype>;base64,` prefix, if any.
///
/// Input without a prefix is returned unchanged, so applying this twice is
/// the same as applying it once.
pub fn strip_data_uri(input: &str) -> &str {
    match RE_DATA_URI_PREFIX.find(input) {
        Some(m) => &input[m.end()..],
        None => input,
    }
}

/// Base64-decode an image payload, stripping any data-URI prefix first.
///
/// ASCII whitespace is ignored (data URIs pasted from logs or emails are
/// often line-wrapped) and trailing `=` padding is optional.
pub fn decode_base64(input: &str) -> Result<Vec<u8>, AnswerError> {
    let payload = strip_data_uri(input);
    let compact: String = payload
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    Ok(LENIENT.decode(compact.as_bytes())?)
}

/// Decode a data-URI or plain base64 string into a raster image.
///
/// # Errors
/// - [`AnswerError::EmptyImage`] for an empty string
/// - [`AnswerError::InvalidBase64`] when the payload is not base64
/// - [`AnswerError::ImageDecode`] when the bytes are not a supported image
pub fn decode_image(input: &str) -> Result<DynamicImage, AnswerError> {
    if input.trim().is_empty() {
        return Err(AnswerError::EmptyImage);
    }

    let bytes = decode_base64(input)?;
    debug!("Decoded {} bytes of image data", bytes.len());

    let img = image::load_from_memory(&bytes)?;
    debug!("Image is {}x{}", img.width(), img.height());
    Ok(img)
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::STANDARD;
    use image::{ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    fn encoded(format: ImageFormat) -> String {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(12, 8, Rgb([200, 10, 10])));
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), format)
            .expect("encode test image");
        STANDARD.encode(&buf)
    }

    #[test]
    fn strip_png_prefix() {
        assert_eq!(strip_data_uri("data:image/png;base64,AAAA"), "AAAA");
    }

    #[test]
    fn strip_is_idempotent_without_prefix() {
        let once = strip_data_uri("iVBORw0KGgo=");
        assert_eq!(once, "iVBORw0KGgo=");
        assert_eq!(strip_data_uri(once), once);
    }

    #[test]
    fn strip_is_case_sensitive() {
        let input = "DATA:image/png;base64,AAAA";
        assert_eq!(strip_data_uri(input), input);
    }

    #[test]
    fn strip_requires_image_media_type() {
        let input = "data:text/plain;base64,AAAA";
        assert_eq!(strip_data_uri(input), input);
    }

    #[test]
    fn decode_png_with_prefix() {
        let uri = format!("data:image/png;base64,{}", encoded(ImageFormat::Png));
        let img = decode_image(&uri).expect("png should decode");
        assert_eq!((img.width(), img.height()), (12, 8));
    }

    #[test]
    fn decode_jpeg_with_prefix() {
        let uri = format!("data:image/jpeg;base64,{}", encoded(ImageFormat::Jpeg));
        let img = decode_image(&uri).expect("jpeg should decode");
        assert_eq!((img.width(), img.height()), (12, 8));
    }

    #[test]
    fn decode_plain_base64() {
        let img = decode_image(&encoded(ImageFormat::Png)).expect("plain base64 should decode");
        assert_eq!(img.width(), 12);
    }

    #[test]
    fn decode_ignores_line_wrapping() {
        let b64 = encoded(ImageFormat::Png);
        let wrapped: String = b64
            .as_bytes()
            .chunks(20)
            .map(|c| std::str::from_utf8(c).unwrap())
            .collect::<Vec<_>>()
            .join("\n");
        assert!(decode_image(&wrapped).is_ok());
    }

    #[test]
    fn decode_accepts_missing_padding() {
        assert_eq!(decode_base64("YWJjZA").unwrap(), b"abcd");
        assert_eq!(decode_base64("YWJjZA==").unwrap(), b"abcd");
    }

    #[test]
    fn invalid_base64_is_reported() {
        let err = decode_image("data:image/png;base64,not*base64!").unwrap_err();
        assert!(matches!(err, AnswerError::InvalidBase64(_)), "got: {err:?}");
    }

    #[test]
    fn non_image_bytes_are_reported() {
        let payload = STANDARD.encode(b"definitely not an image");
        let err = decode_image(&payload).unwrap_err();
        assert!(matches!(err, AnswerError::ImageDecode(_)), "got: {err:?}");
    }

    #[test]
    fn empty_payload_is_rejected() {
        assert!(matches!(decode_image(""), Err(AnswerError::EmptyImage)));
    }
}
