use base64::{engine::general_purpose, Engine as _};
use image::{imageops::FilterType, DynamicImage, GenericImageView, ImageOutputFormat};
use thiserror::Error;

/// Longest side sent to a provider.
pub const MAX_DIMENSION: u32 = 1024;
const JPEG_QUALITY: u8 = 85;

#[derive(Debug, Error)]
pub enum SelfieError {
    #[error("image is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("data URL has no payload")]
    MalformedDataUrl,
    #[error("image could not be decoded: {0}")]
    Decode(#[from] image::ImageError),
}

/// An uploaded photo in transportable form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selfie {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl Selfie {
    /// Accepts `data:<mime>;base64,<payload>` or bare base64 (assumed JPEG).
    pub fn from_base64(input: &str) -> Result<Self, SelfieError> {
        let input = input.trim();

        let (mime_type, payload) = match input.strip_prefix("data:") {
            Some(rest) => {
                let (header, payload) = rest.split_once(',').ok_or(SelfieError::MalformedDataUrl)?;
                let mime = header.split(';').next().unwrap_or_default().trim();
                let mime = if mime.is_empty() { "image/jpeg" } else { mime };
                (mime.to_string(), payload)
            }
            None => ("image/jpeg".to_string(), input),
        };

        let bytes = general_purpose::STANDARD.decode(payload.trim())?;
        Ok(Self { mime_type, bytes })
    }

    /// Re-encodes as JPEG, shrinking so neither side exceeds [`MAX_DIMENSION`].
    pub fn normalized(&self) -> Result<Self, SelfieError> {
        let img = image::load_from_memory(&self.bytes)?;

        let (width, height) = img.dimensions();
        let img = if width > MAX_DIMENSION || height > MAX_DIMENSION {
            img.resize(MAX_DIMENSION, MAX_DIMENSION, FilterType::Lanczos3)
        } else {
            img
        };

        // JPEG has no alpha channel.
        let rgb = DynamicImage::ImageRgb8(img.to_rgb8());

        let mut jpeg_bytes = Vec::new();
        rgb.write_to(
            &mut std::io::Cursor::new(&mut jpeg_bytes),
            ImageOutputFormat::Jpeg(JPEG_QUALITY),
        )?;

        Ok(Self {
            mime_type: "image/jpeg".to_string(),
            bytes: jpeg_bytes,
        })
    }

    pub fn to_base64(&self) -> String {
        general_purpose::STANDARD.encode(&self.bytes)
    }

    pub fn to_data_url(&self) -> String {
        data_url(&self.mime_type, &self.bytes)
    }
}

pub fn data_url(mime_type: &str, bytes: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        mime_type,
        general_purpose::STANDARD.encode(bytes)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([200, 120, 40, 128]));
        let mut out = Vec::new();
        DynamicImage::ImageRgba8(img)
            .write_to(&mut std::io::Cursor::new(&mut out), ImageOutputFormat::Png)
            .unwrap();
        out
    }

    #[test]
    fn parses_data_url_mime_type() {
        let selfie = Selfie::from_base64("data:image/png;base64,aGVsbG8=").unwrap();
        assert_eq!(selfie.mime_type, "image/png");
        assert_eq!(selfie.bytes, b"hello");
    }

    #[test]
    fn bare_base64_defaults_to_jpeg() {
        let selfie = Selfie::from_base64("aGVsbG8=").unwrap();
        assert_eq!(selfie.mime_type, "image/jpeg");
        assert_eq!(selfie.bytes, b"hello");
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            Selfie::from_base64("data:image/png;base64"),
            Err(SelfieError::MalformedDataUrl)
        ));
        assert!(matches!(
            Selfie::from_base64("not base64 at all!"),
            Err(SelfieError::Base64(_))
        ));
    }

    #[test]
    fn normalizing_shrinks_large_images_and_keeps_aspect() {
        let selfie = Selfie {
            mime_type: "image/png".into(),
            bytes: png_bytes(2048, 1024),
        };
        let normalized = selfie.normalized().unwrap();
        assert_eq!(normalized.mime_type, "image/jpeg");

        let decoded = image::load_from_memory(&normalized.bytes).unwrap();
        assert_eq!(decoded.dimensions(), (1024, 512));
    }

    #[test]
    fn normalizing_never_upscales() {
        let selfie = Selfie {
            mime_type: "image/png".into(),
            bytes: png_bytes(64, 48),
        };
        let decoded = image::load_from_memory(&selfie.normalized().unwrap().bytes).unwrap();
        assert_eq!(decoded.dimensions(), (64, 48));
    }

    #[test]
    fn normalizing_undecodable_bytes_fails() {
        let selfie = Selfie::from_base64("aGVsbG8=").unwrap();
        assert!(matches!(selfie.normalized(), Err(SelfieError::Decode(_))));
    }

    #[test]
    fn data_url_round_trips_through_parser() {
        let selfie = Selfie {
            mime_type: "image/webp".into(),
            bytes: vec![1, 2, 3],
        };
        assert_eq!(Selfie::from_base64(&selfie.to_data_url()).unwrap(), selfie);
    }
}
