//! Image policy for product uploads.
//!
//! Payloads arrive as base64 text. Before a write they are size-checked,
//! fully decoded and recompressed. Compression is best effort: any failure
//! after a successful decode keeps the original.

use crate::error::{ProductError, ProductResult};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use core_config::{env_parse, ConfigError, FromEnv};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, RgbImage};
use serde::Serialize;
use tracing::{debug, instrument, warn};

const MEGABYTE: usize = 1024 * 1024;

#[derive(Debug, Clone, PartialEq)]
pub struct ImagePolicyConfig {
    pub max_size_mb: usize,
    pub quality: u8,
    pub max_dimension: u32,
    pub thumbnail_size: u32,
    pub thumbnail_quality: u8,
}

impl Default for ImagePolicyConfig {
    fn default() -> Self {
        Self {
            max_size_mb: 10,
            quality: 85,
            max_dimension: 1200,
            thumbnail_size: 300,
            thumbnail_quality: 80,
        }
    }
}

impl FromEnv for ImagePolicyConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Self {
            max_size_mb: env_parse("IMAGE_MAX_SIZE_MB", defaults.max_size_mb)?,
            quality: env_parse("IMAGE_QUALITY", defaults.quality)?,
            max_dimension: env_parse("IMAGE_MAX_DIMENSION", defaults.max_dimension)?,
            thumbnail_size: env_parse("THUMBNAIL_SIZE", defaults.thumbnail_size)?,
            thumbnail_quality: env_parse("THUMBNAIL_QUALITY", defaults.thumbnail_quality)?,
        };

        for (key, quality) in [
            ("IMAGE_QUALITY", config.quality),
            ("THUMBNAIL_QUALITY", config.thumbnail_quality),
        ] {
            if !(1..=100).contains(&quality) {
                return Err(ConfigError::ParseError {
                    key: key.to_string(),
                    details: format!("quality must be within 1..=100, got {}", quality),
                });
            }
        }
        Ok(config)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetFormat {
    Jpeg,
    Png,
}

impl TargetFormat {
    fn supports_alpha(&self) -> bool {
        matches!(self, TargetFormat::Png)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    pub format: String,
    pub color: String,
    pub size_bytes: usize,
}

/// Drops an optional `data:<mime>;base64,` prefix and embedded whitespace.
pub fn strip_payload(payload: &str) -> String {
    let body = match payload.split_once(";base64,") {
        Some((prefix, rest)) if prefix.starts_with("data:") => rest,
        _ => payload,
    };
    body.chars().filter(|c| !c.is_whitespace()).collect()
}

fn decode(payload: &str) -> Result<Vec<u8>, base64::DecodeError> {
    STANDARD.decode(strip_payload(payload))
}

/// Whether the decoded payload is at most `max_megabytes` MiB.
/// Payloads that are not valid base64 never pass.
pub fn validate_size(payload: &str, max_megabytes: usize) -> bool {
    decode(payload)
        .map(|bytes| bytes.len() <= max_megabytes * MEGABYTE)
        .unwrap_or(false)
}

/// Composites transparent pixels onto white.
fn flatten_onto_white(img: &DynamicImage) -> DynamicImage {
    let rgba = img.to_rgba8();
    let mut out = RgbImage::new(rgba.width(), rgba.height());
    for (x, y, pixel) in rgba.enumerate_pixels() {
        let [r, g, b, a] = pixel.0;
        let alpha = a as u32;
        let blend = |channel: u8| ((channel as u32 * alpha + 255 * (255 - alpha)) / 255) as u8;
        out.put_pixel(x, y, image::Rgb([blend(r), blend(g), blend(b)]));
    }
    DynamicImage::ImageRgb8(out)
}

fn recompress(
    payload: &str,
    quality: u8,
    max_dimensions: (u32, u32),
    format: TargetFormat,
) -> Result<String, String> {
    let bytes = decode(payload).map_err(|e| e.to_string())?;
    let img = image::load_from_memory(&bytes).map_err(|e| e.to_string())?;
    reencode(img, quality, max_dimensions, format)
}

fn reencode(
    mut img: DynamicImage,
    quality: u8,
    max_dimensions: (u32, u32),
    format: TargetFormat,
) -> Result<String, String> {
    if img.color().has_alpha() && !format.supports_alpha() {
        img = flatten_onto_white(&img);
    }

    let (max_width, max_height) = max_dimensions;
    if img.width() > max_width || img.height() > max_height {
        img = img.resize(max_width, max_height, FilterType::Lanczos3);
    }

    let mut out = Vec::new();
    match format {
        TargetFormat::Jpeg => {
            let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
            let encoder = JpegEncoder::new_with_quality(&mut out, quality.clamp(1, 100));
            rgb.write_with_encoder(encoder).map_err(|e| e.to_string())?;
        }
        TargetFormat::Png => {
            let encoder = PngEncoder::new(&mut out);
            img.write_with_encoder(encoder).map_err(|e| e.to_string())?;
        }
    }

    Ok(STANDARD.encode(out))
}

/// Re-encodes `payload`, downsizing it to fit `max_dimensions`.
/// Returns the payload unchanged if anything fails.
pub fn compress(payload: &str, quality: u8, max_dimensions: (u32, u32), format: TargetFormat) -> String {
    match recompress(payload, quality, max_dimensions, format) {
        Ok(compressed) => compressed,
        Err(reason) => {
            warn!(%reason, "Image compression failed, keeping original payload");
            payload.to_string()
        }
    }
}

/// Dimensions, format and colour type of raw image bytes.
pub fn image_info(bytes: &[u8]) -> ProductResult<ImageInfo> {
    let format = image::guess_format(bytes)
        .map_err(|e| ProductError::ImageDecodeFailed(e.to_string()))?;
    let img = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| ProductError::ImageDecodeFailed(e.to_string()))?;

    Ok(ImageInfo {
        width: img.width(),
        height: img.height(),
        format: format
            .extensions_str()
            .first()
            .copied()
            .unwrap_or("unknown")
            .to_string(),
        color: format!("{:?}", img.color()),
        size_bytes: bytes.len(),
    })
}

/// Size bound and compression settings applied to every stored image.
#[derive(Debug, Clone, Default)]
pub struct ImagePolicy {
    config: ImagePolicyConfig,
}

impl ImagePolicy {
    pub fn new(config: ImagePolicyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ImagePolicyConfig {
        &self.config
    }

    pub fn max_bytes(&self) -> usize {
        self.config.max_size_mb * MEGABYTE
    }

    pub fn compress(&self, payload: &str) -> String {
        let bound = self.config.max_dimension;
        compress(payload, self.config.quality, (bound, bound), TargetFormat::Jpeg)
    }

    pub fn thumbnail(&self, payload: &str) -> String {
        let bound = self.config.thumbnail_size;
        compress(
            payload,
            self.config.thumbnail_quality,
            (bound, bound),
            TargetFormat::Jpeg,
        )
    }

    /// Accepts one upload: rejects undecodable or oversized payloads, then
    /// compresses.
    pub fn ingest(&self, payload: &str) -> ProductResult<String> {
        let bytes = decode(payload).map_err(|e| ProductError::ImageDecodeFailed(e.to_string()))?;

        if bytes.len() > self.max_bytes() {
            return Err(ProductError::ImageTooLarge {
                size_bytes: bytes.len(),
                max_bytes: self.max_bytes(),
            });
        }

        let img = image::load_from_memory(&bytes)
            .map_err(|e| ProductError::ImageDecodeFailed(e.to_string()))?;

        let bound = self.config.max_dimension;
        let compressed = match reencode(img, self.config.quality, (bound, bound), TargetFormat::Jpeg) {
            Ok(compressed) => compressed,
            Err(reason) => {
                warn!(%reason, "Image compression failed, keeping original payload");
                strip_payload(payload)
            }
        };
        debug!(
            original_bytes = bytes.len(),
            encoded_len = compressed.len(),
            "Image accepted"
        );
        Ok(compressed)
    }

    /// Ingests every payload on the blocking pool. Any rejection fails the
    /// whole batch.
    #[instrument(skip(self, payloads), fields(count = payloads.len()))]
    pub async fn ingest_all(&self, payloads: Vec<String>) -> ProductResult<Vec<String>> {
        if payloads.is_empty() {
            return Ok(payloads);
        }

        let policy = self.clone();
        tokio::task::spawn_blocking(move || {
            payloads
                .iter()
                .map(|payload| policy.ingest(payload))
                .collect::<ProductResult<Vec<_>>>()
        })
        .await
        .map_err(|e| ProductError::Internal(format!("image worker failed: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn png_payload(width: u32, height: u32, alpha: u8) -> String {
        let img = RgbaImage::from_pixel(width, height, Rgba([200, 30, 30, alpha]));
        let mut bytes = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(img)
            .write_to(&mut bytes, ImageFormat::Png)
            .unwrap();
        STANDARD.encode(bytes.into_inner())
    }

    fn decoded(payload: &str) -> DynamicImage {
        image::load_from_memory(&STANDARD.decode(payload).unwrap()).unwrap()
    }

    #[test]
    fn test_validate_size_boundary() {
        let exact = STANDARD.encode(vec![0u8; 10 * MEGABYTE]);
        let over = STANDARD.encode(vec![0u8; 10 * MEGABYTE + 1]);
        assert!(validate_size(&exact, 10));
        assert!(!validate_size(&over, 10));
    }

    #[test]
    fn test_validate_size_rejects_garbage() {
        assert!(!validate_size("not base64 at all!", 10));
    }

    #[test]
    fn test_strip_payload_handles_data_url() {
        assert_eq!(strip_payload("data:image/png;base64,QUJD"), "QUJD");
        assert_eq!(strip_payload("QU\nJD "), "QUJD");
    }

    #[test]
    fn test_compress_keeps_dimensions_of_small_image() {
        let payload = png_payload(64, 32, 255);
        let out = compress(&payload, 85, (1200, 1200), TargetFormat::Jpeg);
        let img = decoded(&out);
        assert_eq!((img.width(), img.height()), (64, 32));
        assert_eq!(image::guess_format(&STANDARD.decode(&out).unwrap()).unwrap(), ImageFormat::Jpeg);
    }

    #[test]
    fn test_compress_downsizes_preserving_aspect_ratio() {
        let payload = png_payload(400, 200, 255);
        let img = decoded(&compress(&payload, 85, (100, 100), TargetFormat::Jpeg));
        assert_eq!((img.width(), img.height()), (100, 50));
    }

    #[test]
    fn test_transparent_pixels_flattened_to_white() {
        let payload = png_payload(8, 8, 0);
        let img = decoded(&compress(&payload, 100, (1200, 1200), TargetFormat::Jpeg)).to_rgb8();
        let pixel = img.get_pixel(4, 4);
        assert!(pixel.0.iter().all(|&c| c > 240), "expected white, got {:?}", pixel);
    }

    #[test]
    fn test_png_target_keeps_alpha() {
        let payload = png_payload(8, 8, 0);
        let img = decoded(&compress(&payload, 85, (1200, 1200), TargetFormat::Png));
        assert!(img.color().has_alpha());
    }

    #[test]
    fn test_compress_failure_returns_original() {
        let payload = STANDARD.encode(b"definitely not an image");
        assert_eq!(compress(&payload, 85, (10, 10), TargetFormat::Jpeg), payload);
    }

    #[test]
    fn test_thumbnail_uses_thumbnail_bounds() {
        let policy = ImagePolicy::default();
        let img = decoded(&policy.thumbnail(&png_payload(600, 300, 255)));
        assert_eq!((img.width(), img.height()), (300, 150));
    }

    #[test]
    fn test_ingest_rejects_oversized_payload() {
        let policy = ImagePolicy::new(ImagePolicyConfig {
            max_size_mb: 1,
            ..Default::default()
        });
        let payload = STANDARD.encode(vec![0u8; MEGABYTE + 1]);
        match policy.ingest(&payload) {
            Err(ProductError::ImageTooLarge {
                size_bytes,
                max_bytes,
            }) => {
                assert_eq!(size_bytes, MEGABYTE + 1);
                assert_eq!(max_bytes, MEGABYTE);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_ingest_rejects_undecodable_payloads() {
        let policy = ImagePolicy::default();
        assert!(matches!(
            policy.ingest("%%%"),
            Err(ProductError::ImageDecodeFailed(_))
        ));
        assert!(matches!(
            policy.ingest(&STANDARD.encode(b"plain text")),
            Err(ProductError::ImageDecodeFailed(_))
        ));
    }

    #[test]
    fn test_ingest_rejects_truncated_image() {
        let bytes = STANDARD.decode(png_payload(64, 64, 255)).unwrap();
        let truncated = STANDARD.encode(&bytes[..20]);
        assert_eq!(image::guess_format(&bytes[..20]).unwrap(), ImageFormat::Png);
        match ImagePolicy::default().ingest(&truncated) {
            Err(ProductError::ImageDecodeFailed(_)) => {}
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_ingest_accepts_data_url() {
        let policy = ImagePolicy::default();
        let payload = format!("data:image/png;base64,{}", png_payload(16, 16, 255));
        let stored = policy.ingest(&payload).unwrap();
        assert!(!stored.starts_with("data:"));
        assert_eq!(decoded(&stored).width(), 16);
    }

    #[tokio::test]
    async fn test_ingest_all_fails_whole_batch() {
        let policy = ImagePolicy::default();
        let result = policy
            .ingest_all(vec![png_payload(4, 4, 255), "%%%".to_string()])
            .await;
        assert!(result.is_err());

        let ok = policy.ingest_all(vec![png_payload(4, 4, 255)]).await.unwrap();
        assert_eq!(ok.len(), 1);
    }

    #[test]
    fn test_image_info() {
        let bytes = STANDARD.decode(png_payload(10, 20, 255)).unwrap();
        let info = image_info(&bytes).unwrap();
        assert_eq!((info.width, info.height), (10, 20));
        assert_eq!(info.format, "png");
        assert_eq!(info.color, "Rgba8");
        assert_eq!(info.size_bytes, bytes.len());
    }

    #[test]
    fn test_policy_config_from_env() {
        temp_env::with_vars(
            [("IMAGE_MAX_SIZE_MB", Some("5")), ("IMAGE_QUALITY", Some("70"))],
            || {
                let config = ImagePolicyConfig::from_env().unwrap();
                assert_eq!(config.max_size_mb, 5);
                assert_eq!(config.quality, 70);
                assert_eq!(config.thumbnail_size, 300);
            },
        );

        temp_env::with_var("THUMBNAIL_QUALITY", Some("0"), || {
            assert!(ImagePolicyConfig::from_env().is_err());
        });
    }
}
