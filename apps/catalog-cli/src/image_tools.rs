//! Local image inspection and encoding

use base64::{Engine, engine::general_purpose::STANDARD};
use domain_products::images::{ImageInfo, image_info};
use domain_products::ImagePolicy;
use std::path::Path;

#[derive(Debug, Clone, Copy, Default)]
pub struct EncodeOptions {
    pub compress: bool,
    pub thumbnail: bool,
}

/// Base64 of `bytes`, optionally run through the policy. Thumbnail wins over
/// plain compression.
pub fn encode(bytes: &[u8], policy: &ImagePolicy, options: EncodeOptions) -> String {
    let payload = STANDARD.encode(bytes);
    if options.thumbnail {
        policy.thumbnail(&payload)
    } else if options.compress {
        policy.compress(&payload)
    } else {
        payload
    }
}

pub fn encode_file(path: &Path, policy: &ImagePolicy, options: EncodeOptions) -> eyre::Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(encode(&bytes, policy, options))
}

pub fn inspect_file(path: &Path) -> eyre::Result<ImageInfo> {
    let bytes = std::fs::read(path)?;
    Ok(image_info(&bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, RgbImage};
    use std::io::Cursor;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, image::Rgb([200, 40, 40]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_plain_encode_is_lossless() {
        let bytes = png(4, 4);
        let encoded = encode(&bytes, &ImagePolicy::default(), EncodeOptions::default());
        assert_eq!(STANDARD.decode(encoded).unwrap(), bytes);
    }

    #[test]
    fn test_thumbnail_fits_bound() {
        let policy = ImagePolicy::default();
        let bound = policy.config().thumbnail_size;
        let encoded = encode(
            &png(bound * 2, bound),
            &policy,
            EncodeOptions {
                compress: false,
                thumbnail: true,
            },
        );

        let info = image_info(&STANDARD.decode(encoded).unwrap()).unwrap();
        assert!(info.width <= bound && info.height <= bound);
        assert_eq!(info.format, "jpg");
    }

    #[test]
    fn test_inspect_rejects_non_images() {
        assert!(image_info(b"plain text").is_err());
    }
}
