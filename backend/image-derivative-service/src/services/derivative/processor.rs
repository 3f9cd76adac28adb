//! Image transformer - decodes, resizes and re-encodes derivative images
//!
//! Resizing is scale-to-fit inside a `max_dimension` square: one uniform
//! factor from the more constraining edge, truncated to whole pixels.
//! Sources smaller than the box are enlarged.

use crate::error::{AppError, Result};
use crate::models::ImageType;
use bytes::Bytes;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, RgbImage};
use std::io::Cursor;
use tracing::debug;

/// Stateless codec and resampler shared by all derivatives of an invocation
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageTransformer;

impl ImageTransformer {
    pub fn new() -> Self {
        Self
    }

    /// Decode source bytes with the codec implied by the key's extension
    pub fn decode(&self, data: &[u8], image_type: ImageType) -> Result<DynamicImage> {
        let img = image::load_from_memory_with_format(data, image_type.format())
            .map_err(|e| AppError::Decode(format!("{} source: {e}", image_type)))?;

        let (width, height) = img.dimensions();
        if width == 0 || height == 0 {
            return Err(AppError::Decode(format!(
                "{} source has zero dimension ({}x{})",
                image_type, width, height
            )));
        }

        debug!(width, height, size = data.len(), "Decoded source image");
        Ok(img)
    }

    /// Resize to fit a `max_dimension` square, dropping any alpha channel
    pub fn resize(&self, img: &DynamicImage, max_dimension: f32) -> Result<RgbImage> {
        let (orig_w, orig_h) = img.dimensions();
        let (new_w, new_h) = scaled_dimensions(orig_w, orig_h, max_dimension);

        if new_w == 0 || new_h == 0 {
            return Err(AppError::Transform(format!(
                "{}x{} source scaled to {} yields an empty {}x{} image",
                orig_w, orig_h, max_dimension, new_w, new_h
            )));
        }

        let rgb = img.to_rgb8();
        let resized = image::imageops::resize(&rgb, new_w, new_h, FilterType::Triangle);

        debug!(
            original_width = orig_w,
            original_height = orig_h,
            width = new_w,
            height = new_h,
            "Resized image"
        );
        Ok(resized)
    }

    /// Encode in the source format with the codec's default settings
    pub fn encode(&self, img: &RgbImage, image_type: ImageType) -> Result<Bytes> {
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), image_type.format())
            .map_err(|e| AppError::Encode(format!("{}: {e}", image_type)))?;

        Ok(Bytes::from(buf))
    }
}

/// Scale-to-fit dimensions for a `max_dimension` bounding square
///
/// `scale = min(M / W, M / H)`; each edge is `floor(scale * edge)`. The
/// constraining edge is exactly `floor(M)`, and the other edge is computed as
/// `M * edge / constraining` in f64 so integral results are not truncated to
/// one pixel short.
pub fn scaled_dimensions(width: u32, height: u32, max_dimension: f32) -> (u32, u32) {
    let max = f64::from(max_dimension);
    let (w, h) = (f64::from(width), f64::from(height));

    if width >= height {
        (max.floor() as u32, (max * h / w).floor() as u32)
    } else {
        ((max * w / h).floor() as u32, max.floor() as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, Rgba, RgbaImage};

    fn gradient(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x * 255 / width.max(1)) as u8, (y * 255 / height.max(1)) as u8, 128])
        })
    }

    #[test]
    fn test_scaled_dimensions_landscape() {
        assert_eq!(scaled_dimensions(800, 600, 100.0), (100, 75));
        assert_eq!(scaled_dimensions(800, 600, 2000.0), (2000, 1500));
    }

    #[test]
    fn test_scaled_dimensions_portrait() {
        assert_eq!(scaled_dimensions(600, 800, 100.0), (75, 100));
    }

    #[test]
    fn test_scaled_dimensions_square_upscales() {
        assert_eq!(scaled_dimensions(50, 50, 100.0), (100, 100));
        assert_eq!(scaled_dimensions(1000, 1000, 100.0), (100, 100));
    }

    #[test]
    fn test_scaled_dimensions_truncates() {
        // 100 / 300 = 0.333.., 0.333.. * 200 = 66.66.. -> 66
        assert_eq!(scaled_dimensions(300, 200, 100.0), (100, 66));
        // 100 / 1000 * 999 = 99.9 -> 99
        assert_eq!(scaled_dimensions(999, 1000, 100.0), (99, 100));
    }

    #[test]
    fn test_scaled_dimensions_known_sizes() {
        let cases = [
            ((1920, 1080, 100.0), (100, 56)),
            ((1920, 1080, 2000.0), (2000, 1125)),
            ((1080, 1920, 2000.0), (1125, 2000)),
            ((640, 480, 100.0), (100, 75)),
            ((4000, 3000, 2000.0), (2000, 1500)),
            ((7, 3, 100.0), (100, 42)),
            ((33, 4000, 100.0), (0, 100)),
            ((1, 1, 2000.0), (2000, 2000)),
            ((49, 49, 100.0), (100, 100)),
        ];
        for ((w, h, m), expected) in cases {
            assert_eq!(scaled_dimensions(w, h, m), expected, "{w}x{h} @ {m}");
        }
    }

    #[test]
    fn test_scaled_dimensions_long_edge_hits_bound() {
        let edges = [
            1, 3, 7, 33, 49, 50, 99, 100, 101, 333, 640, 800, 999, 1080, 1920, 4000,
        ];
        for m in [100u32, 2000] {
            for w in edges {
                for h in edges {
                    let (out_w, out_h) = scaled_dimensions(w, h, m as f32);
                    assert_eq!(out_w.max(out_h), m, "{w}x{h} @ {m}");
                    assert!(out_w.min(out_h) <= m, "{w}x{h} @ {m}");
                    if w == h {
                        assert_eq!((out_w, out_h), (m, m), "{w}x{h} @ {m}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_resize_drops_alpha() {
        let rgba = RgbaImage::from_pixel(40, 20, Rgba([10, 20, 30, 0]));
        let resized = ImageTransformer::new()
            .resize(&DynamicImage::ImageRgba8(rgba), 100.0)
            .unwrap();

        assert_eq!(resized.dimensions(), (100, 50));
        assert_eq!(resized.get_pixel(50, 25), &Rgb([10, 20, 30]));
    }

    #[test]
    fn test_resize_rejects_empty_result() {
        let img = DynamicImage::ImageRgb8(gradient(1, 1000));
        let err = ImageTransformer::new().resize(&img, 100.0).unwrap_err();
        assert!(matches!(err, AppError::Transform(_)));
    }

    #[test]
    fn test_png_round_trip_is_pixel_exact() {
        let transformer = ImageTransformer::new();
        let source = DynamicImage::ImageRgb8(gradient(64, 48));
        let resized = transformer.resize(&source, 100.0).unwrap();

        let encoded = transformer.encode(&resized, ImageType::Png).unwrap();
        let decoded = transformer.decode(&encoded, ImageType::Png).unwrap();

        assert_eq!(decoded.to_rgb8(), resized);
    }

    #[test]
    fn test_jpeg_round_trip_keeps_dimensions() {
        let transformer = ImageTransformer::new();
        let source = DynamicImage::ImageRgb8(gradient(320, 200));
        let resized = transformer.resize(&source, 100.0).unwrap();
        assert_eq!(resized.dimensions(), (100, 62));

        let encoded = transformer.encode(&resized, ImageType::Jpeg).unwrap();
        let decoded = transformer.decode(&encoded, ImageType::Jpeg).unwrap();

        assert_eq!(decoded.dimensions(), (100, 62));
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let transformer = ImageTransformer::new();
        let resized = transformer
            .resize(&DynamicImage::ImageRgb8(gradient(90, 60)), 100.0)
            .unwrap();

        for image_type in [ImageType::Jpeg, ImageType::Png] {
            let first = transformer.encode(&resized, image_type).unwrap();
            let second = transformer.encode(&resized, image_type).unwrap();
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let err = ImageTransformer::new()
            .decode(b"definitely not an image", ImageType::Png)
            .unwrap_err();
        assert!(matches!(err, AppError::Decode(_)));
    }

    #[test]
    fn test_decode_rejects_mismatched_format() {
        let transformer = ImageTransformer::new();
        let png = transformer.encode(&gradient(8, 8), ImageType::Png).unwrap();

        let err = transformer.decode(&png, ImageType::Jpeg).unwrap_err();
        assert!(matches!(err, AppError::Decode(_)));
    }
}
