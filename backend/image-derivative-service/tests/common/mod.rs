//! Shared fixtures for pipeline integration tests

#![allow(dead_code)]

use image::{ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use image_derivative_service::{Config, DerivativePipeline};
use s3_utils::{MemoryObjectStore, ObjectStore};
use std::io::Cursor;
use std::sync::Arc;

pub const BUCKET: &str = "media";

/// Gradient test card, so resampling has something to chew on
pub fn rgb_image(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    })
}

pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut buf = Vec::new();
    rgb_image(width, height)
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Jpeg)
        .expect("encode jpeg fixture");
    buf
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut buf = Vec::new();
    rgb_image(width, height)
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .expect("encode png fixture");
    buf
}

pub fn rgba_png_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut buf = Vec::new();
    RgbaImage::from_pixel(width, height, Rgba([200, 100, 50, 64]))
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .expect("encode rgba png fixture");
    buf
}

pub fn pipeline_with(store: Arc<MemoryObjectStore>, config: &Config) -> DerivativePipeline {
    let store: Arc<dyn ObjectStore> = store;
    DerivativePipeline::new(store, config).expect("pipeline")
}

pub fn default_pipeline(store: Arc<MemoryObjectStore>) -> DerivativePipeline {
    pipeline_with(store, &Config::default())
}
