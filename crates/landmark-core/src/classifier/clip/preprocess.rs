//! Image preprocessing for the CLIP vision encoder.
//!
//! CLIP ViT models expect:
//! - Shortest edge resized to the input size (bicubic), then center-cropped square
//! - Normalization: (pixel/255 - mean) / std with the OpenAI CLIP statistics
//! - Channel order: RGB
//! - Tensor layout: NCHW [batch, channels, height, width]

use image::imageops::{self, FilterType};
use image::RgbImage;
use ndarray::Array4;

/// Number of color channels (RGB).
const CHANNELS: usize = 3;

/// CLIP normalization mean (per-channel).
const NORM_MEAN: [f32; CHANNELS] = [0.481_454_66, 0.457_827_5, 0.408_210_73];

/// CLIP normalization std (per-channel).
const NORM_STD: [f32; CHANNELS] = [0.268_629_54, 0.261_302_58, 0.275_777_1];

/// Preprocess an RGB image for CLIP inference.
pub fn preprocess(image: &RgbImage, image_size: u32) -> Array4<f32> {
    let cropped = resize_and_center_crop(image, image_size);
    let size = image_size as usize;

    Array4::from_shape_fn((1, CHANNELS, size, size), |(_, c, y, x)| {
        let val = cropped.get_pixel(x as u32, y as u32)[c];
        (val as f32 / 255.0 - NORM_MEAN[c]) / NORM_STD[c]
    })
}

/// Scale so the shorter edge equals `size`, then crop the central square.
fn resize_and_center_crop(image: &RgbImage, size: u32) -> RgbImage {
    let (width, height) = image.dimensions();
    let shortest = width.min(height).max(1) as f64;
    let scale = size as f64 / shortest;
    let new_w = ((width as f64 * scale).round() as u32).max(size);
    let new_h = ((height as f64 * scale).round() as u32).max(size);

    let resized = imageops::resize(image, new_w, new_h, FilterType::CatmullRom);
    let x = (new_w - size) / 2;
    let y = (new_h - size) / 2;
    imageops::crop_imm(&resized, x, y, size, size).to_image()
}
