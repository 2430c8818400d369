//! Resizing and standardization into the fixed classifier input
//!
//! The resize stretches directly to 224x224 without preserving aspect ratio;
//! the reference classifier was fit on inputs produced the same way.

use crate::error::{RadscanError, Result};
use crate::types::{DecodedImage, NormalizedTensor, MODEL_INPUT_SIZE};
use image::imageops::{self, FilterType};
use image::{ImageBuffer, Luma};
use log::debug;
use ndarray::Array2;

/// Guards the standard deviation divisor on constant images
pub const STD_EPSILON: f64 = 1e-8;

/// Resizes and standardizes a decoded grid
pub fn preprocess(image: &DecodedImage) -> Result<NormalizedTensor> {
    let resized = resize_to_model_input(image)?;
    let tensor = NormalizedTensor::new(standardize(resized))?;
    debug!(
        "Preprocessed {}x{} -> {}x{}",
        image.width, image.height, MODEL_INPUT_SIZE, MODEL_INPUT_SIZE
    );
    Ok(tensor)
}

/// Anti-aliased resize straight to 224x224
///
/// The triangle filter's support widens with the downscale ratio, which
/// low-passes the source before sampling.
pub fn resize_to_model_input(image: &DecodedImage) -> Result<Array2<f32>> {
    let buffer: ImageBuffer<Luma<f32>, Vec<f32>> =
        ImageBuffer::from_raw(image.width, image.height, image.pixels.clone()).ok_or_else(
            || {
                RadscanError::Decode(format!(
                    "Pixel buffer does not match {}x{}",
                    image.width, image.height
                ))
            },
        )?;

    let size = MODEL_INPUT_SIZE as u32;
    let resized = imageops::resize(&buffer, size, size, FilterType::Triangle);

    Array2::from_shape_vec((MODEL_INPUT_SIZE, MODEL_INPUT_SIZE), resized.into_raw())
        .map_err(|e| RadscanError::Inference(format!("Failed to shape resized image: {}", e)))
}

/// `(x - mean) / (std + eps)` with the sample (N-1) standard deviation
pub fn standardize(grid: Array2<f32>) -> Array2<f32> {
    let n = grid.len();
    if n == 0 {
        return grid;
    }
    let mean = grid.iter().map(|&v| v as f64).sum::<f64>() / n as f64;
    let denom = if n > 1 { (n - 1) as f64 } else { 1.0 };
    let variance = grid
        .iter()
        .map(|&v| {
            let d = v as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / denom;
    let scale = variance.sqrt() + STD_EPSILON;

    grid.mapv(|v| ((v as f64 - mean) / scale) as f32)
}
