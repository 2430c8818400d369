use crate::error::{RadscanError, Result};
use ndarray::{Array2, Array4};

/// Side length of the square classifier input
pub const MODEL_INPUT_SIZE: usize = 224;

/// Single-channel intensity grid in [0, 1], row-major
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<f32>,
}

impl DecodedImage {
    /// Creates a decoded image, checking that the pixel count matches the dimensions
    ///
    /// # Errors
    ///
    /// Returns `Decode` for zero-sized grids or a pixel count mismatch
    pub fn new(width: u32, height: u32, pixels: Vec<f32>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(RadscanError::Decode(format!(
                "Image has empty dimensions {}x{}",
                width, height
            )));
        }
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(RadscanError::Decode(format!(
                "Expected {} pixels for {}x{}, found {}",
                expected,
                width,
                height,
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Returns (width, height)
    pub fn shape(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Standardized 224x224 grid ready for the forward pass
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTensor {
    data: Array2<f32>,
}

impl NormalizedTensor {
    /// Wraps a standardized grid
    ///
    /// # Errors
    ///
    /// Returns `Inference` if the grid is not 224x224
    pub fn new(data: Array2<f32>) -> Result<Self> {
        if data.dim() != (MODEL_INPUT_SIZE, MODEL_INPUT_SIZE) {
            return Err(RadscanError::Inference(format!(
                "Expected {}x{} tensor, found {:?}",
                MODEL_INPUT_SIZE,
                MODEL_INPUT_SIZE,
                data.dim()
            )));
        }
        Ok(Self { data })
    }

    pub fn view(&self) -> ndarray::ArrayView2<'_, f32> {
        self.data.view()
    }

    /// Returns the grid as a `[1, 1, 224, 224]` NCHW batch
    pub fn as_model_input(&self) -> Array4<f32> {
        self.data
            .clone()
            .insert_axis(ndarray::Axis(0))
            .insert_axis(ndarray::Axis(0))
    }

    /// Whether every element is finite
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|v| v.is_finite())
    }
}
