use crate::error::Result;
use crate::types::DecodedImage;
use image::DynamicImage;

/// Decodes PNG/JPEG bytes into a unit-range luminance grid
///
/// Color inputs are reduced with ITU-R 601-2 luma weights, the same
/// integer approximation the reference model's training pipeline used.
pub fn decode_raster(bytes: &[u8]) -> Result<DecodedImage> {
    let img = image::load_from_memory(bytes)?;
    let (width, height) = (img.width(), img.height());
    let luma = to_luma(&img);
    DecodedImage::new(
        width,
        height,
        luma.into_iter().map(|v| v as f32 / 255.0).collect(),
    )
}

fn to_luma(img: &DynamicImage) -> Vec<u8> {
    if !img.color().has_color() {
        return img.to_luma8().into_raw();
    }
    img.to_rgb8()
        .pixels()
        .map(|p| {
            let [r, g, b] = p.0;
            let l = (r as u32 * 19595 + g as u32 * 38470 + b as u32 * 7471 + 0x8000) >> 16;
            l as u8
        })
        .collect()
}
