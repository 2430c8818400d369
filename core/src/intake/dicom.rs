use crate::error::{RadscanError, Result};
use crate::types::{DecodedImage, PhotometricInterpretation};
use dicom_core::value::PrimitiveValue;
use dicom_dictionary_std::uids;
use dicom_object::InMemDicomObject;
use log::debug;

use super::tags::{
    get_f64_value, get_int_value, get_string_value, get_u16_value, BITS_ALLOCATED, COLUMNS,
    MODALITY, NUMBER_OF_FRAMES, PHOTOMETRIC_INTERPRETATION, PIXEL_DATA, PIXEL_REPRESENTATION,
    RESCALE_INTERCEPT, RESCALE_SLOPE, ROWS, SAMPLES_PER_PIXEL,
};

const PREAMBLE_LEN: usize = 128;
const MAGIC: &[u8; 4] = b"DICM";

/// Explicit VR Big Endian (retired, still found in archives)
const EXPLICIT_VR_BIG_ENDIAN: &str = "1.2.840.10008.1.2.2";

/// Linear modality transform from stored values to output units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearRescale {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearRescale {
    pub fn new(slope: f64, intercept: f64) -> Self {
        Self { slope, intercept }
    }

    /// Reads RescaleSlope and RescaleIntercept; both must be present
    pub fn from_dataset(dcm: &InMemDicomObject) -> Option<Self> {
        let slope = get_f64_value(dcm, RESCALE_SLOPE)?;
        let intercept = get_f64_value(dcm, RESCALE_INTERCEPT)?;
        Some(Self::new(slope, intercept))
    }

    pub fn apply(&self, raw: f64) -> f64 {
        raw * self.slope + self.intercept
    }
}

/// Decodes a DICOM Part-10 byte stream into a unit-range grid
///
/// The 128-byte preamble is optional. Only natively encoded (uncompressed)
/// transfer syntaxes are handled.
///
/// # Errors
///
/// - `Decode` if the stream cannot be parsed or pixel tags are missing
/// - `UnsupportedModality` for compressed transfer syntaxes or non-monochrome data
pub fn decode_dicom(bytes: &[u8]) -> Result<DecodedImage> {
    let obj = dicom_object::from_reader(strip_preamble(bytes))?;

    let big_endian = is_big_endian(obj.meta().transfer_syntax())?;
    decode_pixels(&obj, big_endian)
}

/// Byte order of a native transfer syntax
///
/// # Errors
///
/// Returns `UnsupportedModality` for encapsulated (compressed) syntaxes
pub fn is_big_endian(transfer_syntax: &str) -> Result<bool> {
    match transfer_syntax.trim_end_matches('\0').trim() {
        uids::IMPLICIT_VR_LITTLE_ENDIAN
        | uids::EXPLICIT_VR_LITTLE_ENDIAN
        | uids::DEFLATED_EXPLICIT_VR_LITTLE_ENDIAN => Ok(false),
        EXPLICIT_VR_BIG_ENDIAN => Ok(true),
        other => Err(RadscanError::UnsupportedModality(format!(
            "compressed transfer syntax {}",
            other
        ))),
    }
}

/// Decodes the first frame of an already-opened, little-endian data set
pub fn decode_dataset(dcm: &InMemDicomObject) -> Result<DecodedImage> {
    decode_pixels(dcm, false)
}

fn strip_preamble(bytes: &[u8]) -> &[u8] {
    if bytes.len() >= PREAMBLE_LEN + MAGIC.len()
        && &bytes[PREAMBLE_LEN..PREAMBLE_LEN + MAGIC.len()] == MAGIC
    {
        &bytes[PREAMBLE_LEN..]
    } else {
        bytes
    }
}

fn decode_pixels(dcm: &InMemDicomObject, big_endian: bool) -> Result<DecodedImage> {
    let rows = require_u16(dcm, ROWS, "Rows")?;
    let columns = require_u16(dcm, COLUMNS, "Columns")?;
    let bits_allocated = require_u16(dcm, BITS_ALLOCATED, "BitsAllocated")?;
    let signed = get_u16_value(dcm, PIXEL_REPRESENTATION).unwrap_or(0) == 1;

    let samples_per_pixel = get_u16_value(dcm, SAMPLES_PER_PIXEL).unwrap_or(1);
    if samples_per_pixel != 1 {
        return Err(RadscanError::UnsupportedModality(format!(
            "{} samples per pixel",
            samples_per_pixel
        )));
    }
    if let Some(pi) = get_string_value(dcm, PHOTOMETRIC_INTERPRETATION) {
        let pi = PhotometricInterpretation::from_str(&pi);
        if !pi.is_monochrome() {
            return Err(RadscanError::UnsupportedModality(format!(
                "photometric interpretation {}",
                pi
            )));
        }
    }

    let frames = get_int_value(dcm, NUMBER_OF_FRAMES).unwrap_or(1);
    debug!(
        "DICOM {}x{} bits={} signed={} frames={} modality={}",
        columns,
        rows,
        bits_allocated,
        signed,
        frames,
        get_string_value(dcm, MODALITY).unwrap_or_default()
    );

    let pixel_data = dcm
        .element(PIXEL_DATA)
        .map_err(|_| RadscanError::Decode("Tag not found: PixelData".into()))?;
    let primitive = pixel_data.value().primitive().ok_or_else(|| {
        RadscanError::UnsupportedModality("encapsulated pixel data".into())
    })?;

    let count = rows as usize * columns as usize;
    let mut samples = read_samples(primitive, bits_allocated, signed, big_endian, count)?;
    if samples.len() < count {
        return Err(RadscanError::Decode(format!(
            "PixelData holds {} samples, expected {}",
            samples.len(),
            count
        )));
    }

    if let Some(rescale) = LinearRescale::from_dataset(dcm) {
        for v in samples.iter_mut() {
            *v = rescale.apply(*v);
        }
    }

    DecodedImage::new(columns as u32, rows as u32, min_max_to_unit(&samples))
}

fn require_u16(dcm: &InMemDicomObject, tag: dicom_core::Tag, name: &str) -> Result<u16> {
    get_u16_value(dcm, tag).ok_or_else(|| RadscanError::Decode(format!("Tag not found: {}", name)))
}

/// Reads the first `count` stored values; later frames are ignored
fn read_samples(
    value: &PrimitiveValue,
    bits_allocated: u16,
    signed: bool,
    big_endian: bool,
    count: usize,
) -> Result<Vec<f64>> {
    let samples = match (value, bits_allocated) {
        (PrimitiveValue::U8(bytes), 8) => bytes
            .iter()
            .take(count)
            .map(|&b| if signed { b as i8 as f64 } else { b as f64 })
            .collect(),
        (PrimitiveValue::U8(bytes), 16) => bytes
            .chunks_exact(2)
            .take(count)
            .map(|pair| {
                let word = [pair[0], pair[1]];
                let raw = if big_endian {
                    u16::from_be_bytes(word)
                } else {
                    u16::from_le_bytes(word)
                };
                if signed {
                    raw as i16 as f64
                } else {
                    raw as f64
                }
            })
            .collect(),
        (PrimitiveValue::U16(words), 16) => words
            .iter()
            .take(count)
            .map(|&w| if signed { w as i16 as f64 } else { w as f64 })
            .collect(),
        (PrimitiveValue::I16(words), 16) => words.iter().take(count).map(|&w| w as f64).collect(),
        (PrimitiveValue::Empty, _) => Vec::new(),
        (_, bits) => {
            return Err(RadscanError::UnsupportedModality(format!(
                "{} bits allocated",
                bits
            )))
        }
    };
    Ok(samples)
}

/// Min-max normalizes to the observed range, quantizes to 8 bits, then scales to [0, 1]
///
/// A constant image maps to all zeros.
pub fn min_max_to_unit(samples: &[f64]) -> Vec<f32> {
    let (min, max) = samples
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let range = max - min;

    samples
        .iter()
        .map(|&v| {
            let shifted = v - min;
            let unit = if range > 0.0 { shifted / range } else { shifted };
            let byte = (unit * 255.0).clamp(0.0, 255.0) as u8;
            byte as f32 / 255.0
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use dicom_core::value::PixelFragmentSequence;
    use dicom_core::{DataElement, VR};
    use dicom_object::meta::FileMetaTableBuilder;

    fn create_test_dicom(rows: u16, columns: u16, pixels: Vec<u16>) -> InMemDicomObject {
        let mut obj = InMemDicomObject::new_empty();
        obj.put(DataElement::new(ROWS, VR::US, PrimitiveValue::from(rows)));
        obj.put(DataElement::new(COLUMNS, VR::US, PrimitiveValue::from(columns)));
        obj.put(DataElement::new(BITS_ALLOCATED, VR::US, PrimitiveValue::from(16_u16)));
        obj.put(DataElement::new(
            PIXEL_REPRESENTATION,
            VR::US,
            PrimitiveValue::from(0_u16),
        ));
        obj.put(DataElement::new(
            PHOTOMETRIC_INTERPRETATION,
            VR::CS,
            PrimitiveValue::from("MONOCHROME2"),
        ));
        obj.put(DataElement::new(
            PIXEL_DATA,
            VR::OW,
            PrimitiveValue::U16(pixels.into()),
        ));
        obj
    }

    fn with_rescale(mut obj: InMemDicomObject, slope: &str, intercept: &str) -> InMemDicomObject {
        obj.put(DataElement::new(RESCALE_SLOPE, VR::DS, PrimitiveValue::from(slope)));
        obj.put(DataElement::new(
            RESCALE_INTERCEPT,
            VR::DS,
            PrimitiveValue::from(intercept),
        ));
        obj
    }

    #[test]
    fn test_linear_rescale_slope_two_intercept_minus_hundred() {
        let rescale = LinearRescale::new(2.0, -100.0);
        assert_eq!(rescale.apply(100.0), 100.0);
    }

    #[test]
    fn test_rescale_read_from_dataset() {
        let dcm = with_rescale(create_test_dicom(1, 1, vec![100]), "2", "-100");
        assert_eq!(
            LinearRescale::from_dataset(&dcm),
            Some(LinearRescale::new(2.0, -100.0))
        );
    }

    #[test]
    fn test_rescale_requires_both_tags() {
        let mut dcm = create_test_dicom(1, 1, vec![100]);
        dcm.put(DataElement::new(RESCALE_SLOPE, VR::DS, PrimitiveValue::from("2")));
        assert_eq!(LinearRescale::from_dataset(&dcm), None);
    }

    #[test]
    fn test_rescale_applied_before_min_max() {
        // raw 50/100/150 -> 0/100/200 after rescale -> 0, 127/255, 1
        let dcm = with_rescale(create_test_dicom(1, 3, vec![50, 100, 150]), "2", "-100");
        let img = decode_dataset(&dcm).unwrap();
        assert_eq!(img.shape(), (3, 1));
        assert_eq!(img.pixels, vec![0.0, 127.0 / 255.0, 1.0]);
    }

    #[test]
    fn test_observed_range_normalization() {
        let dcm = create_test_dicom(2, 2, vec![1000, 1500, 2000, 1000]);
        let img = decode_dataset(&dcm).unwrap();
        assert_eq!(img.pixels[0], 0.0);
        assert_eq!(img.pixels[2], 1.0);
        assert_eq!(img.pixels[1], 127.0 / 255.0);
    }

    #[test]
    fn test_constant_image_maps_to_zero() {
        assert_eq!(min_max_to_unit(&[42.0, 42.0, 42.0]), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_signed_samples() {
        let mut dcm = create_test_dicom(1, 2, vec![(-1000_i16) as u16, 1000]);
        dcm.put(DataElement::new(
            PIXEL_REPRESENTATION,
            VR::US,
            PrimitiveValue::from(1_u16),
        ));
        let img = decode_dataset(&dcm).unwrap();
        assert_eq!(img.pixels, vec![0.0, 1.0]);
    }

    #[test]
    fn test_eight_bit_samples() {
        let mut dcm = create_test_dicom(1, 3, vec![]);
        dcm.put(DataElement::new(BITS_ALLOCATED, VR::US, PrimitiveValue::from(8_u16)));
        dcm.put(DataElement::new(
            PIXEL_DATA,
            VR::OB,
            PrimitiveValue::U8(vec![0_u8, 51, 255].into()),
        ));
        let img = decode_dataset(&dcm).unwrap();
        assert_eq!(img.pixels, vec![0.0, 51.0 / 255.0, 1.0]);
    }

    #[test]
    fn test_only_first_frame_is_read() {
        let mut dcm = create_test_dicom(1, 2, vec![0, 10, 500, 500]);
        dcm.put(DataElement::new(
            NUMBER_OF_FRAMES,
            VR::IS,
            PrimitiveValue::from("2"),
        ));
        let img = decode_dataset(&dcm).unwrap();
        assert_eq!(img.pixels, vec![0.0, 1.0]);
    }

    #[test]
    fn test_missing_pixel_data_is_decode_error() {
        let mut dcm = InMemDicomObject::new_empty();
        dcm.put(DataElement::new(ROWS, VR::US, PrimitiveValue::from(2_u16)));
        dcm.put(DataElement::new(COLUMNS, VR::US, PrimitiveValue::from(2_u16)));
        dcm.put(DataElement::new(BITS_ALLOCATED, VR::US, PrimitiveValue::from(16_u16)));
        assert!(matches!(decode_dataset(&dcm), Err(RadscanError::Decode(_))));
    }

    #[test]
    fn test_missing_rows_is_decode_error() {
        let mut dcm = create_test_dicom(2, 2, vec![0; 4]);
        dcm.remove_element(ROWS);
        assert!(matches!(decode_dataset(&dcm), Err(RadscanError::Decode(_))));
    }

    #[test]
    fn test_short_pixel_data_is_decode_error() {
        let dcm = create_test_dicom(2, 2, vec![0, 1, 2]);
        assert!(matches!(decode_dataset(&dcm), Err(RadscanError::Decode(_))));
    }

    #[test]
    fn test_rgb_is_unsupported() {
        let mut dcm = create_test_dicom(1, 1, vec![0]);
        dcm.put(DataElement::new(
            PHOTOMETRIC_INTERPRETATION,
            VR::CS,
            PrimitiveValue::from("RGB"),
        ));
        assert!(matches!(
            decode_dataset(&dcm),
            Err(RadscanError::UnsupportedModality(_))
        ));
    }

    #[test]
    fn test_multi_sample_is_unsupported() {
        let mut dcm = create_test_dicom(1, 1, vec![0]);
        dcm.put(DataElement::new(
            SAMPLES_PER_PIXEL,
            VR::US,
            PrimitiveValue::from(3_u16),
        ));
        assert!(matches!(
            decode_dataset(&dcm),
            Err(RadscanError::UnsupportedModality(_))
        ));
    }

    #[test]
    fn test_decode_part10_bytes() {
        let dcm = with_rescale(create_test_dicom(2, 2, vec![50, 100, 150, 150]), "2", "-100");
        let file = dcm
            .with_meta(
                FileMetaTableBuilder::new()
                    .transfer_syntax(uids::EXPLICIT_VR_LITTLE_ENDIAN)
                    .media_storage_sop_class_uid(uids::SECONDARY_CAPTURE_IMAGE_STORAGE)
                    .media_storage_sop_instance_uid("2.25.1234567890"),
            )
            .unwrap();
        let mut bytes = Vec::new();
        file.write_all(&mut bytes).unwrap();

        let img = decode_dicom(&bytes).unwrap();
        assert_eq!(img.shape(), (2, 2));
        assert_eq!(img.pixels, vec![0.0, 127.0 / 255.0, 1.0, 1.0]);
    }

    #[test]
    fn test_transfer_syntax_byte_order() {
        assert!(!is_big_endian(uids::EXPLICIT_VR_LITTLE_ENDIAN).unwrap());
        assert!(!is_big_endian("1.2.840.10008.1.2\0").unwrap());
        assert!(is_big_endian("1.2.840.10008.1.2.2").unwrap());
        assert!(matches!(
            is_big_endian(uids::JPEG_BASELINE8_BIT),
            Err(RadscanError::UnsupportedModality(_))
        ));
    }

    #[test]
    fn test_big_endian_words_from_bytes() {
        let bytes = PrimitiveValue::U8(vec![0x00, 0x00, 0x01, 0x00, 0x02, 0x00].into());
        let samples = read_samples(&bytes, 16, false, true, 3).unwrap();
        assert_eq!(samples, vec![0.0, 256.0, 512.0]);
        assert_eq!(min_max_to_unit(&samples), vec![0.0, 127.0 / 255.0, 1.0]);
    }

    #[test]
    fn test_encapsulated_pixel_data_is_unsupported() {
        let mut dcm = create_test_dicom(1, 1, vec![0]);
        dcm.put(DataElement::new(
            PIXEL_DATA,
            VR::OB,
            PixelFragmentSequence::new_fragments(vec![vec![0xFF_u8, 0xD8, 0xFF, 0xD9]]),
        ));
        assert!(matches!(
            decode_dataset(&dcm),
            Err(RadscanError::UnsupportedModality(_))
        ));
    }

    #[test]
    fn test_garbage_bytes_are_decode_error() {
        let err = decode_dicom(b"definitely not a dicom stream").unwrap_err();
        assert!(matches!(err, RadscanError::Decode(_)));
    }
}
