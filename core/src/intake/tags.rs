use dicom_core::Tag;
use dicom_object::InMemDicomObject;

// Core Image Tags
pub const MODALITY: Tag = Tag(0x0008, 0x0060);
pub const NUMBER_OF_FRAMES: Tag = Tag(0x0028, 0x0008);
pub const PHOTOMETRIC_INTERPRETATION: Tag = Tag(0x0028, 0x0004);
pub const SAMPLES_PER_PIXEL: Tag = Tag(0x0028, 0x0002);

// Image Geometry Tags
pub const ROWS: Tag = Tag(0x0028, 0x0010);
pub const COLUMNS: Tag = Tag(0x0028, 0x0011);

// Pixel Encoding Tags
pub const BITS_ALLOCATED: Tag = Tag(0x0028, 0x0100);
pub const PIXEL_REPRESENTATION: Tag = Tag(0x0028, 0x0103);
pub const PIXEL_DATA: Tag = Tag(0x7FE0, 0x0010);

// Modality LUT Tags
pub const RESCALE_INTERCEPT: Tag = Tag(0x0028, 0x1052);
pub const RESCALE_SLOPE: Tag = Tag(0x0028, 0x1053);

/// Helper to get string value from DICOM tag
///
/// Returns `None` if the tag is not present or cannot be converted to string
pub fn get_string_value(dcm: &InMemDicomObject, tag: Tag) -> Option<String> {
    dcm.element(tag)
        .ok()
        .and_then(|elem| elem.to_str().ok())
        .map(|s| s.trim().to_string())
}

/// Helper to get integer value from DICOM tag
///
/// Returns `None` if the tag is not present or cannot be converted to i32
pub fn get_int_value(dcm: &InMemDicomObject, tag: Tag) -> Option<i32> {
    dcm.element(tag)
        .ok()
        .and_then(|elem| elem.to_int::<i32>().ok())
}

/// Helper to get u16 value from DICOM tag
///
/// Returns `None` if the tag is not present or cannot be converted to u16
pub fn get_u16_value(dcm: &InMemDicomObject, tag: Tag) -> Option<u16> {
    dcm.element(tag)
        .ok()
        .and_then(|elem| elem.to_int::<u16>().ok())
}

/// Helper to get a decimal value (DS/FL/FD) from DICOM tag
///
/// Returns `None` if the tag is not present or does not hold a number
pub fn get_f64_value(dcm: &InMemDicomObject, tag: Tag) -> Option<f64> {
    dcm.element(tag)
        .ok()
        .and_then(|elem| elem.to_float64().ok())
}
