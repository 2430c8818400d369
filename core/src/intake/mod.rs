//! Intake decoding: raw upload bytes to a single-channel unit-range grid
//!
//! Strategies are tried in order, the one matching the filename hint first.
//! A recognized-but-unsupported DICOM stops the chain immediately; any other
//! failure moves on to the next strategy and the last failure is surfaced.

pub mod dicom;
pub mod raster;
pub mod tags;

pub use dicom::{decode_dataset, decode_dicom, min_max_to_unit, LinearRescale};
pub use raster::decode_raster;

use crate::error::{RadscanError, Result};
use crate::types::{DecodedImage, RawImagePayload, SourceFormat};
use log::{debug, warn};

/// Returns the decoding strategies for a payload, most likely first
pub fn strategy_order(payload: &RawImagePayload) -> [SourceFormat; 2] {
    if payload.is_dicom_hint() {
        [SourceFormat::Dicom, SourceFormat::Raster]
    } else {
        [SourceFormat::Raster, SourceFormat::Dicom]
    }
}

/// Decodes bytes with a single strategy
pub fn decode_as(format: SourceFormat, bytes: &[u8]) -> Result<DecodedImage> {
    match format {
        SourceFormat::Dicom => decode_dicom(bytes),
        SourceFormat::Raster => decode_raster(bytes),
    }
}

/// Decodes a payload, returning the grid and the format that produced it
///
/// # Errors
///
/// - `Decode` if the payload is empty or no strategy can parse it
/// - `UnsupportedModality` if a DICOM was recognized but cannot be handled
pub fn decode(payload: &RawImagePayload) -> Result<(DecodedImage, SourceFormat)> {
    if payload.is_empty() {
        return Err(RadscanError::Decode("Payload is empty".into()));
    }

    let mut last_error = None;
    for (attempt, format) in strategy_order(payload).into_iter().enumerate() {
        match decode_as(format, payload.bytes) {
            Ok(image) => {
                if attempt > 0 {
                    warn!(
                        "{} decoded as {} despite filename hint",
                        payload.filename, format
                    );
                }
                debug!(
                    "Decoded {} ({}) as {} {}x{}",
                    payload.filename,
                    payload.content_type.unwrap_or("unknown content type"),
                    format,
                    image.width,
                    image.height
                );
                return Ok((image, format));
            }
            Err(e @ RadscanError::UnsupportedModality(_)) => return Err(e),
            Err(e) => {
                debug!("{} decoder rejected {}: {}", format, payload.filename, e);
                last_error = Some(e);
            }
        }
    }

    Err(last_error.unwrap_or_else(|| RadscanError::Decode("No decoder accepted payload".into())))
}
