use thiserror::Error;

/// Result type for radscan operations
pub type Result<T> = std::result::Result<T, RadscanError>;

/// Error types for radscan operations
///
/// Every variant is terminal for the request that produced it.
#[derive(Error, Debug)]
pub enum RadscanError {
    /// Malformed, empty or unparseable image bytes
    #[error("Decode error: {0}")]
    Decode(String),

    /// Recognized format variant that the pipeline does not handle
    #[error("Unsupported modality: {0}")]
    UnsupportedModality(String),

    /// Numeric failure during or after the forward pass
    #[error("Inference error: {0}")]
    Inference(String),

    /// Invalid configuration (model path, label file, env vars)
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RadscanError {
    /// Whether the failure was caused by the submitted image rather than the service
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            RadscanError::Decode(_) | RadscanError::UnsupportedModality(_)
        )
    }
}

impl From<dicom_object::ReadError> for RadscanError {
    fn from(e: dicom_object::ReadError) -> Self {
        RadscanError::Decode(format!("{}", e))
    }
}

impl From<dicom_core::value::ConvertValueError> for RadscanError {
    fn from(e: dicom_core::value::ConvertValueError) -> Self {
        RadscanError::Decode(format!("{}", e))
    }
}

impl From<image::ImageError> for RadscanError {
    fn from(e: image::ImageError) -> Self {
        RadscanError::Decode(format!("{}", e))
    }
}

impl From<ort::Error> for RadscanError {
    fn from(e: ort::Error) -> Self {
        RadscanError::Inference(format!("{}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_classification() {
        assert!(RadscanError::Decode("empty".into()).is_client_error());
        assert!(RadscanError::UnsupportedModality("RGB".into()).is_client_error());
        assert!(!RadscanError::Inference("NaN".into()).is_client_error());
        assert!(!RadscanError::Config("missing".into()).is_client_error());
    }

    #[test]
    fn test_display_prefixes() {
        let err = RadscanError::Decode("payload is empty".into());
        assert_eq!(err.to_string(), "Decode error: payload is empty");
        let err = RadscanError::Inference("shape mismatch".into());
        assert_eq!(err.to_string(), "Inference error: shape mismatch");
    }
}
