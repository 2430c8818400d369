use std::path::Path;

/// Raw image bytes as received from the upload layer
///
/// Borrowed for the duration of a single analysis. The content type is carried
/// for logging only; format detection relies on the filename hint.
#[derive(Debug, Clone, Copy)]
pub struct RawImagePayload<'a> {
    pub bytes: &'a [u8],
    pub filename: &'a str,
    pub content_type: Option<&'a str>,
}

impl<'a> RawImagePayload<'a> {
    /// Creates a payload without a declared content type
    pub fn new(bytes: &'a [u8], filename: &'a str) -> Self {
        Self {
            bytes,
            filename,
            content_type: None,
        }
    }

    /// Attaches the declared content type
    pub fn with_content_type(mut self, content_type: &'a str) -> Self {
        self.content_type = Some(content_type);
        self
    }

    /// Returns whether the payload has no bytes
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns whether the filename carries a `.dcm` suffix (case-insensitive)
    pub fn is_dicom_hint(&self) -> bool {
        Path::new(self.filename)
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("dcm"))
            .unwrap_or(false)
    }
}
