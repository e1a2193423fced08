//! Structured error types for linkdeck.
//!
//! Every failure in the fetch/decode/build pass surfaces as one of these;
//! malformed individual cells never do (they degrade to defaults instead).

/// All errors that can occur while loading and building the link page.
#[derive(Debug, thiserror::Error)]
pub enum LinkdeckError {
    /// XML parsing error from quick-xml.
    #[error("XML parsing: {0}")]
    Xml(#[from] quick_xml::Error),

    /// ZIP archive error.
    #[error("ZIP archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Workbook fetch returned a non-success status.
    #[error("workbook fetch failed with status {0}")]
    Fetch(u16),

    /// The workbook contains no sheets at all.
    #[error("workbook has no sheets")]
    MissingSheet,

    /// General decode error.
    #[error("Parse error: {0}")]
    Parse(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Catch-all for string errors.
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, LinkdeckError>;

impl From<String> for LinkdeckError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for LinkdeckError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<LinkdeckError> for wasm_bindgen::JsValue {
    fn from(e: LinkdeckError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
