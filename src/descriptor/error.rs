//! Descriptor error types.

/// Errors raised while parsing an experiment descriptor.
#[derive(Debug, thiserror::Error)]
pub enum DescriptorError {
    /// I/O error reading the descriptor file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed XML
    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// A recognized numeric key holding non-numeric text
    #[error("key {key:?} holds non-numeric value {value:?}")]
    InvalidNumber {
        /// The recognized key.
        key: String,
        /// The offending value text.
        value: String,
    },
}
