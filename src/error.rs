//! Error handling for XML binding

/// A result type for XML binding, which can be either a successful value or an error.
pub type XmlResult<T> = std::result::Result<T, XmlError>;

/// An error that occurred while parsing or generating a bound document.
#[derive(Debug, thiserror::Error)]
pub enum XmlError {
    /// An attribute appeared at the document root, where it has no owning element
    #[error("Attribute `{0}` has no owning element; attributes cannot appear at the document root")]
    RootAttribute(String),

    /// A tag in the document was not closed properly
    #[error("Unclosed tag: {0}")]
    UnclosedTag(String),

    /// A closing tag did not match the tag it was supposed to close
    #[error("Mismatched closing tag: expected `</{expected}>`, found `</{found}>`")]
    MismatchedTag {
        /// Name of the tag that was open
        expected: String,

        /// Name found in the closing tag
        found: String,
    },

    /// Document ended unexpectedly
    #[error("End of document reached unexpectedly")]
    UnexpectedEof,

    /// A token appeared somewhere it is not allowed
    #[error("Unexpected {0} in document")]
    UnexpectedToken(&'static str),

    /// XML tokenization failed
    #[error("XML parser error: {0}")]
    Xml(#[from] xmlparser::Error),

    /// Model construction or export failed
    #[error("Model validation error: {0}")]
    Validation(#[from] serde_json::Error),

    /// A model exported to something other than a mapping
    #[error("Expected the exported model to be a mapping, found {0}")]
    NotAMapping(&'static str),

    /// IO error occurred while writing a document
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
