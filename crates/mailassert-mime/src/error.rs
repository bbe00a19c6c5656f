//! Errors raised while reading a message under test.

use std::string::FromUtf8Error;

/// Result type alias for message parsing and decoding.
pub type Result<T> = std::result::Result<T, Error>;

/// Ways a message can fail to parse or decode.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A header line is not `name: value`, or folds onto nothing.
    #[error("Malformed header line: {0}")]
    InvalidHeader(String),

    /// Content-Type without a `type/subtype`.
    #[error("Invalid content type: {0}")]
    InvalidContentType(String),

    /// Content-Disposition without a disposition type.
    #[error("Invalid content disposition: {0}")]
    InvalidDisposition(String),

    /// Quoted-printable escape or RFC 2047 word that does not decode.
    #[error("Invalid encoding: {0}")]
    InvalidEncoding(String),

    /// Base64 body or encoded word that does not decode.
    #[error("Invalid base64 data: {0}")]
    Base64Decode(#[from] base64::DecodeError),

    /// Text that is not valid in its declared charset.
    #[error("Text is not valid {charset}: {source}")]
    Charset {
        /// Declared charset, lowercased.
        charset: String,
        /// Underlying UTF-8 error.
        #[source]
        source: FromUtf8Error,
    },

    /// Address header that is not an RFC 5322 address list.
    #[error("Invalid address list: {0}")]
    InvalidAddress(String),

    /// Multipart entity without a boundary parameter.
    #[error("{0} entity has no boundary parameter")]
    MissingBoundary(String),

    /// The boundary never occurs in the multipart body.
    #[error("Boundary {0:?} not found in multipart body")]
    BoundaryNotFound(String),
}
