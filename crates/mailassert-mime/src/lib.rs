//! # mailassert-mime
//!
//! Read-only MIME message model used as the message under test by
//! `mailassert`.
//!
//! ## Features
//!
//! - **Message parsing**: raw RFC 5322 text with recursive multipart support
//! - **Structured headers**: Content-Type and Content-Disposition with parameters
//! - **Addresses**: bare addr-specs from To, From, Reply-To, Cc and Bcc
//! - **Decoding**: Base64, Quoted-Printable, RFC 2047 encoded words
//!
//! ## Quick Start
//!
//! ```
//! use mailassert_mime::Message;
//!
//! let raw = "From: Sender <sender@example.com>\r\n\
//!            To: recipient@example.com\r\n\
//!            Subject: Test\r\n\
//!            \r\n\
//!            Hello, World!";
//!
//! let message = Message::parse(raw)?;
//! assert_eq!(message.subject().as_deref(), Some("Test"));
//! assert_eq!(message.from()?, vec!["sender@example.com"]);
//! assert_eq!(message.body_text()?, "Hello, World!");
//! # Ok::<(), mailassert_mime::Error>(())
//! ```
//!
//! ## Hand-built fixtures
//!
//! ```
//! use mailassert_mime::Message;
//!
//! let attachment = Message::default()
//!     .with_header("Content-Type", "application/pdf")
//!     .with_header("Content-Disposition", "attachment; filename=\"file.pdf\"")
//!     .with_body("%PDF");
//!
//! assert!(attachment.is_attachment());
//! assert_eq!(attachment.filename().as_deref(), Some("file.pdf"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod content_type;
mod disposition;
mod error;
mod header;
mod message;

pub mod address;
pub mod encoding;

pub use content_type::ContentType;
pub use disposition::{ContentDisposition, DispositionType};
pub use encoding::TransferEncoding;
pub use error::{Error, Result};
pub use header::Headers;
pub use message::Message;
