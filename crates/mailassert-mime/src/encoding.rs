//! Transfer and header decoding.
//!
//! Supports Base64, Quoted-Printable, and RFC 2047 encoded words. Only the
//! decoding direction exists: messages under test are produced elsewhere.

use crate::error::{Error, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::fmt;

/// Content-Transfer-Encoding of a message body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransferEncoding {
    /// 7-bit ASCII.
    #[default]
    SevenBit,
    /// 8-bit text.
    EightBit,
    /// Base64 encoding.
    Base64,
    /// Quoted-Printable encoding.
    QuotedPrintable,
    /// Binary (no encoding).
    Binary,
}

impl TransferEncoding {
    /// Parses transfer encoding from a header value.
    ///
    /// Unknown values fall back to 7bit, the RFC 2045 default.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "8bit" => Self::EightBit,
            "base64" => Self::Base64,
            "quoted-printable" => Self::QuotedPrintable,
            "binary" => Self::Binary,
            _ => Self::SevenBit,
        }
    }

    /// Decodes `body` according to this transfer encoding.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not valid for the encoding.
    pub fn decode(self, body: &[u8]) -> Result<Vec<u8>> {
        match self {
            Self::Base64 => {
                // Line breaks inside base64 bodies are not significant
                let cleaned: String = String::from_utf8_lossy(body)
                    .chars()
                    .filter(|c| !c.is_whitespace())
                    .collect();
                decode_base64(&cleaned)
            }
            Self::QuotedPrintable => decode_quoted_printable(&String::from_utf8_lossy(body)),
            Self::SevenBit | Self::EightBit | Self::Binary => Ok(body.to_vec()),
        }
    }
}

impl fmt::Display for TransferEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SevenBit => write!(f, "7bit"),
            Self::EightBit => write!(f, "8bit"),
            Self::Base64 => write!(f, "base64"),
            Self::QuotedPrintable => write!(f, "quoted-printable"),
            Self::Binary => write!(f, "binary"),
        }
    }
}

/// Decodes Base64 data.
///
/// # Errors
///
/// Returns an error if the input is not valid Base64.
pub fn decode_base64(data: &str) -> Result<Vec<u8>> {
    STANDARD.decode(data).map_err(Into::into)
}

/// Decodes Quoted-Printable text (RFC 2045) into raw bytes.
///
/// # Errors
///
/// Returns an error if the input contains invalid escape sequences.
pub fn decode_quoted_printable(text: &str) -> Result<Vec<u8>> {
    let bytes = text.as_bytes();
    let mut result = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'=' {
            result.push(bytes[i]);
            i += 1;
            continue;
        }

        // Soft line break
        match bytes.get(i + 1..) {
            Some([b'\r', b'\n', ..]) => {
                i += 3;
                continue;
            }
            Some([b'\n', ..]) => {
                i += 2;
                continue;
            }
            _ => {}
        }

        let hex = bytes
            .get(i + 1..i + 3)
            .ok_or_else(|| Error::InvalidEncoding("Incomplete escape sequence".to_string()))?;
        let hex = std::str::from_utf8(hex)
            .map_err(|e| Error::InvalidEncoding(format!("Invalid hex: {e}")))?;
        let byte = u8::from_str_radix(hex, 16)
            .map_err(|e| Error::InvalidEncoding(format!("Invalid hex: {e}")))?;
        result.push(byte);
        i += 3;
    }

    Ok(result)
}

/// Converts decoded bytes into text for the given charset.
///
/// UTF-8 and US-ASCII are decoded strictly; ISO-8859-1 maps bytes to code
/// points. Anything else is decoded lossily as UTF-8.
///
/// # Errors
///
/// Returns an error if UTF-8 or US-ASCII input is not valid UTF-8.
pub fn bytes_to_text(bytes: Vec<u8>, charset: Option<&str>) -> Result<String> {
    let charset = charset.unwrap_or("us-ascii").to_ascii_lowercase();
    if matches!(charset.as_str(), "utf-8" | "utf8" | "us-ascii" | "ascii") {
        return String::from_utf8(bytes).map_err(|source| Error::Charset { charset, source });
    }
    if matches!(charset.as_str(), "iso-8859-1" | "latin1" | "latin-1") {
        return Ok(bytes.into_iter().map(char::from).collect());
    }
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Decodes every RFC 2047 encoded word in a header value.
///
/// Format: `=?charset?encoding?encoded-text?=`. Whitespace between two
/// adjacent encoded words is dropped; all other text is kept as is.
///
/// # Errors
///
/// Returns an error if an encoded word uses an unknown encoding or carries
/// invalid data.
pub fn decode_rfc2047(text: &str) -> Result<String> {
    let mut result = String::with_capacity(text.len());
    let mut rest = text;
    let mut pending_space = String::new();
    let mut after_word = false;

    while let Some(start) = rest.find("=?") {
        let (before, candidate) = rest.split_at(start);
        let Some((word, consumed)) = split_encoded_word(candidate) else {
            result.push_str(&pending_space);
            pending_space.clear();
            result.push_str(before);
            result.push_str("=?");
            rest = &candidate[2..];
            after_word = false;
            continue;
        };

        // Adjacent encoded words join without the separating space
        if !(after_word && before.chars().all(char::is_whitespace)) {
            result.push_str(&pending_space);
            result.push_str(before);
        }
        pending_space.clear();

        result.push_str(&decode_encoded_word(word)?);
        rest = &candidate[consumed..];
        after_word = true;

        let trimmed = rest.trim_start();
        pending_space.push_str(&rest[..rest.len() - trimmed.len()]);
        rest = trimmed;
    }

    result.push_str(&pending_space);
    result.push_str(rest);
    Ok(result)
}

/// Splits `=?charset?enc?text?=` off the front of `s`.
///
/// Returns the inner `charset?enc?text` and the byte length consumed.
fn split_encoded_word(s: &str) -> Option<(&str, usize)> {
    let inner = s.strip_prefix("=?")?;
    let first = inner.find('?')?;
    let second = first + 1 + inner[first + 1..].find('?')?;
    let end = second + 1 + inner[second + 1..].find("?=")?;
    let word = &inner[..end];
    if word.contains(char::is_whitespace) {
        return None;
    }
    Some((word, end + 4))
}

fn decode_encoded_word(word: &str) -> Result<String> {
    let mut fields = word.splitn(3, '?');
    let (Some(charset), Some(encoding), Some(encoded)) = (fields.next(), fields.next(), fields.next())
    else {
        return Err(Error::InvalidEncoding(
            "Invalid RFC 2047 format".to_string(),
        ));
    };

    // RFC 2231 language suffix: charset*language
    let charset = charset.split('*').next().unwrap_or(charset);

    let bytes = match encoding.to_ascii_uppercase().as_str() {
        "B" => decode_base64(encoded)?,
        "Q" => decode_quoted_printable(&encoded.replace('_', " "))?,
        other => {
            return Err(Error::InvalidEncoding(format!(
                "Unknown encoding: {other}"
            )));
        }
    };

    bytes_to_text(bytes, Some(charset))
}
