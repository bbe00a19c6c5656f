//! MIME message structure and handling.

use crate::address::parse_address_list;
use crate::content_type::ContentType;
use crate::disposition::ContentDisposition;
use crate::encoding::{TransferEncoding, bytes_to_text, decode_rfc2047};
use crate::error::{Error, Result};
use crate::header::Headers;

/// A MIME entity: a whole message or one of its body parts.
///
/// Parts are themselves `Message`s, so a check written against a message can
/// equally be pointed at an attachment part.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Message {
    /// Message headers.
    pub headers: Headers,
    /// Raw (still transfer-encoded) body of a single-part entity.
    pub body: Option<Vec<u8>>,
    /// Child entities of a multipart entity.
    pub parts: Vec<Self>,
}

impl Message {
    /// Creates a message with headers only.
    #[must_use]
    pub const fn new(headers: Headers) -> Self {
        Self {
            headers,
            body: None,
            parts: Vec::new(),
        }
    }

    /// Creates a single-part message.
    #[must_use]
    pub const fn single_part(headers: Headers, body: Vec<u8>) -> Self {
        Self {
            headers,
            body: Some(body),
            parts: Vec::new(),
        }
    }

    /// Creates a multipart message.
    #[must_use]
    pub const fn multipart(headers: Headers, parts: Vec<Self>) -> Self {
        Self {
            headers,
            body: None,
            parts,
        }
    }

    /// Adds a header value.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.add(name, value);
        self
    }

    /// Sets the single-part body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Appends a child part.
    #[must_use]
    pub fn with_part(mut self, part: Self) -> Self {
        self.parts.push(part);
        self
    }

    /// Parses a raw RFC 5322 message.
    ///
    /// Multipart bodies are split recursively. When the Content-Type header
    /// is missing, the RFC 2045 default `text/plain; charset=us-ascii` is
    /// recorded so that every parsed entity carries a readable content type.
    ///
    /// # Errors
    ///
    /// Returns an error if the headers are malformed, a multipart entity has
    /// no boundary, or the boundary never occurs in the body.
    pub fn parse(raw: &str) -> Result<Self> {
        let (header_block, body) = split_head_body(raw);
        let mut headers = Headers::parse(header_block)?;

        if !headers.contains("content-type") {
            headers.set("content-type", ContentType::rfc2045_default().to_string());
        }

        let content_type = ContentType::parse(headers.get("content-type").unwrap_or_default())?;
        if !content_type.is_multipart() {
            return Ok(Self::single_part(headers, body.as_bytes().to_vec()));
        }

        let boundary = content_type
            .boundary()
            .ok_or_else(|| Error::MissingBoundary(content_type.mime_type()))?;
        let parts = split_multipart(body, boundary)?
            .into_iter()
            .map(Self::parse)
            .collect::<Result<Vec<_>>>()?;

        tracing::trace!(
            content_type = %content_type.mime_type(),
            parts = parts.len(),
            "parsed multipart entity"
        );

        Ok(Self::multipart(headers, parts))
    }

    /// Gets the parsed Content-Type header, if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the header is present but malformed.
    pub fn content_type(&self) -> Result<Option<ContentType>> {
        self.headers
            .get("content-type")
            .map(ContentType::parse)
            .transpose()
    }

    /// Gets the parsed Content-Disposition header, if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the header is present but malformed.
    pub fn content_disposition(&self) -> Result<Option<ContentDisposition>> {
        self.headers
            .get("content-disposition")
            .map(ContentDisposition::parse)
            .transpose()
    }

    /// Gets the transfer encoding, defaulting to 7bit.
    #[must_use]
    pub fn transfer_encoding(&self) -> TransferEncoding {
        self.headers
            .get("content-transfer-encoding")
            .map_or(TransferEncoding::SevenBit, TransferEncoding::parse)
    }

    /// Checks if this is a multipart entity.
    #[must_use]
    pub fn is_multipart(&self) -> bool {
        !self.parts.is_empty()
            || matches!(self.content_type(), Ok(Some(ct)) if ct.is_multipart())
    }

    /// Number of direct child parts.
    #[must_use]
    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    /// Gets a direct child part by index.
    #[must_use]
    pub fn part(&self, index: usize) -> Option<&Self> {
        self.parts.get(index)
    }

    /// Gets the Subject header with RFC 2047 encoded words decoded.
    ///
    /// A subject whose encoded words cannot be decoded is returned raw.
    #[must_use]
    pub fn subject(&self) -> Option<String> {
        self.headers
            .get("subject")
            .map(|s| decode_rfc2047(s).unwrap_or_else(|_| s.to_string()))
    }

    /// Addresses in the To header(s), empty when absent.
    ///
    /// # Errors
    ///
    /// Returns an error if a To header is not an address list.
    pub fn to(&self) -> Result<Vec<String>> {
        self.addresses("to")
    }

    /// Addresses in the From header(s).
    ///
    /// # Errors
    ///
    /// Returns an error if a From header is not an address list.
    pub fn from(&self) -> Result<Vec<String>> {
        self.addresses("from")
    }

    /// Addresses in the Reply-To header(s).
    ///
    /// # Errors
    ///
    /// Returns an error if a Reply-To header is not an address list.
    pub fn reply_to(&self) -> Result<Vec<String>> {
        self.addresses("reply-to")
    }

    /// Addresses in the Cc header(s).
    ///
    /// # Errors
    ///
    /// Returns an error if a Cc header is not an address list.
    pub fn cc(&self) -> Result<Vec<String>> {
        self.addresses("cc")
    }

    /// Addresses in the Bcc header(s).
    ///
    /// # Errors
    ///
    /// Returns an error if a Bcc header is not an address list.
    pub fn bcc(&self) -> Result<Vec<String>> {
        self.addresses("bcc")
    }

    fn addresses(&self, name: &str) -> Result<Vec<String>> {
        let mut addresses = Vec::new();
        for value in self.headers.get_all(name) {
            addresses.extend(parse_address_list(value)?);
        }
        Ok(addresses)
    }

    /// Gets the Message-ID header.
    #[must_use]
    pub fn message_id(&self) -> Option<&str> {
        self.headers.get("message-id")
    }

    /// Gets the Date header.
    #[must_use]
    pub fn date(&self) -> Option<&str> {
        self.headers.get("date")
    }

    /// Body bytes with the transfer encoding removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not valid for its transfer encoding.
    pub fn decoded_body(&self) -> Result<Vec<u8>> {
        self.body
            .as_deref()
            .map_or_else(|| Ok(Vec::new()), |body| self.transfer_encoding().decode(body))
    }

    /// Gets the body as text.
    ///
    /// For a single-part entity this is the decoded body in its charset. For
    /// a multipart entity it is every inline text leaf, in order, joined by
    /// newlines.
    ///
    /// # Errors
    ///
    /// Returns an error if a body cannot be decoded.
    pub fn body_text(&self) -> Result<String> {
        if self.parts.is_empty() {
            let charset = self.content_type()?.and_then(|ct| ct.charset().map(String::from));
            return bytes_to_text(self.decoded_body()?, charset.as_deref());
        }

        let mut texts = Vec::new();
        for part in &self.parts {
            if part.is_attachment() {
                continue;
            }
            let is_text = part.content_type()?.is_none_or(|ct| ct.is_text());
            if part.is_multipart() || is_text {
                texts.push(part.body_text()?);
            }
        }
        Ok(texts.join("\n"))
    }

    /// Checks if this entity is marked as an attachment.
    #[must_use]
    pub fn is_attachment(&self) -> bool {
        matches!(self.content_disposition(), Ok(Some(cd)) if cd.is_attachment())
    }

    /// Filename from Content-Disposition, falling back to the Content-Type
    /// `name` parameter.
    #[must_use]
    pub fn filename(&self) -> Option<String> {
        if let Ok(Some(cd)) = self.content_disposition()
            && let Some(name) = cd.filename()
        {
            return Some(name.to_string());
        }
        self.content_type()
            .ok()
            .flatten()
            .and_then(|ct| ct.name().map(String::from))
    }

    /// All attachment entities, depth first.
    #[must_use]
    pub fn attachments(&self) -> Vec<&Self> {
        let mut found = Vec::new();
        self.collect_attachments(&mut found);
        found
    }

    fn collect_attachments<'a>(&'a self, found: &mut Vec<&'a Self>) {
        for part in &self.parts {
            if part.is_attachment() {
                found.push(part);
            }
            part.collect_attachments(found);
        }
    }
}

/// Splits raw text at the first empty line.
fn split_head_body(raw: &str) -> (&str, &str) {
    if let Some(rest) = raw.strip_prefix("\r\n") {
        return ("", rest);
    }
    if let Some(rest) = raw.strip_prefix('\n') {
        return ("", rest);
    }

    let crlf = raw.find("\r\n\r\n").map(|i| (i, i + 4));
    let lf = raw.find("\n\n").map(|i| (i, i + 2));
    let split = match (crlf, lf) {
        (Some(a), Some(b)) => Some(if a.0 <= b.0 { a } else { b }),
        (a, b) => a.or(b),
    };

    split.map_or((raw, ""), |(head_end, body_start)| {
        (&raw[..head_end], &raw[body_start..])
    })
}

/// Splits a multipart body into the raw text of each part.
///
/// The preamble and epilogue are dropped. The line break before each
/// delimiter belongs to the delimiter.
fn split_multipart<'a>(body: &'a str, boundary: &str) -> Result<Vec<&'a str>> {
    let delimiter = format!("--{boundary}");
    let mut parts = Vec::new();
    let mut part_start: Option<usize> = None;
    let mut offset = 0;
    let mut closed = false;

    for line in body.split_inclusive('\n') {
        let content = line.trim_end();
        let line_start = offset;
        offset += line.len();

        let Some(suffix) = content.strip_prefix(delimiter.as_str()) else {
            continue;
        };
        let is_close = suffix == "--";
        if !(suffix.is_empty() || is_close) {
            continue;
        }

        if let Some(start) = part_start.take() {
            parts.push(strip_trailing_newline(&body[start..line_start]));
        }
        if is_close {
            closed = true;
            break;
        }
        part_start = Some(offset);
    }

    if let Some(start) = part_start {
        tracing::debug!(boundary, "multipart body has no closing delimiter");
        parts.push(strip_trailing_newline(&body[start..]));
    }

    if parts.is_empty() && !closed {
        return Err(Error::BoundaryNotFound(boundary.to_string()));
    }

    Ok(parts)
}

fn strip_trailing_newline(s: &str) -> &str {
    s.strip_suffix("\r\n")
        .or_else(|| s.strip_suffix('\n'))
        .unwrap_or(s)
}
