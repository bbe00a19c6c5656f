//! Content-Disposition handling (RFC 2183).

use crate::error::{Error, Result};
use crate::header::split_parameters;
use std::collections::HashMap;
use std::fmt;

/// Disposition type of a body part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispositionType {
    /// Displayed as part of the message.
    Inline,
    /// Offered as a separate file.
    Attachment,
    /// Any other (extension) disposition, lowercased.
    Other(String),
}

impl DispositionType {
    fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "inline" => Self::Inline,
            "attachment" => Self::Attachment,
            other => Self::Other(other.to_string()),
        }
    }

    /// Returns the disposition as it appears in the header.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Inline => "inline",
            Self::Attachment => "attachment",
            Self::Other(s) => s,
        }
    }
}

/// Parsed Content-Disposition header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentDisposition {
    /// Disposition type.
    pub disposition: DispositionType,
    /// Parameters such as `filename` or `size`.
    pub parameters: HashMap<String, String>,
}

impl ContentDisposition {
    /// Creates an inline disposition.
    #[must_use]
    pub fn inline() -> Self {
        Self {
            disposition: DispositionType::Inline,
            parameters: HashMap::new(),
        }
    }

    /// Creates an attachment disposition with a filename.
    #[must_use]
    pub fn attachment(filename: impl Into<String>) -> Self {
        let mut parameters = HashMap::new();
        parameters.insert("filename".to_string(), filename.into());
        Self {
            disposition: DispositionType::Attachment,
            parameters,
        }
    }

    /// Returns the filename parameter if present.
    #[must_use]
    pub fn filename(&self) -> Option<&str> {
        self.parameters.get("filename").map(String::as_str)
    }

    /// Checks if the disposition is `inline`.
    #[must_use]
    pub fn is_inline(&self) -> bool {
        self.disposition == DispositionType::Inline
    }

    /// Checks if the disposition is `attachment`.
    #[must_use]
    pub fn is_attachment(&self) -> bool {
        self.disposition == DispositionType::Attachment
    }

    /// Parses a Content-Disposition value.
    ///
    /// # Errors
    ///
    /// Returns an error if the disposition type is empty or not a token.
    pub fn parse(s: &str) -> Result<Self> {
        let (primary, parameters) = split_parameters(s);
        if primary.is_empty() || primary.contains(|c: char| c.is_whitespace() || c == '/') {
            return Err(Error::InvalidDisposition(s.to_string()));
        }

        Ok(Self {
            disposition: DispositionType::parse(&primary),
            parameters,
        })
    }
}

impl fmt::Display for ContentDisposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.disposition.as_str())?;
        let mut params: Vec<_> = self.parameters.iter().collect();
        params.sort();
        for (key, value) in params {
            write!(f, "; {key}=\"{value}\"")?;
        }
        Ok(())
    }
}
