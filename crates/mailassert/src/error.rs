//! Error types for registering and running checks.

use thiserror::Error;

/// Errors raised while building or running a suite.
#[derive(Debug, Error)]
pub enum Error {
    /// A check with the same name is already registered in the suite.
    #[error("Check already registered: {0}")]
    DuplicateCheck(String),

    /// One or more checks failed.
    #[error("{failed} of {total} checks failed\n{summary}")]
    ChecksFailed {
        /// Number of failed checks.
        failed: usize,
        /// Number of checks that ran.
        total: usize,
        /// One line per failure.
        summary: String,
    },

    /// Run configuration could not be read.
    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Why a single check did not pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Failure {
    /// Expected and actual values differ.
    #[error("expected {expected}, got {actual}")]
    Mismatch {
        /// Rendered expectation.
        expected: String,
        /// Rendered actual value.
        actual: String,
    },

    /// An item is not a member of a list.
    #[error("expected {list} to contain {item}")]
    NotFound {
        /// Rendered missing item.
        item: String,
        /// Rendered list that was searched.
        list: String,
    },

    /// The check was registered without a usable expectation.
    #[error("missing expectation: {0}")]
    MissingExpectation(String),

    /// The message under test lacks the inspected field.
    #[error("missing field: {0}")]
    MissingField(String),

    /// A boolean assertion did not hold.
    #[error("assertion failed: {0}")]
    Assertion(String),

    /// The message under test could not be read.
    #[error("unreadable message: {0}")]
    Message(#[from] mailassert_mime::Error),

    /// The check body, its fixture setup or a deferred expectation panicked.
    #[error("check panicked: {0}")]
    Panicked(String),
}

/// Outcome of one check body.
pub type CheckResult = std::result::Result<(), Failure>;
