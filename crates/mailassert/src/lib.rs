//! # mailassert
//!
//! Declarative assertions for email produced by the code under test.
//!
//! Each assertion registers one named check on a [`Suite`]. Checks run later,
//! each against a freshly built fixture, and compare an expectation with a
//! field of the message under test. Expectations are either literals or
//! [`Expectation::deferred`] closures evaluated at run time, so they can
//! depend on fixture state that does not exist while the suite is declared.
//!
//! ## Quick Start
//!
//! ```
//! use mailassert::{Expectation, MailAssertions, MailFixture, Message, Pattern, Suite};
//!
//! struct Signup {
//!     user: String,
//!     email: Message,
//! }
//!
//! impl MailFixture for Signup {
//!     fn message(&self) -> Option<&Message> {
//!         Some(&self.email)
//!     }
//! }
//!
//! let mut suite = Suite::new("signup confirmation", || {
//!     let user = "jane@example.com".to_string();
//!     let raw = format!(
//!         "From: Shop <shop@example.com>\r\nTo: {user}\r\nSubject: Confirm your account\r\n\r\nHi!"
//!     );
//!     Signup { email: Message::parse(&raw).expect("valid message"), user }
//! });
//!
//! suite.should_have_subject(Pattern::regex(r"^Confirm")?)?;
//! suite.should_have_to_recipients(Expectation::deferred(|s: &Signup| s.user.clone()))?;
//! suite.should_have_from("shop@example.com")?;
//! suite.should_have_mime_parts(None)?;
//!
//! let report = suite.run();
//! assert_eq!(report.passed(), 3);
//! assert_eq!(report.failed(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod assertions;
mod config;
mod error;
mod expectation;
mod mail;
mod report;
mod suite;

pub use config::RunConfig;
pub use error::{CheckResult, Error, Failure, Result};
pub use expectation::{AddressList, BodyMatcher, Deferred, Expectation, Pattern};
pub use mail::{MailAssertions, MailFixture, register_list_check};
pub use mailassert_mime::{self as mime, ContentDisposition, ContentType, Message};
pub use report::{Outcome, Report};
pub use suite::{Check, CheckFn, CheckRegistry, Suite};
