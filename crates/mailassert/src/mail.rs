//! Email assertions.
//!
//! Every method registers exactly one named check; nothing is read from the
//! message until the suite runs.

use crate::assertions::{
    assert_contains, assert_equal, assert_equal_ignore_case, assert_match, assert_same_elements,
    assert_true,
};
use crate::error::{CheckResult, Failure, Result};
use crate::expectation::{AddressList, BodyMatcher, Expectation, Pattern};
use crate::suite::CheckRegistry;
use mailassert_mime::{ContentDisposition, Message};

/// Gives checks access to the message under test.
pub trait MailFixture {
    /// The message under test, or `None` if the fixture has none.
    fn message(&self) -> Option<&Message>;
}

impl MailFixture for Message {
    fn message(&self) -> Option<&Message> {
        Some(self)
    }
}

impl MailFixture for Option<Message> {
    fn message(&self) -> Option<&Message> {
        self.as_ref()
    }
}

fn current<F: MailFixture>(fixture: &F) -> std::result::Result<&Message, Failure> {
    fixture
        .message()
        .ok_or_else(|| Failure::MissingField("message under test".to_string()))
}

fn disposition(message: &Message) -> std::result::Result<ContentDisposition, Failure> {
    message
        .content_disposition()?
        .ok_or_else(|| Failure::MissingField("content-disposition".to_string()))
}

fn check_filename(message: &Message, expected: &str) -> CheckResult {
    let disposition = disposition(message)?;
    let filename = disposition
        .filename()
        .ok_or_else(|| Failure::MissingField("content-disposition filename".to_string()))?;
    assert_equal(expected, filename)
}

/// Registers one check comparing a list field against an expectation.
///
/// The expectation and the field are compared as multisets: order is
/// ignored, duplicates count.
pub fn register_list_check<F, R>(
    registry: &mut R,
    label: &str,
    accessor: fn(&Message) -> mailassert_mime::Result<Vec<String>>,
    expected: Expectation<F, AddressList>,
) -> Result<()>
where
    F: MailFixture + 'static,
    R: CheckRegistry<F> + ?Sized,
{
    let name = expected
        .describe()
        .map_or_else(|| format!("have {label}"), |list| format!("have {label} {list}"));

    registry.register(
        name,
        Box::new(move |fixture: &F| {
            let message = current(fixture)?;
            let expected = expected.resolve(fixture);
            assert_same_elements(expected.as_slice(), &accessor(message)?)
        }),
    )
}

/// Email assertions available on every registry whose fixture exposes a
/// message.
///
/// ```
/// use mailassert::{BodyMatcher, MailAssertions, Message, Suite};
///
/// let mut suite = Suite::new("welcome email", || {
///     Message::parse(
///         "From: noreply@example.com\r\n\
///          To: jane@example.com\r\n\
///          Subject: Welcome, Jane\r\n\
///          \r\n\
///          Dear Jane,\r\nthanks for joining.",
///     )
///     .expect("valid message")
/// });
///
/// suite.should_have_subject("Welcome")?;
/// suite.should_have_to_recipient("jane@example.com")?;
/// suite.should_have_from("noreply@example.com")?;
/// suite.should_match_body(BodyMatcher::named("salutation").deferred(|message: &Message| {
///     let name = message.subject().unwrap_or_default().replace("Welcome, ", "");
///     format!("Dear {name},")
/// }))?;
/// suite.should_have_mime_content_type("text/plain")?;
///
/// suite.run().assert_passed();
/// # Ok::<(), mailassert::Error>(())
/// ```
pub trait MailAssertions<F: MailFixture + 'static>: CheckRegistry<F> {
    /// Matches the subject against a substring or regex.
    ///
    /// Fails if the message has no subject.
    ///
    /// # Errors
    ///
    /// Returns an error if the check name is already registered.
    fn should_have_subject(&mut self, expected: impl Into<Expectation<F, Pattern>>) -> Result<()> {
        let expected = expected.into();
        let name = expected.describe().map_or_else(
            || "have subject".to_string(),
            |pattern| format!("have subject matching {pattern}"),
        );

        self.register(
            name,
            Box::new(move |fixture: &F| {
                let subject = current(fixture)?
                    .subject()
                    .ok_or_else(|| Failure::MissingField("subject".to_string()))?;
                assert_match(&expected.resolve(fixture), &subject)
            }),
        )
    }

    /// Asserts that an address is one of the To recipients.
    ///
    /// Deferred forms all share one check name; register several deferred
    /// recipients through [`Self::should_have_to_recipients`] instead.
    ///
    /// # Errors
    ///
    /// Returns an error if the check name is already registered.
    fn should_have_to_recipient(&mut self, expected: impl Into<Expectation<F, String>>) -> Result<()> {
        let expected = expected.into();
        let recipient = expected
            .describe()
            .unwrap_or_else(|| "some email address".to_string());

        self.register(
            format!("have {recipient} as a to recipient"),
            Box::new(move |fixture: &F| {
                let to = current(fixture)?.to()?;
                assert_contains(&to, &expected.resolve(fixture))
            }),
        )
    }

    /// Asserts that the To recipients are exactly the expected addresses,
    /// in any order.
    ///
    /// # Errors
    ///
    /// Returns an error if the check name is already registered.
    fn should_have_to_recipients(
        &mut self,
        expected: impl Into<Expectation<F, AddressList>>,
    ) -> Result<()> {
        register_list_check(self, "to recipients", Message::to, expected.into())
    }

    /// Asserts that the From addresses are exactly the expected ones.
    ///
    /// # Errors
    ///
    /// Returns an error if the check name is already registered.
    fn should_have_from(&mut self, expected: impl Into<Expectation<F, AddressList>>) -> Result<()> {
        register_list_check(self, "from", Message::from, expected.into())
    }

    /// Asserts that the Reply-To addresses are exactly the expected ones.
    ///
    /// # Errors
    ///
    /// Returns an error if the check name is already registered.
    fn should_have_reply_to(
        &mut self,
        expected: impl Into<Expectation<F, AddressList>>,
    ) -> Result<()> {
        register_list_check(self, "reply to's", Message::reply_to, expected.into())
    }

    /// Matches the body text against a pattern.
    ///
    /// A [`BodyMatcher::named`] matcher without a deferred pattern fails
    /// when run.
    ///
    /// # Errors
    ///
    /// Returns an error if the check name is already registered.
    fn should_match_body(&mut self, matcher: impl Into<BodyMatcher<F>>) -> Result<()> {
        let BodyMatcher { name, expectation } = matcher.into();

        self.register(
            format!("match body to {name}"),
            Box::new(move |fixture: &F| {
                let expected = expectation.as_ref().ok_or_else(|| {
                    Failure::MissingExpectation(format!(
                        "body matcher {name:?} needs a deferred pattern"
                    ))
                })?;
                let body = current(fixture)?.body_text()?;
                assert_match(&expected.resolve(fixture), &body)
            }),
        )
    }

    /// Asserts the number of MIME parts: exactly `count`, or at least one
    /// when `count` is `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the check name is already registered.
    fn should_have_mime_parts(&mut self, count: Option<usize>) -> Result<()> {
        let name = count.map_or_else(
            || "have mime parts".to_string(),
            |n| format!("have {n} mime parts"),
        );

        self.register(
            name,
            Box::new(move |fixture: &F| {
                let parts = current(fixture)?.part_count();
                match count {
                    Some(expected) => assert_equal(&expected, &parts),
                    None => assert_true(parts > 0, || "expected at least one mime part".to_string()),
                }
            }),
        )
    }

    /// Compares the `type/subtype` of the Content-Type header.
    ///
    /// # Errors
    ///
    /// Returns an error if the check name is already registered.
    fn should_have_mime_content_type(&mut self, content_type: impl Into<String>) -> Result<()> {
        let expected = content_type.into();

        self.register(
            format!("have mime content type {expected}"),
            Box::new(move |fixture: &F| {
                let content_type = current(fixture)?
                    .content_type()?
                    .ok_or_else(|| Failure::MissingField("content-type".to_string()))?;
                assert_equal_ignore_case(&expected, &content_type.mime_type())
            }),
        )
    }

    /// Compares the charset parameter of the Content-Type header.
    ///
    /// # Errors
    ///
    /// Returns an error if the check name is already registered.
    fn should_use_charset(&mut self, charset: impl Into<String>) -> Result<()> {
        let expected = charset.into();

        self.register(
            format!("use charset {expected}"),
            Box::new(move |fixture: &F| {
                let content_type = current(fixture)?
                    .content_type()?
                    .ok_or_else(|| Failure::MissingField("content-type".to_string()))?;
                let charset = content_type
                    .charset()
                    .ok_or_else(|| Failure::MissingField("content-type charset".to_string()))?;
                assert_equal_ignore_case(&expected, charset)
            }),
        )
    }

    /// Asserts that the Content-Disposition is `inline`.
    ///
    /// # Errors
    ///
    /// Returns an error if the check name is already registered.
    fn should_be_inline_content(&mut self) -> Result<()> {
        self.register(
            "be inline content".to_string(),
            Box::new(|fixture: &F| {
                let disposition = disposition(current(fixture)?)?;
                assert_equal("inline", disposition.disposition.as_str())
            }),
        )
    }

    /// Asserts that the Content-Disposition is `attachment`, and with a
    /// filename also that the filename parameter matches.
    ///
    /// # Errors
    ///
    /// Returns an error if the check name is already registered.
    fn should_be_attachment(&mut self, filename: Option<&str>) -> Result<()> {
        let filename = filename.map(String::from);
        let name = filename.as_ref().map_or_else(
            || "be an attachment".to_string(),
            |f| format!("be an attachment named {f}"),
        );

        self.register(
            name,
            Box::new(move |fixture: &F| {
                let message = current(fixture)?;
                assert_equal("attachment", disposition(message)?.disposition.as_str())?;
                filename
                    .as_deref()
                    .map_or(Ok(()), |expected| check_filename(message, expected))
            }),
        )
    }

    /// Compares the filename parameter of the Content-Disposition header.
    ///
    /// # Errors
    ///
    /// Returns an error if the check name is already registered.
    fn should_have_filename(&mut self, filename: impl Into<String>) -> Result<()> {
        let expected = filename.into();

        self.register(
            format!("have filename {expected}"),
            Box::new(move |fixture: &F| check_filename(current(fixture)?, &expected)),
        )
    }
}

impl<F, R> MailAssertions<F> for R
where
    F: MailFixture + 'static,
    R: CheckRegistry<F> + ?Sized,
{
}
