//! Integration tests for the email assertions.
//!
//! Fixtures are parsed from raw messages the way a mailer under test would
//! hand them over.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::cell::RefCell;
use std::rc::Rc;

use mailassert::{
    BodyMatcher, Expectation, Failure, MailAssertions, MailFixture, Message, Pattern, Report,
    RunConfig, Suite,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

const PLAIN: &str = concat!(
    "From: \"Mom\" <mom@example.com>\r\n",
    "To: foo@bar.baz, \"Ma Pa\" <ma@pa.biz>\r\n",
    "Reply-To: replies@example.com\r\n",
    "Subject: Hello world\r\n",
    "Content-Type: text/plain; charset=utf-8\r\n",
    "\r\n",
    "Dear John,\r\n",
    "how are you?\r\n",
    "Sincerely,\nYour Mom\r\n",
);

const MIXED: &str = concat!(
    "From: reports@example.com\r\n",
    "To: boss@example.com\r\n",
    "Subject: Monthly report\r\n",
    "Content-Type: multipart/mixed; boundary=\"sep\"\r\n",
    "\r\n",
    "--sep\r\n",
    "Content-Type: text/plain; charset=us-ascii\r\n",
    "Content-Disposition: inline\r\n",
    "\r\n",
    "Report attached.\r\n",
    "--sep\r\n",
    "Content-Type: application/pdf\r\n",
    "Content-Disposition: attachment; filename=\"file.pdf\"\r\n",
    "Content-Transfer-Encoding: base64\r\n",
    "\r\n",
    "JVBERi0xLjQ=\r\n",
    "--sep--\r\n",
);

fn plain() -> Message {
    Message::parse(PLAIN).expect("valid plain message")
}

fn mixed() -> Message {
    Message::parse(MIXED).expect("valid multipart message")
}

fn run_one(setup: fn() -> Message, register: impl FnOnce(&mut Suite<Message>)) -> Report {
    init_tracing();
    let mut suite = Suite::new("mailer", setup);
    register(&mut suite);
    assert_eq!(suite.len(), 1);
    suite.run()
}

fn passes(setup: fn() -> Message, register: impl FnOnce(&mut Suite<Message>)) -> bool {
    run_one(setup, register).is_success()
}

#[test]
fn subject_matches_exact_text_and_regex() {
    assert!(passes(plain, |s| s.should_have_subject("Hello world").unwrap()));
    assert!(passes(plain, |s| {
        s.should_have_subject(Pattern::regex(r"^Hello \w+$").unwrap()).unwrap();
    }));
    assert!(passes(plain, |s| s.should_have_subject("world").unwrap()));
    assert!(!passes(plain, |s| s.should_have_subject("Goodbye").unwrap()));
}

#[test]
fn subject_fails_when_missing() {
    let report = run_one(
        || Message::parse("To: a@example.com\r\n\r\nbody").unwrap(),
        |s| s.should_have_subject("anything").unwrap(),
    );
    assert_eq!(
        report.outcomes()[0].result,
        Err(Failure::MissingField("subject".to_string()))
    );
}

#[test]
fn to_recipient_is_membership() {
    assert!(passes(plain, |s| s.should_have_to_recipient("foo@bar.baz").unwrap()));
    assert!(passes(plain, |s| s.should_have_to_recipient("ma@pa.biz").unwrap()));
    assert!(!passes(plain, |s| s.should_have_to_recipient("nobody@bar.baz").unwrap()));
}

#[test]
fn to_recipient_fails_without_to_list() {
    let report = run_one(
        || Message::parse("Subject: x\r\n\r\nbody").unwrap(),
        |s| s.should_have_to_recipient("foo@bar.baz").unwrap(),
    );
    assert!(matches!(
        report.outcomes()[0].result,
        Err(Failure::NotFound { .. })
    ));
}

#[test]
fn to_recipients_is_order_independent_and_duplicate_sensitive() {
    assert!(passes(plain, |s| {
        s.should_have_to_recipients(["ma@pa.biz", "foo@bar.baz"]).unwrap();
    }));
    assert!(!passes(plain, |s| s.should_have_to_recipients("foo@bar.baz").unwrap()));
    assert!(!passes(plain, |s| {
        s.should_have_to_recipients(["foo@bar.baz", "ma@pa.biz", "foo@bar.baz"])
            .unwrap();
    }));
}

#[test]
fn recipient_comments_are_not_part_of_the_address() {
    let commented = || {
        Message::default()
            .with_header("To", r"jane@example.com (Jane \(work\))")
            .with_body("hi")
    };
    assert!(passes(commented, |s| s.should_have_to_recipients("jane@example.com").unwrap()));
    assert!(passes(commented, |s| s.should_have_to_recipient("jane@example.com").unwrap()));
}

#[test]
fn malformed_recipient_header_fails_the_check() {
    let report = run_one(
        || {
            Message::default()
                .with_header("To", "Jane <jane@example.com")
                .with_body("hi")
        },
        |s| s.should_have_to_recipients("jane@example.com").unwrap(),
    );
    assert!(matches!(
        report.outcomes()[0].result,
        Err(Failure::Message(mailassert::mime::Error::InvalidAddress(_)))
    ));
}

#[test]
fn deferred_to_recipient_may_return_static_str() {
    assert!(passes(plain, |s| {
        s.should_have_to_recipient(Expectation::deferred(|_: &Message| "ma@pa.biz"))
            .unwrap();
    }));
}

#[test]
fn from_and_reply_to_coerce_single_addresses() {
    assert!(passes(plain, |s| s.should_have_from("mom@example.com").unwrap()));
    assert!(passes(plain, |s| s.should_have_from(vec!["mom@example.com"]).unwrap()));
    assert!(passes(plain, |s| s.should_have_reply_to("replies@example.com").unwrap()));
    assert!(!passes(plain, |s| s.should_have_reply_to("mom@example.com").unwrap()));
}

#[test]
fn absent_list_field_is_an_empty_list() {
    assert!(passes(mixed, |s| s.should_have_reply_to(Vec::<String>::new()).unwrap()));
    assert!(passes(mixed, |s| {
        s.should_have_reply_to(Expectation::deferred(|_: &Message| None::<String>))
            .unwrap();
    }));
}

#[test]
fn body_matches_patterns() {
    assert!(passes(plain, |s| s.should_match_body("Dear John,").unwrap()));
    assert!(passes(plain, |s| {
        s.should_match_body(Pattern::regex(r"Sincerely,\nYour Mom").unwrap())
            .unwrap();
    }));
    assert!(!passes(plain, |s| s.should_match_body("Dear Jane").unwrap()));
    assert!(passes(mixed, |s| s.should_match_body("Report attached.").unwrap()));
}

#[test]
fn named_body_matchers_keep_names_unique() {
    init_tracing();
    let mut suite = Suite::new("mailer", plain);
    suite
        .should_match_body(BodyMatcher::named("salutation").deferred(|_: &Message| "Dear John"))
        .unwrap();
    suite
        .should_match_body(BodyMatcher::named("signature").deferred(|_: &Message| "Your Mom"))
        .unwrap();
    suite.should_match_body(BodyMatcher::named("closing")).unwrap();

    let report = suite.run();
    assert!(report.outcome("match body to salutation").unwrap().passed());
    assert!(report.outcome("match body to signature").unwrap().passed());
    assert!(matches!(
        report.outcome("match body to closing").unwrap().result,
        Err(Failure::MissingExpectation(_))
    ));
}

#[test]
fn mime_parts_counting() {
    assert!(passes(mixed, |s| s.should_have_mime_parts(None).unwrap()));
    assert!(passes(mixed, |s| s.should_have_mime_parts(Some(2)).unwrap()));
    assert!(!passes(mixed, |s| s.should_have_mime_parts(Some(1)).unwrap()));
    assert!(!passes(mixed, |s| s.should_have_mime_parts(Some(3)).unwrap()));
    assert!(!passes(plain, |s| s.should_have_mime_parts(None).unwrap()));
}

#[test]
fn mime_content_type_and_charset() {
    assert!(passes(plain, |s| s.should_have_mime_content_type("text/plain").unwrap()));
    assert!(!passes(mixed, |s| s.should_have_mime_content_type("text/plain").unwrap()));
    assert!(passes(mixed, |s| s.should_have_mime_content_type("multipart/mixed").unwrap()));
    assert!(passes(plain, |s| s.should_use_charset("UTF-8").unwrap()));
    assert!(!passes(plain, |s| s.should_use_charset("iso-8859-1").unwrap()));
}

#[test]
fn content_type_defaults_for_parsed_messages() {
    let bare = || Message::parse("Subject: bare\r\n\r\nbody").unwrap();
    assert!(passes(bare, |s| s.should_have_mime_content_type("text/plain").unwrap()));
    assert!(passes(bare, |s| s.should_use_charset("us-ascii").unwrap()));
}

fn text_part() -> Message {
    mixed().parts[0].clone()
}

fn pdf_part() -> Message {
    mixed().parts[1].clone()
}

#[test]
fn inline_content() {
    assert!(passes(text_part, |s| s.should_be_inline_content().unwrap()));
    assert!(!passes(pdf_part, |s| s.should_be_inline_content().unwrap()));
}

#[test]
fn attachment_with_filename() {
    assert!(passes(pdf_part, |s| s.should_be_attachment(None).unwrap()));
    assert!(passes(pdf_part, |s| s.should_be_attachment(Some("file.pdf")).unwrap()));
    assert!(!passes(pdf_part, |s| s.should_be_attachment(Some("other.pdf")).unwrap()));
    assert!(passes(pdf_part, |s| s.should_have_filename("file.pdf").unwrap()));

    let inline_named = || {
        Message::default()
            .with_header("Content-Disposition", "inline; filename=\"file.pdf\"")
            .with_body("x")
    };
    assert!(passes(inline_named, |s| s.should_have_filename("file.pdf").unwrap()));
    assert!(!passes(inline_named, |s| s.should_be_attachment(Some("file.pdf")).unwrap()));
}

struct Delivery {
    recipient: String,
    email: Option<Message>,
}

impl MailFixture for Delivery {
    fn message(&self) -> Option<&Message> {
        self.email.as_ref()
    }
}

#[test]
fn deferred_expectations_see_state_created_after_registration() {
    init_tracing();
    let next_user = Rc::new(RefCell::new(String::from("early@example.com")));
    let source = Rc::clone(&next_user);

    let mut suite = Suite::new("delivery", move || {
        let recipient = source.borrow().clone();
        let raw = format!("To: {recipient}\r\nSubject: Hi\r\n\r\nHello {recipient}");
        Delivery {
            email: Some(Message::parse(&raw).expect("valid message")),
            recipient,
        }
    });

    suite
        .should_have_to_recipients(Expectation::deferred(|d: &Delivery| d.recipient.clone()))
        .unwrap();
    suite
        .should_match_body(
            BodyMatcher::named("greeting").deferred(|d: &Delivery| format!("Hello {}", d.recipient)),
        )
        .unwrap();

    // Changed after registration, before the run
    *next_user.borrow_mut() = "late@example.com".to_string();

    let report = suite.run();
    report.assert_passed();
    assert_eq!(report.passed(), 2);
}

#[test]
fn failures_do_not_stop_other_checks() {
    init_tracing();
    let mut suite = Suite::new("mailer", plain);
    suite.should_have_subject("Goodbye").unwrap();
    suite.should_have_from("nobody@example.com").unwrap();
    suite.should_have_to_recipient("foo@bar.baz").unwrap();
    suite
        .should_have_to_recipient(Expectation::deferred(|_: &Message| -> String {
            panic!("deferred blew up")
        }))
        .unwrap();

    let report = suite.run();
    assert_eq!(report.total(), 4);
    assert_eq!(report.failed(), 3);
    assert!(report.outcome("have foo@bar.baz as a to recipient").unwrap().passed());
    assert!(report.clone().into_result().is_err());
    assert!(report.summary().contains("mailer should have subject matching Goodbye"));
}

#[test]
fn run_config_filters_checks() {
    init_tracing();
    let mut suite = Suite::new("mailer", plain);
    suite.should_have_subject("Goodbye").unwrap();
    suite.should_have_to_recipient("foo@bar.baz").unwrap();

    let config = RunConfig::from_json(r#"{ "filter": "to recipient" }"#).unwrap();
    let report = suite.run_with(&config);
    assert_eq!(report.total(), 1);
    assert_eq!(report.skipped(), 1);
    report.assert_passed();
}
