//! Integration tests for parsing complete messages.

#![allow(clippy::unwrap_used)]

use mailassert_mime::{DispositionType, Message, TransferEncoding};

const ORDER_CONFIRMATION: &str = concat!(
    "Return-Path: <bounces@shop.example>\r\n",
    "From: =?UTF-8?Q?Shop_B=C3=BCro?= <orders@shop.example>\r\n",
    "To: \"Doe, Jane\" <jane@example.com>,\r\n",
    "\tbilling@example.com\r\n",
    "Reply-To: support@shop.example\r\n",
    "Subject: =?UTF-8?B?T3JkZXIg?= =?UTF-8?B?Y29uZmlybWVk?=\r\n",
    "Message-ID: <order-42@shop.example>\r\n",
    "Date: Tue, 1 Apr 2025 10:00:00 +0000\r\n",
    "MIME-Version: 1.0\r\n",
    "Content-Type: multipart/mixed; boundary=\"outer\"\r\n",
    "\r\n",
    "This is a multi-part message in MIME format.\r\n",
    "--outer\r\n",
    "Content-Type: multipart/alternative; boundary=\"inner\"\r\n",
    "\r\n",
    "--inner\r\n",
    "Content-Type: text/plain; charset=utf-8\r\n",
    "Content-Transfer-Encoding: quoted-printable\r\n",
    "\r\n",
    "Gr=C3=BC=C3=9Fe Jane,=\r\n",
    " your order shipped.\r\n",
    "--inner\r\n",
    "Content-Type: text/html; charset=utf-8\r\n",
    "\r\n",
    "<p>Your order shipped.</p>\r\n",
    "--inner--\r\n",
    "--outer\r\n",
    "Content-Type: application/pdf; name=\"invoice.pdf\"\r\n",
    "Content-Disposition: attachment\r\n",
    "Content-Transfer-Encoding: base64\r\n",
    "\r\n",
    "JVBERi0xLjQK\r\n",
    "--outer--\r\n",
    "epilogue is ignored\r\n",
);

fn order() -> Message {
    Message::parse(ORDER_CONFIRMATION).unwrap()
}

#[test]
fn test_headers() {
    let message = order();
    assert_eq!(message.subject().as_deref(), Some("Order confirmed"));
    assert_eq!(message.from().unwrap(), vec!["orders@shop.example"]);
    assert_eq!(message.to().unwrap(), vec!["jane@example.com", "billing@example.com"]);
    assert_eq!(message.reply_to().unwrap(), vec!["support@shop.example"]);
    assert!(message.cc().unwrap().is_empty());
    assert_eq!(message.message_id(), Some("<order-42@shop.example>"));
}

#[test]
fn test_structure() {
    let message = order();
    assert!(message.is_multipart());
    assert_eq!(message.part_count(), 2);

    let alternative = message.part(0).unwrap();
    assert_eq!(
        alternative.content_type().unwrap().unwrap().mime_type(),
        "multipart/alternative"
    );
    assert_eq!(alternative.part_count(), 2);
    assert!(message.part(2).is_none());
}

#[test]
fn test_body_text_skips_attachments() {
    let text = order().body_text().unwrap();
    assert!(text.starts_with("Grüße Jane, your order shipped."));
    assert!(text.contains("<p>Your order shipped.</p>"));
    assert!(!text.contains("JVBERi0"));
}

#[test]
fn test_attachment() {
    let message = order();
    let attachments = message.attachments();
    assert_eq!(attachments.len(), 1);

    let pdf = attachments[0];
    assert_eq!(pdf.transfer_encoding(), TransferEncoding::Base64);
    assert_eq!(
        pdf.content_disposition().unwrap().unwrap().disposition,
        DispositionType::Attachment
    );
    assert_eq!(pdf.filename().as_deref(), Some("invoice.pdf"));
    assert_eq!(pdf.decoded_body().unwrap(), b"%PDF-1.4\n");
}

#[test]
fn test_default_content_type_is_recorded() {
    let message = Message::parse("Subject: plain\r\n\r\nhello").unwrap();
    let content_type = message.content_type().unwrap().unwrap();
    assert_eq!(content_type.mime_type(), "text/plain");
    assert_eq!(content_type.charset(), Some("us-ascii"));
    assert_eq!(message.body_text().unwrap(), "hello");
}

#[test]
fn test_multipart_without_boundary_is_rejected() {
    assert!(Message::parse("Content-Type: multipart/mixed\r\n\r\nbody").is_err());
}
