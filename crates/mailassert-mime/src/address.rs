//! Address list extraction (RFC 5322 section 3.4).
//!
//! Only the addr-spec of each mailbox is kept: display names, comments and
//! group labels are dropped, which is what recipient assertions compare.

use crate::error::{Error, Result};
use mailparse::MailAddr;

/// Extracts the bare addresses from an address header value.
///
/// Mailboxes inside a group are flattened into the list; an empty value or
/// an empty group yields no addresses.
///
/// ```
/// use mailassert_mime::address::parse_address_list;
///
/// let list = parse_address_list("\"Doe, Jane\" <jane@example.com>, bob@example.com")?;
/// assert_eq!(list, vec!["jane@example.com", "bob@example.com"]);
/// # Ok::<(), mailassert_mime::Error>(())
/// ```
///
/// # Errors
///
/// Returns [`Error::InvalidAddress`] if the value is not an address list.
pub fn parse_address_list(value: &str) -> Result<Vec<String>> {
    if value.trim().is_empty() {
        return Ok(Vec::new());
    }

    let list = mailparse::addrparse(value)
        .map_err(|err| Error::InvalidAddress(format!("{value:?}: {err}")))?;

    Ok(list
        .iter()
        .flat_map(|addr| match addr {
            MailAddr::Single(single) => vec![single.addr.clone()],
            MailAddr::Group(group) => group.addrs.iter().map(|single| single.addr.clone()).collect(),
        })
        .collect())
}
