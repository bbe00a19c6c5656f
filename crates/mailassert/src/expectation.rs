//! Expected values: literal now, or computed from the fixture at run time.

use regex::Regex;
use std::fmt;

/// Boxed computation of an expected value from the per-check fixture.
pub type Deferred<F, T> = Box<dyn Fn(&F) -> T>;

/// An expected value for a check.
///
/// A `Literal` is fixed when the check is registered. A `Deferred` value is
/// computed each time the check runs, from the fixture built for that run,
/// so fixture state that only exists at run time is visible to it.
///
/// Deferred closures must return owned data; they receive the fixture by
/// reference and cannot keep borrows into it.
pub enum Expectation<F, T> {
    /// Value known at registration time.
    Literal(T),
    /// Value computed from the fixture when the check runs.
    Deferred(Deferred<F, T>),
}

impl<F: 'static, T: 'static> Expectation<F, T> {
    /// Creates a literal expectation.
    #[must_use]
    pub fn literal(value: impl Into<T>) -> Self {
        Self::Literal(value.into())
    }

    /// Creates an expectation computed from the fixture at run time.
    ///
    /// ```
    /// use mailassert::{AddressList, Expectation};
    ///
    /// struct Fixture {
    ///     owner: String,
    /// }
    ///
    /// let expected: Expectation<Fixture, AddressList> =
    ///     Expectation::deferred(|fixture: &Fixture| fixture.owner.clone()).into();
    /// assert!(expected.is_deferred());
    /// ```
    #[must_use]
    pub fn deferred(compute: impl Fn(&F) -> T + 'static) -> Self {
        Self::Deferred(Box::new(compute))
    }

    /// Converts the expected value, keeping it lazy when it is deferred.
    #[must_use]
    pub fn map<U: 'static>(self, convert: impl Fn(T) -> U + 'static) -> Expectation<F, U> {
        match self {
            Self::Literal(value) => Expectation::Literal(convert(value)),
            Self::Deferred(compute) => {
                Expectation::Deferred(Box::new(move |fixture: &F| convert(compute(fixture))))
            }
        }
    }
}

impl<F, T> Expectation<F, T> {
    /// Returns true if the value is computed at run time.
    #[must_use]
    pub const fn is_deferred(&self) -> bool {
        matches!(self, Self::Deferred(_))
    }

    /// Produces the expected value for one run.
    pub fn resolve(&self, fixture: &F) -> T
    where
        T: Clone,
    {
        match self {
            Self::Literal(value) => value.clone(),
            Self::Deferred(compute) => compute(fixture),
        }
    }

    /// Renders a literal for use in a check name; deferred values have none.
    pub fn describe(&self) -> Option<String>
    where
        T: fmt::Display,
    {
        match self {
            Self::Literal(value) => Some(value.to_string()),
            Self::Deferred(_) => None,
        }
    }
}

impl<F, T: fmt::Debug> fmt::Debug for Expectation<F, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            Self::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}

/// Something text is matched against: a substring or a regular expression.
#[derive(Debug, Clone)]
pub enum Pattern {
    /// Matches when the text contains this string.
    Text(String),
    /// Matches when the expression finds a match anywhere in the text.
    Regex(Regex),
}

impl Pattern {
    /// Compiles a regular expression pattern.
    ///
    /// # Errors
    ///
    /// Returns an error if the expression is invalid.
    pub fn regex(expr: &str) -> std::result::Result<Self, regex::Error> {
        Regex::new(expr).map(Self::Regex)
    }

    /// Tests the pattern against `text`.
    #[must_use]
    pub fn is_match(&self, text: &str) -> bool {
        match self {
            Self::Text(needle) => text.contains(needle.as_str()),
            Self::Regex(re) => re.is_match(text),
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Regex(re) => write!(f, "/{}/", re.as_str()),
        }
    }
}

impl From<&str> for Pattern {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Pattern {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&String> for Pattern {
    fn from(text: &String) -> Self {
        Self::Text(text.clone())
    }
}

impl From<Regex> for Pattern {
    fn from(re: Regex) -> Self {
        Self::Regex(re)
    }
}

/// A list of addresses compared without regard to order.
///
/// A single address converts into a one-element list and `None` into an
/// empty one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressList(pub Vec<String>);

impl AddressList {
    /// Returns the addresses as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for AddressList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.join(", "))
    }
}

impl From<&str> for AddressList {
    fn from(address: &str) -> Self {
        Self(vec![address.to_string()])
    }
}

impl From<String> for AddressList {
    fn from(address: String) -> Self {
        Self(vec![address])
    }
}

impl From<Option<String>> for AddressList {
    fn from(address: Option<String>) -> Self {
        Self(address.into_iter().collect())
    }
}

impl From<Vec<String>> for AddressList {
    fn from(addresses: Vec<String>) -> Self {
        Self(addresses)
    }
}

impl From<Vec<&str>> for AddressList {
    fn from(addresses: Vec<&str>) -> Self {
        Self(addresses.into_iter().map(String::from).collect())
    }
}

impl<const N: usize> From<[&str; N]> for AddressList {
    fn from(addresses: [&str; N]) -> Self {
        Self(addresses.into_iter().map(String::from).collect())
    }
}

/// Implements `From<$source>` for a literal `Expectation<F, $target>`.
macro_rules! literal_from {
    ($target:ty => $($source:ty),+ $(,)?) => {
        $(
            impl<F> From<$source> for Expectation<F, $target> {
                fn from(value: $source) -> Self {
                    Self::Literal(value.into())
                }
            }
        )+
    };
}

/// Implements `From<Expectation<F, $source>>` for `Expectation<F, $target>`,
/// so a deferred closure may return any type convertible to the target.
macro_rules! expectation_from {
    ($target:ty => $($source:ty),+ $(,)?) => {
        $(
            impl<F: 'static> From<Expectation<F, $source>> for Expectation<F, $target> {
                fn from(expectation: Expectation<F, $source>) -> Self {
                    expectation.map(<$target>::from)
                }
            }
        )+
    };
}

literal_from!(Pattern => &str, String, &String, Regex);
literal_from!(AddressList => &str, String, Option<String>, Vec<String>, Vec<&str>);
literal_from!(String => &str, String);

expectation_from!(Pattern => String, &'static str, Regex);
expectation_from!(AddressList => String, &'static str, Option<String>, Vec<String>, Vec<&'static str>);
expectation_from!(String => &'static str);

impl<F, const N: usize> From<[&str; N]> for Expectation<F, AddressList> {
    fn from(addresses: [&str; N]) -> Self {
        Self::Literal(addresses.into())
    }
}

impl<F> From<Pattern> for Expectation<F, Pattern> {
    fn from(pattern: Pattern) -> Self {
        Self::Literal(pattern)
    }
}

impl<F> From<AddressList> for Expectation<F, AddressList> {
    fn from(list: AddressList) -> Self {
        Self::Literal(list)
    }
}

/// Expectation for body checks.
///
/// Built from a pattern, the pattern itself names the check. Built with
/// [`BodyMatcher::named`], the name only keeps the check name unique and a
/// deferred pattern must be attached with [`BodyMatcher::deferred`];
/// without one the check fails.
pub struct BodyMatcher<F> {
    pub(crate) name: String,
    pub(crate) expectation: Option<Expectation<F, Pattern>>,
}

impl<F: 'static> BodyMatcher<F> {
    /// Starts a named matcher whose pattern is supplied later.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            expectation: None,
        }
    }

    /// Supplies the pattern, computed from the fixture at run time.
    #[must_use]
    pub fn deferred<R: Into<Pattern>>(mut self, compute: impl Fn(&F) -> R + 'static) -> Self {
        self.expectation = Some(Expectation::deferred(move |fixture: &F| compute(fixture).into()));
        self
    }
}

impl<F> From<Pattern> for BodyMatcher<F> {
    fn from(pattern: Pattern) -> Self {
        Self {
            name: pattern.to_string(),
            expectation: Some(Expectation::Literal(pattern)),
        }
    }
}

macro_rules! body_matcher_from {
    ($($source:ty),+) => {
        $(
            impl<F> From<$source> for BodyMatcher<F> {
                fn from(pattern: $source) -> Self {
                    Pattern::from(pattern).into()
                }
            }
        )+
    };
}

body_matcher_from!(&str, String, &String, Regex);
