//! Assertion primitives used by check bodies.
//!
//! Each primitive returns a [`Failure`] instead of panicking, so the runner
//! can record it and carry on with the next check.

use crate::error::{CheckResult, Failure};
use crate::expectation::Pattern;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

/// Asserts that `pattern` matches `actual`.
///
/// # Errors
///
/// Returns [`Failure::Mismatch`] if it does not.
pub fn assert_match(pattern: &Pattern, actual: &str) -> CheckResult {
    if pattern.is_match(actual) {
        Ok(())
    } else {
        Err(Failure::Mismatch {
            expected: format!("match for {pattern}"),
            actual: format!("{actual:?}"),
        })
    }
}

/// Asserts that both slices hold the same elements with the same
/// multiplicities, in any order.
///
/// # Errors
///
/// Returns [`Failure::Mismatch`] if they differ.
pub fn assert_same_elements<T: Eq + Hash + Debug>(expected: &[T], actual: &[T]) -> CheckResult {
    fn counts<T: Eq + Hash>(items: &[T]) -> HashMap<&T, usize> {
        let mut counts = HashMap::with_capacity(items.len());
        for item in items {
            *counts.entry(item).or_insert(0) += 1;
        }
        counts
    }

    if expected.len() == actual.len() && counts(expected) == counts(actual) {
        Ok(())
    } else {
        Err(Failure::Mismatch {
            expected: format!("same elements as {expected:?}"),
            actual: format!("{actual:?}"),
        })
    }
}

/// Asserts that `item` is an element of `list`.
///
/// # Errors
///
/// Returns [`Failure::NotFound`] if it is not.
pub fn assert_contains<T: PartialEq + Debug>(list: &[T], item: &T) -> CheckResult {
    if list.contains(item) {
        Ok(())
    } else {
        Err(Failure::NotFound {
            item: format!("{item:?}"),
            list: format!("{list:?}"),
        })
    }
}

/// Asserts that two values are equal.
///
/// # Errors
///
/// Returns [`Failure::Mismatch`] if they differ.
pub fn assert_equal<T: PartialEq + Debug + ?Sized>(expected: &T, actual: &T) -> CheckResult {
    if expected == actual {
        Ok(())
    } else {
        Err(Failure::Mismatch {
            expected: format!("{expected:?}"),
            actual: format!("{actual:?}"),
        })
    }
}

/// Asserts that two strings are equal ignoring ASCII case.
///
/// # Errors
///
/// Returns [`Failure::Mismatch`] if they differ.
pub fn assert_equal_ignore_case(expected: &str, actual: &str) -> CheckResult {
    if expected.eq_ignore_ascii_case(actual) {
        Ok(())
    } else {
        Err(Failure::Mismatch {
            expected: format!("{expected:?}"),
            actual: format!("{actual:?}"),
        })
    }
}

/// Asserts that `condition` holds; `message` describes the failure.
///
/// # Errors
///
/// Returns [`Failure::Assertion`] if the condition is false.
pub fn assert_true(condition: bool, message: impl FnOnce() -> String) -> CheckResult {
    if condition {
        Ok(())
    } else {
        Err(Failure::Assertion(message()))
    }
}
