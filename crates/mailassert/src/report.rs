//! Results of running a suite.

use crate::error::{CheckResult, Error, Failure, Result};
use std::fmt;

/// Result of one check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// Check name, without the suite prefix.
    pub name: String,
    /// Pass, or the reason it failed.
    pub result: CheckResult,
}

impl Outcome {
    /// Returns true if the check passed.
    #[must_use]
    pub const fn passed(&self) -> bool {
        self.result.is_ok()
    }

    /// Returns the failure, if any.
    #[must_use]
    pub const fn failure(&self) -> Option<&Failure> {
        match &self.result {
            Ok(()) => None,
            Err(failure) => Some(failure),
        }
    }
}

/// Outcomes of one suite run, in registration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    suite: String,
    outcomes: Vec<Outcome>,
    skipped: usize,
}

impl Report {
    pub(crate) const fn new(suite: String, outcomes: Vec<Outcome>, skipped: usize) -> Self {
        Self {
            suite,
            outcomes,
            skipped,
        }
    }

    /// Name of the suite that ran.
    #[must_use]
    pub fn suite(&self) -> &str {
        &self.suite
    }

    /// All outcomes.
    #[must_use]
    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcomes
    }

    /// Looks up the outcome of a check by name.
    #[must_use]
    pub fn outcome(&self, name: &str) -> Option<&Outcome> {
        self.outcomes.iter().find(|o| o.name == name)
    }

    /// Outcomes of failed checks.
    pub fn failures(&self) -> impl Iterator<Item = &Outcome> {
        self.outcomes.iter().filter(|o| !o.passed())
    }

    /// Number of checks that ran.
    #[must_use]
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    /// Number of passed checks.
    #[must_use]
    pub fn passed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.passed()).count()
    }

    /// Number of failed checks.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.total() - self.passed()
    }

    /// Number of checks not run because of a filter or fail-fast.
    #[must_use]
    pub const fn skipped(&self) -> usize {
        self.skipped
    }

    /// Returns true if no check failed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures().next().is_none()
    }

    /// One line per failed check: `<suite> should <check>: <failure>`.
    #[must_use]
    pub fn summary(&self) -> String {
        self.failures()
            .filter_map(|o| {
                o.failure()
                    .map(|failure| format!("{} should {}: {failure}", self.suite, o.name))
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Converts the report into an error if any check failed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ChecksFailed`] listing every failure.
    pub fn into_result(self) -> Result<()> {
        if self.is_success() {
            return Ok(());
        }
        Err(Error::ChecksFailed {
            failed: self.failed(),
            total: self.total(),
            summary: self.summary(),
        })
    }

    /// Panics with the summary if any check failed.
    ///
    /// # Panics
    ///
    /// Panics when at least one check failed.
    #[track_caller]
    pub fn assert_passed(&self) {
        assert!(
            self.is_success(),
            "{} of {} checks failed\n{}",
            self.failed(),
            self.total(),
            self.summary()
        );
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for outcome in &self.outcomes {
            match &outcome.result {
                Ok(()) => writeln!(f, "ok     {} should {}", self.suite, outcome.name)?,
                Err(failure) => writeln!(
                    f,
                    "FAILED {} should {}: {failure}",
                    self.suite, outcome.name
                )?,
            }
        }
        write!(
            f,
            "{} passed; {} failed; {} skipped",
            self.passed(),
            self.failed(),
            self.skipped
        )
    }
}
