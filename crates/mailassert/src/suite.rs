//! Named checks, their registration and their execution.

use crate::config::RunConfig;
use crate::error::{CheckResult, Error, Failure, Result};
use crate::report::{Outcome, Report};
use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

/// Body of a check: inspects the fixture built for this run.
pub type CheckFn<F> = Box<dyn Fn(&F) -> CheckResult>;

/// Host primitive: registers a named check to run later.
///
/// Every mail assertion is implemented on top of this trait, so any test
/// harness able to store and run named closures can host them.
pub trait CheckRegistry<F> {
    /// Registers `body` under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateCheck`] if `name` is already registered.
    fn register(&mut self, name: String, body: CheckFn<F>) -> Result<()>;
}

/// A registered check.
pub struct Check<F> {
    name: String,
    body: CheckFn<F>,
}

impl<F> Check<F> {
    /// Name of the check.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Runs the check against `fixture`, turning a panic into a failure.
    pub fn run(&self, fixture: &F) -> CheckResult {
        panic::catch_unwind(AssertUnwindSafe(|| (self.body)(fixture)))
            .unwrap_or_else(|payload| Err(Failure::Panicked(panic_message(payload.as_ref()))))
    }
}

impl<F> fmt::Debug for Check<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Check").field("name", &self.name).finish_non_exhaustive()
    }
}

/// A named group of checks sharing one fixture factory.
///
/// Every check runs against a freshly built fixture, so checks cannot
/// observe each other and may run in any order.
pub struct Suite<F> {
    name: String,
    setup: Box<dyn Fn() -> F>,
    checks: Vec<Check<F>>,
}

impl<F> Suite<F> {
    /// Creates an empty suite; `setup` builds the fixture for each check.
    #[must_use]
    pub fn new(name: impl Into<String>, setup: impl Fn() -> F + 'static) -> Self {
        Self {
            name: name.into(),
            setup: Box::new(setup),
            checks: Vec::new(),
        }
    }

    /// Name of the suite.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Registered checks in registration order.
    #[must_use]
    pub fn checks(&self) -> &[Check<F>] {
        &self.checks
    }

    /// Names of the registered checks.
    pub fn check_names(&self) -> impl Iterator<Item = &str> {
        self.checks.iter().map(Check::name)
    }

    /// Number of registered checks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.checks.len()
    }

    /// Returns true if no check is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// Runs the checks with the configuration read from
    /// [`RunConfig::ENV_VAR`].
    ///
    /// Malformed configuration is logged and the defaults are used instead.
    #[must_use]
    pub fn run(&self) -> Report {
        let config = RunConfig::from_env().unwrap_or_else(|err| {
            tracing::warn!(var = RunConfig::ENV_VAR, %err, "ignoring malformed run configuration");
            RunConfig::default()
        });
        self.run_with(&config)
    }

    /// Runs the checks selected by `config`.
    ///
    /// A failing or panicking check never prevents the others from running
    /// unless `config.fail_fast` is set.
    #[must_use]
    pub fn run_with(&self, config: &RunConfig) -> Report {
        let mut outcomes = Vec::with_capacity(self.checks.len());
        let mut skipped = 0;
        let mut stopped = false;

        for check in &self.checks {
            if stopped || !config.selects(&check.name) {
                skipped += 1;
                continue;
            }

            let result = panic::catch_unwind(AssertUnwindSafe(|| (self.setup)()))
                .map_err(|payload| {
                    Failure::Panicked(format!("fixture setup: {}", panic_message(payload.as_ref())))
                })
                .and_then(|fixture| check.run(&fixture));

            match &result {
                Ok(()) => tracing::trace!(suite = %self.name, check = %check.name, "check passed"),
                Err(failure) => {
                    tracing::warn!(suite = %self.name, check = %check.name, %failure, "check failed");
                }
            }

            stopped = config.fail_fast && result.is_err();
            outcomes.push(Outcome {
                name: check.name.clone(),
                result,
            });
        }

        let report = Report::new(self.name.clone(), outcomes, skipped);
        tracing::info!(
            suite = %self.name,
            passed = report.passed(),
            failed = report.failed(),
            skipped,
            "suite finished"
        );
        report
    }
}

impl<F> CheckRegistry<F> for Suite<F> {
    fn register(&mut self, name: String, body: CheckFn<F>) -> Result<()> {
        if self.checks.iter().any(|c| c.name == name) {
            tracing::warn!(suite = %self.name, check = %name, "duplicate check name");
            return Err(Error::DuplicateCheck(name));
        }

        tracing::debug!(suite = %self.name, check = %name, "registered check");
        self.checks.push(Check { name, body });
        Ok(())
    }
}

impl<F> fmt::Debug for Suite<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Suite")
            .field("name", &self.name)
            .field("checks", &self.checks)
            .finish_non_exhaustive()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string())
}
