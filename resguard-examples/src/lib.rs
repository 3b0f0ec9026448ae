//! Demonstration scenarios for resguard.
//!
//! Each scenario exercises one part of the lifecycle and error model and
//! returns a [`ScenarioReport`] with the lines its handlers produced.
//! Every expected failure is handled inside its scenario; [`run_all`] only
//! sees the failures nobody anticipated.

use std::error::Error as StdError;
use std::fmt;
use std::io;

use resguard::prelude::*;
use tracing::{error, info};

/// What one scenario observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioReport {
    /// Scenario heading
    pub title: &'static str,
    /// Lines produced by the scenario's handlers, in order
    pub handled: Vec<String>,
}

impl ScenarioReport {
    fn new(title: &'static str) -> Self {
        Self {
            title,
            handled: Vec::new(),
        }
    }

    fn handled(mut self, line: impl Into<String>) -> Self {
        let line = line.into();
        info!(scenario = self.title, "{line}");
        self.handled.push(line);
        self
    }
}

impl fmt::Display for ScenarioReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.title)?;
        for line in &self.handled {
            write!(f, "\n  {line}")?;
        }
        Ok(())
    }
}

/// A boxed resource performs an operation.
///
/// The box is handed back so the caller decides when it is released.
pub fn smart_pointer() -> ResourceResult<(ScenarioReport, Box<ManagedResource>)> {
    let resource = Box::new(ManagedResource::create("basic"));
    resource.perform_operation()?;
    Ok((ScenarioReport::new("1. Smart Pointer Example"), resource))
}

fn fail_at_runtime() -> Result<(), Box<dyn StdError + Send + Sync>> {
    Err(Box::new(io::Error::other("Runtime error")))
}

/// A generic failure passes the `InvalidArgument` handler and is caught by
/// the catch-all handler.
pub fn multiple_handlers() -> ScenarioReport {
    let report = ScenarioReport::new("2. Multiple Catch Blocks");
    match fail_at_runtime() {
        Ok(()) => report,
        Err(err) => match err.downcast_ref::<ErrorChain>() {
            Some(chain) if chain.kind() == ErrorKind::InvalidArgument => {
                report.handled(format!("Caught invalid argument: {chain}"))
            }
            _ => report.handled(format!("Caught exception: {err}")),
        },
    }
}

/// A resource is used and released at the end of its block.
pub fn scoped_release() -> ResourceResult<ScenarioReport> {
    {
        let r1 = ManagedResource::create("r1");
        r1.perform_operation()?;
    }
    Ok(ScenarioReport::new("3. RAII Example"))
}

/// Division by zero is rejected as an invalid argument.
pub fn checked_division() -> ScenarioReport {
    let report = ScenarioReport::new("4. Exception Specification");
    match divide(10, 0) {
        Ok(result) => report.handled(format!("Result: {result}")),
        Err(err) if err.kind() == ErrorKind::InvalidArgument => {
            report.handled(format!("Division error: {err}"))
        }
        Err(err) => report.handled(format!("Unexpected error: {err}")),
    }
}

fn raise_nested() -> ResourceResult<()> {
    let original: Result<(), io::Error> = Err(io::Error::other("Original error"));
    original.wrap_err("Wrapper error")
}

/// An error re-raised with context keeps its original cause.
pub fn nested_errors() -> ScenarioReport {
    let mut report = ScenarioReport::new("5. Nested Exceptions");
    if let Err(err) = raise_nested() {
        report = report.handled(format!("Main error: {err}"));
        if let Some(cause) = err.cause() {
            report = report.handled(format!("Nested error: {cause}"));
        }
    }
    report
}

fn use_both(first: &ManagedResource, second: &ManagedResource) -> ResourceResult<()> {
    first.perform_operation()?;
    second.perform_operation()?;
    Ok(())
}

/// Two resources share a scope: the faulty one fails its operation, and the
/// failing one reports its teardown failure only through the diagnostic log.
pub fn multiple_resources() -> ScenarioReport {
    let report = ScenarioReport::new("6. Multiple Resources");
    let outcome = {
        let r2 = ManagedResource::create("faulty");
        let r3 = ManagedResource::create("failing");
        use_both(&r2, &r3)
    };
    match outcome {
        Ok(()) => report,
        Err(err) => report.handled(format!("Resource error: {err}")),
    }
}

/// Run every scenario in order.
///
/// A scenario that fails unexpectedly is reported as a top-level catch and
/// the remaining scenarios are skipped, mirroring a single outer handler.
pub fn run_all() -> Vec<ScenarioReport> {
    let mut reports = Vec::new();
    if let Err(err) = run_into(&mut reports) {
        error!(error_kind = %err.kind(), "Top-level catch: {}", err.render_chain());
        reports.push(
            ScenarioReport::new("Top-level").handled(format!("Top-level catch: {err}")),
        );
    }
    reports
}

fn run_into(reports: &mut Vec<ScenarioReport>) -> ResourceResult<()> {
    // "basic" stays open until every scenario has run.
    let (report, _basic) = smart_pointer()?;
    reports.push(report);
    reports.push(multiple_handlers());
    reports.push(scoped_release()?);
    reports.push(checked_division());
    reports.push(nested_errors());
    reports.push(multiple_resources());
    Ok(())
}
