//! Per-testbench outcomes and the run summary.

use std::path::PathBuf;

use crate::base::constants::{ERROR_MARKER, FAILURE_MARKERS};

/// Why a testbench failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Neither the usages nor the file name resolved to any source file.
    NoSourcesFound,
    /// The compiler exited with a nonzero status.
    Compilation,
    /// The simulation printed a failure marker.
    Simulation,
    /// The compiler or the simulation exceeded the configured timeout.
    Timeout,
    /// The testbench could not be read or a tool could not be started.
    Tool,
}

/// Result of one testbench.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestOutcome {
    pub testbench: PathBuf,
    /// `None` means the test passed.
    pub failure: Option<FailureKind>,
    /// Simulation stdout on pass or simulation failure, otherwise the error report.
    pub output: String,
    /// Resolved sources, dependency-first.
    pub sources: Vec<PathBuf>,
    pub compile_command: Option<String>,
}

impl TestOutcome {
    pub fn passed(&self) -> bool {
        self.failure.is_none()
    }

    /// File name of the testbench, for reports.
    pub fn name(&self) -> String {
        self.testbench
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.testbench.display().to_string())
    }
}

/// Outcomes of a run, in testbench order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub outcomes: Vec<TestOutcome>,
}

impl RunSummary {
    pub fn passed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.passed()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.passed()
    }

    /// Process exit code: 0 when nothing failed, 1 otherwise.
    pub fn exit_code(&self) -> u8 {
        if self.failed() == 0 { 0 } else { 1 }
    }
}

/// Check simulation output for failure markers.
///
/// `FAIL` and `Assertion failed` match exactly; `ERROR` matches in any case.
pub fn has_failure_marker(stdout: &str) -> bool {
    FAILURE_MARKERS.iter().any(|m| stdout.contains(m))
        || stdout.to_uppercase().contains(ERROR_MARKER)
}
