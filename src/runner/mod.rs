//! Test orchestration: resolve, compile, run and classify each testbench.
//!
//! One testbench never affects another. Its failures become a
//! [`TestOutcome`] and the run continues; only a missing test directory or an
//! empty one stops a run early.

mod outcome;
mod simulator;

pub use outcome::{FailureKind, RunSummary, TestOutcome, has_failure_marker};
pub use simulator::{CompileOutput, IcarusSimulator, RunOutput, Simulator};

use std::path::{Component, Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::base::constants::SOURCE_EXTENSION;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::index::ModuleIndex;
use crate::project::{collect_testbenches, load_file};

/// Drives one resolve + compile + run cycle per testbench.
pub struct TestOrchestrator<'a, S: Simulator> {
    index: &'a ModuleIndex,
    simulator: S,
    config: &'a Config,
}

impl<'a, S: Simulator> TestOrchestrator<'a, S> {
    pub fn new(index: &'a ModuleIndex, simulator: S, config: &'a Config) -> Self {
        Self {
            index,
            simulator,
            config,
        }
    }

    /// All testbenches under the test directory, sorted by path.
    pub fn discover(&self) -> Result<Vec<PathBuf>> {
        let testbenches = collect_testbenches(
            &self.config.test_dir,
            &self.config.testbench_suffix,
            SOURCE_EXTENSION,
        )?;
        if testbenches.is_empty() {
            return Err(Error::NoTestbenches {
                dir: self.config.test_dir.clone(),
                pattern: self.config.testbench_pattern(),
            });
        }
        Ok(testbenches)
    }

    /// Run every discovered testbench.
    ///
    /// With `jobs > 1` testbenches run on a rayon pool of that size. Outcomes
    /// are reported in discovery order either way.
    pub fn run_all(&self) -> Result<RunSummary> {
        let testbenches = self.discover()?;
        info!("running {} testbenches", testbenches.len());

        let outcomes: Vec<TestOutcome> = if self.config.jobs > 1 {
            match rayon::ThreadPoolBuilder::new()
                .num_threads(self.config.jobs)
                .build()
            {
                Ok(pool) => pool.install(|| {
                    testbenches
                        .par_iter()
                        .map(|tb| self.run_one(tb))
                        .collect()
                }),
                Err(e) => {
                    warn!("thread pool unavailable ({}), running sequentially", e);
                    testbenches.iter().map(|tb| self.run_one(tb)).collect()
                }
            }
        } else {
            testbenches.iter().map(|tb| self.run_one(tb)).collect()
        };

        Ok(RunSummary { outcomes })
    }

    /// Resolve, compile and run a single testbench.
    pub fn run_one(&self, testbench: &Path) -> TestOutcome {
        let mut outcome = TestOutcome {
            testbench: testbench.to_path_buf(),
            failure: None,
            output: String::new(),
            sources: Vec::new(),
            compile_command: None,
        };

        let text = match load_file(testbench) {
            Ok(text) => text,
            Err(e) => return fail(outcome, FailureKind::Tool, e.to_string()),
        };

        outcome.sources = self.index.resolver().resolve_testbench(
            testbench,
            &text,
            &self.config.testbench_suffix,
        );
        if outcome.sources.is_empty() {
            let message = format!("No source files found for {}", outcome.name());
            return fail(outcome, FailureKind::NoSourcesFound, message);
        }
        debug!(
            "{}: {} source file(s)",
            testbench.display(),
            outcome.sources.len()
        );

        let artifact = self.artifact_path(testbench);
        let artifact_dir = artifact.parent().unwrap_or(&self.config.temp_dir);
        if let Err(e) = std::fs::create_dir_all(artifact_dir) {
            let message = Error::io(artifact_dir, e).to_string();
            return fail(outcome, FailureKind::Tool, message);
        }
        outcome.compile_command =
            self.simulator
                .compile_command_line(&outcome.sources, testbench, &artifact);

        match self.simulator.compile(&outcome.sources, testbench, &artifact) {
            Ok(compiled) if compiled.success() => {}
            Ok(compiled) => {
                let message = format!("Compilation error:\n{}", compiled.stderr);
                return fail(outcome, FailureKind::Compilation, message);
            }
            Err(e) => return fail(outcome, failure_kind(&e), e.to_string()),
        }

        match self.simulator.run(&artifact) {
            Ok(run) => {
                if has_failure_marker(&run.stdout) {
                    outcome.failure = Some(FailureKind::Simulation);
                }
                outcome.output = run.stdout;
                outcome
            }
            Err(e) => fail(outcome, failure_kind(&e), e.to_string()),
        }
    }

    /// Compiled simulation path for `testbench`, unique per testbench.
    ///
    /// Mirrors the testbench's path relative to the test directory, so
    /// `alu/add_tb.v` and `fpu/add_tb.v` do not overwrite each other when run
    /// in parallel.
    pub fn artifact_path(&self, testbench: &Path) -> PathBuf {
        let relative = testbench
            .strip_prefix(&self.config.test_dir)
            .unwrap_or(testbench)
            .with_extension("");
        let mut artifact = self.config.temp_dir.clone();
        artifact.extend(
            relative
                .components()
                .filter(|c| matches!(c, Component::Normal(_))),
        );
        artifact
    }
}

fn fail(mut outcome: TestOutcome, kind: FailureKind, output: String) -> TestOutcome {
    outcome.failure = Some(kind);
    outcome.output = output;
    outcome
}

fn failure_kind(error: &Error) -> FailureKind {
    match error {
        Error::Timeout { .. } => FailureKind::Timeout,
        _ => FailureKind::Tool,
    }
}
