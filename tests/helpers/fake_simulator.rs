//! A scripted `Simulator` for orchestrator tests.
//!
//! Behaviour is keyed by testbench file stem (`mux_unit_tb`), which is also
//! the artifact name the orchestrator chooses for a top-level testbench.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use vtdd::runner::{CompileOutput, RunOutput};
use vtdd::{Error, Result, Simulator};

#[derive(Debug, Clone)]
pub enum Script {
    /// Compile cleanly, print this on run.
    Print(String),
    /// Compile fails with this stderr.
    CompileError(String),
    /// The run exceeds the timeout.
    Hang,
    /// The compiler cannot be started.
    Missing,
}

/// One recorded `compile` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileCall {
    pub sources: Vec<PathBuf>,
    pub testbench: PathBuf,
    pub artifact: PathBuf,
}

#[derive(Debug, Default)]
pub struct FakeSimulator {
    scripts: HashMap<String, Script>,
    compiles: Mutex<Vec<CompileCall>>,
}

impl FakeSimulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(mut self, stem: &str, script: Script) -> Self {
        self.scripts.insert(stem.to_string(), script);
        self
    }

    pub fn printing(self, stem: &str, stdout: &str) -> Self {
        self.script(stem, Script::Print(stdout.to_string()))
    }

    /// Compile calls, sorted by testbench so parallel runs compare equal.
    pub fn compiles(&self) -> Vec<CompileCall> {
        let mut calls = self.compiles.lock().unwrap().clone();
        calls.sort_by(|a, b| a.testbench.cmp(&b.testbench));
        calls
    }

    fn lookup(&self, path: &Path) -> Script {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.scripts
            .get(&stem)
            .cloned()
            .unwrap_or_else(|| Script::Print("SUCCESS".to_string()))
    }
}

impl Simulator for FakeSimulator {
    fn compile(
        &self,
        sources: &[PathBuf],
        testbench: &Path,
        artifact: &Path,
    ) -> Result<CompileOutput> {
        self.compiles.lock().unwrap().push(CompileCall {
            sources: sources.to_vec(),
            testbench: testbench.to_path_buf(),
            artifact: artifact.to_path_buf(),
        });
        match self.lookup(testbench) {
            Script::CompileError(stderr) => Ok(CompileOutput {
                exit_code: Some(1),
                stderr,
            }),
            Script::Missing => Err(Error::tool(
                "fake-iverilog",
                io::Error::new(io::ErrorKind::NotFound, "not installed"),
            )),
            _ => Ok(CompileOutput {
                exit_code: Some(0),
                stderr: String::new(),
            }),
        }
    }

    fn run(&self, artifact: &Path) -> Result<RunOutput> {
        match self.lookup(artifact) {
            Script::Print(stdout) => Ok(RunOutput { stdout }),
            Script::Hang => Err(Error::Timeout {
                program: "fake-vvp".to_string(),
                after: Duration::from_secs(1),
            }),
            other => panic!("run after {other:?}"),
        }
    }

    fn compile_command_line(
        &self,
        sources: &[PathBuf],
        testbench: &Path,
        artifact: &Path,
    ) -> Option<String> {
        let files: Vec<String> = sources.iter().map(|s| s.display().to_string()).collect();
        Some(format!(
            "fake-iverilog -o {} {} {}",
            artifact.display(),
            files.join(" "),
            testbench.display()
        ))
    }
}
