//! The external compiler/simulator collaborator.
//!
//! The orchestrator only sees the [`Simulator`] trait. [`IcarusSimulator`]
//! drives Icarus Verilog (`iverilog` to compile, `vvp` to run).

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::config::SimulatorConfig;
use crate::error::{Error, Result};

/// Result of compiling a testbench with its sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOutput {
    /// Process exit code; `None` if the process was killed by a signal.
    pub exit_code: Option<i32>,
    pub stderr: String,
}

impl CompileOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Captured output of a simulation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutput {
    pub stdout: String,
}

/// Compiles and runs simulations.
///
/// Implementations must be shareable across threads: testbenches may be run
/// in parallel, each with its own artifact path.
pub trait Simulator: Send + Sync {
    /// Compile `sources` (in order) followed by `testbench` into `artifact`.
    fn compile(
        &self,
        sources: &[PathBuf],
        testbench: &Path,
        artifact: &Path,
    ) -> Result<CompileOutput>;

    /// Run a compiled `artifact` and capture its standard output.
    fn run(&self, artifact: &Path) -> Result<RunOutput>;

    /// Human-readable compile command, for verbose reports.
    fn compile_command_line(
        &self,
        _sources: &[PathBuf],
        _testbench: &Path,
        _artifact: &Path,
    ) -> Option<String> {
        None
    }
}

impl<S: Simulator + ?Sized> Simulator for &S {
    fn compile(
        &self,
        sources: &[PathBuf],
        testbench: &Path,
        artifact: &Path,
    ) -> Result<CompileOutput> {
        (**self).compile(sources, testbench, artifact)
    }

    fn run(&self, artifact: &Path) -> Result<RunOutput> {
        (**self).run(artifact)
    }

    fn compile_command_line(
        &self,
        sources: &[PathBuf],
        testbench: &Path,
        artifact: &Path,
    ) -> Option<String> {
        (**self).compile_command_line(sources, testbench, artifact)
    }
}

/// Icarus Verilog: `iverilog -o <artifact> <sources..> <testbench>`, then `vvp <artifact>`.
#[derive(Debug, Clone)]
pub struct IcarusSimulator {
    compiler: String,
    runtime: String,
    timeout: Option<Duration>,
}

impl IcarusSimulator {
    pub fn new(config: &SimulatorConfig) -> Self {
        Self {
            compiler: config.compiler.clone(),
            runtime: config.runtime.clone(),
            timeout: config.timeout,
        }
    }

    fn compile_args(sources: &[PathBuf], testbench: &Path, artifact: &Path) -> Vec<PathBuf> {
        let mut args = Vec::with_capacity(sources.len() + 3);
        args.push(PathBuf::from("-o"));
        args.push(artifact.to_path_buf());
        args.extend(sources.iter().cloned());
        args.push(testbench.to_path_buf());
        args
    }
}

impl Default for IcarusSimulator {
    fn default() -> Self {
        Self::new(&SimulatorConfig::default())
    }
}

impl Simulator for IcarusSimulator {
    fn compile(
        &self,
        sources: &[PathBuf],
        testbench: &Path,
        artifact: &Path,
    ) -> Result<CompileOutput> {
        let mut cmd = Command::new(&self.compiler);
        cmd.args(Self::compile_args(sources, testbench, artifact));
        let captured = run_captured(cmd, &self.compiler, self.timeout)?;
        Ok(CompileOutput {
            exit_code: captured.status.code(),
            stderr: captured.stderr,
        })
    }

    fn run(&self, artifact: &Path) -> Result<RunOutput> {
        let mut cmd = Command::new(&self.runtime);
        cmd.arg(artifact);
        let captured = run_captured(cmd, &self.runtime, self.timeout)?;
        if !captured.status.success() {
            debug!("{} exited with {}", self.runtime, captured.status);
        }
        Ok(RunOutput {
            stdout: captured.stdout,
        })
    }

    fn compile_command_line(
        &self,
        sources: &[PathBuf],
        testbench: &Path,
        artifact: &Path,
    ) -> Option<String> {
        let args: Vec<String> = Self::compile_args(sources, testbench, artifact)
            .iter()
            .map(|a| a.display().to_string())
            .collect();
        Some(format!("{} {}", self.compiler, args.join(" ")))
    }
}

/// Exit status and decoded output of a finished child process.
#[derive(Debug)]
struct Captured {
    status: ExitStatus,
    stdout: String,
    stderr: String,
}

/// Spawn `cmd`, drain both pipes on helper threads, and wait.
///
/// With a timeout, the child is polled and killed once the limit passes.
fn run_captured(mut cmd: Command, program: &str, timeout: Option<Duration>) -> Result<Captured> {
    trace!("spawning {:?}", cmd);
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    let mut child = cmd.spawn().map_err(|e| Error::tool(program, e))?;

    let mut stdout = child.stdout.take();
    let mut stderr = child.stderr.take();
    let stdout_handle = thread::spawn(move || drain(stdout.as_mut()));
    let stderr_handle = thread::spawn(move || drain(stderr.as_mut()));

    let status = match timeout {
        None => child.wait().map_err(|e| Error::tool(program, e))?,
        Some(limit) => {
            let start = Instant::now();
            loop {
                if let Some(status) = child.try_wait().map_err(|e| Error::tool(program, e))? {
                    break status;
                }
                if start.elapsed() >= limit {
                    let _ = child.kill();
                    let _ = child.wait();
                    // Grandchildren may still hold the pipes; leave the readers detached
                    return Err(Error::Timeout {
                        program: program.to_string(),
                        after: limit,
                    });
                }
                thread::sleep(Duration::from_millis(20));
            }
        }
    };

    let stdout = stdout_handle.join().unwrap_or_default();
    let stderr = stderr_handle.join().unwrap_or_default();
    Ok(Captured {
        status,
        stdout: String::from_utf8_lossy(&stdout).into_owned(),
        stderr: String::from_utf8_lossy(&stderr).into_owned(),
    })
}

fn drain<R: Read>(pipe: Option<&mut R>) -> Vec<u8> {
    let mut buf = Vec::new();
    if let Some(pipe) = pipe {
        let _ = pipe.read_to_end(&mut buf);
    }
    buf
}
