//! Command-line interface.
//!
//! ```text
//! vtdd [-v] [run]                      run every testbench
//! vtdd test <file>                     run one testbench
//! vtdd generate <name> [in] [out]      print a testbench skeleton
//! vtdd deps                            print the dependency graph
//! vtdd help                            print usage
//! ```

pub mod report;

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{ConfigError, Error};
use crate::index::{Attribution, ModuleIndex};
use crate::runner::{IcarusSimulator, Simulator, TestOrchestrator};
use crate::template::generate_testbench;

#[derive(Parser, Debug)]
#[command(
    name = "vtdd",
    version,
    about = "Verilog TDD test runner",
    long_about = "Finds *_tb.v testbenches, resolves the Verilog sources each one needs \
                  from the module declarations under the source directory, then compiles \
                  and simulates them with Icarus Verilog.",
    disable_help_subcommand = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Show dependencies, compile commands and passing test output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory holding the design sources [env: VTDD_SRC_DIR]
    #[arg(long, global = true, value_name = "DIR")]
    pub src_dir: Option<PathBuf>,

    /// Directory holding the testbenches [env: VTDD_TEST_DIR]
    #[arg(long, global = true, value_name = "DIR")]
    pub test_dir: Option<PathBuf>,

    /// Scratch directory for compiled simulations [env: VTDD_TEMP_DIR]
    #[arg(long, global = true, value_name = "DIR")]
    pub temp_dir: Option<PathBuf>,

    /// Testbenches to run at once [env: VTDD_JOBS]
    #[arg(short, long, global = true, value_parser = clap::value_parser!(u32).range(1..))]
    pub jobs: Option<u32>,

    /// Seconds before a compile or simulation is killed, 0 for no limit [env: VTDD_TIMEOUT_SECS]
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Attribute each instantiation to the nearest preceding module only [env: VTDD_STRICT]
    #[arg(long, global = true)]
    pub strict: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run all tests (default)
    Run,

    /// Run a specific test file
    Test {
        /// Testbench path, or a file name under the test directory
        file: String,
    },

    /// Generate a test template
    Generate {
        /// Module under test
        name: String,
        /// Number of inputs
        #[arg(default_value_t = 2)]
        inputs: usize,
        /// Number of outputs
        #[arg(default_value_t = 1)]
        outputs: usize,
    },

    /// Show module dependencies
    Deps,

    /// Show this help
    Help,
}

impl Cli {
    /// Environment configuration with command-line overrides applied.
    pub fn config(&self) -> Result<Config, ConfigError> {
        let mut config = Config::from_env()?;
        self.apply(&mut config);
        Ok(config)
    }

    /// Overwrite `config` with every option given on the command line.
    pub fn apply(&self, config: &mut Config) {
        if let Some(dir) = &self.src_dir {
            config.src_dir = dir.clone();
        }
        if let Some(dir) = &self.test_dir {
            config.test_dir = dir.clone();
        }
        if let Some(dir) = &self.temp_dir {
            config.temp_dir = dir.clone();
        }
        if let Some(jobs) = self.jobs {
            config.jobs = jobs as usize;
        }
        if let Some(secs) = self.timeout {
            config.simulator.timeout = (secs > 0).then(|| std::time::Duration::from_secs(secs));
        }
        if self.strict {
            config.attribution = Attribution::PerDeclaration;
        }
    }
}

/// Run the parsed command line against the real environment and stdout.
///
/// Returns the process exit code.
pub fn run(cli: &Cli) -> anyhow::Result<u8> {
    let config = cli.config().context("invalid configuration")?;
    let simulator = IcarusSimulator::new(&config.simulator);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let command = cli.command.clone().unwrap_or(Command::Run);
    execute(&command, &config, simulator, cli.verbose, &mut out)
}

/// Run `command` with an explicit configuration, simulator and output.
pub fn execute<S, W>(
    command: &Command,
    config: &Config,
    simulator: S,
    verbose: bool,
    out: &mut W,
) -> anyhow::Result<u8>
where
    S: Simulator,
    W: Write,
{
    debug!("command {:?}", command);
    match command {
        Command::Run => {
            let index = build_index(config)?;
            let orchestrator = TestOrchestrator::new(&index, simulator, config);
            let summary = orchestrator.run_all()?;

            report::write_run_header(out)?;
            for outcome in &summary.outcomes {
                report::write_outcome(out, outcome, verbose)?;
            }
            report::write_summary(out, &summary)?;
            if verbose {
                report::write_dependency_tree(out, &index)?;
            }
            Ok(summary.exit_code())
        }
        Command::Test { file } => {
            let testbench = locate_testbench(file, &config.test_dir)?;
            let index = build_index(config)?;
            let orchestrator = TestOrchestrator::new(&index, simulator, config);
            let outcome = orchestrator.run_one(&testbench);

            if verbose {
                report::write_resolution(out, &outcome)?;
            }
            writeln!(out, "{}", outcome.output.trim_end())?;
            Ok(if outcome.passed() { 0 } else { 1 })
        }
        Command::Generate {
            name,
            inputs,
            outputs,
        } => {
            let text = generate_testbench(name, *inputs, *outputs)?;
            write!(out, "{text}")?;
            Ok(0)
        }
        Command::Deps => {
            let index = build_index(config)?;
            report::write_dependencies(out, &index)?;
            Ok(0)
        }
        Command::Help => {
            Cli::command().write_long_help(out)?;
            Ok(0)
        }
    }
}

/// Index the source directory. A missing directory gives an empty index, so
/// every testbench then fails with no sources instead of aborting the run.
fn build_index(config: &Config) -> anyhow::Result<ModuleIndex> {
    match ModuleIndex::build(&config.src_dir, config.attribution) {
        Ok(index) => Ok(index),
        Err(Error::DirectoryNotFound(dir)) => {
            warn!("source directory {} not found", dir.display());
            Ok(ModuleIndex::new(config.attribution))
        }
        Err(e) => Err(e.into()),
    }
}

/// `file` as given if it exists, otherwise `file` under the test directory.
fn locate_testbench(file: &str, test_dir: &Path) -> Result<PathBuf, Error> {
    let direct = PathBuf::from(file);
    if direct.is_file() {
        return Ok(direct);
    }
    let nested = test_dir.join(file);
    if nested.is_file() {
        return Ok(nested);
    }
    Err(Error::TestbenchNotFound(file.to_string()))
}
