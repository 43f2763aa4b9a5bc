//! Configuration for vtdd.
//!
//! Values come from `VTDD_*` environment variables with built-in defaults;
//! command-line options are applied on top by the CLI.

use std::path::PathBuf;
use std::time::Duration;

use crate::base::constants::{SOURCE_EXTENSION, TESTBENCH_SUFFIX};
use crate::error::ConfigError;
use crate::index::Attribution;

/// Main configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root of the declaration sources.
    pub src_dir: PathBuf,
    /// Root of the testbenches.
    pub test_dir: PathBuf,
    /// Scratch directory for compiled simulations.
    pub temp_dir: PathBuf,
    /// File-stem suffix that marks a testbench.
    pub testbench_suffix: String,
    pub simulator: SimulatorConfig,
    /// Testbenches compiled and run at once. 1 runs them in order.
    pub jobs: usize,
    pub attribution: Attribution,
}

/// External compiler/simulator settings.
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    /// Compiler program (`iverilog`).
    pub compiler: String,
    /// Simulation runtime program (`vvp`).
    pub runtime: String,
    /// Limit for each compile and each run. `None` waits forever.
    pub timeout: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            src_dir: PathBuf::from("src"),
            test_dir: PathBuf::from("tests"),
            temp_dir: PathBuf::from("temp"),
            testbench_suffix: TESTBENCH_SUFFIX.to_string(),
            simulator: SimulatorConfig::default(),
            jobs: 1,
            attribution: Attribution::PerFile,
        }
    }
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            compiler: "iverilog".to_string(),
            runtime: "vvp".to_string(),
            timeout: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(optional_env)
    }

    /// Load configuration from any key lookup (environment, a map in tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Result<Option<String>, ConfigError>,
    {
        let defaults = Self::default();

        let jobs = parse_or(&lookup, "VTDD_JOBS", defaults.jobs)?;
        if jobs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "VTDD_JOBS".to_string(),
                message: "must be at least 1".to_string(),
            });
        }

        let strict = parse_flag(&lookup, "VTDD_STRICT")?;

        Ok(Self {
            src_dir: lookup("VTDD_SRC_DIR")?.map_or(defaults.src_dir, PathBuf::from),
            test_dir: lookup("VTDD_TEST_DIR")?.map_or(defaults.test_dir, PathBuf::from),
            temp_dir: lookup("VTDD_TEMP_DIR")?.map_or(defaults.temp_dir, PathBuf::from),
            testbench_suffix: lookup("VTDD_TB_SUFFIX")?.unwrap_or(defaults.testbench_suffix),
            simulator: SimulatorConfig::from_lookup(&lookup)?,
            jobs,
            attribution: if strict {
                Attribution::PerDeclaration
            } else {
                Attribution::PerFile
            },
        })
    }

    /// Glob-style description of testbench file names, e.g. `_tb.v`.
    pub fn testbench_pattern(&self) -> String {
        format!("{}.{}", self.testbench_suffix, SOURCE_EXTENSION)
    }
}

impl SimulatorConfig {
    fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Result<Option<String>, ConfigError>,
    {
        let defaults = Self::default();
        let timeout = lookup("VTDD_TIMEOUT_SECS")?
            .map(|s| {
                s.parse::<u64>().map_err(|e| ConfigError::InvalidValue {
                    key: "VTDD_TIMEOUT_SECS".to_string(),
                    message: format!("{e}"),
                })
            })
            .transpose()?
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        Ok(Self {
            compiler: lookup("VTDD_COMPILER")?.unwrap_or(defaults.compiler),
            runtime: lookup("VTDD_SIMULATOR")?.unwrap_or(defaults.runtime),
            timeout,
        })
    }
}

fn optional_env(key: &str) -> Result<Option<String>, ConfigError> {
    match std::env::var(key) {
        Ok(val) if val.is_empty() => Ok(None),
        Ok(val) => Ok(Some(val)),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(ConfigError::ParseError(format!(
            "failed to read {key}: {e}"
        ))),
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Result<Option<String>, ConfigError>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    lookup(key)?
        .map(|s| {
            s.parse().map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                message: format!("{e}"),
            })
        })
        .transpose()
        .map(|v| v.unwrap_or(default))
}

/// Boolean switch: `true`/`false`, `1`/`0` or `yes`/`no`, any case. Unset is off.
fn parse_flag<F>(lookup: &F, key: &str) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Result<Option<String>, ConfigError>,
{
    let Some(value) = lookup(key)? else {
        return Ok(false);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("expected true/false or 1/0, got '{value}'"),
        }),
    }
}
