//! # vtdd
//!
//! Verilog test runner with lexical module dependency resolution.
//!
//! Testbenches are found by naming convention (`*_tb.v`). The Verilog sources
//! each one needs are found without parsing Verilog: every source file is
//! scanned for `module NAME (` declarations and `UNIT INSTANCE (`
//! instantiations, and the resulting graph is walked dependency-first.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! cli       → clap commands and console reports
//!   ↓
//! runner    → TestOrchestrator, Simulator trait, Icarus implementation
//!   ↓
//! index     → ModuleIndex (unit → file, unit → dependencies), DependencyResolver
//!   ↓
//! project   → Source and testbench discovery, file reading
//!   ↓
//! parser    → Logos lexer, comment normalizer, declaration/usage scanners
//!   ↓
//! base      → Constants, LineIndex/Position, TextRange
//! ```

// ============================================================================
// MODULES (dependency order: base → parser → project → index → runner → cli)
// ============================================================================

/// Foundation types: constants, positions, text offsets
pub mod base;

/// Parser: Logos lexer, comment normalizer, lexical scanners
pub mod parser;

/// Project files: recursive discovery and loading
pub mod project;

/// Module index and dependency resolution
pub mod index;

/// Test orchestration and the simulator boundary
pub mod runner;

/// Testbench skeleton generation
pub mod template;

/// Environment configuration
pub mod config;

/// Error types
pub mod error;

/// Command-line interface
pub mod cli;

// Re-export commonly needed items
pub use config::{Config, SimulatorConfig};
pub use error::{ConfigError, Error, Result};
pub use index::{Attribution, DependencyResolver, ModuleIndex, SourceUnit};
pub use parser::{find_declarations, find_usages, normalize};
pub use runner::{
    FailureKind, IcarusSimulator, RunSummary, Simulator, TestOrchestrator, TestOutcome,
};

// Re-export foundation types
pub use base::{LineIndex, Position, TextRange, TextSize};
