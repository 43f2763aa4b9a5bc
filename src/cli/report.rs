//! Console reports for the CLI commands.
//!
//! Everything is written to a `Write` so the reports can be checked in tests.

use std::io::{self, Write};
use std::path::PathBuf;

use crate::index::ModuleIndex;
use crate::runner::{RunSummary, TestOutcome};

const RULE_WIDTH: usize = 40;

fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

pub fn write_run_header(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "Running Verilog TDD Tests")?;
    writeln!(out, "{}", rule())
}

/// One testbench: verbose detail, a `✓`/`✗` line, then output as appropriate.
///
/// Failing tests always show their non-empty output lines; passing tests
/// show their output only in verbose mode.
pub fn write_outcome(
    out: &mut impl Write,
    outcome: &TestOutcome,
    verbose: bool,
) -> io::Result<()> {
    if verbose {
        write_resolution(out, outcome)?;
    }

    if outcome.passed() {
        writeln!(out, "✓ {}", outcome.name())?;
        let output = outcome.output.trim();
        if verbose && !output.is_empty() {
            writeln!(out, "  Output: {output}")?;
        }
    } else {
        writeln!(out, "✗ {}", outcome.name())?;
        for line in outcome.output.lines().filter(|l| !l.trim().is_empty()) {
            writeln!(out, "  {line}")?;
        }
    }
    Ok(())
}

/// Resolved dependency file names and the compile command, when known.
pub fn write_resolution(out: &mut impl Write, outcome: &TestOutcome) -> io::Result<()> {
    if !outcome.sources.is_empty() {
        writeln!(out, "  Dependencies: [{}]", file_names(&outcome.sources))?;
    }
    if let Some(cmd) = &outcome.compile_command {
        writeln!(out, "  Compiling: {cmd}")?;
    }
    Ok(())
}

pub fn write_summary(out: &mut impl Write, summary: &RunSummary) -> io::Result<()> {
    writeln!(out, "{}", rule())?;
    writeln!(
        out,
        "Results: {} passed, {} failed",
        summary.passed(),
        summary.failed()
    )
}

/// The dependency graph in index order, as shown after a verbose run.
pub fn write_dependency_tree(out: &mut impl Write, index: &ModuleIndex) -> io::Result<()> {
    if index.is_empty() {
        return Ok(());
    }
    writeln!(out)?;
    writeln!(out, "Module dependency tree:")?;
    for (unit, deps) in index.graph() {
        let deps: Vec<&str> = deps.iter().map(|d| d.as_str()).collect();
        writeln!(out, "  {unit} -> {}", deps.join(", "))?;
    }
    Ok(())
}

/// The `deps` report: units and their dependencies sorted by name, each
/// dependency with the `file:line:column` of its declaration or `NOT FOUND`.
pub fn write_dependencies(out: &mut impl Write, index: &ModuleIndex) -> io::Result<()> {
    writeln!(out, "Module Dependencies:")?;
    writeln!(out, "{}", rule())?;

    let mut graph: Vec<_> = index.graph().collect();
    graph.sort_by(|a, b| a.0.cmp(b.0));
    for (unit, deps) in graph {
        writeln!(out, "{unit}:")?;
        let mut deps: Vec<&str> = deps.iter().map(|d| d.as_str()).collect();
        deps.sort_unstable();
        for dep in deps {
            match index.unit(dep) {
                Some(unit) => writeln!(out, "  → {dep} ({})", unit.location())?,
                None => writeln!(out, "  → {dep} (NOT FOUND)")?,
            }
        }
    }

    let duplicates = index.duplicates();
    if !duplicates.is_empty() {
        writeln!(out)?;
        writeln!(out, "Duplicate declarations:")?;
        for dup in duplicates {
            writeln!(
                out,
                "  {}: {} (shadows {})",
                dup.name,
                dup.winner.location(),
                dup.shadowed.location()
            )?;
        }
    }
    Ok(())
}

fn file_names(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| {
            p.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| p.display().to_string())
        })
        .collect::<Vec<_>>()
        .join(", ")
}
