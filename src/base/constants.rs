//! Domain constants shared by the scanner, the index and the runner.

/// Extension of Verilog source files (without the dot).
pub const SOURCE_EXTENSION: &str = "v";

/// File-stem suffix that marks a testbench (`mux_tb.v`).
pub const TESTBENCH_SUFFIX: &str = "_tb";

/// Keywords that introduce a unit declaration.
pub const DECLARATION_KEYWORDS: &[&str] = &["module", "macromodule"];

/// Reserved words that can never name an instantiated unit.
///
/// Any of these followed by a word and `(` looks like an instantiation to the
/// usage scanner (`else if (`, `function foo (`), so they are dropped before a
/// candidate reaches the dependency graph.
pub const RESERVED_KEYWORDS: &[&str] = &[
    "module",
    "macromodule",
    "endmodule",
    "input",
    "output",
    "inout",
    "wire",
    "reg",
    "logic",
    "signed",
    "assign",
    "always",
    "initial",
    "begin",
    "end",
    "if",
    "else",
    "case",
    "casex",
    "casez",
    "endcase",
    "default",
    "for",
    "while",
    "repeat",
    "forever",
    "task",
    "endtask",
    "function",
    "endfunction",
    "automatic",
    "integer",
    "real",
    "time",
    "parameter",
    "localparam",
    "generate",
    "genvar",
    "endgenerate",
    "posedge",
    "negedge",
];

/// Substrings of simulation output that mark a failed test.
///
/// `ERROR` is matched case-insensitively; the others are matched exactly.
pub const FAILURE_MARKERS: &[&str] = &["FAIL", "Assertion failed"];

/// Case-insensitive failure marker.
pub const ERROR_MARKER: &str = "ERROR";

/// Returns true if `word` is a reserved keyword.
#[inline]
pub fn is_reserved(word: &str) -> bool {
    RESERVED_KEYWORDS.contains(&word)
}

/// Returns true if `word` introduces a unit declaration.
#[inline]
pub fn is_declaration_keyword(word: &str) -> bool {
    DECLARATION_KEYWORDS.contains(&word)
}
