//! Lexical front end for Verilog sources
//!
//! There is no grammar here. Source text goes through three small stages:
//!
//! ```text
//! Source Text
//!     ↓
//! Lexer (logos) → Tokens with SyntaxKind
//!     ↓
//! normalize → same text with comments removed
//!     ↓
//! scan → declarations (`module NAME (`) and usages (`UNIT INSTANCE (`)
//! ```
//!
//! Each stage is a pure function over text so it can be tested on its own.

mod lexer;
mod normalize;
pub mod scan;
mod syntax_kind;

pub use lexer::{Lexer, Token, tokenize};
pub use normalize::normalize;
pub use scan::{
    Declaration, Rejection, SourceScan, Usage, UsageCandidate, find_declarations, find_usages,
    is_bare_identifier, scan_declarations, scan_usage_candidates,
};
pub use syntax_kind::SyntaxKind;
