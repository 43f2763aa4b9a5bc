//! Comment stripping.
//!
//! Every scanner runs on normalized text so that commented-out code never
//! contributes declarations or dependencies.

use super::lexer::Lexer;
use super::syntax_kind::SyntaxKind;

/// Remove line (`//`) and block (`/* */`) comments from Verilog source.
///
/// Line comments are dropped up to (not including) the newline. A block
/// comment is replaced by the newlines it spanned, or a single space if it
/// spanned none, so later tokens keep their line numbers and the tokens on
/// either side of it stay separate. An unterminated `/*` is kept verbatim.
///
/// Comment markers inside string literals are not special: `"http://x"` loses
/// everything from `//` onward.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());

    for token in Lexer::new(text) {
        match token.kind {
            SyntaxKind::LINE_COMMENT => {}
            SyntaxKind::BLOCK_COMMENT => {
                let newlines = token.text.matches('\n').count();
                if newlines == 0 {
                    out.push(' ');
                } else {
                    out.extend(std::iter::repeat_n('\n', newlines));
                }
            }
            _ => out.push_str(token.text),
        }
    }

    out
}
