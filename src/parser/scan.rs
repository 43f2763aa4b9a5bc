//! Declaration and usage scanners.
//!
//! Both scanners walk the token stream of *normalized* text (see
//! [`normalize`](super::normalize)). Nothing here knows Verilog grammar: a
//! declaration is `module NAME (` or `module NAME #`, and a usage is
//! `UNIT [#(...)] INSTANCE (` after a boundary. Candidates that look like usages
//! but are not are removed by a fixed list of [`Rejection`] filters.

use indexmap::IndexSet;
use smol_str::SmolStr;
use text_size::TextSize;
use tracing::trace;

use super::lexer::{Token, tokenize};
use super::syntax_kind::SyntaxKind;
use crate::base::constants::{is_declaration_keyword, is_reserved};

/// A unit declaration found in a file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Declaration {
    pub name: SmolStr,
    /// Offset of the name token in the scanned text.
    pub offset: TextSize,
}

/// One unit referencing another: `unit_name instance_name (...)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Usage {
    pub unit_name: SmolStr,
    pub instance_name: SmolStr,
    /// Offset of the unit-name token in the scanned text.
    pub offset: TextSize,
}

/// Why a usage candidate was dropped. Filters run in declaration order and the
/// first one that applies wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rejection {
    /// The unit name is a reserved keyword (`else if (`).
    ReservedKeyword,
    /// The instance token is a number or an escaped identifier.
    InvalidInstanceName,
    /// Unit and instance names are the same token text.
    SelfReference,
}

/// A usage-shaped match before filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageCandidate {
    pub usage: Usage,
    pub rejection: Option<Rejection>,
}

impl UsageCandidate {
    pub fn is_accepted(&self) -> bool {
        self.rejection.is_none()
    }
}

/// Declarations and accepted usages of one text, from a single lexer pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceScan {
    pub declarations: Vec<Declaration>,
    pub usages: Vec<Usage>,
}

impl SourceScan {
    pub fn new(text: &str) -> Self {
        let tokens = tokenize(text);
        Self {
            declarations: declarations_in(&tokens),
            usages: usage_candidates_in(&tokens)
                .into_iter()
                .filter(UsageCandidate::is_accepted)
                .map(|c| c.usage)
                .collect(),
        }
    }

    /// Distinct declared names in source order.
    pub fn declared_names(&self) -> IndexSet<SmolStr> {
        self.declarations.iter().map(|d| d.name.clone()).collect()
    }
}

/// Distinct names declared in `text`, in source order.
pub fn find_declarations(text: &str) -> IndexSet<SmolStr> {
    scan_declarations(text).into_iter().map(|d| d.name).collect()
}

/// Every declaration in `text`, duplicates included.
pub fn scan_declarations(text: &str) -> Vec<Declaration> {
    declarations_in(&tokenize(text))
}

/// Usages in `text` that survive every filter.
pub fn find_usages(text: &str) -> Vec<Usage> {
    scan_usage_candidates(text)
        .into_iter()
        .filter(UsageCandidate::is_accepted)
        .map(|c| c.usage)
        .collect()
}

/// Every usage-shaped match in `text`, with the filter that rejected it.
pub fn scan_usage_candidates(text: &str) -> Vec<UsageCandidate> {
    usage_candidates_in(&tokenize(text))
}

/// Check whether `name` is a plain (non-escaped) Verilog identifier.
pub fn is_bare_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

fn declarations_in(tokens: &[Token<'_>]) -> Vec<Declaration> {
    let mut found = Vec::new();

    for (i, token) in tokens.iter().enumerate() {
        if token.kind != SyntaxKind::IDENT || !is_declaration_keyword(token.text) {
            continue;
        }
        let Some(name_idx) = skip_trivia_required(tokens, i + 1) else {
            continue;
        };
        let name = &tokens[name_idx];
        if name.kind != SyntaxKind::IDENT {
            continue;
        }
        let next = skip_trivia(tokens, name_idx + 1);
        if matches!(
            tokens.get(next).map(|t| t.kind),
            Some(SyntaxKind::HASH | SyntaxKind::L_PAREN)
        ) {
            trace!("declaration '{}' at {:?}", name.text, name.offset);
            found.push(Declaration {
                name: SmolStr::new(name.text),
                offset: name.offset,
            });
        }
    }

    found
}

fn usage_candidates_in(tokens: &[Token<'_>]) -> Vec<UsageCandidate> {
    let mut candidates = Vec::new();
    let mut i = 0;

    // Matches never overlap: a match consumes everything through its `(`.
    while i < tokens.len() {
        match match_usage(tokens, i) {
            Some((usage, end)) => {
                let rejection = reject(&usage);
                if let Some(reason) = rejection {
                    trace!(
                        "rejected usage '{} {}': {:?}",
                        usage.unit_name, usage.instance_name, reason
                    );
                }
                candidates.push(UsageCandidate { usage, rejection });
                i = end;
            }
            None => i += 1,
        }
    }

    candidates
}

fn reject(usage: &Usage) -> Option<Rejection> {
    if is_reserved(&usage.unit_name) {
        Some(Rejection::ReservedKeyword)
    } else if !is_bare_identifier(&usage.instance_name) {
        Some(Rejection::InvalidInstanceName)
    } else if usage.unit_name == usage.instance_name {
        Some(Rejection::SelfReference)
    } else {
        None
    }
}

/// Try to match `UNIT <ws> [#(...)] INSTANCE (` starting at `start`.
///
/// Returns the usage and the index just past the opening parenthesis.
fn match_usage(tokens: &[Token<'_>], start: usize) -> Option<(Usage, usize)> {
    let unit = &tokens[start];
    if unit.kind != SyntaxKind::IDENT {
        return None;
    }
    let at_boundary = start == 0 || {
        let prev = tokens[start - 1].kind;
        prev.is_usage_boundary() || prev.is_comment()
    };
    if !at_boundary {
        return None;
    }

    let mut i = skip_trivia_required(tokens, start + 1)?;

    if tokens[i].kind == SyntaxKind::HASH {
        let open = skip_trivia(tokens, i + 1);
        if tokens.get(open)?.kind != SyntaxKind::L_PAREN {
            return None;
        }
        let close = matching_paren(tokens, open)?;
        i = skip_trivia(tokens, close + 1);
    }

    let instance = tokens.get(i)?;
    if !(instance.kind.is_word() || instance.kind == SyntaxKind::ESCAPED_IDENT) {
        return None;
    }

    let open = skip_trivia(tokens, i + 1);
    if tokens.get(open)?.kind != SyntaxKind::L_PAREN {
        return None;
    }

    let usage = Usage {
        unit_name: SmolStr::new(unit.text),
        instance_name: SmolStr::new(instance.text),
        offset: unit.offset,
    };
    Some((usage, open + 1))
}

/// Index of the `)` closing the `(` at `open`, if the parentheses balance.
fn matching_paren(tokens: &[Token<'_>], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, token) in tokens.iter().enumerate().skip(open) {
        match token.kind {
            SyntaxKind::L_PAREN => depth += 1,
            SyntaxKind::R_PAREN => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

fn skip_trivia(tokens: &[Token<'_>], mut i: usize) -> usize {
    while tokens.get(i).is_some_and(|t| t.kind.is_trivia()) {
        i += 1;
    }
    i
}

/// Like [`skip_trivia`], but at least one trivia token must be present and a
/// token must follow it.
fn skip_trivia_required(tokens: &[Token<'_>], i: usize) -> Option<usize> {
    if !tokens.get(i)?.kind.is_trivia() {
        return None;
    }
    let next = skip_trivia(tokens, i);
    (next < tokens.len()).then_some(next)
}
