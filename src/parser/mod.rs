// Parser module - splits the recursive-descent checker into logical components
mod error;
mod expressions;
mod grammar;
mod helpers;
mod path;
mod statements;

// Public exports
pub use error::{Diagnostic, ParseError};
pub use grammar::{Rule, SymbolSet};
pub use path::ParsePath;

use crate::lexer::{Lexer, Token};
use crate::limits::CheckerLimits;
use crate::sink::Sink;
use crate::source::TokenSource;

/// LL(1) recognizer for one statement part.
///
/// Holds exactly one token of lookahead. Every grammar routine registers itself on the
/// parse path for the duration of its derivation; on the first violation the routine
/// returns a [`Diagnostic`] and all open routines unwind through `?` without popping.
pub struct Parser<S, K> {
    source: S,
    current: Token,
    path: ParsePath,
    sink: K,
    limits: CheckerLimits,
}

impl<S: TokenSource, K: Sink> Parser<S, K> {
    /// Create a parser and prime its lookahead with the first token
    pub fn new(mut source: S, sink: K, limits: CheckerLimits) -> Result<Self, ParseError> {
        let current = source.next_token()?;

        Ok(Self {
            source,
            current,
            path: ParsePath::new(),
            sink,
            limits,
        })
    }

    /// Rules currently under derivation
    pub fn path(&self) -> &ParsePath {
        &self.path
    }

    /// The unconsumed lookahead token
    pub fn current(&self) -> &Token {
        &self.current
    }
}

// Public API functions

/// Check a whole program: one statement part followed by end of input
#[tracing::instrument(skip_all)]
pub fn check<S: TokenSource, K: Sink>(
    source: S,
    sink: K,
    limits: &CheckerLimits,
) -> Result<(), ParseError> {
    let mut parser = Parser::new(source, sink, limits.clone())?;
    parser.parse_statement_part()?;
    parser.expect_end_of_input()?;
    debug_assert!(parser.path().is_empty());
    Ok(())
}

/// Lex and check source text in one pass, pulling tokens on demand
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn check_source<K: Sink>(
    source: &str,
    sink: K,
    limits: &CheckerLimits,
) -> Result<(), ParseError> {
    let lexer = Lexer::new(source, limits)?;
    check(lexer, sink, limits)
}
