use thiserror::Error;

use super::grammar::Rule;
use crate::lexer::{LexError, SymbolKind, Token};

/// A syntax violation with the rule chain that was active when it happened
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}{}", self.report(), self.message)]
pub struct Diagnostic {
    pub line: usize,
    pub text: String,
    pub kind: SymbolKind,
    pub message: String,
    pub parse_path: Vec<Rule>, // Deepest first
}

impl Diagnostic {
    pub(super) fn new(
        token: &Token,
        message: String,
        parse_path: impl IntoIterator<Item = Rule>,
    ) -> Self {
        Self {
            line: token.line,
            text: token.text.clone(),
            kind: token.kind,
            message,
            parse_path: parse_path.into_iter().collect(),
        }
    }

    /// Location, offending token and parse path, without the explanatory message
    pub fn report(&self) -> String {
        let mut out = format!(
            "Line {}: Unexpected token '{}' ({})\n",
            self.line, self.text, self.kind
        );

        if !self.parse_path.is_empty() {
            out.push_str("    Parse path:\n");
            for rule in &self.parse_path {
                out.push_str("        at ");
                out.push_str(rule.name());
                out.push('\n');
            }
        }

        out
    }
}

/// Why a parse stopped
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error(transparent)]
    Syntax(#[from] Diagnostic),

    /// The token source failed; carries no grammar context
    #[error(transparent)]
    Source(#[from] LexError),
}

impl ParseError {
    pub fn diagnostic(&self) -> Option<&Diagnostic> {
        match self {
            ParseError::Syntax(diagnostic) => Some(diagnostic),
            ParseError::Source(_) => None,
        }
    }
}
