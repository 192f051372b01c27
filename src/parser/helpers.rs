use super::grammar::{Rule, SymbolSet};
use super::{Diagnostic, ParseError, Parser};
use crate::lexer::SymbolKind;
use crate::sink::Sink;
use crate::source::TokenSource;

// Parser helper methods
impl<S: TokenSource, K: Sink> Parser<S, K> {
    /// Run `body` as the derivation of `rule`.
    ///
    /// The rule is on the parse path while `body` runs and is removed only if `body`
    /// succeeds; an error leaves it (and every ancestor) in place.
    pub(super) fn rule<T>(
        &mut self,
        rule: Rule,
        body: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        self.check_depth(rule)?;

        self.path.push(rule);
        self.sink.enter_rule(rule);
        tracing::trace!(%rule, depth = self.path.len(), "enter");

        let value = body(self)?;

        self.path.pop(rule);
        self.sink.exit_rule(rule);
        tracing::trace!(%rule, depth = self.path.len(), "exit");

        Ok(value)
    }

    // Helper: Check nesting depth limit before entering another rule
    fn check_depth(&mut self, rule: Rule) -> Result<(), ParseError> {
        if self.path.len() >= self.limits.max_nesting_depth {
            return self.fail(format!(
                "Nesting too deep entering {}: {} rules active (max {})",
                rule,
                self.path.len(),
                self.limits.max_nesting_depth
            ));
        }
        Ok(())
    }

    /// Consume the lookahead if it is `expected`, otherwise fail without advancing
    pub(super) fn accept(&mut self, expected: SymbolKind) -> Result<(), ParseError> {
        if self.current.kind != expected {
            return self.fail(format!(
                "Expected {}, but retrieved {}",
                expected, self.current.kind
            ));
        }

        self.sink.terminal(&self.current);
        self.current = self.source.next_token()?;
        Ok(())
    }

    /// Build the diagnostic for the current token and stop the parse
    pub(super) fn fail<T>(&mut self, message: impl Into<String>) -> Result<T, ParseError> {
        let diagnostic = Diagnostic::new(&self.current, message.into(), self.path.deepest_first());

        tracing::debug!(
            line = diagnostic.line,
            token = %diagnostic.text,
            rule = ?self.path.innermost(),
            "syntax error"
        );
        self.sink.error(&diagnostic);

        Err(ParseError::Syntax(diagnostic))
    }

    /// Helper: peek current token kind
    pub(super) fn peek_kind(&self) -> SymbolKind {
        self.current.kind
    }

    pub(super) fn at_any(&self, set: SymbolSet) -> bool {
        set.has(self.current.kind)
    }

    /// Require the token stream to be exhausted
    pub(super) fn expect_end_of_input(&mut self) -> Result<(), ParseError> {
        if self.current.kind != SymbolKind::Eof {
            return self.fail(format!(
                "Expected end of input, but retrieved {}",
                self.current.kind
            ));
        }
        Ok(())
    }
}
