use super::grammar::{Rule, SymbolSet};
use super::{ParseError, Parser};
use crate::lexer::SymbolKind;
use crate::sink::Sink;
use crate::source::TokenSource;

// Conditions and arithmetic expressions
impl<S: TokenSource, K: Sink> Parser<S, K> {
    /// <Condition> ::= identifier <ConditionalOperator> (identifier | numberConstant | stringConstant)
    pub(super) fn parse_condition(&mut self) -> Result<(), ParseError> {
        self.rule(Rule::Condition, |p| {
            p.accept(SymbolKind::Identifier)?;
            p.parse_conditional_operator()?;

            match p.peek_kind() {
                kind @ (SymbolKind::Identifier
                | SymbolKind::NumberConstant
                | SymbolKind::StringConstant) => p.accept(kind),
                _ => p.fail(
                    "Expected an identifier, number constant or string constant after the conditional operator",
                ),
            }
        })
    }

    /// <ConditionalOperator> ::= > | >= | = | != | < | <=
    fn parse_conditional_operator(&mut self) -> Result<(), ParseError> {
        self.rule(Rule::ConditionalOperator, |p| match p.peek_kind() {
            kind @ (SymbolKind::GreaterThan
            | SymbolKind::GreaterEqual
            | SymbolKind::Equal
            | SymbolKind::NotEqual
            | SymbolKind::LessThan
            | SymbolKind::LessEqual) => p.accept(kind),
            _ => p.fail("Expected a conditional operator."),
        })
    }

    /// <Expression> ::= <Term> | <Expression> + <Term> | <Expression> - <Term>
    pub(super) fn parse_expression(&mut self) -> Result<(), ParseError> {
        self.rule(Rule::Expression, |p| {
            p.parse_term()?;
            while p.at_any(SymbolSet::ADDING_OPERATORS) {
                let op = p.peek_kind();
                p.accept(op)?;
                p.parse_term()?;
            }
            Ok(())
        })
    }

    /// <Term> ::= <Factor> | <Term> * <Factor> | <Term> / <Factor> | <Term> % <Factor>
    fn parse_term(&mut self) -> Result<(), ParseError> {
        self.rule(Rule::Term, |p| {
            p.parse_factor()?;
            while p.at_any(SymbolSet::MULTIPLYING_OPERATORS) {
                let op = p.peek_kind();
                p.accept(op)?;
                p.parse_factor()?;
            }
            Ok(())
        })
    }

    /// <Factor> ::= identifier | numberConstant | ( <Expression> )
    fn parse_factor(&mut self) -> Result<(), ParseError> {
        self.rule(Rule::Factor, |p| match p.peek_kind() {
            SymbolKind::Identifier => p.accept(SymbolKind::Identifier),
            SymbolKind::NumberConstant => p.accept(SymbolKind::NumberConstant),
            SymbolKind::LParen => {
                p.accept(SymbolKind::LParen)?;
                p.parse_expression()?;
                p.accept(SymbolKind::RParen)
            }
            _ => p.fail("Expected identifier, a number, or left parenthesis"),
        })
    }
}
