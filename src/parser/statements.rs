use super::grammar::{Rule, SymbolSet};
use super::{ParseError, Parser};
use crate::lexer::SymbolKind;
use crate::sink::Sink;
use crate::source::TokenSource;

// Recursive statement parsing methods
impl<S: TokenSource, K: Sink> Parser<S, K> {
    /// <StatementPart> ::= begin <StatementList> end
    pub fn parse_statement_part(&mut self) -> Result<(), ParseError> {
        self.rule(Rule::StatementPart, |p| {
            p.accept(SymbolKind::Begin)?;
            p.parse_statement_list()?;
            p.accept(SymbolKind::End)
        })
    }

    /// <StatementList> ::= <Statement> | <StatementList> ; <Statement>
    fn parse_statement_list(&mut self) -> Result<(), ParseError> {
        self.rule(Rule::StatementList, |p| {
            p.parse_statement()?;
            while p.peek_kind() == SymbolKind::Semicolon {
                p.accept(SymbolKind::Semicolon)?;
                p.parse_statement()?;
            }
            Ok(())
        })
    }

    fn parse_statement(&mut self) -> Result<(), ParseError> {
        self.rule(Rule::Statement, |p| match p.peek_kind() {
            SymbolKind::Identifier => p.parse_assignment(),
            SymbolKind::If => p.parse_if(),
            SymbolKind::While => p.parse_while(),
            SymbolKind::Call => p.parse_procedure_call(),
            SymbolKind::Do => p.parse_until(),
            SymbolKind::For => p.parse_for(),
            _ => p.fail("Invalid statement input"),
        })
    }

    /// <AssignmentStatement> ::= identifier := <Expression> | identifier := stringConstant
    fn parse_assignment(&mut self) -> Result<(), ParseError> {
        self.rule(Rule::AssignmentStatement, |p| {
            p.accept(SymbolKind::Identifier)?;
            p.accept(SymbolKind::Becomes)?;

            if p.peek_kind() == SymbolKind::StringConstant {
                p.accept(SymbolKind::StringConstant)
            } else if p.at_any(Rule::Expression.first_set()) {
                p.parse_expression()
            } else {
                p.fail("Expected a string constant or an expression after ':='")
            }
        })
    }

    /// <IfStatement> ::= if <Condition> then <StatementList> [else <StatementList>] end if
    fn parse_if(&mut self) -> Result<(), ParseError> {
        self.rule(Rule::IfStatement, |p| {
            p.accept(SymbolKind::If)?;
            p.parse_condition()?;
            p.accept(SymbolKind::Then)?;
            p.parse_statement_list()?;

            // Optional else branch
            if p.peek_kind() == SymbolKind::Else {
                p.accept(SymbolKind::Else)?;
                p.parse_statement_list()?;
            }

            p.accept(SymbolKind::End)?;
            p.accept(SymbolKind::If)
        })
    }

    /// <WhileStatement> ::= while <Condition> loop <StatementList> end loop
    fn parse_while(&mut self) -> Result<(), ParseError> {
        self.rule(Rule::WhileStatement, |p| {
            p.accept(SymbolKind::While)?;
            p.parse_condition()?;
            p.accept(SymbolKind::Loop)?;
            p.parse_statement_list()?;
            p.accept(SymbolKind::End)?;
            p.accept(SymbolKind::Loop)
        })
    }

    /// <ProcedureStatement> ::= call identifier ( <ArgumentList> )
    fn parse_procedure_call(&mut self) -> Result<(), ParseError> {
        self.rule(Rule::ProcedureStatement, |p| {
            p.accept(SymbolKind::Call)?;
            p.accept(SymbolKind::Identifier)?;
            p.accept(SymbolKind::LParen)?;
            p.parse_argument_list()?;
            p.accept(SymbolKind::RParen)
        })
    }

    /// <UntilStatement> ::= do <StatementList> until <Condition>
    ///
    /// FIRST set is `{do}`: `until` only follows the body, so `do` is the lookahead that
    /// selects this rule in `<Statement>`.
    fn parse_until(&mut self) -> Result<(), ParseError> {
        self.rule(Rule::UntilStatement, |p| {
            p.accept(SymbolKind::Do)?;
            p.parse_statement_list()?;
            p.accept(SymbolKind::Until)?;
            p.parse_condition()
        })
    }

    /// <ForStatement> ::= for ( <AssignmentStatement> ; <Condition> ; <AssignmentStatement> )
    ///                    do <StatementList> end loop
    fn parse_for(&mut self) -> Result<(), ParseError> {
        self.rule(Rule::ForStatement, |p| {
            p.accept(SymbolKind::For)?;
            p.accept(SymbolKind::LParen)?;
            p.parse_assignment()?;
            p.accept(SymbolKind::Semicolon)?;
            p.parse_condition()?;
            p.accept(SymbolKind::Semicolon)?;
            p.parse_assignment()?;
            p.accept(SymbolKind::RParen)?;
            p.accept(SymbolKind::Do)?;
            p.parse_statement_list()?;
            p.accept(SymbolKind::End)?;
            p.accept(SymbolKind::Loop)
        })
    }

    /// <ArgumentList> ::= identifier | <ArgumentList> , identifier
    fn parse_argument_list(&mut self) -> Result<(), ParseError> {
        self.rule(Rule::ArgumentList, |p| {
            p.accept(SymbolKind::Identifier)?;
            while p.at_any(SymbolSet::COMMA) {
                p.accept(SymbolKind::Comma)?;
                p.accept(SymbolKind::Identifier)?;
            }
            Ok(())
        })
    }
}
