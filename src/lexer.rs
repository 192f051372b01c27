use std::fmt;
use std::iter::Peekable;
use std::str::CharIndices;

use thiserror::Error;

use crate::limits::CheckerLimits;
use crate::source::TokenSource;

// Token types

/// Terminal alphabet of the grammar.
///
/// The discriminants are stable: [`crate::parser::SymbolSet`] uses them as bit positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SymbolKind {
    // Keywords (11 total)
    Begin,
    End,
    If,
    Then,
    Else,
    While,
    Loop,
    Call,
    Do,
    Until,
    For,

    // Literal classes
    Identifier,
    NumberConstant,
    StringConstant,

    // Punctuation
    Semicolon, // ;
    Comma,     // ,
    LParen,    // (
    RParen,    // )
    Becomes,   // :=

    // Operators
    Plus,         // +
    Minus,        // -
    Times,        // *
    Divide,       // /
    Modulus,      // %
    GreaterThan,  // >
    GreaterEqual, // >=
    Equal,        // =
    NotEqual,     // !=
    LessThan,     // <
    LessEqual,    // <=

    // Special
    Eof,
}

impl SymbolKind {
    pub const ALL: [SymbolKind; 31] = [
        SymbolKind::Begin,
        SymbolKind::End,
        SymbolKind::If,
        SymbolKind::Then,
        SymbolKind::Else,
        SymbolKind::While,
        SymbolKind::Loop,
        SymbolKind::Call,
        SymbolKind::Do,
        SymbolKind::Until,
        SymbolKind::For,
        SymbolKind::Identifier,
        SymbolKind::NumberConstant,
        SymbolKind::StringConstant,
        SymbolKind::Semicolon,
        SymbolKind::Comma,
        SymbolKind::LParen,
        SymbolKind::RParen,
        SymbolKind::Becomes,
        SymbolKind::Plus,
        SymbolKind::Minus,
        SymbolKind::Times,
        SymbolKind::Divide,
        SymbolKind::Modulus,
        SymbolKind::GreaterThan,
        SymbolKind::GreaterEqual,
        SymbolKind::Equal,
        SymbolKind::NotEqual,
        SymbolKind::LessThan,
        SymbolKind::LessEqual,
        SymbolKind::Eof,
    ];

    /// Human-readable name used in diagnostics
    pub fn name(self) -> &'static str {
        match self {
            SymbolKind::Begin => "begin",
            SymbolKind::End => "end",
            SymbolKind::If => "if",
            SymbolKind::Then => "then",
            SymbolKind::Else => "else",
            SymbolKind::While => "while",
            SymbolKind::Loop => "loop",
            SymbolKind::Call => "call",
            SymbolKind::Do => "do",
            SymbolKind::Until => "until",
            SymbolKind::For => "for",
            SymbolKind::Identifier => "identifier",
            SymbolKind::NumberConstant => "number constant",
            SymbolKind::StringConstant => "string constant",
            SymbolKind::Semicolon => "';'",
            SymbolKind::Comma => "','",
            SymbolKind::LParen => "'('",
            SymbolKind::RParen => "')'",
            SymbolKind::Becomes => "':='",
            SymbolKind::Plus => "'+'",
            SymbolKind::Minus => "'-'",
            SymbolKind::Times => "'*'",
            SymbolKind::Divide => "'/'",
            SymbolKind::Modulus => "'%'",
            SymbolKind::GreaterThan => "'>'",
            SymbolKind::GreaterEqual => "'>='",
            SymbolKind::Equal => "'='",
            SymbolKind::NotEqual => "'!='",
            SymbolKind::LessThan => "'<'",
            SymbolKind::LessEqual => "'<='",
            SymbolKind::Eof => "end of file",
        }
    }

    fn keyword(text: &str) -> Option<SymbolKind> {
        let kind = match text {
            "begin" => SymbolKind::Begin,
            "end" => SymbolKind::End,
            "if" => SymbolKind::If,
            "then" => SymbolKind::Then,
            "else" => SymbolKind::Else,
            "while" => SymbolKind::While,
            "loop" => SymbolKind::Loop,
            "call" => SymbolKind::Call,
            "do" => SymbolKind::Do,
            "until" => SymbolKind::Until,
            "for" => SymbolKind::For,
            _ => return None,
        };
        Some(kind)
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: SymbolKind,
    pub text: String, // Lexeme; string constants exclude their quotes
    pub line: usize,  // 1-indexed
    pub column: usize, // 1-indexed
}

impl Token {
    pub fn new(kind: SymbolKind, text: impl Into<String>, line: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            line,
            column: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Lexical error at {line}:{column}: {message}")]
pub struct LexError {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

// Lexer

pub struct Lexer<'a> {
    source: &'a str,
    chars: Peekable<CharIndices<'a>>,
    pos: usize,
    line: usize,
    column: usize,
    limits: &'a CheckerLimits,
    token_count: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str, limits: &'a CheckerLimits) -> Result<Self, LexError> {
        if source.len() > limits.max_input_size {
            return Err(LexError {
                message: format!(
                    "Input too large: {} bytes (max: {} bytes)",
                    source.len(),
                    limits.max_input_size
                ),
                line: 1,
                column: 1,
            });
        }

        Ok(Self {
            source,
            chars: source.char_indices().peekable(),
            pos: 0,
            line: 1,
            column: 1,
            limits,
            token_count: 0,
        })
    }

    // Character navigation methods

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, c)| *c)
    }

    fn peek_char2(&mut self) -> Option<char> {
        let mut iter = self.chars.clone();
        iter.next();
        iter.peek().map(|(_, c)| *c)
    }

    fn consume_char(&mut self) -> Option<char> {
        if let Some((pos, ch)) = self.chars.next() {
            self.pos = pos + ch.len_utf8();

            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }

            Some(ch)
        } else {
            None
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek_char() {
            if c == ' ' || c == '\t' || c == '\r' || c == '\n' {
                self.consume_char();
            } else {
                break;
            }
        }
    }

    fn consume_while<F>(&mut self, predicate: F) -> bool
    where
        F: Fn(char) -> bool,
    {
        let mut consumed = false;
        while let Some(c) = self.peek_char() {
            if predicate(c) {
                self.consume_char();
                consumed = true;
            } else {
                break;
            }
        }
        consumed
    }

    fn error(&self, message: String) -> LexError {
        LexError {
            message,
            line: self.line,
            column: self.column,
        }
    }

    // Main tokenization method

    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace();

        let start_line = self.line;
        let start_column = self.column;
        let start = self.pos;

        let (kind, text) = match self.peek_char() {
            None => (SymbolKind::Eof, String::new()),
            Some(c) if c.is_ascii_digit() => {
                self.lex_number()?;
                (SymbolKind::NumberConstant, self.source[start..self.pos].to_string())
            }
            Some(c) if is_ident_start(c) => self.lex_ident_or_keyword()?,
            Some('"') => self.lex_string()?,
            Some(_) => {
                let kind = self.lex_symbol()?;
                (kind, self.source[start..self.pos].to_string())
            }
        };

        if kind != SymbolKind::Eof {
            if self.token_count >= self.limits.max_token_count {
                return Err(LexError {
                    message: format!(
                        "Token limit exceeded: {} tokens (max: {})",
                        self.token_count, self.limits.max_token_count
                    ),
                    line: start_line,
                    column: start_column,
                });
            }
            self.token_count += 1;
        }

        Ok(Token {
            kind,
            text,
            line: start_line,
            column: start_column,
        })
    }

    // Operators and punctuation, longest match first

    fn lex_symbol(&mut self) -> Result<SymbolKind, LexError> {
        let Some(c) = self.consume_char() else {
            return Err(self.error("Unexpected end of input".into()));
        };

        let kind = match c {
            ';' => SymbolKind::Semicolon,
            ',' => SymbolKind::Comma,
            '(' => SymbolKind::LParen,
            ')' => SymbolKind::RParen,
            '+' => SymbolKind::Plus,
            '-' => SymbolKind::Minus,
            '*' => SymbolKind::Times,
            '/' => SymbolKind::Divide,
            '%' => SymbolKind::Modulus,
            '=' => SymbolKind::Equal,
            ':' => {
                if self.peek_char() != Some('=') {
                    return Err(self.error("Expected '=' after ':'".into()));
                }
                self.consume_char();
                SymbolKind::Becomes
            }
            '!' => {
                if self.peek_char() != Some('=') {
                    return Err(self.error("Expected '=' after '!'".into()));
                }
                self.consume_char();
                SymbolKind::NotEqual
            }
            '>' => self.with_equal(SymbolKind::GreaterThan, SymbolKind::GreaterEqual),
            '<' => self.with_equal(SymbolKind::LessThan, SymbolKind::LessEqual),
            c => return Err(self.error(format!("Unexpected character: '{}'", c))),
        };

        Ok(kind)
    }

    fn with_equal(&mut self, single: SymbolKind, double: SymbolKind) -> SymbolKind {
        if self.peek_char() == Some('=') {
            self.consume_char();
            double
        } else {
            single
        }
    }

    // Identifier and keyword lexing

    fn lex_ident_or_keyword(&mut self) -> Result<(SymbolKind, String), LexError> {
        let start = self.pos;
        self.consume_while(is_ident_continue);

        let text = &self.source[start..self.pos];

        if let Some(kind) = SymbolKind::keyword(text) {
            return Ok((kind, text.to_string()));
        }

        if text.len() > self.limits.max_identifier_length {
            return Err(self.error(format!(
                "Identifier too long: {} bytes (max: {} bytes)",
                text.len(),
                self.limits.max_identifier_length
            )));
        }

        Ok((SymbolKind::Identifier, text.to_string()))
    }

    // Number lexing: digits with an optional fractional part

    fn lex_number(&mut self) -> Result<(), LexError> {
        self.consume_while(|c| c.is_ascii_digit());

        if self.peek_char() == Some('.') {
            if !self.peek_char2().is_some_and(|c| c.is_ascii_digit()) {
                self.consume_char();
                return Err(self.error("Number must have digits after '.'".into()));
            }
            self.consume_char(); // '.'
            self.consume_while(|c| c.is_ascii_digit());
        }

        Ok(())
    }

    // String lexing

    fn lex_string(&mut self) -> Result<(SymbolKind, String), LexError> {
        self.consume_char(); // opening "
        let content_start = self.pos;

        loop {
            match self.peek_char() {
                None => {
                    return Err(self.error("Unterminated string constant".into()));
                }
                Some('\n') => {
                    return Err(self.error("Newline in string constant".into()));
                }
                Some('"') => {
                    let content_end = self.pos;
                    self.consume_char(); // closing "

                    let string_len = content_end - content_start;
                    if string_len > self.limits.max_string_length {
                        return Err(self.error(format!(
                            "String constant too long: {} bytes (max: {} bytes)",
                            string_len, self.limits.max_string_length
                        )));
                    }

                    let content = &self.source[content_start..content_end];
                    return Ok((SymbolKind::StringConstant, content.to_string()));
                }
                Some(_) => {
                    self.consume_char();
                }
            }
        }
    }
}

impl TokenSource for Lexer<'_> {
    fn next_token(&mut self) -> Result<Token, LexError> {
        Lexer::next_token(self)
    }
}

// Helper functions

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic()
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

// Public API

/// Tokenize a whole source text, including the final end-of-file token
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn lex(source: &str, limits: &CheckerLimits) -> Result<Vec<Token>, LexError> {
    let mut lexer = Lexer::new(source, limits)?;
    let mut tokens = Vec::new();

    loop {
        let token = lexer.next_token()?;
        let is_eof = token.kind == SymbolKind::Eof;
        tokens.push(token);
        if is_eof {
            break;
        }
    }

    tracing::debug!(token_count = tokens.len(), "lexed source");
    Ok(tokens)
}

// Tests

#[cfg(test)]
mod tests {
    use super::*;

    // Helper
    fn lex_single(source: &str) -> Result<Token, LexError> {
        let limits = CheckerLimits::default();
        let mut lexer = Lexer::new(source, &limits)?;
        lexer.next_token()
    }

    fn kinds(source: &str) -> Vec<SymbolKind> {
        lex(source, &CheckerLimits::default())
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_keywords() {
        assert_eq!(lex_single("begin").unwrap().kind, SymbolKind::Begin);
        assert_eq!(lex_single("end").unwrap().kind, SymbolKind::End);
        assert_eq!(lex_single("if").unwrap().kind, SymbolKind::If);
        assert_eq!(lex_single("then").unwrap().kind, SymbolKind::Then);
        assert_eq!(lex_single("else").unwrap().kind, SymbolKind::Else);
        assert_eq!(lex_single("while").unwrap().kind, SymbolKind::While);
        assert_eq!(lex_single("loop").unwrap().kind, SymbolKind::Loop);
        assert_eq!(lex_single("call").unwrap().kind, SymbolKind::Call);
        assert_eq!(lex_single("do").unwrap().kind, SymbolKind::Do);
        assert_eq!(lex_single("until").unwrap().kind, SymbolKind::Until);
        assert_eq!(lex_single("for").unwrap().kind, SymbolKind::For);

        // Keywords are case-sensitive
        assert_eq!(lex_single("Begin").unwrap().kind, SymbolKind::Identifier);
        assert_eq!(lex_single("END").unwrap().kind, SymbolKind::Identifier);
    }

    #[test]
    fn test_identifiers() {
        let tok = lex_single("foo_bar2").unwrap();
        assert_eq!(tok.kind, SymbolKind::Identifier);
        assert_eq!(tok.text, "foo_bar2");

        // Keyword prefix does not make a keyword
        assert_eq!(lex_single("ending").unwrap().kind, SymbolKind::Identifier);
        assert_eq!(lex_single("dox").unwrap().kind, SymbolKind::Identifier);
    }

    #[test]
    fn test_numbers() {
        let tok = lex_single("42").unwrap();
        assert_eq!(tok.kind, SymbolKind::NumberConstant);
        assert_eq!(tok.text, "42");

        let tok = lex_single("3.14").unwrap();
        assert_eq!(tok.kind, SymbolKind::NumberConstant);
        assert_eq!(tok.text, "3.14");

        assert!(lex_single("3.").is_err());
    }

    #[test]
    fn test_strings() {
        let tok = lex_single(r#""hello world""#).unwrap();
        assert_eq!(tok.kind, SymbolKind::StringConstant);
        assert_eq!(tok.text, "hello world"); // Content only, no quotes

        let tok = lex_single(r#""""#).unwrap();
        assert_eq!(tok.text, "");
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            kinds("; , ( ) := + - * / % > >= = != < <="),
            vec![
                SymbolKind::Semicolon,
                SymbolKind::Comma,
                SymbolKind::LParen,
                SymbolKind::RParen,
                SymbolKind::Becomes,
                SymbolKind::Plus,
                SymbolKind::Minus,
                SymbolKind::Times,
                SymbolKind::Divide,
                SymbolKind::Modulus,
                SymbolKind::GreaterThan,
                SymbolKind::GreaterEqual,
                SymbolKind::Equal,
                SymbolKind::NotEqual,
                SymbolKind::LessThan,
                SymbolKind::LessEqual,
                SymbolKind::Eof,
            ]
        );
    }

    #[test]
    fn test_operators_without_spaces() {
        assert_eq!(
            kinds("x:=a>=b"),
            vec![
                SymbolKind::Identifier,
                SymbolKind::Becomes,
                SymbolKind::Identifier,
                SymbolKind::GreaterEqual,
                SymbolKind::Identifier,
                SymbolKind::Eof,
            ]
        );
    }

    #[test]
    fn test_errors() {
        // Unterminated string
        assert!(lex_single(r#""hello"#).is_err());

        // Newline in string
        assert!(lex_single("\"hello\nworld\"").is_err());

        // Lone colon and bang
        assert!(lex_single(":").is_err());
        assert!(lex_single("! x").is_err());

        let err = lex_single("#").unwrap_err();
        assert_eq!(err.message, "Unexpected character: '#'");
        assert_eq!(err.to_string(), "Lexical error at 1:2: Unexpected character: '#'");
    }

    #[test]
    fn test_line_tracking() {
        let tokens = lex("begin\n  x := 1\nend", &CheckerLimits::default()).unwrap();

        assert_eq!(tokens[0].line, 1);
        assert_eq!(tokens[1].line, 2);
        assert_eq!(tokens[1].column, 3);
        assert_eq!(tokens[3].line, 2);
        assert_eq!(tokens[4].kind, SymbolKind::End);
        assert_eq!(tokens[4].line, 3);
    }

    #[test]
    fn test_eof_repeats() {
        let limits = CheckerLimits::default();
        let mut lexer = Lexer::new("x", &limits).unwrap();
        assert_eq!(lexer.next_token().unwrap().kind, SymbolKind::Identifier);
        assert_eq!(lexer.next_token().unwrap().kind, SymbolKind::Eof);
        assert_eq!(lexer.next_token().unwrap().kind, SymbolKind::Eof);
    }

    #[test]
    fn test_empty_source() {
        assert_eq!(kinds(""), vec![SymbolKind::Eof]);
        assert_eq!(kinds("  \t\n  "), vec![SymbolKind::Eof]);
    }

    #[test]
    fn test_limits() {
        let limits = CheckerLimits {
            max_identifier_length: 3,
            max_token_count: 2,
            ..CheckerLimits::default()
        };

        let err = lex("abcd", &limits).unwrap_err();
        assert!(err.message.starts_with("Identifier too long"));

        let err = lex("a b c", &limits).unwrap_err();
        assert!(err.message.starts_with("Token limit exceeded"));
        assert_eq!(err.column, 5);

        let limits = CheckerLimits {
            max_input_size: 4,
            ..CheckerLimits::default()
        };
        assert!(Lexer::new("begin", &limits).is_err());
    }
}
