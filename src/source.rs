use crate::lexer::{LexError, SymbolKind, Token};

/// Pull-based token supply for the parser.
///
/// The parser calls `next_token` once to prime its lookahead and once per accepted
/// terminal. Errors are propagated to the caller untouched.
pub trait TokenSource {
    fn next_token(&mut self) -> Result<Token, LexError>;
}

impl<S: TokenSource + ?Sized> TokenSource for &mut S {
    fn next_token(&mut self) -> Result<Token, LexError> {
        (**self).next_token()
    }
}

/// Token source over an already materialised token vector.
///
/// Once the vector is exhausted it keeps yielding end-of-file tokens on the line of the
/// last token seen.
#[derive(Debug, Clone)]
pub struct VecSource {
    tokens: std::vec::IntoIter<Token>,
    last_line: usize,
}

impl VecSource {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens: tokens.into_iter(),
            last_line: 1,
        }
    }
}

impl TokenSource for VecSource {
    fn next_token(&mut self) -> Result<Token, LexError> {
        match self.tokens.next() {
            Some(token) => {
                self.last_line = token.line;
                Ok(token)
            }
            None => Ok(Token::new(SymbolKind::Eof, "", self.last_line)),
        }
    }
}
