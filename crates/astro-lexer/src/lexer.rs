//! The token-stream contract shared by every layer of the lexer.

use std::sync::Arc;

use crate::token::{Token, TokenKind};
use crate::LexerError;

/// A pull-based token stream over a shared buffer.
///
/// After `start`, the accessors describe the current token; `advance`
/// moves to the next one. `token_type` returns `None` once the stream is
/// exhausted.
pub trait Lexer {
    /// Everything needed to resume this lexer at a token boundary.
    type Position: Clone;

    fn start(&mut self, buffer: Arc<str>, start: usize, end: usize, initial_state: u32);

    fn advance(&mut self);

    fn token_type(&self) -> Option<TokenKind>;

    fn token_start(&self) -> usize;

    fn token_end(&self) -> usize;

    /// Lexer state at the start of the current token.
    fn state(&self) -> u32;

    fn buffer(&self) -> &Arc<str>;

    fn buffer_end(&self) -> usize;

    fn current_position(&self) -> Result<Self::Position, LexerError>;

    fn restore(&mut self, position: Self::Position);

    /// The current token, or `None` at end of stream.
    fn token(&self) -> Option<Token> {
        self.token_type()
            .map(|kind| Token::new(kind, crate::Span::new(self.token_start(), self.token_end())))
    }
}

/// Drains a started lexer into a vector.
pub fn collect_tokens<L: Lexer + ?Sized>(lexer: &mut L) -> Vec<Token> {
    let mut tokens = Vec::new();
    while let Some(token) = lexer.token() {
        tokens.push(token);
        lexer.advance();
    }
    tokens
}
