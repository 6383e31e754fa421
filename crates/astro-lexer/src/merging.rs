//! Merging layer.
//!
//! Coalesces runs of raw tokens that form one logical unit (a line-split
//! comment, a word-split text run, an attribute value) so consumers see a
//! single token per run.

use std::sync::Arc;

use crate::lexer::Lexer;
use crate::token::TokenKind;
use crate::LexerError;

/// How aggressively raw tokens are merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergeMode {
    #[default]
    Normal,
    /// Entity references inside attribute values are folded into the
    /// surrounding value text.
    Highlight,
}

/// A token stream over `original` with mergeable runs coalesced.
pub struct MergingLexer<L: Lexer> {
    original: L,
    mode: MergeMode,
    token: Option<TokenKind>,
    token_start: usize,
    state: u32,
    position: Option<L::Position>,
}

impl<L: Lexer> MergingLexer<L> {
    /// Wrap `original`; nothing is read until `start` or `restore`.
    pub fn new(original: L, mode: MergeMode) -> Self {
        Self {
            original,
            mode,
            token: None,
            token_start: 0,
            state: 0,
            position: None,
        }
    }

    pub fn original(&self) -> &L {
        &self.original
    }

    fn locate(&mut self) {
        self.token_start = self.original.token_start();
        self.state = self.original.state();
        self.position = self.original.current_position().ok();
        self.token = self.original.token_type().map(|kind| {
            self.original.advance();
            self.merge(kind)
        });
    }

    fn merge(&mut self, kind: TokenKind) -> TokenKind {
        let mut result = kind;
        // Zero-width raw tokens share the start of the token that follows.
        while self.original.token_start() == self.token_start {
            let Some(next) = self.original.token_type() else {
                break;
            };
            result = next;
            self.original.advance();
        }

        if result.is_mergeable() {
            while self.original.token_type() == Some(result) {
                self.original.advance();
            }
        }

        if self.mode == MergeMode::Highlight
            && matches!(result, TokenKind::CharEntityRef | TokenKind::AttributeValue)
        {
            let mut has_value_text = result == TokenKind::AttributeValue;
            while let Some(next @ (TokenKind::CharEntityRef | TokenKind::AttributeValue)) =
                self.original.token_type()
            {
                has_value_text |= next == TokenKind::AttributeValue;
                self.original.advance();
            }
            if has_value_text {
                return TokenKind::AttributeValue;
            }
        }
        result
    }
}

impl<L: Lexer> Lexer for MergingLexer<L> {
    type Position = L::Position;

    fn start(&mut self, buffer: Arc<str>, start: usize, end: usize, initial_state: u32) {
        self.original.start(buffer, start, end, initial_state);
        self.locate();
    }

    fn advance(&mut self) {
        if self.token.is_some() {
            self.locate();
        }
    }

    fn token_type(&self) -> Option<TokenKind> {
        self.token
    }

    fn token_start(&self) -> usize {
        self.token_start
    }

    fn token_end(&self) -> usize {
        if self.token.is_some() {
            self.original.token_start()
        } else {
            self.token_start
        }
    }

    fn state(&self) -> u32 {
        self.state
    }

    fn buffer(&self) -> &Arc<str> {
        self.original.buffer()
    }

    fn buffer_end(&self) -> usize {
        self.original.buffer_end()
    }

    fn current_position(&self) -> Result<L::Position, LexerError> {
        match &self.position {
            Some(position) => Ok(position.clone()),
            None => self.original.current_position(),
        }
    }

    fn restore(&mut self, position: L::Position) {
        self.original.restore(position);
        self.locate();
    }
}
