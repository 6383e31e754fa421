//! Astro Lexer
//!
//! Tokenizes `.astro` component files: a `---` fenced frontmatter script
//! followed by HTML-like markup with `{…}` expressions that may embed
//! markup again. Tokens can be resumed from any restartable boundary
//! through a position snapshot, which is what incremental re-highlighting
//! needs.
//!
//! The stack is layered: [`Scanner`] produces raw tokens, [`MergingLexer`]
//! coalesces runs of them, and [`AstroLexer`] hands the frontmatter block
//! to a [`ScriptLexer`].
//!
//! # Example
//!
//! ```
//! use astro_lexer::{AstroLexer, TokenKind};
//!
//! let source = "<Card title={name}/>";
//! let tokens = AstroLexer::tokenize(source);
//! assert_eq!(tokens[1].kind, TokenKind::ComponentName);
//! assert_eq!(tokens[1].text(source), "Card");
//! ```

pub mod astro;
pub mod lexer;
pub mod merging;
pub mod scanner;
pub mod script;
pub mod stack;
pub mod token;

pub use astro::AstroLexer;
pub use lexer::{collect_tokens, Lexer};
pub use merging::{MergeMode, MergingLexer};
pub use scanner::{is_possibly_component_tag, LexerPosition, Scanner, ScannerMode, HAS_NON_RESTARTABLE_STATE};
pub use script::ScriptLexer;
pub use token::{ScriptKind, Span, Token, TokenKind};

/// Misuse of a lexer that it recovered from.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexerError {
    #[error("state {state:#x} is not restartable, starting from the initial state")]
    NonRestartableState { state: u32 },

    #[error("no position snapshot at offset {offset}: frontmatter script is being delegated")]
    SnapshotWhileDelegating { offset: usize },
}
