use serde::Serialize;

/// A byte range into the shared source buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// Token classification for Astro source.
///
/// Kinds are plain tags; token text is always recovered from the buffer
/// through the token's span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    // Frontmatter
    FrontmatterSeparator, // ---
    FrontmatterScript,

    // Tags
    TagStart,        // <
    EndTagStart,     // </
    TagEnd,          // >
    EmptyElementEnd, // />
    TagName,
    ComponentName,
    TagCharacters,

    // Attributes
    AttributeName,
    Equals,
    AttributeValueStartDelimiter,
    AttributeValue,
    AttributeValueEndDelimiter,

    // Content
    DataCharacters,
    WhiteSpace,
    CharEntityRef,
    RawText,
    Doctype,

    // Comments
    CommentStart, // <!--
    CommentCharacters,
    CommentEnd, // -->

    // Expressions
    ExpressionStart, // {
    ExpressionEnd,   // }
    Script(ScriptKind),

    BadCharacter,
}

impl TokenKind {
    /// Kinds the merging layer coalesces when they arrive back to back.
    pub fn is_mergeable(self) -> bool {
        matches!(
            self,
            TokenKind::CommentCharacters
                | TokenKind::WhiteSpace
                | TokenKind::AttributeValue
                | TokenKind::DataCharacters
                | TokenKind::TagCharacters
                | TokenKind::Script(ScriptKind::TemplateString)
                | TokenKind::BadCharacter
        )
    }

    /// Kinds that open an embedded region inside a tag context.
    pub fn is_tag_embedment_start(self) -> bool {
        matches!(self, TokenKind::FrontmatterScript)
    }
}

/// Token classification for the script grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ScriptKind {
    WhiteSpace,
    LineComment,
    BlockComment,

    Identifier,
    Keyword,
    Number,
    String,
    TemplateString,

    // Delimiters
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,

    // Punctuation
    Semicolon,
    Comma,
    Dot,
    Eq,
    Operator,

    BadCharacter,
}

/// A single token: its kind and the span it covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    #[serde(flatten)]
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn start(&self) -> usize {
        self.span.start
    }

    pub fn end(&self) -> usize {
        self.span.end
    }

    /// The slice of `source` this token covers.
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.span.start..self.span.end]
    }
}
