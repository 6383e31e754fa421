//! Script grammar tokenizer.
//!
//! Tokenizes the TypeScript-flavoured script found in the frontmatter block
//! and inside `{…}` expressions. Scanning one token needs nothing but the
//! buffer and an offset, so the same routine serves the frontmatter
//! delegate and the markup scanner's expression state.

use std::sync::Arc;

use crate::lexer::Lexer;
use crate::token::{ScriptKind, TokenKind};
use crate::LexerError;

const KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "case", "catch", "class", "const", "continue", "default",
    "delete", "do", "else", "export", "extends", "false", "finally", "for", "from", "function",
    "if", "import", "in", "instanceof", "interface", "let", "new", "null", "of", "return",
    "switch", "this", "throw", "true", "try", "type", "typeof", "undefined", "var", "void",
    "while", "yield",
];

const OPERATOR_CHARS: &[char] = &[
    '+', '-', '*', '/', '%', '<', '>', '!', '&', '|', '^', '~', '?', ':', '=', '@', '#',
];

/// Scan one script token starting at `pos`, never reading past `end`.
///
/// Returns the token kind and its end offset. Always consumes at least one
/// character when `pos < end`.
pub fn scan_token(source: &str, pos: usize, end: usize) -> (ScriptKind, usize) {
    let text = &source[..end];
    let rest = &text[pos..];
    let mut chars = rest.chars();
    let Some(ch) = chars.next() else {
        return (ScriptKind::BadCharacter, pos);
    };
    let next = chars.next();

    match ch {
        c if c.is_whitespace() => (ScriptKind::WhiteSpace, take_while(text, pos, char::is_whitespace)),

        '/' if next == Some('/') => {
            let stop = rest.find(['\n', '\r']).map_or(end, |i| pos + i);
            (ScriptKind::LineComment, stop)
        }
        '/' if next == Some('*') => {
            let stop = rest[2..].find("*/").map_or(end, |i| pos + 2 + i + 2);
            (ScriptKind::BlockComment, stop)
        }

        '"' | '\'' => (ScriptKind::String, scan_string(text, pos, ch)),
        '`' => (ScriptKind::TemplateString, scan_template(text, pos)),

        '0'..='9' => (ScriptKind::Number, scan_number(text, pos)),
        '.' if next.is_some_and(|c| c.is_ascii_digit()) => (ScriptKind::Number, scan_number(text, pos)),

        c if is_ident_start(c) => {
            let stop = take_while(text, pos, is_ident_part);
            let kind = if KEYWORDS.contains(&&text[pos..stop]) {
                ScriptKind::Keyword
            } else {
                ScriptKind::Identifier
            };
            (kind, stop)
        }

        '(' => (ScriptKind::LParen, pos + 1),
        ')' => (ScriptKind::RParen, pos + 1),
        '[' => (ScriptKind::LBracket, pos + 1),
        ']' => (ScriptKind::RBracket, pos + 1),
        '{' => (ScriptKind::LBrace, pos + 1),
        '}' => (ScriptKind::RBrace, pos + 1),
        ';' => (ScriptKind::Semicolon, pos + 1),
        ',' => (ScriptKind::Comma, pos + 1),
        '.' if rest.starts_with("...") => (ScriptKind::Operator, pos + 3),
        '.' => (ScriptKind::Dot, pos + 1),
        '=' if !next.is_some_and(|c| c == '=' || c == '>') => (ScriptKind::Eq, pos + 1),

        c if OPERATOR_CHARS.contains(&c) => {
            (ScriptKind::Operator, take_while(text, pos, |c| OPERATOR_CHARS.contains(&c)))
        }

        c => (ScriptKind::BadCharacter, pos + c.len_utf8()),
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_part(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

fn take_while(text: &str, pos: usize, pred: impl Fn(char) -> bool) -> usize {
    text[pos..]
        .char_indices()
        .find(|&(_, c)| !pred(c))
        .map_or(text.len(), |(i, _)| pos + i)
}

/// Quoted strings stop at the closing quote or, unterminated, at the line end.
fn scan_string(text: &str, pos: usize, quote: char) -> usize {
    let mut escaped = false;
    for (i, c) in text[pos + 1..].char_indices() {
        let at = pos + 1 + i;
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '\n' | '\r' => return at,
            c if c == quote => return at + 1,
            _ => {}
        }
    }
    text.len()
}

/// Template literals are one token, including any `${…}` substitutions.
fn scan_template(text: &str, pos: usize) -> usize {
    let bytes = text.as_bytes();
    let mut i = pos + 1;
    let mut depth = 0usize;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 1,
            b'$' if depth == 0 && bytes.get(i + 1) == Some(&b'{') => {
                depth = 1;
                i += 1;
            }
            b'{' if depth > 0 => depth += 1,
            b'}' if depth > 0 => depth -= 1,
            b'`' if depth == 0 => return i + 1,
            _ => {}
        }
        i += 1;
    }
    text.len()
}

fn scan_number(text: &str, pos: usize) -> usize {
    if text[pos..].starts_with("0x") || text[pos..].starts_with("0X") {
        return take_while(text, pos + 2, |c| c.is_ascii_hexdigit() || c == '_');
    }
    let mut stop = take_while(text, pos, |c| c.is_ascii_digit() || c == '_' || c == '.');
    let rest = &text[stop..];
    if rest.starts_with(['e', 'E']) {
        let sign = usize::from(rest[1..].starts_with(['+', '-']));
        if rest[1 + sign..].starts_with(|c: char| c.is_ascii_digit()) {
            stop = take_while(text, stop + 1 + sign, |c| c.is_ascii_digit());
        }
    }
    stop
}

/// Resume point for a [`ScriptLexer`]: the grammar carries no state beyond
/// the offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptPosition {
    pub offset: usize,
}

/// Script-grammar token stream over one region of a buffer.
pub struct ScriptLexer {
    buffer: Arc<str>,
    end: usize,
    token: Option<(ScriptKind, usize, usize)>,
}

impl ScriptLexer {
    /// Create an idle lexer; `start` gives it a region to scan.
    pub fn new() -> Self {
        Self {
            buffer: Arc::from(""),
            end: 0,
            token: None,
        }
    }

    fn locate(&mut self, pos: usize) {
        self.token = (pos < self.end).then(|| {
            let (kind, stop) = scan_token(&self.buffer, pos, self.end);
            (kind, pos, stop)
        });
    }

    /// Tokenize a standalone script snippet.
    pub fn tokenize(source: &str) -> Vec<crate::Token> {
        let mut lexer = ScriptLexer::new();
        lexer.start(Arc::from(source), 0, source.len(), 0);
        crate::lexer::collect_tokens(&mut lexer)
    }
}

impl Default for ScriptLexer {
    fn default() -> Self {
        Self::new()
    }
}

impl Lexer for ScriptLexer {
    type Position = ScriptPosition;

    fn start(&mut self, buffer: Arc<str>, start: usize, end: usize, _initial_state: u32) {
        self.buffer = buffer;
        self.end = end;
        self.locate(start);
    }

    fn advance(&mut self) {
        if let Some((_, _, stop)) = self.token {
            self.locate(stop);
        }
    }

    fn token_type(&self) -> Option<TokenKind> {
        self.token.map(|(kind, _, _)| TokenKind::Script(kind))
    }

    fn token_start(&self) -> usize {
        self.token.map_or(self.end, |(_, start, _)| start)
    }

    fn token_end(&self) -> usize {
        self.token.map_or(self.end, |(_, _, stop)| stop)
    }

    fn state(&self) -> u32 {
        0
    }

    fn buffer(&self) -> &Arc<str> {
        &self.buffer
    }

    fn buffer_end(&self) -> usize {
        self.end
    }

    fn current_position(&self) -> Result<ScriptPosition, LexerError> {
        Ok(ScriptPosition {
            offset: self.token_start(),
        })
    }

    fn restore(&mut self, position: ScriptPosition) {
        self.locate(position.offset);
    }
}
