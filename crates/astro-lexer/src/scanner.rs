//! Markup scanner for Astro component files.
//!
//! A pull-based state machine over the markup grammar. Besides the integer
//! state it tracks two stacks: the expression stack (one entry per open
//! `{`) and the element-name stack (one entry per open tag). Both are
//! persistent [`Stack`]s, so a [`LexerPosition`] holds an independent
//! capture of them at the cost of two reference-count bumps.
//!
//! Stack effects of a token are applied when the scanner moves past it.
//! The stacks therefore always describe the start of the current token,
//! which is exactly what a restart at that token needs.

use std::sync::Arc;

use crate::lexer::Lexer;
use crate::script;
use crate::stack::Stack;
use crate::token::{ScriptKind, TokenKind};
use crate::LexerError;

// Grammar states. These values are reported by `Lexer::state` and accepted
// back by `Lexer::start`; they must stay stable.
pub const INITIAL: u32 = 0;
pub const HTML_INITIAL: u32 = 1;
pub const START_TAG_NAME: u32 = 2;
pub const END_TAG_NAME: u32 = 3;
pub const TAG_ATTRIBUTES: u32 = 4;
pub const ATTRIBUTE_VALUE_START: u32 = 5;
pub const ATTRIBUTE_VALUE_DQ: u32 = 6;
pub const ATTRIBUTE_VALUE_SQ: u32 = 7;
pub const END_TAG_BODY: u32 = 8;
pub const COMMENT: u32 = 9;
pub const RAW_TEXT: u32 = 10;
pub const EXPRESSION: u32 = 11;
pub const FRONTMATTER: u32 = 12;
pub const FRONTMATTER_CLOSE: u32 = 13;

const STATE_COUNT: u32 = 14;

/// Set in a reported state when the lexer holds substate that the integer
/// cannot describe. Bit 29 is reserved for this flag permanently; grammar
/// states never reach it.
pub const HAS_NON_RESTARTABLE_STATE: u32 = 1 << 29;

const FRONTMATTER_FENCE: &str = "---";

const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// A tag name denotes a component when it starts with an uppercase letter.
pub fn is_possibly_component_tag(tag_name: &str) -> bool {
    tag_name.chars().next().is_some_and(char::is_uppercase)
}

/// Scanner mode decides where a fresh scan begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScannerMode {
    /// A whole component file: optional frontmatter, then markup.
    Document,
    /// A bare script expression that may embed markup.
    Fragment,
}

// Expression stack entries pack the state to return to after the matching
// `}` with the element depth at which the `{` was seen.
fn expression_entry(return_state: u32, element_depth: usize) -> u32 {
    return_state | (element_depth as u32) << 8
}

fn return_state(entry: u32) -> u32 {
    entry & 0xff
}

fn element_depth(entry: u32) -> usize {
    (entry >> 8) as usize
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Effect {
    None,
    PushExpression(u32),
    PopExpression,
    PushElement(String),
    CloseElement(String),
    PopElement,
}

/// One scanned token plus what moving past it does to the scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Step {
    kind: TokenKind,
    end: usize,
    next_state: u32,
    effect: Effect,
}

impl Step {
    fn new(kind: TokenKind, end: usize, next_state: u32) -> Self {
        Self {
            kind,
            end,
            next_state,
            effect: Effect::None,
        }
    }

    fn with(mut self, effect: Effect) -> Self {
        self.effect = effect;
        self
    }
}

/// Everything needed to resume a [`Scanner`] at a token boundary.
///
/// Immutable once created; the stacks are captures that no live scanner
/// can modify.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexerPosition {
    offset: usize,
    state: u32,
    expression_stack: Stack<u32>,
    element_name_stack: Stack<String>,
}

impl LexerPosition {
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn state(&self) -> u32 {
        self.state
    }

    pub fn expression_stack(&self) -> Vec<u32> {
        self.expression_stack.to_vec()
    }

    pub fn element_name_stack(&self) -> Vec<String> {
        self.element_name_stack.to_vec()
    }
}

/// Astro markup scanner.
pub struct Scanner {
    mode: ScannerMode,
    buffer: Arc<str>,
    end: usize,
    token_start: usize,
    state: u32,
    token: Option<Step>,
    expression_stack: Stack<u32>,
    element_name_stack: Stack<String>,
}

impl Scanner {
    /// Create a scanner for whole component files.
    pub fn new() -> Self {
        Self::with_mode(ScannerMode::Document)
    }

    /// Create a scanner with a specific mode.
    pub fn with_mode(mode: ScannerMode) -> Self {
        Self {
            mode,
            buffer: Arc::from(""),
            end: 0,
            token_start: 0,
            state: INITIAL,
            token: None,
            expression_stack: Stack::new(),
            element_name_stack: Stack::new(),
        }
    }

    pub fn expression_stack(&self) -> &Stack<u32> {
        &self.expression_stack
    }

    pub fn element_name_stack(&self) -> &Stack<String> {
        &self.element_name_stack
    }

    /// Whether scanning can resume from `state` with stacks captured at
    /// the same point.
    pub fn is_restartable_state(state: u32) -> bool {
        state & HAS_NON_RESTARTABLE_STATE == 0 && state < STATE_COUNT
    }

    fn locate(&mut self) {
        self.token = (self.token_start < self.end).then(|| {
            let text = &self.buffer[..self.end];
            self.scan(text, self.token_start, self.state)
        });
    }

    /// Where markup content continues: back inside an expression when the
    /// markup that interrupted it has closed again.
    fn content_state(&self) -> u32 {
        let depth = self.element_name_stack.len();
        match self.expression_stack.peek() {
            Some(&entry) if element_depth(entry) == depth => EXPRESSION,
            None if self.mode == ScannerMode::Fragment && depth == 0 => EXPRESSION,
            _ => HTML_INITIAL,
        }
    }

    /// Elements below this depth belong to markup outside the current
    /// expression and are never closed from inside it.
    fn element_floor(&self) -> usize {
        self.expression_stack.peek().map_or(0, |&entry| element_depth(entry))
    }

    fn apply(&mut self, effect: Effect) {
        match effect {
            Effect::None => {}
            Effect::PushExpression(entry) => self.expression_stack.push(entry),
            Effect::PopExpression => self.expression_stack.drop_top(),
            Effect::PushElement(name) => self.element_name_stack.push(name),
            Effect::CloseElement(name) => {
                let open = self.element_name_stack.len().saturating_sub(self.element_floor());
                let found = self
                    .element_name_stack
                    .iter()
                    .take(open)
                    .position(|open_name| closes(open_name, &name));
                if let Some(index) = found {
                    for _ in 0..=index {
                        self.element_name_stack.drop_top();
                    }
                }
            }
            Effect::PopElement => {
                if self.element_name_stack.len() > self.element_floor() {
                    self.element_name_stack.drop_top();
                }
            }
        }
    }

    // --- Scanners ---

    fn scan(&self, text: &str, pos: usize, state: u32) -> Step {
        match state {
            INITIAL => self.scan_initial(text, pos),
            FRONTMATTER => scan_frontmatter(text, pos),
            FRONTMATTER_CLOSE if text[pos..].starts_with(FRONTMATTER_FENCE) => Step::new(
                TokenKind::FrontmatterSeparator,
                pos + FRONTMATTER_FENCE.len(),
                HTML_INITIAL,
            ),
            START_TAG_NAME => self.scan_tag_name(text, pos, true),
            END_TAG_NAME => self.scan_tag_name(text, pos, false),
            TAG_ATTRIBUTES => self.scan_tag_attributes(text, pos),
            ATTRIBUTE_VALUE_START => self.scan_attribute_value_start(text, pos),
            ATTRIBUTE_VALUE_DQ => scan_quoted_value(text, pos, '"', state),
            ATTRIBUTE_VALUE_SQ => scan_quoted_value(text, pos, '\'', state),
            END_TAG_BODY => scan_end_tag_body(text, pos),
            COMMENT => scan_comment(text, pos),
            RAW_TEXT => self.scan_raw_text(text, pos),
            EXPRESSION => self.scan_expression(text, pos),
            _ => self.scan_content(text, pos),
        }
    }

    fn scan_initial(&self, text: &str, pos: usize) -> Step {
        let rest = &text[pos..];
        if rest.starts_with(char::is_whitespace) {
            Step::new(TokenKind::WhiteSpace, line_whitespace(text, pos), INITIAL)
        } else if rest.starts_with(FRONTMATTER_FENCE) {
            Step::new(
                TokenKind::FrontmatterSeparator,
                pos + FRONTMATTER_FENCE.len(),
                FRONTMATTER,
            )
        } else {
            self.scan_content(text, pos)
        }
    }

    fn scan_content(&self, text: &str, pos: usize) -> Step {
        let rest = &text[pos..];
        let Some(ch) = rest.chars().next() else {
            return Step::new(TokenKind::BadCharacter, pos, HTML_INITIAL);
        };

        if rest.starts_with("<!--") {
            return Step::new(TokenKind::CommentStart, pos + 4, COMMENT);
        }
        if rest.starts_with("<!") {
            let end = rest.find('>').map_or(text.len(), |i| pos + i + 1);
            return Step::new(TokenKind::Doctype, end, HTML_INITIAL);
        }
        if rest.starts_with("</") && opens_tag(rest, 2) {
            return Step::new(TokenKind::EndTagStart, pos + 2, END_TAG_NAME);
        }
        if opens_tag(rest, 0) {
            return Step::new(TokenKind::TagStart, pos + 1, START_TAG_NAME);
        }

        match ch {
            '{' => {
                let entry = expression_entry(HTML_INITIAL, self.element_name_stack.len());
                Step::new(TokenKind::ExpressionStart, pos + 1, EXPRESSION)
                    .with(Effect::PushExpression(entry))
            }
            '&' => match entity_end(text, pos) {
                Some(end) => Step::new(TokenKind::CharEntityRef, end, HTML_INITIAL),
                None => Step::new(TokenKind::DataCharacters, pos + 1, HTML_INITIAL),
            },
            c if c.is_whitespace() => {
                Step::new(TokenKind::WhiteSpace, line_whitespace(text, pos), HTML_INITIAL)
            }
            c if c.is_control() => {
                Step::new(TokenKind::BadCharacter, pos + c.len_utf8(), HTML_INITIAL)
            }
            c if c.is_alphanumeric() => Step::new(
                TokenKind::DataCharacters,
                take_while(text, pos, char::is_alphanumeric),
                HTML_INITIAL,
            ),
            c => Step::new(TokenKind::DataCharacters, pos + c.len_utf8(), HTML_INITIAL),
        }
    }

    fn scan_tag_name(&self, text: &str, pos: usize, opening: bool) -> Step {
        if text[pos..].starts_with('>') {
            // `<>` and `</>` fragments are elements with an empty name.
            let effect = if opening {
                Effect::PushElement(String::new())
            } else {
                Effect::CloseElement(String::new())
            };
            return Step::new(TokenKind::TagEnd, pos + 1, HTML_INITIAL).with(effect);
        }
        let end = take_while(text, pos, is_tag_name_char);
        if end == pos {
            let fallback = if opening { TAG_ATTRIBUTES } else { END_TAG_BODY };
            return self.scan(text, pos, fallback);
        }

        let name = &text[pos..end];
        let kind = if is_possibly_component_tag(name) {
            TokenKind::ComponentName
        } else {
            TokenKind::TagName
        };
        if opening {
            Step::new(kind, end, TAG_ATTRIBUTES).with(Effect::PushElement(name.to_string()))
        } else {
            Step::new(kind, end, END_TAG_BODY).with(Effect::CloseElement(name.to_string()))
        }
    }

    fn scan_tag_attributes(&self, text: &str, pos: usize) -> Step {
        let rest = &text[pos..];
        let Some(ch) = rest.chars().next() else {
            return Step::new(TokenKind::TagCharacters, pos, TAG_ATTRIBUTES);
        };

        match ch {
            c if c.is_whitespace() => {
                Step::new(TokenKind::WhiteSpace, line_whitespace(text, pos), TAG_ATTRIBUTES)
            }
            '>' => self.scan_start_tag_end(pos),
            '/' if rest.starts_with("/>") => {
                Step::new(TokenKind::EmptyElementEnd, pos + 2, HTML_INITIAL)
                    .with(Effect::PopElement)
            }
            '{' => {
                let entry = expression_entry(TAG_ATTRIBUTES, self.element_name_stack.len());
                Step::new(TokenKind::ExpressionStart, pos + 1, EXPRESSION)
                    .with(Effect::PushExpression(entry))
            }
            '=' => Step::new(TokenKind::Equals, pos + 1, ATTRIBUTE_VALUE_START),
            c if is_attribute_name_char(c) => Step::new(
                TokenKind::AttributeName,
                take_while(text, pos, is_attribute_name_char),
                TAG_ATTRIBUTES,
            ),
            c => Step::new(TokenKind::TagCharacters, pos + c.len_utf8(), TAG_ATTRIBUTES),
        }
    }

    /// `>` closing a start tag: void elements close immediately, plain
    /// `script` and `style` switch to raw text.
    fn scan_start_tag_end(&self, pos: usize) -> Step {
        let open = self
            .element_name_stack
            .peek()
            .filter(|_| self.element_name_stack.len() > self.element_floor());
        match open.map(String::as_str) {
            Some(name) if VOID_ELEMENTS.contains(&name) => {
                Step::new(TokenKind::TagEnd, pos + 1, HTML_INITIAL).with(Effect::PopElement)
            }
            Some(name) if RAW_TEXT_ELEMENTS.contains(&name) => {
                Step::new(TokenKind::TagEnd, pos + 1, RAW_TEXT)
            }
            _ => Step::new(TokenKind::TagEnd, pos + 1, HTML_INITIAL),
        }
    }

    fn scan_attribute_value_start(&self, text: &str, pos: usize) -> Step {
        let rest = &text[pos..];
        let Some(ch) = rest.chars().next() else {
            return Step::new(TokenKind::TagCharacters, pos, TAG_ATTRIBUTES);
        };

        match ch {
            c if c.is_whitespace() => Step::new(
                TokenKind::WhiteSpace,
                line_whitespace(text, pos),
                ATTRIBUTE_VALUE_START,
            ),
            '"' => Step::new(TokenKind::AttributeValueStartDelimiter, pos + 1, ATTRIBUTE_VALUE_DQ),
            '\'' => Step::new(TokenKind::AttributeValueStartDelimiter, pos + 1, ATTRIBUTE_VALUE_SQ),
            '{' => {
                let entry = expression_entry(TAG_ATTRIBUTES, self.element_name_stack.len());
                Step::new(TokenKind::ExpressionStart, pos + 1, EXPRESSION)
                    .with(Effect::PushExpression(entry))
            }
            '>' => self.scan_tag_attributes(text, pos),
            '/' if rest.starts_with("/>") => self.scan_tag_attributes(text, pos),
            _ => {
                let mut end = text.len();
                for (i, c) in rest.char_indices() {
                    if c.is_whitespace() || c == '>' || rest[i..].starts_with("/>") {
                        end = pos + i;
                        break;
                    }
                }
                Step::new(TokenKind::AttributeValue, end, TAG_ATTRIBUTES)
            }
        }
    }

    fn scan_raw_text(&self, text: &str, pos: usize) -> Step {
        let close = self
            .element_name_stack
            .peek()
            .and_then(|name| find_close_tag(text, pos, name));
        match close {
            Some(at) if at == pos => Step::new(TokenKind::EndTagStart, pos + 2, END_TAG_NAME),
            Some(at) => Step::new(TokenKind::RawText, at, RAW_TEXT),
            None => Step::new(TokenKind::RawText, text.len(), RAW_TEXT),
        }
    }

    fn scan_expression(&self, text: &str, pos: usize) -> Step {
        let rest = &text[pos..];
        if rest.starts_with('{') {
            let entry = expression_entry(EXPRESSION, self.element_name_stack.len());
            return Step::new(TokenKind::Script(ScriptKind::LBrace), pos + 1, EXPRESSION)
                .with(Effect::PushExpression(entry));
        }
        if rest.starts_with('}') {
            return match self.expression_stack.peek() {
                None => Step::new(TokenKind::BadCharacter, pos + 1, EXPRESSION),
                Some(&entry) if return_state(entry) == EXPRESSION => {
                    Step::new(TokenKind::Script(ScriptKind::RBrace), pos + 1, EXPRESSION)
                        .with(Effect::PopExpression)
                }
                Some(&entry) => Step::new(TokenKind::ExpressionEnd, pos + 1, return_state(entry))
                    .with(Effect::PopExpression),
            };
        }
        if rest.starts_with("</") && opens_tag(rest, 2) {
            return Step::new(TokenKind::EndTagStart, pos + 2, END_TAG_NAME);
        }
        if opens_tag(rest, 0) {
            return Step::new(TokenKind::TagStart, pos + 1, START_TAG_NAME);
        }

        let (kind, end) = script::scan_token(text, pos, text.len());
        Step::new(TokenKind::Script(kind), end, EXPRESSION)
    }
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new()
    }
}

impl Lexer for Scanner {
    type Position = LexerPosition;

    fn start(&mut self, buffer: Arc<str>, start: usize, end: usize, initial_state: u32) {
        self.expression_stack.clear();
        self.element_name_stack.clear();
        let state = initial_state & !HAS_NON_RESTARTABLE_STATE;
        self.state = match (state, self.mode) {
            (INITIAL, ScannerMode::Fragment) => EXPRESSION,
            _ => state,
        };
        self.buffer = buffer;
        self.end = end;
        self.token_start = start;
        self.locate();
    }

    fn advance(&mut self) {
        let Some(step) = self.token.take() else {
            return;
        };
        self.apply(step.effect);
        self.state = if step.next_state == HTML_INITIAL {
            self.content_state()
        } else {
            step.next_state
        };
        self.token_start = step.end;
        self.locate();
    }

    fn token_type(&self) -> Option<TokenKind> {
        self.token.as_ref().map(|step| step.kind)
    }

    fn token_start(&self) -> usize {
        self.token_start
    }

    fn token_end(&self) -> usize {
        self.token.as_ref().map_or(self.token_start, |step| step.end)
    }

    fn state(&self) -> u32 {
        self.state
    }

    fn buffer(&self) -> &Arc<str> {
        &self.buffer
    }

    fn buffer_end(&self) -> usize {
        self.end
    }

    fn current_position(&self) -> Result<LexerPosition, LexerError> {
        Ok(LexerPosition {
            offset: self.token_start,
            state: self.state,
            expression_stack: self.expression_stack.clone(),
            element_name_stack: self.element_name_stack.clone(),
        })
    }

    fn restore(&mut self, position: LexerPosition) {
        self.expression_stack = position.expression_stack;
        self.element_name_stack = position.element_name_stack;
        self.state = position.state;
        self.token_start = position.offset;
        self.locate();
    }
}

// --- Stateless scanners ---

fn scan_frontmatter(text: &str, pos: usize) -> Step {
    match text[pos..].find("\n---") {
        Some(i) => Step::new(TokenKind::FrontmatterScript, pos + i + 1, FRONTMATTER_CLOSE),
        None => Step::new(TokenKind::FrontmatterScript, text.len(), FRONTMATTER_CLOSE),
    }
}

fn scan_quoted_value(text: &str, pos: usize, quote: char, state: u32) -> Step {
    let rest = &text[pos..];
    let Some(ch) = rest.chars().next() else {
        return Step::new(TokenKind::AttributeValue, pos, state);
    };

    match ch {
        c if c == quote => {
            Step::new(TokenKind::AttributeValueEndDelimiter, pos + 1, TAG_ATTRIBUTES)
        }
        '&' => match entity_end(text, pos) {
            Some(end) => Step::new(TokenKind::CharEntityRef, end, state),
            None => Step::new(TokenKind::AttributeValue, pos + 1, state),
        },
        c if c.is_whitespace() => {
            Step::new(TokenKind::AttributeValue, line_whitespace(text, pos), state)
        }
        _ => Step::new(
            TokenKind::AttributeValue,
            take_while(text, pos, |c| c != quote && c != '&' && !c.is_whitespace()),
            state,
        ),
    }
}

fn scan_end_tag_body(text: &str, pos: usize) -> Step {
    match text[pos..].chars().next() {
        Some(c) if c.is_whitespace() => {
            Step::new(TokenKind::WhiteSpace, line_whitespace(text, pos), END_TAG_BODY)
        }
        Some('>') => Step::new(TokenKind::TagEnd, pos + 1, HTML_INITIAL),
        Some(c) => Step::new(TokenKind::TagCharacters, pos + c.len_utf8(), END_TAG_BODY),
        None => Step::new(TokenKind::TagCharacters, pos, END_TAG_BODY),
    }
}

/// Comment text is reported one line at a time; the merging layer joins it.
fn scan_comment(text: &str, pos: usize) -> Step {
    let rest = &text[pos..];
    if rest.starts_with("-->") {
        return Step::new(TokenKind::CommentEnd, pos + 3, HTML_INITIAL);
    }
    if rest.starts_with('\n') {
        return Step::new(TokenKind::CommentCharacters, pos + 1, COMMENT);
    }
    let end = rest
        .char_indices()
        .find(|&(i, c)| c == '\n' || rest[i..].starts_with("-->"))
        .map_or(text.len(), |(i, _)| pos + i);
    Step::new(TokenKind::CommentCharacters, end, COMMENT)
}

// --- Helpers ---

/// `<` followed by a letter or `>` opens a tag; `at` skips the `<` or `</`.
fn opens_tag(rest: &str, at: usize) -> bool {
    let after = if at == 0 { 1 } else { at };
    rest.starts_with('<')
        && rest[after..]
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '>')
}

fn is_tag_name_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | ':')
}

fn is_attribute_name_char(c: char) -> bool {
    !c.is_whitespace() && !matches!(c, '=' | '>' | '/' | '{' | '}' | '"' | '\'' | '<')
}

fn take_while(text: &str, pos: usize, pred: impl Fn(char) -> bool) -> usize {
    text[pos..]
        .char_indices()
        .find(|&(_, c)| !pred(c))
        .map_or(text.len(), |(i, _)| pos + i)
}

/// Whitespace up to and including the first line break.
fn line_whitespace(text: &str, pos: usize) -> usize {
    let mut end = pos;
    for c in text[pos..].chars() {
        if !c.is_whitespace() {
            break;
        }
        end += c.len_utf8();
        if c == '\n' {
            break;
        }
    }
    end
}

/// End of a `&name;`, `&#123;` or `&#x7b;` reference starting at `pos`.
fn entity_end(text: &str, pos: usize) -> Option<usize> {
    let body = &text[pos + 1..];
    let (prefix, digits) = if let Some(hex) = body
        .strip_prefix("#x")
        .or_else(|| body.strip_prefix("#X"))
    {
        (2, hex.bytes().take_while(u8::is_ascii_hexdigit).count())
    } else if let Some(decimal) = body.strip_prefix('#') {
        (1, decimal.bytes().take_while(u8::is_ascii_digit).count())
    } else if body.starts_with(|c: char| c.is_ascii_alphabetic()) {
        (0, body.bytes().take_while(u8::is_ascii_alphanumeric).count())
    } else {
        return None;
    };
    let semicolon = prefix + digits;
    (digits > 0 && body[semicolon..].starts_with(';')).then_some(pos + 1 + semicolon + 1)
}

/// An end-tag name closes an open element of the same name. Raw-text
/// elements match case-insensitively, like their end-tag search.
fn closes(open_name: &str, end_name: &str) -> bool {
    open_name == end_name
        || (RAW_TEXT_ELEMENTS.contains(&open_name) && open_name.eq_ignore_ascii_case(end_name))
}

fn find_close_tag(text: &str, pos: usize, name: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut from = pos;
    while let Some(i) = text[from..].find("</") {
        let at = from + i;
        let name_end = at + 2 + name.len();
        if name_end <= bytes.len()
            && bytes[at + 2..name_end].eq_ignore_ascii_case(name.as_bytes())
            && bytes
                .get(name_end)
                .map_or(true, |&b| b == b'>' || b == b'/' || b.is_ascii_whitespace())
        {
            return Some(at);
        }
        from = at + 2;
    }
    None
}
