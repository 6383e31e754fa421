//! The Astro lexer: markup scanner, merging layer and frontmatter delegate
//! behind one token stream.
//!
//! The frontmatter block is scanned by the markup scanner as a single
//! [`TokenKind::FrontmatterScript`] token. When that token becomes current,
//! a [`ScriptLexer`] is started over its span and every accessor reads from
//! the delegate until it runs dry. The delegate's progress is not encoded
//! in the integer state, so while it is active the reported state carries
//! [`HAS_NON_RESTARTABLE_STATE`] and position snapshots are refused.

use std::sync::Arc;

use crate::lexer::{collect_tokens, Lexer};
use crate::merging::{MergeMode, MergingLexer};
use crate::scanner::{
    LexerPosition, Scanner, ScannerMode, END_TAG_NAME, HAS_NON_RESTARTABLE_STATE, HTML_INITIAL,
    START_TAG_NAME,
};
use crate::script::ScriptLexer;
use crate::token::{Token, TokenKind};
use crate::LexerError;

/// Which tokenizer the accessors currently read from.
enum ActiveSource {
    Markup,
    Frontmatter(ScriptLexer),
}

/// Diagnostics kept between drains; later ones are dropped.
const MAX_DIAGNOSTICS: usize = 64;

pub struct AstroLexer {
    markup: MergingLexer<Scanner>,
    source: ActiveSource,
    diagnostics: Vec<LexerError>,
}

impl AstroLexer {
    /// Create a lexer with the given merge and scanner modes.
    pub fn new(merge_mode: MergeMode, scanner_mode: ScannerMode) -> Self {
        Self {
            markup: MergingLexer::new(Scanner::with_mode(scanner_mode), merge_mode),
            source: ActiveSource::Markup,
            diagnostics: Vec::new(),
        }
    }

    /// Tokenize a whole component file with default settings.
    pub fn tokenize(source: &str) -> Vec<Token> {
        let mut lexer = AstroLexer::default();
        lexer.start(Arc::from(source), 0, source.len(), 0);
        collect_tokens(&mut lexer)
    }

    /// Whether `start` accepts `state` as an initial state.
    pub fn is_restartable_state(&self, state: u32) -> bool {
        Scanner::is_restartable_state(state)
    }

    /// True for the states inside a start-tag or end-tag name.
    pub fn is_html_tag_state(state: u32) -> bool {
        state == START_TAG_NAME || state == END_TAG_NAME
    }

    /// Where to resume markup scanning after an embedded region.
    pub fn state_for_restart_during_embedment_scan() -> u32 {
        HTML_INITIAL
    }

    pub fn is_delegating(&self) -> bool {
        matches!(self.source, ActiveSource::Frontmatter(_))
    }

    /// The markup scanner under the merging layer.
    pub fn scanner(&self) -> &Scanner {
        self.markup.original()
    }

    /// Usage errors recorded since the last call, at most
    /// `MAX_DIAGNOSTICS` of them.
    pub fn take_diagnostics(&mut self) -> Vec<LexerError> {
        std::mem::take(&mut self.diagnostics)
    }

    fn start_delegate_if_needed(&mut self) {
        if self.markup.token_type() != Some(TokenKind::FrontmatterScript) {
            return;
        }
        let mut script = ScriptLexer::new();
        script.start(
            self.markup.buffer().clone(),
            self.markup.token_start(),
            self.markup.token_end(),
            0,
        );
        if script.token_type().is_some() {
            self.source = ActiveSource::Frontmatter(script);
        }
    }
}

impl Default for AstroLexer {
    fn default() -> Self {
        Self::new(MergeMode::Normal, ScannerMode::Document)
    }
}

impl Lexer for AstroLexer {
    type Position = LexerPosition;

    fn start(&mut self, buffer: Arc<str>, start: usize, end: usize, initial_state: u32) {
        let initial_state = if self.is_restartable_state(initial_state) {
            initial_state
        } else {
            if self.diagnostics.len() < MAX_DIAGNOSTICS {
                self.diagnostics
                    .push(LexerError::NonRestartableState { state: initial_state });
            }
            0
        };
        self.source = ActiveSource::Markup;
        self.markup.start(buffer, start, end, initial_state);
        self.start_delegate_if_needed();
    }

    fn advance(&mut self) {
        if let ActiveSource::Frontmatter(script) = &mut self.source {
            script.advance();
            if script.token_type().is_some() {
                return;
            }
            self.source = ActiveSource::Markup;
        }
        self.markup.advance();
        self.start_delegate_if_needed();
    }

    fn token_type(&self) -> Option<TokenKind> {
        match &self.source {
            ActiveSource::Frontmatter(script) => script.token_type(),
            ActiveSource::Markup => self.markup.token_type(),
        }
    }

    fn token_start(&self) -> usize {
        match &self.source {
            ActiveSource::Frontmatter(script) => script.token_start(),
            ActiveSource::Markup => self.markup.token_start(),
        }
    }

    fn token_end(&self) -> usize {
        match &self.source {
            ActiveSource::Frontmatter(script) => script.token_end(),
            ActiveSource::Markup => self.markup.token_end(),
        }
    }

    fn state(&self) -> u32 {
        match self.source {
            ActiveSource::Frontmatter(_) => self.markup.state() | HAS_NON_RESTARTABLE_STATE,
            ActiveSource::Markup => self.markup.state(),
        }
    }

    fn buffer(&self) -> &Arc<str> {
        self.markup.buffer()
    }

    fn buffer_end(&self) -> usize {
        self.markup.buffer_end()
    }

    fn current_position(&self) -> Result<LexerPosition, LexerError> {
        match &self.source {
            ActiveSource::Frontmatter(script) => Err(LexerError::SnapshotWhileDelegating {
                offset: script.token_start(),
            }),
            ActiveSource::Markup => self.markup.current_position(),
        }
    }

    fn restore(&mut self, position: LexerPosition) {
        self.source = ActiveSource::Markup;
        self.markup.restore(position);
        self.start_delegate_if_needed();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::{is_possibly_component_tag, EXPRESSION, FRONTMATTER_CLOSE};
    use crate::token::ScriptKind;
    use pretty_assertions::assert_eq;

    fn started(source: &str, merge_mode: MergeMode) -> AstroLexer {
        let mut lexer = AstroLexer::new(merge_mode, ScannerMode::Document);
        lexer.start(Arc::from(source), 0, source.len(), 0);
        lexer
    }

    /// Helper: tokens as (kind, text) pairs.
    fn lex(source: &str) -> Vec<(TokenKind, &str)> {
        AstroLexer::tokenize(source)
            .into_iter()
            .map(|t| (t.kind, t.text(source)))
            .collect()
    }

    /// A linear scan recording each token with the snapshot available at it.
    fn scan_with_positions(
        source: &str,
        merge_mode: MergeMode,
    ) -> Vec<(Token, Option<LexerPosition>)> {
        let mut lexer = started(source, merge_mode);
        let mut out = Vec::new();
        while let Some(token) = lexer.token() {
            out.push((token, lexer.current_position().ok()));
            lexer.advance();
        }
        out
    }

    const DOCUMENTS: &[&str] = &[
        "<div>text</div><Widget attr=\"v\">{{ x }}</Widget>",
        "---\nimport Card from './Card.astro';\nconst { title } = Astro.props;\n---\n<Card title={title}>\n  {items.map((i) => <li class=\"a &amp; b\">{i}</li>)}\n</Card>\n",
        "---\n---\n<!-- c\nd --><style>p{}</style><p>x<br>y</p>",
        "<ul>{a ? <A/> : <B {...p}>&lt;{`t ${u}`}</B>}</ul>",
        "  ---\nlet open",
        "<ol>{ok && <>hi <b>x</b></>}<script>a</scripts>b</SCRIPT></ol>",
    ];

    // =========================================================================
    // End-to-end streams
    // =========================================================================

    #[test]
    fn test_markup_and_component_scenario() {
        let source = "<div>text</div><Widget attr=\"v\">{{ x }}</Widget>";
        let mut lexer = started(source, MergeMode::Normal);
        let mut tokens = Vec::new();
        let mut max_expression_depth = 0;
        while let Some(token) = lexer.token() {
            max_expression_depth = max_expression_depth.max(lexer.scanner().expression_stack().len());
            tokens.push((token.kind, token.text(source)));
            lexer.advance();
        }

        assert_eq!(
            tokens,
            vec![
                (TokenKind::TagStart, "<"),
                (TokenKind::TagName, "div"),
                (TokenKind::TagEnd, ">"),
                (TokenKind::DataCharacters, "text"),
                (TokenKind::EndTagStart, "</"),
                (TokenKind::TagName, "div"),
                (TokenKind::TagEnd, ">"),
                (TokenKind::TagStart, "<"),
                (TokenKind::ComponentName, "Widget"),
                (TokenKind::WhiteSpace, " "),
                (TokenKind::AttributeName, "attr"),
                (TokenKind::Equals, "="),
                (TokenKind::AttributeValueStartDelimiter, "\""),
                (TokenKind::AttributeValue, "v"),
                (TokenKind::AttributeValueEndDelimiter, "\""),
                (TokenKind::TagEnd, ">"),
                (TokenKind::ExpressionStart, "{"),
                (TokenKind::Script(ScriptKind::LBrace), "{"),
                (TokenKind::Script(ScriptKind::WhiteSpace), " "),
                (TokenKind::Script(ScriptKind::Identifier), "x"),
                (TokenKind::Script(ScriptKind::WhiteSpace), " "),
                (TokenKind::Script(ScriptKind::RBrace), "}"),
                (TokenKind::ExpressionEnd, "}"),
                (TokenKind::EndTagStart, "</"),
                (TokenKind::ComponentName, "Widget"),
                (TokenKind::TagEnd, ">"),
            ]
        );
        assert!(is_possibly_component_tag("Widget"));
        assert_eq!(max_expression_depth, 2);
        assert!(lexer.scanner().element_name_stack().is_empty());
        assert!(lexer.scanner().expression_stack().is_empty());
    }

    #[test]
    fn test_frontmatter_scenario() {
        let source = "---\nconst x = 1;\n---\n<p>{x}</p>";
        let mut lexer = started(source, MergeMode::Normal);
        let mut trace = Vec::new();
        while let Some(token) = lexer.token() {
            let flagged = lexer.state() & HAS_NON_RESTARTABLE_STATE != 0;
            trace.push((token.kind, token.text(source), flagged));
            lexer.advance();
        }

        let script = |kind, text| (TokenKind::Script(kind), text, true);
        assert_eq!(
            trace[..10].to_vec(),
            vec![
                (TokenKind::FrontmatterSeparator, "---", false),
                script(ScriptKind::WhiteSpace, "\n"),
                script(ScriptKind::Keyword, "const"),
                script(ScriptKind::WhiteSpace, " "),
                script(ScriptKind::Identifier, "x"),
                script(ScriptKind::WhiteSpace, " "),
                script(ScriptKind::Eq, "="),
                script(ScriptKind::WhiteSpace, " "),
                script(ScriptKind::Number, "1"),
                script(ScriptKind::Semicolon, ";"),
            ]
        );
        assert_eq!(
            trace[10..13].to_vec(),
            vec![
                (TokenKind::Script(ScriptKind::WhiteSpace), "\n", true),
                (TokenKind::FrontmatterSeparator, "---", false),
                (TokenKind::WhiteSpace, "\n", false),
            ]
        );
        assert!(trace[11..].iter().all(|(_, _, flagged)| !flagged));
        assert!(!trace.iter().any(|(kind, _, _)| *kind == TokenKind::FrontmatterScript));
        assert!(!lexer.is_delegating());
    }

    #[test]
    fn test_tokens_cover_input_exactly() {
        for mode in [MergeMode::Normal, MergeMode::Highlight] {
            for source in DOCUMENTS {
                let mut lexer = started(source, mode);
                let tokens = collect_tokens(&mut lexer);
                let mut offset = 0;
                for token in &tokens {
                    assert_eq!(token.start(), offset, "gap or overlap in {source:?}");
                    assert!(token.end() > token.start(), "empty token in {source:?}");
                    offset = token.end();
                }
                assert_eq!(offset, source.len());
            }
        }
    }

    #[test]
    fn test_sub_range_coverage() {
        let source = "xx<b>bold</b>yy";
        let mut lexer = AstroLexer::default();
        lexer.start(Arc::from(source), 2, 13, 0);
        let tokens = collect_tokens(&mut lexer);
        assert_eq!(tokens.first().map(Token::start), Some(2));
        assert_eq!(tokens.last().map(Token::end), Some(13));
    }

    #[test]
    fn test_unterminated_frontmatter_is_all_script() {
        assert_eq!(
            lex("---\nlet a"),
            vec![
                (TokenKind::FrontmatterSeparator, "---"),
                (TokenKind::Script(ScriptKind::WhiteSpace), "\n"),
                (TokenKind::Script(ScriptKind::Keyword), "let"),
                (TokenKind::Script(ScriptKind::WhiteSpace), " "),
                (TokenKind::Script(ScriptKind::Identifier), "a"),
            ]
        );
    }

    #[test]
    fn test_fragment_mode() {
        let source = "cond && <Item/>";
        let mut lexer = AstroLexer::new(MergeMode::Normal, ScannerMode::Fragment);
        lexer.start(Arc::from(source), 0, source.len(), 0);
        assert_eq!(lexer.state(), EXPRESSION);
        let kinds: Vec<TokenKind> = collect_tokens(&mut lexer).into_iter().map(|t| t.kind).collect();
        assert_eq!(kinds[0], TokenKind::Script(ScriptKind::Identifier));
        assert!(kinds.contains(&TokenKind::ComponentName));
    }

    // =========================================================================
    // Restart
    // =========================================================================

    #[test]
    fn test_restore_matches_linear_scan() {
        for mode in [MergeMode::Normal, MergeMode::Highlight] {
            for source in DOCUMENTS {
                let linear = scan_with_positions(source, mode);
                let tokens: Vec<Token> = linear.iter().map(|(token, _)| *token).collect();

                for (index, (token, position)) in linear.iter().enumerate() {
                    let Some(position) = position.clone() else {
                        continue;
                    };
                    assert_eq!(position.offset(), token.start());

                    let mut fresh = AstroLexer::new(mode, ScannerMode::Document);
                    fresh.start(Arc::from(*source), 0, source.len(), 0);
                    fresh.restore(position);
                    assert_eq!(
                        collect_tokens(&mut fresh),
                        tokens[index..].to_vec(),
                        "{mode:?} restart at {} in {source:?}",
                        token.start()
                    );
                }
            }
        }
    }

    #[test]
    fn test_snapshot_outlives_live_lexer() {
        let source = "<a><b><c>{x}</c></b></a>";
        let mut lexer = started(source, MergeMode::Normal);
        for _ in 0..7 {
            lexer.advance();
        }
        let position = lexer.current_position().unwrap();
        let captured = position.element_name_stack();
        assert_eq!(captured, vec!["a".to_string(), "b".to_string()]);

        collect_tokens(&mut lexer);
        assert_eq!(position.element_name_stack(), captured);
    }

    #[test]
    fn test_snapshot_refused_while_delegating() {
        let source = "---\nlet a = 1;\n---";
        let mut lexer = started(source, MergeMode::Normal);
        lexer.advance();
        assert!(lexer.is_delegating());
        assert_eq!(
            lexer.current_position(),
            Err(LexerError::SnapshotWhileDelegating { offset: 3 })
        );
        while lexer.is_delegating() {
            lexer.advance();
        }
        let position = lexer.current_position().unwrap();
        assert_eq!(position.state(), FRONTMATTER_CLOSE);
    }

    #[test]
    fn test_every_position_is_refused_inside_frontmatter() {
        let source = "---\nconst x = 1;\n---\n<p/>";
        for (token, position) in scan_with_positions(source, MergeMode::Normal) {
            let inside = matches!(token.kind, TokenKind::Script(_));
            assert_eq!(position.is_none(), inside, "{token:?}");
        }
    }

    #[test]
    fn test_bare_state_restart_at_top_level() {
        let source = "<p>a</p><i>b</i>";
        let full = AstroLexer::tokenize(source);
        // Offset 8 is the second `<`; no stacks are open there.
        let mut lexer = AstroLexer::default();
        lexer.start(Arc::from(source), 8, source.len(), HTML_INITIAL);
        let suffix: Vec<Token> = full.into_iter().filter(|t| t.start() >= 8).collect();
        assert_eq!(collect_tokens(&mut lexer), suffix);
    }

    #[test]
    fn test_start_with_non_restartable_state_falls_back() {
        let source = "<p>x</p>";
        let mut lexer = AstroLexer::default();
        lexer.start(
            Arc::from(source),
            0,
            source.len(),
            HTML_INITIAL | HAS_NON_RESTARTABLE_STATE,
        );
        assert_eq!(
            lexer.take_diagnostics(),
            vec![LexerError::NonRestartableState {
                state: HTML_INITIAL | HAS_NON_RESTARTABLE_STATE
            }]
        );
        assert!(lexer.take_diagnostics().is_empty());
        assert_eq!(collect_tokens(&mut lexer), AstroLexer::tokenize(source));
    }

    #[test]
    fn test_undrained_diagnostics_are_capped() {
        let mut lexer = AstroLexer::default();
        for _ in 0..MAX_DIAGNOSTICS + 10 {
            lexer.start(Arc::from("x"), 0, 1, HAS_NON_RESTARTABLE_STATE);
        }
        assert_eq!(lexer.take_diagnostics().len(), MAX_DIAGNOSTICS);
        lexer.start(Arc::from("x"), 0, 1, HAS_NON_RESTARTABLE_STATE);
        assert_eq!(lexer.take_diagnostics().len(), 1);
    }

    #[test]
    fn test_deep_nesting_terminates() {
        let source = "<a>".repeat(300_000);
        let tokens = AstroLexer::tokenize(&source);
        assert_eq!(tokens.len(), 900_000);
        assert_eq!(tokens.last().map(Token::end), Some(source.len()));

        let source = "{".repeat(300_000);
        let mut lexer = AstroLexer::new(MergeMode::Normal, ScannerMode::Fragment);
        lexer.start(Arc::from(source.as_str()), 0, source.len(), 0);
        let tokens = collect_tokens(&mut lexer);
        assert_eq!(tokens.len(), 300_000);
        assert!(tokens
            .iter()
            .all(|t| t.kind == TokenKind::Script(ScriptKind::LBrace)));
        assert_eq!(lexer.scanner().expression_stack().len(), 300_000);
    }

    #[test]
    fn test_start_inside_frontmatter_starts_delegate() {
        let source = "---\nlet a\n---";
        let mut lexer = AstroLexer::default();
        lexer.start(Arc::from(source), 3, source.len(), crate::scanner::FRONTMATTER);
        assert!(lexer.is_delegating());
        assert_eq!(lexer.token_type(), Some(TokenKind::Script(ScriptKind::WhiteSpace)));
    }

    // =========================================================================
    // State queries
    // =========================================================================

    #[test]
    fn test_state_queries() {
        let lexer = AstroLexer::default();
        assert!(lexer.is_restartable_state(0));
        assert!(lexer.is_restartable_state(HTML_INITIAL));
        assert!(!lexer.is_restartable_state(HAS_NON_RESTARTABLE_STATE));
        assert!(AstroLexer::is_html_tag_state(START_TAG_NAME));
        assert!(AstroLexer::is_html_tag_state(END_TAG_NAME));
        assert!(!AstroLexer::is_html_tag_state(HTML_INITIAL));
        assert_eq!(AstroLexer::state_for_restart_during_embedment_scan(), HTML_INITIAL);
        assert!(TokenKind::FrontmatterScript.is_tag_embedment_start());
    }

    #[test]
    fn test_tag_name_state_is_reported() {
        let source = "<a></a>";
        let mut lexer = started(source, MergeMode::Normal);
        lexer.advance();
        assert!(AstroLexer::is_html_tag_state(lexer.state()));
        lexer.advance();
        assert!(!AstroLexer::is_html_tag_state(lexer.state()));
    }
}
