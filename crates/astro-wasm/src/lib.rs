//! WASM bindings for the Astro lexer.
//!
//! Exposes `tokenize()` to JavaScript via wasm-bindgen. Returns an array of
//! `{ kind, start, end }` objects.

use std::sync::Arc;

use astro_lexer::{collect_tokens, AstroLexer, Lexer, MergeMode, ScannerMode, Token};
use wasm_bindgen::prelude::*;

fn lex(source: &str, highlight: bool) -> Vec<Token> {
    let merge_mode = if highlight {
        MergeMode::Highlight
    } else {
        MergeMode::Normal
    };
    let mut lexer = AstroLexer::new(merge_mode, ScannerMode::Document);
    lexer.start(Arc::from(source), 0, source.len(), 0);
    collect_tokens(&mut lexer)
}

/// Tokenize an Astro component.
///
/// With `highlight` set, entity references inside attribute values are
/// folded into the value token.
#[wasm_bindgen]
pub fn tokenize(source: &str, highlight: bool) -> Result<JsValue, JsError> {
    let tokens = lex(source, highlight);
    serde_wasm_bindgen::to_value(&tokens).map_err(|e| JsError::new(&e.to_string()))
}

/// Get the lexer version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
