use std::path::Path;
use std::sync::Arc;

use astro_lexer::{collect_tokens, AstroLexer, Lexer, MergeMode, ScannerMode, Token};
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "astro")]
#[command(about = "Astro lexer: dump and check the token stream of .astro files")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the token stream of a file
    Tokens {
        /// Input .astro file
        path: String,

        #[command(flatten)]
        options: LexOptions,

        /// Print tokens as a JSON array
        #[arg(long)]
        json: bool,
    },

    /// Restart the lexer at every token boundary and compare with a full scan
    Restart {
        /// Input .astro file
        path: String,

        #[command(flatten)]
        options: LexOptions,
    },
}

#[derive(Args)]
struct LexOptions {
    /// Fold entity references into attribute values
    #[arg(long)]
    highlight: bool,

    /// Lex the file as a bare expression instead of a component
    #[arg(long)]
    fragment: bool,
}

impl LexOptions {
    fn lexer(&self) -> AstroLexer {
        let merge_mode = if self.highlight {
            MergeMode::Highlight
        } else {
            MergeMode::Normal
        };
        let scanner_mode = if self.fragment {
            ScannerMode::Fragment
        } else {
            ScannerMode::Document
        };
        AstroLexer::new(merge_mode, scanner_mode)
    }
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Command::Tokens {
            path,
            options,
            json,
        } => cmd_tokens(&path, &options, json),
        Command::Restart { path, options } => cmd_restart(&path, &options),
    }
}

fn read_source(path: &str) -> Arc<str> {
    let p = Path::new(path);
    if !p.exists() {
        eprintln!("Error: file not found: {path}");
        std::process::exit(1);
    }
    match std::fs::read_to_string(p) {
        Ok(source) => Arc::from(source),
        Err(e) => {
            eprintln!("Error reading {path}: {e}");
            std::process::exit(1);
        }
    }
}

fn report_diagnostics(lexer: &mut AstroLexer) {
    for diagnostic in lexer.take_diagnostics() {
        eprintln!("Warning: {diagnostic}");
    }
}

fn cmd_tokens(path: &str, options: &LexOptions, json: bool) {
    let source = read_source(path);
    let mut lexer = options.lexer();
    lexer.start(source.clone(), 0, source.len(), 0);
    let tokens = collect_tokens(&mut lexer);
    report_diagnostics(&mut lexer);

    if json {
        match serde_json::to_string_pretty(&tokens) {
            Ok(out) => println!("{out}"),
            Err(e) => {
                eprintln!("Error serializing tokens: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    for token in &tokens {
        println!(
            "{:>6}..{:<6} {:<32} {:?}",
            token.start(),
            token.end(),
            format!("{:?}", token.kind),
            token.text(&source)
        );
    }
}

fn cmd_restart(path: &str, options: &LexOptions) {
    let source = read_source(path);

    let mut lexer = options.lexer();
    lexer.start(source.clone(), 0, source.len(), 0);
    let mut linear: Vec<Token> = Vec::new();
    let mut positions = Vec::new();
    while let Some(token) = lexer.token() {
        if let Ok(position) = lexer.current_position() {
            positions.push((linear.len(), position));
        }
        linear.push(token);
        lexer.advance();
    }
    report_diagnostics(&mut lexer);

    let mut failures = 0;
    for (index, position) in &positions {
        let offset = position.offset();
        let mut fresh = options.lexer();
        fresh.start(source.clone(), 0, source.len(), 0);
        fresh.restore(position.clone());
        let resumed = collect_tokens(&mut fresh);
        if resumed[..] != linear[*index..] {
            failures += 1;
            eprintln!("Mismatch: restart at offset {offset} diverges from the full scan");
        }
    }

    if failures > 0 {
        eprintln!("{failures} of {} restart points diverged", positions.len());
        std::process::exit(1);
    }
    eprintln!(
        "OK: {path} ({} tokens, {} restart points)",
        linear.len(),
        positions.len()
    );
}
