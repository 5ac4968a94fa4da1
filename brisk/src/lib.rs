use brisk_parser::lexer::{tokenize, Token};
use brisk_parser::parser::{parse_lexed, Parse};
use brisk_parser::{dump, mermaid, printer};
use brisk_source::{Location, Source};
use log::info;

/// What to print after a compilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Emit {
    /// One token per line.
    Tokens,
    /// Indented outline of the syntax tree.
    Tree,
    /// The program printed back as source code.
    Source,
    /// Syntax tree as a Mermaid diagram.
    Mermaid,
    /// Only diagnostics.
    None,
}

/// Result of lexing and parsing one source file.
#[derive(Debug, Clone)]
pub struct Compilation {
    pub tokens: Vec<Token>,
    pub parse: Parse,
}

impl Compilation {
    /// Returns `true` if there were neither lexical nor syntax errors.
    pub fn is_ok(&self) -> bool {
        self.parse.is_ok()
    }

    pub fn error_count(&self) -> usize {
        self.parse.lex_errors.len() + self.parse.syntax_errors.len()
    }

    /// All error messages in source order, each prefixed with its location.
    pub fn diagnostics(&self) -> Vec<String> {
        let lex_errors = self
            .parse
            .lex_errors
            .iter()
            .map(|error| (error.location(), error.to_string()));
        let syntax_errors = self
            .parse
            .syntax_errors
            .iter()
            .map(|error| (&error.location, error.to_string()));

        let mut diagnostics: Vec<(&Location, String)> = lex_errors.chain(syntax_errors).collect();
        diagnostics.sort_by_key(|(location, _)| (location.line, location.col));
        diagnostics
            .into_iter()
            .map(|(_, message)| message)
            .collect()
    }

    /// Renders the requested output.
    pub fn emit(&self, emit: Emit) -> String {
        match emit {
            Emit::Tokens => self
                .tokens
                .iter()
                .map(|token| format!("{}:{} {}\n", token.location.line, token.location.col, token))
                .collect(),
            Emit::Tree => dump::dump(&self.parse.program),
            Emit::Source => printer::to_source(&self.parse.program),
            Emit::Mermaid => mermaid::to_mermaid(&self.parse.program),
            Emit::None => String::new(),
        }
    }
}

/// Lexes and parses `content`. `path` is only used in diagnostics.
pub fn compile(path: &str, content: &str) -> Compilation {
    let source = Source::with_path(path, content);
    let lexed = tokenize(&source);
    let tokens = lexed.tokens.iter().cloned().collect();
    let parse = parse_lexed(lexed, &source);

    info!(
        "{}: {} declarations, {} lexical errors, {} syntax errors",
        path,
        parse.program.declarations.len(),
        parse.lex_errors.len(),
        parse.syntax_errors.len()
    );

    Compilation { tokens, parse }
}
