use crate::ast::*;
use crate::lexer::{tokenize, LexError, Lexed, Token, TokenKind, TokenStream};
use brisk_source::{Source, SyntaxError};
use log::debug;
use recovery::SyncSet;
use std::mem;

mod decl;
mod expr;
pub mod recovery;
mod stmt;

/// How many expressions or statements may be nested in each other before parsing gives up on
/// the construct.
pub const MAX_NESTING: usize = 100;

pub struct Parser<'a> {
    /// Cached token for peeking.
    current_token: Token,
    tokens: TokenStream,
    /// Number of tokens consumed so far. Used to make sure recovery always makes progress.
    consumed: usize,
    /// Kind of the last consumed token, unknown right after an [`Self::unget`].
    previous: Option<TokenKind>,
    /// Current nesting of expressions and statements.
    depth: usize,
    lex_errors: Vec<LexError>,
    /// Source code
    source: &'a Source<'a>,
}

impl<'a> Parser<'a> {
    /// Tokenizes `source` and creates a parser over the resulting tokens.
    pub fn new(source: &'a Source<'a>) -> Self {
        let lexed = tokenize(source);
        Self {
            lex_errors: lexed.errors,
            ..Self::from_tokens(lexed.tokens, source)
        }
    }

    /// Creates a parser over an existing token stream. Syntax errors are reported to `source`.
    pub fn from_tokens(mut tokens: TokenStream, source: &'a Source<'a>) -> Self {
        Self {
            current_token: tokens.pop_front(),
            tokens,
            consumed: 0,
            previous: None,
            depth: 0,
            lex_errors: Vec::new(),
            source,
        }
    }

    /// Lexical errors found while tokenizing (only for parsers created with [`Parser::new`]).
    pub fn lex_errors(&self) -> &[LexError] {
        &self.lex_errors
    }
}

/// Parse utilities
impl<'a> Parser<'a> {
    /// Consumes the current token and returns it.
    fn next(&mut self) -> Token {
        let next = self.tokens.pop_front();
        self.consumed += 1;
        let token = mem::replace(&mut self.current_token, next);
        self.previous = Some(token.kind);
        token
    }

    /// Kind of the token after the current one, without consuming anything.
    fn peek(&self) -> TokenKind {
        self.tokens
            .peek_front()
            .map_or(TokenKind::Eof, |token| token.kind)
    }

    /// Puts `token` back in front of the current token, undoing one [`Self::next`].
    fn unget(&mut self, token: Token) {
        let current = mem::replace(&mut self.current_token, token);
        self.tokens.push_front(current);
        self.consumed -= 1;
        self.previous = None;
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.current_token.kind == kind
    }

    /// Predicate that tests whether the current token is of `kind` and eats it if yes as a side effect.
    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.next(); // eat token
            true
        } else {
            false
        }
    }

    /// Eats a token of `kind` or reports that it is missing. `context` completes the message,
    /// e.g. `expected ';' after variable declaration`.
    fn expect(&mut self, kind: TokenKind, context: &str) -> Option<Token> {
        if self.at(kind) {
            Some(self.next())
        } else {
            self.unexpected(&format!("{} {}", kind, context));
            None
        }
    }

    fn expect_identifier(&mut self, context: &str) -> Option<String> {
        self.expect(TokenKind::Identifier, context)
            .map(|token| token.value.unwrap_or_default())
    }

    /// Raises an unexpected token error. `expected` describes what the grammar allows here.
    fn unexpected(&self, expected: &str) {
        self.error(format!("expected {}, found {}", expected, self.current_token));
    }

    fn error(&self, message: String) {
        self.source.errors.add_error(SyntaxError::new(
            message,
            self.current_token.location.clone(),
        ))
    }

    /// Panic-mode recovery: discards tokens until `set` says to stop. A token the set stops in
    /// front of is never discarded, even if it is the offending one.
    fn synchronize(&mut self, set: &SyncSet) {
        let location = self.current_token.location.clone();
        let mut skipped = 0;
        while !set.stops_before(self.current_token.kind) {
            let token = self.next();
            skipped += 1;
            if set.stops_after(token.kind) {
                break;
            }
        }
        debug!(
            "{}: recovered at {} ({}), skipped {} tokens",
            location, self.current_token, set.name, skipped
        );
    }

    /// Recovery for rules parsed in a loop. `start` is the value of `self.consumed` when the
    /// failed rule began; if nothing was consumed since then, the offending token is skipped
    /// so that the loop cannot retry it forever. A rule that failed but still consumed up to a
    /// `}` or a token the set stops after already ends on a boundary, and nothing is skipped.
    fn recover(&mut self, set: &SyncSet, start: usize) {
        let at_boundary = self.consumed > start
            && match self.previous {
                Some(kind) => kind == TokenKind::CloseBrace || set.stops_after(kind),
                None => false,
            };
        if !at_boundary {
            self.synchronize(set);
        }
        if self.consumed == start && !self.at(TokenKind::Eof) {
            self.next();
        }
    }

    /// Runs `rule` one nesting level deeper. Past [`MAX_NESTING`] levels an error is reported
    /// instead, and a group opened by the current token is skipped up to its closing token.
    fn nested<T>(&mut self, rule: impl FnOnce(&mut Self) -> Option<T>) -> Option<T> {
        if self.depth >= MAX_NESTING {
            self.error(format!(
                "nested too deeply, found {} at more than {} levels",
                self.current_token, MAX_NESTING
            ));
            self.skip_group();
            return None;
        }
        self.depth += 1;
        let result = rule(self);
        self.depth -= 1;
        result
    }

    /// If the current token is `(`, `[` or `{`, skips everything up to and including the
    /// matching closing token.
    fn skip_group(&mut self) {
        let mut open = 0usize;
        while self.current_token.kind.is_open_delimiter() || open > 0 {
            if self.at(TokenKind::Eof) {
                break;
            }
            let token = self.next();
            if token.kind.is_open_delimiter() {
                open += 1;
            } else if token.kind.is_close_delimiter() {
                open -= 1;
            }
        }
    }

    /// Parses `item (',' item)* close` with the opening delimiter already eaten.
    /// A failing item is reported, then the list resynchronizes with `set` and keeps going so that
    /// later items are still checked. Returns `None` if any item failed.
    fn parse_list<T>(
        &mut self,
        close: TokenKind,
        set: &SyncSet,
        mut item: impl FnMut(&mut Self) -> Option<T>,
    ) -> Option<Vec<T>> {
        let mut items = Vec::new();
        if self.eat(close) {
            return Some(items);
        }

        let mut failed = false;
        loop {
            match item(self) {
                Some(parsed) => items.push(parsed),
                None => {
                    failed = true;
                    self.synchronize(set);
                }
            }

            if self.eat(close) {
                break;
            } else if !self.eat(TokenKind::Comma) {
                if !failed {
                    self.unexpected(&format!("',' or {}", close));
                }
                return None;
            }
        }

        if failed {
            None
        } else {
            Some(items)
        }
    }

    /// Parses `expr close` with the opening delimiter already eaten. On failure the closing
    /// delimiter is searched for with `set` and eaten, so the caller resumes after it.
    fn parse_delimited_expr(
        &mut self,
        close: TokenKind,
        set: &SyncSet,
        context: &str,
    ) -> Option<Expr> {
        match self.parse_expr() {
            Some(expr) => {
                self.expect(close, context)?;
                Some(expr)
            }
            None => {
                self.synchronize(set);
                self.eat(close);
                None
            }
        }
    }
}

/// Result of parsing a whole [`Source`].
#[derive(Debug, Clone)]
pub struct Parse {
    pub program: Program,
    pub lex_errors: Vec<LexError>,
    pub syntax_errors: Vec<SyntaxError>,
    /// `false` if any syntax error was reported.
    pub is_complete: bool,
}

impl Parse {
    /// Returns `true` if there are neither lexical nor syntax errors.
    pub fn is_ok(&self) -> bool {
        self.is_complete && self.lex_errors.is_empty()
    }
}

/// Tokenizes and parses `source`. Syntax errors are also left in `source.errors`.
pub fn parse(source: &Source) -> Parse {
    parse_lexed(tokenize(source), source)
}

/// Parses the output of [`tokenize`] for `source`.
pub fn parse_lexed(lexed: Lexed, source: &Source) -> Parse {
    // `source.errors` may already hold errors from an earlier parse
    let earlier = source.errors.len();
    let mut parser = Parser::from_tokens(lexed.tokens, source);
    let program = parser.parse_program();
    let syntax_errors = source.errors.errors().split_off(earlier);

    Parse {
        program,
        lex_errors: lexed.errors,
        is_complete: syntax_errors.is_empty(),
        syntax_errors,
    }
}
