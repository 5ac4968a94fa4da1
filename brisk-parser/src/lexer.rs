use brisk_source::{Location, Source};
use log::{debug, trace};
use logos::{Lexer, Logos};
use std::collections::{vec_deque, VecDeque};
use std::fmt;

#[derive(Debug, Logos, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // keywords
    #[token("array")]
    Array,
    #[token("boolean")]
    Boolean,
    #[token("char")]
    Char,
    #[token("else")]
    Else,
    #[token("false")]
    False,
    #[token("for")]
    For,
    #[token("function")]
    Function,
    #[token("if")]
    If,
    #[token("integer")]
    Integer,
    #[token("print")]
    Print,
    #[token("return")]
    Return,
    #[token("string")]
    String,
    #[token("true")]
    True,
    #[token("void")]
    Void,
    #[token("while")]
    While,

    // identifiers
    #[regex("[a-zA-Z_][a-zA-Z0-9_]*")]
    Identifier,

    // literals
    /// Only accepted if the digits fit in an `i64`.
    #[regex("[0-9]+", number_literal)]
    Number,
    #[regex(r#""[^"\n]*"?"#, string_literal)]
    StringLit,
    #[regex(r"'\\?[^\n]'?", char_literal)]
    CharLit,

    // punctuation
    #[token(":")]
    Colon,
    #[token(";")]
    Semi,
    #[token(",")]
    Comma,
    #[token("[")]
    OpenBracket,
    #[token("]")]
    CloseBracket,
    #[token("{")]
    OpenBrace,
    #[token("}")]
    CloseBrace,
    #[token("(")]
    OpenParen,
    #[token(")")]
    CloseParen,

    // increment / decrement
    #[token("++")]
    PlusPlus,
    #[token("--")]
    MinusMinus,

    // logical operators
    #[token("!")]
    LogicalNot,
    #[token("&&")]
    LogicalAnd,
    #[token("||")]
    LogicalOr,

    // arithmetics
    #[token("^")]
    Caret,
    #[token("*")]
    Asterisk,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus, // NOTE: can also be unary

    // ordering
    #[token("<")]
    LessThan,
    #[token("<=")]
    LessThanEquals,
    #[token(">")]
    GreaterThan,
    #[token(">=")]
    GreaterThanEquals,
    // equality
    #[token("==")]
    EqualsEquals,
    #[token("!=")]
    NotEquals,
    // assignment
    #[token("=")]
    Equals,

    /// Block comment. Never leaves [`tokenize`].
    #[token("/*", block_comment)]
    Comment,

    /// End of program. `$` ends the program early, even mid-buffer.
    #[token("$")]
    Eof,

    // misc
    #[regex(r"[ \t\n\r\f]+", logos::skip)]
    #[regex(r"//[^\n]*", logos::skip)] // single line comments
    #[error]
    Unknown,
}

fn number_literal(lex: &mut Lexer<TokenKind>) -> bool {
    lex.slice().parse::<i64>().is_ok()
}

fn string_literal(lex: &mut Lexer<TokenKind>) -> bool {
    let slice = lex.slice();
    slice.len() >= 2 && slice.ends_with('"')
}

/// Exactly one payload character, optionally preceded by a `\` escape marker.
fn char_literal(lex: &mut Lexer<TokenKind>) -> bool {
    let mut chars = lex.slice()[1..].chars();
    let mut payload = chars.next();
    if payload == Some('\\') {
        payload = chars.next();
    }
    payload.is_some() && chars.next() == Some('\'') && chars.next().is_none()
}

/// Block comments may span lines. An unclosed comment swallows the rest of the buffer.
fn block_comment(lex: &mut Lexer<TokenKind>) -> bool {
    match lex.remainder().find("*/") {
        Some(end) => {
            lex.bump(end + 2);
            true
        }
        None => {
            lex.bump(lex.remainder().len());
            false
        }
    }
}

impl TokenKind {
    /// Returns `true` if the token starts a type (`integer`, `boolean`, `char`, `string`, `void`).
    pub fn is_type_keyword(self) -> bool {
        matches!(
            self,
            TokenKind::Integer | TokenKind::Boolean | TokenKind::Char | TokenKind::String | TokenKind::Void
        )
    }

    pub fn is_open_delimiter(self) -> bool {
        matches!(
            self,
            TokenKind::OpenParen | TokenKind::OpenBracket | TokenKind::OpenBrace
        )
    }

    pub fn is_close_delimiter(self) -> bool {
        matches!(
            self,
            TokenKind::CloseParen | TokenKind::CloseBracket | TokenKind::CloseBrace
        )
    }

    /// Returns `true` if the token carries its spelling as [`Token::value`].
    pub fn has_value(self) -> bool {
        matches!(
            self,
            TokenKind::Identifier | TokenKind::Number | TokenKind::StringLit | TokenKind::CharLit
        )
    }

    /// Human readable description used in diagnostics.
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::Array => "'array'",
            TokenKind::Boolean => "'boolean'",
            TokenKind::Char => "'char'",
            TokenKind::Else => "'else'",
            TokenKind::False => "'false'",
            TokenKind::For => "'for'",
            TokenKind::Function => "'function'",
            TokenKind::If => "'if'",
            TokenKind::Integer => "'integer'",
            TokenKind::Print => "'print'",
            TokenKind::Return => "'return'",
            TokenKind::String => "'string'",
            TokenKind::True => "'true'",
            TokenKind::Void => "'void'",
            TokenKind::While => "'while'",
            TokenKind::Identifier => "identifier",
            TokenKind::Number => "number",
            TokenKind::StringLit => "string literal",
            TokenKind::CharLit => "char literal",
            TokenKind::Colon => "':'",
            TokenKind::Semi => "';'",
            TokenKind::Comma => "','",
            TokenKind::OpenBracket => "'['",
            TokenKind::CloseBracket => "']'",
            TokenKind::OpenBrace => "'{'",
            TokenKind::CloseBrace => "'}'",
            TokenKind::OpenParen => "'('",
            TokenKind::CloseParen => "')'",
            TokenKind::PlusPlus => "'++'",
            TokenKind::MinusMinus => "'--'",
            TokenKind::LogicalNot => "'!'",
            TokenKind::LogicalAnd => "'&&'",
            TokenKind::LogicalOr => "'||'",
            TokenKind::Caret => "'^'",
            TokenKind::Asterisk => "'*'",
            TokenKind::Slash => "'/'",
            TokenKind::Percent => "'%'",
            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::LessThan => "'<'",
            TokenKind::LessThanEquals => "'<='",
            TokenKind::GreaterThan => "'>'",
            TokenKind::GreaterThanEquals => "'>='",
            TokenKind::EqualsEquals => "'=='",
            TokenKind::NotEquals => "'!='",
            TokenKind::Equals => "'='",
            TokenKind::Comment => "comment",
            TokenKind::Eof => "end of file",
            TokenKind::Unknown => "unknown token",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub location: Location,
    /// Spelling of identifiers and literals. `None` for every other kind.
    pub value: Option<String>,
}

impl Token {
    pub fn new(kind: TokenKind, location: Location, value: Option<String>) -> Self {
        Self {
            kind,
            location,
            value,
        }
    }

    /// Returns the spelling of the token, or an empty string if it has none.
    pub fn text(&self) -> &str {
        self.value.as_deref().unwrap_or("")
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{} `{}`", self.kind, value),
            None => write!(f, "{}", self.kind),
        }
    }
}

/// A lexical error. Each one is paired with an [`TokenKind::Unknown`] token at the same location.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LexError {
    #[error("{0}: unterminated string literal")]
    UnterminatedString(Location),
    #[error("{0}: unterminated character literal")]
    UnterminatedChar(Location),
    #[error("{0}: unterminated block comment")]
    UnterminatedComment(Location),
    #[error("{location}: integer literal `{text}` does not fit in 64 bits")]
    NumberOutOfRange { location: Location, text: String },
}

impl LexError {
    pub fn location(&self) -> &Location {
        match self {
            LexError::UnterminatedString(location)
            | LexError::UnterminatedChar(location)
            | LexError::UnterminatedComment(location)
            | LexError::NumberOutOfRange { location, .. } => location,
        }
    }

    /// Classifies the text of an [`TokenKind::Unknown`] token.
    /// Returns `None` for stray characters, which are left for the parser to report.
    fn classify(text: &str, location: Location) -> Option<Self> {
        if text.starts_with("/*") {
            Some(LexError::UnterminatedComment(location))
        } else if text.starts_with('"') {
            Some(LexError::UnterminatedString(location))
        } else if text.starts_with('\'') {
            Some(LexError::UnterminatedChar(location))
        } else if text.starts_with(|c: char| c.is_ascii_digit()) {
            Some(LexError::NumberOutOfRange {
                location,
                text: text.to_string(),
            })
        } else {
            None
        }
    }
}

/// Ordered token sequence consumed by the parser.
/// The last token is always [`TokenKind::Eof`] and is never consumed.
#[derive(Debug, Clone)]
pub struct TokenStream {
    tokens: VecDeque<Token>,
}

impl TokenStream {
    /// Creates a stream from `tokens`, appending an end of file token if missing.
    pub fn new(tokens: impl IntoIterator<Item = Token>) -> Self {
        let mut tokens: VecDeque<Token> = tokens.into_iter().collect();
        if tokens.back().map(|token| token.kind) != Some(TokenKind::Eof) {
            let location = match tokens.back() {
                Some(token) => token.location.clone(),
                None => Source::new("").location(0),
            };
            tokens.push_back(Token::new(TokenKind::Eof, location, None));
        }
        Self { tokens }
    }

    /// Consumes and returns the head token. Once only end of file is left it is returned repeatedly.
    pub fn pop_front(&mut self) -> Token {
        match self.tokens.pop_front() {
            Some(token) if token.kind == TokenKind::Eof => {
                self.tokens.push_front(token.clone());
                token
            }
            Some(token) => token,
            // unreachable as long as the eof token is never popped
            None => TokenStream::new(Vec::new()).pop_front(),
        }
    }

    /// Returns the head token without consuming it.
    pub fn peek_front(&self) -> Option<&Token> {
        self.tokens.front()
    }

    /// Reinserts a token at the front of the stream.
    pub fn push_front(&mut self, token: Token) {
        self.tokens.push_front(token);
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn iter(&self) -> vec_deque::Iter<'_, Token> {
        self.tokens.iter()
    }
}

impl<'a> IntoIterator for &'a TokenStream {
    type Item = &'a Token;
    type IntoIter = vec_deque::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Output of [`tokenize`].
#[derive(Debug, Clone)]
pub struct Lexed {
    pub tokens: TokenStream,
    pub errors: Vec<LexError>,
}

impl Lexed {
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }
}

/// Tokenizes the whole `source` eagerly.
pub fn tokenize(source: &Source) -> Lexed {
    let mut lexer = TokenKind::lexer(source.content);
    let mut tokens = Vec::new();
    let mut errors = Vec::new();
    let mut eof_offset = source.content.len();

    while let Some(kind) = lexer.next() {
        let location = source.location(lexer.span().start);
        let value = match kind {
            TokenKind::Comment => continue,
            TokenKind::Eof => {
                eof_offset = lexer.span().start;
                break;
            }
            TokenKind::Unknown => {
                if let Some(error) = LexError::classify(lexer.slice(), location.clone()) {
                    errors.push(error);
                }
                None
            }
            TokenKind::StringLit | TokenKind::CharLit => {
                let slice = lexer.slice();
                Some(slice[1..slice.len() - 1].to_string())
            }
            kind if kind.has_value() => Some(lexer.slice().to_string()),
            _ => None,
        };
        let token = Token::new(kind, location, value);
        trace!("lexed {} at {}", token, token.location);
        tokens.push(token);
    }

    tokens.push(Token::new(TokenKind::Eof, source.location(eof_offset), None));
    debug!(
        "{}: {} tokens, {} lexical errors",
        source.path,
        tokens.len(),
        errors.len()
    );

    Lexed {
        tokens: TokenStream::new(tokens),
        errors,
    }
}
