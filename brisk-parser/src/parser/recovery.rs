//! Synchronization sets for panic-mode error recovery.
//!
//! After a syntax error the parser discards tokens until the set of the rule that caught the
//! error says to stop. End of file always stops recovery.

use crate::lexer::TokenKind;

#[derive(Debug)]
pub struct SyncSet {
    pub name: &'static str,
    /// Recovery stops in front of these tokens, leaving them for the caller.
    pub stop_before: &'static [TokenKind],
    /// Recovery eats one of these tokens and then stops.
    pub stop_after: &'static [TokenKind],
}

impl SyncSet {
    pub fn stops_before(&self, kind: TokenKind) -> bool {
        kind == TokenKind::Eof || self.stop_before.contains(&kind)
    }

    pub fn stops_after(&self, kind: TokenKind) -> bool {
        self.stop_after.contains(&kind)
    }
}

/// Top level: resume at the next `function` or type keyword.
pub const DECLARATION: SyncSet = SyncSet {
    name: "declaration",
    stop_before: &[
        TokenKind::Function,
        TokenKind::Integer,
        TokenKind::Boolean,
        TokenKind::Char,
        TokenKind::String,
        TokenKind::Void,
    ],
    stop_after: &[],
};

/// Inside a block: resume at a keyword that starts a statement, a brace, or after a `;`.
pub const STATEMENT: SyncSet = SyncSet {
    name: "statement",
    stop_before: &[
        TokenKind::If,
        TokenKind::For,
        TokenKind::While,
        TokenKind::Return,
        TokenKind::Print,
        TokenKind::Integer,
        TokenKind::Boolean,
        TokenKind::Char,
        TokenKind::String,
        TokenKind::Void,
        TokenKind::OpenBrace,
        TokenKind::CloseBrace,
    ],
    stop_after: &[TokenKind::Semi],
};

/// Argument and parameter lists: resume at the next `,` or the closing `)`.
pub const ARGUMENTS: SyncSet = SyncSet {
    name: "argument list",
    stop_before: &[
        TokenKind::Comma,
        TokenKind::CloseParen,
        TokenKind::Semi,
        TokenKind::OpenBrace,
        TokenKind::CloseBrace,
    ],
    stop_after: &[],
};

/// A `for` header: resume at its closing `)`. The header holds two `;`, so this set skips
/// past them.
pub const FOR_HEADER: SyncSet = SyncSet {
    name: "loop header",
    stop_before: &[TokenKind::CloseParen, TokenKind::OpenBrace, TokenKind::CloseBrace],
    stop_after: &[],
};

/// Inside an expression: resume at the next binary operator or at a token that ends the
/// expression.
pub const EXPRESSION: SyncSet = SyncSet {
    name: "expression",
    stop_before: &[
        TokenKind::LogicalOr,
        TokenKind::LogicalAnd,
        TokenKind::EqualsEquals,
        TokenKind::NotEquals,
        TokenKind::LessThan,
        TokenKind::LessThanEquals,
        TokenKind::GreaterThan,
        TokenKind::GreaterThanEquals,
        TokenKind::Plus,
        TokenKind::Minus,
        TokenKind::Asterisk,
        TokenKind::Slash,
        TokenKind::Percent,
        TokenKind::Semi,
        TokenKind::Comma,
        TokenKind::CloseParen,
        TokenKind::CloseBracket,
        TokenKind::OpenBrace,
        TokenKind::CloseBrace,
    ],
    stop_after: &[],
};

/// Array sizes and indices: resume at the closing `]`.
pub const SUBSCRIPT: SyncSet = SyncSet {
    name: "subscript",
    stop_before: &[
        TokenKind::CloseBracket,
        TokenKind::CloseParen,
        TokenKind::Semi,
        TokenKind::OpenBrace,
        TokenKind::CloseBrace,
    ],
    stop_after: &[],
};

/// Parenthesized expressions and conditions: resume at the closing `)`.
pub const GROUPING: SyncSet = SyncSet {
    name: "parenthesized expression",
    stop_before: &[
        TokenKind::CloseParen,
        TokenKind::Semi,
        TokenKind::OpenBrace,
        TokenKind::CloseBrace,
    ],
    stop_after: &[],
};

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(&DECLARATION)]
    #[case(&STATEMENT)]
    #[case(&ARGUMENTS)]
    #[case(&SUBSCRIPT)]
    #[case(&GROUPING)]
    #[case(&FOR_HEADER)]
    #[case(&EXPRESSION)]
    fn test_eof_always_stops(#[case] set: &SyncSet) {
        assert!(set.stops_before(TokenKind::Eof));
    }

    #[rstest]
    #[case(&STATEMENT)]
    #[case(&ARGUMENTS)]
    #[case(&SUBSCRIPT)]
    #[case(&GROUPING)]
    #[case(&EXPRESSION)]
    fn test_nested_sets_never_cross_statement_boundaries(#[case] set: &SyncSet) {
        for kind in [TokenKind::OpenBrace, TokenKind::CloseBrace].iter() {
            assert!(set.stops_before(*kind), "{} crosses {}", set.name, kind);
        }
        assert!(set.stops_before(TokenKind::Semi) || set.stops_after(TokenKind::Semi));
    }

    #[test]
    fn test_declaration_set() {
        assert!(DECLARATION.stops_before(TokenKind::Function));
        assert!(DECLARATION.stops_before(TokenKind::Void));
        assert!(!DECLARATION.stops_before(TokenKind::Print));
        assert!(!DECLARATION.stops_before(TokenKind::CloseBrace));
    }

    #[test]
    fn test_statement_set() {
        assert!(STATEMENT.stops_before(TokenKind::Print));
        assert!(STATEMENT.stops_before(TokenKind::CloseBrace));
        assert!(STATEMENT.stops_after(TokenKind::Semi));
        assert!(!STATEMENT.stops_before(TokenKind::Identifier));
        assert!(!STATEMENT.stops_before(TokenKind::Else));
    }

    #[test]
    fn test_expression_sets() {
        assert!(ARGUMENTS.stops_before(TokenKind::Comma));
        assert!(ARGUMENTS.stops_before(TokenKind::CloseParen));
        assert!(!ARGUMENTS.stops_before(TokenKind::Plus));
        assert!(SUBSCRIPT.stops_before(TokenKind::CloseBracket));
        assert!(!SUBSCRIPT.stops_before(TokenKind::Comma));
        assert!(GROUPING.stops_before(TokenKind::CloseParen));
        assert!(!GROUPING.stops_before(TokenKind::Comma));
        assert!(EXPRESSION.stops_before(TokenKind::Percent));
        assert!(EXPRESSION.stops_before(TokenKind::CloseBracket));
        assert!(!EXPRESSION.stops_before(TokenKind::Identifier));
        assert!(!EXPRESSION.stops_before(TokenKind::Unknown));
    }

    #[test]
    fn test_for_header_set() {
        assert!(FOR_HEADER.stops_before(TokenKind::CloseParen));
        assert!(FOR_HEADER.stops_before(TokenKind::OpenBrace));
        assert!(!FOR_HEADER.stops_before(TokenKind::Semi));
        assert!(!FOR_HEADER.stops_after(TokenKind::Semi));
    }
}
