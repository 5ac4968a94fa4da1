use super::*;

impl<'a> Parser<'a> {
    /* Expressions */
    /// Parses any expression, including assignments.
    ///
    /// `x = ...` is recognized by consuming the identifier and checking for `=`. If there is no
    /// `=`, the identifier is put back and the expression is parsed as an [`Self::parse_or_expr`].
    pub fn parse_expr(&mut self) -> Option<Expr> {
        self.nested(|parser| {
            if parser.at(TokenKind::Identifier) {
                let ident = parser.next();
                if parser.eat(TokenKind::Equals) {
                    let value = parser.parse_expr()?;
                    return Some(Expr::assign(ident.value.unwrap_or_default(), value));
                }
                parser.unget(ident);
            }
            parser.parse_or_expr()
        })
    }

    /// Parses `operand (op operand)*` into a left-leaning tree. `operator` maps the current token
    /// to the operator of this precedence level, if any.
    ///
    /// A bad right operand is reported and skipped up to the next operator, so the rest of the
    /// expression is still checked. The whole expression then fails.
    fn parse_binary(
        &mut self,
        operand: fn(&mut Self) -> Option<Expr>,
        operator: fn(TokenKind) -> Option<BinaryOp>,
    ) -> Option<Expr> {
        let mut lhs = Some(operand(self)?);
        while let Some(op) = operator(self.current_token.kind) {
            self.next(); // eat operator
            let rhs = operand(self);
            if rhs.is_none() {
                self.synchronize(&recovery::EXPRESSION);
            }
            lhs = match (lhs, rhs) {
                (Some(lhs), Some(rhs)) => Some(Expr::binary(op, lhs, rhs)),
                _ => None,
            };
        }
        lhs
    }

    fn parse_or_expr(&mut self) -> Option<Expr> {
        self.parse_binary(Self::parse_and_expr, |kind| match kind {
            TokenKind::LogicalOr => Some(BinaryOp::Or),
            _ => None,
        })
    }

    fn parse_and_expr(&mut self) -> Option<Expr> {
        self.parse_binary(Self::parse_eq_expr, |kind| match kind {
            TokenKind::LogicalAnd => Some(BinaryOp::And),
            _ => None,
        })
    }

    fn parse_eq_expr(&mut self) -> Option<Expr> {
        self.parse_binary(Self::parse_rel_expr, |kind| match kind {
            TokenKind::EqualsEquals => Some(BinaryOp::Eq),
            TokenKind::NotEquals => Some(BinaryOp::NotEq),
            _ => None,
        })
    }

    fn parse_rel_expr(&mut self) -> Option<Expr> {
        self.parse_binary(Self::parse_add_expr, |kind| match kind {
            TokenKind::LessThan => Some(BinaryOp::Lt),
            TokenKind::LessThanEquals => Some(BinaryOp::Le),
            TokenKind::GreaterThan => Some(BinaryOp::Gt),
            TokenKind::GreaterThanEquals => Some(BinaryOp::Ge),
            _ => None,
        })
    }

    fn parse_add_expr(&mut self) -> Option<Expr> {
        self.parse_binary(Self::parse_term, |kind| match kind {
            TokenKind::Plus => Some(BinaryOp::Add),
            TokenKind::Minus => Some(BinaryOp::Sub),
            _ => None,
        })
    }

    fn parse_term(&mut self) -> Option<Expr> {
        self.parse_binary(Self::parse_unary_expr, |kind| match kind {
            TokenKind::Asterisk => Some(BinaryOp::Mul),
            TokenKind::Slash => Some(BinaryOp::Div),
            TokenKind::Percent => Some(BinaryOp::Mod),
            _ => None,
        })
    }

    fn parse_unary_expr(&mut self) -> Option<Expr> {
        let op = match self.current_token.kind {
            TokenKind::LogicalNot => UnaryOp::Not,
            TokenKind::Minus => UnaryOp::Neg,
            _ => return self.parse_factor(),
        };
        self.next(); // eat operator
        let operand = self.nested(Self::parse_unary_expr)?;
        Some(Expr::unary(op, operand))
    }

    /* Expressions.Primary */
    fn parse_factor(&mut self) -> Option<Expr> {
        let kind = match self.current_token.kind {
            TokenKind::Identifier => return self.parse_identifier_expr(),
            TokenKind::OpenParen => {
                self.next();
                return self.parse_delimited_expr(
                    TokenKind::CloseParen,
                    &recovery::GROUPING,
                    "to close the parenthesized expression",
                );
            }
            TokenKind::True | TokenKind::False => LiteralKind::Boolean,
            TokenKind::Number => LiteralKind::Integer,
            TokenKind::CharLit => LiteralKind::Char,
            TokenKind::StringLit => LiteralKind::String,
            _ => {
                self.unexpected("an expression");
                return None;
            }
        };

        let token = self.next();
        let text = match token.kind {
            TokenKind::True => "true".to_string(),
            TokenKind::False => "false".to_string(),
            _ => token.value.unwrap_or_default(),
        };
        Some(Expr::literal(kind, text))
    }

    /// Parses an identifier, a call `f(a, b)` or an array access `a[i][j]`.
    fn parse_identifier_expr(&mut self) -> Option<Expr> {
        let name = self.next().value.unwrap_or_default();

        if self.eat(TokenKind::OpenParen) {
            let args = self.parse_list(
                TokenKind::CloseParen,
                &recovery::ARGUMENTS,
                Self::parse_expr,
            )?;
            return Some(Expr::Call { name, args });
        }

        if self.at(TokenKind::OpenBracket) {
            // keep going after a bad index so that every bad index is reported
            let mut indices = Some(Vec::new());
            while self.eat(TokenKind::OpenBracket) {
                let index = self.parse_delimited_expr(
                    TokenKind::CloseBracket,
                    &recovery::SUBSCRIPT,
                    "to close the index",
                );
                indices = match (indices, index) {
                    (Some(mut indices), Some(index)) => {
                        indices.push(index);
                        Some(indices)
                    }
                    _ => None,
                };
            }
            return indices.map(|indices| Expr::Index { name, indices });
        }

        Some(Expr::Identifier(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_debug_snapshot;
    use rstest::rstest;

    fn expr(source: &str) -> Expr {
        let source = source.into();
        let expr = Parser::new(&source).parse_expr();
        assert!(source.has_no_errors(), "{}", source.errors);
        expr.expect("expression should parse")
    }

    fn expr_errors(source: &str) -> (Option<Expr>, Vec<String>) {
        let source = source.into();
        let expr = Parser::new(&source).parse_expr();
        let errors = source
            .errors
            .errors()
            .into_iter()
            .map(|error| format!("{}: {}", error.location.col, error.message))
            .collect();
        (expr, errors)
    }

    fn id(name: &str) -> Expr {
        Expr::identifier(name)
    }

    #[test]
    fn test_literals() {
        assert_eq!(expr("42"), Expr::integer(42));
        assert_eq!(expr("true"), Expr::literal(LiteralKind::Boolean, "true"));
        assert_eq!(expr("false"), Expr::literal(LiteralKind::Boolean, "false"));
        assert_eq!(expr("'a'"), Expr::literal(LiteralKind::Char, "a"));
        assert_eq!(expr(r"'\n'"), Expr::literal(LiteralKind::Char, r"\n"));
        assert_eq!(
            expr("\"hello world\""),
            Expr::literal(LiteralKind::String, "hello world")
        );
    }

    #[test]
    fn test_precedence() {
        assert_debug_snapshot!(expr("1 + 2 * 3"), @r###"
        Binary {
            op: Add,
            lhs: Literal {
                kind: Integer,
                text: "1",
            },
            rhs: Binary {
                op: Mul,
                lhs: Literal {
                    kind: Integer,
                    text: "2",
                },
                rhs: Literal {
                    kind: Integer,
                    text: "3",
                },
            },
        }
        "###);
    }

    #[rstest]
    #[case("a - b - c", BinaryOp::Sub)]
    #[case("a / b / c", BinaryOp::Div)]
    #[case("a || b || c", BinaryOp::Or)]
    #[case("a == b == c", BinaryOp::Eq)]
    #[case("a < b < c", BinaryOp::Lt)]
    fn test_left_associative(#[case] source: &str, #[case] op: BinaryOp) {
        assert_eq!(
            expr(source),
            Expr::binary(op, Expr::binary(op, id("a"), id("b")), id("c"))
        );
    }

    #[test]
    fn test_precedence_levels() {
        // || < && < == < relational < additive < multiplicative
        assert_eq!(
            expr("a || b && c == d < e + f * g"),
            Expr::binary(
                BinaryOp::Or,
                id("a"),
                Expr::binary(
                    BinaryOp::And,
                    id("b"),
                    Expr::binary(
                        BinaryOp::Eq,
                        id("c"),
                        Expr::binary(
                            BinaryOp::Lt,
                            id("d"),
                            Expr::binary(
                                BinaryOp::Add,
                                id("e"),
                                Expr::binary(BinaryOp::Mul, id("f"), id("g")),
                            ),
                        ),
                    ),
                ),
            )
        );
    }

    #[test]
    fn test_grouping() {
        assert_eq!(
            expr("(1 + 2) * 3"),
            Expr::binary(
                BinaryOp::Mul,
                Expr::binary(BinaryOp::Add, Expr::integer(1), Expr::integer(2)),
                Expr::integer(3),
            )
        );
    }

    #[test]
    fn test_unary() {
        assert_eq!(
            expr("!-x"),
            Expr::unary(UnaryOp::Not, Expr::unary(UnaryOp::Neg, id("x")))
        );
        assert_eq!(
            expr("-a * b"),
            Expr::binary(BinaryOp::Mul, Expr::unary(UnaryOp::Neg, id("a")), id("b"))
        );
    }

    #[test]
    fn test_assignment_is_right_associative() {
        assert_eq!(
            expr("a = b = 1 + 2"),
            Expr::assign(
                "a",
                Expr::assign(
                    "b",
                    Expr::binary(BinaryOp::Add, Expr::integer(1), Expr::integer(2)),
                ),
            )
        );
    }

    #[test]
    fn test_identifier_without_assignment_is_put_back() {
        assert_eq!(
            expr("a == b"),
            Expr::binary(BinaryOp::Eq, id("a"), id("b"))
        );
        assert_eq!(expr("a"), id("a"));
    }

    #[test]
    fn test_calls_and_indexing() {
        assert_eq!(
            expr("f()"),
            Expr::Call {
                name: "f".to_string(),
                args: vec![],
            }
        );
        assert_eq!(
            expr("max(a, b + 1, g(c))"),
            Expr::Call {
                name: "max".to_string(),
                args: vec![
                    id("a"),
                    Expr::binary(BinaryOp::Add, id("b"), Expr::integer(1)),
                    Expr::Call {
                        name: "g".to_string(),
                        args: vec![id("c")],
                    },
                ],
            }
        );
        assert_eq!(
            expr("grid[i][j + 1]"),
            Expr::Index {
                name: "grid".to_string(),
                indices: vec![id("i"), Expr::binary(BinaryOp::Add, id("j"), Expr::integer(1))],
            }
        );
    }

    #[test]
    fn test_missing_operand() {
        let (expr, errors) = expr_errors("1 + * 2");
        assert_eq!(expr, None);
        assert_eq!(errors, vec!["5: expected an expression, found '*'"]);
    }

    #[test]
    fn test_every_bad_operand_is_reported() {
        let (expr, errors) = expr_errors("1 + @ + 2 * / 3 - 4");
        assert_eq!(expr, None);
        assert_eq!(
            errors,
            vec![
                "5: expected an expression, found unknown token",
                "13: expected an expression, found '/'",
            ]
        );
    }

    #[test]
    fn test_deep_unary_chain() {
        let (expr, errors) = expr_errors(&format!("{}x", "- ".repeat(4000)));
        assert_eq!(expr, None);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("nested too deeply"), "{}", errors[0]);
    }

    #[test]
    fn test_unclosed_grouping() {
        let (expr, errors) = expr_errors("(1 + 2;");
        assert_eq!(expr, None);
        assert_eq!(
            errors,
            vec!["7: expected ')' to close the parenthesized expression, found ';'"]
        );
    }

    #[test]
    fn test_every_bad_argument_is_reported() {
        let (expr, errors) = expr_errors("f(+, 1, -)");
        assert_eq!(expr, None);
        assert_eq!(
            errors,
            vec![
                "3: expected an expression, found '+'",
                "10: expected an expression, found ')'",
            ]
        );
    }

    #[test]
    fn test_every_bad_index_is_reported() {
        let (expr, errors) = expr_errors("a[*][1][/]");
        assert_eq!(expr, None);
        assert_eq!(
            errors,
            vec![
                "3: expected an expression, found '*'",
                "9: expected an expression, found '/'",
            ]
        );
    }

    #[test]
    fn test_missing_comma_between_arguments() {
        let (expr, errors) = expr_errors("f(a b)");
        assert_eq!(expr, None);
        assert_eq!(errors, vec!["5: expected ',' or ')', found identifier `b`"]);
    }

    #[test]
    fn test_stray_character() {
        let (expr, errors) = expr_errors("a & b");
        // `a` parses, the caller sees the unknown token next
        assert_eq!(expr, Some(id("a")));
        assert!(errors.is_empty());

        let (expr, errors) = expr_errors("& b");
        assert_eq!(expr, None);
        assert_eq!(errors, vec!["1: expected an expression, found unknown token"]);
    }
}
