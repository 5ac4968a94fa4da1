use super::*;

impl<'a> Parser<'a> {
    /// Parses a statement.
    pub fn parse_stmt(&mut self) -> Option<Stmt> {
        self.nested(|parser| match parser.current_token.kind {
            TokenKind::OpenBrace => parser.parse_block().map(Stmt::Block),
            TokenKind::If => parser.parse_if_stmt().map(Stmt::If),
            TokenKind::For => parser.parse_for_stmt().map(Stmt::For),
            TokenKind::While => parser.parse_while_stmt().map(Stmt::While),
            TokenKind::Return => parser.parse_return_stmt(),
            TokenKind::Print => parser.parse_print_stmt(),
            kind if kind.is_type_keyword() => parser.parse_var_declaration().map(Stmt::Var),
            _ => parser.parse_expr_stmt(),
        })
    }

    pub fn parse_block(&mut self) -> Option<Block> {
        self.expect(TokenKind::OpenBrace, "to open a block")?;
        let statements = self.parse_stmt_list();
        self.expect(TokenKind::CloseBrace, "to close the block")?;
        Some(Block { statements })
    }

    /// Parses statements up to (not including) `}` or end of file.
    /// Statements that fail are reported and skipped.
    pub fn parse_stmt_list(&mut self) -> Vec<Stmt> {
        let mut body = Vec::new();
        while !self.at(TokenKind::CloseBrace) && !self.at(TokenKind::Eof) {
            let start = self.consumed;
            match self.parse_stmt() {
                Some(stmt) => body.push(stmt),
                None => self.recover(&recovery::STATEMENT, start),
            }
        }
        body
    }

    /// Parses `'(' Expression ')'` after `if` or `while`.
    fn parse_condition(&mut self, keyword: &str) -> Option<Expr> {
        self.expect(TokenKind::OpenParen, &format!("after '{}'", keyword))?;
        self.parse_delimited_expr(
            TokenKind::CloseParen,
            &recovery::GROUPING,
            "to close the condition",
        )
    }

    /// A statement whose header failed is still parsed up to the end of its body when the body
    /// starts with `{`, so that the body is not mistaken for separate statements. The statement
    /// itself is dropped.
    fn parse_if_stmt(&mut self) -> Option<IfStmt> {
        let mut arms = vec![self.parse_if_arm()?];
        let mut else_branch = None;
        while self.at(TokenKind::Else) {
            // `else if` adds an arm, a bare `else` is followed by the last block
            if self.peek() == TokenKind::If {
                self.next();
                arms.push(self.parse_if_arm()?);
            } else {
                self.next();
                else_branch = Some(ElseBranch::Block(self.parse_block()?));
                break;
            }
        }

        // each `else if` arm becomes an if statement nested in the previous one
        let mut if_stmt = None;
        for (condition, then_block) in arms.into_iter().rev() {
            let else_branch = match if_stmt.take() {
                Some(inner) => Some(ElseBranch::If(Box::new(inner))),
                None => else_branch.take(),
            };
            if_stmt = Some(IfStmt {
                condition: condition?,
                then_block,
                else_branch,
            });
        }
        if_stmt
    }

    /// Parses `if (condition) block`. The condition is `None` if it failed but the block was
    /// still parsed.
    fn parse_if_arm(&mut self) -> Option<(Option<Expr>, Block)> {
        self.expect(TokenKind::If, "to start an if statement")?;
        let condition = self.parse_condition("if");
        if condition.is_none() && !self.at(TokenKind::OpenBrace) {
            return None;
        }
        let then_block = self.parse_block()?;
        Some((condition, then_block))
    }

    fn parse_for_stmt(&mut self) -> Option<ForStmt> {
        self.expect(TokenKind::For, "to start a for statement")?;
        self.expect(TokenKind::OpenParen, "after 'for'")?;

        let header = self.parse_for_header();
        if header.is_none() {
            self.synchronize(&recovery::FOR_HEADER);
            self.eat(TokenKind::CloseParen);
            if !self.at(TokenKind::OpenBrace) {
                return None;
            }
        }

        let body = self.parse_stmt()?;
        let (init, condition, increment) = header?;

        Some(ForStmt {
            init: init.map(Box::new),
            condition,
            increment: increment.map(Box::new),
            body: Box::new(body),
        })
    }

    /// Parses `init; condition; increment)` after `for (`.
    fn parse_for_header(&mut self) -> Option<(Option<Stmt>, Expr, Option<Stmt>)> {
        let init = if self.current_token.kind.is_type_keyword() {
            Some(Stmt::Var(self.parse_var_declaration()?))
        } else {
            match self.parse_expr_stmt()? {
                Stmt::Expr(None) => None,
                stmt => Some(stmt),
            }
        };

        let condition = self.parse_expr()?;
        self.expect(TokenKind::Semi, "after the loop condition")?;

        let increment = if self.at(TokenKind::CloseParen) {
            None
        } else {
            Some(Stmt::Expr(Some(self.parse_expr()?)))
        };
        self.expect(TokenKind::CloseParen, "to close the loop header")?;

        Some((init, condition, increment))
    }

    fn parse_while_stmt(&mut self) -> Option<WhileStmt> {
        self.expect(TokenKind::While, "to start a while statement")?;
        let condition = self.parse_condition("while");
        if condition.is_none() && !self.at(TokenKind::OpenBrace) {
            return None;
        }
        let body = self.parse_stmt()?;
        Some(WhileStmt {
            condition: condition?,
            body: Box::new(body),
        })
    }

    fn parse_return_stmt(&mut self) -> Option<Stmt> {
        self.expect(TokenKind::Return, "to start a return statement")?;
        let value = if self.at(TokenKind::Semi) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.expect(TokenKind::Semi, "after return statement")?;
        Some(Stmt::Return(value))
    }

    fn parse_print_stmt(&mut self) -> Option<Stmt> {
        self.expect(TokenKind::Print, "to start a print statement")?;
        self.expect(TokenKind::OpenParen, "after 'print'")?;
        if self.at(TokenKind::CloseParen) {
            self.unexpected("an expression to print");
            return None;
        }
        let args = self.parse_list(
            TokenKind::CloseParen,
            &recovery::ARGUMENTS,
            Self::parse_expr,
        )?;
        self.expect(TokenKind::Semi, "after print statement")?;
        Some(Stmt::Print(args))
    }

    /// Parses `Expression? ';'`.
    fn parse_expr_stmt(&mut self) -> Option<Stmt> {
        if self.eat(TokenKind::Semi) {
            return Some(Stmt::Expr(None));
        }
        let expr = self.parse_expr()?;
        self.expect(TokenKind::Semi, "after expression")?;
        Some(Stmt::Expr(Some(expr)))
    }
}
