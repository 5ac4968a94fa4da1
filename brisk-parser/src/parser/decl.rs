use super::*;

impl<'a> Parser<'a> {
    /// Parses the whole token stream. Declarations that fail are reported and skipped.
    pub fn parse_program(&mut self) -> Program {
        let mut declarations = Vec::new();
        if self.at(TokenKind::Eof) {
            self.unexpected("a declaration");
        }

        while !self.at(TokenKind::Eof) {
            let start = self.consumed;
            match self.parse_declaration() {
                Some(decl) => declarations.push(decl),
                None => self.recover(&recovery::DECLARATION, start),
            }
        }

        Program { declarations }
    }

    /// Parses a function or variable declaration.
    pub fn parse_declaration(&mut self) -> Option<Decl> {
        match self.current_token.kind {
            TokenKind::Function => self.parse_function_declaration().map(Decl::Function),
            kind if kind.is_type_keyword() => self.parse_var_declaration().map(Decl::Var),
            _ => {
                self.unexpected("a declaration");
                None
            }
        }
    }

    fn parse_function_declaration(&mut self) -> Option<FunctionDecl> {
        self.expect(TokenKind::Function, "to start a function")?;
        let return_type = self.parse_type()?;
        let name = self.expect_identifier("for the function name")?;

        self.expect(TokenKind::OpenParen, "after the function name")?;
        let params = self.parse_list(
            TokenKind::CloseParen,
            &recovery::ARGUMENTS,
            Self::parse_param,
        )?;

        self.expect(TokenKind::OpenBrace, "to open the function body")?;
        let body = self.parse_stmt_list();
        self.expect(TokenKind::CloseBrace, "to close the function body")?;

        Some(FunctionDecl {
            return_type,
            name,
            params,
            body,
        })
    }

    fn parse_param(&mut self) -> Option<Param> {
        let ty = self.parse_type()?;
        let name = self.expect_identifier("for the parameter name")?;
        Some(Param { ty, name })
    }

    /// Parses `Type Identifier ('=' Expression)? ';'`.
    pub fn parse_var_declaration(&mut self) -> Option<VarDecl> {
        let ty = self.parse_type()?;
        let name = self.expect_identifier("for the variable name")?;
        let initializer = if self.eat(TokenKind::Equals) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        self.expect(TokenKind::Semi, "after variable declaration")?;

        Some(VarDecl {
            ty,
            name,
            initializer,
        })
    }

    /// Parses a base type followed by any number of `[size?]` dimensions.
    pub fn parse_type(&mut self) -> Option<Type> {
        let base = match self.current_token.kind {
            TokenKind::Integer => BaseType::Integer,
            TokenKind::Boolean => BaseType::Boolean,
            TokenKind::Char => BaseType::Char,
            TokenKind::String => BaseType::String,
            TokenKind::Void => BaseType::Void,
            _ => {
                self.unexpected("a type");
                return None;
            }
        };
        self.next();

        let mut dimensions = Vec::new();
        while self.eat(TokenKind::OpenBracket) {
            if self.eat(TokenKind::CloseBracket) {
                dimensions.push(None);
            } else {
                let size = self.parse_delimited_expr(
                    TokenKind::CloseBracket,
                    &recovery::SUBSCRIPT,
                    "to close the array dimension",
                )?;
                dimensions.push(Some(size));
            }
        }

        Some(Type { base, dimensions })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_debug_snapshot;

    fn program(source: &str) -> Program {
        let source = source.into();
        let ast = Parser::new(&source).parse_program();
        assert!(source.has_no_errors(), "{}", source.errors);
        ast
    }

    fn errors(source: &str) -> (Program, Vec<String>) {
        let source = source.into();
        let ast = Parser::new(&source).parse_program();
        let messages = source
            .errors
            .errors()
            .into_iter()
            .map(|error| error.to_string())
            .collect();
        (ast, messages)
    }

    #[test]
    fn test_var_declaration() {
        assert_debug_snapshot!(program("integer x;"), @r###"
        Program {
            declarations: [
                Var(
                    VarDecl {
                        ty: Type {
                            base: Integer,
                            dimensions: [],
                        },
                        name: "x",
                        initializer: None,
                    },
                ),
            ],
        }
        "###);
    }

    #[test]
    fn test_precedence_in_initializer() {
        let ast = program("integer x = 2 + 3 * 4;");
        assert_eq!(
            ast.declarations,
            vec![Decl::Var(VarDecl {
                ty: Type::scalar(BaseType::Integer),
                name: "x".to_string(),
                initializer: Some(Expr::binary(
                    BinaryOp::Add,
                    Expr::integer(2),
                    Expr::binary(BinaryOp::Mul, Expr::integer(3), Expr::integer(4)),
                )),
            })]
        );
    }

    #[test]
    fn test_array_types() {
        let ast = program("char[n + 1][] grid;");
        let decl = match &ast.declarations[0] {
            Decl::Var(decl) => decl,
            other => panic!("expected a variable, got {:?}", other),
        };
        assert_eq!(decl.ty.base, BaseType::Char);
        assert_eq!(
            decl.ty.dimensions,
            vec![
                Some(Expr::binary(
                    BinaryOp::Add,
                    Expr::identifier("n"),
                    Expr::integer(1)
                )),
                None,
            ]
        );
    }

    #[test]
    fn test_function_declaration() {
        let ast = program(
            "function integer add(integer a, integer[] b) {
                return a + b[0];
            }",
        );
        let function = match &ast.declarations[0] {
            Decl::Function(function) => function,
            other => panic!("expected a function, got {:?}", other),
        };
        assert_eq!(function.name, "add");
        assert_eq!(function.return_type, Type::scalar(BaseType::Integer));
        let params: Vec<_> = function.params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(params, vec!["a", "b"]);
        assert!(function.params[1].ty.is_array());
        assert_eq!(function.body.len(), 1);
    }

    #[test]
    fn test_function_without_params() {
        let ast = program("function void main() {}");
        assert_eq!(
            ast.declarations,
            vec![Decl::Function(FunctionDecl {
                return_type: Type::scalar(BaseType::Void),
                name: "main".to_string(),
                params: vec![],
                body: vec![],
            })]
        );
    }

    #[test]
    fn test_declaration_order() {
        let ast = program("integer a; function void f() {} boolean b = true; string c;");
        let names: Vec<_> = ast
            .declarations
            .iter()
            .map(|decl| match decl {
                Decl::Function(function) => function.name.as_str(),
                Decl::Var(var) => var.name.as_str(),
            })
            .collect();
        assert_eq!(names, vec!["a", "f", "b", "c"]);
    }

    #[test]
    fn test_missing_semicolon_between_declarations() {
        let (ast, errors) = errors("integer x = 1 integer y = 2;");
        assert_eq!(errors, vec!["<input>:1:15: expected ';' after variable declaration, found 'integer'"]);
        assert_eq!(ast.declarations.len(), 1);
    }

    #[test]
    fn test_statement_at_top_level() {
        let (ast, errors) = errors("print(1); function void main() {}");
        assert_eq!(errors, vec!["<input>:1:1: expected a declaration, found 'print'"]);
        assert_eq!(ast.declarations.len(), 1);
    }

    #[test]
    fn test_bad_parameters_report_every_error() {
        let (ast, errors) = errors("function void f(integer, boolean) {} integer ok;");
        assert_eq!(
            errors,
            vec![
                "<input>:1:24: expected identifier for the parameter name, found ','",
                "<input>:1:33: expected identifier for the parameter name, found ')'",
            ]
        );
        assert_eq!(ast.declarations.len(), 1);
    }

    #[test]
    fn test_bad_array_dimension() {
        let (ast, errors) = errors("integer[+] x; integer y;");
        assert_eq!(errors, vec!["<input>:1:9: expected an expression, found '+'"]);
        assert_eq!(ast.declarations.len(), 1);
    }
}
