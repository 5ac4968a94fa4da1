//! Pretty printer that turns a syntax tree back into source code.
//!
//! The output parses back to the same tree: parentheses are added wherever the tree shape differs
//! from what operator precedence alone would give.

use crate::ast::*;

const INDENT: &str = "    ";

/// Precedence of unary operators, above every binary operator.
const UNARY_PRECEDENCE: u8 = 7;
/// Identifiers, literals, calls and indexing never need parentheses.
const ATOM_PRECEDENCE: u8 = 8;

struct Printer {
    out: String,
    depth: usize,
}

impl Printer {
    fn indent(&mut self) {
        for _ in 0..self.depth {
            self.out.push_str(INDENT);
        }
    }

    fn program(&mut self, program: &Program) {
        let mut previous: Option<&Decl> = None;
        for decl in &program.declarations {
            let is_function = matches!(decl, Decl::Function(_));
            if let Some(previous) = previous {
                if is_function || matches!(previous, Decl::Function(_)) {
                    self.out.push('\n');
                }
            }
            match decl {
                Decl::Function(function) => self.function(function),
                Decl::Var(var) => self.var_decl(var),
            }
            self.out.push('\n');
            previous = Some(decl);
        }
    }

    fn function(&mut self, function: &FunctionDecl) {
        self.out.push_str("function ");
        self.ty(&function.return_type);
        self.out.push(' ');
        self.out.push_str(&function.name);
        self.out.push('(');
        for (i, param) in function.params.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            self.ty(&param.ty);
            self.out.push(' ');
            self.out.push_str(&param.name);
        }
        self.out.push_str(") ");
        self.stmt_list(&function.body);
    }

    fn var_decl(&mut self, var: &VarDecl) {
        self.ty(&var.ty);
        self.out.push(' ');
        self.out.push_str(&var.name);
        if let Some(initializer) = &var.initializer {
            self.out.push_str(" = ");
            self.expr(initializer, 0);
        }
        self.out.push(';');
    }

    fn ty(&mut self, ty: &Type) {
        self.out.push_str(ty.base.keyword());
        for size in &ty.dimensions {
            self.out.push('[');
            if let Some(size) = size {
                self.expr(size, 0);
            }
            self.out.push(']');
        }
    }

    /// Prints `{`, the statements one per line, and `}`.
    fn stmt_list(&mut self, stmts: &[Stmt]) {
        if stmts.is_empty() {
            self.out.push_str("{}");
            return;
        }
        self.out.push_str("{\n");
        self.depth += 1;
        for stmt in stmts {
            self.indent();
            self.stmt(stmt);
            self.out.push('\n');
        }
        self.depth -= 1;
        self.indent();
        self.out.push('}');
    }

    /// Prints a statement starting at the current column, without a trailing newline.
    fn stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Block(block) => self.stmt_list(&block.statements),
            Stmt::Var(var) => self.var_decl(var),
            Stmt::If(if_stmt) => self.if_stmt(if_stmt),
            Stmt::For(for_stmt) => {
                self.out.push_str("for (");
                match &for_stmt.init {
                    Some(init) => self.stmt(init),
                    None => self.out.push(';'),
                }
                self.out.push(' ');
                self.expr(&for_stmt.condition, 0);
                self.out.push(';');
                if let Some(increment) = &for_stmt.increment {
                    self.out.push(' ');
                    match &**increment {
                        Stmt::Expr(Some(expr)) => self.expr(expr, 0),
                        other => self.stmt(other),
                    }
                }
                self.out.push_str(") ");
                self.stmt(&for_stmt.body);
            }
            Stmt::While(while_stmt) => {
                self.out.push_str("while (");
                self.expr(&while_stmt.condition, 0);
                self.out.push_str(") ");
                self.stmt(&while_stmt.body);
            }
            Stmt::Return(value) => {
                self.out.push_str("return");
                if let Some(value) = value {
                    self.out.push(' ');
                    self.expr(value, 0);
                }
                self.out.push(';');
            }
            Stmt::Print(args) => {
                self.out.push_str("print(");
                self.expr_list(args);
                self.out.push_str(");");
            }
            Stmt::Expr(expr) => {
                if let Some(expr) = expr {
                    self.expr(expr, 0);
                }
                self.out.push(';');
            }
        }
    }

    fn if_stmt(&mut self, if_stmt: &IfStmt) {
        self.out.push_str("if (");
        self.expr(&if_stmt.condition, 0);
        self.out.push_str(") ");
        self.stmt_list(&if_stmt.then_block.statements);
        match &if_stmt.else_branch {
            Some(ElseBranch::Block(block)) => {
                self.out.push_str(" else ");
                self.stmt_list(&block.statements);
            }
            Some(ElseBranch::If(else_if)) => {
                self.out.push_str(" else ");
                self.if_stmt(else_if);
            }
            None => {}
        }
    }

    fn expr_list(&mut self, exprs: &[Expr]) {
        for (i, expr) in exprs.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            self.expr(expr, 0);
        }
    }

    /// Prints `expr`, in parentheses if it binds looser than `min_precedence`.
    fn expr(&mut self, expr: &Expr, min_precedence: u8) {
        let parenthesize = precedence(expr) < min_precedence;
        if parenthesize {
            self.out.push('(');
        }

        match expr {
            Expr::Literal { kind, text } => match kind {
                LiteralKind::Char => {
                    self.out.push('\'');
                    self.out.push_str(text);
                    self.out.push('\'');
                }
                LiteralKind::String => {
                    self.out.push('"');
                    self.out.push_str(text);
                    self.out.push('"');
                }
                LiteralKind::Integer | LiteralKind::Boolean => self.out.push_str(text),
            },
            Expr::Binary { op, lhs, rhs } => {
                // left-associative: a right operand of the same precedence needs parentheses
                self.expr(lhs, op.precedence());
                self.out.push(' ');
                self.out.push_str(op.symbol());
                self.out.push(' ');
                self.expr(rhs, op.precedence() + 1);
            }
            Expr::Unary { op, operand } => {
                self.out.push_str(op.symbol());
                // `- -x`, not `--x`
                if let (UnaryOp::Neg, Expr::Unary { op: UnaryOp::Neg, .. }) = (op, &**operand) {
                    self.out.push(' ');
                }
                self.expr(operand, UNARY_PRECEDENCE);
            }
            Expr::Assign { target, value } => {
                self.out.push_str(target);
                self.out.push_str(" = ");
                self.expr(value, 0);
            }
            Expr::Identifier(name) => self.out.push_str(name),
            Expr::Call { name, args } => {
                self.out.push_str(name);
                self.out.push('(');
                self.expr_list(args);
                self.out.push(')');
            }
            Expr::Index { name, indices } => {
                self.out.push_str(name);
                for index in indices {
                    self.out.push('[');
                    self.expr(index, 0);
                    self.out.push(']');
                }
            }
        }

        if parenthesize {
            self.out.push(')');
        }
    }
}

fn precedence(expr: &Expr) -> u8 {
    match expr {
        Expr::Assign { .. } => 0,
        Expr::Binary { op, .. } => op.precedence(),
        Expr::Unary { .. } => UNARY_PRECEDENCE,
        _ => ATOM_PRECEDENCE,
    }
}

/// Prints `program` as source code, indented with four spaces.
pub fn to_source(program: &Program) -> String {
    let mut printer = Printer {
        out: String::new(),
        depth: 0,
    };
    printer.program(program);
    printer.out
}

/// Prints a single expression.
pub fn expr_to_source(expr: &Expr) -> String {
    let mut printer = Printer {
        out: String::new(),
        depth: 0,
    };
    printer.expr(expr, 0);
    printer.out
}
