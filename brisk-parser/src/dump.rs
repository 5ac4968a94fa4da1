//! Indented outline of a syntax tree, one node per line.
//!
//! ```text
//! Program
//!   FunctionDecl: main
//!     Type: void
//!     ExprStmt
//!       AssignExpr: x
//!         LiteralExpr: integer = 1
//! ```

use crate::ast::*;
use crate::visitor::*;

/// Receives the nodes of a tree in depth-first order. `open` starts a node whose children are
/// reported until the matching `close`.
pub(crate) trait TreeWriter {
    fn open(&mut self, label: String);
    fn close(&mut self);
}

/// Walks a tree and reports a labelled node to `W` for each AST node.
pub(crate) struct Outline<W> {
    pub writer: W,
}

impl<W: TreeWriter> Outline<W> {
    fn node(&mut self, label: String, children: impl FnOnce(&mut Self)) {
        self.writer.open(label);
        children(self);
        self.writer.close();
    }
}

impl<'ast, W: TreeWriter> Visitor<'ast> for Outline<W> {
    fn visit_program(&mut self, program: &'ast Program) {
        self.node("Program".to_string(), |this| walk_program(this, program));
    }

    fn visit_decl(&mut self, decl: &'ast Decl) {
        match decl {
            Decl::Function(function) => {
                self.node(format!("FunctionDecl: {}", function.name), |this| {
                    walk_decl(this, decl)
                })
            }
            Decl::Var(_) => walk_decl(self, decl),
        }
    }

    fn visit_param(&mut self, param: &'ast Param) {
        self.node(format!("Param: {}", param.name), |this| walk_param(this, param));
    }

    fn visit_var_decl(&mut self, var: &'ast VarDecl) {
        self.node(format!("VarDecl: {}", var.name), |this| walk_var_decl(this, var));
    }

    fn visit_type(&mut self, ty: &'ast Type) {
        let label = format!("Type: {}{}", ty.base, "[]".repeat(ty.dimensions.len()));
        self.node(label, |this| walk_type(this, ty));
    }

    fn visit_block(&mut self, block: &'ast Block) {
        self.node("Block".to_string(), |this| walk_block(this, block));
    }

    fn visit_stmt(&mut self, stmt: &'ast Stmt) {
        let label = match stmt {
            // labelled by their own visit method
            Stmt::Block(_) | Stmt::Var(_) | Stmt::If(_) => return walk_stmt(self, stmt),
            Stmt::For(_) => "ForStmt",
            Stmt::While(_) => "WhileStmt",
            Stmt::Return(_) => "ReturnStmt",
            Stmt::Print(_) => "PrintStmt",
            Stmt::Expr(_) => "ExprStmt",
        };
        self.node(label.to_string(), |this| walk_stmt(this, stmt));
    }

    fn visit_if_stmt(&mut self, if_stmt: &'ast IfStmt) {
        self.node("IfStmt".to_string(), |this| walk_if_stmt(this, if_stmt));
    }

    fn visit_expr(&mut self, expr: &'ast Expr) {
        let label = match expr {
            Expr::Literal { kind, text } => format!("LiteralExpr: {} = {}", kind, text),
            Expr::Binary { op, .. } => format!("BinaryExpr: {}", op),
            Expr::Unary { op, .. } => format!("UnaryExpr: {}", op),
            Expr::Assign { target, .. } => format!("AssignExpr: {}", target),
            Expr::Identifier(name) => format!("Identifier: {}", name),
            Expr::Call { name, .. } => format!("FunctionCall: {}", name),
            Expr::Index { name, .. } => format!("ArrayAccess: {}", name),
        };
        self.node(label, |this| walk_expr(this, expr));
    }
}

struct Dump {
    out: String,
    depth: usize,
}

impl TreeWriter for Dump {
    fn open(&mut self, label: String) {
        for _ in 0..self.depth {
            self.out.push_str("  ");
        }
        self.out.push_str(&label);
        self.out.push('\n');
        self.depth += 1;
    }

    fn close(&mut self) {
        self.depth -= 1;
    }
}

/// Renders `program` as an indented outline, two spaces per level.
pub fn dump(program: &Program) -> String {
    let mut outline = Outline {
        writer: Dump {
            out: String::new(),
            depth: 0,
        },
    };
    outline.visit_program(program);
    outline.writer.out
}
