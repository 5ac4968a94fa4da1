//! Visitor pattern for AST nodes.
//!
//! Every `visit_*` method defaults to the matching `walk_*` function, which visits the children of
//! the node in source order. Override a method to act on a node kind and call the `walk_*`
//! function to keep descending.

use crate::ast::{Block, Decl, ElseBranch, Expr, IfStmt, Param, Program, Stmt, Type, VarDecl};

pub trait Visitor<'ast>: Sized {
    fn visit_program(&mut self, program: &'ast Program) {
        walk_program(self, program);
    }
    fn visit_decl(&mut self, decl: &'ast Decl) {
        walk_decl(self, decl);
    }
    fn visit_param(&mut self, param: &'ast Param) {
        walk_param(self, param);
    }
    /// Called for global variables and for local variable statements.
    fn visit_var_decl(&mut self, var: &'ast VarDecl) {
        walk_var_decl(self, var);
    }
    fn visit_type(&mut self, ty: &'ast Type) {
        walk_type(self, ty);
    }
    fn visit_block(&mut self, block: &'ast Block) {
        walk_block(self, block);
    }
    fn visit_stmt(&mut self, stmt: &'ast Stmt) {
        walk_stmt(self, stmt);
    }
    /// Called for `if` statements and for every `else if` of a chain.
    fn visit_if_stmt(&mut self, if_stmt: &'ast IfStmt) {
        walk_if_stmt(self, if_stmt);
    }
    fn visit_expr(&mut self, expr: &'ast Expr) {
        walk_expr(self, expr);
    }
}

pub fn walk_program<'ast>(visitor: &mut impl Visitor<'ast>, program: &'ast Program) {
    for decl in &program.declarations {
        visitor.visit_decl(decl);
    }
}

pub fn walk_decl<'ast>(visitor: &mut impl Visitor<'ast>, decl: &'ast Decl) {
    match decl {
        Decl::Function(function) => {
            visitor.visit_type(&function.return_type);
            for param in &function.params {
                visitor.visit_param(param);
            }
            for stmt in &function.body {
                visitor.visit_stmt(stmt);
            }
        }
        Decl::Var(var) => visitor.visit_var_decl(var),
    }
}

pub fn walk_param<'ast>(visitor: &mut impl Visitor<'ast>, param: &'ast Param) {
    visitor.visit_type(&param.ty);
}

pub fn walk_var_decl<'ast>(visitor: &mut impl Visitor<'ast>, var: &'ast VarDecl) {
    visitor.visit_type(&var.ty);
    if let Some(initializer) = &var.initializer {
        visitor.visit_expr(initializer);
    }
}

pub fn walk_type<'ast>(visitor: &mut impl Visitor<'ast>, ty: &'ast Type) {
    for size in ty.dimensions.iter().flatten() {
        visitor.visit_expr(size);
    }
}

pub fn walk_block<'ast>(visitor: &mut impl Visitor<'ast>, block: &'ast Block) {
    for stmt in &block.statements {
        visitor.visit_stmt(stmt);
    }
}

pub fn walk_stmt<'ast>(visitor: &mut impl Visitor<'ast>, stmt: &'ast Stmt) {
    match stmt {
        Stmt::Block(block) => visitor.visit_block(block),
        Stmt::Var(var) => visitor.visit_var_decl(var),
        Stmt::If(if_stmt) => visitor.visit_if_stmt(if_stmt),
        Stmt::For(for_stmt) => {
            if let Some(init) = &for_stmt.init {
                visitor.visit_stmt(init);
            }
            visitor.visit_expr(&for_stmt.condition);
            if let Some(increment) = &for_stmt.increment {
                visitor.visit_stmt(increment);
            }
            visitor.visit_stmt(&for_stmt.body);
        }
        Stmt::While(while_stmt) => {
            visitor.visit_expr(&while_stmt.condition);
            visitor.visit_stmt(&while_stmt.body);
        }
        Stmt::Return(value) | Stmt::Expr(value) => {
            if let Some(value) = value {
                visitor.visit_expr(value);
            }
        }
        Stmt::Print(args) => {
            for arg in args {
                visitor.visit_expr(arg);
            }
        }
    }
}

pub fn walk_if_stmt<'ast>(visitor: &mut impl Visitor<'ast>, if_stmt: &'ast IfStmt) {
    visitor.visit_expr(&if_stmt.condition);
    visitor.visit_block(&if_stmt.then_block);
    match &if_stmt.else_branch {
        Some(ElseBranch::Block(block)) => visitor.visit_block(block),
        Some(ElseBranch::If(else_if)) => visitor.visit_if_stmt(else_if),
        None => {}
    }
}

pub fn walk_expr<'ast>(visitor: &mut impl Visitor<'ast>, expr: &'ast Expr) {
    match expr {
        Expr::Literal { .. } => {}
        Expr::Identifier(_) => {}
        Expr::Binary { op: _, lhs, rhs } => {
            visitor.visit_expr(lhs);
            visitor.visit_expr(rhs);
        }
        Expr::Unary { op: _, operand } => visitor.visit_expr(operand),
        Expr::Assign { target: _, value } => visitor.visit_expr(value),
        Expr::Call { name: _, args } => {
            for arg in args {
                visitor.visit_expr(arg);
            }
        }
        Expr::Index { name: _, indices } => {
            for index in indices {
                visitor.visit_expr(index);
            }
        }
    }
}
