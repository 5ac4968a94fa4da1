//! Lexer, parser and syntax tree for the Brisk language.

pub mod ast;
pub mod dump;
pub mod lexer;
pub mod mermaid;
pub mod parser;
pub mod printer;
pub mod visitor;
