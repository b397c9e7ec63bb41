//! Lexer, AST and recursive descent parser for rujo source files.

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod printer;
pub mod visitor;
