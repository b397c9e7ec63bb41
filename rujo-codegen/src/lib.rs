//! Lowers a checked AST into a single C translation unit.

pub mod codegen;
pub mod ctype;

pub use codegen::{generate, Codegen};

/// Print and `typeOf` dispatch helpers emitted at the top of every generated file.
pub const PREAMBLE: &str = include_str!("preamble.h");
