//! Passes over the AST that run between parsing and code generation.

pub mod builtins;
pub mod resolve;
pub mod scope;
