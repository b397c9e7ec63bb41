//! Compiler driver: runs the pipeline from source text to C, and from C to a native executable.

pub mod builder;
pub mod config;
pub mod loader;

pub use builder::{BuildError, CcBuilder, NativeBuilder};
pub use config::Config;
pub use loader::{FsLoader, SourceLoader};

use rujo_parser::ast::Program;
use rujo_parser::parser::{ParseError, Parser};
use rujo_source::{DiagnosticKind, Source};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompileError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("aborting due to {count} syntax error(s)")]
    Syntax { count: usize },
    #[error("aborting due to {count} semantic error(s)")]
    Semantic { count: usize },
}

/// Parses `source`. A fatal parse error is also recorded in `source.errors`, and recovered
/// syntax errors make the parse fail as a whole.
pub fn parse(source: &Source) -> Result<Program, CompileError> {
    let program = match Parser::new(source).parse_program() {
        Ok(program) => program,
        Err(err) => {
            source.errors.add_error(err.to_diagnostic());
            return Err(err.into());
        }
    };

    let count = source.errors.count(DiagnosticKind::Syntax);
    if count > 0 {
        return Err(CompileError::Syntax { count });
    }
    Ok(program)
}

/// Runs semantic analysis over `program`.
pub fn check(program: &Program, source: &Source) -> Result<(), CompileError> {
    let analysis = rujo_passes::resolve::analyze(program, source);
    if analysis.is_success() {
        Ok(())
    } else {
        Err(CompileError::Semantic {
            count: analysis.error_count,
        })
    }
}

/// Compiles `source` into a C translation unit. Diagnostics are left in `source.errors`.
pub fn compile(source: &Source) -> Result<String, CompileError> {
    let program = parse(source)?;
    check(&program, source)?;
    Ok(rujo_codegen::generate(&program))
}
