//! Source code representation and diagnostic management.

use std::{cell::RefCell, fmt};

/// Represents source code.
pub struct Source<'a> {
    /// Original source code.
    pub content: &'a str,
    /// Accumulated diagnostics.
    pub errors: ErrorReporter,
}

impl<'a> Source<'a> {
    /// Create a new `Source` with the specified `content`.
    pub fn new(content: &'a str) -> Self {
        Self {
            content,
            errors: ErrorReporter::new(),
        }
    }

    /// Returns `true` if `Source` has no accumulated errors. Returns `false` otherwise.
    pub fn has_no_errors(&self) -> bool {
        self.errors.is_empty()
    }
}

impl<'a> From<&'a str> for Source<'a> {
    fn from(content: &'a str) -> Self {
        Source::new(content)
    }
}

/// The compilation stage that produced a [`Diagnostic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// Unrecognized character in the input.
    Lexical,
    Syntax,
    Semantic,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DiagnosticKind::Lexical => "lexical",
            DiagnosticKind::Syntax => "syntax",
            DiagnosticKind::Semantic => "semantic",
        })
    }
}

/// A 1-based line and column inside the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Represents a compile time error.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    /// Semantic errors are reported by name and carry no position.
    pub position: Option<Position>,
}

impl Diagnostic {
    /// Create a new diagnostic located at `line`:`column`.
    pub fn at(kind: DiagnosticKind, message: impl ToString, line: u32, column: u32) -> Self {
        Self {
            kind,
            message: message.to_string(),
            position: Some(Position { line, column }),
        }
    }

    /// Create a new semantic diagnostic. These are reported with the offending name instead of a position.
    pub fn semantic(message: impl ToString) -> Self {
        Self {
            kind: DiagnosticKind::Semantic,
            message: message.to_string(),
            position: None,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.position {
            Some(position) => write!(
                f,
                "error[{kind}] {position}: {message}",
                kind = self.kind,
                message = self.message
            ),
            None => write!(f, "error[{kind}]: {message}", kind = self.kind, message = self.message),
        }
    }
}

/// Manages all the diagnostics of a compilation run.
pub struct ErrorReporter {
    errors: RefCell<Vec<Diagnostic>>,
}

impl ErrorReporter {
    /// Create an empty `ErrorReporter`.
    pub fn new() -> Self {
        Self {
            errors: RefCell::new(Vec::new()),
        }
    }

    /// Adds an error to the `ErrorReporter`.
    /// This method uses the interior mutability pattern. This does not require mutability for ergonomics.
    pub fn add_error(&self, error: Diagnostic) {
        // This should be the only place where self.errors is borrowed mutably.
        self.errors.borrow_mut().push(error);
    }

    pub fn len(&self) -> usize {
        self.errors.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.borrow().is_empty()
    }

    /// Returns how many accumulated diagnostics are of the given `kind`.
    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.errors.borrow().iter().filter(|error| error.kind == kind).count()
    }

    /// Returns a snapshot of all accumulated diagnostics, in the order they were reported.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.errors.borrow().clone()
    }
}

impl Default for ErrorReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ErrorReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let errors = self.errors.borrow();
        for error in errors.iter() {
            writeln!(f, "{}", error)?;
        }

        Ok(())
    }
}
