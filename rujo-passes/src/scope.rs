//! Lexical scopes.

use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Variable,
    Property,
    Class,
    Function,
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SymbolKind::Variable => "variable",
            SymbolKind::Property => "property",
            SymbolKind::Class => "class",
            SymbolKind::Function => "function",
        })
    }
}

/// Represents a declared name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: String,
    /// The declared type. Functions use their return type and classes use `class`.
    pub type_name: String,
    pub kind: SymbolKind,
}

/// A mapping from names to [`Symbol`]s, linked to the enclosing scope.
///
/// Scopes borrow their parent, so a child can never outlive the region that created it.
#[derive(Debug, Default)]
pub struct Scope<'p> {
    symbols: HashMap<String, Symbol>,
    parent: Option<&'p Scope<'p>>,
}

impl<'p> Scope<'p> {
    pub fn new(parent: Option<&'p Scope<'p>>) -> Self {
        Self {
            symbols: HashMap::new(),
            parent,
        }
    }

    /// Defines `name` in this scope. Returns `false`, leaving the existing symbol untouched,
    /// if `name` is already defined in this scope. Names in parent scopes are shadowed.
    pub fn define(&mut self, name: &str, type_name: &str, kind: SymbolKind) -> bool {
        if self.symbols.contains_key(name) {
            return false;
        }
        self.symbols.insert(
            name.to_string(),
            Symbol {
                name: name.to_string(),
                type_name: type_name.to_string(),
                kind,
            },
        );
        true
    }

    /// Looks `name` up in this scope, then in each parent in turn.
    pub fn resolve(&self, name: &str) -> Option<&Symbol> {
        match self.symbols.get(name) {
            Some(symbol) => Some(symbol),
            None => self.parent.and_then(|parent| parent.resolve(name)),
        }
    }

    /// Looks `name` up in this scope only.
    pub fn resolve_local(&self, name: &str) -> Option<&Symbol> {
        self.symbols.get(name)
    }
}
