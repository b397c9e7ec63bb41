/// A function provided by the generated preamble rather than declared in source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Builtin {
    pub name: &'static str,
    pub return_ty: &'static str,
}

/// The polymorphic print primitive. Lowered to the `RUJO_PRINT` dispatch macro.
pub const PRINT: Builtin = Builtin {
    name: "print",
    return_ty: "void",
};

/// Every built-in function. These are defined in the root scope of every program.
pub const BUILTIN_FUNCTIONS: &[Builtin] = &[PRINT];

/// Type names that are always defined. Every other type name must name a top-level class.
pub const PRIMITIVE_TYPES: &[&str] = &["int", "float", "bool", "byte", "char", "string", "void"];
