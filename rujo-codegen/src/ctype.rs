//! Mapping from surface types to C types.

/// Returns the C spelling of a surface type. Class names map to their struct typedef.
pub fn c_type(ty: &str) -> &str {
    match ty {
        "int" => "int",
        "float" => "float",
        "bool" => "bool",
        "byte" => "uint8_t",
        "char" => "uint32_t",
        "string" => "const char*",
        "void" => "void",
        class => class,
    }
}
