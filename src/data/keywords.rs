//! Token tables for the type grammar and the C# target
//!
//! Static perfect-hash tables, looked up once per header cell while a sheet
//! is loaded and once per field while code is generated.

use phf::{phf_map, phf_set};

/// Primitive type tokens accepted in the type row, mapped to their canonical name.
/// Legacy aliases fold onto the sized canonical primitive here and nowhere else.
pub static PRIMITIVE_TOKENS: phf::Map<&'static str, &'static str> = phf_map! {
    "int32" => "int32",
    "int64" => "int64",
    "float32" => "float32",
    "float64" => "float64",
    "string" => "string",
    "bool" => "bool",

    // Legacy aliases
    "int" => "int32",
    "float" => "float32",
};

/// C# reserved keywords, which can not be used as generated member names
pub static CSHARP_KEYWORDS: phf::Set<&'static str> = phf_set! {
    "abstract", "as", "base", "bool", "break", "byte", "case", "catch",
    "char", "checked", "class", "const", "continue", "decimal", "default",
    "delegate", "do", "double", "else", "enum", "event", "explicit",
    "extern", "false", "finally", "fixed", "float", "for", "foreach",
    "goto", "if", "implicit", "in", "int", "interface", "internal", "is",
    "lock", "long", "namespace", "new", "null", "object", "operator",
    "out", "override", "params", "private", "protected", "public",
    "readonly", "ref", "return", "sbyte", "sealed", "short", "sizeof",
    "stackalloc", "static", "string", "struct", "switch", "this", "throw",
    "true", "try", "typeof", "uint", "ulong", "unchecked", "unsafe",
    "ushort", "using", "virtual", "void", "volatile", "while",
};

/// Canonical name for a primitive token, folding legacy aliases
#[inline]
pub fn canonical_primitive(token: &str) -> Option<&'static str> {
    PRIMITIVE_TOKENS.get(token).copied()
}

/// Check if a name collides with a C# keyword
#[inline]
pub fn is_csharp_keyword(name: &str) -> bool {
    CSHARP_KEYWORDS.contains(name)
}
