//! Data layer - Static conventions and token tables
//!
//! This module contains all static data shared by loading and generation:
//! - Sheet layout and cell delimiters
//! - Reserved table and key names
//! - Primitive type tokens and C# keywords

pub mod constants;
pub mod keywords;

// Re-export commonly used items
pub use constants::{
    column_label, GLOBAL_TABLE, GROUP_DELIMITER, HEADER_ROWS, ID_FIELD, IDENTIFIER,
    KEY_VALUE_DELIMITER, LIST_DELIMITER, PAIR_DELIMITER,
};
pub use keywords::{canonical_primitive, is_csharp_keyword, CSHARP_KEYWORDS, PRIMITIVE_TOKENS};
