//! Core compiler modules
//!
//! This module contains the table compilation stages:
//! - `types`: column type strings and their resolution
//! - `value`: cell text to JSON values
//! - `schema`: sheets, fields and tables as loaded from a workbook
//! - `json`: per-table data documents
//! - `csharp`: data classes, accessors and key constants

pub mod csharp;
pub mod json;
pub mod schema;
pub mod types;
pub mod value;

// Re-export main types and functions
pub use csharp::{emit_classes, emit_constants, emit_source, AssetLoader, CSharpOptions};
pub use json::{sheet_to_json, table_to_json};
pub use schema::{validate_identifier, Field, Row, Sheet, Table};
pub use types::{fix_type, Primitive, Shape, TypeDescriptor, TypeError};
pub use value::{encode_cell, parse_cell, parse_scalar, ValueError};
