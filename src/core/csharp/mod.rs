//! C# source generation
//!
//! Two generators read the same [`Table`](crate::core::schema::Table):
//!
//! - [`emit_classes`]: one `<Sheet>Info` data holder per sheet plus a
//!   `<Table>Cfg` accessor that loads the table's JSON once per process and
//!   serves ID lookups for keyed sheets.
//! - [`emit_constants`]: the `GlobalKey` constants class for the reserved
//!   `Global` table.
//!
//! # Architecture
//!
//! ```text
//! Table -> field type mapping -> class text (classes.rs)
//!       -> key column checks  -> constants text (constants.rs)
//! ```

mod classes;
mod constants;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};

use super::schema::Table;
use super::types::{Primitive, TypeDescriptor};
use crate::data::constants::GLOBAL_KEY_CLASS;
use crate::utils::error::SheetResult;

// Re-export public API
pub use classes::emit_classes;
pub use constants::emit_constants;

/// Source file extension of generated code
pub const SOURCE_EXTENSION: &str = "cs";

pub(crate) const INDENT: &str = "    ";

/// How the generated accessor fetches the JSON text asset at runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetLoader {
    /// `YooAssets.LoadAssetSync<TextAsset>(path)`
    #[default]
    YooAsset,
    /// `Resources.Load<TextAsset>(path)`
    Resources,
}

/// Options for generated C# code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CSharpOptions {
    /// Namespace wrapping every generated type
    pub namespace: String,
    /// Asset path the JSON documents are loaded from (without trailing `/`)
    pub resource_root: String,
    /// Suffix of per-sheet row types (`Item` → `ItemInfo`)
    pub row_suffix: String,
    /// Suffix of the per-table accessor type (`Item` → `ItemCfg`)
    pub accessor_suffix: String,
    /// Runtime asset loading API
    pub loader: AssetLoader,
}

impl Default for CSharpOptions {
    fn default() -> Self {
        Self {
            namespace: "GameData".to_string(),
            resource_root: "Assets/GameRes/Json".to_string(),
            row_suffix: "Info".to_string(),
            accessor_suffix: "Cfg".to_string(),
            loader: AssetLoader::YooAsset,
        }
    }
}

impl CSharpOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options for projects loading tables through `Resources`
    pub fn resources() -> Self {
        Self {
            loader: AssetLoader::Resources,
            resource_root: "Json".to_string(),
            ..Default::default()
        }
    }

    /// Row type name for a sheet
    pub fn row_type(&self, sheet: &str) -> String {
        format!("{}{}", sheet, self.row_suffix)
    }

    /// Accessor type name for a table
    pub fn accessor_type(&self, table: &str) -> String {
        format!("{}{}", table, self.accessor_suffix)
    }

    /// Asset path of a table's JSON document
    pub fn resource_path(&self, table: &str) -> String {
        let root = self.resource_root.trim_end_matches('/');
        if root.is_empty() {
            table.to_string()
        } else {
            format!("{}/{}", root, table)
        }
    }

    /// File name of the generated source for a table
    pub fn file_name(&self, table: &Table) -> String {
        if table.is_reserved() {
            format!("{}.{}", GLOBAL_KEY_CLASS, SOURCE_EXTENSION)
        } else {
            format!("{}.{}", self.accessor_type(table.name()), SOURCE_EXTENSION)
        }
    }

    /// `using` directives required by the generated accessor
    pub(crate) fn usings(&self) -> Vec<&'static str> {
        let mut usings = vec![
            "Newtonsoft.Json",
            "System",
            "System.Collections.Generic",
            "UnityEngine",
        ];
        if self.loader == AssetLoader::YooAsset {
            usings.push("YooAsset");
        }
        usings
    }
}

/// Emit the source for a table: constants for the reserved table, classes
/// otherwise
pub fn emit_source(table: &Table, options: &CSharpOptions) -> SheetResult<String> {
    if table.is_reserved() {
        emit_constants(table, options)
    } else {
        emit_classes(table, options)
    }
}

/// C# spelling of a primitive
pub fn primitive_type(primitive: Primitive) -> &'static str {
    match primitive {
        Primitive::Int32 => "int",
        Primitive::Int64 => "long",
        Primitive::Float32 => "float",
        Primitive::Float64 => "double",
        Primitive::String => "string",
        Primitive::Bool => "bool",
    }
}

/// C# field type for a descriptor
pub fn field_type(ty: &TypeDescriptor) -> String {
    match *ty {
        TypeDescriptor::Scalar(p) => primitive_type(p).to_string(),
        TypeDescriptor::List(p) => format!("List<{}>", primitive_type(p)),
        TypeDescriptor::ListOfList(p) => format!("List<List<{}>>", primitive_type(p)),
        TypeDescriptor::Map { key, value } => format!(
            "Dictionary<{}, {}>",
            primitive_type(key),
            primitive_type(value)
        ),
    }
}

/// Flatten a description onto one line and escape it for an XML doc comment
pub(crate) fn doc_text(description: &str) -> String {
    let flat = description
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    flat.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escape text for a C# regular string literal
pub(crate) fn string_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
