//! # sheetcfg
//!
//! Spreadsheet table compiler for game configuration data, written in Rust.
//!
//! ## Features
//!
//! - **Typed Columns**: scalar, list, list-of-list and map column types
//! - **JSON Data**: one document per workbook, one row object per line
//! - **C# Accessors**: data classes, a lazily created singleton and ID lookups
//! - **Key Constants**: `GlobalKey` string constants from the reserved table
//! - **Export Filters**: per-column tags select client or server columns
//! - **Precise Errors**: every failure names its table, sheet, field and row
//!
//! ## Usage Examples
//!
//! ### Cell Parsing
//!
//! ```rust
//! use sheetcfg::{encode_cell, resolve_type};
//!
//! let ty = resolve_type("map[string]int").unwrap();
//! assert_eq!(ty.to_string(), "map[string]int32");
//! assert_eq!(encode_cell("hp:10;mp:5", &ty).unwrap(), r#"{"hp":10,"mp":5}"#);
//! ```
//!
//! ### Compiling a Table
//!
//! ```rust
//! use sheetcfg::{compile_table, CSharpOptions, Sheet};
//!
//! let rows: Vec<Vec<String>> = [
//!     vec!["c", "c"],
//!     vec!["ID", "Name"],
//!     vec!["int", "string"],
//!     vec!["Key", "Label"],
//!     vec!["1", "Sword"],
//! ]
//! .iter()
//! .map(|r| r.iter().map(|c| c.to_string()).collect())
//! .collect();
//!
//! let sheet = Sheet::from_rows("Item", &rows, "c").unwrap();
//! let table = sheetcfg::Table::new("Item", vec![sheet]).unwrap();
//! let (json, code) = compile_table(&table, &CSharpOptions::default()).unwrap();
//! assert!(json.contains(r#"{"ID":1,"Name":"Sword"}"#));
//! assert!(code.contains("public ItemInfo GetItemByID(int id)"));
//! ```

/// Core compiler modules
pub mod core;

/// Data layer - static tables and constants
pub mod data;

/// Build pipeline
pub mod pipeline;

/// Utility modules
pub mod utils;

// Re-export core types and functions
pub use crate::core::csharp::{emit_classes, emit_constants, emit_source, AssetLoader, CSharpOptions};
pub use crate::core::json::{sheet_to_json, table_to_json};
pub use crate::core::schema::{Field, Row, Sheet, Table};
pub use crate::core::types::{Primitive, Shape, TypeDescriptor, TypeError};
pub use crate::core::value::{encode_cell, parse_cell, ValueError};

// Re-export pipeline
pub use pipeline::{load_table, BuildReport, Pipeline, TableReport};

// Re-export data modules
pub use data::constants;

// Re-export utilities
pub use utils::config::Config;
pub use utils::error::{ErrorKind, Location, SheetError, SheetResult};
pub use utils::files::{ArtifactKind, DirectorySink, MemorySink, OutputSink};
pub use utils::workbook::{MemoryWorkbookSource, RawSheet, WorkbookSource};

#[cfg(feature = "xlsx")]
pub use utils::workbook::XlsxWorkbookSource;

/// Resolve a column type string
///
/// # Arguments
/// * `input` - Type string as written in the header row, e.g. `[]int`
///
/// # Returns
/// The canonical descriptor, or the reason the string is not a type
pub fn resolve_type(input: &str) -> Result<TypeDescriptor, TypeError> {
    TypeDescriptor::resolve(input)
}

/// Compile a table to its JSON document and C# source
pub fn compile_table(table: &Table, options: &CSharpOptions) -> SheetResult<(String, String)> {
    let json = table_to_json(table)?;
    let code = emit_source(table, options)?;
    Ok((json, code))
}

/// Build every workbook under `config.excel_dir` into the configured output
/// directories
#[cfg(feature = "xlsx")]
pub fn build(config: &Config) -> SheetResult<BuildReport> {
    let source = XlsxWorkbookSource::new(&config.excel_dir);
    let sink = DirectorySink::new(&config.json_dir, &config.code_dir);
    Pipeline::new(config.clone()).run(&source, &sink)
}

/// Run a full build without writing anything
#[cfg(feature = "xlsx")]
pub fn check(config: &Config) -> SheetResult<BuildReport> {
    let source = XlsxWorkbookSource::new(&config.excel_dir);
    Pipeline::new(config.clone()).run(&source, &MemorySink::new())
}
