//! Error handling for sheetcfg
//!
//! This module provides a unified error type and result type for loading,
//! validating and emitting tables. Every error is fatal to the run; the
//! attached [`Location`] names the table, sheet, field and row responsible so
//! the offending spreadsheet cell can be found.

use std::fmt;
use thiserror::Error;

use crate::core::types::TypeError;
use crate::core::value::ValueError;

/// Where in the source workbooks an error was raised
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    pub table: Option<String>,
    pub sheet: Option<String>,
    pub field: Option<String>,
    /// Spreadsheet row number (1-indexed, as shown by spreadsheet editors)
    pub row: Option<usize>,
}

impl Location {
    pub fn is_empty(&self) -> bool {
        self.table.is_none() && self.sheet.is_none() && self.field.is_none() && self.row.is_none()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::with_capacity(4);
        if let Some(ref table) = self.table {
            parts.push(format!("table {}", table));
        }
        if let Some(ref sheet) = self.sheet {
            parts.push(format!("sheet {}", sheet));
        }
        if let Some(ref field) = self.field {
            parts.push(format!("field {}", field));
        }
        if let Some(row) = self.row {
            parts.push(format!("row {}", row));
        }
        write!(f, "{}", parts.join(", "))
    }
}

/// Error kinds
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    /// Type string could not be resolved
    #[error("invalid type: {0}")]
    InvalidType(TypeError),
    /// Cell text is incompatible with the declared type
    #[error("cannot read {text:?} as {expected}")]
    ValueFormat { expected: String, text: String },
    /// Repeated primary key in a keyed sheet, or repeated map key in one cell
    #[error("duplicate key {key}")]
    DuplicateKey { key: String },
    /// Key column left blank in a sheet that requires unique keys
    #[error("key cell is empty")]
    EmptyKey,
    /// Declared type conflicts with a naming convention
    #[error("type mismatch: {message}")]
    TypeMismatch { message: String },
    /// Exported column without a field name or type
    #[error("{what} is empty in exported column {column}")]
    EmptyField { what: &'static str, column: String },
    /// Sheet too short to hold the header rows
    #[error("sheet has {rows} row(s) but {required} header rows are required")]
    MalformedSheet { rows: usize, required: usize },
    /// Table shape violates the constraints of its generator
    #[error("schema error: {0}")]
    Schema(String),
    /// Name can not be used as a generated identifier
    #[error("invalid name {name:?}: {reason}")]
    InvalidName { name: String, reason: &'static str },
    /// Configuration file or flags are unusable
    #[error("config error: {0}")]
    Config(String),
    /// Reading or writing a file failed
    #[error("io error on {path}: {message}")]
    Io { path: String, message: String },
    /// Workbook could not be opened or decoded
    #[error("workbook error: {0}")]
    Workbook(String),
}

/// Error raised while compiling tables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetError {
    pub kind: ErrorKind,
    pub location: Location,
}

impl fmt::Display for SheetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.location.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{}: {}", self.location, self.kind)
        }
    }
}

impl std::error::Error for SheetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}

impl From<ErrorKind> for SheetError {
    fn from(kind: ErrorKind) -> Self {
        SheetError {
            kind,
            location: Location::default(),
        }
    }
}

impl From<TypeError> for SheetError {
    fn from(err: TypeError) -> Self {
        ErrorKind::InvalidType(err).into()
    }
}

impl From<ValueError> for SheetError {
    fn from(err: ValueError) -> Self {
        match err {
            ValueError::Format { expected, text } => ErrorKind::ValueFormat {
                expected: expected.to_string(),
                text,
            },
            ValueError::DuplicateKey { key } => ErrorKind::DuplicateKey { key },
        }
        .into()
    }
}

/// Result type for sheetcfg operations
pub type SheetResult<T> = Result<T, SheetError>;

// Location builders, applied as an error propagates outward.
// Inner context wins: a location already set is never overwritten.
impl SheetError {
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.location.table.get_or_insert_with(|| table.into());
        self
    }

    pub fn with_sheet(mut self, sheet: impl Into<String>) -> Self {
        self.location.sheet.get_or_insert_with(|| sheet.into());
        self
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.location.field.get_or_insert_with(|| field.into());
        self
    }

    pub fn with_row(mut self, row: usize) -> Self {
        self.location.row.get_or_insert(row);
        self
    }
}

// Convenience constructors for errors
impl SheetError {
    pub fn duplicate_key(key: impl Into<String>) -> Self {
        ErrorKind::DuplicateKey { key: key.into() }.into()
    }

    pub fn empty_key() -> Self {
        ErrorKind::EmptyKey.into()
    }

    pub fn type_mismatch(message: impl Into<String>) -> Self {
        ErrorKind::TypeMismatch {
            message: message.into(),
        }
        .into()
    }

    pub fn empty_field(what: &'static str, column: impl Into<String>) -> Self {
        ErrorKind::EmptyField {
            what,
            column: column.into(),
        }
        .into()
    }

    pub fn malformed_sheet(rows: usize, required: usize) -> Self {
        ErrorKind::MalformedSheet { rows, required }.into()
    }

    pub fn schema(message: impl Into<String>) -> Self {
        ErrorKind::Schema(message.into()).into()
    }

    pub fn invalid_name(name: impl Into<String>, reason: &'static str) -> Self {
        ErrorKind::InvalidName {
            name: name.into(),
            reason,
        }
        .into()
    }

    pub fn config(message: impl Into<String>) -> Self {
        ErrorKind::Config(message.into()).into()
    }

    pub fn io(path: impl fmt::Display, err: std::io::Error) -> Self {
        ErrorKind::Io {
            path: path.to_string(),
            message: err.to_string(),
        }
        .into()
    }

    pub fn workbook(message: impl Into<String>) -> Self {
        ErrorKind::Workbook(message.into()).into()
    }
}
