//! Utility modules
//!
//! This module contains utilities and helpers:
//! - Error types and result types
//! - Build configuration
//! - Workbook sources (input) and artifact sinks (output)

pub mod config;
pub mod error;
pub mod files;
pub mod workbook;

// Re-export commonly used items
pub use config::{Config, CONFIG_FILE};
pub use error::{ErrorKind, Location, SheetError, SheetResult};
pub use files::{Artifact, ArtifactKind, DirectorySink, MemorySink, OutputSink};
pub use workbook::{is_ignored_sheet, MemoryWorkbookSource, RawSheet, WorkbookSource};

#[cfg(feature = "xlsx")]
pub use workbook::XlsxWorkbookSource;
