//! Workbook sources
//!
//! A [`WorkbookSource`] lists the tables available to a build and returns
//! each table's sheets as grids of cell text. Header interpretation happens
//! later in [`Sheet::from_rows`](crate::core::schema::Sheet::from_rows), so
//! sources only deal with files and cells.
//!
//! Implementations:
//! - `XlsxWorkbookSource`: one `.xlsx` file per table in a directory
//! - `MemoryWorkbookSource`: in-memory grids (testing, embedding)

use indexmap::IndexMap;

use super::error::{SheetError, SheetResult};
use crate::data::constants::DEFAULT_SHEET_PREFIX;

#[cfg(feature = "xlsx")]
use std::path::{Path, PathBuf};
#[cfg(feature = "xlsx")]
use tracing::{debug, warn};

#[cfg(feature = "xlsx")]
use crate::data::constants::{LOCK_FILE_PREFIX, WORKBOOK_EXTENSION};

/// One worksheet as read from a workbook
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawSheet {
    pub name: String,
    /// Cell text by absolute position; row 0 is spreadsheet row 1
    pub rows: Vec<Vec<String>>,
}

impl RawSheet {
    pub fn new(name: impl Into<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }
}

/// Trait for reading tables
pub trait WorkbookSource {
    /// Names of the available tables, sorted
    fn table_names(&self) -> SheetResult<Vec<String>>;

    /// Sheets of one table in workbook order, default and non-ASCII sheets
    /// excluded
    fn read_table(&self, name: &str) -> SheetResult<Vec<RawSheet>>;
}

/// Sheets that hold no table data: untouched default sheets and names that
/// can not become identifiers
pub fn is_ignored_sheet(name: &str) -> bool {
    name.starts_with(DEFAULT_SHEET_PREFIX) || !name.is_ascii()
}

/// In-memory workbook storage
#[derive(Debug, Clone, Default)]
pub struct MemoryWorkbookSource {
    tables: IndexMap<String, Vec<RawSheet>>,
}

impl MemoryWorkbookSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a table
    pub fn add_table(&mut self, name: impl Into<String>, sheets: Vec<RawSheet>) {
        self.tables.insert(name.into(), sheets);
    }

    /// Builder form of [`add_table`](Self::add_table)
    pub fn with_table(mut self, name: impl Into<String>, sheets: Vec<RawSheet>) -> Self {
        self.add_table(name, sheets);
        self
    }
}

impl WorkbookSource for MemoryWorkbookSource {
    fn table_names(&self) -> SheetResult<Vec<String>> {
        let mut names: Vec<String> = self.tables.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    fn read_table(&self, name: &str) -> SheetResult<Vec<RawSheet>> {
        let sheets = self
            .tables
            .get(name)
            .ok_or_else(|| SheetError::workbook("no such table").with_table(name))?;
        Ok(sheets
            .iter()
            .filter(|s| !is_ignored_sheet(&s.name))
            .cloned()
            .collect())
    }
}

/// Directory of `.xlsx` workbooks, one table per file
#[cfg(feature = "xlsx")]
#[derive(Debug, Clone)]
pub struct XlsxWorkbookSource {
    dir: PathBuf,
}

#[cfg(feature = "xlsx")]
impl XlsxWorkbookSource {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of a table's workbook
    pub fn path_of(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", name, WORKBOOK_EXTENSION))
    }
}

/// Table name for a workbook file name, `None` for files that are not
/// workbooks (lock files, other extensions, dotted names)
#[cfg(feature = "xlsx")]
pub fn table_name_of(file_name: &str) -> Option<&str> {
    if file_name.starts_with(LOCK_FILE_PREFIX) {
        return None;
    }
    let (stem, ext) = file_name.split_once('.')?;
    if ext != WORKBOOK_EXTENSION || stem.is_empty() {
        return None;
    }
    Some(stem)
}

#[cfg(feature = "xlsx")]
impl WorkbookSource for XlsxWorkbookSource {
    fn table_names(&self) -> SheetResult<Vec<String>> {
        let entries = std::fs::read_dir(&self.dir).map_err(|e| SheetError::io(self.dir.display(), e))?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| SheetError::io(self.dir.display(), e))?;
            let is_file = entry
                .file_type()
                .map_err(|e| SheetError::io(entry.path().display(), e))?
                .is_file();
            if !is_file {
                continue;
            }
            let file_name = entry.file_name();
            let Some(file_name) = file_name.to_str() else {
                warn!(file = %entry.path().display(), "skipping workbook with non-UTF-8 name");
                continue;
            };
            let Some(stem) = table_name_of(file_name) else {
                debug!(file = file_name, "not a workbook");
                continue;
            };
            if !stem.is_ascii() {
                warn!(file = file_name, "skipping workbook with non-ASCII name");
                continue;
            }
            names.push(stem.to_string());
        }
        names.sort();
        Ok(names)
    }

    fn read_table(&self, name: &str) -> SheetResult<Vec<RawSheet>> {
        use calamine::{open_workbook, Reader, Xlsx};

        let path = self.path_of(name);
        let mut workbook: Xlsx<_> = open_workbook(&path).map_err(|e| {
            SheetError::workbook(format!("{}: {}", path.display(), e)).with_table(name)
        })?;

        let mut sheets = Vec::new();
        for sheet_name in workbook.sheet_names() {
            if is_ignored_sheet(&sheet_name) {
                if !sheet_name.is_ascii() {
                    warn!(table = name, sheet = %sheet_name, "skipping sheet with non-ASCII name");
                }
                continue;
            }
            let range = workbook.worksheet_range(&sheet_name).map_err(|e| {
                SheetError::workbook(e.to_string())
                    .with_sheet(sheet_name.clone())
                    .with_table(name)
            })?;
            sheets.push(RawSheet::new(sheet_name, grid_of(&range)));
        }
        Ok(sheets)
    }
}

/// Cell text of a range, padded so that indexes are absolute positions
#[cfg(feature = "xlsx")]
fn grid_of(range: &calamine::Range<calamine::Data>) -> Vec<Vec<String>> {
    let Some((top, left)) = range.start() else {
        return Vec::new();
    };
    let mut rows = vec![Vec::new(); top as usize];
    for row in range.rows() {
        let mut cells = vec![String::new(); left as usize];
        cells.extend(row.iter().map(cell_text));
        while cells.last().is_some_and(|c| c.is_empty()) {
            cells.pop();
        }
        rows.push(cells);
    }
    rows
}

/// Display text of a cell; numbers use the shortest form (`3` for 3.0)
#[cfg(feature = "xlsx")]
fn cell_text(cell: &calamine::Data) -> String {
    use calamine::Data;

    match cell {
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTimeIso(dt) => dt.clone(),
        Data::DurationIso(d) => d.clone(),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}
