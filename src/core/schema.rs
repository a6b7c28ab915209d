//! Schema model
//!
//! In-memory form of one loaded workbook. A [`Table`] owns its [`Sheet`]s in
//! workbook order; each sheet owns its exported fields and data rows. The
//! model is built once from loader rows and is read-only afterwards.
//!
//! A sheet arrives as a grid of text cells whose first four rows are headers:
//!
//! ```text
//! row 0   export filter   c       cs      s
//! row 1   field name      ID      Name    ServerOnly
//! row 2   type            int     string  bool
//! row 3   description     Key     Label   ...
//! row 4+  data            1       Sword   true
//! ```

use indexmap::IndexSet;
use tracing::debug;

use super::types::{Primitive, TypeDescriptor};
use crate::data::constants::{
    column_label, DESC_ROW, EXPORT_ROW, GLOBAL_TABLE, HEADER_ROWS, IDENTIFIER, ID_FIELD, NAME_ROW,
    TYPE_ROW,
};
use crate::data::keywords::is_csharp_keyword;
use crate::utils::error::{SheetError, SheetResult};

/// One exported column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub ty: TypeDescriptor,
    /// Documentation text, empty when the header cell is blank
    pub description: String,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: TypeDescriptor, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty,
            description: description.into(),
        }
    }
}

/// One data row, pruned to the exported columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// Spreadsheet row number (1-indexed)
    pub number: usize,
    /// Cell text, one per field
    pub cells: Vec<String>,
}

/// One worksheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sheet {
    name: String,
    fields: Vec<Field>,
    rows: Vec<Row>,
}

impl Sheet {
    /// Build a sheet from already-resolved fields and data rows.
    ///
    /// Rows shorter than the field list are right-padded with empty cells;
    /// longer rows are rejected.
    pub fn new(name: impl Into<String>, fields: Vec<Field>, rows: Vec<Row>) -> SheetResult<Self> {
        let name = name.into();
        validate_identifier(&name).map_err(|e| e.with_sheet(name.clone()))?;

        let mut seen = IndexSet::with_capacity(fields.len());
        for field in &fields {
            validate_identifier(&field.name)
                .map_err(|e| e.with_field(field.name.clone()).with_sheet(name.clone()))?;
            if !seen.insert(field.name.as_str()) {
                return Err(SheetError::schema(format!(
                    "field name {} is declared twice",
                    field.name
                ))
                .with_sheet(name));
            }
        }

        let width = fields.len();
        let mut padded = Vec::with_capacity(rows.len());
        for mut row in rows {
            if row.cells.len() > width {
                return Err(SheetError::schema(format!(
                    "row has {} cells but the sheet exports {} fields",
                    row.cells.len(),
                    width
                ))
                .with_row(row.number)
                .with_sheet(name));
            }
            row.cells.resize(width, String::new());
            padded.push(row);
        }

        Ok(Sheet {
            name,
            fields,
            rows: padded,
        })
    }

    /// Interpret a raw sheet grid: header rows, export filter, then data.
    ///
    /// Column `i` is exported when its export-filter cell contains
    /// `export_tag`. Data rows with only blank exported cells are dropped.
    pub fn from_rows(
        name: impl Into<String>,
        rows: &[Vec<String>],
        export_tag: &str,
    ) -> SheetResult<Self> {
        let name = name.into();
        if rows.len() < HEADER_ROWS {
            return Err(SheetError::malformed_sheet(rows.len(), HEADER_ROWS).with_sheet(name));
        }

        let exported: Vec<usize> = rows[EXPORT_ROW]
            .iter()
            .enumerate()
            .filter(|(_, tag)| tag.contains(export_tag))
            .map(|(i, _)| i)
            .collect();

        let mut fields = Vec::with_capacity(exported.len());
        for &col in &exported {
            let field_name = header_cell(rows, NAME_ROW, col).trim();
            if field_name.is_empty() {
                return Err(SheetError::empty_field("field name", column_label(col))
                    .with_sheet(name));
            }
            let type_str = header_cell(rows, TYPE_ROW, col);
            if type_str.trim().is_empty() {
                return Err(SheetError::empty_field("type", column_label(col))
                    .with_field(field_name)
                    .with_sheet(name));
            }
            let ty = TypeDescriptor::resolve(type_str)
                .map_err(|e| SheetError::from(e).with_field(field_name).with_sheet(name.clone()))?;
            let description = header_cell(rows, DESC_ROW, col);
            fields.push(Field::new(field_name, ty, description));
        }

        let data = rows
            .iter()
            .enumerate()
            .skip(HEADER_ROWS)
            .map(|(r, row)| Row {
                number: r + 1,
                cells: exported
                    .iter()
                    .map(|&col| row.get(col).cloned().unwrap_or_default())
                    .collect(),
            })
            .filter(|row| row.cells.iter().any(|c| !c.trim().is_empty()))
            .collect::<Vec<_>>();

        debug!(
            sheet = %name,
            fields = fields.len(),
            rows = data.len(),
            "loaded sheet"
        );
        Sheet::new(name, fields, data)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of exported fields
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// First field, if any
    pub fn key_field(&self) -> Option<&Field> {
        self.fields.first()
    }

    /// The first field is named `ID`, whatever its type
    pub fn declares_id(&self) -> bool {
        self.key_field().is_some_and(|f| f.name == ID_FIELD)
    }

    /// The first field is `ID: int32`, enabling ID-indexed lookup
    pub fn is_keyed(&self) -> bool {
        self.key_field()
            .is_some_and(|f| f.name == ID_FIELD && f.ty.is_scalar_of(Primitive::Int32))
    }
}

/// One workbook
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    name: String,
    sheets: Vec<Sheet>,
}

impl Table {
    pub fn new(name: impl Into<String>, sheets: Vec<Sheet>) -> SheetResult<Self> {
        let name = name.into();
        validate_identifier(&name).map_err(|e| e.with_table(name.clone()))?;

        let mut seen = IndexSet::with_capacity(sheets.len());
        for sheet in &sheets {
            if !seen.insert(sheet.name()) {
                return Err(SheetError::schema(format!(
                    "sheet name {} appears twice",
                    sheet.name()
                ))
                .with_table(name));
            }
        }
        Ok(Table { name, sheets })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    /// Sheets with at least one exported field, in workbook order
    pub fn exported_sheets(&self) -> impl Iterator<Item = &Sheet> {
        self.sheets.iter().filter(|s| !s.is_empty())
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name() == name)
    }

    /// The reserved table that emits key constants
    pub fn is_reserved(&self) -> bool {
        self.name == GLOBAL_TABLE
    }
}

/// Check that a name can become a generated C# identifier
pub fn validate_identifier(name: &str) -> SheetResult<()> {
    if !IDENTIFIER.is_match(name) {
        return Err(SheetError::invalid_name(
            name,
            "expected letters, digits and underscores, not starting with a digit",
        ));
    }
    if is_csharp_keyword(name) {
        return Err(SheetError::invalid_name(name, "reserved C# keyword"));
    }
    Ok(())
}

fn header_cell(rows: &[Vec<String>], row: usize, col: usize) -> &str {
    rows[row].get(col).map(String::as_str).unwrap_or("")
}
