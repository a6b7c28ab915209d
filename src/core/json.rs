//! JSON data emitter
//!
//! Serializes a [`Table`] into one document keyed by sheet name, one array of
//! row objects per sheet. Layout is fixed (one row per line, fields in
//! declared order) so regenerated files diff cleanly.
//!
//! ```text
//! {
//!     "Item":[
//!         {"ID":1,"Name":"Sword"},
//!         {"ID":2,"Name":"Shield"}
//!     ]
//! }
//! ```

use fxhash::FxHashSet;
use serde_json::{Map, Value};
use std::fmt::Write;

use super::schema::{Sheet, Table};
use super::value::parse_cell;
use crate::data::constants::ID_FIELD;
use crate::utils::error::{SheetError, SheetResult};

const SHEET_INDENT: &str = "    ";
const ROW_INDENT: &str = "        ";

/// Emit the data document for a table.
///
/// Fails on the first bad cell or repeated key; no partial document is
/// returned.
pub fn table_to_json(table: &Table) -> SheetResult<String> {
    let reserved = table.is_reserved();
    let mut output = String::from("{");
    let mut first = true;

    for sheet in table.exported_sheets() {
        let body = sheet_to_json(sheet, reserved).map_err(|e| e.with_table(table.name()))?;
        if !first {
            output.push(',');
        }
        first = false;
        output.push('\n');
        output.push_str(&body);
    }

    output.push_str("\n}");
    Ok(output)
}

/// Emit one sheet as `"Name":[ ... ]`
///
/// `unique_first_column` forces key checks on the first column even when the
/// sheet is not keyed (the reserved table).
pub fn sheet_to_json(sheet: &Sheet, unique_first_column: bool) -> SheetResult<String> {
    let in_sheet = |e: SheetError| e.with_sheet(sheet.name());

    if sheet.declares_id() && !sheet.is_keyed() {
        let key = sheet.fields()[0].ty;
        return Err(in_sheet(
            SheetError::type_mismatch(format!(
                "{} must be declared as int32, found {}",
                ID_FIELD, key
            ))
            .with_field(ID_FIELD),
        ));
    }
    let check_keys = unique_first_column || sheet.is_keyed();
    let mut seen_keys: FxHashSet<String> = FxHashSet::default();

    let mut output = String::new();
    let _ = write!(output, "{}{}:[", SHEET_INDENT, Value::from(sheet.name()));

    for (i, row) in sheet.rows().iter().enumerate() {
        let mut object = Map::with_capacity(sheet.field_count());
        for (j, (field, cell)) in sheet.fields().iter().zip(&row.cells).enumerate() {
            let at_cell =
                |e: SheetError| in_sheet(e.with_field(field.name.as_str()).with_row(row.number));
            let value = parse_cell(cell, &field.ty).map_err(|e| at_cell(e.into()))?;

            if j == 0 && check_keys {
                if cell.trim().is_empty() {
                    return Err(at_cell(SheetError::empty_key()));
                }
                if !seen_keys.insert(value.to_string()) {
                    return Err(at_cell(SheetError::duplicate_key(cell.trim())));
                }
            }
            object.insert(field.name.clone(), value);
        }

        if i != 0 {
            output.push(',');
        }
        output.push('\n');
        output.push_str(ROW_INDENT);
        output.push_str(&Value::Object(object).to_string());
    }

    let _ = write!(output, "\n{}]", SHEET_INDENT);
    Ok(output)
}
