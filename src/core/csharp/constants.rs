//! Key constants generator for the reserved table

use fxhash::FxHashSet;
use std::fmt::Write;

use super::{string_literal, CSharpOptions, INDENT};
use crate::core::schema::{validate_identifier, Table};
use crate::core::types::Primitive;
use crate::data::constants::GLOBAL_KEY_CLASS;
use crate::utils::error::{SheetError, SheetResult};

/// Emit `GlobalKey`: one string constant per row of the reserved table,
/// named after and valued with the row's key cell.
///
/// The table must be the reserved one, hold exactly one sheet, and declare a
/// `string` first column.
pub fn emit_constants(table: &Table, options: &CSharpOptions) -> SheetResult<String> {
    let in_table = |e: SheetError| e.with_table(table.name());

    if !table.is_reserved() {
        return Err(in_table(SheetError::schema(
            "key constants are only generated for the reserved table",
        )));
    }
    let sheet = match table.sheets() {
        [sheet] => sheet,
        sheets => {
            return Err(in_table(SheetError::schema(format!(
                "reserved table must hold exactly one sheet, found {}",
                sheets.len()
            ))))
        }
    };
    let key = sheet.key_field().ok_or_else(|| {
        in_table(SheetError::schema("reserved sheet exports no key column").with_sheet(sheet.name()))
    })?;
    if !key.ty.is_scalar_of(Primitive::String) {
        return Err(in_table(
            SheetError::schema(format!("key column must be string, found {}", key.ty))
                .with_field(key.name.as_str())
                .with_sheet(sheet.name()),
        ));
    }

    let i1 = INDENT;
    let i2 = INDENT.repeat(2);
    let mut seen: FxHashSet<&str> = FxHashSet::default();

    let mut output = String::new();
    let _ = writeln!(output, "namespace {}", options.namespace);
    output.push_str("{\n");
    let _ = writeln!(output, "{}public static class {}", i1, GLOBAL_KEY_CLASS);
    let _ = writeln!(output, "{}{{", i1);

    for row in sheet.rows() {
        let at_cell = |e: SheetError| {
            in_table(
                e.with_field(key.name.as_str())
                    .with_row(row.number)
                    .with_sheet(sheet.name()),
            )
        };
        let name = row.cells[0].trim();
        if name.is_empty() {
            return Err(at_cell(SheetError::empty_key()));
        }
        validate_identifier(name).map_err(at_cell)?;
        if name == GLOBAL_KEY_CLASS {
            return Err(at_cell(SheetError::invalid_name(
                name,
                "collides with the constants class name",
            )));
        }
        if !seen.insert(name) {
            return Err(at_cell(SheetError::duplicate_key(name)));
        }
        let _ = writeln!(
            output,
            "{}public const string {} = {};",
            i2,
            name,
            string_literal(name)
        );
    }

    let _ = writeln!(output, "{}}}", i1);
    output.push_str("}\n");
    Ok(output)
}
