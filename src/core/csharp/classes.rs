//! Data class and accessor generator

use std::fmt::Write;

use super::{doc_text, field_type, string_literal, AssetLoader, CSharpOptions, INDENT};
use crate::core::schema::{Sheet, Table};
use crate::data::constants::ID_FIELD;
use crate::utils::error::{SheetError, SheetResult};

/// Singleton field of the accessor
const INSTANCE_FIELD: &str = "_instance";

/// Public singleton getter of the accessor
const GET_METHOD: &str = "Get";

/// Private loader of the accessor
const CREATE_METHOD: &str = "Create";

/// Lookup cache of a keyed sheet: `_<Sheet>Dict`
fn dict_field(sheet: &str) -> String {
    format!("_{}Dict", sheet)
}

/// Lookup method of a keyed sheet: `Get<Sheet>ByID`
fn lookup_method(sheet: &str) -> String {
    format!("{}{}By{}", GET_METHOD, sheet, ID_FIELD)
}

/// Emit row classes and the `<Table>Cfg` accessor for a table
pub fn emit_classes(table: &Table, options: &CSharpOptions) -> SheetResult<String> {
    if table.is_reserved() {
        return Err(
            SheetError::schema("the reserved table generates key constants, not classes")
                .with_table(table.name()),
        );
    }
    check_member_names(table, options).map_err(|e| e.with_table(table.name()))?;

    let mut output = String::new();
    for using in options.usings() {
        let _ = writeln!(output, "using {};", using);
    }
    output.push('\n');
    let _ = writeln!(output, "namespace {}", options.namespace);
    output.push_str("{\n");

    for sheet in table.exported_sheets() {
        write_row_class(&mut output, sheet, options);
        output.push('\n');
    }
    write_accessor(&mut output, table, options);

    output.push_str("}\n");
    Ok(output)
}

/// Reject names that would collide inside the generated types
///
/// Every sheet becomes a list field of the accessor, so a sheet name must
/// differ from the accessor class and from every other name the accessor
/// declares or refers to.
fn check_member_names(table: &Table, options: &CSharpOptions) -> SheetResult<()> {
    let accessor = options.accessor_type(table.name());
    let sheets: Vec<&Sheet> = table.exported_sheets().collect();

    let mut members: Vec<String> = [INSTANCE_FIELD, GET_METHOD, CREATE_METHOD]
        .iter()
        .map(|m| m.to_string())
        .collect();
    for sheet in &sheets {
        members.push(options.row_type(sheet.name()));
        if sheet.is_keyed() {
            members.push(dict_field(sheet.name()));
            members.push(lookup_method(sheet.name()));
        }
    }

    for sheet in &sheets {
        if sheet.name() == accessor {
            return Err(SheetError::schema(format!(
                "sheet {} collides with the accessor class name",
                sheet.name()
            ))
            .with_sheet(sheet.name()));
        }
        if let Some(member) = members.iter().find(|m| m.as_str() == sheet.name()) {
            return Err(SheetError::schema(format!(
                "sheet {} collides with the accessor member {}",
                sheet.name(),
                member
            ))
            .with_sheet(sheet.name()));
        }
        let row_type = options.row_type(sheet.name());
        if let Some(field) = sheet.fields().iter().find(|f| f.name == row_type) {
            return Err(SheetError::schema(format!(
                "field {} collides with its class name",
                field.name
            ))
            .with_field(field.name.as_str())
            .with_sheet(sheet.name()));
        }
    }
    Ok(())
}

/// `public class <Sheet>Info { ... }`
fn write_row_class(output: &mut String, sheet: &Sheet, options: &CSharpOptions) {
    let i1 = INDENT;
    let i2 = INDENT.repeat(2);

    let _ = writeln!(output, "{}public class {}", i1, options.row_type(sheet.name()));
    let _ = writeln!(output, "{}{{", i1);
    for field in sheet.fields() {
        let _ = writeln!(output, "{}/// <summary>", i2);
        let doc = format!("/// {}", doc_text(&field.description));
        let _ = writeln!(output, "{}{}", i2, doc.trim_end());
        let _ = writeln!(output, "{}/// </summary>", i2);
        let _ = writeln!(
            output,
            "{}public {} {};",
            i2,
            field_type(&field.ty),
            field.name
        );
    }
    let _ = writeln!(output, "{}}}", i1);
}

/// `public class <Table>Cfg { ... }`
///
/// The instance is created once per process through `Lazy<T>`; each keyed
/// sheet gets a dictionary built on its first lookup.
fn write_accessor(output: &mut String, table: &Table, options: &CSharpOptions) {
    let i1 = INDENT;
    let i2 = INDENT.repeat(2);
    let i3 = INDENT.repeat(3);
    let i4 = INDENT.repeat(4);
    let i5 = INDENT.repeat(5);
    let cfg = options.accessor_type(table.name());

    let _ = writeln!(output, "{}public class {}", i1, cfg);
    let _ = writeln!(output, "{}{{", i1);

    // Process-lifetime singleton
    let _ = writeln!(
        output,
        "{}private static readonly Lazy<{}> {} = new Lazy<{}>({});",
        i2, cfg, INSTANCE_FIELD, cfg, CREATE_METHOD
    );
    output.push('\n');
    let _ = writeln!(output, "{}public static {} {}()", i2, cfg, GET_METHOD);
    let _ = writeln!(output, "{}{{", i2);
    let _ = writeln!(output, "{}return {}.Value;", i3, INSTANCE_FIELD);
    let _ = writeln!(output, "{}}}", i2);
    output.push('\n');

    // Sheet data and lookup caches
    for sheet in table.exported_sheets() {
        let row = options.row_type(sheet.name());
        let _ = writeln!(output, "{}public List<{}> {};", i2, row, sheet.name());
        if sheet.is_keyed() {
            let _ = writeln!(
                output,
                "{}private Dictionary<int, {}> {};",
                i2,
                row,
                dict_field(sheet.name())
            );
        }
    }
    output.push('\n');

    // Loading
    let path = string_literal(&options.resource_path(table.name()));
    let _ = writeln!(output, "{}private static {} {}()", i2, cfg, CREATE_METHOD);
    let _ = writeln!(output, "{}{{", i2);
    match options.loader {
        AssetLoader::YooAsset => {
            let _ = writeln!(
                output,
                "{}AssetHandle handle = YooAssets.LoadAssetSync<TextAsset>({});",
                i3, path
            );
            let _ = writeln!(
                output,
                "{}TextAsset text = handle.AssetObject as TextAsset;",
                i3
            );
        }
        AssetLoader::Resources => {
            let _ = writeln!(
                output,
                "{}TextAsset text = Resources.Load<TextAsset>({});",
                i3, path
            );
        }
    }
    let _ = writeln!(
        output,
        "{}return JsonConvert.DeserializeObject<{}>(text.text);",
        i3, cfg
    );
    let _ = writeln!(output, "{}}}", i2);

    // Lookups; an absent id throws KeyNotFoundException
    for sheet in table.exported_sheets().filter(|s| s.is_keyed()) {
        let row = options.row_type(sheet.name());
        let name = sheet.name();
        let dict = dict_field(name);
        output.push('\n');
        let _ = writeln!(output, "{}public {} {}(int id)", i2, row, lookup_method(name));
        let _ = writeln!(output, "{}{{", i2);
        let _ = writeln!(output, "{}if ({} == null)", i3, dict);
        let _ = writeln!(output, "{}{{", i3);
        let _ = writeln!(output, "{}var dict = new Dictionary<int, {}>();", i4, row);
        let _ = writeln!(output, "{}foreach ({} info in {})", i4, row, name);
        let _ = writeln!(output, "{}{{", i4);
        let _ = writeln!(output, "{}dict.Add(info.{}, info);", i5, ID_FIELD);
        let _ = writeln!(output, "{}}}", i4);
        let _ = writeln!(output, "{}{} = dict;", i4, dict);
        let _ = writeln!(output, "{}}}", i3);
        let _ = writeln!(output, "{}return {}[id];", i3, dict);
        let _ = writeln!(output, "{}}}", i2);
    }

    let _ = writeln!(output, "{}}}", i1);
}
