//! Tests for the C# generators

use super::*;
use crate::core::schema::{Field, Row, Sheet, Table};
use crate::utils::error::ErrorKind;
use pretty_assertions::assert_eq;

fn field(name: &str, ty: &str, desc: &str) -> Field {
    Field::new(name, TypeDescriptor::resolve(ty).unwrap(), desc)
}

fn rows(cells: &[&[&str]]) -> Vec<Row> {
    cells
        .iter()
        .enumerate()
        .map(|(i, r)| Row {
            number: i + 5,
            cells: r.iter().map(|c| c.to_string()).collect(),
        })
        .collect()
}

fn item_table() -> Table {
    let item = Sheet::new(
        "Item",
        vec![
            field("ID", "int", "Key"),
            field("Name", "string", "Display\nname"),
            field("Tags", "[]string", ""),
            field("Grid", "[][]int", ""),
            field("Stats", "map[string]float", ""),
        ],
        rows(&[&["1", "Sword"], &["2", "Shield"]]),
    )
    .unwrap();
    let drop = Sheet::new("Drop", vec![field("Group", "int64", "")], vec![]).unwrap();
    Table::new("Item", vec![item, drop]).unwrap()
}

fn global_table(keys: &[&str]) -> Table {
    let data: Vec<&[&str]> = keys.iter().map(std::slice::from_ref).collect();
    let sheet = Sheet::new(
        "Global",
        vec![field("Key", "string", ""), field("Value", "string", "")],
        rows(&data),
    )
    .unwrap();
    Table::new("Global", vec![sheet]).unwrap()
}

#[test]
fn test_field_types() {
    let cases = [
        ("int", "int"),
        ("int64", "long"),
        ("float", "float"),
        ("float64", "double"),
        ("string", "string"),
        ("bool", "bool"),
        ("[]int", "List<int>"),
        ("[][]string", "List<List<string>>"),
        ("map[int]bool", "Dictionary<int, bool>"),
    ];
    for (ty, expected) in cases {
        assert_eq!(field_type(&TypeDescriptor::resolve(ty).unwrap()), expected);
    }
}

#[test]
fn test_doc_text_flattens_and_escapes() {
    assert_eq!(doc_text("first\nsecond\r\nthird"), "first second third");
    assert_eq!(doc_text("a < b && c"), "a &lt; b &amp;&amp; c");
    assert_eq!(doc_text(""), "");
}

#[test]
fn test_string_literal() {
    assert_eq!(string_literal("Assets/Json"), "\"Assets/Json\"");
    assert_eq!(string_literal("a\"b\\c"), "\"a\\\"b\\\\c\"");
}

#[test]
fn test_row_class() {
    let code = emit_classes(&item_table(), &CSharpOptions::default()).unwrap();
    let expected = "    public class ItemInfo
    {
        /// <summary>
        /// Key
        /// </summary>
        public int ID;
        /// <summary>
        /// Display name
        /// </summary>
        public string Name;
        /// <summary>
        ///
        /// </summary>
        public List<string> Tags;
        /// <summary>
        ///
        /// </summary>
        public List<List<int>> Grid;
        /// <summary>
        ///
        /// </summary>
        public Dictionary<string, float> Stats;
    }
";
    assert!(code.contains(expected), "{}", code);
    assert!(code.contains("    public class DropInfo\n"));
    assert!(code.contains("        public long Group;\n"));
}

#[test]
fn test_header_and_namespace() {
    let code = emit_classes(&item_table(), &CSharpOptions::default()).unwrap();
    assert!(code.starts_with(
        "using Newtonsoft.Json;\nusing System;\nusing System.Collections.Generic;\nusing UnityEngine;\nusing YooAsset;\n\nnamespace GameData\n{\n"
    ));
    assert!(code.ends_with("    }\n}\n"));
}

#[test]
fn test_accessor_singleton_and_loading() {
    let code = emit_classes(&item_table(), &CSharpOptions::default()).unwrap();
    assert!(code.contains("    public class ItemCfg\n"));
    assert!(code.contains(
        "        private static readonly Lazy<ItemCfg> _instance = new Lazy<ItemCfg>(Create);\n"
    ));
    assert!(code.contains("        public static ItemCfg Get()\n        {\n            return _instance.Value;\n        }\n"));
    assert!(code.contains(
        "            AssetHandle handle = YooAssets.LoadAssetSync<TextAsset>(\"Assets/GameRes/Json/Item\");\n"
    ));
    assert!(code.contains(
        "            return JsonConvert.DeserializeObject<ItemCfg>(text.text);\n"
    ));
}

#[test]
fn test_accessor_lookup_only_for_keyed_sheets() {
    let code = emit_classes(&item_table(), &CSharpOptions::default()).unwrap();
    assert!(code.contains("        public List<ItemInfo> Item;\n"));
    assert!(code.contains("        private Dictionary<int, ItemInfo> _ItemDict;\n"));
    assert!(code.contains("        public List<DropInfo> Drop;\n"));
    assert!(!code.contains("_DropDict"));
    assert!(!code.contains("GetDropByID"));

    let expected = "        public ItemInfo GetItemByID(int id)
        {
            if (_ItemDict == null)
            {
                var dict = new Dictionary<int, ItemInfo>();
                foreach (ItemInfo info in Item)
                {
                    dict.Add(info.ID, info);
                }
                _ItemDict = dict;
            }
            return _ItemDict[id];
        }
";
    assert!(code.contains(expected), "{}", code);
}

#[test]
fn test_resources_loader() {
    let code = emit_classes(&item_table(), &CSharpOptions::resources()).unwrap();
    assert!(!code.contains("YooAsset"));
    assert!(code.contains("            TextAsset text = Resources.Load<TextAsset>(\"Json/Item\");\n"));
}

#[test]
fn test_custom_names() {
    let options = CSharpOptions {
        namespace: "Game.Config".to_string(),
        row_suffix: "Row".to_string(),
        accessor_suffix: "Table".to_string(),
        resource_root: "Data/".to_string(),
        ..Default::default()
    };
    let code = emit_classes(&item_table(), &options).unwrap();
    assert!(code.contains("namespace Game.Config\n"));
    assert!(code.contains("public class ItemRow\n"));
    assert!(code.contains("public class ItemTable\n"));
    assert!(code.contains("public ItemRow GetItemByID(int id)"));
    assert!(code.contains("(\"Data/Item\")"));
    assert_eq!(options.file_name(&item_table()), "ItemTable.cs");
}

#[test]
fn test_empty_sheets_are_skipped() {
    let empty = Sheet::new("Notes", vec![], vec![]).unwrap();
    let table = Table::new("Item", vec![empty]).unwrap();
    let code = emit_classes(&table, &CSharpOptions::default()).unwrap();
    assert!(!code.contains("NotesInfo"));
    assert!(code.contains("public class ItemCfg"));
}

#[test]
fn test_classes_reject_reserved_table() {
    let err = emit_classes(&global_table(&["A"]), &CSharpOptions::default()).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Schema(_)));
}

#[test]
fn test_member_name_collisions() {
    let sheet = Sheet::new("ItemCfg", vec![field("ID", "int", "")], vec![]).unwrap();
    let table = Table::new("Item", vec![sheet]).unwrap();
    assert!(emit_classes(&table, &CSharpOptions::default()).is_err());

    let sheet = Sheet::new("Item", vec![field("ItemInfo", "int", "")], vec![]).unwrap();
    let table = Table::new("Item", vec![sheet]).unwrap();
    let err = emit_classes(&table, &CSharpOptions::default()).unwrap_err();
    assert_eq!(err.location.field.as_deref(), Some("ItemInfo"));
}

#[test]
fn test_sheet_names_collide_with_accessor_members() {
    for name in ["Get", "Create", "_instance"] {
        let sheet = Sheet::new(name, vec![field("Count", "int", "")], vec![]).unwrap();
        let table = Table::new("Item", vec![sheet]).unwrap();
        let err = emit_classes(&table, &CSharpOptions::default()).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Schema(_)), "{}", name);
        assert_eq!(err.location.table.as_deref(), Some("Item"));
        assert_eq!(err.location.sheet.as_deref(), Some(name));
    }

    for name in ["_ItemDict", "GetItemByID", "ItemInfo"] {
        let item = Sheet::new("Item", vec![field("ID", "int", "")], vec![]).unwrap();
        let other = Sheet::new(name, vec![field("Count", "int", "")], vec![]).unwrap();
        let table = Table::new("Shop", vec![item, other]).unwrap();
        let err = emit_classes(&table, &CSharpOptions::default()).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Schema(_)), "{}", name);
        assert_eq!(err.location.sheet.as_deref(), Some(name));
    }

    // Lookup names only exist for keyed sheets
    let item = Sheet::new("Item", vec![field("Name", "string", "")], vec![]).unwrap();
    let other = Sheet::new("GetItemByID", vec![field("Count", "int", "")], vec![]).unwrap();
    let table = Table::new("Shop", vec![item, other]).unwrap();
    assert!(emit_classes(&table, &CSharpOptions::default()).is_ok());
}

#[test]
fn test_constants() {
    let code = emit_constants(&global_table(&["Key1", "Key2"]), &CSharpOptions::default()).unwrap();
    assert_eq!(
        code,
        "namespace GameData
{
    public static class GlobalKey
    {
        public const string Key1 = \"Key1\";
        public const string Key2 = \"Key2\";
    }
}
"
    );
}

#[test]
fn test_constants_trim_key_cells() {
    let code = emit_constants(&global_table(&[" MaxLevel "]), &CSharpOptions::default()).unwrap();
    assert!(code.contains("public const string MaxLevel = \"MaxLevel\";"));
}

#[test]
fn test_constants_require_reserved_table() {
    let err = emit_constants(&item_table(), &CSharpOptions::default()).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Schema(_)));
}

#[test]
fn test_constants_require_single_sheet() {
    let a = Sheet::new("Global", vec![field("Key", "string", "")], vec![]).unwrap();
    let b = Sheet::new("Extra", vec![field("Key", "string", "")], vec![]).unwrap();
    let table = Table::new("Global", vec![a, b]).unwrap();
    let err = emit_constants(&table, &CSharpOptions::default()).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Schema(_)));
}

#[test]
fn test_constants_require_string_key() {
    let sheet = Sheet::new("Global", vec![field("Key", "int", "")], vec![]).unwrap();
    let table = Table::new("Global", vec![sheet]).unwrap();
    let err = emit_constants(&table, &CSharpOptions::default()).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Schema(_)));
    assert_eq!(err.location.field.as_deref(), Some("Key"));
}

#[test]
fn test_constants_bad_keys() {
    let options = CSharpOptions::default();
    assert_eq!(
        emit_constants(&global_table(&["A", ""]), &options)
            .unwrap_err()
            .kind,
        ErrorKind::EmptyKey
    );
    assert!(matches!(
        emit_constants(&global_table(&["max level"]), &options)
            .unwrap_err()
            .kind,
        ErrorKind::InvalidName { .. }
    ));
    let err = emit_constants(&global_table(&["A", "A"]), &options).unwrap_err();
    assert_eq!(
        err.kind,
        ErrorKind::DuplicateKey {
            key: "A".to_string()
        }
    );
    assert_eq!(err.location.row, Some(6));
}

#[test]
fn test_emit_source_dispatch() {
    let options = CSharpOptions::default();
    let global = emit_source(&global_table(&["A"]), &options).unwrap();
    assert!(global.contains("class GlobalKey"));
    let item = emit_source(&item_table(), &options).unwrap();
    assert!(item.contains("class ItemCfg"));
    assert_eq!(options.file_name(&global_table(&[])), "GlobalKey.cs");
    assert_eq!(options.file_name(&item_table()), "ItemCfg.cs");
}
