//! Integration tests for sheetcfg table compilation

use pretty_assertions::assert_eq;
use sheetcfg::{
    compile_table, encode_cell, load_table, resolve_type, ArtifactKind, CSharpOptions, Config,
    DirectorySink, ErrorKind, MemorySink, MemoryWorkbookSource, Pipeline, RawSheet, Sheet, Table,
};

fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|r| r.iter().map(|c| c.to_string()).collect())
        .collect()
}

fn item_rows() -> Vec<Vec<String>> {
    grid(&[
        &["c", "c", "cs", "s", "c"],
        &["ID", "Name", "Price", "Secret", "Tags"],
        &["int", "string", "float", "string", "[]string"],
        &["Item id", "Display\nname", "Shop price", "", "Search tags"],
        &["1", "Sword", "9.5", "x", "weapon,melee"],
        &["2", "Shield", "", "y", ""],
    ])
}

fn global_rows() -> Vec<Vec<String>> {
    grid(&[
        &["c", "c"],
        &["Key", "Value"],
        &["string", "string"],
        &["Name", "Value"],
        &["MaxLevel", "60"],
        &["StartGold", "100"],
    ])
}

fn game_source() -> MemoryWorkbookSource {
    MemoryWorkbookSource::new()
        .with_table(
            "Item",
            vec![
                RawSheet::new("Item", item_rows()),
                RawSheet::new(
                    "Drop",
                    grid(&[
                        &["c", "c"],
                        &["Group", "Weights"],
                        &["int", "map[int]int"],
                        &["", ""],
                        &["1", "1:50;2:50"],
                        &["1", "3:100"],
                    ]),
                ),
                RawSheet::new("Sheet1", vec![]),
            ],
        )
        .with_table("Global", vec![RawSheet::new("Global", global_rows())])
}

// ============================================================================
// Type Strings and Cells
// ============================================================================

mod cells {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_type_strings() {
        let cases = [
            ("int", "int32"),
            ("Int64", "int64"),
            ("float", "float32"),
            ("[]Float64", "[]float64"),
            ("[][]bool", "[][]bool"),
            ("map[ string ]int", "map[string]int32"),
        ];
        for (input, canonical) in cases {
            let ty = resolve_type(input).unwrap();
            assert_eq!(ty.to_string(), canonical, "{}", input);
            assert_eq!(resolve_type(&ty.to_string()).unwrap(), ty);
        }
        for bad in ["", "list", "[]", "[]map[int]int", "map[int]", "[][][]int", "int[]"] {
            assert!(resolve_type(bad).is_err(), "{}", bad);
        }
    }

    #[test]
    fn test_cell_encoding() {
        let cases = [
            ("1,2,3", "[]int", "[1,2,3]"),
            ("1,2;3", "[][]int", "[[1,2],[3]]"),
            ("a:1;b:2", "map[string]int", r#"{"a":1,"b":2}"#),
            ("true", "bool", "true"),
            ("0", "bool", "false"),
            ("", "[]string", "[]"),
            ("", "map[int]string", "{}"),
            ("0.1", "float", "0.1"),
            ("url:http://x", "map[string]string", r#"{"url":"http://x"}"#),
        ];
        for (text, ty, expected) in cases {
            assert_eq!(
                encode_cell(text, &resolve_type(ty).unwrap()).unwrap(),
                expected,
                "{} as {}",
                text,
                ty
            );
        }
    }

    #[test]
    fn test_cell_errors() {
        let ty = resolve_type("[]int").unwrap();
        assert!(encode_cell("1,x", &ty).is_err());
        let ty = resolve_type("map[string]int").unwrap();
        assert!(encode_cell("a:1;a:2", &ty).is_err());
        assert!(encode_cell("a", &ty).is_err());
        assert!(encode_cell("3000000000", &resolve_type("int").unwrap()).is_err());
        assert!(encode_cell("yes", &resolve_type("bool").unwrap()).is_err());
    }
}

// ============================================================================
// Table Compilation
// ============================================================================

mod tables {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_item_json() {
        let table = load_table(&game_source(), "Item", "c").unwrap();
        let (json, _) = compile_table(&table, &CSharpOptions::default()).unwrap();
        assert_eq!(
            json,
            r#"{
    "Item":[
        {"ID":1,"Name":"Sword","Price":9.5,"Tags":["weapon","melee"]},
        {"ID":2,"Name":"Shield","Price":0.0,"Tags":[]}
    ],
    "Drop":[
        {"Group":1,"Weights":{"1":50,"2":50}},
        {"Group":1,"Weights":{"3":100}}
    ]
}"#
        );
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["Item"][0]["Tags"][1], "melee");
    }

    #[test]
    fn test_server_tag_selects_other_columns() {
        let table = load_table(&game_source(), "Item", "s").unwrap();
        let item = table.sheet("Item").unwrap();
        assert_eq!(item.field_names().collect::<Vec<_>>(), vec!["Price", "Secret"]);
        assert!(table.sheet("Drop").unwrap().is_empty());

        let (json, code) = compile_table(&table, &CSharpOptions::default()).unwrap();
        assert!(!json.contains("Drop"));
        assert!(!code.contains("DropInfo"));
        assert!(!code.contains("GetItemByID"));
    }

    #[test]
    fn test_item_code() {
        let table = load_table(&game_source(), "Item", "c").unwrap();
        let (_, code) = compile_table(&table, &CSharpOptions::default()).unwrap();

        assert!(code.contains("namespace GameData\n{\n"));
        assert!(code.contains("        /// Display name\n"));
        assert!(code.contains("        public float Price;\n"));
        assert!(code.contains("        public List<string> Tags;\n"));
        assert!(code.contains("        public Dictionary<int, int> Weights;\n"));
        assert!(code.contains("        public List<ItemInfo> Item;\n"));
        assert!(code.contains("        public List<DropInfo> Drop;\n"));
        assert!(code.contains("        private Dictionary<int, ItemInfo> _ItemDict;\n"));
        assert!(code.contains("        public ItemInfo GetItemByID(int id)\n"));
        assert!(!code.contains("GetDropByID"));
        assert!(code.contains("YooAssets.LoadAssetSync<TextAsset>(\"Assets/GameRes/Json/Item\")"));
    }

    #[test]
    fn test_global_constants() {
        let table = load_table(&game_source(), "Global", "c").unwrap();
        let (json, code) = compile_table(&table, &CSharpOptions::default()).unwrap();
        assert_eq!(
            json,
            r#"{
    "Global":[
        {"Key":"MaxLevel","Value":"60"},
        {"Key":"StartGold","Value":"100"}
    ]
}"#
        );
        assert_eq!(
            code,
            r#"namespace GameData
{
    public static class GlobalKey
    {
        public const string MaxLevel = "MaxLevel";
        public const string StartGold = "StartGold";
    }
}
"#
        );
    }

    #[test]
    fn test_duplicate_id_location() {
        let rows = grid(&[
            &["c", "c"],
            &["ID", "Name"],
            &["int", "string"],
            &["", ""],
            &["1", "a"],
            &["2", "b"],
            &["1", "c"],
        ]);
        let table = Table::new("Item", vec![Sheet::from_rows("Item", &rows, "c").unwrap()]).unwrap();
        let err = compile_table(&table, &CSharpOptions::default()).unwrap_err();
        assert_eq!(
            err.kind,
            ErrorKind::DuplicateKey {
                key: "1".to_string()
            }
        );
        assert_eq!(
            err.to_string(),
            "table Item, sheet Item, field ID, row 7: duplicate key 1"
        );
    }

    #[test]
    fn test_bad_type_location() {
        let rows = grid(&[&["c", "c"], &["ID", "Speed"], &["int", "vec3"], &[]]);
        let err = Sheet::from_rows("Unit", &rows, "c").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::InvalidType(_)));
        assert_eq!(err.location.sheet.as_deref(), Some("Unit"));
        assert_eq!(err.location.field.as_deref(), Some("Speed"));
    }
}

// ============================================================================
// Build Pipeline
// ============================================================================

mod pipeline {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_memory_build() {
        let sink = MemorySink::new();
        let report = Pipeline::default().run(&game_source(), &sink).unwrap();

        let names: Vec<&str> = report.tables.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Global", "Item"]);
        assert_eq!(report.artifact_count(), 4);
        assert!(sink.get(ArtifactKind::Json, "Global.json").is_some());
        assert!(sink.get(ArtifactKind::Code, "GlobalKey.cs").is_some());
        assert!(sink.get(ArtifactKind::Json, "Item.json").is_some());
        assert!(sink.get(ArtifactKind::Code, "ItemCfg.cs").is_some());

        let item = report.table("Item").unwrap();
        assert_eq!(item.sheets, 2);
        assert_eq!(item.rows, 4);
    }

    #[test]
    fn test_directory_build() {
        let root = tempfile::tempdir().unwrap();
        let json_dir = root.path().join("Json");
        let code_dir = root.path().join("GenCode");
        let config = Config::default()
            .with_json_dir(&json_dir)
            .with_code_dir(&code_dir);
        let sink = DirectorySink::new(&config.json_dir, &config.code_dir);

        Pipeline::new(config).run(&game_source(), &sink).unwrap();

        let json = std::fs::read_to_string(json_dir.join("Item.json")).unwrap();
        assert!(json.starts_with("{\n    \"Item\":[\n"));
        let code = std::fs::read_to_string(code_dir.join("ItemCfg.cs")).unwrap();
        assert!(code.contains("public class ItemCfg"));
        assert!(code_dir.join("GlobalKey.cs").exists());
    }

    #[test]
    fn test_json_only_build() {
        let sink = MemorySink::new();
        let report = Pipeline::new(Config::default().with_emit_code(false))
            .run(&game_source(), &sink)
            .unwrap();
        assert_eq!(report.artifact_count(), 2);
        assert!(sink
            .artifacts()
            .iter()
            .all(|a| a.kind == ArtifactKind::Json));
    }

    #[test]
    fn test_failure_stops_build() {
        let bad = grid(&[&["c"], &["Key"], &["string"], &[], &["A"], &["A"]]);
        let source = game_source().with_table("Global", vec![RawSheet::new("Global", bad)]);
        let sink = MemorySink::new();
        let err = Pipeline::default().run(&source, &sink).unwrap_err();

        assert!(matches!(err.kind, ErrorKind::DuplicateKey { .. }));
        assert_eq!(err.location.table.as_deref(), Some("Global"));
        assert!(sink.is_empty());
    }

    #[test]
    fn test_resources_options_from_config() {
        let config = Config::from_toml(
            "[csharp]\nloader = \"resources\"\nresource_root = \"Tables\"\nnamespace = \"Game.Data\"",
        )
        .unwrap();
        let sink = MemorySink::new();
        Pipeline::new(config).run(&game_source(), &sink).unwrap();
        let code = sink.get(ArtifactKind::Code, "ItemCfg.cs").unwrap();
        assert!(code.contains("namespace Game.Data"));
        assert!(code.contains("Resources.Load<TextAsset>(\"Tables/Item\")"));
        assert!(!code.contains("using YooAsset;"));
    }
}
