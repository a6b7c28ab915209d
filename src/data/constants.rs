//! Fixed conventions shared by the loader, the value parser and both emitters
//!
//! Designers and the generated runtime code both depend on these values, so
//! changing any of them changes the meaning of every existing table.

use lazy_static::lazy_static;
use regex::Regex;

// ============================================================================
// Sheet layout
// ============================================================================

/// Number of header rows at the top of every sheet
/// (export filter, field name, type, description).
pub const HEADER_ROWS: usize = 4;

/// Header row holding the export filter tags
pub const EXPORT_ROW: usize = 0;

/// Header row holding field names
pub const NAME_ROW: usize = 1;

/// Header row holding type strings
pub const TYPE_ROW: usize = 2;

/// Header row holding field descriptions
pub const DESC_ROW: usize = 3;

// ============================================================================
// Cell delimiters
// ============================================================================

/// Separates items of a list cell: `a,b,c`. Items may not be blank, so
/// `1,,2` and `1,2,` are rejected.
pub const LIST_DELIMITER: char = ',';

/// Separates inner lists of a list-of-list cell: `1,2;3`
pub const GROUP_DELIMITER: char = ';';

/// Separates key/value pairs of a map cell: `a:1;b:2`
pub const PAIR_DELIMITER: char = ';';

/// Separates a key from its value inside one map pair
pub const KEY_VALUE_DELIMITER: char = ':';

// ============================================================================
// Keys and reserved names
// ============================================================================

/// Export tag of server builds, which generate no C# sources unless asked to
pub const SERVER_TAG: &str = "s";

/// First-column name that marks a sheet as keyed
pub const ID_FIELD: &str = "ID";

/// Table that emits key constants instead of a data class
pub const GLOBAL_TABLE: &str = "Global";

/// Class (and file stem) generated for the reserved table
pub const GLOBAL_KEY_CLASS: &str = "GlobalKey";

/// Prefix of default worksheet names that are never exported
pub const DEFAULT_SHEET_PREFIX: &str = "Sheet";

/// Prefix of Office lock files sitting next to open workbooks
pub const LOCK_FILE_PREFIX: char = '~';

/// Workbook file extension
pub const WORKBOOK_EXTENSION: &str = "xlsx";

lazy_static! {
    /// Identifier accepted for tables, sheets, fields and key constants
    pub static ref IDENTIFIER: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap();
}

/// Spreadsheet column label for a zero-based column index (`0` → `A`, `27` → `AB`)
pub fn column_label(index: usize) -> String {
    let mut label = Vec::new();
    let mut n = index + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        label.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    label.reverse();
    String::from_utf8(label).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_label() {
        assert_eq!(column_label(0), "A");
        assert_eq!(column_label(25), "Z");
        assert_eq!(column_label(26), "AA");
        assert_eq!(column_label(27), "AB");
        assert_eq!(column_label(701), "ZZ");
        assert_eq!(column_label(702), "AAA");
    }

    #[test]
    fn test_identifier_pattern() {
        assert!(IDENTIFIER.is_match("ID"));
        assert!(IDENTIFIER.is_match("_hidden"));
        assert!(IDENTIFIER.is_match("Item2"));
        assert!(!IDENTIFIER.is_match("2Item"));
        assert!(!IDENTIFIER.is_match("max hp"));
        assert!(!IDENTIFIER.is_match(""));
    }

    #[test]
    fn test_delimiters_are_distinct() {
        assert_ne!(LIST_DELIMITER, GROUP_DELIMITER);
        assert_ne!(LIST_DELIMITER, PAIR_DELIMITER);
        assert_ne!(LIST_DELIMITER, KEY_VALUE_DELIMITER);
        assert_ne!(PAIR_DELIMITER, KEY_VALUE_DELIMITER);
    }
}
