//! Build configuration
//!
//! Settings are read from `sheetcfg.toml` when present, then overridden by
//! command-line flags:
//!
//! ```toml
//! excel_dir = "../Excel"
//! json_dir = "../Assets/GameRes/Json"
//! code_dir = "../Assets/Scripts/Data/GenCode"
//! tag = "c"
//! # emit_code = true
//!
//! [csharp]
//! namespace = "GameData"
//! loader = "yooasset"
//! ```
//!
//! When `emit_code` is left out, C# sources are generated for every tag
//! except the server tag `s`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::error::{ErrorKind, SheetError, SheetResult};
use crate::core::csharp::CSharpOptions;
use crate::data::constants::{IDENTIFIER, SERVER_TAG};

/// File name looked up in the working directory when no path is given
pub const CONFIG_FILE: &str = "sheetcfg.toml";

/// Build settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Directory holding the source workbooks
    pub excel_dir: PathBuf,
    /// Output directory of the JSON documents
    pub json_dir: PathBuf,
    /// Output directory of the generated C# sources
    pub code_dir: PathBuf,
    /// Export-filter tag selecting the columns to compile
    pub tag: String,
    /// Generate C# sources next to the JSON documents; unset follows the tag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emit_code: Option<bool>,
    pub csharp: CSharpOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            excel_dir: PathBuf::from("../Excel"),
            json_dir: PathBuf::from("../Assets/GameRes/Json"),
            code_dir: PathBuf::from("../Assets/Scripts/Data/GenCode"),
            tag: "c".to_string(),
            emit_code: None,
            csharp: CSharpOptions::default(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML document
    pub fn from_toml(text: &str) -> SheetResult<Self> {
        let config: Config = toml::from_str(text).map_err(|e| SheetError::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file
    pub fn load(path: impl AsRef<Path>) -> SheetResult<Self> {
        let path = path.as_ref();
        let text =
            std::fs::read_to_string(path).map_err(|e| SheetError::io(path.display(), e))?;
        Self::from_toml(&text).map_err(|e| {
            if let ErrorKind::Config(message) = &e.kind {
                SheetError::config(format!("{}: {}", path.display(), message))
            } else {
                e
            }
        })
    }

    /// Load `path`, or the defaults when it does not exist
    pub fn load_or_default(path: impl AsRef<Path>) -> SheetResult<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn with_excel_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.excel_dir = dir.into();
        self
    }

    pub fn with_json_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.json_dir = dir.into();
        self
    }

    pub fn with_code_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.code_dir = dir.into();
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_emit_code(mut self, emit_code: bool) -> Self {
        self.emit_code = Some(emit_code);
        self
    }

    /// Whether C# sources are generated for this build
    pub fn emits_code(&self) -> bool {
        self.emit_code.unwrap_or(self.tag != SERVER_TAG)
    }

    /// Reject settings no build could use
    pub fn validate(&self) -> SheetResult<()> {
        if self.tag.trim().is_empty() {
            return Err(SheetError::config("export tag must not be empty"));
        }
        if self.csharp.namespace.trim().is_empty() {
            return Err(SheetError::config("C# namespace must not be empty"));
        }
        if self.csharp.namespace.split('.').any(|part| !IDENTIFIER.is_match(part)) {
            return Err(SheetError::config(format!(
                "invalid C# namespace {:?}",
                self.csharp.namespace
            )));
        }
        let suffixes = [
            ("row_suffix", &self.csharp.row_suffix),
            ("accessor_suffix", &self.csharp.accessor_suffix),
        ];
        for (key, suffix) in suffixes {
            if suffix.is_empty() || !suffix.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                return Err(SheetError::config(format!("invalid C# {} {:?}", key, suffix)));
            }
        }
        if self.csharp.row_suffix == self.csharp.accessor_suffix {
            return Err(SheetError::config(
                "C# row_suffix and accessor_suffix must differ",
            ));
        }
        Ok(())
    }
}
