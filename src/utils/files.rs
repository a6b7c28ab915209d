//! Artifact output
//!
//! Generated files leave the compiler through an [`OutputSink`]. The key
//! abstraction mirrors the workbook side: the pipeline only names an artifact
//! kind and a file name, and the sink decides where the text goes.
//!
//! Implementations:
//! - `DirectorySink`: writes into one directory per artifact kind (CLI)
//! - `MemorySink`: keeps artifacts in memory (check mode, testing)

use std::cell::RefCell;
use std::fmt;
use std::path::{Path, PathBuf};

use super::error::{SheetError, SheetResult};

/// Kind of generated file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    /// Data document loaded at runtime
    Json,
    /// Generated source code
    Code,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactKind::Json => write!(f, "json"),
            ArtifactKind::Code => write!(f, "code"),
        }
    }
}

/// One generated file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub kind: ArtifactKind,
    pub file_name: String,
    pub contents: String,
}

/// Trait for storing generated files
pub trait OutputSink {
    /// Store one artifact, replacing any previous one with the same name
    fn write(&self, kind: ArtifactKind, file_name: &str, contents: &str) -> SheetResult<()>;
}

/// Filesystem sink (for CLI usage)
#[derive(Debug, Clone)]
pub struct DirectorySink {
    json_dir: PathBuf,
    code_dir: PathBuf,
}

impl DirectorySink {
    pub fn new(json_dir: impl AsRef<Path>, code_dir: impl AsRef<Path>) -> Self {
        Self {
            json_dir: json_dir.as_ref().to_path_buf(),
            code_dir: code_dir.as_ref().to_path_buf(),
        }
    }

    /// Directory receiving artifacts of a kind
    pub fn dir_for(&self, kind: ArtifactKind) -> &Path {
        match kind {
            ArtifactKind::Json => &self.json_dir,
            ArtifactKind::Code => &self.code_dir,
        }
    }
}

impl OutputSink for DirectorySink {
    fn write(&self, kind: ArtifactKind, file_name: &str, contents: &str) -> SheetResult<()> {
        let dir = self.dir_for(kind);
        std::fs::create_dir_all(dir).map_err(|e| SheetError::io(dir.display(), e))?;
        let path = dir.join(file_name);
        std::fs::write(&path, contents).map_err(|e| SheetError::io(path.display(), e))
    }
}

/// In-memory sink (for check mode and testing)
#[derive(Debug, Default)]
pub struct MemorySink {
    artifacts: RefCell<Vec<Artifact>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All stored artifacts, in write order
    pub fn artifacts(&self) -> Vec<Artifact> {
        self.artifacts.borrow().clone()
    }

    /// Contents of a stored artifact
    pub fn get(&self, kind: ArtifactKind, file_name: &str) -> Option<String> {
        self.artifacts
            .borrow()
            .iter()
            .find(|a| a.kind == kind && a.file_name == file_name)
            .map(|a| a.contents.clone())
    }

    pub fn len(&self) -> usize {
        self.artifacts.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.borrow().is_empty()
    }
}

impl OutputSink for MemorySink {
    fn write(&self, kind: ArtifactKind, file_name: &str, contents: &str) -> SheetResult<()> {
        let mut artifacts = self.artifacts.borrow_mut();
        let artifact = Artifact {
            kind,
            file_name: file_name.to_string(),
            contents: contents.to_string(),
        };
        match artifacts
            .iter_mut()
            .find(|a| a.kind == kind && a.file_name == file_name)
        {
            Some(existing) => *existing = artifact,
            None => artifacts.push(artifact),
        }
        Ok(())
    }
}
