//! Build pipeline
//!
//! Drives a full build: every table the [`WorkbookSource`] lists is loaded,
//! compiled to its JSON document and C# source, then handed to the
//! [`OutputSink`].
//!
//! ```text
//! source -> raw sheets -> Table -> JSON text ----> sink (json)
//!                               -> C# text ------> sink (code)
//! ```
//!
//! Tables are processed one at a time in listing order. All artifacts of a
//! table are produced before any of them is written, so a table that fails
//! to compile leaves no output; tables written before it stay written.
//!
//! The C# source is written before the JSON document. A failed source write
//! therefore leaves the previous JSON document in place, and a failed JSON
//! write leaves a fresh source next to a stale document. Writes are not
//! rolled back.

use tracing::{debug, info};

use crate::core::csharp::emit_source;
use crate::core::json::table_to_json;
use crate::core::schema::{Sheet, Table};
use crate::utils::config::Config;
use crate::utils::error::SheetResult;
use crate::utils::files::{Artifact, ArtifactKind, OutputSink};
use crate::utils::workbook::WorkbookSource;

/// Extension of the data documents
pub const JSON_EXTENSION: &str = "json";

/// Outcome of one compiled table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableReport {
    pub name: String,
    /// Sheets with at least one exported field
    pub sheets: usize,
    /// Data rows across those sheets
    pub rows: usize,
    /// Written files, in write order
    pub artifacts: Vec<(ArtifactKind, String)>,
}

/// Outcome of a build
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub tables: Vec<TableReport>,
}

impl BuildReport {
    /// Total number of written files
    pub fn artifact_count(&self) -> usize {
        self.tables.iter().map(|t| t.artifacts.len()).sum()
    }

    pub fn table(&self, name: &str) -> Option<&TableReport> {
        self.tables.iter().find(|t| t.name == name)
    }
}

/// Table build driver
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: Config,
}

impl Pipeline {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Build every table of `source` into `sink`, stopping at the first error
    pub fn run<S, O>(&self, source: &S, sink: &O) -> SheetResult<BuildReport>
    where
        S: WorkbookSource + ?Sized,
        O: OutputSink + ?Sized,
    {
        self.config.validate()?;
        let names = source.table_names()?;
        info!(tables = names.len(), tag = %self.config.tag, "starting build");

        let mut report = BuildReport::default();
        for name in &names {
            let table = load_table(source, name, &self.config.tag)?;
            let artifacts = self.compile(&table)?;

            let mut written = Vec::with_capacity(artifacts.len());
            for artifact in artifacts {
                sink.write(artifact.kind, &artifact.file_name, &artifact.contents)
                    .map_err(|e| e.with_table(table.name()))?;
                debug!(table = %name, kind = %artifact.kind, file = %artifact.file_name, "wrote artifact");
                written.push((artifact.kind, artifact.file_name));
            }

            let sheets: Vec<&Sheet> = table.exported_sheets().collect();
            let rows: usize = sheets.iter().map(|s| s.rows().len()).sum();
            info!(table = %name, sheets = sheets.len(), rows, "compiled table");
            report.tables.push(TableReport {
                name: name.clone(),
                sheets: sheets.len(),
                rows,
                artifacts: written,
            });
        }

        info!(
            tables = report.tables.len(),
            files = report.artifact_count(),
            "build finished"
        );
        Ok(report)
    }

    /// Produce all artifacts of a table without writing them, in write order
    pub fn compile(&self, table: &Table) -> SheetResult<Vec<Artifact>> {
        let mut artifacts = Vec::with_capacity(2);
        if self.config.emits_code() {
            let options = &self.config.csharp;
            artifacts.push(Artifact {
                kind: ArtifactKind::Code,
                file_name: options.file_name(table),
                contents: emit_source(table, options)?,
            });
        }
        artifacts.push(Artifact {
            kind: ArtifactKind::Json,
            file_name: format!("{}.{}", table.name(), JSON_EXTENSION),
            contents: table_to_json(table)?,
        });
        Ok(artifacts)
    }
}

/// Read and interpret every sheet of one table
pub fn load_table<S>(source: &S, name: &str, export_tag: &str) -> SheetResult<Table>
where
    S: WorkbookSource + ?Sized,
{
    let raw = source.read_table(name).map_err(|e| e.with_table(name))?;
    let mut sheets = Vec::with_capacity(raw.len());
    for sheet in raw {
        let sheet = Sheet::from_rows(sheet.name, &sheet.rows, export_tag)
            .map_err(|e| e.with_table(name))?;
        sheets.push(sheet);
    }
    Table::new(name, sheets)
}
