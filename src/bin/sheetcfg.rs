//! sheetcfg CLI - Spreadsheet table compiler for game configuration data

#[cfg(feature = "cli")]
use clap::{Args, Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::PathBuf;
#[cfg(feature = "cli")]
use sheetcfg::{
    constants::{GROUP_DELIMITER, KEY_VALUE_DELIMITER, LIST_DELIMITER, PAIR_DELIMITER, SERVER_TAG},
    utils::config::CONFIG_FILE,
    BuildReport, Config, Primitive, SheetResult,
};

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "sheetcfg")]
#[command(version)]
#[command(about = "sheetcfg - Compile spreadsheet tables into JSON data and C# accessors", long_about = None)]
struct Cli {
    /// Subcommand to run (build when omitted)
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    options: BuildArgs,

    /// Log every sheet and written file
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[cfg(feature = "cli")]
#[derive(Args)]
struct BuildArgs {
    /// Configuration file
    #[arg(short, long, global = true, default_value = CONFIG_FILE)]
    config: PathBuf,

    /// Directory holding the source workbooks
    #[arg(long, global = true)]
    excel_dir: Option<PathBuf>,

    /// Output directory of the JSON documents
    #[arg(long, global = true)]
    json_dir: Option<PathBuf>,

    /// Output directory of the generated C# sources
    #[arg(long, global = true)]
    code_dir: Option<PathBuf>,

    /// Export-filter tag selecting the columns to compile (`s` builds write
    /// no C# sources unless `emit_code = true` is configured)
    #[arg(short, long, global = true)]
    tag: Option<String>,

    /// Only write JSON documents
    #[arg(long, global = true)]
    no_code: bool,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Compile every workbook and write the outputs (default action)
    Build,

    /// Compile every workbook without writing anything
    Check,

    /// Show version, type grammar and cell delimiters
    Info,
}

#[cfg(feature = "cli")]
impl BuildArgs {
    /// Configuration file values overridden by flags
    fn resolve(&self) -> SheetResult<Config> {
        let mut config = Config::load_or_default(&self.config)?;
        if let Some(ref dir) = self.excel_dir {
            config = config.with_excel_dir(dir);
        }
        if let Some(ref dir) = self.json_dir {
            config = config.with_json_dir(dir);
        }
        if let Some(ref dir) = self.code_dir {
            config = config.with_code_dir(dir);
        }
        if let Some(ref tag) = self.tag {
            config = config.with_tag(tag.as_str());
        }
        if self.no_code {
            config = config.with_emit_code(false);
        }
        config.validate()?;
        Ok(config)
    }
}

#[cfg(feature = "cli")]
fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let result = match cli.command.unwrap_or(Commands::Build) {
        Commands::Build => cli
            .options
            .resolve()
            .and_then(|config| sheetcfg::build(&config))
            .map(|report| print_report(&report, "Built")),
        Commands::Check => cli
            .options
            .resolve()
            .and_then(|config| sheetcfg::check(&config))
            .map(|report| print_report(&report, "Checked")),
        Commands::Info => {
            print_info();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

/// Install the stderr log subscriber; `RUST_LOG` takes precedence over flags
#[cfg(feature = "cli")]
fn init_logging(verbose: bool, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    let level = if quiet {
        "warn"
    } else if verbose {
        "debug"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(feature = "cli")]
fn print_report(report: &BuildReport, verb: &str) {
    for table in &report.tables {
        eprintln!(
            "✓ {} ({} sheet(s), {} row(s))",
            table.name, table.sheets, table.rows
        );
    }
    eprintln!(
        "{} {} table(s), {} file(s)",
        verb,
        report.tables.len(),
        report.artifact_count()
    );
}

#[cfg(feature = "cli")]
fn print_info() {
    println!("sheetcfg - Spreadsheet table compiler");
    println!("Version: {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Sheet layout:");
    println!("  row 1  export filter (columns whose cell contains the tag)");
    println!("  row 2  field name");
    println!("  row 3  type");
    println!("  row 4  description");
    println!("  row 5+ data");
    println!();
    println!(
        "Tag '{}' writes JSON only unless emit_code = true is configured.",
        SERVER_TAG
    );
    println!();
    println!("Column types:");
    let primitives: Vec<&str> = Primitive::ALL.iter().map(|p| p.name()).collect();
    println!("  P          {}", primitives.join(", "));
    println!("             aliases: int = int32, float = float32");
    println!("  []P        list");
    println!("  [][]P      list of lists");
    println!("  map[K]V    map");
    println!();
    println!("Cell delimiters:");
    println!("  []P        items by '{}'", LIST_DELIMITER);
    println!(
        "  [][]P      groups by '{}', items by '{}'",
        GROUP_DELIMITER, LIST_DELIMITER
    );
    println!(
        "  map[K]V    pairs by '{}', key and value by '{}'",
        PAIR_DELIMITER, KEY_VALUE_DELIMITER
    );
    println!();
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Build with --features cli");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  cargo install sheetcfg --features cli");
    eprintln!("  sheetcfg [OPTIONS] [COMMAND]");
}
