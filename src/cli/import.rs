//! Import command implementation.
//!
//! Scans the game's search directories for decl files and parses them all
//! into one registry, reporting created/updated totals. A file that fails
//! to parse is reported and skipped; the rest of the batch continues.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;

use crate::discovery::SearchPaths;
use crate::error::{ForgeError, Result};
use crate::output::{plural, Printer};
use crate::parser::FileStats;
use crate::registry::DeclRegistry;

/// Import material and entity decls from a game directory
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Game base directory (contains base/, basedev/)
    pub game_path: PathBuf,

    /// Mod directory to search before basedev and base
    #[arg(long)]
    pub mod_dir: Option<String>,

    /// Import only material decls
    #[arg(long)]
    pub materials: bool,

    /// Import only entity decls
    #[arg(long)]
    pub entities: bool,
}

/// Outcome of one batch import.
#[derive(Debug, Default)]
pub struct ImportReport {
    pub materials: FileStats,
    pub entities: FileStats,
    pub failed: Vec<(PathBuf, ForgeError)>,
}

pub fn run(args: ImportArgs) -> Result<()> {
    let printer = Printer::new();
    let start = Instant::now();

    let paths = SearchPaths::new(&args.game_path, args.mod_dir.as_deref());
    let mut registry = DeclRegistry::new();

    let both = args.materials == args.entities;
    let mut report = ImportReport::default();

    if both || args.materials {
        import_files(
            &printer,
            &paths.find_material_files(),
            &mut report,
            |source, report| {
                let stats = registry.import_materials(source)?;
                report.materials.merge(stats);
                Ok(stats)
            },
        );
    }
    if both || args.entities {
        import_files(
            &printer,
            &paths.find_entity_files(),
            &mut report,
            |source, report| {
                let stats = registry.import_entities(source)?;
                report.entities.merge(stats);
                Ok(stats)
            },
        );
    }

    let elapsed = start.elapsed().as_secs_f32();
    printer.status(
        "Imported",
        &format!(
            "{} ({} updated), {} ({} updated) in {:.2}s",
            plural(report.materials.created, "material", "materials"),
            report.materials.updated,
            plural(report.entities.created, "entity", "entities"),
            report.entities.updated,
            elapsed
        ),
    );

    if !report.failed.is_empty() {
        printer.warning(
            "Skipped",
            &format!("{} (parse errors above)", plural(report.failed.len(), "file", "files")),
        );
    }

    Ok(())
}

fn import_files<F>(printer: &Printer, files: &[PathBuf], report: &mut ImportReport, mut parse: F)
where
    F: FnMut(&str, &mut ImportReport) -> Result<FileStats>,
{
    for path in files {
        match read_and_parse(path, report, &mut parse) {
            Ok(stats) => {
                printer.status(
                    "Parsing",
                    &format!("{} ({} decls)", display_name(path), stats.total()),
                );
            }
            Err(e) => {
                printer.error("Failed", &format!("{}: {}", path.display(), e));
                report.failed.push((path.clone(), e));
            }
        }
    }
}

fn read_and_parse<F>(path: &Path, report: &mut ImportReport, parse: &mut F) -> Result<FileStats>
where
    F: FnMut(&str, &mut ImportReport) -> Result<FileStats>,
{
    let source = fs::read_to_string(path).map_err(|e| ForgeError::Io {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    parse(&source, report)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| path.display().to_string())
}
