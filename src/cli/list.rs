//! List command implementation.
//!
//! Imports decls from a game directory and prints a sorted listing to
//! stdout: material names (optionally restricted to one decl path), entity
//! classes with their inheritance parent, or the set of material decl
//! paths.

use std::fs;
use std::path::PathBuf;

use clap::{Args, ValueEnum};

use crate::discovery::SearchPaths;
use crate::error::Result;
use crate::output::{plural, Printer};
use crate::registry::{DeclRegistry, MaterialDecl};

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum ListKind {
    /// Material decl names
    Materials,
    /// Entity class names
    Entities,
    /// Material decl directory paths
    Paths,
}

/// List imported decls
#[derive(Args, Debug)]
pub struct ListArgs {
    /// What to list
    #[arg(value_enum)]
    pub kind: ListKind,

    /// Game base directory (contains base/, basedev/)
    pub game_path: PathBuf,

    /// Mod directory to search before basedev and base
    #[arg(long)]
    pub mod_dir: Option<String>,

    /// Only materials under this decl path (e.g. textures/base_wall)
    #[arg(long)]
    pub path: Option<String>,
}

pub fn run(args: ListArgs) -> Result<()> {
    let printer = Printer::new();
    let paths = SearchPaths::new(&args.game_path, args.mod_dir.as_deref());
    let mut registry = DeclRegistry::new();

    let files = match args.kind {
        ListKind::Materials | ListKind::Paths => paths.find_material_files(),
        ListKind::Entities => paths.find_entity_files(),
    };
    let mut skipped = 0usize;
    for path in &files {
        let source = match fs::read_to_string(path) {
            Ok(source) => source,
            Err(_) => {
                skipped += 1;
                continue;
            }
        };
        let result = match args.kind {
            ListKind::Materials | ListKind::Paths => registry.import_materials(&source),
            ListKind::Entities => registry.import_entities(&source),
        };
        if result.is_err() {
            skipped += 1;
        }
    }
    if skipped > 0 {
        printer.warning("Skipped", &plural(skipped, "unreadable file", "unreadable files"));
    }

    match args.kind {
        ListKind::Materials => {
            let mut names: Vec<&str> = registry
                .material_names()
                .filter(|name| match &args.path {
                    Some(path) => MaterialDecl::decl_path(name) == path,
                    None => true,
                })
                .collect();
            names.sort_unstable();
            for name in names {
                println!("{name}");
            }
        }
        ListKind::Entities => {
            let mut names: Vec<&str> = registry.entity_names().collect();
            names.sort_unstable();
            for name in names {
                match registry.get_entity(name).and_then(|e| e.inherit()) {
                    Some(parent) => println!("{name} (inherits {parent})"),
                    None => println!("{name}"),
                }
            }
        }
        ListKind::Paths => {
            for path in registry.material_decl_paths() {
                println!("{path}");
            }
        }
    }

    Ok(())
}
