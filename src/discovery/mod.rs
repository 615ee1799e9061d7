//! Decl file discovery.
//!
//! The engine resolves assets through an ordered list of search
//! directories under the game root: an optional mod directory first, then
//! `basedev`, then `base`. A file whose basename already appeared in a
//! higher-priority directory is shadowed and must not be parsed again.

use std::collections::HashSet;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Subdirectory and extension of material decl files.
pub const MATERIAL_DIR: &str = "materials";
pub const MATERIAL_EXT: &str = "mtr";

/// Subdirectory and extension of entity decl files.
pub const ENTITY_DIR: &str = "def";
pub const ENTITY_EXT: &str = "def";

/// Ordered search directories under a game root, highest priority first.
#[derive(Debug, Clone)]
pub struct SearchPaths {
    dirs: Vec<PathBuf>,
}

impl SearchPaths {
    pub fn new(game_root: &Path, mod_dir: Option<&str>) -> Self {
        let mut dirs = Vec::new();
        if let Some(mod_dir) = mod_dir {
            dirs.push(game_root.join(mod_dir));
        }
        dirs.push(game_root.join("basedev"));
        dirs.push(game_root.join("base"));
        Self { dirs }
    }

    /// The search directories, highest priority first.
    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// Collect decl files under `subdir` with the given extension across
    /// all search directories, shadowed basenames excluded. Files within
    /// one directory come back in name order so runs are deterministic.
    pub fn find_decl_files(&self, subdir: &str, extension: &str) -> Vec<PathBuf> {
        let mut touched: HashSet<OsString> = HashSet::new();
        let mut found = Vec::new();

        for dir in &self.dirs {
            let root = dir.join(subdir);
            if !root.is_dir() {
                continue;
            }
            for entry in WalkDir::new(&root)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|e| e.ok())
            {
                if !entry.file_type().is_file() {
                    continue;
                }
                if entry.path().extension().and_then(|e| e.to_str()) != Some(extension) {
                    continue;
                }
                if touched.insert(entry.file_name().to_os_string()) {
                    found.push(entry.into_path());
                }
            }
        }

        found
    }

    /// All material decl files in search order.
    pub fn find_material_files(&self) -> Vec<PathBuf> {
        self.find_decl_files(MATERIAL_DIR, MATERIAL_EXT)
    }

    /// All entity decl files in search order.
    pub fn find_entity_files(&self) -> Vec<PathBuf> {
        self.find_decl_files(ENTITY_DIR, ENTITY_EXT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    #[test]
    fn test_find_material_files() {
        let root = tempdir().unwrap();
        touch(&root.path().join("base/materials/base_wall.mtr"));
        touch(&root.path().join("base/materials/rock.mtr"));
        touch(&root.path().join("base/materials/readme.txt"));

        let paths = SearchPaths::new(root.path(), None);
        let files = paths.find_material_files();
        assert_eq!(files.len(), 2);
        assert!(files[0].ends_with("base/materials/base_wall.mtr"));
        assert!(files[1].ends_with("base/materials/rock.mtr"));
    }

    #[test]
    fn test_higher_priority_dir_shadows_basename() {
        let root = tempdir().unwrap();
        touch(&root.path().join("mymod/materials/base_wall.mtr"));
        touch(&root.path().join("base/materials/base_wall.mtr"));
        touch(&root.path().join("base/materials/only_base.mtr"));

        let paths = SearchPaths::new(root.path(), Some("mymod"));
        let files = paths.find_material_files();
        assert_eq!(files.len(), 2);
        assert!(files[0].ends_with("mymod/materials/base_wall.mtr"));
        assert!(files[1].ends_with("base/materials/only_base.mtr"));
    }

    #[test]
    fn test_missing_search_dirs_are_skipped() {
        let root = tempdir().unwrap();
        touch(&root.path().join("base/def/monsters.def"));

        let paths = SearchPaths::new(root.path(), Some("no_such_mod"));
        let files = paths.find_entity_files();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_search_dir_order() {
        let root = tempdir().unwrap();
        let paths = SearchPaths::new(root.path(), Some("mymod"));
        let dirs: Vec<_> = paths
            .dirs()
            .iter()
            .map(|d| d.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(dirs, vec!["mymod", "basedev", "base"]);
    }
}
