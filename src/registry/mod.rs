//! Declaration registry.
//!
//! The registry owns the scene-wide material and entity-class tables that
//! the decl parsers populate. Callers keep one registry per project/session
//! and feed it files one at a time; created/updated counts come back from
//! each import call rather than living in shared state.

pub mod types;

use std::collections::{HashMap, HashSet};

use crate::error::Result;
use crate::parser::{parse_entity_source, parse_material_source, FileStats};

pub use types::{EntityDecl, MaterialDecl};

/// Caller-owned storage for all imported declarations.
#[derive(Debug, Default)]
pub struct DeclRegistry {
    materials: HashMap<String, MaterialDecl>,
    entities: HashMap<String, EntityDecl>,
}

impl DeclRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse one material file's source into the material table.
    pub fn import_materials(&mut self, source: &str) -> Result<FileStats> {
        parse_material_source(source, &mut self.materials)
    }

    /// Parse one entity def file's source into the entity table.
    pub fn import_entities(&mut self, source: &str) -> Result<FileStats> {
        parse_entity_source(source, &mut self.entities)
    }

    /// Get a material decl by its path-qualified name.
    pub fn get_material(&self, name: &str) -> Option<&MaterialDecl> {
        self.materials.get(name)
    }

    /// Get an entity class by name.
    pub fn get_entity(&self, name: &str) -> Option<&EntityDecl> {
        self.entities.get(name)
    }

    /// All material decl names.
    pub fn material_names(&self) -> impl Iterator<Item = &str> {
        self.materials.keys().map(|s| s.as_str())
    }

    /// All entity class names.
    pub fn entity_names(&self) -> impl Iterator<Item = &str> {
        self.entities.keys().map(|s| s.as_str())
    }

    /// Direct access to the material table, for parsing without a registry.
    pub fn materials(&self) -> &HashMap<String, MaterialDecl> {
        &self.materials
    }

    /// Resolve an entity property through the inheritance chain.
    ///
    /// Looks the key up on the named class; on a miss, follows `inherit` to
    /// the parent class, to arbitrary depth. A class revisited along the
    /// chain ends the walk (the decl format does not define cyclic
    /// inheritance; without the guard a cycle would recurse forever).
    pub fn entity_property(&self, class: &str, key: &str) -> Option<&str> {
        let mut visited: HashSet<&str> = HashSet::new();
        let mut current = class;
        loop {
            if !visited.insert(current) {
                return None;
            }
            let decl = self.entities.get(current)?;
            if let Some(value) = decl.get(key) {
                return Some(value);
            }
            current = decl.inherit()?;
        }
    }

    /// Distinct `textures/...` directory prefixes across all material decls,
    /// sorted. Drives the per-path material listing.
    pub fn material_decl_paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self
            .materials
            .keys()
            .map(|name| MaterialDecl::decl_path(name))
            .filter(|path| path.starts_with("textures"))
            .map(str::to_string)
            .collect();
        paths.sort();
        paths.dedup();
        paths
    }

    /// Total number of imported decls.
    pub fn len(&self) -> usize {
        self.materials.len() + self.entities.len()
    }

    /// Check if nothing has been imported.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
