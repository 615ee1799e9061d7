//! Declaration record types.

use std::collections::HashMap;

/// A parsed material declaration.
///
/// Texture fields are empty strings until a matching keyword or stage is
/// seen; re-importing a file that dropped a keyword leaves the old value in
/// place (fields are only ever overwritten, never cleared).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaterialDecl {
    /// Diffuse stage texture.
    pub diffuse_texture: String,

    /// Normal/bump stage texture.
    pub normal_texture: String,

    /// Specular stage texture.
    pub specular_texture: String,

    /// `qer_editorimage` preview texture.
    pub editor_texture: String,

    /// Any stage texture map, last stage wins. Doubles as the light
    /// projection texture for light materials.
    pub texture: String,

    /// Displacement scale; zero unless `normal_texture` came from a
    /// `heightmap(...)` stage.
    pub heightmap_scale: f32,
}

impl MaterialDecl {
    /// Directory prefix of a path-qualified decl name
    /// (`textures/base_wall/lfwall13f3` -> `textures/base_wall`).
    pub fn decl_path(name: &str) -> &str {
        match name.rfind('/') {
            Some(idx) => &name[..idx],
            None => "",
        }
    }
}

/// A parsed entity-class declaration.
///
/// Only the restricted key set survives parsing: keys prefixed `editor_`,
/// plus `inherit` and `model`. Lookup through the inheritance chain lives on
/// [`crate::registry::DeclRegistry`], which owns the full class table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityDecl {
    keys: HashMap<String, String>,
}

impl EntityDecl {
    /// Look up a key on this class only (no inheritance).
    pub fn get(&self, key: &str) -> Option<&str> {
        self.keys.get(key).map(|s| s.as_str())
    }

    /// The parent class named by `inherit`, if any.
    pub fn inherit(&self) -> Option<&str> {
        self.get("inherit")
    }

    /// Store a key/value pair, overwriting any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.keys.insert(key.into(), value.into());
    }

    /// Iterate over the stored pairs (order is unspecified).
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.keys.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of stored pairs.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether no pairs are stored.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decl_path() {
        assert_eq!(
            MaterialDecl::decl_path("textures/base_wall/lfwall13f3"),
            "textures/base_wall"
        );
        assert_eq!(MaterialDecl::decl_path("flat"), "");
    }

    #[test]
    fn test_entity_decl_overwrite() {
        let mut decl = EntityDecl::default();
        decl.insert("model", "a.lwo");
        decl.insert("model", "b.lwo");
        assert_eq!(decl.get("model"), Some("b.lwo"));
        assert_eq!(decl.len(), 1);
    }
}
