//! Finalized mesh input.
//!
//! The editor side hands the exporter a mesh that is already boolean-
//! combined and triangulated, with per-face material slots and per-corner
//! UVs. This type is that contract; the exporter never builds or edits
//! geometry itself.

use glam::{Vec2, Vec3};

/// One face-corner: a reference to a vertex plus the UV this face assigns
/// to it. Corners on different faces may share the vertex but not the UV.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Corner {
    /// Index into [`TriMesh::positions`].
    pub vertex: usize,
    /// Texture coordinate for this corner, editor convention (V up).
    pub uv: Vec2,
}

impl Corner {
    pub fn new(vertex: usize, uv: Vec2) -> Self {
        Self { vertex, uv }
    }
}

/// One polygon: a material slot and an ordered ring of corners.
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    /// Index into [`TriMesh::materials`].
    pub material: usize,
    /// Corner ring in editor winding order.
    pub corners: Vec<Corner>,
}

impl Face {
    pub fn new(material: usize, corners: Vec<Corner>) -> Self {
        Self { material, corners }
    }
}

/// A finalized mesh in editor units.
#[derive(Debug, Clone, Default)]
pub struct TriMesh {
    /// Vertex positions.
    pub positions: Vec<Vec3>,
    /// Per-vertex normals, parallel to `positions`.
    pub normals: Vec<Vec3>,
    /// Polygon list.
    pub faces: Vec<Face>,
    /// Material slot names referenced by `Face::material`.
    pub materials: Vec<String>,
}

impl TriMesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of face-corners, which is also the encoded vertex count.
    pub fn corner_count(&self) -> usize {
        self.faces.iter().map(|f| f.corners.len()).sum()
    }

    /// Check if there is nothing to encode.
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }
}
