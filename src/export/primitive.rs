//! Geometry primitive encoder.
//!
//! The engine's mesh primitives index a flat vertex buffer in which
//! position/normal data is welded to a single UV, while the editor keeps
//! UVs per face-corner. Encoding therefore splits shared vertices: every
//! face-corner gets its own output vertex, emitted grouped by original
//! vertex in first-encountered corner order. Output vertex count equals
//! total corner count; collapsing corners that share both position and UV
//! is deliberately left to the engine's own compiler.

use std::collections::HashMap;

use glam::Affine3A;
use serde::{Deserialize, Serialize};

use crate::error::{ForgeError, Result};
use crate::export::mesh::TriMesh;
use crate::export::SCALE_TO_GAME;

/// One vertex of an encoded primitive: position in game units, texture
/// coordinate with V flipped to engine convention, and normal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PrimitiveVert {
    pub xyz: [f32; 3],
    pub st: [f32; 2],
    pub normal: [f32; 3],
}

/// One polygon of an encoded primitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    /// Material decl name.
    pub material: String,
    /// Vertex-buffer indices, wound opposite to the editor mesh.
    pub indices: Vec<u32>,
}

/// An encoded mesh primitive, ready for either serialization target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Primitive {
    /// Position among the owning entity's primitives.
    pub primitive: usize,
    pub verts: Vec<PrimitiveVert>,
    pub polygons: Vec<Polygon>,
}

/// Encode a finalized mesh as primitive number `index`.
///
/// `transform` is applied to positions (and, by its rotation, to normals)
/// before scaling; brush entities pass the inverse of their placement here
/// so geometry lands in entity-local space.
pub fn encode_primitive(
    mesh: &TriMesh,
    transform: Option<&Affine3A>,
    index: usize,
) -> Result<Primitive> {
    if mesh.normals.len() != mesh.positions.len() {
        return Err(ForgeError::Export {
            message: format!(
                "mesh has {} normals for {} positions",
                mesh.normals.len(),
                mesh.positions.len()
            ),
        });
    }

    // collect each vertex's corners in face order, so split vertices come
    // out grouped by their original vertex
    let mut corner_refs: Vec<Vec<(usize, usize)>> = vec![Vec::new(); mesh.positions.len()];
    for (face_idx, face) in mesh.faces.iter().enumerate() {
        if face.material >= mesh.materials.len() {
            return Err(ForgeError::Export {
                message: format!(
                    "face {} references material slot {} of {}",
                    face_idx,
                    face.material,
                    mesh.materials.len()
                ),
            });
        }
        for (corner_idx, corner) in face.corners.iter().enumerate() {
            if corner.vertex >= mesh.positions.len() {
                return Err(ForgeError::Export {
                    message: format!(
                        "face {} references vertex {} of {}",
                        face_idx,
                        corner.vertex,
                        mesh.positions.len()
                    ),
                });
            }
            corner_refs[corner.vertex].push((face_idx, corner_idx));
        }
    }

    let mut verts = Vec::with_capacity(mesh.corner_count());
    let mut slot_of: HashMap<(usize, usize), u32> = HashMap::with_capacity(mesh.corner_count());
    for (vertex_idx, refs) in corner_refs.iter().enumerate() {
        for &(face_idx, corner_idx) in refs {
            slot_of.insert((face_idx, corner_idx), verts.len() as u32);

            let mut position = mesh.positions[vertex_idx];
            let mut normal = mesh.normals[vertex_idx];
            if let Some(t) = transform {
                position = t.transform_point3(position);
                normal = t.transform_vector3(normal).normalize_or_zero();
            }
            let uv = mesh.faces[face_idx].corners[corner_idx].uv;
            verts.push(PrimitiveVert {
                xyz: (position * SCALE_TO_GAME).to_array(),
                st: [uv.x, 1.0 - uv.y],
                normal: normal.to_array(),
            });
        }
    }

    let polygons = mesh
        .faces
        .iter()
        .enumerate()
        .map(|(face_idx, face)| Polygon {
            material: mesh.materials[face.material].clone(),
            indices: (0..face.corners.len())
                .rev()
                .map(|corner_idx| slot_of[&(face_idx, corner_idx)])
                .collect(),
        })
        .collect();

    Ok(Primitive {
        primitive: index,
        verts,
        polygons,
    })
}
