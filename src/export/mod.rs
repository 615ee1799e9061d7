//! Map export pipeline.
//!
//! Converts finalized meshes into the engine's vertex-split primitive form
//! and assembles primitives plus entity records into a map document, with
//! two serialization targets: the legacy brace-delimited text format and
//! the JSON document format.

pub mod document;
pub mod json;
pub mod mesh;
pub mod primitive;
pub mod text;

pub use document::{EntityKind, LightParams, MapDocument, MapEntity, MAP_VERSION};
pub use json::{json_string, write_json};
pub use mesh::{Corner, Face, TriMesh};
pub use primitive::{encode_primitive, Polygon, Primitive, PrimitiveVert};
pub use text::{text_string, write_text};

use glam::Vec3;

/// Editor units to engine units. One editor unit is 64 game units; the same
/// factor applies to positions, origins and light radii on the way out.
pub const SCALE_TO_GAME: f32 = 64.0;

/// Format a float the way the engine's map writer does: six decimal places
/// with trailing zeros and a trailing point trimmed (`4.000000` -> `4`,
/// `4.500000` -> `4.5`). Negative zero keeps its sign (`-0`).
pub fn ftos(value: f32) -> String {
    let formatted = format!("{value:.6}");
    formatted
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

/// Three floats, space-separated, `ftos`-formatted.
pub fn vec3_string(v: Vec3) -> String {
    format!("{} {} {}", ftos(v.x), ftos(v.y), ftos(v.z))
}
