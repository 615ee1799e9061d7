//! mapforge - idTech decl importer and map exporter
//!
//! A library for parsing the engine's text declaration files (material and
//! entity definitions) and exporting editor geometry and entities into the
//! engine's map document formats.

pub mod cli;
pub mod discovery;
pub mod error;
pub mod export;
pub mod lexer;
pub mod output;
pub mod parser;
pub mod registry;

pub use discovery::SearchPaths;
pub use error::{ForgeError, Result};
pub use export::{
    encode_primitive, ftos, json_string, text_string, write_json, write_text, Corner, EntityKind,
    Face, LightParams, MapDocument, MapEntity, Polygon, Primitive, PrimitiveVert, TriMesh,
    MAP_VERSION, SCALE_TO_GAME,
};
pub use lexer::Lexer;
pub use parser::{parse_entity_source, parse_material_source, FileStats};
pub use registry::{DeclRegistry, EntityDecl, MaterialDecl};
