//! Legacy brace-delimited map writer.
//!
//! The engine's legacy text format: a `Version 3` header, one block per
//! entity, and `meshDef` sections for worldspawn primitives. Additional
//! entities are key/value blocks only. Spacing and field order are part of
//! the format; all numbers go through [`ftos`](crate::export::ftos).

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::error::{ForgeError, Result};
use crate::export::document::{rotation_rows, EntityKind, MapDocument, MapEntity};
use crate::export::primitive::Primitive;
use crate::export::{ftos, vec3_string, MAP_VERSION, SCALE_TO_GAME};

/// Serialize a document to the legacy text form.
pub fn text_string(doc: &MapDocument) -> String {
    let mut out = String::new();

    writeln!(out, "Version {MAP_VERSION}").unwrap();

    // entity 0
    out.push_str("{\n");
    out.push_str("\"classname\" \"worldspawn\"\n");
    for primitive in &doc.worldspawn {
        out.push_str("{\n");
        write_mesh(&mut out, primitive);
        out.push_str("}\n");
    }
    out.push_str("}\n");

    for entity in &doc.entities {
        write_entity(&mut out, entity);
    }

    out
}

/// Write the legacy text form to `path`.
pub fn write_text(doc: &MapDocument, path: &Path) -> Result<()> {
    fs::write(path, text_string(doc)).map_err(|e| ForgeError::Io {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

fn write_mesh(out: &mut String, primitive: &Primitive) {
    out.push_str(" meshDef\n");
    out.push_str(" {\n");
    writeln!(
        out,
        "  ( {} {} 0 0 0 )",
        primitive.verts.len(),
        primitive.polygons.len()
    )
    .unwrap();

    // vertices
    out.push_str("  (\n");
    for vert in &primitive.verts {
        writeln!(
            out,
            "   ( {} {} {} {} {} {} {} {} )",
            ftos(vert.xyz[0]),
            ftos(vert.xyz[1]),
            ftos(vert.xyz[2]),
            ftos(vert.st[0]),
            ftos(vert.st[1]),
            ftos(vert.normal[0]),
            ftos(vert.normal[1]),
            ftos(vert.normal[2]),
        )
        .unwrap();
    }
    out.push_str("  )\n");

    // polygons
    out.push_str("  (\n");
    for polygon in &primitive.polygons {
        write!(out, "   \"{}\" {} = ", polygon.material, polygon.indices.len()).unwrap();
        for index in &polygon.indices {
            write!(out, "{index} ").unwrap();
        }
        out.push('\n');
    }
    out.push_str("  )\n");

    out.push_str(" }\n");
}

fn write_entity(out: &mut String, entity: &MapEntity) {
    out.push_str("{\n");
    write_pair(out, "classname", &entity.classname);
    write_pair(out, "name", &entity.name);
    write_pair(out, "origin", &vec3_string(entity.origin * SCALE_TO_GAME));

    match &entity.kind {
        EntityKind::Point | EntityKind::Brush { .. } => {
            if entity.angle != 0.0 {
                write_pair(out, "angle", &ftos(entity.angle));
            }
            for (key, value) in entity.visible_properties() {
                write_pair(out, key, value);
            }
            if matches!(entity.kind, EntityKind::Brush { .. }) {
                // a brush entity's model reference is its own name
                write_pair(out, "model", &entity.name);
            }
        }
        EntityKind::StaticModel { model, rotation } => {
            write_pair(out, "model", model);
            let rows = rotation_rows(rotation);
            let rotation_value = format!(
                "{} {} {}",
                vec3_string(rows[0]),
                vec3_string(rows[1]),
                vec3_string(rows[2])
            );
            write_pair(out, "rotation", &rotation_value);
        }
        EntityKind::Light(params) => {
            write_pair(out, "light_center", "0 0 0");
            let radius = ftos(params.radius * SCALE_TO_GAME);
            write_pair(out, "light_radius", &format!("{radius} {radius} {radius}"));
            write_pair(out, "_color", &vec3_string(params.color));
            write_pair(out, "nospecular", flag(params.cast_specular));
            write_pair(out, "nodiffuse", flag(params.cast_diffuse));
            if let Some(texture) = &params.texture {
                write_pair(out, "texture", texture);
            }
        }
    }

    out.push_str("}\n");
}

fn write_pair(out: &mut String, key: &str, value: &str) {
    writeln!(out, "\"{key}\" \"{value}\"").unwrap();
}

/// Lights store the inverted sense: `nospecular`/`nodiffuse`.
fn flag(cast: bool) -> &'static str {
    if cast {
        "0"
    } else {
        "1"
    }
}
