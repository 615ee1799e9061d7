//! JSON map writer.
//!
//! The engine's JSON map document: `version`, then `entities`, each entity
//! carrying `entity` index, `classname` and its type-specific fields in a
//! fixed order. Key order is part of the format, so entity objects are
//! assembled as insertion-ordered JSON maps. Indentation is a presentation
//! flag with no semantic effect.

use std::fs;
use std::path::Path;

use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::error::{ForgeError, Result};
use crate::export::document::{rotation_rows, EntityKind, MapDocument, MapEntity};
use crate::export::{ftos, vec3_string, MAP_VERSION, SCALE_TO_GAME};

/// Serialize a document to a JSON string.
pub fn json_string(doc: &MapDocument, indent: bool) -> Result<String> {
    let value = document_value(doc)?;
    if indent {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        value.serialize(&mut ser).map_err(export_error)?;
        String::from_utf8(buf).map_err(|e| ForgeError::Export {
            message: e.to_string(),
        })
    } else {
        serde_json::to_string(&value).map_err(export_error)
    }
}

/// Write the JSON form to `path`.
pub fn write_json(doc: &MapDocument, path: &Path, indent: bool) -> Result<()> {
    let text = json_string(doc, indent)?;
    fs::write(path, text).map_err(|e| ForgeError::Io {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

fn export_error(e: serde_json::Error) -> ForgeError {
    ForgeError::Export {
        message: e.to_string(),
    }
}

fn document_value(doc: &MapDocument) -> Result<Value> {
    let mut entities = Vec::with_capacity(doc.entities.len() + 1);

    let mut worldspawn = Map::new();
    worldspawn.insert("entity".to_string(), json!(0));
    worldspawn.insert("classname".to_string(), json!("worldspawn"));
    worldspawn.insert(
        "primitives".to_string(),
        serde_json::to_value(&doc.worldspawn).map_err(export_error)?,
    );
    entities.push(Value::Object(worldspawn));

    for (offset, entity) in doc.entities.iter().enumerate() {
        entities.push(entity_value(entity, offset + 1)?);
    }

    Ok(json!({
        "version": MAP_VERSION,
        "entities": entities,
    }))
}

fn entity_value(entity: &MapEntity, index: usize) -> Result<Value> {
    let mut map = Map::new();
    map.insert("entity".to_string(), json!(index));
    map.insert("classname".to_string(), json!(entity.classname));
    map.insert("name".to_string(), json!(entity.name));
    map.insert(
        "origin".to_string(),
        json!(vec3_string(entity.origin * SCALE_TO_GAME)),
    );

    match &entity.kind {
        EntityKind::Point | EntityKind::Brush { .. } => {
            if entity.angle != 0.0 {
                map.insert("angle".to_string(), json!(ftos(entity.angle)));
            }
            for (key, value) in entity.visible_properties() {
                map.insert(key.to_string(), json!(value));
            }
            if let EntityKind::Brush { primitives } = &entity.kind {
                // a brush entity's model reference is its own name
                map.insert("model".to_string(), json!(entity.name));
                map.insert(
                    "primitives".to_string(),
                    serde_json::to_value(primitives).map_err(export_error)?,
                );
            }
        }
        EntityKind::StaticModel { model, rotation } => {
            map.insert("model".to_string(), json!(model));
            let rows = rotation_rows(rotation);
            map.insert(
                "rotation".to_string(),
                json!(format!(
                    "{} {} {}",
                    vec3_string(rows[0]),
                    vec3_string(rows[1]),
                    vec3_string(rows[2])
                )),
            );
        }
        EntityKind::Light(params) => {
            map.insert("light_center".to_string(), json!("0 0 0"));
            let radius = ftos(params.radius * SCALE_TO_GAME);
            map.insert(
                "light_radius".to_string(),
                json!(format!("{radius} {radius} {radius}")),
            );
            map.insert("_color".to_string(), json!(vec3_string(params.color)));
            map.insert("nospecular".to_string(), json!(flag(params.cast_specular)));
            map.insert("nodiffuse".to_string(), json!(flag(params.cast_diffuse)));
            if let Some(texture) = &params.texture {
                map.insert("texture".to_string(), json!(texture));
            }
        }
    }

    Ok(Value::Object(map))
}

fn flag(cast: bool) -> &'static str {
    if cast {
        "0"
    } else {
        "1"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::mesh::{Corner, Face, TriMesh};
    use crate::export::primitive::{encode_primitive, Primitive};
    use glam::{Vec2, Vec3};
    use pretty_assertions::assert_eq;

    fn quad_primitive() -> Primitive {
        let mesh = TriMesh {
            positions: vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ],
            normals: vec![Vec3::Z; 4],
            faces: vec![Face::new(
                0,
                vec![
                    Corner::new(0, Vec2::new(0.0, 0.0)),
                    Corner::new(1, Vec2::new(1.0, 0.0)),
                    Corner::new(2, Vec2::new(1.0, 1.0)),
                    Corner::new(3, Vec2::new(0.0, 1.0)),
                ],
            )],
            materials: vec!["textures/base_wall/a".to_string()],
        };
        encode_primitive(&mesh, None, 0).unwrap()
    }

    #[test]
    fn test_key_order_is_contractual() {
        let doc = MapDocument::new(vec![quad_primitive()]);
        let text = json_string(&doc, false).unwrap();
        assert!(text.starts_with(
            "{\"version\":3,\"entities\":[{\"entity\":0,\"classname\":\"worldspawn\",\"primitives\":["
        ));
    }

    #[test]
    fn test_entity_field_order() {
        let mut doc = MapDocument::new(vec![]);
        doc.push_entity(
            MapEntity::point("info_player_start", "start_1", Vec3::new(1.0, 0.0, 0.0))
                .with_angle(45.0)
                .with_properties(vec![("custom_skin".to_string(), "red".to_string())]),
        );

        let text = json_string(&doc, false).unwrap();
        let tail = text.split("},").nth(1).unwrap();
        assert!(tail.starts_with(
            "{\"entity\":1,\"classname\":\"info_player_start\",\"name\":\"start_1\",\
             \"origin\":\"64 0 0\",\"angle\":\"45\",\"skin\":\"red\"}"
        ));
    }

    #[test]
    fn test_angle_omitted_when_zero() {
        let mut doc = MapDocument::new(vec![]);
        doc.push_entity(MapEntity::point("info_null", "n", Vec3::ZERO));
        let text = json_string(&doc, false).unwrap();
        assert!(!text.contains("\"angle\""));
    }

    #[test]
    fn test_round_trip_preserves_verts_and_winding() {
        let primitive = quad_primitive();
        let doc = MapDocument::new(vec![primitive.clone()]);
        let text = json_string(&doc, true).unwrap();

        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["version"], 3);
        let parsed: Primitive =
            serde_json::from_value(value["entities"][0]["primitives"][0].clone()).unwrap();

        assert_eq!(parsed.verts, primitive.verts);
        assert_eq!(parsed.polygons, primitive.polygons);
        assert_eq!(parsed.verts[1].xyz, [64.0, 0.0, 0.0]);
        assert_eq!(parsed.polygons[0].indices, vec![3, 2, 1, 0]);
    }

    #[test]
    fn test_indent_flag_has_no_semantic_effect() {
        let doc = MapDocument::new(vec![quad_primitive()]);
        let compact: Value =
            serde_json::from_str(&json_string(&doc, false).unwrap()).unwrap();
        let pretty: Value = serde_json::from_str(&json_string(&doc, true).unwrap()).unwrap();
        assert_eq!(compact, pretty);
    }

    #[test]
    fn test_indented_output_uses_tabs() {
        let doc = MapDocument::new(vec![]);
        let text = json_string(&doc, true).unwrap();
        assert!(text.contains("\n\t\"version\""));
    }

    #[test]
    fn test_write_json_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        let doc = MapDocument::new(vec![quad_primitive()]);

        write_json(&doc, &path, false).unwrap();
        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written, json_string(&doc, false).unwrap());
    }
}
