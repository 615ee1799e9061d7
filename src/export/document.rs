//! Map document assembly.
//!
//! A document is version 3 plus an ordered entity list. Entity 0 is always
//! `worldspawn` and owns the top-level primitives; the rest are point
//! entities, brush entities (with their own object-space primitives),
//! static models, or lights. Construction happens here; the text and JSON
//! writers only walk the finished document.

use std::collections::HashMap;

use glam::{EulerRot, Mat3, Vec3};

use crate::error::{ForgeError, Result};
use crate::export::primitive::Primitive;
use crate::registry::MaterialDecl;

/// Map format version written by both serialization targets.
pub const MAP_VERSION: u32 = 3;

/// Storage prefixes stripped from property names on the way out.
const STRIP_PREFIXES: [&str; 2] = ["inherited_", "custom_"];

/// Parameters of a light entity.
#[derive(Debug, Clone, PartialEq)]
pub struct LightParams {
    /// Falloff radius in editor units; written as a uniform triplet.
    pub radius: f32,
    /// Light color, 0..1 per channel.
    pub color: Vec3,
    /// Whether the light contributes specular; `nospecular` inverts this.
    pub cast_specular: bool,
    /// Whether the light contributes diffuse; `nodiffuse` inverts this.
    pub cast_diffuse: bool,
    /// Light projection material, when not the engine default.
    pub texture: Option<String>,
}

/// What an entity carries besides classname/name/origin.
#[derive(Debug, Clone, PartialEq)]
pub enum EntityKind {
    /// Plain point entity.
    Point,
    /// Brush entity; primitives are pre-encoded in entity-local space and
    /// the entity's own name doubles as its model reference.
    Brush { primitives: Vec<Primitive> },
    /// Static model placement. The rotation matrix is already in engine
    /// convention (each editor rotation axis negated).
    StaticModel { model: String, rotation: Mat3 },
    /// Light source.
    Light(LightParams),
}

/// One non-worldspawn entity of the document.
#[derive(Debug, Clone, PartialEq)]
pub struct MapEntity {
    pub classname: String,
    pub name: String,
    /// Placement in editor units; scaled on write.
    pub origin: Vec3,
    /// Yaw in degrees; written as `angle` when non-zero (point/brush only).
    pub angle: f32,
    /// Property bag as stored on the editor object; `inherited_`/`custom_`
    /// prefixes are stripped and empty values dropped at write time.
    pub properties: Vec<(String, String)>,
    pub kind: EntityKind,
}

impl MapEntity {
    /// A plain point entity.
    pub fn point(classname: impl Into<String>, name: impl Into<String>, origin: Vec3) -> Self {
        Self {
            classname: classname.into(),
            name: name.into(),
            origin,
            angle: 0.0,
            properties: Vec::new(),
            kind: EntityKind::Point,
        }
    }

    /// A brush entity with its local-space primitives.
    pub fn brush(
        classname: impl Into<String>,
        name: impl Into<String>,
        origin: Vec3,
        primitives: Vec<Primitive>,
    ) -> Self {
        Self {
            classname: classname.into(),
            name: name.into(),
            origin,
            angle: 0.0,
            properties: Vec::new(),
            kind: EntityKind::Brush { primitives },
        }
    }

    /// A static model placement.
    ///
    /// `model` has back-slashes normalized to forward-slashes.
    /// `rotation_euler` is the editor's XYZ euler in radians; the engine
    /// expects every axis negated, which happens here.
    pub fn static_model(
        classname: impl Into<String>,
        name: impl Into<String>,
        origin: Vec3,
        model: &str,
        rotation_euler: Vec3,
    ) -> Self {
        // Rz(-z) * Ry(-y) * Rx(-x), the editor's XYZ euler order with
        // negated angles
        let rotation = Mat3::from_euler(
            EulerRot::ZYX,
            -rotation_euler.z,
            -rotation_euler.y,
            -rotation_euler.x,
        );
        Self {
            classname: classname.into(),
            name: name.into(),
            origin,
            angle: 0.0,
            properties: Vec::new(),
            kind: EntityKind::StaticModel {
                model: model.replace('\\', "/"),
                rotation,
            },
        }
    }

    /// A light entity (classname is always `light`).
    pub fn light(name: impl Into<String>, origin: Vec3, params: LightParams) -> Self {
        Self {
            classname: "light".to_string(),
            name: name.into(),
            origin,
            angle: 0.0,
            properties: Vec::new(),
            kind: EntityKind::Light(params),
        }
    }

    pub fn with_angle(mut self, degrees: f32) -> Self {
        self.angle = degrees;
        self
    }

    pub fn with_properties(mut self, properties: Vec<(String, String)>) -> Self {
        self.properties = properties;
        self
    }

    /// Property pairs as they appear in output: storage prefixes stripped,
    /// empty values dropped, insertion order preserved.
    pub fn visible_properties(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties
            .iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(key, value)| {
                let stripped = STRIP_PREFIXES
                    .iter()
                    .find_map(|prefix| key.strip_prefix(prefix))
                    .unwrap_or(key.as_str());
                (stripped, value.as_str())
            })
    }
}

/// An assembled, write-ready map document.
#[derive(Debug, Clone, Default)]
pub struct MapDocument {
    /// Entity 0's primitives.
    pub worldspawn: Vec<Primitive>,
    /// Entities 1..n in document order.
    pub entities: Vec<MapEntity>,
}

impl MapDocument {
    pub fn new(worldspawn: Vec<Primitive>) -> Self {
        Self {
            worldspawn,
            entities: Vec::new(),
        }
    }

    pub fn push_entity(&mut self, entity: MapEntity) {
        self.entities.push(entity);
    }

    /// Every primitive in the document, worldspawn first.
    pub fn primitives(&self) -> impl Iterator<Item = &Primitive> {
        self.worldspawn.iter().chain(
            self.entities.iter().filter_map(|e| match &e.kind {
                EntityKind::Brush { primitives } => Some(primitives.iter()),
                _ => None,
            })
            .flatten(),
        )
    }

    /// Check that every polygon's material has an imported decl.
    ///
    /// The encoder itself never consults the material table; callers that
    /// want the check run it between assembly and writing.
    pub fn validate_materials(&self, materials: &HashMap<String, MaterialDecl>) -> Result<()> {
        for primitive in self.primitives() {
            for polygon in &primitive.polygons {
                if !materials.contains_key(&polygon.material) {
                    return Err(ForgeError::UnknownMaterial {
                        name: polygon.material.clone(),
                        help: Some(
                            "import the material decls for this map before exporting".to_string(),
                        ),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Rows of a rotation matrix, for row-major serialization.
pub(crate) fn rotation_rows(rotation: &Mat3) -> [Vec3; 3] {
    let t = rotation.transpose();
    [t.x_axis, t.y_axis, t.z_axis]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::mesh::{Corner, Face, TriMesh};
    use crate::export::primitive::encode_primitive;
    use glam::Vec2;

    fn one_triangle(material: &str) -> Primitive {
        let mesh = TriMesh {
            positions: vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            normals: vec![Vec3::Z; 3],
            faces: vec![Face::new(
                0,
                vec![
                    Corner::new(0, Vec2::ZERO),
                    Corner::new(1, Vec2::X),
                    Corner::new(2, Vec2::Y),
                ],
            )],
            materials: vec![material.to_string()],
        };
        encode_primitive(&mesh, None, 0).unwrap()
    }

    #[test]
    fn test_visible_properties_strip_prefixes() {
        let entity = MapEntity::point("info_player_start", "start_1", Vec3::ZERO)
            .with_properties(vec![
                ("inherited_health".to_string(), "100".to_string()),
                ("custom_skin".to_string(), "red".to_string()),
                ("plain".to_string(), "value".to_string()),
                ("empty".to_string(), String::new()),
            ]);

        let visible: Vec<_> = entity.visible_properties().collect();
        assert_eq!(
            visible,
            vec![("health", "100"), ("skin", "red"), ("plain", "value")]
        );
    }

    #[test]
    fn test_static_model_normalizes_slashes() {
        let entity = MapEntity::static_model(
            "func_static",
            "rock_1",
            Vec3::ZERO,
            "models\\mapobjects\\rock.lwo",
            Vec3::ZERO,
        );
        match &entity.kind {
            EntityKind::StaticModel { model, .. } => {
                assert_eq!(model, "models/mapobjects/rock.lwo");
            }
            other => panic!("wrong kind: {other:?}"),
        }
    }

    #[test]
    fn test_static_model_rotation_negates_axes() {
        let yaw = std::f32::consts::FRAC_PI_2;
        let entity = MapEntity::static_model(
            "func_static",
            "rock_1",
            Vec3::ZERO,
            "m.lwo",
            Vec3::new(0.0, 0.0, yaw),
        );
        let EntityKind::StaticModel { rotation, .. } = &entity.kind else {
            panic!("wrong kind");
        };
        // a +90 degree editor yaw becomes a -90 degree engine rotation
        let rotated = *rotation * Vec3::X;
        assert!((rotated - Vec3::new(0.0, -1.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_zero_rotation_is_identity() {
        let entity =
            MapEntity::static_model("func_static", "r", Vec3::ZERO, "m.lwo", Vec3::ZERO);
        let EntityKind::StaticModel { rotation, .. } = &entity.kind else {
            panic!("wrong kind");
        };
        let rows = rotation_rows(rotation);
        assert_eq!(rows[0], Vec3::X);
        assert_eq!(rows[1], Vec3::Y);
        assert_eq!(rows[2], Vec3::Z);
    }

    #[test]
    fn test_primitives_iterates_worldspawn_and_brushes() {
        let mut doc = MapDocument::new(vec![one_triangle("a")]);
        doc.push_entity(MapEntity::brush(
            "func_door",
            "door_1",
            Vec3::ZERO,
            vec![one_triangle("b")],
        ));
        doc.push_entity(MapEntity::point("info_null", "n", Vec3::ZERO));

        let materials: Vec<_> = doc
            .primitives()
            .map(|p| p.polygons[0].material.clone())
            .collect();
        assert_eq!(materials, vec!["a", "b"]);
    }

    #[test]
    fn test_validate_materials_reports_missing() {
        let doc = MapDocument::new(vec![one_triangle("textures/missing")]);
        let materials = HashMap::new();
        let err = doc.validate_materials(&materials).unwrap_err();
        match err {
            ForgeError::UnknownMaterial { name, .. } => {
                assert_eq!(name, "textures/missing");
            }
            other => panic!("wrong error: {other:?}"),
        }
    }

    #[test]
    fn test_validate_materials_passes_when_imported() {
        let doc = MapDocument::new(vec![one_triangle("textures/ok")]);
        let mut materials = HashMap::new();
        materials.insert("textures/ok".to_string(), MaterialDecl::default());
        assert!(doc.validate_materials(&materials).is_ok());
    }
}
