//! Material decl parser.
//!
//! Parses `.mtr` source into [`MaterialDecl`] records. A file is a sequence
//! of `material <name> { ... }` or bare `<name> { ... }` blocks; `particle`,
//! `skin` and `table` declarations are skipped wholesale. Inside a material
//! body, nesting depth distinguishes top-level keywords from stage blocks:
//! the second opening brace starts a stage, and closing back to depth one
//! commits the stage's `blend`/`map` pair onto the decl.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::error::{ForgeError, Result};
use crate::lexer::Lexer;
use crate::parser::FileStats;
use crate::registry::MaterialDecl;

/// Parse one material file's source against the caller's decl table.
pub fn parse_material_source(
    source: &str,
    decls: &mut HashMap<String, MaterialDecl>,
) -> Result<FileStats> {
    let mut lex = Lexer::new(source);
    let mut stats = FileStats::default();

    while let Some(token) = lex.next_token()? {
        if matches!(token, "particle" | "skin" | "table") {
            // unrelated decl type: name, then the whole body
            lex.next_token()?;
            lex.skip_balanced("{", "}", false)?;
            continue;
        }

        let name = if token == "material" {
            match lex.next_token()? {
                Some(name) => name,
                None => break,
            }
        } else {
            token
        };

        let decl = match decls.entry(name.to_string()) {
            Entry::Occupied(entry) => {
                stats.updated += 1;
                entry.into_mut()
            }
            Entry::Vacant(entry) => {
                stats.created += 1;
                entry.insert(MaterialDecl::default())
            }
        };
        parse_material_body(&mut lex, decl)?;
    }

    Ok(stats)
}

/// Accumulators for the stage currently being scanned.
#[derive(Default)]
struct Stage {
    blend: Option<String>,
    texture: Option<String>,
    heightmap_scale: f32,
}

fn parse_material_body(lex: &mut Lexer, decl: &mut MaterialDecl) -> Result<()> {
    lex.expect("{")?;
    let mut depth = 1u32;
    let mut in_stage = false;
    let mut stage = Stage::default();

    while let Some(token) = lex.next_token()? {
        match token {
            "{" => {
                depth += 1;
                if depth == 2 {
                    // second opening brace: now in a stage
                    in_stage = true;
                    stage = Stage::default();
                }
                continue;
            }
            "}" => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
                if depth == 1 {
                    in_stage = false;
                    commit_stage(decl, &stage);
                }
                continue;
            }
            _ => {}
        }

        if in_stage {
            if token.eq_ignore_ascii_case("blend") {
                stage.blend = lex.next_token()?.map(str::to_string);
            } else if token.eq_ignore_ascii_case("map") {
                let Some(value) = lex.next_token()? else { break };
                if value.eq_ignore_ascii_case("addnormals") {
                    stage.texture = Some(parse_addnormals(lex)?);
                } else if value.eq_ignore_ascii_case("heightmap") {
                    let (texture, scale) = parse_heightmap(lex)?;
                    stage.texture = Some(texture);
                    stage.heightmap_scale = scale;
                } else {
                    stage.texture = Some(value.to_string());
                }
            }
        } else if token.eq_ignore_ascii_case("bumpmap") {
            let Some(value) = lex.next_token()? else { break };
            if value.eq_ignore_ascii_case("addnormals") {
                decl.normal_texture = parse_addnormals(lex)?;
            } else if value.eq_ignore_ascii_case("heightmap") {
                let (texture, scale) = parse_heightmap(lex)?;
                decl.normal_texture = texture;
                decl.heightmap_scale = scale;
            } else {
                decl.normal_texture = value.to_string();
            }
        } else if token.eq_ignore_ascii_case("diffusemap") {
            if let Some(value) = lex.next_token()? {
                decl.diffuse_texture = value.to_string();
            }
        } else if token.eq_ignore_ascii_case("qer_editorimage") {
            if let Some(value) = lex.next_token()? {
                decl.editor_texture = value.to_string();
            }
        } else if token.eq_ignore_ascii_case("specularmap") {
            if let Some(value) = lex.next_token()? {
                decl.specular_texture = value.to_string();
            }
        }
    }

    Ok(())
}

/// Closing a stage records its texture on the decl; with a blend mode the
/// texture also lands in the matching role slot. Later stages overwrite
/// earlier ones of the same role.
fn commit_stage(decl: &mut MaterialDecl, stage: &Stage) {
    let Some(texture) = &stage.texture else { return };
    decl.texture = texture.clone();
    let Some(blend) = &stage.blend else { return };
    if blend.eq_ignore_ascii_case("bumpmap") {
        decl.normal_texture = texture.clone();
        decl.heightmap_scale = stage.heightmap_scale;
    } else if blend.eq_ignore_ascii_case("diffusemap") {
        decl.diffuse_texture = texture.clone();
    } else if blend.eq_ignore_ascii_case("specularmap") {
        decl.specular_texture = texture.clone();
    }
}

/// `addnormals( <normal texture> ... )`; only the first argument matters.
fn parse_addnormals(lex: &mut Lexer) -> Result<String> {
    lex.expect("(")?;
    let texture = lex.next_required("normal map texture")?.to_string();
    lex.skip_balanced("(", ")", true)?;
    Ok(texture)
}

/// `heightmap( <texture>, <scale> )`.
fn parse_heightmap(lex: &mut Lexer) -> Result<(String, f32)> {
    lex.expect("(")?;
    let texture = lex.next_required("heightmap texture")?.to_string();
    lex.expect(",")?;
    let raw = lex.next_required("heightmap scale")?;
    let scale: f32 = raw.parse().map_err(|_| ForgeError::InvalidNumber {
        value: raw.to_string(),
        line: lex.line(),
    })?;
    lex.expect(")")?;
    Ok((texture, scale))
}
