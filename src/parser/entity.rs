//! Entity decl parser.
//!
//! Parses `.def` source into [`EntityDecl`] records. Only `entityDef`
//! blocks are read; every other top-level decl is skipped. Inside a body,
//! tokens are consumed as key/value pairs so a value can never be mistaken
//! for a key, and only the restricted key set is retained.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::error::Result;
use crate::lexer::Lexer;
use crate::parser::FileStats;
use crate::registry::EntityDecl;

fn is_retained_key(key: &str) -> bool {
    key.starts_with("editor_") || key == "inherit" || key == "model"
}

/// Parse one entity def file's source against the caller's class table.
pub fn parse_entity_source(
    source: &str,
    decls: &mut HashMap<String, EntityDecl>,
) -> Result<FileStats> {
    let mut lex = Lexer::new(source);
    let mut stats = FileStats::default();

    while let Some(token) = lex.next_token()? {
        if token != "entityDef" {
            // unrelated decl type; the "name" read here may already be the
            // opening brace (some decls are anonymous)
            let Some(name) = lex.next_token()? else { break };
            lex.skip_balanced("{", "}", name == "{")?;
            continue;
        }

        let Some(name) = lex.next_token()? else { break };
        let decl = match decls.entry(name.to_string()) {
            Entry::Occupied(entry) => {
                stats.updated += 1;
                entry.into_mut()
            }
            Entry::Vacant(entry) => {
                stats.created += 1;
                entry.insert(EntityDecl::default())
            }
        };

        lex.expect("{")?;
        let mut depth = 1u32;
        while let Some(token) = lex.next_token()? {
            match token {
                "{" => {
                    depth += 1;
                    continue;
                }
                "}" => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                    continue;
                }
                _ => {}
            }

            // key/value pair; the value must be consumed even for keys we
            // discard, to keep the stream aligned
            let Some(value) = lex.next_token()? else { break };
            if is_retained_key(token) {
                decl.insert(token, value);
            }
        }
    }

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_one(source: &str) -> HashMap<String, EntityDecl> {
        let mut decls = HashMap::new();
        parse_entity_source(source, &mut decls).unwrap();
        decls
    }

    #[test]
    fn test_parse_retained_keys() {
        let decls = parse_one(
            "entityDef e { \"editor_mins\" \"-8 -8 0\" \"editor_maxs\" \"8 8 16\" \
             \"inherit\" \"parent\" \"model\" \"models/e.lwo\" }",
        );
        let decl = &decls["e"];
        assert_eq!(decl.get("editor_mins"), Some("-8 -8 0"));
        assert_eq!(decl.get("editor_maxs"), Some("8 8 16"));
        assert_eq!(decl.inherit(), Some("parent"));
        assert_eq!(decl.get("model"), Some("models/e.lwo"));
    }

    #[test]
    fn test_unretained_keys_discarded() {
        let decls = parse_one("entityDef e { \"spawnclass\" \"idLight\" \"health\" \"100\" }");
        assert!(decls["e"].is_empty());
    }

    #[test]
    fn test_value_tokens_kept_aligned() {
        // "inherit" appearing as a VALUE must not be taken for a key
        let decls = parse_one("entityDef e { \"editor_usage\" \"inherit\" \"model\" \"m\" }");
        let decl = &decls["e"];
        assert_eq!(decl.get("editor_usage"), Some("inherit"));
        assert_eq!(decl.get("model"), Some("m"));
        assert_eq!(decl.inherit(), None);
    }

    #[test]
    fn test_skips_unrelated_decl_types() {
        let decls = parse_one(
            "model env_rock { mesh m } \
             export fred { options x } \
             entityDef keep { \"model\" \"m\" }",
        );
        assert_eq!(decls.len(), 1);
        assert!(decls.contains_key("keep"));
    }

    #[test]
    fn test_skips_anonymous_decl_with_open_brace_name() {
        // the token after an unrelated decl keyword is already "{" here
        let decls = parse_one("export { src dst } entityDef keep { \"model\" \"m\" }");
        assert!(decls.contains_key("keep"));
    }

    #[test]
    fn test_nested_sections_inside_body() {
        let decls = parse_one(
            "entityDef e { \"editor_color\" \"1 0 0\" { nested stuff } \"model\" \"m\" }",
        );
        let decl = &decls["e"];
        assert_eq!(decl.get("editor_color"), Some("1 0 0"));
        assert_eq!(decl.get("model"), Some("m"));
    }

    #[test]
    fn test_reparse_overwrites_keys() {
        let mut decls = HashMap::new();
        let first =
            parse_entity_source("entityDef e { \"model\" \"old\" }", &mut decls).unwrap();
        assert_eq!((first.created, first.updated), (1, 0));

        let second =
            parse_entity_source("entityDef e { \"model\" \"new\" }", &mut decls).unwrap();
        assert_eq!((second.created, second.updated), (0, 1));
        assert_eq!(decls["e"].get("model"), Some("new"));
    }

    #[test]
    fn test_duplicate_key_in_one_body_overwrites() {
        let decls = parse_one("entityDef e { \"model\" \"a\" \"model\" \"b\" }");
        assert_eq!(decls["e"].get("model"), Some("b"));
    }
}
