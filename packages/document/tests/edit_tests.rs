//! Structural edits: set, add, delete

use apistudio_document::{
    add_map_entry, delete_at_path, get_at_path, parse, serialize, set_at_path, to_projection,
    Document, EditError, NodePath,
};
use serde_json::json;

fn doc(text: &str) -> Document {
    parse(text).unwrap().document
}

fn path(segments: &[&str]) -> NodePath {
    NodePath::from(segments)
}

// ============================================================================
// set_at_path
// ============================================================================

#[test]
fn test_update_keeps_comments() {
    let mut d = doc("# c\ninfo:\n  title: A # t\n");
    set_at_path(&mut d, &path(&["info", "title"]), json!("B")).unwrap();

    let out = serialize(&d);
    assert!(out.contains("# c"));
    assert!(out.contains("# t"));
    assert!(out.contains("title: B"));
    assert_eq!(out, "# c\ninfo:\n  title: B # t\n");
}

#[test]
fn test_set_then_get_returns_value() {
    let mut d = doc("openapi: 3.0.3\ninfo:\n  title: T\n");
    let values = [json!("text"), json!(7), json!(false), json!(null), json!(2.5)];
    for value in values {
        set_at_path(&mut d, &path(&["info", "title"]), value.clone()).unwrap();
        let node = get_at_path(&d, &path(&["info", "title"])).unwrap();
        assert_eq!(node.to_value(), value);
        assert_eq!(parse(&serialize(&d)).unwrap().projection, to_projection(&d));
    }
}

#[test]
fn test_set_creates_intermediate_mappings() {
    let mut d = doc("openapi: 3.0.3\ninfo:\n  title: T\n");
    set_at_path(&mut d, &path(&["info", "contact", "email"]), json!("a@b.c")).unwrap();
    assert_eq!(
        serialize(&d),
        "openapi: 3.0.3\ninfo:\n  title: T\n  contact:\n    email: a@b.c\n"
    );

    // Numeric segments still create mappings
    set_at_path(&mut d, &path(&["x-codes", "200"]), json!("ok")).unwrap();
    assert_eq!(to_projection(&d)["x-codes"], json!({"200": "ok"}));
}

#[test]
fn test_set_descends_into_null() {
    let mut d = doc("paths:\n");
    set_at_path(&mut d, &path(&["paths", "/pets"]), json!({"get": {}})).unwrap();
    assert_eq!(serialize(&d), "paths:\n  /pets:\n    get: {}\n");
}

#[test]
fn test_set_keeps_quote_style() {
    let mut d = doc("a: \"old\"\nb: 'old'\n");
    set_at_path(&mut d, &path(&["a"]), json!("new")).unwrap();
    set_at_path(&mut d, &path(&["b"]), json!("new")).unwrap();
    assert_eq!(serialize(&d), "a: \"new\"\nb: 'new'\n");
}

#[test]
fn test_set_quotes_ambiguous_strings() {
    let mut d = doc("a: x\n");
    set_at_path(&mut d, &path(&["a"]), json!("1.0")).unwrap();
    assert_eq!(serialize(&d), "a: \"1.0\"\n");
    set_at_path(&mut d, &path(&["a"]), json!("k: v")).unwrap();
    assert_eq!(serialize(&d), "a: \"k: v\"\n");
    assert_eq!(to_projection(&d)["a"], json!("k: v"));
}

#[test]
fn test_set_multiline_string_as_literal_block() {
    let mut d = doc("info:\n  description: short\n  title: T\n");
    set_at_path(&mut d, &path(&["info", "description"]), json!("line one\nline two\n")).unwrap();
    assert_eq!(
        serialize(&d),
        "info:\n  description: |\n    line one\n    line two\n  title: T\n"
    );
    let reparsed = parse(&serialize(&d)).unwrap();
    assert_eq!(reparsed.projection["info"]["description"], json!("line one\nline two\n"));
}

#[test]
fn test_replace_scalar_with_mapping_and_back() {
    let mut d = doc("a: 1  # note\nb: 2\n");
    set_at_path(&mut d, &path(&["a"]), json!({"x": 1})).unwrap();
    assert_eq!(serialize(&d), "a:  # note\n  x: 1\nb: 2\n");

    set_at_path(&mut d, &path(&["a"]), json!(3)).unwrap();
    assert_eq!(serialize(&d), "a: 3  # note\nb: 2\n");
}

#[test]
fn test_sequence_append_and_bad_index() {
    let mut d = doc("tags:\n  - name: a\n");
    set_at_path(&mut d, &path(&["tags", "1"]), json!({"name": "b"})).unwrap();
    assert_eq!(serialize(&d), "tags:\n  - name: a\n  - name: b\n");

    let before = serialize(&d);
    assert_eq!(
        set_at_path(&mut d, &path(&["tags", "5"]), json!("x")),
        Err(EditError::InvalidIndex {
            pointer: "/tags".to_string(),
            index: "5".to_string()
        })
    );
    assert!(set_at_path(&mut d, &path(&["tags", "first"]), json!("x")).is_err());
    assert_eq!(serialize(&d), before);
}

#[test]
fn test_set_through_scalar_fails_without_change() {
    let mut d = doc("a: 1\nb: [x]\n");
    let before = serialize(&d);
    assert_eq!(
        set_at_path(&mut d, &path(&["a", "b"]), json!(1)),
        Err(EditError::NotAContainer("/a".to_string()))
    );
    assert_eq!(
        set_at_path(&mut d, &path(&["b", "0", "c"]), json!(1)),
        Err(EditError::NotAContainer("/b/0".to_string()))
    );
    assert_eq!(serialize(&d), before);
}

#[test]
fn test_root_must_stay_a_mapping() {
    let mut d = doc("a: 1\n");
    assert_eq!(
        set_at_path(&mut d, &NodePath::root(), json!([1])),
        Err(EditError::RootNotMapping)
    );
    set_at_path(&mut d, &NodePath::root(), json!({"b": 2})).unwrap();
    assert_eq!(serialize(&d), "b: 2\n");
}

// ============================================================================
// Flow collections
// ============================================================================

#[test]
fn test_edit_inside_flow_sequence() {
    let mut d = doc("tags: [a, b]  # list\n");
    set_at_path(&mut d, &path(&["tags", "1"]), json!("c")).unwrap();
    assert_eq!(serialize(&d), "tags: [a, c]  # list\n");

    set_at_path(&mut d, &path(&["tags", "2"]), json!("d e")).unwrap();
    assert_eq!(serialize(&d), "tags: [a, c, d e]  # list\n");

    assert!(delete_at_path(&mut d, &path(&["tags", "0"])));
    assert_eq!(serialize(&d), "tags: [c, d e]  # list\n");
}

#[test]
fn test_edit_inside_flow_mapping() {
    let mut d = doc("info: {title: T, version: '1'}\n");
    set_at_path(&mut d, &path(&["info", "version"]), json!("2")).unwrap();
    assert_eq!(serialize(&d), "info: {title: T, version: '2'}\n");
}

#[test]
fn test_empty_flow_collection_becomes_block() {
    let mut d = doc("tags: []\n");
    set_at_path(&mut d, &path(&["tags", "0"]), json!("a")).unwrap();
    assert_eq!(serialize(&d), "tags:\n  - a\n");
}

// ============================================================================
// add_map_entry / delete_at_path
// ============================================================================

#[test]
fn test_add_then_remove_restores_document() {
    let source = "openapi: 3.0.3\ninfo:\n  title: T\npaths: {}\n";
    let mut d = doc(source);
    let before = to_projection(&d);

    add_map_entry(&mut d, &path(&["paths"]), "/x", json!({})).unwrap();
    assert_eq!(serialize(&d), "openapi: 3.0.3\ninfo:\n  title: T\npaths:\n  /x: {}\n");

    assert!(delete_at_path(&mut d, &path(&["paths", "/x"])));
    assert_eq!(to_projection(&d), before);
    assert_eq!(serialize(&d), source);
}

#[test]
fn test_add_appends_after_existing_keys() {
    let mut d = doc("a: 1");
    add_map_entry(&mut d, &NodePath::root(), "b", json!([1, 2])).unwrap();
    assert_eq!(serialize(&d), "a: 1\nb:\n  - 1\n  - 2\n");
}

#[test]
fn test_add_rejects_duplicates_and_non_mappings() {
    let mut d = doc("openapi: 3.0.3\ninfo:\n  title: T\n");
    assert_eq!(
        add_map_entry(&mut d, &path(&["info"]), "title", json!("x")),
        Err(EditError::DuplicateKey {
            pointer: "/info".to_string(),
            key: "title".to_string()
        })
    );
    assert_eq!(
        add_map_entry(&mut d, &path(&["openapi"]), "x", json!(1)),
        Err(EditError::NotAMapping("/openapi".to_string()))
    );
}

#[test]
fn test_add_creates_missing_mapping() {
    let mut d = doc("openapi: 3.0.3\n");
    let schemas = path(&["components", "schemas"]);
    add_map_entry(&mut d, &schemas, "Pet", json!({"type": "object"})).unwrap();
    assert_eq!(
        to_projection(&d)["components"],
        json!({"schemas": {"Pet": {"type": "object"}}})
    );
}

#[test]
fn test_delete_missing_path_is_noop() {
    let source = "# header\ninfo:\n  title: T\n";
    let mut d = doc(source);
    assert!(!delete_at_path(&mut d, &path(&["info", "nope"])));
    assert!(!delete_at_path(&mut d, &path(&["missing", "deep"])));
    assert!(!delete_at_path(&mut d, &path(&["info", "title", "x"])));
    assert!(!delete_at_path(&mut d, &NodePath::root()));
    assert_eq!(serialize(&d), source);
}

#[test]
fn test_delete_keeps_siblings_and_their_comments() {
    let mut d = doc("a: 1\n# about b\nb: 2\n# about c\nc: 3\n");
    assert!(delete_at_path(&mut d, &path(&["b"])));
    assert_eq!(serialize(&d), "a: 1\n# about c\nc: 3\n");
}

#[test]
fn test_delete_last_child_collapses_collection() {
    let mut d = doc("a: 1\nlist:\n  - x\n");
    assert!(delete_at_path(&mut d, &path(&["list", "0"])));
    assert_eq!(serialize(&d), "a: 1\nlist: []\n");
}

#[test]
fn test_delete_first_key_of_compact_item() {
    let mut d = doc("params:\n  - name: id\n    in: path\n");
    assert!(delete_at_path(&mut d, &path(&["params", "0", "name"])));
    assert_eq!(serialize(&d), "params:\n  - in: path\n");
    assert_eq!(to_projection(&d), json!({"params": [{"in": "path"}]}));
}

// ============================================================================
// Multi-line strings next to indented comments and blank lines
// ============================================================================

fn assert_reparses(d: &Document) {
    let reparsed = parse(&serialize(d)).unwrap();
    assert_eq!(reparsed.projection, to_projection(d), "{}", serialize(d));
}

#[test]
fn test_literal_block_does_not_take_trailing_indented_comment() {
    let mut d = doc("a:\n  b: 1\n  # end\n");
    set_at_path(&mut d, &path(&["a"]), json!("x\n")).unwrap();

    assert_eq!(serialize(&d), "a: \"x\\n\"\n  # end\n");
    assert_eq!(to_projection(&d), json!({"a": "x\n"}));
    assert_reparses(&d);
}

#[test]
fn test_added_multiline_entry_before_indented_comment() {
    let mut d = doc("a:\n  b: 1\n  # end\n");
    add_map_entry(&mut d, &NodePath::root(), "new/key", json!("line1\nline2")).unwrap();

    let out = serialize(&d);
    assert!(out.ends_with("  # end\n"), "{out}");
    assert_eq!(to_projection(&d)["new/key"], json!("line1\nline2"));
    assert_reparses(&d);
}

#[test]
fn test_kept_block_does_not_take_following_blank_line() {
    let mut d = doc("a:\n  b: |\n    t\n\n  c: 1\n");
    set_at_path(&mut d, &path(&["a", "b"]), json!("x\n\n")).unwrap();

    assert_eq!(to_projection(&d), json!({"a": {"b": "x\n\n", "c": 1}}));
    assert!(serialize(&d).ends_with("\n\n  c: 1\n"));
    assert_reparses(&d);
}

#[test]
fn test_literal_block_kept_when_comment_is_shallower() {
    let mut d = doc("a:\n  b: 1\n  # end\n");
    set_at_path(&mut d, &path(&["a", "b"]), json!("one\ntwo\n")).unwrap();

    assert_eq!(serialize(&d), "a:\n  b: |\n    one\n    two\n  # end\n");
    assert_reparses(&d);
}

#[test]
fn test_delete_exposing_indented_comment_to_literal_block() {
    let mut d = doc("a: |\n  x\nb: 1\n  # after b\nc: 2\n");
    assert!(delete_at_path(&mut d, &path(&["b"])));

    assert_eq!(serialize(&d), "a: \"x\\n\"\n  # after b\nc: 2\n");
    assert_eq!(to_projection(&d), json!({"a": "x\n", "c": 2}));
    assert_reparses(&d);
}
