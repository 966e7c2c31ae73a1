//! Parse/serialize round trips over realistic API documents

use apistudio_document::{parse, serialize, ParseError};
use serde_json::json;

const PETSTORE: &str = r#"# Petstore API
# maintained by the platform team
openapi: "3.0.3"
info:
  title: Swagger Petstore   # shown in the portal
  version: 1.0.0
  description: |
    Multi-line description.

    Second paragraph.
servers:
  - url: http://petstore.swagger.io/v1

paths:
  /pets:
    get:
      summary: List all pets
      operationId: listPets
      tags: [pets]
      parameters:
        - name: limit
          in: query
          required: false
          schema: {type: integer, format: int32}
      responses:
        '200':
          description: A paged array of pets
        default:
          description: unexpected error
"#;

#[test]
fn test_petstore_round_trip() {
    let parsed = parse(PETSTORE).unwrap();
    assert_eq!(serialize(&parsed.document), PETSTORE);
}

#[test]
fn test_petstore_projection() {
    let parsed = parse(PETSTORE).unwrap();
    let projection = &parsed.projection;

    assert_eq!(projection["openapi"], json!("3.0.3"));
    assert_eq!(projection["info"]["version"], json!("1.0.0"));
    assert_eq!(
        projection["info"]["description"],
        json!("Multi-line description.\n\nSecond paragraph.\n")
    );
    assert_eq!(projection["paths"]["/pets"]["get"]["tags"], json!(["pets"]));
    assert_eq!(
        projection["paths"]["/pets"]["get"]["parameters"][0],
        json!({
            "name": "limit",
            "in": "query",
            "required": false,
            "schema": {"type": "integer", "format": "int32"}
        })
    );
    assert!(projection["paths"]["/pets"]["get"]["responses"]["200"].is_object());
}

#[test]
fn test_round_trip_formatting_variants() {
    let sources = [
        // CRLF line endings and no trailing newline
        "openapi: 3.1.0\r\ninfo:\r\n  title: A\r\n  version: '1'",
        // Four-space indentation, indentless sequences
        "paths:\n    /a:\n        get:\n            tags:\n            - a\n            - b\n",
        // Multi-line flow collection with comments
        "tags: [\n  a, # first\n  b\n]\nnext: 1\n",
        // Folded and kept block scalars
        "a: >\n  folded\n  text\n\nb: |+\n  kept\n\n",
        // Quoted keys and escapes
        "\"x-key\": \"tab\\there\"\n'y': 'it''s'\n",
        // Document markers
        "%YAML 1.2\n---\nopenapi: 3.0.0\n...\n",
        // Trailing comments at end of file
        "a: 1\n\n# the end\n",
    ];
    for source in sources {
        let parsed = parse(source).unwrap_or_else(|e| panic!("{source:?}: {e}"));
        assert_eq!(serialize(&parsed.document), source);
    }
}

#[test]
fn test_byte_order_mark_round_trip() {
    let source = "\u{feff}openapi: 3.0.3\ninfo:\n  title: T\n";
    let parsed = parse(source).unwrap();
    assert_eq!(parsed.projection, json!({"openapi": "3.0.3", "info": {"title": "T"}}));
    assert_eq!(serialize(&parsed.document), source);
}

#[test]
fn test_scalar_resolution_in_projection() {
    let parsed = parse(
        "int: 42\nfloat: 1.5\nbool: true\nnull1: ~\nnull2:\nstr: '42'\nversion: 3.0.3\ninf: .inf\n",
    )
    .unwrap();
    assert_eq!(
        parsed.projection,
        json!({
            "int": 42,
            "float": 1.5,
            "bool": true,
            "null1": null,
            "null2": null,
            "str": "42",
            "version": "3.0.3",
            "inf": ".inf"
        })
    );
}

#[test]
fn test_parse_failures() {
    assert_eq!(parse("").unwrap_err(), ParseError::EmptyDocument);
    assert_eq!(
        parse("- a\n").unwrap_err(),
        ParseError::RootNotMapping { found: "sequence" }
    );
    assert!(matches!(
        parse("openapi: 3.0.0\ninfo: {title: [\n").unwrap_err(),
        ParseError::UnexpectedEof { .. }
    ));
    let err = parse("a: 1\n  b: 2\n").unwrap_err();
    assert_eq!(err.position().map(|p| p.line), Some(2));
}

#[test]
fn test_block_scalar_lines_below_content_indent() {
    let malformed = [
        "a: |4\n      x\n   €\n",
        "a: |\n    x\n  €y\n",
        "a: |2\n  x\n €\n",
        "a: >\n  €\n €\n",
    ];
    for source in malformed {
        let err = parse(source).expect_err(source);
        assert!(matches!(err, ParseError::InvalidSyntax { .. }), "{source:?}: {err}");
    }

    // A shallower comment ends the scalar and stays in the text
    let source = "a: |\n    x\n  # c\nb: é\n";
    let parsed = parse(source).unwrap();
    assert_eq!(parsed.projection, json!({"a": "x\n", "b": "é"}));
    assert_eq!(serialize(&parsed.document), source);
}
