//! Plain value view of the annotated tree.

use crate::ast::{Document, Node};
use serde_json::{Map, Value};

impl Node {
    /// Plain value of this node and its descendants
    pub fn to_value(&self) -> Value {
        match self {
            Node::Scalar(s) => s.value.clone(),
            Node::Mapping(m) => {
                let mut map = Map::with_capacity(m.entries.len());
                for entry in &m.entries {
                    if let Some(key) = &entry.key {
                        map.insert(key.text.clone(), entry.value.to_value());
                    }
                }
                Value::Object(map)
            }
            Node::Sequence(s) => Value::Array(s.items.iter().map(|i| i.value.to_value()).collect()),
        }
    }
}

/// Convert a document into its projection. Mapping order follows the
/// document.
pub fn to_projection(document: &Document) -> Value {
    document.root.value.to_value()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;
    use serde_json::json;

    #[test]
    fn test_projection_keeps_document_order() {
        let parsed = parse("b: 1\na: 2\nc: [x, y]\n").unwrap();
        let keys: Vec<&String> = parsed.projection.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
        assert_eq!(to_projection(&parsed.document), json!({"b": 1, "a": 2, "c": ["x", "y"]}));
    }

    #[test]
    fn test_projection_of_nested_structures() {
        let text = "\
info:
  title: Pets
tags:
  - name: a
    description: first
  - b
empty:
";
        let parsed = parse(text).unwrap();
        assert_eq!(
            parsed.projection,
            json!({
                "info": {"title": "Pets"},
                "tags": [{"name": "a", "description": "first"}, "b"],
                "empty": null
            })
        );
    }
}
