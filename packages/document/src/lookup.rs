//! Read access to the annotated tree by path.

use crate::ast::{Document, Member, Node, NodeRef};
use crate::edit::parse_index;
use crate::error::Position;
use crate::pointer::NodePath;

/// The live node at `path`, or `None` when any segment does not resolve
pub fn get_at_path<'a>(document: &'a Document, path: &NodePath) -> Option<NodeRef<'a>> {
    let mut member = &document.root;
    for segment in path.segments() {
        member = child(&member.value, segment)?;
    }
    Some(NodeRef { member })
}

/// Source position of the deepest existing node along `path`.
///
/// Nodes created by edits have no position of their own; they report the
/// nearest parsed ancestor.
pub fn nearest_position(document: &Document, path: &NodePath) -> Position {
    let mut member = &document.root;
    let mut best = Position::new(member.line.max(1), member.column + 1);
    for segment in path.segments() {
        let Some(next) = child(&member.value, segment) else {
            break;
        };
        member = next;
        if member.line > 0 {
            best = Position::new(member.line, member.column + 1);
        }
    }
    best
}

fn child<'a>(node: &'a Node, segment: &str) -> Option<&'a Member> {
    match node {
        Node::Mapping(m) => m.get(segment),
        Node::Sequence(s) => parse_index(segment).and_then(|i| s.items.get(i)),
        Node::Scalar(_) => None,
    }
}
