//! # Structural edits
//!
//! Edits replace or insert whole members and leave every other byte of the
//! tree alone. New nodes are rendered in block style with the document's
//! indentation unit and line ending. Flow collections touched by an edit are
//! re-rendered from their children.
//!
//! Every failure is detected before the tree is changed, so an `Err` means
//! the document is exactly as it was.

use crate::ast::*;
use crate::error::{EditError, EditResult};
use crate::pointer::{path_to_pointer, NodePath};
use crate::scalar::{
    render_inline, render_key, render_literal, wants_literal_block, BlockHeader, Context,
    ScalarStyle,
};
use serde_json::{Map, Value};
use tracing::debug;

/// Write `value` at `path`, creating missing intermediate mappings.
///
/// Sequence segments must name an existing index or the current length
/// (append). The root can only be replaced by a mapping.
pub fn set_at_path(document: &mut Document, path: &NodePath, value: Value) -> EditResult<()> {
    let style = document.style.clone();

    if path.is_root() {
        if !value.is_object() {
            return Err(EditError::RootNotMapping);
        }
        replace_value(&mut document.root, &value, &style, true);
        quote_swallowing_blocks(document);
        return Ok(());
    }

    check_set(&document.root, path.segments(), 0)?;
    set_in(&mut document.root, path.segments(), 0, &value, &style);
    quote_swallowing_blocks(document);
    debug!(pointer = %path, "set value");
    Ok(())
}

/// Append `key` to the mapping at `path`, creating the mapping if missing.
pub fn add_map_entry(
    document: &mut Document,
    path: &NodePath,
    key: &str,
    value: Value,
) -> EditResult<()> {
    if let Some(target) = crate::lookup::get_at_path(document, path) {
        match target.node() {
            Node::Mapping(m) if m.position(key).is_some() => {
                return Err(EditError::DuplicateKey {
                    pointer: path_to_pointer(path),
                    key: key.to_string(),
                });
            }
            Node::Mapping(_) => {}
            Node::Scalar(s) if s.value.is_null() => {}
            _ => return Err(EditError::NotAMapping(path_to_pointer(path))),
        }
    }
    set_at_path(document, &path.child(key), value)
}

/// Remove the node at `path`. Returns `false` and leaves the document
/// untouched when the path does not resolve or names the root.
pub fn delete_at_path(document: &mut Document, path: &NodePath) -> bool {
    let Some((last, parents)) = path.segments().split_last() else {
        return false;
    };
    let style = document.style.clone();
    let removed = delete_in(&mut document.root, parents, last, &style, true);
    if removed {
        quote_swallowing_blocks(document);
        debug!(pointer = %path, "deleted node");
    }
    removed
}

/// Block scalar still open while the text after it is written
struct OpenBlock {
    at: Vec<usize>,
    content_indent: usize,
    keep: bool,
}

/// Rewrite as double-quoted every block scalar whose body would take in
/// the comment or blank lines that follow it on reparse.
fn quote_swallowing_blocks(document: &mut Document) {
    let mut found = Vec::new();
    let mut open = None;
    find_swallowing(&document.root, &mut Vec::new(), &mut open, &mut found);
    close_block(&mut open, &document.suffix, &mut found);

    for at in found {
        let mut target = Some(&mut document.root);
        for &index in &at {
            target = target.and_then(|member| match &mut member.value {
                Node::Mapping(m) => m.entries.get_mut(index),
                Node::Sequence(s) => s.items.get_mut(index),
                Node::Scalar(_) => None,
            });
        }
        let Some(member) = target else {
            continue;
        };
        if let Node::Scalar(scalar) = &mut member.value {
            let (raw, style) =
                render_inline(&scalar.value, Context::Block, ScalarStyle::DoubleQuoted);
            debug!(line = member.line, "quoted block scalar followed by indented trivia");
            scalar.raw = raw;
            scalar.style = style;
            scalar.body.clear();
        }
    }
}

fn find_swallowing(
    member: &Member,
    at: &mut Vec<usize>,
    open: &mut Option<OpenBlock>,
    found: &mut Vec<Vec<usize>>,
) {
    close_block(open, &member.leading, found);
    match &member.value {
        Node::Scalar(scalar)
            if matches!(scalar.style, ScalarStyle::Literal | ScalarStyle::Folded) =>
        {
            let explicit = BlockHeader::parse(&scalar.raw).and_then(|header| header.indent);
            let content_indent = match explicit {
                Some(m) => member.column + m,
                None => scalar
                    .body
                    .lines()
                    .find(|line| !line.trim().is_empty())
                    .map(indent_of)
                    .unwrap_or(member.column + 1),
            };
            *open = Some(OpenBlock {
                at: at.clone(),
                content_indent,
                keep: scalar.raw.contains('+'),
            });
        }
        Node::Mapping(Mapping {
            layout: Layout::Block,
            entries: children,
            ..
        })
        | Node::Sequence(Sequence {
            layout: Layout::Block,
            items: children,
            ..
        }) => {
            for (index, child) in children.iter().enumerate() {
                at.push(index);
                find_swallowing(child, at, open, found);
                at.pop();
            }
        }
        _ => {}
    }
}

/// Close the open block scalar with the trivia written after it
fn close_block(open: &mut Option<OpenBlock>, trivia: &str, found: &mut Vec<Vec<usize>>) {
    let Some(block) = open.take() else {
        return;
    };
    for line in trivia.lines() {
        if line.trim().is_empty() {
            if block.keep {
                found.push(block.at);
                return;
            }
            continue;
        }
        if indent_of(line) >= block.content_indent {
            found.push(block.at);
        }
        return;
    }
}

fn indent_of(line: &str) -> usize {
    line.len() - line.trim_start_matches(' ').len()
}

/// Validate a set without touching the tree
fn check_set(member: &Member, path: &[String], depth: usize) -> EditResult<()> {
    let Some(segment) = path.get(depth) else {
        return Ok(());
    };
    match &member.value {
        Node::Scalar(s) if s.value.is_null() => Ok(()),
        Node::Scalar(_) => Err(EditError::NotAContainer(pointer_of(&path[..depth]))),
        Node::Mapping(m) => match m.get(segment) {
            Some(child) => check_set(child, path, depth + 1),
            None => Ok(()),
        },
        Node::Sequence(s) => match parse_index(segment) {
            Some(index) if index < s.items.len() => check_set(&s.items[index], path, depth + 1),
            Some(index) if index == s.items.len() => Ok(()),
            _ => Err(EditError::InvalidIndex {
                pointer: pointer_of(&path[..depth]),
                index: segment.clone(),
            }),
        },
    }
}

fn set_in(member: &mut Member, path: &[String], depth: usize, value: &Value, style: &Style) {
    let root = depth == 0;
    let Some(segment) = path.get(depth) else {
        replace_value(member, value, style, root);
        return;
    };

    if matches!(&member.value, Node::Scalar(s) if s.value.is_null()) {
        replace_value(member, &Value::Object(Map::new()), style, root);
    }

    let existing = match &member.value {
        Node::Mapping(m) => m.position(segment),
        Node::Sequence(s) => parse_index(segment).filter(|i| *i < s.items.len()),
        Node::Scalar(_) => None,
    };

    match existing {
        Some(index) => {
            if let Some(child) = children_mut(&mut member.value).and_then(|c| c.get_mut(index)) {
                set_in(child, path, depth + 1, value, style);
            }
        }
        None => {
            let nested = nest(&path[depth + 1..], value);
            let key = matches!(member.value, Node::Mapping(_)).then_some(segment.as_str());
            insert_child(member, key, &nested, style, root);
        }
    }
    member.value.invalidate_flow();
}

fn delete_in(
    member: &mut Member,
    parents: &[String],
    last: &str,
    style: &Style,
    root: bool,
) -> bool {
    if let Some((segment, rest)) = parents.split_first() {
        let Some(child) = child_mut(&mut member.value, segment) else {
            return false;
        };
        let removed = delete_in(child, rest, last, style, false);
        if removed {
            member.value.invalidate_flow();
        }
        return removed;
    }

    let index = match &member.value {
        Node::Mapping(m) => m.position(last),
        Node::Sequence(s) => parse_index(last).filter(|i| *i < s.items.len()),
        Node::Scalar(_) => None,
    };
    let Some(index) = index else {
        return false;
    };

    let is_flow = member.value.is_flow_collection();
    let column = collection_column(&member.value);
    let empty = match &member.value {
        Node::Mapping(_) => Value::Object(Map::new()),
        _ => Value::Array(Vec::new()),
    };
    let Some(children) = children_mut(&mut member.value) else {
        return false;
    };
    let removed = children.remove(index);

    if is_flow {
        member.value.invalidate_flow();
        return true;
    }

    if children.is_empty() {
        replace_value(member, &empty, style, root);
        return true;
    }

    // The first member of a compact `- key: v` item shares the dash line
    if index == 0 && removed.indent.len() < column {
        let first = &mut children[0];
        first.indent.clear();
        let leading = std::mem::take(&mut first.leading);
        member.leading.push_str(&leading);
    }
    true
}

/// Replace the value of `member`, keeping its key, leading comments and the
/// trailing comment of its line.
pub(crate) fn replace_value(member: &mut Member, value: &Value, style: &Style, root: bool) {
    let prefer = match &member.value {
        Node::Scalar(s) => s.style,
        _ => ScalarStyle::Plain,
    };

    if member.in_flow {
        member.value = build_flow_node(value, prefer);
        return;
    }

    let trail = current_tail(member).trail;
    let compact = !root && wants_compact(member, value, &trail);
    let column = if compact {
        member.column + 2
    } else if root {
        member.column
    } else {
        member.column + style.indent_unit
    };
    let node = build_block_node(value, column, style, prefer);
    place(member, node, compact, root, style);
}

/// Install `node` as the value of `member`, moving the line end between the
/// member head and the node tail as the layout requires.
fn place(member: &mut Member, mut node: Node, compact: bool, root: bool, style: &Style) {
    let was_inline = member.is_inline() && !member.value.is_block();
    let Tail { trail, eol } = current_tail(member);

    let has_body = matches!(&node, Node::Scalar(s) if !s.body.is_empty());
    let eol = if eol.is_empty() && (node.is_block() || has_body || !was_inline) {
        style.eol.clone()
    } else {
        eol
    };
    let base = if member.key.is_some() {
        ":"
    } else if root {
        ""
    } else {
        "-"
    };

    member.between.clear();

    if compact {
        member.marker = "- ".to_string();
        member.head = Tail::default();
        if let Node::Mapping(m) = &mut node {
            if let Some(first) = m.entries.first_mut() {
                first.indent.clear();
            }
        }
    } else if node.is_block() {
        member.marker = base.to_string();
        member.head = if root {
            if trail.contains('#') {
                Tail::new(trail.trim_start(), eol)
            } else {
                Tail::default()
            }
        } else {
            Tail::new(trail, eol)
        };
        if root {
            member.indent.clear();
        }
    } else {
        let keep_marker = was_inline && member.marker.len() > base.len();
        if !keep_marker {
            member.marker = if root { String::new() } else { format!("{} ", base) };
        }
        member.head = Tail::default();
        if let Some(tail) = node.tail_mut() {
            *tail = Tail::new(trail, eol);
        }
    }

    member.value = node;
}

/// Trailing text and line break currently ending the member's first line
fn current_tail(member: &Member) -> Tail {
    if member.is_inline() && !member.value.is_block() {
        member.value.tail().cloned().unwrap_or_default()
    } else {
        member.head.clone()
    }
}

fn wants_compact(member: &Member, value: &Value, trail: &str) -> bool {
    member.key.is_none()
        && matches!(value, Value::Object(m) if !m.is_empty())
        && !trail.contains('#')
}

fn insert_child(member: &mut Member, key: Option<&str>, value: &Value, style: &Style, root: bool) {
    if member.value.is_flow_collection() {
        let empty = children_mut(&mut member.value).map(|c| c.is_empty()).unwrap_or(true);
        if empty && !member.in_flow {
            // An empty `{}` / `[]` becomes a block collection with one child
            let whole = match key {
                Some(key) => {
                    let mut map = Map::new();
                    map.insert(key.to_string(), value.clone());
                    Value::Object(map)
                }
                None => Value::Array(vec![value.clone()]),
            };
            replace_value(member, &whole, style, root);
            return;
        }
        let child = flow_member(key, build_flow_node(value, ScalarStyle::Plain));
        if let Some(children) = children_mut(&mut member.value) {
            children.push(child);
        }
        member.value.invalidate_flow();
        return;
    }

    let column = collection_column(&member.value);
    let child = new_member(key, value, column, style);
    if let Some(children) = children_mut(&mut member.value) {
        if let Some(last) = children.last_mut() {
            ensure_eol(last, &style.eol);
        }
        children.push(child);
    }
}

/// A fresh block member at `column`
fn new_member(key: Option<&str>, value: &Value, column: usize, style: &Style) -> Member {
    let mut member = Member {
        leading: String::new(),
        indent: " ".repeat(column),
        key: key.map(|k| Key {
            raw: render_key(k, Context::Block),
            text: k.to_string(),
        }),
        marker: String::new(),
        head: Tail::default(),
        between: String::new(),
        value: Node::Scalar(Scalar {
            tail: Tail::new("", style.eol.clone()),
            ..Scalar::empty()
        }),
        line: 0,
        column,
        in_flow: false,
    };
    let compact = wants_compact(&member, value, "");
    let child = if compact {
        column + 2
    } else {
        column + style.indent_unit
    };
    let node = build_block_node(value, child, style, ScalarStyle::Plain);
    place(&mut member, node, compact, false, style);
    member
}

fn build_block_node(value: &Value, column: usize, style: &Style, prefer: ScalarStyle) -> Node {
    match value {
        Value::Object(map) if !map.is_empty() => Node::Mapping(Mapping {
            column,
            layout: Layout::Block,
            entries: map
                .iter()
                .map(|(k, v)| new_member(Some(k), v, column, style))
                .collect(),
        }),
        Value::Array(items) if !items.is_empty() => Node::Sequence(Sequence {
            column,
            layout: Layout::Block,
            items: items.iter().map(|v| new_member(None, v, column, style)).collect(),
        }),
        Value::String(text) if wants_literal_block(text) => {
            let (header, body) = render_literal(text, column, &style.eol);
            Node::Scalar(Scalar {
                value: value.clone(),
                raw: header,
                style: ScalarStyle::Literal,
                tail: Tail::default(),
                body,
            })
        }
        Value::Object(_) | Value::Array(_) => build_flow_node(value, prefer),
        _ => {
            let (raw, style) = render_inline(value, Context::Block, prefer);
            Node::Scalar(Scalar {
                value: value.clone(),
                raw,
                style,
                tail: Tail::default(),
                body: String::new(),
            })
        }
    }
}

/// Single-line rendering, used inside flow collections and for empty
/// collections and scalars in block context
fn build_flow_node(value: &Value, prefer: ScalarStyle) -> Node {
    let flow = || Layout::Flow {
        raw: None,
        tail: Tail::default(),
    };
    match value {
        Value::Object(map) => Node::Mapping(Mapping {
            column: 0,
            layout: flow(),
            entries: map
                .iter()
                .map(|(k, v)| flow_member(Some(k), build_flow_node(v, ScalarStyle::Plain)))
                .collect(),
        }),
        Value::Array(items) => Node::Sequence(Sequence {
            column: 0,
            layout: flow(),
            items: items
                .iter()
                .map(|v| flow_member(None, build_flow_node(v, ScalarStyle::Plain)))
                .collect(),
        }),
        _ => {
            let (raw, style) = render_inline(value, Context::Flow, prefer);
            Node::Scalar(Scalar {
                value: value.clone(),
                raw,
                style,
                tail: Tail::default(),
                body: String::new(),
            })
        }
    }
}

fn flow_member(key: Option<&str>, value: Node) -> Member {
    Member {
        leading: String::new(),
        indent: String::new(),
        key: key.map(|k| Key {
            raw: render_key(k, Context::Flow),
            text: k.to_string(),
        }),
        marker: String::new(),
        head: Tail::default(),
        between: String::new(),
        value,
        line: 0,
        column: 0,
        in_flow: true,
    }
}

/// Make sure the last line written by `member` ends with a line break
fn ensure_eol(member: &mut Member, eol: &str) {
    match &mut member.value {
        Node::Mapping(Mapping {
            layout: Layout::Block,
            entries: children,
            ..
        })
        | Node::Sequence(Sequence {
            layout: Layout::Block,
            items: children,
            ..
        }) => {
            if let Some(last) = children.last_mut() {
                ensure_eol(last, eol);
            } else if member.head.eol.is_empty() {
                member.head.eol = eol.to_string();
            }
        }
        Node::Scalar(s) if !s.body.is_empty() => {
            if !s.body.ends_with('\n') {
                s.body.push_str(eol);
            }
        }
        node => {
            if let Some(tail) = node.tail_mut() {
                if tail.eol.is_empty() {
                    tail.eol = eol.to_string();
                }
            }
        }
    }
}

fn collection_column(node: &Node) -> usize {
    match node {
        Node::Mapping(m) => m.column,
        Node::Sequence(s) => s.column,
        Node::Scalar(_) => 0,
    }
}

fn children_mut(node: &mut Node) -> Option<&mut Vec<Member>> {
    match node {
        Node::Mapping(m) => Some(&mut m.entries),
        Node::Sequence(s) => Some(&mut s.items),
        Node::Scalar(_) => None,
    }
}

fn child_mut<'a>(node: &'a mut Node, segment: &str) -> Option<&'a mut Member> {
    match node {
        Node::Mapping(m) => m.get_mut(segment),
        Node::Sequence(s) => parse_index(segment).and_then(move |i| s.items.get_mut(i)),
        Node::Scalar(_) => None,
    }
}

/// `{a: {b: value}}` for the remaining segments `[a, b]`
fn nest(segments: &[String], value: &Value) -> Value {
    segments.iter().rev().fold(value.clone(), |inner, segment| {
        let mut map = Map::new();
        map.insert(segment.clone(), inner);
        Value::Object(map)
    })
}

/// Decimal sequence index; signs and other text are rejected
pub(crate) fn parse_index(segment: &str) -> Option<usize> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}

fn pointer_of(segments: &[String]) -> String {
    path_to_pointer(&NodePath::new(segments.to_vec()))
}
