//! # Annotated YAML tree
//!
//! Every byte of the parsed source is owned by some node of this tree, so
//! writing the tree back out reproduces the source exactly until an edit
//! replaces part of it.
//!
//! A block collection is a list of [`Member`]s. A member owns everything
//! on its first line: the comment/blank lines above it (`leading`), the
//! indentation, the key (mappings only), the `:` or `-` marker, and for
//! inline values the rest of the line through the value's [`Tail`].
//!
//! ```text
//! # about info            <- leading
//! info:   # comment       <- indent, key, marker, head
//!   title: A  # t         <- child member: marker ": ", scalar raw "A", tail "  # t\n"
//! ```

use crate::scalar::ScalarStyle;
use serde_json::Value;

/// End of an inline line: trailing whitespace/comment and the line break.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tail {
    pub(crate) trail: String,
    pub(crate) eol: String,
}

impl Tail {
    pub(crate) fn new(trail: impl Into<String>, eol: impl Into<String>) -> Self {
        Self {
            trail: trail.into(),
            eol: eol.into(),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.trail.is_empty() && self.eol.is_empty()
    }

    /// The comment text after `#`, if the line carries one
    pub fn comment(&self) -> Option<&str> {
        let start = self.trail.find('#')?;
        Some(self.trail[start + 1..].trim())
    }

    fn write(&self, out: &mut String) {
        out.push_str(&self.trail);
        out.push_str(&self.eol);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scalar {
    pub(crate) value: Value,
    pub(crate) raw: String,
    pub(crate) style: ScalarStyle,
    pub(crate) tail: Tail,
    /// Body lines of a block scalar, empty for every other style
    pub(crate) body: String,
}

impl Scalar {
    /// Implicit null of `key:` with nothing after it
    pub(crate) fn empty() -> Self {
        Self {
            value: Value::Null,
            raw: String::new(),
            style: ScalarStyle::Plain,
            tail: Tail::default(),
            body: String::new(),
        }
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn style(&self) -> ScalarStyle {
        self.style
    }

    /// Source text of the scalar as written (the header for block scalars)
    pub fn raw(&self) -> &str {
        &self.raw
    }
}

/// Block collections are laid out by indentation; flow collections sit on
/// one logical line and keep their original text until edited.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Layout {
    Block,
    Flow { raw: Option<String>, tail: Tail },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Mapping {
    pub(crate) column: usize,
    pub(crate) layout: Layout,
    pub(crate) entries: Vec<Member>,
}

impl Mapping {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter_map(|entry| entry.key.as_ref().map(|k| k.text.as_str()))
    }

    pub(crate) fn position(&self, key: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.key.as_ref().map(|k| k.text == key).unwrap_or(false))
    }

    pub(crate) fn get(&self, key: &str) -> Option<&Member> {
        self.position(key).map(|i| &self.entries[i])
    }

    pub(crate) fn get_mut(&mut self, key: &str) -> Option<&mut Member> {
        self.position(key).map(move |i| &mut self.entries[i])
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sequence {
    pub(crate) column: usize,
    pub(crate) layout: Layout,
    pub(crate) items: Vec<Member>,
}

impl Sequence {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Scalar(Scalar),
    Mapping(Mapping),
    Sequence(Sequence),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Scalar,
    Mapping,
    Sequence,
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Scalar(_) => NodeKind::Scalar,
            Node::Mapping(_) => NodeKind::Mapping,
            Node::Sequence(_) => NodeKind::Sequence,
        }
    }

    pub(crate) fn kind_name(&self) -> &'static str {
        match self {
            Node::Scalar(s) if s.value.is_null() => "null",
            Node::Scalar(_) => "scalar",
            Node::Mapping(_) => "mapping",
            Node::Sequence(_) => "sequence",
        }
    }

    /// Block collections with at least one child are written on the lines
    /// below their owner; everything else sits on the owner's line.
    pub(crate) fn is_block(&self) -> bool {
        match self {
            Node::Mapping(m) => m.layout == Layout::Block,
            Node::Sequence(s) => s.layout == Layout::Block,
            Node::Scalar(_) => false,
        }
    }

    pub(crate) fn is_flow_collection(&self) -> bool {
        match self {
            Node::Mapping(m) => matches!(m.layout, Layout::Flow { .. }),
            Node::Sequence(s) => matches!(s.layout, Layout::Flow { .. }),
            Node::Scalar(_) => false,
        }
    }

    /// Line ending of an inline node
    pub(crate) fn tail(&self) -> Option<&Tail> {
        match self {
            Node::Scalar(s) => Some(&s.tail),
            Node::Mapping(Mapping {
                layout: Layout::Flow { tail, .. },
                ..
            })
            | Node::Sequence(Sequence {
                layout: Layout::Flow { tail, .. },
                ..
            }) => Some(tail),
            _ => None,
        }
    }

    pub(crate) fn tail_mut(&mut self) -> Option<&mut Tail> {
        match self {
            Node::Scalar(s) => Some(&mut s.tail),
            Node::Mapping(Mapping {
                layout: Layout::Flow { tail, .. },
                ..
            })
            | Node::Sequence(Sequence {
                layout: Layout::Flow { tail, .. },
                ..
            }) => Some(tail),
            _ => None,
        }
    }

    /// Forget the original text of a flow collection so it is re-rendered
    pub(crate) fn invalidate_flow(&mut self) {
        match self {
            Node::Mapping(Mapping {
                layout: Layout::Flow { raw, .. },
                ..
            })
            | Node::Sequence(Sequence {
                layout: Layout::Flow { raw, .. },
                ..
            }) => *raw = None,
            _ => {}
        }
    }

    pub(crate) fn write(&self, out: &mut String) {
        match self {
            Node::Scalar(s) => {
                out.push_str(&s.raw);
                s.tail.write(out);
                out.push_str(&s.body);
            }
            Node::Mapping(Mapping {
                layout: Layout::Block,
                entries,
                ..
            }) => entries.iter().for_each(|m| m.write(out)),
            Node::Sequence(Sequence {
                layout: Layout::Block,
                items,
                ..
            }) => items.iter().for_each(|m| m.write(out)),
            Node::Mapping(Mapping {
                layout: Layout::Flow { tail, .. },
                ..
            })
            | Node::Sequence(Sequence {
                layout: Layout::Flow { tail, .. },
                ..
            }) => {
                out.push_str(&self.flow_text());
                tail.write(out);
            }
        }
    }

    /// Single-line text of a node inside a flow collection
    pub(crate) fn flow_text(&self) -> String {
        match self {
            Node::Scalar(s) => s.raw.clone(),
            Node::Mapping(Mapping {
                layout: Layout::Flow { raw: Some(raw), .. },
                ..
            })
            | Node::Sequence(Sequence {
                layout: Layout::Flow { raw: Some(raw), .. },
                ..
            }) => raw.clone(),
            Node::Mapping(m) => {
                let parts: Vec<String> = m
                    .entries
                    .iter()
                    .map(|entry| {
                        let key = entry.key.as_ref().map(|k| k.raw.trim_end()).unwrap_or("");
                        let value = entry.value.flow_text();
                        if value.is_empty() {
                            key.to_string()
                        } else {
                            format!("{}: {}", key, value)
                        }
                    })
                    .collect();
                if parts.is_empty() {
                    "{}".to_string()
                } else {
                    format!("{{{}}}", parts.join(", "))
                }
            }
            Node::Sequence(s) => {
                let parts: Vec<String> =
                    s.items.iter().map(|item| item.value.flow_text()).collect();
                format!("[{}]", parts.join(", "))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Key {
    /// Key as written, including any spaces before the colon
    pub(crate) raw: String,
    pub(crate) text: String,
}

/// One entry of a mapping or one item of a sequence, with the formatting
/// that surrounds it.
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    pub(crate) leading: String,
    pub(crate) indent: String,
    pub(crate) key: Option<Key>,
    /// `:` or `-` plus the whitespace up to an inline value
    pub(crate) marker: String,
    /// Rest of the first line when the value does not start on it
    pub(crate) head: Tail,
    /// Comment lines and indentation before a value written on the next line
    pub(crate) between: String,
    pub(crate) value: Node,
    /// 1-based line and 0-based column of the key or dash
    pub(crate) line: usize,
    pub(crate) column: usize,
    pub(crate) in_flow: bool,
}

impl Member {
    pub fn key(&self) -> Option<&str> {
        self.key.as_ref().map(|k| k.text.as_str())
    }

    pub fn value(&self) -> &Node {
        &self.value
    }

    /// Whether the value starts on the member's own line
    pub(crate) fn is_inline(&self) -> bool {
        self.head.is_empty() && self.between.is_empty()
    }

    pub(crate) fn write(&self, out: &mut String) {
        out.push_str(&self.leading);
        out.push_str(&self.indent);
        if let Some(key) = &self.key {
            out.push_str(&key.raw);
        }
        out.push_str(&self.marker);
        self.head.write(out);
        out.push_str(&self.between);
        self.value.write(out);
    }
}

/// Formatting conventions detected in the source and used for new nodes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Style {
    pub indent_unit: usize,
    pub eol: String,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            indent_unit: 2,
            eol: "\n".to_string(),
        }
    }
}

/// A parsed document: the root mapping plus the text around it
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Byte-order mark written ahead of everything else, if the source had one
    pub(crate) prefix: String,
    /// Root member: keyless, markerless; its `leading` holds the header
    pub(crate) root: Member,
    pub(crate) suffix: String,
    pub(crate) style: Style,
}

impl Document {
    pub fn root(&self) -> &Node {
        &self.root.value
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    pub fn serialize(&self) -> String {
        let mut out = self.prefix.clone();
        self.root.write(&mut out);
        out.push_str(&self.suffix);
        out
    }
}

/// Borrowed view of a node together with the member that owns it
#[derive(Debug, Clone, Copy)]
pub struct NodeRef<'a> {
    pub(crate) member: &'a Member,
}

impl<'a> NodeRef<'a> {
    pub fn node(&self) -> &'a Node {
        &self.member.value
    }

    pub fn kind(&self) -> NodeKind {
        self.member.value.kind()
    }

    pub fn key(&self) -> Option<&'a str> {
        self.member.key()
    }

    /// Plain value of the node and everything below it
    pub fn to_value(&self) -> Value {
        self.member.value.to_value()
    }

    pub fn as_scalar(&self) -> Option<&'a Scalar> {
        match &self.member.value {
            Node::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn scalar_style(&self) -> Option<ScalarStyle> {
        self.as_scalar().map(|s| s.style)
    }

    /// Number of children, zero for scalars
    pub fn len(&self) -> usize {
        match &self.member.value {
            Node::Scalar(_) => 0,
            Node::Mapping(m) => m.len(),
            Node::Sequence(s) => s.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_flow(&self) -> bool {
        self.member.value.is_flow_collection()
    }

    /// Full-line comments directly above the node, without the `#`
    pub fn comment_before(&self) -> Option<String> {
        let lines: Vec<&str> = self
            .member
            .leading
            .lines()
            .map(str::trim)
            .filter(|l| l.starts_with('#'))
            .map(|l| l[1..].trim())
            .collect();
        if lines.is_empty() {
            None
        } else {
            Some(lines.join("\n"))
        }
    }

    /// Trailing comment on the node's first line
    pub fn comment(&self) -> Option<&'a str> {
        if let Some(comment) = self.member.head.comment() {
            return Some(comment);
        }
        self.member.value.tail().and_then(Tail::comment)
    }

    /// 1-based line of the key or dash introducing the node
    pub fn line(&self) -> usize {
        self.member.line
    }

    /// 1-based column of the key or dash introducing the node
    pub fn column(&self) -> usize {
        self.member.column + 1
    }
}
