//! # YAML Parser
//!
//! Line-oriented recursive descent over block structure. Flow collections
//! are tokenized with [`crate::lexer`]. Comment and blank lines are
//! collected in `pending` until the next member claims them as its
//! `leading` text, so nothing in the source is dropped.

use crate::ast::*;
use crate::error::{ParseError, ParseResult, Position};
use crate::lexer::{tokenize_flow, FlowToken, Spanned};
use crate::scalar::{
    decode_block, decode_double, decode_single, fold_lines, resolve_plain, BlockHeader, Chomp,
    ScalarStyle,
};

#[derive(Debug, Clone, Copy)]
struct Line<'src> {
    start: usize,
    text: &'src str,
    eol: &'src str,
}

/// Parser for one YAML document
pub struct Parser<'src> {
    source: &'src str,
    lines: Vec<Line<'src>>,
    pos: usize,
    pending: String,
    indent_unit: Option<usize>,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            lines: split_lines(source),
            pos: 0,
            pending: String::new(),
            indent_unit: None,
        }
    }

    /// Parse the whole source into a [`Document`]
    pub fn parse_document(mut self) -> ParseResult<Document> {
        self.parse_header()?;
        if self.done() {
            return Err(ParseError::EmptyDocument);
        }

        let idx = self.pos;
        let line = self.lines[idx];
        self.check_tabs()?;
        let col = indent_of(line.text);

        let root = if starts_sequence(line.text, col)
            || self.scan_key(line.text, col, idx)?.is_some()
        {
            let value = if starts_sequence(line.text, col) {
                self.parse_sequence(col, false)?
            } else {
                self.parse_mapping(col, false)?
            };
            Member {
                leading: String::new(),
                indent: String::new(),
                key: None,
                marker: String::new(),
                head: Tail::default(),
                between: String::new(),
                value,
                line: idx + 1,
                column: col,
                in_flow: false,
            }
        } else {
            let leading = std::mem::take(&mut self.pending);
            let value = self.parse_inline(idx, col, 0)?;
            Member {
                leading,
                indent: line.text[..col].to_string(),
                key: None,
                marker: String::new(),
                head: Tail::default(),
                between: String::new(),
                value,
                line: idx + 1,
                column: col,
                in_flow: false,
            }
        };

        if !matches!(root.value, Node::Mapping(_)) {
            return Err(ParseError::RootNotMapping {
                found: root.value.kind_name(),
            });
        }

        self.parse_footer()?;

        let eol = self
            .lines
            .iter()
            .map(|l| l.eol)
            .find(|eol| !eol.is_empty())
            .unwrap_or("\n");

        Ok(Document {
            prefix: String::new(),
            root,
            suffix: std::mem::take(&mut self.pending),
            style: Style {
                indent_unit: self.indent_unit.unwrap_or(2),
                eol: eol.to_string(),
            },
        })
    }

    /// Comments, directives and a `---` line ahead of the root node
    fn parse_header(&mut self) -> ParseResult<()> {
        let mut seen_start = false;
        while let Some(line) = self.lines.get(self.pos).copied() {
            if is_trivia(line.text) || (!seen_start && line.text.starts_with('%')) {
                self.take_trivia_line();
                continue;
            }
            if !seen_start && is_marker(line.text, "---") {
                if !is_trivia(&line.text[3..]) {
                    return Err(ParseError::unsupported(
                        self.position(self.pos, 4),
                        "content on the document start line",
                    ));
                }
                seen_start = true;
                self.take_trivia_line();
                continue;
            }
            break;
        }
        Ok(())
    }

    /// Trailing comments and an optional `...`; anything else is an error
    fn parse_footer(&mut self) -> ParseResult<()> {
        self.skip_trivia();
        if let Some(line) = self.lines.get(self.pos).copied() {
            if is_marker(line.text, "...") {
                self.take_trivia_line();
                self.skip_trivia();
            }
        }
        if let Some(line) = self.lines.get(self.pos).copied() {
            let pos = self.position(self.pos, indent_of(line.text));
            if is_marker(line.text, "---") || is_marker(line.text, "...") {
                return Err(ParseError::unsupported(pos, "multiple documents are not supported"));
            }
            return Err(ParseError::invalid_syntax(pos, "unexpected content after the root node"));
        }
        Ok(())
    }

    fn parse_mapping(&mut self, col: usize, compact: bool) -> ParseResult<Node> {
        let mut entries: Vec<Member> = Vec::new();
        let mut first = true;

        loop {
            let continues_line = first && compact;
            if !continues_line {
                self.skip_trivia();
                let Some(line) = self.lines.get(self.pos).copied() else {
                    break;
                };
                if is_document_marker(line.text) {
                    break;
                }
                let ind = indent_of(line.text);
                if ind < col {
                    break;
                }
                self.check_tabs()?;
                if ind > col {
                    return Err(ParseError::invalid_syntax(
                        self.position(self.pos, ind),
                        "unexpected indentation",
                    ));
                }
                if starts_sequence(line.text, col) {
                    break;
                }
            }

            let line = self.lines[self.pos];
            let (leading, indent) = if continues_line {
                (String::new(), String::new())
            } else {
                (std::mem::take(&mut self.pending), line.text[..col].to_string())
            };
            let entry = self.parse_entry(col, leading, indent)?;

            if let Some(key) = &entry.key {
                if entries.iter().any(|e| e.key.as_ref().map(|k| &k.text) == Some(&key.text)) {
                    return Err(ParseError::DuplicateKey {
                        pos: Position::new(entry.line, col + 1),
                        key: key.text.clone(),
                    });
                }
            }
            entries.push(entry);
            first = false;
        }

        Ok(Node::Mapping(Mapping {
            column: col,
            layout: Layout::Block,
            entries,
        }))
    }

    fn parse_entry(&mut self, col: usize, leading: String, indent: String) -> ParseResult<Member> {
        let idx = self.pos;
        let line = self.lines[idx];
        let text = line.text;

        let colon = self
            .scan_key(text, col, idx)?
            .ok_or_else(|| {
                ParseError::invalid_syntax(self.position(idx, col), "expected a mapping key")
            })?;
        let key_raw = &text[col..colon];
        let key = Key {
            raw: key_raw.to_string(),
            text: self.decode_key(key_raw.trim_end(), idx, col)?,
        };

        let after = colon + 1;
        let ws_end = after + leading_ws(&text[after..]);

        if ws_end == text.len() || text[ws_end..].starts_with('#') {
            self.pos += 1;
            let head = Tail::new(&text[after..], line.eol);
            let (between, value) = self.parse_block_value(col, true)?;
            return Ok(Member {
                leading,
                indent,
                key: Some(key),
                marker: ":".to_string(),
                head,
                between,
                value,
                line: idx + 1,
                column: col,
                in_flow: false,
            });
        }

        let marker = text[colon..ws_end].to_string();
        let value = self.parse_inline(idx, ws_end, col)?;
        Ok(Member {
            leading,
            indent,
            key: Some(key),
            marker,
            head: Tail::default(),
            between: String::new(),
            value,
            line: idx + 1,
            column: col,
            in_flow: false,
        })
    }

    fn parse_sequence(&mut self, col: usize, compact: bool) -> ParseResult<Node> {
        let mut items = Vec::new();
        let mut first = true;

        loop {
            let continues_line = first && compact;
            if !continues_line {
                self.skip_trivia();
                let Some(line) = self.lines.get(self.pos).copied() else {
                    break;
                };
                if is_document_marker(line.text) {
                    break;
                }
                let ind = indent_of(line.text);
                if ind > col {
                    return Err(ParseError::invalid_syntax(
                        self.position(self.pos, ind),
                        "unexpected indentation",
                    ));
                }
                if ind < col || !starts_sequence(line.text, col) {
                    break;
                }
                self.check_tabs()?;
            }

            let idx = self.pos;
            let line = self.lines[idx];
            let text = line.text;
            let (leading, indent) = if continues_line {
                (String::new(), String::new())
            } else {
                (std::mem::take(&mut self.pending), text[..col].to_string())
            };

            let after = col + 1;
            let ws_end = after + leading_ws(&text[after..]);

            let item = if ws_end == text.len() || text[ws_end..].starts_with('#') {
                self.pos += 1;
                let head = Tail::new(&text[after..], line.eol);
                let (between, value) = self.parse_block_value(col, false)?;
                Member {
                    leading,
                    indent,
                    key: None,
                    marker: "-".to_string(),
                    head,
                    between,
                    value,
                    line: idx + 1,
                    column: col,
                    in_flow: false,
                }
            } else {
                let value = if starts_sequence(text, ws_end) {
                    self.note_indent(ws_end - col);
                    self.parse_sequence(ws_end, true)?
                } else if self.scan_key(text, ws_end, idx)?.is_some() {
                    self.note_indent(ws_end - col);
                    self.parse_mapping(ws_end, true)?
                } else {
                    self.parse_inline(idx, ws_end, col)?
                };
                Member {
                    leading,
                    indent,
                    key: None,
                    marker: text[col..ws_end].to_string(),
                    head: Tail::default(),
                    between: String::new(),
                    value,
                    line: idx + 1,
                    column: col,
                    in_flow: false,
                }
            };

            items.push(item);
            first = false;
        }

        Ok(Node::Sequence(Sequence {
            column: col,
            layout: Layout::Block,
            items,
        }))
    }

    /// Value of a member whose first line ends after its marker: a nested
    /// block, a scalar on the next line, or an implicit null.
    fn parse_block_value(
        &mut self,
        col: usize,
        allow_same_indent_seq: bool,
    ) -> ParseResult<(String, Node)> {
        self.skip_trivia();
        let Some(line) = self.lines.get(self.pos).copied() else {
            return Ok((String::new(), Node::Scalar(Scalar::empty())));
        };
        if is_document_marker(line.text) {
            return Ok((String::new(), Node::Scalar(Scalar::empty())));
        }

        let ind = indent_of(line.text);
        if ind > col {
            self.check_tabs()?;
            self.note_indent(ind - col);
            if starts_sequence(line.text, ind) {
                return Ok((String::new(), self.parse_sequence(ind, false)?));
            }
            if self.scan_key(line.text, ind, self.pos)?.is_some() {
                return Ok((String::new(), self.parse_mapping(ind, false)?));
            }
            let mut between = std::mem::take(&mut self.pending);
            between.push_str(&line.text[..ind]);
            let value = self.parse_inline(self.pos, ind, col)?;
            return Ok((between, value));
        }

        if ind == col && allow_same_indent_seq && starts_sequence(line.text, ind) {
            return Ok((String::new(), self.parse_sequence(ind, false)?));
        }

        Ok((String::new(), Node::Scalar(Scalar::empty())))
    }

    /// Scalar or flow collection starting at `col` of line `idx`.
    /// `parent_col` is the column of the owning key or dash.
    fn parse_inline(&mut self, idx: usize, col: usize, parent_col: usize) -> ParseResult<Node> {
        let text = self.lines[idx].text;
        let rest = &text[col..];
        let pos = self.position(idx, col);

        match rest.chars().next() {
            Some('"') | Some('\'') => self.parse_quoted(idx, col),
            Some('[') | Some('{') => self.parse_flow(idx, col),
            Some('|') | Some('>') => self.parse_block_scalar(idx, col, parent_col),
            Some('&') | Some('*') | Some('!') => Err(ParseError::unsupported(
                pos,
                "anchors, aliases and tags are not supported",
            )),
            Some('@') | Some('`') | Some('%') => {
                Err(ParseError::invalid_syntax(pos, "reserved indicator at start of scalar"))
            }
            Some('-') if starts_sequence(text, col) => {
                Err(ParseError::invalid_syntax(pos, "sequence entries are not allowed here"))
            }
            Some('?') if rest == "?" || rest.starts_with("? ") => {
                Err(ParseError::unsupported(pos, "complex mapping keys are not supported"))
            }
            _ => self.parse_plain(idx, col, parent_col),
        }
    }

    fn parse_plain(&mut self, idx: usize, col: usize, parent_col: usize) -> ParseResult<Node> {
        let line = self.lines[idx];
        let comment_at = find_comment(line.text, col);
        let content_end = col + line.text[col..comment_at].trim_end().len();
        check_plain_content(&line.text[col..content_end])
            .map_err(|msg| ParseError::invalid_syntax(self.position(idx, col), msg))?;

        let mut end_line = idx;
        let mut end_col = content_end;

        if comment_at == line.text.len() {
            let mut next = idx + 1;
            loop {
                let mut k = next;
                while k < self.lines.len() && self.lines[k].text.trim().is_empty() {
                    k += 1;
                }
                let Some(candidate) = self.lines.get(k).copied() else {
                    break;
                };
                let ind = indent_of(candidate.text);
                if ind <= parent_col
                    || candidate.text[ind..].starts_with('#')
                    || is_document_marker(candidate.text)
                {
                    break;
                }
                let c_comment = find_comment(candidate.text, ind);
                let c_end = ind + candidate.text[ind..c_comment].trim_end().len();
                check_plain_content(&candidate.text[ind..c_end])
                    .map_err(|msg| ParseError::invalid_syntax(self.position(k, ind), msg))?;
                end_line = k;
                end_col = c_end;
                next = k + 1;
                if c_comment < candidate.text.len() {
                    break;
                }
            }
        }

        let start = line.start + col;
        let end = self.lines[end_line].start + end_col;
        let raw = &self.source[start..end];
        let last = self.lines[end_line];
        let value = if end_line == idx {
            resolve_plain(raw)
        } else {
            resolve_plain(&fold_lines(raw))
        };

        self.pos = end_line + 1;
        Ok(Node::Scalar(Scalar {
            value,
            raw: raw.to_string(),
            style: ScalarStyle::Plain,
            tail: Tail::new(&last.text[end_col..], last.eol),
            body: String::new(),
        }))
    }

    fn parse_quoted(&mut self, idx: usize, col: usize) -> ParseResult<Node> {
        let start = self.lines[idx].start + col;
        let bytes = self.source.as_bytes();
        let quote = bytes[start];

        let mut i = start + 1;
        let close = loop {
            if i >= bytes.len() {
                return Err(ParseError::unexpected_eof(
                    self.position(idx, col),
                    "unterminated quoted scalar",
                ));
            }
            match bytes[i] {
                b'\\' if quote == b'"' => i += 2,
                b'\'' if quote == b'\'' && bytes.get(i + 1) == Some(&b'\'') => i += 2,
                b if b == quote => break i,
                _ => i += 1,
            }
        };

        let inner = &self.source[start + 1..close];
        let (value, style) = if quote == b'"' {
            let decoded = decode_double(inner)
                .map_err(|msg| ParseError::invalid_syntax(self.position(idx, col), msg))?;
            (decoded, ScalarStyle::DoubleQuoted)
        } else {
            (decode_single(inner), ScalarStyle::SingleQuoted)
        };

        let end_line = self.line_at(close);
        let tail = self.inline_tail(end_line, close + 1 - self.lines[end_line].start)?;
        self.pos = end_line + 1;

        Ok(Node::Scalar(Scalar {
            value: serde_json::Value::String(value),
            raw: self.source[start..=close].to_string(),
            style,
            tail,
            body: String::new(),
        }))
    }

    fn parse_block_scalar(
        &mut self,
        idx: usize,
        col: usize,
        parent_col: usize,
    ) -> ParseResult<Node> {
        let line = self.lines[idx];
        let header_len = line.text[col..]
            .find([' ', '\t'])
            .unwrap_or(line.text.len() - col);
        let header_raw = &line.text[col..col + header_len];
        let header = BlockHeader::parse(header_raw).ok_or_else(|| {
            ParseError::invalid_syntax(self.position(idx, col), "invalid block scalar header")
        })?;
        let tail = self.inline_tail(idx, col + header_len)?;

        let content_indent = match header.indent {
            Some(m) => parent_col + m,
            None => self.lines[idx + 1..]
                .iter()
                .find(|next| !next.text.trim().is_empty())
                .map(|next| indent_of(next.text))
                .filter(|&indent| indent > parent_col)
                .unwrap_or(parent_col + 1),
        };

        let mut j = idx + 1;
        let mut last_content = idx;
        while let Some(next) = self.lines.get(j) {
            let text = next.text;
            if text.trim().is_empty() {
                j += 1;
                continue;
            }
            let indent = indent_of(text);
            if indent >= content_indent {
                last_content = j;
                j += 1;
                continue;
            }
            // A shallower comment closes the scalar; anything else is malformed
            if indent > parent_col && !text.trim_start().starts_with('#') {
                return Err(ParseError::invalid_syntax(
                    self.position(j, indent),
                    "block scalar line is less indented than its content",
                ));
            }
            break;
        }
        let body_end = if header.chomp == Chomp::Keep { j } else { last_content + 1 };

        let body = if body_end > idx + 1 {
            let from = self.lines[idx + 1].start;
            let to = self.lines.get(body_end).map(|l| l.start).unwrap_or(self.source.len());
            &self.source[from..to]
        } else {
            ""
        };

        self.pos = body_end.max(idx + 1);
        Ok(Node::Scalar(Scalar {
            value: serde_json::Value::String(decode_block(header, body, parent_col)),
            raw: header_raw.to_string(),
            style: if header.folded {
                ScalarStyle::Folded
            } else {
                ScalarStyle::Literal
            },
            tail,
            body: body.to_string(),
        }))
    }

    fn parse_flow(&mut self, idx: usize, col: usize) -> ParseResult<Node> {
        let start = self.lines[idx].start + col;
        let tokens = tokenize_flow(&self.source[start..]).map_err(|(offset, msg)| {
            let pos = self.position_at(start + offset);
            if start + offset >= self.source.len() {
                ParseError::unexpected_eof(pos, msg)
            } else {
                ParseError::invalid_syntax(pos, msg)
            }
        })?;
        let end = start + tokens.last().map(|(_, span)| span.end).unwrap_or(0);

        let mut cursor = 0;
        let mut node = self.flow_node(start, &tokens, &mut cursor)?;

        let end_line = self.line_at(end - 1);
        let tail = self.inline_tail(end_line, end - self.lines[end_line].start)?;
        if let Node::Mapping(Mapping { layout, .. }) | Node::Sequence(Sequence { layout, .. }) =
            &mut node
        {
            *layout = Layout::Flow {
                raw: Some(self.source[start..end].to_string()),
                tail,
            };
        }
        self.pos = end_line + 1;
        Ok(node)
    }

    fn flow_node(&self, base: usize, tokens: &[Spanned], cursor: &mut usize) -> ParseResult<Node> {
        let src = &self.source[base..];
        skip_flow_comments(tokens, cursor);
        let (token, span) = tokens
            .get(*cursor)
            .cloned()
            .ok_or_else(|| {
                ParseError::unexpected_eof(
                    self.position_at(base + src.len()),
                    "expected a flow value",
                )
            })?;
        let start = span.start;

        match token {
            FlowToken::SeqStart => {
                *cursor += 1;
                let mut items = Vec::new();
                loop {
                    skip_flow_comments(tokens, cursor);
                    if let Some((FlowToken::SeqEnd, _)) = tokens.get(*cursor) {
                        *cursor += 1;
                        break;
                    }
                    let item_start = tokens.get(*cursor).map(|(_, s)| s.start).unwrap_or(start);
                    let value = self.flow_node(base, tokens, cursor)?;
                    items.push(self.flow_member(None, value, base + item_start));
                    self.flow_separator(base, tokens, cursor, FlowToken::SeqEnd)?;
                }
                let end = tokens[*cursor - 1].1.end;
                Ok(Node::Sequence(Sequence {
                    column: 0,
                    layout: Layout::Flow {
                        raw: Some(src[start..end].to_string()),
                        tail: Tail::default(),
                    },
                    items,
                }))
            }
            FlowToken::MapStart => {
                *cursor += 1;
                let mut entries: Vec<Member> = Vec::new();
                loop {
                    skip_flow_comments(tokens, cursor);
                    let Some((token, span)) = tokens.get(*cursor).cloned() else {
                        return Err(ParseError::unexpected_eof(
                            self.position_at(base + src.len()),
                            "unterminated flow mapping",
                        ));
                    };
                    if token == FlowToken::MapEnd {
                        *cursor += 1;
                        break;
                    }
                    let key_raw = src[span.clone()].trim_end();
                    let key_text = match token {
                        FlowToken::Plain => key_raw.to_string(),
                        FlowToken::DoubleQuoted => decode_double(&key_raw[1..key_raw.len() - 1])
                            .map_err(|msg| {
                                ParseError::invalid_syntax(self.position_at(base + span.start), msg)
                            })?,
                        FlowToken::SingleQuoted => decode_single(&key_raw[1..key_raw.len() - 1]),
                        _ => {
                            return Err(ParseError::invalid_syntax(
                                self.position_at(base + span.start),
                                "expected a flow mapping key",
                            ))
                        }
                    };
                    if entries.iter().any(|e| e.key() == Some(key_text.as_str())) {
                        return Err(ParseError::DuplicateKey {
                            pos: self.position_at(base + span.start),
                            key: key_text,
                        });
                    }
                    *cursor += 1;
                    skip_flow_comments(tokens, cursor);

                    let value = match tokens.get(*cursor) {
                        Some((FlowToken::Colon, _)) => {
                            *cursor += 1;
                            skip_flow_comments(tokens, cursor);
                            match tokens.get(*cursor) {
                                Some((FlowToken::Comma, _)) | Some((FlowToken::MapEnd, _)) => {
                                    Node::Scalar(Scalar::empty())
                                }
                                _ => self.flow_node(base, tokens, cursor)?,
                            }
                        }
                        _ => Node::Scalar(Scalar::empty()),
                    };

                    let key = Key {
                        raw: key_raw.to_string(),
                        text: key_text,
                    };
                    entries.push(self.flow_member(Some(key), value, base + span.start));
                    self.flow_separator(base, tokens, cursor, FlowToken::MapEnd)?;
                }
                let end = tokens[*cursor - 1].1.end;
                Ok(Node::Mapping(Mapping {
                    column: 0,
                    layout: Layout::Flow {
                        raw: Some(src[start..end].to_string()),
                        tail: Tail::default(),
                    },
                    entries,
                }))
            }
            FlowToken::Plain | FlowToken::DoubleQuoted | FlowToken::SingleQuoted => {
                *cursor += 1;
                let raw = src[span.clone()].trim_end();
                let pos = self.position_at(base + span.start);
                let (value, style) = match token {
                    FlowToken::Plain => {
                        if raw.starts_with(['&', '*', '!']) {
                            return Err(ParseError::unsupported(
                                pos,
                                "anchors, aliases and tags are not supported",
                            ));
                        }
                        (resolve_plain(raw), ScalarStyle::Plain)
                    }
                    FlowToken::DoubleQuoted => (
                        serde_json::Value::String(
                            decode_double(&raw[1..raw.len() - 1])
                                .map_err(|msg| ParseError::invalid_syntax(pos, msg))?,
                        ),
                        ScalarStyle::DoubleQuoted,
                    ),
                    _ => (
                        serde_json::Value::String(decode_single(&raw[1..raw.len() - 1])),
                        ScalarStyle::SingleQuoted,
                    ),
                };
                Ok(Node::Scalar(Scalar {
                    value,
                    raw: raw.to_string(),
                    style,
                    tail: Tail::default(),
                    body: String::new(),
                }))
            }
            _ => Err(ParseError::invalid_syntax(
                self.position_at(base + span.start),
                format!("unexpected '{}' in flow collection", &src[span]),
            )),
        }
    }

    /// Consume the `,` after a flow child, or stop before the closing bracket
    fn flow_separator(
        &self,
        base: usize,
        tokens: &[Spanned],
        cursor: &mut usize,
        close: FlowToken,
    ) -> ParseResult<()> {
        skip_flow_comments(tokens, cursor);
        match tokens.get(*cursor) {
            Some((FlowToken::Comma, _)) => {
                *cursor += 1;
                Ok(())
            }
            Some((token, _)) if *token == close => Ok(()),
            Some((_, span)) => Err(ParseError::invalid_syntax(
                self.position_at(base + span.start),
                "expected ',' or a closing bracket",
            )),
            None => Err(ParseError::unexpected_eof(
                self.position_at(self.source.len()),
                "unterminated flow collection",
            )),
        }
    }

    fn flow_member(&self, key: Option<Key>, value: Node, offset: usize) -> Member {
        let line = self.line_at(offset);
        Member {
            leading: String::new(),
            indent: String::new(),
            key,
            marker: String::new(),
            head: Tail::default(),
            between: String::new(),
            value,
            line: line + 1,
            column: offset - self.lines[line].start,
            in_flow: true,
        }
    }

    /// Whitespace and comment after an inline value, plus the line break
    fn inline_tail(&self, idx: usize, from: usize) -> ParseResult<Tail> {
        let line = self.lines[idx];
        let rest = &line.text[from..];
        let trimmed = rest.trim_start_matches([' ', '\t']);
        let has_gap = trimmed.len() < rest.len();
        if !trimmed.is_empty() && !(trimmed.starts_with('#') && has_gap) {
            return Err(ParseError::invalid_syntax(
                self.position(idx, from),
                "unexpected text after value",
            ));
        }
        Ok(Tail::new(rest, line.eol))
    }

    /// Find the `:` ending a mapping key that starts at `col`
    fn scan_key(&self, text: &str, col: usize, idx: usize) -> ParseResult<Option<usize>> {
        let rest = &text[col..];
        let colon_follows = |i: usize| {
            text.as_bytes().get(i) == Some(&b':')
                && matches!(text.as_bytes().get(i + 1), None | Some(b' ') | Some(b'\t'))
        };

        match rest.chars().next() {
            None | Some('#') | Some('[') | Some('{') => Ok(None),
            Some('?') if rest == "?" || rest.starts_with("? ") => Err(ParseError::unsupported(
                self.position(idx, col),
                "complex mapping keys are not supported",
            )),
            Some(q @ ('"' | '\'')) => {
                let Some(close) = quote_end_on_line(text, col, q) else {
                    return Ok(None);
                };
                let i = close + 1 + leading_ws(&text[close + 1..]);
                Ok(colon_follows(i).then_some(i))
            }
            _ => {
                let bytes = text.as_bytes();
                for (offset, ch) in rest.char_indices() {
                    let i = col + offset;
                    if ch == '#' && i > col && matches!(bytes[i - 1], b' ' | b'\t') {
                        return Ok(None);
                    }
                    if ch == ':' && colon_follows(i) {
                        return Ok(Some(i));
                    }
                }
                Ok(None)
            }
        }
    }

    fn decode_key(&self, raw: &str, idx: usize, col: usize) -> ParseResult<String> {
        let pos = self.position(idx, col);
        if raw.starts_with(['&', '*', '!']) {
            return Err(ParseError::unsupported(pos, "anchors, aliases and tags are not supported"));
        }
        if raw.len() >= 2 && raw.starts_with('"') {
            return decode_double(&raw[1..raw.len() - 1])
                .map_err(|msg| ParseError::invalid_syntax(pos, msg));
        }
        if raw.len() >= 2 && raw.starts_with('\'') {
            return Ok(decode_single(&raw[1..raw.len() - 1]));
        }
        Ok(raw.to_string())
    }

    fn note_indent(&mut self, delta: usize) {
        if self.indent_unit.is_none() && delta > 0 {
            self.indent_unit = Some(delta);
        }
    }

    fn skip_trivia(&mut self) {
        while let Some(line) = self.lines.get(self.pos) {
            if !is_trivia(line.text) {
                break;
            }
            self.take_trivia_line();
        }
    }

    fn take_trivia_line(&mut self) {
        let line = self.lines[self.pos];
        self.pending.push_str(line.text);
        self.pending.push_str(line.eol);
        self.pos += 1;
    }

    fn check_tabs(&self) -> ParseResult<()> {
        let text = self.lines[self.pos].text;
        let content = text.len() - text.trim_start_matches([' ', '\t']).len();
        if let Some(tab) = text[..content].find('\t') {
            return Err(ParseError::invalid_syntax(
                self.position(self.pos, tab),
                "tabs are not allowed in indentation",
            ));
        }
        Ok(())
    }

    fn done(&self) -> bool {
        self.pos >= self.lines.len()
    }

    fn line_at(&self, offset: usize) -> usize {
        self.lines
            .partition_point(|l| l.start <= offset)
            .saturating_sub(1)
    }

    fn position(&self, idx: usize, col: usize) -> Position {
        Position::new(idx + 1, col + 1)
    }

    fn position_at(&self, offset: usize) -> Position {
        let idx = self.line_at(offset);
        let start = self.lines.get(idx).map(|l| l.start).unwrap_or(0);
        Position::new(idx + 1, offset.saturating_sub(start) + 1)
    }
}

/// Parse YAML text into a [`Document`]
pub fn parse_document(source: &str) -> ParseResult<Document> {
    let Some(body) = source.strip_prefix(BOM) else {
        return Parser::new(source).parse_document();
    };
    let mut document = Parser::new(body).parse_document()?;
    document.prefix = BOM.to_string();
    Ok(document)
}

const BOM: char = '\u{feff}';

fn split_lines(source: &str) -> Vec<Line<'_>> {
    let mut lines = Vec::new();
    let mut start = 0;
    for chunk in source.split_inclusive('\n') {
        let (text, eol) = if let Some(text) = chunk.strip_suffix("\r\n") {
            (text, "\r\n")
        } else if let Some(text) = chunk.strip_suffix('\n') {
            (text, "\n")
        } else {
            (chunk, "")
        };
        lines.push(Line { start, text, eol });
        start += chunk.len();
    }
    lines
}

fn indent_of(text: &str) -> usize {
    text.len() - text.trim_start_matches(' ').len()
}

fn leading_ws(text: &str) -> usize {
    text.len() - text.trim_start_matches([' ', '\t']).len()
}

fn is_trivia(text: &str) -> bool {
    let trimmed = text.trim_start_matches([' ', '\t']);
    trimmed.is_empty() || trimmed.starts_with('#')
}

fn is_marker(text: &str, marker: &str) -> bool {
    text.starts_with(marker) && matches!(text.as_bytes().get(3), None | Some(b' ') | Some(b'\t'))
}

fn is_document_marker(text: &str) -> bool {
    is_marker(text, "---") || is_marker(text, "...")
}

fn starts_sequence(text: &str, col: usize) -> bool {
    let rest = &text[col..];
    rest == "-" || rest.starts_with("- ") || rest.starts_with("-\t")
}

/// Byte index where a trailing comment starts, or `text.len()`
fn find_comment(text: &str, from: usize) -> usize {
    let bytes = text.as_bytes();
    (from + 1..bytes.len())
        .find(|&i| bytes[i] == b'#' && matches!(bytes[i - 1], b' ' | b'\t'))
        .unwrap_or(text.len())
}

fn check_plain_content(content: &str) -> Result<(), &'static str> {
    if content.contains(": ") || content.contains(":\t") || content.ends_with(':') {
        return Err("mapping values are not allowed here");
    }
    Ok(())
}

fn quote_end_on_line(text: &str, start: usize, quote: char) -> Option<usize> {
    let bytes = text.as_bytes();
    let q = quote as u8;
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' if q == b'"' => i += 2,
            b'\'' if q == b'\'' && bytes.get(i + 1) == Some(&b'\'') => i += 2,
            b if b == q => return Some(i),
            _ => i += 1,
        }
    }
    None
}

fn skip_flow_comments(tokens: &[Spanned], cursor: &mut usize) {
    while let Some((FlowToken::Comment, _)) = tokens.get(*cursor) {
        *cursor += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_err(text: &str) -> ParseError {
        parse_document(text).unwrap_err()
    }

    #[test]
    fn test_round_trip_preserves_every_byte() {
        let sources = [
            "# c\ninfo:\n  title: A # t\n",
            "a: 1\r\nb:\r\n  - x\r\n  - y\r\n",
            "---\n# header\nkey: 'single' # note\n\n\nother:   \"dq\"\n...\n",
            "list:\n- a\n-   b\n- - nested\n  - again\nnext: {x: 1,  y: [1, 2]}  # flow\n",
            "desc: |\n  line one\n\n  line two\n\nafter: >-\n  folded\n  text\n",
            "items:\n  - name: a\n    in: query\n  # between\n  - name: b\n",
            "text: a long\n  plain scalar\n\n  continued\nlast: end",
            "  indented: root\n  second: 2\n",
            "k:\n  # only comment\n  v\n",
        ];
        for source in sources {
            let doc = parse_document(source).unwrap();
            assert_eq!(doc.serialize(), source);
        }
    }

    #[test]
    fn test_detects_style() {
        let doc = parse_document("a:\r\n    b: 1\r\n").unwrap();
        assert_eq!(doc.style().indent_unit, 4);
        assert_eq!(doc.style().eol, "\r\n");

        let doc = parse_document("a: 1").unwrap();
        assert_eq!(doc.style(), &Style::default());
    }

    #[test]
    fn test_rejects_non_mapping_roots() {
        assert_eq!(parse_err("- a\n- b\n"), ParseError::RootNotMapping { found: "sequence" });
        assert_eq!(parse_err("hello\n"), ParseError::RootNotMapping { found: "scalar" });
        assert_eq!(parse_err("# only\n\n"), ParseError::EmptyDocument);
        assert_eq!(parse_err(""), ParseError::EmptyDocument);
    }

    #[test]
    fn test_rejects_invalid_syntax() {
        assert!(matches!(parse_err("a: b: c\n"), ParseError::InvalidSyntax { .. }));
        assert!(matches!(parse_err("a: 1\n   b: 2\n"), ParseError::InvalidSyntax { .. }));
        assert!(matches!(parse_err("a: [1, 2\n"), ParseError::UnexpectedEof { .. }));
        assert!(matches!(parse_err("a: \"open\n"), ParseError::UnexpectedEof { .. }));
        assert!(matches!(parse_err("a:\n\t- x\n"), ParseError::InvalidSyntax { .. }));
        assert!(matches!(parse_err("a: 'x' y\n"), ParseError::InvalidSyntax { .. }));
        assert!(matches!(parse_err("a: 1\na: 2\n"), ParseError::DuplicateKey { .. }));
    }

    #[test]
    fn test_rejects_unsupported_constructs() {
        assert!(matches!(parse_err("a: &x 1\n"), ParseError::Unsupported { .. }));
        assert!(matches!(parse_err("a: *x\n"), ParseError::Unsupported { .. }));
        assert!(matches!(parse_err("a: !!str 1\n"), ParseError::Unsupported { .. }));
        assert!(matches!(parse_err("a: 1\n---\nb: 2\n"), ParseError::Unsupported { .. }));
        assert!(matches!(parse_err("? a\n: b\n"), ParseError::Unsupported { .. }));
    }

    #[test]
    fn test_error_positions_are_one_based() {
        let err = parse_err("a: 1\nb: c: d\n");
        assert_eq!(err.position(), Some(Position::new(2, 4)));
    }

    #[test]
    fn test_member_lines_are_recorded() {
        let doc = parse_document("# c\na: 1\nb:\n  c: 2\n").unwrap();
        let Node::Mapping(root) = doc.root() else {
            panic!("expected mapping");
        };
        assert_eq!(root.entries[0].line, 2);
        let Node::Mapping(b) = &root.entries[1].value else {
            panic!("expected mapping");
        };
        assert_eq!(b.entries[0].line, 4);
        assert_eq!(b.entries[0].column, 2);
    }
}
