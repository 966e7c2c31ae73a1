//! Scalar resolution, decoding and rendering.

use regex::Regex;
use serde_json::{Number, Value};
use std::sync::LazyLock;

static INT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[-+]?[0-9]+$").unwrap());
static OCT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^0o[0-7]+$").unwrap());
static HEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^0x[0-9a-fA-F]+$").unwrap());
static FLOAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[-+]?(\.[0-9]+|[0-9]+(\.[0-9]*)?)([eE][-+]?[0-9]+)?$").unwrap()
});

/// How a scalar is written in the source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarStyle {
    Plain,
    SingleQuoted,
    DoubleQuoted,
    Literal,
    Folded,
}

/// Where a scalar is rendered; flow context forbids `,[]{}` in plain text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Context {
    Block,
    Flow,
}

/// Resolve a plain scalar with the YAML 1.2 core schema
pub fn resolve_plain(text: &str) -> Value {
    match text {
        "" | "~" | "null" | "Null" | "NULL" => return Value::Null,
        "true" | "True" | "TRUE" => return Value::Bool(true),
        "false" | "False" | "FALSE" => return Value::Bool(false),
        _ => {}
    }

    if INT.is_match(text) {
        if let Ok(n) = text.parse::<i64>() {
            return Value::Number(n.into());
        }
        if let Ok(n) = text.trim_start_matches('+').parse::<u64>() {
            return Value::Number(n.into());
        }
    }
    if OCT.is_match(text) {
        if let Ok(n) = i64::from_str_radix(&text[2..], 8) {
            return Value::Number(n.into());
        }
    }
    if HEX.is_match(text) {
        if let Ok(n) = i64::from_str_radix(&text[2..], 16) {
            return Value::Number(n.into());
        }
    }
    if FLOAT.is_match(text) {
        if let Some(n) = text.parse::<f64>().ok().and_then(Number::from_f64) {
            return Value::Number(n);
        }
    }

    Value::String(text.to_string())
}

/// Fold the line breaks of a multi-line flow scalar: a single break becomes
/// a space, each additional empty line becomes a newline.
pub(crate) fn fold_lines(text: &str) -> String {
    let lines: Vec<&str> = text.split('\n').map(|l| l.trim_end_matches('\r')).collect();
    if lines.len() == 1 {
        return text.to_string();
    }

    let mut out = String::from(lines[0].trim_end_matches([' ', '\t']));
    let mut empties = 0;
    let last = lines.len() - 1;
    for (i, line) in lines.iter().enumerate().skip(1) {
        let trimmed = if i == last {
            line.trim_start_matches([' ', '\t'])
        } else {
            line.trim_matches([' ', '\t'])
        };
        if trimmed.is_empty() && i != last {
            empties += 1;
            continue;
        }
        if empties > 0 {
            out.extend(std::iter::repeat('\n').take(empties));
        } else {
            out.push(' ');
        }
        empties = 0;
        out.push_str(trimmed);
    }
    out
}

/// Decode the text between the quotes of a single-quoted scalar
pub(crate) fn decode_single(inner: &str) -> String {
    fold_lines(&inner.replace("''", "'"))
}

/// Decode the text between the quotes of a double-quoted scalar
pub(crate) fn decode_double(inner: &str) -> Result<String, String> {
    let chars: Vec<char> = inner.chars().filter(|c| *c != '\r').collect();
    let mut out = String::with_capacity(inner.len());
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];
        i += 1;
        match ch {
            '\\' => {
                let Some(&esc) = chars.get(i) else {
                    return Err("dangling escape at end of string".to_string());
                };
                i += 1;
                let decoded = match esc {
                    '\n' => {
                        while i < chars.len() && matches!(chars[i], ' ' | '\t') {
                            i += 1;
                        }
                        continue;
                    }
                    '0' => '\0',
                    'a' => '\x07',
                    'b' => '\x08',
                    't' | '\t' => '\t',
                    'n' => '\n',
                    'v' => '\x0b',
                    'f' => '\x0c',
                    'r' => '\r',
                    'e' => '\x1b',
                    ' ' => ' ',
                    '"' => '"',
                    '/' => '/',
                    '\\' => '\\',
                    'N' => '\u{85}',
                    '_' => '\u{a0}',
                    'L' => '\u{2028}',
                    'P' => '\u{2029}',
                    'x' | 'u' | 'U' => {
                        let width = match esc {
                            'x' => 2,
                            'u' => 4,
                            _ => 8,
                        };
                        if i + width > chars.len() {
                            return Err(format!("truncated \\{} escape", esc));
                        }
                        let hex: String = chars[i..i + width].iter().collect();
                        i += width;
                        u32::from_str_radix(&hex, 16)
                            .ok()
                            .and_then(char::from_u32)
                            .ok_or_else(|| format!("invalid escape \\{}{}", esc, hex))?
                    }
                    other => return Err(format!("unknown escape '\\{}'", other)),
                };
                out.push(decoded);
            }
            '\n' => {
                while out.ends_with([' ', '\t']) {
                    out.pop();
                }
                let mut empties = 0;
                loop {
                    while i < chars.len() && matches!(chars[i], ' ' | '\t') {
                        i += 1;
                    }
                    if i < chars.len() && chars[i] == '\n' {
                        empties += 1;
                        i += 1;
                        continue;
                    }
                    break;
                }
                if empties > 0 {
                    out.extend(std::iter::repeat('\n').take(empties));
                } else {
                    out.push(' ');
                }
            }
            _ => out.push(ch),
        }
    }

    Ok(out)
}

/// Header of a literal (`|`) or folded (`>`) block scalar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BlockHeader {
    pub folded: bool,
    pub chomp: Chomp,
    pub indent: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Chomp {
    Clip,
    Strip,
    Keep,
}

impl BlockHeader {
    pub fn parse(header: &str) -> Option<Self> {
        let mut chars = header.chars();
        let folded = match chars.next()? {
            '|' => false,
            '>' => true,
            _ => return None,
        };
        let mut chomp = Chomp::Clip;
        let mut indent = None;
        for ch in chars {
            match ch {
                '-' => chomp = Chomp::Strip,
                '+' => chomp = Chomp::Keep,
                '1'..='9' if indent.is_none() => indent = ch.to_digit(10).map(|d| d as usize),
                _ => return None,
            }
        }
        Some(Self {
            folded,
            chomp,
            indent,
        })
    }
}

/// Decode the body lines of a block scalar.
///
/// `parent_column` is the column of the key or dash owning the scalar and
/// anchors an explicit indentation indicator.
pub(crate) fn decode_block(header: BlockHeader, body: &str, parent_column: usize) -> String {
    let lines: Vec<&str> = body
        .split_inclusive('\n')
        .map(|l| l.trim_end_matches('\n').trim_end_matches('\r'))
        .collect();

    let indent = header.indent.map(|m| parent_column + m).unwrap_or_else(|| {
        lines
            .iter()
            .find(|l| !l.trim().is_empty())
            .map(|l| l.len() - l.trim_start_matches(' ').len())
            .unwrap_or(0)
    });

    let stripped: Vec<&str> = lines
        .iter()
        .map(|line| {
            if line.trim().is_empty() {
                ""
            } else if line.len() - line.trim_start_matches(' ').len() >= indent {
                &line[indent..]
            } else {
                line.trim_start_matches(' ')
            }
        })
        .collect();

    let content_end = stripped
        .iter()
        .rposition(|l| !l.is_empty())
        .map(|i| i + 1)
        .unwrap_or(0);
    let trailing_empty = stripped.len() - content_end;
    let content = &stripped[..content_end];

    let mut text = if header.folded {
        fold_block(content)
    } else {
        content.join("\n")
    };

    if content.is_empty() {
        if header.chomp == Chomp::Keep {
            text.extend(std::iter::repeat('\n').take(trailing_empty));
        }
        return text;
    }

    match header.chomp {
        Chomp::Strip => {}
        Chomp::Clip => text.push('\n'),
        Chomp::Keep => text.extend(std::iter::repeat('\n').take(trailing_empty + 1)),
    }
    text
}

fn fold_block(lines: &[&str]) -> String {
    let mut out = String::new();
    for (i, line) in lines.iter().enumerate() {
        if i == 0 {
            out.push_str(line);
            continue;
        }
        if line.is_empty() {
            out.push('\n');
            continue;
        }
        let prev = lines[i - 1];
        if prev.is_empty() {
            out.push_str(line);
        } else if prev.starts_with([' ', '\t']) || line.starts_with([' ', '\t']) {
            out.push('\n');
            out.push_str(line);
        } else {
            out.push(' ');
            out.push_str(line);
        }
    }
    out
}

/// Characters that cannot start a plain scalar
const INDICATORS: &str = ",[]{}#&*!|>'\"%@`";

/// Whether `text` can be written as a plain scalar without changing meaning
pub(crate) fn is_plain_safe(text: &str, ctx: Context) -> bool {
    let mut chars = text.chars();
    let Some(first) = chars.next() else {
        return false;
    };

    if INDICATORS.contains(first) {
        return false;
    }
    if matches!(first, '-' | '?' | ':') {
        match chars.next() {
            None => return false,
            Some(next) if next.is_whitespace() => return false,
            _ => {}
        }
    }
    if first.is_whitespace() || text.ends_with(char::is_whitespace) {
        return false;
    }
    if text.contains(": ") || text.contains(" #") || text.contains("\t#") || text.ends_with(':') {
        return false;
    }
    if text.chars().any(char::is_control) {
        return false;
    }
    if ctx == Context::Flow && text.contains([',', '[', ']', '{', '}']) {
        return false;
    }
    true
}

fn double_quote(text: &str) -> String {
    // JSON string escapes are a subset of YAML double-quoted escapes
    Value::String(text.to_string()).to_string()
}

fn single_quote(text: &str) -> Option<String> {
    if text.chars().any(char::is_control) {
        return None;
    }
    Some(format!("'{}'", text.replace('\'', "''")))
}

/// Render a mapping key
pub(crate) fn render_key(text: &str, ctx: Context) -> String {
    if is_plain_safe(text, ctx) {
        text.to_string()
    } else {
        double_quote(text)
    }
}

/// Render a non-collection value on a single line.
///
/// `prefer` keeps the quoting of the scalar being replaced when the new
/// value is a string.
pub(crate) fn render_inline(
    value: &Value,
    ctx: Context,
    prefer: ScalarStyle,
) -> (String, ScalarStyle) {
    match value {
        Value::Null => ("null".to_string(), ScalarStyle::Plain),
        Value::Bool(b) => (b.to_string(), ScalarStyle::Plain),
        Value::Number(n) => (n.to_string(), ScalarStyle::Plain),
        Value::String(s) => render_string(s, ctx, prefer),
        Value::Array(_) | Value::Object(_) => (value.to_string(), ScalarStyle::Plain),
    }
}

fn render_string(text: &str, ctx: Context, prefer: ScalarStyle) -> (String, ScalarStyle) {
    match prefer {
        ScalarStyle::SingleQuoted => {
            if let Some(quoted) = single_quote(text) {
                return (quoted, ScalarStyle::SingleQuoted);
            }
        }
        ScalarStyle::DoubleQuoted => return (double_quote(text), ScalarStyle::DoubleQuoted),
        _ => {}
    }

    let plain_ok = is_plain_safe(text, ctx)
        && matches!(resolve_plain(text), Value::String(ref s) if s == text);
    if plain_ok {
        (text.to_string(), ScalarStyle::Plain)
    } else {
        (double_quote(text), ScalarStyle::DoubleQuoted)
    }
}

/// Whether a string is better written as a literal block scalar
pub(crate) fn wants_literal_block(text: &str) -> bool {
    text.contains('\n')
        && !text.chars().any(|c| c.is_control() && c != '\n')
        && !text.starts_with([' ', '\n'])
        && text.split('\n').all(|line| !line.ends_with(' '))
}

/// Header and body lines for a literal block scalar holding `text`
pub(crate) fn render_literal(text: &str, column: usize, eol: &str) -> (String, String) {
    let content = text.trim_end_matches('\n');
    let trailing = text.len() - content.len();
    let header = match trailing {
        0 => "|-",
        1 => "|",
        _ => "|+",
    };

    let pad = " ".repeat(column);
    let mut body = String::new();
    for line in content.split('\n') {
        if !line.is_empty() {
            body.push_str(&pad);
            body.push_str(line);
        }
        body.push_str(eol);
    }
    for _ in 1..trailing {
        body.push_str(eol);
    }
    (header.to_string(), body)
}
