//! Tokens of YAML flow collections (`[a, b]`, `{k: v}`).
//!
//! Block structure is indentation driven and handled line by line in the
//! parser; only flow content is tokenized.

use logos::Logos;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n]+")]
pub enum FlowToken {
    #[token("[")]
    SeqStart,

    #[token("]")]
    SeqEnd,

    #[token("{")]
    MapStart,

    #[token("}")]
    MapEnd,

    #[token(",")]
    Comma,

    #[token(":")]
    Colon,

    #[regex(r#""([^"\\]|\\(.|\n))*""#)]
    DoubleQuoted,

    #[regex(r"'([^']|'')*'")]
    SingleQuoted,

    #[regex(r"#[^\r\n]*")]
    Comment,

    #[regex(r#"[^ \t\r\n\[\]{},:#'"]([^\[\]{},:\r\n]|:[^ \t\r\n\[\]{},])*"#)]
    Plain,
}

/// Token with its byte range relative to the lexed slice
pub type Spanned = (FlowToken, std::ops::Range<usize>);

/// Tokenize one flow collection starting at the first byte of `source`.
///
/// Stops right after the bracket that closes the opening one. Returns the
/// tokens or the byte offset of the first failure together with a reason.
pub fn tokenize_flow(source: &str) -> Result<Vec<Spanned>, (usize, &'static str)> {
    let mut lexer = FlowToken::lexer(source);
    let mut tokens = Vec::new();
    let mut depth = 0usize;

    while let Some(token) = lexer.next() {
        let span = lexer.span();
        let token = token.map_err(|_| (span.start, "unrecognised character in flow collection"))?;
        match token {
            FlowToken::SeqStart | FlowToken::MapStart => depth += 1,
            FlowToken::SeqEnd | FlowToken::MapEnd => {
                if depth == 0 {
                    return Err((span.start, "unbalanced closing bracket"));
                }
                depth -= 1;
            }
            _ => {}
        }
        if tokens.is_empty() && !matches!(token, FlowToken::SeqStart | FlowToken::MapStart) {
            return Err((span.start, "flow collection must start with '[' or '{'"));
        }
        tokens.push((token, span));
        if depth == 0 {
            return Ok(tokens);
        }
    }

    Err((source.len(), "unterminated flow collection"))
}
