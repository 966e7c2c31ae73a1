use thiserror::Error;

pub type ParseResult<T> = Result<T, ParseError>;
pub type EditResult<T> = Result<T, EditError>;

/// Position inside source text (1-based line and column)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Invalid syntax at {pos}: {message}")]
    InvalidSyntax { pos: Position, message: String },

    #[error("Unexpected end of input at {pos}: {message}")]
    UnexpectedEof { pos: Position, message: String },

    #[error("Unsupported construct at {pos}: {message}")]
    Unsupported { pos: Position, message: String },

    #[error("Duplicate key '{key}' at {pos}")]
    DuplicateKey { pos: Position, key: String },

    #[error("Document root must be a mapping, found {found}")]
    RootNotMapping { found: &'static str },

    #[error("Document is empty")]
    EmptyDocument,
}

impl ParseError {
    pub fn invalid_syntax(pos: Position, message: impl Into<String>) -> Self {
        Self::InvalidSyntax {
            pos,
            message: message.into(),
        }
    }

    pub fn unexpected_eof(pos: Position, message: impl Into<String>) -> Self {
        Self::UnexpectedEof {
            pos,
            message: message.into(),
        }
    }

    pub fn unsupported(pos: Position, message: impl Into<String>) -> Self {
        Self::Unsupported {
            pos,
            message: message.into(),
        }
    }

    /// Source position of the failure, when it has one
    pub fn position(&self) -> Option<Position> {
        match self {
            Self::InvalidSyntax { pos, .. }
            | Self::UnexpectedEof { pos, .. }
            | Self::Unsupported { pos, .. }
            | Self::DuplicateKey { pos, .. } => Some(*pos),
            Self::RootNotMapping { .. } | Self::EmptyDocument => None,
        }
    }
}

/// Errors raised by structural edits. A failed edit leaves the document as
/// it was before the call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditError {
    #[error("Cannot descend into scalar at '{0}'")]
    NotAContainer(String),

    #[error("Node at '{0}' is not a mapping")]
    NotAMapping(String),

    #[error("Invalid sequence index '{index}' at '{pointer}'")]
    InvalidIndex { pointer: String, index: String },

    #[error("Key '{key}' already exists at '{pointer}'")]
    DuplicateKey { pointer: String, key: String },

    #[error("Document root must remain a mapping")]
    RootNotMapping,
}
