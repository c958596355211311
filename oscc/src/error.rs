use crate::grammer::token::{Pos, Token, TokenKind};
use std::fmt;
use thiserror::Error;

// Position information without lifetime
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub file: String,
    pub line: usize,
    pub col: usize,
    pub offset: usize,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.col)
    }
}

impl<'a> From<&Pos<'a>> for Location {
    fn from(pos: &Pos<'a>) -> Self {
        Location {
            file: pos.file.to_string(),
            line: pos.line,
            col: pos.col,
            offset: pos.offset,
        }
    }
}

// Token information without lifetime
#[derive(Debug, Clone, PartialEq)]
pub struct TokenInfo {
    pub kind: TokenKind,
    pub value: String,
    pub loc: Location,
}

impl fmt::Display for TokenInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.kind.symbol(), self.value.is_empty()) {
            (Some(ch), _) => write!(f, "{} '{}' at {}", self.kind, ch, self.loc),
            (None, false) => write!(f, "{} '{}' at {}", self.kind, self.value, self.loc),
            (None, true) => write!(f, "{} at {}", self.kind, self.loc),
        }
    }
}

impl<'a> From<&Token<'a>> for TokenInfo {
    fn from(token: &Token<'a>) -> Self {
        TokenInfo {
            kind: token.kind,
            value: token.value.clone(),
            loc: (&token.pos).into(),
        }
    }
}

// Unified error type for the compiler
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML serialization failed: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Output directory '{0}' contains the source file")]
    OutputContainsInput(String),

    // Tokenization errors
    #[error("String literal not terminated, opened at {0}")]
    UnterminatedString(Location),

    #[error("Unexpected character '{0}' at {1}")]
    UnexpectedChar(char, Location),

    // Parse errors
    #[error("Unexpected end of file")]
    UnexpectedEOF,

    #[error("Unexpected token {found}, expected {expected}")]
    UnexpectedToken { expected: String, found: TokenInfo },

    #[error("Invalid directive '{0}' at {1}")]
    InvalidDirective(String, Location),

    #[error("Invalid number '{0}' at {1}")]
    InvalidNumber(String, Location),

    // Analysis errors
    #[error("Unresolved variable '{0}'")]
    UnresolvedVariable(String),

    #[error("Unresolved type '{0}'")]
    UnresolvedType(String),

    #[error("Could not resolve path '{0}'")]
    UnresolvedPath(String),

    #[error("Unresolved procedure '{0}'")]
    UnresolvedProcedure(String),

    #[error("Cannot redeclare {0} '{1}'")]
    Redeclaration(&'static str, String),

    #[error("Operation {to} <- {from} is illegal")]
    IllegalAssignment { to: String, from: String },

    #[error("Malformed parameter '{0}': expected a single type")]
    MalformedParameter(String),

    #[error("Malformed {0} node: {1}")]
    MalformedNode(String, String),

    #[error("Procedure '{0}' expects {1} argument(s), got {2}")]
    ArgumentCount(String, usize, usize),

    #[error("Unreachable code after return in '{0}'")]
    UnreachableCode(String),

    #[error("Procedure '{0}' cannot return a value")]
    UnexpectedReturnValue(String),

    #[error("Procedure '{0}' must return a value")]
    MissingReturnValue(String),

    /// Analysis failed after some warnings were already raised
    #[error("{error}")]
    WithWarnings {
        error: Box<Error>,
        warnings: Vec<Warning>,
    },
}

/// Non-fatal findings of the analyzer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Warning {
    #[error("Operation {to} <- {from} might lead to loss of information")]
    LossOfInformation { to: String, from: String },
}
