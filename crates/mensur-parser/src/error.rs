//! Parser errors.

use mensur_graph::GraphError;
use thiserror::Error;

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

#[derive(Error, Debug)]
pub enum ParseError {
    /// Malformed line or expression.
    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },

    /// A name used in an expression before any assignment gave it a value.
    #[error("line {line}: undefined variable '{name}'")]
    UndefinedVariable { line: usize, name: String },

    /// A builder rejection tied to one input line.
    #[error("line {line}: {source}")]
    Graph { line: usize, source: GraphError },

    /// A rejection during final resolution, after all lines were read.
    #[error(transparent)]
    Build(#[from] GraphError),

    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

impl ParseError {
    pub(crate) fn syntax(line: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            line,
            message: message.into(),
        }
    }
}
