//! Error types for every compilation phase.

use crate::lexer::{Location, Span};
use thiserror::Error;

/// A run of characters that starts no token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{location}: unrecognized input `{text}`")]
pub struct LexError {
    pub span: Span,
    pub location: Location,
    pub text: String,
}

/// A token sequence that does not match the grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{location}: {message}")]
pub struct SyntaxError {
    pub span: Span,
    pub location: Location,
    pub message: String,
}

/// One front-end diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Diagnostic {
    #[error("lex error at {0}")]
    Lex(#[from] LexError),
    #[error("syntax error at {0}")]
    Syntax(#[from] SyntaxError),
}

impl Diagnostic {
    pub fn span(&self) -> Span {
        match self {
            Diagnostic::Lex(e) => e.span,
            Diagnostic::Syntax(e) => e.span,
        }
    }

    pub fn location(&self) -> Location {
        match self {
            Diagnostic::Lex(e) => e.location,
            Diagnostic::Syntax(e) => e.location,
        }
    }
}

/// All lex and syntax diagnostics of one parse, in source order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} error(s) while parsing", .diagnostics.len())]
pub struct ParseErrors {
    pub diagnostics: Vec<Diagnostic>,
}

impl ParseErrors {
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.diagnostics.iter()
    }

    pub fn lex_errors(&self) -> impl Iterator<Item = &LexError> {
        self.diagnostics.iter().filter_map(|d| match d {
            Diagnostic::Lex(e) => Some(e),
            Diagnostic::Syntax(_) => None,
        })
    }

    pub fn syntax_errors(&self) -> impl Iterator<Item = &SyntaxError> {
        self.diagnostics.iter().filter_map(|d| match d {
            Diagnostic::Syntax(e) => Some(e),
            Diagnostic::Lex(_) => None,
        })
    }
}

impl<'a> IntoIterator for &'a ParseErrors {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SemanticError {
    /// An edge endpoint names no declared node.
    #[error("{location}: invalid edge declaration, no node with identifier `{identifier}` found")]
    UnknownNodeReference {
        identifier: String,
        location: Location,
    },
}

/// Failure of [`crate::compile`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error(transparent)]
    Parse(#[from] ParseErrors),
    #[error(transparent)]
    Semantic(#[from] SemanticError),
}

impl CompileError {
    /// One printable line per underlying problem.
    pub fn messages(&self) -> Vec<String> {
        match self {
            CompileError::Parse(errors) => errors.iter().map(ToString::to_string).collect(),
            CompileError::Semantic(error) => vec![format!("semantic error at {error}")],
        }
    }
}
