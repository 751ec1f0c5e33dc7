pub mod ast;
pub mod config;
pub mod error;
pub mod export;
pub mod id;
pub mod layout;
pub mod lexer;
pub mod model;
pub mod parser;
pub mod semantics;

pub use ast::{Attributes, Declaration, Document, EdgeDeclaration, KeyValue, NodeDeclaration};
pub use config::{CompileOptions, GraphParameterOverrides, GraphParameters};
pub use error::{CompileError, Diagnostic, LexError, ParseErrors, SemanticError, SyntaxError};
pub use export::GraphSnapshot;
pub use id::NodeId;
pub use layout::LayoutEngine;
pub use lexer::{LexOutput, Location, Span, Token, TokenKind, tokenize, tokenize_with_trivia};
pub use model::*;
pub use parser::parse;
pub use semantics::analyze;

// Re-export the geometry and bundling types the model exposes
pub use arna_bundler::{EdgeSubdivisionPoints, Line, Point, TunableParameters, Vec2};
pub use petgraph::graph::{EdgeIndex, NodeIndex};

/// Parse `source`, build its graph, and run the layout.
pub fn compile(source: &str, options: &CompileOptions) -> Result<Graph, CompileError> {
    let document = parse(source)?;
    let graph = analyze(&document, options)?;
    Ok(graph)
}
