//! Typed syntax tree produced by [`crate::parser`].

use crate::lexer::Location;
use serde::{Deserialize, Serialize};

/// A whole `graph NAME [attrs] { ... }` document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub graph_name: String,
    pub graph_attributes: Attributes,
    pub node_declarations: Vec<NodeDeclaration>,
    pub edge_declarations: Vec<EdgeDeclaration>,
}

impl Document {
    pub fn push(&mut self, declaration: Declaration) {
        match declaration {
            Declaration::Node(node) => self.node_declarations.push(node),
            Declaration::Edge(edge) => self.edge_declarations.push(edge),
        }
    }

    /// Whether the graph-level `bundle` flag was written.
    pub fn bundle(&self) -> bool {
        self.graph_attributes.bundle.unwrap_or(false)
    }
}

/// One statement of the graph body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Declaration {
    Node(NodeDeclaration),
    Edge(EdgeDeclaration),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDeclaration {
    pub identifier: String,
    pub location: Location,
    pub attributes: Option<Attributes>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeDeclaration {
    pub tail: String,
    pub tail_location: Location,
    pub head: String,
    pub head_location: Location,
    pub directed: bool,
    pub attributes: Option<Attributes>,
}

/// Folded attribute list. Later keys overwrite earlier ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bundle: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_width: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<String>,
}

impl Attributes {
    pub fn apply(&mut self, pair: KeyValue) {
        match pair {
            KeyValue::Bundle => self.bundle = Some(true),
            KeyValue::Color(v) => self.color = Some(v),
            KeyValue::Label(v) => self.label = Some(v),
            KeyValue::LineWidth(v) => self.line_width = Some(v),
            KeyValue::Font(v) => self.font = Some(v),
            KeyValue::FontSize(v) => self.font_size = Some(v),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Attributes::default()
    }
}

impl FromIterator<KeyValue> for Attributes {
    fn from_iter<I: IntoIterator<Item = KeyValue>>(iter: I) -> Self {
        let mut attributes = Attributes::default();
        for pair in iter {
            attributes.apply(pair);
        }
        attributes
    }
}

/// One `key` or `key=value` entry. String values are stored unquoted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyValue {
    Bundle,
    Color(String),
    Label(String),
    LineWidth(String),
    Font(String),
    FontSize(String),
}

/// Strip one pair of surrounding double quotes, if present.
pub fn unquote(text: &str) -> &str {
    text.strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .unwrap_or(text)
}
