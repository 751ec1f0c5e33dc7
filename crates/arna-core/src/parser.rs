//! Recursive-descent parser: token stream → [`Document`].
//!
//! Grammar:
//!
//! ```text
//! graph          := GRAPH Identifier attributeList? "{" declaration* "}"
//! declaration    := edgeDecl | nodeDecl
//! nodeDecl       := Identifier attributeList?
//! edgeDecl       := Identifier ("--" | "->") Identifier attributeList?
//! attributeList  := "[" (keyValue ("," keyValue)*)? "]"
//! keyValue       := BUNDLE
//!                 | COLOR "=" (String | Identifier)
//!                 | LABEL "=" String
//!                 | LINE_WIDTH "=" Identifier
//!                 | FONT "=" String
//!                 | FONT_SIZE "=" String
//! ```
//!
//! The parser recovers from errors so that one run reports every problem:
//! inside an attribute list it skips to the next `,` or `]`, and in the
//! graph body it skips to the next identifier or `}`.

use crate::ast::{
    Attributes, Declaration, Document, EdgeDeclaration, KeyValue, NodeDeclaration, unquote,
};
use crate::error::{Diagnostic, ParseErrors, SyntaxError};
use crate::lexer::{Location, Span, Token, TokenKind, tokenize};

/// Lex and parse `source`. Any lex or syntax error fails the whole parse.
pub fn parse(source: &str) -> Result<Document, ParseErrors> {
    let lexed = tokenize(source);
    let (document, syntax_errors) = parse_tokens(source, &lexed.tokens);

    let mut diagnostics: Vec<Diagnostic> = lexed
        .errors
        .into_iter()
        .map(Diagnostic::from)
        .chain(syntax_errors.into_iter().map(Diagnostic::from))
        .collect();
    diagnostics.sort_by_key(|d| d.span().start);

    if diagnostics.is_empty() {
        log::debug!(
            "parsed graph `{}`: {} nodes, {} edges",
            document.graph_name,
            document.node_declarations.len(),
            document.edge_declarations.len()
        );
        Ok(document)
    } else {
        Err(ParseErrors { diagnostics })
    }
}

/// Parse an already-lexed token stream (trivia removed).
///
/// Always returns the best-effort document alongside the syntax errors.
pub fn parse_tokens<'src>(
    source: &'src str,
    tokens: &[Token<'src>],
) -> (Document, Vec<SyntaxError>) {
    let mut parser = Parser {
        source,
        tokens,
        pos: 0,
        errors: Vec::new(),
    };
    let document = parser.document();
    (document, parser.errors)
}

/// Outcome of a speculative alternative.
enum Attempt<T> {
    Parsed(T),
    /// The alternative matched its prefix but failed later; errors recorded.
    Failed,
    /// The alternative did not apply; the caller rewinds.
    NoMatch,
}

struct Parser<'t, 'src> {
    source: &'src str,
    tokens: &'t [Token<'src>],
    pos: usize,
    errors: Vec<SyntaxError>,
}

impl<'src> Parser<'_, 'src> {
    // ─── Cursor ──────────────────────────────────────────────────────────

    fn peek(&self) -> Option<Token<'src>> {
        self.tokens.get(self.pos).copied()
    }

    fn peek_kind(&self) -> Option<TokenKind> {
        self.peek().map(|t| t.kind)
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.peek_kind() == Some(kind)
    }

    fn bump(&mut self) -> Option<Token<'src>> {
        let token = self.peek()?;
        self.pos += 1;
        Some(token)
    }

    fn eat(&mut self, kind: TokenKind) -> Option<Token<'src>> {
        if self.at(kind) { self.bump() } else { None }
    }

    fn expect(&mut self, kind: TokenKind, expected: &str) -> Option<Token<'src>> {
        let token = self.eat(kind);
        if token.is_none() {
            self.error_here(expected);
        }
        token
    }

    /// Record "expected X, found Y" at the current token, or at end of input.
    fn error_here(&mut self, expected: &str) {
        let (span, location, found) = match self.peek() {
            Some(token) => (token.span, token.location, format!("`{}`", token.text)),
            None => {
                let end = self.source.len();
                (
                    Span::new(end, end),
                    Location::of(self.source, end),
                    "end of input".to_string(),
                )
            }
        };
        // One error per position; follow-up failures at the same token add noise.
        if self.errors.last().is_some_and(|e| e.span == span) {
            return;
        }
        self.errors.push(SyntaxError {
            span,
            location,
            message: format!("expected {expected}, found {found}"),
        });
    }

    fn skip_until(&mut self, stop: &[TokenKind]) {
        while let Some(kind) = self.peek_kind() {
            if stop.contains(&kind) {
                break;
            }
            self.pos += 1;
        }
    }

    // ─── Document ────────────────────────────────────────────────────────

    fn document(&mut self) -> Document {
        let mut document = Document::default();

        self.expect(TokenKind::Graph, "`graph`");
        if let Some(name) = self.expect(TokenKind::Identifier, "a graph name") {
            document.graph_name = name.text.to_string();
        }
        if self.at(TokenKind::OpenBracket) {
            document.graph_attributes = self.attribute_list();
        }
        if self.expect(TokenKind::OpenBrace, "`{`").is_none() {
            self.skip_until(&[TokenKind::OpenBrace]);
            if self.eat(TokenKind::OpenBrace).is_none() {
                return document;
            }
        }

        loop {
            match self.peek_kind() {
                None => {
                    self.error_here("`}`");
                    return document;
                }
                Some(TokenKind::CloseBrace) => {
                    self.bump();
                    break;
                }
                Some(TokenKind::Identifier) => {
                    if let Some(declaration) = self.declaration() {
                        document.push(declaration);
                    }
                }
                Some(_) => {
                    self.error_here("a node or edge declaration");
                    self.bump();
                    self.recover_declaration();
                }
            }
        }

        if self.peek().is_some() {
            self.error_here("end of input");
        }
        document
    }

    fn recover_declaration(&mut self) {
        self.skip_until(&[TokenKind::Identifier, TokenKind::CloseBrace]);
    }

    /// `edgeDecl` is tried first; without an edge operator after the first
    /// identifier the parser rewinds and reads a `nodeDecl`.
    fn declaration(&mut self) -> Option<Declaration> {
        let checkpoint = self.pos;
        match self.edge_declaration() {
            Attempt::Parsed(edge) => Some(Declaration::Edge(edge)),
            Attempt::Failed => {
                self.recover_declaration();
                None
            }
            Attempt::NoMatch => {
                self.pos = checkpoint;
                self.node_declaration().map(Declaration::Node)
            }
        }
    }

    fn edge_declaration(&mut self) -> Attempt<EdgeDeclaration> {
        let Some(tail) = self.eat(TokenKind::Identifier) else {
            return Attempt::NoMatch;
        };
        let directed = match self.peek_kind() {
            Some(TokenKind::EdgeUndirected) => false,
            Some(TokenKind::EdgeDirected) => true,
            _ => return Attempt::NoMatch,
        };
        self.bump();

        let Some(head) = self.expect(TokenKind::Identifier, "an identifier after the edge operator")
        else {
            return Attempt::Failed;
        };
        let attributes = self
            .at(TokenKind::OpenBracket)
            .then(|| self.attribute_list());

        Attempt::Parsed(EdgeDeclaration {
            tail: tail.text.to_string(),
            tail_location: tail.location,
            head: head.text.to_string(),
            head_location: head.location,
            directed,
            attributes,
        })
    }

    fn node_declaration(&mut self) -> Option<NodeDeclaration> {
        let identifier = self.expect(TokenKind::Identifier, "a node identifier")?;
        let attributes = self
            .at(TokenKind::OpenBracket)
            .then(|| self.attribute_list());
        Some(NodeDeclaration {
            identifier: identifier.text.to_string(),
            location: identifier.location,
            attributes,
        })
    }

    // ─── Attributes ──────────────────────────────────────────────────────

    /// Parse `[ ... ]`. The caller has checked that the next token is `[`.
    fn attribute_list(&mut self) -> Attributes {
        let mut attributes = Attributes::default();
        self.bump();
        if self.eat(TokenKind::CloseBracket).is_some() {
            return attributes;
        }

        loop {
            match self.key_value() {
                Some(pair) => attributes.apply(pair),
                None => self.recover_attribute(),
            }
            if self.eat(TokenKind::Comma).is_some() {
                continue;
            }
            if self.eat(TokenKind::CloseBracket).is_some() {
                break;
            }
            self.error_here("`,` or `]`");
            self.recover_attribute();
            if self.eat(TokenKind::Comma).is_some() {
                continue;
            }
            // Otherwise at `}` or end of input, which the body loop reports.
            self.eat(TokenKind::CloseBracket);
            break;
        }
        attributes
    }

    fn recover_attribute(&mut self) {
        self.skip_until(&[
            TokenKind::Comma,
            TokenKind::CloseBracket,
            TokenKind::CloseBrace,
        ]);
    }

    fn key_value(&mut self) -> Option<KeyValue> {
        let Some(key) = self.peek() else {
            self.error_here("an attribute");
            return None;
        };
        match key.kind {
            TokenKind::Bundle => {
                self.bump();
                Some(KeyValue::Bundle)
            }
            TokenKind::Color => {
                self.bump();
                self.expect(TokenKind::Equal, "`=`")?;
                let value = self
                    .eat(TokenKind::String)
                    .or_else(|| self.eat(TokenKind::Identifier));
                match value {
                    Some(token) => Some(KeyValue::Color(unquote(token.text).to_string())),
                    None => {
                        self.error_here("a string or identifier");
                        None
                    }
                }
            }
            TokenKind::Label => self.string_value().map(KeyValue::Label),
            TokenKind::Font => self.string_value().map(KeyValue::Font),
            TokenKind::FontSize => self.string_value().map(KeyValue::FontSize),
            TokenKind::LineWidth => {
                self.bump();
                self.expect(TokenKind::Equal, "`=`")?;
                let value = self.expect(TokenKind::Identifier, "an identifier")?;
                Some(KeyValue::LineWidth(value.text.to_string()))
            }
            _ => {
                self.error_here("an attribute");
                None
            }
        }
    }

    /// `KEY "=" String`, with the key not yet consumed.
    fn string_value(&mut self) -> Option<String> {
        self.bump();
        self.expect(TokenKind::Equal, "`=`")?;
        let value = self.expect(TokenKind::String, "a string literal")?;
        Some(unquote(value.text).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn syntax_messages(source: &str) -> Vec<String> {
        parse(source)
            .unwrap_err()
            .syntax_errors()
            .map(|e| e.message.clone())
            .collect()
    }

    #[test]
    fn parse_minimal_graph() {
        let document = parse("graph g {}").unwrap();
        assert_eq!(document.graph_name, "g");
        assert!(document.graph_attributes.is_empty());
        assert!(document.node_declarations.is_empty());
        assert!(document.edge_declarations.is_empty());
    }

    #[test]
    fn parse_nodes_and_edges() {
        let document = parse("GRAPH g { A B A -- B B -> A }").unwrap();
        let nodes: Vec<&str> = document
            .node_declarations
            .iter()
            .map(|n| n.identifier.as_str())
            .collect();
        assert_eq!(nodes, vec!["A", "B"]);
        assert_eq!(document.edge_declarations.len(), 2);
        assert!(!document.edge_declarations[0].directed);
        assert!(document.edge_declarations[1].directed);
        assert_eq!(document.edge_declarations[1].tail, "B");
        assert_eq!(document.edge_declarations[1].head, "A");
    }

    #[test]
    fn parse_graph_bundle_flag() {
        let document = parse("graph g [bundle] { }").unwrap();
        assert!(document.bundle());
    }

    #[test]
    fn parse_attributes_are_unquoted() {
        let document = parse(
            r#"graph g {
                A [color="red", label="Start", font="serif", font-size="12px"]
                B [color=#00ff00]
                A -- B [line-width=3, color="blue"]
            }"#,
        )
        .unwrap();

        let a = document.node_declarations[0].attributes.as_ref().unwrap();
        assert_eq!(a.color.as_deref(), Some("red"));
        assert_eq!(a.label.as_deref(), Some("Start"));
        assert_eq!(a.font.as_deref(), Some("serif"));
        assert_eq!(a.font_size.as_deref(), Some("12px"));

        let b = document.node_declarations[1].attributes.as_ref().unwrap();
        assert_eq!(b.color.as_deref(), Some("#00ff00"));

        let edge = document.edge_declarations[0].attributes.as_ref().unwrap();
        assert_eq!(edge.line_width.as_deref(), Some("3"));
        assert_eq!(edge.color.as_deref(), Some("blue"));
    }

    #[test]
    fn parse_empty_attribute_list() {
        let document = parse("graph g { A [] }").unwrap();
        assert_eq!(
            document.node_declarations[0].attributes,
            Some(Attributes::default())
        );
    }

    #[test]
    fn parse_records_identifier_locations() {
        let document = parse("graph g {\n  A -- B\n}").unwrap();
        let edge = &document.edge_declarations[0];
        assert_eq!(edge.tail_location, Location::new(2, 3));
        assert_eq!(edge.head_location, Location::new(2, 8));
    }

    #[test]
    fn missing_close_brace() {
        assert_eq!(
            syntax_messages("graph g { A"),
            vec!["expected `}`, found end of input"]
        );
    }

    #[test]
    fn missing_graph_keyword() {
        assert_eq!(
            syntax_messages("g { A }"),
            vec!["expected `graph`, found `g`"]
        );
    }

    #[test]
    fn trailing_tokens_after_body() {
        assert_eq!(
            syntax_messages("graph g { A } B"),
            vec!["expected end of input, found `B`"]
        );
    }

    #[test]
    fn edge_without_head() {
        assert_eq!(
            syntax_messages("graph g { A -- }"),
            vec!["expected an identifier after the edge operator, found `}`"]
        );
    }

    #[test]
    fn label_requires_string() {
        assert_eq!(
            syntax_messages("graph g { A [label=Start] }"),
            vec!["expected a string literal, found `Start`"]
        );
    }

    #[test]
    fn recovery_reports_every_error() {
        let messages = syntax_messages(
            "graph g {\n A [label=x, color=\"red\"]\n B [font-size=3]\n [ }",
        );
        assert_eq!(
            messages,
            vec![
                "expected a string literal, found `x`",
                "expected a string literal, found `3`",
                "expected a node or edge declaration, found `[`",
            ]
        );
    }

    #[test]
    fn recovery_keeps_good_declarations() {
        let tokens = tokenize("graph g { A [label=x] B C -- }");
        let (document, errors) = parse_tokens("graph g { A [label=x] B C -- }", &tokens.tokens);
        assert_eq!(errors.len(), 2);
        let nodes: Vec<&str> = document
            .node_declarations
            .iter()
            .map(|n| n.identifier.as_str())
            .collect();
        assert_eq!(nodes, vec!["A", "B"]);
    }

    #[test]
    fn lex_and_syntax_errors_are_reported_together_in_order() {
        let errors = parse("graph g { A $ B -- }").unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(matches!(errors.diagnostics[0], Diagnostic::Lex(_)));
        assert!(matches!(errors.diagnostics[1], Diagnostic::Syntax(_)));
    }

    #[test]
    fn lex_error_alone_fails_the_parse() {
        let errors = parse("graph g { A @ }").unwrap_err();
        assert_eq!(errors.lex_errors().count(), 1);
        assert_eq!(errors.syntax_errors().count(), 0);
    }
}
