//! Tokenizer for the `.arna` graph language.
//!
//! Token rules, tried in order at every position:
//! - whitespace runs and `//` line comments (trivia)
//! - double-quoted single-line strings
//! - the edge operators `--` and `->`
//! - punctuation `[ ] = , { }`
//! - words: keywords match ASCII-case-insensitively, but an identifier that
//!   is strictly longer than the keyword match wins (`graph1` is an
//!   identifier, `GRAPH` is the keyword).
//!
//! Unrecognized input never aborts lexing: each maximal run of characters
//! that starts no token becomes one [`LexError`] and scanning resumes.

use crate::error::LexError;
use serde::{Deserialize, Serialize};
use std::fmt;
use winnow::combinator::{alt, delimited, preceded};
use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;
use winnow::token::{one_of, take_till, take_while};

// ─── Positions ───────────────────────────────────────────────────────────

/// Byte range into the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// 1-based line and column (columns count `char`s, not bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Location {
    pub line: u32,
    pub column: u32,
}

impl Location {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }

    /// Location of byte `offset` in `source`. Offsets past the end map to
    /// the position just after the last character.
    pub fn of(source: &str, offset: usize) -> Self {
        let offset = offset.min(source.len());
        let before = &source[..floor_char_boundary(source, offset)];
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        let line = before.matches('\n').count() as u32 + 1;
        let column = before[line_start..].chars().count() as u32 + 1;
        Self { line, column }
    }
}

impl Default for Location {
    fn default() -> Self {
        Self { line: 1, column: 1 }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

fn floor_char_boundary(source: &str, mut offset: usize) -> usize {
    while !source.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

// ─── Tokens ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Graph,
    Bundle,
    Color,
    Label,
    LineWidth,
    Font,
    FontSize,
    Identifier,
    EdgeUndirected,
    EdgeDirected,
    OpenBracket,
    CloseBracket,
    Equal,
    Comma,
    String,
    OpenBrace,
    CloseBrace,
    Comment,
    Whitespace,
}

impl TokenKind {
    pub fn is_keyword(self) -> bool {
        matches!(
            self,
            TokenKind::Graph
                | TokenKind::Bundle
                | TokenKind::Color
                | TokenKind::Label
                | TokenKind::LineWidth
                | TokenKind::Font
                | TokenKind::FontSize
        )
    }

    pub fn is_trivia(self) -> bool {
        matches!(self, TokenKind::Comment | TokenKind::Whitespace)
    }

    /// Human-readable name used in diagnostics.
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::Graph => "`graph`",
            TokenKind::Bundle => "`bundle`",
            TokenKind::Color => "`color`",
            TokenKind::Label => "`label`",
            TokenKind::LineWidth => "`line-width`",
            TokenKind::Font => "`font`",
            TokenKind::FontSize => "`font-size`",
            TokenKind::Identifier => "identifier",
            TokenKind::EdgeUndirected => "`--`",
            TokenKind::EdgeDirected => "`->`",
            TokenKind::OpenBracket => "`[`",
            TokenKind::CloseBracket => "`]`",
            TokenKind::Equal => "`=`",
            TokenKind::Comma => "`,`",
            TokenKind::String => "string literal",
            TokenKind::OpenBrace => "`{`",
            TokenKind::CloseBrace => "`}`",
            TokenKind::Comment => "comment",
            TokenKind::Whitespace => "whitespace",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'src> {
    pub kind: TokenKind,
    /// Exact source text, quotes included for strings.
    pub text: &'src str,
    pub span: Span,
    pub location: Location,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LexOutput<'src> {
    pub tokens: Vec<Token<'src>>,
    /// Comment tokens, kept on a side channel when trivia is dropped.
    pub comments: Vec<Token<'src>>,
    pub errors: Vec<LexError>,
}

impl LexOutput<'_> {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

// ─── Entry points ────────────────────────────────────────────────────────

/// Tokenize `source`, dropping whitespace and moving comments to
/// [`LexOutput::comments`].
pub fn tokenize(source: &str) -> LexOutput<'_> {
    lex(source, false)
}

/// Tokenize `source` keeping whitespace and comment tokens in the main
/// stream. Concatenating every token's text plus every error's text
/// reproduces the input.
pub fn tokenize_with_trivia(source: &str) -> LexOutput<'_> {
    lex(source, true)
}

fn lex(source: &str, keep_trivia: bool) -> LexOutput<'_> {
    let mut output = LexOutput::default();
    let mut lines = LineTracker::default();
    let mut rest = source;
    let mut error_start: Option<usize> = None;

    while !rest.is_empty() {
        let offset = source.len() - rest.len();
        let before = rest;

        match next_token(&mut rest) {
            Ok(kind) => {
                if let Some(start) = error_start.take() {
                    output.errors.push(lex_error(source, start, offset, &mut lines));
                }
                let text = &before[..before.len() - rest.len()];
                let token = Token {
                    kind,
                    text,
                    span: Span::new(offset, offset + text.len()),
                    location: lines.locate(source, offset),
                };
                lines.advance(offset, text);

                match kind {
                    TokenKind::Whitespace if !keep_trivia => {}
                    TokenKind::Comment if !keep_trivia => output.comments.push(token),
                    _ => output.tokens.push(token),
                }
            }
            Err(_) => {
                rest = before;
                error_start.get_or_insert(offset);
                let width = rest.chars().next().map_or(1, char::len_utf8);
                rest = &rest[width..];
            }
        }
    }

    if let Some(start) = error_start {
        output.errors.push(lex_error(source, start, source.len(), &mut lines));
    }

    log::trace!(
        "lexer: {} tokens, {} comments, {} errors",
        output.tokens.len(),
        output.comments.len(),
        output.errors.len()
    );
    output
}

fn lex_error(source: &str, start: usize, end: usize, lines: &mut LineTracker) -> LexError {
    let text = &source[start..end];
    let location = lines.locate(source, start);
    lines.advance(start, text);
    LexError {
        span: Span::new(start, end),
        location,
        text: text.to_string(),
    }
}

/// Incremental line bookkeeping so token locations cost O(line length).
#[derive(Debug, Default)]
struct LineTracker {
    line: u32,
    line_start: usize,
}

impl LineTracker {
    fn locate(&self, source: &str, offset: usize) -> Location {
        let column = source[self.line_start..offset].chars().count() as u32 + 1;
        Location::new(self.line + 1, column)
    }

    fn advance(&mut self, offset: usize, text: &str) {
        for (index, _) in text.match_indices('\n') {
            self.line += 1;
            self.line_start = offset + index + 1;
        }
    }
}

// ─── Token rules ─────────────────────────────────────────────────────────

/// Keywords in match priority order; longer spellings come before their prefixes.
const KEYWORDS: &[(&str, TokenKind)] = &[
    ("line-width", TokenKind::LineWidth),
    ("font-size", TokenKind::FontSize),
    ("bundle", TokenKind::Bundle),
    ("graph", TokenKind::Graph),
    ("color", TokenKind::Color),
    ("label", TokenKind::Label),
    ("font", TokenKind::Font),
];

fn next_token(input: &mut &str) -> ModalResult<TokenKind> {
    alt((
        take_while(1.., |c: char| c.is_whitespace()).value(TokenKind::Whitespace),
        line_comment.value(TokenKind::Comment),
        string_literal.value(TokenKind::String),
        "--".value(TokenKind::EdgeUndirected),
        "->".value(TokenKind::EdgeDirected),
        '['.value(TokenKind::OpenBracket),
        ']'.value(TokenKind::CloseBracket),
        '='.value(TokenKind::Equal),
        ','.value(TokenKind::Comma),
        '{'.value(TokenKind::OpenBrace),
        '}'.value(TokenKind::CloseBrace),
        word,
    ))
    .parse_next(input)
}

fn line_comment<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    preceded("//", take_till(0.., |c: char| c == '\n')).parse_next(input)
}

fn string_literal<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    delimited('"', take_till(0.., |c: char| c == '"' || c == '\n'), '"').parse_next(input)
}

fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '#'
}

fn is_identifier_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn identifier_len(input: &str) -> usize {
    let mut lookahead = input;
    let matched: ModalResult<&str> = (
        one_of(is_identifier_start),
        take_while(0.., is_identifier_continue),
    )
        .take()
        .parse_next(&mut lookahead);
    matched.map_or(0, str::len)
}

fn starts_with_ignore_case(input: &str, keyword: &str) -> bool {
    input.len() >= keyword.len()
        && input.as_bytes()[..keyword.len()].eq_ignore_ascii_case(keyword.as_bytes())
}

/// Keyword or identifier, whichever match is longer (keyword on a tie).
fn word(input: &mut &str) -> ModalResult<TokenKind> {
    let ident_len = identifier_len(input);
    let keyword = KEYWORDS
        .iter()
        .find(|(keyword, _)| starts_with_ignore_case(input, keyword));

    match keyword {
        Some(&(keyword, kind)) if keyword.len() >= ident_len => {
            *input = &input[keyword.len()..];
            Ok(kind)
        }
        _ if ident_len > 0 => {
            *input = &input[ident_len..];
            Ok(TokenKind::Identifier)
        }
        _ => Err(ErrMode::Backtrack(ContextError::new())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).tokens.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn lex_header() {
        use TokenKind::*;
        assert_eq!(
            kinds("GRAPH demo [bundle] {"),
            vec![Graph, Identifier, OpenBracket, Bundle, CloseBracket, OpenBrace]
        );
    }

    #[test]
    fn lex_keywords_case_insensitive() {
        use TokenKind::*;
        assert_eq!(
            kinds("graph Graph GRAPH Color LINE-WIDTH Font-Size"),
            vec![Graph, Graph, Graph, Color, LineWidth, FontSize]
        );
    }

    #[test]
    fn lex_longer_identifier_beats_keyword() {
        use TokenKind::*;
        assert_eq!(
            kinds("graph1 colors fontsize label_x"),
            vec![Identifier, Identifier, Identifier, Identifier]
        );
    }

    #[test]
    fn lex_keyword_prefix_followed_by_hyphenated_keyword() {
        use TokenKind::*;
        // `font-size` must not lex as `font` `-` `size`.
        assert_eq!(kinds("font-size font"), vec![FontSize, Font]);
    }

    #[test]
    fn lex_edges_and_attributes() {
        use TokenKind::*;
        assert_eq!(
            kinds(r#"A -- B -> C [color="red", line-width=3]"#),
            vec![
                Identifier,
                EdgeUndirected,
                Identifier,
                EdgeDirected,
                Identifier,
                OpenBracket,
                Color,
                Equal,
                String,
                Comma,
                LineWidth,
                Equal,
                Identifier,
                CloseBracket,
            ]
        );
    }

    #[test]
    fn lex_identifier_shapes() {
        let out = tokenize("#ff0000 N0 42 a_b");
        let texts: Vec<&str> = out.tokens.iter().map(|t| t.text).collect();
        assert_eq!(texts, vec!["#ff0000", "N0", "42", "a_b"]);
        assert!(out.errors.is_empty());
    }

    #[test]
    fn lex_comments_go_to_side_channel() {
        let out = tokenize("A // first node\nB");
        assert_eq!(out.tokens.len(), 2);
        assert_eq!(out.comments.len(), 1);
        assert_eq!(out.comments[0].text, "// first node");
    }

    #[test]
    fn lex_locations_are_one_based() {
        let out = tokenize("graph g {\n  A\n}");
        let a = out.tokens.iter().find(|t| t.text == "A").unwrap();
        assert_eq!(a.location, Location::new(2, 3));
        assert_eq!(a.span, Span::new(12, 13));
    }

    #[test]
    fn lex_unrecognized_run_is_one_error() {
        let out = tokenize("A $%^ B");
        assert_eq!(out.tokens.len(), 2);
        assert_eq!(out.errors.len(), 1);
        assert_eq!(out.errors[0].text, "$%^");
        assert_eq!(out.errors[0].location, Location::new(1, 3));
    }

    #[test]
    fn lex_unterminated_string_is_an_error() {
        let out = tokenize("label=\"oops\nA");
        assert_eq!(out.errors.len(), 1);
        assert_eq!(out.errors[0].text, "\"");
        let kinds: Vec<TokenKind> = out.tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Label,
                TokenKind::Equal,
                TokenKind::Identifier,
                TokenKind::Identifier
            ]
        );
    }

    #[test]
    fn lex_single_hyphen_is_an_error() {
        let out = tokenize("A - B");
        assert_eq!(out.errors.len(), 1);
        assert_eq!(out.errors[0].text, "-");
    }

    #[test]
    fn lex_with_trivia_is_lossless() {
        let source = "graph g { // c\n  A -- B @ }";
        let out = tokenize_with_trivia(source);
        let mut pieces: Vec<(usize, &str)> = out.tokens.iter().map(|t| (t.span.start, t.text)).collect();
        pieces.extend(out.errors.iter().map(|e| (e.span.start, e.text.as_str())));
        pieces.sort_by_key(|(start, _)| *start);
        let rebuilt: String = pieces.into_iter().map(|(_, text)| text).collect();
        assert_eq!(rebuilt, source);
    }

    #[test]
    fn location_of_offset() {
        let source = "ab\ncd";
        assert_eq!(Location::of(source, 0), Location::new(1, 1));
        assert_eq!(Location::of(source, 4), Location::new(2, 2));
        assert_eq!(Location::of(source, 99), Location::new(2, 3));
    }
}
