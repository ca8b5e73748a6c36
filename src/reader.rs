//! Datum parser: builds S-expressions from the token vector.
//!
//! Grammar reference (R5RS external representations):
//!
//! ```text
//! <datum> ::= <simple datum> | <compound datum>
//! <simple datum> ::= <boolean> | <number> | <character>
//!                  | <string> | <symbol>
//! <compound datum> ::= <list> | <vector>
//! <list> ::= ( <datum>* ) | ( <datum>+ . <datum> )
//!          | <abbreviation>
//! <abbreviation> ::= <abbrev prefix> <datum>
//! <abbrev prefix> ::= ' | ` | , | ,@
//! <vector> ::= #( <datum>* )
//! ```
//!
//! The grammar is LL(1): one token of lookahead and no backtracking.
//! The parser consumes the token vector exactly once, left to right,
//! and holds only a cursor.

use crate::{
    ast::{Atom, Sexpr, Span},
    error::ReadError,
    lex::{self, SpannedToken, TokenKind},
    number,
};

/// Read a whole source text: lex it and parse the tokens into the
/// sequence of top-level datums, in textual order.
pub fn read(source: &str) -> Result<Vec<Sexpr>, ReadError> {
    let tokens = lex::lex(source).collect::<Result<Vec<_>, _>>()?;
    Parser::new(tokens).parse()
}

/// Parses a token vector into a program's S-expression sequence.
pub struct Parser<'a> {
    tokens: Vec<SpannedToken<'a>>,
    cursor: usize,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: Vec<SpannedToken<'a>>) -> Self {
        Self { tokens, cursor: 0 }
    }

    /// Parse every top-level datum.
    pub fn parse(&mut self) -> Result<Vec<Sexpr>, ReadError> {
        let mut program = Vec::new();
        while self.cursor < self.tokens.len() {
            program.push(self.parse_datum()?);
        }
        Ok(program)
    }

    fn peek(&self) -> Option<SpannedToken<'a>> {
        self.tokens.get(self.cursor).copied()
    }

    fn advance(&mut self) -> Option<SpannedToken<'a>> {
        let token = self.peek();
        if token.is_some() {
            self.cursor += 1;
        }
        token
    }

    /// The position just past the last token, for errors raised when
    /// the vector runs out.
    fn end_span(&self) -> Span {
        self.tokens
            .last()
            .map_or(Span::new(0, 0), |t| Span::new(t.span.end, t.span.end))
    }

    fn parse_datum(&mut self) -> Result<Sexpr, ReadError> {
        let Some(token) = self.advance() else {
            return Err(ReadError::structure(self.end_span(), "datum expected"));
        };
        let span = token.span;
        let literal = token.value.literal;

        match token.value.kind {
            TokenKind::Boolean => Ok(Sexpr::Atom(Atom::Boolean(parse_boolean(literal)))),
            TokenKind::Number => {
                // The lexer validated the literal; a literal that fails
                // to convert here is an internal invariant violation.
                let value = number::parse(literal).ok_or_else(|| {
                    ReadError::structure(span, "number literal failed to convert")
                })?;
                Ok(Sexpr::Atom(Atom::Number(value)))
            }
            TokenKind::Character => Ok(Sexpr::Atom(Atom::Character(parse_character(literal)))),
            TokenKind::String => Ok(Sexpr::Atom(Atom::String(literal.to_string()))),
            TokenKind::Identifier => Ok(Sexpr::Atom(Atom::Symbol(literal.to_string()))),
            TokenKind::VectorStart => self.parse_vector(span),
            TokenKind::Quote => self.parse_abbreviation("quote"),
            TokenKind::Backquote => self.parse_abbreviation("quasiquote"),
            TokenKind::Comma => self.parse_abbreviation("unquote"),
            TokenKind::CommaAt => self.parse_abbreviation("unquote-splicing"),
            TokenKind::LParen => self.parse_list(span),
            TokenKind::RParen => Err(ReadError::structure(span, "unexpected `)`")),
            TokenKind::Dot => Err(ReadError::structure(span, "unexpected `.`")),
        }
    }

    /// `<list>`, after the opening `(` has been consumed. A `.` splices
    /// exactly one more datum as the final `cdr` and must be followed
    /// by `)`.
    fn parse_list(&mut self, start: Span) -> Result<Sexpr, ReadError> {
        let mut elements = Vec::new();

        loop {
            let Some(token) = self.peek() else {
                return Err(ReadError::structure(start, "unterminated list"));
            };
            match token.value.kind {
                TokenKind::RParen => {
                    self.cursor += 1;
                    return Ok(Sexpr::proper_list(elements));
                }
                TokenKind::Dot => {
                    if elements.is_empty() {
                        return Err(ReadError::structure(
                            token.span,
                            "unexpected `.` at start of list",
                        ));
                    }
                    self.cursor += 1;
                    let tail = self.parse_datum()?;
                    return match self.advance() {
                        Some(close) if close.value.kind == TokenKind::RParen => {
                            Ok(Sexpr::improper_list(elements, tail))
                        }
                        Some(close) => Err(ReadError::structure(close.span, "list end expected")),
                        None => Err(ReadError::structure(self.end_span(), "list end expected")),
                    };
                }
                _ => elements.push(self.parse_datum()?),
            }
        }
    }

    /// `<vector>`, after the opening `#(` has been consumed. Vectors
    /// have no dotted form; a `.` inside is rejected by `parse_datum`.
    fn parse_vector(&mut self, start: Span) -> Result<Sexpr, ReadError> {
        let mut elements = Vec::new();

        loop {
            let Some(token) = self.peek() else {
                return Err(ReadError::structure(start, "unterminated vector"));
            };
            if token.value.kind == TokenKind::RParen {
                self.cursor += 1;
                return Ok(Sexpr::Atom(Atom::Vector(elements)));
            }
            elements.push(self.parse_datum()?);
        }
    }

    /// `<abbreviation>` rewrites to the two-element list `(name <datum>)`.
    fn parse_abbreviation(&mut self, name: &str) -> Result<Sexpr, ReadError> {
        let datum = self.parse_datum()?;
        Ok(Sexpr::proper_list([Sexpr::symbol(name), datum]))
    }
}

/// The second rune of `#t` / `#f` decides the value.
fn parse_boolean(literal: &str) -> bool {
    literal.as_bytes()[1] == b't'
}

/// Decode a character literal: `#\space` and `#\newline` by name,
/// otherwise the rune after `#\`.
fn parse_character(literal: &str) -> char {
    match &literal[2..] {
        "space" => ' ',
        "newline" => '\n',
        rest => rest.chars().next().unwrap_or('\0'),
    }
}
