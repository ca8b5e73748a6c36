//! Tokenizer for the Scheme lexical grammar.
//!
//! The lexer wraps the source in a [`winnow::stream::LocatingSlice`]
//! for single-rune lookahead and byte-offset spans, skips
//! `<intertoken space>` before each token, and dispatches on the first
//! significant rune. Tokens are zero-copy slices of the source.
//!
//! Grammar reference (R5RS formal syntax, lexical structure):
//!
//! ```text
//! <token> ::= <identifier> | <boolean> | <number>
//!           | <character> | <string>
//!           | ( | ) | #( | ' | ` | , | ,@ | .
//!
//! <intertoken space> ::= <atmosphere>*
//! <atmosphere> ::= <whitespace> | <comment>
//! <comment> ::= ; <all subsequent characters up to a line ending>
//! ```
//!
//! Numeric validity is delegated to [`crate::number::validate`]: a
//! candidate run of non-delimiters is scanned in full and submitted
//! whole.

use crate::{
    ast::{Span, Syntax},
    error::ReadError,
    number,
};
use self::utils::{InputExt, is_delimiter};
use winnow::stream::{Location, Stream};

pub(crate) mod utils;

/// Lexer input: a source slice that tracks byte offsets for spans.
pub type Input<'i> = winnow::stream::LocatingSlice<&'i str>;

/// Token classes of `<token>`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `#(`, opening a vector.
    VectorStart,
    /// `'`
    Quote,
    /// `` ` ``
    Backquote,
    /// `,`
    Comma,
    /// `,@`
    CommaAt,
    /// `.` standing alone between delimiters.
    Dot,
    /// `#t` or `#f`.
    Boolean,
    /// `#\<rune>`, `#\space`, or `#\newline`.
    Character,
    Identifier,
    /// A string body. The literal excludes the delimiting quotes and
    /// preserves escape sequences verbatim.
    String,
    /// A literal accepted by the numeric analyzer, prefix included.
    Number,
}

/// A token: its class and the exact source text that produced it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub literal: &'a str,
}

/// A token paired with its source span. For strings the span includes
/// the quotes the literal omits.
pub type SpannedToken<'a> = Syntax<Token<'a>>;

/// An iterator over the tokens of a source string.
pub struct Lexer<'i> {
    input: Input<'i>,
    source: &'i str,
}

impl<'i> Lexer<'i> {
    pub fn new(source: &'i str) -> Self {
        Self {
            input: Input::new(source),
            source,
        }
    }

    /// Lex one token, returning `Ok(None)` at end of input.
    pub fn next_token(&mut self) -> Result<Option<SpannedToken<'i>>, ReadError> {
        self.skip_atmosphere();

        let start = self.input.current_token_start();
        let Some(ch) = self.input.peek_token() else {
            return Ok(None);
        };

        match ch {
            '(' => Ok(Some(self.single(start, TokenKind::LParen))),
            ')' => Ok(Some(self.single(start, TokenKind::RParen))),
            '\'' => Ok(Some(self.single(start, TokenKind::Quote))),
            '`' => Ok(Some(self.single(start, TokenKind::Backquote))),
            ',' => {
                let _ = self.input.next_token();
                let kind = if self.input.eat('@') {
                    TokenKind::CommaAt
                } else {
                    TokenKind::Comma
                };
                Ok(Some(self.token_from(start, kind)))
            }
            '.' => self.scan_dot(start),
            '"' => self.scan_string(start),
            '#' => self.scan_hash(start),
            '+' | '-' => {
                let mut probe = self.input;
                let _ = probe.next_token();
                match probe.peek_token() {
                    Some(next) if !is_delimiter(next) => self.scan_number(start),
                    _ => {
                        self.input = probe;
                        Ok(Some(self.token_from(start, TokenKind::Identifier)))
                    }
                }
            }
            '0'..='9' => self.scan_number(start),
            _ => self.scan_identifier(start, ch),
        }
    }

    /// Consume `<atmosphere>`: spaces, newlines, and `;` line comments
    /// running to the next newline or end of input.
    fn skip_atmosphere(&mut self) {
        loop {
            while self.input.eat_if(|c| c == ' ' || c == '\n').is_some() {}
            if self.input.peek_token() != Some(';') {
                return;
            }
            while let Some(ch) = self.input.next_token() {
                if ch == '\n' {
                    break;
                }
            }
        }
    }

    /// A `.` starts a dot token, a decimal number, or the `...`
    /// identifier; anything else is an error.
    fn scan_dot(&mut self, start: usize) -> Result<Option<SpannedToken<'i>>, ReadError> {
        let mut probe = self.input;
        let _ = probe.next_token();
        match probe.peek_token() {
            None => {
                self.input = probe;
                Ok(Some(self.token_from(start, TokenKind::Dot)))
            }
            Some(next) if is_delimiter(next) => {
                self.input = probe;
                Ok(Some(self.token_from(start, TokenKind::Dot)))
            }
            Some(next) if next.is_ascii_digit() => self.scan_number(start),
            _ => {
                let _ = self.input.next_token();
                if self.input.eat('.') && self.input.eat('.') {
                    Ok(Some(self.token_from(start, TokenKind::Identifier)))
                } else {
                    Err(ReadError::InvalidDot {
                        span: self.span_from(start),
                    })
                }
            }
        }
    }

    /// `<string>`: the body runs to the first `"` not directly
    /// preceded by `\`. Escape sequences are not interpreted here.
    fn scan_string(&mut self, start: usize) -> Result<Option<SpannedToken<'i>>, ReadError> {
        let _ = self.input.next_token();
        let mut prev = '"';
        loop {
            match self.input.next_token() {
                None => {
                    return Err(ReadError::UnexpectedEof {
                        span: self.span_from(start),
                    });
                }
                Some('"') if prev != '\\' => break,
                Some(ch) => prev = ch,
            }
        }
        let end = self.input.current_token_start();
        let literal = &self.source[start + 1..end - 1];
        Ok(Some(Syntax::new(
            Span::new(start, end),
            Token {
                kind: TokenKind::String,
                literal,
            },
        )))
    }

    /// Dispatch for `#`-prefixed tokens: `#(`, booleans, characters,
    /// and number prefixes (which the numeric analyzer reprocesses).
    fn scan_hash(&mut self, start: usize) -> Result<Option<SpannedToken<'i>>, ReadError> {
        let mut probe = self.input;
        let _ = probe.next_token();
        match probe.peek_token() {
            Some('(') => {
                let _ = probe.next_token();
                self.input = probe;
                Ok(Some(self.token_from(start, TokenKind::VectorStart)))
            }
            Some('t' | 'f') => {
                let _ = probe.next_token();
                self.input = probe;
                Ok(Some(self.token_from(start, TokenKind::Boolean)))
            }
            Some('\\') => {
                let _ = probe.next_token();
                self.input = probe;
                self.scan_character(start)
            }
            Some('i' | 'e' | 'b' | 'o' | 'd' | 'x') => self.scan_number(start),
            _ => {
                self.input = probe;
                Err(ReadError::InvalidHash {
                    span: self.span_from(start),
                })
            }
        }
    }

    /// The remainder of a character literal, after `#\` has been
    /// consumed: one rune, or the name `space` or `newline`.
    fn scan_character(&mut self, start: usize) -> Result<Option<SpannedToken<'i>>, ReadError> {
        if self.input.next_token().is_none() {
            return Err(ReadError::UnexpectedEof {
                span: self.span_from(start),
            });
        }
        match self.input.peek_token() {
            Some(next) if !is_delimiter(next) => {
                while self.input.eat_if(|c| !is_delimiter(c)).is_some() {}
                let end = self.input.current_token_start();
                let name = &self.source[start + 2..end];
                if name == "space" || name == "newline" {
                    Ok(Some(self.token_from(start, TokenKind::Character)))
                } else {
                    Err(ReadError::UnknownCharName {
                        span: Span::new(start, end),
                    })
                }
            }
            _ => Ok(Some(self.token_from(start, TokenKind::Character))),
        }
    }

    /// A candidate number: the maximal non-delimiter run starting at
    /// the dispatch rune, accepted or rejected whole by the analyzer.
    fn scan_number(&mut self, start: usize) -> Result<Option<SpannedToken<'i>>, ReadError> {
        while self.input.eat_if(|c| !is_delimiter(c)).is_some() {}
        let end = self.input.current_token_start();
        let literal = &self.source[start..end];
        if !number::validate(literal) {
            return Err(ReadError::InvalidNumber {
                span: Span::new(start, end),
            });
        }
        Ok(Some(Syntax::new(
            Span::new(start, end),
            Token {
                kind: TokenKind::Number,
                literal,
            },
        )))
    }

    /// `<identifier>`: an initial rune followed by subsequent runes,
    /// ending at the next delimiter.
    fn scan_identifier(
        &mut self,
        start: usize,
        initial: char,
    ) -> Result<Option<SpannedToken<'i>>, ReadError> {
        let _ = self.input.next_token();
        if !is_identifier_initial(initial) {
            return Err(ReadError::InvalidIdent {
                span: self.span_from(start),
            });
        }
        while let Some(ch) = self.input.eat_if(|c| !is_delimiter(c)) {
            if !is_identifier_subsequent(ch) {
                return Err(ReadError::InvalidIdent {
                    span: self.span_from(start),
                });
            }
        }
        Ok(Some(self.token_from(start, TokenKind::Identifier)))
    }

    /// Consume a single rune and emit it as `kind`.
    fn single(&mut self, start: usize, kind: TokenKind) -> SpannedToken<'i> {
        let _ = self.input.next_token();
        self.token_from(start, kind)
    }

    /// Build a token whose literal is the source between `start` and
    /// the current position.
    fn token_from(&self, start: usize, kind: TokenKind) -> SpannedToken<'i> {
        let end = self.input.current_token_start();
        Syntax::new(
            Span::new(start, end),
            Token {
                kind,
                literal: &self.source[start..end],
            },
        )
    }

    fn span_from(&self, start: usize) -> Span {
        Span::new(start, self.input.current_token_start())
    }
}

impl<'i> Iterator for Lexer<'i> {
    type Item = Result<SpannedToken<'i>, ReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_token() {
            Ok(Some(token)) => Some(Ok(token)),
            Ok(None) => None,
            Err(e) => Some(Err(e)),
        }
    }
}

/// Create a lexer over the given source string.
#[inline]
pub fn lex(source: &str) -> Lexer<'_> {
    Lexer::new(source)
}

/// `<initial> ::= <letter> | ! | $ | % | & | * | / | : | < | = | > | ? | ^ | _ | ~`
fn is_identifier_initial(ch: char) -> bool {
    ch.is_ascii_alphabetic()
        || matches!(
            ch,
            '!' | '$' | '%' | '&' | '*' | '/' | ':' | '<' | '=' | '>' | '?' | '^' | '_' | '~'
        )
}

/// `<subsequent> ::= <initial> | <digit> | + | - | . | @`
fn is_identifier_subsequent(ch: char) -> bool {
    is_identifier_initial(ch) || ch.is_ascii_digit() || matches!(ch, '+' | '-' | '.' | '@')
}
