//! R5RS Scheme reader: tokenizer, datum parser, and numeric-literal
//! analyzer.
//!
//! The crate turns a source string into a sequence of S-expression
//! values, or a structured error:
//!
//! ```text
//! characters -> Lexer -> tokens -> Parser -> Sexpr sequence
//! ```
//!
//! The numeric analyzer ([`number`]) is consulted twice along the way:
//! by the lexer to decide whether a candidate rune run is a legal
//! `<number>`, and by the parser to compute the value of a number
//! atom.
//!
//! ```
//! use r5read::{read, Sexpr};
//!
//! let program = read("(a . b) '#(1 2)").unwrap();
//! assert_eq!(program.len(), 2);
//! assert_eq!(
//!     program[0],
//!     Sexpr::Pair(Box::new(Sexpr::symbol("a")), Box::new(Sexpr::symbol("b"))),
//! );
//! ```
//!
//! The reader is single-threaded and synchronous; it keeps no process
//! state. For concurrency, instantiate one reader per thread.

pub mod ast;
pub mod error;
pub mod lex;
pub mod number;
pub mod reader;

pub use ast::{Atom, Sexpr, Span, Syntax};
pub use error::ReadError;
pub use lex::{Lexer, SpannedToken, Token, TokenKind, lex};
pub use number::Number;
pub use reader::{Parser, read};
