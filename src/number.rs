//! Numeric-literal analyzer.
//!
//! This module decides whether a candidate token is a valid `<number>`
//! and computes the value of literals that are. It is consulted twice
//! per literal: the lexer calls [`validate`] to accept or reject a
//! scanned rune run, and the parser calls [`parse`] to build the
//! number atom.
//!
//! Grammar reference (R5RS formal syntax, `<number>` and children):
//!
//! ```text
//! <number>    ::= <prefix R> <complex R>        for R in {2, 8, 10, 16}
//!
//! <prefix R>  ::= <radix R> <exactness> | <exactness> <radix R>
//! <exactness> ::= <empty> | #i | #e
//! <radix 2>   ::= #b      <radix 8>  ::= #o
//! <radix 10>  ::= <empty> | #d       <radix 16> ::= #x
//!
//! <complex R> ::= <real R>
//!               | <real R> @ <real R>
//!               | <real R> + <ureal R> i | <real R> - <ureal R> i
//!               | <real R> + i           | <real R> - i
//!               | + <ureal R> i          | - <ureal R> i
//!               | + i                    | - i
//!
//! <real R>    ::= <sign> <ureal R>
//! <ureal R>   ::= <uinteger R>
//!               | <uinteger R> / <uinteger R>
//!               | <decimal 10>                  (radix 10 only)
//! <uinteger R> ::= <digit R>+ #*
//!
//! <decimal 10> ::= <uinteger 10> <suffix>
//!                | . <digit 10>+ #* <suffix>
//!                | <digit 10>+ . <digit 10>* #* <suffix>
//!                | <digit 10>+ #+ . #* <suffix>
//! <suffix>    ::= <empty> | <exponent marker> <sign> <digit 10>+
//! <exponent marker> ::= e | s | f | d | l
//! ```
//!
//! Every `#` standing in for a digit contributes a `0` to the value and
//! makes the result inexact. Flags, digits, and markers are lowercase,
//! as in the grammar above.
//!
//! The analyzer runs in two passes: a structural pass (winnow parsers
//! mirroring the productions, one backtrackable function per
//! nonterminal) that must consume the whole literal, and an evaluation
//! pass that folds the recorded spellings into an IEEE-754 complex
//! pair while tracking exactness.

use winnow::{
    Parser,
    error::{ContextError, ErrMode},
    stream::Stream,
    token::take_while,
};

type Input<'i> = &'i str;
type PResult<O> = Result<O, ErrMode<ContextError>>;

/// Radix base of a numeric literal.
///
/// Invariant: only 2, 8, 10, or 16.
pub type Radix = u32;

/// Value of a numeric literal: an IEEE-754 double-precision complex
/// pair, the exactness bit, and the radix the digits were read in.
#[derive(Clone, Copy, Debug)]
pub struct Number {
    pub real: f64,
    pub imag: f64,
    /// True if any part of the literal forced inexactness: the `#i`
    /// flag, a `#` digit placeholder, a decimal point, an exponent
    /// marker, or a polar angle with a non-trivial sine.
    pub inexact: bool,
    pub radix: Radix,
}

/// Exactness and value decide equality; `radix` records how the digits
/// were spelled and does not participate.
impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.inexact == other.inexact && self.real == other.real && self.imag == other.imag
    }
}

/// True iff `literal` matches the full `<number>` grammar for some
/// radix.
pub fn validate(literal: &str) -> bool {
    scan(literal).is_some()
}

/// Parse a complete numeric literal into its value.
///
/// Returns `None` exactly when [`validate`] returns false; the two
/// functions accept the same strings.
pub fn parse(literal: &str) -> Option<Number> {
    scan(literal).map(|literal| eval(&literal))
}

// --- Structural representation ---

/// Sign prefix used by `<sign>`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Sign {
    Positive,
    Negative,
}

/// Explicit exactness flag from the `<prefix R>`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Exactness {
    Exact,
    Inexact,
    Unspecified,
}

/// Spelling classes produced by `<ureal R>`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum UrealKind {
    /// `<uinteger R>`, e.g. `42` or `1#`.
    Integer,
    /// `<uinteger R> / <uinteger R>`, e.g. `3/4`.
    Rational,
    /// `<decimal 10>`, e.g. `3.14`, `.5`, `1##.e+1`.
    Decimal,
}

/// Signless magnitude: classification plus the exact source spelling.
/// The spelling may contain `#` digit placeholders; the evaluator maps
/// each to `0` and marks the result inexact.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Ureal<'a> {
    kind: UrealKind,
    spelling: &'a str,
}

/// Signed real as spelled inside a literal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Real<'a> {
    sign: Option<Sign>,
    magnitude: Ureal<'a>,
}

/// Shape of the `<complex R>` production that matched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ComplexShape<'a> {
    Real(Real<'a>),
    /// `real` is `None` for the pure-imaginary forms.
    Rectangular {
        real: Option<Real<'a>>,
        imag: Real<'a>,
    },
    Polar {
        magnitude: Real<'a>,
        angle: Real<'a>,
    },
}

/// Structural form of a whole literal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Literal<'a> {
    radix: Radix,
    exactness: Exactness,
    value: ComplexShape<'a>,
}

/// The implicit magnitude of `+i` / `-i`.
const UNIT: Ureal<'static> = Ureal {
    kind: UrealKind::Integer,
    spelling: "1",
};

// --- Structural pass ---

fn scan(literal: &str) -> Option<Literal<'_>> {
    let mut input: Input = literal;
    match lex_number(&mut input) {
        Ok(parsed) if input.is_empty() => Some(parsed),
        _ => None,
    }
}

fn backtrack<O>() -> PResult<O> {
    Err(ErrMode::Backtrack(ContextError::new()))
}

/// Succeeds only at the end of the literal. Complex forms use this the
/// way delimited tokens end: nothing may trail the matched spelling.
fn ensure_end(input: &mut Input<'_>) -> PResult<()> {
    if input.is_empty() { Ok(()) } else { backtrack() }
}

/// `<number> ::= <prefix R> <complex R>`.
///
/// The prefix admits one radix flag and one exactness flag in either
/// order; duplicates reject the literal. A `#` followed by anything
/// else is not a prefix (it can only be a digit placeholder, which
/// never starts a literal).
fn lex_number<'i>(input: &mut Input<'i>) -> PResult<Literal<'i>> {
    let mut radix: Option<Radix> = None;
    let mut exactness: Option<Exactness> = None;

    while input.peek_token() == Some('#') {
        let mut probe = *input;
        let _ = probe.next_token();
        let Some(flag) = probe.next_token() else {
            return backtrack();
        };
        match flag {
            'b' | 'o' | 'd' | 'x' => {
                if radix.is_some() {
                    return backtrack();
                }
                radix = Some(match flag {
                    'b' => 2,
                    'o' => 8,
                    'd' => 10,
                    _ => 16,
                });
            }
            'e' => {
                if exactness.is_some() {
                    return backtrack();
                }
                exactness = Some(Exactness::Exact);
            }
            'i' => {
                if exactness.is_some() {
                    return backtrack();
                }
                exactness = Some(Exactness::Inexact);
            }
            _ => return backtrack(),
        }
        *input = probe;
    }

    let radix = radix.unwrap_or(10);
    let value = lex_complex(input, radix)?;

    Ok(Literal {
        radix,
        exactness: exactness.unwrap_or(Exactness::Unspecified),
        value,
    })
}

/// `<complex R>`: real, polar, rectangular, and pure-imaginary forms.
///
/// A leading `<real R>` is parsed first; what follows decides the
/// shape. A signed real directly before `i` is a pure imaginary part
/// (`+5i`), which is why the bare-`i` branch requires an explicit
/// sign: `2i` is not in the grammar.
fn lex_complex<'i>(input: &mut Input<'i>, radix: Radix) -> PResult<ComplexShape<'i>> {
    let start = *input;

    match lex_real(input, radix) {
        Ok(first) => {
            let Some(next) = input.peek_token() else {
                return Ok(ComplexShape::Real(first));
            };
            match next {
                '@' => {
                    let _ = input.next_token();
                    let angle = lex_real(input, radix)?;
                    ensure_end(input)?;
                    Ok(ComplexShape::Polar {
                        magnitude: first,
                        angle,
                    })
                }
                'i' => {
                    if first.sign.is_none() {
                        return backtrack();
                    }
                    let _ = input.next_token();
                    ensure_end(input)?;
                    Ok(ComplexShape::Rectangular {
                        real: None,
                        imag: first,
                    })
                }
                '+' | '-' => {
                    let _ = input.next_token();
                    let sign = if next == '-' {
                        Sign::Negative
                    } else {
                        Sign::Positive
                    };
                    let magnitude = if input.peek_token() == Some('i') {
                        UNIT
                    } else {
                        lex_ureal(input, radix)?
                    };
                    if input.next_token() != Some('i') {
                        return backtrack();
                    }
                    ensure_end(input)?;
                    Ok(ComplexShape::Rectangular {
                        real: Some(first),
                        imag: Real {
                            sign: Some(sign),
                            magnitude,
                        },
                    })
                }
                _ => backtrack(),
            }
        }
        Err(_) => {
            // No leading `<real R>`; only `+i` / `-i` remains.
            *input = start;
            let sign = match input.next_token() {
                Some('+') => Sign::Positive,
                Some('-') => Sign::Negative,
                _ => return backtrack(),
            };
            if input.next_token() != Some('i') {
                return backtrack();
            }
            ensure_end(input)?;
            Ok(ComplexShape::Rectangular {
                real: None,
                imag: Real {
                    sign: Some(sign),
                    magnitude: UNIT,
                },
            })
        }
    }
}

/// `<real R> ::= <sign> <ureal R>`. Consumes nothing on failure.
fn lex_real<'i>(input: &mut Input<'i>, radix: Radix) -> PResult<Real<'i>> {
    let mut probe = *input;
    let sign = match probe.peek_token() {
        Some('+') => {
            let _ = probe.next_token();
            Some(Sign::Positive)
        }
        Some('-') => {
            let _ = probe.next_token();
            Some(Sign::Negative)
        }
        _ => None,
    };
    let magnitude = lex_ureal(&mut probe, radix)?;
    *input = probe;
    Ok(Real { sign, magnitude })
}

/// `<ureal R>`: an integer, a rational, or (radix 10 only) a decimal.
///
/// The integer reading is preferred; a `/`, a decimal point, or a
/// complete exponent suffix after the digits upgrades the
/// classification. Once `#` placeholders start, only placeholders may
/// follow a subsequent decimal point.
fn lex_ureal<'i>(input: &mut Input<'i>, radix: Radix) -> PResult<Ureal<'i>> {
    let (kind, spelling) = (move |input: &mut Input<'i>| -> PResult<UrealKind> {
        if radix == 10 && input.peek_token() == Some('.') {
            // `. <digit 10>+ #*` with an optional suffix.
            let _ = input.next_token();
            let _: &str = take_while(1.., |c: char| c.is_ascii_digit()).parse_next(input)?;
            let _: &str = take_while(0.., '#').parse_next(input)?;
            let _ = try_suffix(input)?;
            return Ok(UrealKind::Decimal);
        }

        let _: &str = take_while(1.., |c| is_radix_digit(c, radix)).parse_next(input)?;
        let hashes: &str = take_while(0.., '#').parse_next(input)?;
        let has_hashes = !hashes.is_empty();

        match input.peek_token() {
            Some('/') => {
                let _ = input.next_token();
                let _: &str = take_while(1.., |c| is_radix_digit(c, radix)).parse_next(input)?;
                let _: &str = take_while(0.., '#').parse_next(input)?;
                Ok(UrealKind::Rational)
            }
            Some('.') if radix == 10 => {
                let _ = input.next_token();
                if !has_hashes {
                    let _: &str = take_while(0.., |c: char| c.is_ascii_digit()).parse_next(input)?;
                }
                let _: &str = take_while(0.., '#').parse_next(input)?;
                let _ = try_suffix(input)?;
                Ok(UrealKind::Decimal)
            }
            Some(c) if radix == 10 && is_exponent_marker(c) => {
                if try_suffix(input)? {
                    Ok(UrealKind::Decimal)
                } else {
                    Ok(UrealKind::Integer)
                }
            }
            _ => Ok(UrealKind::Integer),
        }
    })
    .with_taken()
    .parse_next(input)?;

    Ok(Ureal { kind, spelling })
}

/// `<suffix> ::= <exponent marker> <sign> <digit 10>+`.
///
/// Consumes the suffix and returns true when one is present in full;
/// consumes nothing and returns false otherwise. A marker without
/// digits is not a suffix (the trailing text then fails the literal at
/// the complex level).
fn try_suffix(input: &mut Input<'_>) -> PResult<bool> {
    let mut probe = *input;
    match probe.next_token() {
        Some(c) if is_exponent_marker(c) => {}
        _ => return Ok(false),
    }
    if matches!(probe.peek_token(), Some('+' | '-')) {
        let _ = probe.next_token();
    }
    let digits: PResult<&str> = take_while(1.., |c: char| c.is_ascii_digit()).parse_next(&mut probe);
    if digits.is_err() {
        return Ok(false);
    }
    *input = probe;
    Ok(true)
}

fn is_radix_digit(ch: char, radix: Radix) -> bool {
    match radix {
        2 => matches!(ch, '0' | '1'),
        8 => matches!(ch, '0'..='7'),
        16 => matches!(ch, '0'..='9' | 'a'..='f'),
        _ => ch.is_ascii_digit(),
    }
}

fn is_exponent_marker(ch: char) -> bool {
    matches!(ch, 'e' | 's' | 'f' | 'd' | 'l')
}

// --- Evaluation pass ---

/// Evaluate a structurally valid literal into its value.
fn eval(literal: &Literal<'_>) -> Number {
    let mut inexact = literal.exactness == Exactness::Inexact;
    let radix = literal.radix;

    let (real, imag) = match &literal.value {
        ComplexShape::Real(real) => (eval_real(real, radix, &mut inexact), 0.0),
        ComplexShape::Rectangular { real, imag } => (
            real.as_ref()
                .map_or(0.0, |real| eval_real(real, radix, &mut inexact)),
            eval_real(imag, radix, &mut inexact),
        ),
        ComplexShape::Polar { magnitude, angle } => {
            let rho = eval_real(magnitude, radix, &mut inexact);
            let theta = eval_real(angle, radix, &mut inexact);
            let sin = theta.sin();
            // Trigonometric evaluation of a non-trivial angle is
            // inherently inexact; 1e-52 is the historical cutoff.
            if sin.abs() > 1e-52 {
                inexact = true;
            }
            (rho * theta.cos(), rho * sin)
        }
    };

    Number {
        real,
        imag,
        inexact,
        radix,
    }
}

fn eval_real(real: &Real<'_>, radix: Radix, inexact: &mut bool) -> f64 {
    let sign = match real.sign {
        Some(Sign::Negative) => -1.0,
        _ => 1.0,
    };
    sign * eval_ureal(&real.magnitude, radix, inexact)
}

fn eval_ureal(ureal: &Ureal<'_>, radix: Radix, inexact: &mut bool) -> f64 {
    match ureal.kind {
        UrealKind::Integer => eval_uinteger(ureal.spelling, radix, inexact),
        UrealKind::Rational => match ureal.spelling.split_once('/') {
            Some((dividend, divisor)) => {
                eval_uinteger(dividend, radix, inexact) / eval_uinteger(divisor, radix, inexact)
            }
            None => eval_uinteger(ureal.spelling, radix, inexact),
        },
        UrealKind::Decimal => eval_decimal(ureal.spelling, inexact),
    }
}

/// Fold an integer spelling into an `f64` digit by digit. Each `#`
/// contributes a `0` and marks the value inexact. Folding in floating
/// point keeps the conversion total; spellings past 2^53 round, which
/// the double-based value domain already implies.
fn eval_uinteger(spelling: &str, radix: Radix, inexact: &mut bool) -> f64 {
    let mut value = 0.0;
    for ch in spelling.chars() {
        let digit = if ch == '#' {
            *inexact = true;
            0
        } else {
            ch.to_digit(radix).unwrap_or(0)
        };
        value = value * f64::from(radix) + f64::from(digit);
    }
    value
}

/// Evaluate a `<decimal 10>` spelling: exponent markers unify to `e`,
/// `#` placeholders become `0` digits, and a remaining point or
/// exponent marks the value inexact. The mapping happens before the
/// float conversion.
fn eval_decimal(spelling: &str, inexact: &mut bool) -> f64 {
    let mapped: String = spelling
        .chars()
        .map(|ch| match ch {
            's' | 'f' | 'd' | 'l' => 'e',
            '#' => {
                *inexact = true;
                '0'
            }
            _ => ch,
        })
        .collect();

    if mapped.contains('.') || mapped.contains('e') {
        *inexact = true;
    }

    // Grammar-matched decimals are within the stdlib float syntax.
    mapped.parse().expect("decimal spelling must convert")
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ValueCase {
        literal: &'static str,
        real: f64,
        imag: f64,
        inexact: bool,
    }

    impl ValueCase {
        fn run(&self) {
            assert!(
                validate(self.literal),
                "{}: expected valid literal",
                self.literal
            );
            let number = parse(self.literal)
                .unwrap_or_else(|| panic!("{}: parse rejected valid literal", self.literal));
            assert_eq!(
                number.real, self.real,
                "{}: real part mismatch",
                self.literal
            );
            assert_eq!(
                number.imag, self.imag,
                "{}: imaginary part mismatch",
                self.literal
            );
            assert_eq!(
                number.inexact, self.inexact,
                "{}: exactness mismatch",
                self.literal
            );
        }
    }

    fn case(literal: &'static str, real: f64, imag: f64, inexact: bool) -> ValueCase {
        ValueCase {
            literal,
            real,
            imag,
            inexact,
        }
    }

    #[test]
    fn binary_literals() {
        let cases = [
            case("#b0", 0.0, 0.0, false),
            case("#b1", 1.0, 0.0, false),
            case("#b10", 2.0, 0.0, false),
            case("#b1#", 2.0, 0.0, true),
            case("#b0/1", 0.0, 0.0, false),
            case("#b1/1", 1.0, 0.0, false),
            case("#b1/10", 0.5, 0.0, false),
            case("#b#e0#/10", 0.0, 0.0, true),
            case("#b#i0", 0.0, 0.0, true),
            case("#b#e1", 1.0, 0.0, false),
            case("#i#b1", 1.0, 0.0, true),
            case("#e#b0", 0.0, 0.0, false),
            case("#b#i+10/1#", 1.0, 0.0, true),
            case("#b-0", 0.0, 0.0, false),
            case("#b-10", -2.0, 0.0, false),
            case("#b-1/10", -0.5, 0.0, false),
            case("#b0@0", 0.0, 0.0, false),
            case("#b1@1", 1f64.cos(), 1f64.sin(), true),
            case("#b0+1i", 0.0, 1.0, false),
            case("#b1-1i", 1.0, -1.0, false),
            case("#b-0-1i", 0.0, -1.0, false),
            case("#b+i", 0.0, 1.0, false),
            case("#b-i", 0.0, -1.0, false),
            case("#b-0i", 0.0, 0.0, false),
        ];
        for case in &cases {
            case.run();
        }
    }

    #[test]
    fn octal_literals() {
        let cases = [
            case("#o7", 7.0, 0.0, false),
            case("#o10", 8.0, 0.0, false),
            case("#o1#", 8.0, 0.0, true),
            case("#o1/7", 1.0 / 7.0, 0.0, false),
            case("#o-10/1", -8.0, 0.0, false),
            case("#e#o-70/1+i", -56.0, 1.0, false),
            case("#o7@7", 7.0 * 7f64.cos(), 7.0 * 7f64.sin(), true),
            case("#o-7-7i", -7.0, -7.0, false),
            case("#i#o7", 7.0, 0.0, true),
        ];
        for case in &cases {
            case.run();
        }
    }

    #[test]
    fn decimal_literals() {
        let cases = [
            case("0", 0.0, 0.0, false),
            case("1", 1.0, 0.0, false),
            case("42", 42.0, 0.0, false),
            case("#d10", 10.0, 0.0, false),
            case("1#", 10.0, 0.0, true),
            case("-9", -9.0, 0.0, false),
            case("0/1", 0.0, 0.0, false),
            case("1/2", 0.5, 0.0, false),
            case("-1/2", -0.5, 0.0, false),
            case("#e1", 1.0, 0.0, false),
            case("#i1", 1.0, 0.0, true),
            case("1.5", 1.5, 0.0, true),
            case(".5", 0.5, 0.0, true),
            case("1.", 1.0, 0.0, true),
            case("#e1.5", 1.5, 0.0, true),
            case("1e2", 100.0, 0.0, true),
            case("1s2", 100.0, 0.0, true),
            case("1f2", 100.0, 0.0, true),
            case("1d2", 100.0, 0.0, true),
            case("1l2", 100.0, 0.0, true),
            case("1e-2", 0.01, 0.0, true),
            case("1#e-1", 1.0, 0.0, true),
            case("1##.e+1", 1000.0, 0.0, true),
            case("2s+2", 200.0, 0.0, true),
            case(".3#f+33", 3.0e32, 0.0, true),
            case("4.4#d+4", 44000.0, 0.0, true),
            case("55#.l-5", 550e-5, 0.0, true),
            case("1@1", 1f64.cos(), 1f64.sin(), true),
            case("-1@-1", -(1f64.cos()), 1f64.sin(), true),
            case("1+1i", 1.0, 1.0, false),
            case("1-2i", 1.0, -2.0, false),
            case("1+2.5i", 1.0, 2.5, true),
            case("+5i", 0.0, 5.0, false),
            case("-5i", 0.0, -5.0, false),
            case("+i", 0.0, 1.0, false),
            case("-i", 0.0, -1.0, false),
            case("+0i", 0.0, 0.0, false),
            case("-0i", 0.0, 0.0, false),
        ];
        for case in &cases {
            case.run();
        }
    }

    #[test]
    fn hexadecimal_literals() {
        let cases = [
            case("#xf", 15.0, 0.0, false),
            case("#x10", 16.0, 0.0, false),
            case("#xf#", 240.0, 0.0, true),
            case("#xa/b", 10.0 / 11.0, 0.0, false),
            case("#i#x-fi", 0.0, -15.0, true),
            case("#x1e", 30.0, 0.0, false),
        ];
        for case in &cases {
            case.run();
        }
    }

    #[test]
    fn invalid_literals() {
        let invalid = [
            "",
            "+",
            "-",
            "#",
            "##",
            "#q1",
            "#b#b1",
            "#e#i1",
            "#b2",
            "#o8",
            "#xg",
            "#B1",
            "#xF",
            "1E5",
            "2i",
            "i",
            "1e",
            "1e+",
            "1.5e",
            "1/",
            "/1",
            "1/2/3",
            "1#.5",
            "1.2#3",
            "1..",
            "..",
            "1+2",
            "1+-2i",
            "1@",
            "@1",
            "1@2i",
            "#b1.0",
            "#x1.0",
            "#b1/2",
            "1.5x",
        ];
        for literal in invalid {
            assert!(!validate(literal), "{literal}: expected invalid literal");
            assert!(
                parse(literal).is_none(),
                "{literal}: parse accepted invalid literal"
            );
        }
    }

    #[test]
    fn radix_is_recorded_but_ignored_by_equality() {
        let binary = parse("#b10").unwrap();
        let octal = parse("#o2").unwrap();
        assert_eq!(binary.radix, 2);
        assert_eq!(octal.radix, 8);
        assert_eq!(binary, octal);
    }

    #[test]
    fn division_follows_float_semantics() {
        // `1/0` is grammatically a rational; the value divides as
        // floats do.
        let number = parse("1/0").unwrap();
        assert!(number.real.is_infinite());
        assert!(!number.inexact);
    }
}
