//! End-to-end reader tests: source text in, S-expressions out.

use r5read::{Atom, ReadError, Sexpr, read};

fn sym(name: &str) -> Sexpr {
    Sexpr::symbol(name)
}

#[test]
fn reads_a_small_program() {
    let source = "\
; factorial, the classic way
(define (fact n)
  (if (< n 2) 1 (* n (fact (- n 1)))))";

    let program = read(source).unwrap();
    assert_eq!(program.len(), 1);

    let define = &program[0];
    let head: Vec<&Sexpr> = define.list_iter().collect();
    assert_eq!(head.len(), 3);
    assert_eq!(head[0], &sym("define"));
    assert_eq!(
        head[1],
        &Sexpr::proper_list([sym("fact"), sym("n")]),
    );
}

#[test]
fn top_level_order_is_textual_order() {
    let program = read("a b (c) #t").unwrap();
    assert_eq!(program.len(), 4);
    assert_eq!(program[0], sym("a"));
    assert_eq!(program[1], sym("b"));
    assert_eq!(program[2], Sexpr::proper_list([sym("c")]));
    assert_eq!(program[3], Sexpr::Atom(Atom::Boolean(true)));
}

#[test]
fn numeric_atoms_carry_value_and_exactness() {
    let program = read("#e#o-70/1+i #i#x-fi 1##.e+1 1@1").unwrap();

    let expect = |sexpr: &Sexpr, real: f64, imag: f64, inexact: bool| match sexpr {
        Sexpr::Atom(Atom::Number(n)) => {
            assert_eq!(n.real, real);
            assert_eq!(n.imag, imag);
            assert_eq!(n.inexact, inexact);
        }
        other => panic!("expected number atom, got {other:?}"),
    };

    expect(&program[0], -56.0, 1.0, false);
    expect(&program[1], 0.0, -15.0, true);
    expect(&program[2], 1000.0, 0.0, true);
    expect(&program[3], 1f64.cos(), 1f64.sin(), true);
}

#[test]
fn abbreviations_nest() {
    // ',x reads as (quote (unquote x)).
    let program = read("',x").unwrap();
    assert_eq!(
        program,
        vec![Sexpr::proper_list([
            sym("quote"),
            Sexpr::proper_list([sym("unquote"), sym("x")]),
        ])],
    );
}

#[test]
fn strings_pass_through_unescaped() {
    let program = read(r#""line one\nline two""#).unwrap();
    assert_eq!(
        program,
        vec![Sexpr::Atom(Atom::String(r"line one\nline two".to_string()))],
    );
}

#[test]
fn lexical_errors_surface_through_read() {
    assert!(matches!(
        read("\"unterminated"),
        Err(ReadError::UnexpectedEof { .. }),
    ));
    assert!(matches!(read("#\\foo"), Err(ReadError::UnknownCharName { .. })));
    assert!(matches!(read("#b2"), Err(ReadError::InvalidNumber { .. })));
}

#[test]
fn structural_errors_surface_through_read() {
    assert!(matches!(
        read("(a . b c)"),
        Err(ReadError::Structure { .. }),
    ));
    assert!(matches!(read("(a"), Err(ReadError::Structure { .. })));
}

#[test]
fn success_means_the_whole_input_was_read() {
    // No partial output: the trailing error voids the entire read.
    assert!(read("(a b) #q").is_err());
}
