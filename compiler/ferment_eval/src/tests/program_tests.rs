//! Larger programs and the I/O built-ins.

use ferment_ir::{AstBuilder, BinaryOp, StringInterner};
use pretty_assertions::assert_eq;

use super::{run, run_with_input};
use crate::{ErrorCategory, EvalErrorKind, EvalMode};

#[test]
fn recursive_factorial() {
    let interner = StringInterner::new();
    let b = AstBuilder::new(&interner);
    b.function(
        "fact",
        &[("n", Some("int"))],
        Some("int"),
        vec![
            b.if_stmt(
                b.binary(BinaryOp::LtEq, b.var("n"), b.int(1)),
                vec![b.ret(b.int(1))],
                None,
            ),
            b.ret(b.binary(
                BinaryOp::Mul,
                b.var("n"),
                b.call("fact", &[b.binary(BinaryOp::Sub, b.var("n"), b.int(1))]),
            )),
        ],
    );
    b.main(vec![b.print(&[b.call("fact", &[b.int(10)])])]);
    assert_eq!(run(&interner, b).ok(), "3628800\n");
}

#[test]
fn mutual_recursion() {
    let interner = StringInterner::new();
    let b = AstBuilder::new(&interner);
    let minus_one = || b.binary(BinaryOp::Sub, b.var("n"), b.int(1));
    b.function(
        "is_even",
        &[("n", None)],
        Some("bool"),
        vec![
            b.if_stmt(b.binary(BinaryOp::Eq, b.var("n"), b.int(0)), vec![b.ret(b.bool(true))], None),
            b.ret(b.call("is_odd", &[minus_one()])),
        ],
    );
    b.function(
        "is_odd",
        &[("n", None)],
        Some("bool"),
        vec![
            b.if_stmt(b.binary(BinaryOp::Eq, b.var("n"), b.int(0)), vec![b.ret(b.bool(false))], None),
            b.ret(b.call("is_even", &[minus_one()])),
        ],
    );
    b.main(vec![b.print(&[
        b.call("is_even", &[b.int(10)]),
        b.str(" "),
        b.call("is_odd", &[b.int(7)]),
    ])]);
    assert_eq!(run(&interner, b).ok(), "true true\n");
}

#[test]
fn overloads_resolve_by_arity() {
    let interner = StringInterner::new();
    let b = AstBuilder::new(&interner);
    b.function("greet", &[], None, vec![b.print(&[b.str("hello")])]);
    b.function(
        "greet",
        &[("who", Some("string"))],
        None,
        vec![b.print(&[b.str("hello "), b.var("who")])],
    );
    b.main(vec![
        b.call_stmt("greet", &[]),
        b.call_stmt("greet", &[b.str("bob")]),
    ]);
    assert_eq!(run(&interner, b).ok(), "hello\nhello bob\n");
}

#[test]
fn functions_do_not_see_caller_locals() {
    let interner = StringInterner::new();
    let b = AstBuilder::new(&interner);
    b.function("peek", &[], None, vec![b.print(&[b.var("secret")])]);
    b.main(vec![
        b.var_def("secret", None),
        b.assign("secret", b.int(1)),
        b.call_stmt("peek", &[]),
    ]);
    let out = run(&interner, b);
    assert_eq!(
        out.kind(),
        &EvalErrorKind::UndefinedVariable {
            name: "secret".into()
        }
    );
}

#[test]
fn strings_and_integer_division() {
    let interner = StringInterner::new();
    let b = AstBuilder::new(&interner);
    b.main(vec![
        b.print(&[b.binary(BinaryOp::Add, b.str("ab"), b.str("cd"))]),
        b.print(&[b.binary(BinaryOp::Div, b.neg(b.int(7)), b.int(2))]),
        b.print(&[b.binary(BinaryOp::Eq, b.str("x"), b.int(1))]),
        b.print(&[b.not(b.int(0))]),
    ]);
    assert_eq!(run(&interner, b).ok(), "abcd\n-4\nfalse\ntrue\n");
}

#[test]
fn input_builtins_read_scripted_lines() {
    let interner = StringInterner::new();
    let b = AstBuilder::new(&interner);
    b.main(vec![
        b.var_def("n", None),
        b.var_def("s", None),
        b.assign("n", b.call("inputi", &[b.str("number?")])),
        b.assign("s", b.call("inputs", &[])),
        b.print(&[b.binary(BinaryOp::Add, b.var("n"), b.int(1)), b.var("s")]),
    ]);
    let out = run_with_input(&interner, b, &[" 41 ", "bob"]);
    assert_eq!(out.ok(), "number?\n42bob\n");
}

#[test]
fn input_is_read_when_forced() {
    let interner = StringInterner::new();
    let b = AstBuilder::new(&interner);
    b.main(vec![
        b.var_def("first", None),
        b.var_def("second", None),
        b.assign("first", b.call("inputs", &[])),
        b.assign("second", b.call("inputs", &[])),
        b.print(&[b.var("second"), b.var("first")]),
    ]);
    let out = run_with_input(&interner, b, &["a", "b"]);
    assert_eq!(out.ok(), "ab\n");
}

#[test]
fn inputi_rejects_non_integer() {
    let interner = StringInterner::new();
    let b = AstBuilder::new(&interner);
    b.main(vec![b.print(&[b.call("inputi", &[])])]);
    let out = run_with_input(&interner, b, &["twelve"]);
    assert_eq!(
        out.kind(),
        &EvalErrorKind::InvalidIntegerInput {
            input: "twelve".into()
        }
    );
    assert_eq!(out.category(), ErrorCategory::Type);
}

#[test]
fn input_with_two_args_is_name_error() {
    let interner = StringInterner::new();
    let b = AstBuilder::new(&interner);
    b.main(vec![b.call_stmt("inputs", &[b.str("a"), b.str("b")])]);
    let out = run_with_input(&interner, b, &["x"]);
    assert_eq!(out.category(), ErrorCategory::Name);
    assert!(matches!(out.kind(), EvalErrorKind::TooManyInputArgs { got: 2, .. }));
}

#[test]
fn exhausted_input_is_fault() {
    let interner = StringInterner::new();
    let b = AstBuilder::new(&interner);
    b.main(vec![b.call_stmt("inputs", &[])]);
    let out = run(&interner, b);
    assert_eq!(out.kind(), &EvalErrorKind::InputExhausted);
}

#[test]
fn print_concatenates_without_separator() {
    let interner = StringInterner::new();
    let b = AstBuilder::new(&interner);
    b.main(vec![
        b.print(&[b.int(1), b.bool(true), b.str("s")]),
        b.print(&[]),
    ]);
    assert_eq!(run(&interner, b).ok(), "1trues\n\n");
}

#[test]
fn deep_recursion_hits_depth_limit() {
    let interner = StringInterner::new();
    let b = AstBuilder::new(&interner);
    b.function(
        "down",
        &[("n", Some("int"))],
        None,
        vec![b.call_stmt("down", &[b.binary(BinaryOp::Add, b.var("n"), b.int(1))])],
    );
    b.main(vec![b.call_stmt("down", &[b.int(0)])]);
    let out = run(&interner, b);
    assert_eq!(
        out.kind(),
        &EvalErrorKind::StackOverflow {
            depth: EvalMode::TestRun.max_recursion_depth()
        }
    );
    assert_eq!(out.category(), ErrorCategory::Fault);
    let frames = out.err().backtrace.as_ref().map_or(0, |bt| bt.len());
    assert_eq!(frames, EvalMode::TestRun.max_recursion_depth());
}

#[test]
fn lazy_tail_recursion_hits_force_limit() {
    let interner = StringInterner::new();
    let b = AstBuilder::new(&interner);
    b.function(
        "spin",
        &[("n", None)],
        None,
        vec![b.ret(b.call("spin", &[b.binary(BinaryOp::Add, b.var("n"), b.int(1))]))],
    );
    b.main(vec![b.print(&[b.call("spin", &[b.int(0)])])]);
    let out = run(&interner, b);
    assert_eq!(
        out.kind(),
        &EvalErrorKind::StackOverflow {
            depth: EvalMode::TestRun.max_force_depth()
        }
    );
}

#[test]
fn recursion_within_limit_succeeds() {
    let interner = StringInterner::new();
    let b = AstBuilder::new(&interner);
    b.function(
        "count",
        &[("n", Some("int"))],
        Some("int"),
        vec![
            b.if_stmt(
                b.binary(BinaryOp::Eq, b.var("n"), b.int(0)),
                vec![b.ret(b.int(0))],
                None,
            ),
            b.ret(b.binary(
                BinaryOp::Add,
                b.int(1),
                b.call("count", &[b.binary(BinaryOp::Sub, b.var("n"), b.int(1))]),
            )),
        ],
    );
    b.main(vec![b.print(&[b.call("count", &[b.int(1000)])])]);
    assert_eq!(run(&interner, b).ok(), "1000\n");
}

fn accumulate(interner: &StringInterner, iterations: usize) -> super::Outcome {
    let b = AstBuilder::new(interner);
    let limit = i64::try_from(iterations).unwrap_or(i64::MAX);
    b.main(vec![
        b.var_def("i", None),
        b.var_def("sum", None),
        b.assign("sum", b.int(0)),
        b.for_stmt(
            b.assign("i", b.int(0)),
            b.binary(BinaryOp::Lt, b.var("i"), b.int(limit)),
            b.assign("i", b.binary(BinaryOp::Add, b.var("i"), b.int(1))),
            vec![b.assign("sum", b.binary(BinaryOp::Add, b.var("sum"), b.int(1)))],
        ),
        b.print(&[b.var("sum")]),
    ]);
    run(interner, b)
}

#[test]
fn accumulator_chain_under_force_limit() {
    let interner = StringInterner::new();
    let iterations = EvalMode::TestRun.max_force_depth() - 100;
    assert_eq!(accumulate(&interner, iterations).ok(), format!("{iterations}\n"));
}

#[test]
fn accumulator_chain_past_force_limit_is_error() {
    let interner = StringInterner::new();
    let out = accumulate(&interner, EvalMode::TestRun.max_force_depth() * 2);
    assert_eq!(out.output, "");
    assert_eq!(
        out.kind(),
        &EvalErrorKind::StackOverflow {
            depth: EvalMode::TestRun.max_force_depth()
        }
    );
}
