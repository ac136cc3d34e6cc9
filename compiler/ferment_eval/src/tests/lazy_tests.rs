//! Call-by-need semantics: deferral, snapshots, memoization.

use ferment_ir::{AstBuilder, BinaryOp, StringInterner};
use pretty_assertions::assert_eq;

use super::run;
use crate::EvalErrorKind;

/// `func noisy() { print("noisy"); return 1; }`
fn define_noisy(b: &AstBuilder<'_>) {
    b.function(
        "noisy",
        &[],
        None,
        vec![b.print(&[b.str("noisy")]), b.ret(b.int(1))],
    );
}

#[test]
fn forced_once_however_often_read() {
    let interner = StringInterner::new();
    let b = AstBuilder::new(&interner);
    define_noisy(&b);
    b.main(vec![
        b.var_def("x", None),
        b.assign("x", b.binary(BinaryOp::Add, b.call("noisy", &[]), b.int(1))),
        b.print(&[b.var("x")]),
        b.print(&[b.var("x")]),
        b.print(&[b.binary(BinaryOp::Mul, b.var("x"), b.var("x"))]),
    ]);
    assert_eq!(run(&interner, b).ok(), "noisy\n2\n2\n4\n");
}

#[test]
fn unread_binding_never_evaluated() {
    let interner = StringInterner::new();
    let b = AstBuilder::new(&interner);
    define_noisy(&b);
    b.main(vec![
        b.var_def("x", None),
        b.assign("x", b.call("noisy", &[])),
        b.print(&[b.str("done")]),
    ]);
    assert_eq!(run(&interner, b).ok(), "done\n");
}

#[test]
fn copies_share_one_evaluation() {
    let interner = StringInterner::new();
    let b = AstBuilder::new(&interner);
    define_noisy(&b);
    b.main(vec![
        b.var_def("x", None),
        b.var_def("y", None),
        b.assign("x", b.call("noisy", &[])),
        b.assign("y", b.var("x")),
        b.print(&[b.var("y")]),
        b.print(&[b.var("x")]),
    ]);
    assert_eq!(run(&interner, b).ok(), "noisy\n1\n1\n");
}

#[test]
fn thunk_sees_bindings_at_assignment_time() {
    let interner = StringInterner::new();
    let b = AstBuilder::new(&interner);
    b.main(vec![
        b.var_def("a", None),
        b.var_def("x", None),
        b.assign("a", b.int(1)),
        b.assign("x", b.binary(BinaryOp::Add, b.var("a"), b.int(1))),
        b.assign("a", b.int(10)),
        b.print(&[b.var("x"), b.str(" "), b.var("a")]),
    ]);
    assert_eq!(run(&interner, b).ok(), "2 10\n");
}

#[test]
fn self_reference_uses_previous_value() {
    let interner = StringInterner::new();
    let b = AstBuilder::new(&interner);
    b.main(vec![
        b.var_def("n", None),
        b.assign("n", b.int(1)),
        b.assign("n", b.binary(BinaryOp::Add, b.var("n"), b.int(1))),
        b.assign("n", b.binary(BinaryOp::Mul, b.var("n"), b.int(5))),
        b.print(&[b.var("n")]),
    ]);
    assert_eq!(run(&interner, b).ok(), "10\n");
}

#[test]
fn unread_argument_never_evaluated() {
    let interner = StringInterner::new();
    let b = AstBuilder::new(&interner);
    define_noisy(&b);
    b.function("ignore", &[("a", None)], None, vec![b.print(&[b.str("in")])]);
    b.main(vec![b.call_stmt("ignore", &[b.call("noisy", &[])])]);
    assert_eq!(run(&interner, b).ok(), "in\n");
}

#[test]
fn argument_uses_caller_bindings() {
    let interner = StringInterner::new();
    let b = AstBuilder::new(&interner);
    b.function(
        "show",
        &[("a", None)],
        None,
        vec![
            b.var_def("b", None),
            b.assign("b", b.int(5)),
            b.print(&[b.var("a")]),
        ],
    );
    b.main(vec![
        b.var_def("b", None),
        b.assign("b", b.int(1)),
        b.call_stmt("show", &[b.binary(BinaryOp::Add, b.var("b"), b.int(1))]),
    ]);
    assert_eq!(run(&interner, b).ok(), "2\n");
}

#[test]
fn returned_expression_uses_callee_bindings() {
    let interner = StringInterner::new();
    let b = AstBuilder::new(&interner);
    b.function(
        "make",
        &[],
        None,
        vec![
            b.var_def("n", None),
            b.assign("n", b.int(4)),
            b.ret(b.binary(BinaryOp::Mul, b.var("n"), b.int(2))),
        ],
    );
    b.main(vec![
        b.var_def("n", None),
        b.assign("n", b.int(100)),
        b.print(&[b.call("make", &[])]),
    ]);
    assert_eq!(run(&interner, b).ok(), "8\n");
}

#[test]
fn discarded_call_result_not_forced() {
    let interner = StringInterner::new();
    let b = AstBuilder::new(&interner);
    define_noisy(&b);
    b.function("wrap", &[], None, vec![b.ret(b.call("noisy", &[]))]);
    b.main(vec![b.call_stmt("wrap", &[]), b.print(&[b.str("end")])]);
    assert_eq!(run(&interner, b).ok(), "end\n");
}

#[test]
fn unbound_capture_is_error_only_when_read() {
    let interner = StringInterner::new();
    let b = AstBuilder::new(&interner);
    b.main(vec![
        b.var_def("x", None),
        b.assign("x", b.binary(BinaryOp::Add, b.var("missing"), b.int(1))),
        b.print(&[b.str("before")]),
        b.print(&[b.var("x")]),
    ]);
    let out = run(&interner, b);
    assert_eq!(out.output, "before\n");
    assert_eq!(
        out.kind(),
        &EvalErrorKind::UndefinedVariable {
            name: "missing".into()
        }
    );
}

#[test]
fn later_declaration_does_not_bind_capture() {
    let interner = StringInterner::new();
    let b = AstBuilder::new(&interner);
    b.main(vec![
        b.var_def("x", None),
        b.assign("x", b.var("late")),
        b.var_def("late", None),
        b.assign("late", b.int(3)),
        b.print(&[b.var("x")]),
    ]);
    let out = run(&interner, b);
    assert!(matches!(out.kind(), EvalErrorKind::UndefinedVariable { .. }));
}

#[test]
fn raise_while_forcing_leaves_binding_unforced() {
    let interner = StringInterner::new();
    let b = AstBuilder::new(&interner);
    b.function(
        "boom",
        &[],
        None,
        vec![b.print(&[b.str("boom")]), b.raise(b.str("bad"))],
    );
    b.main(vec![
        b.var_def("x", None),
        b.assign("x", b.call("boom", &[])),
        b.try_stmt(
            vec![b.print(&[b.var("x")])],
            vec![b.catch("bad", vec![b.print(&[b.str("first")])])],
        ),
        b.try_stmt(
            vec![b.print(&[b.var("x")])],
            vec![b.catch("bad", vec![b.print(&[b.str("second")])])],
        ),
    ]);
    assert_eq!(run(&interner, b).ok(), "boom\nfirst\nboom\nsecond\n");
}

#[test]
fn declared_type_checked_when_forced() {
    let interner = StringInterner::new();
    let b = AstBuilder::new(&interner);
    b.main(vec![
        b.var_def("s", Some("string")),
        b.var_def("x", Some("int")),
        b.assign("s", b.str("text")),
        b.assign("x", b.var("s")),
        b.print(&[b.str("assigned")]),
        b.print(&[b.var("x")]),
    ]);
    let out = run(&interner, b);
    assert_eq!(out.output, "assigned\n");
    assert!(matches!(out.kind(), EvalErrorKind::TypeMismatch { .. }));
}

#[test]
fn literal_conformed_at_assignment() {
    let interner = StringInterner::new();
    let b = AstBuilder::new(&interner);
    b.main(vec![
        b.var_def("flag", Some("bool")),
        b.assign("flag", b.int(5)),
        b.print(&[b.var("flag")]),
        b.var_def("n", Some("int")),
        b.assign("n", b.str("no")),
        b.print(&[b.str("unreachable")]),
    ]);
    let out = run(&interner, b);
    assert_eq!(out.output, "true\n");
    assert!(matches!(out.kind(), EvalErrorKind::TypeMismatch { .. }));
}

#[test]
fn parameter_type_conforms_argument() {
    let interner = StringInterner::new();
    let b = AstBuilder::new(&interner);
    b.function(
        "check",
        &[("flag", Some("bool"))],
        None,
        vec![b.if_stmt(
            b.var("flag"),
            vec![b.print(&[b.str("yes")])],
            Some(vec![b.print(&[b.str("no")])]),
        )],
    );
    b.main(vec![
        b.var_def("n", None),
        b.assign("n", b.int(0)),
        b.call_stmt("check", &[b.binary(BinaryOp::Add, b.var("n"), b.int(2))]),
        b.call_stmt("check", &[b.var("n")]),
    ]);
    assert_eq!(run(&interner, b).ok(), "yes\nno\n");
}
