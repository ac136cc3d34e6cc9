//! Operator semantics.
//!
//! Direct enum dispatch keyed by the left operand's type, then the
//! operator. Operands must already be forced. Equality never fails on a
//! type mismatch; every other mismatch is a type error. Division by zero
//! is not an error: it raises `"div0"` in the language.

use ferment_ir::{BinaryOp, StringInterner, UnaryOp};

use crate::errors::{
    binary_type_mismatch, integer_overflow, invalid_operator, ControlAction, EvalError, EvalResult,
};
use crate::value::{StructRef, Value};

/// Payload raised on integer division by zero.
pub const DIV_ZERO_TAG: &str = "div0";

/// Evaluate a binary operation on two forced operands.
///
/// `&&` and `||` are accepted here with both operands already evaluated;
/// the interpreter short-circuits before calling in.
#[allow(clippy::needless_pass_by_value)]
pub fn evaluate_binary(
    left: Value,
    right: Value,
    op: BinaryOp,
    interner: &StringInterner,
) -> EvalResult {
    if op.is_equality() {
        let equal = values_equal(&left, &right);
        return Ok(Value::Bool(if op == BinaryOp::Eq { equal } else { !equal }));
    }
    if op.is_short_circuit() {
        logical_operand(&left, op, interner)?;
        let result = logical_operand(&right, op, interner)?;
        return Ok(Value::Bool(result));
    }

    match (&left, &right) {
        (Value::Int(a), Value::Int(b)) => eval_int_binary(*a, *b, op),
        (Value::Str(a), Value::Str(b)) if op == BinaryOp::Add => {
            let mut joined = String::with_capacity(a.len() + b.len());
            joined.push_str(a);
            joined.push_str(b);
            Ok(Value::string(&joined))
        }
        (Value::Int(_), _) | (Value::Str(_), _) if supported_by(&left, op) => Err(
            binary_type_mismatch(
                op.as_symbol(),
                &left.type_name(interner),
                &right.type_name(interner),
            )
            .into(),
        ),
        _ => Err(invalid_operator(op.as_symbol(), &left.type_name(interner)).into()),
    }
}

/// Whether `op` is defined for the left operand's type at all.
fn supported_by(left: &Value, op: BinaryOp) -> bool {
    match left {
        Value::Int(_) => !op.is_short_circuit(),
        Value::Str(_) => matches!(op, BinaryOp::Add),
        _ => false,
    }
}

fn eval_int_binary(a: i64, b: i64, op: BinaryOp) -> EvalResult {
    let checked = |result: Option<i64>| {
        result
            .map(Value::Int)
            .ok_or_else(|| ControlAction::from(integer_overflow(op.as_symbol())))
    };
    match op {
        BinaryOp::Add => checked(a.checked_add(b)),
        BinaryOp::Sub => checked(a.checked_sub(b)),
        BinaryOp::Mul => checked(a.checked_mul(b)),
        BinaryOp::Div => {
            if b == 0 {
                Err(ControlAction::Raise(Value::string(DIV_ZERO_TAG)))
            } else {
                checked(floor_div(a, b))
            }
        }
        BinaryOp::Lt => Ok(Value::Bool(a < b)),
        BinaryOp::LtEq => Ok(Value::Bool(a <= b)),
        BinaryOp::Gt => Ok(Value::Bool(a > b)),
        BinaryOp::GtEq => Ok(Value::Bool(a >= b)),
        BinaryOp::Eq => Ok(Value::Bool(a == b)),
        BinaryOp::NotEq => Ok(Value::Bool(a != b)),
        BinaryOp::And | BinaryOp::Or => Err(invalid_operator(op.as_symbol(), "int").into()),
    }
}

/// Integer division rounding toward negative infinity.
///
/// `None` on overflow (`i64::MIN / -1`); `b` must be nonzero.
pub fn floor_div(a: i64, b: i64) -> Option<i64> {
    let q = a.checked_div(b)?;
    if a % b != 0 && ((a < 0) != (b < 0)) {
        q.checked_sub(1)
    } else {
        Some(q)
    }
}

/// The language's `==`.
///
/// Same-type primitives compare by value; an int compared with a bool is
/// coerced to bool first; struct references (and nil) compare by
/// identity; any other pairing is unequal.
pub fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => a == b,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Int(n), Value::Bool(b)) | (Value::Bool(b), Value::Int(n)) => (*n != 0) == *b,
        (Value::Str(a), Value::Str(b)) => a == b,
        (Value::Nil, Value::Nil) => true,
        (Value::Nil, Value::Struct(r)) | (Value::Struct(r), Value::Nil) => r.is_nil(),
        (Value::Struct(a), Value::Struct(b)) => StructRef::same_ref(a, b),
        _ => false,
    }
}

/// Coerce an operand of `&&`, `||` or `!` to bool.
pub fn logical_operand(
    value: &Value,
    op: BinaryOp,
    interner: &StringInterner,
) -> Result<bool, EvalError> {
    value
        .coerce_bool()
        .ok_or_else(|| invalid_operator(op.as_symbol(), &value.type_name(interner)))
}

/// Evaluate a unary operation on a forced operand.
pub fn evaluate_unary(value: &Value, op: UnaryOp, interner: &StringInterner) -> EvalResult {
    match (value, op) {
        (Value::Int(n), UnaryOp::Neg) => n
            .checked_neg()
            .map(Value::Int)
            .ok_or_else(|| integer_overflow("negation").into()),
        (Value::Bool(_) | Value::Int(_), UnaryOp::Not) => {
            Ok(Value::Bool(!value.coerce_bool().unwrap_or_default()))
        }
        _ => Err(invalid_operator(op.as_symbol(), &value.type_name(interner)).into()),
    }
}
