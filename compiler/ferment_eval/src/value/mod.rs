//! Runtime values.

mod composite;
mod thunk;

use std::rc::Rc;

use ferment_ir::StringInterner;

use crate::errors::{not_printable, EvalError};

pub use composite::{StructHandle, StructInstance, StructRef};
pub use thunk::{Captures, Deferred, ForceStart, Thunk};

/// A runtime value.
///
/// Every value except `Thunk` is concrete. Expression evaluation only ever
/// yields concrete values; thunks live in variable slots, captured
/// bindings and function results until something forces them.
#[derive(Clone, Debug)]
pub enum Value {
    Int(i64),
    Bool(bool),
    Str(Rc<str>),
    /// Bare `nil`, also the result of `void` functions.
    Nil,
    Struct(StructRef),
    Thunk(Thunk),
}

impl Value {
    #[inline]
    pub fn string(s: &str) -> Self {
        Value::Str(Rc::from(s))
    }

    /// Truth value under the implicit `int` to `bool` coercion.
    pub fn coerce_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            Value::Int(n) => Some(*n != 0),
            _ => None,
        }
    }

    pub fn type_name(&self, interner: &StringInterner) -> String {
        match self {
            Value::Int(_) => "int".to_string(),
            Value::Bool(_) => "bool".to_string(),
            Value::Str(_) => "string".to_string(),
            Value::Nil => "nil".to_string(),
            Value::Struct(r) => interner.lookup(r.type_name()).to_string(),
            Value::Thunk(_) => "thunk".to_string(),
        }
    }

    /// Text written by `print`.
    ///
    /// Only primitives and nil struct references have a printed form.
    pub fn printable(&self, interner: &StringInterner) -> Result<String, EvalError> {
        match self {
            Value::Int(n) => Ok(n.to_string()),
            Value::Bool(b) => Ok(b.to_string()),
            Value::Str(s) => Ok(s.to_string()),
            Value::Struct(r) if r.is_nil() => Ok("nil".to_string()),
            Value::Nil | Value::Struct(_) | Value::Thunk(_) => {
                Err(not_printable(&self.type_name(interner)))
            }
        }
    }
}

/// Structural equality for primitives, identity for structs and thunks.
///
/// This is host-side equality (tests, memo checks). The language's `==`
/// lives in `operators` and adds coercion and cross-type rules.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Nil, Value::Nil) => true,
            (Value::Struct(a), Value::Struct(b)) => a.same_ref(b),
            (Value::Thunk(a), Value::Thunk(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}
