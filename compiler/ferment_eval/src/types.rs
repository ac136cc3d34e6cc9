//! Runtime types: defaults and conformance.
//!
//! Annotations are optional. Where one is present, a value is conformed to
//! it at the point it becomes concrete (thunk forcing, field store, return),
//! which applies the two implicit conversions: `int` to `bool` and `nil` to
//! a nil reference of the annotated struct type.

use ferment_ir::{Name, StringInterner};

use crate::errors::{type_mismatch, EvalError};
use crate::value::{StructRef, Value};

/// A resolved type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Type {
    Int,
    Bool,
    Str,
    Nil,
    Void,
    Struct(Name),
}

impl Type {
    /// The value a binding of this type starts with.
    pub fn default_value(self) -> Value {
        match self {
            Type::Int => Value::Int(0),
            Type::Bool => Value::Bool(false),
            Type::Str => Value::string(""),
            Type::Nil | Type::Void => Value::Nil,
            Type::Struct(name) => Value::Struct(StructRef::nil(name)),
        }
    }

    /// Runtime type of a concrete value; `None` for an unforced thunk.
    pub fn of(value: &Value) -> Option<Type> {
        match value {
            Value::Int(_) => Some(Type::Int),
            Value::Bool(_) => Some(Type::Bool),
            Value::Str(_) => Some(Type::Str),
            Value::Nil => Some(Type::Nil),
            Value::Struct(r) => Some(Type::Struct(r.type_name())),
            Value::Thunk(_) => None,
        }
    }

    pub fn name(self, interner: &StringInterner) -> &'static str {
        match self {
            Type::Int => "int",
            Type::Bool => "bool",
            Type::Str => "string",
            Type::Nil => "nil",
            Type::Void => "void",
            Type::Struct(name) => interner.lookup(name),
        }
    }

    /// Check `value` against this type, applying implicit conversions.
    ///
    /// `value` must already be forced.
    pub fn conform(self, value: Value, interner: &StringInterner) -> Result<Value, EvalError> {
        match (self, value) {
            (Type::Int, v @ Value::Int(_))
            | (Type::Bool, v @ Value::Bool(_))
            | (Type::Str, v @ Value::Str(_))
            | (Type::Nil | Type::Void, v @ Value::Nil) => Ok(v),
            (Type::Bool, Value::Int(n)) => Ok(Value::Bool(n != 0)),
            (Type::Struct(name), Value::Nil) => Ok(Value::Struct(StructRef::nil(name))),
            (Type::Struct(name), Value::Struct(r)) if r.type_name() == name => {
                Ok(Value::Struct(r))
            }
            (ty, other) => Err(type_mismatch(
                ty.name(interner),
                &other.type_name(interner),
            )),
        }
    }
}
