//! Expression evaluation.

use ferment_ir::{BinaryOp, ExprId, ExprKind, Name};
use ferment_stack::ensure_sufficient_stack;

use super::{Bindings, Interpreter};
use crate::errors::{
    internal_error, nil_dereference, not_a_struct, undefined_field, undefined_struct, EvalError,
    EvalResult,
};
use crate::operators::{evaluate_binary, evaluate_unary, logical_operand};
use crate::types::Type;
use crate::value::{StructHandle, Value};

impl Interpreter<'_> {
    /// Evaluate an expression to a forced value.
    pub(crate) fn eval_expr(&mut self, id: ExprId, bindings: &mut Bindings<'_>) -> EvalResult {
        ensure_sufficient_stack(|| self.eval_expr_inner(id, bindings))
            .map_err(|action| action.with_span(self.arena.span(id)))
    }

    fn eval_expr_inner(&mut self, id: ExprId, bindings: &mut Bindings<'_>) -> EvalResult {
        match self.arena.kind(id) {
            ExprKind::Int(n) => Ok(Value::Int(n)),
            ExprKind::Bool(b) => Ok(Value::Bool(b)),
            ExprKind::Str(s) => Ok(Value::string(self.interner.lookup(s))),
            ExprKind::Nil => Ok(Value::Nil),
            ExprKind::Ident(name) => self.read_variable(name, bindings),
            ExprKind::Field { receiver, field } => {
                let receiver = self.eval_expr(receiver, bindings)?;
                Ok(self.read_field(&receiver, field)?)
            }
            ExprKind::Unary { op, operand } => {
                let operand = self.eval_expr(operand, bindings)?;
                evaluate_unary(&operand, op, self.interner)
            }
            ExprKind::Binary { op, left, right } => self.eval_binary(op, left, right, bindings),
            ExprKind::Call { func, args } => {
                let result = self.eval_call(func, args, bindings, self.arena.span(id))?;
                self.force_value(result)
            }
            ExprKind::New { type_name } => Ok(self.instantiate(type_name)?),
        }
    }

    fn eval_binary(
        &mut self,
        op: BinaryOp,
        left: ExprId,
        right: ExprId,
        bindings: &mut Bindings<'_>,
    ) -> EvalResult {
        let left = self.eval_expr(left, bindings)?;
        if op.is_short_circuit() {
            let lhs = logical_operand(&left, op, self.interner)?;
            match (op, lhs) {
                (BinaryOp::And, false) | (BinaryOp::Or, true) => return Ok(Value::Bool(lhs)),
                _ => {}
            }
            let right = self.eval_expr(right, bindings)?;
            return Ok(Value::Bool(logical_operand(&right, op, self.interner)?));
        }
        let right = self.eval_expr(right, bindings)?;
        evaluate_binary(left, right, op, self.interner)
    }

    pub(crate) fn read_field(&self, receiver: &Value, field: Name) -> Result<Value, EvalError> {
        let (handle, index, _) = self.resolve_field(receiver, field)?;
        handle.get(index).ok_or_else(|| {
            internal_error(format!("field slot {index} out of range"))
        })
    }

    /// Instance handle, slot index and declared type of `receiver.field`.
    pub(crate) fn resolve_field(
        &self,
        receiver: &Value,
        field: Name,
    ) -> Result<(StructHandle, usize, Type), EvalError> {
        let field_name = self.interner.lookup(field);
        let instance = match receiver {
            Value::Nil => return Err(nil_dereference(field_name)),
            Value::Struct(instance) => instance,
            other => return Err(not_a_struct(field_name, &other.type_name(self.interner))),
        };
        let Some(handle) = instance.handle() else {
            return Err(nil_dereference(field_name));
        };
        let type_name = self.interner.lookup(instance.type_name());
        let layout = self
            .structs
            .get(instance.type_name())
            .ok_or_else(|| undefined_struct(type_name))?;
        let (index, ty) = layout
            .field(field)
            .ok_or_else(|| undefined_field(type_name, field_name))?;
        Ok((handle.clone(), index, ty))
    }

    fn instantiate(&self, type_name: Name) -> Result<Value, EvalError> {
        let layout = self
            .structs
            .get(type_name)
            .ok_or_else(|| undefined_struct(self.interner.lookup(type_name)))?;
        tracing::trace!(ty = self.interner.lookup(type_name), "new");
        Ok(Value::Struct(layout.instantiate()))
    }
}
