//! Deferred evaluation.
//!
//! Assignment right-hand sides, call arguments and returned expressions
//! become thunks that snapshot the bindings of every variable they mention.
//! Literals skip the thunk and are stored already conformed.

use ferment_ir::{ExprId, ExprKind, Name};
use ferment_stack::ensure_sufficient_stack;

use super::Interpreter;
use crate::errors::{
    cyclic_lazy_binding, internal_error, recursion_limit_exceeded, undefined_variable, EvalError,
    EvalResult,
};
use crate::types::Type;
use crate::value::{Captures, Deferred, ForceStart, Thunk, Value};

/// Where identifiers in an expression resolve.
pub(crate) enum Bindings<'c> {
    /// The current environment frame.
    Live,
    /// The snapshot of a thunk being forced.
    Captured(&'c mut Captures),
}

impl Interpreter<'_> {
    /// Value to bind for `expr`: a thunk, or the conformed literal.
    pub(crate) fn defer(
        &mut self,
        expr: ExprId,
        expected: Option<Type>,
        bindings: &mut Bindings<'_>,
    ) -> EvalResult {
        if self.arena.kind(expr).is_literal() {
            let value = self.eval_expr(expr, bindings)?;
            return Ok(self.conform(value, expected)?);
        }

        let mut captured = Captures::default();
        self.capture_free_variables(expr, bindings, &mut captured)?;
        tracing::trace!(expr = expr.raw(), captured = captured.len(), "deferred");
        Ok(Value::Thunk(Thunk::new(Deferred {
            expr,
            captured,
            expected,
        })))
    }

    fn capture_free_variables(
        &self,
        expr: ExprId,
        bindings: &Bindings<'_>,
        out: &mut Captures,
    ) -> Result<(), EvalError> {
        ensure_sufficient_stack(|| self.capture_expr(expr, bindings, out))
    }

    fn capture_expr(
        &self,
        expr: ExprId,
        bindings: &Bindings<'_>,
        out: &mut Captures,
    ) -> Result<(), EvalError> {
        match self.arena.kind(expr) {
            ExprKind::Int(_)
            | ExprKind::Bool(_)
            | ExprKind::Str(_)
            | ExprKind::Nil
            | ExprKind::New { .. } => Ok(()),
            ExprKind::Ident(name) => {
                if !out.contains_key(&name) {
                    let slot = self.snapshot(name, bindings)?;
                    out.insert(name, slot);
                }
                Ok(())
            }
            ExprKind::Field { receiver, .. } => self.capture_free_variables(receiver, bindings, out),
            ExprKind::Unary { operand, .. } => self.capture_free_variables(operand, bindings, out),
            ExprKind::Binary { left, right, .. } => {
                self.capture_free_variables(left, bindings, out)?;
                self.capture_free_variables(right, bindings, out)
            }
            ExprKind::Call { args, .. } => {
                for &arg in self.arena.get_expr_list(args) {
                    self.capture_free_variables(arg, bindings, out)?;
                }
                Ok(())
            }
        }
    }

    fn snapshot(&self, name: Name, bindings: &Bindings<'_>) -> Result<Option<Value>, EvalError> {
        match bindings {
            Bindings::Live => Ok(self.env.lookup(name)),
            Bindings::Captured(captured) => captured.get(&name).cloned().ok_or_else(|| {
                internal_error(format!(
                    "`{}` missing from deferred bindings",
                    self.interner.lookup(name)
                ))
            }),
        }
    }

    /// Force `thunk`, memoizing the result in the shared cell.
    pub(crate) fn force(&mut self, thunk: &Thunk) -> EvalResult {
        match thunk.begin_force() {
            ForceStart::Done(value) => Ok(value),
            ForceStart::Cycle => Err(cyclic_lazy_binding().into()),
            ForceStart::Evaluate(mut deferred) => {
                if self.force_depth >= self.max_force_depth {
                    thunk.abandon(deferred);
                    return Err(recursion_limit_exceeded(self.max_force_depth).into());
                }
                tracing::trace!(expr = deferred.expr.raw(), depth = self.force_depth, "forcing");
                self.force_depth += 1;
                let result = ensure_sufficient_stack(|| self.eval_deferred(&mut deferred));
                self.force_depth -= 1;
                match result {
                    Ok(value) => {
                        thunk.complete(value.clone());
                        Ok(value)
                    }
                    Err(action) => {
                        thunk.abandon(deferred);
                        Err(action)
                    }
                }
            }
        }
    }

    fn eval_deferred(&mut self, deferred: &mut Deferred) -> EvalResult {
        let expr = deferred.expr;
        let expected = deferred.expected;
        let value = self.eval_expr(expr, &mut Bindings::Captured(&mut deferred.captured))?;
        Ok(self.conform(value, expected)?)
    }

    /// `value` with any thunk forced.
    pub(crate) fn force_value(&mut self, value: Value) -> EvalResult {
        match value {
            Value::Thunk(thunk) => self.force(&thunk),
            value => Ok(value),
        }
    }

    /// Read a variable, forcing and memoizing a thunk-held binding.
    pub(crate) fn read_variable(&mut self, name: Name, bindings: &mut Bindings<'_>) -> EvalResult {
        match bindings {
            Bindings::Live => {
                let value = self
                    .env
                    .lookup(name)
                    .ok_or_else(|| undefined_variable(self.interner.lookup(name)))?;
                let Value::Thunk(thunk) = value else {
                    return Ok(value);
                };
                let forced = self.force(&thunk)?;
                self.env.memoize(name, &thunk, forced.clone());
                Ok(forced)
            }
            Bindings::Captured(captured) => {
                let value = captured
                    .get(&name)
                    .cloned()
                    .ok_or_else(|| {
                        internal_error(format!(
                            "`{}` missing from deferred bindings",
                            self.interner.lookup(name)
                        ))
                    })?
                    .ok_or_else(|| undefined_variable(self.interner.lookup(name)))?;
                let Value::Thunk(thunk) = value else {
                    return Ok(value);
                };
                let forced = self.force(&thunk)?;
                captured.insert(name, Some(forced.clone()));
                Ok(forced)
            }
        }
    }

    pub(crate) fn conform(&self, value: Value, expected: Option<Type>) -> Result<Value, EvalError> {
        match expected {
            Some(ty) => ty.conform(value, self.interner),
            None => Ok(value),
        }
    }
}
