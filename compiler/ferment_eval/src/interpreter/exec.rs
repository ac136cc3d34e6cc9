//! Statement execution.

use ferment_ir::{AssignTarget, Block, CatchClause, ExprId, Name, ParsedType, Stmt, StmtKind};
use ferment_stack::ensure_sufficient_stack;

use super::{Bindings, Interpreter};
use crate::errors::{
    duplicate_variable, internal_error, non_boolean_condition, non_string_raise,
    undefined_variable, void_return_value, ControlAction, EvalResult,
};
use crate::types::Type;
use crate::value::Value;

impl Interpreter<'_> {
    pub(crate) fn exec_block(&mut self, block: &[Stmt]) -> EvalResult<()> {
        for stmt in block {
            self.exec_stmt(stmt)?;
        }
        Ok(())
    }

    pub(crate) fn exec_stmt(&mut self, stmt: &Stmt) -> EvalResult<()> {
        ensure_sufficient_stack(|| self.exec_stmt_inner(stmt))
            .map_err(|action| action.with_span(stmt.span))
    }

    fn exec_stmt_inner(&mut self, stmt: &Stmt) -> EvalResult<()> {
        match &stmt.kind {
            StmtKind::VarDef { name, ty } => self.exec_var_def(*name, *ty),
            StmtKind::Assign { target, value } => self.exec_assign(target, *value),
            StmtKind::Call { func, args } => {
                // Result discarded unforced.
                self.eval_call(*func, *args, &mut Bindings::Live, stmt.span)?;
                Ok(())
            }
            StmtKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                if self.eval_condition(*cond)? {
                    self.with_env_scope(|scoped| scoped.exec_block(then_branch))
                } else if let Some(else_branch) = else_branch {
                    self.with_env_scope(|scoped| scoped.exec_block(else_branch))
                } else {
                    Ok(())
                }
            }
            StmtKind::For {
                init,
                cond,
                update,
                body,
            } => self.exec_for(init, *cond, update, body),
            StmtKind::Try { body, catches } => self.exec_try(body, catches),
            StmtKind::Raise(expr) => self.exec_raise(*expr),
            StmtKind::Return(expr) => self.exec_return(*expr),
        }
    }

    fn exec_var_def(&mut self, name: Name, ty: Option<ParsedType>) -> EvalResult<()> {
        let ty = ty
            .map(|ty| self.structs.resolve_value_type(ty, self.interner))
            .transpose()?;
        let initial = ty.map_or(Value::Nil, Type::default_value);
        if !self.env.declare(name, initial, ty) {
            return Err(duplicate_variable(self.interner.lookup(name)).into());
        }
        Ok(())
    }

    /// Variables bind lazily; field writes evaluate the value immediately.
    fn exec_assign(&mut self, target: &AssignTarget, value: ExprId) -> EvalResult<()> {
        let root = target.root;
        let Some((last, path)) = target.fields.split_last() else {
            let declared = self
                .env
                .declared_type(root)
                .ok_or_else(|| undefined_variable(self.interner.lookup(root)))?;
            let value = self.defer(value, declared, &mut Bindings::Live)?;
            return self
                .env
                .reassign(root, value)
                .map_err(|_| undefined_variable(self.interner.lookup(root)).into());
        };

        let mut receiver = self.read_variable(root, &mut Bindings::Live)?;
        for &field in path {
            receiver = self.read_field(&receiver, field)?;
        }
        let (handle, index, ty) = self.resolve_field(&receiver, *last)?;
        let value = self.eval_expr(value, &mut Bindings::Live)?;
        let value = ty.conform(value, self.interner)?;
        if !handle.set(index, value) {
            return Err(internal_error(format!("field slot {index} out of range")).into());
        }
        Ok(())
    }

    /// Evaluate a condition: bool, or int coerced by non-zero.
    fn eval_condition(&mut self, cond: ExprId) -> EvalResult<bool> {
        let value = self.eval_expr(cond, &mut Bindings::Live)?;
        value
            .coerce_bool()
            .ok_or_else(|| non_boolean_condition(&value.type_name(self.interner)).into())
    }

    fn exec_for(&mut self, init: &Stmt, cond: ExprId, update: &Stmt, body: &Block) -> EvalResult<()> {
        self.exec_stmt(init)?;
        while self.eval_condition(cond)? {
            self.with_env_scope(|scoped| scoped.exec_block(body))?;
            self.exec_stmt(update)?;
        }
        Ok(())
    }

    fn exec_try(&mut self, body: &Block, catches: &[CatchClause]) -> EvalResult<()> {
        let outcome = self.with_env_scope(|scoped| scoped.exec_block(body));
        let Err(ControlAction::Raise(tag)) = outcome else {
            return outcome;
        };
        let Value::Str(text) = &tag else {
            return Err(ControlAction::Raise(tag));
        };

        let handler = catches
            .iter()
            .find(|clause| self.interner.lookup(clause.tag) == &**text);
        match handler {
            Some(clause) => {
                tracing::debug!(tag = &**text, "caught");
                self.with_env_scope(|scoped| scoped.exec_block(&clause.body))
            }
            None => Err(ControlAction::Raise(tag)),
        }
    }

    fn exec_raise(&mut self, expr: ExprId) -> EvalResult<()> {
        match self.eval_expr(expr, &mut Bindings::Live)? {
            tag @ Value::Str(_) => {
                tracing::debug!(tag = ?tag, "raise");
                Err(ControlAction::Raise(tag))
            }
            other => Err(non_string_raise(&other.type_name(self.interner)).into()),
        }
    }

    fn exec_return(&mut self, expr: Option<ExprId>) -> EvalResult<()> {
        let frame = self
            .call_stack
            .current()
            .ok_or_else(|| internal_error("return outside of a function"))?;
        let (function, return_type) = (frame.name, frame.return_type);

        let value = match expr {
            None => return_type.map_or(Value::Nil, Type::default_value),
            Some(_) if return_type == Some(Type::Void) => {
                return Err(void_return_value(self.interner.lookup(function)).into());
            }
            Some(expr) => self.defer(expr, return_type, &mut Bindings::Live)?,
        };
        Err(ControlAction::Return(value))
    }
}
