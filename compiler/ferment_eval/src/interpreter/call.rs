//! Function calls and the `print`/`inputi`/`inputs` built-ins.

use ferment_ir::{ExprId, ExprRange, Name, Span};

use super::{Bindings, Interpreter};
use crate::diagnostics::CallFrame;
use crate::errors::{
    duplicate_variable, input_exhausted, invalid_integer_input, too_many_input_args,
    undefined_function, ControlAction, EvalResult,
};
use crate::registry::FunctionDef;
use crate::types::Type;
use crate::value::Value;

impl<'a> Interpreter<'a> {
    /// Dispatch a call. Built-ins shadow user functions of the same name.
    ///
    /// The result of a user function may be an unforced thunk.
    pub(crate) fn eval_call(
        &mut self,
        func: Name,
        args: ExprRange,
        bindings: &mut Bindings<'_>,
        call_span: Span,
    ) -> EvalResult {
        let arena = self.arena;
        let args = arena.get_expr_list(args);

        if func == self.names.print {
            return self.builtin_print(args, bindings);
        }
        if func == self.names.inputi || func == self.names.inputs {
            return self.builtin_input(func, args, bindings);
        }

        let def = self
            .functions
            .lookup(func, args.len())
            .ok_or_else(|| undefined_function(self.interner.lookup(func), args.len()))?;

        let mut values = Vec::with_capacity(args.len());
        for (&arg, &(_, ty)) in args.iter().zip(&def.params) {
            values.push(self.defer(arg, ty, bindings)?);
        }
        self.call_function(&def, values, call_span)
    }

    /// Run a user function with already-bound argument values.
    pub(crate) fn call_function(
        &mut self,
        def: &FunctionDef<'a>,
        args: Vec<Value>,
        call_span: Span,
    ) -> EvalResult {
        let interner = self.interner;
        let _span = tracing::debug_span!(
            "call",
            function = interner.lookup(def.name()),
            arity = args.len()
        )
        .entered();

        let mut frame = self.enter_call(CallFrame {
            name: def.name(),
            call_span,
            return_type: def.return_type,
        })?;

        for (&(name, ty), value) in def.params.iter().zip(args) {
            if !frame.env.declare(name, value, ty) {
                let err = duplicate_variable(interner.lookup(name));
                return Err(frame.call_stack.attach_backtrace(err, interner).into());
            }
        }

        match frame.with_env_scope(|body| body.exec_block(def.body())) {
            Ok(()) => Ok(def.return_type.map_or(Value::Nil, Type::default_value)),
            Err(ControlAction::Return(value)) => Ok(value),
            Err(ControlAction::Error(err)) => {
                let err = frame.call_stack.attach_backtrace(*err, interner);
                Err(err.into())
            }
            Err(raise) => Err(raise),
        }
    }

    fn builtin_print(&mut self, args: &[ExprId], bindings: &mut Bindings<'_>) -> EvalResult {
        let mut line = String::new();
        for &arg in args {
            let value = self.eval_expr(arg, bindings)?;
            line.push_str(&value.printable(self.interner)?);
        }
        self.print_handler.println(&line);
        Ok(Value::Nil)
    }

    /// `inputi` / `inputs`: optional prompt, then one line of input.
    fn builtin_input(
        &mut self,
        func: Name,
        args: &[ExprId],
        bindings: &mut Bindings<'_>,
    ) -> EvalResult {
        if args.len() > 1 {
            return Err(too_many_input_args(self.interner.lookup(func), args.len()).into());
        }
        if let Some(&prompt) = args.first() {
            let prompt = self.eval_expr(prompt, bindings)?;
            self.print_handler.println(&prompt.printable(self.interner)?);
        }

        let line = self.input_handler.read_line().ok_or_else(input_exhausted)?;
        if func == self.names.inputi {
            line.trim()
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|_| invalid_integer_input(&line).into())
        } else {
            Ok(Value::string(&line))
        }
    }
}
