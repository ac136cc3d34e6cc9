//! Tree-walking interpreter.
//!
//! Statements always execute against the live environment. Expressions
//! evaluate against a `Bindings` context: the live environment, or the
//! private capture map of a thunk being forced. Expression evaluation always
//! yields forced values; thunks only appear in binding slots and in the
//! results of user function calls.
//!
//! - `exec`: statements and control flow
//! - `eval`: expressions and operators
//! - `call`: user function calls and built-ins
//! - `lazy`: thunk creation, capture and forcing

mod builder;
mod call;
mod eval;
mod exec;
mod lazy;
mod scope_guard;

use ferment_ir::{ExprArena, Module, Name, Span, StringInterner};

use crate::diagnostics::CallStack;
use crate::environment::Environment;
use crate::errors::{internal_error, missing_main, uncaught_exception, ControlAction, EvalError};
use crate::eval_mode::EvalMode;
use crate::input_handler::SharedInputHandler;
use crate::print_handler::SharedPrintHandler;
use crate::registry::{FunctionRegistry, StructRegistry};
use crate::value::Value;

pub use builder::InterpreterBuilder;
pub(crate) use lazy::Bindings;
pub use scope_guard::{CallFrameGuard, ScopedInterpreter};

/// Pre-interned names the interpreter dispatches on.
#[derive(Clone, Copy, Debug)]
pub(crate) struct BuiltinNames {
    pub main: Name,
    pub print: Name,
    pub inputi: Name,
    pub inputs: Name,
}

impl BuiltinNames {
    fn new(interner: &StringInterner) -> Self {
        BuiltinNames {
            main: interner.intern("main"),
            print: interner.intern("print"),
            inputi: interner.intern("inputi"),
            inputs: interner.intern("inputs"),
        }
    }
}

/// Evaluator for one program.
///
/// Created through [`InterpreterBuilder`]; registries are built by
/// [`Interpreter::run`].
pub struct Interpreter<'a> {
    pub(crate) interner: &'a StringInterner,
    pub(crate) arena: &'a ExprArena,
    pub(crate) structs: StructRegistry,
    pub(crate) functions: FunctionRegistry<'a>,
    pub(crate) env: Environment,
    pub(crate) call_stack: CallStack,
    /// Thunks currently being forced, innermost last.
    pub(crate) force_depth: usize,
    pub(crate) max_force_depth: usize,
    pub(crate) mode: EvalMode,
    pub(crate) print_handler: SharedPrintHandler,
    pub(crate) input_handler: SharedInputHandler,
    pub(crate) names: BuiltinNames,
}

impl<'a> Interpreter<'a> {
    /// Interpreter with the default (`Interpret`) configuration.
    pub fn new(interner: &'a StringInterner, arena: &'a ExprArena) -> Self {
        InterpreterBuilder::new(interner, arena).build()
    }

    pub fn mode(&self) -> EvalMode {
        self.mode
    }

    pub fn print_handler(&self) -> &SharedPrintHandler {
        &self.print_handler
    }

    /// Build the registries for `module` and run its `main`.
    ///
    /// An exception escaping `main` is reported as a fault error.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn run(&mut self, module: &'a Module) -> Result<(), EvalError> {
        self.structs = StructRegistry::build(module, self.interner)?;
        self.functions = FunctionRegistry::build(module, &self.structs, self.interner)?;
        let main = self
            .functions
            .lookup(self.names.main, 0)
            .ok_or_else(missing_main)?;

        tracing::debug!(mode = ?self.mode, "running main");
        let outcome = self.call_function(&main, Vec::new(), Span::DUMMY);
        let result = match outcome {
            Ok(_) => Ok(()),
            Err(ControlAction::Raise(tag)) => {
                let tag = match &tag {
                    Value::Str(s) => s.to_string(),
                    other => other.type_name(self.interner),
                };
                Err(uncaught_exception(&tag))
            }
            Err(ControlAction::Error(err)) => Err(*err),
            Err(ControlAction::Return(_)) => Err(internal_error("return escaped main")),
        };
        tracing::debug!(ok = result.is_ok(), "main finished");
        result
    }
}
