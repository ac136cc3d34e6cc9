//! Call-by-need evaluator for Ferment programs.
//!
//! Takes a [`Module`] and its [`ExprArena`] and runs `main`. Variable
//! assignments, call arguments and returned expressions are evaluated
//! lazily: each becomes a memoized thunk over a snapshot of the variables it
//! reads, forced the first time the value is needed.
//!
//! ```text
//! Interpreter::run(module)
//!   ├── StructRegistry::build      struct layouts
//!   ├── FunctionRegistry::build    (name, arity) → function
//!   └── call main
//!         └── exec / eval / force  (thunks created by `defer`)
//! ```
//!
//! Errors fall into three categories (name, type, fault); see [`errors`].

mod diagnostics;
mod environment;
pub mod errors;
mod eval_mode;
mod input_handler;
mod interpreter;
mod logging;
mod operators;
mod print_handler;
mod registry;
mod types;
mod value;

pub use diagnostics::{CallFrame, CallStack};
pub use environment::{AssignError, Environment};
pub use errors::{
    BacktraceFrame, ControlAction, ErrorCategory, EvalBacktrace, EvalError, EvalErrorKind,
    EvalResult,
};
pub use eval_mode::EvalMode;
pub use input_handler::{scripted_handler, stdin_handler, InputHandlerImpl, SharedInputHandler};
pub use interpreter::{CallFrameGuard, Interpreter, InterpreterBuilder, ScopedInterpreter};
pub use logging::init_tracing;
pub use operators::{
    evaluate_binary, evaluate_unary, floor_div, logical_operand, values_equal, DIV_ZERO_TAG,
};
pub use print_handler::{
    buffer_handler, stdout_handler, BufferPrintHandler, PrintHandlerImpl, SharedPrintHandler,
    StdoutPrintHandler,
};
pub use registry::{FunctionDef, FunctionRegistry, StructLayout, StructRegistry};
pub use types::Type;
pub use value::{Captures, Deferred, ForceStart, StructHandle, StructInstance, StructRef, Thunk, Value};

use ferment_ir::{ExprArena, Module, StringInterner};

/// Run `module` with stdout and stdin attached.
pub fn run_program(
    module: &Module,
    arena: &ExprArena,
    interner: &StringInterner,
) -> Result<(), EvalError> {
    Interpreter::new(interner, arena).run(module)
}

#[cfg(test)]
mod tests;
