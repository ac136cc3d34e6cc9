//! `InterpreterBuilder` for configuring a run.

use super::{BuiltinNames, Interpreter};
use crate::diagnostics::CallStack;
use crate::environment::Environment;
use crate::eval_mode::EvalMode;
use crate::input_handler::{scripted_handler, stdin_handler, SharedInputHandler};
use crate::print_handler::{buffer_handler, stdout_handler, SharedPrintHandler};
use crate::registry::{FunctionRegistry, StructRegistry};
use ferment_ir::{ExprArena, StringInterner};

/// Builder for [`Interpreter`].
///
/// The mode supplies defaults: `Interpret` prints to stdout and reads
/// stdin, `TestRun` captures output in a buffer and starts with no input.
/// Explicit handlers override those defaults.
pub struct InterpreterBuilder<'a> {
    interner: &'a StringInterner,
    arena: &'a ExprArena,
    mode: EvalMode,
    print_handler: Option<SharedPrintHandler>,
    input_handler: Option<SharedInputHandler>,
    max_recursion_depth: Option<usize>,
}

impl<'a> InterpreterBuilder<'a> {
    pub fn new(interner: &'a StringInterner, arena: &'a ExprArena) -> Self {
        Self {
            interner,
            arena,
            mode: EvalMode::default(),
            print_handler: None,
            input_handler: None,
            max_recursion_depth: None,
        }
    }

    #[must_use]
    pub fn mode(mut self, mode: EvalMode) -> Self {
        self.mode = mode;
        self
    }

    /// Destination for `print` and input prompts.
    #[must_use]
    pub fn print_handler(mut self, handler: SharedPrintHandler) -> Self {
        self.print_handler = Some(handler);
        self
    }

    /// Source for `inputi` and `inputs`.
    #[must_use]
    pub fn input_handler(mut self, handler: SharedInputHandler) -> Self {
        self.input_handler = Some(handler);
        self
    }

    /// Override the mode's call-depth limit.
    #[must_use]
    pub fn max_recursion_depth(mut self, depth: usize) -> Self {
        self.max_recursion_depth = Some(depth);
        self
    }

    pub fn build(self) -> Interpreter<'a> {
        let mode = self.mode;
        let print_handler = self.print_handler.unwrap_or_else(|| {
            if mode.captures_output() {
                buffer_handler()
            } else {
                stdout_handler()
            }
        });
        let input_handler = self.input_handler.unwrap_or_else(|| {
            if mode.reads_stdin() {
                stdin_handler()
            } else {
                scripted_handler(Vec::<String>::new())
            }
        });
        let depth = self
            .max_recursion_depth
            .unwrap_or_else(|| mode.max_recursion_depth());

        Interpreter {
            interner: self.interner,
            arena: self.arena,
            structs: StructRegistry::default(),
            functions: FunctionRegistry::default(),
            env: Environment::new(),
            call_stack: CallStack::new(depth),
            force_depth: 0,
            max_force_depth: mode.max_force_depth(),
            mode,
            print_handler,
            input_handler,
            names: BuiltinNames::new(self.interner),
        }
    }
}
