//! Whole-program tests: modules built with `AstBuilder`, run in `TestRun`
//! mode with captured output and scripted input.

mod lazy_tests;
mod program_tests;

use ferment_ir::{AstBuilder, StringInterner};

use crate::{
    buffer_handler, scripted_handler, ErrorCategory, EvalError, EvalErrorKind, EvalMode,
    InterpreterBuilder,
};

pub(crate) struct Outcome {
    pub output: String,
    pub result: Result<(), EvalError>,
}

impl Outcome {
    /// Output of a run that must succeed.
    #[track_caller]
    pub fn ok(&self) -> &str {
        if let Err(err) = &self.result {
            panic!("run failed: {err} ({:?})\noutput so far:\n{}", err.kind, self.output);
        }
        &self.output
    }

    #[track_caller]
    pub fn err(&self) -> &EvalError {
        match &self.result {
            Err(err) => err,
            Ok(()) => panic!("run succeeded, output:\n{}", self.output),
        }
    }

    #[track_caller]
    pub fn kind(&self) -> &EvalErrorKind {
        &self.err().kind
    }

    #[track_caller]
    pub fn category(&self) -> ErrorCategory {
        self.err().category()
    }
}

pub(crate) fn run(interner: &StringInterner, b: AstBuilder<'_>) -> Outcome {
    run_with_input(interner, b, &[])
}

pub(crate) fn run_with_input(
    interner: &StringInterner,
    b: AstBuilder<'_>,
    input: &[&str],
) -> Outcome {
    let (module, arena) = b.finish();
    let output = buffer_handler();
    let mut interpreter = InterpreterBuilder::new(interner, &arena)
        .mode(EvalMode::TestRun)
        .print_handler(output.clone())
        .input_handler(scripted_handler(input.iter().copied()))
        .build();
    let result = interpreter.run(&module);
    Outcome {
        output: output.get_output(),
        result,
    }
}
