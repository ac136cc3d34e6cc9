//! Fatal evaluation errors and control-flow signals.
//!
//! This module is the single import point for error construction: the
//! evaluator builds every [`EvalError`] through the `#[cold]` factory
//! functions below, which fill in both the structured [`EvalErrorKind`] and
//! the rendered message.
//!
//! ```text
//! use crate::errors::{undefined_variable, nil_dereference};
//! ```
//!
//! Fatal errors are not catchable by the language. They travel on the
//! `ControlAction::Error` channel, separate from `raise`.

use std::fmt;

use ferment_ir::Span;

use crate::Value;

/// Result of evaluating an expression or executing a statement.
///
/// `Ok` means evaluation continues normally; every other outcome
/// (`return`, `raise`, fatal error) is a [`ControlAction`].
pub type EvalResult<T = Value> = Result<T, ControlAction>;

/// Non-local outcome of evaluation.
#[derive(Debug)]
pub enum ControlAction {
    /// `return` unwinding to the nearest call boundary.
    Return(Value),
    /// `raise` unwinding to the nearest matching `catch`.
    Raise(Value),
    /// Fatal error aborting the run.
    Error(Box<EvalError>),
}

impl ControlAction {
    /// Attach a span to a fatal error that does not have one yet.
    #[must_use]
    pub fn with_span(self, span: Span) -> Self {
        match self {
            ControlAction::Error(mut err) if err.span.is_none() && !span.is_dummy() => {
                err.span = Some(span);
                ControlAction::Error(err)
            }
            other => other,
        }
    }
}

impl From<EvalError> for ControlAction {
    #[inline]
    fn from(err: EvalError) -> Self {
        ControlAction::Error(Box::new(err))
    }
}

/// Broad error category reported to the host.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Unknown or duplicate names, arity mismatches.
    Name,
    /// Operand, condition, annotation and conversion mismatches.
    Type,
    /// Runtime faults: nil dereference, overflow, uncaught exceptions.
    Fault,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ErrorCategory::Name => "name error",
            ErrorCategory::Type => "type error",
            ErrorCategory::Fault => "fault error",
        })
    }
}

/// Structured error kind.
///
/// Names are stored resolved so errors outlive the interner borrow.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EvalErrorKind {
    // Name errors
    #[error("undefined variable: {name}")]
    UndefinedVariable { name: String },
    #[error("no function {name} taking {arity} argument(s)")]
    UndefinedFunction { name: String, arity: usize },
    #[error("undefined struct type: {name}")]
    UndefinedStruct { name: String },
    #[error("struct {type_name} has no field {field}")]
    UndefinedField { type_name: String, field: String },
    #[error("variable {name} is already defined in this block")]
    DuplicateVariable { name: String },
    #[error("function {name} taking {arity} argument(s) is defined more than once")]
    DuplicateFunction { name: String, arity: usize },
    #[error("struct {name} is defined more than once")]
    DuplicateStruct { name: String },
    #[error("struct {type_name} declares field {field} more than once")]
    DuplicateField { type_name: String, field: String },
    #[error("no main function taking zero arguments")]
    MissingMain,
    #[error("{func} takes at most one argument, got {got}")]
    TooManyInputArgs { func: String, got: usize },

    // Type errors
    #[error("incompatible operator {op} for type {type_name}")]
    InvalidOperator { op: &'static str, type_name: String },
    #[error("incompatible types for {op}: {left} and {right}")]
    BinaryTypeMismatch {
        op: &'static str,
        left: String,
        right: String,
    },
    #[error("condition must be bool, got {got}")]
    NonBooleanCondition { got: String },
    #[error("value of type {type_name} cannot be printed")]
    NotPrintable { type_name: String },
    #[error("type mismatch: expected {expected}, got {got}")]
    TypeMismatch { expected: String, got: String },
    #[error("invalid type: {name}")]
    InvalidType { name: String },
    #[error("for loop {clause} must be an assignment")]
    InvalidForClause { clause: &'static str },
    #[error("raise requires a string, got {got}")]
    NonStringRaise { got: String },
    #[error("void function {name} cannot return a value")]
    VoidReturnValue { name: String },
    #[error("cannot access field {field} on value of type {type_name}")]
    NotAStruct { field: String, type_name: String },
    #[error("cannot parse {input:?} as an integer")]
    InvalidIntegerInput { input: String },

    // Faults
    #[error("nil reference dereferenced accessing field {field}")]
    NilDereference { field: String },
    #[error("uncaught exception: {tag}")]
    UncaughtException { tag: String },
    #[error("integer overflow in {operation}")]
    IntegerOverflow { operation: &'static str },
    #[error("maximum recursion depth exceeded (limit: {depth})")]
    StackOverflow { depth: usize },
    #[error("cyclic lazy binding")]
    CyclicLazyBinding,
    #[error("input exhausted")]
    InputExhausted,
    #[error("internal error: {message}")]
    Internal { message: String },
}

impl EvalErrorKind {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UndefinedVariable { .. }
            | Self::UndefinedFunction { .. }
            | Self::UndefinedStruct { .. }
            | Self::UndefinedField { .. }
            | Self::DuplicateVariable { .. }
            | Self::DuplicateFunction { .. }
            | Self::DuplicateStruct { .. }
            | Self::DuplicateField { .. }
            | Self::MissingMain
            | Self::TooManyInputArgs { .. } => ErrorCategory::Name,

            Self::InvalidOperator { .. }
            | Self::BinaryTypeMismatch { .. }
            | Self::NonBooleanCondition { .. }
            | Self::NotPrintable { .. }
            | Self::TypeMismatch { .. }
            | Self::InvalidType { .. }
            | Self::InvalidForClause { .. }
            | Self::NonStringRaise { .. }
            | Self::VoidReturnValue { .. }
            | Self::NotAStruct { .. }
            | Self::InvalidIntegerInput { .. } => ErrorCategory::Type,

            Self::NilDereference { .. }
            | Self::UncaughtException { .. }
            | Self::IntegerOverflow { .. }
            | Self::StackOverflow { .. }
            | Self::CyclicLazyBinding
            | Self::InputExhausted
            | Self::Internal { .. } => ErrorCategory::Fault,
        }
    }
}

/// A single frame in a captured backtrace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BacktraceFrame {
    pub name: String,
    /// Where the call was made, when known.
    pub span: Option<Span>,
}

/// Snapshot of the call stack at the point a fatal error escaped a call.
///
/// Innermost call first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EvalBacktrace {
    frames: Vec<BacktraceFrame>,
}

impl EvalBacktrace {
    pub fn new(frames: Vec<BacktraceFrame>) -> Self {
        Self { frames }
    }

    pub fn frames(&self) -> &[BacktraceFrame] {
        &self.frames
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }
}

impl fmt::Display for EvalBacktrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.frames.is_empty() {
            return Ok(());
        }
        writeln!(f, "stack backtrace:")?;
        for (i, frame) in self.frames.iter().enumerate() {
            write!(f, "  {i}: {}", frame.name)?;
            if let Some(span) = frame.span.filter(|s| !s.is_dummy()) {
                write!(f, " at {span}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Fatal evaluation error.
#[derive(Clone, Debug, thiserror::Error)]
#[error("{message}")]
pub struct EvalError {
    pub kind: EvalErrorKind,
    /// Rendered message; equals `kind.to_string()`.
    pub message: String,
    /// Source location of the failing node.
    pub span: Option<Span>,
    /// Call stack captured when the error left its innermost call.
    pub backtrace: Option<EvalBacktrace>,
}

impl EvalError {
    fn from_kind(kind: EvalErrorKind) -> Self {
        let message = kind.to_string();
        Self {
            kind,
            message,
            span: None,
            backtrace: None,
        }
    }

    #[inline]
    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }

    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    #[must_use]
    pub fn with_backtrace(mut self, backtrace: EvalBacktrace) -> Self {
        self.backtrace = Some(backtrace);
        self
    }
}

// Name errors

#[cold]
pub fn undefined_variable(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UndefinedVariable {
        name: name.to_string(),
    })
}

#[cold]
pub fn undefined_function(name: &str, arity: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UndefinedFunction {
        name: name.to_string(),
        arity,
    })
}

#[cold]
pub fn undefined_struct(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UndefinedStruct {
        name: name.to_string(),
    })
}

#[cold]
pub fn undefined_field(type_name: &str, field: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UndefinedField {
        type_name: type_name.to_string(),
        field: field.to_string(),
    })
}

#[cold]
pub fn duplicate_variable(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::DuplicateVariable {
        name: name.to_string(),
    })
}

#[cold]
pub fn duplicate_function(name: &str, arity: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::DuplicateFunction {
        name: name.to_string(),
        arity,
    })
}

#[cold]
pub fn duplicate_struct(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::DuplicateStruct {
        name: name.to_string(),
    })
}

#[cold]
pub fn duplicate_field(type_name: &str, field: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::DuplicateField {
        type_name: type_name.to_string(),
        field: field.to_string(),
    })
}

#[cold]
pub fn missing_main() -> EvalError {
    EvalError::from_kind(EvalErrorKind::MissingMain)
}

#[cold]
pub fn too_many_input_args(func: &str, got: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::TooManyInputArgs {
        func: func.to_string(),
        got,
    })
}

// Type errors

/// Operator not supported by the left operand's type.
#[cold]
pub fn invalid_operator(op: &'static str, type_name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidOperator {
        op,
        type_name: type_name.to_string(),
    })
}

/// Operator supported by the left operand's type, but not with this right operand.
#[cold]
pub fn binary_type_mismatch(op: &'static str, left: &str, right: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::BinaryTypeMismatch {
        op,
        left: left.to_string(),
        right: right.to_string(),
    })
}

#[cold]
pub fn non_boolean_condition(got: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NonBooleanCondition {
        got: got.to_string(),
    })
}

#[cold]
pub fn not_printable(type_name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NotPrintable {
        type_name: type_name.to_string(),
    })
}

#[cold]
pub fn type_mismatch(expected: &str, got: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::TypeMismatch {
        expected: expected.to_string(),
        got: got.to_string(),
    })
}

#[cold]
pub fn invalid_type(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidType {
        name: name.to_string(),
    })
}

#[cold]
pub fn invalid_for_clause(clause: &'static str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidForClause { clause })
}

#[cold]
pub fn non_string_raise(got: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NonStringRaise {
        got: got.to_string(),
    })
}

#[cold]
pub fn void_return_value(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::VoidReturnValue {
        name: name.to_string(),
    })
}

#[cold]
pub fn not_a_struct(field: &str, type_name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NotAStruct {
        field: field.to_string(),
        type_name: type_name.to_string(),
    })
}

#[cold]
pub fn invalid_integer_input(input: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidIntegerInput {
        input: input.to_string(),
    })
}

// Faults

#[cold]
pub fn nil_dereference(field: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NilDereference {
        field: field.to_string(),
    })
}

#[cold]
pub fn uncaught_exception(tag: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UncaughtException {
        tag: tag.to_string(),
    })
}

#[cold]
pub fn integer_overflow(operation: &'static str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::IntegerOverflow { operation })
}

#[cold]
pub fn recursion_limit_exceeded(depth: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::StackOverflow { depth })
}

#[cold]
pub fn cyclic_lazy_binding() -> EvalError {
    EvalError::from_kind(EvalErrorKind::CyclicLazyBinding)
}

#[cold]
pub fn input_exhausted() -> EvalError {
    EvalError::from_kind(EvalErrorKind::InputExhausted)
}

#[cold]
pub fn internal_error(message: impl Into<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::Internal {
        message: message.into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_matches_kind() {
        let err = undefined_variable("x");
        assert_eq!(err.message, "undefined variable: x");
        assert_eq!(err.message, err.kind.to_string());
    }

    #[test]
    fn test_categories() {
        assert_eq!(undefined_function("f", 2).category(), ErrorCategory::Name);
        assert_eq!(invalid_operator("+", "bool").category(), ErrorCategory::Type);
        assert_eq!(nil_dereference("next").category(), ErrorCategory::Fault);
        assert_eq!(uncaught_exception("e").category(), ErrorCategory::Fault);
        assert_eq!(invalid_integer_input("abc").category(), ErrorCategory::Type);
    }

    #[test]
    fn test_display_is_message() {
        let err = integer_overflow("*");
        assert_eq!(err.to_string(), "integer overflow in *");
        assert_eq!(err.category().to_string(), "fault error");
    }

    #[test]
    fn test_control_action_span_only_fills_missing() {
        let action: ControlAction = type_mismatch("int", "string").into();
        let action = action.with_span(Span::new(1, 4)).with_span(Span::new(9, 12));
        match action {
            ControlAction::Error(err) => assert_eq!(err.span, Some(Span::new(1, 4))),
            other => panic!("expected error, got {other:?}"),
        }
    }

    #[test]
    fn test_backtrace_display() {
        let bt = EvalBacktrace::new(vec![
            BacktraceFrame {
                name: "inner".to_string(),
                span: Some(Span::new(10, 20)),
            },
            BacktraceFrame {
                name: "main".to_string(),
                span: None,
            },
        ]);
        assert_eq!(
            bt.to_string(),
            "stack backtrace:\n  0: inner at 10..20\n  1: main\n"
        );
    }
}
