//! Evaluation modes.
//!
//! A mode fixes the I/O defaults and the depth limits of a run. Explicit
//! handlers passed to the builder override the I/O defaults.

/// Evaluation mode, selected by the host.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EvalMode {
    /// Running a program: stdout, stdin, deep recursion allowed.
    #[default]
    Interpret,
    /// Running under a test harness: captured output, tighter depth limit.
    TestRun,
}

impl EvalMode {
    /// Maximum number of nested user function calls.
    #[inline]
    pub fn max_recursion_depth(self) -> usize {
        match self {
            Self::Interpret => 20_000,
            Self::TestRun => 2_000,
        }
    }

    /// Maximum nesting of thunks forced while forcing another thunk.
    ///
    /// Lazily returned calls recurse through forcing rather than through
    /// the call stack, so this bounds them separately.
    #[inline]
    pub fn max_force_depth(self) -> usize {
        match self {
            Self::Interpret => 100_000,
            Self::TestRun => 10_000,
        }
    }

    /// Whether `print` output is captured instead of written to stdout.
    #[inline]
    pub fn captures_output(self) -> bool {
        matches!(self, Self::TestRun)
    }

    /// Whether `inputi`/`inputs` read the process's stdin by default.
    #[inline]
    pub fn reads_stdin(self) -> bool {
        matches!(self, Self::Interpret)
    }
}
