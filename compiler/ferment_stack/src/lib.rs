//! Stack growth for the tree-walking evaluator.
//!
//! Statement execution, expression evaluation and thunk forcing all recurse
//! on the native stack. Each of those entry points runs its body through
//! [`ensure_sufficient_stack`], which moves onto a freshly allocated segment
//! when the current one is nearly exhausted. Logical recursion depth is
//! bounded separately by the evaluator's call-depth limit.
//!
//! On `wasm32` the guard is a passthrough.

/// Grow when less than this much stack remains.
const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated stack segment.
const SEGMENT_SIZE: usize = 2 * 1024 * 1024;

/// Run `f`, first growing the stack if fewer than `RED_ZONE` bytes remain.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
