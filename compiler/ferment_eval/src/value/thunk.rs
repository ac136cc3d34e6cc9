//! Deferred computations.
//!
//! A [`Thunk`] pairs an expression with a private snapshot of the bindings
//! it reads. The state lives in a shared cell, so every copy of a thunk
//! (captured into other thunks, aliased by assignment) observes the same
//! memoized result once any of them is forced.
//!
//! Forcing itself lives in the interpreter; this module only provides the
//! state transitions.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use ferment_ir::{ExprId, Name};
use rustc_hash::FxHashMap;

use super::Value;
use crate::types::Type;

/// Snapshot of the bindings a deferred expression reads.
///
/// `None` records a name that was not bound when the thunk was built.
pub type Captures = FxHashMap<Name, Option<Value>>;

/// Everything needed to evaluate a thunk later.
#[derive(Debug)]
pub struct Deferred {
    pub expr: ExprId,
    pub captured: Captures,
    /// Type the result is conformed to once computed.
    pub expected: Option<Type>,
}

enum ThunkState {
    Pending(Deferred),
    /// Being forced further up the native stack.
    Forcing,
    Forced(Value),
}

/// What [`Thunk::begin_force`] found.
pub enum ForceStart {
    /// The thunk was pending and is now marked in progress.
    Evaluate(Deferred),
    /// Already memoized.
    Done(Value),
    /// The thunk is already being forced.
    Cycle,
}

/// Shared, memoizing deferred computation.
#[derive(Clone)]
pub struct Thunk(Rc<RefCell<ThunkState>>);

impl Thunk {
    pub fn new(deferred: Deferred) -> Self {
        Thunk(Rc::new(RefCell::new(ThunkState::Pending(deferred))))
    }

    /// Take the pending computation and mark the thunk as in progress.
    pub fn begin_force(&self) -> ForceStart {
        let mut state = self.0.borrow_mut();
        match std::mem::replace(&mut *state, ThunkState::Forcing) {
            ThunkState::Pending(deferred) => ForceStart::Evaluate(deferred),
            ThunkState::Forced(value) => {
                *state = ThunkState::Forced(value.clone());
                ForceStart::Done(value)
            }
            ThunkState::Forcing => ForceStart::Cycle,
        }
    }

    /// Memoize the result of a successful force.
    pub fn complete(&self, value: Value) {
        *self.0.borrow_mut() = ThunkState::Forced(value);
    }

    /// Put the computation back after a force that did not produce a value.
    ///
    /// The captured map keeps whatever nested thunks were memoized.
    pub fn abandon(&self, deferred: Deferred) {
        *self.0.borrow_mut() = ThunkState::Pending(deferred);
    }

    /// The memoized value, if this thunk has been forced.
    pub fn forced_value(&self) -> Option<Value> {
        match &*self.0.borrow() {
            ThunkState::Forced(value) => Some(value.clone()),
            ThunkState::Pending(_) | ThunkState::Forcing => None,
        }
    }

    #[inline]
    pub fn ptr_eq(&self, other: &Thunk) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

/// Long chains of pending thunks (an accumulator rebound in a loop) nest
/// one `Deferred` per step. Dropping the last handle unlinks the chain
/// through a worklist so teardown depth stays constant.
impl Drop for Thunk {
    fn drop(&mut self) {
        let mut pending = release_captures(&self.0);
        while let Some(value) = pending.pop() {
            if let Value::Thunk(inner) = &value {
                pending.extend(release_captures(&inner.0));
            }
        }
    }
}

/// Move the captured values out of a pending thunk held by nobody else.
fn release_captures(cell: &Rc<RefCell<ThunkState>>) -> Vec<Value> {
    if Rc::strong_count(cell) != 1 {
        return Vec::new();
    }
    let Ok(mut state) = cell.try_borrow_mut() else {
        return Vec::new();
    };
    match &mut *state {
        ThunkState::Pending(deferred) => {
            deferred.captured.drain().filter_map(|(_, slot)| slot).collect()
        }
        ThunkState::Forcing | ThunkState::Forced(_) => Vec::new(),
    }
}

impl fmt::Debug for Thunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.0.borrow() {
            ThunkState::Pending(deferred) => write!(f, "Thunk(pending {:?})", deferred.expr),
            ThunkState::Forcing => write!(f, "Thunk(forcing)"),
            ThunkState::Forced(value) => write!(f, "Thunk(forced {value:?})"),
        }
    }
}
