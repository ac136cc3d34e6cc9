//! Variable bindings: a stack of call frames, each a stack of block scopes.
//!
//! Lookup scans the current frame's scopes innermost first and never
//! crosses into the caller's frame.

use rustc_hash::FxHashMap;

use ferment_ir::Name;

use crate::types::Type;
use crate::value::{Thunk, Value};

/// Error returned by [`Environment::reassign`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssignError {
    /// No binding with that name in the current frame.
    Undefined,
}

/// A variable binding.
#[derive(Clone, Debug)]
struct Binding {
    value: Value,
    /// Declared type, `None` for an untyped `var`.
    ty: Option<Type>,
}

/// One block's bindings.
#[derive(Clone, Debug, Default)]
struct Scope {
    bindings: FxHashMap<Name, Binding>,
}

/// Scopes of one function activation.
#[derive(Clone, Debug, Default)]
struct Frame {
    scopes: Vec<Scope>,
}

impl Frame {
    fn find(&self, name: Name) -> Option<&Binding> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.bindings.get(&name))
    }

    fn find_mut(&mut self, name: Name) -> Option<&mut Binding> {
        self.scopes
            .iter_mut()
            .rev()
            .find_map(|scope| scope.bindings.get_mut(&name))
    }
}

/// Environment for the interpreter.
#[derive(Debug, Default)]
pub struct Environment {
    frames: Vec<Frame>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live call frames.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Enter a function: a new frame holding one (parameter) scope.
    pub fn push_frame(&mut self) {
        self.frames.push(Frame {
            scopes: vec![Scope::default()],
        });
    }

    pub fn pop_frame(&mut self) {
        self.frames.pop();
    }

    /// Enter a block within the current frame.
    pub fn push_scope(&mut self) {
        if let Some(frame) = self.frames.last_mut() {
            frame.scopes.push(Scope::default());
        }
    }

    pub fn pop_scope(&mut self) {
        if let Some(frame) = self.frames.last_mut() {
            frame.scopes.pop();
        }
    }

    /// Declare `name` in the innermost scope.
    ///
    /// Returns `false` (leaving the existing binding untouched) if the name
    /// is already declared in that same scope.
    pub fn declare(&mut self, name: Name, value: Value, ty: Option<Type>) -> bool {
        let Some(scope) = self.frames.last_mut().and_then(|f| f.scopes.last_mut()) else {
            return false;
        };
        if scope.bindings.contains_key(&name) {
            return false;
        }
        scope.bindings.insert(name, Binding { value, ty });
        true
    }

    /// Value bound to `name` in the current frame.
    pub fn lookup(&self, name: Name) -> Option<Value> {
        self.frames
            .last()
            .and_then(|frame| frame.find(name))
            .map(|binding| binding.value.clone())
    }

    /// Declared type of `name`: `None` if unbound, `Some(None)` if untyped.
    pub fn declared_type(&self, name: Name) -> Option<Option<Type>> {
        self.frames
            .last()
            .and_then(|frame| frame.find(name))
            .map(|binding| binding.ty)
    }

    /// Replace the value of the innermost binding of `name`.
    pub fn reassign(&mut self, name: Name, value: Value) -> Result<(), AssignError> {
        let binding = self
            .frames
            .last_mut()
            .and_then(|frame| frame.find_mut(name))
            .ok_or(AssignError::Undefined)?;
        binding.value = value;
        Ok(())
    }

    /// Replace a forced thunk with its value.
    ///
    /// Only writes if the binding still holds that same thunk.
    pub fn memoize(&mut self, name: Name, thunk: &Thunk, value: Value) {
        if let Some(binding) = self.frames.last_mut().and_then(|f| f.find_mut(name)) {
            if matches!(&binding.value, Value::Thunk(t) if t.ptr_eq(thunk)) {
                binding.value = value;
            }
        }
    }
}
