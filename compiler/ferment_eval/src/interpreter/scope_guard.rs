//! RAII guards for environment scopes and call frames.
//!
//! Both guards hold `&mut Interpreter` and deref to it, so code inside a
//! scope uses the interpreter as usual. Dropping the guard pops what it
//! pushed, on every exit path (`return`, `raise`, fatal error, panic).

use std::ops::{Deref, DerefMut};

use super::Interpreter;
use crate::diagnostics::CallFrame;
use crate::errors::EvalError;

/// A block scope; `pop_scope` on drop.
pub struct ScopedInterpreter<'guard, 'interp> {
    interpreter: &'guard mut Interpreter<'interp>,
}

impl Drop for ScopedInterpreter<'_, '_> {
    fn drop(&mut self) {
        self.interpreter.env.pop_scope();
    }
}

impl<'interp> Deref for ScopedInterpreter<'_, 'interp> {
    type Target = Interpreter<'interp>;

    fn deref(&self) -> &Self::Target {
        self.interpreter
    }
}

impl DerefMut for ScopedInterpreter<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.interpreter
    }
}

/// A user function activation: an environment frame plus a call stack
/// entry; both popped on drop.
pub struct CallFrameGuard<'guard, 'interp> {
    interpreter: &'guard mut Interpreter<'interp>,
}

impl Drop for CallFrameGuard<'_, '_> {
    fn drop(&mut self) {
        debug_assert_eq!(
            self.interpreter.env.depth(),
            self.interpreter.call_stack.depth(),
            "environment frames out of step with the call stack"
        );
        self.interpreter.env.pop_frame();
        self.interpreter.call_stack.pop();
    }
}

impl<'interp> Deref for CallFrameGuard<'_, 'interp> {
    type Target = Interpreter<'interp>;

    fn deref(&self) -> &Self::Target {
        self.interpreter
    }
}

impl DerefMut for CallFrameGuard<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.interpreter
    }
}

impl<'a> Interpreter<'a> {
    /// Push a block scope, popped when the guard drops.
    pub fn scoped(&mut self) -> ScopedInterpreter<'_, 'a> {
        self.env.push_scope();
        ScopedInterpreter { interpreter: self }
    }

    /// Run `f` inside a fresh block scope.
    pub fn with_env_scope<T, F>(&mut self, f: F) -> T
    where
        F: FnOnce(&mut ScopedInterpreter<'_, 'a>) -> T,
    {
        let mut scoped = self.scoped();
        f(&mut scoped)
    }

    /// Enter a user function call.
    ///
    /// Fails without pushing anything if the call-depth limit is reached.
    pub fn enter_call(&mut self, frame: CallFrame) -> Result<CallFrameGuard<'_, 'a>, EvalError> {
        self.call_stack.push(frame)?;
        self.env.push_frame();
        Ok(CallFrameGuard { interpreter: self })
    }
}
