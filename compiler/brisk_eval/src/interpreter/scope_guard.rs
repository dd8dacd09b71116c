//! RAII-style scope guards for Interpreter environment management.
//!
//! [`ScopedInterpreter`] holds `&mut Interpreter` and derefs to it, so code
//! inside a scope calls interpreter methods as usual. Dropping the guard
//! pops whatever it pushed, including when an error propagates through
//! `?` or a panic unwinds.

use std::ops::{Deref, DerefMut};

use super::Interpreter;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ScopeKind {
    /// A lexical scope inside the current frame.
    Block,
    /// A call frame; also restores the caller's loop depth.
    Frame { saved_loop_depth: usize },
}

/// RAII guard that ensures environment cleanup on drop.
pub struct ScopedInterpreter<'guard> {
    interpreter: &'guard mut Interpreter,
    kind: ScopeKind,
}

impl Drop for ScopedInterpreter<'_> {
    fn drop(&mut self) {
        match self.kind {
            ScopeKind::Block => self.interpreter.env.pop_scope(),
            ScopeKind::Frame { saved_loop_depth } => {
                self.interpreter.env.pop_frame();
                self.interpreter.loop_depth = saved_loop_depth;
            }
        }
    }
}

impl Deref for ScopedInterpreter<'_> {
    type Target = Interpreter;

    fn deref(&self) -> &Self::Target {
        self.interpreter
    }
}

impl DerefMut for ScopedInterpreter<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.interpreter
    }
}

impl Interpreter {
    /// Push a lexical scope, popped when the guard drops.
    pub fn scoped(&mut self) -> ScopedInterpreter<'_> {
        self.env.push_scope();
        ScopedInterpreter {
            interpreter: self,
            kind: ScopeKind::Block,
        }
    }

    /// Push a call frame, popped when the guard drops.
    ///
    /// Loops of the caller are not visible inside the frame, so `break`
    /// in a function body cannot escape into the calling loop.
    pub(super) fn framed(&mut self) -> ScopedInterpreter<'_> {
        self.env.push_frame();
        let saved_loop_depth = std::mem::take(&mut self.loop_depth);
        ScopedInterpreter {
            interpreter: self,
            kind: ScopeKind::Frame { saved_loop_depth },
        }
    }

    /// Run `f` with the loop depth raised by one.
    pub(super) fn in_loop<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        self.loop_depth += 1;
        let result = f(self);
        self.loop_depth -= 1;
        result
    }
}
