//! Diagnostic infrastructure for the evaluator.
//!
//! - [`CallStack`]: live user-function frames, with the depth check built
//!   into `push` and backtrace capture for errors escaping a call
//! - [`EvalCounters`]: per-interpreter execution counters
//! - [`DiagnosticCounters`]: process-wide atomic counters shared by every
//!   interpreter that holds the same handle

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use brisk_ir::Line;
use brisk_value::errors::recursion_limit;
use brisk_value::{BacktraceFrame, EvalBacktrace, EvalError};

/// One live call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallFrame {
    pub name: String,
    /// Line of the call site, not the definition.
    pub call_line: Line,
}

/// Live call stack of user-function calls.
#[derive(Clone, Debug, Default)]
pub struct CallStack {
    frames: Vec<CallFrame>,
    max_depth: Option<usize>,
}

impl CallStack {
    /// `max_depth` of `None` means unlimited.
    pub fn new(max_depth: Option<usize>) -> Self {
        Self {
            frames: Vec::new(),
            max_depth,
        }
    }

    /// Push a frame, failing with `RecursionLimit` instead of exceeding
    /// the depth limit. Nothing is pushed on failure.
    pub fn push(&mut self, frame: CallFrame) -> Result<(), EvalError> {
        if let Some(max) = self.max_depth {
            if self.frames.len() >= max {
                return Err(recursion_limit(max));
            }
        }
        self.frames.push(frame);
        Ok(())
    }

    pub fn pop(&mut self) {
        debug_assert!(!self.frames.is_empty(), "CallStack::pop on empty stack");
        self.frames.pop();
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Snapshot the stack, outermost call first.
    pub fn capture(&self) -> EvalBacktrace {
        EvalBacktrace::new(
            self.frames
                .iter()
                .map(|f| BacktraceFrame {
                    name: f.name.clone(),
                    line: Some(f.call_line),
                })
                .collect(),
        )
    }

    /// Attach a snapshot to `err` unless the stack is empty.
    pub fn attach_backtrace(&self, err: EvalError) -> EvalError {
        if self.frames.is_empty() {
            return err;
        }
        err.with_backtrace(self.capture())
    }
}

/// Execution counters for one interpreter.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EvalCounters {
    pub statements: u64,
    pub expressions: u64,
    pub function_calls: u64,
    pub builtin_calls: u64,
}

impl fmt::Display for EvalCounters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "statements={} expressions={} calls={} builtins={}",
            self.statements, self.expressions, self.function_calls, self.builtin_calls
        )
    }
}

/// Process-wide builtin counters.
///
/// Script contexts running on different threads update these
/// concurrently, so every field is atomic.
#[derive(Debug, Default)]
pub struct DiagnosticCounters {
    builtin_calls: AtomicU64,
    warnings: AtomicU64,
}

impl DiagnosticCounters {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    #[inline]
    pub fn record_builtin_call(&self) {
        self.builtin_calls.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_warning(&self) {
        self.warnings.fetch_add(1, Ordering::Relaxed);
    }

    pub fn builtin_calls(&self) -> u64 {
        self.builtin_calls.load(Ordering::Relaxed)
    }

    pub fn warnings(&self) -> u64 {
        self.warnings.load(Ordering::Relaxed)
    }

    /// Zero both counters.
    pub fn reset(&self) {
        self.builtin_calls.store(0, Ordering::Relaxed);
        self.warnings.store(0, Ordering::Relaxed);
    }
}
