//! Evaluation modes.
//!
//! The host picks a mode when building an interpreter. The mode decides
//! policy (call-depth limit, whether execution counters run) through
//! methods, so the evaluator never matches on the mode itself.

use crate::diagnostics::EvalCounters;

/// Evaluation mode.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum EvalMode {
    /// Normal script execution for a host application.
    #[default]
    Interpret,
    /// Running script tests: bounded call depth, counters enabled.
    TestRun,
}

impl EvalMode {
    /// Maximum call depth, or `None` to rely on stack growth alone.
    #[inline]
    pub fn max_call_depth(&self) -> Option<usize> {
        match self {
            Self::Interpret => None,
            Self::TestRun => Some(256),
        }
    }

    /// Whether statement/call counters are collected by default.
    #[inline]
    pub fn counts_execution(&self) -> bool {
        matches!(self, Self::TestRun)
    }
}

/// Per-mode mutable state kept alongside the [`EvalMode`].
#[derive(Debug, Default)]
pub struct ModeState {
    counters: Option<EvalCounters>,
}

impl ModeState {
    pub fn new(mode: &EvalMode) -> Self {
        Self {
            counters: mode.counts_execution().then(EvalCounters::default),
        }
    }

    /// Turn on counters regardless of mode.
    pub fn enable_counters(&mut self) {
        if self.counters.is_none() {
            self.counters = Some(EvalCounters::default());
        }
    }

    #[inline]
    pub fn counters(&self) -> Option<&EvalCounters> {
        self.counters.as_ref()
    }

    #[inline]
    pub fn count_statement(&mut self) {
        if let Some(c) = &mut self.counters {
            c.statements = c.statements.saturating_add(1);
        }
    }

    #[inline]
    pub fn count_expression(&mut self) {
        if let Some(c) = &mut self.counters {
            c.expressions = c.expressions.saturating_add(1);
        }
    }

    #[inline]
    pub fn count_call(&mut self) {
        if let Some(c) = &mut self.counters {
            c.function_calls = c.function_calls.saturating_add(1);
        }
    }

    #[inline]
    pub fn count_builtin_call(&mut self) {
        if let Some(c) = &mut self.counters {
            c.builtin_calls = c.builtin_calls.saturating_add(1);
        }
    }
}
