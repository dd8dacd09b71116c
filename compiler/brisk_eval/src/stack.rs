//! Stack growth for deeply recursive evaluation.
//!
//! Script recursion maps directly onto native recursion in the evaluator,
//! so nested calls and deeply nested expressions grow the stack on demand
//! instead of overflowing it.

/// Grow when less than this much stack remains.
const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated stack segment.
const GROWTH: usize = 2 * 1024 * 1024;

/// Run `f`, first growing the stack if it is close to exhausted.
#[inline]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, GROWTH, f)
}
