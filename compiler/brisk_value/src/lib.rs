//! Brisk Value - runtime values for the Brisk script engine.
//!
//! This crate provides:
//! - [`Value`]: the closed set of runtime values, including shared
//!   array/record containers and bit views over integers
//! - [`cast`]: the conversion rules between values and type descriptors
//! - [`TypeAliasRegistry`]: the concurrent name → descriptor table
//! - [`EvalError`]: the single error type that crosses the engine boundary

pub mod cast;
pub mod errors;
mod registry;
mod value;

pub use cast::{cast, cast_scalar, coerce};
pub use errors::{
    BacktraceFrame, EvalBacktrace, EvalError, EvalErrorKind, EvalResult,
};
pub use registry::{SharedTypeRegistry, TypeAliasRegistry};
pub use value::{ArrayStorage, ArrayValue, BitViewValue, RecordValue, Shared, Value};
