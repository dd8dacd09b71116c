//! Brisk Eval - the tree-walking evaluator for Brisk scripts.
//!
//! # Architecture
//!
//! - [`Interpreter`]: walks `brisk_ir` statement and expression trees,
//!   one exhaustive `match` per node family
//! - [`Environment`]: case-insensitive lexical scopes plus call frames
//! - [`BuiltinRegistry`]: name → function table for `str.*`, `array.*`
//!   and `queue.*`, open to host-registered namespaces
//! - [`VariableStore`]: the thread-safe variable table shared with a UI layer
//! - [`VarSet`]: named, scoped variable groups
//!
//! # Re-exports
//!
//! Value and error types come from `brisk_value`:
//! - `Value`, `ArrayValue`, `RecordValue`, `BitViewValue`
//! - `EvalError`, `EvalErrorKind`, `EvalResult`

mod builtins;
mod diagnostics;
mod environment;
mod eval_mode;
mod frontend;
pub mod interpreter;
mod operators;
mod output;
mod stack;
mod store;
mod tracing_setup;
mod unary_operators;
mod varset;

pub use brisk_value::{
    cast, coerce, ArrayValue, BitViewValue, EvalBacktrace, EvalError, EvalErrorKind, EvalResult,
    RecordValue, SharedTypeRegistry, TypeAliasRegistry, Value,
};

pub use builtins::{BuiltinContext, BuiltinFn, BuiltinRegistry, Namespace, SharedBuiltins};
pub use diagnostics::{CallFrame, CallStack, DiagnosticCounters, EvalCounters};
pub use environment::{Environment, Mutability};
pub use eval_mode::{EvalMode, ModeState};
pub use frontend::ScriptFrontend;
pub use interpreter::{ControlSignal, Interpreter, InterpreterBuilder, ScopedInterpreter};
pub use operators::evaluate_binary;
pub use output::{buffer_output, silent_output, stdout_output, BufferOutput, OutputSink, SharedOutput};
pub use stack::ensure_sufficient_stack;
pub use store::{SharedVariableStore, VariableStore};
pub use tracing_setup::init_tracing;
pub use unary_operators::evaluate_unary;
pub use varset::{Var, VarScope, VarSet, VarSets};
