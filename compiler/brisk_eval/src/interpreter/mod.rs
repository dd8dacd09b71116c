//! Tree-walking interpreter for Brisk statement and expression trees.
//!
//! # Evaluation model
//!
//! - [`Interpreter::exec_stmt`] and [`Interpreter::eval_expr`] are the only
//!   entry points into node evaluation; each matches exhaustively on the
//!   node kind
//! - Statements report how control leaves them through [`ControlSignal`];
//!   `Return` unwinds every enclosing block until a call frame consumes it
//! - Errors pick up the line of the innermost node that failed
//!
//! # Scoping
//!
//! Blocks push a lexical scope; user calls push a call frame that sees
//! globals but not the caller's locals. Both are released by RAII guards
//! (see `scope_guard`), so early returns through `?` never leak scopes.

mod assign;
mod builder;
mod call;
mod expr;
mod scope_guard;
mod stmt;

use std::sync::Arc;

use rustc_hash::FxHashMap;

use brisk_ir::{FunctionDecl, Stmt};
use brisk_value::{EvalError, EvalResult, SharedTypeRegistry, Value};

use crate::builtins::SharedBuiltins;
use crate::diagnostics::{CallStack, DiagnosticCounters, EvalCounters};
use crate::environment::Environment;
use crate::eval_mode::{EvalMode, ModeState};
use crate::frontend::ScriptFrontend;
use crate::output::SharedOutput;
use crate::store::SharedVariableStore;

pub use builder::InterpreterBuilder;
pub use scope_guard::ScopedInterpreter;

/// How control leaves a statement.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum ControlSignal {
    /// Fall through to the next statement.
    #[default]
    Normal,
    /// Unwind to the nearest call frame with this value.
    Return(Value),
    /// Leave the innermost loop.
    Break,
    /// Skip to the next iteration of the innermost loop.
    Continue,
}

impl ControlSignal {
    #[inline]
    pub fn is_normal(&self) -> bool {
        matches!(self, Self::Normal)
    }
}

/// A single-threaded evaluator.
///
/// Shared registries (type aliases, builtins, variable stores, output)
/// are `Arc` handles, so several interpreters may run side by side on
/// different threads against the same host state.
pub struct Interpreter {
    env: Environment,
    functions: FxHashMap<String, Arc<FunctionDecl>>,
    types: SharedTypeRegistry,
    builtins: SharedBuiltins,
    /// Attached variable stores, keyed by lowercase namespace.
    stores: FxHashMap<String, SharedVariableStore>,
    output: SharedOutput,
    diagnostics: Option<Arc<DiagnosticCounters>>,
    call_stack: CallStack,
    mode: EvalMode,
    mode_state: ModeState,
    /// Enclosing loops in the current call frame.
    loop_depth: usize,
}

impl Interpreter {
    /// An interpreter with default registries, writing to stdout.
    pub fn new() -> Self {
        InterpreterBuilder::new().build()
    }

    pub fn builder() -> InterpreterBuilder {
        InterpreterBuilder::new()
    }

    /// Run a top-level program.
    ///
    /// Top-level statements share the global scope. A top-level `return`
    /// ends the program early with its value; otherwise the result is null.
    pub fn execute(&mut self, program: &[Stmt]) -> EvalResult {
        tracing::debug!(statements = program.len(), mode = ?self.mode, "execute program");
        match self.exec_stmts(program)? {
            ControlSignal::Return(value) => Ok(value),
            // Stray break/continue already failed as `InvalidControlFlow`.
            ControlSignal::Normal | ControlSignal::Break | ControlSignal::Continue => {
                Ok(Value::Null)
            }
        }
    }

    /// Parse `source` with a host front end, then run it.
    pub fn execute_source(&mut self, frontend: &dyn ScriptFrontend, source: &str) -> EvalResult {
        let program = frontend.parse(source)?;
        self.execute(&program)
    }

    /// Run statements in a fresh lexical scope.
    pub fn execute_block(&mut self, stmts: &[Stmt]) -> Result<ControlSignal, EvalError> {
        self.scoped().exec_stmts(stmts)
    }

    /// Run statements in the current scope, stopping at the first signal
    /// other than `Normal`.
    fn exec_stmts(&mut self, stmts: &[Stmt]) -> Result<ControlSignal, EvalError> {
        for stmt in stmts {
            let signal = self.exec_stmt(stmt)?;
            if !signal.is_normal() {
                return Ok(signal);
            }
        }
        Ok(ControlSignal::Normal)
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    pub fn env_mut(&mut self) -> &mut Environment {
        &mut self.env
    }

    pub fn types(&self) -> &SharedTypeRegistry {
        &self.types
    }

    pub fn builtins(&self) -> &SharedBuiltins {
        &self.builtins
    }

    pub fn output(&self) -> &SharedOutput {
        &self.output
    }

    pub fn mode(&self) -> &EvalMode {
        &self.mode
    }

    /// Execution counters, when the mode collects them.
    pub fn counters(&self) -> Option<&EvalCounters> {
        self.mode_state.counters()
    }

    /// Number of user-function calls currently on the stack.
    pub fn call_depth(&self) -> usize {
        self.call_stack.depth()
    }

    /// The store attached under `namespace`, if any.
    pub fn store(&self, namespace: &str) -> Option<&SharedVariableStore> {
        self.stores.get(&namespace.to_lowercase())
    }

    /// Seed or replace a global variable.
    pub fn define_global(&mut self, name: &str, value: Value) {
        self.env.define_global(name, value);
    }

    pub fn has_function(&self, name: &str) -> bool {
        self.functions.contains_key(&name.to_lowercase())
    }

    /// Attached store for a dotted name such as `ui.count`, split into the
    /// store and the variable name.
    fn store_for_dotted<'n>(&self, name: &'n str) -> Option<(SharedVariableStore, &'n str)> {
        let (namespace, var) = name.split_once('.')?;
        self.store(namespace).map(|store| (Arc::clone(store), var))
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;
