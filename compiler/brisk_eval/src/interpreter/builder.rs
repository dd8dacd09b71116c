//! `InterpreterBuilder` for creating Interpreter instances with various configurations.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use brisk_value::{SharedTypeRegistry, TypeAliasRegistry};

use super::Interpreter;
use crate::builtins::{BuiltinRegistry, SharedBuiltins};
use crate::diagnostics::{CallStack, DiagnosticCounters};
use crate::environment::Environment;
use crate::eval_mode::{EvalMode, ModeState};
use crate::output::{stdout_output, SharedOutput};
use crate::store::SharedVariableStore;

/// Builder for creating Interpreter instances.
///
/// Every handle left unset gets a fresh default: an empty alias registry,
/// the standard builtin namespaces, and stdout output.
#[derive(Default)]
pub struct InterpreterBuilder {
    mode: EvalMode,
    env: Option<Environment>,
    types: Option<SharedTypeRegistry>,
    builtins: Option<SharedBuiltins>,
    output: Option<SharedOutput>,
    diagnostics: Option<Arc<DiagnosticCounters>>,
    max_call_depth: Option<usize>,
    stores: FxHashMap<String, SharedVariableStore>,
}

impl InterpreterBuilder {
    /// Create a new builder with default `Interpret` mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the evaluation mode.
    ///
    /// Controls the call-depth limit and whether execution counters run.
    #[must_use]
    pub fn mode(mut self, mode: EvalMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the initial environment.
    #[must_use]
    pub fn env(mut self, env: Environment) -> Self {
        self.env = Some(env);
        self
    }

    /// Share a type alias registry with other interpreters or the host.
    #[must_use]
    pub fn type_registry(mut self, types: SharedTypeRegistry) -> Self {
        self.types = Some(types);
        self
    }

    /// Use a builtin registry, typically one with host functions registered.
    #[must_use]
    pub fn builtins(mut self, builtins: SharedBuiltins) -> Self {
        self.builtins = Some(builtins);
        self
    }

    /// Set where `print` and warnings go.
    #[must_use]
    pub fn output(mut self, output: SharedOutput) -> Self {
        self.output = Some(output);
        self
    }

    /// Count builtin calls and warnings into shared counters.
    #[must_use]
    pub fn diagnostics(mut self, counters: Arc<DiagnosticCounters>) -> Self {
        self.diagnostics = Some(counters);
        self
    }

    /// Override the mode's call-depth limit.
    #[must_use]
    pub fn max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = Some(depth);
        self
    }

    /// Expose a variable store to scripts as `<namespace>.<name>`.
    #[must_use]
    pub fn attach_store(mut self, namespace: &str, store: SharedVariableStore) -> Self {
        self.stores.insert(namespace.to_lowercase(), store);
        self
    }

    /// Build the interpreter.
    pub fn build(self) -> Interpreter {
        let max_depth = self.max_call_depth.or_else(|| self.mode.max_call_depth());
        Interpreter {
            env: self.env.unwrap_or_default(),
            functions: FxHashMap::default(),
            types: self.types.unwrap_or_else(TypeAliasRegistry::shared),
            builtins: self
                .builtins
                .unwrap_or_else(BuiltinRegistry::shared_defaults),
            stores: self.stores,
            output: self.output.unwrap_or_else(stdout_output),
            diagnostics: self.diagnostics,
            call_stack: CallStack::new(max_depth),
            mode_state: ModeState::new(&self.mode),
            mode: self.mode,
            loop_depth: 0,
        }
    }
}
