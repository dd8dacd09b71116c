//! Builtin function dispatch.
//!
//! Builtins are addressed by lowercase dotted names (`str.trim`,
//! `array.add`). Each namespace contributes a static `(name, fn)` table and
//! the prefixes it owns; [`BuiltinRegistry`] flattens every table into one
//! hash map at construction, so dispatch is a single lookup.
//!
//! Handlers receive their arguments as an untyped slice and check arity
//! and types themselves (see `args`). They are plain functions with no
//! shared state; the only side channel is [`BuiltinContext::warn`].

pub(crate) mod args;
mod array;
mod queue;
mod string;

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use brisk_value::errors::{unknown_builtin, unknown_builtin_in};
use brisk_value::{EvalResult, Value};

use crate::diagnostics::DiagnosticCounters;
use crate::output::OutputSink;

/// Signature every builtin implements.
pub type BuiltinFn = fn(&BuiltinContext<'_>, &[Value]) -> EvalResult;

/// Shared handle to a [`BuiltinRegistry`].
pub type SharedBuiltins = Arc<BuiltinRegistry>;

/// What a builtin may touch besides its arguments.
#[derive(Clone, Copy, Debug, Default)]
pub struct BuiltinContext<'a> {
    sink: Option<&'a OutputSink>,
    counters: Option<&'a DiagnosticCounters>,
}

impl<'a> BuiltinContext<'a> {
    pub fn new(sink: Option<&'a OutputSink>, counters: Option<&'a DiagnosticCounters>) -> Self {
        BuiltinContext { sink, counters }
    }

    /// A context with nowhere to report; warnings only reach `tracing`.
    pub fn detached() -> Self {
        Self::default()
    }

    /// Report a recoverable problem. The builtin carries on with a default.
    pub fn warn(&self, message: &str) {
        match self.sink {
            Some(sink) => sink.warn(message),
            None => tracing::warn!("{message}"),
        }
        if let Some(counters) = self.counters {
            counters.record_warning();
        }
    }
}

/// A static group of builtins sharing a name prefix.
pub struct Namespace {
    pub name: &'static str,
    pub prefixes: &'static [&'static str],
    pub functions: &'static [(&'static str, BuiltinFn)],
}

impl Namespace {
    /// Whether `name` falls under one of this namespace's prefixes.
    pub fn handles(&self, name: &str) -> bool {
        self.prefixes.iter().any(|p| name.starts_with(p))
    }
}

impl fmt::Debug for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Namespace")
            .field("name", &self.name)
            .field("prefixes", &self.prefixes)
            .field("functions", &self.functions.len())
            .finish()
    }
}

/// Name → builtin table.
pub struct BuiltinRegistry {
    namespaces: Vec<&'static Namespace>,
    functions: FxHashMap<String, BuiltinFn>,
}

impl BuiltinRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        BuiltinRegistry {
            namespaces: Vec::new(),
            functions: FxHashMap::default(),
        }
    }

    /// The standard library: `str.*`/`string.*`, `array.*`, `queue.*`.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register_namespace(&string::NAMESPACE);
        registry.register_namespace(&array::NAMESPACE);
        registry.register_namespace(&queue::NAMESPACE);
        registry
    }

    pub fn shared_defaults() -> SharedBuiltins {
        Arc::new(Self::with_defaults())
    }

    pub fn register_namespace(&mut self, namespace: &'static Namespace) {
        for (name, f) in namespace.functions {
            self.functions.insert((*name).to_string(), *f);
        }
        self.namespaces.push(namespace);
    }

    /// Add or replace a single builtin. `name` is stored lowercased.
    pub fn register(&mut self, name: &str, f: BuiltinFn) {
        self.functions.insert(name.to_lowercase(), f);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(&name.to_lowercase())
    }

    /// Name of the namespace owning `name`'s prefix, if any.
    pub fn handles(&self, name: &str) -> Option<&'static str> {
        let name = name.to_lowercase();
        self.namespaces
            .iter()
            .find(|ns| ns.handles(&name))
            .map(|ns| ns.name)
    }

    /// Whether a call to `name` should be routed here rather than to a
    /// user function.
    pub fn claims(&self, name: &str) -> bool {
        self.contains(name) || self.handles(name).is_some()
    }

    /// Call a builtin with no output sink or counters.
    pub fn dispatch(&self, name: &str, args: &[Value]) -> EvalResult {
        self.dispatch_with(&BuiltinContext::detached(), name, args)
    }

    #[tracing::instrument(level = "debug", skip(self, ctx, args), fields(argc = args.len()))]
    pub fn dispatch_with(&self, ctx: &BuiltinContext<'_>, name: &str, args: &[Value]) -> EvalResult {
        let key = name.to_lowercase();
        if let Some(f) = self.functions.get(&key) {
            if let Some(counters) = ctx.counters {
                counters.record_builtin_call();
            }
            return f(ctx, args);
        }
        match self.namespaces.iter().find(|ns| ns.handles(&key)) {
            Some(ns) => Err(unknown_builtin_in(ns.name, &key)),
            None => Err(unknown_builtin(&key)),
        }
    }

    /// Every registered name, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for BuiltinRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl fmt::Debug for BuiltinRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuiltinRegistry")
            .field("namespaces", &self.namespaces)
            .field("functions", &self.functions.len())
            .finish()
    }
}
