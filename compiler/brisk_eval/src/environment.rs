//! Variable scoping for the interpreter.
//!
//! A stack of call frames, each a stack of lexical scopes, over one global
//! scope. Lookup walks the current frame innermost-out and then the
//! globals; caller frames are never visible to a callee. Names are
//! case-insensitive and stored lowercased.

use rustc_hash::FxHashMap;

use brisk_ir::TypeDesc;
use brisk_value::errors::{constant_reassignment, duplicate_name, undefined_variable};
use brisk_value::{coerce, EvalError, Value};

/// Whether a variable binding can be reassigned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mutability {
    /// Declared with `var`.
    Mutable,
    /// Declared with `const`.
    Constant,
}

impl Mutability {
    #[inline]
    pub fn is_mutable(self) -> bool {
        matches!(self, Mutability::Mutable)
    }
}

#[derive(Clone, Debug)]
struct Binding {
    value: Value,
    /// Declared type; assignments are cast to it. `None` for untyped vars.
    declared: Option<TypeDesc>,
    mutability: Mutability,
}

/// A single lexical scope.
#[derive(Clone, Debug, Default)]
struct Scope {
    bindings: FxHashMap<String, Binding>,
}

#[inline]
fn key(name: &str) -> String {
    name.to_lowercase()
}

/// Scope stack for one interpreter.
#[derive(Clone, Debug)]
pub struct Environment {
    globals: Scope,
    /// Call frames, innermost last. The first frame is the top-level script;
    /// its scopes sit above the globals.
    frames: Vec<Vec<Scope>>,
}

impl Environment {
    pub fn new() -> Self {
        Environment {
            globals: Scope::default(),
            frames: vec![Vec::new()],
        }
    }

    /// Number of live call frames, the top level included.
    pub fn frame_depth(&self) -> usize {
        self.frames.len()
    }

    /// Number of lexical scopes in the current frame.
    pub fn scope_depth(&self) -> usize {
        self.frames.last().map_or(0, Vec::len)
    }

    #[inline]
    pub fn push_scope(&mut self) {
        if let Some(frame) = self.frames.last_mut() {
            frame.push(Scope::default());
        }
    }

    #[inline]
    pub fn pop_scope(&mut self) {
        if let Some(frame) = self.frames.last_mut() {
            frame.pop();
        }
    }

    /// Enter a function body: a fresh frame with one scope for parameters.
    pub fn push_frame(&mut self) {
        self.frames.push(vec![Scope::default()]);
        tracing::debug!(depth = self.frames.len(), "push call frame");
    }

    /// Leave a function body. The top-level frame is never popped.
    pub fn pop_frame(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
            tracing::debug!(depth = self.frames.len(), "pop call frame");
        }
    }

    fn current_scope_mut(&mut self) -> &mut Scope {
        match self.frames.last_mut().and_then(|frame| frame.last_mut()) {
            Some(scope) => scope,
            None => &mut self.globals,
        }
    }

    fn find(&self, key: &str) -> Option<&Binding> {
        self.frames
            .last()
            .into_iter()
            .flat_map(|frame| frame.iter().rev())
            .find_map(|scope| scope.bindings.get(key))
            .or_else(|| self.globals.bindings.get(key))
    }

    fn find_mut(&mut self, key: &str) -> Option<&mut Binding> {
        let local = self
            .frames
            .last_mut()
            .into_iter()
            .flat_map(|frame| frame.iter_mut().rev())
            .find_map(|scope| scope.bindings.get_mut(key));
        match local {
            Some(binding) => Some(binding),
            None => self.globals.bindings.get_mut(key),
        }
    }

    /// Define a variable in the current scope.
    ///
    /// The value is coerced to `declared` when given. Redefining a name in
    /// the same scope fails; shadowing an outer scope is allowed.
    pub fn define(
        &mut self,
        name: &str,
        value: Value,
        declared: Option<TypeDesc>,
        mutability: Mutability,
    ) -> Result<(), EvalError> {
        let value = match &declared {
            Some(ty) => coerce(&value, ty)?,
            None => value,
        };
        let scope = self.current_scope_mut();
        let key = key(name);
        if scope.bindings.contains_key(&key) {
            return Err(duplicate_name(name));
        }
        scope.bindings.insert(
            key,
            Binding {
                value,
                declared,
                mutability,
            },
        );
        Ok(())
    }

    /// Define or replace a global. Used by hosts to seed scripts.
    pub fn define_global(&mut self, name: &str, value: Value) {
        self.globals.bindings.insert(
            key(name),
            Binding {
                value,
                declared: None,
                mutability: Mutability::Mutable,
            },
        );
    }

    pub fn lookup(&self, name: &str) -> Option<Value> {
        self.find(&key(name)).map(|b| b.value.clone())
    }

    pub fn is_defined(&self, name: &str) -> bool {
        self.find(&key(name)).is_some()
    }

    pub fn declared_type(&self, name: &str) -> Option<TypeDesc> {
        self.find(&key(name)).and_then(|b| b.declared.clone())
    }

    /// Assign to the nearest visible binding, casting to its declared type.
    pub fn assign(&mut self, name: &str, value: &Value) -> Result<(), EvalError> {
        let Some(binding) = self.find_mut(&key(name)) else {
            return Err(undefined_variable(name));
        };
        if !binding.mutability.is_mutable() {
            return Err(constant_reassignment(name));
        }
        binding.value = match &binding.declared {
            Some(ty) => coerce(value, ty)?,
            None => value.clone(),
        };
        Ok(())
    }

    /// Global bindings, in no particular order.
    pub fn globals(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.globals
            .bindings
            .iter()
            .map(|(name, binding)| (name.as_str(), &binding.value))
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;
