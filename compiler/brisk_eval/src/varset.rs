//! Named variable groups with an internal/visible scope flag.
//!
//! A screen or script context declares its variables in sets. Internal
//! sets stay assignable from script code but are left out of anything a UI
//! enumerates. All access goes through the set's accessors, which keep
//! names unique under case-insensitive comparison.

use std::fmt;

use rustc_hash::FxHashMap;

use brisk_ir::TypeDesc;
use brisk_value::errors::{duplicate_name, malformed_literal, undefined_variable};
use brisk_value::{cast, EvalError, Value};

/// Visibility of a [`VarSet`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum VarScope {
    /// Reachable from script code only.
    Internal,
    /// Listed for the UI layer.
    #[default]
    Visible,
}

impl VarScope {
    /// Parse a scope code.
    ///
    /// Accepts `internal`/`visible` and the legacy hidden-flag letters
    /// `Y` (internal) and `N` (visible), ignoring case and surrounding
    /// whitespace.
    pub fn parse(code: &str) -> Result<Self, EvalError> {
        let code = code.trim();
        if code.eq_ignore_ascii_case("internal") || code.eq_ignore_ascii_case("y") {
            Ok(VarScope::Internal)
        } else if code.eq_ignore_ascii_case("visible") || code.eq_ignore_ascii_case("n") {
            Ok(VarScope::Visible)
        } else {
            Err(malformed_literal(format!(
                "invalid variable set scope `{code}` (expected internal, visible, Y or N)"
            )))
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            VarScope::Internal => "internal",
            VarScope::Visible => "visible",
        }
    }
}

impl fmt::Display for VarScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed variable inside a [`VarSet`].
#[derive(Clone, Debug, PartialEq)]
pub struct Var {
    name: String,
    ty: TypeDesc,
    default: Value,
    value: Value,
    set_name: Option<String>,
}

impl Var {
    /// A variable initialised to its type's default.
    pub fn new(name: impl Into<String>, ty: TypeDesc) -> Self {
        let default = Value::default_for(&ty);
        Var {
            name: name.into(),
            value: default.clone(),
            default,
            ty,
            set_name: None,
        }
    }

    /// A variable with an explicit default, cast to `ty`.
    pub fn with_default(
        name: impl Into<String>,
        ty: TypeDesc,
        default: &Value,
    ) -> Result<Self, EvalError> {
        let default = cast(default, &ty)?;
        Ok(Var {
            name: name.into(),
            value: default.clone(),
            default,
            ty,
            set_name: None,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> &TypeDesc {
        &self.ty
    }

    pub fn default_value(&self) -> &Value {
        &self.default
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Name of the owning set, once added to one.
    pub fn set_name(&self) -> Option<&str> {
        self.set_name.as_deref()
    }

    /// Qualified lookup key: `set.var`, lowercased.
    pub fn key(&self) -> String {
        match &self.set_name {
            Some(set) => format!("{}.{}", set.to_lowercase(), self.name.to_lowercase()),
            None => self.name.to_lowercase(),
        }
    }

    fn assign(&mut self, value: &Value) -> Result<(), EvalError> {
        self.value = cast(value, &self.ty)?;
        Ok(())
    }
}

/// A named group of variables.
#[derive(Clone, Debug)]
pub struct VarSet {
    name: String,
    scope: VarScope,
    /// Insertion order, for stable UI listings.
    vars: Vec<Var>,
    /// Lowercased name → index into `vars`.
    index: FxHashMap<String, usize>,
}

impl VarSet {
    /// Create an empty set from a scope code; see [`VarScope::parse`].
    pub fn new(name: impl Into<String>, scope_code: &str) -> Result<Self, EvalError> {
        Ok(Self::with_scope(name, VarScope::parse(scope_code)?))
    }

    pub fn with_scope(name: impl Into<String>, scope: VarScope) -> Self {
        VarSet {
            name: name.into(),
            scope,
            vars: Vec::new(),
            index: FxHashMap::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn scope(&self) -> VarScope {
        self.scope
    }

    #[inline]
    pub fn is_internal(&self) -> bool {
        self.scope == VarScope::Internal
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Add a variable; a name already present (ignoring case) fails.
    pub fn add_variable(&mut self, mut var: Var) -> Result<(), EvalError> {
        let key = var.name.to_lowercase();
        if self.index.contains_key(&key) {
            return Err(duplicate_name(&var.name));
        }
        var.set_name = Some(self.name.clone());
        self.index.insert(key, self.vars.len());
        self.vars.push(var);
        Ok(())
    }

    pub fn get_variable(&self, name: &str) -> Option<&Var> {
        self.index
            .get(&name.to_lowercase())
            .and_then(|&i| self.vars.get(i))
    }

    /// Current value of a variable.
    pub fn get_value(&self, name: &str) -> Option<Value> {
        self.get_variable(name).map(|v| v.value.clone())
    }

    /// Assign a variable, casting to its declared type.
    pub fn set_value(&mut self, name: &str, value: &Value) -> Result<(), EvalError> {
        let slot = self
            .index
            .get(&name.to_lowercase())
            .and_then(|&i| self.vars.get_mut(i));
        match slot {
            Some(var) => var.assign(value),
            None => Err(undefined_variable(name)),
        }
    }

    /// Restore every variable to its default.
    pub fn reset(&mut self) {
        for var in &mut self.vars {
            var.value = var.default.clone();
        }
    }

    pub fn variables(&self) -> impl Iterator<Item = &Var> {
        self.vars.iter()
    }

    /// `(name, value)` pairs in declaration order.
    pub fn snapshot(&self) -> Vec<(String, Value)> {
        self.vars
            .iter()
            .map(|v| (v.name.clone(), v.value.clone()))
            .collect()
    }
}

impl fmt::Display for VarSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "varset {} ({}, {} variable(s))",
            self.name,
            self.scope,
            self.vars.len()
        )
    }
}

/// The sets owned by one screen or script context.
#[derive(Clone, Debug, Default)]
pub struct VarSets {
    sets: Vec<VarSet>,
}

impl VarSets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a set; set names are unique ignoring case.
    pub fn add(&mut self, set: VarSet) -> Result<(), EvalError> {
        if self.get(&set.name).is_some() {
            return Err(duplicate_name(&set.name));
        }
        self.sets.push(set);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&VarSet> {
        self.sets.iter().find(|s| s.name.eq_ignore_ascii_case(name))
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut VarSet> {
        self.sets
            .iter_mut()
            .find(|s| s.name.eq_ignore_ascii_case(name))
    }

    /// Resolve a `set.var` key.
    pub fn find_variable(&self, key: &str) -> Option<&Var> {
        let (set, var) = key.split_once('.')?;
        self.get(set)?.get_variable(var)
    }

    /// Every set, internal ones included.
    pub fn all(&self) -> impl Iterator<Item = &VarSet> {
        self.sets.iter()
    }

    /// Sets a UI may list.
    pub fn visible(&self) -> impl Iterator<Item = &VarSet> {
        self.sets.iter().filter(|s| !s.is_internal())
    }
}

#[cfg(test)]
mod tests;
