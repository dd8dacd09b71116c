//! Process-wide type alias table.
//!
//! Several script contexts (one per UI screen, each on its own thread) may
//! register and resolve aliases at the same time. The table is a `DashMap`,
//! so registration locks one shard and never blocks lookups of other names.
//! It is handed to interpreters as a [`SharedTypeRegistry`] handle rather
//! than living in a global.

use std::sync::Arc;

use brisk_ir::{ScalarKind, TypeDesc, TypeRef};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::errors::{invalid_type_definition, unknown_type, EvalError};

/// Shared handle to a [`TypeAliasRegistry`].
pub type SharedTypeRegistry = Arc<TypeAliasRegistry>;

/// Case-insensitive alias name → descriptor table.
#[derive(Debug, Default)]
pub struct TypeAliasRegistry {
    aliases: DashMap<String, TypeDesc>,
}

impl TypeAliasRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh registry behind a shareable handle.
    pub fn shared() -> SharedTypeRegistry {
        Arc::new(Self::new())
    }

    /// Register `name` as an alias for `desc`.
    ///
    /// Aliases are immutable: re-registering a name with an identical
    /// descriptor is a no-op, with a different one it fails. Scalar type
    /// keywords cannot be shadowed.
    pub fn register_type_alias(&self, name: &str, desc: TypeDesc) -> Result<(), EvalError> {
        if name.trim().is_empty() {
            return Err(invalid_type_definition("alias name cannot be empty"));
        }
        if ScalarKind::from_name(name).is_some() {
            return Err(invalid_type_definition(format!(
                "`{name}` is a built-in type name"
            )));
        }
        match self.aliases.entry(name.to_ascii_lowercase()) {
            Entry::Occupied(existing) if *existing.get() == desc => Ok(()),
            Entry::Occupied(existing) => Err(invalid_type_definition(format!(
                "alias `{name}` is already defined as {}",
                existing.get()
            ))),
            Entry::Vacant(slot) => {
                tracing::debug!(alias = name, ty = %desc, "registered type alias");
                slot.insert(desc);
                Ok(())
            }
        }
    }

    /// Look up an alias, ignoring case.
    pub fn get_type_alias(&self, name: &str) -> Option<TypeDesc> {
        self.aliases
            .get(&name.to_ascii_lowercase())
            .map(|entry| entry.value().clone())
    }

    pub fn has_type_alias(&self, name: &str) -> bool {
        self.aliases.contains_key(&name.to_ascii_lowercase())
    }

    /// Drop every alias. Meant for isolating test runs.
    pub fn clear(&self) {
        self.aliases.clear();
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    /// Resolve a source-level type to a descriptor.
    ///
    /// Alias names fall back to scalar keywords (`int`, `string`, ...);
    /// anything else is `UnknownType`.
    pub fn resolve(&self, ty: &TypeRef) -> Result<TypeDesc, EvalError> {
        match ty {
            TypeRef::Desc(desc) => Ok(desc.clone()),
            TypeRef::Alias(name) => self
                .get_type_alias(name)
                .or_else(|| ScalarKind::from_name(name).map(TypeDesc::Scalar))
                .ok_or_else(|| unknown_type(name)),
        }
    }
}

#[cfg(test)]
mod tests;
