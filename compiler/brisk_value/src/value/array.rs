use std::cmp::Ordering;
use std::fmt;

use brisk_ir::{ArrayShape, TypeDesc};

use super::Value;
use crate::cast::cast;
use crate::errors::{index_out_of_bounds, type_mismatch, type_mismatch_msg, EvalError};
use crate::EvalResult;

/// Element storage of an array.
#[derive(Clone, Debug, PartialEq)]
pub enum ArrayStorage {
    /// Length fixed at creation.
    Fixed(Box<[Value]>),
    /// Growable.
    Dynamic(Vec<Value>),
}

/// A typed array container.
///
/// Every stored element has been cast to the element descriptor, so
/// readers never re-check element types.
#[derive(Clone, Debug, PartialEq)]
pub struct ArrayValue {
    element: TypeDesc,
    storage: ArrayStorage,
}

impl ArrayValue {
    /// A fresh array for `shape`: default-filled when fixed, empty otherwise.
    pub fn with_shape(shape: &ArrayShape) -> Self {
        let element = shape.element().clone();
        let storage = match shape.size() {
            Some(n) => ArrayStorage::Fixed((0..n).map(|_| Value::default_for(&element)).collect()),
            None => ArrayStorage::Dynamic(Vec::new()),
        };
        ArrayValue { element, storage }
    }

    /// Build a fixed array, casting every element.
    pub fn fixed(element: TypeDesc, values: Vec<Value>) -> Result<Self, EvalError> {
        let values = cast_all(&element, values)?;
        Ok(Self::from_trusted(element, values, true))
    }

    /// Build a dynamic array, casting every element.
    pub fn dynamic(element: TypeDesc, values: Vec<Value>) -> Result<Self, EvalError> {
        let values = cast_all(&element, values)?;
        Ok(Self::from_trusted(element, values, false))
    }

    /// Build from values already known to conform to `element`.
    pub(crate) fn from_trusted(element: TypeDesc, values: Vec<Value>, fixed: bool) -> Self {
        let storage = if fixed {
            ArrayStorage::Fixed(values.into_boxed_slice())
        } else {
            ArrayStorage::Dynamic(values)
        };
        ArrayValue { element, storage }
    }

    #[inline]
    pub fn element(&self) -> &TypeDesc {
        &self.element
    }

    #[inline]
    pub fn is_fixed(&self) -> bool {
        matches!(self.storage, ArrayStorage::Fixed(_))
    }

    /// The descriptor this array currently satisfies.
    pub fn shape(&self) -> ArrayShape {
        match &self.storage {
            ArrayStorage::Fixed(items) => ArrayShape::fixed(self.element.clone(), items.len()),
            ArrayStorage::Dynamic(_) => ArrayShape::dynamic(self.element.clone()),
        }
    }

    #[inline]
    pub fn values(&self) -> &[Value] {
        match &self.storage {
            ArrayStorage::Fixed(items) => items,
            ArrayStorage::Dynamic(items) => items,
        }
    }

    fn values_mut(&mut self) -> &mut [Value] {
        match &mut self.storage {
            ArrayStorage::Fixed(items) => items,
            ArrayStorage::Dynamic(items) => items,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values().is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.values().iter()
    }

    fn slot(&self, index: i64) -> Result<usize, EvalError> {
        usize::try_from(index)
            .ok()
            .filter(|&i| i < self.len())
            .ok_or_else(|| index_out_of_bounds(index, self.len()))
    }

    /// Bounds-checked read.
    pub fn get(&self, index: i64) -> EvalResult {
        let i = self.slot(index)?;
        Ok(self.values()[i].clone())
    }

    /// Bounds-checked write, casting to the element type.
    pub fn set(&mut self, index: i64, value: &Value) -> Result<(), EvalError> {
        let i = self.slot(index)?;
        let value = cast(value, &self.element)?;
        self.values_mut()[i] = value;
        Ok(())
    }

    fn growable(&mut self, op: &str) -> Result<&mut Vec<Value>, EvalError> {
        match &mut self.storage {
            ArrayStorage::Dynamic(items) => Ok(items),
            ArrayStorage::Fixed(_) => Err(type_mismatch_msg(
                "dynamic array",
                "fixed array",
                format!("cannot {op} a fixed-size array"),
            )),
        }
    }

    /// Append to a dynamic array.
    pub fn push(&mut self, value: &Value) -> Result<(), EvalError> {
        let value = cast(value, &self.element)?;
        self.growable("add to")?.push(value);
        Ok(())
    }

    /// Insert before `index`; `index == len` appends.
    pub fn insert(&mut self, index: i64, value: &Value) -> Result<(), EvalError> {
        let len = self.len();
        let i = usize::try_from(index)
            .ok()
            .filter(|&i| i <= len)
            .ok_or_else(|| index_out_of_bounds(index, len))?;
        let value = cast(value, &self.element)?;
        self.growable("insert into")?.insert(i, value);
        Ok(())
    }

    /// Remove and return the element at `index`.
    pub fn remove(&mut self, index: i64) -> EvalResult {
        let i = self.slot(index)?;
        Ok(self.growable("remove from")?.remove(i))
    }

    /// Drop every element of a dynamic array.
    pub fn clear(&mut self) -> Result<(), EvalError> {
        self.growable("clear")?.clear();
        Ok(())
    }

    /// Grow a dynamic array to `len` elements, padding with defaults.
    ///
    /// Never shrinks.
    pub fn expand(&mut self, len: usize) -> Result<(), EvalError> {
        let element = self.element.clone();
        let items = self.growable("expand")?;
        while items.len() < len {
            items.push(Value::default_for(&element));
        }
        Ok(())
    }

    /// Overwrite every element with its own deep copy of `value`.
    ///
    /// The copy reads `value`'s containers, so `value` must not share one
    /// with this array while its write lock is held; detach it first.
    pub fn fill(&mut self, value: &Value) -> Result<(), EvalError> {
        let value = cast(value, &self.element)?;
        for slot in self.values_mut() {
            *slot = value.deep_copy();
        }
        Ok(())
    }

    /// Sort in place, ascending or descending.
    ///
    /// Elements must be mutually comparable: all numeric, all strings, or
    /// all booleans. Nulls sort first.
    pub fn sort(&mut self, ascending: bool) -> Result<(), EvalError> {
        if let Some((a, b)) = first_incomparable(self.values()) {
            return Err(type_mismatch(a, b));
        }
        self.values_mut().sort_by(|a, b| {
            let ord = compare_sortable(a, b);
            if ascending {
                ord
            } else {
                ord.reverse()
            }
        });
        Ok(())
    }

    /// A detached copy with nested containers copied too.
    pub fn deep_copy(&self) -> ArrayValue {
        let values = self.values().iter().map(Value::deep_copy).collect();
        Self::from_trusted(self.element.clone(), values, self.is_fixed())
    }
}

impl fmt::Display for ArrayValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, v) in self.values().iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{v}")?;
        }
        f.write_str("]")
    }
}

fn cast_all(element: &TypeDesc, values: Vec<Value>) -> Result<Vec<Value>, EvalError> {
    values.iter().map(|v| cast(v, element)).collect()
}

#[derive(PartialEq)]
enum SortClass {
    Number,
    Text,
    Flag,
    Other,
}

fn sort_class(value: &Value) -> Option<SortClass> {
    match value {
        Value::Null => None,
        Value::Str(_) => Some(SortClass::Text),
        Value::Bool(_) => Some(SortClass::Flag),
        v if v.as_f64().is_some() => Some(SortClass::Number),
        _ => Some(SortClass::Other),
    }
}

fn first_incomparable(values: &[Value]) -> Option<(&'static str, &'static str)> {
    let mut seen: Option<(SortClass, &'static str)> = None;
    for v in values {
        let Some(class) = sort_class(v) else { continue };
        if class == SortClass::Other {
            return Some(("sortable value", v.type_name()));
        }
        match seen {
            None => seen = Some((class, v.type_name())),
            Some((ref prev, name)) if *prev != class => return Some((name, v.type_name())),
            Some(_) => {}
        }
    }
    None
}

fn compare_sortable(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Less,
        (_, Value::Null) => Ordering::Greater,
        (Value::Str(x), Value::Str(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            _ => Ordering::Equal,
        },
    }
}
