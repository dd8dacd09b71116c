use std::fmt;

use brisk_ir::RecordShape;

use super::Value;
use crate::cast::cast;
use crate::errors::{
    duplicate_name, field_not_found, type_mismatch_msg, EvalError, EvalErrorKind,
};
use crate::EvalResult;

/// A record container.
///
/// A record built from a [`RecordShape`] keeps exactly the shape's fields,
/// in order, and casts every write to the field's type. An ad hoc record
/// (from a record literal) has no shape and accepts new fields on write.
/// Field names are unique and matched case-insensitively either way.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordValue {
    shape: Option<RecordShape>,
    fields: Vec<(String, Value)>,
}

impl RecordValue {
    /// A record of `shape` with every field at its default.
    pub fn with_shape(shape: RecordShape) -> Self {
        let fields = shape
            .fields()
            .iter()
            .map(|f| (f.name.clone(), Value::default_for(&f.ty)))
            .collect();
        RecordValue {
            shape: Some(shape),
            fields,
        }
    }

    /// A shaped record from values already cast, in shape order.
    pub(crate) fn from_trusted(shape: RecordShape, values: Vec<Value>) -> Self {
        let fields = shape
            .fields()
            .iter()
            .map(|f| f.name.clone())
            .zip(values)
            .collect();
        RecordValue {
            shape: Some(shape),
            fields,
        }
    }

    /// An unshaped record. Duplicate names (ignoring case) are rejected.
    pub fn ad_hoc<N: Into<String>>(
        fields: impl IntoIterator<Item = (N, Value)>,
    ) -> Result<Self, EvalError> {
        let mut out: Vec<(String, Value)> = Vec::new();
        for (name, value) in fields {
            let name = name.into();
            if out.iter().any(|(n, _)| n.eq_ignore_ascii_case(&name)) {
                return Err(duplicate_name(&name));
            }
            out.push((name, value));
        }
        Ok(RecordValue {
            shape: None,
            fields: out,
        })
    }

    #[inline]
    pub fn shape(&self) -> Option<&RecordShape> {
        self.shape.as_ref()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.fields
            .iter()
            .position(|(n, _)| n.eq_ignore_ascii_case(name))
    }

    fn owner(&self) -> String {
        match &self.shape {
            Some(shape) => shape.to_string(),
            None => "record".to_string(),
        }
    }

    /// Case-insensitive lookup without failing.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.position(name).map(|i| &self.fields[i].1)
    }

    /// Case-insensitive read; `FieldNotFound` when absent.
    pub fn get(&self, name: &str) -> EvalResult {
        self.field(name)
            .cloned()
            .ok_or_else(|| field_not_found(name, self.owner()))
    }

    /// Case-insensitive write.
    ///
    /// Shaped records fail with `FieldNotFound` for unknown fields and
    /// `TypeMismatch` when the value does not cast to the field's type.
    pub fn set(&mut self, name: &str, value: &Value) -> Result<(), EvalError> {
        let shape = match &self.shape {
            Some(shape) => shape,
            None => {
                match self.position(name) {
                    Some(i) => self.fields[i].1 = value.clone(),
                    None => self.fields.push((name.to_string(), value.clone())),
                }
                return Ok(());
            }
        };
        let Some((i, field)) = shape.field(name) else {
            return Err(field_not_found(name, shape));
        };
        let converted = cast(value, &field.ty).map_err(|err| {
            if matches!(err.kind, EvalErrorKind::TypeMismatch { .. }) {
                err
            } else {
                type_mismatch_msg(
                    &field.ty,
                    value.type_name(),
                    format!(
                        "cannot assign {} to field `{}` of type {}: {}",
                        value.type_name(),
                        field.name,
                        field.ty,
                        err.message
                    ),
                )
            }
        })?;
        self.fields[i].1 = converted;
        Ok(())
    }

    /// A detached copy with nested containers copied too.
    pub fn deep_copy(&self) -> RecordValue {
        RecordValue {
            shape: self.shape.clone(),
            fields: self
                .fields
                .iter()
                .map(|(n, v)| (n.clone(), v.deep_copy()))
                .collect(),
        }
    }
}

impl fmt::Display for RecordValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (name, value)) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name}: {value}")?;
        }
        f.write_str("}")
    }
}
