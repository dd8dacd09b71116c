//! Assignment to variables, fields and element slots.
//!
//! Records and arrays are shared containers, so writing a field or slot
//! mutates them in place. Bit views are plain values: changing one field
//! yields a new view that is written back to the place it was read from
//! (a variable, a record field, or an array slot).

use brisk_ir::{Expr, ExprKind};
use brisk_value::errors::type_mismatch_msg;
use brisk_value::{cast, EvalError, RecordValue, Shared, Value};

use super::expr::index_int;
use super::Interpreter;

impl Interpreter {
    /// Assign to a script variable, else to a dotted store variable.
    pub(super) fn assign_variable(&mut self, name: &str, value: &Value) -> Result<(), EvalError> {
        if !self.env.is_defined(name) {
            if let Some((store, var)) = self.store_for_dotted(name) {
                store.set(var, value.clone());
                return Ok(());
            }
        }
        self.env.assign(name, value)
    }

    pub(super) fn exec_property_assign(
        &mut self,
        object: &Expr,
        property: &str,
        value: &Expr,
    ) -> Result<(), EvalError> {
        if let Some((_, store)) = self.store_for_object(object) {
            let value = self.eval_expr(value)?;
            store.set(property, value);
            return Ok(());
        }
        let target = self.eval_expr(object)?;
        let value = self.eval_expr(value)?;
        self.store_property(object, target, property, value)
    }

    pub(super) fn exec_index_assign(
        &mut self,
        target: &Expr,
        index: &Expr,
        value: &Expr,
    ) -> Result<(), EvalError> {
        let container = self.eval_expr(target)?;
        let index = self.eval_expr(index)?;
        let value = self.eval_expr(value)?;
        store_element(&container, &index, value)
    }

    /// Write `value` into field `property` of `target`, which was read
    /// from the place `object`.
    fn store_property(
        &mut self,
        object: &Expr,
        target: Value,
        property: &str,
        value: Value,
    ) -> Result<(), EvalError> {
        match target {
            Value::Record(record) => store_field(&record, property, value),
            Value::BitView(view) => {
                let updated = view.with_field(property, &value)?;
                self.write_back(object, Value::bit_view(updated))
            }
            other => Err(type_mismatch_msg(
                "record",
                other.type_label(),
                format!("cannot set field `{property}` on {}", other.type_label()),
            )),
        }
    }

    /// Store `value` back into the place `place` denotes.
    fn write_back(&mut self, place: &Expr, value: Value) -> Result<(), EvalError> {
        match &place.kind {
            ExprKind::Variable(name) => self.assign_variable(name, &value),
            ExprKind::Property { object, name } => {
                if let Some((_, store)) = self.store_for_object(object) {
                    store.set(name, value);
                    return Ok(());
                }
                let target = self.eval_expr(object)?;
                self.store_property(object, target, name, value)
            }
            ExprKind::Index { target, index } => {
                let container = self.eval_expr(target)?;
                let index = self.eval_expr(index)?;
                store_element(&container, &index, value)
            }
            _ => Err(type_mismatch_msg(
                "variable",
                "expression",
                "bit view field writes need a variable, field or element to update",
            )),
        }
    }
}

/// Casts and the cycle check run before the container is locked.
fn store_field(record: &Shared<RecordValue>, name: &str, value: Value) -> Result<(), EvalError> {
    let field_ty = record
        .read()
        .shape()
        .and_then(|shape| shape.field(name).map(|(_, field)| field.ty.clone()));
    let value = match field_ty {
        Some(ty) => cast(&value, &ty)?,
        None => value,
    };
    record.check_store(&value)?;
    record.write().set(name, &value)
}

fn store_element(container: &Value, index: &Value, value: Value) -> Result<(), EvalError> {
    match container {
        Value::Array(array) => {
            let i = index_int(index)?;
            let element = array.read().element().clone();
            let value = cast(&value, &element)?;
            array.check_store(&value)?;
            array.write().set(i, &value)
        }
        Value::Record(record) => match index.as_str() {
            Some(name) => store_field(record, name, value),
            None => Err(type_mismatch_msg(
                "string",
                index.type_label(),
                "record keys must be strings",
            )),
        },
        other => Err(type_mismatch_msg(
            "array",
            other.type_label(),
            format!("cannot assign into an element of {}", other.type_label()),
        )),
    }
}
