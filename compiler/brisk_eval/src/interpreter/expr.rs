//! Expression evaluation.

use brisk_ir::{BinaryOp, Expr, ExprKind, Literal, TypeDesc, TypeRef};
use brisk_value::errors::{index_out_of_bounds, type_mismatch, type_mismatch_msg, undefined_variable};
use brisk_value::{cast, ArrayValue, EvalError, EvalResult, RecordValue, Value};

use super::Interpreter;
use crate::builtins::args::len_value;
use crate::operators::evaluate_binary;
use crate::stack::ensure_sufficient_stack;
use crate::store::SharedVariableStore;
use crate::unary_operators::evaluate_unary;

impl Interpreter {
    /// Evaluate one expression.
    pub fn eval_expr(&mut self, expr: &Expr) -> EvalResult {
        self.mode_state.count_expression();
        ensure_sufficient_stack(|| self.eval_expr_kind(expr)).map_err(|err| err.or_line(expr.line))
    }

    fn eval_expr_kind(&mut self, expr: &Expr) -> EvalResult {
        match &expr.kind {
            ExprKind::Literal(lit) => Ok(literal_value(lit)),
            ExprKind::Variable(name) => self.lookup_variable(name),
            ExprKind::Unary { op, operand } => {
                let value = self.eval_expr(operand)?;
                evaluate_unary(*op, &value)
            }
            ExprKind::Binary { op, left, right } => self.eval_binary(*op, left, right),
            ExprKind::Call(call) => self.eval_call(call, expr.line),
            ExprKind::Property { object, name } => {
                if let Some((namespace, store)) = self.store_for_object(object) {
                    return read_store(&store, &namespace, name);
                }
                let target = self.eval_expr(object)?;
                property_of(&target, name)
            }
            ExprKind::Index { target, index } => {
                let target = self.eval_expr(target)?;
                let index = self.eval_expr(index)?;
                index_of(&target, &index)
            }
            ExprKind::ArrayLiteral {
                elements,
                element_type,
            } => {
                let element = self.resolve_or_any(element_type.as_ref())?;
                let values = elements
                    .iter()
                    .map(|e| self.eval_expr(e))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Value::array(ArrayValue::dynamic(element, values)?))
            }
            ExprKind::ArrayInit(shape) => Ok(Value::array(ArrayValue::with_shape(shape))),
            ExprKind::RecordLiteral(fields) => {
                let mut values = Vec::with_capacity(fields.len());
                for (name, expr) in fields {
                    values.push((name.as_str(), self.eval_expr(expr)?));
                }
                Ok(Value::record(RecordValue::ad_hoc(values)?))
            }
            ExprKind::Cast { target, value } => {
                let ty = self.types.resolve(target)?;
                let value = self.eval_expr(value)?;
                cast(&value, &ty)
            }
            ExprKind::TypeOf(value) => Ok(Value::string(self.eval_expr(value)?.type_label())),
            ExprKind::Length(value) => length_of(&self.eval_expr(value)?),
        }
    }

    /// `and`/`or` skip the right operand once the left decides the result.
    fn eval_binary(&mut self, op: BinaryOp, left: &Expr, right: &Expr) -> EvalResult {
        let left = self.eval_expr(left)?;
        match (op, &left) {
            (BinaryOp::And, Value::Bool(false)) => return Ok(Value::bool(false)),
            (BinaryOp::Or, Value::Bool(true)) => return Ok(Value::bool(true)),
            _ => {}
        }
        let right = self.eval_expr(right)?;
        evaluate_binary(op, &left, &right)
    }

    /// Local or global variable, else a dotted store variable.
    pub(super) fn lookup_variable(&self, name: &str) -> EvalResult {
        if let Some(value) = self.env.lookup(name) {
            return Ok(value);
        }
        match self.store_for_dotted(name) {
            Some((store, var)) => store.get(var).ok_or_else(|| undefined_variable(name)),
            None => Err(undefined_variable(name)),
        }
    }

    /// `ns` in `ns.var` when it names an attached store rather than a
    /// script variable.
    pub(super) fn store_for_object(&self, object: &Expr) -> Option<(String, SharedVariableStore)> {
        let ExprKind::Variable(namespace) = &object.kind else {
            return None;
        };
        if self.env.is_defined(namespace) {
            return None;
        }
        self.store(namespace)
            .map(|store| (namespace.clone(), SharedVariableStore::clone(store)))
    }

    fn resolve_or_any(&self, ty: Option<&TypeRef>) -> Result<TypeDesc, EvalError> {
        match ty {
            Some(ty) => self.types.resolve(ty),
            None => Ok(TypeDesc::ANY),
        }
    }
}

fn literal_value(lit: &Literal) -> Value {
    match lit {
        Literal::Null => Value::Null,
        Literal::Bool(b) => Value::bool(*b),
        Literal::Byte(n) => Value::byte(*n),
        Literal::Int(n) => Value::int(*n),
        Literal::Long(n) => Value::long(*n),
        Literal::Float(n) => Value::float(*n),
        Literal::Double(n) => Value::double(*n),
        Literal::Str(s) => Value::string(s),
    }
}

fn read_store(store: &SharedVariableStore, namespace: &str, name: &str) -> EvalResult {
    store
        .get(name)
        .ok_or_else(|| undefined_variable(&format!("{namespace}.{name}")))
}

/// Field of a record or bit view.
pub(super) fn property_of(target: &Value, name: &str) -> EvalResult {
    match target {
        Value::Record(record) => record.read().get(name),
        Value::BitView(view) => view.get(name),
        other => Err(type_mismatch_msg(
            "record",
            other.type_label(),
            format!("cannot read field `{name}` of {}", other.type_label()),
        )),
    }
}

/// An index operand as `i64`; any integer kind is accepted.
pub(super) fn index_int(index: &Value) -> Result<i64, EvalError> {
    index
        .as_i64()
        .ok_or_else(|| type_mismatch("int", index.type_label()))
}

/// `target[index]` on arrays, strings (by character) and records (by
/// field name).
fn index_of(target: &Value, index: &Value) -> EvalResult {
    match target {
        Value::Array(array) => array.read().get(index_int(index)?),
        Value::Str(s) => {
            let i = index_int(index)?;
            usize::try_from(i)
                .ok()
                .and_then(|n| s.chars().nth(n))
                .map(|c| Value::string(c.to_string()))
                .ok_or_else(|| index_out_of_bounds(i, s.chars().count()))
        }
        Value::Record(record) => match index.as_str() {
            Some(field) => record.read().get(field),
            None => Err(type_mismatch("string", index.type_label())),
        },
        other => Err(type_mismatch_msg(
            "array",
            other.type_label(),
            format!("cannot index into {}", other.type_label()),
        )),
    }
}

/// Element count of an array or record, character count of a string.
fn length_of(value: &Value) -> EvalResult {
    match value {
        Value::Null => Ok(Value::int(0)),
        Value::Array(array) => Ok(len_value(array.read().len())),
        Value::Record(record) => Ok(len_value(record.read().len())),
        Value::Str(s) => Ok(len_value(s.chars().count())),
        other => Err(type_mismatch("array, record or string", other.type_label())),
    }
}
