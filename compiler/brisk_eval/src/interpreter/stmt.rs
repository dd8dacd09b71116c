//! Statement execution.

use std::sync::Arc;

use brisk_ir::{Block, Expr, FunctionDecl, Handler, Stmt, StmtKind};
use brisk_value::errors::{duplicate_name, invalid_control_flow, raised, type_mismatch_msg};
use brisk_value::{EvalError, Value};

use super::{ControlSignal, Interpreter};
use crate::environment::Mutability;

impl Interpreter {
    /// Execute one statement.
    pub fn exec_stmt(&mut self, stmt: &Stmt) -> Result<ControlSignal, EvalError> {
        self.mode_state.count_statement();
        self.exec_stmt_kind(stmt)
            .map_err(|err| err.or_line(stmt.line))
    }

    fn exec_stmt_kind(&mut self, stmt: &Stmt) -> Result<ControlSignal, EvalError> {
        match &stmt.kind {
            StmtKind::Var {
                name,
                ty,
                init,
                constant,
            } => {
                let declared = ty.as_ref().map(|ty| self.types.resolve(ty)).transpose()?;
                let value = match (init, &declared) {
                    (Some(init), _) => self.eval_expr(init)?,
                    (None, Some(ty)) => Value::default_for(ty),
                    (None, None) => Value::Null,
                };
                let mutability = if *constant {
                    Mutability::Constant
                } else {
                    Mutability::Mutable
                };
                self.env.define(name, value, declared, mutability)?;
            }
            StmtKind::Assign { name, value } => {
                let value = self.eval_expr(value)?;
                self.assign_variable(name, &value)?;
            }
            StmtKind::PropertyAssign {
                object,
                property,
                value,
            } => self.exec_property_assign(object, property, value)?,
            StmtKind::IndexAssign {
                target,
                index,
                value,
            } => self.exec_index_assign(target, index, value)?,
            StmtKind::Expr(expr) => {
                self.eval_expr(expr)?;
            }
            StmtKind::Call(call) => {
                self.eval_call(call, stmt.line)?;
            }
            StmtKind::Block(block) => return self.execute_block(&block.stmts),
            StmtKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.eval_condition(condition)? {
                    return self.execute_block(&then_branch.stmts);
                }
                if let Some(else_branch) = else_branch {
                    return self.execute_block(&else_branch.stmts);
                }
            }
            StmtKind::While { condition, body } => {
                return self.in_loop(|interp| interp.exec_while(condition, body, false));
            }
            StmtKind::DoWhile { body, condition } => {
                return self.in_loop(|interp| interp.exec_while(condition, body, true));
            }
            StmtKind::For {
                init,
                condition,
                update,
                body,
            } => {
                let mut scoped = self.scoped();
                if let Some(init) = init {
                    scoped.exec_stmt(init)?;
                }
                return scoped.in_loop(|interp| {
                    interp.exec_for(condition.as_ref(), update.as_deref(), body)
                });
            }
            StmtKind::ForEach {
                var,
                iterable,
                body,
            } => return self.exec_for_each(var, iterable, body),
            StmtKind::Break => {
                if self.loop_depth == 0 {
                    return Err(invalid_control_flow("break"));
                }
                return Ok(ControlSignal::Break);
            }
            StmtKind::Continue => {
                if self.loop_depth == 0 {
                    return Err(invalid_control_flow("continue"));
                }
                return Ok(ControlSignal::Continue);
            }
            StmtKind::Return(value) => {
                let value = match value {
                    Some(expr) => self.eval_expr(expr)?,
                    None => Value::Null,
                };
                return Ok(ControlSignal::Return(value));
            }
            StmtKind::Print(expr) => {
                let value = self.eval_expr(expr)?;
                self.output.print(&value.to_string());
            }
            StmtKind::Typedef { name, target } => {
                let desc = self.types.resolve(target)?;
                self.types.register_type_alias(name, desc)?;
            }
            StmtKind::Function(decl) => self.declare_function(decl)?,
            StmtKind::Try { body, handlers } => return self.exec_try(body, handlers),
            StmtKind::Raise { category, message } => {
                let message = match message {
                    Some(expr) => self.eval_expr(expr)?.to_string(),
                    None => category.name().to_string(),
                };
                return Err(raised(*category, message));
            }
        }
        Ok(ControlSignal::Normal)
    }

    /// Evaluate a loop or branch condition, which must be a bool.
    fn eval_condition(&mut self, condition: &Expr) -> Result<bool, EvalError> {
        match self.eval_expr(condition)? {
            Value::Bool(b) => Ok(b),
            other => Err(type_mismatch_msg(
                "bool",
                other.type_label(),
                format!("condition must be a bool, got {}", other.type_label()),
            )),
        }
    }

    fn exec_while(
        &mut self,
        condition: &Expr,
        body: &Block,
        body_first: bool,
    ) -> Result<ControlSignal, EvalError> {
        let mut first = body_first;
        loop {
            if !first && !self.eval_condition(condition)? {
                return Ok(ControlSignal::Normal);
            }
            first = false;
            match self.execute_block(&body.stmts)? {
                ControlSignal::Break => return Ok(ControlSignal::Normal),
                ControlSignal::Return(value) => return Ok(ControlSignal::Return(value)),
                ControlSignal::Normal | ControlSignal::Continue => {}
            }
        }
    }

    fn exec_for(
        &mut self,
        condition: Option<&Expr>,
        update: Option<&Stmt>,
        body: &Block,
    ) -> Result<ControlSignal, EvalError> {
        loop {
            if let Some(condition) = condition {
                if !self.eval_condition(condition)? {
                    return Ok(ControlSignal::Normal);
                }
            }
            match self.execute_block(&body.stmts)? {
                ControlSignal::Break => return Ok(ControlSignal::Normal),
                ControlSignal::Return(value) => return Ok(ControlSignal::Return(value)),
                ControlSignal::Normal | ControlSignal::Continue => {}
            }
            if let Some(update) = update {
                self.exec_stmt(update)?;
            }
        }
    }

    /// Iterate a snapshot of an array's elements, or a string's characters.
    fn exec_for_each(
        &mut self,
        var: &str,
        iterable: &Expr,
        body: &Block,
    ) -> Result<ControlSignal, EvalError> {
        let items: Vec<Value> = match self.eval_expr(iterable)? {
            Value::Array(array) => array.read().values().to_vec(),
            Value::Str(s) => s.chars().map(|c| Value::string(c.to_string())).collect(),
            Value::Null => Vec::new(),
            other => {
                return Err(type_mismatch_msg(
                    "array",
                    other.type_label(),
                    format!("cannot iterate over {}", other.type_label()),
                ))
            }
        };

        self.in_loop(|interp| {
            for item in items {
                let mut scoped = interp.scoped();
                scoped
                    .env
                    .define(var, item, None, Mutability::Mutable)?;
                match scoped.exec_stmts(&body.stmts)? {
                    ControlSignal::Break => break,
                    ControlSignal::Return(value) => return Ok(ControlSignal::Return(value)),
                    ControlSignal::Normal | ControlSignal::Continue => {}
                }
            }
            Ok(ControlSignal::Normal)
        })
    }

    /// Run `body`; on error, run the first handler whose category catches
    /// it, with the error message bound to the handler's variable.
    fn exec_try(&mut self, body: &Block, handlers: &[Handler]) -> Result<ControlSignal, EvalError> {
        let err = match self.execute_block(&body.stmts) {
            Ok(signal) => return Ok(signal),
            Err(err) => err,
        };
        let category = err.category();
        let Some(handler) = handlers.iter().find(|h| h.category.catches(category)) else {
            return Err(err);
        };
        tracing::debug!(%category, handler = %handler.category, "error caught");

        let mut scoped = self.scoped();
        if let Some(binding) = &handler.binding {
            scoped
                .env
                .define(binding, Value::string(&err.message), None, Mutability::Mutable)?;
        }
        scoped.exec_stmts(&handler.body.stmts)
    }

    /// Register a user function. Re-running an identical declaration is a
    /// no-op; a different body under the same name is an error.
    fn declare_function(&mut self, decl: &Arc<FunctionDecl>) -> Result<(), EvalError> {
        let key = decl.name.to_lowercase();
        if let Some(existing) = self.functions.get(&key) {
            if Arc::ptr_eq(existing, decl) || **existing == **decl {
                return Ok(());
            }
            return Err(duplicate_name(&decl.name));
        }
        tracing::debug!(name = %decl.name, params = decl.params.len(), "declare function");
        self.functions.insert(key, Arc::clone(decl));
        Ok(())
    }
}
