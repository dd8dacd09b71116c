//! Function calls: builtin dispatch and user-function invocation.

use std::sync::Arc;

use smallvec::SmallVec;

use brisk_ir::{CallExpr, FunctionDecl, Line};
use brisk_value::errors::{undefined_function, unknown_builtin, wrong_arg_count};
use brisk_value::{coerce, EvalError, EvalResult, Value};

use super::{ControlSignal, Interpreter};
use crate::builtins::BuiltinContext;
use crate::diagnostics::CallFrame;
use crate::environment::Mutability;
use crate::stack::ensure_sufficient_stack;

/// Most calls pass a handful of arguments.
type ArgVec = SmallVec<[Value; 4]>;

impl Interpreter {
    /// Evaluate arguments left to right, then route the call: a builtin if
    /// the registry claims the name, else a user function.
    pub(super) fn eval_call(&mut self, call: &CallExpr, line: Line) -> EvalResult {
        let args = call
            .args
            .iter()
            .map(|arg| self.eval_expr(arg))
            .collect::<Result<ArgVec, _>>()?;

        if self.builtins.claims(&call.name) {
            return self.call_builtin(&call.name, &args);
        }
        self.call_function_at(&call.name, args.into_vec(), line)
    }

    fn call_builtin(&mut self, name: &str, args: &[Value]) -> EvalResult {
        self.mode_state.count_builtin_call();
        let ctx = BuiltinContext::new(Some(self.output.as_ref()), self.diagnostics.as_deref());
        self.builtins.dispatch_with(&ctx, name, args)
    }

    /// Call a user function by name from host code.
    pub fn call_function(&mut self, name: &str, args: Vec<Value>) -> EvalResult {
        self.call_function_at(name, args, Line::UNKNOWN)
    }

    fn call_function_at(&mut self, name: &str, args: Vec<Value>, line: Line) -> EvalResult {
        let Some(decl) = self.functions.get(&name.to_lowercase()).cloned() else {
            // A dotted name no namespace owns reads as a builtin typo.
            if name.contains('.') {
                return Err(unknown_builtin(&name.to_lowercase()));
            }
            return Err(undefined_function(name));
        };
        self.call_user(&decl, args, line)
    }

    #[tracing::instrument(level = "debug", skip_all, fields(function = %decl.name, argc = args.len()))]
    fn call_user(&mut self, decl: &Arc<FunctionDecl>, args: Vec<Value>, line: Line) -> EvalResult {
        check_arity(decl, args.len())?;
        self.mode_state.count_call();
        self.call_stack.push(CallFrame {
            name: decl.name.clone(),
            call_line: line,
        })?;

        let result = ensure_sufficient_stack(|| self.run_body(decl, args));
        let result = result.map_err(|err| self.call_stack.attach_backtrace(err));
        self.call_stack.pop();
        result
    }

    /// Bind parameters in a fresh frame and run the body.
    fn run_body(&mut self, decl: &FunctionDecl, args: Vec<Value>) -> EvalResult {
        let mut framed = self.framed();

        let mut args = args.into_iter();
        for param in &decl.params {
            let declared = param
                .ty
                .as_ref()
                .map(|ty| framed.types.resolve(ty))
                .transpose()?;
            // Defaults see the parameters bound before them.
            let value = match (args.next(), &param.default) {
                (Some(value), _) => value,
                (None, Some(default)) => framed.eval_expr(default)?,
                (None, None) => Value::Null,
            };
            framed
                .env
                .define(&param.name, value, declared, Mutability::Mutable)?;
        }

        let returned = match framed.exec_stmts(&decl.body.stmts)? {
            ControlSignal::Return(value) => Some(value),
            ControlSignal::Normal | ControlSignal::Break | ControlSignal::Continue => None,
        };

        let Some(ty) = &decl.return_type else {
            return Ok(returned.unwrap_or_default());
        };
        let ty = framed.types.resolve(ty)?;
        match returned {
            Some(value) => coerce(&value, &ty),
            None => Ok(Value::default_for(&ty)),
        }
    }
}

/// Parameters after the last one without a default may be omitted.
fn check_arity(decl: &FunctionDecl, got: usize) -> Result<(), EvalError> {
    let max = decl.params.len();
    let min = decl
        .params
        .iter()
        .rposition(|p| p.default.is_none())
        .map_or(0, |i| i + 1);
    if (min..=max).contains(&got) {
        return Ok(());
    }
    if min == max {
        Err(wrong_arg_count(&decl.name, max, got))
    } else {
        Err(wrong_arg_count(&decl.name, format!("{min} to {max}"), got))
    }
}
