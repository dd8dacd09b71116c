//! Terse constructors for building trees programmatically.
//!
//! Front ends and host code that synthesize callbacks use these instead of
//! spelling out `Expr { kind, line }` literals. Every node starts at
//! [`Line::UNKNOWN`]; chain `.at(n)` to stamp a line.

use std::sync::Arc;

use super::{
    BinaryOp, Block, CallExpr, ErrorCategory, Expr, ExprKind, FunctionDecl, Handler, Literal,
    Param, Stmt, StmtKind, UnaryOp,
};
use crate::{Line, TypeRef};

fn expr(kind: ExprKind) -> Expr {
    Expr::new(kind, Line::UNKNOWN)
}

fn stmt(kind: StmtKind) -> Stmt {
    Stmt::new(kind, Line::UNKNOWN)
}

// Expressions

pub fn null() -> Expr {
    expr(ExprKind::Literal(Literal::Null))
}

pub fn boolean(b: bool) -> Expr {
    expr(ExprKind::Literal(Literal::Bool(b)))
}

pub fn int(n: i32) -> Expr {
    expr(ExprKind::Literal(Literal::Int(n)))
}

pub fn long(n: i64) -> Expr {
    expr(ExprKind::Literal(Literal::Long(n)))
}

pub fn double(n: f64) -> Expr {
    expr(ExprKind::Literal(Literal::Double(n)))
}

pub fn string(s: impl Into<String>) -> Expr {
    expr(ExprKind::Literal(Literal::Str(s.into())))
}

pub fn var(name: impl Into<String>) -> Expr {
    expr(ExprKind::Variable(name.into()))
}

pub fn unary(op: UnaryOp, operand: Expr) -> Expr {
    expr(ExprKind::Unary {
        op,
        operand: Box::new(operand),
    })
}

pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    expr(ExprKind::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
    })
}

pub fn call(name: impl Into<String>, args: Vec<Expr>) -> Expr {
    expr(ExprKind::Call(CallExpr {
        name: name.into(),
        args,
    }))
}

pub fn prop(object: Expr, name: impl Into<String>) -> Expr {
    expr(ExprKind::Property {
        object: Box::new(object),
        name: name.into(),
    })
}

pub fn index(target: Expr, index: Expr) -> Expr {
    expr(ExprKind::Index {
        target: Box::new(target),
        index: Box::new(index),
    })
}

pub fn array(elements: Vec<Expr>) -> Expr {
    expr(ExprKind::ArrayLiteral {
        elements,
        element_type: None,
    })
}

pub fn record<N: Into<String>>(fields: Vec<(N, Expr)>) -> Expr {
    expr(ExprKind::RecordLiteral(
        fields.into_iter().map(|(n, e)| (n.into(), e)).collect(),
    ))
}

pub fn cast(target: impl Into<TypeRef>, value: Expr) -> Expr {
    expr(ExprKind::Cast {
        target: target.into(),
        value: Box::new(value),
    })
}

pub fn type_of(value: Expr) -> Expr {
    expr(ExprKind::TypeOf(Box::new(value)))
}

pub fn length(value: Expr) -> Expr {
    expr(ExprKind::Length(Box::new(value)))
}

// Statements

pub fn let_var(name: impl Into<String>, ty: Option<TypeRef>, init: Option<Expr>) -> Stmt {
    stmt(StmtKind::Var {
        name: name.into(),
        ty,
        init,
        constant: false,
    })
}

pub fn const_var(name: impl Into<String>, ty: Option<TypeRef>, init: Expr) -> Stmt {
    stmt(StmtKind::Var {
        name: name.into(),
        ty,
        init: Some(init),
        constant: true,
    })
}

pub fn assign(name: impl Into<String>, value: Expr) -> Stmt {
    stmt(StmtKind::Assign {
        name: name.into(),
        value,
    })
}

pub fn prop_assign(object: Expr, property: impl Into<String>, value: Expr) -> Stmt {
    stmt(StmtKind::PropertyAssign {
        object,
        property: property.into(),
        value,
    })
}

pub fn index_assign(target: Expr, index: Expr, value: Expr) -> Stmt {
    stmt(StmtKind::IndexAssign {
        target,
        index,
        value,
    })
}

pub fn expr_stmt(value: Expr) -> Stmt {
    stmt(StmtKind::Expr(value))
}

pub fn call_stmt(name: impl Into<String>, args: Vec<Expr>) -> Stmt {
    stmt(StmtKind::Call(CallExpr {
        name: name.into(),
        args,
    }))
}

pub fn block(stmts: Vec<Stmt>) -> Stmt {
    stmt(StmtKind::Block(Block::new(stmts)))
}

pub fn if_else(condition: Expr, then_branch: Vec<Stmt>, else_branch: Option<Vec<Stmt>>) -> Stmt {
    stmt(StmtKind::If {
        condition,
        then_branch: Block::new(then_branch),
        else_branch: else_branch.map(Block::new),
    })
}

pub fn while_loop(condition: Expr, body: Vec<Stmt>) -> Stmt {
    stmt(StmtKind::While {
        condition,
        body: Block::new(body),
    })
}

pub fn for_each(name: impl Into<String>, iterable: Expr, body: Vec<Stmt>) -> Stmt {
    stmt(StmtKind::ForEach {
        var: name.into(),
        iterable,
        body: Block::new(body),
    })
}

pub fn brk() -> Stmt {
    stmt(StmtKind::Break)
}

pub fn cont() -> Stmt {
    stmt(StmtKind::Continue)
}

pub fn ret(value: Option<Expr>) -> Stmt {
    stmt(StmtKind::Return(value))
}

pub fn print(value: Expr) -> Stmt {
    stmt(StmtKind::Print(value))
}

pub fn typedef(name: impl Into<String>, target: impl Into<TypeRef>) -> Stmt {
    stmt(StmtKind::Typedef {
        name: name.into(),
        target: target.into(),
    })
}

pub fn function(
    name: impl Into<String>,
    params: Vec<Param>,
    return_type: Option<TypeRef>,
    body: Vec<Stmt>,
) -> Stmt {
    stmt(StmtKind::Function(Arc::new(FunctionDecl {
        name: name.into(),
        params,
        return_type,
        body: Block::new(body),
    })))
}

pub fn try_catch(body: Vec<Stmt>, handlers: Vec<Handler>) -> Stmt {
    stmt(StmtKind::Try {
        body: Block::new(body),
        handlers,
    })
}

pub fn handler(category: ErrorCategory, binding: Option<&str>, body: Vec<Stmt>) -> Handler {
    Handler {
        category,
        binding: binding.map(str::to_string),
        body: Block::new(body),
    }
}

pub fn raise(category: ErrorCategory, message: Option<Expr>) -> Stmt {
    stmt(StmtKind::Raise { category, message })
}
