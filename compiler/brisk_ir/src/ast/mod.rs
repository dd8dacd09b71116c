//! AST node model.
//!
//! Two node families, [`Stmt`] and [`Expr`], each a closed tagged enum.
//! Nodes carry data only: all behaviour lives in the evaluator, which
//! matches exhaustively on the kind. Nodes are built once by the front end
//! and never mutated afterwards.

pub mod build;
mod expr;
mod operators;
mod stmt;

pub use expr::{CallExpr, Expr, ExprKind, Literal};
pub use operators::{BinaryOp, UnaryOp};
pub use stmt::{Block, ErrorCategory, FunctionDecl, Handler, Param, Stmt, StmtKind};

#[cfg(test)]
mod tests;
