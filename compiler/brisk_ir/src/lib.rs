//! Brisk IR - type descriptors and the AST node model.
//!
//! This crate is the leaf of the Brisk workspace:
//! - [`TypeDesc`] and friends describe the shape of runtime values
//!   (scalars, records, arrays, bitmap/intmap views over integers)
//! - [`ast`] holds the immutable statement/expression trees an external
//!   front end hands to the evaluator
//!
//! Nothing here evaluates anything. Descriptors validate their own
//! invariants at construction time so the evaluator can trust them.

pub mod ast;
mod line;
pub mod types;

pub use ast::{
    BinaryOp, Block, CallExpr, ErrorCategory, Expr, ExprKind, FunctionDecl, Handler, Literal,
    Param, Stmt, StmtKind, UnaryOp,
};
pub use line::Line;
pub use types::{
    ArrayShape, BitField, BitViewKind, BitViewType, BitWidth, DescriptorError, FieldDesc,
    RecordShape, ScalarKind, TypeDesc, TypeRef,
};
