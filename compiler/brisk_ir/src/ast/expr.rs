use std::fmt;

use super::{BinaryOp, UnaryOp};
use crate::{ArrayShape, Line, TypeRef};

/// Literal constants.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Literal {
    Null,
    Bool(bool),
    Byte(u8),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Str(String),
}

/// A call by name: builtin (`str.trim`) or user function (`greet`).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CallExpr {
    pub name: String,
    pub args: Vec<Expr>,
}

/// Expression node.
#[derive(Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Expr {
    pub kind: ExprKind,
    pub line: Line,
}

impl Expr {
    pub fn new(kind: ExprKind, line: Line) -> Self {
        Expr { kind, line }
    }

    /// Restamp the node with a source line.
    #[must_use]
    pub fn at(mut self, line: u32) -> Self {
        self.line = Line(line);
        self
    }
}

impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ {}", self.kind, self.line.get())
    }
}

/// Expression kinds.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExprKind {
    Literal(Literal),

    /// Variable reference, resolved case-insensitively.
    Variable(String),

    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },

    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    Call(CallExpr),

    /// `object.name`: record field, bit-view field, or store variable
    /// when `object` names an attached variable store.
    Property {
        object: Box<Expr>,
        name: String,
    },

    /// `target[index]` on arrays and strings.
    Index {
        target: Box<Expr>,
        index: Box<Expr>,
    },

    /// `[a, b, c]`, optionally typed.
    ArrayLiteral {
        elements: Vec<Expr>,
        element_type: Option<TypeRef>,
    },

    /// A default-filled array of the given shape (`array.int[5]`).
    ArrayInit(ArrayShape),

    /// `{name: value, ...}` ad hoc record.
    RecordLiteral(Vec<(String, Expr)>),

    Cast {
        target: TypeRef,
        value: Box<Expr>,
    },

    /// Descriptor name of the operand's runtime type.
    TypeOf(Box<Expr>),

    /// Element count of an array, record, or string.
    Length(Box<Expr>),
}
