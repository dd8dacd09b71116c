use std::fmt;
use std::sync::Arc;

use super::{CallExpr, Expr};
use crate::{Line, TypeRef};

/// Statement node.
#[derive(Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stmt {
    pub kind: StmtKind,
    pub line: Line,
}

impl Stmt {
    pub fn new(kind: StmtKind, line: Line) -> Self {
        Stmt { kind, line }
    }

    /// Restamp the node with a source line.
    #[must_use]
    pub fn at(mut self, line: u32) -> Self {
        self.line = Line(line);
        self
    }
}

impl fmt::Debug for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ {}", self.kind, self.line.get())
    }
}

/// A sequence of statements executed in a fresh lexical scope.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Block {
    pub stmts: Vec<Stmt>,
}

impl Block {
    pub fn new(stmts: Vec<Stmt>) -> Self {
        Block { stmts }
    }
}

impl From<Vec<Stmt>> for Block {
    fn from(stmts: Vec<Stmt>) -> Self {
        Block { stmts }
    }
}

/// A declared function parameter.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Param {
    pub name: String,
    pub ty: Option<TypeRef>,
    /// Used when the caller passes fewer arguments.
    pub default: Option<Expr>,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: Option<TypeRef>) -> Self {
        Param {
            name: name.into(),
            ty,
            default: None,
        }
    }

    #[must_use]
    pub fn with_default(mut self, default: Expr) -> Self {
        self.default = Some(default);
        self
    }
}

/// A user function declaration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FunctionDecl {
    pub name: String,
    pub params: Vec<Param>,
    pub return_type: Option<TypeRef>,
    pub body: Block,
}

/// Error categories a `try` handler can catch and `raise` can throw.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorCategory {
    /// Matches every error.
    Any,
    Type,
    Index,
    Math,
    NotFound,
    Arity,
    Parse,
    /// Script-defined errors from `raise`.
    Custom,
}

impl ErrorCategory {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Any => "any_error",
            Self::Type => "type_error",
            Self::Index => "index_error",
            Self::Math => "math_error",
            Self::NotFound => "not_found_error",
            Self::Arity => "arity_error",
            Self::Parse => "parse_error",
            Self::Custom => "custom_error",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let category = match name.to_ascii_lowercase().as_str() {
            "any_error" | "any" => Self::Any,
            "type_error" => Self::Type,
            "index_error" => Self::Index,
            "math_error" => Self::Math,
            "not_found_error" => Self::NotFound,
            "arity_error" => Self::Arity,
            "parse_error" => Self::Parse,
            "custom_error" => Self::Custom,
            _ => return None,
        };
        Some(category)
    }

    /// Whether a handler for `self` catches an error of `actual`.
    #[inline]
    pub fn catches(self, actual: ErrorCategory) -> bool {
        self == Self::Any || self == actual
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One `catch` arm of a `try` statement.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Handler {
    pub category: ErrorCategory,
    /// Receives the error message as a string.
    pub binding: Option<String>,
    pub body: Block,
}

/// Statement kinds.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StmtKind {
    /// Variable declaration; without `init` the variable holds its type's default.
    Var {
        name: String,
        ty: Option<TypeRef>,
        init: Option<Expr>,
        constant: bool,
    },

    Assign {
        name: String,
        value: Expr,
    },

    /// `object.property = value`
    PropertyAssign {
        object: Expr,
        property: String,
        value: Expr,
    },

    /// `target[index] = value`
    IndexAssign {
        target: Expr,
        index: Expr,
        value: Expr,
    },

    /// Expression evaluated for its effects; the value is discarded.
    Expr(Expr),

    /// Call statement.
    Call(CallExpr),

    Block(Block),

    If {
        condition: Expr,
        then_branch: Block,
        else_branch: Option<Block>,
    },

    While {
        condition: Expr,
        body: Block,
    },

    DoWhile {
        body: Block,
        condition: Expr,
    },

    For {
        init: Option<Box<Stmt>>,
        condition: Option<Expr>,
        update: Option<Box<Stmt>>,
        body: Block,
    },

    ForEach {
        var: String,
        iterable: Expr,
        body: Block,
    },

    Break,
    Continue,
    Return(Option<Expr>),

    Print(Expr),

    /// Registers `name` as an alias for `target`.
    Typedef {
        name: String,
        target: TypeRef,
    },

    Function(Arc<FunctionDecl>),

    Try {
        body: Block,
        handlers: Vec<Handler>,
    },

    Raise {
        category: ErrorCategory,
        message: Option<Expr>,
    },
}
