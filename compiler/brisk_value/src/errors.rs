//! Error types for evaluation.
//!
//! Every failure inside the engine is an [`EvalError`]. Callers that need
//! differentiated handling match on [`EvalError::kind`]; everything else
//! just propagates the error with `?`.
//!
//! Factory functions are the public way to build errors: they populate
//! both `kind` and `message`, and are `#[cold]` so error paths stay out of
//! the hot loop.

use std::fmt;

use brisk_ir::{DescriptorError, ErrorCategory, Line};
use thiserror::Error;

use crate::value::Value;

/// Result of evaluation.
pub type EvalResult = Result<Value, EvalError>;

/// Typed error category, the discriminant callers match on.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EvalErrorKind {
    #[error("unknown builtin: {name}")]
    UnknownBuiltin { name: String },

    #[error("type mismatch: expected {expected}, got {got}")]
    TypeMismatch { expected: String, got: String },

    #[error("no field `{field}` on {owner}")]
    FieldNotFound { field: String, owner: String },

    #[error("index {index} out of bounds for length {len}")]
    IndexOutOfBounds { index: i64, len: usize },

    #[error("unknown type: {name}")]
    UnknownType { name: String },

    #[error("{name} expects {expected} argument(s), got {got}")]
    Arity {
        name: String,
        expected: String,
        got: usize,
    },

    #[error("malformed literal: {message}")]
    MalformedLiteral { message: String },

    #[error("undefined variable: {name}")]
    UndefinedVariable { name: String },

    #[error("undefined function: {name}")]
    UndefinedFunction { name: String },

    #[error("`{name}` is already defined")]
    DuplicateName { name: String },

    #[error("cannot assign to constant `{name}`")]
    ConstantReassignment { name: String },

    #[error("invalid type definition: {message}")]
    InvalidTypeDefinition { message: String },

    #[error("division by zero")]
    DivisionByZero,

    #[error("integer overflow in {operation}")]
    IntegerOverflow { operation: String },

    #[error("operator `{op}` cannot be applied to {left} and {right}")]
    InvalidOperator {
        op: String,
        left: String,
        right: String,
    },

    #[error("`{statement}` outside of a loop")]
    InvalidControlFlow { statement: String },

    #[error("maximum call depth exceeded (limit: {depth})")]
    RecursionLimit { depth: usize },

    #[error("{category}: {message}")]
    Raised {
        category: ErrorCategory,
        message: String,
    },

    #[error("{message}")]
    Custom { message: String },
}

impl EvalErrorKind {
    /// The category a script `try` handler sees for this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::TypeMismatch { .. }
            | Self::UnknownType { .. }
            | Self::DuplicateName { .. }
            | Self::ConstantReassignment { .. }
            | Self::InvalidTypeDefinition { .. }
            | Self::InvalidOperator { .. } => ErrorCategory::Type,
            Self::IndexOutOfBounds { .. } => ErrorCategory::Index,
            Self::DivisionByZero | Self::IntegerOverflow { .. } => ErrorCategory::Math,
            Self::UnknownBuiltin { .. }
            | Self::FieldNotFound { .. }
            | Self::UndefinedVariable { .. }
            | Self::UndefinedFunction { .. } => ErrorCategory::NotFound,
            Self::Arity { .. } => ErrorCategory::Arity,
            Self::MalformedLiteral { .. } => ErrorCategory::Parse,
            Self::Raised { category, .. } => *category,
            Self::InvalidControlFlow { .. } | Self::RecursionLimit { .. } | Self::Custom { .. } => {
                ErrorCategory::Custom
            }
        }
    }
}

/// A single frame in an evaluation backtrace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BacktraceFrame {
    /// Function name.
    pub name: String,
    /// Line of the call site.
    pub line: Option<Line>,
}

/// Snapshot of the call stack at the point an error escaped a function.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EvalBacktrace {
    frames: Vec<BacktraceFrame>,
}

impl EvalBacktrace {
    pub fn new(frames: Vec<BacktraceFrame>) -> Self {
        Self { frames }
    }

    pub fn frames(&self) -> &[BacktraceFrame] {
        &self.frames
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }
}

impl fmt::Display for EvalBacktrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Innermost call first.
        for (i, frame) in self.frames.iter().rev().enumerate() {
            write!(f, "  {i}: {}", frame.name)?;
            if let Some(line) = frame.line.filter(|l| l.is_known()) {
                write!(f, " at {line}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Evaluation error.
#[derive(Clone, Debug)]
pub struct EvalError {
    /// Structured category; see [`EvalErrorKind`].
    pub kind: EvalErrorKind,
    /// Human-readable message. Equals `kind.to_string()` unless a factory
    /// supplied more context.
    pub message: String,
    /// Source line of the statement or expression that failed.
    pub line: Option<Line>,
    /// Call chain at the point the error left a function body.
    pub backtrace: Option<EvalBacktrace>,
    /// Secondary context, oldest first.
    pub notes: Vec<String>,
}

impl EvalError {
    /// Create an uncategorized error.
    ///
    /// Prefer a specific factory when one fits.
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        Self::with_message(
            EvalErrorKind::Custom {
                message: message.clone(),
            },
            message,
        )
    }

    /// Create an error from a kind, deriving the message from it.
    pub fn from_kind(kind: EvalErrorKind) -> Self {
        let message = kind.to_string();
        Self::with_message(kind, message)
    }

    /// Create an error from a kind with a more specific message.
    pub fn with_message(kind: EvalErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            line: None,
            backtrace: None,
            notes: Vec::new(),
        }
    }

    /// Attach a source line, replacing any existing one.
    #[must_use]
    pub fn with_line(mut self, line: Line) -> Self {
        self.line = Some(line).filter(|l| l.is_known());
        self
    }

    /// Attach a source line unless the error already has one.
    ///
    /// Errors bubble outward through nested nodes; the innermost line wins.
    #[must_use]
    pub fn or_line(mut self, line: Line) -> Self {
        if self.line.is_none() && line.is_known() {
            self.line = Some(line);
        }
        self
    }

    /// Attach a backtrace unless one was captured deeper in the stack.
    #[must_use]
    pub fn with_backtrace(mut self, backtrace: EvalBacktrace) -> Self {
        if self.backtrace.is_none() {
            self.backtrace = Some(backtrace);
        }
        self
    }

    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Category used by script-level `try` handlers.
    #[inline]
    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }
}

impl PartialEq for EvalError {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.message == other.message && self.line == other.line
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{line}: {}", self.message)?,
            None => f.write_str(&self.message)?,
        }
        for note in &self.notes {
            write!(f, "\n  note: {note}")?;
        }
        Ok(())
    }
}

impl std::error::Error for EvalError {}

impl From<DescriptorError> for EvalError {
    fn from(err: DescriptorError) -> Self {
        invalid_type_definition(err.to_string())
    }
}

// Dispatch and lookup

#[cold]
pub fn unknown_builtin(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UnknownBuiltin {
        name: name.to_string(),
    })
}

/// A miss inside a namespace that owns the name's prefix.
#[cold]
pub fn unknown_builtin_in(namespace: &str, name: &str) -> EvalError {
    EvalError::with_message(
        EvalErrorKind::UnknownBuiltin {
            name: name.to_string(),
        },
        format!("unknown {namespace} builtin: {name}"),
    )
}

#[cold]
pub fn undefined_variable(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UndefinedVariable {
        name: name.to_string(),
    })
}

#[cold]
pub fn undefined_function(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UndefinedFunction {
        name: name.to_string(),
    })
}

#[cold]
pub fn field_not_found(field: &str, owner: impl fmt::Display) -> EvalError {
    EvalError::from_kind(EvalErrorKind::FieldNotFound {
        field: field.to_string(),
        owner: owner.to_string(),
    })
}

#[cold]
pub fn unknown_type(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UnknownType {
        name: name.to_string(),
    })
}

#[cold]
pub fn duplicate_name(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::DuplicateName {
        name: name.to_string(),
    })
}

#[cold]
pub fn constant_reassignment(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ConstantReassignment {
        name: name.to_string(),
    })
}

// Types and conversions

#[cold]
pub fn type_mismatch(expected: impl fmt::Display, got: impl fmt::Display) -> EvalError {
    EvalError::from_kind(EvalErrorKind::TypeMismatch {
        expected: expected.to_string(),
        got: got.to_string(),
    })
}

/// Type mismatch with a caller-supplied explanation.
#[cold]
pub fn type_mismatch_msg(
    expected: impl fmt::Display,
    got: impl fmt::Display,
    message: impl Into<String>,
) -> EvalError {
    EvalError::with_message(
        EvalErrorKind::TypeMismatch {
            expected: expected.to_string(),
            got: got.to_string(),
        },
        message,
    )
}

/// Storing a container inside itself, directly or through nested containers.
#[cold]
pub fn cyclic_store(container: &str) -> EvalError {
    type_mismatch_msg(
        format!("value not containing this {container}"),
        format!("{container} containing itself"),
        format!("cannot store this {container} inside itself"),
    )
}

/// A builtin received an argument of the wrong type.
#[cold]
pub fn wrong_arg_type(func: &str, position: usize, expected: &str, got: &str) -> EvalError {
    type_mismatch_msg(
        expected,
        got,
        format!("{func}: argument {} expects {expected}, got {got}", position + 1),
    )
}

#[cold]
pub fn malformed_literal(message: impl Into<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::MalformedLiteral {
        message: message.into(),
    })
}

#[cold]
pub fn invalid_type_definition(message: impl Into<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidTypeDefinition {
        message: message.into(),
    })
}

/// A value does not fit in a bit-view field or backing integer.
#[cold]
pub fn bit_overflow(target: &str, value: impl fmt::Display, bits: u32) -> EvalError {
    type_mismatch_msg(
        format!("{bits}-bit value"),
        value.to_string(),
        format!("value {value} does not fit in {target} ({bits} bits)"),
    )
}

// Indexing and arity

#[cold]
pub fn index_out_of_bounds(index: i64, len: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::IndexOutOfBounds { index, len })
}

/// Index error with a caller-supplied explanation (string ranges).
#[cold]
pub fn index_out_of_bounds_msg(index: i64, len: usize, message: impl Into<String>) -> EvalError {
    EvalError::with_message(EvalErrorKind::IndexOutOfBounds { index, len }, message)
}

#[cold]
pub fn wrong_arg_count(name: &str, expected: impl fmt::Display, got: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::Arity {
        name: name.to_string(),
        expected: expected.to_string(),
        got,
    })
}

// Arithmetic and operators

#[cold]
pub fn division_by_zero() -> EvalError {
    EvalError::from_kind(EvalErrorKind::DivisionByZero)
}

#[cold]
pub fn integer_overflow(operation: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::IntegerOverflow {
        operation: operation.to_string(),
    })
}

#[cold]
pub fn invalid_operator(op: &str, left: &str, right: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidOperator {
        op: op.to_string(),
        left: left.to_string(),
        right: right.to_string(),
    })
}

// Control flow

#[cold]
pub fn invalid_control_flow(statement: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidControlFlow {
        statement: statement.to_string(),
    })
}

#[cold]
pub fn recursion_limit(depth: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::RecursionLimit { depth })
}

#[cold]
pub fn raised(category: ErrorCategory, message: impl Into<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::Raised {
        category,
        message: message.into(),
    })
}
