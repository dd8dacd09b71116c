//! The seam between script text and the evaluator.
//!
//! Parsing is the host's concern. A front end turns source text into
//! statement trees and reports syntax problems as `EvalError`s, which
//! then surface exactly like runtime errors.

use brisk_ir::Stmt;
use brisk_value::EvalError;

/// Turns script source into a program.
pub trait ScriptFrontend {
    fn parse(&self, source: &str) -> Result<Vec<Stmt>, EvalError>;
}

impl<F> ScriptFrontend for F
where
    F: Fn(&str) -> Result<Vec<Stmt>, EvalError>,
{
    fn parse(&self, source: &str) -> Result<Vec<Stmt>, EvalError> {
        self(source)
    }
}
