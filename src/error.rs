//! Error types for the fallible edges of the crate.
//!
//! Geometry, hit-testing, and drag editing never fail; they report
//! degenerate or out-of-range input through `None`/`false`. Only drawing to a
//! host surface and registry lookups return these errors.

use crate::tool::ToolId;

/// Error returned by a [`crate::render::Surface`] call.
#[derive(Debug, thiserror::Error)]
pub enum DrawError {
    /// The host drawing surface rejected a call.
    #[error("surface call failed: {0}")]
    Surface(String),
}

/// Error returned by parsing and registry operations.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// The name does not match any [`crate::tool::ToolKind`].
    #[error("unknown tool kind: {0}")]
    UnknownKind(String),
    /// The name does not match any [`crate::alert::AlertCondition`].
    #[error("unknown alert condition: {0}")]
    UnknownCondition(String),
    /// No tool with this id is attached.
    #[error("tool not found: {0}")]
    NotFound(ToolId),
}
