//! Operation error model.

use thiserror::Error;

/// Failure surfaced by the binder or by an operation's own body.
///
/// The mediator performs no local recovery: every failure propagates
/// unchanged to the immediate caller. Rolling the unit of work back is the
/// request lifecycle's concern, never the binder's.
#[derive(Debug, Error)]
pub enum OperationError {
    /// The operation's own execution body failed.
    #[error("operation failed: {0}")]
    Execution(#[from] anyhow::Error),

    /// The operation ran before a unit of work was bound to it.
    #[error("operation executed without a bound unit of work")]
    Unbound,

    /// The override executor had no canned result for this operation type.
    ///
    /// A test-configuration mistake, not a production condition.
    #[error("no override result configured for {operation}")]
    MissingOverrideResult { operation: &'static str },

    /// A result-bearing command completed without storing a result.
    #[error("{operation} completed without producing a result")]
    MissingResult { operation: &'static str },

    /// An executor handed back a result of the wrong type.
    #[error("{operation} produced a result that is not a {expected}")]
    ResultTypeMismatch {
        operation: &'static str,
        expected: &'static str,
    },
}
