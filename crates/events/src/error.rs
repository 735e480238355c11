//! Dispatch and delivery error model.

use thiserror::Error;

/// Failure raised while delivering a notification to one processor.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// A reaction body failed.
    #[error("reaction failed: {0}")]
    Reaction(#[from] anyhow::Error),

    /// Delivery was attempted before a unit of work was bound.
    #[error("delivery attempted without a bound unit of work")]
    Unbound,
}

/// Outcome of a dispatch in which at least one processor failed.
///
/// Dispatch continues past failing processors; see
/// [`EventDispatcher`](crate::dispatcher::EventDispatcher) for the policy.
#[derive(Debug, Error)]
#[error("dispatch failed in {} processor(s)", .failures.len())]
pub struct DispatchError {
    /// Processor name paired with the failure it raised, in dispatch order.
    pub failures: Vec<(&'static str, DeliveryError)>,
}
