//! Domain error types.

use thiserror::Error;

/// Errors surfaced by signal evaluation.
///
/// Malformed event fields never produce an error: the normalizer degrades
/// them to absent/zero so a single corrupt event cannot abort a summary.
#[derive(Debug, Error)]
pub enum SignalError {
    /// A required configuration value (such as a user id) was not supplied.
    #[error("Missing required configuration: {0}")]
    Configuration(String),

    /// The event source or goal store failed. A summary build is
    /// all-or-nothing per user; this propagates to the boundary layer.
    #[error("Collaborator failure: {0}")]
    Collaborator(String),
}
