//! Signal-evaluation engine.
//!
//! Pure building blocks (normalization, week bucketing, evaluators,
//! milestone composition) plus the orchestrating [`SignalEngine`].

pub mod buckets;
pub mod evaluators;
pub mod milestones;
pub mod normalize;
pub mod summary;

pub use milestones::build_milestone_summary;
pub use normalize::normalize;
pub use summary::SignalEngine;
