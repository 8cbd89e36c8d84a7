//! Domain models for engagement signals.

pub mod event;
pub mod goal;
pub mod milestone;
pub mod signal;

pub use event::{NormalizedEvent, RawEvent};
pub use goal::{GoalTier, GoalTierMap, PackageGoalMap};
pub use milestone::MilestoneSummary;
pub use signal::{RegistrationEvaluation, RegistrationThresholds, SignalSummary, SignalThresholds};
