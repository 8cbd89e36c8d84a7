//! Entity definitions for database row mappings.

pub mod goal;

pub use goal::{GoalTierRow, PackageGoalRow};
