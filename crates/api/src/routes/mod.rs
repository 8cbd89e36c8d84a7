pub mod health;
pub mod milestones;
pub mod signals;
