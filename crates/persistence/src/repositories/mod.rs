//! Repository implementations for database operations.

pub mod events;
pub mod goals;

pub use events::EventRepository;
pub use goals::GoalRepository;
