pub mod scheduler;
pub mod signal_sweep;

pub use scheduler::{Job, JobFrequency, JobScheduler};
pub use signal_sweep::SignalSweepJob;
