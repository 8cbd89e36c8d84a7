//! Domain layer for the engagement signals backend.
//!
//! This crate contains:
//! - Domain models (RawEvent, SignalSummary, MilestoneSummary, goal maps)
//! - The pure signal-evaluation engine and milestone composer
//! - Collaborator traits for the event source and goal store

pub mod engine;
pub mod error;
pub mod models;
pub mod sources;
