//! Chord lookup simulator module
//!
//! Drives the `chord_sim` core the way an experiment would:
//! - generates a ring of randomly addressed peers
//! - exports the finger-table graph (DOT / SIF)
//! - runs one random lookup per peer per iteration
//! - aggregates path lengths, query load and key gaps into histograms
//! - appends the experiment to a JSON log for offline analysis

pub mod config;
pub mod error;
pub mod generator;
pub mod runner;
pub mod stats;

pub use config::ChordSimConfig;
pub use runner::ChordRunner;
