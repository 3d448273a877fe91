//! Mirror Sync - runner library.
//!
//! Everything around the pure engine: environment configuration, the
//! snapshot-source and remote-store collaborator traits with their concrete
//! implementations, the built-in table jobs, and the orchestrator that runs
//! them in sequence.

pub mod config;
pub mod error;
pub mod remote;
pub mod runner;
pub mod source;
pub mod tables;
