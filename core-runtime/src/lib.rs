//! # Core Runtime Module
//!
//! Foundational runtime infrastructure for the player core:
//! - Logging and tracing setup
//! - Runtime configuration and bridge injection
//! - Playback event bus
//!
//! Other workspace crates depend on this one for the conventions they log,
//! configure and publish events with.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use error::{Error, Result};
