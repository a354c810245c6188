//! Root growth between two anchors
//!
//! `RootGrowth` is the state machine; `GrowthConfig` holds its tunables.

mod config;
mod engine;
mod signal;

pub use config::GrowthConfig;
pub use engine::{RootGrowth, GrowthState, TickOutcome, stem_placement};
pub use signal::{CompletionSignal, ListenerId};
