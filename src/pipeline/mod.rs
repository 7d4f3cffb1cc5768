// src/pipeline/mod.rs

//! The polling pipeline: dedup, single tick, and the long-running loop.

mod dedup;
mod runner;
mod tick;

pub use dedup::partition_new;
pub use runner::run_loop;
pub use tick::{TickOutcome, run_tick};
