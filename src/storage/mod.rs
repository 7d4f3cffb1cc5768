// src/storage/mod.rs

//! Persistence for the seen-set.

mod seen;

pub use seen::SeenStore;
