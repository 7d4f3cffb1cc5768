// src/lib.rs

//! albawatch Library
//!
//! Polls a campus bulletin board for part-time job listings and relays
//! unseen posts to a Telegram channel.

pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
