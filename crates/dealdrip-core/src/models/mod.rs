//! Data models shared across the dealdrip crates.

pub mod config;
