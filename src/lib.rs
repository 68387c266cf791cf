//! Reelstream - HTTP byte-range video delivery
//!
//! This library crate exposes the server internals for integration testing.

pub mod catalog;
pub mod config;
pub mod server;
pub mod streaming;
