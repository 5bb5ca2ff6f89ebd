// ABOUTME: Library root for bg-restage - exposes public types for testing.
// ABOUTME: The main binary is in main.rs.

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod platform;
pub mod poller;
pub mod scratch;
pub mod types;
pub mod workflow;
