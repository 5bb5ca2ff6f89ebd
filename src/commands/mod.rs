// ABOUTME: Command module aggregator for the bg-restage CLI.
// ABOUTME: Re-exports the redeploy command handler.

mod redeploy;

pub use redeploy::{Recipe, redeploy};
