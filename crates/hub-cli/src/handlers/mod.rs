//! Command handlers that delegate to `HubCore`.
//!
//! Handlers follow the canonical pattern:
//! - Signature: `pub async fn execute(ctx: &CliContext, ...) -> Result<()>`
//! - Thin wrappers that:
//!   1. Turn CLI arguments into core inputs
//!   2. Call `HubCore` services
//!   3. Format output for the terminal
//!
//! Core errors are converted to `CliError` so `main` can pick an exit code.

pub mod labels;
pub mod rate;
pub mod resources;
pub mod submit;
pub mod sync;
