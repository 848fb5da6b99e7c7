//! Command handlers that delegate to the backend facade.
//!
//! Handlers follow the canonical pattern:
//! - Signature: `pub async fn execute(ctx: &CliContext, ...) -> Result<()>`
//! - Thin wrappers that:
//!   1. Parse/validate CLI-specific input
//!   2. Call collections through `ctx.backend()`
//!   3. Format output for the terminal
//!
//! Handlers should NOT:
//! - Open database connections
//! - Contain storage logic

pub mod authinfo;
pub mod computer;
pub mod init;
pub mod log;
pub mod paths;
pub mod stats;
pub mod user;
