//! Credential files under the run's `$HOME`
//!
//! Two files, two contracts:
//!
//! - **netrc**: overwritten every run with the bot identity; safe because
//!   CI home directories are ephemeral.
//! - **npmrc**: merged, never overwritten; operators may pre-seed tokens
//!   and those always win.

pub mod netrc;
pub mod npmrc;
