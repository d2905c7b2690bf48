//! CLI commands for railyard
//!
//! - **run**: Execute the release decision for the current checkout:
//!   publish unpublished packages, open or update the version PR, or
//!   skip, and write the run's outputs.
//! - **status**: Report pending changesets and the action a run would
//!   take, without touching git, the registry, or the host.

pub mod run;
pub mod status;

pub use run::run_release;
pub use status::run_status;
