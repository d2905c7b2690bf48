//! Release decision and orchestration
//!
//! Every run resolves to exactly one action:
//!
//! 1. **Skip**: no changesets, no publish script. Nothing to do.
//! 2. **PublishOnly**: no changesets but a publish script is configured.
//!    Registry credentials are reconciled and the publish script runs,
//!    picking up anything merged but not yet published.
//! 3. **SkipEmptyChangesets**: changesets exist but none of them releases
//!    a package. No PR is opened.
//! 4. **OpenVersionPR**: pending changesets demand a version PR, which is
//!    created or force-updated in place.
//!
//! The decision itself is a pure function of observed facts
//! ([`ReleaseState`]); all side effects live in the [`Orchestrator`].

pub mod decision;
pub mod orchestrator;

pub use decision::{ReleaseAction, ReleaseState};
pub use orchestrator::Orchestrator;
