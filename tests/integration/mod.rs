//! Integration tests for railyard
//!
//! Every test runs the real binary against a throwaway git repository
//! with a local bare origin, a fake `$HOME`, and a private
//! `$GITHUB_OUTPUT` file. Nothing here talks to a real registry or a
//! real host API.

mod helpers;
mod test_run;
mod test_status;
