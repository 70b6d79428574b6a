//! Application services — use-case orchestration.
//!
//! Each service module implements one convergence concern by composing
//! domain specs with port trait calls. Services import only from
//! `crate::domain` and `crate::application::ports`, never from
//! `crate::infra`, `crate::commands`, or `crate::output`.

pub mod command;
pub mod facts;
pub mod materialize;
pub mod provision;
pub mod smf;
