//! Public combat API surface.
//!
//! [`CombatService`] is the transport-agnostic entry point: it takes the raw
//! `Authorization` header and request parameters, authenticates the caller,
//! and routes to the lifecycle manager or the action resolver. Every failure
//! comes back as a [`CombatError`] with a status code attached.

pub mod errors;
pub mod service;

pub use errors::{CombatError, ErrorBody, Result};
pub use service::{ChallengeRequest, CombatService};
