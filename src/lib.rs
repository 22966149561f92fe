//! Client-side actor for a platform control-plane API
//!
//! Resolves human-supplied names to unique resources, performs state changes
//! and drives the resulting server-side jobs to completion, returning every
//! advisory warning the API attached along the way.

pub mod actor;
pub mod api;
pub mod config;
pub mod warnings;

pub use actor::{Actor, ActorError, Outcome};
pub use warnings::Warnings;
