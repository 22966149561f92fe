//! Control-plane API interaction module
//!
//! This module is the transport the actor sits on: individual remote calls,
//! each returning a result together with the warnings the server attached.
//!
//! # Module Structure
//!
//! - [`client`] - The [`CloudControllerClient`] capability and its HTTP implementation
//! - [`http`] - HTTP utilities, warnings header decoding, error extraction
//! - [`query`] - Listing filter clauses
//! - [`types`] - Resources, jobs and the per-call [`Reply`]
//! - [`fake`] - In-memory client with scripted replies
//!
//! # Example
//!
//! ```ignore
//! use platctl::api::{CloudControllerClient, HttpCloudControllerClient, Query, ResourceKind};
//!
//! async fn example() -> anyhow::Result<()> {
//!     let client = HttpCloudControllerClient::new("https://api.example.com", "token")?;
//!     let reply = client
//!         .list_resources(ResourceKind::Organization, &[Query::name_equals("my-org")])
//!         .await;
//!     let orgs = reply.result?;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod fake;
pub mod http;
pub mod query;
pub mod types;

pub use client::{CloudControllerClient, HttpCloudControllerClient};
pub use fake::FakeCloudControllerClient;
pub use query::{Filter, Operator, Query};
pub use types::{Job, JobStatus, Reply, Resource, ResourceKind};
