//! tfgraph
//!
//! Provider adapters for an infrastructure-as-code graph mapper. An adapter
//! classifies resource types into graph nodes and edges and extracts the
//! resources an edge's configuration refers to.
//!
//! - [`provider`] - The adapter contract and the OpenStack instantiation
//! - [`schema`] - Schema lookup used to describe resource types
//! - [`prune`] - Trimming configuration to the attributes a provider reads
//! - [`commands`] - Handlers behind the `tfgraph` binary
//! - [`config`] - Persisted user defaults

pub mod commands;
pub mod config;
pub mod error;
pub mod provider;
pub mod prune;
pub mod schema;

pub use error::{DecodeError, ErrorKind, ProviderError, SchemaError};
pub use provider::{get_provider, ProviderAdapter, ProviderType, ReferenceSet, ResourceConfig};
