//! Error types
//!
//! Library errors are typed so callers can branch on the kind of failure
//! without knowing which provider or schema source produced it. The binary
//! wraps them in `anyhow` with context.

use thiserror::Error;

/// Which catalog a schema lookup was made against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaKind {
    Resource,
    DataSource,
}

impl SchemaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Resource => "resource",
            Self::DataSource => "data source",
        }
    }
}

/// Failure reported by a schema lookup collaborator
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("no {} schema documented for {name:?}", .kind.as_str())]
    NotFound { kind: SchemaKind, name: String },
}

/// Stable, provider-independent error kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFoundResource,
    NotFoundDataSource,
    UnknownProvider,
}

/// Errors surfaced by provider adapters
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("could not get resource {name:?}")]
    NotFoundResource {
        name: String,
        #[source]
        source: SchemaError,
    },
    #[error("could not get data source {name:?}")]
    NotFoundDataSource {
        name: String,
        #[source]
        source: SchemaError,
    },
    #[error("unknown provider {0:?}")]
    UnknownProvider(String),
}

impl ProviderError {
    /// The taxonomy value callers branch on
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFoundResource { .. } => ErrorKind::NotFoundResource,
            Self::NotFoundDataSource { .. } => ErrorKind::NotFoundDataSource,
            Self::UnknownProvider(_) => ErrorKind::UnknownProvider,
        }
    }
}

/// Shape a rule expects a configuration value to have
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueShape {
    String,
    StringList,
}

impl ValueShape {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::StringList => "list of strings",
        }
    }
}

/// A configuration value that does not have the shape a rule reads it as
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{resource_type}.{field}: expected {}, found {found}", .expected.as_str())]
pub struct DecodeError {
    pub resource_type: String,
    pub field: String,
    pub expected: ValueShape,
    /// JSON kind of the value actually present (`number`, `object`, ...)
    pub found: &'static str,
}
