//! Schema lookup
//!
//! Provider adapters describe resource types by delegating to a schema
//! collaborator. The collaborator only has to answer "what does this type
//! look like" for resources and data sources; it never classifies.
//!
//! - [`registry`] - Catalog of documented types loaded from embedded JSON

mod registry;

pub use registry::*;

use crate::error::SchemaError;
use serde::{Deserialize, Serialize};

/// One documented attribute of a resource or data source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeInfo {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub computed: bool,
}

/// Documented shape of a resource type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaInfo {
    /// Filled in from the catalog key when loading
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_data_source: bool,
    #[serde(default)]
    pub attributes: Vec<AttributeInfo>,
}

impl SchemaInfo {
    /// Look up an attribute by name
    pub fn attribute(&self, name: &str) -> Option<&AttributeInfo> {
        self.attributes.iter().find(|a| a.name == name)
    }
}

/// Capability a provider adapter needs to describe resource types
pub trait SchemaLookup: Send + Sync {
    fn lookup_resource(&self, name: &str) -> Result<&SchemaInfo, SchemaError>;

    fn lookup_data_source(&self, name: &str) -> Result<&SchemaInfo, SchemaError>;
}

impl<T: SchemaLookup + ?Sized> SchemaLookup for &T {
    fn lookup_resource(&self, name: &str) -> Result<&SchemaInfo, SchemaError> {
        (**self).lookup_resource(name)
    }

    fn lookup_data_source(&self, name: &str) -> Result<&SchemaInfo, SchemaError> {
        (**self).lookup_data_source(name)
    }
}
