//! Provider adapters
//!
//! A provider adapter tells the graph builder which resource types are
//! nodes, which are edges, and which resources an edge's configuration
//! points at. Those rules are provider specific, so each cloud provider is
//! one instantiation of [`ProviderAdapter`].
//!
//! # Architecture
//!
//! - [`rules`] - Typed reference rules and the decode step behind extraction
//! - [`table`] - Generic adapter driven by classification and rule tables
//! - [`openstack`] - The OpenStack tables
//!
//! # Example
//!
//! ```
//! use tfgraph::provider::{get_provider, ProviderType};
//! use serde_json::json;
//!
//! let provider = get_provider(ProviderType::OpenStack);
//! let config = json!({"instance_id": "srv-1"});
//! let refs = provider.resource_in_out(
//!     "openstack_compute_interface_attach_v2",
//!     config.as_object().unwrap(),
//! );
//! assert_eq!(refs.ins, vec!["srv-1"]);
//! ```

pub mod openstack;
pub mod rules;
pub mod table;

pub use rules::{DecodeMode, Endpoint, RefRule, ReferenceSet, ResourceConfig, RuleTable, Target};
pub use table::{ClassificationTable, TableProvider};

use crate::error::{DecodeError, ProviderError, SchemaError, SchemaKind};
use crate::schema::SchemaInfo;
use std::fmt;
use std::str::FromStr;

/// Providers this crate knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderType {
    /// Classifies nothing and references nothing
    Nop,
    OpenStack,
}

impl ProviderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Nop => "nop",
            Self::OpenStack => "openstack",
        }
    }

    pub fn all() -> &'static [ProviderType] {
        &[Self::Nop, Self::OpenStack]
    }
}

impl fmt::Display for ProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderType {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "nop" => Ok(Self::Nop),
            "openstack" => Ok(Self::OpenStack),
            _ => Err(ProviderError::UnknownProvider(s.to_string())),
        }
    }
}

/// Provider-specific knowledge the graph builder needs
///
/// Every method has a no-op default: nothing is a node or an edge, nothing
/// is referenced and no schema is known. Implementations override what
/// their provider supports.
pub trait ProviderAdapter: Send + Sync {
    fn provider_type(&self) -> ProviderType;

    /// Whether resources of this type become graph nodes
    fn is_node(&self, _resource: &str) -> bool {
        false
    }

    /// Whether resources of this type become graph edges
    fn is_edge(&self, _resource: &str) -> bool {
        false
    }

    /// Documented shape of a resource type
    fn resource(&self, resource: &str) -> Result<&SchemaInfo, ProviderError> {
        Err(ProviderError::NotFoundResource {
            name: resource.to_string(),
            source: SchemaError::NotFound {
                kind: SchemaKind::Resource,
                name: resource.to_string(),
            },
        })
    }

    /// Documented shape of a data source type
    fn data_source(&self, resource: &str) -> Result<&SchemaInfo, ProviderError> {
        Err(ProviderError::NotFoundDataSource {
            name: resource.to_string(),
            source: SchemaError::NotFound {
                kind: SchemaKind::DataSource,
                name: resource.to_string(),
            },
        })
    }

    /// References in `config`, failing on the first malformed value
    fn try_resource_in_out(
        &self,
        _resource: &str,
        _config: &ResourceConfig,
    ) -> Result<ReferenceSet, DecodeError> {
        Ok(ReferenceSet::default())
    }

    /// References in `config`; malformed values are skipped with a warning
    fn resource_in_out(&self, _resource: &str, _config: &ResourceConfig) -> ReferenceSet {
        ReferenceSet::default()
    }

    /// Like [`ProviderAdapter::resource_in_out`], also returning every
    /// malformed value that was skipped
    fn resource_in_out_with_skipped(
        &self,
        resource: &str,
        config: &ResourceConfig,
    ) -> (ReferenceSet, Vec<DecodeError>) {
        (self.resource_in_out(resource, config), Vec::new())
    }

    /// Every configuration field [`ProviderAdapter::resource_in_out`] may
    /// read, so callers know what to keep when pruning
    fn used_attributes(&self) -> &[&'static str] {
        &[]
    }
}

/// Adapter with nothing but the trait defaults
#[derive(Debug, Clone, Copy, Default)]
pub struct NopProvider;

impl ProviderAdapter for NopProvider {
    fn provider_type(&self) -> ProviderType {
        ProviderType::Nop
    }
}

/// Build the adapter for a provider
pub fn get_provider(provider: ProviderType) -> Box<dyn ProviderAdapter> {
    tracing::debug!("get_provider: {}", provider);

    match provider {
        ProviderType::Nop => Box::new(NopProvider),
        ProviderType::OpenStack => Box::new(openstack::provider()),
    }
}
