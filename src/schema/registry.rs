//! Schema Registry - Load resource documentation from JSON
//!
//! The OpenStack catalog is embedded at compile time and parsed once on
//! first access. Other catalogs can be built from any JSON document with
//! the same layout.

use super::{SchemaInfo, SchemaLookup};
use crate::error::{SchemaError, SchemaKind};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Embedded catalog files (compiled into the binary)
const OPENSTACK_CATALOG: &str = include_str!("../resources/openstack.json");

/// Root structure of resources/*.json
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SchemaCatalog {
    #[serde(default)]
    resources: HashMap<String, SchemaInfo>,
    #[serde(default)]
    data_sources: HashMap<String, SchemaInfo>,
}

impl SchemaCatalog {
    /// Parse a catalog document, filling in names and data-source flags
    pub fn from_json(content: &str) -> serde_json::Result<Self> {
        let mut catalog: SchemaCatalog = serde_json::from_str(content)?;

        for (name, info) in catalog.resources.iter_mut() {
            info.name = name.clone();
            info.is_data_source = false;
        }
        for (name, info) in catalog.data_sources.iter_mut() {
            info.name = name.clone();
            info.is_data_source = true;
        }

        Ok(catalog)
    }
}

impl SchemaLookup for SchemaCatalog {
    fn lookup_resource(&self, name: &str) -> Result<&SchemaInfo, SchemaError> {
        tracing::debug!("lookup_resource: {}", name);
        self.resources.get(name).ok_or_else(|| SchemaError::NotFound {
            kind: SchemaKind::Resource,
            name: name.to_string(),
        })
    }

    fn lookup_data_source(&self, name: &str) -> Result<&SchemaInfo, SchemaError> {
        tracing::debug!("lookup_data_source: {}", name);
        self.data_sources.get(name).ok_or_else(|| SchemaError::NotFound {
            kind: SchemaKind::DataSource,
            name: name.to_string(),
        })
    }
}

static OPENSTACK: OnceLock<SchemaCatalog> = OnceLock::new();

/// Get the OpenStack catalog (parses the embedded JSON on first access)
pub fn openstack_catalog() -> &'static SchemaCatalog {
    OPENSTACK.get_or_init(|| {
        SchemaCatalog::from_json(OPENSTACK_CATALOG)
            .unwrap_or_else(|e| panic!("Failed to parse embedded OpenStack catalog: {}", e))
    })
}
