//! Table-driven adapter
//!
//! Providers differ only in their tables, so a single adapter type takes
//! the classification table, the reference rules, the used-attributes list
//! and a schema lookup, and implements [`ProviderAdapter`] on top of them.

use super::rules::{DecodeMode, ReferenceSet, ResourceConfig, RuleTable};
use super::{ProviderAdapter, ProviderType};
use crate::error::{DecodeError, ProviderError};
use crate::schema::{SchemaInfo, SchemaLookup};
use std::collections::HashSet;

/// Node and edge resource types of one provider
#[derive(Debug, Clone, Default)]
pub struct ClassificationTable {
    nodes: HashSet<&'static str>,
    edges: HashSet<&'static str>,
}

impl ClassificationTable {
    /// # Panics
    ///
    /// Panics if a type is listed as both node and edge.
    pub fn new(nodes: &[&'static str], edges: &[&'static str]) -> Self {
        let nodes: HashSet<&'static str> = nodes.iter().copied().collect();
        let edges: HashSet<&'static str> = edges.iter().copied().collect();

        if let Some(both) = nodes.intersection(&edges).next() {
            panic!("resource type {} is classified as both node and edge", both);
        }

        Self { nodes, edges }
    }

    pub fn is_node(&self, resource: &str) -> bool {
        self.nodes.contains(resource)
    }

    pub fn is_edge(&self, resource: &str) -> bool {
        self.edges.contains(resource)
    }
}

/// A [`ProviderAdapter`] built from static tables
#[derive(Debug, Clone)]
pub struct TableProvider<L> {
    provider: ProviderType,
    classification: ClassificationTable,
    rules: RuleTable,
    used_attributes: Vec<&'static str>,
    schema: L,
}

impl<L: SchemaLookup> TableProvider<L> {
    /// # Panics
    ///
    /// Panics if a rule reads a field missing from `used_attributes`, or if
    /// `used_attributes` lists a field twice.
    pub fn new(
        provider: ProviderType,
        classification: ClassificationTable,
        rules: RuleTable,
        used_attributes: &[&'static str],
        schema: L,
    ) -> Self {
        let mut seen = HashSet::new();
        for attr in used_attributes {
            assert!(seen.insert(*attr), "used attribute {} listed twice", attr);
        }
        for field in rules.fields() {
            assert!(
                seen.contains(field),
                "field {} is read by a rule but not listed as used",
                field
            );
        }

        Self {
            provider,
            classification,
            rules,
            used_attributes: used_attributes.to_vec(),
            schema,
        }
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }
}

impl<L: SchemaLookup> ProviderAdapter for TableProvider<L> {
    fn provider_type(&self) -> ProviderType {
        self.provider
    }

    fn is_node(&self, resource: &str) -> bool {
        self.classification.is_node(resource)
    }

    fn is_edge(&self, resource: &str) -> bool {
        self.classification.is_edge(resource)
    }

    fn resource(&self, resource: &str) -> Result<&SchemaInfo, ProviderError> {
        self.schema
            .lookup_resource(resource)
            .map_err(|source| ProviderError::NotFoundResource {
                name: resource.to_string(),
                source,
            })
    }

    fn data_source(&self, resource: &str) -> Result<&SchemaInfo, ProviderError> {
        self.schema
            .lookup_data_source(resource)
            .map_err(|source| ProviderError::NotFoundDataSource {
                name: resource.to_string(),
                source,
            })
    }

    fn try_resource_in_out(
        &self,
        resource: &str,
        config: &ResourceConfig,
    ) -> Result<ReferenceSet, DecodeError> {
        self.rules.extract(resource, config, DecodeMode::Strict)
    }

    fn resource_in_out(&self, resource: &str, config: &ResourceConfig) -> ReferenceSet {
        self.rules.extract_lenient(resource, config).0
    }

    fn resource_in_out_with_skipped(
        &self,
        resource: &str,
        config: &ResourceConfig,
    ) -> (ReferenceSet, Vec<DecodeError>) {
        self.rules.extract_lenient(resource, config)
    }

    fn used_attributes(&self) -> &[&'static str] {
        &self.used_attributes
    }
}
