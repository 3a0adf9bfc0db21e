//! Command handlers
//!
//! Each CLI subcommand is a function over a [`ProviderAdapter`] returning
//! the text to print, so `main` only parses arguments and writes output.

use crate::error::DecodeError;
use crate::provider::{DecodeMode, ProviderAdapter, ReferenceSet, ResourceConfig};
use crate::prune::prune_config;
use anyhow::{Context, Result};
use serde_json::Value;
use std::path::Path;

/// How a resource type is classified
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Node,
    Edge,
    None,
}

impl Classification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Node => "node",
            Self::Edge => "edge",
            Self::None => "none",
        }
    }
}

pub fn classify(provider: &dyn ProviderAdapter, resource: &str) -> Classification {
    if provider.is_node(resource) {
        Classification::Node
    } else if provider.is_edge(resource) {
        Classification::Edge
    } else {
        Classification::None
    }
}

/// Parse a resource configuration object from JSON or YAML text
pub fn parse_resource_config(content: &str, yaml: bool) -> Result<ResourceConfig> {
    let value: Value = if yaml {
        serde_yaml::from_str(content).context("Failed to parse YAML resource config")?
    } else {
        serde_json::from_str(content).context("Failed to parse JSON resource config")?
    };

    match value {
        Value::Object(map) => Ok(map),
        other => Err(anyhow::anyhow!(
            "Resource config must be an object, found {}",
            crate::provider::rules::json_kind(&other)
        )),
    }
}

/// Read a resource configuration file; `.yaml`/`.yml` files are read as YAML
pub fn read_resource_config(path: &Path) -> Result<ResourceConfig> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    let yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    parse_resource_config(&content, yaml).with_context(|| format!("Invalid config in {:?}", path))
}

/// Extract references, optionally pruning the config first
///
/// Returns the references together with every malformed value skipped in
/// lenient mode; strict mode fails on the first one instead.
pub fn references(
    provider: &dyn ProviderAdapter,
    resource: &str,
    config: &ResourceConfig,
    mode: DecodeMode,
    prune: bool,
) -> Result<(ReferenceSet, Vec<DecodeError>)> {
    let pruned;
    let config = if prune {
        pruned = prune_config(config, provider.used_attributes());
        &pruned
    } else {
        config
    };

    match mode {
        DecodeMode::Lenient => Ok(provider.resource_in_out_with_skipped(resource, config)),
        DecodeMode::Strict => {
            let refs = provider
                .try_resource_in_out(resource, config)
                .context("Malformed resource config")?;
            Ok((refs, Vec::new()))
        }
    }
}

/// Pretty JSON schema of a resource or data source
///
/// Lookup failures keep the [`crate::error::ProviderError`] and its schema
/// cause in the error chain, under a context naming the error kind.
pub fn describe(
    provider: &dyn ProviderAdapter,
    resource: &str,
    data_source: bool,
) -> Result<String> {
    let info = if data_source {
        provider.data_source(resource)
    } else {
        provider.resource(resource)
    };
    let info = info.map_err(|e| {
        let kind = e.kind();
        anyhow::Error::new(e).context(format!("{:?}", kind))
    })?;

    serde_json::to_string_pretty(info).context("Failed to serialize schema")
}

/// Used attributes, one per line
pub fn attributes(provider: &dyn ProviderAdapter) -> String {
    provider.used_attributes().join("\n")
}

/// Pruned config as pretty JSON
pub fn prune(provider: &dyn ProviderAdapter, config: &ResourceConfig) -> Result<String> {
    let pruned = prune_config(config, provider.used_attributes());
    serde_json::to_string_pretty(&pruned).context("Failed to serialize pruned config")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, ProviderError};
    use crate::provider::{get_provider, ProviderType};
    use serde_json::json;

    fn openstack() -> Box<dyn ProviderAdapter> {
        get_provider(ProviderType::OpenStack)
    }

    #[test]
    fn test_classify() {
        let p = openstack();
        assert_eq!(
            classify(p.as_ref(), "openstack_compute_instance_v2"),
            Classification::Node
        );
        assert_eq!(
            classify(p.as_ref(), "openstack_lb_member_v2"),
            Classification::Edge
        );
        assert_eq!(classify(p.as_ref(), "aws_instance").as_str(), "none");
    }

    #[test]
    fn test_parse_yaml_config() {
        let config = parse_resource_config(
            "direction: ingress\nremote_group_id: sg-a\nport_range_min: 22\n",
            true,
        )
        .unwrap();
        assert_eq!(config["direction"], json!("ingress"));
        assert_eq!(config["port_range_min"], json!(22));
    }

    #[test]
    fn test_parse_rejects_non_object() {
        let err = parse_resource_config("[1, 2]", false).unwrap_err();
        assert!(err.to_string().contains("found list"));
    }

    #[test]
    fn test_read_resource_config_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("port.yml");
        std::fs::write(&path, "security_group_ids:\n  - sg-x\n  - sg-y\n").unwrap();

        let config = read_resource_config(&path).unwrap();
        assert_eq!(config["security_group_ids"], json!(["sg-x", "sg-y"]));
    }

    #[test]
    fn test_references_strict_and_lenient() {
        let p = openstack();
        let config = json!({"pool_id": false}).as_object().cloned().unwrap();

        let (lenient, skipped) = references(
            p.as_ref(),
            "openstack_lb_member_v2",
            &config,
            DecodeMode::Lenient,
            false,
        )
        .unwrap();
        assert!(lenient.is_empty());
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].field, "pool_id");

        assert!(references(
            p.as_ref(),
            "openstack_lb_member_v2",
            &config,
            DecodeMode::Strict,
            false
        )
        .is_err());
    }

    #[test]
    fn test_references_with_prune() {
        let p = openstack();
        let config = json!({"instance_id": "srv-1", "port_id": "port-1"})
            .as_object()
            .cloned()
            .unwrap();
        let (refs, skipped) = references(
            p.as_ref(),
            "openstack_compute_interface_attach_v2",
            &config,
            DecodeMode::Strict,
            true,
        )
        .unwrap();
        assert_eq!(refs.ins, vec!["srv-1"]);
        assert!(skipped.is_empty());
    }

    #[test]
    fn test_references_reports_numeric_yaml_id() {
        let p = openstack();
        let config = parse_resource_config("instance_id: 12345\n", true).unwrap();
        let (refs, skipped) = references(
            p.as_ref(),
            "openstack_compute_interface_attach_v2",
            &config,
            DecodeMode::Lenient,
            false,
        )
        .unwrap();
        assert!(refs.is_empty());
        assert_eq!(skipped.len(), 1);
        assert_eq!(
            skipped[0].to_string(),
            "openstack_compute_interface_attach_v2.instance_id: expected string, found number"
        );
    }

    #[test]
    fn test_describe() {
        let p = openstack();
        let out = describe(p.as_ref(), "openstack_lb_pool_v2", false).unwrap();
        assert!(out.contains("\"listener_id\""));

        let err = describe(p.as_ref(), "openstack_lb_pool_v2", true).unwrap_err();
        let provider_err = err
            .downcast_ref::<ProviderError>()
            .expect("provider error should stay in the chain");
        assert_eq!(provider_err.kind(), ErrorKind::NotFoundDataSource);
    }

    #[test]
    fn test_describe_error_keeps_schema_cause() {
        let p = openstack();
        let err = describe(p.as_ref(), "openstack_made_up_v1", false).unwrap_err();
        let chain: Vec<String> = err.chain().map(|e| e.to_string()).collect();
        assert_eq!(
            chain,
            vec![
                "NotFoundResource".to_string(),
                "could not get resource \"openstack_made_up_v1\"".to_string(),
                "no resource schema documented for \"openstack_made_up_v1\"".to_string(),
            ]
        );
    }

    #[test]
    fn test_attributes_lists_one_per_line() {
        let out = attributes(openstack().as_ref());
        assert_eq!(out.lines().next(), Some("id"));
        assert!(out.lines().any(|l| l == "security_group_ids"));
    }

    #[test]
    fn test_prune_output() {
        let config = json!({"id": "x", "name": "drop-me"})
            .as_object()
            .cloned()
            .unwrap();
        let out = prune(openstack().as_ref(), &config).unwrap();
        assert!(out.contains("\"id\""));
        assert!(!out.contains("drop-me"));
    }
}
