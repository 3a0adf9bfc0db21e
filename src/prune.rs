//! Configuration pruning
//!
//! Drops every configuration field a provider never reads, so only the
//! attributes listed by [`ProviderAdapter::used_attributes`] reach the
//! adapter.
//!
//! [`ProviderAdapter::used_attributes`]: crate::provider::ProviderAdapter::used_attributes

use crate::provider::ResourceConfig;

/// Copy of `config` holding only the fields in `keep`
pub fn prune_config(config: &ResourceConfig, keep: &[&str]) -> ResourceConfig {
    config
        .iter()
        .filter(|(key, _)| keep.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Remove every field not in `keep`, returning how many were dropped
pub fn prune_config_in_place(config: &mut ResourceConfig, keep: &[&str]) -> usize {
    let before = config.len();
    config.retain(|key, _| keep.contains(&key.as_str()));
    let dropped = before - config.len();
    tracing::trace!("pruned {} fields", dropped);
    dropped
}
