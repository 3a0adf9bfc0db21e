//! Reference rules
//!
//! Each edge-typed resource has a short list of rules saying which
//! configuration field holds a reference to another resource, what shape
//! that field has, and whether the reference is an inbound or outbound
//! endpoint. Values are decoded into the expected shape before use; a
//! value of the wrong shape yields a [`DecodeError`] instead of trapping.

use crate::error::{DecodeError, ValueShape};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

/// Decoded configuration of one declared resource
pub type ResourceConfig = serde_json::Map<String, Value>;

/// Side of an edge a reference lands on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    In,
    Out,
}

/// How a rule decides which endpoint its references go to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Fixed(Endpoint),
    /// `then` when `field` holds exactly `equals`, `otherwise` in every other
    /// case including when `field` is absent
    Switch {
        field: &'static str,
        equals: &'static str,
        then: Endpoint,
        otherwise: Endpoint,
    },
}

/// One field read by an edge rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefRule {
    pub field: &'static str,
    pub shape: ValueShape,
    pub target: Target,
}

impl RefRule {
    /// A single string reference appended to `ins`
    pub const fn single(field: &'static str) -> Self {
        Self {
            field,
            shape: ValueShape::String,
            target: Target::Fixed(Endpoint::In),
        }
    }

    /// A list of string references, each appended to `ins`
    pub const fn list(field: &'static str) -> Self {
        Self {
            field,
            shape: ValueShape::StringList,
            target: Target::Fixed(Endpoint::In),
        }
    }

    pub const fn with_target(mut self, target: Target) -> Self {
        self.target = target;
        self
    }

    /// Every configuration field this rule may read
    pub fn fields(&self) -> Vec<&'static str> {
        match self.target {
            Target::Fixed(_) => vec![self.field],
            Target::Switch { field, .. } => vec![field, self.field],
        }
    }
}

/// What to do with a value of the wrong shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodeMode {
    /// Skip the value and log a warning
    #[default]
    Lenient,
    /// Stop at the first malformed value
    Strict,
}

/// Inbound and outbound references found in one resource
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReferenceSet {
    pub ins: Vec<String>,
    pub outs: Vec<String>,
}

impl ReferenceSet {
    pub fn push(&mut self, endpoint: Endpoint, id: &str) {
        match endpoint {
            Endpoint::In => self.ins.push(id.to_string()),
            Endpoint::Out => self.outs.push(id.to_string()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.ins.is_empty() && self.outs.is_empty()
    }

    pub fn into_parts(self) -> (Vec<String>, Vec<String>) {
        (self.ins, self.outs)
    }
}

/// Reference rules keyed by resource type
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    rules: HashMap<&'static str, Vec<RefRule>>,
}

impl RuleTable {
    /// Add the rules for one resource type
    pub fn with(mut self, resource: &'static str, rules: &[RefRule]) -> Self {
        self.rules.insert(resource, rules.to_vec());
        self
    }

    /// Rules for a resource type, empty when it has none
    pub fn rules_for(&self, resource: &str) -> &[RefRule] {
        self.rules.get(resource).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Resource types that have at least one rule
    pub fn resource_types(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.keys().copied()
    }

    /// Every field name read by any rule, without duplicates
    pub fn fields(&self) -> Vec<&'static str> {
        let mut fields: Vec<&'static str> = self
            .rules
            .values()
            .flatten()
            .flat_map(RefRule::fields)
            .collect();
        fields.sort_unstable();
        fields.dedup();
        fields
    }

    /// Apply the rules for `resource` to `config`
    ///
    /// Missing fields (and explicit nulls) never produce references or
    /// errors. In [`DecodeMode::Lenient`] this never fails.
    pub fn extract(
        &self,
        resource: &str,
        config: &ResourceConfig,
        mode: DecodeMode,
    ) -> Result<ReferenceSet, DecodeError> {
        let mut skipped = Vec::new();
        self.extract_into(resource, config, mode, &mut skipped)
    }

    /// Lenient extraction that also returns every value it skipped
    pub fn extract_lenient(
        &self,
        resource: &str,
        config: &ResourceConfig,
    ) -> (ReferenceSet, Vec<DecodeError>) {
        let mut skipped = Vec::new();
        let refs = self
            .extract_into(resource, config, DecodeMode::Lenient, &mut skipped)
            .unwrap_or_default();
        (refs, skipped)
    }

    fn extract_into(
        &self,
        resource: &str,
        config: &ResourceConfig,
        mode: DecodeMode,
        skipped: &mut Vec<DecodeError>,
    ) -> Result<ReferenceSet, DecodeError> {
        let mut refs = ReferenceSet::default();

        for rule in self.rules_for(resource) {
            if let Err(err) = apply_rule(rule, resource, config, mode, &mut refs, skipped) {
                match mode {
                    DecodeMode::Strict => return Err(err),
                    DecodeMode::Lenient => {
                        tracing::warn!("skipping malformed value: {}", err);
                        skipped.push(err);
                    }
                }
            }
        }

        Ok(refs)
    }
}

fn apply_rule(
    rule: &RefRule,
    resource: &str,
    config: &ResourceConfig,
    mode: DecodeMode,
    refs: &mut ReferenceSet,
    skipped: &mut Vec<DecodeError>,
) -> Result<(), DecodeError> {
    let Some(value) = present(config, rule.field) else {
        return Ok(());
    };

    let endpoint = match rule.target {
        Target::Fixed(endpoint) => endpoint,
        Target::Switch {
            field,
            equals,
            then,
            otherwise,
        } => {
            let selected = match present(config, field) {
                Some(selector) => decode_string(resource, field, selector)? == equals,
                None => false,
            };
            if selected {
                then
            } else {
                otherwise
            }
        }
    };

    match rule.shape {
        ValueShape::String => {
            refs.push(endpoint, decode_string(resource, rule.field, value)?);
        }
        ValueShape::StringList => {
            for id in decode_string_list(resource, rule.field, value, mode, skipped)? {
                refs.push(endpoint, id);
            }
        }
    }

    Ok(())
}

/// A field counts as absent when missing or null
fn present<'a>(config: &'a ResourceConfig, field: &str) -> Option<&'a Value> {
    config.get(field).filter(|v| !v.is_null())
}

/// Decode a value expected to be a string
pub fn decode_string<'a>(
    resource: &str,
    field: &str,
    value: &'a Value,
) -> Result<&'a str, DecodeError> {
    value
        .as_str()
        .ok_or_else(|| mismatch(resource, field, ValueShape::String, value))
}

/// Decode a value expected to be a list of strings
///
/// In lenient mode non-string elements are skipped one by one and recorded
/// in `skipped`; a value that is not a list at all is always an error.
pub fn decode_string_list<'a>(
    resource: &str,
    field: &str,
    value: &'a Value,
    mode: DecodeMode,
    skipped: &mut Vec<DecodeError>,
) -> Result<Vec<&'a str>, DecodeError> {
    let Value::Array(items) = value else {
        return Err(mismatch(resource, field, ValueShape::StringList, value));
    };

    let mut out = Vec::with_capacity(items.len());
    for item in items {
        match item.as_str() {
            Some(s) => out.push(s),
            None => {
                let err = mismatch(resource, field, ValueShape::StringList, item);
                if mode == DecodeMode::Strict {
                    return Err(err);
                }
                tracing::warn!("skipping malformed list element: {}", err);
                skipped.push(err);
            }
        }
    }

    Ok(out)
}

fn mismatch(resource: &str, field: &str, expected: ValueShape, found: &Value) -> DecodeError {
    DecodeError {
        resource_type: resource.to_string(),
        field: field.to_string(),
        expected,
        found: json_kind(found),
    }
}

/// Name of a JSON value's kind, for diagnostics
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}
