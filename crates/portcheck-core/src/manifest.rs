//! JSON manifests for ports and adapters loaded at runtime
//!
//! ```json
//! { "name": "ReservationPort", "extends": ["HealthPort"],
//!   "operations": ["list_reservations", {"name": "find", "arity": 1}] }
//! ```
//!
//! An adapter manifest describes what an externally loaded adapter exposes:
//!
//! ```json
//! { "name": "FakerReservations", "operations": ["list_reservations"] }
//! ```

use serde::{Deserialize, Serialize};

use crate::adapter::Adapter;
use crate::port::{OperationSpec, PortDefinition};
use crate::Result;

/// A port operation as written in a manifest: bare name or `{name, arity}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OperationEntry {
    Name(String),
    Spec(OperationSpec),
}

impl From<OperationEntry> for OperationSpec {
    fn from(entry: OperationEntry) -> Self {
        match entry {
            OperationEntry::Name(name) => OperationSpec::new(name),
            OperationEntry::Spec(spec) => spec,
        }
    }
}

/// On-disk form of a port definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PortManifest {
    pub name: String,
    #[serde(default)]
    pub extends: Vec<String>,
    pub operations: Vec<OperationEntry>,
}

impl PortManifest {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Validate into a definition handle.
    ///
    /// # Errors
    /// `InvalidDefinition` under the same rules as [`PortDefinition::define`].
    pub fn into_definition(self) -> Result<PortDefinition> {
        Ok(PortDefinition::define(self.name, self.operations)?.extending(self.extends))
    }
}

impl TryFrom<PortManifest> for PortDefinition {
    type Error = crate::Error;

    fn try_from(manifest: PortManifest) -> Result<Self> {
        manifest.into_definition()
    }
}

/// Parse and validate a port manifest in one step
pub fn port_from_json(json: &str) -> Result<PortDefinition> {
    PortManifest::from_json(json)?.into_definition()
}

/// Declared operation surface of an externally loaded adapter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdapterManifest {
    pub name: String,
    #[serde(default)]
    pub operations: Vec<String>,
}

impl AdapterManifest {
    pub fn new<I>(name: impl Into<String>, operations: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            name: name.into(),
            operations: operations.into_iter().map(Into::into).collect(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Adapter for AdapterManifest {
    fn responds_to(&self, operation: &str) -> bool {
        self.operations.iter().any(|op| op == operation)
    }

    fn adapter_name(&self) -> &str {
        &self.name
    }
}
