use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Static metadata describing a module's identity, capabilities, and
/// compatibility hints.
///
/// `provides` and `requires` are informational: the loader warns when a
/// required capability is absent at load time but never blocks or reorders.
/// Registration order is the dependency mechanism, and callers must order
/// their `use_module` calls accordingly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleManifest {
    /// Globally unique module name, used as the config key and in logs.
    pub name: String,
    pub version: String,
    /// Capability names this module intends to register.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub provides: Vec<String>,
    /// Capability names expected to already be registered at load time.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requires: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub optional_dependencies: Vec<String>,
    /// Compatibility metadata keyed by the other module's name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub pairs_with: BTreeMap<String, Pairing>,
    /// State-store keys this module publishes, with human descriptions.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub publishes: BTreeMap<String, String>,
}

impl ModuleManifest {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            provides: Vec::new(),
            requires: Vec::new(),
            optional_dependencies: Vec::new(),
            pairs_with: BTreeMap::new(),
            publishes: BTreeMap::new(),
        }
    }

    pub fn provides(mut self, capabilities: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.provides = capabilities.into_iter().map(Into::into).collect();
        self
    }

    pub fn requires(mut self, capabilities: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.requires = capabilities.into_iter().map(Into::into).collect();
        self
    }

    pub fn publishes(mut self, key: impl Into<String>, description: impl Into<String>) -> Self {
        self.publishes.insert(key.into(), description.into());
        self
    }

    pub fn pairs_with(mut self, module: impl Into<String>, pairing: Pairing) -> Self {
        self.pairs_with.insert(module.into(), pairing);
        self
    }
}

/// Why and how strongly a module pairs with another.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pairing {
    pub reason: String,
    pub strength: PairingStrength,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Pairing {
    pub fn new(reason: impl Into<String>, strength: PairingStrength) -> Self {
        Self {
            reason: reason.into(),
            strength,
            category: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairingStrength {
    Required,
    Recommended,
    Compatible,
    Optional,
}
