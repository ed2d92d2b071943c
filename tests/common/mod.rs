//! Shared helpers for integration tests.
#![allow(dead_code)]

use std::collections::HashMap;

use settings_catalog::reconcile::SettingsEndpoint;
use settings_catalog::wire::ConfiguredSetting;
use settings_catalog::{Error, Result};

/// In-memory stand-in for the remote settings endpoint.
///
/// Stores each policy's setting list and round-trips every write through
/// JSON, so tests exercise the same serialization the real transport would.
/// Like the service, it stamps stored wrappers with element IDs.
pub struct InMemoryEndpoint {
    policies: HashMap<String, Vec<ConfiguredSetting>>,
    pub replace_calls: usize,
}

impl InMemoryEndpoint {
    pub fn new() -> Self {
        Self {
            policies: HashMap::new(),
            replace_calls: 0,
        }
    }

    /// Create the endpoint with one existing, empty policy.
    pub fn with_policy(policy_id: &str) -> Self {
        let mut endpoint = Self::new();
        endpoint.policies.insert(policy_id.to_string(), Vec::new());
        endpoint
    }

    /// Overwrite a policy's stored settings directly, simulating an
    /// out-of-band remote edit.
    pub fn put_raw(&mut self, policy_id: &str, settings: Vec<ConfiguredSetting>) {
        self.policies.insert(policy_id.to_string(), settings);
    }

    /// The stored wire list for a policy.
    pub fn stored(&self, policy_id: &str) -> &[ConfiguredSetting] {
        self.policies
            .get(policy_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

impl Default for InMemoryEndpoint {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsEndpoint for InMemoryEndpoint {
    fn replace_settings(
        &mut self,
        policy_id: &str,
        settings: Vec<ConfiguredSetting>,
    ) -> Result<()> {
        if !self.policies.contains_key(policy_id) {
            return Err(Error::Endpoint(format!("policy '{policy_id}' not found")));
        }
        self.replace_calls += 1;

        // Serialize and re-parse to mimic the transport boundary.
        let json = serde_json::to_string(&settings)
            .map_err(|e| Error::Endpoint(format!("serialize: {e}")))?;
        let mut stored: Vec<ConfiguredSetting> = serde_json::from_str(&json)
            .map_err(|e| Error::Endpoint(format!("deserialize: {e}")))?;
        for (i, wrapper) in stored.iter_mut().enumerate() {
            wrapper.id = Some(i.to_string());
        }

        self.policies.insert(policy_id.to_string(), stored);
        Ok(())
    }

    fn fetch_settings(&self, policy_id: &str) -> Result<Vec<ConfiguredSetting>> {
        self.policies
            .get(policy_id)
            .cloned()
            .ok_or_else(|| Error::Endpoint(format!("policy '{policy_id}' not found")))
    }
}
