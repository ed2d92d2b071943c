//! Replace-based reconciliation between declared and remote settings.
//!
//! Writes are always a full bulk replace of the policy's setting list; the
//! wire schema has no stable per-element identity a client could diff
//! against safely, so correctness comes from submitting the complete desired
//! set and re-deriving drift purely from decoded read-back. Removal is an
//! explicit clear (empty list), not deletion of the parent policy. Drift is
//! detected and surfaced, never auto-corrected.
//!
//! The engine is synchronous and stateless between calls. Concurrent writers
//! to the same policy race at the transport layer with last-write-wins
//! semantics; callers needing at-most-one-writer guarantees must serialize
//! externally.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::Result;
use crate::codec;
use crate::models::DeclaredSetting;
use crate::wire::ConfiguredSetting;

/// Access to a policy's settings endpoint.
///
/// Implementations own transport, retries, and authentication; the engine
/// only hands over complete wire lists and reads them back. Failures are
/// reported as [`crate::Error::Endpoint`].
pub trait SettingsEndpoint {
    /// Replace the policy's full setting list with `settings`.
    fn replace_settings(
        &mut self,
        policy_id: &str,
        settings: Vec<ConfiguredSetting>,
    ) -> Result<()>;

    /// Fetch the policy's current setting list.
    fn fetch_settings(&self, policy_id: &str) -> Result<Vec<ConfiguredSetting>>;
}

/// Synchronization status of a policy's setting list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    /// Remote matches the declared list element-for-element.
    InSync,
    /// Remote and declared lists disagree; see the drift entries.
    Drifted,
    /// Settings are declared but the remote list is empty.
    Absent,
}

/// One element-level discrepancy between declared and remote state.
///
/// Lists are compared element-wise by position: definition ID first, then
/// structural equality. Length mismatches surface as missing or unexpected
/// tail elements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "drift", rename_all = "snake_case")]
pub enum Drift {
    /// The element at this position differs from what was declared.
    Changed {
        index: usize,
        definition_id: String,
        declared: DeclaredSetting,
        observed: DeclaredSetting,
    },
    /// Declared but absent from the remote list.
    Missing { index: usize, definition_id: String },
    /// Present remotely but not declared.
    Unexpected { index: usize, definition_id: String },
}

/// The outcome of comparing declared state against decoded read-back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriftReport {
    /// The policy whose settings were compared.
    pub policy_id: String,

    /// When the comparison ran.
    pub detected_at: DateTime<Utc>,

    /// Number of declared settings.
    pub declared_count: usize,

    /// Number of settings decoded from the remote list.
    pub observed_count: usize,

    /// Element-level discrepancies, in list order.
    pub drifts: Vec<Drift>,
}

impl DriftReport {
    /// Compare a declared list against a decoded remote list.
    pub fn compare(
        policy_id: impl Into<String>,
        declared: &[DeclaredSetting],
        observed: &[DeclaredSetting],
    ) -> Self {
        Self {
            policy_id: policy_id.into(),
            detected_at: Utc::now(),
            declared_count: declared.len(),
            observed_count: observed.len(),
            drifts: diff(declared, observed),
        }
    }

    /// The overall status this report amounts to.
    pub fn status(&self) -> SyncStatus {
        if self.observed_count == 0 && self.declared_count > 0 {
            SyncStatus::Absent
        } else if self.drifts.is_empty() {
            SyncStatus::InSync
        } else {
            SyncStatus::Drifted
        }
    }

    /// Whether declared and remote state agree.
    pub fn is_in_sync(&self) -> bool {
        self.status() == SyncStatus::InSync
    }
}

/// Element-wise comparison of two ordered declared lists.
pub fn diff(declared: &[DeclaredSetting], observed: &[DeclaredSetting]) -> Vec<Drift> {
    let mut drifts = Vec::new();

    for (index, (want, have)) in declared.iter().zip(observed.iter()).enumerate() {
        if want != have {
            drifts.push(Drift::Changed {
                index,
                definition_id: want.definition_id.clone(),
                declared: want.clone(),
                observed: have.clone(),
            });
        }
    }

    for (index, want) in declared.iter().enumerate().skip(observed.len()) {
        drifts.push(Drift::Missing {
            index,
            definition_id: want.definition_id.clone(),
        });
    }

    for (index, have) in observed.iter().enumerate().skip(declared.len()) {
        drifts.push(Drift::Unexpected {
            index,
            definition_id: have.definition_id.clone(),
        });
    }

    drifts
}

/// Drives the reconciliation cycle for settings-list resources against one
/// endpoint.
pub struct Reconciler<E: SettingsEndpoint> {
    endpoint: E,
}

impl<E: SettingsEndpoint> Reconciler<E> {
    pub fn new(endpoint: E) -> Self {
        Self { endpoint }
    }

    /// Encode the declared list and submit it as a single bulk replace.
    pub fn apply(&mut self, policy_id: &str, declared: &[DeclaredSetting]) -> Result<()> {
        let settings = codec::encode_all(declared)?;
        debug!(policy_id, count = settings.len(), "replacing policy settings");
        self.endpoint.replace_settings(policy_id, settings)
    }

    /// Clear the policy's settings with an explicit empty replace. The parent
    /// policy object is left in place.
    pub fn clear(&mut self, policy_id: &str) -> Result<()> {
        debug!(policy_id, "clearing policy settings");
        self.endpoint.replace_settings(policy_id, Vec::new())
    }

    /// Fetch and decode the policy's current settings into the declared
    /// model, for drift comparison or import.
    pub fn observe(&self, policy_id: &str) -> Result<Vec<DeclaredSetting>> {
        let settings = self.endpoint.fetch_settings(policy_id)?;
        debug!(policy_id, count = settings.len(), "read policy settings");
        codec::decode_all(&settings)
    }

    /// Read back remote state and compare it against the declared list.
    pub fn check_drift(
        &self,
        policy_id: &str,
        declared: &[DeclaredSetting],
    ) -> Result<DriftReport> {
        let observed = self.observe(policy_id)?;
        Ok(DriftReport::compare(policy_id, declared, &observed))
    }

    /// Consume the reconciler, returning the endpoint.
    pub fn into_endpoint(self) -> E {
        self.endpoint
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn declared_pair() -> (DeclaredSetting, DeclaredSetting) {
        (
            DeclaredSetting::string("a", "1"),
            DeclaredSetting::boolean("b", "true"),
        )
    }

    #[test]
    fn test_diff_identical_lists() {
        let (a, b) = declared_pair();
        let list = vec![a, b];
        assert!(diff(&list, &list).is_empty());
    }

    #[test]
    fn test_diff_changed_value() {
        let (a, b) = declared_pair();
        let declared = vec![a.clone(), b];
        let observed = vec![a, DeclaredSetting::boolean("b", "false")];
        let drifts = diff(&declared, &observed);
        assert_eq!(drifts.len(), 1);
        assert!(matches!(
            &drifts[0],
            Drift::Changed { index: 1, definition_id, .. } if definition_id == "b"
        ));
    }

    #[test]
    fn test_diff_changed_definition_id() {
        let declared = vec![DeclaredSetting::string("a", "1")];
        let observed = vec![DeclaredSetting::string("z", "1")];
        let drifts = diff(&declared, &observed);
        assert!(matches!(
            &drifts[0],
            Drift::Changed { definition_id, .. } if definition_id == "a"
        ));
    }

    #[test]
    fn test_diff_length_mismatch() {
        let (a, b) = declared_pair();
        let drifts = diff(&[a.clone(), b.clone()], &[a.clone()]);
        assert_eq!(
            drifts,
            vec![Drift::Missing {
                index: 1,
                definition_id: "b".to_string()
            }]
        );

        let drifts = diff(&[a.clone()], &[a, b]);
        assert_eq!(
            drifts,
            vec![Drift::Unexpected {
                index: 1,
                definition_id: "b".to_string()
            }]
        );
    }

    #[test]
    fn test_report_status() {
        let (a, _) = declared_pair();
        let declared = vec![a];

        let report = DriftReport::compare("p", &declared, &declared);
        assert_eq!(report.status(), SyncStatus::InSync);
        assert!(report.is_in_sync());

        let report = DriftReport::compare("p", &declared, &[]);
        assert_eq!(report.status(), SyncStatus::Absent);

        let observed = vec![DeclaredSetting::string("a", "2")];
        let report = DriftReport::compare("p", &declared, &observed);
        assert_eq!(report.status(), SyncStatus::Drifted);
    }

    #[test]
    fn test_empty_both_sides_is_in_sync() {
        let report = DriftReport::compare("p", &[], &[]);
        assert_eq!(report.status(), SyncStatus::InSync);
    }
}
