//! Settings Catalog - a codec and reconciliation engine for device-management
//! settings catalog policies.
//!
//! This library translates between a flat, user-authored list of typed
//! configuration entries and the management service's polymorphic,
//! recursively-nested "setting instance" wire representation, and keeps the
//! two convergent with a replace-based reconciliation policy:
//! - `models` - the declared (user-authored) setting model
//! - `wire` - the service's `@odata.type`-tagged wire model
//! - `codec` - the bidirectional transform between the two
//! - `reconcile` - bulk-replace writes, read-back decoding, drift detection
//!
//! Transport, authentication, and resource-lifecycle dispatch are external
//! collaborators; the engine reaches the service only through the
//! [`reconcile::SettingsEndpoint`] trait.

pub mod codec;
pub mod models;
pub mod reconcile;
pub mod wire;

/// Library-level error type for settings catalog operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A single declared or remote setting could not be translated.
    ///
    /// Carries the list position, definition ID, and value kind so the caller
    /// can pinpoint the offending declaration.
    #[error("setting '{definition_id}' ({kind}, index {index}): {source}")]
    Setting {
        index: usize,
        definition_id: String,
        kind: String,
        #[source]
        source: codec::CodecError,
    },

    /// The settings endpoint reported a failure.
    #[error("endpoint error: {0}")]
    Endpoint(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Wrap a codec failure with the position and identity of the element it
    /// occurred on.
    pub(crate) fn setting(
        index: usize,
        definition_id: &str,
        kind: &str,
        source: codec::CodecError,
    ) -> Self {
        Self::Setting {
            index,
            definition_id: definition_id.to_string(),
            kind: kind.to_string(),
            source,
        }
    }
}

/// Result type alias for settings catalog operations.
pub type Result<T> = std::result::Result<T, Error>;
