#![forbid(unsafe_code)]

//! Synchronizer configuration.
//!
//! [`SyncConfig`] holds the plain-data construction parameters. The
//! per-item initialization callback is not data and is passed to
//! [`SyncedCollectionBuilder`](crate::SyncedCollectionBuilder) directly.
//!
//! With the `config-file` feature, a config can be loaded from TOML or JSON:
//!
//! ```toml
//! recycle_view_models = false
//! ```
//!
//! Missing keys fall back to [`SyncConfig::default`].

/// Plain-data synchronizer settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "config-file", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "config-file", serde(default))]
pub struct SyncConfig {
    /// Reuse retired presentation items for equal reappearing model items.
    pub recycle_view_models: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            recycle_view_models: true,
        }
    }
}

impl SyncConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn recycle_view_models(mut self, enabled: bool) -> Self {
        self.recycle_view_models = enabled;
        self
    }
}

#[cfg(feature = "config-file")]
impl SyncConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(input: &str) -> crate::SyncResult<Self> {
        toml::from_str(input).map_err(|err| crate::SyncError::Config(err.to_string()))
    }

    /// Parse a JSON document.
    pub fn from_json_str(input: &str) -> crate::SyncResult<Self> {
        serde_json::from_str(input).map_err(|err| crate::SyncError::Config(err.to_string()))
    }

    /// Serialize to TOML.
    pub fn to_toml_string(&self) -> crate::SyncResult<String> {
        toml::to_string(self).map_err(|err| crate::SyncError::Config(err.to_string()))
    }
}
