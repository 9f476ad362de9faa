//! Configuration for the offline store.
//!
//! # Example
//!
//! ```
//! use offline_store::StoreConfig;
//!
//! // Minimal config (uses defaults)
//! let config = StoreConfig::new("orders");
//! assert!(config.is_online);
//! assert_eq!(config.identity_key, "id");
//!
//! // From deserialized settings; unrecognized keys are ignored
//! let config: StoreConfig =
//!     serde_json::from_str(r#"{"name": "orders", "is_online": false, "theme": "dark"}"#).unwrap();
//! assert!(!config.is_online);
//! ```

use serde::Deserialize;

/// Configuration for [`OfflineStore`](crate::OfflineStore).
///
/// `name` is required; it prefixes every durable-storage key and selects which
/// durable entries are rehydrated at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Store name, used as the durable key prefix and rehydration filter.
    pub name: String,

    /// Initial engine mode (default: online).
    #[serde(default = "default_is_online")]
    pub is_online: bool,

    /// Field that carries each record's identity (default: `"id"`).
    #[serde(default = "default_identity_key")]
    pub identity_key: String,
}

fn default_is_online() -> bool {
    true
}

fn default_identity_key() -> String {
    "id".to_string()
}

impl StoreConfig {
    /// Config with the given name and all other fields defaulted.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_online: default_is_online(),
            identity_key: default_identity_key(),
        }
    }
}
