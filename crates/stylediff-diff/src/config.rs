use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Configuration for the style differ.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffConfig {
    /// Emit `setGeoJSONSourceData` when only the `data` of a geojson source
    /// changed. When `false`, every changed source is removed and re-added.
    pub geojson_data_updates: bool,
    /// Layer keys that are never diffed, in addition to `metadata`.
    /// Changes to them produce no command.
    pub ignored_layer_keys: BTreeSet<String>,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            geojson_data_updates: true,
            ignored_layer_keys: BTreeSet::new(),
        }
    }
}

impl DiffConfig {
    /// Always replace changed sources, even when only geojson data differs.
    ///
    /// Useful for renderers whose geojson sources cannot swap data in place.
    pub fn full_replace_sources() -> Self {
        Self {
            geojson_data_updates: false,
            ..Default::default()
        }
    }

    /// Ignore an additional layer key.
    pub fn ignore_layer_key(mut self, key: impl Into<String>) -> Self {
        self.ignored_layer_keys.insert(key.into());
        self
    }

    /// Returns `true` if `key` is excluded from layer diffing.
    pub fn ignores_layer_key(&self, key: &str) -> bool {
        key == "metadata" || self.ignored_layer_keys.contains(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = DiffConfig::default();
        assert!(c.geojson_data_updates);
        assert!(c.ignores_layer_key("metadata"));
        assert!(!c.ignores_layer_key("paint"));
        assert!(c.ignored_layer_keys.is_empty());
    }

    #[test]
    fn extra_ignored_keys() {
        let c = DiffConfig::default().ignore_layer_key("attribution");
        assert!(c.ignores_layer_key("attribution"));
        assert!(c.ignores_layer_key("metadata"));
    }

    #[test]
    fn full_replace_preset() {
        let c = DiffConfig::full_replace_sources();
        assert!(!c.geojson_data_updates);
        assert!(c.ignores_layer_key("metadata"));
    }

    #[test]
    fn missing_fields_take_defaults() {
        let c: DiffConfig = serde_json::from_str(r#"{"geojson_data_updates": false}"#).unwrap();
        assert!(!c.geojson_data_updates);
        assert!(c.ignored_layer_keys.is_empty());
    }
}
