//! Source diff: compare the `sources` mappings of two styles.
//!
//! Sources cannot be patched in place, with one exception: a geojson source
//! whose only change is its `data` can swap that data without re-tiling.

use std::collections::BTreeSet;

use serde_json::{Map, Value};
use stylediff_types::{equal_opt, object, Command, Sources};

use crate::config::DiffConfig;
use crate::error::DiffResult;
use crate::property::union_keys;

/// Source commands plus the ids of every source that gets removed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SourceDiff {
    /// Remove commands (before order) followed by add/update commands
    /// (after order).
    pub commands: Vec<Command>,
    /// Sources removed outright or removed to be re-added. Layers and
    /// terrain referencing these must be dropped first.
    pub removed: BTreeSet<String>,
}

impl SourceDiff {
    /// Returns `true` if no source changes.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Returns `true` if `id` is removed by this diff.
    pub fn removes(&self, id: &str) -> bool {
        self.removed.contains(id)
    }

    fn remove(&mut self, id: &str) {
        self.commands.push(Command::RemoveSource { id: id.to_string() });
        self.removed.insert(id.to_string());
    }

    fn add(&mut self, id: &str, source: &Value) {
        self.commands.push(Command::AddSource {
            id: id.to_string(),
            source: source.clone(),
        });
    }
}

/// Compare two source mappings.
pub fn diff_sources(
    before: &Sources<'_>,
    after: &Sources<'_>,
    config: &DiffConfig,
) -> DiffResult<SourceDiff> {
    let mut diff = SourceDiff::default();

    for (id, _) in before.iter() {
        if !after.contains(id) {
            diff.remove(id);
        }
    }

    for (id, new) in after.iter() {
        let Some(old) = before.get(id) else {
            diff.add(id, new);
            continue;
        };
        if equal_opt(Some(old), Some(new)) {
            continue;
        }

        let old_props = object(old, "source")?;
        let new_props = object(new, "source")?;
        if config.geojson_data_updates && can_update_geojson(old_props, new_props) {
            diff.commands.push(Command::SetGeoJsonSourceData {
                id: id.to_string(),
                data: new_props.get("data").cloned(),
            });
        } else {
            diff.remove(id);
            diff.add(id, new);
        }
    }

    Ok(diff)
}

fn is_geojson(source: &Map<String, Value>) -> bool {
    source.get("type").and_then(Value::as_str) == Some("geojson")
}

/// Both sources are geojson and agree on every key except `data`.
fn can_update_geojson(before: &Map<String, Value>, after: &Map<String, Value>) -> bool {
    is_geojson(before)
        && is_geojson(after)
        && union_keys(Some(before), Some(after))
            .into_iter()
            .filter(|key| *key != "data")
            .all(|key| equal_opt(before.get(key), after.get(key)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use stylediff_types::StyleView;

    fn diff(before: Value, after: Value) -> SourceDiff {
        diff_with(before, after, &DiffConfig::default())
    }

    fn diff_with(before: Value, after: Value, config: &DiffConfig) -> SourceDiff {
        let before = json!({ "sources": before });
        let after = json!({ "sources": after });
        let before = StyleView::new(&before).unwrap().sources().unwrap();
        let after = StyleView::new(&after).unwrap().sources().unwrap();
        diff_sources(&before, &after, config).unwrap()
    }

    #[test]
    fn identical_sources_no_diff() {
        let sources = json!({"a": {"type": "vector", "url": "mapbox://a"}});
        assert!(diff(sources.clone(), sources).is_empty());
    }

    #[test]
    fn removed_source_is_recorded() {
        let d = diff(json!({"a": {"type": "vector"}}), json!({}));
        assert_eq!(d.commands, vec![Command::RemoveSource { id: "a".into() }]);
        assert!(d.removes("a"));
    }

    #[test]
    fn added_source() {
        let d = diff(json!({}), json!({"b": {"type": "raster", "tiles": ["x"]}}));
        assert_eq!(
            d.commands,
            vec![Command::AddSource {
                id: "b".into(),
                source: json!({"type": "raster", "tiles": ["x"]}),
            }]
        );
        assert!(d.removed.is_empty());
    }

    #[test]
    fn geojson_data_only_change_swaps_data() {
        let d = diff(
            json!({"pts": {"type": "geojson", "data": {"n": 1}, "cluster": true}}),
            json!({"pts": {"type": "geojson", "data": {"n": 2}, "cluster": true}}),
        );
        assert_eq!(
            d.commands,
            vec![Command::SetGeoJsonSourceData {
                id: "pts".into(),
                data: Some(json!({"n": 2})),
            }]
        );
        assert!(d.removed.is_empty());
    }

    #[test]
    fn geojson_option_change_replaces_source() {
        let d = diff(
            json!({"pts": {"type": "geojson", "data": {"n": 1}}}),
            json!({"pts": {"type": "geojson", "data": {"n": 1}, "cluster": true}}),
        );
        assert_eq!(
            d.commands,
            vec![
                Command::RemoveSource { id: "pts".into() },
                Command::AddSource {
                    id: "pts".into(),
                    source: json!({"type": "geojson", "data": {"n": 1}, "cluster": true}),
                },
            ]
        );
        assert!(d.removes("pts"));
    }

    #[test]
    fn geojson_option_dropped_replaces_source() {
        let d = diff(
            json!({"pts": {"type": "geojson", "data": 1, "maxzoom": 12}}),
            json!({"pts": {"type": "geojson", "data": 2}}),
        );
        assert!(d.removes("pts"));
    }

    #[test]
    fn non_geojson_change_replaces_source() {
        let d = diff(
            json!({"a": {"type": "vector", "url": "mapbox://a"}}),
            json!({"a": {"type": "vector", "url": "mapbox://b"}}),
        );
        assert_eq!(d.commands.len(), 2);
        assert!(d.removes("a"));
    }

    #[test]
    fn type_change_to_geojson_replaces_source() {
        let d = diff(
            json!({"a": {"type": "vector", "data": 1}}),
            json!({"a": {"type": "geojson", "data": 1}}),
        );
        assert!(d.removes("a"));
    }

    #[test]
    fn data_updates_can_be_disabled() {
        let d = diff_with(
            json!({"pts": {"type": "geojson", "data": 1}}),
            json!({"pts": {"type": "geojson", "data": 2}}),
            &DiffConfig::full_replace_sources(),
        );
        assert!(d.removes("pts"));
        assert_eq!(d.commands.len(), 2);
    }

    #[test]
    fn removals_come_before_additions() {
        let d = diff(
            json!({"old": {"type": "vector"}}),
            json!({"new": {"type": "vector"}}),
        );
        assert_eq!(
            d.commands,
            vec![
                Command::RemoveSource { id: "old".into() },
                Command::AddSource {
                    id: "new".into(),
                    source: json!({"type": "vector"}),
                },
            ]
        );
    }

    #[test]
    fn changed_non_object_source_is_malformed() {
        let before = json!({"sources": {"a": 1}});
        let after = json!({"sources": {"a": 2}});
        let before = StyleView::new(&before).unwrap().sources().unwrap();
        let after = StyleView::new(&after).unwrap().sources().unwrap();
        assert!(diff_sources(&before, &after, &DiffConfig::default()).is_err());
    }
}
