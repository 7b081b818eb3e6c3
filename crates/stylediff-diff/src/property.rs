//! Flat property-map diff: compare two key→value maps of one layer.
//!
//! Used for `layout`, `paint` and the legacy classed `paint.<class>` maps.
//! Each differing key yields one property command carrying the after value.

use serde_json::{Map, Value};
use stylediff_types::{equal_opt, Command, PropertyKind};

/// Keys of `before` in map order, followed by keys only present in `after`.
pub fn union_keys<'a>(
    before: Option<&'a Map<String, Value>>,
    after: Option<&'a Map<String, Value>>,
) -> Vec<&'a str> {
    let mut keys: Vec<&str> = before
        .into_iter()
        .flat_map(|m| m.keys())
        .map(String::as_str)
        .collect();
    keys.extend(
        after
            .into_iter()
            .flat_map(|m| m.keys())
            .map(String::as_str)
            .filter(|key| !before.is_some_and(|m| m.contains_key(*key))),
    );
    keys
}

/// Append one `kind` property command per key whose value differs.
///
/// Absent maps are treated as empty. A key removed in `after` produces a
/// command with an absent value.
pub fn diff_properties(
    before: Option<&Map<String, Value>>,
    after: Option<&Map<String, Value>>,
    kind: PropertyKind,
    layer_id: &str,
    class: Option<&str>,
    commands: &mut Vec<Command>,
) {
    for key in union_keys(before, after) {
        let old = before.and_then(|m| m.get(key));
        let new = after.and_then(|m| m.get(key));
        if !equal_opt(old, new) {
            commands.push(Command::set_property(kind, layer_id, key, new, class));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn identical_maps_no_commands() {
        let paint = map(json!({"fill-color": "red", "fill-opacity": 0.5}));
        let mut commands = Vec::new();
        diff_properties(Some(&paint), Some(&paint), PropertyKind::Paint, "a", None, &mut commands);
        assert!(commands.is_empty());
    }

    #[test]
    fn changed_removed_and_added_keys() {
        let before = map(json!({"keep": 1, "change": "old", "drop": true}));
        let after = map(json!({"keep": 1, "change": "new", "add": [1, 2]}));
        let mut commands = Vec::new();
        diff_properties(
            Some(&before),
            Some(&after),
            PropertyKind::Layout,
            "roads",
            None,
            &mut commands,
        );

        let set = |name: &str, value: Option<&Value>| {
            Command::set_property(PropertyKind::Layout, "roads", name, value, None)
        };
        assert_eq!(
            commands,
            vec![
                set("change", Some(&json!("new"))),
                set("drop", None),
                set("add", Some(&json!([1, 2]))),
            ]
        );
    }

    #[test]
    fn absent_map_is_empty() {
        let after = map(json!({"line-width": 2}));
        let mut commands = Vec::new();
        diff_properties(None, Some(&after), PropertyKind::Paint, "a", None, &mut commands);
        assert_eq!(commands.len(), 1);

        commands.clear();
        diff_properties(Some(&after), None, PropertyKind::Paint, "a", None, &mut commands);
        assert_eq!(
            commands,
            vec![Command::set_property(PropertyKind::Paint, "a", "line-width", None, None)]
        );
    }

    #[test]
    fn class_tag_is_carried() {
        let before = map(json!({"fill-color": "white"}));
        let after = map(json!({"fill-color": "black"}));
        let mut commands = Vec::new();
        diff_properties(
            Some(&before),
            Some(&after),
            PropertyKind::Paint,
            "a",
            Some("night"),
            &mut commands,
        );
        assert!(matches!(
            &commands[0],
            Command::SetPaintProperty { class: Some(c), .. } if c == "night"
        ));
    }

    #[test]
    fn numerically_equal_values_are_unchanged() {
        let before = map(json!({"line-width": 2}));
        let after = map(json!({"line-width": 2.0}));
        let mut commands = Vec::new();
        diff_properties(Some(&before), Some(&after), PropertyKind::Paint, "a", None, &mut commands);
        assert!(commands.is_empty());
    }

    #[test]
    fn union_puts_before_keys_first() {
        let before = map(json!({"b": 1, "a": 1}));
        let after = map(json!({"c": 1, "a": 2}));
        assert_eq!(union_keys(Some(&before), Some(&after)), vec!["a", "b", "c"]);
        assert!(union_keys(None, None).is_empty());
    }
}
