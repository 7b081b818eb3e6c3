//! Top-level field diff.
//!
//! Terrain is not handled here: whether the before terrain is still valid
//! depends on which sources get removed, so the orchestrator compares it.

use stylediff_types::{equal_opt, Command, RootField, StyleView};

/// Outcome of comparing the style-wide fields.
#[derive(Clone, Debug, PartialEq)]
pub enum RootDiff {
    /// `version` changed; nothing finer than `setStyle` is safe.
    FullReplace,
    /// One setter per changed field, in [`RootField::DIFFED`] order.
    Changes(Vec<Command>),
}

/// Compare the version and the fixed style-wide fields.
pub fn diff_root(before: &StyleView<'_>, after: &StyleView<'_>) -> RootDiff {
    if !equal_opt(before.version(), after.version()) {
        return RootDiff::FullReplace;
    }

    let commands = RootField::DIFFED
        .iter()
        .filter(|field| !equal_opt(before.field(**field), after.field(**field)))
        .map(|&field| Command::SetRoot {
            field,
            value: after.field(field).cloned(),
        })
        .collect();
    RootDiff::Changes(commands)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use stylediff_types::Operation;

    fn diff(before: Value, after: Value) -> RootDiff {
        diff_root(&StyleView::new(&before).unwrap(), &StyleView::new(&after).unwrap())
    }

    fn operations(diff: RootDiff) -> Vec<Operation> {
        match diff {
            RootDiff::Changes(commands) => commands.iter().map(Command::operation).collect(),
            RootDiff::FullReplace => panic!("unexpected full replace"),
        }
    }

    #[test]
    fn version_change_forces_full_replace() {
        assert_eq!(
            diff(json!({"version": 7, "zoom": 1}), json!({"version": 8, "zoom": 2})),
            RootDiff::FullReplace
        );
    }

    #[test]
    fn equal_versions_by_value() {
        assert_eq!(
            diff(json!({"version": 8}), json!({"version": 8.0})),
            RootDiff::Changes(vec![])
        );
    }

    #[test]
    fn fields_emitted_in_fixed_order() {
        let ops = operations(diff(
            json!({"version": 8}),
            json!({
                "version": 8,
                "camera": {"camera-projection": "orthographic"},
                "glyphs": "mapbox://fonts/{fontstack}/{range}.pbf",
                "center": [10, 20],
                "fog": {"range": [1, 10]},
                "zoom": 4
            }),
        ));
        assert_eq!(
            ops,
            vec![
                Operation::SetCenter,
                Operation::SetZoom,
                Operation::SetGlyphs,
                Operation::SetFog,
                Operation::SetCamera,
            ]
        );
    }

    #[test]
    fn removed_field_is_set_absent() {
        let diff = diff(json!({"version": 8, "pitch": 45}), json!({"version": 8}));
        assert_eq!(
            diff,
            RootDiff::Changes(vec![Command::SetRoot {
                field: RootField::Pitch,
                value: None
            }])
        );
    }

    #[test]
    fn terrain_is_left_to_the_orchestrator() {
        let diff = diff(
            json!({"version": 8, "terrain": {"source": "dem"}}),
            json!({"version": 8}),
        );
        assert_eq!(diff, RootDiff::Changes(vec![]));
    }
}
