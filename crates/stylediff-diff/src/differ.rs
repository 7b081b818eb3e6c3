use serde_json::Value;
use stylediff_types::{equal_opt, Command, LayerView, RootField, StyleView};
use tracing::debug;

use crate::config::DiffConfig;
use crate::error::DiffResult;
use crate::hook::{FallbackHook, TracingFallbackHook};
use crate::import::diff_imports;
use crate::layer::diff_layers;
use crate::root::{diff_root, RootDiff};
use crate::source::diff_sources;

// ---------------------------------------------------------------------------
// StyleDiffer
// ---------------------------------------------------------------------------

/// The style differ: runs every differ in dependency order behind a single
/// failure boundary.
///
/// [`Self::diff`] never fails. Whenever the incremental diff cannot be
/// computed the result is one `setStyle` command carrying the after document,
/// and the configured [`FallbackHook`] is told why.
pub struct StyleDiffer {
    config: DiffConfig,
    hook: Box<dyn FallbackHook>,
}

impl StyleDiffer {
    /// Create a differ that reports fallbacks through `tracing`.
    pub fn new(config: DiffConfig) -> Self {
        Self {
            config,
            hook: Box::new(TracingFallbackHook),
        }
    }

    /// Replace the fallback hook.
    pub fn with_hook(mut self, hook: impl FallbackHook + 'static) -> Self {
        self.hook = Box::new(hook);
        self
    }

    /// The current configuration.
    pub fn config(&self) -> &DiffConfig {
        &self.config
    }

    /// Commands turning `before` into `after`.
    ///
    /// A missing `before` (nothing loaded yet) yields `setStyle` without
    /// diffing. Errors discard any partial output.
    pub fn diff(&self, before: Option<&Value>, after: &Value) -> Vec<Command> {
        let Some(before) = before else {
            return vec![Command::set_style(after)];
        };

        match self.try_diff(before, after) {
            Ok(commands) => {
                debug!(commands = commands.len(), "computed style diff");
                commands
            }
            Err(err) => {
                self.hook.on_fallback(&err);
                vec![Command::set_style(after)]
            }
        }
    }

    /// The incremental diff without the fallback boundary.
    ///
    /// A version change is not an error: it returns `Ok` with a single
    /// `setStyle` command.
    pub fn try_diff(&self, before: &Value, after: &Value) -> DiffResult<Vec<Command>> {
        let old = StyleView::new(before)?;
        let new = StyleView::new(after)?;

        let mut commands = match diff_root(&old, &new) {
            RootDiff::FullReplace => return Ok(vec![Command::set_style(after)]),
            RootDiff::Changes(commands) => commands,
        };

        let sources = diff_sources(&old.sources()?, &new.sources()?, &self.config)?;

        // Layers on a removed source must go before the source does. They are
        // left out of the layer diff, which re-adds them if they survive.
        let mut before_layers = Vec::new();
        for layer in old.layers()? {
            match layer.source() {
                Some(source) if sources.removes(source) => commands.push(Command::RemoveLayer {
                    id: layer.id().to_string(),
                }),
                _ => before_layers.push(layer),
            }
        }

        let mut before_terrain = old.field(RootField::Terrain);
        let terrain_source = before_terrain
            .and_then(|terrain| terrain.get("source"))
            .and_then(Value::as_str);
        if terrain_source.is_some_and(|source| sources.removes(source)) {
            commands.push(Command::SetRoot {
                field: RootField::Terrain,
                value: None,
            });
            before_terrain = None;
        }

        commands.extend(sources.commands);

        let after_terrain = new.field(RootField::Terrain);
        if !equal_opt(before_terrain, after_terrain) {
            commands.push(Command::SetRoot {
                field: RootField::Terrain,
                value: after_terrain.cloned(),
            });
        }

        let after_layers: Vec<LayerView<'_>> = new.layers()?;
        diff_layers(&before_layers, &after_layers, &self.config, &mut commands)?;
        diff_imports(&old.imports()?, &new.imports()?, &mut commands);

        Ok(commands)
    }
}

impl Default for StyleDiffer {
    fn default() -> Self {
        Self::new(DiffConfig::default())
    }
}

/// Diff with the default configuration and hook.
pub fn diff_styles(before: Option<&Value>, after: &Value) -> Vec<Command> {
    StyleDiffer::default().diff(before, after)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use serde_json::json;
    use stylediff_types::Operation;

    use super::*;
    use crate::error::DiffError;

    fn ops(commands: &[Command]) -> Vec<Operation> {
        commands.iter().map(Command::operation).collect()
    }

    #[test]
    fn missing_before_sets_style() {
        let after = json!({"version": 8, "layers": []});
        assert_eq!(diff_styles(None, &after), vec![Command::set_style(&after)]);
    }

    #[test]
    fn identical_documents_no_commands() {
        let style = json!({
            "version": 8,
            "zoom": 3,
            "sources": {"a": {"type": "vector", "url": "mapbox://a"}},
            "layers": [{"id": "l", "type": "fill", "source": "a"}],
            "imports": [{"id": "base", "url": "mapbox://styles/standard"}]
        });
        assert!(diff_styles(Some(&style), &style).is_empty());
    }

    #[test]
    fn version_change_ignores_other_differences() {
        let before = json!({"version": 7, "zoom": 1, "layers": [{"id": "a", "type": "fill"}]});
        let after = json!({"version": 8, "zoom": 2, "layers": []});
        assert_eq!(diff_styles(Some(&before), &after), vec![Command::set_style(&after)]);
    }

    #[test]
    fn terrain_cleared_when_its_source_goes() {
        let before = json!({
            "version": 8,
            "sources": {"dem": {"type": "raster-dem", "url": "a"}},
            "terrain": {"source": "dem"}
        });
        let after = json!({
            "version": 8,
            "sources": {"dem": {"type": "raster-dem", "url": "b"}},
            "terrain": {"source": "dem"}
        });
        let commands = diff_styles(Some(&before), &after);
        assert_eq!(
            ops(&commands),
            vec![
                Operation::SetTerrain,
                Operation::RemoveSource,
                Operation::AddSource,
                Operation::SetTerrain,
            ]
        );
        assert_eq!(
            commands[0],
            Command::SetRoot {
                field: RootField::Terrain,
                value: None
            }
        );
        assert_eq!(
            commands[3],
            Command::SetRoot {
                field: RootField::Terrain,
                value: Some(json!({"source": "dem"}))
            }
        );
    }

    #[test]
    fn terrain_change_without_source_change() {
        let before = json!({"version": 8, "terrain": {"source": "dem", "exaggeration": 1}});
        let after = json!({"version": 8, "terrain": {"source": "dem", "exaggeration": 2}});
        assert_eq!(
            diff_styles(Some(&before), &after),
            vec![Command::SetRoot {
                field: RootField::Terrain,
                value: Some(json!({"source": "dem", "exaggeration": 2}))
            }]
        );
    }

    #[test]
    fn layers_on_replaced_source_are_readded() {
        let layer = json!({"id": "roads", "type": "line", "source": "s"});
        let before = json!({
            "version": 8,
            "sources": {"s": {"type": "vector", "url": "old"}},
            "layers": [layer.clone()]
        });
        let after = json!({
            "version": 8,
            "sources": {"s": {"type": "vector", "url": "new"}},
            "layers": [layer.clone()]
        });
        assert_eq!(
            diff_styles(Some(&before), &after),
            vec![
                Command::RemoveLayer { id: "roads".into() },
                Command::RemoveSource { id: "s".into() },
                Command::AddSource {
                    id: "s".into(),
                    source: json!({"type": "vector", "url": "new"})
                },
                Command::AddLayer {
                    layer,
                    before: None
                },
            ]
        );
    }

    #[test]
    fn malformed_layers_fall_back_and_notify() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let differ = StyleDiffer::default()
            .with_hook(move |err: &DiffError| sink.lock().unwrap().push(err.to_string()));

        let before = json!({"version": 8, "layers": [{"id": "a", "type": "fill"}]});
        let after = json!({"version": 8, "layers": [{"type": "fill"}]});
        assert_eq!(differ.diff(Some(&before), &after), vec![Command::set_style(&after)]);
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn try_diff_surfaces_the_error() {
        let before = json!({"version": 8, "sources": []});
        let after = json!({"version": 8});
        let err = StyleDiffer::default().try_diff(&before, &after).unwrap_err();
        assert!(matches!(err, DiffError::Malformed(_)));
    }

    #[test]
    fn config_is_applied() {
        let before = json!({"version": 8, "sources": {"p": {"type": "geojson", "data": 1}}});
        let after = json!({"version": 8, "sources": {"p": {"type": "geojson", "data": 2}}});
        let differ = StyleDiffer::new(DiffConfig::full_replace_sources());
        assert!(!differ.config().geojson_data_updates);
        assert_eq!(
            ops(&differ.diff(Some(&before), &after)),
            vec![Operation::RemoveSource, Operation::AddSource]
        );
    }
}
