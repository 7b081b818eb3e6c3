//! Layer diff: reproduce the after layer order and content from the before
//! order, replacing as few layers as possible.
//!
//! Three passes run over a [`LayerTracker`] that simulates the renderer's
//! layer order as commands are emitted:
//!
//! 1. layers missing from after are removed;
//! 2. walking after-order from the top down, every layer not already in its
//!    slot is (re)inserted before its upper neighbour. Inserted layers carry
//!    their final content and are skipped by the next pass;
//! 3. remaining layers are patched property by property, or replaced in
//!    place when `source`, `source-layer` or `type` changed.

use std::collections::{BTreeMap, BTreeSet};

use stylediff_types::{deep_equal, equal_opt, optional_object, Command, LayerView, PropertyKind};
use tracing::debug;

use crate::config::DiffConfig;
use crate::error::{DiffError, DiffResult};
use crate::property::{diff_properties, union_keys};
use crate::tracker::LayerTracker;

/// Keys a live layer cannot change; a change forces remove + add.
const IDENTITY_KEYS: [&str; 3] = ["source", "source-layer", "type"];

/// Keys with dedicated commands, skipped by the generic property scan.
const DEDICATED_KEYS: [&str; 5] = ["layout", "paint", "filter", "minzoom", "maxzoom"];

const CLASSED_PAINT_PREFIX: &str = "paint.";

/// Append the commands turning the `before` layer list into `after`.
pub fn diff_layers<'a>(
    before: &[LayerView<'a>],
    after: &[LayerView<'a>],
    config: &DiffConfig,
    commands: &mut Vec<Command>,
) -> DiffResult<()> {
    let before_index: BTreeMap<&str, LayerView<'a>> =
        before.iter().map(|layer| (layer.id(), *layer)).collect();
    let after_ids: BTreeSet<&str> = after.iter().map(LayerView::id).collect();
    let mut tracker = LayerTracker::new(before.iter().map(LayerView::id).collect());
    let start = commands.len();

    remove_stale(before, &after_ids, &mut tracker, commands)?;
    let clean = reorder(after, &before_index, &mut tracker, commands)?;

    for layer in after {
        let id = layer.id();
        if clean.contains(id) {
            continue;
        }
        let old = before_index
            .get(id)
            .ok_or_else(|| DiffError::MissingLayer(id.to_string()))?;
        if deep_equal(old.raw(), layer.raw()) {
            continue;
        }
        update_layer(old, layer, &tracker, config, commands)?;
    }

    debug!(
        before = before.len(),
        after = after.len(),
        commands = commands.len() - start,
        "diffed layers"
    );
    Ok(())
}

/// Pass 1: remove layers that no longer exist.
fn remove_stale<'a>(
    before: &[LayerView<'a>],
    after_ids: &BTreeSet<&str>,
    tracker: &mut LayerTracker<'a>,
    commands: &mut Vec<Command>,
) -> DiffResult<()> {
    // Layers ahead of `kept` are settled; lookups start past them.
    let mut kept = 0;
    for layer in before {
        let id = layer.id();
        if after_ids.contains(id) {
            kept += 1;
            continue;
        }
        commands.push(Command::RemoveLayer { id: id.to_string() });
        let at = tracker
            .position_from(id, kept)
            .ok_or_else(|| DiffError::TrackerDesync(id.to_string()))?;
        tracker.remove_at(at)?;
    }
    Ok(())
}

/// Pass 2: insert new layers and move misplaced ones. Returns the ids that
/// were (re)added with their final content.
fn reorder<'a>(
    after: &[LayerView<'a>],
    before_index: &BTreeMap<&str, LayerView<'a>>,
    tracker: &mut LayerTracker<'a>,
    commands: &mut Vec<Command>,
) -> DiffResult<BTreeSet<&'a str>> {
    let mut clean = BTreeSet::new();
    let mut inserted = 0;

    for (depth, layer) in after.iter().rev().enumerate() {
        let id = layer.id();
        if tracker.from_top(depth) == Some(id) {
            continue;
        }

        if before_index.contains_key(id) {
            commands.push(Command::RemoveLayer { id: id.to_string() });
            // Freshly inserted layers all sit in the settled top slots.
            let end = tracker.len().saturating_sub(inserted);
            let at = tracker
                .last_position_through(id, end)
                .ok_or_else(|| DiffError::TrackerDesync(id.to_string()))?;
            tracker.remove_at(at)?;
        } else {
            inserted += 1;
        }

        let slot = tracker
            .len()
            .checked_sub(depth)
            .ok_or_else(|| DiffError::TrackerDesync(id.to_string()))?;
        commands.push(Command::AddLayer {
            layer: layer.raw().clone(),
            before: tracker.get(slot).map(str::to_string),
        });
        tracker.insert_at(slot, id)?;
        clean.insert(id);
    }

    Ok(clean)
}

/// Pass 3: patch one layer whose position is already correct.
fn update_layer(
    old: &LayerView<'_>,
    new: &LayerView<'_>,
    tracker: &LayerTracker<'_>,
    config: &DiffConfig,
    commands: &mut Vec<Command>,
) -> DiffResult<()> {
    let id = new.id();

    if IDENTITY_KEYS
        .iter()
        .any(|key| !equal_opt(old.get(key), new.get(key)))
    {
        // Re-added in the slot it already holds; the tracker is unchanged.
        commands.push(Command::RemoveLayer { id: id.to_string() });
        let at = tracker
            .last_position(id)
            .ok_or_else(|| DiffError::TrackerDesync(id.to_string()))?;
        commands.push(Command::AddLayer {
            layer: new.raw().clone(),
            before: tracker.get(at + 1).map(str::to_string),
        });
        return Ok(());
    }

    for kind in [PropertyKind::Layout, PropertyKind::Paint] {
        diff_properties(
            optional_object(old.get(kind.key()), kind.key())?,
            optional_object(new.get(kind.key()), kind.key())?,
            kind,
            id,
            None,
            commands,
        );
    }

    if !equal_opt(old.get("filter"), new.get("filter")) {
        commands.push(Command::SetFilter {
            layer: id.to_string(),
            filter: new.get("filter").cloned(),
        });
    }

    if !equal_opt(old.get("minzoom"), new.get("minzoom"))
        || !equal_opt(old.get("maxzoom"), new.get("maxzoom"))
    {
        commands.push(Command::SetLayerZoomRange {
            layer: id.to_string(),
            min: new.get("minzoom").cloned(),
            max: new.get("maxzoom").cloned(),
        });
    }

    for key in union_keys(Some(old.props()), Some(new.props())) {
        if DEDICATED_KEYS.contains(&key) || config.ignores_layer_key(key) {
            continue;
        }
        if let Some(class) = key.strip_prefix(CLASSED_PAINT_PREFIX) {
            diff_properties(
                optional_object(old.get(key), "classed paint")?,
                optional_object(new.get(key), "classed paint")?,
                PropertyKind::Paint,
                id,
                Some(class),
                commands,
            );
        } else if !equal_opt(old.get(key), new.get(key)) {
            commands.push(Command::SetLayerProperty {
                layer: id.to_string(),
                name: key.to_string(),
                value: new.get(key).cloned(),
            });
        }
    }

    Ok(())
}
