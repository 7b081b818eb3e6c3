use serde::Serialize;
use serde_json::{Map, Value};
use stylediff_types::{deep_equal, Command, PropertyKind};
use tracing::{debug, trace};

use crate::error::{ReplayError, ReplayResult};

/// Result of replaying a command list and comparing against a target.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ReplayOutcome {
    /// Number of commands applied.
    pub applied: usize,
    /// Whether the replayed document equals the target.
    pub converged: bool,
    /// The replayed document.
    pub style: Value,
}

/// Deterministic command interpreter over JSON style documents.
pub struct ReplayEngine;

impl ReplayEngine {
    /// Apply `commands` in order to `style`.
    pub fn apply(mut style: Value, commands: &[Command]) -> ReplayResult<Value> {
        for command in commands {
            Self::apply_one(&mut style, command)?;
        }
        debug!(commands = commands.len(), "replayed commands");
        Ok(style)
    }

    /// Apply one command in place.
    pub fn apply_one(style: &mut Value, command: &Command) -> ReplayResult<()> {
        trace!(command = %command, "applying command");
        match command {
            Command::SetStyle { style: replacement } => {
                *style = replacement.clone();
            }
            Command::AddLayer { layer, before } => add_layer(style, layer, before.as_deref())?,
            Command::RemoveLayer { id } => {
                let (layers, at) = locate(style, "layers", id)?
                    .ok_or_else(|| ReplayError::UnknownLayer(id.clone()))?;
                layers.remove(at);
            }
            Command::SetPaintProperty {
                layer,
                name,
                value,
                class,
            } => set_property(style, PropertyKind::Paint, layer, name, value, class.as_deref())?,
            Command::SetLayoutProperty {
                layer,
                name,
                value,
                class,
            } => set_property(style, PropertyKind::Layout, layer, name, value, class.as_deref())?,
            Command::SetFilter { layer, filter } => {
                assign(layer_mut(style, layer)?, "filter", filter);
            }
            Command::SetLayerZoomRange { layer, min, max } => {
                let layer = layer_mut(style, layer)?;
                assign(layer, "minzoom", min);
                assign(layer, "maxzoom", max);
            }
            Command::SetLayerProperty { layer, name, value } => {
                assign(layer_mut(style, layer)?, name, value);
            }
            Command::AddSource { id, source } => {
                let sources = object_entry(root(style)?, "sources", "sources")?;
                if sources.contains_key(id) {
                    return Err(ReplayError::DuplicateSource(id.clone()));
                }
                sources.insert(id.clone(), source.clone());
            }
            Command::RemoveSource { id } => {
                sources_mut(style)?
                    .remove(id)
                    .ok_or_else(|| ReplayError::UnknownSource(id.clone()))?;
            }
            Command::SetGeoJsonSourceData { id, data } => {
                let source = sources_mut(style)?
                    .get_mut(id)
                    .ok_or_else(|| ReplayError::UnknownSource(id.clone()))?
                    .as_object_mut()
                    .ok_or(ReplayError::NotAnObject("source"))?;
                assign(source, "data", data);
            }
            Command::SetRoot { field, value } => {
                assign(root(style)?, field.key(), value);
            }
            Command::AddImport { import } => {
                let id = import
                    .get("id")
                    .and_then(Value::as_str)
                    .ok_or(ReplayError::MissingId("import"))?;
                let imports = array_entry(root(style)?, "imports")?;
                if position(imports, id).is_some() {
                    return Err(ReplayError::DuplicateImport(id.to_string()));
                }
                imports.push(import.clone());
            }
            Command::RemoveImport { id } => {
                let (imports, at) = locate(style, "imports", id)?
                    .ok_or_else(|| ReplayError::UnknownImport(id.clone()))?;
                imports.remove(at);
            }
        }
        Ok(())
    }

    /// Apply `commands` to `before` and compare the result with `after`.
    ///
    /// A missing `sources`, `layers` or `imports` collection equals an empty
    /// one.
    pub fn verify(
        before: &Value,
        after: &Value,
        commands: &[Command],
    ) -> ReplayResult<ReplayOutcome> {
        let style = Self::apply(before.clone(), commands)?;
        let converged = deep_equal(
            &without_empty_collections(&style),
            &without_empty_collections(after),
        );
        debug!(converged, "verified replay");
        Ok(ReplayOutcome {
            applied: commands.len(),
            converged,
            style,
        })
    }
}

const COLLECTIONS: [&str; 3] = ["sources", "layers", "imports"];

fn is_empty_collection(value: &Value) -> bool {
    match value {
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// Copy of `style` with empty top-level collections removed.
fn without_empty_collections(style: &Value) -> Value {
    let mut style = style.clone();
    if let Some(root) = style.as_object_mut() {
        for key in COLLECTIONS {
            if root.get(key).is_some_and(is_empty_collection) {
                root.remove(key);
            }
        }
    }
    style
}

fn add_layer(style: &mut Value, layer: &Value, before: Option<&str>) -> ReplayResult<()> {
    let id = layer
        .get("id")
        .and_then(Value::as_str)
        .ok_or(ReplayError::MissingId("layer"))?;
    let layers = array_entry(root(style)?, "layers")?;
    if position(layers, id).is_some() {
        return Err(ReplayError::DuplicateLayer(id.to_string()));
    }
    let at = match before {
        Some(neighbour) => position(layers, neighbour)
            .ok_or_else(|| ReplayError::UnknownLayer(neighbour.to_string()))?,
        None => layers.len(),
    };
    layers.insert(at, layer.clone());
    Ok(())
}

/// Write one paint or layout property. Maps left empty are dropped.
fn set_property(
    style: &mut Value,
    kind: PropertyKind,
    layer: &str,
    name: &str,
    value: &Option<Value>,
    class: Option<&str>,
) -> ReplayResult<()> {
    let key = match class {
        Some(class) => format!("{}.{class}", kind.key()),
        None => kind.key().to_string(),
    };
    let layer = layer_mut(style, layer)?;
    let props = object_entry(layer, &key, "property map")?;
    assign(props, name, value);
    if props.is_empty() {
        layer.remove(&key);
    }
    Ok(())
}

/// Set `key` to `value`, or remove it when the value is absent.
fn assign(map: &mut Map<String, Value>, key: &str, value: &Option<Value>) {
    match value {
        Some(value) => {
            map.insert(key.to_string(), value.clone());
        }
        None => {
            map.remove(key);
        }
    }
}

fn root(style: &mut Value) -> ReplayResult<&mut Map<String, Value>> {
    style.as_object_mut().ok_or(ReplayError::NotAnObject("style"))
}

fn object_entry<'a>(
    map: &'a mut Map<String, Value>,
    key: &str,
    what: &'static str,
) -> ReplayResult<&'a mut Map<String, Value>> {
    map.entry(key)
        .or_insert_with(|| Value::Object(Map::new()))
        .as_object_mut()
        .ok_or(ReplayError::NotAnObject(what))
}

fn array_entry<'a>(
    map: &'a mut Map<String, Value>,
    key: &'static str,
) -> ReplayResult<&'a mut Vec<Value>> {
    map.entry(key)
        .or_insert_with(|| Value::Array(Vec::new()))
        .as_array_mut()
        .ok_or(ReplayError::NotAnArray(key))
}

/// The array under `key` and the index of its entry with `id`, if any.
fn locate<'a>(
    style: &'a mut Value,
    key: &'static str,
    id: &str,
) -> ReplayResult<Option<(&'a mut Vec<Value>, usize)>> {
    let Some(value) = root(style)?.get_mut(key) else {
        return Ok(None);
    };
    let items = value.as_array_mut().ok_or(ReplayError::NotAnArray(key))?;
    Ok(position(items, id).map(|at| (items, at)))
}

fn sources_mut(style: &mut Value) -> ReplayResult<&mut Map<String, Value>> {
    object_entry(root(style)?, "sources", "sources")
}

fn layer_mut<'a>(style: &'a mut Value, id: &str) -> ReplayResult<&'a mut Map<String, Value>> {
    let (layers, at) =
        locate(style, "layers", id)?.ok_or_else(|| ReplayError::UnknownLayer(id.to_string()))?;
    layers[at]
        .as_object_mut()
        .ok_or(ReplayError::NotAnObject("layer"))
}

fn position(items: &[Value], id: &str) -> Option<usize> {
    items
        .iter()
        .position(|item| item.get("id").and_then(Value::as_str) == Some(id))
}
