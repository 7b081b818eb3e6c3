//! Borrowed views over a JSON style document.
//!
//! The views do not validate the style schema. They only check the shape the
//! differ relies on (objects where objects are expected, string ids, unique
//! layer ids) and report anything else as a [`TypeError`].

use std::collections::BTreeSet;

use serde_json::{Map, Value};

use crate::error::{TypeError, TypeResult};
use crate::operation::RootField;

/// Interpret `value` as a JSON object.
pub fn object<'a>(value: &'a Value, what: &'static str) -> TypeResult<&'a Map<String, Value>> {
    value.as_object().ok_or(TypeError::NotAnObject { what })
}

/// Interpret an optional value as an optional JSON object.
pub fn optional_object<'a>(
    value: Option<&'a Value>,
    what: &'static str,
) -> TypeResult<Option<&'a Map<String, Value>>> {
    value.map(|v| object(v, what)).transpose()
}

fn optional_array<'a>(value: Option<&'a Value>, what: &'static str) -> TypeResult<&'a [Value]> {
    match value {
        None => Ok(&[][..]),
        Some(v) => v
            .as_array()
            .map(Vec::as_slice)
            .ok_or(TypeError::NotAnArray { what }),
    }
}

/// A style document.
#[derive(Clone, Copy, Debug)]
pub struct StyleView<'a> {
    raw: &'a Value,
    root: &'a Map<String, Value>,
}

impl<'a> StyleView<'a> {
    pub fn new(raw: &'a Value) -> TypeResult<Self> {
        Ok(Self {
            raw,
            root: object(raw, "style")?,
        })
    }

    /// The underlying document.
    pub fn raw(&self) -> &'a Value {
        self.raw
    }

    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.root.get(key)
    }

    pub fn version(&self) -> Option<&'a Value> {
        self.get("version")
    }

    pub fn field(&self, field: RootField) -> Option<&'a Value> {
        self.get(field.key())
    }

    /// The `sources` mapping; absent means no sources.
    pub fn sources(&self) -> TypeResult<Sources<'a>> {
        Ok(Sources {
            entries: optional_object(self.get("sources"), "sources")?,
        })
    }

    /// The `layers` list in render order. Layer ids must be unique.
    pub fn layers(&self) -> TypeResult<Vec<LayerView<'a>>> {
        let items = optional_array(self.get("layers"), "layers")?;
        let mut seen = BTreeSet::new();
        let mut layers = Vec::with_capacity(items.len());
        for item in items {
            let layer = LayerView::new(item)?;
            if !seen.insert(layer.id()) {
                return Err(TypeError::DuplicateId {
                    what: "layer",
                    id: layer.id().to_string(),
                });
            }
            layers.push(layer);
        }
        Ok(layers)
    }

    /// The `imports` list in order.
    pub fn imports(&self) -> TypeResult<Vec<ImportView<'a>>> {
        optional_array(self.get("imports"), "imports")?
            .iter()
            .map(ImportView::new)
            .collect()
    }
}

/// The `sources` mapping of a style, possibly absent.
#[derive(Clone, Copy, Debug, Default)]
pub struct Sources<'a> {
    entries: Option<&'a Map<String, Value>>,
}

impl<'a> Sources<'a> {
    pub fn get(&self, id: &str) -> Option<&'a Value> {
        self.entries.and_then(|m| m.get(id))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.map_or(0, Map::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Source ids and definitions in map order.
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a Value)> + 'a {
        self.entries
            .into_iter()
            .flat_map(|m| m.iter())
            .map(|(id, source)| (id.as_str(), source))
    }
}

/// A single layer object with a string `id`.
#[derive(Clone, Copy, Debug)]
pub struct LayerView<'a> {
    id: &'a str,
    raw: &'a Value,
    props: &'a Map<String, Value>,
}

impl<'a> LayerView<'a> {
    pub fn new(raw: &'a Value) -> TypeResult<Self> {
        let props = object(raw, "layer")?;
        let id = props
            .get("id")
            .and_then(Value::as_str)
            .ok_or(TypeError::MissingId { what: "layer" })?;
        Ok(Self { id, raw, props })
    }

    pub fn id(&self) -> &'a str {
        self.id
    }

    /// The whole layer object.
    pub fn raw(&self) -> &'a Value {
        self.raw
    }

    pub fn props(&self) -> &'a Map<String, Value> {
        self.props
    }

    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.props.get(key)
    }

    /// The referenced source id, when the layer has one.
    pub fn source(&self) -> Option<&'a str> {
        self.get("source").and_then(Value::as_str)
    }
}

/// A single import object with a string `id`.
#[derive(Clone, Copy, Debug)]
pub struct ImportView<'a> {
    id: &'a str,
    raw: &'a Value,
}

impl<'a> ImportView<'a> {
    pub fn new(raw: &'a Value) -> TypeResult<Self> {
        let id = object(raw, "import")?
            .get("id")
            .and_then(Value::as_str)
            .ok_or(TypeError::MissingId { what: "import" })?;
        Ok(Self { id, raw })
    }

    pub fn id(&self) -> &'a str {
        self.id
    }

    pub fn raw(&self) -> &'a Value {
        self.raw
    }
}
