//! Typed update commands and their `{ command, args }` wire encoding.

use std::fmt;

use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::error::{TypeError, TypeResult};
use crate::operation::{Operation, RootField};

/// Which property map of a layer a property command writes to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    Paint,
    Layout,
}

impl PropertyKind {
    /// The layer key holding the map, e.g. `paint`.
    pub fn key(self) -> &'static str {
        match self {
            Self::Paint => "paint",
            Self::Layout => "layout",
        }
    }
}

/// One incremental update operation.
///
/// `None` values mean "absent": the property or field is unset and the
/// renderer falls back to its default.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Replace the whole style.
    SetStyle { style: Value },
    /// Insert a layer before `before`, or on top when `before` is `None`.
    AddLayer { layer: Value, before: Option<String> },
    RemoveLayer { id: String },
    SetPaintProperty {
        layer: String,
        name: String,
        value: Option<Value>,
        class: Option<String>,
    },
    SetLayoutProperty {
        layer: String,
        name: String,
        value: Option<Value>,
        class: Option<String>,
    },
    SetFilter { layer: String, filter: Option<Value> },
    AddSource { id: String, source: Value },
    RemoveSource { id: String },
    /// Swap the `data` of a geojson source without reloading it.
    SetGeoJsonSourceData { id: String, data: Option<Value> },
    SetLayerZoomRange {
        layer: String,
        min: Option<Value>,
        max: Option<Value>,
    },
    SetLayerProperty {
        layer: String,
        name: String,
        value: Option<Value>,
    },
    /// Set (or clear) a style-wide field such as `zoom` or `terrain`.
    SetRoot { field: RootField, value: Option<Value> },
    AddImport { import: Value },
    RemoveImport { id: String },
}

impl Command {
    /// `setStyle` carrying a copy of `style`.
    pub fn set_style(style: &Value) -> Self {
        Self::SetStyle {
            style: style.clone(),
        }
    }

    /// A paint or layout property update.
    pub fn set_property(
        kind: PropertyKind,
        layer: &str,
        name: &str,
        value: Option<&Value>,
        class: Option<&str>,
    ) -> Self {
        let (layer, name, value, class) = (
            layer.to_string(),
            name.to_string(),
            value.cloned(),
            class.map(str::to_string),
        );
        match kind {
            PropertyKind::Paint => Self::SetPaintProperty {
                layer,
                name,
                value,
                class,
            },
            PropertyKind::Layout => Self::SetLayoutProperty {
                layer,
                name,
                value,
                class,
            },
        }
    }

    /// The operation this command performs.
    pub fn operation(&self) -> Operation {
        match self {
            Self::SetStyle { .. } => Operation::SetStyle,
            Self::AddLayer { .. } => Operation::AddLayer,
            Self::RemoveLayer { .. } => Operation::RemoveLayer,
            Self::SetPaintProperty { .. } => Operation::SetPaintProperty,
            Self::SetLayoutProperty { .. } => Operation::SetLayoutProperty,
            Self::SetFilter { .. } => Operation::SetFilter,
            Self::AddSource { .. } => Operation::AddSource,
            Self::RemoveSource { .. } => Operation::RemoveSource,
            Self::SetGeoJsonSourceData { .. } => Operation::SetGeoJsonSourceData,
            Self::SetLayerZoomRange { .. } => Operation::SetLayerZoomRange,
            Self::SetLayerProperty { .. } => Operation::SetLayerProperty,
            Self::SetRoot { field, .. } => field.operation(),
            Self::AddImport { .. } => Operation::AddImport,
            Self::RemoveImport { .. } => Operation::RemoveImport,
        }
    }

    /// Positional arguments as they appear on the wire. Absent values are
    /// encoded as `null`; the class tag is only appended when present.
    pub fn args(&self) -> Vec<Value> {
        fn opt(value: &Option<Value>) -> Value {
            value.clone().unwrap_or(Value::Null)
        }
        fn text(s: &str) -> Value {
            Value::String(s.to_string())
        }

        match self {
            Self::SetStyle { style } => vec![style.clone()],
            Self::AddLayer { layer, before } => vec![
                layer.clone(),
                before.as_deref().map(text).unwrap_or(Value::Null),
            ],
            Self::RemoveLayer { id } | Self::RemoveSource { id } | Self::RemoveImport { id } => {
                vec![text(id)]
            }
            Self::SetPaintProperty {
                layer,
                name,
                value,
                class,
            }
            | Self::SetLayoutProperty {
                layer,
                name,
                value,
                class,
            } => {
                let mut args = vec![text(layer), text(name), opt(value)];
                if let Some(class) = class {
                    args.push(text(class));
                }
                args
            }
            Self::SetFilter { layer, filter } => vec![text(layer), opt(filter)],
            Self::AddSource { id, source } => vec![text(id), source.clone()],
            Self::SetGeoJsonSourceData { id, data } => vec![text(id), opt(data)],
            Self::SetLayerZoomRange { layer, min, max } => vec![text(layer), opt(min), opt(max)],
            Self::SetLayerProperty { layer, name, value } => {
                vec![text(layer), text(name), opt(value)]
            }
            Self::SetRoot { value, .. } => vec![opt(value)],
            Self::AddImport { import } => vec![import.clone()],
        }
    }

    /// The wire form of this command.
    pub fn to_wire(&self) -> WireCommand {
        WireCommand {
            command: self.operation(),
            args: self.args(),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.operation(), Value::Array(self.args()))
    }
}

impl Serialize for Command {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Command", 2)?;
        state.serialize_field("command", &self.operation())?;
        state.serialize_field("args", &self.args())?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for Command {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = WireCommand::deserialize(deserializer)?;
        Command::try_from(wire).map_err(serde::de::Error::custom)
    }
}

/// The untyped `{ "command": ..., "args": [...] }` form of a command.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WireCommand {
    pub command: Operation,
    #[serde(default)]
    pub args: Vec<Value>,
}

impl TryFrom<WireCommand> for Command {
    type Error = TypeError;

    fn try_from(wire: WireCommand) -> TypeResult<Self> {
        let op = wire.command;
        let args = Args {
            op,
            items: wire.args,
        };

        let command = match op {
            Operation::SetStyle => {
                args.arity(1, 1, "1")?;
                Self::SetStyle {
                    style: args.required(0)?,
                }
            }
            Operation::AddLayer => {
                args.arity(1, 2, "1 or 2")?;
                Self::AddLayer {
                    layer: args.required(0)?,
                    before: args.optional_string(1)?,
                }
            }
            Operation::RemoveLayer => {
                args.arity(1, 1, "1")?;
                Self::RemoveLayer {
                    id: args.string(0)?,
                }
            }
            Operation::SetPaintProperty | Operation::SetLayoutProperty => {
                args.arity(3, 4, "3 or 4")?;
                let kind = if op == Operation::SetPaintProperty {
                    PropertyKind::Paint
                } else {
                    PropertyKind::Layout
                };
                Self::set_property(
                    kind,
                    &args.string(0)?,
                    &args.string(1)?,
                    args.optional(2).as_ref(),
                    args.optional_string(3)?.as_deref(),
                )
            }
            Operation::SetFilter => {
                args.arity(2, 2, "2")?;
                Self::SetFilter {
                    layer: args.string(0)?,
                    filter: args.optional(1),
                }
            }
            Operation::AddSource => {
                args.arity(2, 2, "2")?;
                Self::AddSource {
                    id: args.string(0)?,
                    source: args.required(1)?,
                }
            }
            Operation::RemoveSource => {
                args.arity(1, 1, "1")?;
                Self::RemoveSource {
                    id: args.string(0)?,
                }
            }
            Operation::SetGeoJsonSourceData => {
                args.arity(2, 2, "2")?;
                Self::SetGeoJsonSourceData {
                    id: args.string(0)?,
                    data: args.optional(1),
                }
            }
            Operation::SetLayerZoomRange => {
                args.arity(3, 3, "3")?;
                Self::SetLayerZoomRange {
                    layer: args.string(0)?,
                    min: args.optional(1),
                    max: args.optional(2),
                }
            }
            Operation::SetLayerProperty => {
                args.arity(3, 3, "3")?;
                Self::SetLayerProperty {
                    layer: args.string(0)?,
                    name: args.string(1)?,
                    value: args.optional(2),
                }
            }
            Operation::AddImport => {
                args.arity(1, 1, "1")?;
                Self::AddImport {
                    import: args.required(0)?,
                }
            }
            Operation::RemoveImport => {
                args.arity(1, 1, "1")?;
                Self::RemoveImport {
                    id: args.string(0)?,
                }
            }
            root => {
                args.arity(1, 1, "1")?;
                let field = RootField::from_operation(root)
                    .ok_or_else(|| TypeError::UnknownOperation(root.to_string()))?;
                Self::SetRoot {
                    field,
                    value: args.optional(0),
                }
            }
        };

        Ok(command)
    }
}

/// Positional argument reader used while decoding wire commands.
struct Args {
    op: Operation,
    items: Vec<Value>,
}

impl Args {
    fn arity(&self, min: usize, max: usize, expected: &'static str) -> TypeResult<()> {
        let actual = self.items.len();
        if actual < min || actual > max {
            return Err(TypeError::Arity {
                operation: self.op,
                expected,
                actual,
            });
        }
        Ok(())
    }

    fn invalid(&self, index: usize, reason: &'static str) -> TypeError {
        TypeError::InvalidArgument {
            operation: self.op,
            index,
            reason,
        }
    }

    fn optional(&self, index: usize) -> Option<Value> {
        match self.items.get(index) {
            None | Some(Value::Null) => None,
            Some(value) => Some(value.clone()),
        }
    }

    fn required(&self, index: usize) -> TypeResult<Value> {
        self.optional(index)
            .ok_or_else(|| self.invalid(index, "value must not be null"))
    }

    fn string(&self, index: usize) -> TypeResult<String> {
        self.optional_string(index)?
            .ok_or_else(|| self.invalid(index, "expected a string"))
    }

    fn optional_string(&self, index: usize) -> TypeResult<Option<String>> {
        match self.optional(index) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(_) => Err(self.invalid(index, "expected a string")),
        }
    }
}
