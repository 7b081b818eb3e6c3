use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Name of an incremental update operation.
///
/// The set is closed: these names are the wire contract with whatever
/// applies the commands, and each one closely mirrors a method on a live map
/// renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "&'static str", try_from = "String")]
pub enum Operation {
    /// `[style]`
    SetStyle,
    /// `[layer, beforeLayerId]`
    AddLayer,
    /// `[layerId]`
    RemoveLayer,
    /// `[layerId, property, value, class?]`
    SetPaintProperty,
    /// `[layerId, property, value, class?]`
    SetLayoutProperty,
    /// `[layerId, filter]`
    SetFilter,
    /// `[sourceId, source]`
    AddSource,
    /// `[sourceId]`
    RemoveSource,
    /// `[sourceId, data]`
    SetGeoJsonSourceData,
    /// `[layerId, minzoom, maxzoom]`
    SetLayerZoomRange,
    /// `[layerId, property, value]`
    SetLayerProperty,
    /// `[[lon, lat]]`
    SetCenter,
    /// `[zoom]`
    SetZoom,
    /// `[bearing]`
    SetBearing,
    /// `[pitch]`
    SetPitch,
    /// `[spriteUrl]`
    SetSprite,
    /// `[glyphsUrl]`
    SetGlyphs,
    /// `[transition]`
    SetTransition,
    /// `[light]`
    SetLight,
    /// `[terrain]`
    SetTerrain,
    /// `[fog]`
    SetFog,
    /// `[camera]`
    SetCamera,
    /// `[[light3d, ...]]`
    SetLights,
    /// `[projection]`
    SetProjection,
    /// `[import]`
    AddImport,
    /// `[importId]`
    RemoveImport,
}

impl Operation {
    /// Every operation, in declaration order.
    pub const ALL: [Operation; 26] = [
        Self::SetStyle,
        Self::AddLayer,
        Self::RemoveLayer,
        Self::SetPaintProperty,
        Self::SetLayoutProperty,
        Self::SetFilter,
        Self::AddSource,
        Self::RemoveSource,
        Self::SetGeoJsonSourceData,
        Self::SetLayerZoomRange,
        Self::SetLayerProperty,
        Self::SetCenter,
        Self::SetZoom,
        Self::SetBearing,
        Self::SetPitch,
        Self::SetSprite,
        Self::SetGlyphs,
        Self::SetTransition,
        Self::SetLight,
        Self::SetTerrain,
        Self::SetFog,
        Self::SetCamera,
        Self::SetLights,
        Self::SetProjection,
        Self::AddImport,
        Self::RemoveImport,
    ];

    /// The wire name of this operation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SetStyle => "setStyle",
            Self::AddLayer => "addLayer",
            Self::RemoveLayer => "removeLayer",
            Self::SetPaintProperty => "setPaintProperty",
            Self::SetLayoutProperty => "setLayoutProperty",
            Self::SetFilter => "setFilter",
            Self::AddSource => "addSource",
            Self::RemoveSource => "removeSource",
            Self::SetGeoJsonSourceData => "setGeoJSONSourceData",
            Self::SetLayerZoomRange => "setLayerZoomRange",
            Self::SetLayerProperty => "setLayerProperty",
            Self::SetCenter => "setCenter",
            Self::SetZoom => "setZoom",
            Self::SetBearing => "setBearing",
            Self::SetPitch => "setPitch",
            Self::SetSprite => "setSprite",
            Self::SetGlyphs => "setGlyphs",
            Self::SetTransition => "setTransition",
            Self::SetLight => "setLight",
            Self::SetTerrain => "setTerrain",
            Self::SetFog => "setFog",
            Self::SetCamera => "setCamera",
            Self::SetLights => "setLights",
            Self::SetProjection => "setProjection",
            Self::AddImport => "addImport",
            Self::RemoveImport => "removeImport",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| TypeError::UnknownOperation(s.to_string()))
    }
}

impl From<Operation> for &'static str {
    fn from(op: Operation) -> Self {
        op.as_str()
    }
}

impl TryFrom<String> for Operation {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// A style-wide field with its own setter operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RootField {
    Center,
    Zoom,
    Bearing,
    Pitch,
    Sprite,
    Glyphs,
    Transition,
    Light,
    Fog,
    Projection,
    Lights,
    Camera,
    Terrain,
}

impl RootField {
    /// Fields compared field-by-field, in the order their setters are
    /// emitted. `Terrain` is absent: it depends on source removals.
    pub const DIFFED: [RootField; 12] = [
        Self::Center,
        Self::Zoom,
        Self::Bearing,
        Self::Pitch,
        Self::Sprite,
        Self::Glyphs,
        Self::Transition,
        Self::Light,
        Self::Fog,
        Self::Projection,
        Self::Lights,
        Self::Camera,
    ];

    /// The document key holding this field.
    pub fn key(self) -> &'static str {
        match self {
            Self::Center => "center",
            Self::Zoom => "zoom",
            Self::Bearing => "bearing",
            Self::Pitch => "pitch",
            Self::Sprite => "sprite",
            Self::Glyphs => "glyphs",
            Self::Transition => "transition",
            Self::Light => "light",
            Self::Fog => "fog",
            Self::Projection => "projection",
            Self::Lights => "lights",
            Self::Camera => "camera",
            Self::Terrain => "terrain",
        }
    }

    /// The setter operation for this field.
    pub fn operation(self) -> Operation {
        match self {
            Self::Center => Operation::SetCenter,
            Self::Zoom => Operation::SetZoom,
            Self::Bearing => Operation::SetBearing,
            Self::Pitch => Operation::SetPitch,
            Self::Sprite => Operation::SetSprite,
            Self::Glyphs => Operation::SetGlyphs,
            Self::Transition => Operation::SetTransition,
            Self::Light => Operation::SetLight,
            Self::Fog => Operation::SetFog,
            Self::Projection => Operation::SetProjection,
            Self::Lights => Operation::SetLights,
            Self::Camera => Operation::SetCamera,
            Self::Terrain => Operation::SetTerrain,
        }
    }

    /// The field a setter operation writes, if it is a style-wide setter.
    pub fn from_operation(op: Operation) -> Option<Self> {
        Self::DIFFED
            .into_iter()
            .chain(std::iter::once(Self::Terrain))
            .find(|field| field.operation() == op)
    }
}

impl fmt::Display for RootField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
