//! Editing mode selection.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The active interactive editing mode.
///
/// Exactly one mode is active at a time. Each mode interprets pointer
/// gestures differently and owns its own in-progress construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum EditorMode {
    /// Select objects by click or box drag
    #[default]
    Arrow,
    /// Place a via per click
    Via,
    /// Chained straight segments
    Line,
    /// Chained quarter arcs
    Arc,
    /// Axis-aligned filled rectangles (as polygons)
    Rectangle,
    /// Text labels
    Text,
    /// Filled polygons, closed explicitly
    Polygon,
    /// Holes cut into an existing polygon
    #[serde(alias = "hole")]
    PolygonHole,
    /// Toggle the lock flag per click
    Lock,
    /// Toggle the thermal flag per click
    Thermal,
}

impl EditorMode {
    pub const ALL: [EditorMode; 10] = [
        EditorMode::Arrow,
        EditorMode::Via,
        EditorMode::Line,
        EditorMode::Arc,
        EditorMode::Rectangle,
        EditorMode::Text,
        EditorMode::Polygon,
        EditorMode::PolygonHole,
        EditorMode::Lock,
        EditorMode::Thermal,
    ];

    /// Parses a mode keyword (case-insensitive).
    pub fn from_keyword(keyword: &str) -> Option<EditorMode> {
        match keyword.trim().to_ascii_lowercase().as_str() {
            "arrow" | "select" | "none" => Some(EditorMode::Arrow),
            "via" => Some(EditorMode::Via),
            "line" => Some(EditorMode::Line),
            "arc" => Some(EditorMode::Arc),
            "rectangle" | "rect" => Some(EditorMode::Rectangle),
            "text" => Some(EditorMode::Text),
            "polygon" => Some(EditorMode::Polygon),
            "polygonhole" | "hole" => Some(EditorMode::PolygonHole),
            "lock" => Some(EditorMode::Lock),
            "thermal" => Some(EditorMode::Thermal),
            _ => None,
        }
    }

    pub const fn keyword(self) -> &'static str {
        match self {
            EditorMode::Arrow => "arrow",
            EditorMode::Via => "via",
            EditorMode::Line => "line",
            EditorMode::Arc => "arc",
            EditorMode::Rectangle => "rectangle",
            EditorMode::Text => "text",
            EditorMode::Polygon => "polygon",
            EditorMode::PolygonHole => "polygonhole",
            EditorMode::Lock => "lock",
            EditorMode::Thermal => "thermal",
        }
    }
}

impl FromStr for EditorMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EditorMode::from_keyword(s).ok_or_else(|| format!("unknown mode '{s}'"))
    }
}

impl fmt::Display for EditorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}
