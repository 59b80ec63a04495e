//! Configuration type definitions.

use super::enums::DimensionSpec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Board created at startup.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct BoardConfig {
    /// Board outline width
    #[serde(default = "default_board_size")]
    pub width: DimensionSpec,

    /// Board outline height
    #[serde(default = "default_board_size")]
    pub height: DimensionSpec,

    /// Layer names, in stacking order. The first one is active at startup.
    #[serde(default = "default_layers")]
    pub layers: Vec<String>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            width: default_board_size(),
            height: default_board_size(),
            layers: default_layers(),
        }
    }
}

/// Sizes given to newly created geometry.
///
/// Each value accepts canonical units (nanometres) or a unit string such
/// as `"10mil"` or `"0.25mm"`.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct DefaultsConfig {
    /// Thickness of new lines and arcs
    #[serde(default = "default_line_thickness")]
    pub line_thickness: DimensionSpec,

    /// Clearance of new lines, arcs and vias
    #[serde(default = "default_clearance")]
    pub clearance: DimensionSpec,

    /// Copper diameter of new vias
    #[serde(default = "default_via_diameter")]
    pub via_diameter: DimensionSpec,

    /// Drill diameter of new vias (must stay below the via diameter)
    #[serde(default = "default_via_drill")]
    pub via_drill: DimensionSpec,

    /// Glyph height of new text
    #[serde(default = "default_text_height")]
    pub text_height: DimensionSpec,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            line_thickness: default_line_thickness(),
            clearance: default_clearance(),
            via_diameter: default_via_diameter(),
            via_drill: default_via_drill(),
            text_height: default_text_height(),
        }
    }
}

/// Ranges size changes are clamped to.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct LimitsConfig {
    #[serde(default = "default_min_size")]
    pub min_size: DimensionSpec,

    #[serde(default = "default_max_size")]
    pub max_size: DimensionSpec,

    #[serde(default = "default_min_clearance")]
    pub min_clearance: DimensionSpec,

    #[serde(default = "default_max_clearance")]
    pub max_clearance: DimensionSpec,

    #[serde(default = "default_min_drill")]
    pub min_drill: DimensionSpec,

    #[serde(default = "default_max_drill")]
    pub max_drill: DimensionSpec,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            min_size: default_min_size(),
            max_size: default_max_size(),
            min_clearance: default_min_clearance(),
            max_clearance: default_max_clearance(),
            min_drill: default_min_drill(),
            max_drill: default_max_drill(),
        }
    }
}

/// Interactive editing behaviour.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct EditingConfig {
    /// Grid pitch pointer coordinates snap to (0 disables snapping)
    #[serde(default = "default_grid")]
    pub grid: DimensionSpec,

    /// Pointer travel before a press-release counts as a drag
    #[serde(default = "default_drag_threshold")]
    pub drag_threshold: DimensionSpec,

    /// Extra distance around thin objects that still counts as a hit
    #[serde(default = "default_hit_slop")]
    pub hit_slop: DimensionSpec,

    /// Minimum vertices for polygons and polygon holes (at least 3)
    #[serde(default = "default_min_polygon_vertices")]
    pub min_polygon_vertices: usize,

    /// Mode active at startup (arrow, via, line, arc, rectangle, text,
    /// polygon, polygonhole, lock, thermal)
    #[serde(default = "default_initial_mode")]
    pub initial_mode: String,

    /// Number of undo steps kept (0 keeps everything)
    #[serde(default = "default_undo_limit")]
    pub undo_limit: usize,
}

impl Default for EditingConfig {
    fn default() -> Self {
        Self {
            grid: default_grid(),
            drag_threshold: default_drag_threshold(),
            hit_slop: default_hit_slop(),
            min_polygon_vertices: default_min_polygon_vertices(),
            initial_mode: default_initial_mode(),
            undo_limit: default_undo_limit(),
        }
    }
}

// =============================================================================
// Default value functions
// =============================================================================

fn default_board_size() -> DimensionSpec {
    DimensionSpec::from("100mm")
}

fn default_layers() -> Vec<String> {
    vec!["top".to_string(), "bottom".to_string(), "silk".to_string()]
}

pub(super) fn default_line_thickness() -> DimensionSpec {
    DimensionSpec::from("10mil")
}

pub(super) fn default_clearance() -> DimensionSpec {
    DimensionSpec::from("10mil")
}

pub(super) fn default_via_diameter() -> DimensionSpec {
    DimensionSpec::from("40mil")
}

pub(super) fn default_via_drill() -> DimensionSpec {
    DimensionSpec::from("20mil")
}

pub(super) fn default_text_height() -> DimensionSpec {
    DimensionSpec::from("40mil")
}

fn default_min_size() -> DimensionSpec {
    DimensionSpec::from("1mil")
}

fn default_max_size() -> DimensionSpec {
    DimensionSpec::from("1000mil")
}

fn default_min_clearance() -> DimensionSpec {
    DimensionSpec::Canonical(0)
}

fn default_max_clearance() -> DimensionSpec {
    DimensionSpec::from("1000mil")
}

fn default_min_drill() -> DimensionSpec {
    DimensionSpec::from("1mil")
}

fn default_max_drill() -> DimensionSpec {
    DimensionSpec::from("500mil")
}

fn default_grid() -> DimensionSpec {
    DimensionSpec::Canonical(0)
}

fn default_drag_threshold() -> DimensionSpec {
    DimensionSpec::Canonical(0)
}

fn default_hit_slop() -> DimensionSpec {
    DimensionSpec::Canonical(0)
}

fn default_min_polygon_vertices() -> usize {
    3
}

fn default_initial_mode() -> String {
    "arrow".to_string()
}

fn default_undo_limit() -> usize {
    1000
}
