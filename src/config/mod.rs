//! Configuration file support for boardedit.
//!
//! This module handles loading and validating user settings from the configuration file
//! located at `~/.config/boardedit/config.toml`. Settings include the startup board,
//! default sizes for new geometry, clamp ranges for size changes, interactive editing
//! behaviour and keybindings.
//!
//! If no config file exists, sensible defaults are used automatically.

pub mod enums;
pub mod keybindings;
pub mod types;

pub use enums::DimensionSpec;
pub use keybindings::{KeyBinding, KeyBindingError, KeybindingsConfig};
pub use types::{BoardConfig, DefaultsConfig, EditingConfig, LimitsConfig};

use crate::board::{Board, ValidatingCreator};
use crate::mode::{EditorMode, ModeSettings};
use crate::session::{EditorSession, Range, SizeLimits, Style};
use anyhow::{Context, Result};
use log::{debug, info, warn};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure containing all user settings.
///
/// This is the root configuration type that gets deserialized from the TOML file.
/// All fields have sensible defaults and will use those if not specified in the config file.
///
/// # Example TOML
/// ```toml
/// [board]
/// width = "160mm"
/// height = "100mm"
/// layers = ["top", "bottom", "silk"]
///
/// [defaults]
/// line_thickness = "8mil"
/// via_drill = "0.4mm"
///
/// [editing]
/// grid = "25mil"
/// initial_mode = "line"
/// ```
#[derive(Debug, Serialize, Deserialize, Default, JsonSchema)]
pub struct Config {
    /// Board created at startup
    #[serde(default)]
    pub board: BoardConfig,

    /// Sizes given to new geometry
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Clamp ranges for size changes
    #[serde(default)]
    pub limits: LimitsConfig,

    /// Grid, drag threshold, polygon minimum, startup mode and undo depth
    #[serde(default)]
    pub editing: EditingConfig,

    /// Key combinations bound to action invocations
    #[serde(default)]
    pub keybindings: KeybindingsConfig,
}

/// Resets `spec` to `default` when it does not parse or is negative.
fn check_dimension(name: &str, spec: &mut DimensionSpec, default: DimensionSpec) {
    match spec.resolve() {
        Ok(value) if value >= 0 => {}
        Ok(value) => {
            warn!("Negative {} {}, falling back to {}", name, value, default);
            *spec = default;
        }
        Err(err) => {
            warn!("Invalid {} '{}': {}, falling back to {}", name, spec, err, default);
            *spec = default;
        }
    }
}

/// Swaps a min/max pair given in the wrong order.
fn order_range(name: &str, min: &mut DimensionSpec, max: &mut DimensionSpec) {
    if min.to_coord(0) > max.to_coord(0) {
        warn!("{} minimum {} exceeds maximum {}, swapping", name, min, max);
        std::mem::swap(min, max);
    }
}

impl Config {
    /// Validates and clamps all configuration values to acceptable ranges.
    ///
    /// This method ensures that user-provided config values can't put the
    /// editor into an impossible state. Invalid values are replaced with the
    /// nearest valid value (or the default) and a warning is logged.
    ///
    /// Checks:
    /// - every dimension parses and is not negative
    /// - board outline is non-empty and at least one layer exists
    /// - limit minimums do not exceed maximums
    /// - `min_polygon_vertices` is at least 3
    /// - `initial_mode` names a mode (falls back to `arrow`)
    /// - default sizes lie inside the limits
    pub fn validate_and_clamp(&mut self) {
        let board = types::BoardConfig::default();
        check_dimension("board width", &mut self.board.width, board.width);
        check_dimension("board height", &mut self.board.height, board.height);
        if self.board.width.to_coord(0) == 0 || self.board.height.to_coord(0) == 0 {
            warn!("Board outline must not be empty, using the default size");
            let board = types::BoardConfig::default();
            self.board.width = board.width;
            self.board.height = board.height;
        }
        self.board.layers.retain(|name| !name.trim().is_empty());
        if self.board.layers.is_empty() {
            warn!("No board layers configured, using the defaults");
            self.board.layers = types::BoardConfig::default().layers;
        }

        let limits = types::LimitsConfig::default();
        check_dimension("min_size", &mut self.limits.min_size, limits.min_size);
        check_dimension("max_size", &mut self.limits.max_size, limits.max_size);
        check_dimension("min_clearance", &mut self.limits.min_clearance, limits.min_clearance);
        check_dimension("max_clearance", &mut self.limits.max_clearance, limits.max_clearance);
        check_dimension("min_drill", &mut self.limits.min_drill, limits.min_drill);
        check_dimension("max_drill", &mut self.limits.max_drill, limits.max_drill);
        order_range("size", &mut self.limits.min_size, &mut self.limits.max_size);
        order_range(
            "clearance",
            &mut self.limits.min_clearance,
            &mut self.limits.max_clearance,
        );
        order_range("drill", &mut self.limits.min_drill, &mut self.limits.max_drill);

        let editing = types::EditingConfig::default();
        check_dimension("grid", &mut self.editing.grid, editing.grid);
        check_dimension(
            "drag_threshold",
            &mut self.editing.drag_threshold,
            editing.drag_threshold,
        );
        check_dimension("hit_slop", &mut self.editing.hit_slop, editing.hit_slop);

        if self.editing.min_polygon_vertices < 3 {
            warn!(
                "Invalid min_polygon_vertices {}, clamping to 3",
                self.editing.min_polygon_vertices
            );
            self.editing.min_polygon_vertices = 3;
        }

        if EditorMode::from_keyword(&self.editing.initial_mode).is_none() {
            warn!(
                "Invalid initial_mode '{}', falling back to 'arrow'",
                self.editing.initial_mode
            );
            self.editing.initial_mode = "arrow".to_string();
        }

        check_dimension(
            "line_thickness",
            &mut self.defaults.line_thickness,
            types::default_line_thickness(),
        );
        check_dimension("clearance", &mut self.defaults.clearance, types::default_clearance());
        check_dimension(
            "via_diameter",
            &mut self.defaults.via_diameter,
            types::default_via_diameter(),
        );
        check_dimension("via_drill", &mut self.defaults.via_drill, types::default_via_drill());
        check_dimension(
            "text_height",
            &mut self.defaults.text_height,
            types::default_text_height(),
        );

        let limits = self.size_limits();
        clamp_default("line_thickness", &mut self.defaults.line_thickness, limits.size);
        clamp_default("via_diameter", &mut self.defaults.via_diameter, limits.size);
        clamp_default("text_height", &mut self.defaults.text_height, limits.size);
        clamp_default("clearance", &mut self.defaults.clearance, limits.clearance);
        clamp_default("via_drill", &mut self.defaults.via_drill, limits.drill);

        let diameter = self.defaults.via_diameter.to_coord(0);
        if self.defaults.via_drill.to_coord(0) >= diameter {
            let drill = limits.drill.clamp(diameter / 2);
            warn!(
                "via_drill {} leaves no copper ring around via_diameter {}, using {}",
                self.defaults.via_drill, self.defaults.via_diameter, drill
            );
            self.defaults.via_drill = DimensionSpec::Canonical(drill);
        }
    }

    /// Returns the path to the configuration file.
    ///
    /// The config file is located at `~/.config/boardedit/config.toml`.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined (e.g., HOME not set).
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("boardedit");

        Ok(config_dir.join("config.toml"))
    }

    /// Loads configuration from the default path, or returns defaults if not found.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The config directory path cannot be determined
    /// - The file exists but cannot be read
    /// - The file exists but contains invalid TOML syntax
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            info!("Config file not found, using defaults");
            debug!("Expected config at: {}", config_path.display());
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Loads configuration from an explicit path. The file must exist.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        let config_str = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config from {}", config_path.display()))?;

        let mut config = Self::from_toml(&config_str)
            .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

        info!("Loaded config from {}", config_path.display());
        debug!("Config: {:?}", config);

        config.validate_and_clamp();
        Ok(config)
    }

    /// Parses TOML text without validating it.
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// JSON schema describing the configuration file.
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Config)
    }

    /// Board described by `[board]`.
    pub fn build_board(&self) -> Board {
        let default = types::BoardConfig::default();
        let layers: Vec<&str> = self.board.layers.iter().map(String::as_str).collect();
        Board::new(
            self.board.width.to_coord(default.width.to_coord(0)),
            self.board.height.to_coord(default.height.to_coord(0)),
            &layers,
        )
    }

    /// Sizes for new geometry from `[defaults]`.
    pub fn style(&self) -> Style {
        let fallback = Style::default();
        Style {
            line_thickness: self.defaults.line_thickness.to_coord(fallback.line_thickness),
            clearance: self.defaults.clearance.to_coord(fallback.clearance),
            via_diameter: self.defaults.via_diameter.to_coord(fallback.via_diameter),
            via_drill: self.defaults.via_drill.to_coord(fallback.via_drill),
            text_height: self.defaults.text_height.to_coord(fallback.text_height),
        }
    }

    /// Clamp ranges from `[limits]`.
    pub fn size_limits(&self) -> SizeLimits {
        let fallback = SizeLimits::default();
        let range = |min: &DimensionSpec, max: &DimensionSpec, fallback: Range| Range {
            min: min.to_coord(fallback.min),
            max: max.to_coord(fallback.max),
        };
        SizeLimits {
            size: range(&self.limits.min_size, &self.limits.max_size, fallback.size),
            clearance: range(
                &self.limits.min_clearance,
                &self.limits.max_clearance,
                fallback.clearance,
            ),
            drill: range(&self.limits.min_drill, &self.limits.max_drill, fallback.drill),
        }
    }

    /// Pointer handling settings from `[editing]`.
    pub fn mode_settings(&self) -> ModeSettings {
        ModeSettings {
            grid: self.editing.grid.to_coord(0),
            drag_threshold: self.editing.drag_threshold.to_coord(0),
            min_polygon_vertices: self.editing.min_polygon_vertices,
        }
    }

    /// Mode active at startup.
    pub fn initial_mode(&self) -> EditorMode {
        EditorMode::from_keyword(&self.editing.initial_mode).unwrap_or_default()
    }

    /// A fresh editing session configured from every section.
    pub fn build_session(&self) -> EditorSession {
        let mut session = EditorSession::new(self.build_board())
            .with_creator(Box::new(ValidatingCreator {
                min_polygon_vertices: self.editing.min_polygon_vertices,
                enforce_bounds: true,
            }))
            .with_undo_limit(self.editing.undo_limit);
        session.style = self.style();
        session.limits = self.size_limits();
        session.hit_slop = self.editing.hit_slop.to_coord(0);
        session
    }

    /// Creates a default configuration file with documentation comments.
    ///
    /// Writes the example config from `config.example.toml` to the user's config directory.
    ///
    /// # Errors
    /// Returns an error if:
    /// - A config file already exists at the target path
    /// - The config directory cannot be created
    /// - The file cannot be written
    pub fn create_default_file() -> Result<PathBuf> {
        let config_path = Self::get_config_path()?;

        if config_path.exists() {
            return Err(anyhow::anyhow!(
                "Config file already exists at {}",
                config_path.display()
            ));
        }

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let default_config = include_str!("../../config.example.toml");
        fs::write(&config_path, default_config)
            .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

        info!("Created default config at {}", config_path.display());
        Ok(config_path)
    }
}

fn clamp_default(name: &str, spec: &mut DimensionSpec, range: Range) {
    let value = spec.to_coord(0);
    let clamped = range.clamp(value);
    if clamped != value {
        warn!(
            "Default {} {} outside {}..={}, clamping to {}",
            name, spec, range.min, range.max, clamped
        );
        *spec = DimensionSpec::Canonical(clamped);
    }
}

#[cfg(test)]
mod tests;
