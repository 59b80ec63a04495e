//! Unit conversion collaborator.
//!
//! The value parser owns only token syntax; suffix lookup and the conversion
//! factors live behind [`UnitConverter`]. Canonical board units are nanometres.

use crate::board::{Coord, MAX_COORD};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A length unit understood by the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum UnitId {
    /// Nanometre (canonical)
    Nm,
    /// Micrometre
    Um,
    /// Millimetre
    Mm,
    /// Centimetre
    Cm,
    /// Metre
    M,
    /// Thousandth of an inch
    Mil,
    /// Hundredth of a mil
    Cmil,
    /// Inch
    Inch,
}

impl UnitId {
    pub const ALL: [UnitId; 8] = [
        UnitId::Nm,
        UnitId::Um,
        UnitId::Mm,
        UnitId::Cm,
        UnitId::M,
        UnitId::Mil,
        UnitId::Cmil,
        UnitId::Inch,
    ];

    /// Canonical units per one of this unit.
    pub const fn nm_per_unit(self) -> f64 {
        match self {
            UnitId::Nm => 1.0,
            UnitId::Um => 1_000.0,
            UnitId::Mm => 1_000_000.0,
            UnitId::Cm => 10_000_000.0,
            UnitId::M => 1_000_000_000.0,
            UnitId::Mil => 25_400.0,
            UnitId::Cmil => 254.0,
            UnitId::Inch => 25_400_000.0,
        }
    }

    pub const fn suffix(self) -> &'static str {
        match self {
            UnitId::Nm => "nm",
            UnitId::Um => "um",
            UnitId::Mm => "mm",
            UnitId::Cm => "cm",
            UnitId::M => "m",
            UnitId::Mil => "mil",
            UnitId::Cmil => "cmil",
            UnitId::Inch => "in",
        }
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// Maps unit suffixes to [`UnitId`]s and magnitudes to canonical coordinates.
pub trait UnitConverter {
    /// Resolves a unit suffix such as `"mil"` or `"mm"`.
    fn parse_unit(&self, suffix: &str) -> Option<UnitId>;

    /// Converts `magnitude` in `unit` to canonical coordinates.
    ///
    /// Returns `None` when the result is not finite or its magnitude exceeds
    /// [`MAX_COORD`].
    fn to_canonical(&self, magnitude: f64, unit: UnitId) -> Option<Coord>;
}

/// The built-in metric/imperial conversion table.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardUnits;

impl UnitConverter for StandardUnits {
    fn parse_unit(&self, suffix: &str) -> Option<UnitId> {
        match suffix.trim().to_ascii_lowercase().as_str() {
            "nm" => Some(UnitId::Nm),
            "um" | "µm" | "micron" => Some(UnitId::Um),
            "mm" => Some(UnitId::Mm),
            "cm" => Some(UnitId::Cm),
            "m" => Some(UnitId::M),
            "mil" | "mils" => Some(UnitId::Mil),
            "cmil" => Some(UnitId::Cmil),
            "in" | "inch" | "inches" => Some(UnitId::Inch),
            _ => None,
        }
    }

    fn to_canonical(&self, magnitude: f64, unit: UnitId) -> Option<Coord> {
        let value = (magnitude * unit.nm_per_unit()).round();
        if !value.is_finite() || value.abs() > MAX_COORD as f64 {
            return None;
        }
        Some(value as Coord)
    }
}

/// Formats a canonical coordinate in `unit`, trimming trailing zeros.
pub fn format_coord(value: Coord, unit: UnitId) -> String {
    let scaled = value as f64 / unit.nm_per_unit();
    let mut text = format!("{scaled:.4}");
    if text.contains('.') {
        while text.ends_with('0') {
            text.pop();
        }
        if text.ends_with('.') {
            text.pop();
        }
    }
    format!("{text}{}", unit.suffix())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffixes_round_trip() {
        let units = StandardUnits;
        for unit in UnitId::ALL {
            assert_eq!(units.parse_unit(unit.suffix()), Some(unit));
        }
        assert_eq!(units.parse_unit("MIL"), Some(UnitId::Mil));
        assert_eq!(units.parse_unit("furlong"), None);
    }

    #[test]
    fn conversion_matches_table() {
        let units = StandardUnits;
        assert_eq!(units.to_canonical(10.0, UnitId::Mil), Some(254_000));
        assert_eq!(units.to_canonical(0.25, UnitId::Mm), Some(250_000));
        assert_eq!(units.to_canonical(1.0, UnitId::Inch), Some(25_400_000));
        assert_eq!(units.to_canonical(f64::INFINITY, UnitId::Mm), None);
        assert_eq!(units.to_canonical(1e30, UnitId::M), None);
    }

    #[test]
    fn conversion_rejects_magnitudes_beyond_coordinate_range() {
        let units = StandardUnits;
        let limit = MAX_COORD as f64;
        assert_eq!(units.to_canonical(limit, UnitId::Nm), Some(MAX_COORD));
        assert_eq!(units.to_canonical(-limit, UnitId::Nm), Some(-MAX_COORD));
        assert_eq!(units.to_canonical(9_223_372_036_854_000_000.0, UnitId::Nm), None);
        assert_eq!(units.to_canonical(-5e18, UnitId::Nm), None);
        assert_eq!(units.to_canonical(10_000_000.0, UnitId::M), None);
    }

    #[test]
    fn format_trims_zeros() {
        assert_eq!(format_coord(254_000, UnitId::Mil), "10mil");
        assert_eq!(format_coord(250_000, UnitId::Mm), "0.25mm");
    }
}
