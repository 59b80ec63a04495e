//! Per-kind attribute mutators.
//!
//! Each mutator takes the current object and returns the updated copy; the
//! session stores it and records the before/after pair in the undo log.

use super::create::GeometryRejected;
use super::geometry::Coord;
use super::object::{BoardObject, FlagId, ObjectShape};

/// Sets the size attribute (thickness, diameter or text height).
pub fn set_size(object: &BoardObject, size: Coord) -> Result<BoardObject, GeometryRejected> {
    if size <= 0 {
        return Err(GeometryRejected::NonPositiveSize(size));
    }
    let mut updated = object.clone();
    match &mut updated.shape {
        ObjectShape::Line(l) => l.thickness = size,
        ObjectShape::Arc(a) => a.thickness = size,
        ObjectShape::Pad(p) => p.thickness = size,
        ObjectShape::Text(t) => t.height = size,
        ObjectShape::Via(v) => {
            if v.drill >= size {
                return Err(GeometryRejected::NoAnnularRing {
                    drill: v.drill,
                    diameter: size,
                });
            }
            v.diameter = size;
        }
        ObjectShape::Polygon(_) | ObjectShape::Element(_) => {
            return Err(GeometryRejected::NoSuchAttribute {
                kind: object.kind(),
                attribute: "size",
            });
        }
    }
    Ok(updated)
}

/// Sets the clearance attribute.
pub fn set_clearance(
    object: &BoardObject,
    clearance: Coord,
) -> Result<BoardObject, GeometryRejected> {
    if clearance < 0 {
        return Err(GeometryRejected::NonPositiveSize(clearance));
    }
    let mut updated = object.clone();
    match &mut updated.shape {
        ObjectShape::Line(l) => l.clearance = clearance,
        ObjectShape::Arc(a) => a.clearance = clearance,
        ObjectShape::Via(v) => v.clearance = clearance,
        ObjectShape::Pad(p) => p.clearance = clearance,
        ObjectShape::Polygon(_) | ObjectShape::Text(_) | ObjectShape::Element(_) => {
            return Err(GeometryRejected::NoSuchAttribute {
                kind: object.kind(),
                attribute: "clearance",
            });
        }
    }
    Ok(updated)
}

/// Sets the drill diameter of a via. The drill must stay smaller than the pad.
pub fn set_drill(object: &BoardObject, drill: Coord) -> Result<BoardObject, GeometryRejected> {
    let mut updated = object.clone();
    match &mut updated.shape {
        ObjectShape::Via(v) => {
            if drill <= 0 {
                return Err(GeometryRejected::NonPositiveSize(drill));
            }
            if drill >= v.diameter {
                return Err(GeometryRejected::NoAnnularRing {
                    drill,
                    diameter: v.diameter,
                });
            }
            v.drill = drill;
            Ok(updated)
        }
        _ => Err(GeometryRejected::NoSuchAttribute {
            kind: object.kind(),
            attribute: "drill",
        }),
    }
}

/// Sets or clears one flag. Returns `None` when the flag already has that value.
pub fn set_flag(object: &BoardObject, flag: FlagId, on: bool) -> Option<BoardObject> {
    if object.has_flag(flag) == on {
        return None;
    }
    let mut updated = object.clone();
    updated.flags.set(flag.bits(), on);
    Some(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{ObjectFlags, ObjectId, Point, PolygonData, ViaData};

    fn via(diameter: Coord, drill: Coord) -> BoardObject {
        BoardObject {
            id: ObjectId(1),
            layer: None,
            owner: None,
            flags: ObjectFlags::empty(),
            shape: ObjectShape::Via(ViaData {
                center: Point::new(0, 0),
                diameter,
                drill,
                clearance: 0,
            }),
        }
    }

    #[test]
    fn via_size_keeps_ring() {
        let v = via(100, 40);
        assert_eq!(set_size(&v, 120).unwrap().shape.size(), Some(120));
        assert!(matches!(
            set_size(&v, 40),
            Err(GeometryRejected::NoAnnularRing { .. })
        ));
        assert!(set_drill(&v, 99).is_ok());
        assert!(set_drill(&v, 100).is_err());
    }

    #[test]
    fn polygons_have_no_size() {
        let poly = BoardObject {
            shape: ObjectShape::Polygon(PolygonData {
                outline: Vec::new(),
                holes: Vec::new(),
            }),
            ..via(10, 5)
        };
        assert!(matches!(
            set_size(&poly, 10),
            Err(GeometryRejected::NoSuchAttribute { attribute: "size", .. })
        ));
    }

    #[test]
    fn set_flag_reports_no_change() {
        let v = via(100, 40);
        assert!(set_flag(&v, FlagId::Square, false).is_none());
        let squared = set_flag(&v, FlagId::Square, true).unwrap();
        assert!(squared.has_flag(FlagId::Square));
    }
}
