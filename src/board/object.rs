//! Board object definitions.
//!
//! Objects are a closed tagged union over [`ObjectKind`]. Every operation that
//! cares about the kind matches exhaustively on [`ObjectShape`], so adding or
//! removing a kind is caught at compile time.

use super::geometry::{Coord, Point, Rect, distance_to_segment, point_in_polygon};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier of a board object. Ids are allocated in creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub u64);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identifier of a board layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LayerId(pub u16);

/// Object kind discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ObjectKind {
    Line,
    Arc,
    Via,
    Pad,
    Polygon,
    Text,
    Element,
}

impl ObjectKind {
    /// All kinds in spatial hit priority order (first wins).
    pub const HIT_PRIORITY: [ObjectKind; 7] = [
        ObjectKind::Via,
        ObjectKind::Pad,
        ObjectKind::Line,
        ObjectKind::Arc,
        ObjectKind::Text,
        ObjectKind::Polygon,
        ObjectKind::Element,
    ];

    /// Returns the eligibility mask bit for this kind.
    pub const fn mask(self) -> KindMask {
        match self {
            ObjectKind::Line => KindMask::LINE,
            ObjectKind::Arc => KindMask::ARC,
            ObjectKind::Via => KindMask::VIA,
            ObjectKind::Pad => KindMask::PAD,
            ObjectKind::Polygon => KindMask::POLYGON,
            ObjectKind::Text => KindMask::TEXT,
            ObjectKind::Element => KindMask::ELEMENT,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            ObjectKind::Line => "line",
            ObjectKind::Arc => "arc",
            ObjectKind::Via => "via",
            ObjectKind::Pad => "pad",
            ObjectKind::Polygon => "polygon",
            ObjectKind::Text => "text",
            ObjectKind::Element => "element",
        }
    }

    fn priority(self) -> usize {
        Self::HIT_PRIORITY
            .iter()
            .position(|k| *k == self)
            .unwrap_or(Self::HIT_PRIORITY.len())
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

bitflags::bitflags! {
    /// Type-eligibility mask used by spatial resolution and actions.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct KindMask: u32 {
        const LINE = 1 << 0;
        const ARC = 1 << 1;
        const VIA = 1 << 2;
        const PAD = 1 << 3;
        const POLYGON = 1 << 4;
        const TEXT = 1 << 5;
        const ELEMENT = 1 << 6;
        /// Kinds with a size attribute.
        const SIZED = Self::LINE.bits() | Self::ARC.bits() | Self::VIA.bits() | Self::PAD.bits() | Self::TEXT.bits();
        /// Kinds with a clearance attribute.
        const CLEARED = Self::LINE.bits() | Self::ARC.bits() | Self::VIA.bits() | Self::PAD.bits();
        const ALL = Self::LINE.bits() | Self::ARC.bits() | Self::VIA.bits() | Self::PAD.bits()
            | Self::POLYGON.bits() | Self::TEXT.bits() | Self::ELEMENT.bits();
    }
}

impl KindMask {
    pub fn accepts(&self, kind: ObjectKind) -> bool {
        self.contains(kind.mask())
    }
}

impl From<ObjectKind> for KindMask {
    fn from(kind: ObjectKind) -> Self {
        kind.mask()
    }
}

bitflags::bitflags! {
    /// Per-object state flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct ObjectFlags: u32 {
        const SELECTED = 1 << 0;
        const LOCKED = 1 << 1;
        const THERMAL = 1 << 2;
        const SQUARE = 1 << 3;
        const OCTAGON = 1 << 4;
        const CLEARLINE = 1 << 5;
        const FOUND = 1 << 6;
    }
}

/// A user-addressable flag, as named by flag actions and click modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlagId {
    Selected,
    Lock,
    Thermal,
    Square,
    Octagon,
    ClearLine,
    Found,
}

impl FlagId {
    pub const ALL: [FlagId; 7] = [
        FlagId::Selected,
        FlagId::Lock,
        FlagId::Thermal,
        FlagId::Square,
        FlagId::Octagon,
        FlagId::ClearLine,
        FlagId::Found,
    ];

    /// Parses a flag keyword (case-insensitive).
    pub fn from_keyword(keyword: &str) -> Option<FlagId> {
        match keyword.trim().to_ascii_lowercase().as_str() {
            "selected" => Some(FlagId::Selected),
            "lock" | "locked" => Some(FlagId::Lock),
            "thermal" => Some(FlagId::Thermal),
            "square" => Some(FlagId::Square),
            "octagon" => Some(FlagId::Octagon),
            "clearline" | "join" => Some(FlagId::ClearLine),
            "found" => Some(FlagId::Found),
            _ => None,
        }
    }

    pub const fn keyword(self) -> &'static str {
        match self {
            FlagId::Selected => "selected",
            FlagId::Lock => "lock",
            FlagId::Thermal => "thermal",
            FlagId::Square => "square",
            FlagId::Octagon => "octagon",
            FlagId::ClearLine => "clearline",
            FlagId::Found => "found",
        }
    }

    pub const fn bits(self) -> ObjectFlags {
        match self {
            FlagId::Selected => ObjectFlags::SELECTED,
            FlagId::Lock => ObjectFlags::LOCKED,
            FlagId::Thermal => ObjectFlags::THERMAL,
            FlagId::Square => ObjectFlags::SQUARE,
            FlagId::Octagon => ObjectFlags::OCTAGON,
            FlagId::ClearLine => ObjectFlags::CLEARLINE,
            FlagId::Found => ObjectFlags::FOUND,
        }
    }

    /// Kinds this flag is meaningful for.
    pub fn applicable_kinds(self) -> KindMask {
        match self {
            FlagId::Selected | FlagId::Lock | FlagId::Found => KindMask::ALL,
            FlagId::Thermal | FlagId::Square | FlagId::Octagon => KindMask::VIA | KindMask::PAD,
            FlagId::ClearLine => KindMask::LINE | KindMask::ARC | KindMask::TEXT,
        }
    }

    /// Whether changing this flag is allowed on a locked object.
    pub fn bypasses_lock(self) -> bool {
        matches!(self, FlagId::Selected | FlagId::Lock | FlagId::Found)
    }
}

impl fmt::Display for FlagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Straight copper segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineData {
    pub p1: Point,
    pub p2: Point,
    pub thickness: Coord,
    pub clearance: Coord,
}

/// Elliptic arc segment. Angles are in degrees, measured from +x towards +y.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArcData {
    pub center: Point,
    pub width: Coord,
    pub height: Coord,
    pub start_angle: f64,
    pub delta_angle: f64,
    pub thickness: Coord,
    pub clearance: Coord,
}

impl ArcData {
    const SAMPLES: usize = 32;

    /// Point on the arc at `angle` degrees.
    pub fn point_at(&self, angle: f64) -> Point {
        let rad = angle.to_radians();
        Point::new(
            self.center.x + (self.width as f64 * rad.cos()).round() as Coord,
            self.center.y + (self.height as f64 * rad.sin()).round() as Coord,
        )
    }

    pub fn start_point(&self) -> Point {
        self.point_at(self.start_angle)
    }

    pub fn end_point(&self) -> Point {
        self.point_at(self.start_angle + self.delta_angle)
    }

    /// Polyline approximation of the arc used for hit testing and bounds.
    pub fn samples(&self) -> Vec<Point> {
        (0..=Self::SAMPLES)
            .map(|i| {
                let t = i as f64 / Self::SAMPLES as f64;
                self.point_at(self.start_angle + self.delta_angle * t)
            })
            .collect()
    }
}

/// Plated through-hole via.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViaData {
    pub center: Point,
    pub diameter: Coord,
    pub drill: Coord,
    pub clearance: Coord,
}

/// Surface pad, modelled as a thick segment. Usually owned by an element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PadData {
    pub p1: Point,
    pub p2: Point,
    pub thickness: Coord,
    pub clearance: Coord,
    pub number: String,
}

/// Filled polygon with optional holes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolygonData {
    pub outline: Vec<Point>,
    #[serde(default)]
    pub holes: Vec<Vec<Point>>,
}

impl PolygonData {
    /// True when `p` is inside the outline and outside every hole.
    pub fn covers(&self, p: Point) -> bool {
        point_in_polygon(p, &self.outline) && !self.holes.iter().any(|h| point_in_polygon(p, h))
    }
}

/// Text label. `height` is the glyph height and acts as the size attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextData {
    pub anchor: Point,
    pub text: String,
    pub height: Coord,
}

impl TextData {
    pub fn bounds(&self) -> Rect {
        let chars = self.text.chars().count().max(1) as Coord;
        let width = chars * self.height * 2 / 3;
        Rect::from_corners(self.anchor, self.anchor.offset(width, self.height))
    }
}

/// Component footprint. Owns its pads through `pads`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementData {
    pub origin: Point,
    pub refdes: String,
    #[serde(default)]
    pub pads: Vec<ObjectId>,
}

/// Kind-specific payload of a board object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ObjectShape {
    Line(LineData),
    Arc(ArcData),
    Via(ViaData),
    Pad(PadData),
    Polygon(PolygonData),
    Text(TextData),
    Element(ElementData),
}

impl ObjectShape {
    pub fn kind(&self) -> ObjectKind {
        match self {
            ObjectShape::Line(_) => ObjectKind::Line,
            ObjectShape::Arc(_) => ObjectKind::Arc,
            ObjectShape::Via(_) => ObjectKind::Via,
            ObjectShape::Pad(_) => ObjectKind::Pad,
            ObjectShape::Polygon(_) => ObjectKind::Polygon,
            ObjectShape::Text(_) => ObjectKind::Text,
            ObjectShape::Element(_) => ObjectKind::Element,
        }
    }

    /// The size attribute: thickness, diameter or glyph height.
    pub fn size(&self) -> Option<Coord> {
        match self {
            ObjectShape::Line(l) => Some(l.thickness),
            ObjectShape::Arc(a) => Some(a.thickness),
            ObjectShape::Via(v) => Some(v.diameter),
            ObjectShape::Pad(p) => Some(p.thickness),
            ObjectShape::Text(t) => Some(t.height),
            ObjectShape::Polygon(_) | ObjectShape::Element(_) => None,
        }
    }

    pub fn clearance(&self) -> Option<Coord> {
        match self {
            ObjectShape::Line(l) => Some(l.clearance),
            ObjectShape::Arc(a) => Some(a.clearance),
            ObjectShape::Via(v) => Some(v.clearance),
            ObjectShape::Pad(p) => Some(p.clearance),
            ObjectShape::Polygon(_) | ObjectShape::Text(_) | ObjectShape::Element(_) => None,
        }
    }

    pub fn drill(&self) -> Option<Coord> {
        match self {
            ObjectShape::Via(v) => Some(v.drill),
            _ => None,
        }
    }

    /// Axis-aligned bounds including half the stroke width.
    ///
    /// Elements have no intrinsic extent; the board computes theirs from their pads.
    pub fn bounding_box(&self) -> Option<Rect> {
        match self {
            ObjectShape::Line(l) => {
                Some(Rect::from_corners(l.p1, l.p2).inflate(l.thickness / 2))
            }
            ObjectShape::Arc(a) => {
                Rect::from_points(&a.samples()).map(|r| r.inflate(a.thickness / 2))
            }
            ObjectShape::Via(v) => {
                Some(Rect::from_corners(v.center, v.center).inflate(v.diameter / 2))
            }
            ObjectShape::Pad(p) => {
                Some(Rect::from_corners(p.p1, p.p2).inflate(p.thickness / 2))
            }
            ObjectShape::Polygon(p) => Rect::from_points(&p.outline),
            ObjectShape::Text(t) => Some(t.bounds()),
            ObjectShape::Element(e) => Some(Rect::from_corners(e.origin, e.origin)),
        }
    }

    /// Tests whether `p` hits this shape, widened by `slop`.
    ///
    /// Elements report a hit only on their origin; pad hits are promoted to
    /// the owning element by the resolver.
    pub fn hit_test(&self, p: Point, slop: Coord) -> bool {
        let slop = slop as f64;
        match self {
            ObjectShape::Line(l) => {
                distance_to_segment(p, l.p1, l.p2) <= l.thickness as f64 / 2.0 + slop
            }
            ObjectShape::Arc(a) => {
                let samples = a.samples();
                samples.windows(2).any(|w| {
                    distance_to_segment(p, w[0], w[1]) <= a.thickness as f64 / 2.0 + slop
                })
            }
            ObjectShape::Via(v) => p.distance(v.center) <= v.diameter as f64 / 2.0 + slop,
            ObjectShape::Pad(pad) => {
                distance_to_segment(p, pad.p1, pad.p2) <= pad.thickness as f64 / 2.0 + slop
            }
            ObjectShape::Polygon(poly) => poly.covers(p),
            ObjectShape::Text(t) => t.bounds().inflate(slop as Coord).contains(p),
            ObjectShape::Element(e) => p.distance(e.origin) <= slop,
        }
    }

    /// Copy of the shape moved by `(dx, dy)`, or `None` if a coordinate overflows.
    pub fn translated(&self, dx: Coord, dy: Coord) -> Option<ObjectShape> {
        let mv = |p: Point| p.checked_offset(dx, dy);
        let mut shape = self.clone();
        match &mut shape {
            ObjectShape::Line(l) => {
                l.p1 = mv(l.p1)?;
                l.p2 = mv(l.p2)?;
            }
            ObjectShape::Arc(a) => a.center = mv(a.center)?,
            ObjectShape::Via(v) => v.center = mv(v.center)?,
            ObjectShape::Pad(p) => {
                p.p1 = mv(p.p1)?;
                p.p2 = mv(p.p2)?;
            }
            ObjectShape::Polygon(poly) => {
                for pt in poly.outline.iter_mut().chain(poly.holes.iter_mut().flatten()) {
                    *pt = mv(*pt)?;
                }
            }
            ObjectShape::Text(t) => t.anchor = mv(t.anchor)?,
            ObjectShape::Element(e) => e.origin = mv(e.origin)?,
        }
        Some(shape)
    }

    /// The points the creation collaborator checks against the board outline.
    pub fn anchor_points(&self) -> Vec<Point> {
        match self {
            ObjectShape::Line(l) => vec![l.p1, l.p2],
            ObjectShape::Arc(a) => vec![a.start_point(), a.end_point()],
            ObjectShape::Via(v) => vec![v.center],
            ObjectShape::Pad(p) => vec![p.p1, p.p2],
            ObjectShape::Polygon(p) => p.outline.clone(),
            ObjectShape::Text(t) => vec![t.anchor],
            ObjectShape::Element(e) => vec![e.origin],
        }
    }
}

/// A stored board object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardObject {
    pub id: ObjectId,
    /// Layer the object sits on. Vias and elements span layers and carry `None`.
    pub layer: Option<LayerId>,
    /// Owning element for pads.
    pub owner: Option<ObjectId>,
    pub flags: ObjectFlags,
    pub shape: ObjectShape,
}

impl BoardObject {
    pub fn kind(&self) -> ObjectKind {
        self.shape.kind()
    }

    pub fn is_selected(&self) -> bool {
        self.flags.contains(ObjectFlags::SELECTED)
    }

    pub fn is_locked(&self) -> bool {
        self.flags.contains(ObjectFlags::LOCKED)
    }

    pub fn has_flag(&self, flag: FlagId) -> bool {
        self.flags.contains(flag.bits())
    }
}

/// Orders two hit candidates: lower kind priority first, then most recent id.
pub(crate) fn hit_order(a: &BoardObject, b: &BoardObject) -> std::cmp::Ordering {
    a.kind()
        .priority()
        .cmp(&b.kind().priority())
        .then_with(|| b.id.cmp(&a.id))
}
