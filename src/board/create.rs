//! Geometry creation collaborator.
//!
//! The editing core never decides whether geometry is valid. It hands requests
//! to an [`ObjectCreator`], which either returns the shape to insert or
//! rejects it with a [`GeometryRejected`] reason.

use super::board::Board;
use super::geometry::{Coord, Point, point_in_polygon, signed_area2};
use super::object::{ArcData, LineData, ObjectId, ObjectKind, ObjectShape, PolygonData, TextData, ViaData};
use thiserror::Error;

/// Reasons a creation or mutation request is refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometryRejected {
    #[error("zero-length {0}")]
    ZeroLength(ObjectKind),

    #[error("{0} lies outside the board outline")]
    OutOfBounds(ObjectKind),

    #[error("polygon needs at least {need} vertices, got {have}")]
    TooFewVertices { have: usize, need: usize },

    #[error("polygon outline encloses no area")]
    ZeroArea,

    #[error("size {0} must be positive")]
    NonPositiveSize(Coord),

    #[error("drill {drill} leaves no copper ring on a {diameter} via")]
    NoAnnularRing { drill: Coord, diameter: Coord },

    #[error("hole is not inside polygon {0}")]
    HoleOutsidePolygon(ObjectId),

    #[error("text is empty")]
    EmptyText,

    #[error("{kind} has no {attribute} attribute")]
    NoSuchAttribute {
        kind: ObjectKind,
        attribute: &'static str,
    },

    #[error("object {0} does not exist")]
    Missing(ObjectId),
}

/// Validates creation requests against the current board.
pub trait ObjectCreator {
    fn create_line(&self, board: &Board, line: LineData) -> Result<ObjectShape, GeometryRejected>;

    fn create_arc(&self, board: &Board, arc: ArcData) -> Result<ObjectShape, GeometryRejected>;

    fn create_via(&self, board: &Board, via: ViaData) -> Result<ObjectShape, GeometryRejected>;

    fn create_polygon(
        &self,
        board: &Board,
        vertices: &[Point],
    ) -> Result<ObjectShape, GeometryRejected>;

    fn create_text(&self, board: &Board, text: TextData) -> Result<ObjectShape, GeometryRejected>;

    /// Checks an already-built shape being placed on the board, e.g. a paste.
    fn check_placement(&self, board: &Board, shape: &ObjectShape) -> Result<(), GeometryRejected>;

    /// Returns `polygon` with `hole` cut into it.
    fn cut_hole(
        &self,
        polygon_id: ObjectId,
        polygon: &PolygonData,
        hole: &[Point],
    ) -> Result<PolygonData, GeometryRejected>;
}

/// Default creator: rejects degenerate geometry and geometry off the board outline.
#[derive(Debug, Clone)]
pub struct ValidatingCreator {
    /// Minimum vertex count for polygons and holes
    pub min_polygon_vertices: usize,
    /// Whether geometry must lie inside the board outline
    pub enforce_bounds: bool,
}

impl Default for ValidatingCreator {
    fn default() -> Self {
        Self {
            min_polygon_vertices: 3,
            enforce_bounds: true,
        }
    }
}

impl ValidatingCreator {
    fn check_points(
        &self,
        board: &Board,
        kind: ObjectKind,
        points: &[Point],
    ) -> Result<(), GeometryRejected> {
        if !self.enforce_bounds {
            return Ok(());
        }
        let outline = board.outline();
        if points.iter().all(|p| outline.contains(*p)) {
            Ok(())
        } else {
            Err(GeometryRejected::OutOfBounds(kind))
        }
    }

    fn check_outline(&self, vertices: &[Point]) -> Result<(), GeometryRejected> {
        if vertices.len() < self.min_polygon_vertices {
            return Err(GeometryRejected::TooFewVertices {
                have: vertices.len(),
                need: self.min_polygon_vertices,
            });
        }
        if signed_area2(vertices) == 0 {
            return Err(GeometryRejected::ZeroArea);
        }
        Ok(())
    }
}

fn positive(size: Coord) -> Result<(), GeometryRejected> {
    if size > 0 {
        Ok(())
    } else {
        Err(GeometryRejected::NonPositiveSize(size))
    }
}

impl ObjectCreator for ValidatingCreator {
    fn create_line(&self, board: &Board, line: LineData) -> Result<ObjectShape, GeometryRejected> {
        if line.p1 == line.p2 {
            return Err(GeometryRejected::ZeroLength(ObjectKind::Line));
        }
        positive(line.thickness)?;
        self.check_points(board, ObjectKind::Line, &[line.p1, line.p2])?;
        Ok(ObjectShape::Line(line))
    }

    fn create_arc(&self, board: &Board, arc: ArcData) -> Result<ObjectShape, GeometryRejected> {
        if arc.width <= 0 || arc.height <= 0 || arc.delta_angle == 0.0 {
            return Err(GeometryRejected::ZeroLength(ObjectKind::Arc));
        }
        positive(arc.thickness)?;
        self.check_points(board, ObjectKind::Arc, &[arc.start_point(), arc.end_point()])?;
        Ok(ObjectShape::Arc(arc))
    }

    fn create_via(&self, board: &Board, via: ViaData) -> Result<ObjectShape, GeometryRejected> {
        positive(via.diameter)?;
        positive(via.drill)?;
        if via.drill >= via.diameter {
            return Err(GeometryRejected::NoAnnularRing {
                drill: via.drill,
                diameter: via.diameter,
            });
        }
        self.check_points(board, ObjectKind::Via, &[via.center])?;
        Ok(ObjectShape::Via(via))
    }

    fn create_polygon(
        &self,
        board: &Board,
        vertices: &[Point],
    ) -> Result<ObjectShape, GeometryRejected> {
        self.check_outline(vertices)?;
        self.check_points(board, ObjectKind::Polygon, vertices)?;
        Ok(ObjectShape::Polygon(PolygonData {
            outline: vertices.to_vec(),
            holes: Vec::new(),
        }))
    }

    fn create_text(&self, board: &Board, text: TextData) -> Result<ObjectShape, GeometryRejected> {
        if text.text.trim().is_empty() {
            return Err(GeometryRejected::EmptyText);
        }
        positive(text.height)?;
        self.check_points(board, ObjectKind::Text, &[text.anchor])?;
        Ok(ObjectShape::Text(text))
    }

    fn check_placement(&self, board: &Board, shape: &ObjectShape) -> Result<(), GeometryRejected> {
        self.check_points(board, shape.kind(), &shape.anchor_points())
    }

    fn cut_hole(
        &self,
        polygon_id: ObjectId,
        polygon: &PolygonData,
        hole: &[Point],
    ) -> Result<PolygonData, GeometryRejected> {
        self.check_outline(hole)?;
        if !hole.iter().all(|p| point_in_polygon(*p, &polygon.outline)) {
            return Err(GeometryRejected::HoleOutsidePolygon(polygon_id));
        }
        let mut updated = polygon.clone();
        updated.holes.push(hole.to_vec());
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(size: Coord) -> Vec<Point> {
        vec![
            Point::new(0, 0),
            Point::new(size, 0),
            Point::new(size, size),
            Point::new(0, size),
        ]
    }

    #[test]
    fn zero_length_line_is_rejected() {
        let creator = ValidatingCreator::default();
        let board = Board::default();
        let err = creator
            .create_line(
                &board,
                LineData {
                    p1: Point::new(5, 5),
                    p2: Point::new(5, 5),
                    thickness: 10,
                    clearance: 0,
                },
            )
            .unwrap_err();
        assert_eq!(err, GeometryRejected::ZeroLength(ObjectKind::Line));
    }

    #[test]
    fn off_board_geometry_is_rejected_unless_disabled() {
        let mut creator = ValidatingCreator::default();
        let board = Board::new(1000, 1000, &["top"]);
        let via = ViaData {
            center: Point::new(2000, 10),
            diameter: 100,
            drill: 50,
            clearance: 0,
        };
        assert_eq!(
            creator.create_via(&board, via.clone()).unwrap_err(),
            GeometryRejected::OutOfBounds(ObjectKind::Via)
        );
        creator.enforce_bounds = false;
        assert!(creator.create_via(&board, via).is_ok());
    }

    #[test]
    fn placement_checks_every_anchor_point() {
        let creator = ValidatingCreator::default();
        let board = Board::new(1000, 1000, &["top"]);
        let line = |x2| {
            ObjectShape::Line(LineData {
                p1: Point::new(10, 10),
                p2: Point::new(x2, 10),
                thickness: 10,
                clearance: 0,
            })
        };
        assert!(creator.check_placement(&board, &line(900)).is_ok());
        assert_eq!(
            creator.check_placement(&board, &line(1500)).unwrap_err(),
            GeometryRejected::OutOfBounds(ObjectKind::Line)
        );
    }

    #[test]
    fn via_needs_a_copper_ring() {
        let creator = ValidatingCreator::default();
        let err = creator
            .create_via(
                &Board::default(),
                ViaData {
                    center: Point::new(10, 10),
                    diameter: 50,
                    drill: 50,
                    clearance: 0,
                },
            )
            .unwrap_err();
        assert!(matches!(err, GeometryRejected::NoAnnularRing { .. }));
    }

    #[test]
    fn polygon_rules() {
        let creator = ValidatingCreator::default();
        let board = Board::default();
        assert!(matches!(
            creator.create_polygon(&board, &square(100)[..2]),
            Err(GeometryRejected::TooFewVertices { have: 2, need: 3 })
        ));
        assert_eq!(
            creator
                .create_polygon(
                    &board,
                    &[Point::new(0, 0), Point::new(10, 10), Point::new(20, 20)]
                )
                .unwrap_err(),
            GeometryRejected::ZeroArea
        );
        assert!(creator.create_polygon(&board, &square(100)).is_ok());
    }

    #[test]
    fn holes_must_sit_inside_the_outline() {
        let creator = ValidatingCreator::default();
        let polygon = PolygonData {
            outline: square(100),
            holes: Vec::new(),
        };
        let inner = vec![Point::new(10, 10), Point::new(50, 10), Point::new(10, 50)];
        let cut = creator.cut_hole(ObjectId(1), &polygon, &inner).unwrap();
        assert_eq!(cut.holes, vec![inner]);

        let outside = vec![Point::new(10, 10), Point::new(500, 10), Point::new(10, 50)];
        assert_eq!(
            creator.cut_hole(ObjectId(1), &polygon, &outside).unwrap_err(),
            GeometryRejected::HoleOutsidePolygon(ObjectId(1))
        );
    }
}
