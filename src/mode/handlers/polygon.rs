//! Multi-point modes: Polygon and PolygonHole.
//!
//! Clicks append vertices; an explicit close (or a click on the first
//! vertex) commits them. Closing with too few vertices is an error that
//! leaves the vertices in place.

use super::{ModeHandler, ModeResult, commit};
use crate::action::resolver::resolve_at_cursor;
use crate::board::{KindMask, ObjectId, Point};
use crate::mode::{Construction, EditorMode, ModeError, ModeOutcome, Modifiers};
use crate::session::EditorSession;
use log::{debug, info};

/// Ordered vertex accumulator shared by both polygon modes.
#[derive(Debug, Clone)]
struct VertexList {
    points: Vec<Point>,
    min_vertices: usize,
}

enum Added {
    Appended,
    Duplicate,
    ClosesLoop,
}

impl VertexList {
    fn new(min_vertices: usize) -> Self {
        Self {
            points: Vec::new(),
            min_vertices,
        }
    }

    fn add(&mut self, at: Point) -> Added {
        if self.points.len() >= self.min_vertices && self.points.first() == Some(&at) {
            return Added::ClosesLoop;
        }
        if self.points.last() == Some(&at) {
            return Added::Duplicate;
        }
        self.points.push(at);
        Added::Appended
    }

    /// Takes the vertices for a commit, or reports that there are too few.
    fn take_for_close(&mut self) -> Result<Vec<Point>, ModeError> {
        if self.points.len() < self.min_vertices {
            return Err(ModeError::TooFewVertices {
                have: self.points.len(),
                need: self.min_vertices,
            });
        }
        Ok(std::mem::take(&mut self.points))
    }
}

/// Polygon mode: accumulates an outline and commits it on close.
#[derive(Debug)]
pub struct PolygonHandler {
    vertices: VertexList,
}

impl PolygonHandler {
    pub fn new(min_vertices: usize) -> Self {
        Self {
            vertices: VertexList::new(min_vertices),
        }
    }
}

impl ModeHandler for PolygonHandler {
    fn mode(&self) -> EditorMode {
        EditorMode::Polygon
    }

    fn click(&mut self, session: &mut EditorSession, at: Point, _modifiers: Modifiers) -> ModeResult {
        match self.vertices.add(at) {
            Added::Appended => Ok(ModeOutcome::Updated),
            Added::Duplicate => Ok(ModeOutcome::Ignored),
            Added::ClosesLoop => self.close(session),
        }
    }

    fn close(&mut self, session: &mut EditorSession) -> ModeResult {
        let outline = self.vertices.take_for_close()?;
        debug!("Closing polygon with {} vertices", outline.len());
        commit(session, |s| s.create_polygon(&outline).map(|r| vec![r]))
    }

    fn previous_point(&mut self) -> bool {
        self.vertices.points.pop().is_some()
    }

    fn cancel(&mut self) -> bool {
        let had = !self.vertices.points.is_empty();
        self.vertices.points.clear();
        had
    }

    fn construction(&self) -> Construction {
        if self.vertices.points.is_empty() {
            Construction::Idle
        } else {
            Construction::Vertices(self.vertices.points.clone())
        }
    }
}

/// PolygonHole mode: the first click picks the polygon, further clicks
/// outline the hole, close cuts it.
#[derive(Debug)]
pub struct HoleHandler {
    target: Option<ObjectId>,
    vertices: VertexList,
}

impl HoleHandler {
    pub fn new(min_vertices: usize) -> Self {
        Self {
            target: None,
            vertices: VertexList::new(min_vertices),
        }
    }
}

impl ModeHandler for HoleHandler {
    fn mode(&self) -> EditorMode {
        EditorMode::PolygonHole
    }

    fn click(&mut self, session: &mut EditorSession, at: Point, _modifiers: Modifiers) -> ModeResult {
        if self.target.is_none() {
            let Some(polygon) = resolve_at_cursor(session, at, KindMask::POLYGON) else {
                return Ok(ModeOutcome::NoObjectFound);
            };
            if session
                .object(polygon.container, polygon.id)
                .is_some_and(|o| o.is_locked())
            {
                info!("{} is locked; no hole cut", polygon);
                return Ok(ModeOutcome::Ignored);
            }
            debug!("Hole target {}", polygon);
            self.target = Some(polygon.id);
            return Ok(ModeOutcome::Updated);
        }

        match self.vertices.add(at) {
            Added::Appended => Ok(ModeOutcome::Updated),
            Added::Duplicate => Ok(ModeOutcome::Ignored),
            Added::ClosesLoop => self.close(session),
        }
    }

    fn close(&mut self, session: &mut EditorSession) -> ModeResult {
        let Some(target) = self.target else {
            return Err(ModeError::TooFewVertices {
                have: 0,
                need: self.vertices.min_vertices,
            });
        };
        let hole = self.vertices.take_for_close()?;
        self.target = None;
        commit(session, |s| s.cut_hole(target, &hole).map(|r| vec![r]))
    }

    fn previous_point(&mut self) -> bool {
        self.vertices.points.pop().is_some()
    }

    fn cancel(&mut self) -> bool {
        let had = self.target.is_some() || !self.vertices.points.is_empty();
        self.target = None;
        self.vertices.points.clear();
        had
    }

    fn construction(&self) -> Construction {
        match self.target {
            Some(target) => Construction::Hole {
                target,
                vertices: self.vertices.points.clone(),
            },
            None => Construction::Idle,
        }
    }
}
