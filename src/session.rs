//! Editor session: the explicit context every editing component receives.
//!
//! The session owns the board, the paste buffer, the undo log and all of the
//! "current settings" an editor carries around (active layer, default sizes,
//! grid, mark). Edits go through the methods here so that each one is stamped
//! into the undo log and reported to the dirty tracker.

use crate::board::{
    ArcData, Board, BoardObject, BoardObjectRef, Container, Coord, DirtyNotifier, DirtyTracker,
    GeometryRejected, LayerId, LineData, ObjectCreator, ObjectFlags, ObjectId, ObjectShape,
    PasteBuffer, Point, Rect, TextData, ValidatingCreator, ViaData,
};
use crate::undo::{
    Serial, Transaction, TransactionManager, Transactional, UndoEntry, UndoError, UndoLog,
    UndoStep,
};
use crate::units::{StandardUnits, UnitConverter};
use log::{debug, info, warn};
use std::collections::HashMap;
use std::fmt;

/// Default sizes applied to newly created geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    /// Thickness of new lines and arcs
    pub line_thickness: Coord,
    /// Clearance of new lines, arcs and vias
    pub clearance: Coord,
    /// Copper diameter of new vias
    pub via_diameter: Coord,
    /// Drill diameter of new vias
    pub via_drill: Coord,
    /// Glyph height of new text
    pub text_height: Coord,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            line_thickness: 254_000,
            clearance: 254_000,
            via_diameter: 1_016_000,
            via_drill: 508_000,
            text_height: 1_016_000,
        }
    }
}

/// Dimensional attribute a value change can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SizeAttribute {
    /// Thickness, diameter or text height
    Size,
    Clearance,
    Drill,
}

impl fmt::Display for SizeAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SizeAttribute::Size => "size",
            SizeAttribute::Clearance => "clearance",
            SizeAttribute::Drill => "drill",
        })
    }
}

/// Inclusive range a dimensional attribute is clamped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    pub min: Coord,
    pub max: Coord,
}

impl Range {
    pub fn clamp(&self, value: Coord) -> Coord {
        value.clamp(self.min, self.max)
    }
}

/// Valid ranges for every dimensional attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct SizeLimits {
    pub size: Range,
    pub clearance: Range,
    pub drill: Range,
}

impl Default for SizeLimits {
    fn default() -> Self {
        Self {
            size: Range {
                min: 25_400,
                max: 25_400_000,
            },
            clearance: Range {
                min: 0,
                max: 25_400_000,
            },
            drill: Range {
                min: 25_400,
                max: 12_700_000,
            },
        }
    }
}

impl SizeLimits {
    pub fn range(&self, attribute: SizeAttribute) -> Range {
        match attribute {
            SizeAttribute::Size => self.size,
            SizeAttribute::Clearance => self.clearance,
            SizeAttribute::Drill => self.drill,
        }
    }
}

/// Errors from session-level edits that are not geometry problems.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("no layer named '{0}'")]
    UnknownLayer(String),

    #[error(transparent)]
    Undo(#[from] UndoError),
}

/// Editing context shared by the dispatcher and the mode machine.
pub struct EditorSession {
    /// The board being edited
    pub board: Board,
    /// Paste buffer contents
    pub buffer: PasteBuffer,
    /// Global undo log
    undo: UndoLog,
    /// Serial allocation and the open transaction
    transactions: TransactionManager,
    /// Marked point (crosshair mark), if set
    pub mark: Option<Point>,
    /// Last known cursor position in board coordinates
    pub cursor: Point,
    /// Layer new geometry is placed on
    pub layer: LayerId,
    /// Default sizes for new geometry
    pub style: Style,
    /// Clamp ranges for dimensional edits
    pub limits: SizeLimits,
    /// Hit-test tolerance in board units
    pub hit_slop: Coord,
    /// Geometry validation collaborator
    creator: Box<dyn ObjectCreator>,
    /// Unit conversion collaborator
    units: Box<dyn UnitConverter>,
    /// Repaint notifications
    pub(crate) dirty: DirtyTracker,
}

impl fmt::Debug for EditorSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditorSession")
            .field("objects", &self.board.len())
            .field("buffer", &self.buffer.contents().len())
            .field("undo_depth", &self.undo.depth())
            .field("mark", &self.mark)
            .field("cursor", &self.cursor)
            .field("layer", &self.layer)
            .finish_non_exhaustive()
    }
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(Board::default())
    }
}

impl Transactional for EditorSession {
    fn transaction_manager(&mut self) -> &mut TransactionManager {
        &mut self.transactions
    }
}

impl EditorSession {
    /// Creates a session over `board` with default collaborators and settings.
    pub fn new(board: Board) -> Self {
        let layer = board.layers().first().map_or(LayerId(0), |l| l.id);
        Self {
            board,
            buffer: PasteBuffer::new(),
            undo: UndoLog::new(0),
            transactions: TransactionManager::new(),
            mark: None,
            cursor: Point::new(0, 0),
            layer,
            style: Style::default(),
            limits: SizeLimits::default(),
            hit_slop: 0,
            creator: Box::new(ValidatingCreator::default()),
            units: Box::new(StandardUnits),
            dirty: DirtyTracker::new(),
        }
    }

    /// Replaces the geometry creation collaborator.
    pub fn with_creator(mut self, creator: Box<dyn ObjectCreator>) -> Self {
        self.creator = creator;
        self
    }

    /// Replaces the unit conversion collaborator.
    pub fn with_units(mut self, units: Box<dyn UnitConverter>) -> Self {
        self.units = units;
        self
    }

    /// Caps the number of undo steps kept (0 = unlimited).
    pub fn with_undo_limit(mut self, limit: usize) -> Self {
        self.undo = UndoLog::new(limit);
        self
    }

    pub fn units(&self) -> &dyn UnitConverter {
        self.units.as_ref()
    }

    pub fn undo_log(&self) -> &UndoLog {
        &self.undo
    }

    pub fn dirty(&self) -> &DirtyTracker {
        &self.dirty
    }

    pub fn dirty_mut(&mut self) -> &mut DirtyTracker {
        &mut self.dirty
    }

    /// Opens an undo transaction on this session.
    ///
    /// Edits made through the returned guard share one undo step. The
    /// transaction closes when the guard is dropped.
    ///
    /// # Errors
    /// [`UndoError::TransactionMisuse`] if a transaction is already open.
    pub fn begin_transaction(&mut self) -> Result<Transaction<'_, Self>, UndoError> {
        Transaction::begin(self)
    }

    /// Serial of the open transaction, if any.
    pub fn open_transaction(&self) -> Option<Serial> {
        self.transactions.current()
    }

    fn store(&mut self, container: Container) -> &mut Board {
        match container {
            Container::Board => &mut self.board,
            Container::Buffer => self.buffer.contents_mut(),
        }
    }

    pub fn object(&self, container: Container, id: ObjectId) -> Option<&BoardObject> {
        match container {
            Container::Board => self.board.get(id),
            Container::Buffer => self.buffer.contents().get(id),
        }
    }

    fn record(
        &mut self,
        container: Container,
        before: Option<BoardObject>,
        after: Option<BoardObject>,
    ) {
        if container == Container::Board {
            let area = [before.as_ref(), after.as_ref()]
                .into_iter()
                .flatten()
                .filter_map(|o| self.board.bounds_of(o))
                .reduce(|a, b| a.union(&b));
            self.dirty.mark_optional_rect(area);
        }
        let serial = self.transactions.marker_for_edit();
        self.undo.append(UndoEntry {
            serial,
            container,
            before,
            after,
        });
    }

    /// Inserts a new object with a freshly allocated id.
    pub fn insert_new(
        &mut self,
        container: Container,
        layer: Option<LayerId>,
        owner: Option<ObjectId>,
        shape: ObjectShape,
    ) -> BoardObjectRef {
        let store = self.store(container);
        let object = BoardObject {
            id: store.allocate_id(),
            layer,
            owner,
            flags: ObjectFlags::empty(),
            shape,
        };
        store.insert(object.clone());
        let reference = BoardObjectRef::of(container, &object);
        debug!("Created {}", reference);
        self.record(container, None, Some(object));
        reference
    }

    /// Stores an updated copy of an existing object.
    ///
    /// Returns `false` (and records nothing) when the object is missing or
    /// unchanged.
    pub fn replace_object(&mut self, container: Container, updated: BoardObject) -> bool {
        let store = self.store(container);
        let Some(before) = store.get(updated.id).cloned() else {
            warn!("Cannot update missing object {}", updated.id);
            return false;
        };
        if before == updated {
            return false;
        }
        store.insert(updated.clone());
        self.record(container, Some(before), Some(updated));
        true
    }

    /// Removes an object. Elements take their pads with them; a removed pad
    /// is detached from its element. Returns the number of objects removed.
    pub fn remove_object(&mut self, container: Container, id: ObjectId) -> usize {
        let Some(object) = self.object(container, id).cloned() else {
            return 0;
        };
        let mut removed = 0;

        if let ObjectShape::Element(element) = &object.shape {
            for pad in &element.pads {
                if let Some(pad_object) = self.store(container).remove(*pad) {
                    self.record(container, Some(pad_object), None);
                    removed += 1;
                }
            }
        }

        if let Some(owner_id) = object.owner
            && let Some(owner) = self.object(container, owner_id).cloned()
            && let ObjectShape::Element(element) = &owner.shape
        {
            let mut updated = owner.clone();
            if let ObjectShape::Element(data) = &mut updated.shape {
                data.pads = element.pads.iter().copied().filter(|p| *p != id).collect();
            }
            self.replace_object(container, updated);
        }

        if let Some(gone) = self.store(container).remove(id) {
            self.record(container, Some(gone), None);
            removed += 1;
        }
        removed
    }

    pub fn create_line(&mut self, p1: Point, p2: Point) -> Result<BoardObjectRef, GeometryRejected> {
        let shape = self.creator.create_line(
            &self.board,
            LineData {
                p1,
                p2,
                thickness: self.style.line_thickness,
                clearance: self.style.clearance,
            },
        )?;
        Ok(self.insert_new(Container::Board, Some(self.layer), None, shape))
    }

    /// Creates the quarter arc from `start` to `end`, centred at `(start.x, end.y)`.
    pub fn create_arc(&mut self, start: Point, end: Point) -> Result<BoardObjectRef, GeometryRejected> {
        let shape = self.creator.create_arc(&self.board, quarter_arc(start, end, &self.style))?;
        Ok(self.insert_new(Container::Board, Some(self.layer), None, shape))
    }

    pub fn create_via(&mut self, center: Point) -> Result<BoardObjectRef, GeometryRejected> {
        let shape = self.creator.create_via(
            &self.board,
            ViaData {
                center,
                diameter: self.style.via_diameter,
                drill: self.style.via_drill,
                clearance: self.style.clearance,
            },
        )?;
        Ok(self.insert_new(Container::Board, None, None, shape))
    }

    pub fn create_polygon(&mut self, vertices: &[Point]) -> Result<BoardObjectRef, GeometryRejected> {
        let shape = self.creator.create_polygon(&self.board, vertices)?;
        Ok(self.insert_new(Container::Board, Some(self.layer), None, shape))
    }

    /// Creates the axis-aligned rectangle spanned by two corners as a polygon.
    pub fn create_rectangle(&mut self, a: Point, b: Point) -> Result<BoardObjectRef, GeometryRejected> {
        let rect = Rect::from_corners(a, b);
        let corners = [
            Point::new(rect.min_x, rect.min_y),
            Point::new(rect.max_x, rect.min_y),
            Point::new(rect.max_x, rect.max_y),
            Point::new(rect.min_x, rect.max_y),
        ];
        self.create_polygon(&corners)
    }

    pub fn create_text(&mut self, anchor: Point, text: &str) -> Result<BoardObjectRef, GeometryRejected> {
        let shape = self.creator.create_text(
            &self.board,
            TextData {
                anchor,
                text: text.to_string(),
                height: self.style.text_height,
            },
        )?;
        Ok(self.insert_new(Container::Board, Some(self.layer), None, shape))
    }

    /// Cuts a hole with the given outline into polygon `target`.
    pub fn cut_hole(&mut self, target: ObjectId, hole: &[Point]) -> Result<BoardObjectRef, GeometryRejected> {
        let Some(object) = self.board.get(target).cloned() else {
            return Err(GeometryRejected::Missing(target));
        };
        let ObjectShape::Polygon(polygon) = &object.shape else {
            return Err(GeometryRejected::NoSuchAttribute {
                kind: object.kind(),
                attribute: "hole",
            });
        };
        let cut = self.creator.cut_hole(target, polygon, hole)?;
        let mut updated = object.clone();
        updated.shape = ObjectShape::Polygon(cut);
        self.replace_object(Container::Board, updated.clone());
        Ok(BoardObjectRef::of(Container::Board, &updated))
    }

    /// Copies the selected board objects into the paste buffer.
    pub fn buffer_add_selected(&mut self) -> usize {
        let selected = self.board.selected(crate::board::KindMask::ALL);
        let before: Vec<ObjectId> = self.buffer.contents().objects().map(|o| o.id).collect();
        let copied = self.buffer.add_from(&self.board, &selected);
        let added: Vec<BoardObject> = self
            .buffer
            .contents()
            .objects()
            .filter(|o| !before.contains(&o.id))
            .cloned()
            .collect();
        for object in added {
            self.record(Container::Buffer, None, Some(object));
        }
        copied
    }

    /// Empties the paste buffer.
    pub fn buffer_clear(&mut self) -> usize {
        let contents: Vec<BoardObject> = self.buffer.contents().objects().cloned().collect();
        self.buffer.clear();
        let count = contents.len();
        for object in contents {
            self.record(Container::Buffer, Some(object), None);
        }
        count
    }

    /// Buffer copies placed with their top-left corner at `at`, checked by the
    /// creation collaborator. Nothing is inserted; a rejected placement
    /// leaves the board untouched.
    pub fn placed_buffer(&self, at: Point) -> Result<Vec<BoardObject>, GeometryRejected> {
        let placed = self.buffer.placed_at(at)?;
        for object in &placed {
            self.creator.check_placement(&self.board, &object.shape)?;
        }
        Ok(placed)
    }

    /// Inserts copies from [`placed_buffer`](Self::placed_buffer) under new
    /// board ids, rewiring element/pad links.
    pub fn insert_placed(&mut self, placed: Vec<BoardObject>) -> Vec<BoardObjectRef> {
        let mut remap: HashMap<ObjectId, ObjectId> = HashMap::new();
        for object in &placed {
            remap.insert(object.id, self.board.allocate_id());
        }

        let mut created = Vec::with_capacity(placed.len());
        for mut object in placed {
            object.id = remap[&object.id];
            object.owner = object.owner.and_then(|o| remap.get(&o).copied());
            if let ObjectShape::Element(element) = &mut object.shape {
                element.pads = element
                    .pads
                    .iter()
                    .filter_map(|p| remap.get(p).copied())
                    .collect();
            }
            self.board.insert(object.clone());
            created.push(BoardObjectRef::of(Container::Board, &object));
            self.record(Container::Board, None, Some(object));
        }
        created
    }

    /// Sets or clears the crosshair mark. Returns the new mark.
    pub fn toggle_mark(&mut self, at: Point) -> Option<Point> {
        self.mark = match self.mark {
            Some(_) => None,
            None => Some(at),
        };
        self.dirty.mark_dirty();
        self.mark
    }

    /// Makes the layer named `name` the target for new geometry.
    pub fn set_layer(&mut self, name: &str) -> Result<LayerId, SessionError> {
        let layer = self
            .board
            .layer_by_name(name)
            .map(|l| l.id)
            .ok_or_else(|| SessionError::UnknownLayer(name.to_string()))?;
        if layer != self.layer {
            info!("Active layer set to '{}'", name);
            self.layer = layer;
        }
        Ok(layer)
    }

    /// Reverts the most recent undo step.
    ///
    /// # Errors
    /// [`UndoError::TransactionOpen`] while a transaction is open.
    pub fn undo(&mut self) -> Result<Option<UndoStep>, UndoError> {
        if let Some(open) = self.transactions.current() {
            return Err(UndoError::TransactionOpen(open));
        }
        let step = self.undo.undo(&mut self.board, self.buffer.contents_mut());
        if let Some(step) = &step {
            self.dirty.mark_optional_rect(step.area);
        }
        Ok(step)
    }

    /// Replays the most recently undone step.
    pub fn redo(&mut self) -> Result<Option<UndoStep>, UndoError> {
        if let Some(open) = self.transactions.current() {
            return Err(UndoError::TransactionOpen(open));
        }
        let step = self.undo.redo(&mut self.board, self.buffer.contents_mut());
        if let Some(step) = &step {
            self.dirty.mark_optional_rect(step.area);
        }
        Ok(step)
    }
}

/// Quarter arc between two points, centred at `(start.x, end.y)`.
fn quarter_arc(start: Point, end: Point, style: &Style) -> ArcData {
    let start_angle: f64 = if start.y >= end.y { 90.0 } else { 270.0 };
    let end_angle: f64 = if end.x >= start.x { 0.0 } else { 180.0 };
    let mut delta = end_angle - start_angle;
    if delta <= -180.0 {
        delta += 360.0;
    } else if delta > 180.0 {
        delta -= 360.0;
    }
    ArcData {
        center: Point::new(start.x, end.y),
        width: (end.x - start.x).abs(),
        height: (start.y - end.y).abs(),
        start_angle,
        delta_angle: delta,
        thickness: style.line_thickness,
        clearance: style.clearance,
    }
}
