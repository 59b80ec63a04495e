use super::Serial;
use crate::board::{Board, BoardObject, Container, ObjectId, Rect};
use log::debug;

/// One low-level edit: the object before and after the change.
///
/// `before == None` records a creation, `after == None` a deletion.
#[derive(Debug, Clone, PartialEq)]
pub struct UndoEntry {
    pub serial: Serial,
    pub container: Container,
    pub before: Option<BoardObject>,
    pub after: Option<BoardObject>,
}

impl UndoEntry {
    fn object_id(&self) -> Option<ObjectId> {
        self.after
            .as_ref()
            .or(self.before.as_ref())
            .map(|o| o.id)
    }

    fn touched_bounds(&self, board: &Board) -> Option<Rect> {
        [self.before.as_ref(), self.after.as_ref()]
            .into_iter()
            .flatten()
            .filter_map(|o| board.bounds_of(o))
            .reduce(|a, b| a.union(&b))
    }
}

/// Summary of an applied undo or redo step.
#[derive(Debug, Clone, PartialEq)]
pub struct UndoStep {
    pub serial: Serial,
    /// Number of entries reverted or replayed
    pub entries: usize,
    /// Union of the areas touched on the board, if any
    pub area: Option<Rect>,
}

/// Global edit log with redo support.
#[derive(Debug, Default)]
pub struct UndoLog {
    entries: Vec<UndoEntry>,
    redo: Vec<Vec<UndoEntry>>,
    /// Maximum number of undo steps kept (0 = unlimited)
    limit: usize,
}

fn store<'a>(container: Container, board: &'a mut Board, buffer: &'a mut Board) -> &'a mut Board {
    match container {
        Container::Board => board,
        Container::Buffer => buffer,
    }
}

impl UndoLog {
    pub fn new(limit: usize) -> Self {
        Self {
            entries: Vec::new(),
            redo: Vec::new(),
            limit,
        }
    }

    /// Appends an entry. Any redo history is discarded.
    pub fn append(&mut self, entry: UndoEntry) {
        self.redo.clear();
        self.entries.push(entry);
        self.enforce_limit();
    }

    pub fn entries(&self) -> &[UndoEntry] {
        &self.entries
    }

    /// Number of undoable steps (distinct serials).
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut last = None;
        for entry in &self.entries {
            if last != Some(entry.serial) {
                depth += 1;
                last = Some(entry.serial);
            }
        }
        depth
    }

    pub fn can_undo(&self) -> bool {
        !self.entries.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    fn enforce_limit(&mut self) {
        if self.limit == 0 {
            return;
        }
        while self.depth() > self.limit {
            let Some(oldest) = self.entries.first().map(|e| e.serial) else {
                break;
            };
            let keep_from = self
                .entries
                .iter()
                .position(|e| e.serial != oldest)
                .unwrap_or(self.entries.len());
            self.entries.drain(..keep_from);
            debug!("Undo limit {} reached; dropped {}", self.limit, oldest);
        }
    }

    /// Reverts the most recent step. Returns `None` when nothing is left.
    pub fn undo(&mut self, board: &mut Board, buffer: &mut Board) -> Option<UndoStep> {
        let serial = self.entries.last()?.serial;
        let split = self
            .entries
            .iter()
            .rposition(|e| e.serial != serial)
            .map_or(0, |idx| idx + 1);
        let step: Vec<UndoEntry> = self.entries.drain(split..).collect();

        let mut area: Option<Rect> = None;
        for entry in step.iter().rev() {
            let target = store(entry.container, board, buffer);
            if entry.container == Container::Board {
                area = union(area, entry.touched_bounds(target));
            }
            match &entry.before {
                Some(before) => target.insert(before.clone()),
                None => {
                    if let Some(id) = entry.object_id() {
                        target.remove(id);
                    }
                }
            }
        }

        debug!("Undid {} ({} entries)", serial, step.len());
        let summary = UndoStep {
            serial,
            entries: step.len(),
            area,
        };
        self.redo.push(step);
        Some(summary)
    }

    /// Replays the most recently undone step.
    pub fn redo(&mut self, board: &mut Board, buffer: &mut Board) -> Option<UndoStep> {
        let step = self.redo.pop()?;
        let serial = step.first()?.serial;

        let mut area: Option<Rect> = None;
        for entry in &step {
            let target = store(entry.container, board, buffer);
            match &entry.after {
                Some(after) => target.insert(after.clone()),
                None => {
                    if let Some(id) = entry.object_id() {
                        target.remove(id);
                    }
                }
            }
            if entry.container == Container::Board {
                area = union(area, entry.touched_bounds(target));
            }
        }

        debug!("Redid {} ({} entries)", serial, step.len());
        let summary = UndoStep {
            serial,
            entries: step.len(),
            area,
        };
        self.entries.extend(step);
        Some(summary)
    }
}

fn union(acc: Option<Rect>, next: Option<Rect>) -> Option<Rect> {
    match (acc, next) {
        (Some(a), Some(b)) => Some(a.union(&b)),
        (a, b) => a.or(b),
    }
}
