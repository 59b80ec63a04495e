//! Paste buffer holding copies of board objects.

use super::board::Board;
use super::create::GeometryRejected;
use super::geometry::{Point, Rect};
use super::object::{BoardObject, ObjectFlags, ObjectId, ObjectShape};
use std::collections::HashMap;

/// Objects copied out of the board, kept in their own store.
#[derive(Debug, Clone)]
pub struct PasteBuffer {
    contents: Board,
}

impl Default for PasteBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl PasteBuffer {
    pub fn new() -> Self {
        Self {
            contents: Board::new(0, 0, &[]),
        }
    }

    pub fn contents(&self) -> &Board {
        &self.contents
    }

    pub(crate) fn contents_mut(&mut self) -> &mut Board {
        &mut self.contents
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    pub fn clear(&mut self) {
        self.contents = Board::new(0, 0, &[]);
    }

    /// Copies `ids` out of `board`. Elements bring their pads along.
    ///
    /// Copies get fresh buffer ids; ownership links are rewritten to match and
    /// the selection flag is dropped. Returns the number of objects copied.
    pub fn add_from(&mut self, board: &Board, ids: &[ObjectId]) -> usize {
        let mut wanted: Vec<ObjectId> = Vec::new();
        for id in ids {
            let Some(object) = board.get(*id) else {
                continue;
            };
            if !wanted.contains(id) {
                wanted.push(*id);
            }
            if let ObjectShape::Element(element) = &object.shape {
                for pad in &element.pads {
                    if !wanted.contains(pad) {
                        wanted.push(*pad);
                    }
                }
            }
        }
        wanted.sort();

        let mut remap: HashMap<ObjectId, ObjectId> = HashMap::new();
        for id in &wanted {
            remap.insert(*id, self.contents.allocate_id());
        }

        for id in &wanted {
            let Some(object) = board.get(*id) else {
                continue;
            };
            let mut copy = object.clone();
            copy.id = remap[id];
            copy.flags.remove(ObjectFlags::SELECTED);
            copy.owner = object.owner.and_then(|o| remap.get(&o).copied());
            if let ObjectShape::Element(element) = &mut copy.shape {
                element.pads = element
                    .pads
                    .iter()
                    .filter_map(|p| remap.get(p).copied())
                    .collect();
            }
            self.contents.insert(copy);
        }
        wanted.len()
    }

    /// Bounds of everything in the buffer.
    pub fn bounds(&self) -> Option<Rect> {
        self.contents
            .objects()
            .filter_map(|o| self.contents.bounds_of(o))
            .reduce(|a, b| a.union(&b))
    }

    /// Copies of the buffer contents translated so the buffer's top-left corner
    /// lands on `at`. Ids are left as buffer ids for the caller to reassign.
    ///
    /// Fails with [`GeometryRejected::OutOfBounds`] when a translated
    /// coordinate would not fit a [`Coord`](super::geometry::Coord).
    pub fn placed_at(&self, at: Point) -> Result<Vec<BoardObject>, GeometryRejected> {
        let Some(bounds) = self.bounds() else {
            return Ok(Vec::new());
        };
        let delta = at
            .x
            .checked_sub(bounds.min_x)
            .zip(at.y.checked_sub(bounds.min_y));
        self.contents
            .objects()
            .map(|o| {
                let shape = delta
                    .and_then(|(dx, dy)| o.shape.translated(dx, dy))
                    .ok_or(GeometryRejected::OutOfBounds(o.kind()))?;
                Ok(BoardObject {
                    shape,
                    ..o.clone()
                })
            })
            .collect()
    }
}
