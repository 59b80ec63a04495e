//! Board object graph storage.

use super::geometry::{Coord, Point, Rect};
use super::object::{
    BoardObject, KindMask, LayerId, ObjectFlags, ObjectId, ObjectKind, ObjectShape, hit_order,
};
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// A named copper or silk layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub id: LayerId,
    pub name: String,
    pub visible: bool,
}

/// Container for every object on a board (or in the paste buffer).
///
/// Objects are kept sorted by [`ObjectId`]; since ids are allocated
/// monotonically this is also creation order, which gives every iteration a
/// stable order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    /// Board outline width (canonical units)
    pub width: Coord,
    /// Board outline height (canonical units)
    pub height: Coord,
    layers: Vec<Layer>,
    objects: Vec<BoardObject>,
    next_id: u64,
}

impl Default for Board {
    fn default() -> Self {
        Self::new(100_000_000, 100_000_000, &["top", "bottom", "silk"])
    }
}

impl Board {
    /// Creates an empty board with the given outline and layer names.
    pub fn new(width: Coord, height: Coord, layer_names: &[&str]) -> Self {
        let layers = layer_names
            .iter()
            .enumerate()
            .map(|(idx, name)| Layer {
                id: LayerId(idx as u16),
                name: (*name).to_string(),
                visible: true,
            })
            .collect();
        Self {
            width,
            height,
            layers,
            objects: Vec::new(),
            next_id: 1,
        }
    }

    /// Board outline as a rectangle anchored at the origin.
    pub fn outline(&self) -> Rect {
        Rect::from_corners(Point::new(0, 0), Point::new(self.width, self.height))
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == id)
    }

    /// Finds a layer by case-insensitive name.
    pub fn layer_by_name(&self, name: &str) -> Option<&Layer> {
        self.layers
            .iter()
            .find(|l| l.name.eq_ignore_ascii_case(name.trim()))
    }

    /// Toggles layer visibility. Returns `false` when the layer does not exist.
    pub fn set_layer_visible(&mut self, id: LayerId, visible: bool) -> bool {
        match self.layers.iter_mut().find(|l| l.id == id) {
            Some(layer) => {
                layer.visible = visible;
                true
            }
            None => false,
        }
    }

    /// Layer-less objects (vias, elements) are always visible.
    pub fn is_visible(&self, layer: Option<LayerId>) -> bool {
        match layer {
            None => true,
            Some(id) => self.layer(id).is_some_and(|l| l.visible),
        }
    }

    /// Reserves the next object id.
    pub fn allocate_id(&mut self) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Inserts (or replaces) an object, keeping id order.
    pub fn insert(&mut self, object: BoardObject) {
        if object.id.0 >= self.next_id {
            self.next_id = object.id.0 + 1;
        }
        match self.objects.binary_search_by_key(&object.id, |o| o.id) {
            Ok(idx) => self.objects[idx] = object,
            Err(idx) => self.objects.insert(idx, object),
        }
    }

    /// Removes an object and returns it.
    pub fn remove(&mut self, id: ObjectId) -> Option<BoardObject> {
        let idx = self.objects.binary_search_by_key(&id, |o| o.id).ok()?;
        Some(self.objects.remove(idx))
    }

    pub fn get(&self, id: ObjectId) -> Option<&BoardObject> {
        self.objects
            .binary_search_by_key(&id, |o| o.id)
            .ok()
            .map(|idx| &self.objects[idx])
    }

    pub(crate) fn get_mut(&mut self, id: ObjectId) -> Option<&mut BoardObject> {
        match self.objects.binary_search_by_key(&id, |o| o.id) {
            Ok(idx) => Some(&mut self.objects[idx]),
            Err(_) => None,
        }
    }

    /// Iterates objects in creation order.
    pub fn objects(&self) -> impl Iterator<Item = &BoardObject> {
        self.objects.iter()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn count_kind(&self, kind: ObjectKind) -> usize {
        self.objects.iter().filter(|o| o.kind() == kind).count()
    }

    /// Ids of selected objects matching `mask`, in creation order.
    pub fn selected(&self, mask: KindMask) -> Vec<ObjectId> {
        self.objects
            .iter()
            .filter(|o| o.flags.contains(ObjectFlags::SELECTED) && mask.accepts(o.kind()))
            .map(|o| o.id)
            .collect()
    }

    /// Ids of every object matching `mask`, in creation order.
    pub fn all_of(&self, mask: KindMask) -> Vec<ObjectId> {
        self.objects
            .iter()
            .filter(|o| mask.accepts(o.kind()))
            .map(|o| o.id)
            .collect()
    }

    /// Bounds of an object. Elements cover their origin and all their pads.
    pub fn bounds_of(&self, object: &BoardObject) -> Option<Rect> {
        match &object.shape {
            ObjectShape::Element(element) => {
                let mut rect = Rect::from_corners(element.origin, element.origin);
                for pad in element.pads.iter().filter_map(|id| self.get(*id)) {
                    if let Some(pad_rect) = pad.shape.bounding_box() {
                        rect = rect.union(&pad_rect);
                    }
                }
                Some(rect)
            }
            shape => shape.bounding_box(),
        }
    }

    /// Visible objects hit by `p`, ordered topmost first.
    pub fn hits_at(&self, p: Point, slop: Coord) -> Vec<&BoardObject> {
        let mut hits: Vec<&BoardObject> = self
            .objects
            .iter()
            .filter(|o| self.is_visible(o.layer))
            .filter(|o| o.shape.hit_test(p, slop))
            .collect();
        hits.sort_by(|a, b| hit_order(a, b));
        hits
    }

    /// Visible objects whose bounds lie fully inside `area`, in creation order.
    pub fn inside(&self, area: &Rect) -> Vec<ObjectId> {
        self.objects
            .iter()
            .filter(|o| self.is_visible(o.layer))
            .filter(|o| self.bounds_of(o).is_some_and(|b| area.contains_rect(&b)))
            .map(|o| o.id)
            .collect()
    }

    /// Hash over every object field, used to detect any board change.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        let bytes = serde_json::to_vec(self).unwrap_or_default();
        bytes.hash(&mut hasher);
        hasher.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::object::{LineData, ViaData};

    fn line(board: &mut Board, x2: Coord) -> ObjectId {
        let id = board.allocate_id();
        board.insert(BoardObject {
            id,
            layer: Some(LayerId(0)),
            owner: None,
            flags: ObjectFlags::empty(),
            shape: ObjectShape::Line(LineData {
                p1: Point::new(0, 0),
                p2: Point::new(x2, 0),
                thickness: 10,
                clearance: 0,
            }),
        });
        id
    }

    #[test]
    fn insert_keeps_creation_order_after_reinsert() {
        let mut board = Board::default();
        let a = line(&mut board, 100);
        let b = line(&mut board, 200);
        let removed = board.remove(a).unwrap();
        board.insert(removed);
        let ids: Vec<_> = board.objects().map(|o| o.id).collect();
        assert_eq!(ids, vec![a, b]);
    }

    #[test]
    fn hits_prefer_vias_then_most_recent() {
        let mut board = Board::default();
        let older = line(&mut board, 100);
        let newer = line(&mut board, 100);
        let hits = board.hits_at(Point::new(50, 0), 0);
        assert_eq!(hits[0].id, newer);
        assert_eq!(hits[1].id, older);

        let via = board.allocate_id();
        board.insert(BoardObject {
            id: via,
            layer: None,
            owner: None,
            flags: ObjectFlags::empty(),
            shape: ObjectShape::Via(ViaData {
                center: Point::new(50, 0),
                diameter: 20,
                drill: 10,
                clearance: 0,
            }),
        });
        assert_eq!(board.hits_at(Point::new(50, 0), 0)[0].id, via);
    }

    #[test]
    fn hidden_layers_are_not_hit() {
        let mut board = Board::default();
        line(&mut board, 100);
        assert!(board.set_layer_visible(LayerId(0), false));
        assert!(board.hits_at(Point::new(50, 0), 0).is_empty());
    }

    #[test]
    fn fingerprint_changes_with_fields() {
        let mut board = Board::default();
        let id = line(&mut board, 100);
        let before = board.fingerprint();
        assert_eq!(before, board.clone().fingerprint());
        board.get_mut(id).unwrap().flags |= ObjectFlags::SELECTED;
        assert_ne!(before, board.fingerprint());
    }

    #[test]
    fn layer_lookup_ignores_case() {
        let board = Board::default();
        assert_eq!(board.layer_by_name("BOTTOM").map(|l| l.id), Some(LayerId(1)));
        assert!(board.layer_by_name("inner7").is_none());
    }
}
