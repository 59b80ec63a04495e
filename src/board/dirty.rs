//! Dirty region tracking for the external renderer.
//!
//! The editing core never paints. It only records which board areas changed so
//! a redraw loop can pick them up between frames.

use super::geometry::Rect;

/// Fire-and-forget repaint notification consumed by the renderer.
pub trait DirtyNotifier {
    /// Marks the whole board as needing a repaint.
    fn mark_dirty(&mut self);

    /// Marks one area as needing a repaint. Defaults to a full repaint.
    fn mark_area(&mut self, area: Rect) {
        let _ = area;
        self.mark_dirty();
    }
}

/// Tracks dirty rectangles accumulated between renders.
#[derive(Debug, Default)]
pub struct DirtyTracker {
    regions: Vec<Rect>,
    force_full: bool,
    notifications: u64,
}

impl DirtyTracker {
    /// Creates a new, empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the entire board as dirty. Clears any accumulated rectangles.
    pub fn mark_full(&mut self) {
        self.force_full = true;
        self.regions.clear();
        self.notifications += 1;
    }

    /// Adds a dirty rectangle if the tracker is not already full.
    pub fn mark_rect(&mut self, rect: Rect) {
        self.notifications += 1;
        if self.force_full {
            return;
        }
        self.regions.push(rect);
    }

    /// Adds a dirty rectangle when present, or full damage if none is available.
    pub fn mark_optional_rect(&mut self, rect: Option<Rect>) {
        match rect {
            Some(rect) => self.mark_rect(rect),
            None => self.mark_full(),
        }
    }

    /// True when anything was marked since the last drain.
    pub fn is_dirty(&self) -> bool {
        self.force_full || !self.regions.is_empty()
    }

    /// Total number of notifications received since creation.
    pub fn notification_count(&self) -> u64 {
        self.notifications
    }

    /// Drains the dirty regions gathered so far.
    ///
    /// When the full board is marked, returns the single `full` rectangle;
    /// otherwise returns accumulated rectangles.
    pub fn take_regions(&mut self, full: Rect) -> Vec<Rect> {
        if self.force_full {
            self.force_full = false;
            self.regions.clear();
            vec![full]
        } else {
            self.regions.drain(..).collect()
        }
    }
}

impl DirtyNotifier for DirtyTracker {
    fn mark_dirty(&mut self) {
        self.mark_full();
    }

    fn mark_area(&mut self, area: Rect) {
        self.mark_rect(area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Point;

    fn rect(x: i64, y: i64, w: i64, h: i64) -> Rect {
        Rect::from_corners(Point::new(x, y), Point::new(x + w, y + h))
    }

    #[test]
    fn mark_area_records_rectangles() {
        let mut tracker = DirtyTracker::new();
        tracker.mark_area(rect(0, 0, 10, 10));

        assert!(tracker.is_dirty());
        let rects = tracker.take_regions(rect(0, 0, 100, 100));
        assert_eq!(rects, vec![rect(0, 0, 10, 10)]);
        assert!(!tracker.is_dirty());
    }

    #[test]
    fn mark_full_takes_precedence() {
        let mut tracker = DirtyTracker::new();
        tracker.mark_rect(rect(5, 5, 10, 10));
        tracker.mark_dirty();
        tracker.mark_rect(rect(20, 20, 15, 15));

        let rects = tracker.take_regions(rect(0, 0, 200, 100));
        assert_eq!(rects, vec![rect(0, 0, 200, 100)]);
        assert_eq!(tracker.notification_count(), 3);
    }
}
