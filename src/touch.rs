//! Touch zones.
//!
//! Each view instance rebuilds a `TouchMap` on every render pass: a
//! list of rectangles tagged with the action a press inside them
//! means. Dispatch is a linear scan from the most recently registered
//! zone, so zones drawn on top win.

use crate::types::Rect;

/// What a press inside a zone means to the view host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneAction {
    /// Previous page / scroll up.
    PageBack,
    /// Next page / scroll down.
    PageForward,
    /// A data row, by index into the current entry list.
    Row(usize),
    /// View-defined action, forwarded to custom views untouched.
    Custom(u16),
}

/// Zone registry for one view instance.
#[derive(Debug, Default)]
pub struct TouchMap {
    zones: Vec<(Rect, ZoneAction)>,
}

impl TouchMap {
    pub fn new() -> Self {
        Self { zones: Vec::new() }
    }

    /// Drop all zones; called at the start of every render pass.
    pub fn clear(&mut self) {
        self.zones.clear();
    }

    /// Register a zone. Later registrations sit on top.
    pub fn add(&mut self, rect: Rect, action: ZoneAction) {
        if !rect.is_empty() {
            self.zones.push((rect, action));
        }
    }

    /// Topmost zone containing the point, if any.
    pub fn hit(&self, x: u16, y: u16) -> Option<ZoneAction> {
        self.zones
            .iter()
            .rev()
            .find(|(rect, _)| rect.contains(x, y))
            .map(|(_, action)| *action)
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_miss() {
        let mut map = TouchMap::new();
        map.add(Rect::new(0, 0, 5, 1), ZoneAction::PageBack);

        assert_eq!(map.hit(2, 0), Some(ZoneAction::PageBack));
        assert_eq!(map.hit(2, 1), None);
        assert_eq!(map.hit(5, 0), None);
    }

    #[test]
    fn test_topmost_wins() {
        let mut map = TouchMap::new();
        map.add(Rect::new(0, 0, 10, 10), ZoneAction::Row(0));
        map.add(Rect::new(2, 2, 3, 3), ZoneAction::PageForward);

        assert_eq!(map.hit(3, 3), Some(ZoneAction::PageForward));
        assert_eq!(map.hit(8, 8), Some(ZoneAction::Row(0)));
    }

    #[test]
    fn test_empty_zone_ignored() {
        let mut map = TouchMap::new();
        map.add(Rect::new(0, 0, 0, 5), ZoneAction::PageBack);
        assert!(map.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut map = TouchMap::new();
        map.add(Rect::new(0, 0, 5, 5), ZoneAction::Row(3));
        assert_eq!(map.len(), 1);
        map.clear();
        assert_eq!(map.hit(1, 1), None);
    }
}
