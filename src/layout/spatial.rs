//! Spatial map for hit testing.
//!
//! [`SpatialMap`] keeps `(key, Region)` pairs in paint order and answers
//! "what is under this point" queries. Keys are whatever the caller wants to
//! get back: DOM node ids, or slider hit targets.

use crate::geometry::{Offset, Region};

/// Regions ordered by z-order, where later entries are in front of earlier
/// ones (painter's order).
#[derive(Debug, Clone)]
pub struct SpatialMap<K> {
    entries: Vec<(K, Region)>,
}

impl<K: Copy> SpatialMap<K> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Rebuild from `entries`, whose order defines z-order (last = frontmost).
    pub fn update_ordered(&mut self, entries: impl IntoIterator<Item = (K, Region)>) {
        self.entries.clear();
        self.entries.extend(entries);
    }

    /// Append one entry in front of everything already present.
    pub fn push(&mut self, key: K, region: Region) {
        self.entries.push((key, region));
    }

    /// The frontmost key at `point`.
    pub fn node_at(&self, point: Offset) -> Option<K> {
        self.entries
            .iter()
            .rev()
            .find(|(_, region)| region.contains_point(point))
            .map(|(key, _)| *key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Copy> Default for SpatialMap<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Target {
        Track,
        Slide(usize),
        Button,
    }

    /// A track at x 3..77 with 10-cell slides, and a button on the right.
    fn slider_map() -> SpatialMap<Target> {
        let mut map = SpatialMap::new();
        map.update_ordered(
            std::iter::once((Target::Track, Region::new(3, 0, 74, 3)))
                .chain((0..8).map(|i| (Target::Slide(i), Region::new(3 + 10 * i as i32, 0, 10, 3))))
                .chain(std::iter::once((Target::Button, Region::new(77, 0, 3, 3)))),
        );
        map
    }

    #[test]
    fn new_is_empty() {
        let map: SpatialMap<Target> = SpatialMap::default();
        assert!(map.is_empty());
        assert_eq!(map.node_at(Offset::new(0, 0)), None);
    }

    #[test]
    fn frontmost_wins() {
        let map = slider_map();
        assert_eq!(map.node_at(Offset::new(25, 1)), Some(Target::Slide(2)));
    }

    #[test]
    fn slide_edges_are_half_open() {
        let map = slider_map();
        assert_eq!(map.node_at(Offset::new(12, 0)), Some(Target::Slide(0)));
        assert_eq!(map.node_at(Offset::new(13, 0)), Some(Target::Slide(1)));
    }

    #[test]
    fn button_hit_and_miss() {
        let map = slider_map();
        assert_eq!(map.node_at(Offset::new(78, 2)), Some(Target::Button));
        assert_eq!(map.node_at(Offset::new(78, 3)), None);
    }

    #[test]
    fn update_replaces_previous() {
        let mut map = slider_map();
        map.update_ordered([(Target::Button, Region::new(0, 0, 1, 1))]);
        assert_eq!(map.len(), 1);
        map.push(Target::Track, Region::new(0, 0, 1, 1));
        assert_eq!(map.node_at(Offset::new(0, 0)), Some(Target::Track));
    }

    #[test]
    fn zero_size_region_not_hittable() {
        let mut map = SpatialMap::new();
        map.push(Target::Slide(0), Region::new(5, 5, 0, 0));
        assert_eq!(map.node_at(Offset::new(5, 5)), None);
    }
}
