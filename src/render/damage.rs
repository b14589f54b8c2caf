//! Damage tracking for lazy rendering.
//!
//! The tracker keeps a single conservative rectangle: the union of every area
//! reported since the last redraw. Partial redraws clip to it, then reset it.

use crate::geometry::Region;

// ---------------------------------------------------------------------------
// DamageTracker
// ---------------------------------------------------------------------------

/// Accumulates the invalid region between two redraws.
///
/// In non-lazy mode the tracker still records areas, but the display pass
/// ignores it and redraws everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DamageTracker {
    lazy: bool,
    invalid: Region,
}

impl DamageTracker {
    pub fn new(lazy: bool) -> Self {
        Self {
            lazy,
            invalid: Region::EMPTY,
        }
    }

    /// Whether redraws are clipped to the damaged area.
    pub fn is_lazy(&self) -> bool {
        self.lazy
    }

    pub fn set_lazy(&mut self, lazy: bool) {
        self.lazy = lazy;
    }

    /// Grow the invalid region to cover `area`. Empty areas are ignored.
    pub fn invalidate(&mut self, area: Region) {
        self.invalid = self.invalid.union(area);
    }

    /// The accumulated invalid region.
    pub fn region(&self) -> Region {
        self.invalid
    }

    pub fn is_clean(&self) -> bool {
        self.invalid.is_empty()
    }

    /// Forget all damage. Called once per frame, after the redraw.
    pub fn reset(&mut self) {
        self.invalid = Region::EMPTY;
    }

    /// Return the accumulated region and reset the tracker.
    pub fn take(&mut self) -> Region {
        std::mem::replace(&mut self.invalid, Region::EMPTY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_clean() {
        let tracker = DamageTracker::new(true);
        assert!(tracker.is_clean());
        assert!(tracker.is_lazy());
        assert_eq!(tracker.region(), Region::EMPTY);
    }

    #[test]
    fn union_covers_every_invalidated_area() {
        let mut tracker = DamageTracker::new(true);
        let areas = [
            Region::new(0, 0, 10, 10),
            Region::new(50, 5, 4, 4),
            Region::new(-3, 20, 2, 2),
        ];
        for area in areas {
            tracker.invalidate(area);
        }
        for area in areas {
            assert!(tracker.region().contains_region(area), "{area:?} not covered");
        }
    }

    #[test]
    fn empty_area_does_not_grow_region() {
        let mut tracker = DamageTracker::new(true);
        tracker.invalidate(Region::new(5, 5, 2, 2));
        tracker.invalidate(Region::new(100, 100, 0, 0));
        assert_eq!(tracker.region(), Region::new(5, 5, 2, 2));
    }

    #[test]
    fn take_resets() {
        let mut tracker = DamageTracker::new(true);
        tracker.invalidate(Region::new(1, 1, 1, 1));
        assert_eq!(tracker.take(), Region::new(1, 1, 1, 1));
        assert!(tracker.is_clean());
    }
}
