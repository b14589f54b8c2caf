//! Pixel-space geometry: Offset, Size, Region, Spacing.
//!
//! Every rectangle in the component tree is stored in parent-relative pixels.
//! Absolute rectangles (hit-testing, damage, scissor) use the same types,
//! translated by the owner's cached absolute position.

use std::ops::{Add, Neg, Sub};

// ---------------------------------------------------------------------------
// Offset
// ---------------------------------------------------------------------------

/// A point or a displacement in pixels.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Offset {
    pub x: i32,
    pub y: i32,
}

impl Offset {
    /// The origin.
    pub const ZERO: Offset = Offset { x: 0, y: 0 };

    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Linear interpolation towards `other`; `factor` 0.0 is `self`, 1.0 is `other`.
    #[inline]
    pub fn blend(self, other: Offset, factor: f64) -> Offset {
        let inv = 1.0 - factor;
        Offset {
            x: (self.x as f64 * inv + other.x as f64 * factor).round() as i32,
            y: (self.y as f64 * inv + other.y as f64 * factor).round() as i32,
        }
    }
}

impl Add for Offset {
    type Output = Offset;
    #[inline]
    fn add(self, rhs: Offset) -> Offset {
        Offset::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Offset {
    type Output = Offset;
    #[inline]
    fn sub(self, rhs: Offset) -> Offset {
        Offset::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Offset {
    type Output = Offset;
    #[inline]
    fn neg(self) -> Offset {
        Offset::new(-self.x, -self.y)
    }
}

// ---------------------------------------------------------------------------
// Size
// ---------------------------------------------------------------------------

/// Width and height in pixels.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const ZERO: Size = Size { width: 0, height: 0 };

    #[inline]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Interpolate both dimensions towards `other`.
    #[inline]
    pub fn blend(self, other: Size, factor: f64) -> Size {
        let inv = 1.0 - factor;
        Size {
            width: (self.width as f64 * inv + other.width as f64 * factor).round() as i32,
            height: (self.height as f64 * inv + other.height as f64 * factor).round() as i32,
        }
    }

    /// A region of this size at the origin.
    #[inline]
    pub const fn to_region(self) -> Region {
        Region { x: 0, y: 0, width: self.width, height: self.height }
    }
}

// ---------------------------------------------------------------------------
// Region
// ---------------------------------------------------------------------------

/// An axis-aligned rectangle: position plus size.
///
/// A region with a non-positive width or height is empty. Empty regions are
/// the identity for [`Region::union`], which is what the damage tracker
/// relies on when it starts a new frame from nothing.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Region {
    pub const EMPTY: Region = Region { x: 0, y: 0, width: 0, height: 0 };

    #[inline]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// Build a region from a position and a size.
    #[inline]
    pub const fn from_parts(offset: Offset, size: Size) -> Self {
        Self { x: offset.x, y: offset.y, width: size.width, height: size.height }
    }

    /// Right edge, exclusive.
    #[inline]
    pub const fn right(self) -> i32 {
        self.x + self.width
    }

    /// Bottom edge, exclusive.
    #[inline]
    pub const fn bottom(self) -> i32 {
        self.y + self.height
    }

    #[inline]
    pub const fn offset(self) -> Offset {
        Offset { x: self.x, y: self.y }
    }

    #[inline]
    pub const fn size(self) -> Size {
        Size { width: self.width, height: self.height }
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Whether `point` lies inside the region.
    #[inline]
    pub const fn contains(self, point: Offset) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    /// Whether `other` lies entirely inside this region. Empty regions are
    /// contained everywhere.
    #[inline]
    pub const fn contains_region(self, other: Region) -> bool {
        if other.is_empty() {
            return true;
        }
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Whether the two regions share a non-empty area.
    #[inline]
    pub const fn overlaps(self, other: Region) -> bool {
        !self.intersection(other).is_empty()
    }

    /// The shared area, or [`Region::EMPTY`].
    #[inline]
    pub const fn intersection(self, other: Region) -> Region {
        let x1 = if self.x > other.x { self.x } else { other.x };
        let y1 = if self.y > other.y { self.y } else { other.y };
        let x2 = if self.right() < other.right() { self.right() } else { other.right() };
        let y2 = if self.bottom() < other.bottom() { self.bottom() } else { other.bottom() };
        if x2 <= x1 || y2 <= y1 {
            Region::EMPTY
        } else {
            Region { x: x1, y: y1, width: x2 - x1, height: y2 - y1 }
        }
    }

    /// The smallest region covering both. Empty operands are ignored.
    #[inline]
    pub const fn union(self, other: Region) -> Region {
        if self.is_empty() {
            return other;
        }
        if other.is_empty() {
            return self;
        }
        let x1 = if self.x < other.x { self.x } else { other.x };
        let y1 = if self.y < other.y { self.y } else { other.y };
        let x2 = if self.right() > other.right() { self.right() } else { other.right() };
        let y2 = if self.bottom() > other.bottom() { self.bottom() } else { other.bottom() };
        Region { x: x1, y: y1, width: x2 - x1, height: y2 - y1 }
    }

    #[inline]
    pub const fn translate(self, by: Offset) -> Region {
        Region { x: self.x + by.x, y: self.y + by.y, width: self.width, height: self.height }
    }

    /// Contract inward by `margin`, clamping the size at zero.
    #[inline]
    pub const fn shrink(self, margin: Spacing) -> Region {
        let w = self.width - margin.left - margin.right;
        let h = self.height - margin.top - margin.bottom;
        Region {
            x: self.x + margin.left,
            y: self.y + margin.top,
            width: if w > 0 { w } else { 0 },
            height: if h > 0 { h } else { 0 },
        }
    }
}

// ---------------------------------------------------------------------------
// Spacing
// ---------------------------------------------------------------------------

/// Per-side distances, used for padding and margins by the layouters.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Spacing {
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
    pub left: i32,
}

impl Spacing {
    pub const ZERO: Spacing = Spacing { top: 0, right: 0, bottom: 0, left: 0 };

    #[inline]
    pub const fn new(top: i32, right: i32, bottom: i32, left: i32) -> Self {
        Self { top, right, bottom, left }
    }

    #[inline]
    pub const fn all(value: i32) -> Self {
        Self { top: value, right: value, bottom: value, left: value }
    }

    /// `left + right`.
    #[inline]
    pub const fn width(self) -> i32 {
        self.left + self.right
    }

    /// `top + bottom`.
    #[inline]
    pub const fn height(self) -> i32 {
        self.top + self.bottom
    }
}
