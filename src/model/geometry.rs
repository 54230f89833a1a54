// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Nereid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use serde::{Deserialize, Serialize};

/// Top-left corner of a node on the canvas, in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn distance(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Returns `self` when both dimensions are finite and non-negative, otherwise `fallback`.
    pub fn or_sane(self, fallback: Size) -> Size {
        let sane = |v: f64| v.is_finite() && v >= 0.0;
        if sane(self.width) && sane(self.height) {
            self
        } else {
            fallback
        }
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub fn new(origin: Point, size: Size) -> Self {
        Self { origin, size }
    }

    pub fn left(&self) -> f64 {
        self.origin.x
    }

    pub fn right(&self) -> f64 {
        self.origin.x + self.size.width
    }

    pub fn top(&self) -> f64 {
        self.origin.y
    }

    pub fn bottom(&self) -> f64 {
        self.origin.y + self.size.height
    }

    /// Overlap depth along each axis; both are positive only when the boxes share area.
    ///
    /// Boxes that merely touch along an edge do not overlap.
    pub fn penetration(&self, other: &Rect) -> (f64, f64) {
        let dx = self.right().min(other.right()) - self.left().max(other.left());
        let dy = self.bottom().min(other.bottom()) - self.top().max(other.top());
        (dx, dy)
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        let (dx, dy) = self.penetration(other);
        dx > 0.0 && dy > 0.0
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left()
            && point.x <= self.right()
            && point.y >= self.top()
            && point.y <= self.bottom()
    }
}

#[cfg(test)]
mod tests {
    use super::{Point, Rect, Size};

    fn rect(x: f64, y: f64, w: f64, h: f64) -> Rect {
        Rect::new(Point::new(x, y), Size::new(w, h))
    }

    #[test]
    fn touching_boxes_do_not_intersect() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        assert!(!a.intersects(&rect(10.0, 0.0, 10.0, 10.0)));
        assert!(!a.intersects(&rect(0.0, 10.0, 10.0, 10.0)));
        assert!(a.intersects(&rect(9.0, 9.0, 10.0, 10.0)));
    }

    #[test]
    fn penetration_reports_shared_extent_per_axis() {
        let a = rect(0.0, 0.0, 100.0, 40.0);
        let b = rect(90.0, 10.0, 100.0, 40.0);
        assert_eq!(a.penetration(&b), (10.0, 30.0));
    }

    #[test]
    fn insane_sizes_fall_back() {
        let fallback = Size::new(120.0, 40.0);
        assert_eq!(Size::new(f64::NAN, 3.0).or_sane(fallback), fallback);
        assert_eq!(Size::new(-1.0, 3.0).or_sane(fallback), fallback);
        assert_eq!(Size::new(10.0, 3.0).or_sane(fallback), Size::new(10.0, 3.0));
    }
}
