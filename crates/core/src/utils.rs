//! Geometry helpers shared by the clustering core.
//!
//! Provides:
//! - Point and bounding box types in content space (top-left origin, y down)
//! - The `HasBBox` trait with gap measurements between boxes
//! - `ViewTransform`, the affine map from the panned/zoomed view into content space

/// Floating-point infinity for bounding box folds.
pub const INF_F64: f64 = f64::MAX;

/// A 2D point (x, y).
pub type Point = (f64, f64);

/// Axis-aligned bounding box in content space. `top <= bottom`, `x0 <= x1`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BBox {
    pub x0: f64,
    pub top: f64,
    pub x1: f64,
    pub bottom: f64,
}

impl BBox {
    pub fn new(x0: f64, top: f64, x1: f64, bottom: f64) -> Self {
        Self {
            x0,
            top,
            x1,
            bottom,
        }
    }

    /// Builds a box from two opposite corners given in any order, the way a
    /// user drags a rectangle.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            x0: a.0.min(b.0),
            top: a.1.min(b.1),
            x1: a.0.max(b.0),
            bottom: a.1.max(b.1),
        }
    }

    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    pub fn center(&self) -> Point {
        ((self.x0 + self.x1) / 2.0, (self.top + self.bottom) / 2.0)
    }

    /// Inclusive point containment.
    pub fn contains_point(&self, p: Point) -> bool {
        p.0 >= self.x0 && p.0 <= self.x1 && p.1 >= self.top && p.1 <= self.bottom
    }

    /// Inclusive overlap test: boxes that touch along an edge overlap.
    pub fn overlaps(&self, other: &BBox) -> bool {
        self.x0 <= other.x1
            && other.x0 <= self.x1
            && self.top <= other.bottom
            && other.top <= self.bottom
    }

    /// Smallest box containing both.
    pub fn union(&self, other: &BBox) -> BBox {
        BBox {
            x0: self.x0.min(other.x0),
            top: self.top.min(other.top),
            x1: self.x1.max(other.x1),
            bottom: self.bottom.max(other.bottom),
        }
    }

    /// Clamps a point into this box.
    pub fn clamp_point(&self, p: Point) -> Point {
        (p.0.clamp(self.x0, self.x1), p.1.clamp(self.top, self.bottom))
    }
}

/// Union of a sequence of boxes, `None` when empty.
pub fn bbox_union<I: IntoIterator<Item = BBox>>(boxes: I) -> Option<BBox> {
    boxes.into_iter().reduce(|acc, b| acc.union(&b))
}

/// Trait for objects that have a bounding box in content space.
pub trait HasBBox {
    fn x0(&self) -> f64;
    fn top(&self) -> f64;
    fn x1(&self) -> f64;
    fn bottom(&self) -> f64;

    fn bbox(&self) -> BBox {
        BBox::new(self.x0(), self.top(), self.x1(), self.bottom())
    }

    fn width(&self) -> f64 {
        self.x1() - self.x0()
    }

    fn height(&self) -> f64 {
        self.bottom() - self.top()
    }

    /// Horizontal gap between extents; zero when they overlap.
    fn hgap<O: HasBBox + ?Sized>(&self, other: &O) -> f64 {
        (self.x0() - other.x1()).max(other.x0() - self.x1()).max(0.0)
    }

    /// Vertical gap between extents; zero when they overlap.
    fn vgap<O: HasBBox + ?Sized>(&self, other: &O) -> f64 {
        (self.top() - other.bottom())
            .max(other.top() - self.bottom())
            .max(0.0)
    }
}

impl HasBBox for BBox {
    fn x0(&self) -> f64 {
        self.x0
    }
    fn top(&self) -> f64 {
        self.top
    }
    fn x1(&self) -> f64 {
        self.x1
    }
    fn bottom(&self) -> f64 {
        self.bottom
    }
}

/// Affine map from view space (what the user sees after pan and zoom) to
/// content space: `content = (view - translate) / scale`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
    pub translate_x: f64,
    pub translate_y: f64,
    pub scale: f64,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            translate_x: 0.0,
            translate_y: 0.0,
            scale: 1.0,
        }
    }
}

impl ViewTransform {
    pub fn new(translate_x: f64, translate_y: f64, scale: f64) -> Self {
        Self {
            translate_x,
            translate_y,
            scale,
        }
    }

    pub fn to_content_point(&self, view: Point) -> Point {
        (
            (view.0 - self.translate_x) / self.scale,
            (view.1 - self.translate_y) / self.scale,
        )
    }

    /// Maps a view rectangle into content space. Corners are re-normalized so
    /// a negative zoom or reversed drag still yields `x0 <= x1`.
    pub fn to_content_rect(&self, view: BBox) -> BBox {
        BBox::from_corners(
            self.to_content_point((view.x0, view.top)),
            self.to_content_point((view.x1, view.bottom)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gaps_are_zero_when_overlapping() {
        let a = BBox::new(0.0, 0.0, 10.0, 10.0);
        let b = BBox::new(5.0, 5.0, 20.0, 20.0);
        assert_eq!(a.hgap(&b), 0.0);
        assert_eq!(a.vgap(&b), 0.0);

        let c = BBox::new(13.0, 30.0, 15.0, 40.0);
        assert_eq!(a.hgap(&c), 3.0);
        assert_eq!(c.hgap(&a), 3.0);
        assert_eq!(a.vgap(&c), 20.0);
    }

    #[test]
    fn view_transform_inverts_pan_and_zoom() {
        let t = ViewTransform::new(100.0, 50.0, 2.0);
        assert_eq!(t.to_content_point((120.0, 70.0)), (10.0, 10.0));

        let r = t.to_content_rect(BBox::new(300.0, 250.0, 100.0, 50.0));
        assert_eq!(r, BBox::new(0.0, 0.0, 100.0, 100.0));
    }

    #[test]
    fn touching_boxes_overlap() {
        let a = BBox::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.overlaps(&BBox::new(10.0, 0.0, 12.0, 4.0)));
        assert!(!a.overlaps(&BBox::new(10.5, 0.0, 12.0, 4.0)));
    }
}
