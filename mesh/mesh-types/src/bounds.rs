//! Axis-aligned bounding box.

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box.
///
/// A box is **valid** when `min <= max` on all three axes. The empty box
/// starts at `min = +inf`, `max = -inf` and stays invalid until a point is
/// folded in, so callers must check [`BoundingBox::is_valid`] before using
/// the extents.
///
/// # Example
///
/// ```
/// use mesh_types::{BoundingBox, Point3};
///
/// let points = [Point3::new(0.0, 0.0, 0.0), Point3::new(10.0, 5.0, 3.0)];
/// let bbox = BoundingBox::from_points(points.iter());
///
/// assert!(bbox.is_valid());
/// assert!(bbox.contains(&Point3::new(5.0, 2.0, 1.0)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoundingBox {
    /// Minimum corner (smallest x, y, z values).
    pub min: Point3<f64>,
    /// Maximum corner (largest x, y, z values).
    pub max: Point3<f64>,
}

impl BoundingBox {
    /// Create a box from minimum and maximum corners as given.
    ///
    /// The corners are stored unchanged, so `min > max` yields an invalid box.
    #[inline]
    #[must_use]
    pub const fn new(min: Point3<f64>, max: Point3<f64>) -> Self {
        Self { min, max }
    }

    /// Create a degenerate box enclosing a single point.
    #[inline]
    #[must_use]
    pub const fn from_point(point: Point3<f64>) -> Self {
        Self {
            min: point,
            max: point,
        }
    }

    /// Create the empty (invalid) box.
    ///
    /// This is the identity element of [`BoundingBox::merge`].
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::{BoundingBox, Point3};
    ///
    /// let mut bbox = BoundingBox::empty();
    /// assert!(!bbox.is_valid());
    ///
    /// bbox.expand_to_include(&Point3::new(1.0, 2.0, 3.0));
    /// assert!(bbox.is_valid());
    /// ```
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Point3::new is not const in nalgebra
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// Fold an iterator of points into a box.
    ///
    /// Returns the empty box if the iterator is empty.
    #[must_use]
    pub fn from_points<'a>(points: impl Iterator<Item = &'a Point3<f64>>) -> Self {
        points.fold(Self::empty(), |mut bbox, point| {
            bbox.expand_to_include(point);
            bbox
        })
    }

    /// Whether `min <= max` holds on every axis.
    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y && self.min.z <= self.max.z
    }

    /// Combine two boxes component-wise.
    ///
    /// Associative and commutative; [`BoundingBox::empty`] is the identity,
    /// so merging with an invalid empty box returns the other box unchanged.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::{BoundingBox, Point3};
    ///
    /// let a = BoundingBox::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
    /// let b = BoundingBox::new(Point3::new(-1.0, 0.5, 0.0), Point3::new(0.5, 3.0, 1.0));
    ///
    /// assert_eq!(a.merge(&b), b.merge(&a));
    /// assert_eq!(a.merge(&BoundingBox::empty()), a);
    /// ```
    #[must_use]
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            min: Point3::new(
                self.min.x.min(other.min.x),
                self.min.y.min(other.min.y),
                self.min.z.min(other.min.z),
            ),
            max: Point3::new(
                self.max.x.max(other.max.x),
                self.max.y.max(other.max.y),
                self.max.z.max(other.max.z),
            ),
        }
    }

    /// Expand the box in place to include a point.
    pub fn expand_to_include(&mut self, point: &Point3<f64>) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.min.z = self.min.z.min(point.z);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
        self.max.z = self.max.z.max(point.z);
    }

    /// Get the size (width, depth, height) of the box.
    ///
    /// Meaningless for an invalid box.
    #[inline]
    #[must_use]
    pub fn size(&self) -> Vector3<f64> {
        self.max - self.min
    }

    /// Get the center of the box.
    #[inline]
    #[must_use]
    pub fn center(&self) -> Point3<f64> {
        nalgebra::center(&self.min, &self.max)
    }

    /// Get the diagonal length, or 0.0 for an invalid box.
    #[inline]
    #[must_use]
    pub fn diagonal(&self) -> f64 {
        if self.is_valid() {
            self.size().norm()
        } else {
            0.0
        }
    }

    /// Check if the box contains a point. Points on the boundary count as inside.
    #[inline]
    #[must_use]
    pub fn contains(&self, point: &Point3<f64>) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }

    /// Get the eight corner points.
    ///
    /// Corners are ordered with z varying fastest, then y, then x.
    #[must_use]
    pub fn corners(&self) -> [Point3<f64>; 8] {
        let (lo, hi) = (self.min, self.max);
        [
            Point3::new(lo.x, lo.y, lo.z),
            Point3::new(lo.x, lo.y, hi.z),
            Point3::new(lo.x, hi.y, lo.z),
            Point3::new(lo.x, hi.y, hi.z),
            Point3::new(hi.x, lo.y, lo.z),
            Point3::new(hi.x, lo.y, hi.z),
            Point3::new(hi.x, hi.y, lo.z),
            Point3::new(hi.x, hi.y, hi.z),
        ]
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::empty()
    }
}
