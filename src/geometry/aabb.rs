use std::ops::Sub;

use itertools::iproduct;
use nalgebra::{Point2, Scalar};

use super::{FloatType, WorldBox, WorldMatrix, WorldPoint};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AABB<Point> {
    pub min: Point,
    pub max: Point,
}

impl<Point> AABB<Point> {
    pub fn new(min: Point, max: Point) -> AABB<Point> {
        AABB { min, max }
    }
}

impl<Point: Sub + Copy> AABB<Point> {
    pub fn size(&self) -> Point::Output {
        self.max - self.min
    }
}

impl<T: Scalar + Copy + Sub> AABB<Point2<T>> {
    pub fn width(&self) -> T::Output {
        self.max[0] - self.min[0]
    }

    pub fn height(&self) -> T::Output {
        self.max[1] - self.min[1]
    }
}

/// The empty box: min at +inf and max at -inf, so that adding any point makes
/// the box contain exactly that point.
impl Default for WorldBox {
    fn default() -> Self {
        WorldBox::empty()
    }
}

impl WorldBox {
    pub fn empty() -> WorldBox {
        AABB {
            min: WorldPoint::new(FloatType::INFINITY, FloatType::INFINITY, FloatType::INFINITY),
            max: WorldPoint::new(
                FloatType::NEG_INFINITY,
                FloatType::NEG_INFINITY,
                FloatType::NEG_INFINITY,
            ),
        }
    }

    /// Box that covers the whole space.
    pub fn infinite() -> WorldBox {
        AABB {
            min: WorldPoint::new(
                FloatType::NEG_INFINITY,
                FloatType::NEG_INFINITY,
                FloatType::NEG_INFINITY,
            ),
            max: WorldPoint::new(FloatType::INFINITY, FloatType::INFINITY, FloatType::INFINITY),
        }
    }

    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a WorldPoint>) -> WorldBox {
        let mut ret = WorldBox::empty();
        for p in points {
            ret.add_point(p);
        }
        ret
    }

    /// True if the box doesn't contain any point.
    pub fn is_empty(&self) -> bool {
        self.min.iter().zip(self.max.iter()).any(|(min, max)| min > max)
    }

    pub fn is_finite(&self) -> bool {
        self.min.iter().chain(self.max.iter()).all(|x| x.is_finite())
    }

    pub fn add_point(&mut self, point: &WorldPoint) {
        self.min = self.min.inf(point);
        self.max = self.max.sup(point);
    }

    /// Grows the box so that it also covers `other`.
    pub fn merge(&mut self, other: &WorldBox) {
        if other.is_empty() {
            return;
        }
        self.add_point(&other.min);
        self.add_point(&other.max);
    }

    pub fn union(&self, other: &WorldBox) -> WorldBox {
        let mut ret = self.clone();
        ret.merge(other);
        ret
    }

    /// Inclusive point containment.
    pub fn contains_point(&self, point: &WorldPoint) -> bool {
        (0..3).all(|i| self.min[i] <= point[i] && point[i] <= self.max[i])
    }

    /// Inclusive box containment. Empty box is contained in any box.
    pub fn contains_box(&self, other: &WorldBox) -> bool {
        other.is_empty() || (self.contains_point(&other.min) && self.contains_point(&other.max))
    }

    /// Returns the eight corners of the box.
    pub fn corners(&self) -> impl Iterator<Item = WorldPoint> {
        iproduct!(
            [self.min.x, self.max.x],
            [self.min.y, self.max.y],
            [self.min.z, self.max.z]
        )
        .map(|(x, y, z)| WorldPoint::new(x, y, z))
    }

    /// Axis aligned box that covers this box after transformation.
    /// Unbounded boxes stay unbounded (the corners can't be transformed
    /// without turning infinities into NaNs).
    pub fn transform(&self, matrix: &WorldMatrix) -> WorldBox {
        if self.is_empty() {
            return WorldBox::empty();
        }
        if !self.is_finite() {
            return WorldBox::infinite();
        }

        let mut ret = WorldBox::empty();
        for corner in self.corners() {
            ret.add_point(&matrix.transform_point(&corner));
        }
        ret
    }

    /// Cuts the box in half along its longest axis.
    /// Ties are resolved toward x, then y.
    /// Both halves share the cut plane and together cover the original box.
    pub fn split(&self) -> (WorldBox, WorldBox) {
        let size = self.size();
        let axis = if size.x >= size.y && size.x >= size.z {
            0
        } else if size.y >= size.z {
            1
        } else {
            2
        };

        let middle = self.min[axis] + size[axis] / 2.0;

        let mut left_max = self.max;
        left_max[axis] = middle;
        let mut right_min = self.min;
        right_min[axis] = middle;

        (
            WorldBox::new(self.min, left_max),
            WorldBox::new(right_min, self.max),
        )
    }
}
