use std::ops::{Add, Index, Mul, Sub};

use nalgebra::{OPoint, OVector, Scalar, allocator::Allocator, DefaultAllocator, DimName};
use num_traits::One;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triangle<Point>([Point; 3]);

impl<Point> Triangle<Point> {
    pub fn new(a: Point, b: Point, c: Point) -> Triangle<Point> {
        Triangle([a, b, c])
    }

    pub fn iter<'a>(&'a self) -> impl Iterator<Item = &'a Point> {
        self.0.iter()
    }
}

impl<Point> Index<usize> for Triangle<Point> {
    type Output = Point;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl<T: Scalar, D: DimName> Triangle<OPoint<T, D>>
where
    DefaultAllocator: Allocator<D>,
    for<'a> &'a OPoint<T, D>: Sub<Output = OVector<T, D>>,
{
    /// Returns edge vectors, coming from self[0]
    pub fn edges(&self) -> [OVector<T, D>; 2] {
        [&self.0[1] - &self.0[0], &self.0[2] - &self.0[0]]
    }
}

/// Position inside a triangle, relative to its second (`u`) and third (`v`) vertex.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct BarycentricCoordinates<T> {
    pub u: T,
    pub v: T,
}

impl<T> BarycentricCoordinates<T>
where
    T: One + Copy + Sub<Output = T>,
{
    pub fn interpolate<T2>(&self, a: &T2, b: &T2, c: &T2) -> T2
    where
        for<'a> &'a T2: Mul<T, Output = T2>,
        T2: Add<Output = T2>,
    {
        let w = T::one() - self.u - self.v;
        a * w + b * self.u + c * self.v
    }

    pub fn interpolate_triangle<T2>(&self, triangle: &Triangle<T2>) -> T2
    where
        for<'a> &'a T2: Mul<T, Output = T2>,
        T2: Add<Output = T2>,
    {
        self.interpolate(&triangle[0], &triangle[1], &triangle[2])
    }
}
