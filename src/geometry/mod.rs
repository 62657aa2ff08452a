mod aabb;
mod ray_box_intersection;
mod ray_triangle_intersection;
mod transform;
mod triangle;

use nalgebra::{Matrix4, Point2, Point3, Vector2, Vector3};
use thiserror::Error;

pub use aabb::AABB;
pub use ray_box_intersection::RayIntersectionExt;
pub use transform::{
    Transform, rotation_x, rotation_y, rotation_z, scaling, shearing, translation, view_transform,
};
pub use triangle::{BarycentricCoordinates, Triangle};

pub type FloatType = f64;

/// Offset used to push secondary ray origins off a surface and as tolerance
/// for near-parallel and near-degenerate cases.
pub const EPSILON: FloatType = 1e-5;

pub type ScreenPoint = Point2<u32>;
pub type ScreenSize = Vector2<u32>;
/// Block of pixels, `max` is exclusive.
pub type ScreenBlock = AABB<ScreenPoint>;

pub type WorldPoint = Point3<FloatType>;
pub type WorldVector = Vector3<FloatType>;
pub type WorldMatrix = Matrix4<FloatType>;
pub type WorldBox = AABB<WorldPoint>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeometryError {
    #[error("transformation matrix is not invertible: {0}")]
    NotInvertible(WorldMatrix),
}

#[derive(Copy, Clone, Debug)]
pub struct Ray {
    pub origin: WorldPoint,
    /// Direction of the ray.
    /// Not normalized, so that distances along a ray stay valid after transforming
    /// it into an object's local space.
    pub direction: WorldVector,

    /// Componentwise inverse of the ray direction
    /// Zeros in direction get turned into positive infinity regardless of the sign of the zero
    pub inv_direction: WorldVector,
}

impl Ray {
    pub fn new(origin: WorldPoint, direction: WorldVector) -> Ray {
        let inv_direction = direction.map(|x| if x == 0.0 { FloatType::INFINITY } else { 1.0 / x });

        Ray {
            origin,
            direction,
            inv_direction,
        }
    }

    pub fn point_at(&self, distance: FloatType) -> WorldPoint {
        self.origin + self.direction * distance
    }

    /// Maps the ray through a homogeneous transformation matrix.
    pub fn transform(&self, matrix: &WorldMatrix) -> Ray {
        Ray::new(
            matrix.transform_point(&self.origin),
            matrix.transform_vector(&self.direction),
        )
    }
}

/// Reflects `incoming` around `normal`.
pub fn reflect(incoming: &WorldVector, normal: &WorldVector) -> WorldVector {
    incoming - normal * (2.0 * incoming.dot(normal))
}
