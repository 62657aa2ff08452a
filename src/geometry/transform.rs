use super::{FloatType, GeometryError, WorldMatrix, WorldPoint, WorldVector};

/// Transformation matrix together with its cached inverse and inverse transpose.
#[derive(Clone, Debug, PartialEq)]
pub struct Transform {
    matrix: WorldMatrix,
    inverse: WorldMatrix,
    inverse_transpose: WorldMatrix,
}

impl Transform {
    pub fn identity() -> Transform {
        Transform {
            matrix: WorldMatrix::identity(),
            inverse: WorldMatrix::identity(),
            inverse_transpose: WorldMatrix::identity(),
        }
    }

    pub fn new(matrix: WorldMatrix) -> Result<Transform, GeometryError> {
        let inverse = matrix
            .try_inverse()
            .ok_or(GeometryError::NotInvertible(matrix))?;
        Ok(Transform {
            matrix,
            inverse,
            inverse_transpose: inverse.transpose(),
        })
    }

    /// Object to parent space.
    pub fn matrix(&self) -> &WorldMatrix {
        &self.matrix
    }

    /// Parent to object space.
    pub fn inverse(&self) -> &WorldMatrix {
        &self.inverse
    }

    /// Maps normals from object to parent space.
    pub fn inverse_transpose(&self) -> &WorldMatrix {
        &self.inverse_transpose
    }

    /// Maps an object space normal to parent space, ignoring the homogeneous row.
    /// The result is not normalized.
    pub fn normal_to_parent(&self, normal: &WorldVector) -> WorldVector {
        self.inverse_transpose.fixed_view::<3, 3>(0, 0) * normal
    }
}

impl Default for Transform {
    fn default() -> Self {
        Transform::identity()
    }
}

pub fn translation(x: FloatType, y: FloatType, z: FloatType) -> WorldMatrix {
    WorldMatrix::new_translation(&WorldVector::new(x, y, z))
}

pub fn scaling(x: FloatType, y: FloatType, z: FloatType) -> WorldMatrix {
    WorldMatrix::new_nonuniform_scaling(&WorldVector::new(x, y, z))
}

#[rustfmt::skip]
pub fn rotation_x(angle: FloatType) -> WorldMatrix {
    let (s, c) = angle.sin_cos();
    WorldMatrix::new(
        1.0, 0.0, 0.0, 0.0,
        0.0,   c,  -s, 0.0,
        0.0,   s,   c, 0.0,
        0.0, 0.0, 0.0, 1.0,
    )
}

#[rustfmt::skip]
pub fn rotation_y(angle: FloatType) -> WorldMatrix {
    let (s, c) = angle.sin_cos();
    WorldMatrix::new(
          c, 0.0,   s, 0.0,
        0.0, 1.0, 0.0, 0.0,
         -s, 0.0,   c, 0.0,
        0.0, 0.0, 0.0, 1.0,
    )
}

#[rustfmt::skip]
pub fn rotation_z(angle: FloatType) -> WorldMatrix {
    let (s, c) = angle.sin_cos();
    WorldMatrix::new(
          c,  -s, 0.0, 0.0,
          s,   c, 0.0, 0.0,
        0.0, 0.0, 1.0, 0.0,
        0.0, 0.0, 0.0, 1.0,
    )
}

/// Each coordinate moves in proportion to the other two.
#[rustfmt::skip]
pub fn shearing(
    xy: FloatType,
    xz: FloatType,
    yx: FloatType,
    yz: FloatType,
    zx: FloatType,
    zy: FloatType,
) -> WorldMatrix {
    WorldMatrix::new(
        1.0,  xy,  xz, 0.0,
         yx, 1.0,  yz, 0.0,
         zx,  zy, 1.0, 0.0,
        0.0, 0.0, 0.0, 1.0,
    )
}

/// World to eye space transformation for an eye at `from` looking at `to`.
/// Eye space looks down the negative z axis.
#[rustfmt::skip]
pub fn view_transform(from: &WorldPoint, to: &WorldPoint, up: &WorldVector) -> WorldMatrix {
    let forward = (to - from).normalize();
    let left = forward.cross(&up.normalize());
    let true_up = left.cross(&forward);

    let orientation = WorldMatrix::new(
        left.x, left.y, left.z, 0.0,
        true_up.x, true_up.y, true_up.z, 0.0,
        -forward.x, -forward.y, -forward.z, 0.0,
        0.0, 0.0, 0.0, 1.0,
    );
    orientation * translation(-from.x, -from.y, -from.z)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::geometry::test::{point_approx_eq, vector_approx_eq};
    use assert2::{assert, let_assert};
    use std::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_2, FRAC_PI_4};

    #[test]
    fn translating_a_point() {
        let p = translation(5.0, -3.0, 2.0).transform_point(&WorldPoint::new(-3.0, 4.0, 5.0));
        assert!(p == WorldPoint::new(2.0, 1.0, 7.0));
    }

    #[test]
    fn translation_doesnt_move_vectors() {
        let v = WorldVector::new(-3.0, 4.0, 5.0);
        assert!(translation(5.0, -3.0, 2.0).transform_vector(&v) == v);
    }

    #[test]
    fn reflection_is_negative_scaling() {
        let p = scaling(-1.0, 1.0, 1.0).transform_point(&WorldPoint::new(2.0, 3.0, 4.0));
        assert!(p == WorldPoint::new(-2.0, 3.0, 4.0));
    }

    #[test]
    fn rotating_around_axes() {
        let p = WorldPoint::new(0.0, 1.0, 0.0);
        assert!(point_approx_eq(
            &rotation_x(FRAC_PI_4).transform_point(&p),
            &WorldPoint::new(0.0, FRAC_1_SQRT_2, FRAC_1_SQRT_2)
        ));
        assert!(point_approx_eq(
            &rotation_x(FRAC_PI_2).transform_point(&p),
            &WorldPoint::new(0.0, 0.0, 1.0)
        ));

        let p = WorldPoint::new(0.0, 0.0, 1.0);
        assert!(point_approx_eq(
            &rotation_y(FRAC_PI_2).transform_point(&p),
            &WorldPoint::new(1.0, 0.0, 0.0)
        ));

        let p = WorldPoint::new(0.0, 1.0, 0.0);
        assert!(point_approx_eq(
            &rotation_z(FRAC_PI_2).transform_point(&p),
            &WorldPoint::new(-1.0, 0.0, 0.0)
        ));
    }

    #[test]
    fn shearing_x_in_proportion_to_y() {
        let p = shearing(1.0, 0.0, 0.0, 0.0, 0.0, 0.0).transform_point(&WorldPoint::new(2.0, 3.0, 4.0));
        assert!(p == WorldPoint::new(5.0, 3.0, 4.0));
    }

    #[test]
    fn transform_caches_inverse() {
        let t = Transform::new(translation(1.0, 2.0, 3.0)).unwrap();
        let expected = translation(-1.0, -2.0, -3.0);
        assert!((t.inverse() - expected).amax() < 1e-12);
        assert!((t.inverse_transpose() - expected.transpose()).amax() < 1e-12);
    }

    #[test]
    fn normals_ignore_translation() {
        let t = Transform::new(translation(0.0, 1.0, 0.0)).unwrap();
        let n = WorldVector::new(0.0, FRAC_1_SQRT_2, -FRAC_1_SQRT_2);
        assert!(vector_approx_eq(&t.normal_to_parent(&n), &n));
    }

    #[test]
    fn normals_of_scaled_object() {
        let t = Transform::new(scaling(1.0, 0.5, 1.0) * rotation_z(std::f64::consts::PI / 5.0)).unwrap();
        let s = 2f64.sqrt() / 2.0;
        let local = t.inverse().transform_point(&WorldPoint::new(0.0, s, -s));
        let n = t.normal_to_parent(&local.coords).normalize();
        assert!(vector_approx_eq(&n, &WorldVector::new(0.0, 0.97014, -0.24254)));
    }

    #[test]
    fn singular_matrix_is_rejected() {
        let_assert!(Err(GeometryError::NotInvertible(_)) = Transform::new(scaling(1.0, 0.0, 1.0)));
    }

    #[test]
    fn default_view_orientation_is_identity() {
        let t = view_transform(
            &WorldPoint::origin(),
            &WorldPoint::new(0.0, 0.0, -1.0),
            &WorldVector::new(0.0, 1.0, 0.0),
        );
        assert!(t == WorldMatrix::identity());
    }

    #[test]
    fn looking_in_positive_z() {
        let t = view_transform(
            &WorldPoint::origin(),
            &WorldPoint::new(0.0, 0.0, 1.0),
            &WorldVector::new(0.0, 1.0, 0.0),
        );
        assert!(t == scaling(-1.0, 1.0, -1.0));
    }

    #[test]
    fn view_transform_moves_the_world() {
        let t = view_transform(
            &WorldPoint::new(0.0, 0.0, 8.0),
            &WorldPoint::origin(),
            &WorldVector::new(0.0, 1.0, 0.0),
        );
        assert!(t == translation(0.0, 0.0, -8.0));
    }

    #[test]
    fn arbitrary_view_transform() {
        let t = view_transform(
            &WorldPoint::new(1.0, 3.0, 2.0),
            &WorldPoint::new(4.0, -2.0, 8.0),
            &WorldVector::new(1.0, 1.0, 0.0),
        );
        let first_row = WorldVector::new(t[(0, 0)], t[(0, 1)], t[(0, 2)]);
        assert!(vector_approx_eq(
            &first_row,
            &WorldVector::new(-0.50709, 0.50709, 0.67612)
        ));
        let translation_column = WorldVector::new(t[(0, 3)], t[(1, 3)], t[(2, 3)]);
        assert!(vector_approx_eq(
            &translation_column,
            &WorldVector::new(-2.36643, -2.82843, 0.0)
        ));
    }
}
