use crate::{
    geometry::{BarycentricCoordinates, EPSILON, FloatType, Ray, WorldPoint, WorldVector, reflect},
    scene::{NodeIdx, SceneGraph},
};

/// Single ray hit.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Intersection {
    pub t: FloatType,
    pub object: NodeIdx,
    pub uv: Option<BarycentricCoordinates<FloatType>>,
}

/// Hits along a single ray, sorted by distance.
#[derive(Clone, Debug, Default)]
pub struct Intersections {
    entries: Vec<Intersection>,
}

impl Intersections {
    pub fn new() -> Intersections {
        Intersections::default()
    }

    /// Inserts a hit, keeping the list sorted. Hits with equal distance keep insertion order.
    pub fn add(&mut self, t: FloatType, object: NodeIdx, uv: Option<BarycentricCoordinates<FloatType>>) {
        let index = self.entries.partition_point(|e| e.t <= t);
        self.entries.insert(index, Intersection { t, object, uv });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Intersection> {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[Intersection] {
        &self.entries
    }

    /// Closest hit in front of the ray origin.
    pub fn hit(&self) -> Option<&Intersection> {
        self.hit_where(|_| true)
    }

    /// Closest hit in front of the ray origin that matches the predicate.
    pub fn hit_where(&self, mut predicate: impl FnMut(&Intersection) -> bool) -> Option<&Intersection> {
        self.entries.iter().find(|e| e.t >= 0.0 && predicate(e))
    }

    /// Computes the shading state of `hit`, which must be an element of this list.
    pub fn prepare(&self, hit: &Intersection, ray: &Ray, scene: &SceneGraph) -> IntersectionState {
        let point = ray.point_at(hit.t);
        let eye_vector = -ray.direction;
        let mut normal = scene.normal_at(hit.object, &point, hit.uv);
        let inside = eye_vector.dot(&normal) < 0.0;
        if inside {
            normal = -normal;
        }

        let (n1, n2) = self.refractive_indices(hit, scene);

        IntersectionState {
            t: hit.t,
            object: hit.object,
            point,
            eye_vector,
            normal,
            inside,
            reflect_vector: reflect(&ray.direction, &normal),
            over_point: point + normal * EPSILON,
            under_point: point - normal * EPSILON,
            n1,
            n2,
        }
    }

    /// Refractive indices of the materials on both sides of the hit.
    fn refractive_indices(&self, hit: &Intersection, scene: &SceneGraph) -> (FloatType, FloatType) {
        let index_of = |containers: &[NodeIdx]| {
            containers
                .last()
                .map_or(1.0, |object| scene.geometry(*object).material.refractive_index)
        };

        let mut containers: Vec<NodeIdx> = Vec::new();
        for entry in &self.entries {
            let n1 = index_of(&containers);

            match containers.iter().position(|object| *object == entry.object) {
                Some(position) => {
                    containers.remove(position);
                }
                None => containers.push(entry.object),
            }

            if std::ptr::eq(entry, hit) {
                return (n1, index_of(&containers));
            }
        }

        (1.0, 1.0)
    }
}

impl<'a> IntoIterator for &'a Intersections {
    type Item = &'a Intersection;
    type IntoIter = std::slice::Iter<'a, Intersection>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Everything needed to shade a single hit.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IntersectionState {
    pub t: FloatType,
    pub object: NodeIdx,
    pub point: WorldPoint,
    pub eye_vector: WorldVector,
    /// Unit normal facing the eye.
    pub normal: WorldVector,
    /// The ray started inside the object.
    pub inside: bool,
    pub reflect_vector: WorldVector,
    /// Point slightly above the surface, origin for shadow and reflection rays.
    pub over_point: WorldPoint,
    /// Point slightly below the surface, origin for refraction rays.
    pub under_point: WorldPoint,
    /// Refractive index of the material the ray comes from.
    pub n1: FloatType,
    /// Refractive index of the material the ray continues into.
    pub n2: FloatType,
}

impl IntersectionState {
    /// Schlick's approximation of the Fresnel reflectance.
    pub fn schlick(&self) -> FloatType {
        let mut cos = self.eye_vector.normalize().dot(&self.normal);

        if self.n1 > self.n2 {
            let n = self.n1 / self.n2;
            let sin2_t = n * n * (1.0 - cos * cos);
            if sin2_t > 1.0 {
                return 1.0;
            }
            cos = (1.0 - sin2_t).sqrt();
        }

        let r0 = ((self.n1 - self.n2) / (self.n1 + self.n2)).powi(2);
        r0 + (1.0 - r0) * (1.0 - cos).powi(5)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::geometry::test::{approx_eq, vector_approx_eq};
    use crate::geometry::{WorldMatrix, scaling, translation};
    use crate::scene::{DEFAULT_BVH_THRESHOLD, Geometry, SceneBuilder, primitives::{Plane, Sphere}};
    use crate::shading::Material;
    use assert2::{assert, let_assert};
    use std::f64::consts::FRAC_1_SQRT_2;
    use test_case::test_case;
    use test_strategy::proptest;

    fn idx(i: usize) -> NodeIdx {
        NodeIdx::from_usize(i)
    }

    fn glass_sphere() -> Geometry {
        Geometry::new(Sphere).with_material(
            Material::builder()
                .transparency(1.0)
                .refractive_index(1.5)
                .build(),
        )
    }

    fn single(geometry: Geometry, matrix: WorldMatrix) -> (SceneGraph, NodeIdx) {
        let mut builder = SceneBuilder::new();
        let s = builder.add_geometry(geometry, matrix).unwrap();
        (builder.build(DEFAULT_BVH_THRESHOLD), s)
    }

    #[test]
    fn all_positive() {
        let mut xs = Intersections::new();
        xs.add(1.0, idx(0), None);
        xs.add(2.0, idx(1), None);
        let_assert!(Some(hit) = xs.hit());
        assert!(hit.t == 1.0);
        assert!(hit.object == idx(0));
    }

    #[test]
    fn some_negative() {
        let mut xs = Intersections::new();
        xs.add(-1.0, idx(0), None);
        xs.add(1.0, idx(1), None);
        let_assert!(Some(hit) = xs.hit());
        assert!(hit.t == 1.0);
    }

    #[test]
    fn all_negative() {
        let mut xs = Intersections::new();
        xs.add(-2.0, idx(0), None);
        xs.add(-1.0, idx(1), None);
        assert!(xs.hit().is_none());
    }

    #[test]
    fn lowest_nonnegative_regardless_of_order() {
        let mut xs = Intersections::new();
        xs.add(5.0, idx(0), None);
        xs.add(7.0, idx(1), None);
        xs.add(-3.0, idx(2), None);
        xs.add(2.0, idx(3), None);
        let_assert!(Some(hit) = xs.hit());
        assert!(hit.object == idx(3));
    }

    #[test]
    fn equal_distances_keep_insertion_order() {
        let mut xs = Intersections::new();
        xs.add(1.0, idx(0), None);
        xs.add(1.0, idx(1), None);
        xs.add(0.5, idx(2), None);
        xs.add(1.0, idx(3), None);
        let objects: Vec<_> = xs.iter().map(|i| i.object.index()).collect();
        assert!(objects == vec![2, 0, 1, 3]);
    }

    #[test]
    fn hit_where_filters() {
        let mut xs = Intersections::new();
        xs.add(1.0, idx(0), None);
        xs.add(2.0, idx(1), None);
        let_assert!(Some(hit) = xs.hit_where(|i| i.object != idx(0)));
        assert!(hit.t == 2.0);
        assert!(xs.hit_where(|_| false).is_none());
    }

    #[proptest]
    fn ledger_stays_sorted(#[strategy(proptest::collection::vec(-100.0f64..100.0, 0..20))] ts: Vec<f64>) {
        let mut xs = Intersections::new();
        for (i, t) in ts.iter().enumerate() {
            xs.add(*t, idx(i), None);
            assert!(xs.as_slice().windows(2).all(|w| w[0].t <= w[1].t));
        }

        let expected = ts.iter().copied().filter(|t| *t >= 0.0).min_by(f64::total_cmp);
        assert!(xs.hit().map(|h| h.t) == expected);
    }

    #[test]
    fn precomputing_state() {
        let (scene, s) = single(Geometry::new(Sphere), WorldMatrix::identity());
        let r = Ray::new(WorldPoint::new(0.0, 0.0, -5.0), WorldVector::new(0.0, 0.0, 1.0));
        let mut xs = Intersections::new();
        xs.add(4.0, s, None);

        let comps = xs.prepare(&xs.as_slice()[0], &r, &scene);
        assert!(comps.t == 4.0);
        assert!(comps.object == s);
        assert!(comps.point == WorldPoint::new(0.0, 0.0, -1.0));
        assert!(comps.eye_vector == WorldVector::new(0.0, 0.0, -1.0));
        assert!(comps.normal == WorldVector::new(0.0, 0.0, -1.0));
        assert!(!comps.inside);
    }

    #[test]
    fn hit_from_inside() {
        let (scene, s) = single(Geometry::new(Sphere), WorldMatrix::identity());
        let r = Ray::new(WorldPoint::origin(), WorldVector::new(0.0, 0.0, 1.0));
        let mut xs = Intersections::new();
        xs.add(1.0, s, None);

        let comps = xs.prepare(&xs.as_slice()[0], &r, &scene);
        assert!(comps.point == WorldPoint::new(0.0, 0.0, 1.0));
        assert!(comps.eye_vector == WorldVector::new(0.0, 0.0, -1.0));
        assert!(comps.inside);
        assert!(comps.normal == WorldVector::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn over_point_is_above_surface() {
        let (scene, s) = single(Geometry::new(Sphere), translation(0.0, 0.0, 1.0));
        let r = Ray::new(WorldPoint::new(0.0, 0.0, -5.0), WorldVector::new(0.0, 0.0, 1.0));
        let mut xs = Intersections::new();
        xs.add(5.0, s, None);

        let comps = xs.prepare(&xs.as_slice()[0], &r, &scene);
        assert!(comps.over_point.z < -EPSILON / 2.0);
        assert!(comps.point.z > comps.over_point.z);
    }

    #[test]
    fn under_point_is_below_surface() {
        let (scene, s) = single(glass_sphere(), translation(0.0, 0.0, 1.0));
        let r = Ray::new(WorldPoint::new(0.0, 0.0, -5.0), WorldVector::new(0.0, 0.0, 1.0));
        let mut xs = Intersections::new();
        xs.add(5.0, s, None);

        let comps = xs.prepare(&xs.as_slice()[0], &r, &scene);
        assert!(comps.under_point.z > EPSILON / 2.0);
        assert!(comps.point.z < comps.under_point.z);
    }

    #[test]
    fn reflection_vector() {
        let (scene, s) = single(Geometry::new(Plane), WorldMatrix::identity());
        let r = Ray::new(
            WorldPoint::new(0.0, 1.0, -1.0),
            WorldVector::new(0.0, -FRAC_1_SQRT_2, FRAC_1_SQRT_2),
        );
        let mut xs = Intersections::new();
        xs.add(2f64.sqrt(), s, None);

        let comps = xs.prepare(&xs.as_slice()[0], &r, &scene);
        assert!(vector_approx_eq(
            &comps.reflect_vector,
            &WorldVector::new(0.0, FRAC_1_SQRT_2, FRAC_1_SQRT_2)
        ));
    }

    #[test_case(0, 1.0, 1.5)]
    #[test_case(1, 1.5, 2.0)]
    #[test_case(2, 2.0, 2.5)]
    #[test_case(3, 2.5, 2.5)]
    #[test_case(4, 2.5, 1.5)]
    #[test_case(5, 1.5, 1.0)]
    fn refractive_indices_at_various_hits(index: usize, n1: FloatType, n2: FloatType) {
        let glass = |refractive_index| {
            Geometry::new(Sphere).with_material(
                Material::builder()
                    .transparency(1.0)
                    .refractive_index(refractive_index)
                    .build(),
            )
        };
        let mut builder = SceneBuilder::new();
        let a = builder.add_geometry(glass(1.5), scaling(2.0, 2.0, 2.0)).unwrap();
        let b = builder.add_geometry(glass(2.0), translation(0.0, 0.0, -0.25)).unwrap();
        let c = builder.add_geometry(glass(2.5), translation(0.0, 0.0, 0.25)).unwrap();
        let scene = builder.build(DEFAULT_BVH_THRESHOLD);

        let r = Ray::new(WorldPoint::new(0.0, 0.0, -4.0), WorldVector::new(0.0, 0.0, 1.0));
        let mut xs = Intersections::new();
        for (t, object) in [(2.0, a), (2.75, b), (3.25, c), (4.75, b), (5.25, c), (6.0, a)] {
            xs.add(t, object, None);
        }

        let comps = xs.prepare(&xs.as_slice()[index], &r, &scene);
        assert!(comps.n1 == n1);
        assert!(comps.n2 == n2);
    }

    #[test]
    fn hit_is_identified_by_identity() {
        // Same object and distance twice, only the second one is the exit
        let (scene, s) = single(glass_sphere(), WorldMatrix::identity());
        let r = Ray::new(WorldPoint::new(0.0, 0.0, -1.0), WorldVector::new(1.0, 0.0, 0.0));
        let mut xs = Intersections::new();
        xs.add(0.0, s, None);
        xs.add(0.0, s, None);

        let enter = xs.prepare(&xs.as_slice()[0], &r, &scene);
        let exit = xs.prepare(&xs.as_slice()[1], &r, &scene);
        assert!((enter.n1, enter.n2) == (1.0, 1.5));
        assert!((exit.n1, exit.n2) == (1.5, 1.0));
    }

    fn glass_state(r: Ray, hits: &[FloatType], index: usize) -> IntersectionState {
        let (scene, s) = single(glass_sphere(), WorldMatrix::identity());
        let mut xs = Intersections::new();
        for t in hits {
            xs.add(*t, s, None);
        }
        xs.prepare(&xs.as_slice()[index], &r, &scene)
    }

    #[test]
    fn schlick_under_total_internal_reflection() {
        let r = Ray::new(
            WorldPoint::new(0.0, 0.0, FRAC_1_SQRT_2),
            WorldVector::new(0.0, 1.0, 0.0),
        );
        let comps = glass_state(r, &[-FRAC_1_SQRT_2, FRAC_1_SQRT_2], 1);
        assert!(comps.schlick() == 1.0);
    }

    #[test]
    fn schlick_with_perpendicular_ray() {
        let r = Ray::new(WorldPoint::origin(), WorldVector::new(0.0, 1.0, 0.0));
        let comps = glass_state(r, &[-1.0, 1.0], 1);
        assert!(approx_eq(comps.schlick(), 0.04));
    }

    #[test]
    fn schlick_with_small_angle() {
        let r = Ray::new(WorldPoint::new(0.0, 0.99, -2.0), WorldVector::new(0.0, 0.0, 1.0));
        let comps = glass_state(r, &[1.8589], 0);
        assert!(approx_eq(comps.schlick(), 0.48873));
    }
}
