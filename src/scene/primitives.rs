use arrayvec::ArrayVec;

use crate::geometry::{
    BarycentricCoordinates, EPSILON, FloatType, Ray, Triangle, WorldBox, WorldPoint, WorldVector,
};

/// Single intersection in object space.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LocalHit {
    pub t: FloatType,
    pub uv: Option<BarycentricCoordinates<FloatType>>,
}

impl LocalHit {
    fn at(t: FloatType) -> LocalHit {
        LocalHit { t, uv: None }
    }
}

/// All intersections of a ray with a single primitive, unsorted.
pub type LocalHits = ArrayVec<LocalHit, 4>;

/// Shape in its own object space.
pub trait Primitive {
    /// Intersections of the (object space) ray with the shape, including the ones behind the origin.
    fn local_intersect(&self, ray: &Ray) -> LocalHits;

    /// Surface normal in object space. Not necessarily normalized.
    fn local_normal_at(
        &self,
        point: &WorldPoint,
        uv: Option<BarycentricCoordinates<FloatType>>,
    ) -> WorldVector;

    /// Object space bounds, possibly infinite.
    fn bounds(&self) -> WorldBox;
}

/// Unit sphere centered at the origin.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Sphere;

impl Primitive for Sphere {
    fn local_intersect(&self, ray: &Ray) -> LocalHits {
        let mut hits = LocalHits::new();

        let oc = ray.origin.coords;
        let a = ray.direction.dot(&ray.direction);
        let b = oc.dot(&ray.direction);
        let c = oc.dot(&oc) - 1.0;
        let discriminant = b * b - a * c;

        if discriminant < 0.0 {
            return hits;
        }

        let sqrt_disc = discriminant.sqrt();
        hits.push(LocalHit::at((-b - sqrt_disc) / a));
        hits.push(LocalHit::at((-b + sqrt_disc) / a));
        hits
    }

    fn local_normal_at(&self, point: &WorldPoint, _uv: Option<BarycentricCoordinates<FloatType>>) -> WorldVector {
        point.coords
    }

    fn bounds(&self) -> WorldBox {
        WorldBox::new(WorldPoint::new(-1.0, -1.0, -1.0), WorldPoint::new(1.0, 1.0, 1.0))
    }
}

/// The xz plane.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Plane;

impl Primitive for Plane {
    fn local_intersect(&self, ray: &Ray) -> LocalHits {
        let mut hits = LocalHits::new();
        if ray.direction.y.abs() >= EPSILON {
            hits.push(LocalHit::at(-ray.origin.y / ray.direction.y));
        }
        hits
    }

    fn local_normal_at(&self, _point: &WorldPoint, _uv: Option<BarycentricCoordinates<FloatType>>) -> WorldVector {
        WorldVector::new(0.0, 1.0, 0.0)
    }

    fn bounds(&self) -> WorldBox {
        WorldBox::new(
            WorldPoint::new(FloatType::NEG_INFINITY, 0.0, FloatType::NEG_INFINITY),
            WorldPoint::new(FloatType::INFINITY, 0.0, FloatType::INFINITY),
        )
    }
}

/// Axis aligned cube from -1 to 1.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Cube;

impl Cube {
    fn check_axis(origin: FloatType, direction: FloatType) -> (FloatType, FloatType) {
        let tmin_numerator = -1.0 - origin;
        let tmax_numerator = 1.0 - origin;

        let (tmin, tmax) = if direction.abs() >= EPSILON {
            (tmin_numerator / direction, tmax_numerator / direction)
        } else {
            (
                tmin_numerator.signum() * FloatType::INFINITY,
                tmax_numerator.signum() * FloatType::INFINITY,
            )
        };

        if tmin > tmax { (tmax, tmin) } else { (tmin, tmax) }
    }
}

impl Primitive for Cube {
    fn local_intersect(&self, ray: &Ray) -> LocalHits {
        let mut hits = LocalHits::new();

        let (xtmin, xtmax) = Self::check_axis(ray.origin.x, ray.direction.x);
        let (ytmin, ytmax) = Self::check_axis(ray.origin.y, ray.direction.y);
        let (ztmin, ztmax) = Self::check_axis(ray.origin.z, ray.direction.z);

        let tmin = xtmin.max(ytmin).max(ztmin);
        let tmax = xtmax.min(ytmax).min(ztmax);

        if tmin <= tmax {
            hits.push(LocalHit::at(tmin));
            hits.push(LocalHit::at(tmax));
        }
        hits
    }

    fn local_normal_at(&self, point: &WorldPoint, _uv: Option<BarycentricCoordinates<FloatType>>) -> WorldVector {
        let abs = point.coords.abs();
        let maxc = abs.max();

        if maxc == abs.x {
            WorldVector::new(point.x, 0.0, 0.0)
        } else if maxc == abs.y {
            WorldVector::new(0.0, point.y, 0.0)
        } else {
            WorldVector::new(0.0, 0.0, point.z)
        }
    }

    fn bounds(&self) -> WorldBox {
        Sphere.bounds()
    }
}

/// Radius 1 cylinder around the y axis, truncated to `min < y < max`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Cylinder {
    pub min: FloatType,
    pub max: FloatType,
    pub closed: bool,
}

impl Default for Cylinder {
    fn default() -> Self {
        Cylinder {
            min: FloatType::NEG_INFINITY,
            max: FloatType::INFINITY,
            closed: false,
        }
    }
}

impl Primitive for Cylinder {
    fn local_intersect(&self, ray: &Ray) -> LocalHits {
        let mut hits = LocalHits::new();

        let a = ray.direction.x.powi(2) + ray.direction.z.powi(2);
        if a.abs() >= EPSILON {
            let b = 2.0 * ray.origin.x * ray.direction.x + 2.0 * ray.origin.z * ray.direction.z;
            let c = ray.origin.x.powi(2) + ray.origin.z.powi(2) - 1.0;
            walls(ray, a, b, c, self.min, self.max, &mut hits);
        }

        if self.closed {
            caps(ray, self.min, self.max, |_| 1.0, &mut hits);
        }

        hits
    }

    fn local_normal_at(&self, point: &WorldPoint, _uv: Option<BarycentricCoordinates<FloatType>>) -> WorldVector {
        let dist = point.x.powi(2) + point.z.powi(2);

        if dist < 1.0 && point.y >= self.max - EPSILON {
            WorldVector::new(0.0, 1.0, 0.0)
        } else if dist < 1.0 && point.y <= self.min + EPSILON {
            WorldVector::new(0.0, -1.0, 0.0)
        } else {
            WorldVector::new(point.x, 0.0, point.z)
        }
    }

    fn bounds(&self) -> WorldBox {
        WorldBox::new(
            WorldPoint::new(-1.0, self.min, -1.0),
            WorldPoint::new(1.0, self.max, 1.0),
        )
    }
}

/// Double napped cone around the y axis, radius equal to |y|, truncated to `min < y < max`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Cone {
    pub min: FloatType,
    pub max: FloatType,
    pub closed: bool,
}

impl Default for Cone {
    fn default() -> Self {
        Cone {
            min: FloatType::NEG_INFINITY,
            max: FloatType::INFINITY,
            closed: false,
        }
    }
}

impl Primitive for Cone {
    fn local_intersect(&self, ray: &Ray) -> LocalHits {
        let mut hits = LocalHits::new();
        let (o, d) = (&ray.origin, &ray.direction);

        let a = d.x.powi(2) - d.y.powi(2) + d.z.powi(2);
        let b = 2.0 * o.x * d.x - 2.0 * o.y * d.y + 2.0 * o.z * d.z;
        let c = o.x.powi(2) - o.y.powi(2) + o.z.powi(2);

        if a.abs() >= EPSILON {
            walls(ray, a, b, c, self.min, self.max, &mut hits);
        } else if b.abs() >= EPSILON {
            // Ray parallel to one of the cone halves, hits the other one once
            let t = -c / (2.0 * b);
            let y = o.y + t * d.y;
            if self.min < y && y < self.max {
                hits.push(LocalHit::at(t));
            }
        }

        if self.closed {
            caps(ray, self.min, self.max, FloatType::abs, &mut hits);
        }

        hits
    }

    fn local_normal_at(&self, point: &WorldPoint, _uv: Option<BarycentricCoordinates<FloatType>>) -> WorldVector {
        let dist = point.x.powi(2) + point.z.powi(2);

        if dist < self.max.powi(2) && point.y >= self.max - EPSILON {
            WorldVector::new(0.0, 1.0, 0.0)
        } else if dist < self.min.powi(2) && point.y <= self.min + EPSILON {
            WorldVector::new(0.0, -1.0, 0.0)
        } else {
            let y = dist.sqrt();
            let y = if point.y > 0.0 { -y } else { y };
            WorldVector::new(point.x, y, point.z)
        }
    }

    fn bounds(&self) -> WorldBox {
        let limit = self.min.abs().max(self.max.abs());
        WorldBox::new(
            WorldPoint::new(-limit, self.min, -limit),
            WorldPoint::new(limit, self.max, limit),
        )
    }
}

/// Solves the quadric for the side walls of a cylinder or cone, keeping hits with `min < y < max`.
fn walls(
    ray: &Ray,
    a: FloatType,
    b: FloatType,
    c: FloatType,
    min: FloatType,
    max: FloatType,
    hits: &mut LocalHits,
) {
    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return;
    }

    let sqrt_disc = discriminant.sqrt();
    let t0 = (-b - sqrt_disc) / (2.0 * a);
    let t1 = (-b + sqrt_disc) / (2.0 * a);
    let (t0, t1) = if t0 > t1 { (t1, t0) } else { (t0, t1) };

    for t in [t0, t1] {
        let y = ray.origin.y + t * ray.direction.y;
        if min < y && y < max {
            hits.push(LocalHit::at(t));
        }
    }
}

/// Intersects the end caps at `y = min` and `y = max`, whose radius is given by `radius(y)`.
fn caps(
    ray: &Ray,
    min: FloatType,
    max: FloatType,
    radius: impl Fn(FloatType) -> FloatType,
    hits: &mut LocalHits,
) {
    if ray.direction.y.abs() < EPSILON {
        return;
    }

    for y in [min, max].into_iter().filter(|y| y.is_finite()) {
        let t = (y - ray.origin.y) / ray.direction.y;
        let x = ray.origin.x + t * ray.direction.x;
        let z = ray.origin.z + t * ray.direction.z;
        if x * x + z * z <= radius(y).powi(2) {
            hits.push(LocalHit::at(t));
        }
    }
}

/// Triangle with either a flat normal or per vertex normals interpolated across the face.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TriangleFace {
    vertices: Triangle<WorldPoint>,
    normal: WorldVector,
    vertex_normals: Option<Triangle<WorldVector>>,
}

impl TriangleFace {
    pub fn flat(p1: WorldPoint, p2: WorldPoint, p3: WorldPoint) -> TriangleFace {
        let vertices = Triangle::new(p1, p2, p3);
        let [e1, e2] = vertices.edges();
        TriangleFace {
            vertices,
            normal: e2.cross(&e1).normalize(),
            vertex_normals: None,
        }
    }

    pub fn smooth(
        p1: WorldPoint,
        p2: WorldPoint,
        p3: WorldPoint,
        n1: WorldVector,
        n2: WorldVector,
        n3: WorldVector,
    ) -> TriangleFace {
        TriangleFace {
            vertex_normals: Some(Triangle::new(n1, n2, n3)),
            ..TriangleFace::flat(p1, p2, p3)
        }
    }

    pub fn vertices(&self) -> &Triangle<WorldPoint> {
        &self.vertices
    }

    pub fn is_smooth(&self) -> bool {
        self.vertex_normals.is_some()
    }
}

impl Primitive for TriangleFace {
    fn local_intersect(&self, ray: &Ray) -> LocalHits {
        self.vertices
            .intersect(ray)
            .map(|(t, uv)| LocalHit { t, uv: Some(uv) })
            .into_iter()
            .collect()
    }

    fn local_normal_at(&self, _point: &WorldPoint, uv: Option<BarycentricCoordinates<FloatType>>) -> WorldVector {
        match (&self.vertex_normals, uv) {
            (Some(normals), Some(uv)) => uv.interpolate_triangle(normals),
            _ => self.normal,
        }
    }

    fn bounds(&self) -> WorldBox {
        WorldBox::from_points(self.vertices.iter())
    }
}

/// Every supported primitive.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Shape {
    Sphere(Sphere),
    Plane(Plane),
    Cube(Cube),
    Cylinder(Cylinder),
    Cone(Cone),
    Triangle(TriangleFace),
}

macro_rules! dispatch {
    ($self:ident, $shape:ident => $e:expr) => {
        match $self {
            Shape::Sphere($shape) => $e,
            Shape::Plane($shape) => $e,
            Shape::Cube($shape) => $e,
            Shape::Cylinder($shape) => $e,
            Shape::Cone($shape) => $e,
            Shape::Triangle($shape) => $e,
        }
    };
}

impl Primitive for Shape {
    fn local_intersect(&self, ray: &Ray) -> LocalHits {
        dispatch!(self, s => s.local_intersect(ray))
    }

    fn local_normal_at(&self, point: &WorldPoint, uv: Option<BarycentricCoordinates<FloatType>>) -> WorldVector {
        dispatch!(self, s => s.local_normal_at(point, uv))
    }

    fn bounds(&self) -> WorldBox {
        dispatch!(self, s => s.bounds())
    }
}

macro_rules! shape_from {
    ($($variant:ident($t:ty)),*) => {
        $(
            impl From<$t> for Shape {
                fn from(value: $t) -> Shape {
                    Shape::$variant(value)
                }
            }
        )*
    };
}

shape_from!(
    Sphere(Sphere),
    Plane(Plane),
    Cube(Cube),
    Cylinder(Cylinder),
    Cone(Cone),
    Triangle(TriangleFace)
);
