use crate::{
    geometry::{GeometryError, Transform, WorldMatrix, WorldPoint},
    scene::{NodeIdx, SceneGraph},
    util::Colour,
};

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PatternKind {
    /// Alternates along x.
    Stripe(Colour, Colour),
    /// Linear blend along x, repeating every unit.
    Gradient(Colour, Colour),
    /// Concentric rings in the xz plane.
    Ring(Colour, Colour),
    /// 3D checkerboard of unit cubes.
    Checkers(Colour, Colour),
}

/// Procedural colour, evaluated in its own space relative to the object.
#[derive(Clone, Debug, PartialEq)]
pub struct Pattern {
    kind: PatternKind,
    transform: Transform,
}

fn is_even(x: f64) -> bool {
    x.floor().rem_euclid(2.0) == 0.0
}

impl Pattern {
    pub fn new(kind: PatternKind) -> Pattern {
        Pattern {
            kind,
            transform: Transform::identity(),
        }
    }

    pub fn with_transform(self, matrix: WorldMatrix) -> Result<Pattern, GeometryError> {
        Ok(Pattern {
            transform: Transform::new(matrix)?,
            ..self
        })
    }

    pub fn kind(&self) -> &PatternKind {
        &self.kind
    }

    /// Colour at a point in pattern space.
    pub fn colour_at(&self, point: &WorldPoint) -> Colour {
        match self.kind {
            PatternKind::Stripe(a, b) => {
                if is_even(point.x) {
                    a
                } else {
                    b
                }
            }
            PatternKind::Gradient(a, b) => a + (b - a) * (point.x - point.x.floor()),
            PatternKind::Ring(a, b) => {
                if is_even(point.x.hypot(point.z)) {
                    a
                } else {
                    b
                }
            }
            PatternKind::Checkers(a, b) => {
                if is_even(point.x.floor() + point.y.floor() + point.z.floor()) {
                    a
                } else {
                    b
                }
            }
        }
    }

    /// Colour at a world space point on the surface of `object`.
    pub fn colour_at_object(&self, scene: &SceneGraph, object: NodeIdx, point: &WorldPoint) -> Colour {
        let object_point = scene.world_to_object(object, point);
        let pattern_point = self.transform.inverse().transform_point(&object_point);
        self.colour_at(&pattern_point)
    }
}
