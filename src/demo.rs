//! Showcase scene used by the command line tool and the benchmarks.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_3, FRAC_PI_4, FRAC_PI_6, PI};
use std::num::NonZeroU32;

use tracing::debug;

use crate::{
    camera::{Camera, CameraError},
    geometry::{
        FloatType, ScreenSize, WorldMatrix, WorldPoint, WorldVector, rotation_x, rotation_y,
        rotation_z, scaling, translation, view_transform,
    },
    scene::{
        Geometry, SceneBuilder, SceneError,
        primitives::{Cone, Cube, Cylinder, Plane, Sphere},
    },
    shading::{AreaLight, Light, Material, Pattern, PatternKind, PointLight},
    util::{BLACK, Colour, WHITE},
    world::World,
};

/// Number of small spheres circling the centre piece.
const RING_SPHERES: usize = 16;

const AREA_LIGHT_STEPS: NonZeroU32 = NonZeroU32::new(2).unwrap();

fn grey(v: FloatType) -> Colour {
    Colour::new(v, v, v)
}

fn glass() -> Material {
    Material::builder()
        .colour(grey(0.05))
        .diffuse(0.1)
        .specular(1.0)
        .shininess(300.0)
        .reflective(0.9)
        .transparency(0.9)
        .refractive_index(1.5)
        .build()
}

/// Scene contents without lights, so that more objects can be added before building.
pub fn showcase_builder() -> Result<SceneBuilder, SceneError> {
    let mut builder = SceneBuilder::new();

    builder.add_geometry(
        Geometry::new(Plane).with_material(
            Material::builder()
                .pattern(Pattern::new(PatternKind::Checkers(grey(0.35), grey(0.65))))
                .specular(0.0)
                .reflective(0.15)
                .build(),
        ),
        WorldMatrix::identity(),
    )?;

    builder.add_geometry(
        Geometry::new(Plane).with_material(
            Material::builder()
                .pattern(
                    Pattern::new(PatternKind::Ring(Colour::new(0.55, 0.6, 0.75), grey(0.8)))
                        .with_transform(scaling(0.5, 0.5, 0.5))?,
                )
                .specular(0.0)
                .build(),
        ),
        translation(0.0, 0.0, 8.0) * rotation_x(FRAC_PI_2),
    )?;

    // Glass sphere with an air bubble
    builder.add_geometry(
        Geometry::new(Sphere).with_material(glass()),
        translation(0.0, 1.0, 0.5),
    )?;
    builder.add_geometry(
        Geometry::new(Sphere).with_material(Material {
            refractive_index: 1.0000034,
            ..glass()
        }),
        translation(0.0, 1.0, 0.5) * scaling(0.5, 0.5, 0.5),
    )?;

    builder.add_geometry(
        Geometry::new(Cube).with_material(
            Material::builder()
                .colour(grey(0.1))
                .diffuse(0.3)
                .reflective(0.8)
                .build(),
        ),
        translation(-2.6, 0.75, 2.0) * rotation_y(FRAC_PI_6) * scaling(0.75, 0.75, 0.75),
    )?;

    builder.add_geometry(
        Geometry::new(Cylinder {
            min: 0.0,
            max: 1.5,
            closed: true,
        })
        .with_material(
            Material::builder()
                .pattern(
                    Pattern::new(PatternKind::Stripe(Colour::new(0.8, 0.2, 0.1), WHITE))
                        .with_transform(scaling(0.2, 1.0, 1.0) * rotation_z(FRAC_PI_4))?,
                )
                .build(),
        ),
        translation(2.4, 0.0, 1.5) * scaling(0.6, 1.0, 0.6),
    )?;

    builder.add_geometry(
        Geometry::new(Cone {
            min: -1.0,
            max: 0.0,
            closed: true,
        })
        .with_material(
            Material::builder()
                .pattern(Pattern::new(PatternKind::Gradient(
                    Colour::new(0.9, 0.8, 0.1),
                    Colour::new(0.1, 0.5, 0.2),
                )))
                .build(),
        ),
        translation(1.3, 1.0, -1.2) * scaling(0.4, 1.0, 0.4),
    )?;

    // Ring of small spheres in a group, tilted as a whole
    let ring = builder.add_group(translation(0.0, 1.0, 0.5) * rotation_x(-FRAC_PI_3 / 4.0))?;
    for i in 0..RING_SPHERES {
        let angle = (i as FloatType) * 2.0 * PI / (RING_SPHERES as FloatType);
        let hue = (i as FloatType) / (RING_SPHERES as FloatType);
        builder.add_geometry_to(
            ring,
            Geometry::new(Sphere).with_material(
                Material::builder()
                    .colour(Colour::new(hue, 0.3, 1.0 - hue))
                    .reflective(0.1)
                    .build(),
            ),
            rotation_y(angle) * translation(1.6, 0.0, 0.0) * scaling(0.15, 0.15, 0.15),
        )?;
    }

    // Decorative shadowless marker
    builder.add_geometry(
        Geometry::new(Sphere)
            .with_material(Material::builder().colour(BLACK).ambient(1.0).build())
            .without_shadow(),
        translation(-1.0, 0.1, -1.5) * scaling(0.1, 0.1, 0.1),
    )?;

    debug!("Showcase scene assembled");
    Ok(builder)
}

pub fn showcase_lights() -> Vec<Light> {
    vec![
        Light::Area(AreaLight::new(
            WorldPoint::new(-6.0, 8.0, -6.0),
            WorldVector::new(2.0, 0.0, 0.0),
            AREA_LIGHT_STEPS,
            WorldVector::new(0.0, 2.0, 0.0),
            AREA_LIGHT_STEPS,
            grey(0.8),
        )),
        Light::Point(PointLight {
            position: WorldPoint::new(5.0, 6.0, -4.0),
            intensity: grey(0.3),
        }),
    ]
}

pub fn showcase_world(bvh_threshold: usize) -> Result<World, SceneError> {
    let scene = showcase_builder()?.build(bvh_threshold);
    Ok(World::new(scene, showcase_lights()))
}

pub fn showcase_camera(resolution: ScreenSize, field_of_view: FloatType) -> Result<Camera, CameraError> {
    Camera::builder()
        .resolution(resolution)
        .field_of_view(field_of_view)
        .transform(view_transform(
            &WorldPoint::new(0.0, 2.5, -6.5),
            &WorldPoint::new(0.0, 1.0, 0.0),
            &WorldVector::new(0.0, 1.0, 0.0),
        ))
        .build()
}
