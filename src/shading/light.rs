use std::num::NonZeroU32;

use itertools::{Either, iproduct};

use crate::{
    geometry::{FloatType, WorldPoint, WorldVector},
    util::Colour,
    world::World,
};

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointLight {
    pub position: WorldPoint,
    pub intensity: Colour,
}

/// Rectangular light divided into a grid of cells, sampled at cell centres.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AreaLight {
    corner: WorldPoint,
    /// Edge of a single cell.
    uvec: WorldVector,
    usteps: NonZeroU32,
    vvec: WorldVector,
    vsteps: NonZeroU32,
    intensity: Colour,
}

impl AreaLight {
    /// `full_uvec` and `full_vvec` are the edges of the whole light.
    pub fn new(
        corner: WorldPoint,
        full_uvec: WorldVector,
        usteps: NonZeroU32,
        full_vvec: WorldVector,
        vsteps: NonZeroU32,
        intensity: Colour,
    ) -> AreaLight {
        AreaLight {
            corner,
            uvec: full_uvec / usteps.get() as FloatType,
            usteps,
            vvec: full_vvec / vsteps.get() as FloatType,
            vsteps,
            intensity,
        }
    }

    pub fn sample_count(&self) -> usize {
        self.usteps.get() as usize * self.vsteps.get() as usize
    }

    /// Centre of a single cell.
    pub fn point_on_light(&self, u: u32, v: u32) -> WorldPoint {
        self.corner + self.uvec * (u as FloatType + 0.5) + self.vvec * (v as FloatType + 0.5)
    }

    pub fn center(&self) -> WorldPoint {
        self.corner
            + self.uvec * (self.usteps.get() as FloatType / 2.0)
            + self.vvec * (self.vsteps.get() as FloatType / 2.0)
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Light {
    Point(PointLight),
    Area(AreaLight),
}

impl Light {
    pub fn intensity(&self) -> Colour {
        match self {
            Light::Point(light) => light.intensity,
            Light::Area(light) => light.intensity,
        }
    }

    /// Representative position of the light.
    pub fn position(&self) -> WorldPoint {
        match self {
            Light::Point(light) => light.position,
            Light::Area(light) => light.center(),
        }
    }

    /// Positions the light is sampled from.
    pub fn samples(&self) -> impl Iterator<Item = WorldPoint> + '_ {
        match self {
            Light::Point(light) => Either::Left(std::iter::once(light.position)),
            Light::Area(light) => Either::Right(
                iproduct!(0..light.vsteps.get(), 0..light.usteps.get())
                    .map(move |(v, u)| light.point_on_light(u, v)),
            ),
        }
    }

    /// Fraction of the light's samples visible from `point`.
    pub fn intensity_at(&self, point: &WorldPoint, world: &World) -> FloatType {
        let (visible, total) = self.samples().fold((0usize, 0usize), |(visible, total), sample| {
            if world.is_shadowed(point, &sample) {
                (visible, total + 1)
            } else {
                (visible + 1, total + 1)
            }
        });
        visible as FloatType / total as FloatType
    }
}
