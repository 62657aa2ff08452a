use bon::Builder;

use crate::{
    geometry::{FloatType, WorldPoint, WorldVector, reflect},
    scene::{NodeIdx, SceneGraph},
    shading::{Light, Pattern},
    util::{BLACK, Colour, WHITE, hadamard},
};

/// Phong surface description, extended with reflection and refraction.
#[derive(Builder, Clone, Debug, PartialEq)]
pub struct Material {
    #[builder(default = WHITE)]
    pub colour: Colour,
    /// Overrides `colour` when present.
    pub pattern: Option<Pattern>,
    #[builder(default = 0.1)]
    pub ambient: FloatType,
    #[builder(default = 0.9)]
    pub diffuse: FloatType,
    #[builder(default = 0.9)]
    pub specular: FloatType,
    #[builder(default = 200.0)]
    pub shininess: FloatType,
    #[builder(default = 0.0)]
    pub reflective: FloatType,
    #[builder(default = 0.0)]
    pub transparency: FloatType,
    #[builder(default = 1.0)]
    pub refractive_index: FloatType,
}

impl Default for Material {
    fn default() -> Self {
        Material::builder().build()
    }
}

impl Material {
    /// Surface colour of `object` at a world space point, before lighting.
    pub fn colour_at(&self, scene: &SceneGraph, object: NodeIdx, point: &WorldPoint) -> Colour {
        match &self.pattern {
            Some(pattern) => pattern.colour_at_object(scene, object, point),
            None => self.colour,
        }
    }

    /// Phong lighting averaged over the light's samples.
    /// `intensity` is the unshadowed fraction of the light, scaling everything but the ambient term.
    #[allow(clippy::too_many_arguments)]
    pub fn lighting(
        &self,
        light: &Light,
        scene: &SceneGraph,
        object: NodeIdx,
        point: &WorldPoint,
        eye: &WorldVector,
        normal: &WorldVector,
        intensity: FloatType,
    ) -> Colour {
        let effective_colour = hadamard(self.colour_at(scene, object, point), light.intensity());
        let ambient = effective_colour * self.ambient;

        let mut sum = BLACK;
        let mut sample_count = 0usize;
        for sample in light.samples() {
            sample_count += 1;

            let light_vector = (sample - point).normalize();
            let light_dot_normal = light_vector.dot(normal);
            if light_dot_normal < 0.0 {
                // Light on the other side of the surface
                continue;
            }

            let diffuse = effective_colour * (self.diffuse * light_dot_normal);

            let reflect_dot_eye = reflect(&-light_vector, normal).dot(eye);
            let specular = if reflect_dot_eye <= 0.0 {
                BLACK
            } else {
                light.intensity() * (self.specular * reflect_dot_eye.powf(self.shininess))
            };

            sum = sum + diffuse + specular;
        }

        if sample_count == 0 {
            return ambient;
        }
        ambient + sum * (intensity / sample_count as FloatType)
    }
}
