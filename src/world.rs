use crate::{
    geometry::{Ray, WorldPoint},
    intersections::{IntersectionState, Intersections},
    scene::SceneGraph,
    shading::Light,
    util::{BLACK, Colour},
};

/// Everything needed to trace rays: the scene and the lights illuminating it.
#[derive(Clone, Debug, Default)]
pub struct World {
    pub scene: SceneGraph,
    pub lights: Vec<Light>,
}

impl World {
    pub fn new(scene: SceneGraph, lights: Vec<Light>) -> World {
        World { scene, lights }
    }

    /// All hits of a world space ray, sorted by distance.
    pub fn intersect(&self, ray: &Ray) -> Intersections {
        let mut intersections = Intersections::new();
        self.scene.intersect_all(ray, &mut intersections);
        intersections
    }

    /// Colour seen along the ray.
    /// `remaining` limits the number of reflection and refraction bounces.
    pub fn colour_at(&self, ray: &Ray, remaining: u32) -> Colour {
        let intersections = self.intersect(ray);
        match intersections.hit() {
            Some(hit) => {
                let state = intersections.prepare(hit, ray, &self.scene);
                self.shade_hit(&state, remaining)
            }
            None => BLACK,
        }
    }

    pub fn shade_hit(&self, state: &IntersectionState, remaining: u32) -> Colour {
        let material = &self.scene.geometry(state.object).material;

        let surface = self.lights.iter().fold(BLACK, |acc, light| {
            let intensity = light.intensity_at(&state.over_point, self);
            acc + material.lighting(
                light,
                &self.scene,
                state.object,
                &state.over_point,
                &state.eye_vector,
                &state.normal,
                intensity,
            )
        });

        let reflected = self.reflected_colour(state, remaining);
        let refracted = self.refracted_colour(state, remaining);

        if material.reflective > 0.0 && material.transparency > 0.0 {
            let reflectance = state.schlick();
            surface + reflected * reflectance + refracted * (1.0 - reflectance)
        } else {
            surface + reflected + refracted
        }
    }

    pub fn reflected_colour(&self, state: &IntersectionState, remaining: u32) -> Colour {
        let reflective = self.scene.geometry(state.object).material.reflective;
        if remaining == 0 || reflective == 0.0 {
            return BLACK;
        }

        let reflect_ray = Ray::new(state.over_point, state.reflect_vector);
        self.colour_at(&reflect_ray, remaining - 1) * reflective
    }

    pub fn refracted_colour(&self, state: &IntersectionState, remaining: u32) -> Colour {
        let transparency = self.scene.geometry(state.object).material.transparency;
        if remaining == 0 || transparency == 0.0 {
            return BLACK;
        }

        // Snell's law
        let n_ratio = state.n1 / state.n2;
        let cos_i = state.eye_vector.dot(&state.normal);
        let sin2_t = n_ratio * n_ratio * (1.0 - cos_i * cos_i);
        if sin2_t > 1.0 {
            // Total internal reflection
            return BLACK;
        }

        let cos_t = (1.0 - sin2_t).sqrt();
        let direction = state.normal * (n_ratio * cos_i - cos_t) - state.eye_vector * n_ratio;
        let refract_ray = Ray::new(state.under_point, direction);
        self.colour_at(&refract_ray, remaining - 1) * transparency
    }

    /// True if a shadow casting object lies between the point and the light.
    pub fn is_shadowed(&self, point: &WorldPoint, light_position: &WorldPoint) -> bool {
        let to_light = light_position - point;
        let distance = to_light.norm();
        let ray = Ray::new(*point, to_light / distance);

        let intersections = self.intersect(&ray);
        intersections
            .hit_where(|i| self.scene.geometry(i.object).casts_shadow)
            .is_some_and(|hit| hit.t < distance)
    }
}
