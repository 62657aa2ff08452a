use crate::geometry::{FloatType, Ray, WorldBox};

pub trait RayIntersectionExt {
    type DistanceType;
    /// Calculate first and last ray intersection with the box
    fn intersect(&self, ray: &Ray) -> (Self::DistanceType, Self::DistanceType);

    /// True if the ray's line passes through the box.
    fn hits(&self, ray: &Ray) -> bool;
}

impl RayIntersectionExt for WorldBox {
    type DistanceType = FloatType;

    /// Calculates ray intersection with the box.
    /// Returns minimum and maximum distance along the ray, ray intersects is min <= max.
    fn intersect(&self, ray: &Ray) -> (FloatType, FloatType) {
        // Componentwise distances along the ray to the box's min and max corners
        // The multiplication is NAN if the ray is starting inside the slab bounding plane
        // and is parallel to it. In this case we blend to +-infinity, so that the range becomes infinite
        let to_box_min = (self.min - ray.origin)
            .component_mul(&ray.inv_direction)
            .map(|x| if x.is_nan() { FloatType::NEG_INFINITY } else { x });
        let to_box_max = (self.max - ray.origin)
            .component_mul(&ray.inv_direction)
            .map(|x| if x.is_nan() { FloatType::INFINITY } else { x });

        // Correctly ordered (min_t <= max_t)
        let componentwise_min_t = to_box_min.zip_map(&to_box_max, |a, b| a.min(b));
        let componentwise_max_t = to_box_min.zip_map(&to_box_max, |a, b| a.max(b));

        (componentwise_min_t.max(), componentwise_max_t.min())
    }

    /// Boxes behind the ray origin count as hit too, callers filter by distance.
    fn hits(&self, ray: &Ray) -> bool {
        if self.is_empty() {
            return false;
        }
        let (min_t, max_t) = self.intersect(ray);
        min_t <= max_t
    }
}
