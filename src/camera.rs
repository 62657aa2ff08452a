use bon::bon;
use thiserror::Error;

use crate::geometry::{
    FloatType, GeometryError, Ray, ScreenPoint, ScreenSize, Transform, WorldMatrix, WorldPoint,
};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CameraError {
    #[error("Camera resolution must be non-zero, got {0:?}")]
    EmptyResolution(ScreenSize),
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

/// Pinhole camera looking down -z in its own space, with the canvas one unit in front of it.
#[derive(Clone, Debug)]
pub struct Camera {
    resolution: ScreenSize,
    field_of_view: FloatType,
    transform: Transform,

    half_width: FloatType,
    half_height: FloatType,
    /// Size of a pixel on the canvas
    pixel_size: FloatType,
}

#[bon]
impl Camera {
    /// `transform` is the view transform, mapping world space to camera space.
    #[builder]
    pub fn new(
        resolution: ScreenSize,
        field_of_view: FloatType,
        #[builder(default = WorldMatrix::identity())] transform: WorldMatrix,
    ) -> Result<Self, CameraError> {
        if resolution.x == 0 || resolution.y == 0 {
            return Err(CameraError::EmptyResolution(resolution));
        }

        let half_view = (field_of_view / 2.0).tan();
        let aspect = resolution.x as FloatType / resolution.y as FloatType;
        let (half_width, half_height) = if aspect >= 1.0 {
            (half_view, half_view / aspect)
        } else {
            (half_view * aspect, half_view)
        };

        Ok(Camera {
            resolution,
            field_of_view,
            transform: Transform::new(transform)?,
            half_width,
            half_height,
            pixel_size: half_width * 2.0 / resolution.x as FloatType,
        })
    }
}

impl Camera {
    pub fn resolution(&self) -> ScreenSize {
        self.resolution
    }

    pub fn field_of_view(&self) -> FloatType {
        self.field_of_view
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn pixel_size(&self) -> FloatType {
        self.pixel_size
    }

    /// World space ray through the centre of the pixel.
    pub fn ray_for_pixel(&self, pixel: &ScreenPoint) -> Ray {
        let x_offset = (pixel.x as FloatType + 0.5) * self.pixel_size;
        let y_offset = (pixel.y as FloatType + 0.5) * self.pixel_size;

        let world_x = self.half_width - x_offset;
        let world_y = self.half_height - y_offset;

        let inverse = self.transform.inverse();
        let target = inverse.transform_point(&WorldPoint::new(world_x, world_y, -1.0));
        let origin = inverse.transform_point(&WorldPoint::origin());

        Ray::new(origin, (target - origin).normalize())
    }
}
