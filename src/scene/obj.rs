use std::{fs, path::Path};

use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    geometry::{WorldMatrix, WorldPoint, WorldVector},
    scene::{Geometry, NodeIdx, SceneBuilder, SceneError, primitives::TriangleFace},
    shading::Material,
};

#[derive(Error, Debug)]
pub enum ObjOpenError {
    #[error("Failed to read file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse file: {0}")]
    ParseError(#[from] wavefront_obj::ParseError),

    #[error("Failed to build scene: {0}")]
    Scene(#[from] SceneError),
}

impl SceneBuilder {
    /// Loads triangles from a Wavefront OBJ file into a new root group.
    /// Every object in the file becomes a child group.
    pub fn add_obj(
        &mut self,
        p: impl AsRef<Path>,
        material: &Material,
        matrix: WorldMatrix,
    ) -> Result<NodeIdx, ObjOpenError> {
        let content = fs::read_to_string(p)?;
        self.add_obj_source(content, material, matrix)
    }

    pub fn add_obj_source(
        &mut self,
        content: String,
        material: &Material,
        matrix: WorldMatrix,
    ) -> Result<NodeIdx, ObjOpenError> {
        let parsed = wavefront_obj::obj::parse(content)?;

        let group = self.add_group(matrix)?;
        for o in parsed.objects {
            let object_group = self.add_group_to(group, WorldMatrix::identity())?;
            let mut triangle_count = 0usize;

            for geometry in &o.geometry {
                for shape in &geometry.shapes {
                    let wavefront_obj::obj::Primitive::Triangle(a, b, c) = shape.primitive else {
                        warn!(object = %o.name, "non-triangle primitive!");
                        continue;
                    };

                    let position = |vtindex: (usize, Option<usize>, Option<usize>)| {
                        let v = &o.vertices[vtindex.0];
                        WorldPoint::new(v.x, v.y, v.z)
                    };
                    let normal = |vtindex: (usize, Option<usize>, Option<usize>)| {
                        vtindex.2.map(|i| {
                            let n = &o.normals[i];
                            WorldVector::new(n.x, n.y, n.z)
                        })
                    };

                    let face = match (normal(a), normal(b), normal(c)) {
                        (Some(na), Some(nb), Some(nc)) => TriangleFace::smooth(
                            position(a),
                            position(b),
                            position(c),
                            na,
                            nb,
                            nc,
                        ),
                        _ => TriangleFace::flat(position(a), position(b), position(c)),
                    };

                    self.add_geometry_to(
                        object_group,
                        Geometry::new(face).with_material(material.clone()),
                        WorldMatrix::identity(),
                    )?;
                    triangle_count += 1;
                }
            }

            debug!(object = %o.name, triangle_count, "Loaded OBJ object");
        }

        Ok(group)
    }
}
