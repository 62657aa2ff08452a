mod bvh;
mod obj;
pub mod primitives;

use index_vec::IndexVec;
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    geometry::{
        BarycentricCoordinates, FloatType, GeometryError, Ray, Transform, WorldBox, WorldMatrix,
        WorldPoint, WorldVector,
    },
    intersections::Intersections,
    shading::Material,
};

pub use bvh::{BvhEntry, BvhNode, BvhStatistics};
pub use obj::ObjOpenError;
pub use primitives::{Primitive, Shape};

/// Groups with at most this many children are not subdivided.
pub const DEFAULT_BVH_THRESHOLD: usize = 4;

index_vec::define_index_type! {
    /// Handle of a node in the scene graph.
    pub struct NodeIdx = u32;
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SceneError {
    #[error("node {0:?} is not a group")]
    NotAGroup(NodeIdx),

    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

/// Renderable leaf of the scene graph.
#[derive(Clone, Debug, PartialEq)]
pub struct Geometry {
    pub shape: Shape,
    pub material: Material,
    pub casts_shadow: bool,
}

impl Geometry {
    pub fn new(shape: impl Into<Shape>) -> Geometry {
        Geometry {
            shape: shape.into(),
            material: Material::default(),
            casts_shadow: true,
        }
    }

    pub fn with_material(self, material: Material) -> Geometry {
        Geometry { material, ..self }
    }

    pub fn without_shadow(self) -> Geometry {
        Geometry {
            casts_shadow: false,
            ..self
        }
    }
}

#[derive(Clone, Debug)]
pub enum NodeKind {
    Geometry(Geometry),
    Group(BvhNode),
}

#[derive(Clone, Debug)]
pub struct Node {
    transform: Transform,
    parent: Option<NodeIdx>,
    /// Bounds of the node in its parent's space.
    bounds: WorldBox,
    kind: NodeKind,
}

impl Node {
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn parent(&self) -> Option<NodeIdx> {
        self.parent
    }

    pub fn bounds(&self) -> &WorldBox {
        &self.bounds
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }
}

#[derive(Clone, Debug)]
enum DraftKind {
    Geometry(Geometry),
    Group(Vec<NodeIdx>),
}

#[derive(Clone, Debug)]
struct Draft {
    transform: Transform,
    parent: Option<NodeIdx>,
    kind: DraftKind,
}

/// Mutable scene under construction.
#[derive(Clone, Debug, Default)]
pub struct SceneBuilder {
    nodes: IndexVec<NodeIdx, Draft>,
    roots: Vec<NodeIdx>,
}

impl SceneBuilder {
    pub fn new() -> SceneBuilder {
        SceneBuilder::default()
    }

    pub fn add_geometry(
        &mut self,
        geometry: Geometry,
        matrix: WorldMatrix,
    ) -> Result<NodeIdx, SceneError> {
        self.add_node(None, DraftKind::Geometry(geometry), matrix)
    }

    pub fn add_geometry_to(
        &mut self,
        group: NodeIdx,
        geometry: Geometry,
        matrix: WorldMatrix,
    ) -> Result<NodeIdx, SceneError> {
        self.add_node(Some(group), DraftKind::Geometry(geometry), matrix)
    }

    pub fn add_group(&mut self, matrix: WorldMatrix) -> Result<NodeIdx, SceneError> {
        self.add_node(None, DraftKind::Group(Vec::new()), matrix)
    }

    pub fn add_group_to(
        &mut self,
        group: NodeIdx,
        matrix: WorldMatrix,
    ) -> Result<NodeIdx, SceneError> {
        self.add_node(Some(group), DraftKind::Group(Vec::new()), matrix)
    }

    fn add_node(
        &mut self,
        parent: Option<NodeIdx>,
        kind: DraftKind,
        matrix: WorldMatrix,
    ) -> Result<NodeIdx, SceneError> {
        let transform = Transform::new(matrix)?;
        let idx = self.nodes.next_idx();

        match parent {
            Some(group) => match self.nodes.get_mut(group).map(|draft| &mut draft.kind) {
                Some(DraftKind::Group(children)) => children.push(idx),
                _ => return Err(SceneError::NotAGroup(group)),
            },
            None => self.roots.push(idx),
        }

        self.nodes.push(Draft {
            transform,
            parent,
            kind,
        });
        Ok(idx)
    }

    /// Computes node bounds and group hierarchies, freezing the scene.
    pub fn build(self, bvh_threshold: usize) -> SceneGraph {
        // Children are always added after their group, walking backwards visits them first.
        let mut bounds: IndexVec<NodeIdx, WorldBox> =
            index_vec::index_vec![WorldBox::empty(); self.nodes.len()];
        for idx in self.nodes.indices().rev() {
            let draft = &self.nodes[idx];
            let local_bounds = match &draft.kind {
                DraftKind::Geometry(geometry) => geometry.shape.bounds(),
                DraftKind::Group(children) => children
                    .iter()
                    .fold(WorldBox::empty(), |acc, child| acc.union(&bounds[*child])),
            };
            bounds[idx] = local_bounds.transform(draft.transform.matrix());
        }

        let nodes: IndexVec<NodeIdx, Node> = self
            .nodes
            .into_iter_enumerated()
            .map(|(idx, draft)| {
                let kind = match draft.kind {
                    DraftKind::Geometry(geometry) => NodeKind::Geometry(geometry),
                    DraftKind::Group(children) => {
                        let entries = children
                            .into_iter()
                            .map(|node| BvhEntry {
                                node,
                                bounds: bounds[node],
                            })
                            .collect();
                        let bvh = BvhNode::new(entries).build(bvh_threshold);
                        let stats = bvh.statistics();
                        debug!(
                            group = ?idx,
                            bvh_nodes = stats.node_count,
                            "BVH depth {}, leaf size {}",
                            stats.depth,
                            stats.leaf_size
                        );
                        NodeKind::Group(bvh)
                    }
                };
                Node {
                    transform: draft.transform,
                    parent: draft.parent,
                    bounds: bounds[idx],
                    kind,
                }
            })
            .collect();

        info!(nodes = nodes.len(), roots = self.roots.len(), "Scene built");

        SceneGraph {
            nodes,
            roots: self.roots,
        }
    }
}

/// Immutable scene graph.
#[derive(Clone, Debug, Default)]
pub struct SceneGraph {
    nodes: IndexVec<NodeIdx, Node>,
    roots: Vec<NodeIdx>,
}

impl SceneGraph {
    /// Nodes without parent.
    pub fn roots(&self) -> &[NodeIdx] {
        &self.roots
    }

    pub fn node(&self, idx: NodeIdx) -> &Node {
        &self.nodes[idx]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the geometry of a leaf node, panics for groups.
    /// Only geometry nodes ever end up in intersection lists.
    pub fn geometry(&self, idx: NodeIdx) -> &Geometry {
        match &self.nodes[idx].kind {
            NodeKind::Geometry(geometry) => geometry,
            NodeKind::Group(_) => unreachable!("{idx:?} is a group"),
        }
    }

    /// Records intersections of a ray given in the node's parent space with the node.
    pub fn intersect(&self, idx: NodeIdx, ray: &Ray, intersections: &mut Intersections) {
        let node = &self.nodes[idx];
        let local_ray = ray.transform(node.transform.inverse());

        match &node.kind {
            NodeKind::Geometry(geometry) => {
                for hit in geometry.shape.local_intersect(&local_ray) {
                    intersections.add(hit.t, idx, hit.uv);
                }
            }
            NodeKind::Group(bvh) => {
                bvh.for_each_candidate(&local_ray, &mut |child| {
                    self.intersect(child, &local_ray, intersections)
                });
            }
        }
    }

    /// Records intersections of a world space ray with all root nodes.
    pub fn intersect_all(&self, ray: &Ray, intersections: &mut Intersections) {
        for root in &self.roots {
            self.intersect(*root, ray, intersections);
        }
    }

    pub fn world_to_object(&self, idx: NodeIdx, point: &WorldPoint) -> WorldPoint {
        let node = &self.nodes[idx];
        let point = match node.parent {
            Some(parent) => self.world_to_object(parent, point),
            None => *point,
        };
        node.transform.inverse().transform_point(&point)
    }

    pub fn normal_to_world(&self, idx: NodeIdx, normal: &WorldVector) -> WorldVector {
        let node = &self.nodes[idx];
        let normal = node.transform.normal_to_parent(normal).normalize();
        match node.parent {
            Some(parent) => self.normal_to_world(parent, &normal),
            None => normal,
        }
    }

    /// Unit surface normal of a geometry node at a world space point.
    pub fn normal_at(
        &self,
        idx: NodeIdx,
        point: &WorldPoint,
        uv: Option<BarycentricCoordinates<FloatType>>,
    ) -> WorldVector {
        let local_point = self.world_to_object(idx, point);
        let local_normal = self.geometry(idx).shape.local_normal_at(&local_point, uv);
        self.normal_to_world(idx, &local_normal)
    }
}
