use crate::{
    geometry::{Ray, RayIntersectionExt as _, WorldBox},
    scene::NodeIdx,
    util::Stats,
};

/// Child of a group together with its bounds in the group's space.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BvhEntry {
    pub node: NodeIdx,
    pub bounds: WorldBox,
}

/// Bounding volume hierarchy over the children of a group.
#[derive(Clone, Debug, Default)]
pub struct BvhNode {
    bounds: WorldBox,
    primitives: Vec<BvhEntry>,
    children: Vec<BvhNode>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BvhStatistics {
    pub node_count: usize,
    pub depth: Stats,
    pub leaf_size: Stats,
}

impl BvhNode {
    /// Leaf node holding all the entries.
    pub fn new(primitives: Vec<BvhEntry>) -> BvhNode {
        let bounds = primitives
            .iter()
            .fold(WorldBox::empty(), |acc, entry| acc.union(&entry.bounds));
        BvhNode {
            bounds,
            primitives,
            children: Vec::new(),
        }
    }

    pub fn bounds(&self) -> &WorldBox {
        &self.bounds
    }

    pub fn primitives(&self) -> &[BvhEntry] {
        &self.primitives
    }

    pub fn children(&self) -> &[BvhNode] {
        &self.children
    }

    /// Recursively splits nodes with more than `threshold` primitives.
    ///
    /// The cut is placed in the middle of the box around the bounded primitives.
    /// Primitives that fit completely into one half move to a new child, the rest
    /// (including unbounded ones) stays. If one of the halves would stay empty,
    /// the node remains a leaf.
    pub fn build(mut self, threshold: usize) -> BvhNode {
        if self.primitives.len() <= threshold {
            return self;
        }

        self.bounds = self
            .primitives
            .iter()
            .map(|entry| &entry.bounds)
            .chain(self.children.iter().map(|child| &child.bounds))
            .fold(WorldBox::empty(), |acc, b| acc.union(b));

        let split_bounds = self
            .primitives
            .iter()
            .filter(|entry| entry.bounds.is_finite())
            .fold(WorldBox::empty(), |acc, entry| acc.union(&entry.bounds));
        if split_bounds.is_empty() {
            return self;
        }
        let (left_box, right_box) = split_bounds.split();

        let mut left = Vec::new();
        let mut right = Vec::new();
        let mut stay = Vec::new();
        for entry in self.primitives.iter() {
            if !entry.bounds.is_finite() {
                stay.push(*entry);
            } else if left_box.contains_box(&entry.bounds) {
                left.push(*entry);
            } else if right_box.contains_box(&entry.bounds) {
                right.push(*entry);
            } else {
                stay.push(*entry);
            }
        }

        if left.is_empty() || right.is_empty() {
            return self;
        }

        self.primitives = stay;
        self.children.push(BvhNode::new(left).build(threshold));
        self.children.push(BvhNode::new(right).build(threshold));
        self
    }

    /// Calls `f` with every primitive whose ancestors' boxes are hit by the ray.
    /// The ray must be in the same space as the entry bounds.
    pub fn for_each_candidate<F: FnMut(NodeIdx)>(&self, ray: &Ray, f: &mut F) {
        if !self.bounds.hits(ray) {
            return;
        }

        for entry in &self.primitives {
            f(entry.node);
        }
        for child in &self.children {
            child.for_each_candidate(ray, f);
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn statistics(&self) -> BvhStatistics {
        BvhStatistics {
            node_count: self.node_count(),
            depth: self.depth_statistics_recursive(),
            leaf_size: self.leaf_size_statistics(),
        }
    }

    fn node_count(&self) -> usize {
        1 + self.children.iter().map(BvhNode::node_count).sum::<usize>()
    }

    fn depth_statistics_recursive(&self) -> Stats {
        if self.is_leaf() {
            return Stats::new_single(1);
        }

        self.children
            .iter()
            .map(BvhNode::depth_statistics_recursive)
            .fold(Stats::default(), |a, b| a.merge(&b))
            .offset(1)
    }

    fn leaf_size_statistics(&self) -> Stats {
        let mut stats = Stats::default();
        self.visit_leaves(&mut |leaf| stats.add_sample(leaf.primitives.len()));
        stats
    }

    fn visit_leaves(&self, f: &mut impl FnMut(&BvhNode)) {
        if self.is_leaf() {
            f(self);
        }
        for child in &self.children {
            child.visit_leaves(f);
        }
    }
}
