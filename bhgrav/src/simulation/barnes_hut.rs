//! # Barnes–Hut Octree
//!
//! A transient spatial tree used to approximate gravitational interaction
//! between bodies in roughly `O(N log N)` per tick instead of the `O(N²)`
//! all-pairs sum.
//!
//! ## Core Concepts
//!
//! - The root covers a cuboid enclosing every body with a one-unit margin.
//! - A leaf holds at most one body. When a second body lands in an occupied
//!   leaf, the leaf splits into 8 equal octants (each extent halved) and both
//!   bodies are pushed down.
//! - Empty leaves are pruned once construction finishes.
//! - Mass and center of mass (COM) are aggregated bottom-up in one pass after
//!   construction, never incrementally during insertion.
//! - Force queries descend from the root and treat a node as a single point
//!   mass when `volume / r < theta`.
//!
//! Nodes live in an arena (`Octree::nodes`) and refer to their children by
//! index. There are no parent links.
//!
//! The tree stores body indices, not bodies. Every method that needs a
//! position or a mass takes the same `&[Body]` slice the tree was built from.

use crate::error::{Result, SimError};
use crate::simulation::states::{Body, NVec3};

/// Margin added beyond the min/max coordinate on each axis of the root.
pub const BOUNDS_MARGIN: f64 = 1.0;

/// Axis-aligned box `[origin, origin + extent)` on every axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cuboid {
    pub origin: NVec3,
    pub extent: NVec3,
}

impl Cuboid {
    pub fn new(origin: NVec3, extent: NVec3) -> Self {
        Self { origin, extent }
    }

    /// Smallest cuboid holding every body with [`BOUNDS_MARGIN`] to spare on
    /// each side, so no body ever sits exactly on a face.
    ///
    /// Returns `None` for an empty slice.
    pub fn enclosing(bodies: &[Body]) -> Option<Self> {
        if bodies.is_empty() {
            return None;
        }

        let mut min = NVec3::repeat(f64::INFINITY);
        let mut max = NVec3::repeat(f64::NEG_INFINITY);

        for b in bodies {
            min = min.inf(&b.x);
            max = max.sup(&b.x);
        }

        let origin = min.add_scalar(-BOUNDS_MARGIN);
        let extent = max.add_scalar(BOUNDS_MARGIN) - origin;
        Some(Self { origin, extent })
    }

    /// Half-open containment test on all three axes.
    pub fn contains(&self, p: &NVec3) -> bool {
        let hi = self.origin + self.extent;
        (0..3).all(|a| p[a] >= self.origin[a] && p[a] < hi[a])
    }

    /// `dx * dy * dz`, the node "size" used by the opening criterion.
    pub fn volume(&self) -> f64 {
        self.extent.x * self.extent.y * self.extent.z
    }

    pub fn center(&self) -> NVec3 {
        self.origin + self.extent * 0.5
    }

    /// The octant with the given index.
    ///
    /// Bit 0 selects the upper half along x, bit 1 along y, bit 2 along z.
    /// The child origin is offset by `{0, half}` on each axis.
    pub fn octant(&self, idx: usize) -> Self {
        let half = self.extent * 0.5;
        let mut origin = self.origin;
        for axis in 0..3 {
            if idx & (1 << axis) != 0 {
                origin[axis] += half[axis];
            }
        }
        Self { origin, extent: half }
    }

    /// Index of the octant whose half-open interval holds `p`.
    ///
    /// Assumes `self.contains(p)`; the split plane belongs to the upper half.
    pub fn octant_for(&self, p: &NVec3) -> usize {
        let center = self.center();
        let mut idx = 0;

        if p.x >= center.x { idx |= 1; } // bit 0
        if p.y >= center.y { idx |= 2; } // bit 1
        if p.z >= center.z { idx |= 4; } // bit 2

        idx
    }
}

/// A single octree node.
///
/// Exactly one of:
/// - empty leaf (`body_index = None`, no children)
/// - occupied leaf (`body_index = Some(i)`, no children)
/// - internal node (children present, `body_index = None`)
///
/// `mass` and `com` are only meaningful after [`Octree::aggregate_mass`].
#[derive(Debug, Clone)]
pub struct OctNode {
    pub bounds: Cuboid,
    pub depth: usize,
    pub mass: f64,
    pub com: NVec3,
    pub children: [Option<usize>; 8], // indices into Octree::nodes
    pub body_index: Option<usize>, // Some(i) if this leaf holds body i
}

impl OctNode {
    fn empty(bounds: Cuboid, depth: usize) -> Self {
        Self {
            bounds,
            depth,
            mass: 0.0,
            com: NVec3::zeros(),
            children: [None; 8],
            body_index: None,
        }
    }

    pub fn is_internal(&self) -> bool {
        self.children.iter().any(Option::is_some)
    }

    pub fn is_occupied_leaf(&self) -> bool {
        self.body_index.is_some()
    }

    pub fn is_empty_leaf(&self) -> bool {
        self.body_index.is_none() && !self.is_internal()
    }
}

/// Counters and result of one force query.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Traversal {
    pub force: NVec3,
    pub nodes_visited: usize,
    /// Occupied leaves that contributed an exact pairwise term.
    pub leaves_visited: usize,
    /// Internal nodes that were approximated as a point mass.
    pub approximated: usize,
}

/// Opening-angle settings shared by every force query of a tick.
#[derive(Debug, Clone, Copy)]
pub struct ForceQuery {
    pub grav: f64,
    pub theta: f64,
    pub min_distance: f64,
}

/// A Barnes–Hut octree over a slice of bodies.
#[derive(Debug, Clone)]
pub struct Octree {
    pub nodes: Vec<OctNode>,
    pub root: usize,
}

impl Octree {
    /// An empty tree: a single empty leaf covering `bounds`.
    pub fn new(bounds: Cuboid) -> Self {
        Self {
            nodes: vec![OctNode::empty(bounds, 0)],
            root: 0,
        }
    }

    /// Build a tree over `bounds` by inserting every body in input order.
    ///
    /// The result is unpruned and unaggregated; callers run [`Octree::prune`]
    /// and [`Octree::aggregate_mass`] before querying forces.
    pub fn build(bodies: &[Body], bounds: Cuboid, max_depth: usize) -> Result<Self> {
        let mut tree = Self::new(bounds);
        for i in 0..bodies.len() {
            tree.insert(i, bodies, max_depth)?;
        }
        Ok(tree)
    }

    /// Insert body `body_idx` starting at the root.
    pub fn insert(&mut self, body_idx: usize, bodies: &[Body], max_depth: usize) -> Result<()> {
        let b = &bodies[body_idx];
        if !self.nodes[self.root].bounds.contains(&b.x) {
            return Err(SimError::OutOfBounds { body: b.name.clone() });
        }
        self.insert_body(self.root, body_idx, bodies, max_depth)
    }

    /// Walk (and possibly split) the subtree under `node_idx` so that body
    /// `body_idx` ends up alone in a leaf.
    ///
    /// - Internal node: forward into the octant holding the body. A slot
    ///   removed by pruning is recreated on demand.
    /// - Occupied leaf: split into 8 children, re-insert the resident body,
    ///   clear it from this node, then forward the new body.
    /// - Empty leaf: store the body here.
    fn insert_body(&mut self, node_idx: usize, body_idx: usize, bodies: &[Body], max_depth: usize) -> Result<()> {
        // Snapshot by value so no borrow of self.nodes is live across recursion
        let bounds = self.nodes[node_idx].bounds;
        let depth = self.nodes[node_idx].depth;
        let resident = self.nodes[node_idx].body_index;

        if !self.nodes[node_idx].is_internal() {
            match resident {
                None => {
                    self.nodes[node_idx].body_index = Some(body_idx);
                    return Ok(());
                }
                Some(existing) => {
                    if depth >= max_depth {
                        return Err(SimError::UnboundedSubdivision {
                            depth: max_depth,
                            body: bodies[body_idx].name.clone(),
                        });
                    }
                    log::trace!("splitting node {} at depth {}", node_idx, depth);
                    self.subdivide(node_idx);
                    self.nodes[node_idx].body_index = None;
                    self.insert_body(node_idx, existing, bodies, max_depth)?;
                }
            }
        }

        let pos = bodies[body_idx].x;
        let octant = bounds.octant_for(&pos);
        let child_idx = match self.nodes[node_idx].children[octant] {
            Some(idx) => idx,
            None => {
                let new_idx = self.push_node(bounds.octant(octant), depth + 1);
                self.nodes[node_idx].children[octant] = Some(new_idx);
                new_idx
            }
        };

        if !self.nodes[child_idx].bounds.contains(&pos) {
            return Err(SimError::OutOfBounds { body: bodies[body_idx].name.clone() });
        }

        self.insert_body(child_idx, body_idx, bodies, max_depth)
    }

    /// Materialise all 8 octants of `node_idx` as empty leaves.
    fn subdivide(&mut self, node_idx: usize) {
        let bounds = self.nodes[node_idx].bounds;
        let depth = self.nodes[node_idx].depth;
        for octant in 0..8 {
            let child = self.push_node(bounds.octant(octant), depth + 1);
            self.nodes[node_idx].children[octant] = Some(child);
        }
    }

    fn push_node(&mut self, bounds: Cuboid, depth: usize) -> usize {
        self.nodes.push(OctNode::empty(bounds, depth));
        self.nodes.len() - 1
    }

    /// Detach every empty leaf from its parent.
    ///
    /// Detached nodes stay in the arena but are unreachable from the root.
    /// The root itself is never detached.
    pub fn prune(&mut self) {
        self.prune_node(self.root);
    }

    /// Returns true when nothing beneath `node_idx` holds a body.
    fn prune_node(&mut self, node_idx: usize) -> bool {
        let children = self.nodes[node_idx].children;
        for (slot, child) in children.iter().enumerate() {
            if let Some(c) = *child {
                if self.prune_node(c) {
                    self.nodes[node_idx].children[slot] = None;
                }
            }
        }
        self.nodes[node_idx].is_empty_leaf()
    }

    /// Bottom-up pass writing `mass` and `com` into every reachable node.
    ///
    /// Each COM axis is the mass-weighted sum over children of that same
    /// axis, divided by the node's total mass. Zero-mass children add nothing
    /// and a zero-mass node keeps a zero COM.
    ///
    /// Returns the root's `(mass, com)`.
    pub fn aggregate_mass(&mut self, bodies: &[Body]) -> (f64, NVec3) {
        self.aggregate_node(self.root, bodies)
    }

    fn aggregate_node(&mut self, node_idx: usize, bodies: &[Body]) -> (f64, NVec3) {
        let children = self.nodes[node_idx].children;
        let body_index = self.nodes[node_idx].body_index;

        let (mass, com) = if self.nodes[node_idx].is_internal() {
            let mut total = 0.0;
            let mut weighted = NVec3::zeros();
            for child in children.iter().flatten() {
                let (m, c) = self.aggregate_node(*child, bodies);
                if m > 0.0 {
                    total += m;
                    weighted += c * m;
                }
            }
            if total > 0.0 {
                (total, weighted / total)
            } else {
                (0.0, NVec3::zeros())
            }
        } else if let Some(bidx) = body_index {
            let b = &bodies[bidx];
            (b.mass(), b.x)
        } else {
            (0.0, NVec3::zeros())
        };

        let node = &mut self.nodes[node_idx];
        node.mass = mass;
        node.com = com;
        (mass, com)
    }

    /// Net approximate force on body `i` from everything in the tree.
    pub fn force_on_body(&self, i: usize, bodies: &[Body], q: &ForceQuery) -> Result<NVec3> {
        self.force_with_stats(i, bodies, q).map(|t| t.force)
    }

    /// Like [`Octree::force_on_body`], also reporting how much of the tree
    /// was visited.
    pub fn force_with_stats(&self, i: usize, bodies: &[Body], q: &ForceQuery) -> Result<Traversal> {
        let mut trav = Traversal::default();
        self.traverse_node(self.root, i, bodies, q, &mut trav)?;
        Ok(trav)
    }

    /// Opening-angle traversal for target body `target`.
    ///
    /// - Zero-mass node: no contribution.
    /// - Leaf holding the target: no contribution.
    /// - Occupied leaf, or `volume / r < theta` for a node not containing the
    ///   target: add `grav * m_target * m_node * delta / r^3`.
    /// - Otherwise descend into the children.
    fn traverse_node(&self, node_idx: usize, target: usize, bodies: &[Body], q: &ForceQuery, trav: &mut Traversal) -> Result<()> {
        let node = &self.nodes[node_idx];
        trav.nodes_visited += 1;

        if node.mass == 0.0 || node.body_index == Some(target) {
            return Ok(());
        }

        let body = &bodies[target];
        let delta = node.com - body.x;
        let r = delta.norm();

        let leaf = node.is_occupied_leaf();
        // A node containing the target would fold the target's own mass in.
        let far = !node.bounds.contains(&body.x) && node.bounds.volume() / r < q.theta;

        if leaf || far {
            if leaf {
                trav.leaves_visited += 1;
            } else {
                trav.approximated += 1;
            }
            trav.force += self.point_force(node, body, delta, r, bodies, q)?;
            return Ok(());
        }

        for child in node.children.iter().flatten() {
            self.traverse_node(*child, target, bodies, q, trav)?;
        }
        Ok(())
    }

    fn point_force(&self, node: &OctNode, body: &Body, delta: NVec3, r: f64, bodies: &[Body], q: &ForceQuery) -> Result<NVec3> {
        let degenerate = || SimError::DegenerateDistance {
            body: body.name.clone(),
            other: node
                .body_index
                .map(|b| bodies[b].name.clone())
                .unwrap_or_else(|| "<cluster>".to_string()),
            distance: r,
        };

        if r <= q.min_distance || r == 0.0 {
            return Err(degenerate());
        }

        let f = delta * (q.grav * body.mass() * node.mass / (r * r * r));
        if !(f.x.is_finite() && f.y.is_finite() && f.z.is_finite()) {
            return Err(degenerate());
        }
        Ok(f)
    }

    /// Body indices of every occupied leaf, depth-first in octant order.
    pub fn leaf_indices(&self) -> Vec<usize> {
        let mut out = Vec::new();
        self.collect_leaves(self.root, &mut out);
        out
    }

    fn collect_leaves(&self, node_idx: usize, out: &mut Vec<usize>) {
        let node = &self.nodes[node_idx];
        if let Some(b) = node.body_index {
            out.push(b);
        }
        for child in node.children.iter().flatten() {
            self.collect_leaves(*child, out);
        }
    }

    /// Clones of the bodies held by the tree, in leaf order.
    pub fn bodies(&self, bodies: &[Body]) -> Vec<Body> {
        self.leaf_indices().into_iter().map(|i| bodies[i].clone()).collect()
    }

    /// Indices of every node reachable from the root, pre-order.
    pub fn reachable(&self) -> Vec<usize> {
        let mut out = Vec::new();
        let mut stack = vec![self.root];
        while let Some(idx) = stack.pop() {
            out.push(idx);
            // reversed so octant 0 is visited first
            for child in self.nodes[idx].children.iter().rev().flatten() {
                stack.push(*child);
            }
        }
        out
    }
}
