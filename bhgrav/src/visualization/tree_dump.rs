//! Human-readable octree dump for debugging.
//!
//! One line per node, indented with a tab per level. The format has no
//! compatibility contract.

use std::fmt;

use crate::simulation::barnes_hut::{OctNode, Octree};
use crate::simulation::states::Body;

pub struct TreeDump<'a> {
    pub tree: &'a Octree,
    pub bodies: &'a [Body],
}

impl<'a> TreeDump<'a> {
    pub fn new(tree: &'a Octree, bodies: &'a [Body]) -> Self {
        Self { tree, bodies }
    }

    fn write_node(&self, f: &mut fmt::Formatter<'_>, node_idx: usize, indent: usize) -> fmt::Result {
        let node = &self.tree.nodes[node_idx];
        let tabs = "\t".repeat(indent);
        let (o, e) = (node.bounds.origin, node.bounds.extent);

        if node.is_empty_leaf() {
            writeln!(f, "{tabs}Node: EMPTY {}+{}, {}+{}, {}+{}", o.x, e.x, o.y, e.y, o.z, e.z)?;
            return Ok(());
        }

        write!(
            f,
            "{tabs}Node: {} mass={} x={}+{} y={}+{} z={}+{}",
            self.label(node),
            node.mass,
            o.x,
            e.x,
            o.y,
            e.y,
            o.z,
            e.z
        )?;
        if let Some(b) = node.body_index.map(|i| &self.bodies[i]) {
            write!(f, " - Body: mass={} x={} y={} z={}", b.mass(), b.x.x, b.x.y, b.x.z)?;
        }
        writeln!(f)?;

        for child in node.children.iter().flatten() {
            self.write_node(f, *child, indent + 1)?;
        }
        Ok(())
    }

    fn label(&self, node: &OctNode) -> &str {
        node.body_index.map_or("-", |i| self.bodies[i].name.as_str())
    }
}

impl fmt::Display for TreeDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_node(f, self.tree.root, 0)
    }
}
