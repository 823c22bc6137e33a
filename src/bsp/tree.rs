//! Partition trees and their multi-objective score.

use crate::bsp::node::{BspNode, NodeId};
use crate::config::{ChopConfig, ObjectiveWeights, UtilizationMode};
use crate::errors::{ConfigError, ExpandError};
use crate::float_types::Real;
use crate::part::Part;
use crate::plane::Plane;
use std::sync::Arc;
use tracing::{debug, trace};

/// Scalar components of the partition cost, computed over the current leaf
/// set. `connector`, `fragility`, `seam` and `symmetry` are owned by later
/// pipeline stages and stay 0 until those populate them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Objectives {
    /// Sum of leaf `n_parts`, normalized by the root's `n_parts`.
    pub nparts: Real,
    /// Worst wasted fraction of allotted build volume over all leaves.
    pub utilization: Real,
    pub connector: Real,
    pub fragility: Real,
    pub seam: Real,
    pub symmetry: Real,
}

impl Objectives {
    /// Weighted aggregate cost; lower is better.
    pub fn weighted(&self, weights: &ObjectiveWeights) -> Real {
        weights.part * self.nparts
            + weights.utilization * self.utilization
            + weights.connector * self.connector
            + weights.fragility * self.fragility
            + weights.seam * self.seam
            + weights.symmetry * self.symmetry
    }
}

/// A binary partition of one part into build-volume-sized fragments.
///
/// Nodes live in an append-only arena rooted at index 0; a node's `path`
/// (sequence of child indices) addresses it across trees. Expansion never
/// mutates the tree it starts from: [`BspTree::expand_node`] clones the
/// whole tree first, so any number of candidate futures can be explored
/// from the same ancestor without interference.
#[derive(Debug, Clone)]
pub struct BspTree {
    nodes: Vec<BspNode>,
    objectives: Objectives,
    config: Arc<ChopConfig>,
}

impl BspTree {
    /// Build the single-node tree for `part` and score it. Fails if the
    /// configuration cannot support objective computation.
    pub fn new(part: Part, config: Arc<ChopConfig>) -> Result<BspTree, ConfigError> {
        config.validate()?;
        let root = BspNode::new(part, Vec::new(), &config);
        let mut tree = BspTree {
            nodes: vec![root],
            objectives: Objectives {
                nparts: 0.0,
                utilization: 0.0,
                connector: 0.0,
                fragility: 0.0,
                seam: 0.0,
                symmetry: 0.0,
            },
            config,
        };
        tree.objectives = tree.compute_objectives();
        Ok(tree)
    }

    pub fn config(&self) -> &ChopConfig {
        &self.config
    }

    /// All nodes ever created in this tree, in creation order.
    pub fn nodes(&self) -> &[BspNode] {
        &self.nodes
    }

    pub fn root(&self) -> &BspNode {
        &self.nodes[0]
    }

    pub fn objectives(&self) -> &Objectives {
        &self.objectives
    }

    /// Mutable access for the stages that own the placeholder components.
    pub fn objectives_mut(&mut self) -> &mut Objectives {
        &mut self.objectives
    }

    /// Aggregate cost under the configured weights; lower is better.
    pub fn objective(&self) -> Real {
        self.objectives.weighted(&self.config.weights)
    }

    /// Resolve a path of child indices from the root.
    pub fn node_id_at(&self, path: &[usize]) -> Option<NodeId> {
        let mut id = 0;
        for &step in path {
            id = *self.nodes[id].children.get(step)?;
        }
        Some(id)
    }

    pub fn get_node(&self, path: &[usize]) -> Option<&BspNode> {
        self.node_id_at(path).map(|id| &self.nodes[id])
    }

    /// Current leaves; together they partition the original part's volume.
    pub fn leaves(&self) -> impl Iterator<Item = &BspNode> {
        self.nodes.iter().filter(|n| n.is_leaf())
    }

    /// True when no leaf needs further splitting.
    pub fn terminated(&self) -> bool {
        self.leaves().all(|leaf| leaf.terminated)
    }

    /// The leaf needing the most build volumes; ties broken by creation
    /// order.
    pub fn largest_part(&self) -> &BspNode {
        self.leaves()
            .max_by_key(|leaf| leaf.n_parts)
            .expect("a tree always has at least one leaf")
    }

    /// Split the leaf at `path` with `plane`, returning a new independent
    /// tree. `self` is never modified; on any failure the copy is discarded
    /// and only the error escapes.
    pub fn expand_node(&self, path: &[usize], plane: &Plane) -> Result<BspTree, ExpandError> {
        let mut tree = self.clone();
        let id = tree
            .node_id_at(path)
            .ok_or_else(|| ExpandError::InvalidPath(path.to_vec()))?;
        if tree.nodes[id].terminated {
            return Err(ExpandError::NodeTerminated(path.to_vec()));
        }
        if !tree.nodes[id].is_leaf() {
            return Err(ExpandError::NodeAlreadySplit(path.to_vec()));
        }

        let (negative, positive) = tree.nodes[id].part.bisect(plane).map_err(|rejection| {
            trace!(?path, %rejection, "cut rejected");
            ExpandError::Rejected(rejection)
        })?;

        let config = Arc::clone(&tree.config);
        let mut negative_path = tree.nodes[id].path.clone();
        let mut positive_path = negative_path.clone();
        negative_path.push(0);
        positive_path.push(1);

        let negative_id = tree.nodes.len();
        tree.nodes.push(BspNode::new(negative, negative_path, &config));
        let positive_id = tree.nodes.len();
        tree.nodes.push(BspNode::new(positive, positive_path, &config));

        let parent = &mut tree.nodes[id];
        parent.children = vec![negative_id, positive_id];
        parent.plane = Some(plane.clone());

        tree.objectives = tree.compute_objectives();
        debug!(?path, objective = tree.objective(), "expanded node");
        Ok(tree)
    }

    /// Whether this tree's node at `path` differs from `other`'s node at
    /// the same path. A path missing from `other` counts as different.
    pub fn different_from(&self, other: &BspTree, path: &[usize]) -> bool {
        let (Some(a), Some(b)) = (self.get_node(path), other.get_node(path)) else {
            return true;
        };
        a.different_from(b, &self.config)
    }

    /// Whether the node at `path` differs from the same-path node of
    /// *every* tree in `accepted`. A single close match rejects the
    /// candidate; an empty set trivially accepts it.
    pub fn sufficiently_different(&self, path: &[usize], accepted: &[BspTree]) -> bool {
        accepted.iter().all(|tree| self.different_from(tree, path))
    }

    fn compute_objectives(&self) -> Objectives {
        let root_parts = self.nodes[0].n_parts as Real;
        let capacity = self.config.build_volume_capacity();

        let mut total_parts = 0.0;
        let mut worst_waste: Real = 0.0;
        for leaf in self.leaves() {
            total_parts += leaf.n_parts as Real;
            let enclosed = match self.config.utilization_mode {
                UtilizationMode::Obb => leaf.obb.volume(),
                UtilizationMode::Mesh => leaf.part.volume(),
            };
            let waste = 1.0 - enclosed / (leaf.n_parts as Real * capacity);
            worst_waste = worst_waste.max(waste);
        }

        Objectives {
            nparts: total_parts / root_parts,
            utilization: worst_waste,
            connector: 0.0,
            fragility: 0.0,
            seam: 0.0,
            symmetry: 0.0,
        }
    }
}
