//! Nodes of a partition tree.

use crate::config::ChopConfig;
use crate::float_types::Real;
use crate::obb::Obb;
use crate::part::Part;
use crate::plane::Plane;
use nalgebra::Vector3;

/// Index of a node in its tree's arena.
pub type NodeId = usize;

/// One sub-volume of the original part, with the cached geometric
/// descriptors the objectives are computed from.
#[derive(Debug, Clone)]
pub struct BspNode {
    /// The mesh fragment owned exclusively by this node.
    pub part: Part,
    /// Child indices from the root to this node; a stable cross-tree
    /// address, fixed at creation.
    pub path: Vec<usize>,
    /// Arena ids of the two children (0 = negative side, 1 = positive
    /// side), or empty for a leaf.
    pub children: Vec<NodeId>,
    /// The cut that produced this node's children, once split.
    pub plane: Option<Plane>,
    /// Estimated number of build volumes needed to enclose `part`.
    pub n_parts: u64,
    /// Oriented bounding box of `part`.
    pub obb: Obb,
    /// No further splitting required: the part fits the build volume.
    pub terminated: bool,
}

impl BspNode {
    pub fn new(part: Part, path: Vec<usize>, config: &ChopConfig) -> BspNode {
        let obb = part.obb();
        let n_parts = estimate_n_parts(&obb, &config.build_volume);
        BspNode {
            part,
            path,
            children: Vec::new(),
            plane: None,
            n_parts,
            obb,
            terminated: n_parts <= 1,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Whether this node's partition meaningfully differs from `other`'s.
    ///
    /// The two nodes are assumed to occupy the same path in two different
    /// trees. They differ when exactly one of them is split, or when both
    /// are split by non-coincident planes under the configured diversity
    /// tolerances. Two unsplit nodes never differ.
    pub fn different_from(&self, other: &BspNode, config: &ChopConfig) -> bool {
        if self.children.len() != other.children.len() {
            return true;
        }
        match (&self.plane, &other.plane) {
            (Some(a), Some(b)) => !a.coincident_with(
                b,
                config.diversity_angle_tolerance,
                config.diversity_offset_tolerance,
            ),
            (None, None) => false,
            _ => true,
        }
    }
}

/// How many build volumes it takes to enclose the box. Extents are paired
/// largest-to-largest, so the part may be reoriented freely in the printer.
fn estimate_n_parts(obb: &Obb, build_volume: &Vector3<Real>) -> u64 {
    let extents = obb.sorted_extents();
    let mut build = [build_volume.x, build_volume.y, build_volume.z];
    build.sort_by(|a, b| b.total_cmp(a));
    extents
        .iter()
        .zip(build)
        // Back off by a hair so an exact fit doesn't round up.
        .map(|(e, b)| ((e / b) - 1e-9).ceil().max(1.0) as u64)
        .product()
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    #[test]
    fn n_parts_counts_build_volumes() {
        let config = ChopConfig {
            build_volume: Vector3::new(80.0, 80.0, 80.0),
            ..ChopConfig::default()
        };
        let snug = BspNode::new(Part::cube(80.0), Vec::new(), &config);
        assert_eq!(snug.n_parts, 1);
        assert!(snug.terminated);

        let double = BspNode::new(
            Part::cuboid(Point3::origin(), Vector3::new(160.0, 80.0, 80.0)),
            Vec::new(),
            &config,
        );
        assert_eq!(double.n_parts, 2);
        assert!(!double.terminated);

        let quad = BspNode::new(
            Part::cuboid(Point3::origin(), Vector3::new(160.0, 90.0, 80.0)),
            Vec::new(),
            &config,
        );
        assert_eq!(quad.n_parts, 4);
    }
}
