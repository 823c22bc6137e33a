//! Binary space partitioning of a part against a build volume: candidate
//! plane generation, node splitting, tree expansion and the diversity
//! filter an outer search uses to keep its frontier varied.

mod node;
mod tree;

pub use node::{BspNode, NodeId};
pub use tree::{BspTree, Objectives};

use crate::config::ChopConfig;
use crate::float_types::Real;
use crate::part::Part;
use crate::plane::Plane;
use nalgebra::{Unit, Vector3};
use tracing::trace;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// All admissible cutting planes through `part` along `normal`, ordered by
/// increasing offset.
///
/// Offsets are laid out at `config.plane_spacing` over the part's projected
/// extent. The plane grazing the minimum of the extent is dropped (it would
/// cut off nothing), and the one at the maximum is never reached. With
/// `config.add_middle_plane`, one extra plane through the middle of the
/// extent is appended last, wherever it falls. The output is a pure
/// function of the inputs.
pub fn generate_planes(
    part: &Part,
    normal: &Vector3<Real>,
    config: &ChopConfig,
) -> Vec<Plane> {
    let normal = Unit::new_normalize(*normal).into_inner();

    let mut min = Real::MAX;
    let mut max = -Real::MAX;
    for v in part.vertices() {
        let d = normal.dot(&v.pos.coords);
        min = min.min(d);
        max = max.max(d);
    }
    if min > max {
        return Vec::new();
    }

    let mut planes = Vec::new();
    for step in 1.. {
        let d = min + step as Real * config.plane_spacing;
        if d >= max {
            break;
        }
        planes.push(Plane::from_normal(normal, d));
    }
    if config.add_middle_plane {
        planes.push(Plane::from_normal(normal, (min + max) / 2.0));
    }

    trace!(count = planes.len(), "generated candidate planes");
    planes
}

/// Expand `tree` at `path` with every candidate plane, keeping the
/// successful expansions. Rejected candidates are simply dropped, the way
/// a search driver consumes them; with the `parallel` feature candidates
/// are evaluated concurrently (each expansion owns its own tree copy).
pub fn expand_all(tree: &BspTree, path: &[usize], planes: &[Plane]) -> Vec<BspTree> {
    #[cfg(feature = "parallel")]
    {
        planes
            .par_iter()
            .filter_map(|plane| tree.expand_node(path, plane).ok())
            .collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        planes
            .iter()
            .filter_map(|plane| tree.expand_node(path, plane).ok())
            .collect()
    }
}

/// True when every tree in the set is fully terminated.
pub fn all_terminated(trees: &[BspTree]) -> bool {
    trees.iter().all(|tree| tree.terminated())
}

/// The trees still carrying at least one open leaf.
pub fn active_trees(trees: &[BspTree]) -> Vec<&BspTree> {
    trees.iter().filter(|tree| !tree.terminated()).collect()
}
