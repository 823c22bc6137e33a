//! Recursive build-volume partitioning of watertight solids.
//!
//! A part too large for a printer is chopped by candidate planes into a
//! binary tree of sub-parts, each of which must fit the configured build
//! volume. Partitioning is framed as a search: [`generate_planes`] proposes
//! cuts along a direction, [`BspTree::expand_node`] applies one cut to a
//! full copy of a tree (the original is never touched, so many alternative
//! futures of the same ancestor can be scored independently), a weighted
//! multi-objective cost ranks the results, and
//! [`BspTree::sufficiently_different`] prunes candidates that are
//! near-duplicates of already-accepted partitions.
//!
//! Mesh loading and repair, connector placement and the outer search loop
//! are deliberately out of scope; this crate is the partitioning core they
//! plug into.
//!
//! # Features
//! - **parallel**: evaluate candidate planes with rayon in [`bsp::expand_all`]

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod bsp;
pub mod config;
pub mod errors;
pub mod float_types;
pub mod io;
pub mod obb;
pub mod part;
pub mod plane;
pub mod polygon;
pub mod shapes;

pub use bsp::{BspNode, BspTree, Objectives, generate_planes};
pub use config::{ChopConfig, ObjectiveWeights, UtilizationMode};
pub use errors::{ConfigError, ExpandError, SplitRejection, TreeFileError};
pub use io::{NodeRecord, TreeRecord};
pub use obb::Obb;
pub use part::Part;
pub use plane::Plane;
pub use polygon::{Polygon, Vertex};
