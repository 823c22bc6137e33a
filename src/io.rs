//! Saving and replaying partition trees.
//!
//! A tree is persisted as the ordered list of cuts that produced it: one
//! record per split node, holding that node's path and the cutting plane's
//! origin and normal. Reconstruction replays the cuts against a freshly
//! built root tree, recomputing every derived descriptor along the way.

use crate::bsp::BspTree;
use crate::config::ChopConfig;
use crate::errors::TreeFileError;
use crate::float_types::Real;
use crate::part::Part;
use crate::plane::Plane;
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::sync::Arc;

/// One recorded cut: the path of the node that was split and the plane
/// that split it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub path: Vec<usize>,
    pub origin: [Real; 3],
    pub normal: [Real; 3],
}

/// The persisted form of a tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeRecord {
    pub nodes: Vec<NodeRecord>,
}

impl BspTree {
    /// Cut records in replayable order (parents always precede children).
    pub fn to_records(&self) -> TreeRecord {
        let nodes = self
            .nodes()
            .iter()
            .filter(|node| !node.is_leaf())
            .map(|node| {
                let plane = node
                    .plane
                    .as_ref()
                    .expect("split nodes always store their cutting plane");
                NodeRecord {
                    path: node.path.clone(),
                    origin: plane.origin().coords.into(),
                    normal: plane.normal().into(),
                }
            })
            .collect();
        TreeRecord { nodes }
    }

    /// Rebuild a tree by replaying `record` against a fresh root tree for
    /// `part`.
    pub fn from_records(
        part: Part,
        config: Arc<ChopConfig>,
        record: &TreeRecord,
    ) -> Result<BspTree, TreeFileError> {
        let mut tree = BspTree::new(part, config)?;
        for (index, cut) in record.nodes.iter().enumerate() {
            let plane = Plane::from_point_normal(
                Point3::from(Vector3::from(cut.origin)),
                Vector3::from(cut.normal),
            );
            tree = tree
                .expand_node(&cut.path, &plane)
                .map_err(|source| TreeFileError::Replay { index, source })?;
        }
        Ok(tree)
    }

    /// Write this tree's cut records as JSON.
    pub fn save(&self, writer: impl Write) -> Result<(), TreeFileError> {
        serde_json::to_writer_pretty(writer, &self.to_records())?;
        Ok(())
    }

    /// Read cut records as JSON and replay them against `part`.
    pub fn load(
        part: Part,
        config: Arc<ChopConfig>,
        reader: impl Read,
    ) -> Result<BspTree, TreeFileError> {
        let record: TreeRecord = serde_json::from_reader(reader)?;
        BspTree::from_records(part, config, &record)
    }
}
