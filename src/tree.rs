use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Type alias for tree node identifiers.
pub type NodeId = u32;

/// One decision-tree vertex as delivered by the training backend.
///
/// Split fields (`feature_name`, `threshold`, `left_child`, `right_child`)
/// are only meaningful when `is_leaf` is false; `class_label` only when it is
/// true. Statistics are carried through untouched, never computed here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeRecord {
    pub node_id: NodeId,
    #[serde(default)]
    pub feature_name: Option<String>,
    #[serde(default)]
    pub threshold: Option<f64>,
    #[serde(default)]
    pub left_child: Option<NodeId>,
    #[serde(default)]
    pub right_child: Option<NodeId>,
    pub is_leaf: bool,
    #[serde(default)]
    pub class_label: Option<String>,
    // Early payloads called this field "samples".
    #[serde(default, alias = "samples")]
    pub n_samples: u64,
    #[serde(default)]
    pub weighted_n_samples: Option<f64>,
    #[serde(default)]
    pub impurity: Option<f64>,
    #[serde(default)]
    pub value: Option<Vec<f64>>,
}

impl NodeRecord {
    /// Create an internal split node.
    pub fn split(
        node_id: NodeId,
        feature_name: impl Into<String>,
        threshold: f64,
        left_child: NodeId,
        right_child: NodeId,
    ) -> Self {
        Self {
            node_id,
            feature_name: Some(feature_name.into()),
            threshold: Some(threshold),
            left_child: Some(left_child),
            right_child: Some(right_child),
            is_leaf: false,
            class_label: None,
            n_samples: 0,
            weighted_n_samples: None,
            impurity: None,
            value: None,
        }
    }

    /// Create a leaf node.
    pub fn leaf(node_id: NodeId, class_label: impl Into<String>) -> Self {
        Self {
            node_id,
            feature_name: None,
            threshold: None,
            left_child: None,
            right_child: None,
            is_leaf: true,
            class_label: Some(class_label.into()),
            n_samples: 0,
            weighted_n_samples: None,
            impurity: None,
            value: None,
        }
    }

    pub fn with_samples(mut self, n_samples: u64) -> Self {
        self.n_samples = n_samples;
        self
    }
}

/// Fatal problems in the flat record set. Surfaced before any layout is
/// built; a tree that constructs successfully never fails downstream.
#[derive(Debug, Error)]
pub enum TreeDataError {
    #[error("duplicate node id {id} in input records")]
    DuplicateId { id: NodeId },
    #[error("no unambiguous root: {candidates} parentless node(s) among {nodes} records")]
    MissingRoot { candidates: usize, nodes: usize },
    #[error("node {parent} references unknown child {child}")]
    DanglingChild { parent: NodeId, child: NodeId },
    #[error("node {child} is referenced as a child by both {first} and {second}")]
    DuplicateChild {
        child: NodeId,
        first: NodeId,
        second: NodeId,
    },
    #[error("{count} node(s) not reachable from root {root}")]
    UnreachableNodes { root: NodeId, count: usize },
}

/// Parent- and child-indexed view over a flat node set.
///
/// Traversal is id-based throughout: callers hold the tree plus a `NodeId`,
/// never a live node reference. Rebuilt from records whenever the raw data
/// changes; downstream components never mutate it.
#[derive(Debug, Clone)]
pub struct DecisionTree {
    nodes: BTreeMap<NodeId, NodeRecord>,
    parents: BTreeMap<NodeId, NodeId>,
    root: NodeId,
}

impl DecisionTree {
    /// Index the records, identify the unique parentless root and validate
    /// child references. Records may arrive in any order.
    pub fn from_records(records: Vec<NodeRecord>) -> Result<Self, TreeDataError> {
        let mut nodes: BTreeMap<NodeId, NodeRecord> = BTreeMap::new();
        for record in records {
            let id = record.node_id;
            if nodes.insert(id, record).is_some() {
                return Err(TreeDataError::DuplicateId { id });
            }
        }

        let mut parents: BTreeMap<NodeId, NodeId> = BTreeMap::new();
        for (&id, node) in &nodes {
            for child in node.left_child.into_iter().chain(node.right_child) {
                if !nodes.contains_key(&child) {
                    return Err(TreeDataError::DanglingChild { parent: id, child });
                }
                if let Some(&first) = parents.get(&child) {
                    return Err(TreeDataError::DuplicateChild {
                        child,
                        first,
                        second: id,
                    });
                }
                parents.insert(child, id);
            }
        }

        let roots: Vec<NodeId> = nodes
            .keys()
            .copied()
            .filter(|id| !parents.contains_key(id))
            .collect();
        if roots.len() != 1 {
            return Err(TreeDataError::MissingRoot {
                candidates: roots.len(),
                nodes: nodes.len(),
            });
        }
        let root = roots[0];

        // Single-parent + unique-root still admits a cycle disjoint from the
        // root's component, so require full reachability.
        let mut seen: BTreeSet<NodeId> = BTreeSet::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            if !seen.insert(id) {
                continue;
            }
            if let Some(node) = nodes.get(&id) {
                stack.extend(node.left_child.into_iter().chain(node.right_child));
            }
        }
        if seen.len() != nodes.len() {
            return Err(TreeDataError::UnreachableNodes {
                root,
                count: nodes.len() - seen.len(),
            });
        }

        Ok(Self {
            nodes,
            parents,
            root,
        })
    }

    pub fn root_id(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> Option<&NodeRecord> {
        self.nodes.get(&id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.parents.get(&id).copied()
    }

    /// Children in left-then-right order; empty for leaves and unknown ids.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        let Some(node) = self.nodes.get(&id) else {
            return Vec::new();
        };
        node.left_child.into_iter().chain(node.right_child).collect()
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    /// Inclusive depth-first (preorder, left-first) descendant enumeration.
    pub fn descendant_ids(&self, id: NodeId) -> Vec<NodeId> {
        if !self.nodes.contains_key(&id) {
            return Vec::new();
        }
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            out.push(current);
            if let Some(node) = self.nodes.get(&current) {
                if let Some(right) = node.right_child {
                    stack.push(right);
                }
                if let Some(left) = node.left_child {
                    stack.push(left);
                }
            }
        }
        out
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
