use crate::instance::Instance;
use crate::tree::{DecisionTree, NodeId};

/// Ordered node ids from the root toward a leaf.
///
/// `truncated` is set when tracing stopped before a leaf because the
/// instance lacked a feature value (or the tree carried a malformed split).
/// A truncated path is a warning condition, not an error: layout treats
/// everything beyond the truncation point as off-path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TracedPath {
    pub nodes: Vec<NodeId>,
    pub truncated: bool,
}

impl TracedPath {
    /// A path with no nodes at all, i.e. no instance was traced.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        !self.truncated && !self.nodes.is_empty()
    }

    /// The reached leaf, if tracing made it all the way down.
    pub fn leaf_id(&self) -> Option<NodeId> {
        if self.is_complete() {
            self.nodes.last().copied()
        } else {
            None
        }
    }
}

/// Walk the tree from the root, descending left when
/// `value <= threshold` and right otherwise. Single forward pass, no
/// backtracking; the same inputs always produce the same path.
pub fn trace_instance_path(tree: &DecisionTree, instance: &Instance) -> TracedPath {
    let mut nodes = Vec::new();
    let mut current = tree.root_id();

    loop {
        let Some(node) = tree.node(current) else {
            // Unreachable for a validated tree; bail out rather than loop.
            return TracedPath {
                nodes,
                truncated: true,
            };
        };

        nodes.push(current);
        if node.is_leaf {
            return TracedPath {
                nodes,
                truncated: false,
            };
        }

        let (Some(feature), Some(threshold)) = (node.feature_name.as_deref(), node.threshold)
        else {
            log::warn!("split node {current} has no feature/threshold; truncating path");
            return TracedPath {
                nodes,
                truncated: true,
            };
        };
        let Some(value) = instance.value(feature) else {
            log::warn!("instance is missing feature {feature:?} at node {current}; truncating path");
            return TracedPath {
                nodes,
                truncated: true,
            };
        };

        let next = if value <= threshold {
            node.left_child
        } else {
            node.right_child
        };
        let Some(next) = next else {
            log::warn!("split node {current} has no child on the taken side; truncating path");
            return TracedPath {
                nodes,
                truncated: true,
            };
        };
        current = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::NodeRecord;

    fn tiny_tree() -> DecisionTree {
        DecisionTree::from_records(vec![
            NodeRecord::split(0, "x", 5.0, 1, 2),
            NodeRecord::leaf(1, "A"),
            NodeRecord::leaf(2, "B"),
        ])
        .unwrap()
    }

    #[test]
    fn descends_left_on_equal() {
        let tree = tiny_tree();
        let path = trace_instance_path(&tree, &Instance::from_iter([("x", 5.0)]));
        assert_eq!(path.nodes, vec![0, 1]);
        assert!(path.is_complete());
        assert_eq!(path.leaf_id(), Some(1));
    }

    #[test]
    fn descends_right_above_threshold() {
        let tree = tiny_tree();
        let path = trace_instance_path(&tree, &Instance::from_iter([("x", 5.1)]));
        assert_eq!(path.nodes, vec![0, 2]);
        assert!(path.is_complete());
    }

    #[test]
    fn truncates_on_missing_root_feature() {
        let tree = tiny_tree();
        let path = trace_instance_path(&tree, &Instance::new());
        assert_eq!(path.nodes, vec![0]);
        assert!(path.truncated);
        assert!(!path.is_complete());
        assert_eq!(path.leaf_id(), None);
    }

    #[test]
    fn truncates_mid_tree() {
        let tree = DecisionTree::from_records(vec![
            NodeRecord::split(0, "x", 5.0, 1, 2),
            NodeRecord::split(1, "y", 0.5, 3, 4),
            NodeRecord::leaf(2, "B"),
            NodeRecord::leaf(3, "A"),
            NodeRecord::leaf(4, "B"),
        ])
        .unwrap();
        let path = trace_instance_path(&tree, &Instance::from_iter([("x", 3.0)]));
        assert_eq!(path.nodes, vec![0, 1]);
        assert!(path.truncated);
    }

    #[test]
    fn tracing_is_deterministic() {
        let tree = tiny_tree();
        let instance = Instance::from_iter([("x", 4.2)]);
        let first = trace_instance_path(&tree, &instance);
        let second = trace_instance_path(&tree, &instance);
        assert_eq!(first, second);
    }
}
