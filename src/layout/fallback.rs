use std::collections::BTreeMap;

use crate::config::LayoutConfig;
use crate::tree::{DecisionTree, NodeId};

use super::NodePosition;

/// Conventional balanced layout used when no instance path is available:
/// leaves claim successive horizontal slots, parents sit centered over
/// their children, depth maps to y. Sibling separation ends up
/// proportional to leaf counts, so subtrees never overlap.
pub(super) fn compute_fallback_positions(
    tree: &DecisionTree,
    config: &LayoutConfig,
) -> BTreeMap<NodeId, NodePosition> {
    let mut positions = BTreeMap::new();
    if tree.is_empty() {
        return positions;
    }
    let mut next_leaf_x = 0.0f32;
    place(tree, tree.root_id(), 0, &mut next_leaf_x, &mut positions, config);
    positions
}

fn place(
    tree: &DecisionTree,
    id: NodeId,
    depth: u32,
    next_leaf_x: &mut f32,
    positions: &mut BTreeMap<NodeId, NodePosition>,
    config: &LayoutConfig,
) -> f32 {
    let children = tree.children(id);
    let x = if children.is_empty() {
        let slot = *next_leaf_x;
        *next_leaf_x += config.fallback_leaf_spacing;
        slot
    } else {
        let child_xs: Vec<f32> = children
            .iter()
            .map(|&child| place(tree, child, depth + 1, next_leaf_x, positions, config))
            .collect();
        (child_xs[0] + child_xs[child_xs.len() - 1]) * 0.5
    };

    positions.insert(
        id,
        NodePosition {
            x,
            y: depth as f32 * config.fallback_level_gap,
            on_path: false,
            hidden: false,
        },
    );
    x
}
