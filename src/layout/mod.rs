mod collision;
mod fallback;
pub(crate) mod types;
pub use types::*;

use std::collections::BTreeMap;

use collision::{LevelIndex, Rect};

use crate::config::LayoutConfig;
use crate::path::TracedPath;
use crate::tree::{DecisionTree, NodeId};
use crate::viewport;
use crate::visibility::VisibilityController;

/// Which side of the path line an off-path subtree hangs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Above,
    Below,
}

impl Side {
    fn sign(self) -> f32 {
        match self {
            Side::Above => -1.0,
            Side::Below => 1.0,
        }
    }

    fn level_step(self) -> i32 {
        match self {
            Side::Above => -1,
            Side::Below => 1,
        }
    }
}

/// Build a complete layout for the tree, highlighting the traced path.
///
/// Path nodes sit left-to-right on a horizontal line with constant spacing;
/// every branch the instance did not take hangs off that line as a
/// collapsible subtree, alternating above and below. An empty path (no
/// instance traced) falls back to a conventional balanced tree layout.
///
/// Never fails for a validated tree: recoverable conditions are logged,
/// recorded as diagnostics, and the returned position map always covers
/// every node id.
pub fn compute_tree_layout(
    tree: &DecisionTree,
    path: &TracedPath,
    config: &LayoutConfig,
) -> TreeLayout {
    let mut diagnostics = Vec::new();

    // Entries pointing at unknown ids are skipped, not fatal.
    let mut on_path: Vec<NodeId> = Vec::with_capacity(path.nodes.len());
    for &id in &path.nodes {
        if tree.contains(id) {
            on_path.push(id);
        } else {
            log::warn!("path references unknown node {id}; skipping");
            diagnostics.push(LayoutDiagnostic::UnknownPathNode { node_id: id });
        }
    }

    if on_path.is_empty() {
        let positions = fallback::compute_fallback_positions(tree, config);
        return finish_layout(tree, positions, VisibilityController::default(), diagnostics, config);
    }

    let mut positions: BTreeMap<NodeId, NodePosition> = BTreeMap::new();
    let mut occupied = LevelIndex::default();
    let path_y = config.viewport_height * 0.5;

    for (index, &id) in on_path.iter().enumerate() {
        let x = index as f32 * config.path_spacing;
        positions.insert(
            id,
            NodePosition {
                x,
                y: path_y,
                on_path: true,
                hidden: false,
            },
        );
        occupied.occupy(0, Rect::around(x, path_y, config));
    }

    // One alternation counter shared across the whole path, never reset per
    // node: consecutive off-path subtrees flip sides regardless of which
    // path node they hang from.
    let mut visibility = VisibilityController::default();
    let mut side_counter = 0usize;
    for (index, &id) in on_path.iter().enumerate() {
        let next_on_path = on_path.get(index + 1).copied();
        let anchor_x = positions[&id].x;
        for child in tree.children(id) {
            if Some(child) == next_on_path {
                continue;
            }
            let side = if side_counter % 2 == 0 {
                Side::Above
            } else {
                Side::Below
            };
            side_counter += 1;

            place_offpath_subtree(
                tree,
                config,
                child,
                anchor_x,
                path_y,
                side,
                &mut positions,
                &mut occupied,
                &mut diagnostics,
            );
            let descendants: Vec<NodeId> = tree
                .descendant_ids(child)
                .into_iter()
                .filter(|&descendant| descendant != child)
                .collect();
            visibility.register(child, descendants);
        }
    }

    // Safety net for paths handed in by callers that skip over nodes: park
    // anything unvisited at the path origin rather than dropping it.
    for id in tree.node_ids() {
        positions.entry(id).or_insert(NodePosition {
            x: 0.0,
            y: path_y,
            on_path: false,
            hidden: false,
        });
    }

    log::debug!(
        "laid out {} path node(s) and {} off-path subtree(s)",
        on_path.len(),
        side_counter
    );
    finish_layout(tree, positions, visibility, diagnostics, config)
}

/// Anchor an off-path subtree root directly above/below its path parent,
/// then spread its descendants level by level away from the path line.
fn place_offpath_subtree(
    tree: &DecisionTree,
    config: &LayoutConfig,
    root: NodeId,
    anchor_x: f32,
    path_y: f32,
    side: Side,
    positions: &mut BTreeMap<NodeId, NodePosition>,
    occupied: &mut LevelIndex,
    diagnostics: &mut Vec<LayoutDiagnostic>,
) {
    let level = side.level_step();
    let anchor_y = path_y + side.sign() * config.subtree_gap;
    let (x, y) = settle(
        root, level, anchor_x, anchor_y, side, config, occupied, diagnostics,
    );
    positions.insert(
        root,
        NodePosition {
            x,
            y,
            on_path: false,
            hidden: false,
        },
    );
    place_offpath_children(
        tree,
        config,
        root,
        x,
        y,
        side,
        level,
        positions,
        occupied,
        diagnostics,
    );
}

fn place_offpath_children(
    tree: &DecisionTree,
    config: &LayoutConfig,
    parent: NodeId,
    parent_x: f32,
    parent_y: f32,
    side: Side,
    parent_level: i32,
    positions: &mut BTreeMap<NodeId, NodePosition>,
    occupied: &mut LevelIndex,
    diagnostics: &mut Vec<LayoutDiagnostic>,
) {
    let children = tree.children(parent);
    if children.is_empty() {
        return;
    }
    // Spread grows with local fan-out so wide levels stay readable.
    let spread = config.sibling_spacing * (children.len() as f32).sqrt();
    let level = parent_level + side.level_step();
    let target_y = parent_y + side.sign() * config.level_gap;

    for (index, &child) in children.iter().enumerate() {
        let offset = (index as f32 - (children.len() as f32 - 1.0) * 0.5) * spread;
        let (x, y) = settle(
            child,
            level,
            parent_x + offset,
            target_y,
            side,
            config,
            occupied,
            diagnostics,
        );
        positions.insert(
            child,
            NodePosition {
                x,
                y,
                on_path: false,
                hidden: true,
            },
        );
        place_offpath_children(
            tree,
            config,
            child,
            x,
            y,
            side,
            level,
            positions,
            occupied,
            diagnostics,
        );
    }
}

/// Run the bounded collision search for one node and claim the resulting
/// slot. On exhaustion the last candidate is kept, nudged further from the
/// path line to limit the visual overlap.
fn settle(
    id: NodeId,
    level: i32,
    target_x: f32,
    target_y: f32,
    side: Side,
    config: &LayoutConfig,
    occupied: &mut LevelIndex,
    diagnostics: &mut Vec<LayoutDiagnostic>,
) -> (f32, f32) {
    let placement = occupied.resolve_x(level, target_x, target_y, config);
    let mut y = target_y;
    if placement.exhausted {
        log::warn!(
            "no collision-free slot for node {id} after {} attempt(s); keeping best effort",
            placement.attempts
        );
        diagnostics.push(LayoutDiagnostic::CollisionSearchExhausted {
            node_id: id,
            attempts: placement.attempts,
        });
        y += side.sign() * config.subtree_gap * 0.5;
    }
    occupied.occupy(level, Rect::around(placement.x, y, config));
    (placement.x, y)
}

fn finish_layout(
    tree: &DecisionTree,
    positions: BTreeMap<NodeId, NodePosition>,
    visibility: VisibilityController,
    diagnostics: Vec<LayoutDiagnostic>,
    config: &LayoutConfig,
) -> TreeLayout {
    let links = generate_links(tree);
    let transform = viewport::fit_transform(&positions, config);
    TreeLayout {
        positions,
        links,
        transform,
        diagnostics,
        visibility,
    }
}

/// Full, unfiltered link set: one entry per node with a parent, weighted by
/// the fraction of root samples reaching the child.
fn generate_links(tree: &DecisionTree) -> Vec<Link> {
    let root_samples = tree
        .node(tree.root_id())
        .map(|node| node.n_samples)
        .unwrap_or(0)
        .max(1) as f32;
    tree.node_ids()
        .filter_map(|id| {
            let parent = tree.parent(id)?;
            let samples = tree.node(id).map(|node| node.n_samples).unwrap_or(0) as f32;
            Some(Link {
                source: parent,
                target: id,
                weight: (samples / root_samples).clamp(0.0, 1.0),
            })
        })
        .collect()
}
