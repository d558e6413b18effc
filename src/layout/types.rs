use std::collections::BTreeMap;

use crate::tree::NodeId;
use crate::viewport::ViewportTransform;
use crate::visibility::VisibilityController;

/// Final coordinates and render flags for one node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodePosition {
    pub x: f32,
    pub y: f32,
    pub on_path: bool,
    pub hidden: bool,
}

/// Parent→child edge with a stroke weight derived from sample counts
/// (fraction of the root's samples reaching the child, clamped to [0, 1]).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    pub source: NodeId,
    pub target: NodeId,
    pub weight: f32,
}

/// Recoverable conditions absorbed during a layout build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutDiagnostic {
    /// A path entry referenced a node id the tree does not contain; the
    /// entry was skipped.
    UnknownPathNode { node_id: NodeId },
    /// The bounded collision search ran out of attempts; the node keeps its
    /// best-effort position, pushed further from the path line.
    CollisionSearchExhausted { node_id: NodeId, attempts: usize },
}

/// A computed layout session: the complete position map, the unfiltered
/// link set, the fitting transform, and the expand/collapse state.
///
/// This object is the only mutable store between builds — toggling
/// visibility flips flags here and nowhere else. Rebuilding a layout (new
/// tree or instance) produces a fresh session; stale sessions are dropped,
/// never merged.
#[derive(Debug, Clone)]
pub struct TreeLayout {
    pub positions: BTreeMap<NodeId, NodePosition>,
    pub links: Vec<Link>,
    pub transform: ViewportTransform,
    pub diagnostics: Vec<LayoutDiagnostic>,
    pub(crate) visibility: VisibilityController,
}

impl TreeLayout {
    pub fn position(&self, id: NodeId) -> Option<&NodePosition> {
        self.positions.get(&id)
    }

    pub fn is_visible(&self, id: NodeId) -> bool {
        self.positions.get(&id).is_some_and(|p| !p.hidden)
    }

    /// Show every descendant of an off-path subtree root. Idempotent;
    /// returns whether anything changed.
    pub fn expand(&mut self, id: NodeId) -> bool {
        let Some(ids) = self.visibility.expand(id) else {
            return false;
        };
        for &descendant in ids {
            if let Some(position) = self.positions.get_mut(&descendant) {
                position.hidden = false;
            }
        }
        true
    }

    /// Re-hide every descendant of an off-path subtree root, leaving the
    /// root itself visible. Idempotent; returns whether anything changed.
    pub fn collapse(&mut self, id: NodeId) -> bool {
        let Some(ids) = self.visibility.collapse(id) else {
            return false;
        };
        for &descendant in ids {
            if let Some(position) = self.positions.get_mut(&descendant) {
                position.hidden = true;
            }
        }
        true
    }

    pub fn is_expanded(&self, id: NodeId) -> bool {
        self.visibility.is_expanded(id)
    }

    /// True for a collapsed subtree root that still hides children — the
    /// renderer's cue to draw an expansion affordance.
    pub fn has_hidden_descendants(&self, id: NodeId) -> bool {
        self.visibility.has_hidden_descendants(id)
    }

    pub fn subtree_roots(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.visibility.subtree_roots()
    }

    pub fn visible_node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.positions
            .iter()
            .filter(|(_, position)| !position.hidden)
            .map(|(&id, _)| id)
    }

    /// The link set filtered by current visibility; both endpoints must be
    /// shown for the link to render.
    pub fn visible_links(&self) -> Vec<Link> {
        self.links
            .iter()
            .filter(|link| self.is_visible(link.source) && self.is_visible(link.target))
            .copied()
            .collect()
    }
}
