use std::collections::BTreeMap;

use crate::tree::NodeId;

/// Collapsed/Expanded state for one off-path subtree.
#[derive(Debug, Clone)]
struct SubtreeVisibility {
    expanded: bool,
    /// Descendants owned by this subtree root (the root itself excluded).
    descendants: Vec<NodeId>,
}

/// Expand/collapse bookkeeping for the off-path subtrees of one layout.
///
/// Registered fresh on every layout build, always starting collapsed;
/// rebuilding a layout replaces this state wholesale instead of merging.
/// Toggles only flip visibility flags — positions are never recomputed.
#[derive(Debug, Clone, Default)]
pub struct VisibilityController {
    subtrees: BTreeMap<NodeId, SubtreeVisibility>,
}

impl VisibilityController {
    pub(crate) fn register(&mut self, root: NodeId, descendants: Vec<NodeId>) {
        self.subtrees.insert(
            root,
            SubtreeVisibility {
                expanded: false,
                descendants,
            },
        );
    }

    pub fn is_subtree_root(&self, id: NodeId) -> bool {
        self.subtrees.contains_key(&id)
    }

    pub fn subtree_roots(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.subtrees.keys().copied()
    }

    pub fn is_expanded(&self, id: NodeId) -> bool {
        self.subtrees.get(&id).is_some_and(|s| s.expanded)
    }

    pub fn has_hidden_descendants(&self, id: NodeId) -> bool {
        self.subtrees
            .get(&id)
            .is_some_and(|s| !s.expanded && !s.descendants.is_empty())
    }

    /// Collapsed → Expanded. Returns the ids to unhide, or `None` when the
    /// call is a no-op (already expanded, or `id` is not a subtree root).
    pub(crate) fn expand(&mut self, id: NodeId) -> Option<&[NodeId]> {
        let subtree = self.subtrees.get_mut(&id)?;
        if subtree.expanded {
            return None;
        }
        subtree.expanded = true;
        Some(&subtree.descendants)
    }

    /// Expanded → Collapsed. Returns the ids to re-hide, or `None` on a
    /// no-op.
    pub(crate) fn collapse(&mut self, id: NodeId) -> Option<&[NodeId]> {
        let subtree = self.subtrees.get_mut(&id)?;
        if !subtree.expanded {
            return None;
        }
        subtree.expanded = false;
        Some(&subtree.descendants)
    }
}
