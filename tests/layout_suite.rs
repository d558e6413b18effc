use std::path::Path;

use decision_path_layout::{
    compute_tree_layout, trace_instance_path, DecisionTree, Instance, LayoutConfig, NodeId,
    NodeRecord, TracedPath,
};

fn load_iris() -> DecisionTree {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("iris_tree.json");
    let input = std::fs::read_to_string(path).expect("fixture read failed");
    let records: Vec<NodeRecord> = serde_json::from_str(&input).expect("fixture parse failed");
    DecisionTree::from_records(records).expect("fixture tree invalid")
}

fn virginica_instance() -> Instance {
    Instance::from_iter([
        ("petal length (cm)", 5.1),
        ("petal width (cm)", 2.0),
        ("sepal width (cm)", 3.0),
    ])
}

#[test]
fn iris_virginica_path_is_traced_to_its_leaf() {
    let tree = load_iris();
    let path = trace_instance_path(&tree, &virginica_instance());
    assert!(path.is_complete());
    assert_eq!(path.nodes, vec![0, 2, 6, 14, 18]);
    assert_eq!(path.leaf_id(), Some(18));
    assert_eq!(
        tree.node(18).unwrap().class_label.as_deref(),
        Some("virginica")
    );
}

#[test]
fn iris_setosa_short_circuits_at_the_first_split() {
    let tree = load_iris();
    let path = trace_instance_path(&tree, &Instance::from_iter([("petal length (cm)", 1.4)]));
    assert!(path.is_complete());
    assert_eq!(path.nodes, vec![0, 1]);
}

#[test]
fn iris_layout_covers_the_whole_tree() {
    let tree = load_iris();
    let config = LayoutConfig::default();
    let path = trace_instance_path(&tree, &virginica_instance());
    let layout = compute_tree_layout(&tree, &path, &config);

    assert_eq!(layout.positions.len(), 19);
    assert_eq!(layout.links.len(), 18);
    let on_path: Vec<NodeId> = layout
        .positions
        .iter()
        .filter(|(_, p)| p.on_path)
        .map(|(&id, _)| id)
        .collect();
    assert_eq!(on_path, vec![0, 2, 6, 14, 18]);
}

#[test]
fn iris_path_line_is_straight_and_evenly_spaced() {
    let tree = load_iris();
    let config = LayoutConfig::default();
    let path = trace_instance_path(&tree, &virginica_instance());
    let layout = compute_tree_layout(&tree, &path, &config);

    let y = layout.positions[&0].y;
    for pair in path.nodes.windows(2) {
        let a = layout.positions[&pair[0]];
        let b = layout.positions[&pair[1]];
        assert_eq!(a.y, y);
        assert_eq!(b.y, y);
        assert!((b.x - a.x - config.path_spacing).abs() < 1e-3);
    }
}

#[test]
fn iris_offpath_branches_alternate_sides_in_traversal_order() {
    let tree = load_iris();
    let config = LayoutConfig::default();
    let path = trace_instance_path(&tree, &virginica_instance());
    let layout = compute_tree_layout(&tree, &path, &config);
    let path_y = layout.positions[&0].y;

    // Untaken branches along [0, 2, 6, 14]: 1, 3, 7, 15.
    assert!(layout.positions[&1].y < path_y);
    assert!(layout.positions[&3].y > path_y);
    assert!(layout.positions[&7].y < path_y);
    assert!(layout.positions[&15].y > path_y);
    assert_eq!(layout.subtree_roots().collect::<Vec<_>>(), vec![1, 3, 7, 15]);
}

#[test]
fn iris_subtrees_start_collapsed_and_expand_on_demand() {
    let tree = load_iris();
    let config = LayoutConfig::default();
    let path = trace_instance_path(&tree, &virginica_instance());
    let mut layout = compute_tree_layout(&tree, &path, &config);

    // Subtree roots are visible, their descendants are not.
    for root in [1, 3, 7, 15] {
        assert!(layout.is_visible(root));
        assert!(!layout.is_expanded(root));
    }
    assert!(layout.has_hidden_descendants(7));
    assert!(!layout.has_hidden_descendants(1)); // leaf root, nothing to show
    for hidden in [4, 5, 8, 9, 10, 11, 12, 13, 16, 17] {
        assert!(!layout.is_visible(hidden), "node {hidden} should be hidden");
    }

    assert!(layout.expand(7));
    for shown in [8, 9, 10, 11, 12, 13] {
        assert!(layout.is_visible(shown), "node {shown} should be visible");
    }
    // Other subtrees stay untouched.
    assert!(!layout.is_visible(4));

    assert!(layout.collapse(7));
    for hidden in [8, 9, 10, 11, 12, 13] {
        assert!(!layout.is_visible(hidden));
    }
}

#[test]
fn iris_link_weights_are_root_sample_fractions() {
    let tree = load_iris();
    let config = LayoutConfig::default();
    let path = trace_instance_path(&tree, &virginica_instance());
    let layout = compute_tree_layout(&tree, &path, &config);

    let weight_of = |target: NodeId| {
        layout
            .links
            .iter()
            .find(|link| link.target == target)
            .unwrap()
            .weight
    };
    assert!((weight_of(1) - 31.0 / 105.0).abs() < 1e-6);
    assert!((weight_of(2) - 74.0 / 105.0).abs() < 1e-6);
    assert!((weight_of(18) - 30.0 / 105.0).abs() < 1e-6);
}

#[test]
fn iris_layout_fits_inside_the_viewport() {
    let tree = load_iris();
    let config = LayoutConfig::default();
    let path = trace_instance_path(&tree, &virginica_instance());
    let layout = compute_tree_layout(&tree, &path, &config);

    let transform = layout.transform;
    assert!(transform.scale > 0.0 && transform.scale <= 1.0);
    for position in layout.positions.values() {
        let (x, y) = transform.apply(position.x, position.y);
        assert!(x >= -0.5 && x <= config.viewport_width + 0.5, "x out: {x}");
        assert!(y >= -0.5 && y <= config.viewport_height + 0.5, "y out: {y}");
    }
}

#[test]
fn iris_partial_instance_truncates_and_branches_fan_out() {
    let tree = load_iris();
    let config = LayoutConfig::default();
    // petal width missing: tracing stops at node 6.
    let path = trace_instance_path(&tree, &Instance::from_iter([("petal length (cm)", 5.0)]));
    assert!(path.truncated);
    assert_eq!(path.nodes, vec![0, 2, 6]);

    let layout = compute_tree_layout(&tree, &path, &config);
    assert_eq!(layout.positions.len(), 19);
    // Both children of the truncation point root their own subtrees.
    assert_eq!(layout.subtree_roots().collect::<Vec<_>>(), vec![1, 3, 7, 14]);
    assert!(!layout.positions[&7].on_path);
    assert!(!layout.positions[&14].on_path);
}

#[test]
fn iris_without_instance_uses_the_balanced_fallback() {
    let tree = load_iris();
    let config = LayoutConfig::default();
    let layout = compute_tree_layout(&tree, &TracedPath::empty(), &config);

    assert_eq!(layout.positions.len(), 19);
    assert!(layout.positions.values().all(|p| !p.on_path && !p.hidden));
    assert_eq!(layout.subtree_roots().count(), 0);

    // Same-depth nodes keep at least a footprint of clearance.
    let ids: Vec<NodeId> = layout.positions.keys().copied().collect();
    for &a in &ids {
        for &b in &ids {
            if a >= b {
                continue;
            }
            let pa = layout.positions[&a];
            let pb = layout.positions[&b];
            if pa.y != pb.y {
                continue;
            }
            assert!(
                (pa.x - pb.x).abs() >= config.node_footprint.width,
                "nodes {a} and {b} overlap"
            );
        }
    }
}

#[test]
fn rebuilding_replaces_visibility_state() {
    let tree = load_iris();
    let config = LayoutConfig::default();
    let path = trace_instance_path(&tree, &virginica_instance());
    let mut layout = compute_tree_layout(&tree, &path, &config);
    layout.expand(7);
    assert!(layout.is_expanded(7));

    // A fresh build starts collapsed again; nothing leaks across sessions.
    let rebuilt = compute_tree_layout(&tree, &path, &config);
    assert!(!rebuilt.is_expanded(7));
    assert!(!rebuilt.is_visible(9));
}
