use crate::layout::TreeLayout;
use crate::tree::{DecisionTree, NodeId};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Serializable snapshot of a computed layout, including the node payload
/// fields a renderer needs for labels and tooltips.
#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub node_count: usize,
    pub transform: TransformDump,
    pub nodes: Vec<NodeDump>,
    pub links: Vec<LinkDump>,
}

#[derive(Debug, Serialize)]
pub struct TransformDump {
    pub scale: f32,
    pub translate_x: f32,
    pub translate_y: f32,
}

#[derive(Debug, Serialize)]
pub struct NodeDump {
    pub id: NodeId,
    pub x: f32,
    pub y: f32,
    pub on_path: bool,
    pub hidden: bool,
    pub expandable: bool,
    pub is_leaf: bool,
    pub feature_name: Option<String>,
    pub threshold: Option<f64>,
    pub class_label: Option<String>,
    pub n_samples: u64,
    pub weighted_n_samples: Option<f64>,
    pub impurity: Option<f64>,
    pub value: Option<Vec<f64>>,
}

#[derive(Debug, Serialize)]
pub struct LinkDump {
    pub source: NodeId,
    pub target: NodeId,
    pub weight: f32,
}

impl LayoutDump {
    pub fn from_layout(layout: &TreeLayout, tree: &DecisionTree) -> Self {
        let nodes = layout
            .positions
            .iter()
            .map(|(&id, position)| {
                let record = tree.node(id);
                NodeDump {
                    id,
                    x: position.x,
                    y: position.y,
                    on_path: position.on_path,
                    hidden: position.hidden,
                    expandable: layout.has_hidden_descendants(id),
                    is_leaf: record.map(|r| r.is_leaf).unwrap_or(true),
                    feature_name: record.and_then(|r| r.feature_name.clone()),
                    threshold: record.and_then(|r| r.threshold),
                    class_label: record.and_then(|r| r.class_label.clone()),
                    n_samples: record.map(|r| r.n_samples).unwrap_or(0),
                    weighted_n_samples: record.and_then(|r| r.weighted_n_samples),
                    impurity: record.and_then(|r| r.impurity),
                    value: record.and_then(|r| r.value.clone()),
                }
            })
            .collect();

        let links = layout
            .links
            .iter()
            .map(|link| LinkDump {
                source: link.source,
                target: link.target,
                weight: link.weight,
            })
            .collect();

        LayoutDump {
            node_count: layout.positions.len(),
            transform: TransformDump {
                scale: layout.transform.scale,
                translate_x: layout.transform.translate_x,
                translate_y: layout.transform.translate_y,
            },
            nodes,
            links,
        }
    }
}

pub fn write_layout_dump(
    path: &Path,
    layout: &TreeLayout,
    tree: &DecisionTree,
) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_layout(layout, tree);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}
