use serde::{Deserialize, Serialize};
use std::path::Path;

/// Rectangular area a node occupies for collision purposes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeFootprint {
    pub width: f32,
    pub height: f32,
}

impl Default for NodeFootprint {
    fn default() -> Self {
        Self {
            width: 128.0,
            height: 48.0,
        }
    }
}

/// Layout constants. Everything the engine tunes on lives here; the engine
/// itself holds no state between builds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Center-to-center distance between consecutive path nodes.
    pub path_spacing: f32,
    /// Vertical distance from the path line to an off-path subtree anchor.
    pub subtree_gap: f32,
    /// Additional vertical offset per depth level away from the path line.
    pub level_gap: f32,
    /// Base horizontal spread between off-path siblings, scaled by
    /// sqrt(child count).
    pub sibling_spacing: f32,
    pub node_footprint: NodeFootprint,
    /// Clearance added around footprints when testing for overlap.
    pub collision_buffer: f32,
    /// Horizontal step of the outward collision search.
    pub collision_step: f32,
    /// Hard cap on candidate positions tried per node.
    pub max_collision_attempts: usize,
    pub viewport_width: f32,
    pub viewport_height: f32,
    /// Padding kept around the layout when fitting it to the viewport.
    pub viewport_padding: f32,
    /// Horizontal slot width per leaf in the balanced fallback layout.
    pub fallback_leaf_spacing: f32,
    /// Vertical distance between depth levels in the balanced fallback layout.
    pub fallback_level_gap: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        let node_footprint = NodeFootprint::default();
        Self {
            // node width plus a fixed margin, independent of subtree size
            path_spacing: node_footprint.width + 40.0,
            subtree_gap: 110.0,
            level_gap: 80.0,
            sibling_spacing: 112.0,
            node_footprint,
            collision_buffer: 12.0,
            collision_step: 72.0,
            max_collision_attempts: 20,
            viewport_width: 1200.0,
            viewport_height: 800.0,
            viewport_padding: 40.0,
            fallback_leaf_spacing: node_footprint.width + 24.0,
            fallback_level_gap: 90.0,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct NodeFootprintFile {
    width: Option<f32>,
    height: Option<f32>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    path_spacing: Option<f32>,
    subtree_gap: Option<f32>,
    level_gap: Option<f32>,
    sibling_spacing: Option<f32>,
    node_footprint: Option<NodeFootprintFile>,
    collision_buffer: Option<f32>,
    collision_step: Option<f32>,
    max_collision_attempts: Option<usize>,
    viewport_width: Option<f32>,
    viewport_height: Option<f32>,
    viewport_padding: Option<f32>,
    fallback_leaf_spacing: Option<f32>,
    fallback_level_gap: Option<f32>,
}

impl ConfigFile {
    fn apply(self, config: &mut LayoutConfig) {
        if let Some(v) = self.path_spacing {
            config.path_spacing = v;
        }
        if let Some(v) = self.subtree_gap {
            config.subtree_gap = v;
        }
        if let Some(v) = self.level_gap {
            config.level_gap = v;
        }
        if let Some(v) = self.sibling_spacing {
            config.sibling_spacing = v;
        }
        if let Some(footprint) = self.node_footprint {
            if let Some(v) = footprint.width {
                config.node_footprint.width = v;
            }
            if let Some(v) = footprint.height {
                config.node_footprint.height = v;
            }
        }
        if let Some(v) = self.collision_buffer {
            config.collision_buffer = v;
        }
        if let Some(v) = self.collision_step {
            config.collision_step = v;
        }
        if let Some(v) = self.max_collision_attempts {
            config.max_collision_attempts = v;
        }
        if let Some(v) = self.viewport_width {
            config.viewport_width = v;
        }
        if let Some(v) = self.viewport_height {
            config.viewport_height = v;
        }
        if let Some(v) = self.viewport_padding {
            config.viewport_padding = v;
        }
        if let Some(v) = self.fallback_leaf_spacing {
            config.fallback_leaf_spacing = v;
        }
        if let Some(v) = self.fallback_level_gap {
            config.fallback_level_gap = v;
        }
    }
}

/// Defaults, optionally overlaid with a camelCase JSON file of overrides.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<LayoutConfig> {
    let mut config = LayoutConfig::default();
    let Some(path) = path else {
        return Ok(config);
    };

    let contents = std::fs::read_to_string(path)?;
    let parsed: ConfigFile = serde_json::from_str(&contents)?;
    parsed.apply(&mut config);
    Ok(config)
}
