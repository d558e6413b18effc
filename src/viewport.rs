use std::collections::BTreeMap;

use crate::config::LayoutConfig;
use crate::layout::NodePosition;
use crate::tree::NodeId;

// Floor for degenerate bounding-box extents (single node, zero spread).
const MIN_EXTENT: f32 = 1.0;

/// Uniform scale plus translation mapping layout space into the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportTransform {
    pub scale: f32,
    pub translate_x: f32,
    pub translate_y: f32,
}

impl Default for ViewportTransform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            translate_x: 0.0,
            translate_y: 0.0,
        }
    }
}

impl ViewportTransform {
    /// Map a layout-space point to viewport coordinates.
    pub fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        (
            x * self.scale + self.translate_x,
            y * self.scale + self.translate_y,
        )
    }
}

/// Fit the bounding box of all positions (footprints included, padding
/// added) into the configured viewport. The scale never exceeds 1 so an
/// initial fit never zooms in past native size; the box is centered on
/// whichever axis has slack.
pub fn fit_transform(
    positions: &BTreeMap<NodeId, NodePosition>,
    config: &LayoutConfig,
) -> ViewportTransform {
    if positions.is_empty() {
        return ViewportTransform::default();
    }

    let half_width = config.node_footprint.width * 0.5;
    let half_height = config.node_footprint.height * 0.5;
    let mut min_x = f32::MAX;
    let mut min_y = f32::MAX;
    let mut max_x = f32::MIN;
    let mut max_y = f32::MIN;
    for position in positions.values() {
        min_x = min_x.min(position.x - half_width);
        min_y = min_y.min(position.y - half_height);
        max_x = max_x.max(position.x + half_width);
        max_y = max_y.max(position.y + half_height);
    }

    min_x -= config.viewport_padding;
    min_y -= config.viewport_padding;
    max_x += config.viewport_padding;
    max_y += config.viewport_padding;
    let width = (max_x - min_x).max(MIN_EXTENT);
    let height = (max_y - min_y).max(MIN_EXTENT);

    let scale = (config.viewport_width / width)
        .min(config.viewport_height / height)
        .min(1.0);
    let translate_x = (config.viewport_width - width * scale) * 0.5 - min_x * scale;
    let translate_y = (config.viewport_height - height * scale) * 0.5 - min_y * scale;

    ViewportTransform {
        scale,
        translate_x,
        translate_y,
    }
}
