use std::collections::HashMap;

use crate::config::LayoutConfig;

/// Axis-aligned footprint rectangle, top-left anchored.
#[derive(Debug, Clone, Copy)]
pub(super) struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Footprint centered on a node position, inflated by the collision
    /// buffer.
    pub(super) fn around(center_x: f32, center_y: f32, config: &LayoutConfig) -> Self {
        let width = config.node_footprint.width + config.collision_buffer * 2.0;
        let height = config.node_footprint.height + config.collision_buffer * 2.0;
        Self {
            x: center_x - width * 0.5,
            y: center_y - height * 0.5,
            width,
            height,
        }
    }

    pub(super) fn intersects(&self, other: &Rect) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }
}

/// Outcome of one bounded placement search.
#[derive(Debug, Clone, Copy)]
pub(super) struct Placement {
    pub x: f32,
    pub attempts: usize,
    pub exhausted: bool,
}

/// Already-placed footprints, bucketed by signed depth level (0 is the path
/// line, negative above it, positive below).
#[derive(Debug, Default)]
pub(super) struct LevelIndex {
    levels: HashMap<i32, Vec<Rect>>,
}

impl LevelIndex {
    pub(super) fn occupy(&mut self, level: i32, rect: Rect) {
        self.levels.entry(level).or_default().push(rect);
    }

    /// A candidate collides if it overlaps anything on its own or an
    /// adjacent level.
    fn collides(&self, level: i32, candidate: &Rect) -> bool {
        (level - 1..=level + 1).any(|adjacent| {
            self.levels
                .get(&adjacent)
                .is_some_and(|rects| rects.iter().any(|rect| candidate.intersects(rect)))
        })
    }

    /// Search for a collision-free x near `target_x`, walking outward in
    /// alternating steps. The search is capped: after
    /// `max_collision_attempts` candidates the last one is accepted as-is,
    /// so placement always terminates, degrading quality instead of
    /// failing.
    pub(super) fn resolve_x(
        &self,
        level: i32,
        target_x: f32,
        y: f32,
        config: &LayoutConfig,
    ) -> Placement {
        let cap = config.max_collision_attempts.max(1);
        let mut candidate_x = target_x;
        for attempt in 0..cap {
            candidate_x = target_x + offset_for_attempt(attempt, config.collision_step);
            let rect = Rect::around(candidate_x, y, config);
            if !self.collides(level, &rect) {
                return Placement {
                    x: candidate_x,
                    attempts: attempt + 1,
                    exhausted: false,
                };
            }
        }
        Placement {
            x: candidate_x,
            attempts: cap,
            exhausted: true,
        }
    }
}

// 0, +s, -s, +2s, -2s, ...
fn offset_for_attempt(attempt: usize, step: f32) -> f32 {
    if attempt == 0 {
        return 0.0;
    }
    let magnitude = attempt.div_ceil(2) as f32 * step;
    if attempt % 2 == 1 { magnitude } else { -magnitude }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rects_touching_edges_do_not_intersect() {
        let a = Rect {
            x: 0.0,
            y: 0.0,
            width: 10.0,
            height: 10.0,
        };
        let b = Rect {
            x: 10.0,
            y: 0.0,
            width: 10.0,
            height: 10.0,
        };
        let c = Rect {
            x: 5.0,
            y: 5.0,
            width: 10.0,
            height: 10.0,
        };
        assert!(!a.intersects(&b));
        assert!(a.intersects(&c));
        assert!(c.intersects(&a));
    }

    #[test]
    fn offsets_walk_outward_in_both_directions() {
        assert_eq!(offset_for_attempt(0, 10.0), 0.0);
        assert_eq!(offset_for_attempt(1, 10.0), 10.0);
        assert_eq!(offset_for_attempt(2, 10.0), -10.0);
        assert_eq!(offset_for_attempt(3, 10.0), 20.0);
        assert_eq!(offset_for_attempt(4, 10.0), -20.0);
    }

    #[test]
    fn free_target_is_used_unchanged() {
        let config = LayoutConfig::default();
        let index = LevelIndex::default();
        let placement = index.resolve_x(1, 300.0, 500.0, &config);
        assert_eq!(placement.x, 300.0);
        assert_eq!(placement.attempts, 1);
        assert!(!placement.exhausted);
    }

    #[test]
    fn occupied_target_moves_to_a_free_slot() {
        let config = LayoutConfig::default();
        let mut index = LevelIndex::default();
        index.occupy(1, Rect::around(300.0, 500.0, &config));
        let placement = index.resolve_x(1, 300.0, 500.0, &config);
        assert!(!placement.exhausted);
        assert_ne!(placement.x, 300.0);
        let resolved = Rect::around(placement.x, 500.0, &config);
        assert!(!resolved.intersects(&Rect::around(300.0, 500.0, &config)));
    }

    #[test]
    fn adjacent_level_blocks_placement() {
        let config = LayoutConfig::default();
        let mut index = LevelIndex::default();
        index.occupy(2, Rect::around(300.0, 500.0, &config));
        let placement = index.resolve_x(1, 300.0, 500.0, &config);
        assert_ne!(placement.x, 300.0);
    }

    #[test]
    fn non_adjacent_level_is_ignored() {
        let config = LayoutConfig::default();
        let mut index = LevelIndex::default();
        index.occupy(3, Rect::around(300.0, 500.0, &config));
        let placement = index.resolve_x(1, 300.0, 500.0, &config);
        assert_eq!(placement.x, 300.0);
    }

    #[test]
    fn search_is_capped_and_reports_exhaustion() {
        let mut config = LayoutConfig::default();
        config.max_collision_attempts = 3;
        // Wall off every slot the three candidates can reach.
        let mut index = LevelIndex::default();
        for i in -4..=4 {
            index.occupy(1, Rect::around(i as f32 * config.collision_step, 500.0, &config));
        }
        let placement = index.resolve_x(1, 0.0, 500.0, &config);
        assert!(placement.exhausted);
        assert_eq!(placement.attempts, 3);
    }
}
