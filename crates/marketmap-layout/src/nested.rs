//! Two-stage layout: groups over the canvas, then leaves inside each group.

use indexmap::IndexMap;
use serde::Serialize;

use crate::bounds::RectBounds;
use crate::config::{LayoutConfig, SnapMode};
use crate::hierarchy::{self, GroupMap, WeightedNode};
use crate::partition::partition_with;

/// Placement of one leaf.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeafFrame {
    /// Leaf id
    pub id: String,
    /// Display name
    pub name: String,
    /// Signed change in percent
    pub change_percent: f64,
    /// Cell rectangle (degenerate when there was no room)
    pub bounds: RectBounds,
}

/// Placement of one group and its leaves.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupFrame {
    /// Group id
    pub id: String,
    /// Header label
    pub label: String,
    /// Unweighted mean change of the leaves
    pub change_percent: f64,
    /// Whole group rectangle
    pub bounds: RectBounds,
    /// Label strip at the top of `bounds`
    pub header: RectBounds,
    /// Region the leaves tile
    pub interior: RectBounds,
    /// Leaves in draw order (largest first)
    pub leaves: Vec<LeafFrame>,
}

impl GroupFrame {
    /// Whether any leaf of this group got a drawable cell.
    #[must_use]
    pub fn has_drawable_leaves(&self) -> bool {
        self.leaves.iter().any(|l| l.bounds.is_drawable())
    }
}

/// Result of one layout pass. Recomputed from scratch, never patched.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct LayoutFrame {
    /// Canvas bounds
    pub canvas: RectBounds,
    /// Groups in draw order (largest first)
    pub groups: Vec<GroupFrame>,
    /// Every node's rectangle by id, root and groups before their leaves.
    /// A repeated id keeps the first (outermost) node's rectangle.
    pub rects: IndexMap<String, RectBounds>,
}

impl LayoutFrame {
    /// Rectangle for a node id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<RectBounds> {
        self.rects.get(id).copied()
    }

    /// All leaves across groups, in draw order.
    pub fn leaves(&self) -> impl Iterator<Item = &LeafFrame> {
        self.groups.iter().flat_map(|g| g.leaves.iter())
    }

    /// Number of leaves.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        self.groups.iter().map(|g| g.leaves.len()).sum()
    }

    /// Topmost drawable leaf containing a point.
    #[must_use]
    pub fn leaf_at(&self, x: f64, y: f64) -> Option<&LeafFrame> {
        self.leaves()
            .find(|l| l.bounds.is_drawable() && l.bounds.contains(x, y))
    }
}

/// Stateless nested layout orchestrator.
#[derive(Debug, Clone, Copy, Default)]
pub struct NestedLayout;

impl NestedLayout {
    /// Lay out a market → group → leaf tree.
    ///
    /// Groups are stable-sorted by descending weight and partitioned over the
    /// canvas with `outer_padding`. Each group then gives up
    /// `group_header_height` at its top and partitions its leaves, also
    /// stable-sorted, inside the rest with `inner_padding`. A group whose
    /// residual interior is not drawable gives every leaf a degenerate
    /// rectangle.
    #[must_use]
    pub fn compute(root: &WeightedNode, config: &LayoutConfig) -> LayoutFrame {
        let canvas = RectBounds::from_size(config.canvas_width, config.canvas_height);
        let mut rects = IndexMap::new();
        rects.insert(root.id.clone(), canvas);

        let groups = sorted_by_weight(root.children());
        let weights: Vec<f64> = groups.iter().map(|g| g.weight).collect();
        let group_rects = partition_with(&weights, canvas, config.outer_padding, config.snap);

        let mut frames = Vec::with_capacity(groups.len());
        let mut skipped = 0usize;
        for (group, bounds) in groups.into_iter().zip(group_rects) {
            index_rect(&mut rects, &group.id, bounds);
            let frame = layout_group(group, bounds, config);
            if !group.children().is_empty() && !frame.interior.is_drawable() {
                skipped += 1;
                log::debug!(
                    target: "marketmap::nested",
                    "group {} has no room for leaves ({:.1}x{:.1})",
                    group.id,
                    bounds.width(),
                    bounds.height()
                );
            }
            frames.push(frame);
        }

        for leaf in frames.iter().flat_map(|g| g.leaves.iter()) {
            index_rect(&mut rects, &leaf.id, leaf.bounds);
        }

        log::debug!(
            target: "marketmap::nested",
            "laid out {} groups ({} skipped) on {}x{} {} canvas",
            frames.len(),
            skipped,
            config.canvas_width,
            config.canvas_height,
            config.device_profile.as_str()
        );

        LayoutFrame {
            canvas,
            groups: frames,
            rects,
        }
    }
}

/// Build the tree for `groups` and lay it out.
#[must_use]
pub fn layout_groups(groups: &GroupMap, config: &LayoutConfig) -> LayoutFrame {
    NestedLayout::compute(&hierarchy::build(groups), config)
}

fn layout_group(group: &WeightedNode, bounds: RectBounds, config: &LayoutConfig) -> GroupFrame {
    let (header, rest) = bounds.split_top(config.group_header_height);
    let interior = rest.inset(config.inner_padding.max(0.0));
    let leaves = sorted_by_weight(group.children());

    let leaf_rects = if interior.is_drawable() {
        let weights: Vec<f64> = leaves.iter().map(|l| l.weight).collect();
        partition_with(&weights, rest, config.inner_padding, config.snap)
    } else {
        let corner = snap(RectBounds::degenerate_at(interior.x1, interior.y1), config.snap);
        vec![corner; leaves.len()]
    };

    GroupFrame {
        id: group.id.clone(),
        label: group.name.clone(),
        change_percent: group.change_percent,
        bounds,
        header: snap(header, config.snap),
        interior: snap(interior, config.snap),
        leaves: leaves
            .into_iter()
            .zip(leaf_rects)
            .map(|(leaf, bounds)| LeafFrame {
                id: leaf.id.clone(),
                name: leaf.name.clone(),
                change_percent: leaf.change_percent,
                bounds,
            })
            .collect(),
    }
}

/// Record `bounds` under `id` unless an earlier node already claimed it.
fn index_rect(rects: &mut IndexMap<String, RectBounds>, id: &str, bounds: RectBounds) {
    if rects.contains_key(id) {
        log::warn!(target: "marketmap::nested", "id {id} is used by more than one node; keeping the first");
        return;
    }
    rects.insert(id.to_string(), bounds);
}

/// Stable descending sort by weight.
fn sorted_by_weight(nodes: &[WeightedNode]) -> Vec<&WeightedNode> {
    let mut sorted: Vec<&WeightedNode> = nodes.iter().collect();
    sorted.sort_by(|a, b| b.weight.total_cmp(&a.weight));
    sorted
}

fn snap(bounds: RectBounds, mode: SnapMode) -> RectBounds {
    match mode {
        SnapMode::Pixel => bounds.snapped(),
        SnapMode::None => bounds,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::{GroupInput, LeafRecord};

    fn two_groups() -> GroupMap {
        let mut groups = GroupMap::new();
        groups.insert(
            "small".into(),
            GroupInput::new("Small", vec![LeafRecord::new("s1", "S1", 400.0, -1.0)]),
        );
        groups.insert(
            "big".into(),
            GroupInput::new(
                "Big",
                vec![
                    LeafRecord::new("b2", "B2", 200.0, 0.5),
                    LeafRecord::new("b1", "B1", 400.0, 2.5),
                ],
            ),
        );
        groups
    }

    fn flat_config() -> LayoutConfig {
        LayoutConfig::for_profile(crate::DeviceProfile::Desktop, 1000.0, 500.0)
            .with_padding(0.0, 0.0, 20.0)
    }

    #[test]
    fn test_groups_sorted_largest_first() {
        let frame = layout_groups(&two_groups(), &flat_config());
        let ids: Vec<&str> = frame.groups.iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, ["big", "small"]);
        let leaf_ids: Vec<&str> = frame.groups[0].leaves.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(leaf_ids, ["b1", "b2"]);
    }

    #[test]
    fn test_outer_stage_geometry() {
        let frame = layout_groups(&two_groups(), &flat_config());
        // 600:400 over 1000x500: one column of 600 then the remainder
        assert_eq!(frame.groups[0].bounds, RectBounds::new(0.0, 0.0, 600.0, 500.0));
        assert_eq!(frame.groups[1].bounds, RectBounds::new(600.0, 0.0, 1000.0, 500.0));
        assert_eq!(frame.groups[0].header, RectBounds::new(0.0, 0.0, 600.0, 20.0));
        assert_eq!(frame.groups[0].interior, RectBounds::new(0.0, 20.0, 600.0, 500.0));
    }

    #[test]
    fn test_leaves_tile_interior() {
        let frame = layout_groups(&two_groups(), &flat_config());
        let big = &frame.groups[0];
        let total: f64 = big.leaves.iter().map(|l| l.bounds.area()).sum();
        assert!((total - big.interior.area()).abs() < 1e-6);
        assert_eq!(big.leaves[0].bounds.overlap_area(&big.leaves[1].bounds), 0.0);
        for leaf in &big.leaves {
            assert!(leaf.bounds.y0 >= big.header.y1);
        }
    }

    #[test]
    fn test_rects_index() {
        let frame = layout_groups(&two_groups(), &flat_config());
        assert_eq!(frame.rects.len(), 1 + 2 + 3);
        assert_eq!(frame.get("market"), Some(frame.canvas));
        assert_eq!(frame.get("s1"), Some(frame.groups[1].leaves[0].bounds));
        assert_eq!(frame.get("missing"), None);
        assert_eq!(frame.leaf_count(), 3);
    }

    #[test]
    fn test_repeated_ids_keep_outer_rect() {
        let mut groups = GroupMap::new();
        groups.insert(
            "market".into(),
            GroupInput::new("Shadow", vec![LeafRecord::new("600036", "CMB", 600.0, 1.0)]),
        );
        groups.insert(
            "bank".into(),
            GroupInput::new("Bank", vec![LeafRecord::new("bank", "Bank leaf", 400.0, 0.0)]),
        );
        let frame = layout_groups(&groups, &LayoutConfig::for_viewport(1200.0, 800.0));

        assert_eq!(frame.get("market"), Some(frame.canvas));
        let bank = frame.groups.iter().find(|g| g.id == "bank").unwrap();
        assert_eq!(frame.get("bank"), Some(bank.bounds));
        assert_ne!(frame.get("bank"), Some(bank.leaves[0].bounds));
        assert_eq!(frame.rects.len(), 3);
        // the frame itself still has every node
        assert_eq!(frame.groups.len(), 2);
        assert_eq!(frame.leaf_count(), 2);
    }

    #[test]
    fn test_header_taller_than_group_skips_leaves() {
        let config = LayoutConfig::for_profile(crate::DeviceProfile::Desktop, 200.0, 30.0)
            .with_padding(0.0, 2.0, 28.0);
        let frame = layout_groups(&two_groups(), &config);
        for group in &frame.groups {
            assert!(!group.interior.is_drawable());
            assert!(!group.has_drawable_leaves());
        }
    }

    #[test]
    fn test_compute_is_deterministic() {
        let groups = two_groups();
        let config = LayoutConfig::for_viewport(1280.0, 720.0);
        assert_eq!(layout_groups(&groups, &config), layout_groups(&groups, &config));
    }

    #[test]
    fn test_leaf_at() {
        let frame = layout_groups(&two_groups(), &flat_config());
        assert_eq!(frame.leaf_at(700.0, 250.0).map(|l| l.id.as_str()), Some("s1"));
        // header strip is not a leaf
        assert!(frame.leaf_at(10.0, 5.0).is_none());
    }

    #[test]
    fn test_empty_input() {
        let frame = layout_groups(&GroupMap::new(), &LayoutConfig::default());
        assert!(frame.groups.is_empty());
        assert_eq!(frame.rects.len(), 1);
    }

    #[test]
    fn test_tied_groups_keep_input_order() {
        let mut groups = GroupMap::new();
        for id in ["a", "b", "c"] {
            groups.insert(
                id.into(),
                GroupInput::new(id, vec![LeafRecord::new(format!("{id}1"), "x", 10.0, 0.0)]),
            );
        }
        let frame = layout_groups(&groups, &LayoutConfig::default());
        let ids: Vec<&str> = frame.groups.iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
    }
}
