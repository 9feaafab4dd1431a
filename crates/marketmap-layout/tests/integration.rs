//! Integration tests for marketmap-layout.
//!
//! These tests drive the public API end to end: records in, frame out.

use marketmap_layout::{
    build, layout_groups, partition, partition_with, DeviceProfile, GroupInput, GroupMap,
    LayoutConfig, LeafRecord, NestedLayout, RectBounds, SnapMode,
};
use proptest::prelude::*;

// =============================================================================
// Fixtures
// =============================================================================

fn sample_market() -> GroupMap {
    let mut groups = GroupMap::new();
    groups.insert(
        "banking".into(),
        GroupInput::new(
            "银行",
            vec![
                LeafRecord::new("600036", "招商银行", 9.1e11, 1.2),
                LeafRecord::new("601398", "工商银行", 2.1e12, -0.4),
                LeafRecord::new("601939", "建设银行", 1.7e12, 0.0),
                LeafRecord::new("000001", "平安银行", 2.2e11, 3.1),
            ],
        ),
    );
    groups.insert(
        "liquor".into(),
        GroupInput::new(
            "白酒",
            vec![
                LeafRecord::new("600519", "贵州茅台", 2.1e12, -0.35),
                LeafRecord::new("000858", "五粮液", 5.4e11, 2.0),
            ],
        ),
    );
    groups.insert(
        "energy".into(),
        GroupInput::new(
            "能源",
            vec![
                LeafRecord::new("601857", "中国石油", 1.6e12, -4.5),
                LeafRecord::new("600028", "中国石化", 7.0e11, -1.1),
                LeafRecord::new("601088", "中国神华", 8.0e11, 5.2),
            ],
        ),
    );
    groups.insert("empty".into(), GroupInput::new("空", vec![]));
    groups
}

fn assert_tiles(parent: RectBounds, children: &[RectBounds]) {
    let sum: f64 = children.iter().map(RectBounds::area).sum();
    let tolerance = 1e-6 * parent.area().max(1.0);
    assert!(
        (sum - parent.area()).abs() <= tolerance,
        "children cover {sum}, parent has {}",
        parent.area()
    );
    for (i, a) in children.iter().enumerate() {
        assert!(a.x0 >= parent.x0 - 1e-9 && a.x1 <= parent.x1 + 1e-9);
        assert!(a.y0 >= parent.y0 - 1e-9 && a.y1 <= parent.y1 + 1e-9);
        for b in &children[i + 1..] {
            assert!(a.overlap_area(b) <= 1e-9, "{a:?} overlaps {b:?}");
        }
    }
}

// =============================================================================
// Partitioner
// =============================================================================

#[test]
fn test_banking_areas() {
    let rects = partition(&[500.0, 300.0, 200.0], RectBounds::from_size(400.0, 300.0), 0.0);
    let areas: Vec<f64> = rects.iter().map(RectBounds::area).collect();
    assert_eq!(areas, vec![60_000.0, 36_000.0, 24_000.0]);
}

#[test]
fn test_partition_length_matches_input() {
    let weights = [0.0, 5.0, 0.0, 1.0, f64::NAN];
    let rects = partition(&weights, RectBounds::from_size(100.0, 100.0), 2.0);
    assert_eq!(rects.len(), weights.len());
    assert!(!rects[0].is_drawable());
    assert!(rects[1].is_drawable());
    assert!(!rects[4].is_drawable());
}

// =============================================================================
// Nested layout
// =============================================================================

#[test]
fn test_every_level_tiles_without_snapping() {
    let config = LayoutConfig::for_profile(DeviceProfile::Desktop, 1234.0, 777.0)
        .with_snap(SnapMode::None);
    let frame = layout_groups(&sample_market(), &config);

    let groups: Vec<RectBounds> = frame.groups.iter().map(|g| g.bounds).collect();
    assert_tiles(frame.canvas.inset(config.outer_padding), &groups);

    for group in &frame.groups {
        if group.leaves.is_empty() {
            continue;
        }
        let leaves: Vec<RectBounds> = group.leaves.iter().map(|l| l.bounds).collect();
        assert_tiles(group.interior, &leaves);
        assert!(group.interior.y0 >= group.header.y1);
    }
}

#[test]
fn test_mobile_profile_uses_mobile_header() {
    let config = LayoutConfig::for_viewport(390.0, 844.0);
    assert_eq!(config.device_profile, DeviceProfile::Mobile);
    let frame = layout_groups(&sample_market(), &config);
    for group in frame.groups.iter().filter(|g| g.bounds.height() > 16.0) {
        assert_eq!(group.header.height(), 16.0);
    }
}

#[test]
fn test_empty_group_is_not_drawable() {
    let frame = layout_groups(&sample_market(), &LayoutConfig::default());
    let empty = frame.groups.iter().find(|g| g.id == "empty").unwrap();
    assert!(!empty.bounds.is_drawable());
    // zero weight sorts last
    assert_eq!(frame.groups.last().map(|g| g.id.as_str()), Some("empty"));
}

#[test]
fn test_compute_matches_layout_groups() {
    let groups = sample_market();
    let config = LayoutConfig::for_viewport(1440.0, 900.0);
    assert_eq!(
        NestedLayout::compute(&build(&groups), &config),
        layout_groups(&groups, &config)
    );
}

#[test]
fn test_frame_serializes() {
    let frame = layout_groups(&sample_market(), &LayoutConfig::default());
    let json = serde_json::to_value(&frame).unwrap();
    assert!(json["rects"]["600519"]["x1"].is_number());
    assert_eq!(json["groups"].as_array().map(Vec::len), Some(4));
}

#[test]
fn test_snapped_frame_has_integer_edges() {
    let frame = layout_groups(&sample_market(), &LayoutConfig::for_viewport(1001.0, 633.0));
    for rect in frame.rects.values() {
        for edge in [rect.x0, rect.y0, rect.x1, rect.y1] {
            assert_eq!(edge, edge.round());
        }
    }
}

proptest! {
    #[test]
    fn prop_nested_layout_is_idempotent(
        weights in prop::collection::vec(0.0f64..1e6, 1..40),
        width in 100.0f64..2000.0,
        height in 100.0f64..1500.0,
    ) {
        let mut groups = GroupMap::new();
        for (i, chunk) in weights.chunks(5).enumerate() {
            let items = chunk
                .iter()
                .enumerate()
                .map(|(j, &w)| LeafRecord::new(format!("{i}.{j}"), "x", w, 0.0))
                .collect();
            groups.insert(format!("g{i}"), GroupInput::new("G", items));
        }
        let config = LayoutConfig::for_viewport(width, height);
        prop_assert_eq!(layout_groups(&groups, &config), layout_groups(&groups, &config));
    }

    #[test]
    fn prop_leaves_stay_inside_group(
        weights in prop::collection::vec(1.0f64..1e6, 1..30),
        width in 200.0f64..1600.0,
        height in 200.0f64..1200.0,
    ) {
        let mut groups = GroupMap::new();
        for (i, chunk) in weights.chunks(4).enumerate() {
            let items = chunk
                .iter()
                .enumerate()
                .map(|(j, &w)| LeafRecord::new(format!("{i}.{j}"), "x", w, 0.0))
                .collect();
            groups.insert(format!("g{i}"), GroupInput::new("G", items));
        }
        let config = LayoutConfig::for_viewport(width, height).with_snap(SnapMode::None);
        let frame = layout_groups(&groups, &config);
        for group in &frame.groups {
            for leaf in &group.leaves {
                prop_assert!(leaf.bounds.x0 >= group.bounds.x0 - 1e-6);
                prop_assert!(leaf.bounds.x1 <= group.bounds.x1 + 1e-6);
                prop_assert!(leaf.bounds.y1 <= group.bounds.y1 + 1e-6);
            }
        }
    }
}

#[test]
fn test_partition_with_none_keeps_fractions() {
    let rects = partition_with(&[1.0, 1.0, 1.0], RectBounds::from_size(100.0, 10.0), 0.0, SnapMode::None);
    assert!((rects[0].x1 - 100.0 / 3.0).abs() < 1e-9);
}
