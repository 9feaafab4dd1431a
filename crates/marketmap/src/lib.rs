//! marketmap: two-level squarified market map.
//!
//! Groups (sectors) are laid out over the canvas by total weight, then each
//! group's instruments are laid out inside it. Cells are colored by their
//! change (red up, green down) and labeled when they are large enough.
//!
//! ```
//! use marketmap::layout::{layout_groups, GroupInput, GroupMap, LayoutConfig, LeafRecord};
//!
//! let mut groups = GroupMap::new();
//! groups.insert(
//!     "banking".to_string(),
//!     GroupInput::new("Banking", vec![LeafRecord::new("600036", "CMB", 9.1e11, 1.2)]),
//! );
//! let frame = layout_groups(&groups, &LayoutConfig::for_viewport(1200.0, 800.0));
//! assert!(frame.get("600036").is_some_and(|r| r.is_drawable()));
//! ```

#![allow(clippy::module_name_repetitions, clippy::doc_markdown)]

pub use marketmap_core::*;
pub use marketmap_layout as layout;
pub use marketmap_widgets as widgets;
pub use marketmap_yaml as yaml;

use marketmap_layout::{DeviceProfile, GroupMap};
use marketmap_widgets::MarketMap;
use marketmap_yaml::Settings;

/// Build a [`MarketMap`] configured from a settings file.
#[must_use]
pub fn market_map(groups: GroupMap, settings: &Settings, pinned: Option<DeviceProfile>) -> MarketMap {
    let mut map = MarketMap::new(groups)
        .with_thresholds(DeviceProfile::Desktop, settings.thresholds(DeviceProfile::Desktop))
        .with_thresholds(DeviceProfile::Mobile, settings.thresholds(DeviceProfile::Mobile))
        .with_breakpoint(settings.breakpoint)
        .with_snap(settings.snap);
    if let Some(profile) = pinned {
        map = map.pin_profile(profile);
    }
    map
}

/// Lay out and paint a map into a standalone SVG document.
#[must_use]
pub fn render_svg(
    groups: GroupMap,
    settings: &Settings,
    width: f32,
    height: f32,
    pinned: Option<DeviceProfile>,
) -> String {
    let mut map = market_map(groups, settings, pinned);
    map.layout(Rect::new(0.0, 0.0, width, height));
    let mut canvas = SvgCanvas::new(width, height);
    map.paint(&mut canvas);
    canvas.finish()
}
