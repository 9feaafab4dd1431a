#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_const_for_fn)]
//! Market map widget and the policies it renders with.
//!
//! - [`color_policy`]: change percent → discrete red/green [`ColorToken`]
//! - [`label`]: which labels fit a cell and how names are shortened
//! - [`tooltip`]: pointer-following tooltip and its edge-aware placement
//! - [`link`]: instrument code → quote page, with a local fallback
//! - [`market_map`]: the [`MarketMap`] widget tying them together

pub mod color_policy;
pub mod label;
pub mod link;
pub mod market_map;
pub mod tooltip;

pub use color_policy::{color_for, ColorToken, NEUTRAL_EPSILON};
pub use label::{format_percent, truncate_name, CellLabels, LabelKind, LabelPolicy};
pub use link::{
    fallback_url, open_leaf_link, resolve_or_fallback, split_market, FallbackResolver, LinkError,
    LinkOpener, LinkResolver, Market, StaticResolver,
};
pub use market_map::{CellView, LeafActivated, MarketMap};
pub use tooltip::{place_tooltip, Tooltip};
