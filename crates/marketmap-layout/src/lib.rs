#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::float_cmp)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::doc_markdown)]
//! Layout engine for marketmap.
//!
//! Turns grouped, weighted records into a nested squarified treemap:
//!
//! - **Hierarchy**: [`build`] aggregates flat per-group records into a
//!   market → group → leaf [`WeightedNode`] tree.
//! - **Partitioning**: [`partition`] splits one rectangle among weights with
//!   areas proportional to the weights and near-square cells.
//! - **Nesting**: [`NestedLayout`] lays out groups over the canvas, reserves a
//!   header strip per group, and lays out leaves inside each group.
//!
//! Layout never fails. When space runs out, cells come back degenerate
//! (zero width or height) and callers skip drawing them.

mod bounds;
mod config;
mod hierarchy;
mod nested;
mod partition;

pub use bounds::RectBounds;
pub use config::{DeviceProfile, LayoutConfig, ProfileThresholds, SnapMode, MOBILE_BREAKPOINT};
pub use hierarchy::{build, GroupInput, GroupMap, LeafRecord, WeightedNode, ROOT_ID};
pub use nested::{layout_groups, GroupFrame, LayoutFrame, LeafFrame, NestedLayout};
pub use partition::{partition, partition_with};
