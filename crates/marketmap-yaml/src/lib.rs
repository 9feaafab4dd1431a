//! Snapshot and settings files for marketmap.
//!
//! Snapshots are YAML or JSON, chosen by file extension:
//!
//! ```yaml
//! groups:
//!   banking:
//!     label: 银行
//!     items:
//!       - { id: "600036", name: 招商银行, weight: 9.1e11, changePercent: 1.2 }
//! ```
//!
//! Settings are YAML and override per-profile thresholds, the mobile
//! breakpoint and snapping.

mod error;
mod settings;
mod snapshot;

pub use error::ParseError;
pub use settings::{ProfileOverrides, Settings, ThresholdOverrides};
pub use snapshot::{Format, Snapshot, SnapshotSummary};
