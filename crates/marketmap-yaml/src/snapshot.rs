//! Market snapshot files.

use std::collections::HashSet;
use std::path::Path;

use marketmap_layout::{GroupMap, ROOT_ID};
use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Serialization format of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// YAML (`.yaml`, `.yml`)
    Yaml,
    /// JSON (`.json`)
    Json,
}

impl Format {
    /// Pick the format from a path's extension.
    pub fn from_path(path: &Path) -> Result<Self, ParseError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "yaml" | "yml" => Ok(Self::Yaml),
            "json" => Ok(Self::Json),
            _ => Err(ParseError::UnsupportedFormat(ext)),
        }
    }
}

/// Grouped market data at one point in time.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Snapshot {
    /// Groups keyed by id, in document order
    #[serde(default)]
    pub groups: GroupMap,
}

/// Counts reported by [`Snapshot::validate`].
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SnapshotSummary {
    /// Number of groups
    pub groups: usize,
    /// Number of leaves across all groups
    pub leaves: usize,
    /// Groups without leaves
    pub empty_groups: usize,
    /// Leaves whose weight is negative or not finite (laid out as zero)
    pub invalid_weights: usize,
    /// Sum of the valid leaf weights
    pub total_weight: f64,
}

impl Snapshot {
    /// Wrap already-built groups.
    #[must_use]
    pub const fn new(groups: GroupMap) -> Self {
        Self { groups }
    }

    /// Parse a snapshot from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, ParseError> {
        Ok(serde_yaml_ng::from_str(yaml)?)
    }

    /// Parse a snapshot from JSON.
    pub fn from_json(json: &str) -> Result<Self, ParseError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse a snapshot in the given format.
    pub fn parse(content: &str, format: Format) -> Result<Self, ParseError> {
        match format {
            Format::Yaml => Self::from_yaml(content),
            Format::Json => Self::from_json(content),
        }
    }

    /// Load a snapshot file, choosing the parser by extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ParseError> {
        let path = path.as_ref();
        let format = Format::from_path(path)?;
        let content = std::fs::read_to_string(path).map_err(|source| ParseError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let snapshot = Self::parse(&content, format)?;
        log::debug!(
            target: "marketmap::snapshot",
            "loaded {} groups from {}",
            snapshot.groups.len(),
            path.display()
        );
        Ok(snapshot)
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> Result<String, ParseError> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, ParseError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check structural invariants and summarize the data.
    ///
    /// Ids share one namespace with the root: empty ids, a leaf id used
    /// twice, a group id equal to a leaf id, and the root id `market` on any
    /// node are errors. Bad weights are counted but tolerated.
    pub fn validate(&self) -> Result<SnapshotSummary, ParseError> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut summary = SnapshotSummary {
            groups: self.groups.len(),
            ..SnapshotSummary::default()
        };

        for group_id in self.groups.keys() {
            if group_id.is_empty() {
                return Err(ParseError::Validation("group with empty id".to_string()));
            }
            if group_id == ROOT_ID {
                return Err(ParseError::Validation(format!(
                    "group id {ROOT_ID} is reserved for the root"
                )));
            }
            seen.insert(group_id.as_str());
        }

        for (group_id, group) in &self.groups {
            if group.items.is_empty() {
                summary.empty_groups += 1;
            }
            for item in &group.items {
                if item.id.is_empty() {
                    return Err(ParseError::InvalidValue {
                        field: format!("groups.{group_id}.items.id"),
                        message: "leaf id must not be empty".to_string(),
                    });
                }
                if item.id == ROOT_ID || !seen.insert(item.id.as_str()) {
                    return Err(ParseError::Validation(format!(
                        "duplicate id {}",
                        item.id
                    )));
                }
                if item.weight.is_finite() && item.weight >= 0.0 {
                    summary.total_weight += item.weight;
                } else {
                    summary.invalid_weights += 1;
                }
                summary.leaves += 1;
            }
        }
        Ok(summary)
    }
}
