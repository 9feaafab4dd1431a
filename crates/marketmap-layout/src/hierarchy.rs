//! Two-level weighted tree built from flat per-group records.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Id given to the root node.
pub const ROOT_ID: &str = "market";

/// One instrument as delivered by the data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeafRecord {
    /// Instrument code
    pub id: String,
    /// Display name
    pub name: String,
    /// Market capitalisation or other sizing value
    pub weight: f64,
    /// Signed change in percent
    #[serde(alias = "change_percent", default)]
    pub change_percent: f64,
}

impl LeafRecord {
    /// Create a record.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, weight: f64, change_percent: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            weight,
            change_percent,
        }
    }
}

/// One group (sector) of records.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GroupInput {
    /// Display label for the group header
    pub label: String,
    /// Member records in source order
    #[serde(default)]
    pub items: Vec<LeafRecord>,
}

impl GroupInput {
    /// Create a group.
    #[must_use]
    pub fn new(label: impl Into<String>, items: Vec<LeafRecord>) -> Self {
        Self {
            label: label.into(),
            items,
        }
    }
}

/// Ordered mapping from group id to its records.
pub type GroupMap = IndexMap<String, GroupInput>;

/// Node of the weighted tree.
///
/// Leaves have `children == None`. An interior node's weight is always the
/// sum of its children's weights; it is computed by [`build`] and never set
/// on its own.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightedNode {
    /// Stable identity used by callers to reconcile frames
    pub id: String,
    /// Display name
    pub name: String,
    /// Non-negative weight
    pub weight: f64,
    /// Signed change in percent
    pub change_percent: f64,
    /// Children in input order, `None` for leaves
    pub children: Option<Vec<WeightedNode>>,
}

impl WeightedNode {
    /// Check if this is a leaf node.
    #[must_use]
    pub const fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Children, or an empty slice for leaves.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        self.children.as_deref().unwrap_or(&[])
    }

    /// Number of leaves below (1 for a leaf).
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        match &self.children {
            None => 1,
            Some(children) => children.iter().map(Self::leaf_count).sum(),
        }
    }

    fn leaf(record: &LeafRecord) -> Self {
        let weight = if record.weight.is_finite() && record.weight >= 0.0 {
            record.weight
        } else {
            log::warn!(
                target: "marketmap::hierarchy",
                "leaf {} has invalid weight {}; using 0",
                record.id,
                record.weight
            );
            0.0
        };
        let change_percent = if record.change_percent.is_finite() {
            record.change_percent
        } else {
            0.0
        };
        Self {
            id: record.id.clone(),
            name: record.name.clone(),
            weight,
            change_percent,
            children: None,
        }
    }

    fn branch(id: &str, name: &str, children: Vec<Self>, change_percent: f64) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            weight: children.iter().map(|c| c.weight).sum(),
            change_percent,
            children: Some(children),
        }
    }
}

/// Build the market → group → leaf tree.
///
/// A group's change is the plain (unweighted) mean of its leaves' changes,
/// not a capitalisation-weighted one; the root's change is the plain mean over
/// every leaf. Empty groups have weight 0 and change 0. Input order is kept
/// at both levels.
#[must_use]
pub fn build(groups: &GroupMap) -> WeightedNode {
    let mut all_changes = Vec::new();
    let children: Vec<WeightedNode> = groups
        .iter()
        .map(|(id, group)| {
            let leaves: Vec<WeightedNode> = group.items.iter().map(WeightedNode::leaf).collect();
            let changes: Vec<f64> = leaves.iter().map(|l| l.change_percent).collect();
            let mean = mean(&changes);
            all_changes.extend(changes);
            WeightedNode::branch(id, &group.label, leaves, mean)
        })
        .collect();

    let root = WeightedNode::branch(ROOT_ID, ROOT_ID, children, mean(&all_changes));
    log::debug!(
        target: "marketmap::hierarchy",
        "built tree: {} groups, {} leaves, total weight {}",
        root.children().len(),
        all_changes.len(),
        root.weight
    );
    root
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}
