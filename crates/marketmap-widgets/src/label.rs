//! Decides which labels a cell shows and how names are shortened.

use marketmap_layout::{ProfileThresholds, RectBounds};
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

/// Smallest name budget in characters.
const MIN_CHARS: usize = 2;

/// Number of trailing digits kept from long numeric names.
const NUMERIC_TAIL: usize = 4;

const ELLIPSIS: &str = "…";

/// Which label a fit decision is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LabelKind {
    /// Instrument name
    Name,
    /// Formatted percentage change
    Percent,
}

/// Labels chosen for one cell.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CellLabels {
    /// Possibly shortened name
    pub name: Option<String>,
    /// Formatted change
    pub percent: Option<String>,
    /// Font size for both labels
    pub font_size: f64,
}

impl CellLabels {
    /// Whether no label is shown.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.percent.is_none()
    }
}

/// Label fit policy for one device profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelPolicy {
    thresholds: ProfileThresholds,
}

impl Default for LabelPolicy {
    fn default() -> Self {
        Self::new(ProfileThresholds::DESKTOP)
    }
}

impl LabelPolicy {
    /// Create a policy from profile thresholds.
    #[must_use]
    pub const fn new(thresholds: ProfileThresholds) -> Self {
        Self { thresholds }
    }

    /// Thresholds in use.
    #[must_use]
    pub const fn thresholds(&self) -> &ProfileThresholds {
        &self.thresholds
    }

    /// Whether the cell is large enough for a name.
    #[must_use]
    pub fn name_fits(&self, rect: &RectBounds) -> bool {
        rect.width() >= self.thresholds.min_name_width
            && rect.height() >= self.thresholds.min_name_height
    }

    /// Whether the cell is large enough for a percent label as well.
    #[must_use]
    pub fn percent_fits(&self, rect: &RectBounds) -> bool {
        self.name_fits(rect)
            && rect.width() >= self.thresholds.min_percent_width
            && rect.height() >= self.thresholds.min_percent_height
    }

    /// Font size for labels in `rect`.
    #[must_use]
    pub fn font_size(&self, rect: &RectBounds) -> f64 {
        let t = &self.thresholds;
        (rect.width() / t.width_divisor)
            .min(rect.height() / t.height_divisor)
            .min(t.max_font_size)
            .max(0.0)
    }

    /// Visible name length budget for `rect`.
    #[must_use]
    pub fn max_chars(&self, rect: &RectBounds) -> usize {
        let cap = self.thresholds.max_chars.max(MIN_CHARS);
        let by_width = (rect.width() / self.thresholds.char_pixel_ratio).floor();
        if by_width.is_nan() {
            return MIN_CHARS;
        }
        (by_width.max(0.0) as usize).clamp(MIN_CHARS, cap)
    }

    /// Decide the text for one label, or `None` if the cell is too small.
    #[must_use]
    pub fn fit(&self, rect: &RectBounds, text: &str, kind: LabelKind) -> Option<String> {
        if text.is_empty() {
            return None;
        }
        match kind {
            LabelKind::Name if self.name_fits(rect) => {
                Some(truncate_name(text, self.max_chars(rect)))
            }
            LabelKind::Percent if self.percent_fits(rect) => Some(text.to_string()),
            _ => None,
        }
    }

    /// Both label decisions for a cell.
    #[must_use]
    pub fn labels(&self, rect: &RectBounds, name: &str, change_percent: f64) -> CellLabels {
        CellLabels {
            name: self.fit(rect, name, LabelKind::Name),
            percent: self.fit(rect, &format_percent(change_percent), LabelKind::Percent),
            font_size: self.font_size(rect),
        }
    }
}

/// Shorten a name to at most `max_chars` grapheme clusters.
///
/// - Special-treatment names (`ST`, `*ST`, `S*ST` followed by anything but an
///   ASCII letter) are cut without an ellipsis so the status prefix stays visible.
/// - Long all-digit names keep their last four digits.
/// - Anything else keeps `max_chars - 1` graphemes and ends with `…`.
#[must_use]
pub fn truncate_name(name: &str, max_chars: usize) -> String {
    let graphemes: Vec<&str> = name.graphemes(true).collect();
    if graphemes.len() <= max_chars {
        return name.to_string();
    }
    if is_special_status(name) {
        return graphemes[..max_chars].concat();
    }
    if graphemes.len() > NUMERIC_TAIL && name.chars().all(|c| c.is_ascii_digit()) {
        return graphemes[graphemes.len() - NUMERIC_TAIL..].concat();
    }
    let keep = max_chars.saturating_sub(1);
    let mut out = graphemes[..keep].concat();
    out.push_str(ELLIPSIS);
    out
}

const STATUS_PREFIXES: [&str; 3] = ["S*ST", "*ST", "ST"];

/// A status prefix only counts when no ASCII letter follows it, so
/// `STMicro` is an ordinary name.
fn is_special_status(name: &str) -> bool {
    STATUS_PREFIXES.iter().any(|prefix| {
        name.strip_prefix(prefix)
            .is_some_and(|rest| !rest.starts_with(|c: char| c.is_ascii_alphabetic()))
    })
}

/// Format a change as a signed percentage with two decimals.
///
/// `5.2` gives `+5.20%` and `-0.3` gives `-0.30%`. Anything that rounds to
/// zero prints unsigned, so `-0.004` gives `0.00%` rather than `-0.00%`.
#[must_use]
pub fn format_percent(change_percent: f64) -> String {
    if !change_percent.is_finite() || (change_percent * 100.0).round() == 0.0 {
        "0.00%".to_string()
    } else if change_percent > 0.0 {
        format!("+{change_percent:.2}%")
    } else {
        format!("{change_percent:.2}%")
    }
}
