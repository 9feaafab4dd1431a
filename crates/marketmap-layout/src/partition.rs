//! Squarified proportional-area partitioning.
//!
//! Splits a rectangle into one sub-rectangle per weight, with areas
//! proportional to the weights, following Bruls, Huizing and van Wijk's
//! squarified treemap: cut a run of items off the longer side of the
//! remaining space, growing the run while its worst aspect ratio does not get
//! worse, then continue with what is left.
//!
//! Weights are laid out in the order given. Callers that want the usual
//! largest-first look sort before calling.

use crate::bounds::RectBounds;
use crate::config::SnapMode;

#[derive(Debug, Clone, Copy)]
struct Item {
    index: usize,
    area: f64,
}

/// Partition `bounds` (inset by `padding`) among `weights`, snapping to pixels.
///
/// See [`partition_with`].
#[must_use]
pub fn partition(weights: &[f64], bounds: RectBounds, padding: f64) -> Vec<RectBounds> {
    partition_with(weights, bounds, padding, SnapMode::Pixel)
}

/// Partition `bounds` (inset by `padding`) among `weights`.
///
/// The result has one rectangle per weight, in input order. The rectangles
/// tile the padded interior: their areas sum to the interior area and no two
/// overlap.
///
/// - Empty `weights` gives an empty result.
/// - An interior with no width or height gives degenerate rectangles at its
///   origin.
/// - If no weight is positive, every item is weighted equally.
/// - Otherwise zero, negative and non-finite weights get a zero-area
///   rectangle at the interior's bottom-right corner, and the positive items
///   tile the interior on their own.
#[must_use]
pub fn partition_with(
    weights: &[f64],
    bounds: RectBounds,
    padding: f64,
    snap: SnapMode,
) -> Vec<RectBounds> {
    if weights.is_empty() {
        return Vec::new();
    }

    let interior = bounds.inset(padding.max(0.0));
    if !interior.is_drawable() {
        let origin = emit(RectBounds::degenerate_at(interior.x0, interior.y0), snap);
        return vec![origin; weights.len()];
    }

    let items = scaled_items(weights, interior.area());
    log::trace!(
        target: "marketmap::partition",
        "partition {} weights ({} positive) into {:.1}x{:.1}",
        weights.len(),
        items.len(),
        interior.width(),
        interior.height()
    );

    let mut out = vec![RectBounds::degenerate_at(interior.x1, interior.y1); weights.len()];
    squarify(&items, interior, &mut out);
    out.into_iter().map(|b| emit(b, snap)).collect()
}

/// Convert weights into areas that sum to `area`.
fn scaled_items(weights: &[f64], area: f64) -> Vec<Item> {
    let valid = |w: f64| w.is_finite() && w > 0.0;
    let max = weights.iter().copied().filter(|&w| valid(w)).fold(0.0, f64::max);

    // Normalizing by the largest weight keeps the sum finite for huge values.
    let normalized: Vec<f64> = if max > 0.0 {
        weights
            .iter()
            .map(|&w| if valid(w) { w / max } else { 0.0 })
            .collect()
    } else {
        vec![1.0; weights.len()]
    };

    let total: f64 = normalized.iter().sum();
    let scale = area / total;
    normalized
        .iter()
        .enumerate()
        .filter(|&(_, &w)| w > 0.0)
        .map(|(index, &w)| Item {
            index,
            area: w * scale,
        })
        .collect()
}

fn squarify(items: &[Item], mut remaining: RectBounds, out: &mut [RectBounds]) {
    let mut start = 0;
    while start < items.len() {
        let side = remaining.width().min(remaining.height());
        let mut run = Run::new(items[start].area);
        let mut end = start + 1;
        let mut worst = run.worst_ratio(side);

        while end < items.len() {
            let grown = run.with(items[end].area);
            let grown_worst = grown.worst_ratio(side);
            // Equal ratios keep growing the run: fewer strips.
            if grown_worst > worst {
                break;
            }
            run = grown;
            worst = grown_worst;
            end += 1;
        }

        let is_last = end == items.len();
        remaining = place_run(&items[start..end], run.area, remaining, is_last, out);
        start = end;
    }
}

#[derive(Debug, Clone, Copy)]
struct Run {
    area: f64,
    min: f64,
    max: f64,
}

impl Run {
    const fn new(area: f64) -> Self {
        Self {
            area,
            min: area,
            max: area,
        }
    }

    fn with(self, area: f64) -> Self {
        Self {
            area: self.area + area,
            min: self.min.min(area),
            max: self.max.max(area),
        }
    }

    /// Worst aspect ratio of the run laid along a side of length `side`.
    fn worst_ratio(&self, side: f64) -> f64 {
        if side <= 0.0 || self.area <= 0.0 || self.min <= 0.0 {
            return f64::INFINITY;
        }
        let side_sq = side * side;
        let area_sq = self.area * self.area;
        (side_sq * self.max / area_sq).max(area_sq / (side_sq * self.min))
    }
}

/// Lay a run as a strip across the shorter side and return the space left.
///
/// The last run takes the remaining rectangle whole, and the last item of a
/// run ends exactly on the strip's far edge, so rounding error never opens a
/// gap.
fn place_run(
    run: &[Item],
    run_area: f64,
    rect: RectBounds,
    is_last: bool,
    out: &mut [RectBounds],
) -> RectBounds {
    let fraction = if is_last || rect.area() <= 0.0 {
        1.0
    } else {
        (run_area / rect.area()).min(1.0)
    };

    let mut acc = 0.0;
    if rect.width() >= rect.height() {
        // Column on the left, items stacked top to bottom.
        let split = if is_last {
            rect.x1
        } else {
            rect.width().mul_add(fraction, rect.x0)
        };
        let mut y = rect.y0;
        for (i, item) in run.iter().enumerate() {
            acc += item.area;
            let next = if i + 1 == run.len() {
                rect.y1
            } else {
                rect.height().mul_add(acc / run_area, rect.y0)
            };
            out[item.index] = RectBounds::new(rect.x0, y, split, next);
            y = next;
        }
        RectBounds::new(split, rect.y0, rect.x1, rect.y1)
    } else {
        // Row along the top, items left to right.
        let split = if is_last {
            rect.y1
        } else {
            rect.height().mul_add(fraction, rect.y0)
        };
        let mut x = rect.x0;
        for (i, item) in run.iter().enumerate() {
            acc += item.area;
            let next = if i + 1 == run.len() {
                rect.x1
            } else {
                rect.width().mul_add(acc / run_area, rect.x0)
            };
            out[item.index] = RectBounds::new(x, rect.y0, next, split);
            x = next;
        }
        RectBounds::new(rect.x0, split, rect.x1, rect.y1)
    }
}

fn emit(bounds: RectBounds, snap: SnapMode) -> RectBounds {
    match snap {
        SnapMode::Pixel => bounds.snapped(),
        SnapMode::None => bounds,
    }
}
