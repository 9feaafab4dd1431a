//! Pointer-following tooltip.

use marketmap_core::{
    widget::{LayoutResult, TextStyle},
    Canvas, Color, Event, FontWeight, Point, Rect, Size, TypeId, Widget,
};
use serde::{Deserialize, Serialize};
use std::any::Any;

/// Compute the top-left corner for a tooltip of `size` near `pointer`.
///
/// The preferred spot is right of and above the pointer, `offset` pixels
/// away on both axes. The box flips to the left of the pointer when it would
/// cross the right edge of `viewport`, flips below when it would cross the
/// top edge, and is finally clamped inside the viewport.
#[must_use]
pub fn place_tooltip(pointer: Point, size: Size, viewport: Rect, offset: f32) -> Point {
    let mut x = pointer.x + offset;
    if x + size.width > viewport.right() {
        x = pointer.x - offset - size.width;
    }
    let mut y = pointer.y - offset - size.height;
    if y < viewport.y {
        y = pointer.y + offset;
    }
    Point::new(
        clamp_axis(x, viewport.x, viewport.right() - size.width),
        clamp_axis(y, viewport.y, viewport.bottom() - size.height),
    )
}

/// Clamp without panicking when the box is larger than the viewport.
fn clamp_axis(value: f32, min: f32, max: f32) -> f32 {
    value.min(max).max(min)
}

/// Tooltip showing a few lines of text next to the pointer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tooltip {
    /// Lines of content; the first is drawn bold
    lines: Vec<String>,
    /// Whether tooltip is currently visible
    visible: bool,
    /// Distance from the pointer
    offset: f32,
    /// Background color
    background: Color,
    /// Text color
    text_color: Color,
    /// Border color
    border_color: Color,
    /// Border width
    border_width: f32,
    /// Padding
    padding: f32,
    /// Text size
    text_size: f32,
    /// Pointer position the tooltip follows
    #[serde(skip)]
    pointer: Point,
    /// Cached bounds
    #[serde(skip)]
    bounds: Rect,
}

impl Default for Tooltip {
    fn default() -> Self {
        Self {
            lines: Vec::new(),
            visible: false,
            offset: 12.0,
            background: Color::new(0.1, 0.1, 0.12, 0.92),
            text_color: Color::WHITE,
            border_color: Color::new(0.35, 0.35, 0.38, 1.0),
            border_width: 1.0,
            padding: 8.0,
            text_size: 12.0,
            pointer: Point::ORIGIN,
            bounds: Rect::default(),
        }
    }
}

impl Tooltip {
    /// Create a hidden tooltip with content.
    #[must_use]
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Set the distance from the pointer.
    #[must_use]
    pub fn offset(mut self, offset: f32) -> Self {
        self.offset = offset.max(0.0);
        self
    }

    /// Set background color.
    #[must_use]
    pub const fn background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    /// Set text color.
    #[must_use]
    pub const fn text_color(mut self, color: Color) -> Self {
        self.text_color = color;
        self
    }

    /// Set padding.
    #[must_use]
    pub fn padding(mut self, padding: f32) -> Self {
        self.padding = padding.max(0.0);
        self
    }

    /// Set text size.
    #[must_use]
    pub fn text_size(mut self, size: f32) -> Self {
        self.text_size = size.max(8.0);
        self
    }

    /// Content lines.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Check if visible.
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.visible
    }

    /// Current bounds (zero when hidden or not laid out).
    #[must_use]
    pub const fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Replace the content and show the tooltip at `pointer`.
    pub fn show_at<I, S>(&mut self, lines: I, pointer: Point)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lines = lines.into_iter().map(Into::into).collect();
        self.pointer = pointer;
        self.visible = true;
    }

    /// Move the anchor pointer without changing content.
    pub fn follow(&mut self, pointer: Point) {
        self.pointer = pointer;
    }

    /// Hide the tooltip.
    pub fn hide(&mut self) {
        self.visible = false;
        self.bounds = Rect::default();
    }

    fn line_height(&self) -> f32 {
        self.text_size * 1.4
    }

    /// Rough text width: wide for CJK and other non-ASCII, narrow for ASCII.
    fn estimate_line_width(&self, line: &str) -> f32 {
        line.chars()
            .map(|c| if c.is_ascii() { 0.6 } else { 1.0 })
            .sum::<f32>()
            * self.text_size
    }

    /// Box size for the current content.
    #[must_use]
    pub fn estimate_size(&self) -> Size {
        let text_width = self
            .lines
            .iter()
            .map(|l| self.estimate_line_width(l))
            .fold(0.0, f32::max);
        let text_height = self.lines.len() as f32 * self.line_height();
        Size::new(
            self.padding.mul_add(2.0, text_width),
            self.padding.mul_add(2.0, text_height),
        )
    }
}

impl Widget for Tooltip {
    fn type_id(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    /// `bounds` is the viewport the tooltip must stay inside.
    fn layout(&mut self, bounds: Rect) -> LayoutResult {
        if !self.visible || self.lines.is_empty() {
            self.bounds = Rect::default();
            return LayoutResult { size: Size::ZERO };
        }

        let size = self.estimate_size();
        let position = place_tooltip(self.pointer, size, bounds, self.offset);
        self.bounds = Rect::new(position.x, position.y, size.width, size.height);
        LayoutResult { size }
    }

    fn paint(&self, canvas: &mut dyn Canvas) {
        if !self.visible || self.lines.is_empty() {
            return;
        }

        canvas.fill_rect(self.bounds, self.background);
        if self.border_width > 0.0 {
            canvas.stroke_rect(self.bounds, self.border_color, self.border_width);
        }

        let line_height = self.line_height();
        for (i, line) in self.lines.iter().enumerate() {
            let style = TextStyle {
                size: self.text_size,
                color: self.text_color,
                weight: if i == 0 {
                    FontWeight::Bold
                } else {
                    FontWeight::Normal
                },
                ..TextStyle::default()
            };
            let y = (i as f32 + 0.5).mul_add(line_height, self.bounds.y + self.padding);
            canvas.draw_text(line, Point::new(self.bounds.x + self.padding, y), &style);
        }
    }

    fn event(&mut self, event: &Event) -> Option<Box<dyn Any + Send>> {
        // Visibility is driven by the owning widget
        if matches!(event, Event::MouseLeave) {
            self.hide();
        }
        None
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marketmap_core::{DrawCommand, RecordingCanvas};

    const VIEWPORT: Rect = Rect::new(0.0, 0.0, 800.0, 600.0);

    // ===== Placement Tests =====

    #[test]
    fn test_default_is_right_and_above() {
        let p = place_tooltip(Point::new(100.0, 300.0), Size::new(120.0, 40.0), VIEWPORT, 12.0);
        assert_eq!(p, Point::new(112.0, 248.0));
    }

    #[test]
    fn test_flips_left_at_right_edge() {
        let pointer = Point::new(795.0, 300.0);
        let size = Size::new(120.0, 40.0);
        let p = place_tooltip(pointer, size, VIEWPORT, 12.0);
        assert!(p.x + size.width <= pointer.x);
        assert_eq!(p.x, 663.0);
    }

    #[test]
    fn test_flips_below_at_top_edge() {
        let p = place_tooltip(Point::new(100.0, 20.0), Size::new(120.0, 40.0), VIEWPORT, 12.0);
        assert_eq!(p.y, 32.0);
    }

    #[test]
    fn test_clamped_inside_viewport() {
        let size = Size::new(300.0, 200.0);
        let p = place_tooltip(Point::new(100.0, 590.0), size, VIEWPORT, 12.0);
        assert!(p.x >= 0.0 && p.x + size.width <= 800.0);
        assert!(p.y >= 0.0 && p.y + size.height <= 600.0);
    }

    #[test]
    fn test_oversized_box_pins_to_origin() {
        let p = place_tooltip(Point::new(10.0, 10.0), Size::new(900.0, 700.0), VIEWPORT, 12.0);
        assert_eq!(p, Point::new(0.0, 0.0));
    }

    // ===== Widget Tests =====

    #[test]
    fn test_hidden_tooltip_paints_nothing() {
        let mut tooltip = Tooltip::new(["招商银行"]);
        tooltip.layout(VIEWPORT);
        let mut canvas = RecordingCanvas::new();
        tooltip.paint(&mut canvas);
        assert!(canvas.is_empty());
    }

    #[test]
    fn test_show_layout_paint() {
        let mut tooltip = Tooltip::default();
        tooltip.show_at(["招商银行 600036", "+1.25%"], Point::new(200.0, 200.0));
        let result = tooltip.layout(VIEWPORT);
        assert!(result.size.width > 0.0);
        assert_eq!(tooltip.bounds().x, 212.0);

        let mut canvas = RecordingCanvas::new();
        tooltip.paint(&mut canvas);
        assert_eq!(canvas.texts(), vec!["招商银行 600036", "+1.25%"]);
        assert!(matches!(canvas.commands()[0], DrawCommand::FillRect { .. }));
    }

    #[test]
    fn test_cjk_wider_than_ascii() {
        let tooltip = Tooltip::default();
        assert!(tooltip.estimate_line_width("银行") > tooltip.estimate_line_width("ab"));
    }

    #[test]
    fn test_mouse_leave_hides() {
        let mut tooltip = Tooltip::default();
        tooltip.show_at(["x"], Point::new(1.0, 1.0));
        assert!(tooltip.event(&Event::MouseLeave).is_none());
        assert!(!tooltip.is_visible());
    }
}
