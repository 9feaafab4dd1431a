//! Market map widget: nested treemap rendering plus pointer and touch input.

use std::any::Any;
use std::time::Instant;

use marketmap_core::{
    widget::{LayoutResult, TextStyle},
    Canvas, Color, Event, FontWeight, GestureConfig, GestureRecognizer, MouseButton, Point, Rect,
    TextAlign, TypeId, Widget,
};
use marketmap_layout::{
    layout_groups, DeviceProfile, GroupFrame, GroupMap, LayoutConfig, LayoutFrame, LeafFrame,
    ProfileThresholds, RectBounds, SnapMode, MOBILE_BREAKPOINT,
};
use serde::Serialize;

use crate::color_policy::{color_for, ColorToken};
use crate::label::{format_percent, CellLabels, LabelKind, LabelPolicy};
use crate::tooltip::Tooltip;

/// Message emitted when a leaf is double-clicked or double-tapped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafActivated {
    /// Instrument code of the leaf
    pub code: String,
}

/// Render decision for one drawable leaf.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellView {
    /// Leaf id
    pub id: String,
    /// Cell rectangle in widget coordinates
    pub bounds: RectBounds,
    /// Fill token
    pub color: ColorToken,
    /// Labels that fit
    pub labels: CellLabels,
    /// Whether the pointer is over this cell
    pub hovered: bool,
}

const GROUP_BACKGROUND: Color = Color {
    r: 0.1,
    g: 0.1,
    b: 0.11,
    a: 1.0,
};
const HEADER_BACKGROUND: Color = Color {
    r: 0.17,
    g: 0.17,
    b: 0.19,
    a: 1.0,
};
const CELL_BORDER: Color = Color {
    r: 0.0,
    g: 0.0,
    b: 0.0,
    a: 0.35,
};
const HOVER_BORDER: Color = Color {
    r: 1.0,
    g: 0.84,
    b: 0.31,
    a: 1.0,
};

/// Interactive nested treemap of a market snapshot.
///
/// Geometry is recomputed from scratch on every [`Widget::layout`] call and
/// on [`MarketMap::set_groups`]; nothing is patched incrementally.
#[derive(Debug, Clone)]
pub struct MarketMap {
    groups: GroupMap,
    desktop: ProfileThresholds,
    mobile: ProfileThresholds,
    breakpoint: f64,
    snap: SnapMode,
    pinned: Option<DeviceProfile>,
    bounds: Rect,
    profile: DeviceProfile,
    policy: LabelPolicy,
    frame: LayoutFrame,
    hovered: Option<String>,
    tooltip: Tooltip,
    gestures: GestureRecognizer,
    touch_tooltip: bool,
}

impl Default for MarketMap {
    fn default() -> Self {
        Self::new(GroupMap::new())
    }
}

impl MarketMap {
    /// Create a map over `groups`. Call [`Widget::layout`] before painting.
    #[must_use]
    pub fn new(groups: GroupMap) -> Self {
        Self {
            groups,
            desktop: ProfileThresholds::DESKTOP,
            mobile: ProfileThresholds::MOBILE,
            breakpoint: MOBILE_BREAKPOINT,
            snap: SnapMode::Pixel,
            pinned: None,
            bounds: Rect::default(),
            profile: DeviceProfile::Desktop,
            policy: LabelPolicy::default(),
            frame: LayoutFrame::default(),
            hovered: None,
            tooltip: Tooltip::default(),
            gestures: GestureRecognizer::new(),
            touch_tooltip: false,
        }
    }

    /// Override the thresholds of one profile.
    #[must_use]
    pub const fn with_thresholds(mut self, profile: DeviceProfile, thresholds: ProfileThresholds) -> Self {
        match profile {
            DeviceProfile::Desktop => self.desktop = thresholds,
            DeviceProfile::Mobile => self.mobile = thresholds,
        }
        self
    }

    /// Set the width below which the mobile profile is used.
    #[must_use]
    pub const fn with_breakpoint(mut self, breakpoint: f64) -> Self {
        self.breakpoint = breakpoint;
        self
    }

    /// Set the snap mode.
    #[must_use]
    pub const fn with_snap(mut self, snap: SnapMode) -> Self {
        self.snap = snap;
        self
    }

    /// Always use `profile` instead of choosing by width.
    #[must_use]
    pub const fn pin_profile(mut self, profile: DeviceProfile) -> Self {
        self.pinned = Some(profile);
        self
    }

    /// Use custom gesture thresholds.
    #[must_use]
    pub fn with_gestures(mut self, config: GestureConfig) -> Self {
        self.gestures = GestureRecognizer::with_config(config);
        self
    }

    /// Replace the data and recompute the frame.
    pub fn set_groups(&mut self, groups: GroupMap) {
        self.groups = groups;
        self.recompute();
    }

    /// Current data.
    #[must_use]
    pub const fn groups(&self) -> &GroupMap {
        &self.groups
    }

    /// Last computed frame.
    #[must_use]
    pub const fn frame(&self) -> &LayoutFrame {
        &self.frame
    }

    /// Profile used for the last layout.
    #[must_use]
    pub const fn profile(&self) -> DeviceProfile {
        self.profile
    }

    /// Label policy for the active profile.
    #[must_use]
    pub const fn label_policy(&self) -> &LabelPolicy {
        &self.policy
    }

    /// Id of the leaf under the pointer.
    #[must_use]
    pub fn hovered(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    /// The tooltip overlay.
    #[must_use]
    pub const fn tooltip(&self) -> &Tooltip {
        &self.tooltip
    }

    /// Thresholds for a profile.
    #[must_use]
    pub const fn thresholds(&self, profile: DeviceProfile) -> &ProfileThresholds {
        match profile {
            DeviceProfile::Desktop => &self.desktop,
            DeviceProfile::Mobile => &self.mobile,
        }
    }

    /// Layout config for the current bounds.
    #[must_use]
    pub fn layout_config(&self) -> LayoutConfig {
        let width = f64::from(self.bounds.width);
        let height = f64::from(self.bounds.height);
        let profile = self
            .pinned
            .unwrap_or_else(|| DeviceProfile::for_width(width, self.breakpoint));
        LayoutConfig::with_thresholds(profile, self.thresholds(profile), width, height)
            .with_snap(self.snap)
    }

    /// Per-leaf render decisions for drawable leaves, in draw order.
    #[must_use]
    pub fn cells(&self) -> Vec<CellView> {
        self.frame
            .leaves()
            .filter(|leaf| leaf.bounds.is_drawable())
            .map(|leaf| CellView {
                id: leaf.id.clone(),
                bounds: leaf.bounds,
                color: color_for(leaf.change_percent),
                labels: self.policy.labels(&leaf.bounds, &leaf.name, leaf.change_percent),
                hovered: self.hovered.as_deref() == Some(leaf.id.as_str()),
            })
            .collect()
    }

    /// Handle an event observed at `now`.
    ///
    /// [`Widget::event`] calls this with the current time; tests and hosts
    /// with their own clock call it directly.
    pub fn handle_at(&mut self, event: &Event, now: Instant) -> Option<Box<dyn Any + Send>> {
        match event {
            Event::MouseMove { position } => {
                self.hover(*position);
                None
            }
            Event::MouseLeave => {
                self.clear_hover();
                None
            }
            Event::DoubleClick {
                position,
                button: MouseButton::Left,
            } => self.activate(*position),
            Event::GestureTap { position, count } if *count >= 2 => self.activate(*position),
            Event::GestureLongPress { position } => {
                self.open_touch_tooltip(*position);
                None
            }
            Event::Resize { width, height } => {
                // Touch positions from before the resize no longer map to cells.
                self.gestures.reset();
                self.layout(Rect::new(self.bounds.x, self.bounds.y, *width, *height));
                None
            }
            touch if touch.is_touch() => {
                if matches!(touch, Event::TouchStart { .. }) && self.touch_tooltip {
                    self.clear_hover();
                }
                match self.gestures.process_at(touch, now)? {
                    Event::GestureTap { position, count } if count >= 2 => self.activate(position),
                    _ => None,
                }
            }
            _ => None,
        }
    }

    /// Fire a pending long press whose deadline has passed.
    ///
    /// Returns `true` when the tooltip was opened and a repaint is due.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.gestures.check_long_press(now) {
            Some(Event::GestureLongPress { position }) => self.open_touch_tooltip(position),
            _ => false,
        }
    }

    /// Deadline the host should call [`MarketMap::poll`] at, if any.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.gestures.long_press_deadline()
    }

    fn recompute(&mut self) {
        let config = self.layout_config();
        self.profile = config.device_profile;
        self.policy = LabelPolicy::new(*self.thresholds(config.device_profile));
        self.frame = layout_groups(&self.groups, &config);
        log::debug!(
            target: "marketmap::widget",
            "laid out {} leaves on {}x{} ({:?})",
            self.frame.leaf_count(),
            config.canvas_width,
            config.canvas_height,
            self.profile
        );

        let hover_gone = self
            .hovered
            .as_deref()
            .is_some_and(|id| !self.frame.get(id).is_some_and(|b| b.is_drawable()));
        if hover_gone {
            self.clear_hover();
        }
        if self.tooltip.is_visible() {
            self.tooltip.layout(self.bounds);
        }
    }

    fn hit(&self, position: Point) -> Option<(&GroupFrame, &LeafFrame)> {
        let x = f64::from(position.x - self.bounds.x);
        let y = f64::from(position.y - self.bounds.y);
        self.frame.groups.iter().find_map(|group| {
            group
                .leaves
                .iter()
                .find(|l| l.bounds.is_drawable() && l.bounds.contains(x, y))
                .map(|leaf| (group, leaf))
        })
    }

    /// Id and tooltip lines of the leaf under `position`.
    fn describe(&self, position: Point) -> Option<(String, [String; 3])> {
        let (group, leaf) = self.hit(position)?;
        let lines = [
            format!("{} {}", leaf.name, leaf.id),
            format_percent(leaf.change_percent),
            group.label.clone(),
        ];
        Some((leaf.id.clone(), lines))
    }

    fn hover(&mut self, position: Point) {
        let Some((id, lines)) = self.describe(position) else {
            self.clear_hover();
            return;
        };
        if self.hovered.as_deref() == Some(id.as_str()) {
            self.tooltip.follow(position);
        } else {
            self.hovered = Some(id);
            self.tooltip.show_at(lines, position);
        }
        self.touch_tooltip = false;
        self.tooltip.layout(self.bounds);
    }

    fn open_touch_tooltip(&mut self, position: Point) -> bool {
        let Some((id, lines)) = self.describe(position) else {
            return false;
        };
        self.hovered = Some(id);
        self.tooltip.show_at(lines, position);
        self.tooltip.layout(self.bounds);
        self.touch_tooltip = true;
        true
    }

    fn clear_hover(&mut self) {
        self.hovered = None;
        self.touch_tooltip = false;
        self.tooltip.hide();
    }

    fn activate(&self, position: Point) -> Option<Box<dyn Any + Send>> {
        let (_, leaf) = self.hit(position)?;
        log::debug!(target: "marketmap::widget", "activated {}", leaf.id);
        Some(Box::new(LeafActivated {
            code: leaf.id.clone(),
        }))
    }

    fn to_canvas(&self, bounds: &RectBounds) -> Rect {
        let rect = bounds.to_rect();
        Rect::new(
            rect.x + self.bounds.x,
            rect.y + self.bounds.y,
            rect.width,
            rect.height,
        )
    }

    fn paint_group(&self, canvas: &mut dyn Canvas, group: &GroupFrame) {
        canvas.fill_rect(self.to_canvas(&group.bounds), GROUP_BACKGROUND);

        let header = &group.header;
        if header.is_drawable() {
            let rect = self.to_canvas(header);
            canvas.fill_rect(rect, HEADER_BACKGROUND);
            // Same gate and truncation as cell names; the strip height sets the size.
            if let Some(label) = self.policy.fit(header, &group.label, LabelKind::Name) {
                let size = (header.height() * 0.65).min(self.policy.thresholds().max_font_size);
                let style = TextStyle {
                    size: size as f32,
                    color: Color::WHITE,
                    weight: FontWeight::Bold,
                    align: TextAlign::Start,
                };
                let text = format!("{label} {}", format_percent(group.change_percent));
                let position = Point::new(rect.x + 4.0, rect.y + rect.height / 2.0);
                canvas.draw_text(&text, position, &style);
            }
        }
    }

    fn paint_cell(&self, canvas: &mut dyn Canvas, cell: &CellView) {
        let rect = self.to_canvas(&cell.bounds);
        canvas.fill_rect(rect, cell.color.color());
        if cell.hovered {
            canvas.stroke_rect(rect, HOVER_BORDER, 2.0);
        } else {
            canvas.stroke_rect(rect, CELL_BORDER, 1.0);
        }

        let labels = &cell.labels;
        let font = labels.font_size as f32;
        let center = rect.center();
        let mut style = TextStyle {
            size: font,
            color: cell.color.text_color(),
            weight: FontWeight::Bold,
            align: TextAlign::Center,
        };
        match (&labels.name, &labels.percent) {
            (Some(name), Some(percent)) => {
                let gap = font * 0.6;
                canvas.draw_text(name, Point::new(center.x, center.y - gap), &style);
                style.weight = FontWeight::Normal;
                canvas.draw_text(percent, Point::new(center.x, center.y + gap), &style);
            }
            (Some(name), None) => canvas.draw_text(name, center, &style),
            _ => {}
        }
    }
}

impl Widget for MarketMap {
    fn type_id(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    fn layout(&mut self, bounds: Rect) -> LayoutResult {
        self.bounds = bounds;
        self.recompute();
        LayoutResult {
            size: bounds.size(),
        }
    }

    fn paint(&self, canvas: &mut dyn Canvas) {
        for group in &self.frame.groups {
            if !group.bounds.is_drawable() {
                continue;
            }
            self.paint_group(canvas, group);
        }
        for cell in self.cells() {
            self.paint_cell(canvas, &cell);
        }
        self.tooltip.paint(canvas);
    }

    fn event(&mut self, event: &Event) -> Option<Box<dyn Any + Send>> {
        self.handle_at(event, Instant::now())
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }
}
