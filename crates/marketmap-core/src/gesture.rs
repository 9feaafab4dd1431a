//! Gesture recognition from raw touch events.
//!
//! Turns a single-finger touch stream into [`Event::GestureTap`] (with a tap
//! count, so a double tap is `count == 2`) and [`Event::GestureLongPress`].
//!
//! The long press is a deadline, not a background timer: the host calls
//! [`GestureRecognizer::check_long_press`] from its frame or tick loop. A
//! release, a cancel, a second finger or a move beyond the tap slop clears the
//! pending press so it can never fire late.

use crate::event::{Event, TouchId};
use crate::geometry::Point;
use std::time::{Duration, Instant};

/// Configuration for gesture recognition.
#[derive(Debug, Clone)]
pub struct GestureConfig {
    /// Maximum time for a tap (in milliseconds).
    pub tap_timeout_ms: u64,
    /// Maximum movement for a tap or long press to still be valid.
    pub tap_slop: f32,
    /// Time required for a long press (in milliseconds).
    pub long_press_ms: u64,
    /// Maximum time between taps for a double tap.
    pub double_tap_ms: u64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            tap_timeout_ms: 300,
            tap_slop: 10.0,
            long_press_ms: 500,
            double_tap_ms: 300,
        }
    }
}

#[derive(Debug, Clone)]
struct ActiveTouch {
    id: TouchId,
    start_position: Point,
    current_position: Point,
    start_time: Instant,
    moved: bool,
    long_press_fired: bool,
}

#[derive(Debug, Clone)]
struct LastTap {
    position: Point,
    time: Instant,
    count: u8,
}

/// Single-touch gesture recognizer.
#[derive(Debug, Clone, Default)]
pub struct GestureRecognizer {
    config: GestureConfig,
    active: Option<ActiveTouch>,
    last_tap: Option<LastTap>,
}

impl GestureRecognizer {
    /// Create a recognizer with default thresholds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a recognizer with custom thresholds.
    #[must_use]
    pub fn with_config(config: GestureConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Process a touch event observed at `now`.
    pub fn process_at(&mut self, event: &Event, now: Instant) -> Option<Event> {
        match event {
            Event::TouchStart { id, position } => {
                if self.active.is_some() {
                    // A second finger is not a press-and-hold.
                    self.active = None;
                    return None;
                }
                self.active = Some(ActiveTouch {
                    id: *id,
                    start_position: *position,
                    current_position: *position,
                    start_time: now,
                    moved: false,
                    long_press_fired: false,
                });
                None
            }
            Event::TouchMove { id, position } => {
                let slop = self.config.tap_slop;
                if let Some(touch) = self.active.as_mut().filter(|t| t.id == *id) {
                    touch.current_position = *position;
                    if touch.start_position.distance(position) > slop {
                        touch.moved = true;
                    }
                }
                None
            }
            Event::TouchEnd { id, position } => {
                let touch = self.active.take().filter(|t| t.id == *id)?;
                let elapsed = now.saturating_duration_since(touch.start_time);
                let is_tap = !touch.moved
                    && !touch.long_press_fired
                    && elapsed <= Duration::from_millis(self.config.tap_timeout_ms)
                    && touch.start_position.distance(position) <= self.config.tap_slop;
                if is_tap {
                    Some(self.handle_tap(*position, now))
                } else {
                    None
                }
            }
            Event::TouchCancel { id } => {
                if self.active.as_ref().is_some_and(|t| t.id == *id) {
                    self.active = None;
                }
                None
            }
            _ => None,
        }
    }

    /// Fire the long press if the active touch has been held long enough.
    ///
    /// Fires at most once per touch.
    pub fn check_long_press(&mut self, now: Instant) -> Option<Event> {
        let threshold = Duration::from_millis(self.config.long_press_ms);
        let touch = self.active.as_mut()?;
        if touch.moved || touch.long_press_fired {
            return None;
        }
        if now.saturating_duration_since(touch.start_time) >= threshold {
            touch.long_press_fired = true;
            Some(Event::GestureLongPress {
                position: touch.current_position,
            })
        } else {
            None
        }
    }

    /// Deadline of the pending long press, if one is armed.
    #[must_use]
    pub fn long_press_deadline(&self) -> Option<Instant> {
        self.active
            .as_ref()
            .filter(|t| !t.moved && !t.long_press_fired)
            .map(|t| t.start_time + Duration::from_millis(self.config.long_press_ms))
    }

    /// Drop any active touch and tap history.
    pub fn reset(&mut self) {
        self.active = None;
        self.last_tap = None;
    }

    fn handle_tap(&mut self, position: Point, now: Instant) -> Event {
        let count = match &self.last_tap {
            Some(last)
                if now.saturating_duration_since(last.time)
                    < Duration::from_millis(self.config.double_tap_ms)
                    && position.distance(&last.position) < self.config.tap_slop =>
            {
                last.count.saturating_add(1)
            }
            _ => 1,
        };

        self.last_tap = Some(LastTap {
            position,
            time: now,
            count,
        });

        Event::GestureTap { position, count }
    }
}
