//! Core types and traits for marketmap.
//!
//! This crate provides the foundational types used by the layout engine and
//! the market map widget:
//! - Geometric primitives: [`Point`], [`Size`], [`Rect`]
//! - Color representation: [`Color`] with WCAG contrast calculations
//! - Input: [`Event`] and the touch [`GestureRecognizer`]
//! - Painting: the [`Canvas`] trait, [`RecordingCanvas`] and [`SvgCanvas`]

mod canvas;
mod color;
mod event;
mod geometry;
mod gesture;
pub mod widget;

pub use canvas::{DrawCommand, RecordingCanvas, SvgCanvas};
pub use color::Color;
pub use event::{Event, MouseButton, TouchId};
pub use geometry::{Point, Rect, Size};
pub use gesture::{GestureConfig, GestureRecognizer};
pub use widget::{
    Canvas, FontWeight, LayoutResult, TextAlign, TextStyle, TypeId, Widget,
};
