//! Maps a percentage change to a discrete color token.
//!
//! Rises use the warm (red) family and falls the cool (green) family, the
//! convention of mainland Chinese exchanges. Saturation grows in five steps
//! with the magnitude of the change.

use marketmap_core::Color;
use serde::{Deserialize, Serialize};

/// Changes with a smaller magnitude than this render as neutral.
pub const NEUTRAL_EPSILON: f64 = 0.01;

/// Upper bounds (exclusive) of saturation steps 1 to 4; anything larger is step 5.
const STEP_BOUNDS: [f64; 4] = [1.0, 2.0, 3.0, 4.0];

/// Highest saturation step.
pub const MAX_STEP: u8 = 5;

/// Discrete fill color for a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorToken {
    /// Flat or unknown change
    Neutral,
    /// Price went up, step 1 (faint) to 5 (saturated)
    Rise(u8),
    /// Price went down, step 1 (faint) to 5 (saturated)
    Fall(u8),
}

/// Pick the token for a change in percent.
///
/// Total over `f64`: NaN and magnitudes below [`NEUTRAL_EPSILON`] are neutral.
#[must_use]
pub fn color_for(change_percent: f64) -> ColorToken {
    let magnitude = change_percent.abs();
    if change_percent.is_nan() || magnitude < NEUTRAL_EPSILON {
        return ColorToken::Neutral;
    }
    let step = STEP_BOUNDS
        .iter()
        .position(|&bound| magnitude < bound)
        .map_or(MAX_STEP, |i| i as u8 + 1);
    if change_percent > 0.0 {
        ColorToken::Rise(step)
    } else {
        ColorToken::Fall(step)
    }
}

const NEUTRAL: (u8, u8, u8) = (0x9e, 0x9e, 0x9e);

const RISE: [(u8, u8, u8); 5] = [
    (0xf6, 0xc6, 0xc6),
    (0xee, 0x8f, 0x8f),
    (0xe3, 0x5d, 0x5d),
    (0xd1, 0x2f, 0x2f),
    (0xa5, 0x0f, 0x0f),
];

const FALL: [(u8, u8, u8); 5] = [
    (0xc6, 0xec, 0xd1),
    (0x8f, 0xd9, 0xa3),
    (0x5c, 0xc2, 0x7a),
    (0x2e, 0x9e, 0x52),
    (0x10, 0x6b, 0x32),
];

impl ColorToken {
    /// Saturation step, 0 for neutral.
    #[must_use]
    pub const fn saturation(self) -> u8 {
        match self {
            Self::Neutral => 0,
            Self::Rise(step) | Self::Fall(step) => step,
        }
    }

    /// Fill color from the fixed palette.
    #[must_use]
    pub fn color(self) -> Color {
        let (r, g, b) = match self {
            Self::Neutral => NEUTRAL,
            Self::Rise(step) => RISE[palette_index(step)],
            Self::Fall(step) => FALL[palette_index(step)],
        };
        Color::from_rgb8(r, g, b)
    }

    /// Stable class name, e.g. `rise-3`, `fall-1`, `neutral`.
    #[must_use]
    pub fn css_class(self) -> String {
        match self {
            Self::Neutral => "neutral".to_string(),
            Self::Rise(step) => format!("rise-{step}"),
            Self::Fall(step) => format!("fall-{step}"),
        }
    }

    /// Color for text drawn on top of this token's fill.
    #[must_use]
    pub fn text_color(self) -> Color {
        self.color().readable_text()
    }
}

fn palette_index(step: u8) -> usize {
    usize::from(step.clamp(1, MAX_STEP) - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_reference_values() {
        assert_eq!(color_for(5.2), ColorToken::Rise(5));
        assert_eq!(color_for(-0.003), ColorToken::Neutral);
        assert_eq!(color_for(-4.5), ColorToken::Fall(5));
    }

    #[test]
    fn test_neutral_band_is_symmetric() {
        assert_eq!(color_for(0.005), ColorToken::Neutral);
        assert_eq!(color_for(-0.005), ColorToken::Neutral);
        assert_eq!(color_for(0.0), ColorToken::Neutral);
        assert_eq!(color_for(f64::NAN), ColorToken::Neutral);
        assert_eq!(color_for(0.01), ColorToken::Rise(1));
    }

    #[test]
    fn test_step_boundaries() {
        assert_eq!(color_for(0.99), ColorToken::Rise(1));
        assert_eq!(color_for(1.0), ColorToken::Rise(2));
        assert_eq!(color_for(-2.0), ColorToken::Fall(3));
        assert_eq!(color_for(3.999), ColorToken::Rise(4));
        assert_eq!(color_for(-4.0), ColorToken::Fall(5));
        assert_eq!(color_for(f64::INFINITY), ColorToken::Rise(5));
    }

    #[test]
    fn test_rise_is_warm_fall_is_cool() {
        for step in 1..=MAX_STEP {
            let rise = ColorToken::Rise(step).color();
            let fall = ColorToken::Fall(step).color();
            assert!(rise.r > rise.g, "rise {step} is not red");
            assert!(fall.g > fall.r, "fall {step} is not green");
        }
    }

    #[test]
    fn test_palette_darkens_with_step() {
        for step in 1..MAX_STEP {
            let lighter = ColorToken::Rise(step).color().relative_luminance();
            let darker = ColorToken::Rise(step + 1).color().relative_luminance();
            assert!(darker < lighter);
        }
    }

    #[test]
    fn test_css_class() {
        assert_eq!(ColorToken::Neutral.css_class(), "neutral");
        assert_eq!(ColorToken::Rise(3).css_class(), "rise-3");
        assert_eq!(ColorToken::Fall(1).css_class(), "fall-1");
    }

    #[test]
    fn test_saturation() {
        assert_eq!(ColorToken::Neutral.saturation(), 0);
        assert_eq!(color_for(-2.5).saturation(), 3);
    }

    proptest! {
        #[test]
        fn prop_saturation_monotone(a in 0.0f64..20.0, b in 0.0f64..20.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(color_for(lo).saturation() <= color_for(hi).saturation());
            prop_assert!(color_for(-lo).saturation() <= color_for(-hi).saturation());
        }

        #[test]
        fn prop_sign_picks_family(c in 0.01f64..100.0) {
            prop_assert!(matches!(color_for(c), ColorToken::Rise(_)));
            prop_assert!(matches!(color_for(-c), ColorToken::Fall(_)));
            prop_assert_eq!(color_for(c).saturation(), color_for(-c).saturation());
        }
    }
}
