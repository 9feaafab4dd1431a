//! Layout configuration and per-device thresholds.

use serde::{Deserialize, Serialize};

/// Viewport width (px) below which the mobile profile applies.
pub const MOBILE_BREAKPOINT: f64 = 768.0;

/// Device class the layout is computed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceProfile {
    /// Pointer device, wide viewport
    #[default]
    Desktop,
    /// Touch device, narrow viewport
    Mobile,
}

impl DeviceProfile {
    /// Pick a profile from the viewport width.
    #[must_use]
    pub fn for_width(width: f64, breakpoint: f64) -> Self {
        if width < breakpoint {
            Self::Mobile
        } else {
            Self::Desktop
        }
    }

    /// Built-in thresholds for this profile.
    #[must_use]
    pub const fn thresholds(self) -> ProfileThresholds {
        match self {
            Self::Desktop => ProfileThresholds::DESKTOP,
            Self::Mobile => ProfileThresholds::MOBILE,
        }
    }

    /// Lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Desktop => "desktop",
            Self::Mobile => "mobile",
        }
    }
}

/// Size thresholds and magnitudes that differ between device profiles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileThresholds {
    /// Padding between groups and around the canvas
    pub outer_padding: f64,
    /// Padding between a group's frame and its leaves
    pub inner_padding: f64,
    /// Height of the group label strip
    pub group_header_height: f64,
    /// Minimum cell width for a name label
    pub min_name_width: f64,
    /// Minimum cell height for a name label
    pub min_name_height: f64,
    /// Minimum cell width for a percent label
    pub min_percent_width: f64,
    /// Minimum cell height for a percent label
    pub min_percent_height: f64,
    /// Font size divisor applied to the cell width
    pub width_divisor: f64,
    /// Font size divisor applied to the cell height
    pub height_divisor: f64,
    /// Largest font size used in cells
    pub max_font_size: f64,
    /// Pixels of cell width per name character
    pub char_pixel_ratio: f64,
    /// Upper bound on visible name characters
    pub max_chars: usize,
}

impl ProfileThresholds {
    /// Desktop defaults.
    pub const DESKTOP: Self = Self {
        outer_padding: 2.0,
        inner_padding: 1.0,
        group_header_height: 20.0,
        min_name_width: 30.0,
        min_name_height: 14.0,
        min_percent_width: 40.0,
        min_percent_height: 28.0,
        width_divisor: 6.0,
        height_divisor: 3.0,
        max_font_size: 16.0,
        char_pixel_ratio: 12.0,
        max_chars: 8,
    };

    /// Mobile defaults.
    pub const MOBILE: Self = Self {
        outer_padding: 1.0,
        inner_padding: 1.0,
        group_header_height: 16.0,
        min_name_width: 24.0,
        min_name_height: 12.0,
        min_percent_width: 36.0,
        min_percent_height: 24.0,
        width_divisor: 5.0,
        height_divisor: 3.0,
        max_font_size: 12.0,
        char_pixel_ratio: 10.0,
        max_chars: 6,
    };
}

impl Default for ProfileThresholds {
    fn default() -> Self {
        Self::DESKTOP
    }
}

/// Coordinate rounding applied when rectangles are emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapMode {
    /// Round every edge to a whole pixel
    #[default]
    Pixel,
    /// Keep fractional coordinates
    None,
}

/// Everything the nested layout needs besides the data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Canvas width in pixels
    pub canvas_width: f64,
    /// Canvas height in pixels
    pub canvas_height: f64,
    /// Inset of the canvas before groups are laid out
    pub outer_padding: f64,
    /// Inset of each group's body before leaves are laid out
    pub inner_padding: f64,
    /// Label strip reserved at the top of every group
    pub group_header_height: f64,
    /// Device profile the config was derived for
    pub device_profile: DeviceProfile,
    /// Emission rounding
    pub snap: SnapMode,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self::for_profile(DeviceProfile::Desktop, 1200.0, 800.0)
    }
}

impl LayoutConfig {
    /// Config for an explicit profile, with that profile's built-in magnitudes.
    #[must_use]
    pub fn for_profile(profile: DeviceProfile, width: f64, height: f64) -> Self {
        Self::with_thresholds(profile, &profile.thresholds(), width, height)
    }

    /// Config for a profile using caller-supplied thresholds.
    #[must_use]
    pub fn with_thresholds(
        profile: DeviceProfile,
        thresholds: &ProfileThresholds,
        width: f64,
        height: f64,
    ) -> Self {
        Self {
            canvas_width: width,
            canvas_height: height,
            outer_padding: thresholds.outer_padding,
            inner_padding: thresholds.inner_padding,
            group_header_height: thresholds.group_header_height,
            device_profile: profile,
            snap: SnapMode::Pixel,
        }
    }

    /// Config for a viewport, choosing the profile by [`MOBILE_BREAKPOINT`].
    #[must_use]
    pub fn for_viewport(width: f64, height: f64) -> Self {
        Self::for_profile(DeviceProfile::for_width(width, MOBILE_BREAKPOINT), width, height)
    }

    /// Set the snap mode.
    #[must_use]
    pub const fn with_snap(mut self, snap: SnapMode) -> Self {
        self.snap = snap;
        self
    }

    /// Set all three padding magnitudes at once.
    #[must_use]
    pub const fn with_padding(mut self, outer: f64, inner: f64, header: f64) -> Self {
        self.outer_padding = outer;
        self.inner_padding = inner;
        self.group_header_height = header;
        self
    }
}
