//! Layout settings file: per-profile threshold overrides, breakpoint, snapping.

use std::path::Path;

use marketmap_layout::{DeviceProfile, LayoutConfig, ProfileThresholds, SnapMode, MOBILE_BREAKPOINT};
use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Partial [`ProfileThresholds`]; unset fields keep the profile default.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThresholdOverrides {
    /// Padding between groups and around the canvas
    pub outer_padding: Option<f64>,
    /// Padding between a group's frame and its leaves
    pub inner_padding: Option<f64>,
    /// Height of the group label strip
    pub group_header_height: Option<f64>,
    /// Minimum cell width for a name label
    pub min_name_width: Option<f64>,
    /// Minimum cell height for a name label
    pub min_name_height: Option<f64>,
    /// Minimum cell width for a percent label
    pub min_percent_width: Option<f64>,
    /// Minimum cell height for a percent label
    pub min_percent_height: Option<f64>,
    /// Font size divisor applied to the cell width
    pub width_divisor: Option<f64>,
    /// Font size divisor applied to the cell height
    pub height_divisor: Option<f64>,
    /// Largest font size used in cells
    pub max_font_size: Option<f64>,
    /// Pixels of cell width per name character
    pub char_pixel_ratio: Option<f64>,
    /// Upper bound on visible name characters
    pub max_chars: Option<usize>,
}

impl ThresholdOverrides {
    /// Apply the set fields on top of `base`.
    #[must_use]
    pub fn apply(&self, base: ProfileThresholds) -> ProfileThresholds {
        ProfileThresholds {
            outer_padding: self.outer_padding.unwrap_or(base.outer_padding),
            inner_padding: self.inner_padding.unwrap_or(base.inner_padding),
            group_header_height: self.group_header_height.unwrap_or(base.group_header_height),
            min_name_width: self.min_name_width.unwrap_or(base.min_name_width),
            min_name_height: self.min_name_height.unwrap_or(base.min_name_height),
            min_percent_width: self.min_percent_width.unwrap_or(base.min_percent_width),
            min_percent_height: self.min_percent_height.unwrap_or(base.min_percent_height),
            width_divisor: self.width_divisor.unwrap_or(base.width_divisor),
            height_divisor: self.height_divisor.unwrap_or(base.height_divisor),
            max_font_size: self.max_font_size.unwrap_or(base.max_font_size),
            char_pixel_ratio: self.char_pixel_ratio.unwrap_or(base.char_pixel_ratio),
            max_chars: self.max_chars.unwrap_or(base.max_chars),
        }
    }
}

/// Overrides for each device profile.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProfileOverrides {
    /// Desktop overrides
    pub desktop: ThresholdOverrides,
    /// Mobile overrides
    pub mobile: ThresholdOverrides,
}

/// Contents of a settings file.
///
/// ```yaml
/// breakpoint: 768
/// snap: pixel
/// profiles:
///   mobile:
///     group_header_height: 14
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Width below which the mobile profile applies
    pub breakpoint: f64,
    /// Coordinate rounding
    pub snap: SnapMode,
    /// Per-profile threshold overrides
    pub profiles: ProfileOverrides,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            breakpoint: MOBILE_BREAKPOINT,
            snap: SnapMode::Pixel,
            profiles: ProfileOverrides::default(),
        }
    }
}

impl Settings {
    /// Parse and validate settings from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, ParseError> {
        let settings: Self = serde_yaml_ng::from_str(yaml)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load and validate a settings file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ParseError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ParseError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_yaml(&content)?;
        log::debug!(target: "marketmap::settings", "loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Effective thresholds for a profile.
    #[must_use]
    pub fn thresholds(&self, profile: DeviceProfile) -> ProfileThresholds {
        let overrides = match profile {
            DeviceProfile::Desktop => &self.profiles.desktop,
            DeviceProfile::Mobile => &self.profiles.mobile,
        };
        overrides.apply(profile.thresholds())
    }

    /// Profile for a viewport width, unless one is pinned.
    #[must_use]
    pub fn profile_for(&self, width: f64, pinned: Option<DeviceProfile>) -> DeviceProfile {
        pinned.unwrap_or_else(|| DeviceProfile::for_width(width, self.breakpoint))
    }

    /// Layout config for a viewport.
    #[must_use]
    pub fn layout_config(&self, width: f64, height: f64, pinned: Option<DeviceProfile>) -> LayoutConfig {
        let profile = self.profile_for(width, pinned);
        LayoutConfig::with_thresholds(profile, &self.thresholds(profile), width, height)
            .with_snap(self.snap)
    }

    /// Reject values the layout cannot work with.
    pub fn validate(&self) -> Result<(), ParseError> {
        if !(self.breakpoint.is_finite() && self.breakpoint >= 0.0) {
            return Err(invalid("breakpoint", "must be a non-negative number"));
        }
        for profile in [DeviceProfile::Desktop, DeviceProfile::Mobile] {
            let t = self.thresholds(profile);
            let name = profile.as_str();
            let lengths = [
                ("outer_padding", t.outer_padding),
                ("inner_padding", t.inner_padding),
                ("group_header_height", t.group_header_height),
                ("min_name_width", t.min_name_width),
                ("min_name_height", t.min_name_height),
                ("min_percent_width", t.min_percent_width),
                ("min_percent_height", t.min_percent_height),
                ("max_font_size", t.max_font_size),
            ];
            for (field, value) in lengths {
                if !(value.is_finite() && value >= 0.0) {
                    return Err(invalid(
                        &format!("profiles.{name}.{field}"),
                        "must be a non-negative number",
                    ));
                }
            }
            let divisors = [
                ("width_divisor", t.width_divisor),
                ("height_divisor", t.height_divisor),
                ("char_pixel_ratio", t.char_pixel_ratio),
            ];
            for (field, value) in divisors {
                if !(value.is_finite() && value > 0.0) {
                    return Err(invalid(&format!("profiles.{name}.{field}"), "must be positive"));
                }
            }
            if t.max_chars < 2 {
                return Err(invalid(&format!("profiles.{name}.max_chars"), "must be at least 2"));
            }
        }
        Ok(())
    }
}

fn invalid(field: &str, message: &str) -> ParseError {
    ParseError::InvalidValue {
        field: field.to_string(),
        message: message.to_string(),
    }
}
