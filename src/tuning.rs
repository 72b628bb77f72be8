//! Data-driven game balance
//!
//! The engine treats a profile as opaque input. Profiles are picked by the
//! host from the viewport class and may be overridden with JSON.

use serde::{Deserialize, Serialize};

/// Viewports narrower than this play with the mobile profile
pub const MOBILE_BREAKPOINT: f32 = 768.0;

/// Coarse device class derived from the viewport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewportClass {
    Desktop,
    Mobile,
}

impl ViewportClass {
    pub fn from_width(width: f32) -> Self {
        if width < MOBILE_BREAKPOINT {
            ViewportClass::Mobile
        } else {
            ViewportClass::Desktop
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ViewportClass::Desktop => "desktop",
            ViewportClass::Mobile => "mobile",
        }
    }
}

/// Tunable constants for one device class
///
/// Rates are per 60 Hz frame; the integrator rescales them by elapsed time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TuningProfile {
    pub name: String,
    /// Downward acceleration (px/frame²)
    pub gravity: f32,
    /// Velocity set by a flap (negative = up)
    pub jump_impulse: f32,
    /// Vertical opening between segments
    pub gap_size: f32,
    /// Keep the gap at least this far from the top and bottom
    pub edge_margin: f32,
    pub base_speed: f32,
    pub max_speed: f32,
    /// Speed added per point scored
    pub speed_increase_rate: f32,
    /// Wall-clock time between obstacles (ms)
    pub spawn_interval_ms: f64,
    /// Collision radius of the pet
    pub hitbox_radius: f32,
    /// Obstacle hitbox inset
    pub hitbox_margin: f32,
    /// Score that triggers the celebration
    pub milestone_score: u32,
}

impl Default for TuningProfile {
    fn default() -> Self {
        Self::desktop()
    }
}

impl TuningProfile {
    pub fn desktop() -> Self {
        Self {
            name: "desktop".to_string(),
            gravity: 0.4,
            jump_impulse: -8.0,
            gap_size: 200.0,
            edge_margin: 50.0,
            base_speed: 4.0,
            max_speed: 8.0,
            speed_increase_rate: 0.1,
            spawn_interval_ms: 1800.0,
            hitbox_radius: 15.0,
            hitbox_margin: 5.0,
            milestone_score: 10,
        }
    }

    /// Touch devices: narrower screens, wider gap, smaller hitbox
    pub fn mobile() -> Self {
        Self {
            name: "mobile".to_string(),
            gravity: 0.35,
            jump_impulse: -7.0,
            gap_size: 220.0,
            edge_margin: 40.0,
            base_speed: 3.0,
            max_speed: 6.5,
            speed_increase_rate: 0.08,
            spawn_interval_ms: 2000.0,
            hitbox_radius: 12.0,
            hitbox_margin: 7.0,
            milestone_score: 10,
        }
    }

    pub fn for_viewport(class: ViewportClass) -> Self {
        match class {
            ViewportClass::Desktop => Self::desktop(),
            ViewportClass::Mobile => Self::mobile(),
        }
    }

    /// Parse a profile; missing fields take desktop values
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Parse a profile, falling back to the viewport's built-in one
    pub fn from_json_or(json: &str, class: ViewportClass) -> Self {
        match Self::from_json(json) {
            Ok(profile) => profile,
            Err(e) => {
                log::warn!("Ignoring tuning override: {}", e);
                Self::for_viewport(class)
            }
        }
    }

    /// Profile for a viewport, honouring a stored override when present
    pub fn resolve(override_json: Option<&str>, class: ViewportClass) -> Self {
        match override_json {
            Some(json) => Self::from_json_or(json, class),
            None => Self::for_viewport(class),
        }
    }
}
