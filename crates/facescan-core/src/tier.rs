//! Confidence tiers derived from a match distance.

use serde::{Deserialize, Serialize};

const STRONG_BELOW: f32 = 0.25;
const LIKELY_BELOW: f32 = 0.50;
const POSSIBLE_BELOW: f32 = 0.75;

/// How closely a matched face resembles its reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Strong,
    Likely,
    Possible,
    Weak,
}

impl Tier {
    /// Classify a distance. Lower bounds are inclusive; `Weak` catches
    /// everything from 0.75 up, including NaN.
    pub fn classify(distance: f32) -> Self {
        if distance < STRONG_BELOW {
            Tier::Strong
        } else if distance < LIKELY_BELOW {
            Tier::Likely
        } else if distance < POSSIBLE_BELOW {
            Tier::Possible
        } else {
            Tier::Weak
        }
    }

    /// Highlight color as RGB.
    pub fn color(self) -> [u8; 3] {
        match self {
            Tier::Strong => [0, 128, 0],     // green
            Tier::Likely => [255, 255, 0],   // yellow
            Tier::Possible => [255, 165, 0], // orange
            Tier::Weak => [255, 0, 0],       // red
        }
    }

    pub fn color_name(self) -> &'static str {
        match self {
            Tier::Strong => "green",
            Tier::Likely => "yellow",
            Tier::Possible => "orange",
            Tier::Weak => "red",
        }
    }

    pub fn caption(self, identity: &str) -> String {
        match self {
            Tier::Strong => format!("Looks like {identity}"),
            Tier::Likely | Tier::Weak => format!("Could be {identity}"),
            Tier::Possible => format!("Possibly {identity}"),
        }
    }
}
