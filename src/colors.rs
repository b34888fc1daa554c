//! Light colours as used on nautical charts.
//!
//! Chart abbreviations: `W` white, `R` red, `G` green, `Y` yellow, `Bu` blue.
//! Values are full-brightness `Srgb<f32>` (0.0-1.0 range).

use palette::Srgb;

/// Blank element.
pub const COLOR_OFF: Srgb = Srgb::new(0.0, 0.0, 0.0);

pub const RED: Srgb = Srgb::new(1.0, 0.0, 0.0);
pub const YELLOW: Srgb = Srgb::new(1.0, 150.0 / 255.0, 0.0);
pub const GREEN: Srgb = Srgb::new(0.0, 1.0, 0.0);
pub const CYAN: Srgb = Srgb::new(0.0, 1.0, 1.0);
pub const BLUE: Srgb = Srgb::new(0.0, 0.0, 1.0);
pub const PURPLE: Srgb = Srgb::new(180.0 / 255.0, 0.0, 1.0);
pub const WHITE: Srgb = Srgb::new(1.0, 1.0, 1.0);

/// A light colour that can appear in a chart characteristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChartColour {
    White,
    Red,
    Green,
    Yellow,
    Blue,
}

impl ChartColour {
    /// Looks up a chart abbreviation (`"W"`, `"R"`, `"G"`, `"Y"`, `"Bu"`).
    pub fn from_abbreviation(abbreviation: &str) -> Option<Self> {
        match abbreviation {
            "W" => Some(ChartColour::White),
            "R" => Some(ChartColour::Red),
            "G" => Some(ChartColour::Green),
            "Y" => Some(ChartColour::Yellow),
            "Bu" => Some(ChartColour::Blue),
            _ => None,
        }
    }

    /// Returns the chart abbreviation.
    pub fn abbreviation(self) -> &'static str {
        match self {
            ChartColour::White => "W",
            ChartColour::Red => "R",
            ChartColour::Green => "G",
            ChartColour::Yellow => "Y",
            ChartColour::Blue => "Bu",
        }
    }

    /// Returns the display colour.
    pub fn srgb(self) -> Srgb {
        match self {
            ChartColour::White => WHITE,
            ChartColour::Red => RED,
            ChartColour::Green => GREEN,
            ChartColour::Yellow => YELLOW,
            ChartColour::Blue => BLUE,
        }
    }
}

impl From<ChartColour> for Srgb {
    fn from(colour: ChartColour) -> Self {
        colour.srgb()
    }
}
