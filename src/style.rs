//! Lamp display styles.
//!
//! A style is the colour a lamp shows when lit. Unlit lamps are drawn as the
//! same colour faded toward the housing, so a dark signal head still shows
//! which lenses it has.

use crate::lamp::Lamp;
use palette::{FromColor, Hsv, Mix, Srgb};

/// Housing colour that unlit lenses fade toward.
pub const HOUSING: Srgb = Srgb::new(0.122, 0.161, 0.216);

/// Opacity of an unlit lens over the housing.
pub const DIM_LEVEL: f32 = 0.2;

/// Display style of a single lamp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LampStyle {
    /// Colour of the lit lens.
    pub color: Srgb,
}

impl LampStyle {
    pub const RED: LampStyle = LampStyle::new(Srgb::new(0.937, 0.267, 0.267));
    pub const YELLOW: LampStyle = LampStyle::new(Srgb::new(0.918, 0.702, 0.031));
    pub const GREEN: LampStyle = LampStyle::new(Srgb::new(0.133, 0.773, 0.369));
    pub const TURN_ARROW: LampStyle = LampStyle::new(Srgb::new(0.063, 0.725, 0.506));

    pub const fn new(color: Srgb) -> Self {
        Self { color }
    }

    /// Stock style for a lamp.
    pub const fn default_for(lamp: Lamp) -> Self {
        match lamp {
            Lamp::Red => Self::RED,
            Lamp::Yellow => Self::YELLOW,
            Lamp::Green => Self::GREEN,
            Lamp::TurnArrow => Self::TURN_ARROW,
        }
    }

    /// Colour shown while the lamp is lit.
    #[inline]
    pub fn lit(&self) -> Srgb {
        self.color
    }

    /// Colour shown while the lamp is dark.
    #[inline]
    pub fn dimmed(&self) -> Srgb {
        HOUSING.mix(self.color, DIM_LEVEL)
    }

    /// Colour for the given lit state.
    #[inline]
    pub fn render(&self, lit: bool) -> Srgb {
        if lit { self.lit() } else { self.dimmed() }
    }
}

/// Creates a style from HSV (Hue, Saturation, Value) components.
#[inline]
pub fn hsv(hue: f32, saturation: f32, value: f32) -> LampStyle {
    LampStyle::new(Srgb::from_color(Hsv::new(hue, saturation, value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn colors_equal(a: Srgb, b: Srgb) -> bool {
        const EPSILON: f32 = 0.001;
        (a.red - b.red).abs() < EPSILON
            && (a.green - b.green).abs() < EPSILON
            && (a.blue - b.blue).abs() < EPSILON
    }

    #[test]
    fn dimmed_lies_between_housing_and_lit() {
        let style = LampStyle::RED;
        let dim = style.dimmed();

        let expected = Srgb::new(
            HOUSING.red + (style.color.red - HOUSING.red) * DIM_LEVEL,
            HOUSING.green + (style.color.green - HOUSING.green) * DIM_LEVEL,
            HOUSING.blue + (style.color.blue - HOUSING.blue) * DIM_LEVEL,
        );
        assert!(colors_equal(dim, expected));
        assert!(colors_equal(style.render(true), style.color));
        assert!(colors_equal(style.render(false), dim));
    }

    #[test]
    fn hsv_primary_hues() {
        assert!(colors_equal(hsv(0.0, 1.0, 1.0).color, Srgb::new(1.0, 0.0, 0.0)));
        assert!(colors_equal(hsv(120.0, 1.0, 1.0).color, Srgb::new(0.0, 1.0, 0.0)));
    }

    #[test]
    fn each_lamp_has_distinct_default() {
        assert_ne!(LampStyle::default_for(Lamp::Red), LampStyle::default_for(Lamp::Green));
        assert_ne!(LampStyle::default_for(Lamp::Yellow), LampStyle::default_for(Lamp::Green));
    }
}
