//! Fill colors for shapes.

use peniko::Color;
use rand::Rng;

/// RGBA8 fill color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FillColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl FillColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color from RGB components.
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Pick a random opaque color.
    ///
    /// Any 24-bit RGB value is equally likely; alpha is always 255.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let rgb: u32 = rng.random_range(0..=0x00FF_FFFF);
        Self::rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
    }
}

impl From<FillColor> for Color {
    fn from(color: FillColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}
