//! Color data types. This module is private but reexported by its parent.

use core::fmt;

/// Acts as polyfill for float methods
#[cfg(not(feature = "std"))]
#[allow(unused_imports)]
use num_traits::float::Float as _;

/// A floating-point RGBA color value.
///
/// * Color components are linear (gamma = 1) and nominally range from 0 to 1, but values
///   above 1 are permitted and clamped only when the color is tone mapped.
/// * The alpha is not premultiplied.
#[derive(Clone, Copy, PartialEq)]
pub struct Rgba {
    r: f32,
    g: f32,
    b: f32,
    a: f32,
}

impl Rgba {
    /// Transparent black (all components zero).
    pub const TRANSPARENT: Rgba = Rgba::new(0.0, 0.0, 0.0, 0.0);
    /// Black.
    pub const BLACK: Rgba = Rgba::new(0.0, 0.0, 0.0, 1.0);
    /// White; the starting color of every trace.
    pub const WHITE: Rgba = Rgba::new(1.0, 1.0, 1.0, 1.0);

    /// Constructs a color from components.
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Returns the red color component.
    #[inline]
    pub const fn red(self) -> f32 {
        self.r
    }
    /// Returns the green color component.
    #[inline]
    pub const fn green(self) -> f32 {
        self.g
    }
    /// Returns the blue color component.
    #[inline]
    pub const fn blue(self) -> f32 {
        self.b
    }
    /// Returns the alpha component.
    ///
    /// Zero means fully transparent; a texel whose alpha is zero is unoccupied.
    #[inline]
    pub const fn alpha(self) -> f32 {
        self.a
    }

    /// Returns whether this color is fully transparent, or has an alpha of zero.
    #[inline]
    pub fn fully_transparent(self) -> bool {
        self.a == 0.0
    }

    /// Returns this color with the alpha component replaced.
    #[inline]
    #[must_use]
    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Converts sRGB 8-bits-per-component color to the corresponding linear [`Rgba`]
    /// value. The alpha component is passed through unchanged.
    #[inline]
    pub fn from_srgb8(rgba: [u8; 4]) -> Self {
        Self {
            r: component_from_srgb8(rgba[0]),
            g: component_from_srgb8(rgba[1]),
            b: component_from_srgb8(rgba[2]),
            a: f32::from(rgba[3]) / 255.0,
        }
    }

    /// Applies `f` to each of the red, green, and blue components.
    #[inline]
    #[must_use]
    pub fn map_rgb(self, mut f: impl FnMut(f32) -> f32) -> Self {
        Self {
            r: f(self.r),
            g: f(self.g),
            b: f(self.b),
            a: self.a,
        }
    }
}

impl From<Rgba> for [f32; 4] {
    #[inline]
    fn from(value: Rgba) -> Self {
        [value.r, value.g, value.b, value.a]
    }
}

impl fmt::Debug for Rgba {
    #[allow(clippy::missing_inline_in_public_items)]
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            fmt,
            "Rgba({:?}, {:?}, {:?}, {:?})",
            self.r, self.g, self.b, self.a
        )
    }
}

#[inline]
fn component_from_srgb8(c: u8) -> f32 {
    let c = f32::from(c) / 255.0;
    // Piecewise sRGB transfer function.
    if c <= 0.04045 {
        c * (1.0 / 12.92)
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}
