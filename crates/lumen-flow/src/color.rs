//! Colours and the frame buffer the engine draws into.
//!
//! All arithmetic is 8-bit fixed point: a scale factor of 255 is 1.0.

use std::ops::{Index, IndexMut};

use lumen_graph::PixelIndex;

/// `value * factor / 255`.
#[inline]
pub const fn scale8(value: u8, factor: u8) -> u8 {
    ((value as u16 * factor as u16) / 255) as u8
}

/// Square-law dimming curve: `x * x / 255`.
#[inline]
pub const fn dim8_raw(x: u8) -> u8 {
    scale8(x, x)
}

#[inline]
const fn blend8(a: u8, b: u8, amount: u8) -> u8 {
    ((a as u16 * (255 - amount as u16) + b as u16 * amount as u16) / 255) as u8
}

/// An 8-bit-per-channel RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const WHITE: Self = Self::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Unpack from `0xRRGGBB`.
    pub const fn from_u32(packed: u32) -> Self {
        Self {
            r: (packed >> 16) as u8,
            g: (packed >> 8) as u8,
            b: packed as u8,
        }
    }

    /// Pack into `0xRRGGBB`.
    pub const fn to_u32(self) -> u32 {
        (self.r as u32) << 16 | (self.g as u32) << 8 | self.b as u32
    }

    /// Fully saturated, full brightness colour at `hue` on a 0-255 wheel.
    pub const fn from_hue(hue: u8) -> Self {
        let sector = hue / 43;
        let rise = ((hue - sector * 43) as u16 * 6) as u8;
        let fall = 255 - rise;
        match sector {
            0 => Self::new(255, rise, 0),
            1 => Self::new(fall, 255, 0),
            2 => Self::new(0, 255, rise),
            3 => Self::new(0, fall, 255),
            4 => Self::new(rise, 0, 255),
            _ => Self::new(255, 0, fall),
        }
    }

    /// Scale every channel by `factor / 255`.
    pub const fn scaled(self, factor: u8) -> Self {
        Self::new(
            scale8(self.r, factor),
            scale8(self.g, factor),
            scale8(self.b, factor),
        )
    }

    /// Mix toward `other` by `amount / 255`.
    pub const fn blend(self, other: Self, amount: u8) -> Self {
        Self::new(
            blend8(self.r, other.r, amount),
            blend8(self.g, other.g, amount),
            blend8(self.b, other.b, amount),
        )
    }

    /// Darken by `amount / 255`.
    pub const fn faded(self, amount: u8) -> Self {
        self.scaled(255 - amount)
    }

    /// Mean of the three channels.
    pub const fn average_light(self) -> u8 {
        ((self.r as u16 + self.g as u16 + self.b as u16) / 3) as u8
    }

    pub const fn is_black(self) -> bool {
        self.r == 0 && self.g == 0 && self.b == 0
    }
}

impl From<u32> for Rgb {
    fn from(packed: u32) -> Self {
        Self::from_u32(packed)
    }
}

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:06x}", self.to_u32())
    }
}

/// One colour per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    pixels: Vec<Rgb>,
}

impl FrameBuffer {
    /// A black buffer of `len` pixels.
    pub fn new(len: usize) -> Self {
        Self {
            pixels: vec![Rgb::BLACK; len],
        }
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Colour at `px`, if in range.
    pub fn get(&self, px: PixelIndex) -> Option<Rgb> {
        self.pixels.get(px.index()).copied()
    }

    /// Mutable colour at `px`, if in range.
    pub fn get_mut(&mut self, px: PixelIndex) -> Option<&mut Rgb> {
        self.pixels.get_mut(px.index())
    }

    /// Write `color` at `px`. Out-of-range writes are dropped.
    pub fn set(&mut self, px: PixelIndex, color: Rgb) {
        if let Some(slot) = self.pixels.get_mut(px.index()) {
            *slot = color;
        }
    }

    /// Darken every pixel by `amount / 255`.
    pub fn fade_to_black_by(&mut self, amount: u8) {
        if amount == 0 {
            return;
        }
        for px in &mut self.pixels {
            *px = px.faded(amount);
        }
    }

    pub fn fill(&mut self, color: Rgb) {
        self.pixels.fill(color);
    }

    pub fn clear(&mut self) {
        self.fill(Rgb::BLACK);
    }

    /// Number of pixels that are not black.
    pub fn lit_count(&self) -> usize {
        self.pixels.iter().filter(|c| !c.is_black()).count()
    }

    pub fn as_slice(&self) -> &[Rgb] {
        &self.pixels
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rgb> {
        self.pixels.iter()
    }
}

impl Index<PixelIndex> for FrameBuffer {
    type Output = Rgb;

    fn index(&self, px: PixelIndex) -> &Rgb {
        &self.pixels[px.index()]
    }
}

impl IndexMut<PixelIndex> for FrameBuffer {
    fn index_mut(&mut self, px: PixelIndex) -> &mut Rgb {
        &mut self.pixels[px.index()]
    }
}
