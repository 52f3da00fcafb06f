//! Image manipulation.
//!
//! This module provides:
//!
//! - The [`Image`] type, an owned RGBA image used for camera frames and overlay surfaces.
//! - The [`Color`] type, an 8-bit sRGB color with alpha that can be parsed from hex strings.
//! - Freestanding `fill_*` functions that paint shapes onto an [`Image`] with alpha blending.
//! - [`draw_marker`] to quickly visualize landmarks.

mod blend;
mod draw;


use std::{fmt, path::Path, str::FromStr};

use embedded_graphics::{pixelcolor::raw::RawU32, prelude::PixelColor};
use image::{ImageBuffer, Rgba, RgbaImage};

pub use blend::*;
pub use draw::*;

#[derive(Debug, Clone, Copy)]
#[non_exhaustive]
enum ImageFormat {
    Jpeg,
    Png,
}

impl ImageFormat {
    fn from_path(path: &Path) -> crate::Result<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("jpg" | "jpeg") => Ok(Self::Jpeg),
            Some("png") => Ok(Self::Png),
            _ => Err(format!(
                "invalid image path '{}' (must have one of the supported extensions)",
                path.display()
            )
            .into()),
        }
    }

    fn to_image_crate(self) -> image::ImageFormat {
        match self {
            Self::Jpeg => image::ImageFormat::Jpeg,
            Self::Png => image::ImageFormat::Png,
        }
    }
}

/// An 8-bit sRGB image with alpha channel.
#[derive(Clone, PartialEq, Eq)]
pub struct Image {
    pub(crate) buf: RgbaImage,
}

impl Image {
    /// Loads an image from the filesystem.
    ///
    /// The path must have a supported file extension (`jpeg`, `jpg` or `png`).
    pub fn load<A: AsRef<Path>>(path: A) -> Result<Self, crate::Error> {
        Self::load_impl(path.as_ref())
    }

    fn load_impl(path: &Path) -> Result<Self, crate::Error> {
        let format = ImageFormat::from_path(path)?;
        let data = std::fs::read(path)?;
        let buf = image::load_from_memory_with_format(&data, format.to_image_crate())?.to_rgba8();
        log::debug!("loaded {}x{} image from {}", buf.width(), buf.height(), path.display());
        Ok(Self { buf })
    }

    /// Saves an image to the file system.
    ///
    /// The path must have a supported file extension (`jpeg`, `jpg` or `png`). JPEG output drops
    /// the alpha channel.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), crate::Error> {
        self.save_impl(path.as_ref())
    }

    fn save_impl(&self, path: &Path) -> Result<(), crate::Error> {
        match ImageFormat::from_path(path)? {
            ImageFormat::Jpeg => {
                let rgb = image::DynamicImage::ImageRgba8(self.buf.clone()).to_rgb8();
                Ok(rgb.save_with_format(path, image::ImageFormat::Jpeg)?)
            }
            ImageFormat::Png => Ok(self.buf.save_with_format(path, image::ImageFormat::Png)?),
        }
    }

    /// Creates an empty image of a specified size.
    ///
    /// The image will start out black and fully transparent.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            buf: ImageBuffer::new(width, height),
        }
    }

    /// Returns a new [`Image`] of the given size, with every pixel initialized to `color`.
    pub fn filled(width: u32, height: u32, color: Color) -> Self {
        let mut this = Self::new(width, height);
        this.clear(color);
        this
    }

    /// Creates an [`Image`] from raw, preexisting RGBA pixel data.
    ///
    /// `buf` needs to contain data in the following interleaved pixel format:
    /// `rrrrrrrr gggggggg bbbbbbbb aaaaaaaa`. Its length needs to be exactly `width * height * 4`,
    /// or this function will panic.
    pub fn from_rgba8(width: u32, height: u32, buf: &[u8]) -> Self {
        let expected_size = width as usize * height as usize * 4;
        assert_eq!(
            expected_size,
            buf.len(),
            "incorrect buffer size {} for {}x{} image (expected {} bytes)",
            buf.len(),
            width,
            height,
            expected_size,
        );

        match ImageBuffer::from_raw(width, height, buf.to_vec()) {
            Some(buf) => Self { buf },
            None => unreachable!("buffer size was checked above"),
        }
    }

    /// Returns the width of this image, in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.buf.width()
    }

    /// Returns the height of this image, in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.buf.height()
    }

    /// Returns whether this image contains no pixels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Gets the image color at the given pixel coordinates.
    ///
    /// # Panics
    ///
    /// This will panic if `(x, y)` is outside the bounds of this image.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Color {
        Color(self.buf[(x, y)].0)
    }

    /// Sets the image color at the given pixel coordinates.
    ///
    /// # Panics
    ///
    /// This will panic if `(x, y)` is outside the bounds of this image.
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        self.buf[(x, y)] = Rgba(color.0);
    }

    /// Reads the pixel closest to `(x, y)`, clamping the coordinates to the image bounds.
    ///
    /// Returns [`None`] if the image is empty.
    pub fn sample_clamped(&self, x: f32, y: f32) -> Option<Color> {
        if self.is_empty() {
            return None;
        }

        let clamp = |v: f32, len: u32| {
            let max = (len - 1) as f32;
            // NaN ends up at 0 via the saturating float-to-int cast.
            v.round().clamp(0.0, max) as u32
        };
        Some(self.get(clamp(x, self.width()), clamp(y, self.height())))
    }

    /// Alpha-blends `color` onto the pixel at `(x, y)`, using `opacity` as an additional global
    /// alpha factor.
    #[inline]
    pub(crate) fn blend_pixel(&mut self, x: u32, y: u32, color: Color, opacity: f32) {
        let dest = self.get(x, y);
        self.set(x, y, blend_alpha(dest, color, opacity));
    }

    /// Blends `src` onto `self`, stretching or shrinking `src` as necessary.
    ///
    /// By default, this performs alpha blending.
    pub fn blend_from<'b>(&'b mut self, src: &'b Image) -> Blend<'b> {
        Blend::new(self, src)
    }

    /// Clears the image, setting every pixel value to `color`.
    pub fn clear(&mut self, color: Color) {
        self.buf.pixels_mut().for_each(|pix| pix.0 = color.0);
    }

    /// Returns an iterator over all pixel colors, row by row.
    pub fn pixels(&self) -> impl Iterator<Item = Color> + '_ {
        self.buf.pixels().map(|pix| Color(pix.0))
    }

    /// Returns the raw interleaved RGBA bytes of this image.
    #[inline]
    pub fn data(&self) -> &[u8] {
        self.buf.as_raw()
    }
}

impl fmt::Debug for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{} Image", self.width(), self.height())
    }
}

/// An 8-bit RGBA color.
///
/// Colors are always in the sRGB color space and use non-premultiplied alpha.
///
/// Colors can be parsed from `#rrggbb` or `#rrggbbaa` hex strings via [`FromStr`], and their
/// [`Display`][fmt::Display] implementation prints them in `#rrggbb` form (appending the alpha
/// channel only if it isn't opaque).
#[derive(PartialEq, Eq, Hash, Clone, Copy)]
pub struct Color(pub(crate) [u8; 4]);

impl Color {
    /// Fully transparent black (all components are 0).
    pub const NULL: Self = Self([0, 0, 0, 0]);
    pub const BLACK: Self = Self([0, 0, 0, 255]);
    pub const WHITE: Self = Self([255, 255, 255, 255]);
    pub const RED: Self = Self([255, 0, 0, 255]);
    pub const GREEN: Self = Self([0, 255, 0, 255]);
    pub const BLUE: Self = Self([0, 0, 255, 255]);
    pub const YELLOW: Self = Self([255, 255, 0, 255]);
    pub const MAGENTA: Self = Self([255, 0, 255, 255]);
    pub const CYAN: Self = Self([0, 255, 255, 255]);

    #[inline]
    pub const fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b, 255])
    }

    #[inline]
    pub const fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self([r, g, b, a])
    }

    /// Parses a `#rrggbb` or `#rrggbbaa` hex string. The leading `#` is optional.
    pub fn from_hex(hex: &str) -> crate::Result<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if !matches!(digits.len(), 6 | 8) || !digits.is_ascii() {
            return Err(format!("invalid hex color '{}' (expected #rrggbb or #rrggbbaa)", hex).into());
        }

        let mut rgba = [255; 4];
        for (i, out) in rgba.iter_mut().enumerate().take(digits.len() / 2) {
            *out = u8::from_str_radix(&digits[i * 2..i * 2 + 2], 16)
                .map_err(|e| format!("invalid hex color '{}': {}", hex, e))?;
        }
        Ok(Self(rgba))
    }

    #[inline]
    pub fn r(&self) -> u8 {
        self.0[0]
    }

    #[inline]
    pub fn g(&self) -> u8 {
        self.0[1]
    }

    #[inline]
    pub fn b(&self) -> u8 {
        self.0[2]
    }

    #[inline]
    pub fn a(&self) -> u8 {
        self.0[3]
    }

    #[inline]
    pub fn rgb(&self) -> [u8; 3] {
        [self.r(), self.g(), self.b()]
    }

    pub fn with_alpha(mut self, a: u8) -> Color {
        self.0[3] = a;
        self
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{:02x}{:02x}{:02x}{:02x}",
            self.r(),
            self.g(),
            self.b(),
            self.a(),
        )
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r(), self.g(), self.b())?;
        if self.a() != 255 {
            write!(f, "{:02x}", self.a())?;
        }
        Ok(())
    }
}

impl FromStr for Color {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

// FIXME leaks `embedded-graphics` dependency
impl PixelColor for Color {
    type Raw = RawU32;
}
