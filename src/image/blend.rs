use std::thread;

use super::{Color, Image};

/// Describes how to blend pixels together in a [`Blend`] operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendMode {
    /// All destination pixels will be overwritten with the corresponding source pixel.
    Overwrite,

    /// Performs source-over alpha blending to make the source image appear in front of the
    /// destination image.
    Alpha,
}

/// A blending operation between two images.
///
/// Returned by [`Image::blend_from`]. The operation is performed when this guard is dropped.
pub struct Blend<'a> {
    dest: &'a mut Image,
    src: &'a Image,
    mode: BlendMode,
    opacity: f32,
}

impl<'a> Blend<'a> {
    pub(super) fn new(dest: &'a mut Image, src: &'a Image) -> Self {
        Self {
            dest,
            src,
            mode: BlendMode::Alpha,
            opacity: 1.0,
        }
    }

    /// Sets the blend mode to use.
    pub fn mode(&mut self, mode: BlendMode) -> &mut Self {
        self.mode = mode;
        self
    }

    /// Sets a global opacity factor applied to every source pixel in [`BlendMode::Alpha`].
    ///
    /// The value is clamped to the range `0.0..=1.0`. Defaults to `1.0`.
    pub fn opacity(&mut self, opacity: f32) -> &mut Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }
}

impl Drop for Blend<'_> {
    fn drop(&mut self) {
        if thread::panicking() || self.src.is_empty() {
            return;
        }

        let (dest_w, dest_h) = (self.dest.width(), self.dest.height());
        let (src_w, src_h) = (self.src.width(), self.src.height());
        for dest_y in 0..dest_h {
            for dest_x in 0..dest_w {
                let src_x = ((dest_x as f32 + 0.5) / dest_w as f32 * src_w as f32) as u32;
                let src_y = ((dest_y as f32 + 0.5) / dest_h as f32 * src_h as f32) as u32;

                let src_pix = self.src.get(src_x.min(src_w - 1), src_y.min(src_h - 1));
                let dest_pix = self.dest.get(dest_x, dest_y);
                let result = match self.mode {
                    BlendMode::Overwrite => src_pix,
                    BlendMode::Alpha => blend_alpha(dest_pix, src_pix, self.opacity),
                };
                self.dest.set(dest_x, dest_y, result);
            }
        }
    }
}

/// Composites `src` over `dest` (the "source-over" operator), scaling the source alpha by
/// `opacity`.
///
/// Blending happens on the non-linear sRGB values, like in most 2D canvas implementations. An
/// effective source alpha of zero returns `dest` unchanged.
pub fn blend_alpha(dest: Color, src: Color, opacity: f32) -> Color {
    let src_a = f32::from(src.a()) / 255.0 * opacity.clamp(0.0, 1.0);
    // also catches NaN opacities
    if !(src_a > 0.0) {
        return dest;
    }

    let dest_a = f32::from(dest.a()) / 255.0;
    let result_a = src_a + dest_a * (1.0 - src_a);
    let channel = |dest: u8, src: u8| {
        let c = (f32::from(src) * src_a + f32::from(dest) * dest_a * (1.0 - src_a)) / result_a;
        c.round().clamp(0.0, 255.0) as u8
    };

    Color([
        channel(dest.r(), src.r()),
        channel(dest.g(), src.g()),
        channel(dest.b(), src.b()),
        (result_a * 255.0).round().clamp(0.0, 255.0) as u8,
    ])
}
