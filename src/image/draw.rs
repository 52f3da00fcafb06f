//! Shape filling and debug drawing.
//!
//! All `fill_*` functions return a *guard object* that allows optional customization of the shape
//! and performs the fill when dropped. Fills alpha-blend the shape color onto the target using
//! [`blend_alpha`][super::blend_alpha], so an opacity of `0.0` leaves the image untouched.
//!
//! A pixel is only written to if the shape covers its center. There is no anti-aliasing.

use std::{convert::Infallible, thread};

use embedded_graphics::{draw_target::DrawTarget, prelude::*, primitives::Rectangle};
use itertools::Itertools;

use super::{Color, Image};

/// Determines which parts of a (possibly self-overlapping) polygon are considered inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillRule {
    /// A point is inside if the contours wind around it a non-zero number of times.
    #[default]
    NonZero,
    /// A point is inside if a ray from it crosses an odd number of edges.
    ///
    /// This makes a contour nested inside another one cut a hole into it.
    EvenOdd,
}

/// Guard returned by [`fill_polygon`]; fills the polygon when dropped and allows customization.
pub struct FillPolygon<'a> {
    image: &'a mut Image,
    contours: Vec<Vec<[f32; 2]>>,
    color: Color,
    opacity: f32,
    rule: FillRule,
}

impl<'a> FillPolygon<'a> {
    /// Adds another closed contour to the polygon.
    ///
    /// All contours are filled in a single pass, so with [`FillRule::EvenOdd`] an inner contour
    /// will become a hole in the outer one.
    pub fn contour<I: IntoIterator<Item = [f32; 2]>>(&mut self, points: I) -> &mut Self {
        self.contours.push(points.into_iter().collect());
        self
    }

    /// Sets the fill color.
    pub fn color(&mut self, color: Color) -> &mut Self {
        self.color = color;
        self
    }

    /// Sets the global opacity of the fill, in range `0.0..=1.0`.
    ///
    /// By default, the polygon is drawn fully opaque.
    pub fn opacity(&mut self, opacity: f32) -> &mut Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    /// Sets the [`FillRule`] to use. Defaults to [`FillRule::NonZero`].
    pub fn rule(&mut self, rule: FillRule) -> &mut Self {
        self.rule = rule;
        self
    }
}

impl Drop for FillPolygon<'_> {
    fn drop(&mut self) {
        if thread::panicking() || !(self.opacity > 0.0) || self.image.is_empty() {
            return;
        }

        let (width, height) = (self.image.width(), self.image.height());
        let Some((y_min, y_max)) = self
            .contours
            .iter()
            .flatten()
            .map(|&[_, y]| y)
            .minmax()
            .into_option()
        else {
            return;
        };
        let rows = pixel_range(y_min, y_max, height);

        let mut crossings = Vec::new();
        for y in rows {
            let center_y = y as f32 + 0.5;

            crossings.clear();
            for contour in &self.contours {
                for (a, b) in contour.iter().circular_tuple_windows() {
                    if let Some(crossing) = edge_crossing(*a, *b, center_y) {
                        crossings.push(crossing);
                    }
                }
            }
            crossings.sort_by(|a: &(f32, i32), b| a.0.total_cmp(&b.0));

            let mut winding = 0;
            for (&(start, dir), &(end, _)) in crossings.iter().tuple_windows() {
                winding += dir;
                let inside = match self.rule {
                    FillRule::NonZero => winding != 0,
                    FillRule::EvenOdd => winding % 2 != 0,
                };
                if !inside {
                    continue;
                }

                for x in span_pixels(start, end, width) {
                    self.image.blend_pixel(x, y, self.color, self.opacity);
                }
            }
        }
    }
}

/// Computes where the edge `a -> b` crosses the horizontal line at `y`.
///
/// Returns the X coordinate of the crossing and the edge direction (`1` pointing down, `-1`
/// pointing up). Edges are treated as half-open in Y so that a vertex shared by two edges is only
/// counted once, and horizontal edges never cross.
fn edge_crossing(a: [f32; 2], b: [f32; 2], y: f32) -> Option<(f32, i32)> {
    let [ax, ay] = a;
    let [bx, by] = b;
    let dir = if ay <= y && by > y {
        1
    } else if by <= y && ay > y {
        -1
    } else {
        return None;
    };

    let x = ax + (y - ay) * (bx - ax) / (by - ay);
    Some((x, dir))
}

/// Returns the pixel indices whose centers lie in `start..end`, clipped to `0..len`.
fn span_pixels(start: f32, end: f32, len: u32) -> std::ops::Range<u32> {
    let first = (start - 0.5).ceil().clamp(0.0, len as f32) as u32;
    let last = (end - 0.5).ceil().clamp(0.0, len as f32) as u32;
    first..last.max(first)
}

/// Returns the pixel indices whose centers may lie in `min..=max`, clipped to `0..len`.
fn pixel_range(min: f32, max: f32, len: u32) -> std::ops::Range<u32> {
    let first = (min - 0.5).floor().clamp(0.0, len as f32) as u32;
    let last = (max + 0.5).ceil().clamp(0.0, len as f32) as u32;
    first..last.max(first)
}

/// Fills a closed polygon on an image.
///
/// The polygon is implicitly closed by connecting the last point to the first. More contours can
/// be added with [`FillPolygon::contour`].
pub fn fill_polygon<I: IntoIterator<Item = [f32; 2]>>(
    image: &mut Image,
    points: I,
) -> FillPolygon<'_> {
    FillPolygon {
        image,
        contours: vec![points.into_iter().collect()],
        color: Color::RED,
        opacity: 1.0,
        rule: FillRule::default(),
    }
}

/// Guard returned by [`fill_circle`]; fills the circle when dropped and allows customization.
pub struct FillCircle<'a> {
    image: &'a mut Image,
    center: [f32; 2],
    radius: f32,
    color: Color,
    opacity: f32,
}

impl<'a> FillCircle<'a> {
    /// Sets the fill color.
    pub fn color(&mut self, color: Color) -> &mut Self {
        self.color = color;
        self
    }

    /// Sets the global opacity of the fill, in range `0.0..=1.0`.
    ///
    /// By default, the circle is drawn fully opaque.
    pub fn opacity(&mut self, opacity: f32) -> &mut Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }
}

impl Drop for FillCircle<'_> {
    fn drop(&mut self) {
        if thread::panicking() || !(self.opacity > 0.0) || !(self.radius >= 0.0) {
            return;
        }

        let [cx, cy] = self.center;
        let r = self.radius;
        let rows = pixel_range(cy - r, cy + r, self.image.height());
        let cols = pixel_range(cx - r, cx + r, self.image.width());
        for y in rows {
            let dy = y as f32 + 0.5 - cy;
            for x in cols.clone() {
                let dx = x as f32 + 0.5 - cx;
                if dx * dx + dy * dy <= r * r {
                    self.image.blend_pixel(x, y, self.color, self.opacity);
                }
            }
        }
    }
}

/// Fills a circle of the given `radius` around `(center_x, center_y)`.
pub fn fill_circle(
    image: &mut Image,
    center_x: f32,
    center_y: f32,
    radius: f32,
) -> FillCircle<'_> {
    FillCircle {
        image,
        center: [center_x, center_y],
        radius,
        color: Color::RED,
        opacity: 1.0,
    }
}

/// Guard returned by [`draw_marker`]; draws the marker when dropped and allows customization.
pub struct DrawMarker<'a> {
    image: &'a mut Image,
    x: i32,
    y: i32,
    color: Color,
    size: u32,
}

impl<'a> DrawMarker<'a> {
    /// Sets the marker's color.
    pub fn color(&mut self, color: Color) -> &mut Self {
        self.color = color;
        self
    }

    /// Sets the width and height of the marker.
    ///
    /// The default size is 5. The size must be *uneven* and *non-zero*. A size of 1 will result in
    /// a single pixel getting drawn.
    pub fn size(&mut self, size: u32) -> &mut Self {
        assert!(size != 0, "marker size must be greater than zero");
        assert!(size % 2 == 1, "marker size must be an uneven number");
        self.size = size;
        self
    }
}

impl Drop for DrawMarker<'_> {
    fn drop(&mut self) {
        if thread::panicking() {
            return;
        }

        let (x, y, color) = (self.x, self.y, self.color);
        let offset = ((self.size - 1) / 2) as i32;
        let pixels = (-offset..=offset)
            .zip(-offset..=offset)
            .chain((-offset..=offset).rev().zip(-offset..=offset))
            .map(|(xoff, yoff)| Pixel(Point::new(x + xoff, y + yoff), color));
        match Target(&mut *self.image).draw_iter(pixels) {
            Ok(()) => {}
            Err(infallible) => match infallible {},
        }
    }
}

/// Draws an `X`-shaped marker onto an image, overwriting the covered pixels.
///
/// This can be used to visualize facial landmarks or sample locations.
pub fn draw_marker(image: &mut Image, x: f32, y: f32) -> DrawMarker<'_> {
    DrawMarker {
        image,
        x: x.floor() as i32,
        y: y.floor() as i32,
        color: Color::from_rgb8(255, 0, 0),
        size: 5,
    }
}

struct Target<'a>(&'a mut Image);

impl Dimensions for Target<'_> {
    fn bounding_box(&self) -> Rectangle {
        let (width, height) = (self.0.width(), self.0.height());

        Rectangle {
            top_left: Point { x: 0, y: 0 },
            size: Size { width, height },
        }
    }
}

impl DrawTarget for Target<'_> {
    type Color = Color;

    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if point.x >= 0
                && (point.x as u32) < self.0.width()
                && point.y >= 0
                && (point.y as u32) < self.0.height()
            {
                self.0.set(point.x as u32, point.y as u32, color);
            }
        }

        Ok(())
    }
}
