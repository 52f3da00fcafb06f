//! Skin tone classification from a handful of sampled skin pixels.
//!
//! Three skin locations are derived from the facial landmarks (forehead and both cheeks), the
//! frame pixels at those locations are averaged, converted to [`Hsv`], and mapped to one of six
//! [`SkinTone`] categories by brightness and hue.

use std::fmt;

use crate::{
    image::{Color, Image},
    landmark::Landmarks,
    palette::Palette,
};

/// A color in the HSV color space.
///
/// Hue is in degrees in range `0.0..360.0`, saturation and value are percentages in range
/// `0.0..=100.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsv {
    pub h: f32,
    pub s: f32,
    pub v: f32,
}

impl Hsv {
    /// Converts an sRGB color to HSV.
    ///
    /// Grays (including black and white) have a hue of 0, and black has a saturation of 0.
    pub fn from_rgb([r, g, b]: [u8; 3]) -> Self {
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let d = f32::from(max - min);
        let [rf, gf, bf] = [r, g, b].map(f32::from);

        let h = if max == min {
            0.0
        } else if max == r {
            (gf - bf) / d + if g < b { 6.0 } else { 0.0 }
        } else if max == g {
            (bf - rf) / d + 2.0
        } else {
            (rf - gf) / d + 4.0
        };
        let s = if max == 0 { 0.0 } else { d / f32::from(max) };
        let v = f32::from(max) / 255.0;

        Self {
            h: h * 60.0,
            s: s * 100.0,
            v: v * 100.0,
        }
    }
}

impl From<Color> for Hsv {
    fn from(color: Color) -> Self {
        Self::from_rgb(color.rgb())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Brightness {
    Light,
    Medium,
    Dark,
}

impl Brightness {
    /// Buckets an HSV value (in percent): above 75 is light, above 40 medium, the rest dark.
    pub fn from_value(v: f32) -> Self {
        if v > 75.0 {
            Self::Light
        } else if v > 40.0 {
            Self::Medium
        } else {
            Self::Dark
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Light => "Light",
            Self::Medium => "Medium",
            Self::Dark => "Dark",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Undertone {
    Cool,
    Warm,
}

impl Undertone {
    /// Red, orange and yellow hues (up to 60°, and from 330° on) are warm, everything else is
    /// cool.
    pub fn from_hue(h: f32) -> Self {
        if h <= 60.0 || h >= 330.0 {
            Self::Warm
        } else {
            Self::Cool
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Cool => "Cool",
            Self::Warm => "Warm",
        }
    }
}

/// One of the six supported skin tone categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkinTone {
    LightCool,
    LightWarm,
    MediumCool,
    MediumWarm,
    DarkCool,
    DarkWarm,
}

impl SkinTone {
    pub const ALL: [SkinTone; 6] = [
        SkinTone::LightCool,
        SkinTone::LightWarm,
        SkinTone::MediumCool,
        SkinTone::MediumWarm,
        SkinTone::DarkCool,
        SkinTone::DarkWarm,
    ];

    pub fn new(brightness: Brightness, undertone: Undertone) -> Self {
        use Brightness::*;
        use Undertone::*;
        match (brightness, undertone) {
            (Light, Cool) => Self::LightCool,
            (Light, Warm) => Self::LightWarm,
            (Medium, Cool) => Self::MediumCool,
            (Medium, Warm) => Self::MediumWarm,
            (Dark, Cool) => Self::DarkCool,
            (Dark, Warm) => Self::DarkWarm,
        }
    }

    /// Classifies an averaged skin color.
    pub fn from_hsv(hsv: Hsv) -> Self {
        Self::new(Brightness::from_value(hsv.v), Undertone::from_hue(hsv.h))
    }

    pub fn brightness(&self) -> Brightness {
        match self {
            Self::LightCool | Self::LightWarm => Brightness::Light,
            Self::MediumCool | Self::MediumWarm => Brightness::Medium,
            Self::DarkCool | Self::DarkWarm => Brightness::Dark,
        }
    }

    pub fn undertone(&self) -> Undertone {
        match self {
            Self::LightCool | Self::MediumCool | Self::DarkCool => Undertone::Cool,
            Self::LightWarm | Self::MediumWarm | Self::DarkWarm => Undertone::Warm,
        }
    }

    pub fn palette(&self) -> Palette {
        Palette::for_tone(*self)
    }
}

/// Formats the tone as `Brightness/Undertone`, eg. `Medium/Warm`.
impl fmt::Display for SkinTone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.brightness().name(), self.undertone().name())
    }
}

/// Result of a successful [`classify`] call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneAnalysis {
    pub tone: SkinTone,
    pub palette: Palette,
    /// Average of the sampled skin pixels (always opaque).
    pub avg_rgb: Color,
    pub avg_hsv: Hsv,
}

/// Returns the frame locations that are sampled for skin color: forehead, left cheek and right
/// cheek.
///
/// # Panics
///
/// This function panics if `landmarks` does not contain a full face.
pub fn sample_points(landmarks: &Landmarks) -> [[f32; 2]; 3] {
    assert!(landmarks.is_face(), "{:?} do not describe a face", landmarks);

    let forehead = landmarks.get(19).midpoint(landmarks.get(24)).offset(0.0, -30.0);
    let left_cheek = landmarks.get(36).offset(-20.0, 30.0);
    let right_cheek = landmarks.get(45).offset(20.0, 30.0);
    [forehead, left_cheek, right_cheek].map(|lm| lm.position())
}

/// Estimates the skin tone of the face described by `landmarks` in `frame`.
///
/// Returns [`None`] when there is no face (missing landmarks or a landmark count other than 68)
/// or when the frame has no pixels.
pub fn classify(frame: &Image, landmarks: Option<&Landmarks>) -> Option<ToneAnalysis> {
    let landmarks = landmarks.filter(|lms| lms.is_face())?;

    let mut sum = [0u32; 3];
    let points = sample_points(landmarks);
    for [x, y] in points {
        let color = frame.sample_clamped(x, y)?;
        for (acc, c) in sum.iter_mut().zip(color.rgb()) {
            *acc += u32::from(c);
        }
    }
    let [r, g, b] = sum.map(|c| (c as f32 / points.len() as f32).round() as u8);
    let avg_rgb = Color::from_rgb8(r, g, b);
    let avg_hsv = Hsv::from(avg_rgb);
    let tone = SkinTone::from_hsv(avg_hsv);

    log::trace!("skin sample {} ({:?}) -> {}", avg_rgb, avg_hsv, tone);

    Some(ToneAnalysis {
        tone,
        palette: tone.palette(),
        avg_rgb,
        avg_hsv,
    })
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use crate::landmark::{Landmark, NUM_LANDMARKS};

    use super::*;

    fn face_at(pos: [f32; 2]) -> Landmarks {
        Landmarks::from_positions(std::iter::repeat(pos).take(NUM_LANDMARKS))
    }

    fn hsv(h: f32, s: f32, v: f32) -> Hsv {
        Hsv { h, s, v }
    }

    #[test]
    fn rgb_to_hsv() {
        let skin = Hsv::from_rgb([224, 172, 105]);
        assert_relative_eq!(skin.h, 33.7815, epsilon = 1e-3);
        assert_relative_eq!(skin.s, 53.125, epsilon = 1e-3);
        assert_relative_eq!(skin.v, 87.8431, epsilon = 1e-3);

        assert_eq!(Hsv::from_rgb([0, 0, 0]), hsv(0.0, 0.0, 0.0));
        assert_eq!(Hsv::from_rgb([255, 255, 255]), hsv(0.0, 0.0, 100.0));
        assert_eq!(Hsv::from_rgb([255, 0, 0]), hsv(0.0, 100.0, 100.0));
        assert_eq!(Hsv::from_rgb([0, 255, 0]).h, 120.0);
        assert_eq!(Hsv::from_rgb([0, 0, 255]).h, 240.0);
        assert_eq!(Hsv::from_rgb([255, 0, 255]).h, 300.0);
        assert_relative_eq!(Hsv::from_rgb([255, 0, 1]).h, 359.7647, epsilon = 1e-3);
    }

    #[test]
    fn brightness_boundaries() {
        assert_eq!(Brightness::from_value(100.0), Brightness::Light);
        assert_eq!(Brightness::from_value(75.01), Brightness::Light);
        assert_eq!(Brightness::from_value(75.0), Brightness::Medium);
        assert_eq!(Brightness::from_value(40.01), Brightness::Medium);
        assert_eq!(Brightness::from_value(40.0), Brightness::Dark);
        assert_eq!(Brightness::from_value(0.0), Brightness::Dark);
    }

    #[test]
    fn undertone_boundaries() {
        assert_eq!(Undertone::from_hue(0.0), Undertone::Warm);
        assert_eq!(Undertone::from_hue(20.0), Undertone::Warm);
        assert_eq!(Undertone::from_hue(60.0), Undertone::Warm);
        assert_eq!(Undertone::from_hue(60.5), Undertone::Cool);
        assert_eq!(Undertone::from_hue(200.0), Undertone::Cool);
        assert_eq!(Undertone::from_hue(329.9), Undertone::Cool);
        assert_eq!(Undertone::from_hue(330.0), Undertone::Warm);
    }

    #[test]
    fn labels() {
        assert_eq!(SkinTone::from_hsv(hsv(20.0, 50.0, 75.0)).to_string(), "Medium/Warm");
        assert_eq!(SkinTone::from_hsv(hsv(240.0, 50.0, 90.0)).to_string(), "Light/Cool");
        assert_eq!(SkinTone::from_hsv(hsv(0.0, 0.0, 40.0)).to_string(), "Dark/Warm");

        for tone in SkinTone::ALL {
            assert_eq!(SkinTone::new(tone.brightness(), tone.undertone()), tone);
        }
    }

    #[test]
    fn classification_is_total() {
        let mut rng = fastrand::Rng::with_seed(0x5eed);
        for _ in 0..10_000 {
            let color = [rng.u8(..), rng.u8(..), rng.u8(..)];
            let hsv = Hsv::from_rgb(color);
            assert!((0.0..360.0).contains(&hsv.h), "{color:?} -> {hsv:?}");
            assert!((0.0..=100.0).contains(&hsv.s), "{color:?} -> {hsv:?}");
            assert!((0.0..=100.0).contains(&hsv.v), "{color:?} -> {hsv:?}");

            let tone = SkinTone::from_hsv(hsv);
            assert_eq!(tone.brightness(), Brightness::from_value(hsv.v));
            assert!(SkinTone::ALL.contains(&tone));
        }
    }

    #[test]
    fn hsv_grid_classification() {
        for tenth_degree in 0..3600 {
            let h = tenth_degree as f32 / 10.0;
            let warm = h <= 60.0 || h >= 330.0;
            for v in 0..=100 {
                let v = v as f32;
                let light = v > 75.0;
                let medium = !light && v > 40.0;
                for s in [0.0, 50.0, 100.0] {
                    let tone = SkinTone::from_hsv(hsv(h, s, v));
                    assert_eq!(tone.undertone() == Undertone::Warm, warm, "h={h} v={v}");
                    assert_eq!(tone.brightness() == Brightness::Light, light, "h={h} v={v}");
                    assert_eq!(tone.brightness() == Brightness::Medium, medium, "h={h} v={v}");
                }
            }
        }

        let mut rng = fastrand::Rng::with_seed(0xface);
        for _ in 0..10_000 {
            let hsv = hsv(rng.f32() * 360.0, rng.f32() * 100.0, rng.f32() * 100.0);
            assert!(SkinTone::ALL.contains(&SkinTone::from_hsv(hsv)), "{hsv:?}");
        }
    }

    #[test]
    fn sample_locations() {
        let mut lms = face_at([0.0, 0.0]);
        lms.set(19, Landmark::new([60.0, 50.0]));
        lms.set(24, Landmark::new([100.0, 70.0]));
        lms.set(36, Landmark::new([50.0, 80.0]));
        lms.set(45, Landmark::new([110.0, 80.0]));
        assert_eq!(
            sample_points(&lms),
            [[80.0, 30.0], [30.0, 110.0], [130.0, 110.0]]
        );
    }

    #[test]
    fn classify_constant_frame() {
        let frame = Image::filled(200, 200, Color::from_rgb8(224, 172, 105));
        let analysis = classify(&frame, Some(&face_at([100.0, 100.0]))).unwrap();
        assert_eq!(analysis.tone, SkinTone::LightWarm);
        assert_eq!(analysis.palette, Palette::for_tone(SkinTone::LightWarm));
        assert_eq!(analysis.avg_rgb, Color::from_rgb8(224, 172, 105));

        let frame = Image::filled(10, 10, Color::from_rgb8(40, 30, 80));
        let analysis = classify(&frame, Some(&face_at([5.0, 5.0]))).unwrap();
        assert_eq!(analysis.tone, SkinTone::DarkCool);
    }

    #[test]
    fn classify_averages_and_clamps_samples() {
        let mut frame = Image::new(3, 1);
        frame.set(0, 0, Color::from_rgb8(10, 0, 0));
        frame.set(1, 0, Color::from_rgb8(0, 20, 0));
        frame.set(2, 0, Color::from_rgb8(0, 0, 31));

        // All samples fall outside the frame and get clamped to its edges.
        let mut lms = face_at([0.0, 0.0]);
        lms.set(19, Landmark::new([1.0, 0.0]));
        lms.set(24, Landmark::new([1.0, 0.0]));
        let analysis = classify(&frame, Some(&lms)).unwrap();
        assert_eq!(analysis.avg_rgb, Color::from_rgb8(3, 7, 10));
    }

    #[test]
    fn classify_needs_a_face() {
        let frame = Image::filled(50, 50, Color::WHITE);
        assert_eq!(classify(&frame, None), None);
        for len in [0, 1, 67, 69] {
            let lms = Landmarks::new(len);
            assert_eq!(classify(&frame, Some(&lms)), None, "{len} landmarks");
        }

        assert_eq!(classify(&Image::new(0, 0), Some(&face_at([0.0, 0.0]))), None);
    }
}
