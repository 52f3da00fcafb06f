//! Paints makeup effects onto a transparent overlay, using facial landmarks as geometry.
//!
//! All functions here take the overlay, the landmarks, a color and an opacity. They do nothing
//! (apart from logging) when there are fewer than 68 landmarks, and never read outside the
//! landmark list. Extra landmarks past the 68-point convention are ignored.

use crate::{
    image::{fill_circle, fill_polygon, Color, FillRule, Image},
    landmark::{Landmarks, INNER_LIPS, LEFT_EYE, OUTER_LIPS, RIGHT_EYE},
    palette::Effect,
};

/// The order in which [`Pipeline`][crate::pipeline::Pipeline] paints enabled effects.
///
/// Later effects are painted on top of earlier ones where they overlap.
pub const PAINT_ORDER: [Effect; 3] = [Effect::Lipstick, Effect::Eyeshadow, Effect::Blush];

/// Radius of each blush circle, in pixels.
pub const BLUSH_RADIUS: f32 = 22.0;

fn check_face(landmarks: &Landmarks, effect: Effect) -> bool {
    if landmarks.covers_face() {
        true
    } else {
        log::debug!("not drawing {}: {:?} do not cover a face", effect, landmarks);
        false
    }
}

/// Paints the lips: the area between the outer and the inner lip contour.
///
/// The inner contour (the mouth opening) is left untouched.
pub fn draw_lips(overlay: &mut Image, landmarks: &Landmarks, color: Color, opacity: f32) {
    if !check_face(landmarks, Effect::Lipstick) {
        return;
    }

    fill_polygon(overlay, landmarks.contour(OUTER_LIPS))
        .contour(landmarks.contour(INNER_LIPS))
        .rule(FillRule::EvenOdd)
        .color(color)
        .opacity(opacity);
}

/// Paints both eye contours solidly.
pub fn draw_eyeshadow(overlay: &mut Image, landmarks: &Landmarks, color: Color, opacity: f32) {
    if !check_face(landmarks, Effect::Eyeshadow) {
        return;
    }

    for eye in [LEFT_EYE, RIGHT_EYE] {
        fill_polygon(overlay, landmarks.contour(eye))
            .color(color)
            .opacity(opacity);
    }
}

/// Returns the centers of the left and right blush circles.
///
/// Each center sits halfway between a jaw landmark and the closest corner of the lower nose.
///
/// # Panics
///
/// This function panics if `landmarks` has fewer than 68 entries.
pub fn blush_centers(landmarks: &Landmarks) -> [[f32; 2]; 2] {
    assert!(landmarks.covers_face(), "{:?} do not cover a face", landmarks);

    let left = landmarks.get(2).midpoint(landmarks.get(31));
    let right = landmarks.get(14).midpoint(landmarks.get(35));
    [left.position(), right.position()]
}

/// Paints a circle of [`BLUSH_RADIUS`] on each cheek.
pub fn draw_blush(overlay: &mut Image, landmarks: &Landmarks, color: Color, opacity: f32) {
    if !check_face(landmarks, Effect::Blush) {
        return;
    }

    for [x, y] in blush_centers(landmarks) {
        fill_circle(overlay, x, y, BLUSH_RADIUS)
            .color(color)
            .opacity(opacity);
    }
}

/// Paints `effect` by dispatching to [`draw_lips`], [`draw_eyeshadow`] or [`draw_blush`].
pub fn draw(
    effect: Effect,
    overlay: &mut Image,
    landmarks: &Landmarks,
    color: Color,
    opacity: f32,
) {
    match effect {
        Effect::Lipstick => draw_lips(overlay, landmarks, color, opacity),
        Effect::Eyeshadow => draw_eyeshadow(overlay, landmarks, color, opacity),
        Effect::Blush => draw_blush(overlay, landmarks, color, opacity),
    }
}

#[cfg(test)]
mod tests {
    use crate::landmark::{Landmark, NUM_LANDMARKS};

    use super::*;

    fn face_at(pos: [f32; 2]) -> Landmarks {
        Landmarks::from_positions(std::iter::repeat(pos).take(NUM_LANDMARKS))
    }

    fn with_contour(lms: &mut Landmarks, first: usize, points: &[[f32; 2]]) {
        for (i, &pos) in points.iter().enumerate() {
            lms.set(first + i, Landmark::new(pos));
        }
    }

    fn is_painted(image: &Image, x: u32, y: u32) -> bool {
        image.get(x, y) != Color::NULL
    }

    #[test]
    fn paint_order_covers_every_effect_once() {
        for effect in Effect::ALL {
            assert_eq!(PAINT_ORDER.iter().filter(|&&e| e == effect).count(), 1);
        }
    }

    #[test]
    fn blush_circle_centers() {
        let mut lms = face_at([0.0, 0.0]);
        lms.set(2, Landmark::new([0.0, 0.0]));
        lms.set(31, Landmark::new([10.0, 10.0]));
        lms.set(14, Landmark::new([100.0, 0.0]));
        lms.set(35, Landmark::new([120.0, 20.0]));
        assert_eq!(blush_centers(&lms), [[5.0, 5.0], [110.0, 10.0]]);

        let mut overlay = Image::new(140, 40);
        draw_blush(&mut overlay, &lms, Color::MAGENTA, 1.0);
        // Pixel (26, 5) has its center 21.5 away from the left center, (27, 5) is 22.5 away.
        assert!(is_painted(&overlay, 26, 5));
        assert!(!is_painted(&overlay, 27, 5));
        assert!(is_painted(&overlay, 110, 31));
        assert!(!is_painted(&overlay, 110, 32));
        assert!(!is_painted(&overlay, 60, 5));
    }

    #[test]
    fn lips_have_a_hole() {
        let mut lms = face_at([0.0, 0.0]);
        #[rustfmt::skip]
        with_contour(&mut lms, *OUTER_LIPS.start(), &[
            [10.0, 10.0], [20.0, 10.0], [30.0, 10.0], [40.0, 10.0], [50.0, 10.0], [50.0, 20.0],
            [50.0, 30.0], [40.0, 30.0], [30.0, 30.0], [20.0, 30.0], [10.0, 30.0], [10.0, 20.0],
        ]);
        #[rustfmt::skip]
        with_contour(&mut lms, *INNER_LIPS.start(), &[
            [25.0, 18.0], [30.0, 18.0], [35.0, 18.0], [35.0, 20.5],
            [35.0, 23.0], [30.0, 23.0], [25.0, 23.0], [25.0, 20.5],
        ]);

        let mut overlay = Image::new(60, 40);
        draw_lips(&mut overlay, &lms, Color::RED, 1.0);
        for y in 0..40 {
            for x in 0..60 {
                let in_outer = (10..50).contains(&x) && (10..30).contains(&y);
                let in_inner = (25..35).contains(&x) && (18..23).contains(&y);
                assert_eq!(
                    is_painted(&overlay, x, y),
                    in_outer && !in_inner,
                    "pixel ({x}, {y})"
                );
            }
        }
        assert_eq!(overlay.get(10, 10), Color::RED);
    }

    #[test]
    fn eyeshadow_fills_both_eyes() {
        let mut lms = face_at([0.0, 0.0]);
        #[rustfmt::skip]
        with_contour(&mut lms, *LEFT_EYE.start(), &[
            [2.0, 2.0], [4.0, 1.0], [6.0, 2.0], [6.0, 4.0], [4.0, 5.0], [2.0, 4.0],
        ]);
        #[rustfmt::skip]
        with_contour(&mut lms, *RIGHT_EYE.start(), &[
            [12.0, 2.0], [14.0, 1.0], [16.0, 2.0], [16.0, 4.0], [14.0, 5.0], [12.0, 4.0],
        ]);

        let mut overlay = Image::new(20, 8);
        draw_eyeshadow(&mut overlay, &lms, Color::BLUE, 0.5);
        assert_eq!(overlay.get(4, 3), Color::BLUE.with_alpha(128));
        assert_eq!(overlay.get(14, 3), Color::BLUE.with_alpha(128));
        assert!(!is_painted(&overlay, 9, 3));
        assert!(!is_painted(&overlay, 0, 0));
    }

    #[test]
    fn zero_opacity_is_noop() {
        let lms = Landmarks::from_positions((0..NUM_LANDMARKS).map(|i| {
            let i = i as f32;
            [(i * 7.0) % 50.0, (i * 13.0) % 50.0]
        }));
        let mut overlay = Image::new(50, 50);
        overlay.set(10, 10, Color::GREEN.with_alpha(77));
        let before = overlay.clone();

        for effect in Effect::ALL {
            draw(effect, &mut overlay, &lms, Color::RED, 0.0);
        }
        assert_eq!(overlay, before);
    }

    #[test]
    fn extra_landmarks_are_ignored() {
        let lms = Landmarks::from_positions((0..NUM_LANDMARKS + 1).map(|_| [5.0, 5.0]));
        let mut overlay = Image::new(20, 20);
        draw_blush(&mut overlay, &lms, Color::RED, 1.0);
        assert_eq!(overlay.get(5, 5), Color::RED);
        assert_eq!(blush_centers(&lms), [[5.0, 5.0], [5.0, 5.0]]);

        let mut lms = Landmarks::from_positions((0..NUM_LANDMARKS + 5).map(|_| [0.0, 0.0]));
        #[rustfmt::skip]
        with_contour(&mut lms, *LEFT_EYE.start(), &[
            [2.0, 2.0], [4.0, 1.0], [6.0, 2.0], [6.0, 4.0], [4.0, 5.0], [2.0, 4.0],
        ]);
        let mut overlay = Image::new(20, 8);
        draw_eyeshadow(&mut overlay, &lms, Color::GREEN, 1.0);
        assert_eq!(overlay.get(4, 3), Color::GREEN);
    }

    #[test]
    fn incomplete_face_is_noop() {
        let mut overlay = Image::new(30, 30);
        for len in [0, 1, 48, 67] {
            let lms = Landmarks::from_positions(
                (0..len).map(|i| [(i % 30) as f32, (i / 2 % 30) as f32]),
            );
            for effect in Effect::ALL {
                draw(effect, &mut overlay, &lms, Color::RED, 1.0);
            }
        }
        assert!(overlay.pixels().all(|c| c == Color::NULL));
    }
}
