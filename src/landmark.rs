//! Facial landmarks in the 68-point convention.
//!
//! The [68 facial landmark points] were popularized by the Multi-PIE dataset and are output by
//! most classic face alignment models. Landmark detection itself happens outside of this crate;
//! the detector's output is handed to the [`Pipeline`][crate::pipeline::Pipeline] as a
//! [`Landmarks`] collection every frame.
//!
//! [68 facial landmark points]: https://ibug.doc.ic.ac.uk/media/uploads/images/annotpics/figure_68_markup.jpg

use std::{fmt, ops::RangeInclusive};

/// Number of landmarks in a complete face.
pub const NUM_LANDMARKS: usize = 68;

/// Indices of the jaw line, from the right side of the image subject's face to the left.
pub const JAW: RangeInclusive<usize> = 0..=16;
/// Indices of both eyebrows.
pub const EYEBROWS: RangeInclusive<usize> = 17..=26;
/// Indices of the nose bridge and the lower nose.
pub const NOSE: RangeInclusive<usize> = 27..=35;
/// Contour of the left eye (as seen in the image), starting at its outer corner.
pub const LEFT_EYE: RangeInclusive<usize> = 36..=41;
/// Contour of the right eye (as seen in the image), starting at its inner corner.
pub const RIGHT_EYE: RangeInclusive<usize> = 42..=47;
/// Outer contour of the lips, starting at the left mouth corner.
pub const OUTER_LIPS: RangeInclusive<usize> = 48..=59;
/// Inner contour of the lips, starting at the left mouth corner.
pub const INNER_LIPS: RangeInclusive<usize> = 60..=67;

/// All facial regions, in index order. Together they cover every landmark exactly once.
pub const REGIONS: [RangeInclusive<usize>; 7] = [
    JAW, EYEBROWS, NOSE, LEFT_EYE, RIGHT_EYE, OUTER_LIPS, INNER_LIPS,
];

type Position = [f32; 2];

/// An ordered list of 2D landmarks, in frame pixel coordinates.
///
/// This type does not enforce a particular length. Consumers check [`Landmarks::is_face`] or
/// [`Landmarks::covers_face`] before indexing, and treat anything else as "no face".
#[derive(Clone, PartialEq)]
pub struct Landmarks {
    positions: Box<[Position]>,
}

impl Landmarks {
    /// Creates a new [`Landmarks`] collection containing `len` preallocated landmarks.
    ///
    /// All landmarks will start with all coordinates at `0.0`.
    pub fn new(len: usize) -> Self {
        Self {
            positions: vec![[0.0, 0.0]; len].into_boxed_slice(),
        }
    }

    /// Creates a collection from a list of `[x, y]` positions.
    pub fn from_positions<I: IntoIterator<Item = Position>>(positions: I) -> Self {
        Self {
            positions: positions.into_iter().collect(),
        }
    }

    /// Parses landmarks from text containing one whitespace-separated `x y` pair per line.
    ///
    /// Empty lines and lines starting with `#` are skipped. The number of landmarks is not
    /// checked.
    pub fn parse(text: &str) -> crate::Result<Self> {
        let mut positions = Vec::new();
        for (i, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut coords = line.split_whitespace().map(str::parse::<f32>);
            let (Some(Ok(x)), Some(Ok(y)), None) = (coords.next(), coords.next(), coords.next())
            else {
                return Err(format!(
                    "invalid landmark on line {}: expected 'x y', got '{}'",
                    i + 1,
                    line
                )
                .into());
            };
            positions.push([x, y]);
        }

        Ok(Self::from_positions(positions))
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Returns whether this collection has exactly [`NUM_LANDMARKS`] entries.
    pub fn is_face(&self) -> bool {
        self.len() == NUM_LANDMARKS
    }

    /// Returns whether every index of the 68-point convention is present.
    ///
    /// Unlike [`Landmarks::is_face`], this allows trailing extra landmarks.
    pub fn covers_face(&self) -> bool {
        self.len() >= NUM_LANDMARKS
    }

    pub fn iter(&self) -> impl Iterator<Item = Landmark> + Clone + '_ {
        self.positions.iter().map(|&pos| Landmark::new(pos))
    }

    /// Returns the landmark at `index`.
    ///
    /// # Panics
    ///
    /// This method panics if `index` is out of bounds.
    pub fn get(&self, index: usize) -> Landmark {
        Landmark::new(self.positions[index])
    }

    pub fn set(&mut self, index: usize, landmark: Landmark) {
        self.positions[index] = landmark.pos;
    }

    /// Returns the positions of all landmarks in `range`, in order.
    ///
    /// # Panics
    ///
    /// This method panics if `range` is out of bounds.
    pub fn contour(&self, range: RangeInclusive<usize>) -> impl Iterator<Item = Position> + '_ {
        self.positions[range].iter().copied()
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

}

impl fmt::Debug for Landmarks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Landmarks", self.len())
    }
}

/// A landmark in 2D space.
#[derive(Debug, PartialEq, PartialOrd, Clone, Copy)]
pub struct Landmark {
    pos: Position,
}

impl Landmark {
    pub fn new(position: Position) -> Self {
        Self { pos: position }
    }

    #[inline]
    pub fn position(&self) -> Position {
        self.pos
    }

    #[inline]
    pub fn x(&self) -> f32 {
        self.pos[0]
    }

    #[inline]
    pub fn y(&self) -> f32 {
        self.pos[1]
    }

    /// Returns the point halfway between `self` and `other`.
    pub fn midpoint(&self, other: Landmark) -> Landmark {
        self.lerp(other, 0.5)
    }

    /// Linearly interpolates between `self` (`t = 0.0`) and `other` (`t = 1.0`).
    pub fn lerp(&self, other: Landmark, t: f32) -> Landmark {
        Landmark::new([
            self.x() + (other.x() - self.x()) * t,
            self.y() + (other.y() - self.y()) * t,
        ])
    }

    /// Returns `self` moved by `(dx, dy)`.
    #[must_use]
    pub fn offset(&self, dx: f32, dy: f32) -> Landmark {
        Landmark::new([self.x() + dx, self.y() + dy])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse() {
        let lms = Landmarks::parse("# header\n1 2\n\n  3.5\t-4 \n").unwrap();
        assert_eq!(lms.positions(), &[[1.0, 2.0], [3.5, -4.0]]);
        assert!(!lms.is_face());

        assert!(Landmarks::parse("1").is_err());
        assert!(Landmarks::parse("1 2 3").is_err());
        assert!(Landmarks::parse("1 x").is_err());
        assert!(Landmarks::parse("").unwrap().is_empty());
    }

    #[test]
    fn face_length() {
        assert!(Landmarks::new(NUM_LANDMARKS).is_face());
        assert!(!Landmarks::new(NUM_LANDMARKS - 1).is_face());
        assert!(!Landmarks::new(NUM_LANDMARKS + 1).is_face());
        assert!(Landmarks::new(NUM_LANDMARKS + 1).covers_face());
        assert!(Landmarks::new(NUM_LANDMARKS).covers_face());
        assert!(!Landmarks::new(NUM_LANDMARKS - 1).covers_face());
        assert_eq!(*INNER_LIPS.end(), NUM_LANDMARKS - 1);
    }

    #[test]
    fn regions_partition_face() {
        let indices = REGIONS.into_iter().flatten().collect::<Vec<_>>();
        assert_eq!(indices, (0..NUM_LANDMARKS).collect::<Vec<_>>());
    }

    #[test]
    fn contour() {
        let lms = Landmarks::from_positions((0..NUM_LANDMARKS).map(|i| [i as f32, 0.0]));
        let eye = lms.contour(LEFT_EYE).map(|[x, _]| x).collect::<Vec<_>>();
        assert_eq!(eye, [36.0, 37.0, 38.0, 39.0, 40.0, 41.0]);
        assert_eq!(lms.contour(OUTER_LIPS).count(), 12);
        assert_eq!(lms.contour(INNER_LIPS).count(), 8);
    }

    #[test]
    fn geometry() {
        let a = Landmark::new([0.0, 0.0]);
        let b = Landmark::new([10.0, 20.0]);
        assert_eq!(a.midpoint(b), Landmark::new([5.0, 10.0]));
        assert_eq!(a.lerp(b, 0.25), Landmark::new([2.5, 5.0]));
        assert_eq!(b.offset(-20.0, 30.0), Landmark::new([-10.0, 50.0]));
    }
}
