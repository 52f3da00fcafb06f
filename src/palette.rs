//! Static makeup color palettes, one per [`SkinTone`].

use std::fmt;

use crate::{image::Color, tone::SkinTone};

/// The kinds of makeup effects that can be painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Effect {
    Lipstick,
    Eyeshadow,
    Blush,
}

impl Effect {
    /// All effects, in the order they are painted onto the overlay.
    pub const ALL: [Effect; 3] = [Effect::Lipstick, Effect::Eyeshadow, Effect::Blush];

    pub fn name(&self) -> &'static str {
        match self {
            Effect::Lipstick => "lipstick",
            Effect::Eyeshadow => "eyeshadow",
            Effect::Blush => "blush",
        }
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Candidate colors for each [`Effect`].
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    lipstick: &'static [Color],
    eyeshadow: &'static [Color],
    blush: &'static [Color],
}

impl Palette {
    /// A palette without any colors, reported when no face is visible.
    pub const EMPTY: Self = Self {
        lipstick: &[],
        eyeshadow: &[],
        blush: &[],
    };

    /// Returns the palette belonging to `tone`.
    pub fn for_tone(tone: SkinTone) -> Self {
        match tone {
            SkinTone::LightCool => LIGHT_COOL,
            SkinTone::LightWarm => LIGHT_WARM,
            SkinTone::MediumCool => MEDIUM_COOL,
            SkinTone::MediumWarm => MEDIUM_WARM,
            SkinTone::DarkCool => DARK_COOL,
            SkinTone::DarkWarm => DARK_WARM,
        }
    }

    /// Returns the ordered candidate colors for `effect`.
    pub fn colors(&self, effect: Effect) -> &'static [Color] {
        match effect {
            Effect::Lipstick => self.lipstick,
            Effect::Eyeshadow => self.eyeshadow,
            Effect::Blush => self.blush,
        }
    }

    /// Returns the first (default) color for `effect`, if there is one.
    pub fn default_color(&self, effect: Effect) -> Option<Color> {
        self.colors(effect).first().copied()
    }

    pub fn is_empty(&self) -> bool {
        Effect::ALL.iter().all(|&e| self.colors(e).is_empty())
    }
}

impl fmt::Debug for Palette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(Effect::ALL.iter().map(|&e| (e.name(), self.colors(e))))
            .finish()
    }
}

const fn rgb(hex: u32) -> Color {
    Color::from_rgb8((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
}

const LIGHT_COOL: Palette = Palette {
    lipstick: &[rgb(0xe57373), rgb(0xf06292), rgb(0xba68c8), rgb(0x7986cb)],
    eyeshadow: &[rgb(0xb3c6f7), rgb(0xe1bee7), rgb(0xc5cae9), rgb(0xb2dfdb)],
    blush: &[rgb(0xf8bbd0), rgb(0xf48fb1), rgb(0xce93d8)],
};

const LIGHT_WARM: Palette = Palette {
    lipstick: &[rgb(0xff8a65), rgb(0xffd54f), rgb(0xffb74d), rgb(0xd4e157)],
    eyeshadow: &[rgb(0xffe082), rgb(0xfff9c4), rgb(0xffe0b2), rgb(0xfff59d)],
    blush: &[rgb(0xffe0b2), rgb(0xffd180), rgb(0xffccbc)],
};

const MEDIUM_COOL: Palette = Palette {
    lipstick: &[rgb(0xad1457), rgb(0x6a1b9a), rgb(0x283593), rgb(0x00838f)],
    eyeshadow: &[rgb(0xb39ddb), rgb(0x90caf9), rgb(0x80cbc4), rgb(0xb0bec5)],
    blush: &[rgb(0xf06292), rgb(0xba68c8), rgb(0xb2ebf2)],
};

const MEDIUM_WARM: Palette = Palette {
    lipstick: &[rgb(0xd84315), rgb(0xffb300), rgb(0xfbc02d), rgb(0xafb42b)],
    eyeshadow: &[rgb(0xffe082), rgb(0xffcc80), rgb(0xdcedc8), rgb(0xfff176)],
    blush: &[rgb(0xffab91), rgb(0xffd54f), rgb(0xdce775)],
};

const DARK_COOL: Palette = Palette {
    lipstick: &[rgb(0x4a148c), rgb(0x1a237e), rgb(0x006064), rgb(0x263238)],
    eyeshadow: &[rgb(0x9575cd), rgb(0x7986cb), rgb(0x4dd0e1), rgb(0x90a4ae)],
    blush: &[rgb(0xce93d8), rgb(0x80cbc4), rgb(0xb0bec5)],
};

const DARK_WARM: Palette = Palette {
    lipstick: &[rgb(0xbf360c), rgb(0xff6f00), rgb(0xfbc02d), rgb(0x827717)],
    eyeshadow: &[rgb(0xffb300), rgb(0xff8a65), rgb(0xd4e157), rgb(0xffd54f)],
    blush: &[rgb(0xff8a65), rgb(0xffd180), rgb(0xdce775)],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_tone_has_colors_for_every_effect() {
        for tone in SkinTone::ALL {
            let palette = Palette::for_tone(tone);
            for effect in Effect::ALL {
                let colors = palette.colors(effect);
                assert!(
                    (3..=4).contains(&colors.len()),
                    "{tone} has {} {effect} colors",
                    colors.len()
                );
                assert!(colors.iter().all(|c| c.a() == 255));
            }
            assert!(!palette.is_empty());
        }
    }

    #[test]
    fn table_values() {
        let palette = Palette::for_tone(SkinTone::LightCool);
        assert_eq!(
            palette.default_color(Effect::Lipstick),
            Some(Color::from_rgb8(0xe5, 0x73, 0x73))
        );
        let palette = Palette::for_tone(SkinTone::DarkWarm);
        assert_eq!(
            palette.colors(Effect::Blush).last(),
            Some(&Color::from_hex("#dce775").unwrap())
        );
    }

    #[test]
    fn empty() {
        assert!(Palette::EMPTY.is_empty());
        assert_eq!(Palette::EMPTY.default_color(Effect::Blush), None);
    }
}
