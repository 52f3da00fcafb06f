//! The per-frame makeup pipeline.
//!
//! A [`Pipeline`] is driven by the host: once per video frame, [`Pipeline::tick`] is called with
//! the frame, the detected landmarks (if any) and the overlay to paint into. The pipeline owns no
//! threads and does no I/O.

use crate::{
    image::{Color, Image},
    landmark::{Landmarks, NUM_LANDMARKS},
    overlay::{self, PAINT_ORDER},
    palette::{Effect, Palette},
    timer::Timer,
    tone::{self, SkinTone},
};

/// User settings for a single makeup effect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectConfig {
    /// Whether the effect should be painted at all.
    pub enabled: bool,
    /// The color to paint with. Nothing is painted until a color is selected.
    pub color: Option<Color>,
    /// Opacity of the effect, in range `0.0..=1.0`.
    pub intensity: f32,
}

impl EffectConfig {
    /// Creates an enabled effect without a selected color.
    pub fn new(intensity_percent: u32) -> Self {
        let mut this = Self {
            enabled: true,
            color: None,
            intensity: 0.0,
        };
        this.set_intensity_percent(intensity_percent);
        this
    }

    /// Sets the intensity from a percentage. Values above 100 are clamped.
    pub fn set_intensity_percent(&mut self, percent: u32) {
        self.intensity = percent.min(100) as f32 / 100.0;
    }

    pub fn intensity_percent(&self) -> u32 {
        (self.intensity.clamp(0.0, 1.0) * 100.0).round() as u32
    }

    /// Returns the color to paint with, if this effect should be painted.
    pub fn active_color(&self) -> Option<Color> {
        self.color.filter(|_| self.enabled)
    }
}

/// Settings for all makeup effects.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MakeupConfig {
    lipstick: EffectConfig,
    eyeshadow: EffectConfig,
    blush: EffectConfig,
}

impl Default for MakeupConfig {
    /// All effects are enabled without a color; lipstick at 70%, eyeshadow at 40% and blush at 30%
    /// intensity.
    fn default() -> Self {
        Self {
            lipstick: EffectConfig::new(70),
            eyeshadow: EffectConfig::new(40),
            blush: EffectConfig::new(30),
        }
    }
}

impl MakeupConfig {
    pub fn get(&self, effect: Effect) -> &EffectConfig {
        match effect {
            Effect::Lipstick => &self.lipstick,
            Effect::Eyeshadow => &self.eyeshadow,
            Effect::Blush => &self.blush,
        }
    }

    pub fn get_mut(&mut self, effect: Effect) -> &mut EffectConfig {
        match effect {
            Effect::Lipstick => &mut self.lipstick,
            Effect::Eyeshadow => &mut self.eyeshadow,
            Effect::Blush => &mut self.blush,
        }
    }

    pub fn set_enabled(&mut self, effect: Effect, enabled: bool) {
        self.get_mut(effect).enabled = enabled;
    }

    /// Flips whether `effect` is enabled and returns the new state.
    pub fn toggle(&mut self, effect: Effect) -> bool {
        let config = self.get_mut(effect);
        config.enabled = !config.enabled;
        config.enabled
    }

    pub fn set_color(&mut self, effect: Effect, color: Option<Color>) {
        self.get_mut(effect).color = color;
    }

    pub fn set_intensity_percent(&mut self, effect: Effect, percent: u32) {
        self.get_mut(effect).set_intensity_percent(percent);
    }

    /// Selects the first palette color for every effect that has no color selected yet.
    ///
    /// Effects with a selected color keep it, even if it isn't part of `palette`.
    pub fn adopt_defaults(&mut self, palette: &Palette) {
        for effect in Effect::ALL {
            let config = self.get_mut(effect);
            if config.color.is_none() {
                config.color = palette.default_color(effect);
                if let Some(color) = config.color {
                    log::debug!("selected default {} color {}", effect, color);
                }
            }
        }
    }
}

/// The skin tone reported by a [`Pipeline::tick`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneReport {
    /// The detected tone, or [`None`] if no face is visible.
    pub tone: Option<SkinTone>,
    /// Palette of `tone`. Empty if `tone` is [`None`].
    pub palette: Palette,
}

impl ToneReport {
    /// Report used when no face is visible.
    pub const NONE: Self = Self {
        tone: None,
        palette: Palette::EMPTY,
    };

    pub fn new(tone: SkinTone) -> Self {
        Self {
            tone: Some(tone),
            palette: tone.palette(),
        }
    }
}

/// Classifies the skin tone and paints makeup, one frame at a time.
pub struct Pipeline {
    config: MakeupConfig,
    running: bool,
    tone_locked: bool,
    report: ToneReport,
    t_classify: Timer,
    t_paint: Timer,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(MakeupConfig::default())
    }
}

impl Pipeline {
    /// Creates a stopped pipeline.
    pub fn new(config: MakeupConfig) -> Self {
        Self {
            config,
            running: false,
            tone_locked: false,
            report: ToneReport::NONE,
            t_classify: Timer::new("classify"),
            t_paint: Timer::new("paint"),
        }
    }

    pub fn config(&self) -> &MakeupConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut MakeupConfig {
        &mut self.config
    }

    /// Starts processing frames passed to [`Pipeline::tick`].
    pub fn start(&mut self) {
        if !self.running {
            log::debug!("starting makeup pipeline");
            self.running = true;
        }
    }

    /// Stops processing frames. Subsequent ticks do nothing until [`Pipeline::start`] is called.
    pub fn stop(&mut self) {
        if self.running {
            log::debug!("stopping makeup pipeline");
            self.running = false;
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Locks or unlocks the skin tone.
    ///
    /// While locked, every tick reports the last tone reported before locking, and no
    /// classification takes place. Makeup is still painted.
    pub fn set_tone_locked(&mut self, locked: bool) {
        if self.tone_locked != locked {
            log::debug!("tone lock {}", if locked { "enabled" } else { "disabled" });
            self.tone_locked = locked;
        }
    }

    pub fn is_tone_locked(&self) -> bool {
        self.tone_locked
    }

    /// Returns the most recently reported tone.
    pub fn report(&self) -> ToneReport {
        self.report
    }

    /// Returns the pipeline's performance timers.
    pub fn timers(&self) -> impl IntoIterator<Item = &Timer> + '_ {
        [&self.t_classify, &self.t_paint]
    }

    /// Processes one video frame.
    ///
    /// `overlay` is cleared to transparent, and, if `landmarks` describe a face, every enabled
    /// effect with a selected color is painted onto it in [`PAINT_ORDER`]. The overlay should have
    /// the same size as `frame`, since landmarks are in frame coordinates.
    ///
    /// Returns the tone report for this frame, or [`None`] if the pipeline is stopped (in which
    /// case `overlay` is left untouched).
    pub fn tick(
        &mut self,
        frame: &Image,
        landmarks: Option<&Landmarks>,
        overlay: &mut Image,
    ) -> Option<ToneReport> {
        if !self.running {
            log::trace!("pipeline stopped, ignoring frame");
            return None;
        }

        overlay.clear(Color::NULL);

        let face = match landmarks {
            Some(lms) if lms.is_face() => Some(lms),
            Some(lms) => {
                log::trace!("ignoring {:?}, expected {}", lms, NUM_LANDMARKS);
                None
            }
            None => None,
        };

        if !self.tone_locked {
            self.report = match self.t_classify.time(|| tone::classify(frame, face)) {
                Some(analysis) => ToneReport::new(analysis.tone),
                None => ToneReport::NONE,
            };
            if self.report.tone.is_some() {
                self.config.adopt_defaults(&self.report.palette);
            }
        }

        if let Some(lms) = face {
            let config = &self.config;
            self.t_paint.time(|| {
                for effect in PAINT_ORDER {
                    let effect_config = config.get(effect);
                    if let Some(color) = effect_config.active_color() {
                        overlay::draw(effect, overlay, lms, color, effect_config.intensity);
                    }
                }
            });
        }

        Some(self.report)
    }
}
