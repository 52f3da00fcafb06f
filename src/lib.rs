//! Skin tone estimation and makeup overlays for live video frames.
//!
//! # Overview
//!
//! Every frame, the host hands a [`Pipeline`][pipeline::Pipeline] the current camera frame and the
//! 68 facial landmarks produced by an external landmark detector. The pipeline then
//!
//! 1. clears the transparent overlay [`Image`][image::Image],
//! 2. samples a few skin pixels and classifies the face into one of six
//!    [`SkinTone`][tone::SkinTone]s (unless the tone is locked), reporting the matching
//!    [`Palette`][palette::Palette],
//! 3. paints lipstick, eyeshadow and blush onto the overlay using the landmark geometry.
//!
//! The overlay is meant to be composited over the frame by the host, or flattened into a photo
//! with [`capture::compose`].
//!
//! # Coordinates
//!
//! Landmark and drawing coordinates are in pixels of the frame, with X pointing right and Y
//! pointing down. A pixel at `(x, y)` covers the area from `(x, y)` to `(x + 1, y + 1)`, and is
//! considered inside a shape when its center `(x + 0.5, y + 0.5)` is.
//!
//! # Environment Variables
//!
//! * `RUST_LOG`: overrides the log filters installed by [`init_logger!`].

pub mod capture;
pub mod image;
pub mod landmark;
pub mod overlay;
pub mod palette;
pub mod pipeline;
pub mod timer;
pub mod tone;

use log::LevelFilter;

pub type Error = Box<dyn std::error::Error + Sync + Send>;
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// macro-use only, not part of public API.
#[doc(hidden)]
pub fn init_logger(calling_crate: &'static str) {
    let log_level = LevelFilter::Debug;
    env_logger::Builder::new()
        .filter(Some(calling_crate), log_level)
        .filter(Some(env!("CARGO_CRATE_NAME")), log_level)
        .parse_default_env()
        .try_init()
        .ok();
}

/// Initializes logging to *stderr*.
///
/// The calling crate and `facepaint` will log at *debug* level, unless overridden by `RUST_LOG`.
///
/// If a global logger is already registered, this macro will do nothing.
#[macro_export]
macro_rules! init_logger {
    () => {
        $crate::init_logger(env!("CARGO_CRATE_NAME"))
    };
}
