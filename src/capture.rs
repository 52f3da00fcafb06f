//! Flattening a frame and its makeup overlay into a photo.

use std::path::Path;

use crate::image::{BlendMode, Image};

/// Composites `overlay` over a copy of `frame`.
///
/// The overlay is stretched to the size of `frame` if the sizes differ.
pub fn compose(frame: &Image, overlay: &Image) -> Image {
    let mut photo = frame.clone();
    photo.blend_from(overlay).mode(BlendMode::Alpha);
    photo
}

/// Composites `overlay` over `frame` and writes the result to `path`.
///
/// The image format is chosen based on the file extension (`png`, `jpg` or `jpeg`).
pub fn save<P: AsRef<Path>>(frame: &Image, overlay: &Image, path: P) -> crate::Result<()> {
    let path = path.as_ref();
    compose(frame, overlay).save(path)?;
    log::info!("saved photo to {}", path.display());
    Ok(())
}
