//! Applies makeup to a single photo.
//!
//! Usage:
//!   facepaint <frame> --landmarks face.txt                     # Writes photo.png
//!   facepaint <frame> --landmarks face.txt --lipstick '#d84315' -o out.jpg
//!   facepaint <frame> --landmarks face.txt --markers           # Also draws landmarks

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use facepaint::{
    capture,
    image::{draw_marker, Color, Image},
    landmark::{Landmarks, REGIONS},
    palette::Effect,
    pipeline::{MakeupConfig, Pipeline},
    tone,
};

#[derive(Parser, Debug)]
#[command(name = "facepaint")]
#[command(version, about = "Skin tone estimation and virtual makeup", long_about = None)]
struct Args {
    /// Input frame (png or jpeg)
    frame: PathBuf,

    /// File with 68 facial landmarks, one `x y` pair per line
    #[arg(short, long)]
    landmarks: Option<PathBuf>,

    /// Output photo (png or jpeg)
    #[arg(short, long, default_value = "photo.png")]
    output: PathBuf,

    /// Also write the transparent makeup overlay to this png
    #[arg(long)]
    overlay: Option<PathBuf>,

    /// Lipstick color (#rrggbb); defaults to the first color of the detected palette
    #[arg(long)]
    lipstick: Option<Color>,

    /// Eyeshadow color (#rrggbb); defaults to the first color of the detected palette
    #[arg(long)]
    eyeshadow: Option<Color>,

    /// Blush color (#rrggbb); defaults to the first color of the detected palette
    #[arg(long)]
    blush: Option<Color>,

    /// Lipstick intensity in percent
    #[arg(long, default_value_t = 70, value_parser = clap::value_parser!(u32).range(0..=100))]
    lipstick_intensity: u32,

    /// Eyeshadow intensity in percent
    #[arg(long, default_value_t = 40, value_parser = clap::value_parser!(u32).range(0..=100))]
    eyeshadow_intensity: u32,

    /// Blush intensity in percent
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u32).range(0..=100))]
    blush_intensity: u32,

    /// Effects to leave out
    #[arg(long, value_delimiter = ',', value_parser = parse_effect)]
    disable: Vec<Effect>,

    /// Draw the landmarks and skin sample locations onto the photo
    #[arg(long)]
    markers: bool,
}

fn parse_effect(s: &str) -> Result<Effect, String> {
    Effect::ALL
        .into_iter()
        .find(|e| e.name().eq_ignore_ascii_case(s))
        .ok_or_else(|| format!("unknown effect '{s}' (expected lipstick, eyeshadow or blush)"))
}

fn main() -> anyhow::Result<()> {
    facepaint::init_logger!();

    let args = Args::parse();

    let frame = Image::load(&args.frame)
        .map_err(anyhow::Error::msg)
        .with_context(|| format!("failed to load {}", args.frame.display()))?;
    let landmarks = match &args.landmarks {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let lms = Landmarks::parse(&text)
                .map_err(anyhow::Error::msg)
                .with_context(|| format!("failed to parse {}", path.display()))?;
            log::debug!("read {:?} from {}", lms, path.display());
            Some(lms)
        }
        None => None,
    };

    let mut config = MakeupConfig::default();
    for (effect, color, intensity) in [
        (Effect::Lipstick, args.lipstick, args.lipstick_intensity),
        (Effect::Eyeshadow, args.eyeshadow, args.eyeshadow_intensity),
        (Effect::Blush, args.blush, args.blush_intensity),
    ] {
        config.set_color(effect, color);
        config.set_intensity_percent(effect, intensity);
        config.set_enabled(effect, !args.disable.contains(&effect));
    }

    let mut pipeline = Pipeline::new(config);
    let mut overlay = Image::new(frame.width(), frame.height());
    pipeline.start();
    let report = pipeline.tick(&frame, landmarks.as_ref(), &mut overlay);
    pipeline.stop();

    for timer in pipeline.timers() {
        log::debug!("{}", timer);
    }

    let mut photo = capture::compose(&frame, &overlay);
    if args.markers {
        if let Some(lms) = landmarks.as_ref() {
            if lms.covers_face() {
                const REGION_COLORS: [Color; 7] = [
                    Color::WHITE,
                    Color::YELLOW,
                    Color::GREEN,
                    Color::BLUE,
                    Color::BLUE,
                    Color::RED,
                    Color::MAGENTA,
                ];
                for (region, color) in REGIONS.into_iter().zip(REGION_COLORS) {
                    for [x, y] in lms.contour(region) {
                        draw_marker(&mut photo, x, y).size(3).color(color);
                    }
                }
            } else {
                for lm in lms.iter() {
                    draw_marker(&mut photo, lm.x(), lm.y()).size(3);
                }
            }
            if lms.is_face() {
                for [x, y] in tone::sample_points(lms) {
                    draw_marker(&mut photo, x, y).color(Color::CYAN);
                }
            }
        }
    }
    photo
        .save(&args.output)
        .map_err(anyhow::Error::msg)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    log::info!("wrote {}", args.output.display());

    if let Some(path) = &args.overlay {
        overlay
            .save(path)
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }

    match report.and_then(|r| r.tone.map(|tone| (tone, r.palette))) {
        Some((tone, palette)) => {
            println!("skin tone: {tone}");
            for effect in Effect::ALL {
                let colors = palette
                    .colors(effect)
                    .iter()
                    .map(|c| c.to_string())
                    .collect::<Vec<_>>();
                let selected = pipeline.config().get(effect);
                println!(
                    "{effect:>9}: {} (using {}, {}%{})",
                    colors.join(" "),
                    selected.color.map_or("none".to_string(), |c| c.to_string()),
                    selected.intensity_percent(),
                    if selected.enabled { "" } else { ", disabled" },
                );
            }
        }
        None => println!("no face found"),
    }

    Ok(())
}
