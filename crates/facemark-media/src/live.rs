//! Frame-by-frame detection loop.
//!
//! Frames come from a [`FrameSource`] and annotated frames go to a
//! [`FrameSink`]. The loop ends when the source runs dry or the sink asks to
//! stop. Directory-backed adapters are provided for offline use.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use facemark_models::{Color, InvalidOption};
use image::RgbImage;
use tracing::{debug, info};

use crate::canvas::apply;
use crate::detection::{detect_in_rgb, FaceDetector};
use crate::error::{MediaError, MediaResult};
use crate::fs_utils::{load_image, save_image, IMAGE_EXTENSIONS};
use crate::instruction::{BlurKind, DrawInstruction};
use crate::policy::OUTLINE_THICKNESS;

/// Produces frames until exhausted.
pub trait FrameSource {
    fn next_frame(&mut self) -> MediaResult<Option<RgbImage>>;
}

/// Whether the loop should keep going after a frame is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Stop,
}

/// Receives annotated frames.
pub trait FrameSink {
    fn present(&mut self, index: usize, frame: &RgbImage) -> MediaResult<LoopControl>;
}

/// What happens to each detected face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LiveMode {
    /// Blue outline
    #[default]
    Mark,
    /// Gaussian redaction
    Blur,
}

impl LiveMode {
    fn instruction(self, rect: facemark_models::PixelRect) -> DrawInstruction {
        match self {
            LiveMode::Mark => DrawInstruction::Rectangle {
                rect,
                color: Color::BLUE,
                thickness: OUTLINE_THICKNESS,
            },
            LiveMode::Blur => DrawInstruction::Blur {
                rect,
                kind: BlurKind::REDACTION,
            },
        }
    }
}

impl fmt::Display for LiveMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiveMode::Mark => write!(f, "mark"),
            LiveMode::Blur => write!(f, "blur"),
        }
    }
}

impl FromStr for LiveMode {
    type Err = InvalidOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mark" => Ok(LiveMode::Mark),
            "blur" => Ok(LiveMode::Blur),
            _ => Err(InvalidOption(s.to_string())),
        }
    }
}

/// Totals for a finished loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LiveStats {
    pub frames: usize,
    pub faces: usize,
}

/// Run detection on every frame until the source ends or the sink stops.
pub fn run_live<S, D, K>(
    source: &mut S,
    detector: &mut D,
    sink: &mut K,
    mode: LiveMode,
) -> MediaResult<LiveStats>
where
    S: FrameSource + ?Sized,
    D: FaceDetector + ?Sized,
    K: FrameSink + ?Sized,
{
    let mut stats = LiveStats::default();
    info!(%mode, detector = detector.name(), "Starting live loop");

    while let Some(mut frame) = source.next_frame()? {
        let faces = detect_in_rgb(detector, &frame)?;
        let instructions: Vec<DrawInstruction> =
            faces.iter().map(|rect| mode.instruction(*rect)).collect();
        apply(&mut frame, &instructions);

        stats.faces += faces.len();
        let control = sink.present(stats.frames, &frame)?;
        stats.frames += 1;

        if control == LoopControl::Stop {
            debug!(frame = stats.frames, "Sink requested stop");
            break;
        }
    }

    info!(frames = stats.frames, faces = stats.faces, "Live loop finished");
    Ok(stats)
}

/// Image files of a directory in name order.
pub struct DirectoryFrameSource {
    paths: std::vec::IntoIter<PathBuf>,
}

impl DirectoryFrameSource {
    pub fn open(dir: impl AsRef<Path>) -> MediaResult<Self> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(MediaError::ImageNotFound(dir.to_path_buf()));
        }

        let mut paths = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            let is_image = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| IMAGE_EXTENSIONS.contains(&e.to_lowercase().as_str()))
                .unwrap_or(false);
            if path.is_file() && is_image {
                paths.push(path);
            }
        }
        paths.sort();

        debug!(dir = %dir.display(), frames = paths.len(), "Opened frame directory");
        Ok(Self {
            paths: paths.into_iter(),
        })
    }
}

impl FrameSource for DirectoryFrameSource {
    fn next_frame(&mut self) -> MediaResult<Option<RgbImage>> {
        self.paths.next().map(load_image).transpose()
    }
}

/// Writes `frame_00000.png`, `frame_00001.png`, ... into a directory.
pub struct DirectoryFrameSink {
    dir: PathBuf,
    max_frames: Option<usize>,
}

impl DirectoryFrameSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            max_frames: None,
        }
    }

    /// Stop after this many frames.
    pub fn with_max_frames(mut self, max_frames: usize) -> Self {
        self.max_frames = Some(max_frames);
        self
    }
}

impl FrameSink for DirectoryFrameSink {
    fn present(&mut self, index: usize, frame: &RgbImage) -> MediaResult<LoopControl> {
        let path = self.dir.join(format!("frame_{:05}.png", index));
        save_image(frame, path, "png")?;

        match self.max_frames {
            Some(max) if index + 1 >= max => Ok(LoopControl::Stop),
            _ => Ok(LoopControl::Continue),
        }
    }
}
