//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Annotate, blur and label faces in images.
#[derive(Debug, Parser)]
#[command(name = "facemark", author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Apply a record-driven operation (blur, blur_under_18, square_face,
    /// apply_labels, apply_stored_labels, or their menu digits 1-5).
    Run(RunArgs),
    /// Apply a whole-image transform.
    Transform(TransformCliArgs),
    /// Detect faces locally and mark them.
    Detect(DetectArgs),
    /// Run detection over a directory of frames.
    Live(LiveArgs),
    /// Write an HTML page comparing an image with its mirrored variants.
    Compare(CompareArgs),
    /// Convert a labeled JSON record into stored-labels XML.
    Export(ExportArgs),
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Operation name or menu digit.
    pub operation: String,

    /// Input image.
    #[arg(short, long)]
    pub image: PathBuf,

    /// Detection record (JSON), or stored labels (XML) for apply_stored_labels.
    #[arg(short, long)]
    pub record: PathBuf,

    /// Output image. `.jpg` is appended unless it ends in jpg, jpeg, png or bmp.
    #[arg(short, long)]
    pub output: PathBuf,

    /// Where apply_labels writes the named record (`.xml` for stored labels).
    #[arg(long)]
    pub record_output: Option<PathBuf>,

    /// Names for apply_labels, in face order. Prompts on stdin when absent.
    #[arg(long, value_delimiter = ',')]
    pub names: Option<Vec<String>>,
}

#[derive(Debug, Args)]
pub struct TransformCliArgs {
    /// Transform name (rotate_180, negative, grayscale, mirror, ...).
    pub kind: String,

    #[arg(short, long)]
    pub input: PathBuf,

    #[arg(short, long)]
    pub output: PathBuf,

    /// Region corners as x1,y1,x2,y2.
    #[arg(long, value_delimiter = ',')]
    pub region: Option<Vec<i32>>,

    /// Color name or #rrggbb.
    #[arg(long)]
    pub color: Option<String>,

    /// Caption for box_with_text.
    #[arg(long)]
    pub text: Option<String>,
}

#[derive(Debug, Args)]
pub struct DetectArgs {
    #[arg(short, long)]
    pub input: PathBuf,

    #[arg(short, long)]
    pub output: PathBuf,

    /// SeetaFace model file; overrides FACEMARK_MODEL_PATH.
    #[arg(short, long)]
    pub model: Option<PathBuf>,

    /// Median-blur each detected face.
    #[arg(long)]
    pub blur: bool,

    /// Caption drawn above each face.
    #[arg(long)]
    pub caption: Option<String>,

    /// Outline color name or #rrggbb.
    #[arg(long)]
    pub color: Option<String>,
}

#[derive(Debug, Args)]
pub struct LiveArgs {
    /// Directory of input frames, read in name order.
    #[arg(short, long)]
    pub frames: PathBuf,

    /// Directory annotated frames are written to.
    #[arg(short, long)]
    pub output: PathBuf,

    /// mark or blur.
    #[arg(long, default_value = "mark")]
    pub mode: String,

    /// Stop after this many frames.
    #[arg(long)]
    pub max_frames: Option<usize>,

    #[arg(short, long)]
    pub model: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct CompareArgs {
    #[arg(short, long)]
    pub input: PathBuf,

    /// HTML page; variant images are written next to it.
    #[arg(long)]
    pub html: PathBuf,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Labeled JSON record.
    #[arg(short, long)]
    pub record: PathBuf,

    /// Stored-labels XML to write.
    #[arg(short, long)]
    pub output: PathBuf,
}
