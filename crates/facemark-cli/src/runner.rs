//! Subcommand dispatch.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use facemark_media::{
    detect_and_mark, fs_utils, live, process, transforms, write_comparison, FixedLabels, Labeler,
    MarkOptions, MediaError, MediaResult, ProcessRequest, SeetaFaceDetector,
};
use facemark_models::{Color, Operation, PixelRect, StoredLabelsRecord, TransformKind};
use tracing::{debug, info};

use crate::args::{
    Cli, Command, CompareArgs, DetectArgs, ExportArgs, LiveArgs, RunArgs, TransformCliArgs,
};
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::logging::OperationLogger;

/// Asks for each face's name on a line-oriented stream.
pub struct PromptLabeler<R, W> {
    input: R,
    output: W,
}

impl PromptLabeler<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> PromptLabeler<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Labeler for PromptLabeler<R, W> {
    fn label(&mut self, index: usize, rect: &PixelRect) -> MediaResult<String> {
        write!(
            self.output,
            "Enter a name for face {} at position ({}, {}): ",
            index + 1,
            rect.x,
            rect.y
        )?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(MediaError::labeling_failed("input closed before all faces were named"));
        }
        Ok(line.trim().to_string())
    }
}

/// Run the parsed command. Returns the paths written.
pub fn run(cli: Cli, config: &CliConfig) -> CliResult<Vec<PathBuf>> {
    match cli.command {
        Command::Run(args) => run_operation(args, config),
        Command::Transform(args) => run_transform(args, config),
        Command::Detect(args) => run_detect(args, config),
        Command::Live(args) => run_live(args, config),
        Command::Compare(args) => run_compare(args),
        Command::Export(args) => run_export(args),
    }
}

fn run_operation(args: RunArgs, config: &CliConfig) -> CliResult<Vec<PathBuf>> {
    let operation: Operation = args.operation.parse()?;
    let logger = OperationLogger::new(operation.as_str(), &args.image);
    let _span = logger.create_span().entered();
    logger.log_start(&format!("record {}", args.record.display()));

    let mut request = ProcessRequest::new(operation, &args.image, &args.record, &args.output)
        .with_default_extension(&config.default_extension);
    if let Some(path) = &args.record_output {
        request = request.with_record_output(path);
    }

    let result = match args.names {
        Some(names) => process(&request, &mut FixedLabels::new(names)),
        None => process(&request, &mut PromptLabeler::stdio()),
    };
    let outcome = match result {
        Ok(outcome) => outcome,
        Err(e) => {
            logger.log_error(&e.to_string());
            return Err(e.into());
        }
    };

    logger.log_summary(&outcome.summary);

    let mut written = vec![outcome.image];
    written.extend(outcome.record);
    logger.log_written(&written);
    Ok(written)
}

fn parse_color(raw: Option<&str>) -> CliResult<Option<Color>> {
    Ok(raw.map(str::parse::<Color>).transpose()?)
}

fn parse_region(raw: Option<&[i32]>) -> CliResult<Option<((i32, i32), (i32, i32))>> {
    match raw {
        None => Ok(None),
        Some([x1, y1, x2, y2]) => Ok(Some(((*x1, *y1), (*x2, *y2)))),
        Some(other) => Err(CliError::invalid_argument(format!(
            "region needs 4 values x1,y1,x2,y2, got {}",
            other.len()
        ))),
    }
}

fn run_transform(args: TransformCliArgs, config: &CliConfig) -> CliResult<Vec<PathBuf>> {
    let kind: TransformKind = args.kind.parse()?;
    let logger = OperationLogger::new(kind.as_str(), &args.input);
    let _span = logger.create_span().entered();

    let transform_args = transforms::TransformArgs {
        region: parse_region(args.region.as_deref())?,
        color: parse_color(args.color.as_deref())?,
        text: args.text,
    };
    if kind.requires_region() && transform_args.region.is_none() {
        return Err(CliError::invalid_argument(format!(
            "{} needs --region x1,y1,x2,y2",
            kind
        )));
    }

    let img = fs_utils::load_image(&args.input)?;
    let out = transforms::apply_transform(&img, kind, &transform_args)?;
    let written = vec![fs_utils::save_image(&out, &args.output, &config.default_extension)?];
    logger.log_written(&written);
    Ok(written)
}

fn load_detector(model: Option<PathBuf>, config: &CliConfig) -> CliResult<SeetaFaceDetector> {
    let model_path = model.unwrap_or_else(|| config.model_path.clone());
    debug!(model = %model_path.display(), "Loading detector");
    Ok(SeetaFaceDetector::from_path(&model_path, config.seeta_config())?)
}

fn run_detect(args: DetectArgs, config: &CliConfig) -> CliResult<Vec<PathBuf>> {
    let logger = OperationLogger::new("detect", &args.input);
    let _span = logger.create_span().entered();

    let options = MarkOptions {
        color: parse_color(args.color.as_deref())?.unwrap_or(Color::BLUE),
        blur: args.blur,
        caption: args.caption,
    };

    let mut img = fs_utils::load_image(&args.input)?;
    let mut detector = load_detector(args.model, config)?;
    let faces = detect_and_mark(&mut img, &mut detector, &options)?;
    logger.log_detected(faces.len());

    let written = vec![fs_utils::save_image(&img, &args.output, &config.default_extension)?];
    logger.log_written(&written);
    Ok(written)
}

fn run_live(args: LiveArgs, config: &CliConfig) -> CliResult<Vec<PathBuf>> {
    let mode: live::LiveMode = args.mode.parse()?;
    let logger = OperationLogger::new("live", &args.frames);
    let _span = logger.create_span().entered();

    let mut source = live::DirectoryFrameSource::open(&args.frames)?;
    let mut detector = load_detector(args.model, config)?;
    let mut sink = live::DirectoryFrameSink::new(&args.output);
    if let Some(max) = args.max_frames {
        sink = sink.with_max_frames(max);
    }

    let stats = live::run_live(&mut source, &mut detector, &mut sink, mode)?;
    info!(frames = stats.frames, "Frames processed");
    logger.log_detected(stats.faces);

    let written = vec![args.output];
    logger.log_written(&written);
    Ok(written)
}

fn run_compare(args: CompareArgs) -> CliResult<Vec<PathBuf>> {
    let logger = OperationLogger::new("compare", &args.input);
    let _span = logger.create_span().entered();

    let out = write_comparison(&args.input, &args.html)?;
    let written = vec![out.mirror, out.vertical, out.horizontal, out.html];
    logger.log_written(&written);
    Ok(written)
}

fn run_export(args: ExportArgs) -> CliResult<Vec<PathBuf>> {
    let logger = OperationLogger::new("export", &args.record);
    let record = fs_utils::read_record(&args.record)?;
    let stored = StoredLabelsRecord::from_detection_record(&record);
    if stored.faces.len() < record.len() {
        logger.log_warning(&format!(
            "{} face(s) without a usable bounding box left out",
            record.len() - stored.faces.len()
        ));
    }

    fs_utils::write_stored_labels(&stored, &args.output)?;
    let written = vec![args.output];
    logger.log_written(&written);
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Cursor;

    #[test]
    fn test_prompt_labeler_prompt_and_trim() {
        let mut out = Vec::new();
        let mut labeler = PromptLabeler::new(Cursor::new("  Ana  \n"), &mut out);
        let name = labeler.label(0, &PixelRect::new(12, 34, 5, 5)).unwrap();
        assert_eq!(name, "Ana");
        drop(labeler);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Enter a name for face 1 at position (12, 34): "
        );
    }

    #[test]
    fn test_prompt_labeler_eof() {
        let mut labeler = PromptLabeler::new(Cursor::new(""), Vec::new());
        let err = labeler.label(0, &PixelRect::new(0, 0, 1, 1)).unwrap_err();
        assert!(matches!(err, MediaError::LabelingFailed(_)));
    }

    #[test]
    fn test_parse_region() {
        assert_eq!(parse_region(None).unwrap(), None);
        assert_eq!(
            parse_region(Some(&[1, 2, 3, 4])).unwrap(),
            Some(((1, 2), (3, 4)))
        );
        assert!(parse_region(Some(&[1, 2, 3])).is_err());
    }

    #[test]
    fn test_unknown_operation_is_invalid_option() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.png");
        let cli = Cli::try_parse_from([
            "facemark",
            "run",
            "9",
            "-i",
            "missing.png",
            "-r",
            "missing.json",
            "-o",
            out.to_str().unwrap(),
        ])
        .unwrap();

        let err = run(cli, &CliConfig::default()).unwrap_err();
        assert!(matches!(err, CliError::InvalidOption(_)));
        assert!(!out.exists());
    }

    #[test]
    fn test_region_transform_without_region_is_usage_error() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("boxed.png");
        let cli = Cli::try_parse_from([
            "facemark",
            "transform",
            "blur_box",
            "-i",
            "missing.png",
            "-o",
            out.to_str().unwrap(),
        ])
        .unwrap();

        let err = run(cli, &CliConfig::default()).unwrap_err();
        assert!(matches!(err, CliError::InvalidArgument(_)));
        assert_eq!(err.exit_code(), 2);
        assert!(!out.exists());
    }

    #[test]
    fn test_run_square_face() {
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("in.png");
        let record = dir.path().join("in.json");
        image::RgbImage::new(100, 100).save(&image).unwrap();
        std::fs::write(
            &record,
            r#"{"FaceDetails":[{"BoundingBox":{"Left":0.2,"Top":0.3,"Width":0.4,"Height":0.4},"Gender":{"Value":"Female"}}]}"#,
        )
        .unwrap();

        let cli = Cli::try_parse_from([
            "facemark",
            "run",
            "square_face",
            "-i",
            image.to_str().unwrap(),
            "-r",
            record.to_str().unwrap(),
            "-o",
            dir.path().join("out").to_str().unwrap(),
        ])
        .unwrap();

        let written = run(cli, &CliConfig::default()).unwrap();
        assert_eq!(written, vec![dir.path().join("out.jpg")]);
        assert!(written[0].is_file());
    }

    #[test]
    fn test_export_writes_xml() {
        let dir = tempfile::tempdir().unwrap();
        let record = dir.path().join("labeled.json");
        let xml = dir.path().join("labeled.xml");
        std::fs::write(
            &record,
            r#"{"FaceDetails":[{"BoundingBox":{"Left":0.1,"Top":0.1,"Width":0.2,"Height":0.2},"Name":"Ana"},{}]}"#,
        )
        .unwrap();

        let cli = Cli::try_parse_from([
            "facemark",
            "export",
            "-r",
            record.to_str().unwrap(),
            "-o",
            xml.to_str().unwrap(),
        ])
        .unwrap();
        run(cli, &CliConfig::default()).unwrap();

        let stored = fs_utils::read_stored_labels(&xml).unwrap();
        assert_eq!(stored.faces.len(), 1);
        assert_eq!(stored.faces[0].display_name(), "Ana");
    }
}
