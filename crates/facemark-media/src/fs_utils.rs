//! Filesystem adapters: image and record loading, atomic output writes.
//!
//! Outputs go to a temporary sibling first and are renamed into place, so a
//! failed write never leaves a partial file at the requested path.

use std::fs;
use std::path::{Path, PathBuf};

use facemark_models::{DetectionRecord, StoredLabelsRecord};
use image::{ImageFormat, RgbImage};
use tracing::{debug, info};

use crate::error::{MediaError, MediaResult};

/// Extensions accepted for output images, lowercase.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp"];

/// Extension appended when an output path has none of [`IMAGE_EXTENSIONS`].
pub const DEFAULT_IMAGE_EXTENSION: &str = "jpg";

/// Load an image as 8-bit RGB.
///
/// A missing or unreadable file is [`MediaError::ImageNotFound`]; a file that
/// exists but cannot be decoded is [`MediaError::DecodeFailed`].
pub fn load_image(path: impl AsRef<Path>) -> MediaResult<RgbImage> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(MediaError::ImageNotFound(path.to_path_buf()));
    }

    let img = image::open(path).map_err(|e| match e {
        image::ImageError::IoError(_) => MediaError::ImageNotFound(path.to_path_buf()),
        other => MediaError::decode_failed(path, other.to_string()),
    })?;

    debug!(path = %path.display(), width = img.width(), height = img.height(), "Loaded image");
    Ok(img.to_rgb8())
}

/// Append `.{default_ext}` unless the path already ends in a known image
/// extension (case-insensitive).
pub fn normalize_output_path(path: impl AsRef<Path>, default_ext: &str) -> PathBuf {
    let path = path.as_ref();
    let known = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false);

    if known {
        path.to_path_buf()
    } else {
        let mut s = path.as_os_str().to_owned();
        s.push(".");
        s.push(default_ext);
        PathBuf::from(s)
    }
}

/// An output written to a temporary sibling, waiting to be renamed into
/// place. Dropping it without [`StagedFile::commit`] removes the temporary.
#[derive(Debug)]
pub struct StagedFile {
    tmp: PathBuf,
    target: PathBuf,
    committed: bool,
}

impl StagedFile {
    fn new(target: &Path) -> MediaResult<Self> {
        if target.is_dir() {
            return Err(std::io::Error::other(format!("{} is a directory", target.display())).into());
        }
        ensure_parent(target)?;
        Ok(Self {
            tmp: temp_sibling(target),
            target: target.to_path_buf(),
            committed: false,
        })
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Rename into place. Returns the final path.
    pub fn commit(mut self) -> MediaResult<PathBuf> {
        fs::rename(&self.tmp, &self.target)?;
        self.committed = true;
        Ok(self.target.clone())
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if !self.committed {
            let _ = fs::remove_file(&self.tmp);
        }
    }
}

/// Commit staged files in order. If one fails, the ones already committed
/// are removed again before the error is returned.
pub fn commit_all(staged: Vec<StagedFile>) -> MediaResult<Vec<PathBuf>> {
    let mut written: Vec<PathBuf> = Vec::with_capacity(staged.len());
    for file in staged {
        match file.commit() {
            Ok(path) => written.push(path),
            Err(e) => {
                for path in &written {
                    let _ = fs::remove_file(path);
                }
                return Err(e);
            }
        }
    }
    Ok(written)
}

/// Encode an image next to its destination, after [`normalize_output_path`].
pub fn stage_image(img: &RgbImage, path: impl AsRef<Path>, default_ext: &str) -> MediaResult<StagedFile> {
    let path = normalize_output_path(path, default_ext);
    let format = ImageFormat::from_path(&path)
        .map_err(|e| MediaError::encode_failed(&path, e.to_string()))?;

    let staged = StagedFile::new(&path)?;
    img.save_with_format(&staged.tmp, format)
        .map_err(|e| MediaError::encode_failed(&path, e.to_string()))?;
    Ok(staged)
}

/// Write text next to its destination.
pub fn stage_text(path: &Path, contents: &str) -> MediaResult<StagedFile> {
    let staged = StagedFile::new(path)?;
    fs::write(&staged.tmp, contents)?;
    Ok(staged)
}

/// Save an image atomically. Returns the path actually written, after
/// [`normalize_output_path`].
pub fn save_image(img: &RgbImage, path: impl AsRef<Path>, default_ext: &str) -> MediaResult<PathBuf> {
    let path = stage_image(img, path, default_ext)?.commit()?;
    info!(path = %path.display(), "Image saved");
    Ok(path)
}

/// Read and validate a JSON detection record.
pub fn read_record(path: impl AsRef<Path>) -> MediaResult<DetectionRecord> {
    let raw = read_text(path.as_ref())?;
    Ok(DetectionRecord::parse(&raw)?)
}

/// Read and validate a stored-labels XML record.
pub fn read_stored_labels(path: impl AsRef<Path>) -> MediaResult<StoredLabelsRecord> {
    let raw = read_text(path.as_ref())?;
    Ok(StoredLabelsRecord::parse(&raw)?)
}

/// Stage a detection record as indented JSON.
pub fn stage_record(record: &DetectionRecord, path: &Path) -> MediaResult<StagedFile> {
    stage_text(path, &record.to_pretty_json()?)
}

/// Stage a stored-labels record as XML.
pub fn stage_stored_labels(record: &StoredLabelsRecord, path: &Path) -> MediaResult<StagedFile> {
    stage_text(path, &record.to_xml()?)
}

/// Write a stored-labels record as XML, atomically.
pub fn write_stored_labels(record: &StoredLabelsRecord, path: impl AsRef<Path>) -> MediaResult<()> {
    stage_stored_labels(record, path.as_ref())?.commit()?;
    Ok(())
}

/// Write a text file atomically.
pub fn write_text(path: &Path, contents: &str) -> MediaResult<()> {
    stage_text(path, contents)?.commit()?;
    Ok(())
}

fn read_text(path: &Path) -> MediaResult<String> {
    fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            MediaError::RecordNotFound(path.to_path_buf())
        } else {
            MediaError::Io(e)
        }
    })
}

fn ensure_parent(path: &Path) -> MediaResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// `dir/.name.tmp` next to `path`, so the final rename stays on one filesystem.
fn temp_sibling(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.tmp", name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_normalize_output_path() {
        assert_eq!(normalize_output_path("out", "jpg"), PathBuf::from("out.jpg"));
        assert_eq!(normalize_output_path("out.PNG", "jpg"), PathBuf::from("out.PNG"));
        assert_eq!(normalize_output_path("a/out.jpeg", "jpg"), PathBuf::from("a/out.jpeg"));
        assert_eq!(normalize_output_path("out.gif", "jpg"), PathBuf::from("out.gif.jpg"));
        assert_eq!(normalize_output_path("out.bmp", "png"), PathBuf::from("out.bmp"));
    }

    #[test]
    fn test_load_missing_image() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_image(dir.path().join("nope.png")).unwrap_err();
        assert!(matches!(err, MediaError::ImageNotFound(_)));
    }

    #[test]
    fn test_load_garbage_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.png");
        fs::write(&path, b"not an image").unwrap();
        assert!(matches!(load_image(&path), Err(MediaError::DecodeFailed { .. })));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let img = RgbImage::from_pixel(4, 3, Rgb([10, 20, 30]));

        let written = save_image(&img, dir.path().join("nested/out"), "png").unwrap();
        assert_eq!(written, dir.path().join("nested/out.png"));

        let loaded = load_image(&written).unwrap();
        assert_eq!(loaded, img);
        assert!(!dir.path().join("nested/.out.png.tmp").exists());
    }

    #[test]
    fn test_dropped_stage_leaves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("notes.txt");
        let staged = stage_text(&target, "hello").unwrap();
        assert!(dir.path().join(".notes.txt.tmp").exists());
        drop(staged);
        assert!(!dir.path().join(".notes.txt.tmp").exists());
        assert!(!target.exists());
    }

    #[test]
    fn test_stage_into_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(stage_text(dir.path(), "x"), Err(MediaError::Io(_))));
    }

    #[test]
    fn test_commit_all_rolls_back() {
        let dir = tempfile::tempdir().unwrap();
        let first = stage_text(&dir.path().join("a.txt"), "a").unwrap();
        let blocked = dir.path().join("b.txt");
        let second = stage_text(&blocked, "b").unwrap();
        // Target turns into a non-empty directory before the rename
        fs::create_dir(&blocked).unwrap();
        fs::write(blocked.join("keep"), "x").unwrap();

        assert!(commit_all(vec![first, second]).is_err());
        assert!(!dir.path().join("a.txt").exists());
        assert!(!dir.path().join(".b.txt.tmp").exists());
    }

    #[test]
    fn test_missing_record_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_record(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, MediaError::RecordNotFound(_)));
    }

    #[test]
    fn test_record_round_trip_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("faces.json");
        fs::write(
            &path,
            r#"{"FaceDetails": [{"BoundingBox": {"Left": 0.1, "Top": 0.1, "Width": 0.2, "Height": 0.2}}]}"#,
        )
        .unwrap();

        let mut record = read_record(&path).unwrap();
        record.faces[0].name = Some("Ana".to_string());
        let out = dir.path().join("labeled.json");
        stage_record(&record, &out).unwrap().commit().unwrap();

        assert_eq!(read_record(&out).unwrap(), record);
    }
}
