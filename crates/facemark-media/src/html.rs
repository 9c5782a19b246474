//! Side-by-side HTML comparison of an image and its mirrored variants.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::MediaResult;
use crate::fs_utils::{load_image, save_image, write_text};
use crate::transforms::{mirror, mirror_half, Axis};

/// Width of each thumbnail cell, in CSS pixels.
pub const THUMBNAIL_WIDTH: u32 = 200;

/// Paths written by [`write_comparison`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonOutput {
    pub mirror: PathBuf,
    pub vertical: PathBuf,
    pub horizontal: PathBuf,
    pub html: PathBuf,
}

fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Four-column table: original, full mirror, vertical half, horizontal half.
pub fn comparison_page(original: &str, mirror: &str, vertical: &str, horizontal: &str) -> String {
    let cells: String = [original, mirror, vertical, horizontal]
        .iter()
        .map(|src| {
            format!(
                "      <td><img src=\"{}\" width=\"{}\"></td>\n",
                escape_attr(src),
                THUMBNAIL_WIDTH
            )
        })
        .collect();

    format!(
        "<!DOCTYPE html>\n\
         <html>\n\
         <head><meta charset=\"utf-8\"><title>Mirror comparison</title></head>\n\
         <body>\n\
         \x20 <table border=\"1\">\n\
         \x20   <tr><th>Original</th><th>Mirror</th><th>Vertical</th><th>Horizontal</th></tr>\n\
         \x20   <tr>\n\
         {}\
         \x20   </tr>\n\
         \x20 </table>\n\
         </body>\n\
         </html>\n",
        cells
    )
}

/// Write the three variants next to `html_path` and the page itself.
///
/// Variant files are named after the page's stem (`page_mirror.png`, ...)
/// and referenced by file name, so the directory can be moved as a whole.
/// The original is referenced by its path as given.
pub fn write_comparison(input: impl AsRef<Path>, html_path: impl AsRef<Path>) -> MediaResult<ComparisonOutput> {
    let input = input.as_ref();
    let html_path = html_path.as_ref();
    let img = load_image(input)?;

    let dir = html_path.parent().unwrap_or_else(|| Path::new(""));
    let stem = html_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "comparison".to_string());
    let variant = |suffix: &str| dir.join(format!("{}_{}.png", stem, suffix));

    let mirror_path = save_image(&mirror(&img), variant("mirror"), "png")?;
    let vertical_path = save_image(&mirror_half(&img, Axis::Vertical), variant("vertical"), "png")?;
    let horizontal_path = save_image(&mirror_half(&img, Axis::Horizontal), variant("horizontal"), "png")?;

    let file_name = |p: &Path| {
        p.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    };
    let page = comparison_page(
        &input.to_string_lossy(),
        &file_name(&mirror_path),
        &file_name(&vertical_path),
        &file_name(&horizontal_path),
    );
    write_text(html_path, &page)?;

    info!(html = %html_path.display(), "Comparison page written");
    Ok(ComparisonOutput {
        mirror: mirror_path,
        vertical: vertical_path,
        horizontal: horizontal_path,
        html: html_path.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    #[test]
    fn test_comparison_page_layout() {
        let page = comparison_page("a.png", "b.png", "c.png", "d&e.png");
        assert!(page.contains("<th>Original</th><th>Mirror</th><th>Vertical</th><th>Horizontal</th>"));
        assert_eq!(page.matches("width=\"200\"").count(), 4);
        assert!(page.contains("src=\"d&amp;e.png\""));
    }

    #[test]
    fn test_write_comparison() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("face.png");
        RgbImage::new(6, 4).save(&input).unwrap();

        let out = write_comparison(&input, dir.path().join("report.html")).unwrap();
        assert!(out.html.is_file());
        assert!(out.mirror.ends_with("report_mirror.png"));
        assert!(out.vertical.is_file());
        assert!(out.horizontal.is_file());

        let page = std::fs::read_to_string(&out.html).unwrap();
        assert!(page.contains("report_horizontal.png"));
    }
}
