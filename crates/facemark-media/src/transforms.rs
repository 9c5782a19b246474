//! Whole-image transforms that need no detection record.

use std::fmt;
use std::str::FromStr;

use facemark_models::{Color, InvalidOption, PixelRect, TransformKind};
use image::{imageops, Rgb, RgbImage};

use crate::canvas::{to_rgb, Canvas};
use crate::error::{MediaError, MediaResult};
use crate::font;
use crate::instruction::{Anchor, BlurKind};
use crate::policy::OUTLINE_THICKNESS;

/// Caption scale for boxed text; larger than face labels.
const CAPTION_SCALE: i32 = 4;

/// Which half gets mirrored onto the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Left half flipped horizontally onto the right half
    Vertical,
    /// Top half flipped vertically onto the bottom half
    Horizontal,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Vertical => write!(f, "vertical"),
            Axis::Horizontal => write!(f, "horizontal"),
        }
    }
}

impl FromStr for Axis {
    type Err = InvalidOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "vertical" => Ok(Axis::Vertical),
            "horizontal" => Ok(Axis::Horizontal),
            _ => Err(InvalidOption(format!(
                "{} (choose between 'vertical' or 'horizontal')",
                s
            ))),
        }
    }
}

pub fn rotate_180(img: &RgbImage) -> RgbImage {
    imageops::rotate180(img)
}

/// Invert every channel.
pub fn negative(img: &RgbImage) -> RgbImage {
    let mut out = img.clone();
    imageops::invert(&mut out);
    out
}

/// Luma conversion, kept as RGB so every output can be written the same way.
pub fn grayscale(img: &RgbImage) -> RgbImage {
    let luma = imageops::grayscale(img);
    RgbImage::from_fn(luma.width(), luma.height(), |x, y| {
        let v = luma.get_pixel(x, y)[0];
        Rgb([v, v, v])
    })
}

/// Horizontal flip.
pub fn mirror(img: &RgbImage) -> RgbImage {
    imageops::flip_horizontal(img)
}

/// Drop the last row and/or column so both dimensions are even.
pub fn crop_even_dimensions(img: &RgbImage) -> RgbImage {
    let w = img.width() - img.width() % 2;
    let h = img.height() - img.height() % 2;
    imageops::crop_imm(img, 0, 0, w, h).to_image()
}

/// Mirror one half onto the other. The half size rounds down and the flipped
/// half is placed against the far edge, so on odd dimensions the middle row
/// or column is left as is.
pub fn mirror_half(img: &RgbImage, axis: Axis) -> RgbImage {
    let mut out = img.clone();
    let (w, h) = img.dimensions();
    match axis {
        Axis::Vertical => {
            let half = w / 2;
            if half == 0 {
                return out;
            }
            let flipped = imageops::flip_horizontal(&imageops::crop_imm(img, 0, 0, half, h).to_image());
            imageops::replace(&mut out, &flipped, i64::from(w - half), 0);
        }
        Axis::Horizontal => {
            let half = h / 2;
            if half == 0 {
                return out;
            }
            let flipped = imageops::flip_vertical(&imageops::crop_imm(img, 0, 0, w, half).to_image());
            imageops::replace(&mut out, &flipped, 0, i64::from(h - half));
        }
    }
    out
}

/// Rectangle between two corners.
pub fn draw_box(img: &mut RgbImage, p1: (i32, i32), p2: (i32, i32), color: Color) {
    img.draw_rectangle(PixelRect::from_corners(p1, p2), color, OUTLINE_THICKNESS);
}

/// Negative of the pixels inside the rectangle between two corners.
pub fn invert_region(img: &mut RgbImage, p1: (i32, i32), p2: (i32, i32)) {
    let Some(clip) = PixelRect::from_corners(p1, p2).clip(img.width(), img.height()) else {
        return;
    };
    for y in clip.y..clip.y + clip.height {
        for x in clip.x..clip.x + clip.width {
            let p = img.get_pixel_mut(x, y);
            *p = Rgb([255 - p[0], 255 - p[1], 255 - p[2]]);
        }
    }
}

/// Rectangle plus a caption just above its top edge.
pub fn draw_box_with_text(
    img: &mut RgbImage,
    p1: (i32, i32),
    p2: (i32, i32),
    color: Color,
    text: &str,
) {
    let rect = PixelRect::from_corners(p1, p2);
    img.draw_rectangle(rect, color, OUTLINE_THICKNESS);
    let anchor = Anchor::new(rect.x, rect.y.saturating_sub(10));
    font::draw_text(img, text, anchor, to_rgb(color), CAPTION_SCALE);
}

/// Median redaction of the rectangle between two corners.
pub fn blur_box(img: &mut RgbImage, p1: (i32, i32), p2: (i32, i32)) {
    img.blur_region(PixelRect::from_corners(p1, p2), BlurKind::CASCADE);
}

/// Arguments for transforms that need them.
#[derive(Debug, Clone, Default)]
pub struct TransformArgs {
    pub region: Option<((i32, i32), (i32, i32))>,
    pub color: Option<Color>,
    pub text: Option<String>,
}

/// Run a named transform.
///
/// Region transforms fail with [`MediaError::InvalidOption`] when no region
/// is given.
pub fn apply_transform(
    img: &RgbImage,
    kind: TransformKind,
    args: &TransformArgs,
) -> MediaResult<RgbImage> {
    let region = || {
        args.region.ok_or_else(|| {
            MediaError::InvalidOption(InvalidOption(format!("{} requires a region", kind)))
        })
    };
    let color = args.color.unwrap_or(Color::RED);

    let out = match kind {
        TransformKind::Rotate180 => rotate_180(img),
        TransformKind::Negative => negative(img),
        TransformKind::Grayscale => grayscale(img),
        TransformKind::Mirror => mirror(img),
        TransformKind::MirrorHalfVertical => mirror_half(img, Axis::Vertical),
        TransformKind::MirrorHalfHorizontal => mirror_half(img, Axis::Horizontal),
        TransformKind::EvenDimensions => crop_even_dimensions(img),
        TransformKind::DrawBox => {
            let (p1, p2) = region()?;
            let mut out = img.clone();
            draw_box(&mut out, p1, p2, color);
            out
        }
        TransformKind::InvertRegion => {
            let (p1, p2) = region()?;
            let mut out = img.clone();
            invert_region(&mut out, p1, p2);
            out
        }
        TransformKind::BlurBox => {
            let (p1, p2) = region()?;
            let mut out = img.clone();
            blur_box(&mut out, p1, p2);
            out
        }
        TransformKind::BoxWithText => {
            let (p1, p2) = region()?;
            let mut out = img.clone();
            draw_box_with_text(&mut out, p1, p2, color, args.text.as_deref().unwrap_or(""));
            out
        }
    };
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 4x3 image where each pixel encodes its coordinates.
    fn coords() -> RgbImage {
        RgbImage::from_fn(4, 3, |x, y| Rgb([x as u8, y as u8, 0]))
    }

    #[test]
    fn test_rotate_180() {
        let out = rotate_180(&coords());
        assert_eq!(*out.get_pixel(0, 0), Rgb([3, 2, 0]));
        assert_eq!(*out.get_pixel(3, 2), Rgb([0, 0, 0]));
    }

    #[test]
    fn test_negative() {
        let img = RgbImage::from_pixel(2, 2, Rgb([0, 100, 255]));
        assert_eq!(*negative(&img).get_pixel(1, 1), Rgb([255, 155, 0]));
    }

    #[test]
    fn test_grayscale_channels_equal() {
        let img = RgbImage::from_pixel(2, 2, Rgb([200, 50, 10]));
        let p = *grayscale(&img).get_pixel(0, 0);
        assert_eq!(p[0], p[1]);
        assert_eq!(p[1], p[2]);
    }

    #[test]
    fn test_mirror() {
        let out = mirror(&coords());
        assert_eq!(*out.get_pixel(0, 1), Rgb([3, 1, 0]));
    }

    #[test]
    fn test_crop_even_dimensions() {
        let out = crop_even_dimensions(&RgbImage::new(5, 7));
        assert_eq!(out.dimensions(), (4, 6));
        let same = crop_even_dimensions(&RgbImage::new(4, 6));
        assert_eq!(same.dimensions(), (4, 6));
    }

    #[test]
    fn test_mirror_half_vertical() {
        let out = mirror_half(&coords(), Axis::Vertical);
        // Right half is the flipped left half: columns 2,3 <- 1,0
        assert_eq!(*out.get_pixel(2, 0), Rgb([1, 0, 0]));
        assert_eq!(*out.get_pixel(3, 2), Rgb([0, 2, 0]));
        assert_eq!(*out.get_pixel(0, 0), Rgb([0, 0, 0]));
    }

    #[test]
    fn test_mirror_half_horizontal_odd_height() {
        let out = mirror_half(&coords(), Axis::Horizontal);
        // half = 1: row 2 <- row 0, middle row 1 untouched
        assert_eq!(*out.get_pixel(2, 2), Rgb([2, 0, 0]));
        assert_eq!(*out.get_pixel(2, 1), Rgb([2, 1, 0]));
        assert_eq!(*out.get_pixel(2, 0), Rgb([2, 0, 0]));
    }

    #[test]
    fn test_mirror_half_vertical_odd_width_is_symmetric() {
        let img = RgbImage::from_fn(5, 1, |x, _| Rgb([x as u8, 0, 0]));
        let out = mirror_half(&img, Axis::Vertical);
        let row: Vec<u8> = (0..5).map(|x| out.get_pixel(x, 0)[0]).collect();
        assert_eq!(row, vec![0, 1, 2, 1, 0]);
    }

    #[test]
    fn test_axis_parse() {
        assert_eq!("Vertical".parse::<Axis>().unwrap(), Axis::Vertical);
        assert!("diagonal".parse::<Axis>().is_err());
    }

    #[test]
    fn test_invert_region_clipped() {
        let mut img = RgbImage::new(4, 4);
        invert_region(&mut img, (2, 2), (10, 10));
        assert_eq!(*img.get_pixel(3, 3), Rgb([255, 255, 255]));
        assert_eq!(*img.get_pixel(1, 1), Rgb([0, 0, 0]));
    }

    #[test]
    fn test_region_transform_requires_region() {
        let err = apply_transform(&coords(), TransformKind::DrawBox, &TransformArgs::default())
            .unwrap_err();
        assert!(matches!(err, MediaError::InvalidOption(_)));
    }

    #[test]
    fn test_box_with_text() {
        let mut img = RgbImage::new(100, 100);
        draw_box_with_text(&mut img, (20, 40), (80, 90), Color::BLUE, "ANA");
        assert_eq!(*img.get_pixel(20, 40), Rgb([0, 0, 255]));
        // Caption drawn somewhere above the box
        let above = (0..100).any(|x| (0..40).any(|y| *img.get_pixel(x, y) == Rgb([0, 0, 255])));
        assert!(above);
    }
}
