//! Redaction geometry: padded mask regions painted onto a copy of the
//! source raster.

mod fallback;

pub use fallback::{apply_fallback_masks, FallbackMask, CORNER_RADIUS, FALLBACK_MASKS};

use docmask_ocr::WordBox;
use docmask_pii::PiiMatch;
use image::{DynamicImage, Rgba, RgbaImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;

/// Fixed padding applied on every side of a matched bounding box.
pub const MASK_PADDING: i64 = 5;

pub(crate) const MASK_COLOR: Rgba<u8> = Rgba([0u8, 0u8, 0u8, 255u8]);

/// A rectangle to be painted over detected PII.
///
/// Coordinates are unclamped: they may be negative or extend past the
/// image after padding. The drawing primitive clips to the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaskRegion {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

/// Expand a word's bounding box by [`MASK_PADDING`] on all four sides.
pub fn mask_region(bbox: &WordBox) -> MaskRegion {
    MaskRegion {
        x: bbox.x0 - MASK_PADDING,
        y: bbox.y0 - MASK_PADDING,
        width: bbox.width() + MASK_PADDING * 2,
        height: bbox.height() + MASK_PADDING * 2,
    }
}

/// Paint the mask regions for all matches onto a copy of the source image.
///
/// The source is never mutated. Regions are painted in match order as
/// opaque black; `draw_filled_rect_mut` intersects each rectangle with the
/// canvas, so out-of-bounds regions clip silently instead of erroring.
pub fn redact_image(source: &DynamicImage, matches: &[PiiMatch]) -> RgbaImage {
    let mut output = source.to_rgba8();

    for pii in matches {
        let region = mask_region(&pii.bbox);
        paint_region(&mut output, &region);
    }

    log::info!("[Redact] painted {} mask regions", matches.len());
    output
}

pub(crate) fn paint_region(img: &mut RgbaImage, region: &MaskRegion) {
    // WordBox guarantees non-negative extents, and padding adds 10 to each,
    // so width/height are always positive here.
    let rect = Rect::at(region.x as i32, region.y as i32)
        .of_size(region.width as u32, region.height as u32);
    draw_filled_rect_mut(img, rect, MASK_COLOR);
}

#[cfg(test)]
mod tests {
    use super::*;
    use docmask_pii::PiiType;

    fn pii_at(bbox: WordBox) -> PiiMatch {
        PiiMatch {
            text: "234523452345".to_string(),
            pii_type: PiiType::IdNumber,
            bbox,
        }
    }

    fn gradient_image(w: u32, h: u32) -> DynamicImage {
        let img = RgbaImage::from_fn(w, h, |x, y| {
            Rgba([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8, 255])
        });
        DynamicImage::ImageRgba8(img)
    }

    #[test]
    fn region_is_bbox_plus_padding() {
        let region = mask_region(&WordBox::new(10, 40, 90, 50));
        assert_eq!(
            region,
            MaskRegion {
                x: 5,
                y: 35,
                width: 90,
                height: 20,
            }
        );
    }

    #[test]
    fn region_may_go_negative() {
        let region = mask_region(&WordBox::new(2, 0, 30, 12));
        assert_eq!(region.x, -3);
        assert_eq!(region.y, -5);
    }

    #[test]
    fn redaction_is_non_destructive_outside_regions() {
        let source = gradient_image(120, 80);
        let masked = redact_image(&source, &[pii_at(WordBox::new(10, 40, 90, 50))]);

        let reference = source.to_rgba8();
        // Region after padding: x 5..95, y 35..55.
        for y in 0..80u32 {
            for x in 0..120u32 {
                let inside = (5..95).contains(&x) && (35..55).contains(&y);
                if inside {
                    assert_eq!(*masked.get_pixel(x, y), Rgba([0, 0, 0, 255]));
                } else {
                    assert_eq!(masked.get_pixel(x, y), reference.get_pixel(x, y));
                }
            }
        }
    }

    #[test]
    fn source_image_is_untouched() {
        let source = gradient_image(60, 40);
        let before = source.to_rgba8();
        let _ = redact_image(&source, &[pii_at(WordBox::new(10, 10, 30, 20))]);
        assert_eq!(source.to_rgba8(), before);
    }

    #[test]
    fn out_of_bounds_regions_clip_without_panicking() {
        let source = gradient_image(50, 30);
        // Padding pushes this box outside the canvas on all sides.
        let masked = redact_image(&source, &[pii_at(WordBox::new(-2, -2, 60, 40))]);
        assert_eq!(*masked.get_pixel(0, 0), Rgba([0, 0, 0, 255]));
        assert_eq!(*masked.get_pixel(49, 29), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn overlapping_regions_stay_opaque() {
        let source = gradient_image(100, 60);
        let matches = vec![
            pii_at(WordBox::new(10, 10, 50, 30)),
            pii_at(WordBox::new(30, 20, 80, 40)),
        ];
        let masked = redact_image(&source, &matches);
        assert_eq!(*masked.get_pixel(40, 25), Rgba([0, 0, 0, 255]));
    }
}
