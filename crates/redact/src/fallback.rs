//! Heuristic fallback masking.
//!
//! When classification finds nothing, the pipeline cannot tell an engine
//! failure from a genuinely PII-free photo, so it covers the canonical
//! field positions of an identity document instead.

use crate::MASK_COLOR;
use image::{DynamicImage, Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut};
use imageproc::rect::Rect;

/// Corner radius of the fallback rectangles, in pixels.
pub const CORNER_RADIUS: i32 = 4;

/// A fallback rectangle in fractions of the image extent.
#[derive(Debug, Clone, Copy)]
pub struct FallbackMask {
    pub label: &'static str,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Canonical field positions on identity documents.
pub const FALLBACK_MASKS: [FallbackMask; 5] = [
    FallbackMask { label: "name", x: 0.25, y: 0.22, width: 0.40, height: 0.05 },
    FallbackMask { label: "id number", x: 0.25, y: 0.32, width: 0.50, height: 0.05 },
    FallbackMask { label: "date of birth", x: 0.25, y: 0.42, width: 0.30, height: 0.05 },
    FallbackMask { label: "address", x: 0.15, y: 0.52, width: 0.60, height: 0.08 },
    FallbackMask { label: "contact", x: 0.25, y: 0.65, width: 0.45, height: 0.05 },
];

/// Paint the five fallback rectangles onto a copy of the source image.
pub fn apply_fallback_masks(source: &DynamicImage) -> RgbaImage {
    let mut output = source.to_rgba8();
    let (img_w, img_h) = output.dimensions();

    for mask in FALLBACK_MASKS {
        let x = (mask.x * img_w as f32) as i32;
        let y = (mask.y * img_h as f32) as i32;
        let w = (mask.width * img_w as f32) as i32;
        let h = (mask.height * img_h as f32) as i32;
        draw_filled_rounded_rect_mut(&mut output, x, y, w, h, CORNER_RADIUS, MASK_COLOR);
    }

    log::info!("[Redact] no PII classified, applied {} fallback masks", FALLBACK_MASKS.len());
    output
}

/// Rounded rectangle as two overlapping rects plus four corner discs.
///
/// The radius is clamped to half the shorter side, the same behavior the
/// canvas `roundRect` primitive guarantees.
fn draw_filled_rounded_rect_mut(
    img: &mut RgbaImage,
    x: i32,
    y: i32,
    w: i32,
    h: i32,
    radius: i32,
    color: Rgba<u8>,
) {
    if w <= 0 || h <= 0 {
        return;
    }

    let r = radius.min(w / 2).min(h / 2).max(0);
    if r == 0 {
        draw_filled_rect_mut(img, Rect::at(x, y).of_size(w as u32, h as u32), color);
        return;
    }

    if w > 2 * r {
        let rect = Rect::at(x + r, y).of_size((w - 2 * r) as u32, h as u32);
        draw_filled_rect_mut(img, rect, color);
    }
    if h > 2 * r {
        let rect = Rect::at(x, y + r).of_size(w as u32, (h - 2 * r) as u32);
        draw_filled_rect_mut(img, rect, color);
    }

    let corners = [
        (x + r, y + r),
        (x + w - 1 - r, y + r),
        (x + r, y + h - 1 - r),
        (x + w - 1 - r, y + h - 1 - r),
    ];
    for (cx, cy) in corners {
        draw_filled_circle_mut(img, (cx, cy), r, color);
    }
}
