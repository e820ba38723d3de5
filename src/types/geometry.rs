use serde::{Deserialize, Serialize};

/// EMUs (English Metric Units) per inch.
pub const EMU_PER_INCH: i64 = 914_400;

/// Convert whole and fractional inches to EMUs.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub fn inches(value: f64) -> i64 {
    (value * EMU_PER_INCH as f64).round() as i64
}

/// Position and size of a shape on a slide, in EMUs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i64,
    pub y: i64,
    pub cx: i64,
    pub cy: i64,
}

impl Rect {
    #[must_use]
    pub const fn new(x: i64, y: i64, cx: i64, cy: i64) -> Self {
        Self { x, y, cx, cy }
    }

    /// A rectangle filling `size` minus `margin` on every side.
    #[must_use]
    pub fn inset(size: SlideSize, margin: i64) -> Self {
        Self {
            x: margin,
            y: margin,
            cx: (size.cx - 2 * margin).max(0),
            cy: (size.cy - 2 * margin).max(0),
        }
    }
}

/// Slide dimensions in EMUs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideSize {
    pub cx: i64,
    pub cy: i64,
}

impl Default for SlideSize {
    /// 10" x 7.5" (4:3)
    fn default() -> Self {
        Self {
            cx: 9_144_000,
            cy: 6_858_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inches() {
        assert_eq!(inches(1.0), EMU_PER_INCH);
        assert_eq!(inches(0.5), 457_200);
        assert_eq!(inches(6.5), 5_943_600);
    }

    #[test]
    fn test_inset() {
        let r = Rect::inset(SlideSize::default(), inches(0.5));
        assert_eq!(r, Rect::new(457_200, 457_200, 8_229_600, 5_943_600));
    }

    #[test]
    fn test_inset_never_negative() {
        let r = Rect::inset(SlideSize { cx: 100, cy: 100 }, 200);
        assert_eq!((r.cx, r.cy), (0, 0));
    }
}
