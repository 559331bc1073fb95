use ab_glyph::{Font, FontRef, PxScale, ScaleFont};
use std::path::Path;

/// Deterministic text measurement. The composer only ever needs widths, so
/// this is the single coupling point to a concrete font stack.
pub trait TextMeasure {
    fn width(&self, text: &str, font_size: f32) -> f32;
}

/// Courier advance is 600/1000 em for every glyph.
const COURIER_ADVANCE: f32 = 0.6;

/// Fixed-advance Courier metrics. Needs no font file, which keeps layout
/// deterministic on machines with no fonts installed.
#[derive(Debug, Clone, Copy, Default)]
pub struct CourierMeasure;

impl TextMeasure for CourierMeasure {
    fn width(&self, text: &str, font_size: f32) -> f32 {
        text.chars().count() as f32 * COURIER_ADVANCE * font_size
    }
}

/// Measurement backed by a real font via ab_glyph.
pub struct GlyphMeasure {
    font: FontRef<'static>,
}

impl GlyphMeasure {
    pub fn from_slice(bytes: &'static [u8]) -> Option<Self> {
        FontRef::try_from_slice(bytes).ok().map(|font| Self { font })
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        std::fs::read(path).ok().and_then(|bytes| {
            // Leak the bytes to get 'static lifetime
            let leaked: &'static [u8] = Box::leak(bytes.into_boxed_slice());
            Self::from_slice(leaked)
        })
    }
}

impl TextMeasure for GlyphMeasure {
    fn width(&self, text: &str, font_size: f32) -> f32 {
        let scaled = self.font.as_scaled(PxScale::from(font_size));
        text.chars()
            .map(|c| scaled.h_advance(self.font.glyph_id(c)))
            .sum()
    }
}
