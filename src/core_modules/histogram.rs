// THEORY:
// The `histogram` module performs the data transformation at the heart of the
// census: it walks every pixel of a decoded image exactly once and folds the
// stream of pixels into a per-image frequency map. The walk is exhaustive on
// purpose. Sampling strategies change the output semantics, so correctness
// here means the histogram's total count always equals width x height.
//
// The image is converted to non-premultiplied 8-bit RGB *before* any pixel is
// keyed. Keying by a native encoding first and converting later would split
// visually identical colors across multiple keys.

use crate::core_modules::color::color::Color;
use image::DynamicImage;
use std::collections::HashMap;

/// Per-image mapping from a color to the number of pixels carrying it.
/// Built once, read once by the ranking step, then discarded.
pub type Histogram = HashMap<Color, u64>;

/// Counts every pixel of `image` into a fresh histogram.
pub fn count_colors(image: &DynamicImage) -> Histogram {
    let pixels = image.to_rgb8();
    let mut histogram = Histogram::new();
    for pixel in pixels.pixels() {
        *histogram.entry(Color::from(*pixel)).or_insert(0) += 1;
    }
    histogram
}
