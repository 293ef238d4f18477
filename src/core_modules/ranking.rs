// THEORY:
// The `ranking` module reduces a finished histogram to the colors worth
// reporting: the three most frequent ones, rendered as hex strings. A full
// descending sort is deliberately chosen over a bounded heap. A histogram
// holds at most 2^24 distinct keys and in practice far fewer, so the sort is
// cheap, and it makes the ordering contract trivial to state and test.
//
// Ties on count are broken by the color's channel ordering (red, then green,
// then blue, ascending) so that the same histogram always ranks the same way.

use crate::core_modules::color::color::Color;
use crate::core_modules::histogram::Histogram;

/// How many colors a census reports per image.
pub const TOP_COLOR_COUNT: usize = 3;

/// A (color, count) pair that only lives for the duration of one ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankedColor {
    pub color: Color,
    pub count: u64,
}

/// Orders a histogram's entries by count, descending, ties broken by the
/// color's channel ordering, ascending.
pub fn rank_colors(histogram: &Histogram) -> Vec<RankedColor> {
    let mut ranked: Vec<RankedColor> = histogram
        .iter()
        .map(|(&color, &count)| RankedColor { color, count })
        .collect();

    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.color.cmp(&b.color)));
    ranked
}

/// Returns up to [`TOP_COLOR_COUNT`] hex strings in descending-frequency
/// order. Histograms with fewer distinct colors yield a shorter list; the
/// result sink pads the missing fields.
pub fn top_colors(histogram: &Histogram) -> Vec<String> {
    let mut ranked = rank_colors(histogram);
    ranked.truncate(TOP_COLOR_COUNT);
    ranked.into_iter().map(|entry| entry.color.hex()).collect()
}

#[cfg(test)]
mod tests {
    use super::{TOP_COLOR_COUNT, rank_colors, top_colors};
    use crate::core_modules::color::color::Color;
    use crate::core_modules::histogram::Histogram;

    fn histogram(entries: &[((u8, u8, u8), u64)]) -> Histogram {
        entries
            .iter()
            .map(|&((r, g, b), count)| (Color::new(r, g, b), count))
            .collect()
    }

    #[test]
    fn selects_the_three_most_frequent_colors_in_order() {
        let histogram = histogram(&[
            ((0, 0, 0), 2),       // black
            ((255, 255, 255), 4), // white
            ((255, 0, 0), 1),     // red
            ((0, 255, 0), 5),     // green
            ((0, 0, 255), 3),     // blue
        ]);

        assert_eq!(top_colors(&histogram), ["#00FF00", "#FFFFFF", "#0000FF"]);
    }

    #[test]
    fn exactly_three_entries_for_larger_histograms() {
        let histogram = histogram(&[
            ((1, 1, 1), 10),
            ((2, 2, 2), 9),
            ((3, 3, 3), 8),
            ((4, 4, 4), 7),
            ((5, 5, 5), 6),
        ]);

        let top = top_colors(&histogram);
        assert_eq!(top.len(), TOP_COLOR_COUNT);
        assert_eq!(top, ["#010101", "#020202", "#030303"]);
    }

    #[test]
    fn fewer_than_three_colors_yield_a_partial_result() {
        let histogram = histogram(&[((7, 7, 7), 12), ((8, 8, 8), 3)]);
        assert_eq!(top_colors(&histogram), ["#070707", "#080808"]);

        assert!(top_colors(&Histogram::new()).is_empty());
    }

    #[test]
    fn ties_break_on_channel_order() {
        let histogram = histogram(&[
            ((0, 0, 255), 4),
            ((255, 0, 0), 4),
            ((0, 255, 0), 4),
            ((9, 9, 9), 1),
        ]);

        // Equal counts rank by red, then green, then blue, ascending.
        assert_eq!(top_colors(&histogram), ["#0000FF", "#00FF00", "#FF0000"]);
    }

    #[test]
    fn ranking_keeps_counts_attached() {
        let histogram = histogram(&[((1, 2, 3), 2), ((4, 5, 6), 7)]);
        let ranked = rank_colors(&histogram);

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].color, Color::new(4, 5, 6));
        assert_eq!(ranked[0].count, 7);
        assert_eq!(ranked[1].count, 2);
    }
}
