//! Tests for the k-d tree color index against a linear scan

#[cfg(test)]
mod tests {
    use image::Rgb;
    use tilemosaic::color::index::{ColorIndex, brute_force_nearest};

    // Deterministic pseudo-random colors from a linear congruential sequence
    fn generated_colors(count: usize, seed: u32) -> Vec<Rgb<u8>> {
        let mut state = seed;
        (0..count)
            .map(|_| {
                let mut channel = || {
                    state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
                    (state >> 24) as u8
                };
                Rgb([channel(), channel(), channel()])
            })
            .collect()
    }

    // Tests the three-gray catalog resolves to the middle gray
    #[test]
    fn test_nearest_gray_scenario() {
        let colors = [Rgb([0, 0, 0]), Rgb([128, 128, 128]), Rgb([255, 255, 255])];
        let index = ColorIndex::new(&colors);

        assert_eq!(index.nearest(Rgb([100, 100, 100])), Some(1));
        assert_eq!(index.nearest(Rgb([10, 10, 10])), Some(0));
        assert_eq!(index.nearest(Rgb([250, 240, 255])), Some(2));
    }

    // Tests every query agrees with the brute-force scan
    // Verified by pruning the far subtree on equal plane distance
    #[test]
    fn test_matches_brute_force() {
        for (count, seed) in [(1, 7), (2, 11), (17, 3), (64, 99), (300, 12345)] {
            let colors = generated_colors(count, seed);
            let index = ColorIndex::new(&colors);

            for query in generated_colors(200, seed.wrapping_add(1)) {
                assert_eq!(
                    index.nearest(query),
                    brute_force_nearest(&colors, query),
                    "catalog of {count} colors disagreed for query {:?}",
                    query.0
                );
            }
        }
    }

    // Tests duplicate colors resolve to the lowest catalog index
    // Verified by replacing the index tie-break with insertion order of the tree
    #[test]
    fn test_duplicate_colors_pick_lowest_index() {
        let colors = vec![Rgb([50, 50, 50]); 9];
        let index = ColorIndex::new(&colors);

        assert_eq!(index.nearest(Rgb([50, 50, 50])), Some(0));
        assert_eq!(index.nearest(Rgb([0, 200, 7])), Some(0));
    }

    // Tests equidistant distinct colors resolve to the lowest catalog index
    #[test]
    fn test_equidistant_colors_pick_lowest_index() {
        // All three are at squared distance 100 from the query
        let colors = [
            Rgb([110, 100, 100]),
            Rgb([100, 100, 90]),
            Rgb([90, 100, 100]),
        ];
        let index = ColorIndex::new(&colors);
        let query = Rgb([100, 100, 100]);

        assert_eq!(index.nearest(query), Some(0));
        assert_eq!(brute_force_nearest(&colors, query), Some(0));

        let reordered = [colors[2], colors[1], colors[0]];
        assert_eq!(ColorIndex::new(&reordered).nearest(query), Some(0));
    }

    // Tests an empty index has no nearest color
    #[test]
    fn test_empty_index() {
        let index = ColorIndex::new(&[]);

        assert!(index.is_empty());
        assert_eq!(index.len(), 0);
        assert_eq!(index.nearest(Rgb([1, 2, 3])), None);
        assert_eq!(brute_force_nearest(&[], Rgb([1, 2, 3])), None);
    }

    // Tests exact hits are found for every indexed color
    #[test]
    fn test_exact_hits() {
        let colors = generated_colors(128, 42);
        let index = ColorIndex::new(&colors);

        assert_eq!(index.len(), colors.len());
        for (position, color) in colors.iter().enumerate() {
            let found = index.nearest(*color);
            let first_same = colors.iter().position(|c| c == color);
            assert_eq!(found, first_same, "color at {position} not found exactly");
        }
    }
}
