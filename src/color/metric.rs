//! RGB distance and mean color calculations
//!
//! Distances are computed on integer channel values. Squared distance is
//! used for all comparisons so that nearest-color decisions are exact and
//! independent of floating point rounding.

use image::Rgb;

/// Squared Euclidean distance between two colors in RGB space
pub fn squared_distance(a: Rgb<u8>, b: Rgb<u8>) -> u32 {
    a.0.iter()
        .zip(b.0.iter())
        .map(|(&x, &y)| {
            let diff = i32::from(x) - i32::from(y);
            diff.unsigned_abs() * diff.unsigned_abs()
        })
        .sum()
}

/// Euclidean distance between two colors in RGB space
pub fn euclidean_distance(a: Rgb<u8>, b: Rgb<u8>) -> f64 {
    f64::from(squared_distance(a, b)).sqrt()
}

/// Per-channel mean of a set of pixels with integer truncation
///
/// Returns `None` when the iterator yields no pixels.
pub fn mean_color<'a, I>(pixels: I) -> Option<Rgb<u8>>
where
    I: IntoIterator<Item = &'a Rgb<u8>>,
{
    let mut sums = [0_u64; 3];
    let mut count = 0_u64;

    for pixel in pixels {
        for (sum, &channel) in sums.iter_mut().zip(pixel.0.iter()) {
            *sum += u64::from(channel);
        }
        count += 1;
    }

    if count == 0 {
        return None;
    }

    // Each mean is bounded by the largest channel value, so it fits in u8
    Some(Rgb(sums.map(|sum| (sum / count) as u8)))
}
