//! Initial centroid selection.

use rand::rngs::StdRng;
use rand::SeedableRng;

use super::histogram::ColorHistogram;
use super::options::CentroidInit;
use crate::color::Rgba;

/// Pick `min(k, distinct)` starting centroids from the histogram.
///
/// Returned centroids are distinct image colors in first-seen order.
pub(crate) fn initial_centroids(hist: &ColorHistogram, k: usize, init: CentroidInit) -> Vec<Rgba> {
    let n = hist.len();
    let m = k.min(n);
    if m == 0 {
        return Vec::new();
    }

    let picks: Vec<usize> = match init {
        CentroidInit::Spaced => (0..m).map(|i| i * n / m).collect(),
        CentroidInit::Seeded(seed) => {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut picks = rand::seq::index::sample(&mut rng, n, m).into_vec();
            picks.sort_unstable();
            picks
        }
    };

    picks.into_iter().map(|i| hist.entries()[i].color).collect()
}
