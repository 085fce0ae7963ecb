use rand::rngs::StdRng;
use rand::seq::index;
use rand::SeedableRng;
use tracing::info;

pub const DEFAULT_SAMPLE_SEED: u64 = 42;

/// Deterministic down-sampling of dataset rows.
pub struct RowSampler {
    limit: usize,
    seed: u64,
}

impl RowSampler {
    /// A `limit` of zero keeps every row.
    pub fn new(limit: usize, seed: u64) -> Self {
        RowSampler { limit, seed }
    }

    /// Sorted indices of the rows to keep out of `total`.
    pub fn sample_indices(&self, total: usize) -> Vec<usize> {
        if self.limit == 0 || total <= self.limit {
            return (0..total).collect();
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut picked = index::sample(&mut rng, total, self.limit).into_vec();
        picked.sort_unstable();

        info!("Sampled {} of {} rows (seed {})", picked.len(), total, self.seed);
        picked
    }

    /// Picks `limit` distinct rows when there are more than that, keeping dataset order.
    pub fn sample<T>(&self, rows: Vec<T>) -> Vec<T> {
        let total = rows.len();
        if self.limit == 0 || total <= self.limit {
            return rows;
        }

        let mut keep = vec![false; total];
        for i in self.sample_indices(total) {
            keep[i] = true;
        }
        rows.into_iter()
            .zip(keep)
            .filter_map(|(row, kept)| kept.then_some(row))
            .collect()
    }
}
