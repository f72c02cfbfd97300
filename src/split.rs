//! Train/holdout partitioning.

use crate::error::{Error, Result};
use crate::pipeline::{FeatureRow, FeatureTable};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Shuffle `table` with `seed` and cut it at `floor(len * train_ratio)`.
///
/// The two tables are disjoint and together hold every row of `table`.
///
/// # Example
/// ```no_run
/// # use vn_sentiment::split::random_split;
/// # fn demo(table: &vn_sentiment::FeatureTable) -> vn_sentiment::Result<()> {
/// let (train, test) = random_split(table, 0.7, 42)?;
/// println!("Train: {}, Test: {}", train.len(), test.len());
/// # Ok(())
/// # }
/// ```
pub fn random_split(
    table: &FeatureTable,
    train_ratio: f64,
    seed: u64,
) -> Result<(FeatureTable, FeatureTable)> {
    if !(train_ratio > 0.0 && train_ratio < 1.0) {
        return Err(Error::InvalidConfig(format!(
            "train split must be in (0, 1), got {}",
            train_ratio
        )));
    }

    let mut order: Vec<usize> = (0..table.len()).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    order.shuffle(&mut rng);

    let cut = (table.len() as f64 * train_ratio) as usize;
    let pick = |ids: &[usize]| -> Vec<FeatureRow> {
        ids.iter().map(|&i| table.rows[i].clone()).collect()
    };

    let train = table.with_rows(pick(&order[..cut]));
    let test = table.with_rows(pick(&order[cut..]));
    Ok((train, test))
}

/// Draw a fresh seed for runs that do not configure one.
pub fn draw_seed() -> u64 {
    rand::random()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{FitId, SparseVector};

    fn table(n: usize) -> FeatureTable {
        let rows = (0..n)
            .map(|i| FeatureRow {
                label: i % 3,
                features: SparseVector::from_pairs(n, vec![(i, 1.0)]),
            })
            .collect();
        FeatureTable {
            fit_id: FitId(1),
            dim: n,
            labels: vec!["positive".into(), "negative".into(), "neutral".into()],
            rows,
            zero_rows: 0,
        }
    }

    #[test]
    fn test_split_is_disjoint_and_complete() {
        let t = table(101);
        let (train, test) = random_split(&t, 0.7, 7).unwrap();
        assert_eq!(train.len() + test.len(), 101);
        assert_eq!(train.len(), 70);

        // Each row carries a unique feature index, so use it as a row id.
        let mut ids: Vec<usize> = train
            .rows
            .iter()
            .chain(test.rows.iter())
            .map(|r| r.features.indices()[0])
            .collect();
        ids.sort_unstable();
        assert_eq!(ids, (0..101).collect::<Vec<_>>());
    }

    #[test]
    fn test_same_seed_same_split() {
        let t = table(50);
        let (a, _) = random_split(&t, 0.5, 99).unwrap();
        let (b, _) = random_split(&t, 0.5, 99).unwrap();
        assert_eq!(a.rows, b.rows);
        assert_eq!(a.fit_id, t.fit_id);
    }

    #[test]
    fn test_invalid_ratio() {
        let t = table(10);
        assert!(random_split(&t, 0.0, 1).is_err());
        assert!(random_split(&t, 1.0, 1).is_err());
        assert!(random_split(&t, f64::NAN, 1).is_err());
    }
}
