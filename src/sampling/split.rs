use log::info;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::data::model::{LearningSet, LearningSplit};
use crate::error::{Result, SamplerError};

/// Tolerance on the three fractions summing to one.
const SUM_TOLERANCE: f64 = 1e-5;

// ---------------------------------------------------------------------------
// SplitFractions – validated training/validation/test proportions
// ---------------------------------------------------------------------------

/// Training/validation/test proportions, each in [0, 1] and summing to one
/// within [`SUM_TOLERANCE`]. Only constructible valid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitFractions {
    training: f64,
    validation: f64,
    test: f64,
}

impl SplitFractions {
    pub fn new(training: f64, validation: f64, test: f64) -> Result<Self> {
        for (name, value) in [
            ("training", training),
            ("validation", validation),
            ("test", test),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(SamplerError::config(format!(
                    "{name} fraction {value} is outside [0, 1]"
                )));
            }
        }
        let sum = training + validation + test;
        if (1.0 - sum).abs() > SUM_TOLERANCE {
            return Err(SamplerError::config(format!(
                "split fractions sum to {sum}, expected 1 within {SUM_TOLERANCE}"
            )));
        }
        Ok(SplitFractions {
            training,
            validation,
            test,
        })
    }
}

// ---------------------------------------------------------------------------
// Splitting
// ---------------------------------------------------------------------------

/// Partition a learning set into training/validation/test sets.
///
/// One uniformly shuffled permutation of the row indices is sliced into
/// three contiguous blocks, so the partitions are pairwise disjoint and
/// together cover every row exactly once. Each partition is an independent
/// copy; the parent set is left untouched.
pub fn split_learning_set(
    set: &LearningSet,
    fractions: &SplitFractions,
    rng: &mut impl Rng,
) -> Result<LearningSplit> {
    let n = set.len();
    if n == 0 {
        return Err(SamplerError::config("cannot split an empty learning set"));
    }
    let (n_train, n_valid, n_test) = partition_sizes(n, fractions)?;

    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(rng);

    let training = gather(set, &indices[..n_train])?;
    let validation = gather(set, &indices[n_train..n_train + n_valid])?;
    let test = gather(set, &indices[n_train + n_valid..])?;

    info!("split {n} rows into {n_train}/{n_valid}/{n_test} training/validation/test");
    Ok(LearningSplit {
        training,
        validation,
        test,
    })
}

/// Integer partition sizes by truncation; the rounding remainder is
/// absorbed entirely into the training partition.
fn partition_sizes(n: usize, fractions: &SplitFractions) -> Result<(usize, usize, usize)> {
    let n_valid = (n as f64 * fractions.validation) as usize;
    let n_test = (n as f64 * fractions.test) as usize;
    let mut n_train = (n as f64 * fractions.training) as usize;
    if n_train + n_valid + n_test != n {
        n_train = n.checked_sub(n_valid + n_test).ok_or_else(|| {
            SamplerError::config("split fractions overshoot the row count")
        })?;
    }
    Ok((n_train, n_valid, n_test))
}

/// Copy the selected rows out of the parent set (no aliasing).
fn gather(set: &LearningSet, indices: &[usize]) -> Result<LearningSet> {
    let features = indices.iter().map(|&i| set.features()[i].clone()).collect();
    let targets = indices.iter().map(|&i| set.targets()[i].clone()).collect();
    LearningSet::new(set.feature_names().to_vec(), features, targets)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
