use log::info;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::{SamplingConfig, Selection};
use crate::data::model::Candidate;
use crate::error::{Result, SamplerError};
use crate::storage::{field_i64, lookup, query, SqlRow, SqlValue, StorageHandle};

// ---------------------------------------------------------------------------
// Candidate selection strategies
// ---------------------------------------------------------------------------

/// Resolve the configured selection strategy into candidate pairs.
///
/// Every returned pair references ids present in storage at call time; an
/// id set with zero members fails fast instead of yielding pairs.
pub fn select_candidates(
    db: &mut impl StorageHandle,
    config: &SamplingConfig,
    rng: &mut impl Rng,
) -> Result<Vec<Candidate>> {
    match config.selection {
        Selection::Constrained {
            range_log_teff,
            range_log_g,
            range_eta,
        } => constrained_pick(
            db,
            range_log_teff,
            range_log_g,
            range_eta,
            config.max_sample_size,
            rng,
        ),
        Selection::Unconstrained => randomly_pick(db, config.max_sample_size, rng),
    }
}

/// Cross product of the model ids and rotation ids matching the inclusive
/// ranges.
///
/// Each id list is shuffled independently before combination, so the pair
/// ordering is randomized but *not* a uniform sample over pairs: the joint
/// order follows the two per-factor shuffles. Downstream statistics were
/// calibrated against this scheme, so it is kept as-is.
fn constrained_pick(
    db: &mut impl StorageHandle,
    range_log_teff: (f64, f64),
    range_log_g: (f64, f64),
    range_eta: (f64, f64),
    max_sample_size: usize,
    rng: &mut impl Rng,
) -> Result<Vec<Candidate>> {
    let q_models = query::with_constraints("models", &["id"], &["log_Teff", "log_g"]);
    let model_params = [
        SqlValue::Real(range_log_teff.0),
        SqlValue::Real(range_log_teff.1),
        SqlValue::Real(range_log_g.0),
        SqlValue::Real(range_log_g.1),
    ];
    let mut ids_models = ids_from(&db.fetch_all(&q_models, &model_params)?)?;
    if ids_models.is_empty() {
        return Err(SamplerError::empty_result(
            "no models match the log_Teff/log_g ranges",
        ));
    }

    let q_rot = query::with_constraints("rotation_rates", &["id"], &["eta"]);
    let rot_params = [SqlValue::Real(range_eta.0), SqlValue::Real(range_eta.1)];
    let mut ids_rot = ids_from(&db.fetch_all(&q_rot, &rot_params)?)?;
    if ids_rot.is_empty() {
        return Err(SamplerError::empty_result(
            "no rotation rates match the eta range",
        ));
    }

    info!(
        "constrained selection: {} models x {} rotation rates",
        ids_models.len(),
        ids_rot.len()
    );

    ids_models.shuffle(rng);
    ids_rot.shuffle(rng);
    Ok(cross_product(&ids_models, &ids_rot, max_sample_size))
}

/// Unrestricted cross product over every model id and rotation id.
fn randomly_pick(
    db: &mut impl StorageHandle,
    max_sample_size: usize,
    rng: &mut impl Rng,
) -> Result<Vec<Candidate>> {
    if max_sample_size < 1 {
        return Err(SamplerError::invalid_argument(
            "unconstrained selection needs a sample size of at least 1",
        ));
    }

    let mut ids_models = lookup::all_model_ids(db)?;
    if ids_models.is_empty() {
        return Err(SamplerError::empty_result("the models table is empty"));
    }
    let mut ids_rot = lookup::all_rotation_ids(db)?;
    if ids_rot.is_empty() {
        return Err(SamplerError::empty_result(
            "the rotation_rates table is empty",
        ));
    }

    ids_models.shuffle(rng);
    ids_rot.shuffle(rng);
    Ok(cross_product(&ids_models, &ids_rot, max_sample_size))
}

fn ids_from(rows: &[SqlRow]) -> Result<Vec<i64>> {
    rows.iter().map(|row| field_i64(row, 0)).collect()
}

/// Outer loop over rotation ids, inner over model ids; stop once a positive
/// cap is reached (equivalent to building the full product and truncating).
fn cross_product(ids_models: &[i64], ids_rot: &[i64], max_sample_size: usize) -> Vec<Candidate> {
    let full = ids_models.len() * ids_rot.len();
    let cap = if max_sample_size > 0 {
        max_sample_size.min(full)
    } else {
        full
    };

    let mut combo = Vec::with_capacity(cap);
    'outer: for &id_rot in ids_rot {
        for &id_model in ids_models {
            if combo.len() == cap {
                break 'outer;
            }
            combo.push(Candidate { id_model, id_rot });
        }
    }
    combo
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
