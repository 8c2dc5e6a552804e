use log::{debug, info};
use rand::Rng;

use crate::config::SamplingConfig;
use crate::data::model::{
    LearningSet, ObservedModes, TheoreticalMode, ATTRIBUTE_NAMES, ETA_COLUMN,
};
use crate::error::{Result, SamplerError};
use crate::sampling::select::select_candidates;
use crate::sampling::trim::{trim_modes, TrimOutcome};
use crate::storage::{field_f64, field_i64, lookup, query, SqlRow, SqlValue, StorageHandle};

/// Name of the reusable per-candidate statement.
const MODES_STATEMENT: &str = "modes_from_fixed_id_model_id_rot";

// ---------------------------------------------------------------------------
// Learning-set assembly
// ---------------------------------------------------------------------------

/// Assemble a learning set from the grid.
///
/// Orchestration: resolve candidates, build the rotation and attribute
/// lookups once, then walk the candidates in order, fetching each one's
/// theoretical modes through a single reusable prepared statement and
/// keeping only the candidates the trimmer accepts. Rejection is the
/// expected common case and is skipped silently (a `debug!` notice only);
/// any storage failure aborts the whole build.
pub fn build_learning_set(
    db: &mut impl StorageHandle,
    config: &SamplingConfig,
    observed: &ObservedModes,
    rng: &mut impl Rng,
) -> Result<LearningSet> {
    config.validate()?;
    if observed.is_empty() {
        return Err(SamplerError::config("observed mode set is empty"));
    }

    let candidates = select_candidates(db, config, rng)?;
    if candidates.is_empty() {
        return Err(SamplerError::empty_result(
            "candidate selection returned no (model, rotation) pairs",
        ));
    }
    info!("{} candidate pairs selected", candidates.len());

    // Rotation ids become rate values through the reversed lookup; the
    // canonical 2-decimal string sidesteps float-equality keys.
    let forward = lookup::rotation_rates(db)?;
    let reverse = lookup::reverse_rotation_rates(&forward);
    let mut etas = Vec::with_capacity(candidates.len());
    for candidate in &candidates {
        let canonical = reverse.get(&candidate.id_rot).ok_or_else(|| {
            SamplerError::config(format!(
                "rotation id {} is missing from the rate lookup",
                candidate.id_rot
            ))
        })?;
        let eta: f64 = canonical
            .parse()
            .map_err(|_| SamplerError::decode(format!("rate string \"{canonical}\"")))?;
        etas.push(eta);
    }

    // One batch query for the distinct model ids; repeated ids resolve
    // through the map, so every occurrence sees identical attributes.
    let ids_models: Vec<i64> = candidates.iter().map(|c| c.id_model).collect();
    let attributes = lookup::model_attributes(db, &ids_models)?;

    let mode_type_lookup = lookup::mode_types(db)?;

    // (Re)define the per-candidate statement; a leftover definition from an
    // earlier run on the same session is dropped first.
    if db.has_prepared_statement(MODES_STATEMENT) {
        db.deallocate(MODES_STATEMENT)?;
    }
    db.prepare_named(
        MODES_STATEMENT,
        &query::modes_for_candidate(config.mode_type_ids.len()),
    )?;

    let mut features: Vec<Vec<f64>> = Vec::new();
    let mut targets: Vec<Vec<f64>> = Vec::new();

    for (k, candidate) in candidates.iter().enumerate() {
        let mut params: Vec<SqlValue> = Vec::with_capacity(4 + config.mode_type_ids.len());
        params.push(SqlValue::Integer(candidate.id_model));
        params.push(SqlValue::Integer(candidate.id_rot));
        params.extend(config.mode_type_ids.iter().map(|&id| SqlValue::Integer(id)));
        params.push(SqlValue::Real(config.mode_freq_range.0));
        params.push(SqlValue::Real(config.mode_freq_range.1));

        let rows = db.execute_prepared(MODES_STATEMENT, &params)?;
        let modes: Vec<TheoreticalMode> = rows
            .iter()
            .map(theoretical_mode)
            .collect::<Result<_>>()?;

        match trim_modes(config, observed, &modes, &mode_type_lookup)? {
            TrimOutcome::Matched(kept) => {
                let attrs = attributes.get(&candidate.id_model).ok_or_else(|| {
                    SamplerError::config(format!(
                        "model id {} is missing from the attribute lookup",
                        candidate.id_model
                    ))
                })?;
                let mut feature_row = attrs.as_row().to_vec();
                if !config.exclude_eta_column {
                    feature_row.push(etas[k]);
                }
                features.push(feature_row);
                targets.push(kept.iter().map(|mode| mode.freq).collect());
            }
            TrimOutcome::Rejected(reason) => {
                debug!(
                    "candidate (model {}, rot {}) rejected: {reason}",
                    candidate.id_model, candidate.id_rot
                );
            }
        }
    }

    if features.is_empty() {
        return Err(SamplerError::empty_result(
            "every candidate was rejected during mode matching",
        ));
    }

    // Normalise the accumulated frequencies to the observed unit in one
    // batch pass over the finished matrix, not per accepted row.
    let divisor = config.grid_freq_unit.divisor_to(observed.unit());
    for row in &mut targets {
        for freq in row {
            *freq /= divisor;
        }
    }

    let mut feature_names: Vec<String> =
        ATTRIBUTE_NAMES.iter().map(|name| name.to_string()).collect();
    if !config.exclude_eta_column {
        feature_names.push(ETA_COLUMN.to_string());
    }

    info!(
        "learning set built: {} of {} candidates accepted",
        features.len(),
        candidates.len()
    );
    LearningSet::new(feature_names, features, targets)
}

fn theoretical_mode(row: &SqlRow) -> Result<TheoreticalMode> {
    if row.len() != 5 {
        return Err(SamplerError::decode(format!(
            "mode row has {} columns, expected 5",
            row.len()
        )));
    }
    Ok(TheoreticalMode {
        id_model: field_i64(row, 0)?,
        id_rot: field_i64(row, 1)?,
        n: field_i64(row, 2)?,
        id_type: field_i64(row, 3)?,
        freq: field_f64(row, 4)?,
    })
}
