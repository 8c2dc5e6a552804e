//! Pre-materialised lookup tables.
//!
//! Each map is fetched completely, once per run, and consulted in memory
//! afterwards – never re-queried per candidate.

use std::collections::{BTreeSet, HashMap};

use log::info;

use super::{field_f64, field_i64, query, SqlValue, StorageHandle};
use crate::data::model::ModelAttributes;
use crate::error::{Result, SamplerError};

/// (l, m) → mode-type id, from the `mode_types` table.
pub fn mode_types(db: &mut impl StorageHandle) -> Result<HashMap<(i64, i64), i64>> {
    let rows = db.fetch_all("SELECT id, l, m FROM mode_types", &[])?;
    rows.iter()
        .map(|row| {
            Ok((
                (field_i64(row, 1)?, field_i64(row, 2)?),
                field_i64(row, 0)?,
            ))
        })
        .collect()
}

/// Forward rotation lookup: canonical rate string → rotation id.
///
/// Rates are floats in storage and float equality is no basis for a key,
/// so both sides of the reversal go through the fixed 2-decimal string
/// representation.
pub fn rotation_rates(db: &mut impl StorageHandle) -> Result<HashMap<String, i64>> {
    let rows = db.fetch_all("SELECT id, eta FROM rotation_rates", &[])?;
    rows.iter()
        .map(|row| Ok((format!("{:.2}", field_f64(row, 1)?), field_i64(row, 0)?)))
        .collect()
}

/// Reverse rotation lookup (id → canonical rate string), built once per run
/// from the forward map.
pub fn reverse_rotation_rates(forward: &HashMap<String, i64>) -> HashMap<i64, String> {
    forward
        .iter()
        .map(|(eta, id)| (*id, eta.clone()))
        .collect()
}

/// id → static attributes for the *distinct* ids in `ids`, one batch query.
///
/// Duplicate ids collapse before the query; every occurrence of an id in a
/// candidate list resolves to the same fetched tuple, independent of input
/// order.
pub fn model_attributes(
    db: &mut impl StorageHandle,
    ids: &[i64],
) -> Result<HashMap<i64, ModelAttributes>> {
    let distinct: BTreeSet<i64> = ids.iter().copied().collect();
    let sql = query::models_by_ids(distinct.len());
    let params: Vec<SqlValue> = distinct.iter().map(|&id| SqlValue::Integer(id)).collect();
    let rows = db.fetch_all(&sql, &params)?;
    if rows.is_empty() {
        return Err(SamplerError::empty_result(
            "attribute batch matched no models",
        ));
    }
    info!("fetched attributes for {} unique models", rows.len());

    rows.iter()
        .map(|row| {
            Ok((
                field_i64(row, 0)?,
                ModelAttributes {
                    m_ini: field_f64(row, 1)?,
                    fov: field_f64(row, 2)?,
                    z: field_f64(row, 3)?,
                    log_d: field_f64(row, 4)?,
                    xc: field_f64(row, 5)?,
                },
            ))
        })
        .collect()
}

/// Every model id in storage (unconstrained selection).
pub fn all_model_ids(db: &mut impl StorageHandle) -> Result<Vec<i64>> {
    let rows = db.fetch_all(&query::all_ids("models"), &[])?;
    rows.iter().map(|row| field_i64(row, 0)).collect()
}

/// Every rotation-rate id in storage (unconstrained selection).
pub fn all_rotation_ids(db: &mut impl StorageHandle) -> Result<Vec<i64>> {
    let rows = db.fetch_all(&query::all_ids("rotation_rates"), &[])?;
    rows.iter().map(|row| field_i64(row, 0)).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
