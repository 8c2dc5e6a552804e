//! SQL text builders for the grid schema.
//!
//! Placeholders are positional `?`; the doc comment of each builder states
//! the binding order. Table and column names are fixed by the grid schema
//! (`models`, `rotation_rates`, `mode_types`, `modes`).

/// SELECT with one inclusive BETWEEN constraint per key. Binds two
/// parameters per key, `(lo, hi)` pairs in key order.
pub fn with_constraints(table: &str, columns: &[&str], keys: &[&str]) -> String {
    debug_assert!(!columns.is_empty() && !keys.is_empty());
    let clauses: Vec<String> = keys
        .iter()
        .map(|key| format!("{key} BETWEEN ? AND ?"))
        .collect();
    format!(
        "SELECT {} FROM {table} WHERE {}",
        columns.join(", "),
        clauses.join(" AND ")
    )
}

/// Batch attribute fetch for a distinct model-id set. Binds `n_ids` ids.
pub fn models_by_ids(n_ids: usize) -> String {
    debug_assert!(n_ids > 0);
    format!(
        "SELECT id, M_ini, fov, Z, logD, Xc FROM models WHERE id IN ({})",
        placeholders(n_ids)
    )
}

/// Body of the reusable per-candidate statement. Binds, in order:
/// `id_model`, `id_rot`, the `n_types` allowed mode-type ids, then the
/// inclusive frequency range `(lo, hi)`.
///
/// Frequency-ascending output is part of the contract: accepted rows must
/// line up with the observed mode list without re-sorting.
pub fn modes_for_candidate(n_types: usize) -> String {
    debug_assert!(n_types > 0);
    format!(
        "SELECT id_model, id_rot, n, id_type, freq FROM modes \
         WHERE id_model = ? AND id_rot = ? AND id_type IN ({}) \
         AND freq BETWEEN ? AND ? ORDER BY freq ASC",
        placeholders(n_types)
    )
}

/// Every id of a table, in a stable order.
pub fn all_ids(table: &str) -> String {
    format!("SELECT id FROM {table} ORDER BY id")
}

fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constrained_select_text() {
        assert_eq!(
            with_constraints("models", &["id"], &["log_Teff", "log_g"]),
            "SELECT id FROM models WHERE log_Teff BETWEEN ? AND ? AND log_g BETWEEN ? AND ?"
        );
        assert_eq!(
            with_constraints("rotation_rates", &["id"], &["eta"]),
            "SELECT id FROM rotation_rates WHERE eta BETWEEN ? AND ?"
        );
    }

    #[test]
    fn candidate_statement_text() {
        assert_eq!(
            modes_for_candidate(2),
            "SELECT id_model, id_rot, n, id_type, freq FROM modes \
             WHERE id_model = ? AND id_rot = ? AND id_type IN (?, ?) \
             AND freq BETWEEN ? AND ? ORDER BY freq ASC"
        );
    }

    #[test]
    fn batch_attribute_text() {
        assert_eq!(
            models_by_ids(3),
            "SELECT id, M_ini, fov, Z, logD, Xc FROM models WHERE id IN (?, ?, ?)"
        );
    }
}
