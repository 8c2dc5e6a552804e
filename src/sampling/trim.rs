use std::collections::HashMap;
use std::fmt;

use crate::config::{MatchPolicy, SamplingConfig};
use crate::data::model::{FrequencyUnit, ObservedModes, TheoreticalMode};
use crate::error::{Result, SamplerError};

// ---------------------------------------------------------------------------
// Trim outcome
// ---------------------------------------------------------------------------

/// Result of matching one candidate's theoretical mode list against the
/// observations.
///
/// Rejection is an expected outcome, not an error: the caller skips the
/// candidate and continues. Only configuration problems and unsupported
/// policies are `Err`.
#[derive(Debug, Clone, PartialEq)]
pub enum TrimOutcome {
    /// Exactly one theoretical row per observed mode, frequency-ascending.
    Matched(Vec<TheoreticalMode>),
    Rejected(RejectReason),
}

/// Why a candidate failed to match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// The observed (l, m) pair has no mode-type id in the lookup table.
    UnknownModeType { l: i64, m: i64 },
    /// No theoretical row carries the required mode-type id.
    NoTypeMatch { id_type: i64 },
    /// Fewer theoretical rows than observed modes.
    TooFewRows { have: usize, need: usize },
    /// The frequency window selected a different number of rows than there
    /// are observed modes.
    CountMismatch { selected: usize, expected: usize },
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::UnknownModeType { l, m } => {
                write!(f, "no mode-type id for observed (l={l}, m={m})")
            }
            RejectReason::NoTypeMatch { id_type } => {
                write!(f, "no theoretical row of mode type {id_type}")
            }
            RejectReason::TooFewRows { have, need } => {
                write!(f, "{have} theoretical rows for {need} observed modes")
            }
            RejectReason::CountMismatch { selected, expected } => {
                write!(f, "window selected {selected} rows, expected {expected}")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Policy dispatch
// ---------------------------------------------------------------------------

/// Trim one candidate's theoretical mode list to the shape of the observed
/// list, under the configured matching policy.
pub fn trim_modes(
    config: &SamplingConfig,
    observed: &ObservedModes,
    rows: &[TheoreticalMode],
    mode_type_lookup: &HashMap<(i64, i64), i64>,
) -> Result<TrimOutcome> {
    match config.policy {
        MatchPolicy::Free => Err(SamplerError::Unsupported(
            "free frequency search has no defined matching rule",
        )),
        MatchPolicy::PeriodSpacingStrict => {
            trim_by_period_spacing(config, observed, rows, mode_type_lookup)
        }
        MatchPolicy::FrequencySpacingStrict => Err(SamplerError::Unsupported(
            "frequency-spacing search has no defined matching rule",
        )),
    }
}

/// Period-spacing-strict matching.
///
/// The observed modes must form a single (l, m) ridge. Theoretical rows are
/// filtered to the corresponding mode-type id, then counted inside an
/// inclusive frequency window padded by half the *adjacent* observed
/// spacing at each end. Only an exact count match is accepted.
///
/// The window is symmetric in derivation, so it serves matching from the
/// lowest observed frequency upward and from the highest downward alike
/// (`match_from_lowest` selects the orientation).
fn trim_by_period_spacing(
    config: &SamplingConfig,
    observed: &ObservedModes,
    rows: &[TheoreticalMode],
    mode_type_lookup: &HashMap<(i64, i64), i64>,
) -> Result<TrimOutcome> {
    // Unit problems are run-wide configuration mistakes, never a
    // per-candidate condition; fail hard before looking at the rows.
    let obs_unit = observed.unit();
    if obs_unit != FrequencyUnit::CyclesPerDay {
        return Err(SamplerError::config(format!(
            "period-spacing matching expects observed frequencies in cd, got {obs_unit}"
        )));
    }
    if config.grid_freq_unit != obs_unit {
        return Err(SamplerError::config(format!(
            "grid frequencies are in {} but observations are in {obs_unit}; \
             matching does not convert units",
            config.grid_freq_unit
        )));
    }

    let n_modes = observed.len();
    if n_modes < 2 {
        return Err(SamplerError::config(
            "period-spacing matching needs at least two observed modes",
        ));
    }
    let (l, m) = observed.uniform_degree_pair().ok_or_else(|| {
        SamplerError::config("observed modes span more than one (l, m) pair")
    })?;

    if rows.len() < n_modes {
        return Ok(TrimOutcome::Rejected(RejectReason::TooFewRows {
            have: rows.len(),
            need: n_modes,
        }));
    }

    let Some(&id_type) = mode_type_lookup.get(&(l, m)) else {
        return Ok(TrimOutcome::Rejected(RejectReason::UnknownModeType { l, m }));
    };

    let of_type: Vec<TheoreticalMode> = rows
        .iter()
        .filter(|row| row.id_type == id_type)
        .copied()
        .collect();
    if of_type.is_empty() {
        return Ok(TrimOutcome::Rejected(RejectReason::NoTypeMatch { id_type }));
    }
    if of_type.len() < n_modes {
        return Ok(TrimOutcome::Rejected(RejectReason::TooFewRows {
            have: of_type.len(),
            need: n_modes,
        }));
    }

    let freqs = observed.frequencies();
    let spacing_lo = freqs[1] - freqs[0];
    let spacing_hi = freqs[n_modes - 1] - freqs[n_modes - 2];
    let window_lo = freqs[0] - spacing_lo / 2.0;
    let window_hi = freqs[n_modes - 1] + spacing_hi / 2.0;

    let in_window: Vec<TheoreticalMode> = of_type
        .into_iter()
        .filter(|row| row.freq >= window_lo && row.freq <= window_hi)
        .collect();
    if in_window.len() != n_modes {
        return Ok(TrimOutcome::Rejected(RejectReason::CountMismatch {
            selected: in_window.len(),
            expected: n_modes,
        }));
    }

    Ok(TrimOutcome::Matched(in_window))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Selection;
    use crate::data::model::ObservedMode;

    fn observed(freqs: &[f64]) -> ObservedModes {
        let modes = freqs
            .iter()
            .enumerate()
            .map(|(k, &freq)| ObservedMode {
                l: 1,
                m: 0,
                n: 10 + k as i64,
                freq,
                freq_unit: FrequencyUnit::CyclesPerDay,
            })
            .collect();
        ObservedModes::new(modes).unwrap()
    }

    fn row(id_type: i64, freq: f64) -> TheoreticalMode {
        TheoreticalMode {
            id_model: 1,
            id_rot: 1,
            n: 0,
            id_type,
            freq,
        }
    }

    fn lookup() -> HashMap<(i64, i64), i64> {
        HashMap::from([((1, 0), 7), ((0, 0), 0)])
    }

    fn config(policy: MatchPolicy) -> SamplingConfig {
        SamplingConfig {
            selection: Selection::Unconstrained,
            max_sample_size: 10,
            mode_type_ids: vec![7],
            mode_freq_range: (0.0, 10.0),
            grid_freq_unit: FrequencyUnit::CyclesPerDay,
            policy,
            match_from_lowest: true,
            exclude_eta_column: false,
        }
    }

    #[test]
    fn exact_count_is_accepted_in_order() {
        // Observed [1.0, 1.5, 2.2] gives window [0.75, 2.55]: half of the
        // first spacing below, half of the last spacing above.
        let obs = observed(&[1.0, 1.5, 2.2]);
        let rows = vec![
            row(7, 0.50), // below the window
            row(7, 0.95),
            row(0, 1.10), // wrong type, ignored
            row(7, 1.55),
            row(7, 2.10),
            row(7, 2.90), // above the window
        ];
        let outcome = trim_modes(&config(MatchPolicy::PeriodSpacingStrict), &obs, &rows, &lookup())
            .unwrap();
        match outcome {
            TrimOutcome::Matched(kept) => {
                let freqs: Vec<f64> = kept.iter().map(|r| r.freq).collect();
                assert_eq!(freqs, vec![0.95, 1.55, 2.10]);
            }
            other => panic!("expected a match, got {other:?}"),
        }
    }

    #[test]
    fn window_boundaries_are_inclusive() {
        let obs = observed(&[1.0, 1.5, 2.2]);
        let rows = vec![row(7, 0.75), row(7, 1.5), row(7, 2.55)];
        let outcome = trim_modes(&config(MatchPolicy::PeriodSpacingStrict), &obs, &rows, &lookup())
            .unwrap();
        assert!(matches!(outcome, TrimOutcome::Matched(_)));
    }

    #[test]
    fn surplus_rows_in_window_are_rejected() {
        let obs = observed(&[1.0, 1.5, 2.2]);
        let rows = vec![
            row(7, 0.90),
            row(7, 1.20),
            row(7, 1.50),
            row(7, 1.90),
            row(7, 2.30),
        ];
        let outcome = trim_modes(&config(MatchPolicy::PeriodSpacingStrict), &obs, &rows, &lookup())
            .unwrap();
        assert_eq!(
            outcome,
            TrimOutcome::Rejected(RejectReason::CountMismatch {
                selected: 5,
                expected: 3
            })
        );
    }

    #[test]
    fn short_lists_are_rejected_not_fatal() {
        let obs = observed(&[1.0, 1.5, 2.2]);
        let rows = vec![row(7, 1.0), row(7, 1.5)];
        let outcome = trim_modes(&config(MatchPolicy::PeriodSpacingStrict), &obs, &rows, &lookup())
            .unwrap();
        assert_eq!(
            outcome,
            TrimOutcome::Rejected(RejectReason::TooFewRows { have: 2, need: 3 })
        );
    }

    #[test]
    fn wrong_type_only_lists_are_rejected() {
        let obs = observed(&[1.0, 1.5, 2.2]);
        let rows = vec![row(0, 1.0), row(0, 1.5), row(0, 2.2)];
        let outcome = trim_modes(&config(MatchPolicy::PeriodSpacingStrict), &obs, &rows, &lookup())
            .unwrap();
        assert_eq!(
            outcome,
            TrimOutcome::Rejected(RejectReason::NoTypeMatch { id_type: 7 })
        );
    }

    #[test]
    fn unknown_degree_pair_is_rejected() {
        let obs = observed(&[1.0, 1.5, 2.2]);
        let rows = vec![row(7, 1.0), row(7, 1.5), row(7, 2.2)];
        let empty = HashMap::new();
        let outcome = trim_modes(&config(MatchPolicy::PeriodSpacingStrict), &obs, &rows, &empty)
            .unwrap();
        assert_eq!(
            outcome,
            TrimOutcome::Rejected(RejectReason::UnknownModeType { l: 1, m: 0 })
        );
    }

    #[test]
    fn unit_mismatch_is_a_hard_error() {
        let obs = observed(&[1.0, 1.5, 2.2]);
        let rows = vec![row(7, 1.0), row(7, 1.5), row(7, 2.2)];
        let mut cfg = config(MatchPolicy::PeriodSpacingStrict);
        cfg.grid_freq_unit = FrequencyUnit::MicroHz;
        assert!(matches!(
            trim_modes(&cfg, &obs, &rows, &lookup()),
            Err(SamplerError::Config(_))
        ));
    }

    #[test]
    fn undefined_policies_are_unsupported() {
        let obs = observed(&[1.0, 1.5, 2.2]);
        for policy in [MatchPolicy::Free, MatchPolicy::FrequencySpacingStrict] {
            assert!(matches!(
                trim_modes(&config(policy), &obs, &[], &lookup()),
                Err(SamplerError::Unsupported(_))
            ));
        }
    }
}
