use serde::{Deserialize, Serialize};

use crate::data::model::FrequencyUnit;
use crate::error::{Result, SamplerError};

// ---------------------------------------------------------------------------
// Matching policy and selection strategy
// ---------------------------------------------------------------------------

/// Frequency-matching policy, selected once for the whole pipeline run.
///
/// Exactly one policy applies by construction; the free and
/// frequency-spacing searches have no defined acceptance rule and fail with
/// [`SamplerError::Unsupported`](crate::error::SamplerError) when selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPolicy {
    /// Unrestricted matching.
    Free,
    /// Match a period-spacing series of a single (l, m) ridge.
    PeriodSpacingStrict,
    /// Match by regularities in frequency spacing.
    FrequencySpacingStrict,
}

/// How candidate (model, rotation) pairs are drawn from the grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Selection {
    /// Cross product of the model ids and rotation ids matching three
    /// inclusive ranges.
    Constrained {
        range_log_teff: (f64, f64),
        range_log_g: (f64, f64),
        /// Rotation rate in percent of critical (break-up) rotation.
        range_eta: (f64, f64),
    },
    /// Cross product over every model id and every rotation id in storage.
    Unconstrained,
}

// ---------------------------------------------------------------------------
// SamplingConfig – every knob of one run, checked up front
// ---------------------------------------------------------------------------

/// The full configuration of one sampling run. Fields are enumerated and
/// range-checked in [`validate`](SamplingConfig::validate) before any
/// storage round trip; nothing is validated lazily at use time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplingConfig {
    pub selection: Selection,
    /// Truncate the candidate list to this many pairs. 0 keeps the full
    /// cross product (constrained selection only – unconstrained selection
    /// requires a positive size).
    pub max_sample_size: usize,
    /// Mode-type ids the per-candidate frequency query may return.
    pub mode_type_ids: Vec<i64>,
    /// Inclusive frequency scan window of the per-candidate query, in
    /// `grid_freq_unit`.
    pub mode_freq_range: (f64, f64),
    /// Unit of the frequencies stored in the grid.
    pub grid_freq_unit: FrequencyUnit,
    pub policy: MatchPolicy,
    /// Match starting from the lowest observed frequency rather than the
    /// highest.
    pub match_from_lowest: bool,
    /// Drop the eta column from the features. Needed when every sampled
    /// rotation rate is identical: a constant column makes the downstream
    /// design matrix singular.
    pub exclude_eta_column: bool,
}

impl SamplingConfig {
    /// Check every field once, before any work starts.
    pub fn validate(&self) -> Result<()> {
        if let Selection::Constrained {
            range_log_teff,
            range_log_g,
            range_eta,
        } = self.selection
        {
            check_range("range_log_teff", range_log_teff)?;
            check_range("range_log_g", range_log_g)?;
            check_range("range_eta", range_eta)?;
        }
        if self.mode_type_ids.is_empty() {
            return Err(SamplerError::config(
                "mode_type_ids must name at least one mode type",
            ));
        }
        check_range("mode_freq_range", self.mode_freq_range)?;
        Ok(())
    }
}

fn check_range(name: &str, range: (f64, f64)) -> Result<()> {
    let (lo, hi) = range;
    if !lo.is_finite() || !hi.is_finite() || lo > hi {
        return Err(SamplerError::config(format!(
            "{name}: [{lo}, {hi}] is not a valid inclusive range"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> SamplingConfig {
        SamplingConfig {
            selection: Selection::Constrained {
                range_log_teff: (4.0, 4.3),
                range_log_g: (3.5, 4.5),
                range_eta: (0.0, 50.0),
            },
            max_sample_size: 0,
            mode_type_ids: vec![1],
            mode_freq_range: (0.3, 5.0),
            grid_freq_unit: FrequencyUnit::CyclesPerDay,
            policy: MatchPolicy::PeriodSpacingStrict,
            match_from_lowest: true,
            exclude_eta_column: false,
        }
    }

    #[test]
    fn valid_config_passes() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn inverted_range_is_rejected() {
        let mut config = base_config();
        config.selection = Selection::Constrained {
            range_log_teff: (4.3, 4.0),
            range_log_g: (3.5, 4.5),
            range_eta: (0.0, 50.0),
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_mode_types_are_rejected() {
        let mut config = base_config();
        config.mode_type_ids.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = base_config();
        let text = serde_json::to_string(&config).unwrap();
        let back: SamplingConfig = serde_json::from_str(&text).unwrap();
        assert_eq!(back.mode_type_ids, config.mode_type_ids);
        assert_eq!(back.policy, config.policy);
    }
}
