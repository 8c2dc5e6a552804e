use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SamplerError};

// ---------------------------------------------------------------------------
// FrequencyUnit – unit of a pulsation frequency
// ---------------------------------------------------------------------------

/// Unit of a pulsation frequency. Conversions bridge through the value of
/// one unit expressed in Hz, so any pair of units needs a single ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrequencyUnit {
    /// Cycles per day (`"cd"`) – the convention of the observed mode lists.
    #[serde(rename = "cd")]
    CyclesPerDay,
    /// Micro-Hertz (`"muHz"`) – common for grid pipeline output.
    #[serde(rename = "muHz")]
    MicroHz,
    /// Hertz.
    #[serde(rename = "Hz")]
    Hz,
}

impl FrequencyUnit {
    /// The value of 1 of this unit, expressed in Hz.
    pub fn in_hz(self) -> f64 {
        match self {
            FrequencyUnit::CyclesPerDay => 1.0 / 86_400.0,
            FrequencyUnit::MicroHz => 1.0e-6,
            FrequencyUnit::Hz => 1.0,
        }
    }

    /// Divisor taking a value in `self` to a value in `target`:
    /// `value_in_target = value_in_self / self.divisor_to(target)`.
    pub fn divisor_to(self, target: FrequencyUnit) -> f64 {
        target.in_hz() / self.in_hz()
    }
}

impl fmt::Display for FrequencyUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FrequencyUnit::CyclesPerDay => "cd",
            FrequencyUnit::MicroHz => "muHz",
            FrequencyUnit::Hz => "Hz",
        };
        write!(f, "{s}")
    }
}

impl FromStr for FrequencyUnit {
    type Err = SamplerError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "cd" => Ok(FrequencyUnit::CyclesPerDay),
            "muHz" => Ok(FrequencyUnit::MicroHz),
            "Hz" => Ok(FrequencyUnit::Hz),
            other => Err(SamplerError::invalid_argument(format!(
                "unknown frequency unit \"{other}\""
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// ObservedMode – one entry of the fixed observed mode list
// ---------------------------------------------------------------------------

/// One observed oscillation mode: spherical-harmonic identification plus a
/// measured frequency.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObservedMode {
    /// Degree `l`.
    pub l: i64,
    /// Azimuthal order `m`.
    pub m: i64,
    /// Radial order `n`.
    pub n: i64,
    /// Measured frequency, in `freq_unit`.
    pub freq: f64,
    /// Unit of `freq`.
    pub freq_unit: FrequencyUnit,
}

/// The fixed observed mode list the whole pipeline matches against.
///
/// Validated on construction: non-empty, strictly ascending in frequency
/// (the matching window derives from *adjacent* spacings), and one
/// frequency unit throughout.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservedModes {
    modes: Vec<ObservedMode>,
}

impl ObservedModes {
    pub fn new(modes: Vec<ObservedMode>) -> Result<Self> {
        if modes.is_empty() {
            return Err(SamplerError::config("observed mode list is empty"));
        }
        let unit = modes[0].freq_unit;
        if modes.iter().any(|mode| mode.freq_unit != unit) {
            return Err(SamplerError::config(
                "observed modes mix more than one frequency unit",
            ));
        }
        for pair in modes.windows(2) {
            if pair[1].freq <= pair[0].freq {
                return Err(SamplerError::config(format!(
                    "observed frequencies must be strictly ascending, got {} after {}",
                    pair[1].freq, pair[0].freq
                )));
            }
        }
        Ok(ObservedModes { modes })
    }

    /// Number of observed modes; also the row width of the target matrix.
    pub fn len(&self) -> usize {
        self.modes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }

    pub fn modes(&self) -> &[ObservedMode] {
        &self.modes
    }

    /// The single unit shared by every observed frequency.
    pub fn unit(&self) -> FrequencyUnit {
        self.modes[0].freq_unit
    }

    /// Observed frequencies, ascending.
    pub fn frequencies(&self) -> Vec<f64> {
        self.modes.iter().map(|mode| mode.freq).collect()
    }

    /// The single (l, m) pair shared by every mode, if there is one.
    pub fn uniform_degree_pair(&self) -> Option<(i64, i64)> {
        let pair = (self.modes[0].l, self.modes[0].m);
        self.modes
            .iter()
            .all(|mode| (mode.l, mode.m) == pair)
            .then_some(pair)
    }
}

// ---------------------------------------------------------------------------
// Grid-side rows
// ---------------------------------------------------------------------------

/// A (model id, rotation-rate id) pair under consideration for the
/// learning set. Ephemeral: lives for one pipeline run only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub id_model: i64,
    pub id_rot: i64,
}

/// Static per-model grid attributes, keyed by `models.id`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelAttributes {
    /// Initial mass.
    pub m_ini: f64,
    /// Overshoot free parameter.
    pub fov: f64,
    /// Metallicity.
    pub z: f64,
    /// Logarithm of the extra diffusive mixing coefficient.
    pub log_d: f64,
    /// Central hydrogen mass fraction.
    pub xc: f64,
}

impl ModelAttributes {
    /// The attribute tuple in storage column order.
    pub fn as_row(&self) -> [f64; 5] {
        [self.m_ini, self.fov, self.z, self.log_d, self.xc]
    }
}

/// Names of the five static attribute columns, in storage order.
pub const ATTRIBUTE_NAMES: [&str; 5] = ["M_ini", "fov", "Z", "logD", "Xc"];

/// Name of the optional rotation-rate feature column.
pub const ETA_COLUMN: &str = "eta";

/// One theoretical mode row as fetched per candidate from the `modes`
/// table. `freq` is in the grid's storage unit (see
/// [`crate::config::SamplingConfig::grid_freq_unit`]); it is normalised to
/// the observed unit only at final assembly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TheoreticalMode {
    pub id_model: i64,
    pub id_rot: i64,
    /// Radial order.
    pub n: i64,
    /// Storage-side encoding of the (l, m) pair.
    pub id_type: i64,
    pub freq: f64,
}

// ---------------------------------------------------------------------------
// LearningSet – the assembled (features, targets) pair
// ---------------------------------------------------------------------------

/// Parallel feature/target matrices accumulated over accepted candidates.
///
/// Write-once: a `LearningSet` is only constructible fully formed and is
/// read through accessors afterwards, so a value in hand is always a valid,
/// finished set.
#[derive(Debug, Clone, PartialEq)]
pub struct LearningSet {
    feature_names: Vec<String>,
    features: Vec<Vec<f64>>,
    targets: Vec<Vec<f64>>,
}

impl LearningSet {
    /// Build a set from already-parallel matrices. Row counts must agree,
    /// every feature row must match `feature_names` in width, and target
    /// rows must share one width.
    pub fn new(
        feature_names: Vec<String>,
        features: Vec<Vec<f64>>,
        targets: Vec<Vec<f64>>,
    ) -> Result<Self> {
        if features.len() != targets.len() {
            return Err(SamplerError::config(format!(
                "feature matrix has {} rows but target matrix has {}",
                features.len(),
                targets.len()
            )));
        }
        if let Some(row) = features.iter().find(|row| row.len() != feature_names.len()) {
            return Err(SamplerError::config(format!(
                "feature row width {} does not match the {} feature names",
                row.len(),
                feature_names.len()
            )));
        }
        let target_width = targets.first().map_or(0, Vec::len);
        if targets.iter().any(|row| row.len() != target_width) {
            return Err(SamplerError::config("target rows have inconsistent widths"));
        }
        Ok(LearningSet {
            feature_names,
            features,
            targets,
        })
    }

    /// Number of rows (accepted candidates).
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn features(&self) -> &[Vec<f64>] {
        &self.features
    }

    pub fn targets(&self) -> &[Vec<f64>] {
        &self.targets
    }
}

/// Random, disjoint, exhaustive partition of a parent [`LearningSet`].
#[derive(Debug, Clone, PartialEq)]
pub struct LearningSplit {
    pub training: LearningSet,
    pub validation: LearningSet,
    pub test: LearningSet,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
