//! starsift – stellar-grid sampling and learning-set assembly.
//!
//! Samples stellar-model grid data from a relational database, matches
//! theoretical oscillation-mode frequencies against a fixed observed mode
//! list, and assembles training/validation/test datasets for downstream
//! fitting.
//!
//! The pipeline is strictly sequential and blocking: candidate pairs are
//! resolved first, per-model attributes are fetched in one batch, and each
//! candidate's theoretical modes go through a single reusable prepared
//! statement before the trimmer accepts or rejects them. See
//! [`sampling::builder::build_learning_set`] for the orchestration and
//! [`sampling::split::split_learning_set`] for partitioning the result.

pub mod config;
pub mod data;
pub mod error;
pub mod sampling;
pub mod storage;

pub use config::{MatchPolicy, SamplingConfig, Selection};
pub use data::model::{
    Candidate, FrequencyUnit, LearningSet, LearningSplit, ModelAttributes, ObservedMode,
    ObservedModes, TheoreticalMode,
};
pub use error::{Result, SamplerError};
pub use sampling::builder::build_learning_set;
pub use sampling::select::select_candidates;
pub use sampling::split::{split_learning_set, SplitFractions};
pub use sampling::trim::{trim_modes, RejectReason, TrimOutcome};
pub use storage::sqlite::GridDb;
pub use storage::{SqlRow, SqlValue, StorageHandle};
