/// Data layer: the pipeline's core types and observed-mode input.
///
/// ```text
///  .csv / .json observed modes
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → ObservedModes (validated)
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │    model      │  ObservedModes, Candidate, LearningSet, …
///   └──────────────┘
///        │
///        ▼
///   sampling pipeline (see crate::sampling)
/// ```
pub mod loader;
pub mod model;
