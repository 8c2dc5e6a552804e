//! The sampling pipeline: candidate selection, mode trimming, learning-set
//! assembly and splitting.
//!
//! ```text
//!   ┌──────────┐   (id_model, id_rot)   ┌───────────┐
//!   │  select  │ ─────────────────────▶ │  builder  │
//!   └──────────┘                        └───────────┘
//!                                          │     ▲
//!                          per candidate   ▼     │ accept / reject
//!                                        ┌───────────┐
//!                                        │   trim    │
//!                                        └───────────┘
//!                                          │
//!                             LearningSet  ▼
//!                                        ┌───────────┐
//!                                        │   split   │  → training / validation / test
//!                                        └───────────┘
//! ```

pub mod builder;
pub mod select;
pub mod split;
pub mod trim;
