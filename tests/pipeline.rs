//! End-to-end pipeline tests against an in-memory grid database.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use starsift::{
    build_learning_set, split_learning_set, FrequencyUnit, GridDb, MatchPolicy, ObservedMode,
    ObservedModes, SamplerError, SamplingConfig, Selection, SplitFractions,
};

/// Three dipole zonal modes at [1.0, 1.5, 2.2] cd. The matching window is
/// [0.75, 2.55]: half the first spacing below, half the last above.
fn observed_three() -> ObservedModes {
    let modes = [(14, 1.0), (15, 1.5), (16, 2.2)]
        .into_iter()
        .map(|(n, freq)| ObservedMode {
            l: 1,
            m: 0,
            n,
            freq,
            freq_unit: FrequencyUnit::CyclesPerDay,
        })
        .collect();
    ObservedModes::new(modes).unwrap()
}

/// Two candidate models under one rotation rate. Model 1 has exactly three
/// dipole rows inside the window; model 2 has five.
fn two_candidate_grid() -> GridDb {
    let mut db = GridDb::open_in_memory().unwrap();
    db.execute_batch(
        "CREATE TABLE models (
             id INTEGER PRIMARY KEY,
             M_ini REAL, fov REAL, Z REAL, logD REAL, Xc REAL,
             log_Teff REAL, log_g REAL
         );
         INSERT INTO models (id, M_ini, fov, Z, logD, Xc, log_Teff, log_g) VALUES
             (1, 3.2, 0.014, 0.012, 2.5, 0.52, 4.10, 4.0),
             (2, 4.1, 0.022, 0.016, 1.0, 0.47, 4.20, 4.1);
         CREATE TABLE rotation_rates (id INTEGER PRIMARY KEY, eta REAL NOT NULL);
         INSERT INTO rotation_rates VALUES (1, 12.5);
         CREATE TABLE mode_types (id INTEGER PRIMARY KEY, l INTEGER, m INTEGER);
         INSERT INTO mode_types VALUES (0, 0, 0), (7, 1, 0);
         CREATE TABLE modes (
             id_model INTEGER, id_rot INTEGER, n INTEGER, id_type INTEGER, freq REAL
         );
         INSERT INTO modes VALUES
             -- model 1: three dipole rows in the window, two outside,
             -- one radial row the type filter must drop
             (1, 1, -20, 7, 0.50),
             (1, 1, -16, 7, 0.95),
             (1, 1, -15, 7, 1.55),
             (1, 1, -14, 7, 2.10),
             (1, 1, -13, 7, 2.90),
             (1, 1,   1, 0, 1.10),
             -- model 2: five dipole rows in the window
             (2, 1, -18, 7, 0.90),
             (2, 1, -17, 7, 1.20),
             (2, 1, -16, 7, 1.50),
             (2, 1, -15, 7, 1.90),
             (2, 1, -14, 7, 2.30);",
    )
    .unwrap();
    db
}

fn pipeline_config() -> SamplingConfig {
    SamplingConfig {
        selection: Selection::Constrained {
            range_log_teff: (4.0, 4.3),
            range_log_g: (3.5, 4.5),
            range_eta: (0.0, 50.0),
        },
        max_sample_size: 0,
        mode_type_ids: vec![7],
        mode_freq_range: (0.0, 5.0),
        grid_freq_unit: FrequencyUnit::CyclesPerDay,
        policy: MatchPolicy::PeriodSpacingStrict,
        match_from_lowest: true,
        exclude_eta_column: false,
    }
}

#[test]
fn build_accepts_one_of_two_candidates() {
    let mut db = two_candidate_grid();
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let observed = observed_three();

    let set = build_learning_set(&mut db, &pipeline_config(), &observed, &mut rng).unwrap();

    // Model 2's window holds five rows, so only model 1 survives.
    assert_eq!(set.len(), 1);
    assert_eq!(
        set.feature_names(),
        &["M_ini", "fov", "Z", "logD", "Xc", "eta"]
    );
    assert_eq!(set.features()[0], vec![3.2, 0.014, 0.012, 2.5, 0.52, 12.5]);
    assert_eq!(set.targets()[0], vec![0.95, 1.55, 2.10]);
}

#[test]
fn eta_column_can_be_excluded() {
    let mut db = two_candidate_grid();
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let observed = observed_three();
    let mut config = pipeline_config();
    config.exclude_eta_column = true;

    let set = build_learning_set(&mut db, &config, &observed, &mut rng).unwrap();
    assert_eq!(set.feature_names(), &["M_ini", "fov", "Z", "logD", "Xc"]);
    assert_eq!(set.features()[0].len(), 5);
}

#[test]
fn repeated_builds_redefine_the_prepared_statement() {
    let mut db = two_candidate_grid();
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let observed = observed_three();
    let config = pipeline_config();

    // A second build on the same session must deallocate and redefine the
    // per-candidate statement instead of tripping over the leftover name.
    let first = build_learning_set(&mut db, &config, &observed, &mut rng).unwrap();
    let second = build_learning_set(&mut db, &config, &observed, &mut rng).unwrap();
    assert_eq!(first.len(), 1);
    assert_eq!(second.len(), 1);
}

#[test]
fn all_rejected_candidates_abort_the_build() {
    let mut db = two_candidate_grid();
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    // Shift the observations so no candidate's window count matches.
    let modes = [(10, 3.0), (11, 3.5), (12, 4.2)]
        .into_iter()
        .map(|(n, freq)| ObservedMode {
            l: 1,
            m: 0,
            n,
            freq,
            freq_unit: FrequencyUnit::CyclesPerDay,
        })
        .collect();
    let observed = ObservedModes::new(modes).unwrap();

    assert!(matches!(
        build_learning_set(&mut db, &pipeline_config(), &observed, &mut rng),
        Err(SamplerError::EmptyResult(_))
    ));
}

#[test]
fn missing_table_is_a_fatal_storage_error() {
    let mut db = GridDb::open_in_memory().unwrap();
    db.execute_batch(
        "CREATE TABLE models (
             id INTEGER PRIMARY KEY,
             M_ini REAL, fov REAL, Z REAL, logD REAL, Xc REAL,
             log_Teff REAL, log_g REAL
         );
         INSERT INTO models (id, M_ini, fov, Z, logD, Xc, log_Teff, log_g)
             VALUES (1, 3.2, 0.014, 0.012, 2.5, 0.52, 4.10, 4.0);",
    )
    .unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let observed = observed_three();

    assert!(matches!(
        build_learning_set(&mut db, &pipeline_config(), &observed, &mut rng),
        Err(SamplerError::Storage(_))
    ));
}

#[test]
fn built_set_splits_without_loss() {
    let mut db = two_candidate_grid();
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let observed = observed_three();

    let set = build_learning_set(&mut db, &pipeline_config(), &observed, &mut rng).unwrap();
    let fractions = SplitFractions::new(1.0, 0.0, 0.0).unwrap();
    let split = split_learning_set(&set, &fractions, &mut rng).unwrap();

    assert_eq!(split.training.len(), 1);
    assert!(split.validation.is_empty());
    assert!(split.test.is_empty());
    assert_eq!(split.training.targets()[0], set.targets()[0]);
}
