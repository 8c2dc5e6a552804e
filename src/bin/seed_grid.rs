//! Generate a small synthetic grid database for demos and manual testing.
//!
//! Usage: `seed_grid <output.db> [seed]`
//!
//! The layout mirrors the production grid schema: `models` with static
//! attributes plus the log_Teff/log_g selection proxies, `rotation_rates`,
//! `mode_types` for the (l, m) encoding, and one frequency comb per
//! (model, rotation, mode type) in `modes`. Frequencies are in cycles per
//! day.

use std::env;

use anyhow::{Context, Result};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rusqlite::{params, Connection};

const SCHEMA: &str = "
CREATE TABLE models (
    id       INTEGER PRIMARY KEY,
    M_ini    REAL NOT NULL,
    fov      REAL NOT NULL,
    Z        REAL NOT NULL,
    logD     REAL NOT NULL,
    Xc       REAL NOT NULL,
    log_Teff REAL NOT NULL,
    log_g    REAL NOT NULL
);
CREATE TABLE rotation_rates (
    id  INTEGER PRIMARY KEY,
    eta REAL NOT NULL
);
CREATE TABLE mode_types (
    id INTEGER PRIMARY KEY,
    l  INTEGER NOT NULL,
    m  INTEGER NOT NULL
);
CREATE TABLE modes (
    id_model INTEGER NOT NULL REFERENCES models(id),
    id_rot   INTEGER NOT NULL REFERENCES rotation_rates(id),
    n        INTEGER NOT NULL,
    id_type  INTEGER NOT NULL REFERENCES mode_types(id),
    freq     REAL NOT NULL
);
CREATE INDEX idx_modes_candidate ON modes (id_model, id_rot);
";

/// (id, l, m) rows of the mode_types table; id 0 is the radial mode and
/// id 6 the quadrupole zonal mode.
const MODE_TYPES: [(i64, i64, i64); 9] = [
    (0, 0, 0),
    (1, 1, -1),
    (2, 1, 0),
    (3, 1, 1),
    (4, 2, -2),
    (5, 2, -1),
    (6, 2, 0),
    (7, 2, 1),
    (8, 2, 2),
];

const N_MODELS: usize = 60;
const MODES_PER_SERIES: i64 = 25;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let path = args.get(1).map(String::as_str).unwrap_or("grid.db");
    let seed: u64 = match args.get(2) {
        Some(raw) => raw.parse().context("seed must be an unsigned integer")?,
        None => 42,
    };
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let mut conn = Connection::open(path).with_context(|| format!("creating {path}"))?;
    conn.execute_batch(SCHEMA).context("creating schema")?;

    let tx = conn.transaction()?;

    for (id, l, m) in MODE_TYPES {
        tx.execute(
            "INSERT INTO mode_types (id, l, m) VALUES (?, ?, ?)",
            params![id, l, m],
        )?;
    }

    // Rotation rates: 0% to 50% of critical in 5% steps.
    let n_rot = 11;
    for k in 0..n_rot {
        tx.execute(
            "INSERT INTO rotation_rates (id, eta) VALUES (?, ?)",
            params![k + 1, k as f64 * 5.0],
        )?;
    }

    let mut n_modes = 0usize;
    for id_model in 1..=N_MODELS as i64 {
        let m_ini = rng.gen_range(1.4..6.0);
        let fov = rng.gen_range(0.0..0.04);
        let z = rng.gen_range(0.010..0.020);
        let log_d = rng.gen_range(0.0..6.0);
        let xc = rng.gen_range(0.30..0.70);
        // Hotter and more compact with mass, plus scatter.
        let log_teff = 4.0 + 0.06 * (m_ini - 3.0) + rng.gen_range(-0.05..0.05);
        let log_g = 4.4 - 0.12 * (m_ini - 1.4) + rng.gen_range(-0.1..0.1);

        tx.execute(
            "INSERT INTO models (id, M_ini, fov, Z, logD, Xc, log_Teff, log_g)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            params![id_model, m_ini, fov, z, log_d, xc, log_teff, log_g],
        )?;

        for id_rot in 1..=n_rot {
            let eta = (id_rot - 1) as f64 * 5.0;
            for (id_type, l, m) in MODE_TYPES {
                // One near-uniform frequency comb per series, shifted by
                // the rotation rate for m != 0 modes (cycles per day).
                let base = 0.55
                    + 0.15 * l as f64
                    + 0.02 * (m_ini - 3.0)
                    + 0.003 * m as f64 * eta
                    + rng.gen_range(-0.02..0.02);
                let spacing = rng.gen_range(0.055..0.075);
                for k in 0..MODES_PER_SERIES {
                    let freq =
                        base + k as f64 * spacing + rng.gen_range(-0.004..0.004);
                    tx.execute(
                        "INSERT INTO modes (id_model, id_rot, n, id_type, freq)
                         VALUES (?, ?, ?, ?, ?)",
                        params![id_model, id_rot, -(MODES_PER_SERIES - k), id_type, freq],
                    )?;
                    n_modes += 1;
                }
            }
        }
    }

    tx.commit()?;

    println!(
        "seeded {path}: {N_MODELS} models, {n_rot} rotation rates, {} mode types, {n_modes} modes",
        MODE_TYPES.len()
    );
    Ok(())
}
