use std::env;
use std::path::Path;

use anyhow::{bail, Context, Result};

use starsift::data::loader;
use starsift::{
    build_learning_set, split_learning_set, GridDb, SamplingConfig, SplitFractions,
};

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 4 {
        bail!("usage: starsift <grid.db> <config.json> <observed.csv|json>");
    }

    let config_text = std::fs::read_to_string(&args[2])
        .with_context(|| format!("reading config {}", args[2]))?;
    let config: SamplingConfig =
        serde_json::from_str(&config_text).context("parsing sampling config")?;

    let observed = loader::load_observed_modes(Path::new(&args[3]))?;
    let mut db = GridDb::open(Path::new(&args[1]))?;
    let mut rng = rand::thread_rng();

    let set = build_learning_set(&mut db, &config, &observed, &mut rng)?;
    println!(
        "learning set: {} rows x {} features ({} observed modes)",
        set.len(),
        set.feature_names().len(),
        observed.len()
    );

    let fractions = SplitFractions::new(0.8, 0.1, 0.1)?;
    let split = split_learning_set(&set, &fractions, &mut rng)?;
    println!(
        "training {} / validation {} / test {}",
        split.training.len(),
        split.validation.len(),
        split.test.len()
    );

    Ok(())
}
