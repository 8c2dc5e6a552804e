use std::path::Path;

use anyhow::{bail, Context, Result};

use super::model::{ObservedMode, ObservedModes};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load an observed mode list from a file. Dispatch by extension.
///
/// Supported formats:
/// * `.csv`  – header `l,m,n,freq,freq_unit`, one mode per row
/// * `.json` – `[{ "l": 1, "m": 0, "n": 14, "freq": 1.1523, "freq_unit": "cd" }, ...]`
///
/// The parsed list goes through [`ObservedModes::new`] validation, so a
/// loaded value is always usable by the pipeline.
pub fn load_observed_modes(path: &Path) -> Result<ObservedModes> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let modes = match ext.as_str() {
        "csv" => load_csv(path)?,
        "json" => load_json(path)?,
        other => bail!("Unsupported file extension: .{other}"),
    };

    ObservedModes::new(modes).context("validating observed mode list")
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

fn load_json(path: &Path) -> Result<Vec<ObservedMode>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    serde_json::from_str(&text).context("parsing JSON")
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<Vec<ObservedMode>> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let mut modes = Vec::new();
    for (row_no, record) in reader.deserialize::<ObservedMode>().enumerate() {
        modes.push(record.with_context(|| format!("CSV row {row_no}"))?);
    }
    Ok(modes)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
