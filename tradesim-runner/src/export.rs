//! Artifact export — CSV series and a JSON manifest per run.
//!
//! Persisted artifacts carry a `schema_version`; manifests with a newer
//! version than this build supports are rejected on load.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use tradesim_core::domain::{Fill, PortfolioSnapshot};

use crate::runner::{BacktestSummary, RunManifest, SCHEMA_VERSION};

/// Render the snapshot series as CSV.
///
/// Columns: timestamp, seq, cash, total_equity, realized_pnl, open_positions
pub fn snapshots_to_csv(snapshots: &[PortfolioSnapshot]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "timestamp",
        "seq",
        "cash",
        "total_equity",
        "realized_pnl",
        "open_positions",
    ])?;
    for snap in snapshots {
        wtr.write_record([
            &snap.timestamp.to_rfc3339(),
            &snap.seq.to_string(),
            &format!("{:.6}", snap.cash),
            &format!("{:.6}", snap.total_equity),
            &format!("{:.6}", snap.realized_pnl),
            &snap.positions.len().to_string(),
        ])?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Render the fill tape as CSV.
pub fn fills_to_csv(fills: &[Fill]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "intent_id",
        "timestamp",
        "symbol",
        "side",
        "price",
        "quantity",
        "requested",
        "fees",
    ])?;
    for fill in fills {
        wtr.write_record([
            &fill.intent_id.to_string(),
            &fill.timestamp.to_rfc3339(),
            &fill.symbol,
            &format!("{:?}", fill.side),
            &format!("{:.6}", fill.price),
            &format!("{:.6}", fill.quantity),
            &format!("{:.6}", fill.requested),
            &format!("{:.6}", fill.fees),
        ])?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Deserialize a manifest, rejecting unknown schema versions.
pub fn import_manifest(json: &str) -> Result<RunManifest> {
    let manifest: RunManifest =
        serde_json::from_str(json).context("failed to deserialize run manifest")?;
    if manifest.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            manifest.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(manifest)
}

/// Write the full artifact set for one run.
///
/// Creates `{symbol}_{run_id prefix}/` under `output_dir` containing
/// `manifest.json`, `snapshots.csv`, and `fills.csv`. Returns the run
/// directory path.
pub fn write_run_artifacts(output_dir: &Path, summary: &BacktestSummary) -> Result<PathBuf> {
    let short_id: String = summary.run_id.chars().take(8).collect();
    let run_dir = output_dir.join(format!("{}_{}", summary.config.symbol, short_id));
    fs::create_dir_all(&run_dir)
        .with_context(|| format!("failed to create {}", run_dir.display()))?;

    let manifest = serde_json::to_string_pretty(&summary.manifest())
        .context("failed to serialize run manifest")?;
    fs::write(run_dir.join("manifest.json"), manifest).context("failed to write manifest.json")?;
    fs::write(
        run_dir.join("snapshots.csv"),
        snapshots_to_csv(&summary.result.snapshots)?,
    )
    .context("failed to write snapshots.csv")?;
    fs::write(run_dir.join("fills.csv"), fills_to_csv(&summary.result.fills)?)
        .context("failed to write fills.csv")?;

    Ok(run_dir)
}
