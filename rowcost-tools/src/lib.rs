// SPDX-License-Identifier: AGPL-3.0-or-later
// RowCost - Cache-Line Estimation for Bit-Sliced Signature Indexes
// Copyright (C) 2026 Sushanth Reddy Vanagala (https://github.com/sushanthpy)
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! RowCost Tools - cache-line estimation from query pipeline traces
//!
//! This crate provides the `rowcost-cachelines` CLI, which joins a document
//! frequency table with a query pipeline statistics trace and writes, per
//! query term, the measured cache lines next to the number the row layout
//! model predicts.
//!
//! ## Usage
//!
//! ```bash
//! rowcost-cachelines DocFreqTable.csv QueryPipelineStatistics.csv expected.csv
//!
//! # Different index calibration
//! ROWCOST_CACHELINES_PER_ROW=32 ROWCOST_DENSITY=0.15 \
//!     rowcost-cachelines docfreq.csv trace.csv expected.csv
//!
//! # Alternative treatment plus a JSON accuracy summary
//! ROWCOST_TREATMENT=Intersection ROWCOST_SUMMARY_FILE=summary.json \
//!     rowcost-cachelines docfreq.csv trace.csv expected.csv
//! ```
//!
//! ## Environment
//!
//! | Variable | Meaning | Default |
//! |----------|---------|---------|
//! | `ROWCOST_CACHELINES_PER_ROW` | cache lines per fully scanned row | 60 |
//! | `ROWCOST_DENSITY` | shared-row bit density | 0.1 |
//! | `ROWCOST_ADDRESS_SLOTS_PER_ROW` | per-document hash draws per row | 512 |
//! | `ROWCOST_RESERVED_ROWS` | rows deducted from each row count | 1 |
//! | `ROWCOST_TREATMENT` | `RowCount`, `FrequencyConscious`, `Intersection` | `RowCount` |
//! | `ROWCOST_THREADS` | estimation threads, 0 = auto | 0 |
//! | `ROWCOST_SUMMARY_FILE` | write the accuracy summary as JSON | unset |

use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{debug, info};

use rowcost_core::{write_results, FrequencyTable, RowLayoutModel, TraceReader};
use rowcost_model::{EstimationPipeline, EstimationSummary, MissEstimator, TreatmentKind};

pub const ENV_THREADS: &str = "ROWCOST_THREADS";
pub const ENV_SUMMARY_FILE: &str = "ROWCOST_SUMMARY_FILE";

/// Everything one estimation run needs.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub frequencies: PathBuf,
    pub trace: PathBuf,
    pub output: PathBuf,
    pub layout: RowLayoutModel,
    pub treatment: TreatmentKind,
    /// Estimation worker threads (0 = rayon default)
    pub threads: usize,
    pub summary_file: Option<PathBuf>,
}

impl RunConfig {
    pub fn new(
        frequencies: impl Into<PathBuf>,
        trace: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
    ) -> Self {
        Self {
            frequencies: frequencies.into(),
            trace: trace.into(),
            output: output.into(),
            layout: RowLayoutModel::default(),
            treatment: TreatmentKind::default(),
            threads: 0,
            summary_file: None,
        }
    }

    /// Paths from the command line, everything else from `ROWCOST_*`.
    pub fn from_env(
        frequencies: impl Into<PathBuf>,
        trace: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
    ) -> Result<Self> {
        let mut config = Self::new(frequencies, trace, output);
        config.layout = RowLayoutModel::from_env().context("Invalid row layout configuration")?;
        config.treatment = TreatmentKind::from_env().context("Invalid treatment configuration")?;
        config.threads = match std::env::var(ENV_THREADS) {
            Ok(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("{}={:?} is not a thread count", ENV_THREADS, raw))?,
            Err(_) => 0,
        };
        config.summary_file = std::env::var_os(ENV_SUMMARY_FILE).map(PathBuf::from);
        Ok(config)
    }
}

/// Load both inputs, estimate every trace record and write the output.
///
/// Inputs are fully read and estimated before the output is touched, and
/// the output goes through a temporary file in the destination directory
/// that only replaces `config.output` once every row is written. A failed
/// run leaves no output behind.
pub fn run(config: &RunConfig) -> Result<EstimationSummary> {
    let start = Instant::now();
    config.layout.validate()?;

    let frequencies = FrequencyTable::open(&config.frequencies).with_context(|| {
        format!("Failed to load frequency table {:?}", config.frequencies)
    })?;
    info!(
        "Loaded {} term frequencies from {:?}",
        frequencies.len(),
        config.frequencies
    );

    let trace_name = config.trace.display().to_string();
    let trace = TraceReader::open(&config.trace)
        .and_then(TraceReader::read_all)
        .with_context(|| format!("Failed to read trace {:?}", config.trace))?;
    info!("Read {} query terms from {:?}", trace.len(), config.trace);

    let estimator = MissEstimator::new(frequencies, config.layout)
        .with_treatment(config.treatment.build())
        .with_input(trace_name);
    debug!(
        treatment = estimator.treatment_name(),
        cachelines_per_row = config.layout.cachelines_per_row,
        density = config.layout.density,
        address_slots_per_row = config.layout.address_slots_per_row,
        reserved_rows = config.layout.reserved_rows,
        "estimator configured"
    );

    let pipeline = EstimationPipeline::new(estimator);
    let results = pipeline
        .run(&trace)
        .with_context(|| format!("Failed to estimate trace {:?}", config.trace))?;

    write_output(&config.output, &results)
        .with_context(|| format!("Failed to write output {:?}", config.output))?;

    let summary = EstimationSummary::from_results(&results);
    info!(
        "Wrote {} estimates to {:?} in {:.2}s",
        results.len(),
        config.output,
        start.elapsed().as_secs_f64()
    );
    info!(
        "Cache lines: actual {} / expected {:.1} (ratio {:.3}, MAE {:.2}, RMSE {:.2})",
        summary.total_actual_cachelines,
        summary.total_expected_cachelines,
        summary.expected_to_actual_ratio,
        summary.mean_absolute_error,
        summary.root_mean_square_error
    );

    if let Some(path) = &config.summary_file {
        let json = serde_json::to_string_pretty(&summary)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write summary {:?}", path))?;
        info!("Wrote summary to {:?}", path);
    }

    Ok(summary)
}

fn write_output(output: &Path, results: &[rowcost_core::EstimationResult]) -> Result<()> {
    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let staged = tempfile::NamedTempFile::new_in(dir)?;
    let writer = write_results(BufWriter::new(staged), results)?;
    let staged = writer.into_inner().map_err(|e| e.into_error())?;
    staged.persist(output)?;
    Ok(())
}
