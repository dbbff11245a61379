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

//! RowCost cache-line estimator
//!
//! ```bash
//! rowcost-cachelines <DocFreqTable> <QueryPipelineStatistics> <output>
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use rowcost_core::RowCostError;
use rowcost_tools::{run, RunConfig};

/// Predict the cache lines each query term touches and write them next to
/// the measured counts
#[derive(Parser, Debug)]
#[command(name = "rowcost-cachelines")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Document frequency table (hash,gramSize,streamId,frequency,text)
    frequencies: PathBuf,

    /// Query pipeline statistics (query,rows,matches,quadwords,cachelines,parse,plan,match)
    trace: PathBuf,

    /// Output file (Query,TermPos,Quadwords,Cachelines,ExpectedCachelines)
    output: PathBuf,
}

fn main() -> Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version print to stdout and succeed
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let config = RunConfig::from_env(cli.frequencies, cli.trace, cli.output)?;

    if config.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(config.threads)
            .build_global()
            .ok();
    }

    if let Err(err) = run(&config) {
        if let Some(violation) = err.chain().find_map(|e| e.downcast_ref::<RowCostError>()) {
            error!(
                contract = violation.contract(),
                line = ?violation.line(),
                "Run aborted, no output written"
            );
        }
        return Err(err);
    }
    Ok(())
}
