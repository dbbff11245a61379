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

//! Estimation pipeline
//!
//! Maps an ordered trace to an ordered result list. Records are independent,
//! so large traces are estimated on the rayon pool; results are collected by
//! index, which keeps `position` equal to the input index. Any failing
//! record aborts the run and no partial results are returned. When several
//! records fail, the one earliest in the trace is reported.

use std::io::BufRead;
use std::time::Instant;

use rayon::prelude::*;
use rowcost_core::{EstimationResult, QueryTermRecord, Result, TraceReader};
use tracing::debug;

use crate::estimator::MissEstimator;

/// Below this many records the pool's scheduling costs more than it saves.
const PARALLEL_THRESHOLD: usize = 4096;

pub struct EstimationPipeline {
    estimator: MissEstimator,
    parallel: bool,
}

impl EstimationPipeline {
    pub fn new(estimator: MissEstimator) -> Self {
        Self {
            estimator,
            parallel: true,
        }
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn estimator(&self) -> &MissEstimator {
        &self.estimator
    }

    pub fn run(&self, records: &[QueryTermRecord]) -> Result<Vec<EstimationResult>> {
        let start = Instant::now();

        let results = if self.parallel && records.len() >= PARALLEL_THRESHOLD {
            let estimated: Vec<Result<EstimationResult>> = records
                .par_iter()
                .enumerate()
                .map(|(position, record)| self.estimator.estimate(record, position))
                .collect();
            estimated.into_iter().collect::<Result<Vec<_>>>()?
        } else {
            records
                .iter()
                .enumerate()
                .map(|(position, record)| self.estimator.estimate(record, position))
                .collect::<Result<Vec<_>>>()?
        };

        debug!(
            "estimated {} records with {} in {:.2}ms",
            results.len(),
            self.estimator.treatment_name(),
            start.elapsed().as_secs_f64() * 1000.0
        );
        Ok(results)
    }

    /// Read a whole trace, then estimate it.
    pub fn run_trace<R: BufRead>(&self, trace: TraceReader<R>) -> Result<Vec<EstimationResult>> {
        let records = trace.read_all()?;
        self.run(&records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rowcost_core::{FrequencyEntry, FrequencyTable, RowCostError, RowLayoutModel};
    use std::io::Cursor;

    fn pipeline() -> EstimationPipeline {
        let frequencies = FrequencyTable::from_entries(vec![
            FrequencyEntry::new("a", 0.01),
            FrequencyEntry::new("b", 0.05),
        ]);
        EstimationPipeline::new(MissEstimator::new(frequencies, RowLayoutModel::default()))
    }

    #[test]
    fn test_positions_follow_input_order() {
        let records = vec![
            QueryTermRecord::new("b", 4),
            QueryTermRecord::new("a", 2),
            QueryTermRecord::new("zzz", 3),
        ];
        let results = pipeline().run(&records).unwrap();
        let terms: Vec<&str> = results.iter().map(|r| r.term.as_str()).collect();
        let positions: Vec<usize> = results.iter().map(|r| r.position).collect();
        assert_eq!(terms, vec!["b", "a", "zzz"]);
        assert_eq!(positions, vec![0, 1, 2]);
    }

    #[test]
    fn test_empty_trace() {
        assert!(pipeline().run(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_first_failure_reported() {
        let records: Vec<QueryTermRecord> = (0..PARALLEL_THRESHOLD + 10)
            .map(|i| {
                let rows = if i == 100 || i == 5000 { 0 } else { 3 };
                QueryTermRecord::new("a", rows).at_line(i + 2)
            })
            .collect();
        let err = pipeline().run(&records).unwrap_err();
        assert!(matches!(err, RowCostError::InvalidRecord { line: 102, .. }));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let records: Vec<QueryTermRecord> = (0..PARALLEL_THRESHOLD * 2)
            .map(|i| QueryTermRecord::new(if i % 3 == 0 { "a" } else { "b" }, (i % 7) as u64 + 1))
            .collect();
        let parallel = pipeline().run(&records).unwrap();
        let sequential = pipeline().with_parallel(false).run(&records).unwrap();
        assert_eq!(parallel, sequential);
    }

    #[test]
    fn test_run_trace() {
        let text = "query,rows,matches,quadwords,cachelines,parse,plan,match\n\
                    a,2,1,10,5,0,0,0\n\
                    b,3,1,20,9,0,0,0\n";
        let trace = TraceReader::new(Cursor::new(text.as_bytes().to_vec()), "trace.csv").unwrap();
        let results = pipeline().run_trace(trace).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].expected_cachelines, 60.0);
        assert_eq!(results[1].actual_cachelines, 9);
    }
}
