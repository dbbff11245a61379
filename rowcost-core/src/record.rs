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

//! Query-term execution records and estimation results

use serde::{Deserialize, Serialize};

/// Query pipeline timings. Carried through estimation untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseTimings {
    pub parse: String,
    pub plan: String,
    pub matching: String,
}

/// One row of a query pipeline statistics trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryTermRecord {
    /// 1-based line of the trace this record was read from
    pub line: usize,
    pub term: String,
    /// Physical rows assigned to the term, reserved rows included
    pub row_count: u64,
    pub matches: u64,
    pub quadwords_touched: u64,
    pub actual_cachelines: u64,
    pub timings: PhaseTimings,
}

impl QueryTermRecord {
    /// Record with zeroed counters, for building traces in code.
    pub fn new(term: impl Into<String>, row_count: u64) -> Self {
        Self {
            line: 0,
            term: term.into(),
            row_count,
            matches: 0,
            quadwords_touched: 0,
            actual_cachelines: 0,
            timings: PhaseTimings::default(),
        }
    }

    pub fn with_measurements(mut self, quadwords_touched: u64, actual_cachelines: u64) -> Self {
        self.quadwords_touched = quadwords_touched;
        self.actual_cachelines = actual_cachelines;
        self
    }

    pub fn at_line(mut self, line: usize) -> Self {
        self.line = line;
        self
    }
}

/// Measured and predicted cache lines for one query term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimationResult {
    pub term: String,
    /// 0-based index of the record in the trace
    pub position: usize,
    pub quadwords_touched: u64,
    pub actual_cachelines: u64,
    pub expected_cachelines: f64,
    /// The estimate counts fully scanned rows instead of summing per-row
    /// probabilities. Written without a fractional part.
    #[serde(default)]
    pub whole_rows: bool,
}

impl EstimationResult {
    pub fn from_record(
        record: &QueryTermRecord,
        position: usize,
        expected_cachelines: f64,
    ) -> Self {
        Self {
            term: record.term.clone(),
            position,
            quadwords_touched: record.quadwords_touched,
            actual_cachelines: record.actual_cachelines,
            expected_cachelines,
            whole_rows: false,
        }
    }

    pub fn with_whole_rows(mut self, whole_rows: bool) -> Self {
        self.whole_rows = whole_rows;
        self
    }

    /// `60` for whole rows; probability sums always keep a fractional
    /// part, so a sum that lands on an integer is written `660.0`.
    fn format_expected(&self) -> String {
        let expected = self.expected_cachelines;
        if self.whole_rows || expected.fract() != 0.0 {
            expected.to_string()
        } else {
            format!("{:.1}", expected)
        }
    }

    /// Output row, in `OUTPUT_COLUMNS` order.
    pub fn to_fields(&self) -> [String; 5] {
        [
            self.term.clone(),
            self.position.to_string(),
            self.quadwords_touched.to_string(),
            self.actual_cachelines.to_string(),
            self.format_expected(),
        ]
    }
}
