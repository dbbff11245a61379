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

//! Prediction accuracy summary for a finished run

use rowcost_core::EstimationResult;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EstimationSummary {
    pub terms: usize,
    pub total_quadwords: u64,
    pub total_actual_cachelines: u64,
    pub total_expected_cachelines: f64,
    pub mean_absolute_error: f64,
    pub root_mean_square_error: f64,
    /// Total expected over total actual cache lines (0 when nothing was measured)
    pub expected_to_actual_ratio: f64,
}

impl EstimationSummary {
    pub fn from_results(results: &[EstimationResult]) -> Self {
        if results.is_empty() {
            return Self::default();
        }

        let mut summary = Self {
            terms: results.len(),
            ..Self::default()
        };
        let mut abs_error = 0.0;
        let mut sq_error = 0.0;

        for result in results {
            summary.total_quadwords += result.quadwords_touched;
            summary.total_actual_cachelines += result.actual_cachelines;
            summary.total_expected_cachelines += result.expected_cachelines;

            let error = result.expected_cachelines - result.actual_cachelines as f64;
            abs_error += error.abs();
            sq_error += error * error;
        }

        let n = results.len() as f64;
        summary.mean_absolute_error = abs_error / n;
        summary.root_mean_square_error = (sq_error / n).sqrt();
        if summary.total_actual_cachelines > 0 {
            summary.expected_to_actual_ratio =
                summary.total_expected_cachelines / summary.total_actual_cachelines as f64;
        }
        summary
    }
}
