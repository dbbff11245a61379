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

//! Cache-line miss estimator
//!
//! Binds a frequency table, a row layout and a term treatment, and turns
//! query-term records into [`EstimationResult`]s.

use std::sync::Arc;

use rowcost_core::{
    EstimationResult, FrequencyTable, QueryTermRecord, Result, RowCostError, RowLayoutModel,
};

use crate::treatment::{Estimate, RowCountTreatment, TermTreatment, TreatmentError};

pub struct MissEstimator {
    frequencies: Arc<FrequencyTable>,
    layout: RowLayoutModel,
    treatment: Box<dyn TermTreatment>,
    /// Trace name used in error reports
    input: String,
}

impl MissEstimator {
    pub fn new(frequencies: impl Into<Arc<FrequencyTable>>, layout: RowLayoutModel) -> Self {
        Self {
            frequencies: frequencies.into(),
            layout,
            treatment: Box::new(RowCountTreatment),
            input: "trace".to_string(),
        }
    }

    pub fn with_treatment(mut self, treatment: Box<dyn TermTreatment>) -> Self {
        self.treatment = treatment;
        self
    }

    pub fn with_input(mut self, input: impl Into<String>) -> Self {
        self.input = input.into();
        self
    }

    pub fn frequencies(&self) -> &FrequencyTable {
        &self.frequencies
    }

    pub fn layout(&self) -> &RowLayoutModel {
        &self.layout
    }

    pub fn treatment_name(&self) -> &'static str {
        self.treatment.name()
    }

    pub fn expected_cachelines(&self, record: &QueryTermRecord) -> Result<f64> {
        Ok(self.treat(record)?.cachelines)
    }

    pub fn estimate(&self, record: &QueryTermRecord, position: usize) -> Result<EstimationResult> {
        let estimate = self.treat(record)?;
        Ok(EstimationResult::from_record(record, position, estimate.cachelines)
            .with_whole_rows(estimate.whole_rows))
    }

    fn treat(&self, record: &QueryTermRecord) -> Result<Estimate> {
        self.treatment
            .estimate(record, &self.frequencies, &self.layout)
            .map_err(|e| self.invalid(record, e))
    }

    fn invalid(&self, record: &QueryTermRecord, err: TreatmentError) -> RowCostError {
        RowCostError::InvalidRecord {
            input: self.input.clone(),
            line: record.line,
            term: record.term.clone(),
            reason: err.to_string(),
        }
    }
}
