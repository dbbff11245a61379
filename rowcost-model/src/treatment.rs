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

//! Term treatments
//!
//! A term treatment turns one query-term record into the number of distinct
//! cache lines the term's row scan is expected to touch. Every treatment
//! starts from the term's *effective* row count: the trace row count minus
//! the reserved rows (the document-active row) that carry no postings.
//!
//! ## Row-count model
//!
//! With `n` effective rows, signal probability `s`, shared-row density `d`,
//! `C` cache lines per row and `K` address slots per row:
//!
//! ```text
//! n == 1   private row:   E = C
//! n != 1   shared rows:   p_i = 1 - [(1 - (d - s)^i) * (1 - s)]^K
//!                         E   = Σ_{i=1..n} p_i * C
//! ```
//!
//! `d - s` goes negative for terms more frequent than the density; it is
//! used as is.

use rowcost_core::{FrequencyTable, QueryTermRecord, RowLayoutModel};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreatmentError {
    #[error("row count {row_count} is smaller than the {reserved} reserved row(s)")]
    NegativeEffectiveRows { row_count: u64, reserved: u32 },
}

pub type TreatmentResult<T> = std::result::Result<T, TreatmentError>;

/// Predicted cache lines for one term.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimate {
    pub cachelines: f64,
    /// Count of fully scanned rows (a private row, or none) rather than a
    /// sum of per-row probabilities
    pub whole_rows: bool,
}

impl Estimate {
    pub fn whole_rows(cachelines: f64) -> Self {
        Self {
            cachelines,
            whole_rows: true,
        }
    }

    pub fn probable(cachelines: f64) -> Self {
        Self {
            cachelines,
            whole_rows: false,
        }
    }
}

/// Strategy for estimating the cache lines a term's row scan touches.
///
/// Implementations are pure functions of their arguments and are shared
/// read-only across estimation workers.
pub trait TermTreatment: Send + Sync {
    /// Name the strategy is selected by.
    fn name(&self) -> &'static str;

    fn estimate(
        &self,
        record: &QueryTermRecord,
        frequencies: &FrequencyTable,
        layout: &RowLayoutModel,
    ) -> TreatmentResult<Estimate>;
}

/// Rows of the term that hold postings.
pub fn effective_row_count(
    record: &QueryTermRecord,
    layout: &RowLayoutModel,
) -> TreatmentResult<u64> {
    record
        .row_count
        .checked_sub(u64::from(layout.reserved_rows))
        .ok_or(TreatmentError::NegativeEffectiveRows {
            row_count: record.row_count,
            reserved: layout.reserved_rows,
        })
}

/// Row arrangement a term's postings live in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Treatment {
    /// A single dedicated row, always fully scanned once touched.
    PrivateRow,
    /// Postings spread across rows shared with other terms.
    SharedRowDensity,
}

impl Treatment {
    pub fn select(effective_rows: u64) -> Self {
        if effective_rows == 1 {
            Treatment::PrivateRow
        } else {
            Treatment::SharedRowDensity
        }
    }

    pub fn estimate(self, effective_rows: u64, signal: f64, layout: &RowLayoutModel) -> Estimate {
        match self {
            Treatment::PrivateRow => Estimate::whole_rows(f64::from(layout.cachelines_per_row)),
            Treatment::SharedRowDensity if effective_rows == 0 => Estimate::whole_rows(0.0),
            Treatment::SharedRowDensity => {
                Estimate::probable(shared_row_density(effective_rows, signal, layout))
            }
        }
    }
}

/// Expected cache lines over `rows` shared rows.
///
/// Row `i` contributes the probability that at least one of the
/// `address_slots_per_row` draws lands on a live bit after intersecting
/// `i` rows of noise `density - signal`.
pub fn shared_row_density(rows: u64, signal: f64, layout: &RowLayoutModel) -> f64 {
    let noise = layout.density - signal;
    let slots = f64::from(layout.address_slots_per_row);
    let per_row = f64::from(layout.cachelines_per_row);

    let mut expected = 0.0;
    let mut noise_power = 1.0;
    for _ in 0..rows {
        noise_power *= noise;
        let all_dead = (1.0 - noise_power) * (1.0 - signal);
        let p = 1.0 - all_dead.powf(slots);
        expected += p * per_row;
    }
    expected
}

/// Private row for single-row terms, shared-row density otherwise.
#[derive(Debug, Clone, Copy, Default)]
pub struct RowCountTreatment;

impl TermTreatment for RowCountTreatment {
    fn name(&self) -> &'static str {
        "RowCount"
    }

    fn estimate(
        &self,
        record: &QueryTermRecord,
        frequencies: &FrequencyTable,
        layout: &RowLayoutModel,
    ) -> TreatmentResult<Estimate> {
        let rows = effective_row_count(record, layout)?;
        let signal = frequencies.lookup(&record.term);
        Ok(Treatment::select(rows).estimate(rows, signal, layout))
    }
}

/// Terms at least as frequent as the shared-row density would have been
/// given a private row; estimate them as one regardless of their row count.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrequencyConsciousTreatment;

impl TermTreatment for FrequencyConsciousTreatment {
    fn name(&self) -> &'static str {
        "FrequencyConscious"
    }

    fn estimate(
        &self,
        record: &QueryTermRecord,
        frequencies: &FrequencyTable,
        layout: &RowLayoutModel,
    ) -> TreatmentResult<Estimate> {
        let rows = effective_row_count(record, layout)?;
        let signal = frequencies.lookup(&record.term);
        let treatment = if rows > 0 && signal >= layout.density {
            Treatment::PrivateRow
        } else {
            Treatment::select(rows)
        };
        Ok(treatment.estimate(rows, signal, layout))
    }
}

/// Row scan as a running intersection.
///
/// The first row is always read in full. Each following row is read with
/// the probability that the intersection so far still has a live bit in
/// one of the slots: `1 - (1 - s - noise^k)^K` with `noise = max(d - s, 0)`
/// and `k` rows already intersected.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntersectionTreatment;

impl TermTreatment for IntersectionTreatment {
    fn name(&self) -> &'static str {
        "Intersection"
    }

    fn estimate(
        &self,
        record: &QueryTermRecord,
        frequencies: &FrequencyTable,
        layout: &RowLayoutModel,
    ) -> TreatmentResult<Estimate> {
        let rows = effective_row_count(record, layout)?;
        if rows <= 1 {
            return Ok(Estimate::whole_rows((rows * u64::from(layout.cachelines_per_row)) as f64));
        }
        let signal = frequencies.lookup(&record.term);
        let noise = (layout.density - signal).max(0.0);
        let slots = f64::from(layout.address_slots_per_row);
        let per_row = f64::from(layout.cachelines_per_row);

        let mut expected = 0.0;
        let mut p_read = 1.0;
        let mut residual = 1.0;
        for _ in 0..rows {
            expected += p_read * per_row;
            residual *= noise;
            let bit_is_zero = (1.0 - signal - residual).max(0.0);
            p_read = 1.0 - bit_is_zero.powf(slots);
        }
        Ok(Estimate::probable(expected))
    }
}
