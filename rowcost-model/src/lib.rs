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

//! RowCost Model - cache-line miss estimation
//!
//! Predicts, per query term, how many distinct cache lines a row scan over a
//! bit-sliced signature index touches, so the prediction can be compared
//! with the count measured by the query pipeline.
//!
//! ```text
//! QueryTermRecord ──► MissEstimator ──► EstimationResult
//!                       │    │
//!        FrequencyTable ┘    └ TermTreatment (RowCount | FrequencyConscious | Intersection)
//! ```
//!
//! [`EstimationPipeline`] runs the estimator over a whole trace and keeps
//! input order; [`EstimationSummary`] condenses the results into accuracy
//! figures.

pub mod estimator;
pub mod factory;
pub mod pipeline;
pub mod summary;
pub mod treatment;

pub use estimator::MissEstimator;
pub use factory::{TreatmentKind, ENV_TREATMENT};
pub use pipeline::EstimationPipeline;
pub use summary::EstimationSummary;
pub use treatment::{
    effective_row_count, shared_row_density, Estimate, FrequencyConsciousTreatment,
    IntersectionTreatment, RowCountTreatment, TermTreatment, Treatment, TreatmentError,
};
