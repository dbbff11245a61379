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

//! RowCost Core - data model and inputs for cache-line estimation
//!
//! Telemetry from a bit-sliced signature index comes in two tables: a
//! document frequency table giving each term's signal probability, and a
//! query pipeline statistics trace giving, per query term, how many rows it
//! occupies and how many quadwords and cache lines the match touched. This
//! crate owns both inputs, the estimation output, the physical row layout
//! constants and the error taxonomy shared by the rest of the workspace.
//!
//! ## Layout
//!
//! - [`table`]: comma-separated table codec
//! - [`frequency`]: [`FrequencyTable`], term → signal probability
//! - [`layout`]: [`RowLayoutModel`], calibration constants
//! - [`record`]: [`QueryTermRecord`] and [`EstimationResult`]
//! - [`trace`]: trace reader and result writer

pub mod error;
pub mod frequency;
pub mod layout;
pub mod record;
pub mod table;
pub mod trace;

pub use error::{Result, RowCostError};
pub use frequency::{FrequencyEntry, FrequencyTable, FREQUENCY_COLUMNS};
pub use layout::RowLayoutModel;
pub use record::{EstimationResult, PhaseTimings, QueryTermRecord};
pub use table::{TableReader, TableRow, TableWriter};
pub use trace::{write_results, TraceReader, OUTPUT_COLUMNS, TRACE_COLUMNS};
