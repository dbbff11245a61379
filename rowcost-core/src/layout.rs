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

//! Row layout model
//!
//! Physical-layout calibration constants for the bit-sliced index the trace
//! was recorded against. None of these are derived from the inputs; the
//! defaults match the reference index configuration and every value can be
//! overridden from the environment:
//!
//! | Variable | Field | Default |
//! |----------|-------|---------|
//! | `ROWCOST_CACHELINES_PER_ROW` | `cachelines_per_row` | 60 |
//! | `ROWCOST_DENSITY` | `density` | 0.1 |
//! | `ROWCOST_ADDRESS_SLOTS_PER_ROW` | `address_slots_per_row` | 512 |
//! | `ROWCOST_RESERVED_ROWS` | `reserved_rows` | 1 |

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{Result, RowCostError};

pub const ENV_CACHELINES_PER_ROW: &str = "ROWCOST_CACHELINES_PER_ROW";
pub const ENV_DENSITY: &str = "ROWCOST_DENSITY";
pub const ENV_ADDRESS_SLOTS_PER_ROW: &str = "ROWCOST_ADDRESS_SLOTS_PER_ROW";
pub const ENV_RESERVED_ROWS: &str = "ROWCOST_RESERVED_ROWS";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RowLayoutModel {
    /// Cache lines scanned when a row is fully touched
    pub cachelines_per_row: u32,
    /// Assumed average fraction of set bits in a shared row
    pub density: f64,
    /// Independent per-document hash draws into a row
    pub address_slots_per_row: u32,
    /// Rows present in every term's row set that carry no postings
    /// (the document-active row). Deducted from each trace row count.
    pub reserved_rows: u32,
}

impl Default for RowLayoutModel {
    fn default() -> Self {
        Self {
            cachelines_per_row: 60,
            density: 0.1,
            address_slots_per_row: 512,
            reserved_rows: 1,
        }
    }
}

impl RowLayoutModel {
    /// Defaults overridden by any `ROWCOST_*` variables that are set.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let layout = Self {
            cachelines_per_row: parse_var(&lookup, ENV_CACHELINES_PER_ROW)?
                .unwrap_or(defaults.cachelines_per_row),
            density: parse_var(&lookup, ENV_DENSITY)?.unwrap_or(defaults.density),
            address_slots_per_row: parse_var(&lookup, ENV_ADDRESS_SLOTS_PER_ROW)?
                .unwrap_or(defaults.address_slots_per_row),
            reserved_rows: parse_var(&lookup, ENV_RESERVED_ROWS)?
                .unwrap_or(defaults.reserved_rows),
        };
        layout.validate()?;
        Ok(layout)
    }

    pub fn validate(&self) -> Result<()> {
        if self.cachelines_per_row == 0 {
            return Err(RowCostError::InvalidConfig(
                "cachelines_per_row must be positive".to_string(),
            ));
        }
        if self.address_slots_per_row == 0 {
            return Err(RowCostError::InvalidConfig(
                "address_slots_per_row must be positive".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.density) {
            return Err(RowCostError::InvalidConfig(format!(
                "density {} outside [0, 1]",
                self.density
            )));
        }
        Ok(())
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw.trim().parse::<T>().map(Some).map_err(|_| {
            RowCostError::InvalidConfig(format!("{}={:?} is not a valid value", key, raw))
        }),
    }
}
