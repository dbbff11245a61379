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

//! Treatment selection by name

use std::fmt;
use std::str::FromStr;

use rowcost_core::RowCostError;

use crate::treatment::{
    FrequencyConsciousTreatment, IntersectionTreatment, RowCountTreatment, TermTreatment,
};

pub const ENV_TREATMENT: &str = "ROWCOST_TREATMENT";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TreatmentKind {
    #[default]
    RowCount,
    FrequencyConscious,
    Intersection,
}

impl TreatmentKind {
    pub const ALL: [TreatmentKind; 3] = [
        TreatmentKind::RowCount,
        TreatmentKind::FrequencyConscious,
        TreatmentKind::Intersection,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TreatmentKind::RowCount => "RowCount",
            TreatmentKind::FrequencyConscious => "FrequencyConscious",
            TreatmentKind::Intersection => "Intersection",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            TreatmentKind::RowCount => {
                "Single-row terms scan a private row; others scan shared rows at the configured density."
            }
            TreatmentKind::FrequencyConscious => {
                "Terms at least as frequent as the density scan one private row; others as RowCount."
            }
            TreatmentKind::Intersection => {
                "Rows are read while the running intersection still has live bits."
            }
        }
    }

    pub fn build(self) -> Box<dyn TermTreatment> {
        match self {
            TreatmentKind::RowCount => Box::new(RowCountTreatment),
            TreatmentKind::FrequencyConscious => Box::new(FrequencyConsciousTreatment),
            TreatmentKind::Intersection => Box::new(IntersectionTreatment),
        }
    }

    /// `ROWCOST_TREATMENT`, or the default when unset.
    pub fn from_env() -> Result<Self, RowCostError> {
        match std::env::var(ENV_TREATMENT) {
            Ok(name) => name.parse(),
            Err(_) => Ok(Self::default()),
        }
    }
}

impl FromStr for TreatmentKind {
    type Err = RowCostError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                let known: Vec<&str> = Self::ALL.iter().map(|k| k.name()).collect();
                RowCostError::InvalidConfig(format!(
                    "unknown treatment {:?}, expected one of: {}",
                    s,
                    known.join(", ")
                ))
            })
    }
}

impl fmt::Display for TreatmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
