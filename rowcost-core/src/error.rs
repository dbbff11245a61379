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

//! Error types for RowCost

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RowCostError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Malformed schema in {input} at line {line}: expected columns [{expected}], found [{found}]")]
    MalformedSchema {
        input: String,
        line: usize,
        expected: String,
        found: String,
    },

    #[error("Malformed record in {input} at line {line}: {reason}")]
    MalformedRecord {
        input: String,
        line: usize,
        reason: String,
    },

    #[error("Invalid record in {input} at line {line} (term {term:?}): {reason}")]
    InvalidRecord {
        input: String,
        line: usize,
        term: String,
        reason: String,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl RowCostError {
    /// Short name of the violated data contract, used in user-facing reports.
    pub fn contract(&self) -> &'static str {
        match self {
            RowCostError::Io(_) => "Io",
            RowCostError::MalformedSchema { .. } => "MalformedSchema",
            RowCostError::MalformedRecord { .. } => "MalformedRecord",
            RowCostError::InvalidRecord { .. } => "InvalidRecord",
            RowCostError::InvalidConfig(_) => "InvalidConfig",
        }
    }

    /// Line of the offending input, when the error is tied to one.
    pub fn line(&self) -> Option<usize> {
        match self {
            RowCostError::MalformedSchema { line, .. }
            | RowCostError::MalformedRecord { line, .. }
            | RowCostError::InvalidRecord { line, .. } => Some(*line),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, RowCostError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_input_and_line() {
        let err = RowCostError::MalformedRecord {
            input: "trace.csv".to_string(),
            line: 7,
            reason: "expected 8 fields, found 3".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("trace.csv"));
        assert!(message.contains("line 7"));
        assert_eq!(err.contract(), "MalformedRecord");
        assert_eq!(err.line(), Some(7));
    }

    #[test]
    fn test_config_error_has_no_line() {
        let err = RowCostError::InvalidConfig("density out of range".to_string());
        assert_eq!(err.line(), None);
        assert_eq!(err.contract(), "InvalidConfig");
    }
}
