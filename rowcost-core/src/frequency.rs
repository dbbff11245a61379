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

//! Term document-frequency table
//!
//! Maps a term's text to its signal probability: the fraction of documents
//! in which the term's bit is set. Loaded once from a document frequency
//! table (`hash,gramSize,streamId,frequency,text`) and read-only afterwards,
//! so it can be shared across estimation workers without locking.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug, warn};

use crate::error::{Result, RowCostError};
use crate::table::TableReader;

/// Required header of a document frequency table.
pub const FREQUENCY_COLUMNS: [&str; 5] = ["hash", "gramSize", "streamId", "frequency", "text"];

const FREQUENCY_INDEX: usize = 3;
const TEXT_INDEX: usize = 4;

/// A single term and its signal probability.
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyEntry {
    pub term: String,
    pub signal_probability: f64,
}

impl FrequencyEntry {
    pub fn new(term: impl Into<String>, signal_probability: f64) -> Self {
        Self {
            term: term.into(),
            signal_probability,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FrequencyTable {
    frequencies: HashMap<String, f64>,
}

impl FrequencyTable {
    /// Build a table from already validated entries. Later duplicates win.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = FrequencyEntry>,
    {
        let frequencies = entries
            .into_iter()
            .map(|e| (e.term, e.signal_probability))
            .collect();
        Self { frequencies }
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        Self::load(BufReader::new(file), path.display().to_string())
    }

    /// Load a document frequency table.
    ///
    /// `input` names the source in error messages.
    pub fn load<R: BufRead>(reader: R, input: impl Into<String>) -> Result<Self> {
        let mut table = TableReader::new(reader, input);
        table.read_header(&FREQUENCY_COLUMNS)?;

        let mut frequencies = HashMap::new();
        let mut duplicates = 0usize;

        while let Some(row) = table.next_row()? {
            row.expect_arity(table.input(), FREQUENCY_COLUMNS.len())?;
            let probability = row.parse_f64(table.input(), FREQUENCY_INDEX, "frequency")?;
            let term = &row.fields[TEXT_INDEX];

            if !(0.0..=1.0).contains(&probability) {
                return Err(RowCostError::InvalidRecord {
                    input: table.input().to_string(),
                    line: row.line,
                    term: term.clone(),
                    reason: format!("signal probability {} outside [0, 1]", probability),
                });
            }

            if frequencies.insert(term.clone(), probability).is_some() {
                duplicates += 1;
                debug!(term = %term, line = row.line, "duplicate term overrides earlier entry");
            }
        }

        if duplicates > 0 {
            warn!(
                "{}: {} duplicate term(s), last occurrence kept",
                table.input(),
                duplicates
            );
        }
        debug!("{}: loaded {} terms", table.input(), frequencies.len());

        Ok(Self { frequencies })
    }

    /// Signal probability of `term`, or 0.0 when the term is unknown.
    #[inline]
    pub fn lookup(&self, term: &str) -> f64 {
        self.frequencies.get(term).copied().unwrap_or(0.0)
    }

    pub fn contains(&self, term: &str) -> bool {
        self.frequencies.contains_key(term)
    }

    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }
}
