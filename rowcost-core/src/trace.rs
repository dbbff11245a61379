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

//! Query pipeline statistics traces and estimation output
//!
//! Trace layout: `query,rows,matches,quadwords,cachelines,parse,plan,match`.
//! Output layout: `Query,TermPos,Quadwords,Cachelines,ExpectedCachelines`.

use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use tracing::debug;

use crate::error::Result;
use crate::record::{EstimationResult, PhaseTimings, QueryTermRecord};
use crate::table::{TableReader, TableWriter};

/// Required header of a query pipeline statistics trace.
pub const TRACE_COLUMNS: [&str; 8] = [
    "query",
    "rows",
    "matches",
    "quadwords",
    "cachelines",
    "parse",
    "plan",
    "match",
];

/// Header written before estimation results.
pub const OUTPUT_COLUMNS: [&str; 5] = [
    "Query",
    "TermPos",
    "Quadwords",
    "Cachelines",
    "ExpectedCachelines",
];

/// Streaming reader yielding one `QueryTermRecord` per trace row.
pub struct TraceReader<R> {
    table: TableReader<R>,
}

impl TraceReader<BufReader<File>> {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        Self::new(BufReader::new(file), path.display().to_string())
    }
}

impl<R: BufRead> TraceReader<R> {
    /// Validates the header before returning, so a schema mismatch is
    /// reported before any record is produced.
    pub fn new(reader: R, input: impl Into<String>) -> Result<Self> {
        let mut table = TableReader::new(reader, input);
        table.read_header(&TRACE_COLUMNS)?;
        Ok(Self { table })
    }

    pub fn next_record(&mut self) -> Result<Option<QueryTermRecord>> {
        let row = match self.table.next_row()? {
            Some(row) => row,
            None => return Ok(None),
        };
        let input = self.table.input();
        row.expect_arity(input, TRACE_COLUMNS.len())?;

        let row_count = row.parse_u64(input, 1, "rows")?;
        let matches = row.parse_u64(input, 2, "matches")?;
        let quadwords_touched = row.parse_u64(input, 3, "quadwords")?;
        let actual_cachelines = row.parse_u64(input, 4, "cachelines")?;

        let line = row.line;
        let mut fields = row.fields.into_iter();
        let term = fields.next().unwrap_or_default();
        let mut fields = fields.skip(4);
        let timings = PhaseTimings {
            parse: fields.next().unwrap_or_default(),
            plan: fields.next().unwrap_or_default(),
            matching: fields.next().unwrap_or_default(),
        };

        Ok(Some(QueryTermRecord {
            line,
            term,
            row_count,
            matches,
            quadwords_touched,
            actual_cachelines,
            timings,
        }))
    }

    /// Read every remaining record. The first error aborts the read.
    pub fn read_all(mut self) -> Result<Vec<QueryTermRecord>> {
        let mut records = Vec::new();
        while let Some(record) = self.next_record()? {
            records.push(record);
        }
        debug!("{}: read {} trace records", self.table.input(), records.len());
        Ok(records)
    }
}

/// Write the output header followed by one row per result.
pub fn write_results<W: Write>(writer: W, results: &[EstimationResult]) -> Result<W> {
    let mut table = TableWriter::new(writer);
    table.write_row(&OUTPUT_COLUMNS)?;
    for result in results {
        table.write_row(&result.to_fields())?;
    }
    table.flush()?;
    Ok(table.into_inner())
}
