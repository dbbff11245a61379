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

//! Comma-separated table codec
//!
//! Both inputs and the output of the estimator are small comma-separated
//! tables with a fixed header. The dialect is the one produced by the
//! index's statistics writers:
//!
//! - fields separated by `,`
//! - a field starting with `"` is quoted; `""` inside it is a literal quote
//!   and it may contain commas and line breaks
//! - `\n` and `\r\n` line endings
//! - blank lines carry no record and are skipped
//!
//! Field text is otherwise preserved exactly: no trimming, no case folding.

use std::io::{self, BufRead, Write};

use crate::error::{Result, RowCostError};

/// One data row together with the 1-based line it starts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub line: usize,
    pub fields: Vec<String>,
}

impl TableRow {
    /// Fail with `MalformedRecord` unless the row has exactly `arity` fields.
    pub fn expect_arity(&self, input: &str, arity: usize) -> Result<()> {
        if self.fields.len() != arity {
            return Err(RowCostError::MalformedRecord {
                input: input.to_string(),
                line: self.line,
                reason: format!("expected {} fields, found {}", arity, self.fields.len()),
            });
        }
        Ok(())
    }

    /// Parse field `index` as a non-negative integer.
    pub fn parse_u64(&self, input: &str, index: usize, column: &str) -> Result<u64> {
        let raw = &self.fields[index];
        raw.parse::<u64>().map_err(|_| RowCostError::MalformedRecord {
            input: input.to_string(),
            line: self.line,
            reason: format!("column '{}' expected a non-negative integer, found {:?}", column, raw),
        })
    }

    /// Parse field `index` as a decimal number.
    pub fn parse_f64(&self, input: &str, index: usize, column: &str) -> Result<f64> {
        let raw = &self.fields[index];
        raw.parse::<f64>().map_err(|_| RowCostError::MalformedRecord {
            input: input.to_string(),
            line: self.line,
            reason: format!("column '{}' expected a number, found {:?}", column, raw),
        })
    }
}

/// Streaming reader over a headed table.
pub struct TableReader<R> {
    reader: R,
    input: String,
    line: usize,
    buf: String,
}

impl<R: BufRead> TableReader<R> {
    /// `input` names the source in error messages (usually its path).
    pub fn new(reader: R, input: impl Into<String>) -> Self {
        Self {
            reader,
            input: input.into(),
            line: 0,
            buf: String::new(),
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Read the header row and check it matches `expected` exactly.
    ///
    /// A missing header (empty input) is reported as a schema mismatch
    /// against an empty column list.
    pub fn read_header(&mut self, expected: &[&str]) -> Result<()> {
        let header = self.next_row()?;
        let (line, found) = match header {
            Some(row) => (row.line, row.fields),
            None => (self.line.max(1), Vec::new()),
        };

        let matches = found.len() == expected.len()
            && found.iter().zip(expected).all(|(f, e)| f == e);
        if !matches {
            return Err(RowCostError::MalformedSchema {
                input: self.input.clone(),
                line,
                expected: expected.join(", "),
                found: found.join(", "),
            });
        }
        Ok(())
    }

    /// Next non-blank row, or `None` at end of input.
    pub fn next_row(&mut self) -> Result<Option<TableRow>> {
        loop {
            if !self.read_line()? {
                return Ok(None);
            }
            if self.buf.is_empty() {
                continue;
            }

            let start = self.line;
            let mut fields = Vec::new();
            let mut current = String::new();
            let mut in_quotes = false;
            let mut at_field_start = true;

            loop {
                let mut chars = self.buf.chars().peekable();
                while let Some(ch) = chars.next() {
                    match ch {
                        '"' if in_quotes => {
                            if chars.peek() == Some(&'"') {
                                chars.next();
                                current.push('"');
                            } else {
                                in_quotes = false;
                            }
                        }
                        '"' if at_field_start => {
                            in_quotes = true;
                            at_field_start = false;
                        }
                        ',' if !in_quotes => {
                            fields.push(std::mem::take(&mut current));
                            at_field_start = true;
                        }
                        _ => {
                            current.push(ch);
                            at_field_start = false;
                        }
                    }
                }

                if !in_quotes {
                    break;
                }

                // Quoted field continues on the next physical line.
                current.push('\n');
                if !self.read_line()? {
                    return Err(RowCostError::MalformedRecord {
                        input: self.input.clone(),
                        line: start,
                        reason: "unterminated quoted field".to_string(),
                    });
                }
            }

            fields.push(current);
            return Ok(Some(TableRow { line: start, fields }));
        }
    }

    /// Load the next physical line into `buf` without its terminator.
    fn read_line(&mut self) -> Result<bool> {
        self.buf.clear();
        if self.reader.read_line(&mut self.buf)? == 0 {
            return Ok(false);
        }
        self.line += 1;

        if self.buf.ends_with('\n') {
            self.buf.pop();
            if self.buf.ends_with('\r') {
                self.buf.pop();
            }
        }
        if self.line == 1 && self.buf.starts_with('\u{feff}') {
            self.buf.drain(..'\u{feff}'.len_utf8());
        }
        Ok(true)
    }
}

fn needs_quoting(s: &str) -> bool {
    s.contains(|c| matches!(c, ',' | '"' | '\n' | '\r'))
}

/// Writer for headed tables in the same dialect [`TableReader`] accepts.
pub struct TableWriter<W: Write> {
    writer: W,
}

impl<W: Write> TableWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn write_row<S: AsRef<str>>(&mut self, fields: &[S]) -> io::Result<()> {
        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                self.writer.write_all(b",")?;
            }
            let field = field.as_ref();
            if needs_quoting(field) {
                self.writer.write_all(b"\"")?;
                self.writer.write_all(field.replace('"', "\"\"").as_bytes())?;
                self.writer.write_all(b"\"")?;
            } else {
                self.writer.write_all(field.as_bytes())?;
            }
        }
        self.writer.write_all(b"\n")
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}
