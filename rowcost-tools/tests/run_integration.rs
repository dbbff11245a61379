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

//! Run Integration Tests
//!
//! End-to-end runs over files on disk: library entry point and the
//! `rowcost-cachelines` binary.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use rowcost_core::RowCostError;
use rowcost_model::TreatmentKind;
use rowcost_tools::{run, RunConfig};
use tempfile::TempDir;

const DOCFREQ: &str = "\
hash,gramSize,streamId,frequency,text
0001,1,0,0.01,dog
0002,1,0,0.2,the
0003,1,0,0.001,\"hot, dog\"
";

const TRACE: &str = "\
query,rows,matches,quadwords,cachelines,parse,plan,match
dog,2,140,3000,60,0.01,0.02,0.30
the,3,900,4000,110,0.01,0.02,0.40
\"hot, dog\",4,3,900,70,0.01,0.02,0.10
unseen,3,0,12,12,0.01,0.02,0.05
";

/// Test fixture holding a scratch directory with both inputs
struct RunFixture {
    dir: TempDir,
}

impl RunFixture {
    fn new(docfreq: &str, trace: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("docfreq.csv"), docfreq).unwrap();
        fs::write(dir.path().join("trace.csv"), trace).unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn config(&self) -> RunConfig {
        RunConfig::new(
            self.path("docfreq.csv"),
            self.path("trace.csv"),
            self.path("expected.csv"),
        )
    }

    fn output_lines(&self) -> Vec<String> {
        fs::read_to_string(self.path("expected.csv"))
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }
}

fn root_cause(err: &anyhow::Error) -> Option<&RowCostError> {
    err.chain().find_map(|e| e.downcast_ref::<RowCostError>())
}

#[test]
fn test_run_writes_one_row_per_record() {
    let fixture = RunFixture::new(DOCFREQ, TRACE);
    let summary = run(&fixture.config()).unwrap();

    let lines = fixture.output_lines();
    assert_eq!(lines[0], "Query,TermPos,Quadwords,Cachelines,ExpectedCachelines");
    assert_eq!(lines.len(), 5);
    assert_eq!(lines[1], "dog,0,3000,60,60");
    // Both shared rows of "the" are certain reads.
    assert_eq!(lines[2], "the,1,4000,110,120.0");
    assert!(lines[3].starts_with("\"hot, dog\",2,900,70,"));
    assert!(lines[4].starts_with("unseen,3,12,12,"));

    assert_eq!(summary.terms, 4);
    assert_eq!(summary.total_actual_cachelines, 252);
}

#[test]
fn test_unknown_term_estimated_as_zero_frequency() {
    let trace = "query,rows,matches,quadwords,cachelines,parse,plan,match\n\
                 unseen,3,0,0,0,0,0,0\n";
    let docfreq = "hash,gramSize,streamId,frequency,text\n1,1,0,0,zero\n";
    let with_zero = format!("{trace}zero,3,0,0,0,0,0,0\n");
    let fixture = RunFixture::new(docfreq, &with_zero);
    run(&fixture.config()).unwrap();

    let lines = fixture.output_lines();
    let unseen = lines[1].rsplit(',').next().unwrap().to_string();
    let zero = lines[2].rsplit(',').next().unwrap().to_string();
    assert_eq!(unseen, zero);
}

#[test]
fn test_rerun_is_byte_identical() {
    let fixture = RunFixture::new(DOCFREQ, TRACE);
    run(&fixture.config()).unwrap();
    let first = fs::read(fixture.path("expected.csv")).unwrap();
    run(&fixture.config()).unwrap();
    let second = fs::read(fixture.path("expected.csv")).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_malformed_frequency_header_leaves_no_output() {
    let fixture = RunFixture::new("hash,gramSize,frequency,text\n1,1,0.1,dog\n", TRACE);
    let err = run(&fixture.config()).unwrap_err();
    assert!(matches!(
        root_cause(&err),
        Some(RowCostError::MalformedSchema { .. })
    ));
    assert!(!fixture.path("expected.csv").exists());
}

#[test]
fn test_malformed_trace_header_leaves_no_output() {
    let fixture = RunFixture::new(DOCFREQ, "query,rows,matches\ndog,2,1\n");
    let err = run(&fixture.config()).unwrap_err();
    assert!(matches!(
        root_cause(&err),
        Some(RowCostError::MalformedSchema { .. })
    ));
    assert!(!fixture.path("expected.csv").exists());
}

#[test]
fn test_malformed_record_aborts_run() {
    let trace = format!("{TRACE}broken,2,1\n");
    let fixture = RunFixture::new(DOCFREQ, &trace);
    let err = run(&fixture.config()).unwrap_err();
    assert!(matches!(
        root_cause(&err),
        Some(RowCostError::MalformedRecord { line: 6, .. })
    ));
    assert!(!fixture.path("expected.csv").exists());
}

#[test]
fn test_zero_row_record_is_invalid() {
    let trace = format!("{TRACE}empty,0,0,0,0,0,0,0\n");
    let fixture = RunFixture::new(DOCFREQ, &trace);
    let err = run(&fixture.config()).unwrap_err();
    assert!(matches!(
        root_cause(&err),
        Some(RowCostError::InvalidRecord { line: 6, .. })
    ));
    assert!(!fixture.path("expected.csv").exists());
}

#[test]
fn test_failed_run_keeps_previous_output() {
    let fixture = RunFixture::new(DOCFREQ, TRACE);
    fs::write(fixture.path("expected.csv"), "previous\n").unwrap();
    fs::write(fixture.path("trace.csv"), "bad header\n").unwrap();
    assert!(run(&fixture.config()).is_err());
    assert_eq!(fixture.output_lines(), vec!["previous"]);
}

#[test]
fn test_treatment_and_summary_file() {
    let fixture = RunFixture::new(DOCFREQ, TRACE);
    let mut config = fixture.config();
    config.treatment = TreatmentKind::FrequencyConscious;
    config.summary_file = Some(fixture.path("summary.json"));
    run(&config).unwrap();

    // "the" is more frequent than the density: one private row.
    assert_eq!(fixture.output_lines()[2], "the,1,4000,110,60");

    let summary: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(fixture.path("summary.json")).unwrap()).unwrap();
    assert_eq!(summary["terms"], 4);
    assert_eq!(summary["total_actual_cachelines"], 252);
}

fn binary(dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_rowcost-cachelines"));
    cmd.current_dir(dir);
    for key in [
        "ROWCOST_CACHELINES_PER_ROW",
        "ROWCOST_DENSITY",
        "ROWCOST_ADDRESS_SLOTS_PER_ROW",
        "ROWCOST_RESERVED_ROWS",
        "ROWCOST_TREATMENT",
        "ROWCOST_THREADS",
        "ROWCOST_SUMMARY_FILE",
    ] {
        cmd.env_remove(key);
    }
    cmd
}

#[test]
fn test_binary_wrong_argument_count_exits_one() {
    let fixture = RunFixture::new(DOCFREQ, TRACE);
    let output = binary(fixture.dir.path())
        .args(["docfreq.csv", "trace.csv"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Usage"));

    let output = binary(fixture.dir.path())
        .args(["docfreq.csv", "trace.csv", "out.csv", "extra"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_binary_success_and_failure() {
    let fixture = RunFixture::new(DOCFREQ, TRACE);
    let status = binary(fixture.dir.path())
        .args(["docfreq.csv", "trace.csv", "expected.csv"])
        .status()
        .unwrap();
    assert!(status.success());
    assert_eq!(fixture.output_lines().len(), 5);

    fs::write(fixture.path("bad.csv"), "query\n").unwrap();
    let output = binary(fixture.dir.path())
        .args(["docfreq.csv", "bad.csv", "bad-out.csv"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Malformed schema"));
    assert!(!fixture.path("bad-out.csv").exists());
}

#[test]
fn test_binary_rejects_bad_configuration() {
    let fixture = RunFixture::new(DOCFREQ, TRACE);
    let output = binary(fixture.dir.path())
        .env("ROWCOST_DENSITY", "2.0")
        .args(["docfreq.csv", "trace.csv", "expected.csv"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(!fixture.path("expected.csv").exists());
}
