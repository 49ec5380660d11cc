// Copyright 2025 Flagrefs Project
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Turns raw searcher output into typed, filtered reference lines and from
//! there into the canonical per-path hunk payload.

use std::path::Path;

use anyhow::{Context, Result};
use log::debug;
use regex::Regex;

use crate::types::GrepResultLine;

mod aggregate;
mod hunk;

pub use aggregate::{aggregate_by_path, FileGrepResults};
pub use hunk::make_reference_hunks_reps;

/*
GREP_RECORD_PATTERN splits searcher records into groups
Group 1: file path
Group 2: separator; a colon marks a match line, a hyphen a context line
Group 3: line number
Group 4: line contents
*/
const GREP_RECORD_PATTERN: &str = "([^:]+)(:|-)([0-9]+)[:-](.*)";

/// One raw searcher record with the workspace prefix already stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrepRecord {
    pub path: String,
    pub is_match: bool,
    pub line_num: u32,
    pub text: String,
}

/// Parse raw searcher stdout into records. The workspace path is composed
/// into the record regex as an escaped literal, so only records under the
/// scanned tree parse; everything else (including records the searcher
/// mangled) is skipped.
pub fn parse_grep_output(workspace: &Path, raw: &str) -> Result<Vec<GrepRecord>> {
    let pattern = format!(
        "(?:{}/){}",
        regex::escape(&workspace.to_string_lossy()),
        GREP_RECORD_PATTERN
    );
    let record_regex =
        Regex::new(&pattern).context("could not compile searcher record pattern")?;

    let mut records = Vec::new();
    for line in raw.lines() {
        let caps = match record_regex.captures(line) {
            Some(caps) => caps,
            None => {
                debug!("skipping unparseable searcher record: {}", line);
                continue;
            }
        };
        let line_num = match caps[3].parse::<u32>() {
            Ok(n) => n,
            Err(_) => {
                debug!("skipping searcher record with bad line number: {}", line);
                continue;
            }
        };
        records.push(GrepRecord {
            path: caps[1].to_string(),
            is_match: &caps[2] == ":",
            line_num,
            text: caps[4].to_string(),
        });
    }
    Ok(records)
}

/// Convert records into reference lines: drop paths matched by `exclude`,
/// compute the flag keys present on match lines, and scrub line text when
/// the caller opted out of sending source (`ctx_lines < 0`).
pub fn generate_references_from_grep(
    flags: &[String],
    records: Vec<GrepRecord>,
    ctx_lines: i32,
    exclude: &Regex,
) -> Vec<GrepResultLine> {
    let matchers = FlagMatchers::compile(flags);
    let mut lines = Vec::new();
    for record in records {
        if !exclude.as_str().is_empty() && exclude.is_match(&record.path) {
            continue;
        }
        let flag_keys = if record.is_match {
            matchers.matches_in(&record.text)
        } else {
            Vec::new()
        };
        let line_text = if ctx_lines < 0 { String::new() } else { record.text };
        lines.push(GrepResultLine {
            path: record.path,
            line_num: record.line_num,
            line_text,
            flag_keys,
        });
    }
    lines
}

/// The subset of `flags` occurring in `text` as whole-word tokens, in the
/// order the flag list was configured. Substrings do not count: `myFlag`
/// never matches `myFlagX`.
pub fn find_referenced_flags(text: &str, flags: &[String]) -> Vec<String> {
    FlagMatchers::compile(flags).matches_in(text)
}

/// Whole-word matchers, one per configured flag, compiled once per run.
struct FlagMatchers(Vec<(String, Regex)>);

impl FlagMatchers {
    fn compile(flags: &[String]) -> Self {
        FlagMatchers(
            flags
                .iter()
                .filter_map(|flag| {
                    let pattern = format!(r"\b{}\b", regex::escape(flag));
                    Regex::new(&pattern).ok().map(|re| (flag.clone(), re))
                })
                .collect(),
        )
    }

    fn matches_in(&self, text: &str) -> Vec<String> {
        self.0
            .iter()
            .filter(|(_, re)| re.is_match(text))
            .map(|(flag, _)| flag.clone())
            .collect()
    }
}
