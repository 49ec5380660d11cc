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

use std::path::Path;
use std::process::Command;

use anyhow::{bail, Context, Result};
use log::debug;

// ag exits with this code when the search ran fine but nothing matched
const NO_MATCHES_EXIT_CODE: i32 = 1;

/// One whole-word alternation over every configured flag key, with each key
/// escaped as a literal.
pub fn flag_pattern(flags: &[String]) -> String {
    let escaped: Vec<String> = flags.iter().map(|f| regex::escape(f)).collect();
    format!(r"\b({})\b", escaped.join("|"))
}

/// Run the external searcher over the workspace for every configured flag
/// and return its raw stdout. Records come back one per line as
/// `path<sep>lineNo<sep>text`, `:` for matches and `-` for context lines.
pub fn search_for_flags(workspace: &Path, flags: &[String], ctx_lines: i32) -> Result<String> {
    let pattern = flag_pattern(flags);
    let mut cmd = Command::new("ag");
    cmd.arg("--nogroup").arg("--case-sensitive");
    if ctx_lines > 0 {
        cmd.arg(format!("-C{}", ctx_lines));
    }
    cmd.arg(&pattern).arg(workspace);
    debug!(
        "running searcher over {} for {} flags",
        workspace.display(),
        flags.len()
    );

    let output = cmd
        .output()
        .context("failed to invoke ag (The Silver Searcher)")?;
    if output.status.success() {
        return Ok(String::from_utf8_lossy(&output.stdout).into_owned());
    }
    if output.status.code() == Some(NO_MATCHES_EXIT_CODE) {
        debug!("searcher found no flag references");
        return Ok(String::new());
    }
    bail!(
        "searcher failed ({}): {}",
        output.status,
        String::from_utf8_lossy(&output.stderr).trim()
    );
}
