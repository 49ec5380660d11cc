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

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::{bail, Context, Result};
use log::{debug, info};

/// A validated checkout: the absolute workspace root plus the git branch and
/// head commit the scan will be attributed to.
#[derive(Debug, Clone)]
pub struct RepoWorkspace {
    pub root: PathBuf,
    pub branch: String,
    pub head_sha: String,
}

impl RepoWorkspace {
    /// Validate `dir`, confirm the external tools are available, and resolve
    /// the branch and head sha. A detached HEAD is a configuration error:
    /// the snapshot must be attributable to a branch.
    pub fn open(dir: &Path) -> Result<Self> {
        let root = normalize_and_validate_dir(dir)
            .context("could not validate directory option")?;
        require_tool("git")?;
        require_tool("ag")?;

        let branch = branch_name(&root)?;
        debug!("identified branch name: {}", branch);
        let head_sha = rev_parse(&root, &branch)?;
        debug!("identified head sha: {}", head_sha);

        Ok(RepoWorkspace {
            root,
            branch,
            head_sha,
        })
    }
}

fn normalize_and_validate_dir(dir: &Path) -> Result<PathBuf> {
    let abs = std::fs::canonicalize(dir)
        .with_context(|| format!("invalid directory: {}", dir.display()))?;
    if !abs.is_dir() {
        bail!("not a directory: {}", abs.display());
    }
    info!("absolute directory path: {}", abs.display());
    Ok(abs)
}

/// Probe a tool by spawning `<name> --version`; a spawn failure means the
/// tool is not on PATH.
fn require_tool(name: &str) -> Result<()> {
    let probe = Command::new(name)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();
    if probe.is_err() {
        bail!(
            "{} is a required dependency, but was not found in the system PATH",
            name
        );
    }
    Ok(())
}

fn git_output(root: &Path, args: &[&str]) -> Result<String> {
    let output = Command::new("git")
        .arg("-C")
        .arg(root)
        .args(args)
        .output()
        .context("failed to invoke git")?;
    if !output.status.success() {
        bail!(
            "git {} failed: {}",
            args.join(" "),
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

fn branch_name(root: &Path) -> Result<String> {
    let name = git_output(root, &["rev-parse", "--abbrev-ref", "HEAD"])
        .context("error parsing git branch name")?;
    // git answers the literal string HEAD when detached
    if name == "HEAD" {
        bail!(
            "git repo at {} must be checked out to a valid branch",
            root.display()
        );
    }
    Ok(name)
}

fn rev_parse(root: &Path, branch: &str) -> Result<String> {
    git_output(root, &["rev-parse", branch]).context("error parsing current commit sha")
}
