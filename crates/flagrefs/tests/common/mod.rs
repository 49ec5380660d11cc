use std::path::{Path, PathBuf};

use flagrefs::types::HunkRep;
use regex::Regex;

/// A synthetic absolute workspace root for tests that never touch the
/// filesystem; the parser only uses it as a string prefix.
pub fn fake_workspace() -> PathBuf {
    PathBuf::from("/work/repo")
}

/// Format one searcher record the way ag prints it: absolute path, `:` for
/// matches and `-` for context lines, then the line number and text.
pub fn grep_record(workspace: &Path, path: &str, is_match: bool, line_num: u32, text: &str) -> String {
    let sep = if is_match { ':' } else { '-' };
    format!(
        "{}/{}{}{}{}{}",
        workspace.display(),
        path,
        sep,
        line_num,
        sep,
        text
    )
}

pub fn hunk(offset: u32, lines: &str, proj_key: &str, flag_key: &str) -> HunkRep {
    HunkRep {
        offset,
        lines: lines.to_string(),
        proj_key: proj_key.to_string(),
        flag_key: flag_key.to_string(),
    }
}

pub fn flags(keys: &[&str]) -> Vec<String> {
    keys.iter().map(|k| k.to_string()).collect()
}

pub fn match_nothing() -> Regex {
    Regex::new("").unwrap()
}
