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

use serde::{Deserialize, Serialize};

/// One line of searcher output after parsing: a repo-relative path, a 1-based
/// line number, the raw line text, and whichever configured flag keys occur
/// in the text as whole words. Context lines carry an empty `flag_keys`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrepResultLine {
    pub path: String,
    pub line_num: u32,
    pub line_text: String,
    pub flag_keys: Vec<String>,
}

/// A contiguous excerpt of one file attributed to exactly one flag.
/// `lines` is the concatenated line texts, each terminated by a newline;
/// `offset` is the 1-based line number of the first line in the source file.
///
/// Field names and casing are normative: the remote service keys on them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HunkRep {
    pub offset: u32,
    pub lines: String,
    pub proj_key: String,
    pub flag_key: String,
}

/// All hunks for one repo-relative path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceHunksRep {
    pub path: String,
    pub hunks: Vec<HunkRep>,
}

/// The per-branch snapshot delivered to the sink.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchRep {
    pub name: String,
    pub head: String,
    /// Epoch milliseconds at publish time.
    pub sync_time: i64,
    pub references: Vec<ReferenceHunksRep>,
}

impl BranchRep {
    pub fn new(name: &str, head: &str, references: Vec<ReferenceHunksRep>) -> Self {
        BranchRep {
            name: name.to_string(),
            head: head.to_string(),
            sync_time: chrono::Utc::now().timestamp_millis(),
            references,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hunk_rep_wire_field_names() {
        let hunk = HunkRep {
            offset: 5,
            lines: "a\n".to_string(),
            proj_key: "test".to_string(),
            flag_key: "flag-1".to_string(),
        };
        let v = serde_json::to_value(&hunk).unwrap();
        assert_eq!(v["offset"], 5);
        assert_eq!(v["lines"], "a\n");
        assert_eq!(v["projKey"], "test");
        assert_eq!(v["flagKey"], "flag-1");
    }

    #[test]
    fn branch_rep_wire_field_names() {
        let branch = BranchRep::new("main", "deadbeef", vec![]);
        let v = serde_json::to_value(&branch).unwrap();
        assert_eq!(v["name"], "main");
        assert_eq!(v["head"], "deadbeef");
        assert!(v["syncTime"].is_i64());
        assert!(v["references"].as_array().unwrap().is_empty());
    }
}
