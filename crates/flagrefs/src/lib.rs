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

//! Feature-flag code reference scanner.
//! Walks a checked-out work tree with an external searcher, groups flag
//! occurrences into context-bearing hunks, and publishes the per-branch
//! inventory to the flag service.

pub mod config;
pub mod parse;
pub mod remote;
pub mod search;
pub mod types;
pub mod workspace;

// Re-export the pipeline stages for downstream callers that prefer a flat
// import; the modules stay the source of truth for anything else.
pub use crate::parse::{
    aggregate_by_path, generate_references_from_grep, make_reference_hunks_reps,
    parse_grep_output, FileGrepResults,
};
pub use crate::types::{BranchRep, GrepResultLine, HunkRep, ReferenceHunksRep};
pub use crate::workspace::RepoWorkspace;
