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

use std::collections::HashMap;

use crate::types::GrepResultLine;

/// All reference lines for one file, in arrival order (ascending line
/// numbers, no duplicates), plus a per-flag index of positions into `lines`.
#[derive(Debug, Default)]
pub struct FileGrepResults {
    pub lines: Vec<GrepResultLine>,
    pub flag_index: HashMap<String, Vec<usize>>,
}

impl FileGrepResults {
    fn push(&mut self, line: GrepResultLine) {
        let pos = self.lines.len();
        for key in &line.flag_keys {
            self.flag_index.entry(key.clone()).or_default().push(pos);
        }
        self.lines.push(line);
    }
}

/// Group reference lines by path. Lines for one path are expected to arrive
/// contiguously and in ascending line-number order; this preserves that
/// order and neither re-sorts nor dedupes. Map iteration order is
/// non-deterministic here; the serializer canonicalizes.
pub fn aggregate_by_path(
    lines: impl IntoIterator<Item = GrepResultLine>,
) -> HashMap<String, FileGrepResults> {
    let mut by_path: HashMap<String, FileGrepResults> = HashMap::new();
    for line in lines {
        by_path.entry(line.path.clone()).or_default().push(line);
    }
    by_path
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(path: &str, line_num: u32, text: &str, flag_keys: &[&str]) -> GrepResultLine {
        GrepResultLine {
            path: path.to_string(),
            line_num,
            line_text: text.to_string(),
            flag_keys: flag_keys.iter().map(|k| k.to_string()).collect(),
        }
    }

    #[test]
    fn groups_into_path_map() {
        let a1 = line("a", 1, "flag-1", &["flag-1"]);
        let a2 = line("a", 2, "flag-2", &["flag-2"]);
        let b1 = line("b", 1, "flag-3", &["flag-3"]);
        let b2 = line("b", 2, "flag-2", &["flag-4"]);

        let by_path = aggregate_by_path(vec![a1.clone(), a2.clone(), b1.clone(), b2.clone()]);
        assert_eq!(by_path.len(), 2);

        let a = &by_path["a"];
        assert_eq!(a.lines, vec![a1, a2]);
        assert_eq!(a.flag_index.len(), 2);
        assert_eq!(a.flag_index["flag-1"], vec![0]);
        assert_eq!(a.flag_index["flag-2"], vec![1]);

        let b = &by_path["b"];
        assert_eq!(b.lines, vec![b1, b2]);
        assert_eq!(b.flag_index.len(), 2);
        assert_eq!(b.flag_index["flag-3"], vec![0]);
        assert_eq!(b.flag_index["flag-4"], vec![1]);
    }

    #[test]
    fn context_lines_do_not_enter_the_flag_index() {
        let by_path = aggregate_by_path(vec![
            line("a", 4, "context", &[]),
            line("a", 5, "flag-1", &["flag-1"]),
            line("a", 6, "context", &[]),
        ]);
        let a = &by_path["a"];
        assert_eq!(a.lines.len(), 3);
        assert_eq!(a.flag_index.len(), 1);
        assert_eq!(a.flag_index["flag-1"], vec![1]);
    }

    #[test]
    fn one_line_can_index_under_several_flags() {
        let by_path = aggregate_by_path(vec![line("a", 7, "flag-1 flag-2", &["flag-1", "flag-2"])]);
        let a = &by_path["a"];
        assert_eq!(a.flag_index["flag-1"], vec![0]);
        assert_eq!(a.flag_index["flag-2"], vec![0]);
    }
}
