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

//! Hunking: one hunk per (flag, contiguous region), merging occurrences of
//! the same flag whose context windows touch or overlap.

use super::aggregate::{aggregate_by_path, FileGrepResults};
use crate::types::{GrepResultLine, HunkRep, ReferenceHunksRep};

impl FileGrepResults {
    /// Emit the hunks for every flag present in this file. Order among the
    /// returned hunks follows map iteration and is not deterministic; the
    /// serializer sorts.
    pub fn make_hunk_reps(&self, proj_key: &str, ctx_lines: i32) -> Vec<HunkRep> {
        let mut hunks = Vec::new();
        for (flag_key, positions) in &self.flag_index {
            self.hunks_for_flag(flag_key, positions, proj_key, ctx_lines, &mut hunks);
        }
        hunks
    }

    /// Walk one flag's occurrences in ascending line order, growing an
    /// in-progress [start, end] region. An occurrence whose context span
    /// touches or overlaps the region (span_start <= end + 1) extends it;
    /// otherwise the region is emitted and a new one begins.
    fn hunks_for_flag(
        &self,
        flag_key: &str,
        positions: &[usize],
        proj_key: &str,
        ctx_lines: i32,
        out: &mut Vec<HunkRep>,
    ) {
        let ctx = ctx_lines.max(0) as u32;
        let mut current: Option<(u32, u32)> = None;
        for &pos in positions {
            let line_num = self.lines[pos].line_num;
            let span_start = line_num.saturating_sub(ctx).max(1);
            let span_end = line_num.saturating_add(ctx);
            current = Some(match current {
                None => (span_start, span_end),
                Some((start, end)) if span_start <= end.saturating_add(1) => {
                    (start, end.max(span_end))
                }
                Some((start, end)) => {
                    out.push(self.render_hunk(flag_key, proj_key, start, end));
                    (span_start, span_end)
                }
            });
        }
        if let Some((start, end)) = current {
            out.push(self.render_hunk(flag_key, proj_key, start, end));
        }
    }

    /// Materialize the region [start, end] from whatever lines this file
    /// actually has in that range. Line numbers with no record contribute no
    /// text, so a region truncated at a file boundary renders short. The
    /// hunk offset is the first line actually present.
    fn render_hunk(&self, flag_key: &str, proj_key: &str, start: u32, end: u32) -> HunkRep {
        let mut offset = start;
        let mut seen_first = false;
        let mut text = String::new();
        for line in &self.lines {
            if line.line_num < start {
                continue;
            }
            if line.line_num > end {
                break;
            }
            if !seen_first {
                offset = line.line_num;
                seen_first = true;
            }
            text.push_str(&line.line_text);
            text.push('\n');
        }
        HunkRep {
            offset,
            lines: text,
            proj_key: proj_key.to_string(),
            flag_key: flag_key.to_string(),
        }
    }
}

/// The canonical payload for one run: aggregate by path, hunk each file,
/// drop paths that produced nothing, then sort paths ascending and hunks by
/// (offset, flag key). This is the only place map iteration order is
/// laundered out of the output.
pub fn make_reference_hunks_reps(
    lines: Vec<GrepResultLine>,
    ctx_lines: i32,
    proj_key: &str,
) -> Vec<ReferenceHunksRep> {
    let mut reps: Vec<ReferenceHunksRep> = Vec::new();
    for (path, file_results) in aggregate_by_path(lines) {
        let mut hunks = file_results.make_hunk_reps(proj_key, ctx_lines);
        if hunks.is_empty() {
            continue;
        }
        hunks.sort_by(|a, b| {
            a.offset
                .cmp(&b.offset)
                .then_with(|| a.flag_key.cmp(&b.flag_key))
        });
        reps.push(ReferenceHunksRep { path, hunks });
    }
    reps.sort_by(|a, b| a.path.cmp(&b.path));
    reps
}
