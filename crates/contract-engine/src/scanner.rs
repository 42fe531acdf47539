use shared_types::ClauseCandidate;

use crate::patterns::classify_line;

/// Lines this short are headings or fragments, not clauses worth a revision
pub const MIN_CLAUSE_CHARS: usize = 50;

/// Find contract lines that carry supplier risk.
///
/// Lines are trimmed and empty lines dropped before numbering, so `line` is the
/// 1-based position among non-empty lines. Candidates are returned in document
/// order.
pub fn scan_clauses(text: &str) -> Vec<ClauseCandidate> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .enumerate()
        .filter_map(|(idx, line)| {
            let (risk, _) = classify_line(line)?;
            if line.chars().count() <= MIN_CLAUSE_CHARS {
                return None;
            }
            Some(ClauseCandidate {
                line: idx + 1,
                text: line.to_string(),
                risk,
            })
        })
        .collect()
}
