use anyhow::{bail, Result};
use std::ops::Range;

/// A byte-range splice against the original source text. The transformer
/// computes edits from tree spans; this module is the only place output text
/// is assembled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceEdit {
    pub start: usize,
    pub end: usize,
    pub replacement: String,
}

impl SourceEdit {
    pub fn replace(range: Range<usize>, replacement: impl Into<String>) -> Self {
        Self {
            start: range.start,
            end: range.end,
            replacement: replacement.into(),
        }
    }

    pub fn insert(at: usize, text: impl Into<String>) -> Self {
        Self {
            start: at,
            end: at,
            replacement: text.into(),
        }
    }
}

/// Apply edits to the source, in position order. Edits must be in-bounds and
/// non-overlapping; all unedited bytes pass through untouched.
pub fn apply_edits(source: &str, edits: &[SourceEdit]) -> Result<String> {
    let mut sorted: Vec<&SourceEdit> = edits.iter().collect();
    sorted.sort_by_key(|e| (e.start, e.end));

    let mut output = String::with_capacity(source.len());
    let mut cursor = 0usize;
    for edit in sorted {
        if edit.end > source.len() || edit.start > edit.end {
            bail!(
                "edit {}..{} out of bounds for {} byte source",
                edit.start,
                edit.end,
                source.len()
            );
        }
        if edit.start < cursor {
            bail!("overlapping edits at byte {}", edit.start);
        }
        output.push_str(&source[cursor..edit.start]);
        output.push_str(&edit.replacement);
        cursor = edit.end;
    }
    output.push_str(&source[cursor..]);
    Ok(output)
}
