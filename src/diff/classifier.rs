/*!
 * Line classification for two sequences of canonical event lines.
 *
 * Lines are aligned with the sequence matcher. Blocks where old lines were
 * replaced by new ones are refined: the most similar old/new pair is located
 * and emitted as a removed/added pair carrying character ranges that changed,
 * then the parts before and after that pair are refined the same way.
 */

use std::ops::Range;

use log::trace;

use crate::diff::matcher::{OpTag, SequenceMatcher};

// Best-ratio floor is one hundredth below the cutoff so ratios in between are
// recorded but never accepted
const RATIO_FLOOR_OFFSET: f64 = 0.01;

// Replace blocks with more old/new combinations than this are paired along
// the diagonal instead of searching every combination
const EXHAUSTIVE_PAIR_LIMIT: usize = 1024;

// Old lines considered on each side of the diagonal for one new line
const DIAGONAL_WINDOW: usize = 10;

/// Classification of a rendered line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffTag {
    Unchanged,
    Removed,
    Added,
}

impl DiffTag {
    /// Two-character prefix used by plain text diffs
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Unchanged => "  ",
            Self::Removed => "- ",
            Self::Added => "+ ",
        }
    }
}

/// Which part of a line should be emphasised
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Highlight {
    /// Nothing changed
    None,
    /// The line changed as a whole
    Whole,
    /// Byte ranges that changed inside a refined removed/added pair.
    ///
    /// An empty list is valid: it marks the side of a refined pair that has
    /// no characters of its own, e.g. the old line when text was only
    /// appended. Renderers draw it with the line background and no emphasis,
    /// unlike [`Highlight::Whole`] which is reserved for unpaired lines.
    Ranges(Vec<Range<usize>>),
}

/// One line of output together with how it should be rendered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderInstruction {
    pub tag: DiffTag,
    pub line: String,
    pub highlight: Highlight,
}

impl RenderInstruction {
    pub fn unchanged(line: impl Into<String>) -> Self {
        Self {
            tag: DiffTag::Unchanged,
            line: line.into(),
            highlight: Highlight::None,
        }
    }

    pub fn removed(line: impl Into<String>) -> Self {
        Self {
            tag: DiffTag::Removed,
            line: line.into(),
            highlight: Highlight::Whole,
        }
    }

    pub fn added(line: impl Into<String>) -> Self {
        Self {
            tag: DiffTag::Added,
            line: line.into(),
            highlight: Highlight::Whole,
        }
    }

    pub fn prefix(&self) -> &'static str {
        self.tag.prefix()
    }

    /// Split the line into consecutive `(text, highlighted)` segments.
    ///
    /// Concatenating the texts always gives back the full line.
    pub fn segments(&self) -> Vec<(&str, bool)> {
        let line = self.line.as_str();
        match &self.highlight {
            Highlight::None => vec![(line, false)],
            Highlight::Whole => vec![(line, true)],
            Highlight::Ranges(ranges) => {
                let mut segments = Vec::with_capacity(ranges.len() * 2 + 1);
                let mut cursor = 0;
                for range in ranges {
                    if range.start > cursor {
                        segments.push((&line[cursor..range.start], false));
                    }
                    segments.push((&line[range.clone()], true));
                    cursor = range.end;
                }
                if cursor < line.len() || segments.is_empty() {
                    segments.push((&line[cursor..], false));
                }
                segments
            }
        }
    }
}

/// Tunables of the classifier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiffOptions {
    /// Prune popular elements in sequences of 200 or more items
    pub autojunk: bool,

    /// Minimum character similarity for a removed/added pair to be refined
    pub similarity_cutoff: f64,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            autojunk: false,
            similarity_cutoff: 0.75,
        }
    }
}

/// Line counts of a classified diff
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffSummary {
    pub unchanged: usize,
    pub removed: usize,
    pub added: usize,
}

impl DiffSummary {
    pub fn from_instructions(instructions: &[RenderInstruction]) -> Self {
        let mut summary = Self::default();
        for instruction in instructions {
            match instruction.tag {
                DiffTag::Unchanged => summary.unchanged += 1,
                DiffTag::Removed => summary.removed += 1,
                DiffTag::Added => summary.added += 1,
            }
        }
        summary
    }

    pub fn has_changes(&self) -> bool {
        self.removed > 0 || self.added > 0
    }
}

/// Classify two sequences of canonical lines with default options
pub fn classify<S: AsRef<str>>(old_lines: &[S], new_lines: &[S]) -> Vec<RenderInstruction> {
    Classifier::default().classify(old_lines, new_lines)
}

/// Line-oriented diff producing self-contained render instructions
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    options: DiffOptions,
}

impl Classifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: DiffOptions) -> Self {
        Self { options }
    }

    /// Align `old_lines` with `new_lines` and classify every line.
    ///
    /// Output order follows the alignment. Unmatched lines that could not be
    /// paired with a similar line on the other side are highlighted whole.
    pub fn classify<S: AsRef<str>>(&self, old_lines: &[S], new_lines: &[S]) -> Vec<RenderInstruction> {
        let a: Vec<&str> = old_lines.iter().map(AsRef::as_ref).collect();
        let b: Vec<&str> = new_lines.iter().map(AsRef::as_ref).collect();

        let mut out = Vec::with_capacity(a.len().max(b.len()));
        let matcher = SequenceMatcher::with_autojunk(&a, &b, self.options.autojunk);

        for op in matcher.opcodes() {
            match op.tag {
                OpTag::Equal => dump(DiffTag::Unchanged, &a[op.a_start..op.a_end], &mut out),
                OpTag::Delete => dump(DiffTag::Removed, &a[op.a_start..op.a_end], &mut out),
                OpTag::Insert => dump(DiffTag::Added, &b[op.b_start..op.b_end], &mut out),
                OpTag::Replace => {
                    self.refine_replace(&a, op.a_start..op.a_end, &b, op.b_start..op.b_end, &mut out)
                }
            }
        }

        out
    }

    // Small blocks get the exhaustive best-pair search, large ones the
    // diagonal window so a fully retimed script stays near linear
    fn refine_replace(
        &self,
        a: &[&str],
        a_block: Range<usize>,
        b: &[&str],
        b_block: Range<usize>,
        out: &mut Vec<RenderInstruction>,
    ) {
        if a_block.len() * b_block.len() > EXHAUSTIVE_PAIR_LIMIT {
            self.refine_along_diagonal(a, a_block, b, b_block, out);
        } else {
            self.refine_best_pair(a, a_block, b, b_block, out);
        }
    }

    // Pick the most similar pair in the replaced block, emit it, and recurse
    // on what lies before and after it
    fn refine_best_pair(
        &self,
        a: &[&str],
        a_block: Range<usize>,
        b: &[&str],
        b_block: Range<usize>,
        out: &mut Vec<RenderInstruction>,
    ) {
        let cutoff = self.options.similarity_cutoff;
        let mut best_ratio = cutoff - RATIO_FLOOR_OFFSET;
        let mut best: Option<(usize, usize)> = None;
        let mut identical: Option<(usize, usize)> = None;

        let a_chars: Vec<Vec<char>> = a[a_block.clone()].iter().map(|line| line.chars().collect()).collect();

        for j in b_block.clone() {
            let b_chars: Vec<char> = b[j].chars().collect();
            let mut cruncher = SequenceMatcher::with_autojunk(&[], &b_chars, self.options.autojunk);

            for i in a_block.clone() {
                if a[i] == b[j] {
                    identical.get_or_insert((i, j));
                    continue;
                }

                cruncher.set_seq1(&a_chars[i - a_block.start]);
                if cruncher.real_quick_ratio() > best_ratio && cruncher.quick_ratio() > best_ratio {
                    let ratio = cruncher.ratio();
                    if ratio > best_ratio {
                        best_ratio = ratio;
                        best = Some((i, j));
                    }
                }
            }
        }

        let (best_i, best_j) = match (best, identical) {
            (Some(pair), _) if best_ratio >= cutoff => pair,
            (_, Some(pair)) => pair,
            _ => {
                plain_replace(&a[a_block], &b[b_block], out);
                return;
            }
        };

        trace!(
            "Pairing old line {} with new line {} (ratio {:.3})",
            best_i,
            best_j,
            best_ratio
        );

        self.refine_remainder(a, a_block.start..best_i, b, b_block.start..best_j, out);
        self.push_pair(a[best_i], b[best_j], out);
        self.refine_remainder(a, best_i + 1..a_block.end, b, best_j + 1..b_block.end, out);
    }

    // Walk the new lines in order and pair each with the most similar old line
    // near the diagonal. Lines skipped between two pairs are not refined.
    fn refine_along_diagonal(
        &self,
        a: &[&str],
        a_block: Range<usize>,
        b: &[&str],
        b_block: Range<usize>,
        out: &mut Vec<RenderInstruction>,
    ) {
        let cutoff = self.options.similarity_cutoff;
        let a_chars: Vec<Vec<char>> = a[a_block.clone()].iter().map(|line| line.chars().collect()).collect();

        // First old and new line not emitted yet
        let (mut next_i, mut next_j) = (a_block.start, b_block.start);

        for j in b_block.clone() {
            let diagonal = a_block.start + (j - b_block.start);
            let window = diagonal.saturating_sub(DIAGONAL_WINDOW).max(next_i)
                ..(diagonal + DIAGONAL_WINDOW + 1).min(a_block.end);
            if window.is_empty() {
                break;
            }

            let b_chars: Vec<char> = b[j].chars().collect();
            let mut cruncher = SequenceMatcher::with_autojunk(&[], &b_chars, self.options.autojunk);
            let beats = |ratio: f64, best: Option<(usize, f64)>| match best {
                Some((_, best_ratio)) => ratio > best_ratio,
                None => ratio >= cutoff,
            };

            let mut best: Option<(usize, f64)> = None;
            for i in window {
                cruncher.set_seq1(&a_chars[i - a_block.start]);
                if beats(cruncher.real_quick_ratio(), best) && beats(cruncher.quick_ratio(), best) {
                    let ratio = cruncher.ratio();
                    if beats(ratio, best) {
                        best = Some((i, ratio));
                    }
                }
            }

            let Some((i, ratio)) = best else {
                continue;
            };

            trace!("Pairing old line {} with new line {} (ratio {:.3})", i, j, ratio);

            unpaired(a, next_i..i, b, next_j..j, out);
            self.push_pair(a[i], b[j], out);
            next_i = i + 1;
            next_j = j + 1;
        }

        unpaired(a, next_i..a_block.end, b, next_j..b_block.end, out);
    }

    // Identical lines are unchanged, anything else is a refined pair
    fn push_pair(&self, old: &str, new: &str, out: &mut Vec<RenderInstruction>) {
        if old == new {
            out.push(RenderInstruction::unchanged(old));
            return;
        }

        let (old_ranges, new_ranges) = self.inline_ranges(old, new);
        out.push(RenderInstruction {
            tag: DiffTag::Removed,
            line: old.to_string(),
            highlight: Highlight::Ranges(old_ranges),
        });
        out.push(RenderInstruction {
            tag: DiffTag::Added,
            line: new.to_string(),
            highlight: Highlight::Ranges(new_ranges),
        });
    }

    fn refine_remainder(
        &self,
        a: &[&str],
        a_block: Range<usize>,
        b: &[&str],
        b_block: Range<usize>,
        out: &mut Vec<RenderInstruction>,
    ) {
        match (a_block.is_empty(), b_block.is_empty()) {
            (false, false) => self.refine_replace(a, a_block, b, b_block, out),
            (false, true) => dump(DiffTag::Removed, &a[a_block], out),
            (true, false) => dump(DiffTag::Added, &b[b_block], out),
            (true, true) => {}
        }
    }

    /// Byte ranges of `old` that were replaced or deleted and of `new` that
    /// were replaced or inserted, adjacent ranges merged.
    pub fn inline_ranges(&self, old: &str, new: &str) -> (Vec<Range<usize>>, Vec<Range<usize>>) {
        let old_chars: Vec<char> = old.chars().collect();
        let new_chars: Vec<char> = new.chars().collect();
        let old_offsets = byte_offsets(old);
        let new_offsets = byte_offsets(new);

        let matcher = SequenceMatcher::with_autojunk(&old_chars, &new_chars, self.options.autojunk);

        let mut old_ranges = Vec::new();
        let mut new_ranges = Vec::new();
        for op in matcher.opcodes() {
            let old_range = old_offsets[op.a_start]..old_offsets[op.a_end];
            let new_range = new_offsets[op.b_start]..new_offsets[op.b_end];
            match op.tag {
                OpTag::Equal => {}
                OpTag::Replace => {
                    push_range(&mut old_ranges, old_range);
                    push_range(&mut new_ranges, new_range);
                }
                OpTag::Delete => push_range(&mut old_ranges, old_range),
                OpTag::Insert => push_range(&mut new_ranges, new_range),
            }
        }

        (old_ranges, new_ranges)
    }
}

fn dump(tag: DiffTag, lines: &[&str], out: &mut Vec<RenderInstruction>) {
    out.extend(lines.iter().map(|line| match tag {
        DiffTag::Unchanged => RenderInstruction::unchanged(*line),
        DiffTag::Removed => RenderInstruction::removed(*line),
        DiffTag::Added => RenderInstruction::added(*line),
    }));
}

// Lines between two pairs of the diagonal walk
fn unpaired(
    a: &[&str],
    a_block: Range<usize>,
    b: &[&str],
    b_block: Range<usize>,
    out: &mut Vec<RenderInstruction>,
) {
    match (a_block.is_empty(), b_block.is_empty()) {
        (false, false) => plain_replace(&a[a_block], &b[b_block], out),
        (false, true) => dump(DiffTag::Removed, &a[a_block], out),
        (true, false) => dump(DiffTag::Added, &b[b_block], out),
        (true, true) => {}
    }
}

// No similar pair: the shorter side goes first
fn plain_replace(old: &[&str], new: &[&str], out: &mut Vec<RenderInstruction>) {
    if new.len() < old.len() {
        dump(DiffTag::Added, new, out);
        dump(DiffTag::Removed, old, out);
    } else {
        dump(DiffTag::Removed, old, out);
        dump(DiffTag::Added, new, out);
    }
}

// Byte offset of every char boundary, including the end of the string
fn byte_offsets(line: &str) -> Vec<usize> {
    line.char_indices()
        .map(|(offset, _)| offset)
        .chain(std::iter::once(line.len()))
        .collect()
}

fn push_range(ranges: &mut Vec<Range<usize>>, range: Range<usize>) {
    if range.is_empty() {
        return;
    }
    if let Some(last) = ranges.last_mut() {
        if last.end == range.start {
            last.end = range.end;
            return;
        }
    }
    ranges.push(range);
}
