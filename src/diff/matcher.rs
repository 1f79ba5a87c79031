/*!
 * Ratcliff/Obershelp sequence matching.
 *
 * Finds the longest contiguous matching block, then recurses on the pieces to
 * its left and right. Unlike a plain LCS this prefers long contiguous runs,
 * which keeps subtitle lines that moved together in one block. The same
 * matcher is used on whole lines and on the characters of a single line.
 */

use std::cell::OnceCell;
use std::collections::HashMap;
use std::hash::Hash;

// Sequences shorter than this never get popular elements pruned
const AUTOJUNK_MIN_LEN: usize = 200;

/// A matching block: `a[a..a + size] == b[b..b + size]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Match {
    pub a: usize,
    pub b: usize,
    pub size: usize,
}

/// Kind of edit an opcode describes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpTag {
    Equal,
    Replace,
    Delete,
    Insert,
}

/// Turns `a[a_start..a_end]` into `b[b_start..b_end]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opcode {
    pub tag: OpTag,
    pub a_start: usize,
    pub a_end: usize,
    pub b_start: usize,
    pub b_end: usize,
}

/// Sequence matcher over two borrowed slices.
///
/// The index of `b` is built once, so comparing many `a` sequences against
/// the same `b` only needs [`SequenceMatcher::set_seq1`].
pub struct SequenceMatcher<'a, T: Eq + Hash> {
    a: &'a [T],
    b: &'a [T],
    b2j: HashMap<&'a T, Vec<usize>>,
    full_b_count: OnceCell<HashMap<&'a T, usize>>,
}

impl<'a, T: Eq + Hash> SequenceMatcher<'a, T> {
    /// Matcher without popular-element pruning
    pub fn new(a: &'a [T], b: &'a [T]) -> Self {
        Self::with_autojunk(a, b, false)
    }

    /// Matcher that optionally prunes elements of `b` occurring in more than
    /// 1% of its positions, once `b` has at least 200 elements.
    pub fn with_autojunk(a: &'a [T], b: &'a [T], autojunk: bool) -> Self {
        let mut b2j: HashMap<&'a T, Vec<usize>> = HashMap::new();
        for (j, elt) in b.iter().enumerate() {
            b2j.entry(elt).or_default().push(j);
        }

        if autojunk && b.len() >= AUTOJUNK_MIN_LEN {
            let threshold = b.len() / 100 + 1;
            b2j.retain(|_, indices| indices.len() <= threshold);
        }

        Self {
            a,
            b,
            b2j,
            full_b_count: OnceCell::new(),
        }
    }

    /// Replace the first sequence, keeping the index built for `b`
    pub fn set_seq1(&mut self, a: &'a [T]) {
        self.a = a;
    }

    /// Longest matching block in `a[alo..ahi]` and `b[blo..bhi]`.
    ///
    /// Among blocks of equal size the one starting earliest in `a` wins, then
    /// the one starting earliest in `b`. A zero-sized match at `(alo, blo)`
    /// means nothing matched.
    pub fn find_longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> Match {
        let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0usize);

        // j2len[j] = length of the match ending with a[i - 1] and b[j]
        let mut j2len: HashMap<usize, usize> = HashMap::new();
        for i in alo..ahi {
            let mut new_j2len = HashMap::new();
            if let Some(indices) = self.b2j.get(&self.a[i]) {
                for &j in indices {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j
                        .checked_sub(1)
                        .and_then(|prev| j2len.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    new_j2len.insert(j, k);
                    if k > best_size {
                        best_i = i + 1 - k;
                        best_j = j + 1 - k;
                        best_size = k;
                    }
                }
            }
            j2len = new_j2len;
        }

        // Pruned popular elements are not indexed; grow the block over them
        while best_i > alo && best_j > blo && self.a[best_i - 1] == self.b[best_j - 1] {
            best_i -= 1;
            best_j -= 1;
            best_size += 1;
        }
        while best_i + best_size < ahi
            && best_j + best_size < bhi
            && self.a[best_i + best_size] == self.b[best_j + best_size]
        {
            best_size += 1;
        }

        Match {
            a: best_i,
            b: best_j,
            size: best_size,
        }
    }

    /// All matching blocks in increasing order, adjacent blocks merged, and
    /// terminated by the `(a.len(), b.len(), 0)` sentinel.
    pub fn matching_blocks(&self) -> Vec<Match> {
        let (la, lb) = (self.a.len(), self.b.len());

        let mut pending = vec![(0, la, 0, lb)];
        let mut blocks = Vec::new();
        while let Some((alo, ahi, blo, bhi)) = pending.pop() {
            let m = self.find_longest_match(alo, ahi, blo, bhi);
            if m.size == 0 {
                continue;
            }
            if alo < m.a && blo < m.b {
                pending.push((alo, m.a, blo, m.b));
            }
            if m.a + m.size < ahi && m.b + m.size < bhi {
                pending.push((m.a + m.size, ahi, m.b + m.size, bhi));
            }
            blocks.push(m);
        }
        blocks.sort();

        let mut merged: Vec<Match> = Vec::with_capacity(blocks.len() + 1);
        for block in blocks {
            if let Some(last) = merged.last_mut() {
                if last.a + last.size == block.a && last.b + last.size == block.b {
                    last.size += block.size;
                    continue;
                }
            }
            merged.push(block);
        }
        merged.push(Match { a: la, b: lb, size: 0 });

        merged
    }

    /// Edit script turning `a` into `b`
    pub fn opcodes(&self) -> Vec<Opcode> {
        let (mut i, mut j) = (0, 0);
        let mut opcodes = Vec::new();

        for m in self.matching_blocks() {
            let tag = if i < m.a && j < m.b {
                Some(OpTag::Replace)
            } else if i < m.a {
                Some(OpTag::Delete)
            } else if j < m.b {
                Some(OpTag::Insert)
            } else {
                None
            };
            if let Some(tag) = tag {
                opcodes.push(Opcode {
                    tag,
                    a_start: i,
                    a_end: m.a,
                    b_start: j,
                    b_end: m.b,
                });
            }

            i = m.a + m.size;
            j = m.b + m.size;
            if m.size > 0 {
                opcodes.push(Opcode {
                    tag: OpTag::Equal,
                    a_start: m.a,
                    a_end: i,
                    b_start: m.b,
                    b_end: j,
                });
            }
        }

        opcodes
    }

    /// Similarity `2 * M / T` in `[0, 1]`, M matched elements, T total elements
    pub fn ratio(&self) -> f64 {
        let matches = self.matching_blocks().iter().map(|m| m.size).sum();
        self.calculate_ratio(matches)
    }

    /// Upper bound on [`ratio`](Self::ratio) from element counts only
    pub fn quick_ratio(&self) -> f64 {
        let full_b_count = self.full_b_count.get_or_init(|| {
            let mut counts = HashMap::new();
            for elt in self.b {
                *counts.entry(elt).or_insert(0usize) += 1;
            }
            counts
        });

        let mut available: HashMap<&T, usize> = HashMap::new();
        let mut matches = 0;
        for elt in self.a {
            let remaining = available
                .entry(elt)
                .or_insert_with(|| full_b_count.get(elt).copied().unwrap_or(0));
            if *remaining > 0 {
                *remaining -= 1;
                matches += 1;
            }
        }

        self.calculate_ratio(matches)
    }

    /// Upper bound on [`ratio`](Self::ratio) from lengths only
    pub fn real_quick_ratio(&self) -> f64 {
        self.calculate_ratio(self.a.len().min(self.b.len()))
    }

    fn calculate_ratio(&self, matches: usize) -> f64 {
        let total = self.a.len() + self.b.len();
        if total == 0 {
            1.0
        } else {
            2.0 * matches as f64 / total as f64
        }
    }
}
