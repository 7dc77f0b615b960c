//! Verse-range alignment over byte-range segments.
//!
//! Timestamp coverage is imperfect: some files list every verse, some skip
//! verses a multi-verse segment already covers, some start at verse 1 with
//! an untimestamped lead-in, and some have no timestamps at all. This module
//! reduces and repairs a segment list so it exactly covers a requested
//! `[verse_start, verse_end]` range.

use crate::segments::ByteRangeSegment;

/// An inclusive verse range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerseRange {
    pub start: u32,
    pub end: u32,
}

impl VerseRange {
    /// Build a range, clamping an inverted `end` up to `start`.
    pub fn new(start: u32, end: u32) -> Self {
        Self {
            start,
            end: end.max(start),
        }
    }

    /// A range open at the given end: everything from `start` onward.
    pub fn from_start(start: u32) -> Self {
        Self {
            start,
            end: u32::MAX,
        }
    }

    /// A range open at the given start: everything up to `end`.
    pub fn to_end(end: u32) -> Self {
        Self { start: 0, end }
    }
}

/// Trim and gap-fill a byte-range segment list to a verse range.
///
/// `timestamp_count` is the number of timestamp rows the owning file has;
/// it drives the leading-verse-zero correction and the zero-timestamp
/// pass-through. The steps, in order:
///
/// 1. If the timestamp count equals the segment count and the first
///    timestamped verse is nonzero, prepend an empty verse-0 placeholder
///    (an untimestamped lead-in such as a chapter heading).
/// 2. Gap fill: where consecutive timestamped verses skip numbers, re-emit
///    the earlier segment once per skipped verse, since it is the best
///    available audio for the verses between it and the next timestamp.
/// 3. Trim to `[range.start, range.end]`. Untimestamped segments cannot be
///    judged out-of-range and are always retained; the placeholder carries
///    verse 0 and so survives only a request starting at verse 0.
pub fn align_to_verse_range(
    segments: Vec<ByteRangeSegment>,
    timestamp_count: usize,
    range: VerseRange,
) -> Vec<ByteRangeSegment> {
    // Whole-file granularity: verse-level trimming is impossible, the whole
    // file is the answer.
    if timestamp_count == 0 {
        return segments;
    }

    let mut segments = segments;

    // Leading verse-zero correction.
    if timestamp_count == segments.len() {
        if let Some(first_verse) = segments.first().and_then(|s| s.verse_start) {
            if first_verse != 0 {
                let placeholder = ByteRangeSegment::placeholder(&segments[0].file_name);
                segments.insert(0, placeholder);
            }
        }
    }

    if needs_gap_fill(&segments) {
        segments = gap_fill(segments);
    }

    segments
        .into_iter()
        .filter(|seg| match seg.verse_start {
            None => true,
            Some(verse) => verse >= range.start && verse <= range.end,
        })
        .collect()
}

/// Whether the list has verses only reachable through gap filling: either a
/// multi-verse timestamp (the file mixes single- and multi-verse segments)
/// or a hole in the verse numbering.
fn needs_gap_fill(segments: &[ByteRangeSegment]) -> bool {
    let has_multi_verse = segments
        .iter()
        .any(|s| matches!((s.verse_start, s.verse_end), (Some(a), Some(b)) if a != b));
    if has_multi_verse {
        return true;
    }

    let mut prev: Option<u32> = None;
    for seg in segments {
        if let Some(verse) = seg.verse_start {
            if let Some(p) = prev {
                if verse > p + 1 {
                    return true;
                }
            }
            prev = Some(verse);
        }
    }
    false
}

/// Re-emit each timestamped segment once per verse skipped before the next
/// timestamp, assigning the implied verse number to each copy so trimming
/// can judge them.
fn gap_fill(segments: Vec<ByteRangeSegment>) -> Vec<ByteRangeSegment> {
    let mut filled: Vec<ByteRangeSegment> = Vec::with_capacity(segments.len());
    let mut pending: Option<(ByteRangeSegment, u32)> = None;

    for seg in segments {
        if let Some(verse) = seg.verse_start {
            if let Some((prev_seg, prev_verse)) = pending.take() {
                let gap = verse.saturating_sub(prev_verse);
                for skipped in 1..gap {
                    let mut copy = prev_seg.clone();
                    copy.verse_start = Some(prev_verse + skipped);
                    copy.verse_end = None;
                    filled.push(copy);
                }
            }
            pending = Some((seg.clone(), verse));
            filled.push(seg);
        } else {
            filled.push(seg);
        }
    }

    filled
}
