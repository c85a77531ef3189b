//! Backtracking matcher: walks a [`Node`] tree against a [`CharBuffer`],
//! returning the `skip`-th longest match starting at the buffer's current
//! position. `skip == 0` always asks for the longest (primary) match.
//!
//! Every node only ever `peek`s the buffer — consumption happens once, in
//! the tokenizer, after the winning length has been decided.

use crate::buffer::CharBuffer;
use crate::error::Result;

use super::ast::{Node, RepeatMode};

/// Safety valve on `Combine`'s backtrack search: a malformed or
/// pathologically ambiguous pattern (e.g. nested unbounded repeats) could
/// otherwise spin forever trying `skip1`/`skip2` combinations.
const MAX_COMBINE_ATTEMPTS: u32 = 200_000;

#[derive(Debug, Clone, Copy, Default)]
pub struct MatchResult {
    /// Match length in characters, or `-1` for no match at this `skip`.
    pub length: i64,
    /// Whether any sub-match attempt ran off the end of the buffered input
    /// (as opposed to definitively failing against buffered characters) —
    /// lets the tokenizer tell "no match" from "might match given more
    /// input".
    pub read_past_end: bool,
}

impl MatchResult {
    fn none() -> Self {
        Self { length: -1, read_past_end: false }
    }
}

pub fn try_match(node: &Node, buf: &mut CharBuffer, offset: usize, skip: usize, ci: bool) -> Result<MatchResult> {
    match node {
        Node::String(s) => match_string(s, buf, offset, skip, ci),
        Node::CharSet(set) => match_charset(set, buf, offset, skip, ci),
        Node::Alternative(a, b) => match_alternative(a, b, buf, offset, skip, ci),
        Node::Combine(a, b) => match_combine(a, b, buf, offset, skip, ci),
        Node::Repeat { elem, min, max, mode } => match_repeat(elem, *min, *max, *mode, buf, offset, skip, ci),
    }
}

fn match_string(s: &[char], buf: &mut CharBuffer, offset: usize, skip: usize, ci: bool) -> Result<MatchResult> {
    if skip != 0 {
        return Ok(MatchResult::none());
    }
    for (i, &expected) in s.iter().enumerate() {
        match buf.peek(offset + i)? {
            None => return Ok(MatchResult { length: -1, read_past_end: true }),
            Some(c) => {
                let actual = if ci { c.to_ascii_lowercase() } else { c };
                if actual != expected {
                    return Ok(MatchResult::none());
                }
            }
        }
    }
    Ok(MatchResult { length: s.len() as i64, read_past_end: false })
}

fn match_charset(
    set: &super::ast::CharSet,
    buf: &mut CharBuffer,
    offset: usize,
    skip: usize,
    ci: bool,
) -> Result<MatchResult> {
    if skip != 0 {
        return Ok(MatchResult::none());
    }
    match buf.peek(offset)? {
        None => Ok(MatchResult { length: -1, read_past_end: true }),
        Some(c) => {
            let probe = if ci { c.to_ascii_lowercase() } else { c };
            if set.contains(probe) {
                Ok(MatchResult { length: 1, read_past_end: false })
            } else {
                Ok(MatchResult::none())
            }
        }
    }
}

/// Safety valve mirroring [`MAX_COMBINE_ATTEMPTS`]: bounds how many
/// candidates we pull off either branch while merging their descending
/// match-length sequences.
const MAX_ALTERNATIVE_ATTEMPTS: u32 = 200_000;

fn match_alternative(
    a: &Node,
    b: &Node,
    buf: &mut CharBuffer,
    offset: usize,
    skip: usize,
    ci: bool,
) -> Result<MatchResult> {
    let mut read_past_end = false;
    let mut idx_a = 0usize;
    let mut idx_b = 0usize;
    let mut remaining = skip;
    for _ in 0..MAX_ALTERNATIVE_ATTEMPTS {
        let ra = try_match(a, buf, offset, idx_a, ci)?;
        let rb = try_match(b, buf, offset, idx_b, ci)?;
        read_past_end |= ra.read_past_end || rb.read_past_end;
        if ra.length < 0 && rb.length < 0 {
            return Ok(MatchResult { length: -1, read_past_end });
        }
        let take_a = ra.length >= rb.length;
        let length = if take_a { ra.length } else { rb.length };
        if remaining == 0 {
            return Ok(MatchResult { length, read_past_end });
        }
        remaining -= 1;
        if take_a {
            idx_a += 1;
        } else {
            idx_b += 1;
        }
    }
    Err(crate::error::Error::FuelExhausted)
}

fn match_combine(
    a: &Node,
    b: &Node,
    buf: &mut CharBuffer,
    offset: usize,
    skip: usize,
    ci: bool,
) -> Result<MatchResult> {
    let mut skip1 = 0usize;
    let mut skip2 = 0usize;
    let mut remaining = skip;
    let mut read_past_end = false;
    for _ in 0..MAX_COMBINE_ATTEMPTS {
        let r1 = try_match(a, buf, offset, skip1, ci)?;
        read_past_end |= r1.read_past_end;
        if r1.length < 0 {
            return Ok(MatchResult { length: -1, read_past_end });
        }
        let r2 = try_match(b, buf, offset + r1.length as usize, skip2, ci)?;
        read_past_end |= r2.read_past_end;
        if r2.length >= 0 {
            if remaining == 0 {
                return Ok(MatchResult { length: r1.length + r2.length, read_past_end });
            }
            remaining -= 1;
            skip2 += 1;
        } else {
            skip1 += 1;
            skip2 = 0;
        }
    }
    Err(crate::error::Error::FuelExhausted)
}

fn match_repeat(
    elem: &Node,
    min: u32,
    max: Option<u32>,
    mode: RepeatMode,
    buf: &mut CharBuffer,
    offset: usize,
    skip: usize,
    ci: bool,
) -> Result<MatchResult> {
    // Backtracking only varies the *repetition count*; a given repetition
    // is always matched greedily (skip 0). This is the standard
    // simplification for repeat operators whose body has no ambiguity of
    // its own (char classes, literals); nested alternation inside a
    // repeated group is not independently re-explored per repetition.
    let mut cumulative = vec![0i64];
    let mut read_past_end = false;
    let mut count = 0u32;
    while max.is_none_or(|m| count < m) {
        let r = try_match(elem, buf, offset + *cumulative.last().unwrap() as usize, 0, ci)?;
        read_past_end |= r.read_past_end;
        if r.length < 0 {
            break;
        }
        let next = cumulative.last().unwrap() + r.length;
        let zero_width = r.length == 0;
        cumulative.push(next);
        count += 1;
        if zero_width {
            // Looping further can never extend the match; stop here to
            // avoid spinning forever on e.g. `(a*)*`.
            break;
        }
    }
    if count < min {
        return Ok(MatchResult { length: -1, read_past_end });
    }
    let min = min as usize;
    let achieved = cumulative.len() - 1;
    let candidate_at = |k: usize| cumulative[k];
    let length = match mode {
        RepeatMode::Possessive => {
            if skip == 0 {
                candidate_at(achieved)
            } else {
                return Ok(MatchResult { length: -1, read_past_end });
            }
        }
        RepeatMode::Greedy => {
            if skip > achieved - min {
                return Ok(MatchResult { length: -1, read_past_end });
            }
            candidate_at(achieved - skip)
        }
        RepeatMode::Reluctant => {
            if skip > achieved - min {
                return Ok(MatchResult { length: -1, read_past_end });
            }
            candidate_at(min + skip)
        }
    };
    Ok(MatchResult { length, read_past_end })
}
