//! Grammar description types: productions, alternatives, elements, and the
//! look-ahead sets attached to each alternative.
//!
//! These are the data the grammar author hands to [`crate::parser::Parser`]
//! at construction time — the "configuration" described in the design's
//! external interfaces section. Nothing here depends on tokens actually
//! being scanned; [`crate::lookahead::LookAheadAnalyzer`] is what turns this
//! static description into look-ahead sets.

use crate::token::TokenId;

pub type ProductionId = i32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Token,
    Production,
}

/// One member of an alternative: a reference to a token or production,
/// repeated between `min` and `max` times (`max = None` means unbounded).
#[derive(Debug, Clone)]
pub struct Element {
    pub kind: ElementKind,
    pub ref_id: i32,
    pub min: u32,
    pub max: Option<u32>,
    /// Look-ahead set for this single element (ignoring its own min/max),
    /// filled in by `LookAheadAnalyzer::analyze`. Used by the parser to
    /// decide whether one more repetition is present without re-deriving
    /// first sets at parse time.
    pub first: LookAheadSet,
}

impl Element {
    pub fn token(id: TokenId) -> Self {
        Self { kind: ElementKind::Token, ref_id: id, min: 1, max: Some(1), first: LookAheadSet::new() }
    }

    pub fn production(id: ProductionId) -> Self {
        Self { kind: ElementKind::Production, ref_id: id, min: 1, max: Some(1), first: LookAheadSet::new() }
    }

    pub fn optional(mut self) -> Self {
        self.min = 0;
        self.max = Some(1);
        self
    }

    pub fn repeated(mut self, min: u32, max: Option<u32>) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    pub fn can_repeat(&self) -> bool {
        self.max.is_none_or(|m| m > 1)
    }

    pub fn is_optional(&self) -> bool {
        self.min == 0
    }
}

/// A sequence of token ids of length at most `k`, with a flag marking it
/// as potentially unbounded ("repetitive" — see the glossary).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sequence {
    pub tokens: Vec<TokenId>,
    pub repetitive: bool,
}

impl Sequence {
    pub fn empty() -> Self {
        Self { tokens: Vec::new(), repetitive: false }
    }

    pub fn single(token: TokenId, repetitive: bool) -> Self {
        Self { tokens: vec![token], repetitive }
    }

    pub fn is_prefix_of(&self, other: &Sequence) -> bool {
        self.tokens.len() <= other.tokens.len() && other.tokens[..self.tokens.len()] == self.tokens[..]
    }
}

/// A de-duplicated collection of look-ahead [`Sequence`]s, each truncated
/// to a shared maximum length `k`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookAheadSet {
    sequences: Vec<Sequence>,
}

impl LookAheadSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn epsilon() -> Self {
        Self { sequences: vec![Sequence::empty()] }
    }

    pub fn sequences(&self) -> &[Sequence] {
        &self.sequences
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    pub fn max_len(&self) -> usize {
        self.sequences.iter().map(|s| s.tokens.len()).max().unwrap_or(0)
    }

    /// Adds `seq`, truncating to `k` tokens and skipping exact duplicates.
    pub fn add(&mut self, mut seq: Sequence, k: usize) {
        if seq.tokens.len() > k {
            seq.tokens.truncate(k);
        }
        if !self.sequences.contains(&seq) {
            self.sequences.push(seq);
        }
    }

    pub fn union(&self, other: &LookAheadSet, k: usize) -> LookAheadSet {
        let mut result = self.clone();
        for seq in &other.sequences {
            result.add(seq.clone(), k);
        }
        result
    }

    /// Drops sequences not starting with `token`, shifts the rest left one
    /// position.
    pub fn create_next_set(&self, token: TokenId) -> LookAheadSet {
        let mut result = LookAheadSet::new();
        for seq in &self.sequences {
            if seq.tokens.first() == Some(&token) {
                result.add(Sequence { tokens: seq.tokens[1..].to_vec(), repetitive: seq.repetitive }, usize::MAX);
            }
        }
        result
    }

    /// Sequences present (identical) in both sets; the merged `repetitive`
    /// flag is the logical AND of each side's flag for that sequence, so
    /// a conflict that both sides consider infinite-loop-safe collapses to
    /// a single repetitive entry rather than vanishing.
    pub fn create_intersection(&self, other: &LookAheadSet) -> LookAheadSet {
        let mut result = LookAheadSet::new();
        for seq in &self.sequences {
            if let Some(other_seq) = other.sequences.iter().find(|o| o.tokens == seq.tokens) {
                result.add(
                    Sequence { tokens: seq.tokens.clone(), repetitive: seq.repetitive && other_seq.repetitive },
                    usize::MAX,
                );
            }
        }
        result
    }

    /// Cartesian concatenation of every sequence in `self` with every
    /// sequence in `other`, truncated to `k`. A sequence already at the
    /// maximum length passes through unchanged (nothing more can follow
    /// it within the look-ahead window); the empty sequence is replaced
    /// outright by `other` (epsilon concatenated with X is X).
    pub fn create_combination(&self, other: &LookAheadSet, k: usize) -> LookAheadSet {
        let mut result = LookAheadSet::new();
        for seq in &self.sequences {
            if seq.tokens.len() >= k && k > 0 {
                result.add(seq.clone(), k);
                continue;
            }
            if seq.tokens.is_empty() {
                for other_seq in &other.sequences {
                    result.add(other_seq.clone(), k);
                }
                continue;
            }
            for other_seq in &other.sequences {
                let mut tokens = seq.tokens.clone();
                tokens.extend(other_seq.tokens.iter().copied());
                tokens.truncate(k);
                result.add(Sequence { tokens, repetitive: seq.repetitive || other_seq.repetitive }, k);
            }
        }
        if self.sequences.is_empty() {
            return other.clone();
        }
        result
    }

    /// Left-trims every sequence in `self` by whichever sequence in
    /// `other` is a matching prefix of it; sequences in `self` with no
    /// matching prefix in `other` are dropped.
    pub fn create_filter(&self, other: &LookAheadSet) -> LookAheadSet {
        let mut result = LookAheadSet::new();
        for seq in &self.sequences {
            for prefix in &other.sequences {
                if prefix.tokens.len() <= seq.tokens.len() && seq.tokens[..prefix.tokens.len()] == prefix.tokens[..] {
                    result.add(
                        Sequence { tokens: seq.tokens[prefix.tokens.len()..].to_vec(), repetitive: seq.repetitive },
                        usize::MAX,
                    );
                }
            }
        }
        result
    }

    /// Sequences from either set that are a prefix of (or are prefixed
    /// by) some sequence in the other set.
    pub fn create_overlaps(&self, other: &LookAheadSet) -> LookAheadSet {
        let mut result = LookAheadSet::new();
        for a in &self.sequences {
            for b in &other.sequences {
                if a.is_prefix_of(b) {
                    result.add(a.clone(), usize::MAX);
                } else if b.is_prefix_of(a) {
                    result.add(b.clone(), usize::MAX);
                }
            }
        }
        result
    }

    pub fn create_repetitive(&self) -> LookAheadSet {
        LookAheadSet {
            sequences: self.sequences.iter().map(|s| Sequence { tokens: s.tokens.clone(), repetitive: true }).collect(),
        }
    }

    /// True iff some sequence in the set matches the already-peeked token
    /// ids in `peeked` (as a prefix match of the same length).
    pub fn is_next(&self, peeked: &[TokenId]) -> bool {
        self.sequences.iter().any(|seq| seq.tokens.len() <= peeked.len() && seq.tokens[..] == peeked[..seq.tokens.len()])
    }
}

#[derive(Debug, Clone, Default)]
pub struct Alternative {
    pub elements: Vec<Element>,
    pub look_ahead: LookAheadSet,
}

impl Alternative {
    pub fn new(elements: Vec<Element>) -> Self {
        Self { elements, look_ahead: LookAheadSet::new() }
    }
}

#[derive(Debug, Clone)]
pub struct ProductionPattern {
    pub id: ProductionId,
    pub name: String,
    /// Auto-generated helper production (from repetition desugaring);
    /// never surfaced to the analyzer callbacks directly by name.
    pub synthetic: bool,
    /// A hidden production's node is spliced into its parent: no
    /// `enter`/`exit`/`child` callbacks fire for it, and its children are
    /// reparented onto the grandparent.
    pub hidden: bool,
    pub alternatives: Vec<Alternative>,
}

impl ProductionPattern {
    pub fn new(id: ProductionId, name: impl Into<String>) -> Self {
        Self { id, name: name.into(), synthetic: false, hidden: false, alternatives: Vec::new() }
    }

    pub fn add_alternative(mut self, elements: Vec<Element>) -> Self {
        self.alternatives.push(Alternative::new(elements));
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn synthetic(mut self) -> Self {
        self.synthetic = true;
        self
    }
}
