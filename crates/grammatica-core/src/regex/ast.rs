//! Regex abstract syntax: a small tree of match nodes produced by the
//! compiler (`regex::compiler`) and consumed by the matcher
//! (`regex::matcher`).

/// How a [`Node::Repeat`] resolves its backtracking order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepeatMode {
    /// Longest match first; backtracks to shorter counts.
    Greedy,
    /// Shortest match first; backtracks to longer counts.
    Reluctant,
    /// Longest match, no backtracking at all.
    Possessive,
}

/// A contiguous span of code points plus individually listed characters,
/// optionally inverted, optionally unioned with nested predefined classes
/// (`subsets`) such as `\d` or `\w` appearing inside a bracket expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharSet {
    pub inverted: bool,
    pub chars: Vec<char>,
    pub ranges: Vec<(char, char)>,
    pub subsets: Vec<CharSet>,
}

impl CharSet {
    pub fn new(inverted: bool) -> Self {
        Self { inverted, chars: Vec::new(), ranges: Vec::new(), subsets: Vec::new() }
    }

    pub fn single(c: char) -> Self {
        Self { inverted: false, chars: vec![c], ranges: Vec::new(), subsets: Vec::new() }
    }

    pub fn range(lo: char, hi: char) -> Self {
        Self { inverted: false, chars: Vec::new(), ranges: vec![(lo, hi)], subsets: Vec::new() }
    }

    fn member(&self, c: char) -> bool {
        self.chars.contains(&c)
            || self.ranges.iter().any(|&(lo, hi)| lo <= c && c <= hi)
            || self.subsets.iter().any(|s| s.member(c))
    }

    /// Whether `c` is accepted by this set, honoring `inverted`.
    pub fn contains(&self, c: char) -> bool {
        self.member(c) != self.inverted
    }

    /// Lower-cases every literal endpoint for case-insensitive compilation.
    /// ASCII-only: a locale-free fold, per the open question in the design.
    pub fn to_ascii_lowercase(&self) -> Self {
        Self {
            inverted: self.inverted,
            chars: self.chars.iter().map(|c| c.to_ascii_lowercase()).collect(),
            ranges: self
                .ranges
                .iter()
                .map(|&(lo, hi)| (lo.to_ascii_lowercase(), hi.to_ascii_lowercase()))
                .collect(),
            subsets: self.subsets.iter().map(CharSet::to_ascii_lowercase).collect(),
        }
    }
}

pub fn dot() -> CharSet {
    // An empty set, inverted, matches any character at all.
    CharSet::new(true)
}

pub fn digit() -> CharSet {
    CharSet::range('0', '9')
}

pub fn nondigit() -> CharSet {
    let mut s = digit();
    s.inverted = true;
    s
}

pub fn whitespace() -> CharSet {
    CharSet { inverted: false, chars: vec![' ', '\t', '\n', '\r', '\x0b', '\x0c'], ranges: Vec::new(), subsets: Vec::new() }
}

pub fn nonwhitespace() -> CharSet {
    let mut s = whitespace();
    s.inverted = true;
    s
}

/// `[A-Za-z0-9_]`, per the corrected `InWordSet` (§9 open question).
pub fn word() -> CharSet {
    CharSet {
        inverted: false,
        chars: vec!['_'],
        ranges: vec![('a', 'z'), ('A', 'Z'), ('0', '9')],
        subsets: Vec::new(),
    }
}

pub fn nonword() -> CharSet {
    let mut s = word();
    s.inverted = true;
    s
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    String(Vec<char>),
    CharSet(CharSet),
    Repeat { elem: Box<Node>, min: u32, max: Option<u32>, mode: RepeatMode },
    Alternative(Box<Node>, Box<Node>),
    Combine(Box<Node>, Box<Node>),
}

impl Node {
    pub fn to_ascii_lowercase(&self) -> Node {
        match self {
            Node::String(s) => Node::String(s.iter().map(|c| c.to_ascii_lowercase()).collect()),
            Node::CharSet(set) => Node::CharSet(set.to_ascii_lowercase()),
            Node::Repeat { elem, min, max, mode } => Node::Repeat {
                elem: Box::new(elem.to_ascii_lowercase()),
                min: *min,
                max: *max,
                mode: *mode,
            },
            Node::Alternative(a, b) => {
                Node::Alternative(Box::new(a.to_ascii_lowercase()), Box::new(b.to_ascii_lowercase()))
            }
            Node::Combine(a, b) => {
                Node::Combine(Box::new(a.to_ascii_lowercase()), Box::new(b.to_ascii_lowercase()))
            }
        }
    }
}
