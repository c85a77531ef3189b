//! Pattern compiler: parses the regex grammar described in the design
//!
//! ```text
//! Expr   ::= Term ('|' Expr)?
//! Term   ::= Fact+
//! Fact   ::= Atom AtomModifier?
//! Atom   ::= '.' | '(' Expr ')' | '[' CharSet ']' | Char | EscapeChar
//! AtomMod::= ('?'|'*'|'+'|'{' num (',' num?)? '}') ('?'|'+')?
//! ```
//!
//! into a [`Node`] tree. The pattern text itself is scanned with a
//! [`CharBuffer`], the same streaming buffer used for MIB source text.

use thiserror::Error;

use crate::buffer::CharBuffer;

use super::ast::{self, CharSet, Node, RepeatMode};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegexError {
    #[error("unexpected character '{0}' at position {1}")]
    UnexpectedCharacter(char, usize),
    #[error("unterminated pattern at position {0}")]
    UnterminatedPattern(usize),
    #[error("invalid repeat count at position {0}")]
    InvalidRepeatCount(usize),
    #[error("unsupported escape '\\{0}' at position {1}")]
    UnsupportedEscape(char, usize),
    #[error("unsupported special character '{0}' at position {1}: anchors are not supported")]
    UnsupportedSpecial(char, usize),
}

type CResult<T> = std::result::Result<T, RegexError>;

pub fn parse_pattern(pattern: &str) -> CResult<Node> {
    let mut buf = CharBuffer::from_str(pattern);
    let mut p = PatternParser { buf: &mut buf };
    let node = p.parse_expr()?;
    match p.peek() {
        None => Ok(node),
        Some(c) => Err(RegexError::UnexpectedCharacter(c, p.pos())),
    }
}

struct PatternParser<'a> {
    buf: &'a mut CharBuffer,
}

impl PatternParser<'_> {
    fn pos(&self) -> usize {
        self.buf.position()
    }

    fn peek(&mut self) -> Option<char> {
        self.buf.peek(0).expect("pattern text has no reader, cannot fail")
    }

    fn peek_at(&mut self, n: usize) -> Option<char> {
        self.buf.peek(n).expect("pattern text has no reader, cannot fail")
    }

    fn bump(&mut self) -> Option<char> {
        self.buf.read(1).expect("pattern text has no reader, cannot fail").map(|s| s.chars().next().unwrap())
    }

    fn expect(&mut self, c: char) -> CResult<()> {
        match self.bump() {
            Some(actual) if actual == c => Ok(()),
            Some(actual) => Err(RegexError::UnexpectedCharacter(actual, self.pos() - 1)),
            None => Err(RegexError::UnterminatedPattern(self.pos())),
        }
    }

    fn parse_expr(&mut self) -> CResult<Node> {
        let term = self.parse_term()?;
        if self.peek() == Some('|') {
            self.bump();
            let rest = self.parse_expr()?;
            Ok(Node::Alternative(Box::new(term), Box::new(rest)))
        } else {
            Ok(term)
        }
    }

    fn parse_term(&mut self) -> CResult<Node> {
        let mut node = self.parse_fact()?;
        while self.at_fact_start() {
            let next = self.parse_fact()?;
            node = Node::Combine(Box::new(node), Box::new(next));
        }
        Ok(node)
    }

    fn at_fact_start(&mut self) -> bool {
        !matches!(self.peek(), None | Some('|') | Some(')'))
    }

    fn parse_fact(&mut self) -> CResult<Node> {
        let atom = self.parse_atom()?;
        self.parse_modifier(atom)
    }

    fn parse_modifier(&mut self, atom: Node) -> CResult<Node> {
        let (min, max) = match self.peek() {
            Some('?') => { self.bump(); (0, Some(1)) }
            Some('*') => { self.bump(); (0, None) }
            Some('+') => { self.bump(); (1, None) }
            Some('{') => {
                self.bump();
                self.parse_repeat_count()?
            }
            _ => return Ok(atom),
        };
        let mode = match self.peek() {
            Some('?') => { self.bump(); RepeatMode::Reluctant }
            Some('+') => { self.bump(); RepeatMode::Possessive }
            _ => RepeatMode::Greedy,
        };
        Ok(Node::Repeat { elem: Box::new(atom), min, max, mode })
    }

    fn parse_repeat_count(&mut self) -> CResult<(u32, Option<u32>)> {
        let start = self.pos();
        let min = self.parse_number();
        let min = match min {
            Some(n) => n,
            None => return Err(RegexError::InvalidRepeatCount(start)),
        };
        let max = if self.peek() == Some(',') {
            self.bump();
            self.parse_number()
        } else {
            Some(min)
        };
        self.expect('}').map_err(|_| RegexError::InvalidRepeatCount(start))?;
        if let Some(max) = max {
            if max < min {
                return Err(RegexError::InvalidRepeatCount(start));
            }
        }
        Ok((min, max))
    }

    fn parse_number(&mut self) -> Option<u32> {
        let mut digits = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                digits.push(c);
                self.bump();
            } else {
                break;
            }
        }
        if digits.is_empty() { None } else { digits.parse().ok() }
    }

    fn parse_atom(&mut self) -> CResult<Node> {
        match self.peek() {
            None => Err(RegexError::UnterminatedPattern(self.pos())),
            Some('^') | Some('$') => {
                let c = self.bump().unwrap();
                Err(RegexError::UnsupportedSpecial(c, self.pos() - 1))
            }
            Some('.') => {
                self.bump();
                Ok(Node::CharSet(ast::dot()))
            }
            Some('(') => {
                self.bump();
                let inner = self.parse_expr()?;
                self.expect(')')?;
                Ok(inner)
            }
            Some('[') => {
                self.bump();
                let set = self.parse_charset()?;
                self.expect(']')?;
                Ok(Node::CharSet(set))
            }
            Some('\\') => {
                self.bump();
                self.parse_escape()
            }
            Some(')') | Some('|') => Err(RegexError::UnexpectedCharacter(self.peek().unwrap(), self.pos())),
            Some(c) => {
                self.bump();
                Ok(Node::String(vec![c]))
            }
        }
    }

    fn parse_charset(&mut self) -> CResult<CharSet> {
        let inverted = if self.peek() == Some('^') {
            self.bump();
            true
        } else {
            false
        };
        let mut set = CharSet::new(inverted);
        while let Some(c) = self.peek() {
            if c == ']' {
                break;
            }
            let lo = if c == '\\' {
                self.bump();
                match self.parse_escape_atom()? {
                    EscapeAtom::Char(c) => c,
                    EscapeAtom::Class(class) => {
                        set.subsets.push(class);
                        continue;
                    }
                }
            } else {
                self.bump();
                c
            };
            if self.peek() == Some('-') && self.peek_at(1).is_some_and(|c| c != ']') {
                self.bump();
                let hi_char = self.peek().unwrap();
                let hi = if hi_char == '\\' {
                    self.bump();
                    match self.parse_escape_atom()? {
                        EscapeAtom::Char(c) => c,
                        EscapeAtom::Class(_) => return Err(RegexError::UnexpectedCharacter(hi_char, self.pos())),
                    }
                } else {
                    self.bump();
                    hi_char
                };
                set.ranges.push((lo, hi));
            } else {
                set.chars.push(lo);
            }
        }
        Ok(set)
    }

    fn parse_escape(&mut self) -> CResult<Node> {
        match self.parse_escape_atom()? {
            EscapeAtom::Char(c) => Ok(Node::String(vec![c])),
            EscapeAtom::Class(class) => Ok(Node::CharSet(class)),
        }
    }

    fn parse_escape_atom(&mut self) -> CResult<EscapeAtom> {
        let pos = self.pos();
        let c = self.bump().ok_or(RegexError::UnterminatedPattern(pos))?;
        let atom = match c {
            'd' => EscapeAtom::Class(ast::digit()),
            'D' => EscapeAtom::Class(ast::nondigit()),
            's' => EscapeAtom::Class(ast::whitespace()),
            'S' => EscapeAtom::Class(ast::nonwhitespace()),
            'w' => EscapeAtom::Class(ast::word()),
            'W' => EscapeAtom::Class(ast::nonword()),
            't' => EscapeAtom::Char('\t'),
            'n' => EscapeAtom::Char('\n'),
            'r' => EscapeAtom::Char('\r'),
            'f' => EscapeAtom::Char('\x0c'),
            'a' => EscapeAtom::Char('\x07'),
            'e' => EscapeAtom::Char('\x1b'),
            '0' => EscapeAtom::Char(self.parse_octal()?),
            'x' => EscapeAtom::Char(self.parse_hex(2)?),
            'u' => EscapeAtom::Char(self.parse_hex(4)?),
            other if other.is_alphanumeric() => {
                return Err(RegexError::UnsupportedEscape(other, pos));
            }
            other => EscapeAtom::Char(other),
        };
        Ok(atom)
    }

    fn parse_octal(&mut self) -> CResult<char> {
        let pos = self.pos();
        let mut value: u32 = 0;
        let mut digits = 0;
        while digits < 3 {
            match self.peek() {
                Some(c) if ('0'..='7').contains(&c) => {
                    value = value * 8 + c.to_digit(8).unwrap();
                    self.bump();
                    digits += 1;
                }
                _ => break,
            }
        }
        char::from_u32(value).ok_or(RegexError::InvalidRepeatCount(pos))
    }

    fn parse_hex(&mut self, digits: usize) -> CResult<char> {
        let pos = self.pos();
        let mut value: u32 = 0;
        for _ in 0..digits {
            let c = self.peek().ok_or(RegexError::UnterminatedPattern(self.pos()))?;
            let d = c.to_digit(16).ok_or(RegexError::InvalidRepeatCount(pos))?;
            value = value * 16 + d;
            self.bump();
        }
        char::from_u32(value).ok_or(RegexError::InvalidRepeatCount(pos))
    }
}

enum EscapeAtom {
    Char(char),
    Class(CharSet),
}
