//! Parser (C5): LL(k) recursive-descent parsing driven entirely by the
//! [`ProductionPattern`]/[`LookAheadSet`] data built in [`crate::grammar`]
//! and [`crate::lookahead`] — there is no generated per-grammar parse
//! function, the same `Parser` walks whatever productions it is handed.

use std::collections::VecDeque;

use indexmap::IndexMap;

use crate::error::{Diagnostic, Diagnostics, Error, ErrorStage, Location, Result, Severity, TextRange};
use crate::grammar::{Alternative, ElementKind, ProductionId, ProductionPattern};
use crate::lookahead::LookAheadAnalyzer;
use crate::token::{Token, TokenId};
use crate::tokenizer::Tokenizer;
use crate::tree::{NodeId, ParseTree};

/// Number of subsequently consumed tokens after an error for which analyzer
/// callbacks stay suppressed, per the design's error-recovery protocol.
const RECOVERY_COUNTDOWN: u32 = 3;
const RECURSION_LIMIT: usize = 256;
const FUEL_LIMIT: u64 = 2_000_000;

/// Callback interface invoked as the parser walks productions. Hidden
/// productions never trigger these (their children splice onto the
/// grandparent instead); synthetic productions (repetition desugaring) do
/// trigger them like any other production, since their name still appears
/// in `ProductionPattern`.
///
/// A callback may fail; the failure is logged as an `Analyze`-stage
/// diagnostic at the current position but — unlike a lex/parse error —
/// does *not* start the token-skipping recovery countdown.
pub trait Analyzer {
    fn enter(&mut self, _tree: &mut ParseTree, _node: NodeId) -> std::result::Result<(), String> {
        Ok(())
    }

    fn exit(&mut self, _tree: &mut ParseTree, node: NodeId) -> std::result::Result<Option<NodeId>, String> {
        Ok(Some(node))
    }

    fn child(&mut self, _tree: &mut ParseTree, _parent: NodeId, _child: NodeId) -> std::result::Result<(), String> {
        Ok(())
    }
}

/// An [`Analyzer`] that does nothing: the default when a caller only wants
/// the bare parse tree.
#[derive(Default)]
pub struct NullAnalyzer;

impl Analyzer for NullAnalyzer {}

/// Everything `parse()` produced: the tree (always built on a best-effort
/// basis, even in the presence of errors) and the accumulated diagnostics.
pub struct ParseOutcome {
    pub tree: ParseTree,
    pub diagnostics: Diagnostics,
}

impl ParseOutcome {
    /// Converts to the "throw on non-empty log" contract some callers want:
    /// `Ok(tree)` if nothing was logged, `Err(diagnostics)` otherwise.
    pub fn into_result(self) -> std::result::Result<ParseTree, Diagnostics> {
        if self.diagnostics.has_errors() {
            Err(self.diagnostics)
        } else {
            Ok(self.tree)
        }
    }
}

pub struct Parser<A: Analyzer = NullAnalyzer> {
    tokenizer: Tokenizer,
    productions: IndexMap<ProductionId, ProductionPattern>,
    start: Option<ProductionId>,
    k: usize,
    queue: VecDeque<Token>,
    eof_reached: bool,
    tree: ParseTree,
    diagnostics: Diagnostics,
    recovery_countdown: u32,
    depth: usize,
    fuel: u64,
    analyzer: A,
}

impl<A: Analyzer> Parser<A> {
    pub fn new(tokenizer: Tokenizer, analyzer: A) -> Self {
        Self {
            tokenizer,
            productions: IndexMap::new(),
            start: None,
            k: 1,
            queue: VecDeque::new(),
            eof_reached: false,
            tree: ParseTree::new(),
            diagnostics: Diagnostics::new(),
            recovery_countdown: 0,
            depth: 0,
            fuel: FUEL_LIMIT,
            analyzer,
        }
    }

    /// Unwraps the parser, handing back the analyzer it drove. Useful once
    /// parsing is done and the caller wants whatever state the analyzer
    /// accumulated (e.g. a domain model built up across `enter`/`exit`).
    pub fn into_analyzer(self) -> A {
        self.analyzer
    }

    /// Adds a production. The first one added becomes the start symbol.
    pub fn add_production(&mut self, production: ProductionPattern) {
        if self.start.is_none() {
            self.start = Some(production.id);
        }
        self.productions.insert(production.id, production);
    }

    /// Validates that every token/production reference is resolvable, then
    /// runs [`LookAheadAnalyzer`]. Any grammar-level findings are thrown
    /// immediately as `Error::Grammar` rather than deferred: a parser built
    /// on a broken grammar cannot usefully attempt to parse anything.
    pub fn prepare(&mut self) -> Result<()> {
        let mut diagnostics = Diagnostics::new();
        let known_productions: Vec<ProductionId> = self.productions.keys().copied().collect();
        for prod in self.productions.values() {
            for alt in &prod.alternatives {
                for elem in &alt.elements {
                    let resolvable = match elem.kind {
                        ElementKind::Token => self.tokenizer.get_pattern_description(elem.ref_id).is_some(),
                        ElementKind::Production => known_productions.contains(&elem.ref_id),
                    };
                    if !resolvable {
                        diagnostics.push(Diagnostic::new(
                            ErrorStage::Grammar,
                            Severity::Error,
                            format!(
                                "production '{}' references unknown {} id {}",
                                prod.name,
                                if matches!(elem.kind, ElementKind::Token) { "token" } else { "production" },
                                elem.ref_id
                            ),
                            TextRange::default(),
                            Location::default(),
                        ));
                    }
                }
            }
        }
        if diagnostics.has_errors() {
            return Err(Error::Grammar(diagnostics));
        }
        let (k, analyzer_diagnostics) = LookAheadAnalyzer::analyze(&mut self.productions);
        self.k = k;
        if analyzer_diagnostics.has_errors() {
            return Err(Error::Grammar(analyzer_diagnostics));
        }
        Ok(())
    }

    /// Parses from the current start production to EOF, building a tree on
    /// a best-effort basis. Only a fatal [`Error`] (fuel/recursion/I/O)
    /// short-circuits; ordinary lex/parse errors are logged and recovered
    /// from, surfacing in `ParseOutcome::diagnostics`.
    pub fn parse(&mut self) -> Result<ParseOutcome> {
        let start = self.start.expect("at least one production added");
        let root = self.parse_production(start)?;
        self.tree.set_root(root);
        self.diagnostics.extend(self.tokenizer.take_diagnostics());
        let diagnostics = std::mem::take(&mut self.diagnostics);
        let tree = std::mem::replace(&mut self.tree, ParseTree::new());
        Ok(ParseOutcome { tree, diagnostics })
    }

    // -- token stream -----------------------------------------------------

    fn fill(&mut self, upto: usize) -> Result<()> {
        while self.queue.len() <= upto {
            match self.tokenizer.next()? {
                Some(tok) => self.queue.push_back(tok),
                None => {
                    self.eof_reached = true;
                    break;
                }
            }
        }
        Ok(())
    }

    fn peek_ids(&mut self, n: usize) -> Result<Vec<TokenId>> {
        if n > 0 {
            self.fill(n - 1)?;
        }
        Ok(self.queue.iter().take(n).map(|t| t.pattern_id).collect())
    }

    fn peek_token(&mut self, offset: usize) -> Result<Option<&Token>> {
        self.fill(offset)?;
        Ok(self.queue.get(offset))
    }

    fn consume_fuel(&mut self) -> Result<()> {
        if self.fuel == 0 {
            return Err(Error::FuelExhausted);
        }
        self.fuel -= 1;
        Ok(())
    }

    /// Consumes and returns the next token regardless of id, counting it
    /// against the recovery countdown.
    fn bump(&mut self) -> Result<Option<Token>> {
        self.fill(0)?;
        let tok = self.queue.pop_front();
        if tok.is_some() && self.recovery_countdown > 0 {
            self.recovery_countdown -= 1;
        }
        Ok(tok)
    }

    fn callbacks_suppressed(&self) -> bool {
        self.recovery_countdown > 0
    }

    fn log_unexpected_token(&mut self, found: Option<&Token>, expected: Vec<String>) {
        let (message, range, location) = match found {
            Some(t) => (
                format!("unexpected token '{}'", t.image),
                t.range,
                Location { line: t.start_line, column: t.start_column },
            ),
            None => (
                "unexpected end of input".to_string(),
                TextRange::default(),
                Location { line: self.tokenizer.line(), column: self.tokenizer.column() },
            ),
        };
        self.diagnostics.push(Diagnostic::new(ErrorStage::Syntax, Severity::Error, message, range, location).with_expected(expected));
        self.recovery_countdown = RECOVERY_COUNTDOWN;
    }

    /// Consumes tokens matching `expected_id`. On a mismatch, logs the
    /// error once and discards tokens (without attaching them to the tree)
    /// until one matches or the stream is exhausted, at which point an
    /// `UnexpectedEof` finding is logged and `None` returned.
    fn expect_token(&mut self, expected_id: TokenId, description: &str) -> Result<Option<Token>> {
        self.consume_fuel()?;
        loop {
            if self.eof_reached && self.queue.is_empty() {
                self.fill(0)?;
            }
            match self.peek_token(0)? {
                Some(t) if t.pattern_id == expected_id => return Ok(self.bump()?),
                Some(_) => {
                    let found = self.peek_token(0)?.cloned();
                    self.log_unexpected_token(found.as_ref(), vec![description.to_string()]);
                    self.bump()?;
                    // keep skipping silently until resynced
                    loop {
                        match self.peek_token(0)? {
                            Some(t) if t.pattern_id == expected_id => return Ok(self.bump()?),
                            Some(_) => {
                                self.bump()?;
                            }
                            None => {
                                self.log_unexpected_token(None, vec![description.to_string()]);
                                return Ok(None);
                            }
                        }
                    }
                }
                None => {
                    self.log_unexpected_token(None, vec![description.to_string()]);
                    return Ok(None);
                }
            }
        }
    }

    // -- tree construction --------------------------------------------------

    fn parse_production(&mut self, id: ProductionId) -> Result<NodeId> {
        self.consume_fuel()?;
        self.depth += 1;
        if self.depth > RECURSION_LIMIT {
            self.depth -= 1;
            return Err(Error::RecursionLimitExceeded);
        }
        let result = self.parse_production_inner(id);
        self.depth -= 1;
        result
    }

    fn parse_production_inner(&mut self, id: ProductionId) -> Result<NodeId> {
        let prod = self.productions.get(&id).expect("resolvable by prepare()").clone();
        let peeked = self.peek_ids(self.k)?;
        let alt_index = self.select_alternative(&prod, &peeked)?;

        let node = self.tree.new_production_node(prod.id, prod.name.clone());
        let suppressed = self.callbacks_suppressed();
        if !prod.hidden && !suppressed {
            if let Err(message) = self.analyzer.enter(&mut self.tree, node) {
                self.log_analyze_failure(message);
            }
        }

        for elem in &prod.alternatives[alt_index].elements {
            let children = self.parse_element(elem)?;
            for child in children {
                self.tree.attach(node, child);
                if !prod.hidden && !self.callbacks_suppressed() {
                    if let Err(message) = self.analyzer.child(&mut self.tree, node, child) {
                        self.log_analyze_failure(message);
                    }
                }
            }
        }

        // A hidden production's node is real (so `parse_element` can read
        // its children back out via `self.tree.children`) but never visible
        // to the analyzer and never returned as-is to a non-hidden caller —
        // see the `ElementKind::Production` arm of `parse_element`.
        if prod.hidden {
            return Ok(node);
        }

        if !self.callbacks_suppressed() {
            match self.analyzer.exit(&mut self.tree, node) {
                Ok(Some(replacement)) => return Ok(replacement),
                Ok(None) => {
                    // Subtree discarded: still return a node so the caller
                    // has something to attach, but it carries no children.
                    let empty = self.tree.new_production_node(prod.id, prod.name.clone());
                    return Ok(empty);
                }
                Err(message) => self.log_analyze_failure(message),
            }
        }
        Ok(node)
    }

    fn log_analyze_failure(&mut self, message: String) {
        self.diagnostics.push(Diagnostic::new(
            ErrorStage::Analyze,
            Severity::Error,
            message,
            TextRange::default(),
            Location { line: self.tokenizer.line(), column: self.tokenizer.column() },
        ));
    }

    fn select_alternative(&mut self, prod: &ProductionPattern, peeked: &[TokenId]) -> Result<usize> {
        for (i, alt) in prod.alternatives.iter().enumerate() {
            if alt.look_ahead.is_next(peeked) {
                return Ok(i);
            }
        }
        if self.eof_reached && peeked.is_empty() {
            let expected = Self::expected_descriptions(&self.tokenizer, &prod.alternatives);
            self.log_unexpected_token(None, expected);
            return Ok(self.fallback_alternative(prod));
        }
        let found = self.peek_token(0)?.cloned();
        let expected = Self::expected_descriptions(&self.tokenizer, &prod.alternatives);
        self.log_unexpected_token(found.as_ref(), expected);
        // Skip one token and retry selection from the new position, bounded
        // by `fuel` like any other recovery loop.
        loop {
            self.consume_fuel()?;
            if self.bump()?.is_none() {
                return Ok(self.fallback_alternative(prod));
            }
            let peeked = self.peek_ids(self.k)?;
            if peeked.is_empty() && self.eof_reached {
                return Ok(self.fallback_alternative(prod));
            }
            for (i, alt) in prod.alternatives.iter().enumerate() {
                if alt.look_ahead.is_next(&peeked) {
                    return Ok(i);
                }
            }
        }
    }

    fn fallback_alternative(&self, prod: &ProductionPattern) -> usize {
        prod.alternatives
            .iter()
            .position(|a| a.look_ahead.sequences().iter().any(|s| s.tokens.is_empty()))
            .unwrap_or(0)
    }

    fn expected_descriptions(tokenizer: &Tokenizer, alts: &[Alternative]) -> Vec<String> {
        let mut seen = Vec::new();
        for alt in alts {
            for seq in alt.look_ahead.sequences() {
                if let Some(&first) = seq.tokens.first() {
                    if let Some(desc) = tokenizer.get_pattern_description(first) {
                        if !seen.contains(&desc) {
                            seen.push(desc);
                        }
                    }
                }
            }
        }
        seen
    }

    /// Parses zero or more occurrences of `elem` (bounded by `min`/`max`),
    /// returning every resulting node in order. For a `Production` element
    /// this flattens the occurrence's own children list (a hidden
    /// production splices; a normal one contributes a single node).
    fn parse_element(&mut self, elem: &crate::grammar::Element) -> Result<Vec<NodeId>> {
        let mut nodes = Vec::new();
        let mut count: u32 = 0;
        loop {
            if let Some(max) = elem.max {
                if count >= max {
                    break;
                }
            }
            if count >= elem.min {
                let peeked = self.peek_ids(elem.first.max_len().max(1))?;
                if peeked.is_empty() || !elem.first.is_next(&peeked) {
                    break;
                }
            }
            match elem.kind {
                ElementKind::Token => {
                    let description =
                        self.tokenizer.get_pattern_description(elem.ref_id).unwrap_or_else(|| format!("token {}", elem.ref_id));
                    match self.expect_token(elem.ref_id, &description)? {
                        Some(tok) => nodes.push(self.tree.new_token_node(tok)),
                        None => break,
                    }
                }
                ElementKind::Production => {
                    let hidden = self.productions.get(&elem.ref_id).map(|p| p.hidden).unwrap_or(false);
                    let child = self.parse_production(elem.ref_id)?;
                    if hidden {
                        nodes.extend(self.tree.children(child).to_vec());
                    } else {
                        nodes.push(child);
                    }
                }
            }
            count += 1;
            if self.eof_reached && self.queue.is_empty() && count < elem.min {
                break;
            }
        }
        Ok(nodes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::CharBuffer;
    use crate::grammar::Element;
    use crate::regex::Regex;
    use crate::token::TokenPattern;

    const ID: TokenId = 1;
    const COMMA: TokenId = 2;
    const WS: TokenId = 3;

    const LIST: ProductionId = 100;

    fn list_tokenizer(input: &str) -> Tokenizer {
        let mut t = Tokenizer::new(CharBuffer::from_str(input));
        t.add_pattern(TokenPattern::regex(ID, "ID", Regex::compile("[a-z]+", false).unwrap()));
        t.add_pattern(TokenPattern::string(COMMA, "COMMA", ","));
        t.add_pattern(TokenPattern::regex(WS, "WS", Regex::compile("[ \t]+", false).unwrap()).ignored());
        t
    }

    fn list_parser(input: &str) -> Parser<NullAnalyzer> {
        let mut p = Parser::new(list_tokenizer(input), NullAnalyzer);
        p.add_production(ProductionPattern::new(LIST, "List").add_alternative(vec![
            Element::token(ID),
            Element::production(900).repeated(0, None),
        ]));
        p.add_production(
            ProductionPattern::new(900, "CommaId").hidden().add_alternative(vec![Element::token(COMMA), Element::token(ID)]),
        );
        p.prepare().unwrap();
        p
    }

    fn ids_in(outcome: &ParseOutcome) -> Vec<&str> {
        outcome
            .tree
            .leaves(outcome.tree.root().unwrap())
            .iter()
            .map(|&n| outcome.tree.node(n).as_token().unwrap())
            .filter(|t| t.pattern_id == ID)
            .map(|t| t.image.as_str())
            .collect()
    }

    #[test]
    fn s3_comma_list_recovers_from_stray_comma() {
        let mut p = list_parser("foo,,bar,baz");
        let outcome = p.parse().unwrap();
        assert_eq!(outcome.diagnostics.len(), 1);
        assert_eq!(ids_in(&outcome), vec!["foo", "bar", "baz"]);
    }

    #[test]
    fn well_formed_list_parses_without_diagnostics() {
        let mut p = list_parser("foo,bar,baz");
        let outcome = p.parse().unwrap();
        assert!(outcome.diagnostics.is_empty());
        assert_eq!(ids_in(&outcome), vec!["foo", "bar", "baz"]);
    }

    #[test]
    fn prepare_rejects_dangling_production_reference() {
        let mut p = Parser::new(list_tokenizer(""), NullAnalyzer);
        p.add_production(ProductionPattern::new(LIST, "List").add_alternative(vec![Element::production(999)]));
        assert!(p.prepare().is_err());
    }
}
