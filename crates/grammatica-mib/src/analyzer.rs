//! `MibAnalyzer` (C8): turns parse-tree callbacks into `Mib` contents.
//!
//! Per the grammar in [`crate::grammar_asn1`], the dispatch productions
//! (`Imports`, `Assignment`, `ImportSymbol`, `AccessKeyword`, ...) are all
//! `hidden`, so every real symbol-building decision happens bottom-up in
//! `exit` for the assignment-shaped production ids and `ImportGroup`. By
//! the time `exit(node)` fires the node's children (and their own
//! already-fired `exit` calls) are fully attached, so no second pass over
//! the tree is needed to build one `Mib`.

use grammatica_core::parser::Analyzer;
use grammatica_core::tree::{NodeId, NodeKind, ParseTree};

use crate::grammar_asn1::{prod, tok};
use crate::model::{Mib, MibSymbol, MibType, MibValue, OidComponent, TypeSymbol, ValueSymbol};

/// Drives one module's parse, accumulating into `mib`. The loader hands
/// this a freshly-constructed, empty `Mib` and takes it back out once
/// `Parser::parse` returns.
pub struct MibAnalyzer {
    pub mib: Mib,
}

impl MibAnalyzer {
    pub fn new(mib: Mib) -> Self {
        Self { mib }
    }
}

impl Analyzer for MibAnalyzer {
    fn exit(&mut self, tree: &mut ParseTree, node: NodeId) -> Result<Option<NodeId>, String> {
        let (prod_id, children) = match &tree.node(node).kind {
            NodeKind::Production { id, .. } => (*id, tree.children(node).to_vec()),
            NodeKind::Token(_) => return Ok(Some(node)),
        };
        match prod_id {
            prod::IMPORT_GROUP => self.mib.imports.push(read_import_group(tree, &children)),
            prod::OID_VALUE_ASSIGNMENT => {
                let name = token_image(tree, children[0]).to_string();
                let components = read_oid_value(tree, &children);
                self.mib.add_symbol(MibSymbol::Value(ValueSymbol {
                    name,
                    owning_mib: self.mib.name.clone(),
                    value_type: MibType::Named("OBJECT IDENTIFIER".to_string()),
                    value: MibValue::ObjectIdentifier { components, resolved: None },
                    access: None,
                    status: None,
                    description: None,
                }));
            }
            prod::MODULE_IDENTITY_ASSIGNMENT => {
                let name = token_image(tree, children[0]).to_string();
                let description = last_text(tree, &children);
                let components = read_oid_value(tree, &children);
                self.mib.add_symbol(MibSymbol::Value(ValueSymbol {
                    name,
                    owning_mib: self.mib.name.clone(),
                    value_type: MibType::Named("OBJECT IDENTIFIER".to_string()),
                    value: MibValue::ObjectIdentifier { components, resolved: None },
                    access: None,
                    status: None,
                    description,
                }));
            }
            prod::OBJECT_TYPE_ASSIGNMENT => {
                let name = token_image(tree, children[0]).to_string();
                let value_type = read_syntax_spec(tree, &children);
                let access = value_after_token(tree, &children, tok::MAX_ACCESS_KW)
                    .or_else(|| value_after_token(tree, &children, tok::ACCESS_KW));
                let status = value_after_token(tree, &children, tok::STATUS_KW);
                let description = value_after_token(tree, &children, tok::DESCRIPTION_KW);
                let components = read_oid_value(tree, &children);
                self.mib.add_symbol(MibSymbol::Value(ValueSymbol {
                    name,
                    owning_mib: self.mib.name.clone(),
                    value_type,
                    value: MibValue::ObjectIdentifier { components, resolved: None },
                    access,
                    status,
                    description,
                }));
            }
            prod::TYPE_ALIAS_ASSIGNMENT => {
                let name = token_image(tree, children[0]).to_string();
                let aliased_type = read_syntax_spec(tree, &children);
                self.mib.add_symbol(MibSymbol::Type(TypeSymbol { name, owning_mib: self.mib.name.clone(), aliased_type }));
            }
            prod::OBJECT_IDENTITY_ASSIGNMENT
            | prod::NOTIFICATION_TYPE_ASSIGNMENT
            | prod::OBJECT_GROUP_ASSIGNMENT
            | prod::NOTIFICATION_GROUP_ASSIGNMENT
            | prod::MODULE_COMPLIANCE_ASSIGNMENT
            | prod::AGENT_CAPABILITIES_ASSIGNMENT => {
                // MODULE-COMPLIANCE and AGENT-CAPABILITIES splice their
                // compliance-module/supports-clause children (themselves
                // hidden productions) straight into this node's own child
                // list, so a GROUP/OBJECT item's own DESCRIPTION would be
                // mistaken for the module's if we scanned for the *last*
                // TEXT token instead of the one right after this STATUS.
                let name = token_image(tree, children[0]).to_string();
                let status = value_after_token(tree, &children, tok::STATUS_KW);
                let description = value_after_token(tree, &children, tok::DESCRIPTION_KW);
                let components = read_oid_value(tree, &children);
                self.mib.add_symbol(MibSymbol::Value(ValueSymbol {
                    name,
                    owning_mib: self.mib.name.clone(),
                    value_type: MibType::Named("OBJECT IDENTIFIER".to_string()),
                    value: MibValue::ObjectIdentifier { components, resolved: None },
                    access: None,
                    status,
                    description,
                }));
            }
            _ => {}
        }
        Ok(Some(node))
    }
}

fn token_image(tree: &ParseTree, node: NodeId) -> &str {
    tree.node(node).as_token().map(|t| t.image.as_str()).unwrap_or_default()
}

fn token_pattern_id(tree: &ParseTree, node: NodeId) -> Option<i32> {
    tree.node(node).as_token().map(|t| t.pattern_id)
}

/// Finds the token child matching `marker` and returns the next sibling
/// child's image, if any — how every `KEYWORD value` clause in an
/// assignment is read regardless of what else the hidden splices mixed in
/// around it.
fn value_after_token(tree: &ParseTree, children: &[NodeId], marker: i32) -> Option<String> {
    let idx = children.iter().position(|&c| token_pattern_id(tree, c) == Some(marker))?;
    let value = children.get(idx + 1)?;
    Some(unquote(token_image(tree, *value)))
}

fn last_text(tree: &ParseTree, children: &[NodeId]) -> Option<String> {
    children
        .iter()
        .rev()
        .find(|&&c| token_pattern_id(tree, c) == Some(tok::TEXT))
        .map(|&c| unquote(token_image(tree, c)))
}

fn unquote(image: &str) -> String {
    image.strip_prefix('"').and_then(|s| s.strip_suffix('"')).unwrap_or(image).to_string()
}

/// Reads the trailing `OidValue` production child's own children into a
/// component list, skipping its `{`/`}` delimiter tokens.
fn read_oid_value(tree: &ParseTree, children: &[NodeId]) -> Vec<OidComponent> {
    let Some(&oid_node) = children.iter().rev().find(|&&c| matches!(&tree.node(c).kind, NodeKind::Production { id, .. } if *id == prod::OID_VALUE))
    else {
        return Vec::new();
    };
    tree.children(oid_node)
        .iter()
        .filter(|&&c| matches!(&tree.node(c).kind, NodeKind::Production { id, .. } if *id == prod::OID_COMPONENT))
        .map(|&c| read_oid_component(tree, c))
        .collect()
}

fn read_oid_component(tree: &ParseTree, node: NodeId) -> OidComponent {
    let mut name = None;
    let mut number = None;
    for &child in tree.children(node) {
        match token_pattern_id(tree, child) {
            Some(id) if id == tok::LOWER_ID => name = Some(token_image(tree, child).to_string()),
            Some(id) if id == tok::NUMBER => number = token_image(tree, child).parse().ok(),
            _ => {}
        }
    }
    OidComponent { name, number }
}

fn read_syntax_spec(tree: &ParseTree, children: &[NodeId]) -> MibType {
    let Some(&spec_node) = children.iter().find(|&&c| matches!(&tree.node(c).kind, NodeKind::Production { id, .. } if *id == prod::SYNTAX_SPEC))
    else {
        return MibType::Named("UNKNOWN".to_string());
    };
    mib_type_from_spec_node(tree, spec_node)
}

/// Reads one `SyntaxSpec` node's own children. `Constraint`, `Field`, and
/// `NamedNumberItem` are all hidden, so their tokens splice straight into
/// this node's child list; only `NamedNumberList` and nested `SyntaxSpec`
/// occurrences (inside a `SEQUENCE { ... }`) survive as their own nodes.
fn mib_type_from_spec_node(tree: &ParseTree, spec_node: NodeId) -> MibType {
    let sc = tree.children(spec_node).to_vec();
    let Some(&first) = sc.first() else {
        return MibType::Named("UNKNOWN".to_string());
    };
    match token_pattern_id(tree, first) {
        Some(id) if id == tok::TYPE_REF => MibType::Named(token_image(tree, first).to_string()),
        Some(id) if id == tok::INTEGER_KW => match find_named_number_list(tree, &sc) {
            Some(list) => MibType::Enumerated { bits: false, members: read_named_number_list(tree, list) },
            None => MibType::Named("INTEGER".to_string()),
        },
        Some(id) if id == tok::OCTET_KW => MibType::Named("OCTET STRING".to_string()),
        Some(id) if id == tok::BITS_KW => {
            let members = find_named_number_list(tree, &sc).map(|list| read_named_number_list(tree, list)).unwrap_or_default();
            MibType::Enumerated { bits: true, members }
        }
        Some(id) if id == tok::SEQUENCE_KW => {
            if sc.iter().any(|&c| token_pattern_id(tree, c) == Some(tok::OF_KW)) {
                let target = sc
                    .iter()
                    .find(|&&c| token_pattern_id(tree, c) == Some(tok::TYPE_REF))
                    .map(|&c| token_image(tree, c).to_string())
                    .unwrap_or_default();
                MibType::SequenceOf(target)
            } else {
                MibType::Sequence(read_sequence_fields(tree, &sc))
            }
        }
        _ => MibType::Named("UNKNOWN".to_string()),
    }
}

fn find_named_number_list(tree: &ParseTree, children: &[NodeId]) -> Option<NodeId> {
    children
        .iter()
        .find(|&&c| matches!(&tree.node(c).kind, NodeKind::Production { id, .. } if *id == prod::NAMED_NUMBER_LIST))
        .copied()
}

/// Reads a `NamedNumberList` node's spliced `name(number)` pairs, used by
/// both enumerated `INTEGER` and `BITS` syntaxes.
fn read_named_number_list(tree: &ParseTree, list_node: NodeId) -> Vec<(String, i64)> {
    let mut name = None;
    let mut out = Vec::new();
    for &child in tree.children(list_node) {
        match token_pattern_id(tree, child) {
            Some(id) if id == tok::LOWER_ID => name = Some(token_image(tree, child).to_string()),
            Some(id) if id == tok::NUMBER => {
                if let Some(n) = name.take() {
                    if let Ok(v) = token_image(tree, child).parse::<i64>() {
                        out.push((n, v));
                    }
                }
            }
            _ => {}
        }
    }
    out
}

/// Reads a `SEQUENCE { ... }` node's fields: each `Field` (hidden) splices
/// a `LOWER_ID` immediately followed by its own `SyntaxSpec` node.
fn read_sequence_fields(tree: &ParseTree, children: &[NodeId]) -> Vec<(String, MibType)> {
    let mut fields = Vec::new();
    for pair in children.windows(2) {
        let [name_node, ty_node] = pair else { continue };
        if token_pattern_id(tree, *name_node) != Some(tok::LOWER_ID) {
            continue;
        }
        if matches!(&tree.node(*ty_node).kind, NodeKind::Production { id, .. } if *id == prod::SYNTAX_SPEC) {
            fields.push((token_image(tree, *name_node).to_string(), mib_type_from_spec_node(tree, *ty_node)));
        }
    }
    fields
}

fn read_import_group(tree: &ParseTree, children: &[NodeId]) -> crate::model::Import {
    let mut requested_symbols = Vec::new();
    let mut module_name = String::new();
    let mut seen_from = false;
    for &child in children {
        match token_pattern_id(tree, child) {
            Some(id) if id == tok::FROM_KW => seen_from = true,
            Some(id) if id == tok::TYPE_REF && seen_from => module_name = token_image(tree, child).to_string(),
            Some(id) if id == tok::LOWER_ID || id == tok::TYPE_REF => requested_symbols.push(token_image(tree, child).to_string()),
            _ => {}
        }
    }
    crate::model::Import { module_name, requested_symbols, resolved: false }
}
