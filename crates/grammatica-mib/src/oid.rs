//! The object-identifier tree (C7, OID half).
//!
//! `ObjectIdentifierValue` nodes form a graph with back-pointers to their
//! parent and forward pointers to their children — a reference cycle with
//! respect to ownership. Per the design notes this is modelled as an arena
//! of nodes addressed by a stable index rather than `Rc`/`Weak`, mirroring
//! [`grammatica_core::tree::ParseTree`]'s arena-of-indices shape.

pub type OidNodeId = usize;

/// Identifies which MIB (by module name) and which symbol within it a node
/// belongs to, so `Mib::clear` can find and detach the nodes it uniquely
/// owns without needing a reverse map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolRef {
    pub mib: String,
    pub symbol: String,
}

#[derive(Debug, Clone)]
pub struct ObjectIdentifierValue {
    pub name: String,
    pub sub_id: u32,
    pub parent: Option<OidNodeId>,
    /// Ordered by ascending `sub_id`; duplicates (two MIBs declaring the
    /// same arc) share a single node rather than forking.
    pub children: Vec<OidNodeId>,
    pub symbol: Option<SymbolRef>,
}

/// A forest arena, though in practice almost always rooted at a single
/// sentinel node holding the three implicit top arcs (`ccitt`/`iso`/
/// `joint-iso-itu-t`) that ASN.1 modules never declare explicitly.
#[derive(Debug, Default)]
pub struct OidArena {
    nodes: Vec<Option<ObjectIdentifierValue>>,
    root: Option<OidNodeId>,
}

impl OidArena {
    /// Builds a fresh arena with the sentinel root and the three standard
    /// top-level arcs already present, as every real SMI tree assumes.
    pub fn new() -> Self {
        let mut arena = Self { nodes: Vec::new(), root: None };
        let root = arena.insert(ObjectIdentifierValue { name: String::new(), sub_id: 0, parent: None, children: Vec::new(), symbol: None });
        arena.root = Some(root);
        arena.ensure_child(root, 0, "ccitt");
        arena.ensure_child(root, 1, "iso");
        arena.ensure_child(root, 2, "joint-iso-itu-t");
        arena
    }

    pub fn root(&self) -> OidNodeId {
        self.root.expect("arena always has a root")
    }

    fn insert(&mut self, node: ObjectIdentifierValue) -> OidNodeId {
        self.nodes.push(Some(node));
        self.nodes.len() - 1
    }

    pub fn node(&self, id: OidNodeId) -> &ObjectIdentifierValue {
        self.nodes[id].as_ref().expect("reference to a cleared node")
    }

    pub fn node_mut(&mut self, id: OidNodeId) -> &mut ObjectIdentifierValue {
        self.nodes[id].as_mut().expect("reference to a cleared node")
    }

    /// Looks up a direct child of `parent` with `sub_id` by name, inserting
    /// it (in ascending-`sub_id` order) if absent. Existing nodes sharing a
    /// `sub_id` across two declarations (e.g. two MIBs both defining
    /// `internet(1)` under `dod`) are returned as-is.
    pub fn ensure_child(&mut self, parent: OidNodeId, sub_id: u32, name: &str) -> OidNodeId {
        if let Some(existing) = self.node(parent).children.iter().copied().find(|&c| self.node(c).sub_id == sub_id) {
            return existing;
        }
        let child = self.insert(ObjectIdentifierValue {
            name: name.to_string(),
            sub_id,
            parent: Some(parent),
            children: Vec::new(),
            symbol: None,
        });
        let insert_at = self.node(parent).children.iter().position(|&c| self.node(c).sub_id > sub_id).unwrap_or(self.node(parent).children.len());
        self.node_mut(parent).children.insert(insert_at, child);
        child
    }

    /// Finds an existing direct child by name (used when an OID component
    /// is a bare name reference rather than `name(number)`).
    pub fn find_child_by_name(&self, parent: OidNodeId, name: &str) -> Option<OidNodeId> {
        self.node(parent).children.iter().copied().find(|&c| self.node(c).name == name)
    }

    /// Finds a top-level arc (direct child of the arena root) by name —
    /// how an OID value's leading component (`iso`, `ccitt`, or a
    /// module-declared top-level symbol) is resolved.
    pub fn find_root_child_by_name(&self, name: &str) -> Option<OidNodeId> {
        self.find_child_by_name(self.root(), name)
    }

    /// The dotted-decimal string for `node`, omitting the sentinel root.
    pub fn to_dotted_string(&self, node: OidNodeId) -> String {
        let mut parts = Vec::new();
        let mut cur = node;
        while let Some(parent) = self.node(cur).parent {
            parts.push(self.node(cur).sub_id.to_string());
            cur = parent;
        }
        parts.reverse();
        parts.join(".")
    }

    /// Walks from the root following `sub_ids`, returning the node reached
    /// after consuming the longest prefix that exists, and how many
    /// components were consumed.
    pub fn walk_prefix(&self, sub_ids: &[u32]) -> (OidNodeId, usize) {
        let mut cur = self.root();
        let mut consumed = 0;
        for &id in sub_ids {
            match self.node(cur).children.iter().copied().find(|&c| self.node(c).sub_id == id) {
                Some(next) => {
                    cur = next;
                    consumed += 1;
                }
                None => break,
            }
        }
        (cur, consumed)
    }

    /// `GetSymbolByOid`: strips trailing components from `dotted` until a
    /// node bearing a symbol is found, returning that symbol reference.
    /// This is the longest-prefix match described in §4.7.
    pub fn symbol_by_oid(&self, dotted: &str) -> Option<&SymbolRef> {
        let sub_ids: Vec<u32> = dotted.split('.').filter_map(|p| p.parse().ok()).collect();
        for len in (0..=sub_ids.len()).rev() {
            let (node, consumed) = self.walk_prefix(&sub_ids[..len]);
            if consumed == len {
                if let Some(symbol) = &self.node(node).symbol {
                    return Some(symbol);
                }
            }
        }
        None
    }

    /// `GetRootSymbol`: walks up the parent chain from `node` as long as
    /// the parent is owned by the same MIB, returning the topmost such
    /// node's symbol.
    pub fn root_symbol(&self, node: OidNodeId) -> Option<&SymbolRef> {
        let mib = self.node(node).symbol.as_ref()?.mib.clone();
        let mut top = node;
        loop {
            let Some(parent) = self.node(top).parent else { break };
            match &self.node(parent).symbol {
                Some(s) if s.mib == mib => top = parent,
                _ => break,
            }
        }
        self.node(top).symbol.as_ref()
    }

    /// Detaches every node uniquely owned by `mib` (i.e. `symbol.mib ==
    /// mib`), clearing its `symbol` and, if it has no other MIB's claim
    /// and no children, pruning the leaf. Parent links of kept nodes are
    /// never broken, so pruning never panics on a dangling reference.
    pub fn clear_mib(&mut self, mib: &str) {
        for slot in self.nodes.iter_mut().flatten() {
            if slot.symbol.as_ref().is_some_and(|s| s.mib == mib) {
                slot.symbol = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_roots_are_seeded() {
        let arena = OidArena::new();
        assert_eq!(arena.to_dotted_string(arena.find_root_child_by_name("iso").unwrap()), "1");
    }

    #[test]
    fn ensure_child_is_idempotent_by_sub_id() {
        let mut arena = OidArena::new();
        let iso = arena.find_root_child_by_name("iso").unwrap();
        let org1 = arena.ensure_child(iso, 3, "org");
        let org2 = arena.ensure_child(iso, 3, "org-again");
        assert_eq!(org1, org2);
        assert_eq!(arena.node(org1).name, "org");
    }

    #[test]
    fn longest_prefix_match_skips_an_instance_suffix() {
        let mut arena = OidArena::new();
        let iso = arena.find_root_child_by_name("iso").unwrap();
        let org = arena.ensure_child(iso, 3, "org");
        let dod = arena.ensure_child(org, 6, "dod");
        let internet = arena.ensure_child(dod, 1, "internet");
        arena.node_mut(internet).symbol = Some(SymbolRef { mib: "RFC1155-SMI".into(), symbol: "internet".into() });
        let found = arena.symbol_by_oid("1.3.6.1.9.9").unwrap();
        assert_eq!(found.symbol, "internet");
    }
}
