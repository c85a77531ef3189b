//! The MIB domain model (C7, symbol-table half): modules, symbols, and
//! the cross-MIB import bindings between them.

use indexmap::IndexMap;

use crate::oid::{OidArena, OidNodeId, SymbolRef};

pub type SymbolId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmiVersion {
    V1,
    V2,
}

/// A single `IMPORTS ... FROM Module;` binding, before and after linking.
#[derive(Debug, Clone)]
pub struct Import {
    pub module_name: String,
    pub requested_symbols: Vec<String>,
    /// Set once the exporting module has actually been loaded.
    pub resolved: bool,
}

/// The value an OID-typed symbol resolves to, as written: a chain of
/// components, each a bare number, a bare name (reference to an
/// already-declared arc, possibly in another MIB), or `name(number)`.
#[derive(Debug, Clone)]
pub struct OidComponent {
    pub name: Option<String>,
    pub number: Option<u32>,
}

#[derive(Debug, Clone)]
pub enum MibValue {
    /// Unresolved until `Initialize` walks the component chain and
    /// assigns/looks up the corresponding arena nodes.
    ObjectIdentifier { components: Vec<OidComponent>, resolved: Option<OidNodeId> },
    Integer(i64),
    Text(String),
}

impl MibValue {
    pub fn as_oid_node(&self) -> Option<OidNodeId> {
        match self {
            MibValue::ObjectIdentifier { resolved, .. } => *resolved,
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum MibType {
    /// A primitive or forward-referenced type name, e.g. `INTEGER`,
    /// `OCTET STRING`, or a `TYPE_REF` naming another module's type.
    /// Any trailing `(0..255)`-style constraint is folded into the name.
    Named(String),
    /// `SEQUENCE { field Type, ... }`, as used by a conceptual row's type.
    Sequence(Vec<(String, MibType)>),
    /// `SEQUENCE OF TypeRef`, as used by a conceptual table's type.
    SequenceOf(String),
    /// `INTEGER { name(number), ... }` or `BITS { name(number), ... }`.
    Enumerated { bits: bool, members: Vec<(String, i64)> },
}

#[derive(Debug, Clone)]
pub struct ValueSymbol {
    pub name: String,
    pub owning_mib: String,
    pub value_type: MibType,
    pub value: MibValue,
    pub access: Option<String>,
    pub status: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct TypeSymbol {
    pub name: String,
    pub owning_mib: String,
    pub aliased_type: MibType,
}

#[derive(Debug, Clone)]
pub enum MibSymbol {
    Value(ValueSymbol),
    Type(TypeSymbol),
}

impl MibSymbol {
    pub fn name(&self) -> &str {
        match self {
            MibSymbol::Value(v) => &v.name,
            MibSymbol::Type(t) => &t.name,
        }
    }

    pub fn as_value(&self) -> Option<&ValueSymbol> {
        match self {
            MibSymbol::Value(v) => Some(v),
            _ => None,
        }
    }
}

/// One parsed-and-loaded module. `symbols` preserves declaration order;
/// `by_name` is the fast-lookup index, populated both by this MIB's own
/// declarations and by names pulled in through `imports` during
/// `Initialize` (aliasing, not copying: the `SymbolId` still points at the
/// exporting MIB's table via `imported_from`).
#[derive(Debug, Clone)]
pub struct Mib {
    pub name: String,
    pub file: Option<String>,
    pub smi_version: SmiVersion,
    pub imports: Vec<Import>,
    pub symbols: Vec<MibSymbol>,
    pub by_name: IndexMap<String, SymbolId>,
    /// Names imported from elsewhere: local name -> (exporting mib, name).
    pub imported_names: IndexMap<String, (String, String)>,
    /// Populated by `Validate`: dotted OID string -> index into `symbols`.
    pub value_by_oid_string: IndexMap<String, SymbolId>,
    pub loaded_explicitly: bool,
}

impl Mib {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            file: None,
            smi_version: SmiVersion::V1,
            imports: Vec::new(),
            symbols: Vec::new(),
            by_name: IndexMap::new(),
            imported_names: IndexMap::new(),
            value_by_oid_string: IndexMap::new(),
            loaded_explicitly: false,
        }
    }

    pub fn add_symbol(&mut self, symbol: MibSymbol) -> SymbolId {
        let id = self.symbols.len();
        self.by_name.insert(symbol.name().to_string(), id);
        self.symbols.push(symbol);
        id
    }

    pub fn symbol(&self, id: SymbolId) -> &MibSymbol {
        &self.symbols[id]
    }

    /// Name lookup within this MIB, following one level of import alias.
    /// Cross-MIB resolution (actually dereferencing `imported_from` into
    /// the exporting MIB's own table) is done by the loader, which is the
    /// only thing holding every `Mib` at once.
    pub fn get_symbol(&self, name: &str) -> Option<&MibSymbol> {
        self.by_name.get(name).map(|&id| &self.symbols[id])
    }

    pub fn get_symbol_by_value(&self, oid_string: &str) -> Option<&MibSymbol> {
        self.value_by_oid_string.get(oid_string).map(|&id| &self.symbols[id])
    }

    /// Detaches this MIB's nodes from the shared OID arena. Must only be
    /// called after every MIB importing from this one has itself been
    /// cleared (reverse dependency order), per §5's resource policy.
    pub fn clear(&mut self, arena: &mut OidArena) {
        arena.clear_mib(&self.name);
        self.symbols.clear();
        self.by_name.clear();
        self.value_by_oid_string.clear();
    }

    pub fn symbol_ref(&self, name: &str) -> SymbolRef {
        SymbolRef { mib: self.name.clone(), symbol: name.to_string() }
    }
}
