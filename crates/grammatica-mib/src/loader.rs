//! `MibLoader` (C6/C8): locates, parses, links, and indexes MIB modules.
//!
//! Mirrors [`grammatica_core::lookahead::LookAheadAnalyzer::fixpoint`]'s
//! shape for the `Initialize` pass: OID components and cross-MIB imports
//! can reference symbols declared later in the same module or in a module
//! that is itself still mid-load (a circular `IMPORTS`), so resolution
//! keeps iterating until a round makes no further progress rather than
//! assuming one top-to-bottom pass suffices.

use std::fs;
use std::path::{Path, PathBuf};

use grammatica_core::parser::Parser;
use indexmap::IndexMap;

use crate::analyzer::MibAnalyzer;
use crate::error::{MibError, Result};
use crate::grammar_asn1::{build_productions, build_tokenizer};
use crate::model::{Mib, MibSymbol, MibType, MibValue, OidComponent};
use crate::oid::{OidArena, OidNodeId};

const MAX_FIXPOINT_ROUNDS: u32 = 64;

/// Where a module's source text comes from when no explicit path and no
/// configured search directory holds it — see [`MibLoader::locate`].
pub trait ResourceLocator {
    fn locate(&self, module_name: &str) -> Option<String>;
}

/// Searches `dirs` in order for `<module_name>.mib` or `<module_name>.txt`.
pub struct DirectoryLocator {
    pub dirs: Vec<PathBuf>,
}

impl ResourceLocator for DirectoryLocator {
    fn locate(&self, module_name: &str) -> Option<String> {
        for dir in &self.dirs {
            for ext in ["mib", "txt", "MIB"] {
                let candidate = dir.join(format!("{module_name}.{ext}"));
                if let Ok(text) = fs::read_to_string(&candidate) {
                    return Some(text);
                }
            }
        }
        None
    }
}

pub struct MibLoader<L: ResourceLocator = DirectoryLocator> {
    locator: L,
    mibs: IndexMap<String, Mib>,
    arena: OidArena,
    /// Modules currently being loaded, used to tolerate circular `IMPORTS`
    /// (§4.6/S6): re-entering a module already on this stack is a no-op.
    loading: Vec<String>,
    /// Finish order of `load`; `clear_all` walks it in reverse so a module
    /// is only detached after everything that might import from it.
    load_order: Vec<String>,
}

impl MibLoader<DirectoryLocator> {
    pub fn new() -> Self {
        Self::with_locator(DirectoryLocator { dirs: Vec::new() })
    }

    pub fn add_search_dir(&mut self, dir: impl Into<PathBuf>) {
        self.locator.dirs.push(dir.into());
    }
}

impl Default for MibLoader<DirectoryLocator> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: ResourceLocator> MibLoader<L> {
    pub fn with_locator(locator: L) -> Self {
        Self { locator, mibs: IndexMap::new(), arena: OidArena::new(), loading: Vec::new(), load_order: Vec::new() }
    }

    pub fn arena(&self) -> &OidArena {
        &self.arena
    }

    pub fn mib(&self, name: &str) -> Option<&Mib> {
        self.mibs.get(name)
    }

    /// Loads an explicit file. The module's real name (its first token, the
    /// `TYPE_REF` before `DEFINITIONS`) — not the file's name — is what
    /// ends up indexed, matching how `IMPORTS ... FROM <name>` resolves it.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<&Mib> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|e| MibError::Core(e.into()))?;
        let name = module_name_of(&source).ok_or_else(|| MibError::NotFound(path.display().to_string()))?;
        self.load_source(&name, source, Some(path.display().to_string()))?;
        Ok(&self.mibs[&name])
    }

    /// Loads by module name, consulting (in order) an already-loaded copy,
    /// the configured `ResourceLocator`, then the bundled resources — §6's
    /// search order.
    pub fn load(&mut self, name: &str) -> Result<&Mib> {
        if !self.mibs.contains_key(name) {
            let source = self
                .locator
                .locate(name)
                .or_else(|| crate::resources::bundled_source(name).map(str::to_string))
                .ok_or_else(|| MibError::NotFound(name.to_string()))?;
            self.load_source(name, source, None)?;
        }
        Ok(&self.mibs[name])
    }

    fn load_source(&mut self, name: &str, source: String, file: Option<String>) -> Result<()> {
        if self.loading.contains(&name.to_string()) {
            // Circular IMPORTS: the in-progress load further up the stack
            // will finish this module; don't recurse again.
            return Ok(());
        }
        self.loading.push(name.to_string());

        let mut mib = Mib::new(name);
        mib.file = file;
        mib.loaded_explicitly = true;

        let tokenizer = build_tokenizer(&source);
        let mut parser = Parser::new(tokenizer, MibAnalyzer::new(mib));
        for production in build_productions().into_values() {
            parser.add_production(production);
        }
        parser.prepare().map_err(|_e| MibError::NotFound(name.to_string()))?;
        let outcome = parser.parse().map_err(MibError::Core)?;
        if outcome.diagnostics.has_errors() {
            self.loading.pop();
            return Err(MibError::LoadFailure { module: name.to_string(), diagnostics: outcome.diagnostics });
        }

        // `MibAnalyzer` lives inside `parser`; there is no handle back to it
        // after `parse()` consumes the tree, so re-derive it is impossible —
        // instead `Parser` hands ownership back out here.
        let mib = parser.into_analyzer().mib;

        let imports: Vec<String> = mib.imports.iter().map(|i| i.module_name.clone()).collect();
        self.mibs.insert(name.to_string(), mib);
        for dependency in imports {
            self.load(&dependency)?;
        }

        self.initialize(name);
        self.validate(name);

        self.loading.pop();
        self.load_order.push(name.to_string());
        Ok(())
    }

    /// Resolves each import's requested names against the now-loaded
    /// exporting modules, and walks every value symbol's OID component
    /// chain into the shared arena. Both can depend on sibling symbols not
    /// yet resolved on the first pass (forward references, or the second
    /// half of a circular import), so this loops to a fixpoint.
    fn initialize(&mut self, name: &str) {
        for _round in 0..MAX_FIXPOINT_ROUNDS {
            let mut progressed = false;

            let import_bindings: Vec<(String, String)> = {
                let Some(mib) = self.mibs.get(name) else { break };
                mib.imports
                    .iter()
                    .filter(|i| !i.resolved)
                    .flat_map(|i| i.requested_symbols.iter().map(move |s| (i.module_name.clone(), s.clone())))
                    .collect()
            };
            for (exporting, requested) in &import_bindings {
                if self.mibs.get(exporting).and_then(|m| m.get_symbol(requested)).is_some() {
                    let mib = self.mibs.get_mut(name).unwrap();
                    mib.imported_names.insert(requested.clone(), (exporting.clone(), requested.clone()));
                    progressed = true;
                }
            }
            let newly_resolved: Vec<String> = {
                let Some(mib) = self.mibs.get(name) else { break };
                mib.imports
                    .iter()
                    .filter(|i| !i.resolved)
                    .filter(|i| i.requested_symbols.iter().all(|s| self.mibs.get(&i.module_name).is_some_and(|m| m.get_symbol(s).is_some())))
                    .map(|i| i.module_name.clone())
                    .collect()
            };
            if !newly_resolved.is_empty() {
                let mib = self.mibs.get_mut(name).unwrap();
                for import in &mut mib.imports {
                    if newly_resolved.contains(&import.module_name) {
                        import.resolved = true;
                        progressed = true;
                    }
                }
            }

            let unresolved_ids: Vec<usize> = {
                let Some(mib) = self.mibs.get(name) else { break };
                mib.symbols
                    .iter()
                    .enumerate()
                    .filter(|(_, s)| matches!(s.as_value().map(|v| &v.value), Some(MibValue::ObjectIdentifier { resolved: None, .. })))
                    .map(|(i, _)| i)
                    .collect()
            };
            for id in unresolved_ids {
                let components = {
                    let mib = &self.mibs[name];
                    match &mib.symbols[id] {
                        MibSymbol::Value(v) => match &v.value {
                            MibValue::ObjectIdentifier { components, .. } => components.clone(),
                            _ => continue,
                        },
                        _ => continue,
                    }
                };
                if let Some(node) = resolve_components(&mut self.arena, &self.mibs, name, &components) {
                    let mib = self.mibs.get_mut(name).unwrap();
                    if let MibSymbol::Value(v) = &mut mib.symbols[id] {
                        if let MibValue::ObjectIdentifier { resolved, .. } = &mut v.value {
                            *resolved = Some(node);
                            progressed = true;
                        }
                    }
                }
            }

            if !progressed {
                break;
            }
        }
    }

    /// Indexes resolved value symbols by dotted OID string, registers each
    /// one's [`crate::oid::SymbolRef`] on its arena node, and flattens a
    /// type alias's `SYNTAX` reference one level when it names another
    /// locally (or imported) declared alias.
    fn validate(&mut self, name: &str) {
        let Some(mib) = self.mibs.get(name) else { return };
        let resolved: Vec<(String, OidNodeId)> = mib
            .symbols
            .iter()
            .filter_map(|s| s.as_value().and_then(|v| v.value.as_oid_node()).map(|n| (s.name().to_string(), n)))
            .collect();
        let owning = name.to_string();
        for (symbol_name, node) in resolved {
            let dotted = self.arena.to_dotted_string(node);
            self.arena.node_mut(node).symbol = Some(crate::oid::SymbolRef { mib: owning.clone(), symbol: symbol_name.clone() });
            let mib = self.mibs.get_mut(name).unwrap();
            mib.value_by_oid_string.insert(dotted, *mib.by_name.get(&symbol_name).unwrap());
        }

        let alias_targets: Vec<(usize, String)> = {
            let mib = &self.mibs[name];
            mib.symbols
                .iter()
                .enumerate()
                .filter_map(|(i, s)| match s {
                    MibSymbol::Type(t) => match &t.aliased_type {
                        MibType::Named(n) => Some((i, n.clone())),
                        _ => None,
                    },
                    _ => None,
                })
                .collect()
        };
        for (id, target_name) in alias_targets {
            let flattened = self.mibs[name].get_symbol(&target_name).and_then(|s| match s {
                MibSymbol::Type(t) => Some(t.aliased_type.clone()),
                _ => None,
            });
            if let Some(flattened) = flattened {
                let mib = self.mibs.get_mut(name).unwrap();
                if let MibSymbol::Type(t) = &mut mib.symbols[id] {
                    t.aliased_type = flattened;
                }
            }
        }
    }

    /// Tears down every loaded module, in reverse load order so a module is
    /// only detached from the shared OID arena after everything that might
    /// still reference it through an import is already gone (§5).
    pub fn clear_all(&mut self) {
        for name in self.load_order.clone().into_iter().rev() {
            if let Some(mut mib) = self.mibs.shift_remove(&name) {
                mib.clear(&mut self.arena);
            }
        }
        self.load_order.clear();
    }
}

#[cfg(test)]
mod loader_tests;

fn module_name_of(source: &str) -> Option<String> {
    source.split_whitespace().next().map(str::to_string)
}

fn resolve_components(arena: &mut OidArena, mibs: &IndexMap<String, Mib>, owning_mib: &str, components: &[OidComponent]) -> Option<OidNodeId> {
    let mut cur = arena.root();
    for (i, comp) in components.iter().enumerate() {
        match (&comp.name, comp.number) {
            (Some(n), Some(num)) => cur = arena.ensure_child(cur, num, n),
            (None, Some(num)) => cur = arena.ensure_child(cur, num, &num.to_string()),
            (Some(n), None) => {
                if let Some(existing) = arena.find_child_by_name(cur, n) {
                    cur = existing;
                } else if i == 0 {
                    cur = lookup_symbol_oid_node(mibs, owning_mib, n)?;
                } else {
                    return None;
                }
            }
            (None, None) => return None,
        }
    }
    Some(cur)
}

fn lookup_symbol_oid_node(mibs: &IndexMap<String, Mib>, owning_mib: &str, name: &str) -> Option<OidNodeId> {
    let mib = mibs.get(owning_mib)?;
    if let Some(MibSymbol::Value(v)) = mib.get_symbol(name) {
        if let Some(node) = v.value.as_oid_node() {
            return Some(node);
        }
    }
    let (exporting, exported_name) = mib.imported_names.get(name)?;
    let exporting_mib = mibs.get(exporting)?;
    match exporting_mib.get_symbol(exported_name) {
        Some(MibSymbol::Value(v)) => v.value.as_oid_node(),
        _ => None,
    }
}
