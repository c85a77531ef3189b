//! SNMP MIB (ASN.1 subset) front-end: a `grammatica-core` grammar for the
//! LL(k)-decidable assignment shapes a minimal SMIv1/SMIv2 dialect needs
//! (object/type declarations plus the `NOTIFICATION-TYPE`,
//! `OBJECT-IDENTITY`, `OBJECT-GROUP`, `NOTIFICATION-GROUP`,
//! `MODULE-COMPLIANCE`, and `AGENT-CAPABILITIES` macros), a domain model of
//! modules/symbols/OID tree, and a loader that resolves `IMPORTS` and OID
//! component chains across modules.

pub mod analyzer;
pub mod error;
pub mod grammar_asn1;
pub mod loader;
pub mod model;
pub mod oid;
pub mod resources;

pub use analyzer::MibAnalyzer;
pub use error::{MibError, Result};
pub use loader::{DirectoryLocator, MibLoader, ResourceLocator};
pub use model::{Import, Mib, MibSymbol, MibType, MibValue, OidComponent, SmiVersion, SymbolId, TypeSymbol, ValueSymbol};
pub use oid::{ObjectIdentifierValue, OidArena, OidNodeId, SymbolRef};
