use std::collections::HashMap;
use std::fs;

use indoc::indoc;

use crate::loader::{MibLoader, ResourceLocator};
use crate::model::{MibSymbol, MibType};

/// Resolves modules from an in-memory map, standing in for a directory of
/// MIB files or a remote registry without touching the filesystem.
struct MapLocator(HashMap<String, String>);

impl ResourceLocator for MapLocator {
    fn locate(&self, module_name: &str) -> Option<String> {
        self.0.get(module_name).cloned()
    }
}

#[test]
fn s4_loading_rfc1213_mib_resolves_sys_descr() {
    let mut loader = MibLoader::new();
    let mib = loader.load("RFC1213-MIB").unwrap();
    assert_eq!(mib.name, "RFC1213-MIB");

    let sys_descr = mib.get_symbol("sysDescr").and_then(MibSymbol::as_value).expect("sysDescr is a value symbol");
    let node = sys_descr.value.as_oid_node().expect("sysDescr's OID is resolved");
    assert_eq!(loader.arena().to_dotted_string(node), "1.3.6.1.2.1.1.1");
}

#[test]
fn s5_longest_prefix_match_skips_instance_suffix() {
    let mut loader = MibLoader::new();
    loader.load("RFC1213-MIB").unwrap();

    // ".0" is a scalar instance index, not a declared child of sysDescr, so
    // the longest-prefix match must still land on sysDescr itself.
    let found = loader.arena().symbol_by_oid("1.3.6.1.2.1.1.1.0").expect("prefix match finds sysDescr");
    assert_eq!(found.symbol, "sysDescr");
    assert_eq!(found.mib, "RFC1213-MIB");
}

#[test]
fn property_7_oid_round_trip() {
    let mut loader = MibLoader::new();
    let mib = loader.load("RFC1213-MIB").unwrap();

    let sys_descr = mib.get_symbol_by_value("1.3.6.1.2.1.1.1").and_then(MibSymbol::as_value).expect("value map hit");
    assert_eq!(sys_descr.name, "sysDescr");

    let found = loader.arena().symbol_by_oid("1.3.6.1.2.1.1.1.1.2").expect("trailing .1.2 is stripped");
    assert_eq!(found.symbol, "sysDescr");
}

#[test]
fn property_6_repeated_load_is_idempotent() {
    let mut loader = MibLoader::new();
    let first_len = loader.load("RFC1213-MIB").unwrap().symbols.len();
    let second_len = loader.load("RFC1213-MIB").unwrap().symbols.len();
    assert_eq!(first_len, second_len);
    assert_eq!(loader.mib("RFC1213-MIB").unwrap().symbols.len(), first_len);
}

#[test]
fn s6_circular_imports_resolve_symmetrically() {
    let module_a = indoc! {"
        MIB-A DEFINITIONS ::=
        BEGIN
        IMPORTS
            bNode FROM MIB-B;
        aNode OBJECT IDENTIFIER ::= { bNode 1 }
        END
    "};
    let module_b = indoc! {"
        MIB-B DEFINITIONS ::=
        BEGIN
        IMPORTS
            aNode FROM MIB-A;
        bNode OBJECT IDENTIFIER ::= { iso 5 }
        END
    "};

    let mut map = HashMap::new();
    map.insert("MIB-A".to_string(), module_a.to_string());
    map.insert("MIB-B".to_string(), module_b.to_string());

    let mut loader = MibLoader::with_locator(MapLocator(map));
    loader.load("MIB-A").unwrap();

    let a = loader.mib("MIB-A").unwrap();
    let b = loader.mib("MIB-B").unwrap();

    let a_node = a.get_symbol("aNode").and_then(MibSymbol::as_value).unwrap().value.as_oid_node().expect("aNode resolved");
    let b_node = b.get_symbol("bNode").and_then(MibSymbol::as_value).unwrap().value.as_oid_node().expect("bNode resolved");

    assert_eq!(loader.arena().to_dotted_string(b_node), "1.5");
    assert_eq!(loader.arena().to_dotted_string(a_node), "1.5.1");
}

#[test]
fn directory_locator_finds_a_file_before_falling_back_to_bundled_resources() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("ACME-MIB.mib"),
        indoc! {"
            ACME-MIB DEFINITIONS ::=
            BEGIN
            acmeRoot OBJECT IDENTIFIER ::= { iso 9999 }
            END
        "},
    )
    .unwrap();

    let mut loader = MibLoader::new();
    loader.add_search_dir(dir.path());
    let mib = loader.load("ACME-MIB").unwrap();

    let node = mib.get_symbol("acmeRoot").and_then(MibSymbol::as_value).unwrap().value.as_oid_node().expect("resolved against iso");
    assert_eq!(loader.arena().to_dotted_string(node), "1.9999");
}

#[test]
fn smiv2_macros_and_sequence_table_parse_and_synthesize() {
    let module = indoc! {r#"
        ACME-MIB DEFINITIONS ::=
        BEGIN
        acmeRoot OBJECT IDENTIFIER ::= { iso 9999 }

        AcmeEntry ::= SEQUENCE {
            acmeIndex INTEGER,
            acmeStatus INTEGER { enabled(1), disabled(2) },
            acmeFlags BITS { flagA(0), flagB(1) }
        }

        acmeTable OBJECT-TYPE
            SYNTAX SEQUENCE OF AcmeEntry
            MAX-ACCESS not-accessible
            STATUS current
            DESCRIPTION "A table of entries."
            ::= { acmeRoot 1 }

        acmeEntry OBJECT-TYPE
            SYNTAX AcmeEntry
            MAX-ACCESS not-accessible
            STATUS current
            DESCRIPTION "A row in the table."
            ::= { acmeTable 1 }

        acmeLevel OBJECT-TYPE
            SYNTAX INTEGER (0..255)
            MAX-ACCESS read-only
            STATUS current
            DESCRIPTION "A bounded level."
            ::= { acmeRoot 2 }

        acmeIdentity OBJECT-IDENTITY
            STATUS current
            DESCRIPTION "An identity arc."
            ::= { acmeRoot 3 }

        acmeTrap NOTIFICATION-TYPE
            OBJECTS { acmeLevel }
            STATUS current
            DESCRIPTION "A trap fired on level change."
            ::= { acmeRoot 4 }

        acmeGroup OBJECT-GROUP
            OBJECTS { acmeLevel }
            STATUS current
            DESCRIPTION "The objects group."
            ::= { acmeRoot 5 }

        acmeNotifGroup NOTIFICATION-GROUP
            NOTIFICATIONS { acmeTrap }
            STATUS current
            DESCRIPTION "The notifications group."
            ::= { acmeRoot 6 }

        acmeCompliance MODULE-COMPLIANCE
            STATUS current
            DESCRIPTION "The compliance statement."
            MODULE
                MANDATORY-GROUPS { acmeGroup, acmeNotifGroup }
                OBJECT acmeLevel
                    MIN-ACCESS read-only
                    DESCRIPTION "Write access is not required."
            ::= { acmeRoot 7 }

        acmeAgent AGENT-CAPABILITIES
            PRODUCT-RELEASE "1.0"
            STATUS current
            DESCRIPTION "Agent capabilities statement."
            SUPPORTS ACME-MIB
            INCLUDES { acmeGroup }
            ::= { acmeRoot 8 }
        END
    "#};

    let mut map = HashMap::new();
    map.insert("ACME-MIB".to_string(), module.to_string());
    let mut loader = MibLoader::with_locator(MapLocator(map));
    let mib = loader.load("ACME-MIB").unwrap();

    let table = mib.get_symbol("acmeTable").and_then(MibSymbol::as_value).expect("acmeTable is a value symbol");
    assert!(matches!(&table.value_type, MibType::SequenceOf(name) if name == "AcmeEntry"));

    let fields = match mib.get_symbol("AcmeEntry") {
        Some(MibSymbol::Type(t)) => match &t.aliased_type {
            MibType::Sequence(fields) => fields.clone(),
            other => panic!("expected SEQUENCE, got {other:?}"),
        },
        other => panic!("expected a type symbol, got {other:?}"),
    };
    assert_eq!(fields.len(), 3);
    assert_eq!(fields[0].0, "acmeIndex");
    assert!(matches!(&fields[0].1, MibType::Named(n) if n == "INTEGER"));
    match &fields[1].1 {
        MibType::Enumerated { bits, members } => {
            assert!(!bits);
            assert_eq!(members, &[("enabled".to_string(), 1), ("disabled".to_string(), 2)]);
        }
        other => panic!("expected enumerated INTEGER, got {other:?}"),
    }
    match &fields[2].1 {
        MibType::Enumerated { bits, members } => {
            assert!(bits);
            assert_eq!(members, &[("flagA".to_string(), 0), ("flagB".to_string(), 1)]);
        }
        other => panic!("expected BITS, got {other:?}"),
    }

    let identity = mib.get_symbol("acmeIdentity").and_then(MibSymbol::as_value).expect("acmeIdentity is a value symbol");
    assert_eq!(identity.description.as_deref(), Some("An identity arc."));

    let trap = mib.get_symbol("acmeTrap").and_then(MibSymbol::as_value).expect("acmeTrap is a value symbol");
    assert_eq!(trap.status.as_deref(), Some("current"));

    let group = mib.get_symbol("acmeGroup").and_then(MibSymbol::as_value).expect("acmeGroup is a value symbol");
    let group_node = group.value.as_oid_node().expect("acmeGroup resolved");
    assert_eq!(loader.arena().to_dotted_string(group_node), "1.9999.5");

    let compliance = mib.get_symbol("acmeCompliance").and_then(MibSymbol::as_value).expect("acmeCompliance is a value symbol");
    assert_eq!(compliance.description.as_deref(), Some("The compliance statement."));

    let agent = mib.get_symbol("acmeAgent").and_then(MibSymbol::as_value).expect("acmeAgent is a value symbol");
    assert_eq!(agent.description.as_deref(), Some("Agent capabilities statement."));
}
