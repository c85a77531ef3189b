//! Bundled MIB text (C6 resource half): a minimal stand-in for the handful
//! of foundational modules every SNMP deployment assumes are already on
//! disk somewhere. Consulted only after an explicit path and the
//! configured search directories have both come up empty — see
//! [`crate::loader::MibLoader::locate`].

const RFC1155_SMI: &str = include_str!("../resources/rfc1155-smi.mib");
const RFC1213_MIB: &str = include_str!("../resources/rfc1213-mib.mib");

pub fn bundled_source(module_name: &str) -> Option<&'static str> {
    match module_name {
        "RFC1155-SMI" => Some(RFC1155_SMI),
        "RFC1213-MIB" => Some(RFC1213_MIB),
        _ => None,
    }
}
