//! Thin CLI over [`grammatica_mib`]: load one or more MIB modules and print
//! their resolved symbols and OID tree.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser as ClapParser;
use grammatica_mib::{MibLoader, MibSymbol};

#[derive(ClapParser)]
#[command(name = "grammatica", version, about = "Load SNMP MIB modules and browse their symbol/OID tree")]
struct Cli {
    /// MIB module names (resolved via -I / the bundled resources) or file paths to load.
    #[arg(required = true)]
    modules: Vec<String>,

    /// Additional directories to search for MIB files, checked before the bundled resources.
    #[arg(short = 'I', long = "include", value_name = "DIR")]
    include: Vec<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let mut loader = MibLoader::new();
    for dir in cli.include {
        loader.add_search_dir(dir);
    }

    let mut loaded = Vec::new();
    for module in &cli.modules {
        let result = if PathBuf::from(module).exists() { loader.load_file(module) } else { loader.load(module) };
        match result {
            Ok(mib) => loaded.push(mib.name.clone()),
            Err(e) => {
                eprintln!("error loading '{module}': {e}");
                return ExitCode::FAILURE;
            }
        }
    }

    for name in loaded {
        let Some(mib) = loader.mib(&name) else { continue };
        println!("{}", mib.name);
        for symbol in &mib.symbols {
            print_symbol(&loader, symbol);
        }
    }

    ExitCode::SUCCESS
}

fn print_symbol(loader: &MibLoader, symbol: &MibSymbol) {
    match symbol {
        MibSymbol::Value(v) => {
            let oid = v
                .value
                .as_oid_node()
                .map(|n| loader.arena().to_dotted_string(n))
                .unwrap_or_else(|| "<unresolved>".to_string());
            print!("  {} {} ::= {{ {} }}", v.name, type_name(&v.value_type), oid);
            if let Some(access) = &v.access {
                print!("  [{access}]");
            }
            println!();
        }
        MibSymbol::Type(t) => {
            println!("  {} ::= {}", t.name, type_name(&t.aliased_type));
        }
    }
}

fn type_name(ty: &grammatica_mib::MibType) -> String {
    match ty {
        grammatica_mib::MibType::Named(n) => n.clone(),
        grammatica_mib::MibType::SequenceOf(n) => format!("SEQUENCE OF {n}"),
        grammatica_mib::MibType::Sequence(fields) => {
            let fields = fields.iter().map(|(name, ty)| format!("{name} {}", type_name(ty))).collect::<Vec<_>>().join(", ");
            format!("SEQUENCE {{ {fields} }}")
        }
        grammatica_mib::MibType::Enumerated { bits, members } => {
            let kw = if *bits { "BITS" } else { "INTEGER" };
            let members = members.iter().map(|(name, n)| format!("{name}({n})")).collect::<Vec<_>>().join(", ");
            format!("{kw} {{ {members} }}")
        }
    }
}
