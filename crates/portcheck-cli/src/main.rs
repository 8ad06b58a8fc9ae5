use clap::{Parser, Subcommand};
use colored::Colorize;
use portcheck_core::{port_from_json, verify_definition, AdapterManifest, PortDefinition};
use std::path::{Path, PathBuf};
use std::process;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// portcheck — port/adapter contract verification
///
/// Check that an adapter exposes every operation a port requires.
#[derive(Parser)]
#[command(name = "portcheck", version, about, long_about = None)]
struct Cli {
    /// Suppress human-readable output (exit code only)
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(long, short, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Verify an adapter manifest against a port manifest
    Verify {
        /// Path to port manifest (.json)
        port: PathBuf,
        /// Path to adapter manifest (.json)
        adapter: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a port definition
    Show {
        /// Path to port manifest (.json)
        port: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compute the SHA-256 fingerprint of a port's required operations
    Hash {
        /// Path to port manifest (.json)
        port: PathBuf,
    },

    /// Show version information
    Version,
}

/// Exit codes: 0 = implemented, 1 = operations missing, 2 = error
const EXIT_OK: i32 = 0;
const EXIT_MISSING: i32 = 1;
const EXIT_ERROR: i32 = 2;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let exit_code = match cli.command {
        Commands::Verify { port, adapter, json } => cmd_verify(&port, &adapter, json, cli.quiet),
        Commands::Show { port, json } => cmd_show(&port, json, cli.quiet),
        Commands::Hash { port } => cmd_hash(&port),
        Commands::Version => {
            println!(
                "portcheck {} (portcheck-core {})",
                env!("CARGO_PKG_VERSION"),
                portcheck_core::VERSION
            );
            EXIT_OK
        }
    };

    process::exit(exit_code);
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .init();
}

// ── Commands ──────────────────────────────────────────────

fn cmd_verify(port: &Path, adapter: &Path, json: bool, quiet: bool) -> i32 {
    let definition = match load_port(port) {
        Ok(def) => def,
        Err(msg) => return fail(&msg),
    };
    let candidate = match read_file(adapter)
        .and_then(|text| AdapterManifest::from_json(&text).map_err(|e| e.to_string()))
    {
        Ok(manifest) => manifest,
        Err(msg) => return fail(&format!("{}: {}", adapter.display(), msg)),
    };

    let result = match verify_definition(&definition, &candidate) {
        Ok(result) => result,
        Err(e) => return fail(&e.to_string()),
    };
    info!(
        port = definition.name(),
        adapter = candidate.name.as_str(),
        implemented = result.is_implemented(),
        "verification complete"
    );

    if json {
        match serde_json::to_string_pretty(&result) {
            Ok(out) => println!("{}", out),
            Err(e) => return fail(&format!("serialization failed: {}", e)),
        }
    } else if !quiet {
        if result.is_implemented() {
            println!(
                "{} {} implements {}",
                "✓".green().bold(),
                candidate.name,
                definition.name()
            );
        } else {
            println!(
                "{} {} does not implement {}",
                "✗".red().bold(),
                candidate.name,
                definition.name()
            );
            for op in result.missing_operations() {
                println!("  missing: {}", op.yellow());
            }
        }
    }

    if result.is_implemented() {
        EXIT_OK
    } else {
        EXIT_MISSING
    }
}

fn cmd_show(port: &Path, json: bool, quiet: bool) -> i32 {
    let definition = match load_port(port) {
        Ok(def) => def,
        Err(msg) => return fail(&msg),
    };

    if json {
        let value = serde_json::json!({
            "definition": definition,
            "fingerprint": definition.fingerprint(),
        });
        match serde_json::to_string_pretty(&value) {
            Ok(out) => println!("{}", out),
            Err(e) => return fail(&format!("serialization failed: {}", e)),
        }
    } else if !quiet {
        println!("{} {}", "port".bold(), definition.name());
        if !definition.extends().is_empty() {
            println!("  extends: {}", definition.extends().join(", "));
        }
        for op in definition.operations() {
            println!("  - {}", op);
        }
        println!("  fingerprint: {}", definition.fingerprint().dimmed());
    }
    EXIT_OK
}

fn cmd_hash(port: &Path) -> i32 {
    match load_port(port) {
        Ok(def) => {
            println!("{}", def.fingerprint());
            EXIT_OK
        }
        Err(msg) => fail(&msg),
    }
}

// ── Helpers ───────────────────────────────────────────────

fn read_file(path: &Path) -> Result<String, String> {
    debug!(path = %path.display(), "reading manifest");
    std::fs::read_to_string(path).map_err(|e| e.to_string())
}

fn load_port(path: &Path) -> Result<PortDefinition, String> {
    read_file(path)
        .and_then(|text| port_from_json(&text).map_err(|e| e.to_string()))
        .map_err(|msg| format!("{}: {}", path.display(), msg))
}

fn fail(msg: &str) -> i32 {
    eprintln!("{} {}", "error:".red().bold(), msg);
    EXIT_ERROR
}
