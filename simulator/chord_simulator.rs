// Chord Simulator - build a ring and measure greedy lookups across it
//
// Usage:
//   cargo run --bin chord_simulator -- --nodes 1024 --bits 16
//   cargo run --bin chord_simulator -- -n 4096 -b 20 --dot ring.dot --log log.json
//   cargo run --bin chord_simulator -- --scenario scenarios/large.yaml --seed 0x1234...

mod chord;

use chord::{ChordRunner, ChordSimConfig};
use log::info;
use simple_logger::SimpleLogger;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Scenario file format
#[derive(Debug, serde::Deserialize)]
struct ScenarioFile {
    /// Scenario metadata
    #[serde(default)]
    meta: ScenarioMeta,

    /// Configuration overrides
    #[serde(default)]
    config: ScenarioConfig,
}

#[derive(Debug, Default, serde::Deserialize)]
struct ScenarioMeta {
    name: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Default, serde::Deserialize)]
struct ScenarioConfig {
    bits: Option<u32>,
    nodes: Option<usize>,
    iterations: Option<usize>,
    dot: Option<PathBuf>,
    sif: Option<PathBuf>,
    log: Option<PathBuf>,
    multigraph: Option<bool>,
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} [OPTIONS]", program);
    eprintln!("\nOptions:");
    eprintln!("  -n, --nodes N         Number of nodes (default: 1024)");
    eprintln!("  -b, --bits B          Number of bits (default: 16)");
    eprintln!("  -i, --iterations I    Lookups per node (default: 1)");
    eprintln!("  -d, --dot PATH        Export graph to DOT file");
    eprintln!("  -s, --sif PATH        Export graph to SIF file");
    eprintln!("  -l, --log PATH        Append statistics to JSON log");
    eprintln!("  -c, --collapse        Merge repeated finger edges in exports");
    eprintln!("      --seed HEX        Fixed 32-byte seed");
    eprintln!("      --scenario FILE   Load settings from a YAML scenario");
    eprintln!("  -h, --help            Show this help text and exit");
}

fn fail(program: &str, message: &str) -> ! {
    eprintln!("Error: {}", message);
    print_usage(program);
    std::process::exit(1);
}

fn main() {
    SimpleLogger::new().init().unwrap();

    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("chord_simulator");

    let mut config = ChordSimConfig::default();
    let mut overrides: Vec<(String, String)> = Vec::new();
    let mut scenario_path: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "-h" | "--help" => {
                print_usage(program);
                return;
            }
            "-c" | "--collapse" => overrides.push(("collapse".to_string(), String::new())),
            "-n" | "--nodes" | "-b" | "--bits" | "-i" | "--iterations" | "-d" | "--dot"
            | "-s" | "--sif" | "-l" | "--log" | "--seed" | "--scenario" => {
                let value = args
                    .get(i + 1)
                    .unwrap_or_else(|| fail(program, &format!("missing value for {}", flag)));
                if flag == "--scenario" {
                    scenario_path = Some(PathBuf::from(value));
                } else {
                    overrides.push((flag.trim_start_matches('-').to_string(), value.clone()));
                }
                i += 1;
            }
            other => fail(program, &format!("unknown option {}", other)),
        }
        i += 1;
    }

    // scenario first, explicit flags win
    if let Some(ref path) = scenario_path {
        apply_scenario(&mut config, path);
    }
    for (key, value) in &overrides {
        apply_flag(&mut config, program, key, value);
    }

    info!("Configuration:");
    info!("  Bits: {}", config.bits);
    info!("  Nodes: {}", config.nodes);
    info!("  Iterations: {}", config.iterations);

    let runner = ChordRunner::new(config).unwrap_or_else(|e| fail(program, &e.to_string()));

    match runner.run() {
        Ok(result) => {
            result.print_summary();
            info!("✓ Simulation complete!");
        }
        Err(e) => {
            eprintln!("Simulation failed: {}", e);
            std::process::exit(1);
        }
    }
}

fn parse_number<T: std::str::FromStr>(program: &str, key: &str, value: &str) -> T {
    value
        .parse()
        .unwrap_or_else(|_| fail(program, &format!("{} must be an integer, got '{}'", key, value)))
}

fn apply_flag(config: &mut ChordSimConfig, program: &str, key: &str, value: &str) {
    match key {
        "n" | "nodes" => config.nodes = parse_number(program, "nodes", value),
        "b" | "bits" => config.bits = parse_number(program, "bits", value),
        "i" | "iterations" => config.iterations = parse_number(program, "iterations", value),
        "d" | "dot" => config.output.dot = Some(PathBuf::from(value)),
        "s" | "sif" => config.output.sif = Some(PathBuf::from(value)),
        "l" | "log" => config.output.log = Some(PathBuf::from(value)),
        "collapse" => config.output.multigraph = false,
        "seed" => config.seed = Some(parse_seed_hex(program, value)),
        _ => fail(program, &format!("unknown option {}", key)),
    }
}

fn apply_scenario(config: &mut ChordSimConfig, path: &Path) {
    println!("Loading scenario from: {}", path.display());

    let yaml_content = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Failed to read {}: {}", path.display(), e);
        std::process::exit(1);
    });

    let scenario: ScenarioFile = serde_yaml::from_str(&yaml_content).unwrap_or_else(|e| {
        eprintln!("Failed to parse {}: {}", path.display(), e);
        std::process::exit(1);
    });

    println!("\n╔════════════════════════════════════════════════════════╗");
    if let Some(ref name) = scenario.meta.name {
        println!("║  {}", name);
    } else {
        println!("║  Scenario: {}", path.display());
    }
    println!("╚════════════════════════════════════════════════════════╝\n");

    if let Some(ref desc) = scenario.meta.description {
        println!("{}\n", desc);
    }

    let overrides = scenario.config;
    if let Some(v) = overrides.bits {
        config.bits = v;
    }
    if let Some(v) = overrides.nodes {
        config.nodes = v;
    }
    if let Some(v) = overrides.iterations {
        config.iterations = v;
    }
    if let Some(v) = overrides.multigraph {
        config.output.multigraph = v;
    }
    if overrides.dot.is_some() {
        config.output.dot = overrides.dot;
    }
    if overrides.sif.is_some() {
        config.output.sif = overrides.sif;
    }
    if overrides.log.is_some() {
        config.output.log = overrides.log;
    }
}

fn parse_seed_hex(program: &str, hex: &str) -> [u8; 32] {
    let hex = hex.strip_prefix("0x").unwrap_or(hex);
    let mut seed = [0u8; 32];

    for (i, chunk) in hex.as_bytes().chunks(2).enumerate() {
        if i >= 32 {
            break;
        }
        let byte = std::str::from_utf8(chunk)
            .ok()
            .and_then(|s| u8::from_str_radix(s, 16).ok())
            .unwrap_or_else(|| fail(program, &format!("invalid hex seed '{}'", hex)));
        seed[i] = byte;
    }

    seed
}
