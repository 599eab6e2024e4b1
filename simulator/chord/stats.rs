//! Statistics and results for the Chord lookup simulator

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chord_sim::{PeerIndex, Ring};
use hashbrown::HashMap;
use log::info;
use serde::Serialize;
use serde_json::{json, Value};

use super::error::SimError;

/// value -> number of occurrences
pub type Histogram = BTreeMap<u64, u64>;

/// Build a histogram from raw samples
pub fn histogram<I: IntoIterator<Item = u64>>(values: I) -> Histogram {
    let mut result = Histogram::new();
    for value in values {
        *result.entry(value).or_insert(0) += 1;
    }
    result
}

/// One experiment as written to the JSON log
///
/// Field names follow the log format the analysis notebooks read.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Experiment {
    pub bits: u32,
    pub nodes: usize,
    pub iterations: usize,

    /// Finger-table edges pointing at each peer
    pub indegrees: Histogram,

    /// Keys owned by each peer (distance from its predecessor)
    pub gaps: Histogram,

    /// Hops per lookup
    pub path_lengths: Histogram,

    /// Fewest finger-table hops between start and terminal peer per lookup
    pub shortest_path_lengths: Histogram,

    /// Lookups terminating at each peer
    pub end_nodes: Histogram,

    /// Lookups passing through each peer
    pub queries: Histogram,
}

/// Per-peer and per-lookup samples pooled over every simulated ring
///
/// Lookups are recorded one at a time; `finish_ring` then folds the ring's
/// shape and the per-peer counters of that round into the pooled samples, so
/// every per-peer series grows by `nodes` per ring.
pub struct LookupTally {
    path_lengths: Vec<u64>,
    shortest_path_lengths: Vec<u64>,
    gaps: Vec<u64>,
    indegrees: Vec<u64>,
    end_nodes: Vec<u64>,
    queries: Vec<u64>,

    // counters for the ring currently being measured
    round_ends: HashMap<PeerIndex, u64>,
    round_queries: HashMap<PeerIndex, u64>,
}

impl LookupTally {
    pub fn new() -> Self {
        Self {
            path_lengths: Vec::new(),
            shortest_path_lengths: Vec::new(),
            gaps: Vec::new(),
            indegrees: Vec::new(),
            end_nodes: Vec::new(),
            queries: Vec::new(),
            round_ends: HashMap::new(),
            round_queries: HashMap::new(),
        }
    }

    /// Record one lookup path and its shortest possible hop count
    pub fn record(&mut self, path: &[PeerIndex], shortest: u64) {
        self.path_lengths.push(path.len().saturating_sub(1) as u64);
        self.shortest_path_lengths.push(shortest);

        if let Some(&end) = path.last() {
            *self.round_ends.entry(end).or_insert(0) += 1;
        }
        for &peer in path {
            *self.round_queries.entry(peer).or_insert(0) += 1;
        }
    }

    /// Pool one sample per peer of `ring` and reset the per-ring counters
    pub fn finish_ring(&mut self, ring: &Ring) {
        let space = ring.space();

        let mut indegrees: HashMap<PeerIndex, u64> = HashMap::new();
        for peer in ring.peers() {
            for &finger in peer.finger_table() {
                *indegrees.entry(finger).or_insert(0) += 1;
            }
        }

        for (index, peer) in ring.peers().iter().enumerate() {
            let pred = peer.predecessor().map(|p| ring.peer(p).id()).unwrap_or(peer.id());
            let gap = space.distance(pred, peer.id());
            // a lone peer owns the whole ring
            let gap = if gap == 0 {
                u64::try_from(space.size()).unwrap_or(u64::MAX)
            } else {
                gap
            };

            self.gaps.push(gap);
            self.indegrees.push(indegrees.get(&index).copied().unwrap_or(0));
            self.end_nodes.push(self.round_ends.get(&index).copied().unwrap_or(0));
            self.queries.push(self.round_queries.get(&index).copied().unwrap_or(0));
        }

        self.round_ends.clear();
        self.round_queries.clear();
    }

    pub fn lookups(&self) -> usize {
        self.path_lengths.len()
    }

    /// Histogram the pooled samples into an `Experiment`
    pub fn into_experiment(self, bits: u32, nodes: usize, iterations: usize) -> Experiment {
        Experiment {
            bits,
            nodes,
            iterations,
            indegrees: histogram(self.indegrees),
            gaps: histogram(self.gaps),
            path_lengths: histogram(self.path_lengths),
            shortest_path_lengths: histogram(self.shortest_path_lengths),
            end_nodes: histogram(self.end_nodes),
            queries: histogram(self.queries),
        }
    }
}

/// (min, max, mean) of the samples a histogram describes
pub fn summarize(histogram: &Histogram) -> Option<(u64, u64, f64)> {
    let min = *histogram.keys().next()?;
    let max = *histogram.keys().next_back()?;
    let count: u64 = histogram.values().sum();
    let total: f64 = histogram.iter().map(|(&v, &c)| v as f64 * c as f64).sum();

    Some((min, max, total / count as f64))
}

/// Simulation result
#[derive(Debug)]
pub struct SimResult {
    /// Seed used for the simulation
    pub seed_used: [u8; 32],

    /// Number of lookups performed
    pub lookups: usize,

    /// Aggregated statistics
    pub experiment: Experiment,
}

impl SimResult {
    /// Print a summary of the simulation results
    pub fn print_summary(&self) {
        println!("\n╔════════════════════════════════════════════════════════╗");
        println!("║        Chord Lookup Simulation Results                 ║");
        println!("╚════════════════════════════════════════════════════════╝\n");

        println!("Configuration:");
        println!("  Seed: {:?}", self.seed_used);
        println!("  Bits: {}", self.experiment.bits);
        println!("  Nodes: {}", self.experiment.nodes);
        println!("  Iterations: {}", self.experiment.iterations);
        println!("  Lookups: {}\n", self.lookups);

        println!("Statistics (min / max / avg):");
        let rows = [
            ("Path length", &self.experiment.path_lengths),
            ("Shortest path", &self.experiment.shortest_path_lengths),
            ("Queries per node", &self.experiment.queries),
            ("Lookups ending per node", &self.experiment.end_nodes),
            ("In-degree", &self.experiment.indegrees),
            ("Keys per node", &self.experiment.gaps),
        ];
        for (label, histogram) in rows {
            if let Some((min, max, avg)) = summarize(histogram) {
                println!("  {:<24} {} / {} / {:.2}", label, min, max, avg);
            }
        }
        println!();
    }

    /// Append the experiment to the JSON log at `path`
    ///
    /// The log is an object with an `experiments` array; a missing or empty
    /// file starts a new log.
    pub fn append_to_log(&self, path: &Path) -> Result<(), SimError> {
        let mut log = match fs::read_to_string(path) {
            Ok(content) if !content.trim().is_empty() => serde_json::from_str(&content)?,
            Ok(_) => json!({}),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => json!({}),
            Err(e) => return Err(e.into()),
        };

        let entry = serde_json::to_value(&self.experiment)?;
        append_experiment(&mut log, entry)?;

        fs::write(path, serde_json::to_string_pretty(&log)?)?;
        info!("experiment appended to {}", path.display());
        Ok(())
    }
}

fn append_experiment(log: &mut Value, entry: Value) -> Result<(), SimError> {
    let object = log
        .as_object_mut()
        .ok_or_else(|| SimError::MalformedLog("top level is not a JSON object".to_string()))?;

    match object.get_mut("experiments") {
        Some(Value::Array(experiments)) => experiments.push(entry),
        // a single previous experiment becomes the first array element
        Some(existing) => {
            let previous = existing.take();
            *existing = Value::Array(vec![previous, entry]);
        }
        None => {
            object.insert("experiments".to_string(), Value::Array(vec![entry]));
        }
    }

    Ok(())
}
